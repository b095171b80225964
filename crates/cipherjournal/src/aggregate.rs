//! The aggregate engine: homomorphic folds over ciphertext fields.
//!
//! The ledger can combine a user's encrypted values without decrypting
//! them. The only fold currently defined is addition over the stress
//! field, seeded from the first handle rather than a zero accumulator so
//! a single-element index costs no algebra call at all.

use cipherjournal_algebra::CiphertextAlgebra;
use cipherjournal_core::CipherHandle;

use crate::error::Result;

/// Fold handles left-to-right with homomorphic addition.
///
/// The caller guarantees `handles` is non-empty; the public `EmptyIndex`
/// check happens before the handles are collected.
pub(crate) fn fold_sum<A: CiphertextAlgebra>(
    algebra: &A,
    handles: &[CipherHandle],
) -> Result<CipherHandle> {
    debug_assert!(!handles.is_empty());

    let mut acc = handles[0];
    for &handle in &handles[1..] {
        acc = algebra.add(acc, handle)?;
        // Each intermediate result needs the standing self-grant before it
        // can be an operand of the next addition.
        algebra.grant_to_self(acc)?;
    }
    Ok(acc)
}
