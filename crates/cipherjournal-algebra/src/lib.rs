//! # Cipherjournal Algebra
//!
//! The ciphertext algebra boundary. The ledger consumes this interface and
//! never looks inside a ciphertext: it imports externally encrypted values,
//! folds them homomorphically, and issues capability grants, all through
//! [`CiphertextAlgebra`].
//!
//! ## Boundary semantics
//!
//! - `import_external` rejects a malformed validity proof with
//!   [`AlgebraError::InvalidProof`] and produces a fresh [`CipherHandle`].
//! - `add` is homomorphic addition; the result is always a fresh handle.
//! - `grant` is idempotent: granting twice to the same grantee is a no-op.
//! - `grant_to_self` records the ledger's own standing capability, which is
//!   required before any homomorphic operation on a handle.
//!
//! ## ClearAlgebra
//!
//! [`ClearAlgebra`] is the reference implementation used by tests and local
//! development. It keeps values in plaintext behind the same interface and
//! checks proofs as blake3 commitments, so every capability and atomicity
//! property of the ledger can be exercised without an FHE backend.

pub mod clear;
pub mod envelope;
pub mod error;
pub mod traits;

pub use clear::ClearAlgebra;
pub use envelope::{ExternalCiphertext, ImportProof};
pub use error::{AlgebraError, Result};
pub use traits::{CiphertextAlgebra, Grantee};

pub use cipherjournal_core::CipherHandle;
