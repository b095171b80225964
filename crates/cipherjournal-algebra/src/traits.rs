//! The `CiphertextAlgebra` trait: everything the ledger may do with a
//! ciphertext.
//!
//! The ledger treats handles as opaque. It imports, folds, and grants;
//! it never decrypts. Decryption is a client-side concern outside this
//! boundary.

use cipherjournal_core::{Address, CipherHandle};

use crate::envelope::ExternalCiphertext;
use crate::error::Result;

/// An identity that may hold a capability grant on a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grantee {
    /// The ledger's own standing capability, required for homomorphic ops.
    Ledger,

    /// An external identity (an entry owner, typically).
    Address(Address),
}

impl From<Address> for Grantee {
    fn from(addr: Address) -> Self {
        Grantee::Address(addr)
    }
}

/// The opaque ciphertext algebra the ledger is built against.
///
/// Implementations must uphold:
///
/// - `import_external` fails with `InvalidProof` on a malformed proof and
///   has no observable effect in that case.
/// - `add` returns a fresh handle; operand handles are unchanged.
/// - `grant` is idempotent; a duplicate grant is a no-op, not an error.
/// - Grants are never silently dropped by other operations.
pub trait CiphertextAlgebra: Send + Sync {
    /// Convert an externally encrypted input into an internal handle.
    fn import_external(&self, input: &ExternalCiphertext) -> Result<CipherHandle>;

    /// Homomorphic addition. Requires the ledger's standing self-grant on
    /// both operands.
    fn add(&self, a: CipherHandle, b: CipherHandle) -> Result<CipherHandle>;

    /// Grant `grantee` the capability to operate on / decrypt `handle`.
    fn grant(&self, handle: CipherHandle, grantee: Grantee) -> Result<()>;

    /// Grant the ledger's own standing capability on `handle`.
    fn grant_to_self(&self, handle: CipherHandle) -> Result<()> {
        self.grant(handle, Grantee::Ledger)
    }

    /// Whether `grantee` currently holds a grant on `handle`.
    fn is_allowed(&self, handle: CipherHandle, grantee: Grantee) -> Result<bool>;
}
