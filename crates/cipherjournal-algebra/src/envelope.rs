//! External ciphertext envelope and validity proof.
//!
//! A caller submits encrypted values as `(bytes, proof)` pairs. The bytes
//! are opaque to the ledger; the proof binds them and is validated only by
//! the algebra's import operation.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain prefix for import-proof commitments.
pub const PROOF_DOMAIN: &[u8] = b"cipherjournal/import-proof/v1";

/// A 32-byte validity proof over a ciphertext envelope.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportProof(pub [u8; 32]);

impl ImportProof {
    /// Create a proof from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Compute the commitment proof for the given envelope bytes.
    pub fn commit(ciphertext: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(PROOF_DOMAIN);
        hasher.update(ciphertext);
        Self(*hasher.finalize().as_bytes())
    }

    /// Constant-time-irrelevant equality check against an envelope.
    pub fn verifies(&self, ciphertext: &[u8]) -> bool {
        *self == Self::commit(ciphertext)
    }
}

impl fmt::Debug for ImportProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImportProof({})", &hex::encode(self.0)[..16])
    }
}

/// An externally encrypted value as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCiphertext {
    /// Opaque ciphertext bytes.
    pub bytes: Bytes,

    /// Validity proof over the bytes.
    pub proof: ImportProof,
}

impl ExternalCiphertext {
    /// Wrap ciphertext bytes with their matching commitment proof.
    pub fn sealed(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let proof = ImportProof::commit(&bytes);
        Self { bytes, proof }
    }

    /// Wrap ciphertext bytes with an explicit (possibly bogus) proof.
    pub fn with_proof(bytes: impl Into<Bytes>, proof: ImportProof) -> Self {
        Self {
            bytes: bytes.into(),
            proof,
        }
    }
}
