//! Plaintext reference implementation of the ciphertext algebra.
//!
//! `ClearAlgebra` keeps every "ciphertext" as a plaintext `i64` behind the
//! same interface a real FHE backend would expose. Proofs are blake3
//! commitments over the envelope bytes, handles are domain-separated
//! digests, and grant sets are tracked per handle. Tests use [`reveal`]
//! to assert decrypted values out-of-band.
//!
//! [`reveal`]: ClearAlgebra::reveal

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use cipherjournal_core::CipherHandle;

use crate::envelope::ExternalCiphertext;
use crate::error::{AlgebraError, Result};
use crate::traits::{CiphertextAlgebra, Grantee};

/// Domain prefix for handle derivation.
const HANDLE_DOMAIN: &[u8] = b"cipherjournal/clear-handle/v1";

/// The decoded form of a `ClearAlgebra` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ClearPayload {
    value: i64,
    nonce: [u8; 16],
}

/// Plaintext stand-in for an FHE backend. Thread-safe via RwLock.
pub struct ClearAlgebra {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Plaintext value behind each handle.
    values: HashMap<CipherHandle, i64>,

    /// Grant set per handle.
    grants: HashMap<CipherHandle, HashSet<Grantee>>,

    /// Counter folded into handle derivation so re-importing identical
    /// bytes still yields a fresh handle.
    minted: u64,
}

impl ClearAlgebra {
    /// Create an empty algebra.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Encrypt-equivalent: wrap a value in a sealed envelope with a random
    /// nonce and a valid commitment proof.
    pub fn seal(value: i64) -> ExternalCiphertext {
        let mut nonce = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut nonce);
        Self::seal_with_nonce(value, nonce)
    }

    /// Deterministic variant of [`seal`](Self::seal) for golden tests.
    pub fn seal_with_nonce(value: i64, nonce: [u8; 16]) -> ExternalCiphertext {
        let payload = ClearPayload { value, nonce };
        let mut buf = Vec::new();
        ciborium::into_writer(&payload, &mut buf)
            .expect("CBOR serialization of a fixed struct cannot fail");
        ExternalCiphertext::sealed(buf)
    }

    /// Decrypt-equivalent: read the plaintext behind `handle`, checking
    /// that `grantee` holds a grant. Test-assertion path; a real backend
    /// performs decryption client-side.
    pub fn reveal(&self, handle: CipherHandle, grantee: Grantee) -> Result<i64> {
        let inner = self.inner.read().expect("algebra lock poisoned");
        let value = *inner
            .values
            .get(&handle)
            .ok_or(AlgebraError::UnknownHandle(handle))?;

        let allowed = inner
            .grants
            .get(&handle)
            .is_some_and(|set| set.contains(&grantee));
        if !allowed {
            return Err(AlgebraError::NotAllowed(handle));
        }

        Ok(value)
    }

    /// All grantees currently holding a grant on `handle`.
    pub fn grantees(&self, handle: CipherHandle) -> Result<Vec<Grantee>> {
        let inner = self.inner.read().expect("algebra lock poisoned");
        if !inner.values.contains_key(&handle) {
            return Err(AlgebraError::UnknownHandle(handle));
        }
        Ok(inner
            .grants
            .get(&handle)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }
}

impl Default for ClearAlgebra {
    fn default() -> Self {
        Self::new()
    }
}

fn mint_handle(material: &[&[u8]], counter: u64) -> CipherHandle {
    let mut hasher = blake3::Hasher::new();
    hasher.update(HANDLE_DOMAIN);
    for part in material {
        hasher.update(part);
    }
    hasher.update(&counter.to_le_bytes());
    CipherHandle(*hasher.finalize().as_bytes())
}

impl CiphertextAlgebra for ClearAlgebra {
    fn import_external(&self, input: &ExternalCiphertext) -> Result<CipherHandle> {
        if !input.proof.verifies(&input.bytes) {
            return Err(AlgebraError::InvalidProof);
        }

        let payload: ClearPayload = ciborium::from_reader(input.bytes.as_ref())
            .map_err(|e| AlgebraError::MalformedEnvelope(e.to_string()))?;

        let mut inner = self.inner.write().expect("algebra lock poisoned");
        let handle = mint_handle(&[input.bytes.as_ref()], inner.minted);
        inner.minted += 1;
        inner.values.insert(handle, payload.value);
        inner.grants.entry(handle).or_default();
        Ok(handle)
    }

    fn add(&self, a: CipherHandle, b: CipherHandle) -> Result<CipherHandle> {
        let mut inner = self.inner.write().expect("algebra lock poisoned");

        let lhs = *inner.values.get(&a).ok_or(AlgebraError::UnknownHandle(a))?;
        let rhs = *inner.values.get(&b).ok_or(AlgebraError::UnknownHandle(b))?;

        // Homomorphic ops require the ledger's standing self-grant.
        for operand in [a, b] {
            let allowed = inner
                .grants
                .get(&operand)
                .is_some_and(|set| set.contains(&Grantee::Ledger));
            if !allowed {
                return Err(AlgebraError::NotAllowed(operand));
            }
        }

        let handle = mint_handle(&[a.as_bytes(), b.as_bytes()], inner.minted);
        inner.minted += 1;
        inner.values.insert(handle, lhs.wrapping_add(rhs));
        inner.grants.entry(handle).or_default();
        Ok(handle)
    }

    fn grant(&self, handle: CipherHandle, grantee: Grantee) -> Result<()> {
        let mut inner = self.inner.write().expect("algebra lock poisoned");
        if !inner.values.contains_key(&handle) {
            return Err(AlgebraError::UnknownHandle(handle));
        }
        // Idempotent: HashSet insert absorbs duplicates.
        inner.grants.entry(handle).or_default().insert(grantee);
        Ok(())
    }

    fn is_allowed(&self, handle: CipherHandle, grantee: Grantee) -> Result<bool> {
        let inner = self.inner.read().expect("algebra lock poisoned");
        if !inner.values.contains_key(&handle) {
            return Err(AlgebraError::UnknownHandle(handle));
        }
        Ok(inner
            .grants
            .get(&handle)
            .is_some_and(|set| set.contains(&grantee)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherjournal_core::Address;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn test_import_and_reveal() {
        let algebra = ClearAlgebra::new();
        let handle = algebra.import_external(&ClearAlgebra::seal(42)).unwrap();

        let owner = Grantee::Address(addr(0xaa));
        algebra.grant(handle, owner).unwrap();

        assert_eq!(algebra.reveal(handle, owner).unwrap(), 42);
    }

    #[test]
    fn test_import_rejects_bad_proof() {
        let algebra = ClearAlgebra::new();
        let mut env = ClearAlgebra::seal(42);
        env.proof = crate::envelope::ImportProof([0xff; 32]);

        let err = algebra.import_external(&env).unwrap_err();
        assert!(matches!(err, AlgebraError::InvalidProof));
    }

    #[test]
    fn test_reveal_without_grant_denied() {
        let algebra = ClearAlgebra::new();
        let handle = algebra.import_external(&ClearAlgebra::seal(7)).unwrap();

        let err = algebra.reveal(handle, Grantee::Address(addr(0xbb))).unwrap_err();
        assert!(matches!(err, AlgebraError::NotAllowed(_)));
    }

    #[test]
    fn test_add_requires_self_grant() {
        let algebra = ClearAlgebra::new();
        let a = algebra.import_external(&ClearAlgebra::seal(10)).unwrap();
        let b = algebra.import_external(&ClearAlgebra::seal(20)).unwrap();

        // No self-grant yet.
        assert!(matches!(
            algebra.add(a, b),
            Err(AlgebraError::NotAllowed(_))
        ));

        algebra.grant_to_self(a).unwrap();
        algebra.grant_to_self(b).unwrap();

        let sum = algebra.add(a, b).unwrap();
        assert!(matches!(
            algebra.reveal(sum, Grantee::Ledger),
            Err(AlgebraError::NotAllowed(_))
        ));

        algebra.grant_to_self(sum).unwrap();
        assert_eq!(algebra.reveal(sum, Grantee::Ledger).unwrap(), 30);
    }

    #[test]
    fn test_add_mints_fresh_handle() {
        let algebra = ClearAlgebra::new();
        let a = algebra.import_external(&ClearAlgebra::seal(1)).unwrap();
        let b = algebra.import_external(&ClearAlgebra::seal(2)).unwrap();
        algebra.grant_to_self(a).unwrap();
        algebra.grant_to_self(b).unwrap();

        let s1 = algebra.add(a, b).unwrap();
        let s2 = algebra.add(a, b).unwrap();
        assert_ne!(s1, s2);
        assert_ne!(s1, a);
        assert_ne!(s1, b);
    }

    #[test]
    fn test_reimport_mints_fresh_handle() {
        let algebra = ClearAlgebra::new();
        let env = ClearAlgebra::seal_with_nonce(5, [0u8; 16]);
        let h1 = algebra.import_external(&env).unwrap();
        let h2 = algebra.import_external(&env).unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_grant_idempotent() {
        let algebra = ClearAlgebra::new();
        let handle = algebra.import_external(&ClearAlgebra::seal(1)).unwrap();
        let owner = Grantee::Address(addr(0xaa));

        algebra.grant(handle, owner).unwrap();
        algebra.grant(handle, owner).unwrap();

        assert_eq!(algebra.grantees(handle).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_handle_errors() {
        let algebra = ClearAlgebra::new();
        let bogus = CipherHandle::from_bytes([9u8; 32]);

        assert!(matches!(
            algebra.grant(bogus, Grantee::Ledger),
            Err(AlgebraError::UnknownHandle(_))
        ));
        assert!(matches!(
            algebra.is_allowed(bogus, Grantee::Ledger),
            Err(AlgebraError::UnknownHandle(_))
        ));
    }
}
