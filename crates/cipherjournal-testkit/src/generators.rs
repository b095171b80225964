//! Proptest generators for property-based testing.

use proptest::prelude::*;

use cipherjournal_algebra::{ClearAlgebra, ExternalCiphertext};
use cipherjournal_core::{Address, CipherHandle, EntryDraft, EntryId};

/// Generate a non-zero address.
pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>()
        .prop_filter("the zero address never owns entries", |b| b != &[0u8; 20])
        .prop_map(Address::from_bytes)
}

/// Generate a random EntryId (1-indexed).
pub fn entry_id() -> impl Strategy<Value = EntryId> {
    (1u64..=u64::MAX).prop_map(EntryId)
}

/// Generate a random CipherHandle.
pub fn cipher_handle() -> impl Strategy<Value = CipherHandle> {
    any::<[u8; 32]>().prop_map(CipherHandle::from_bytes)
}

/// Generate journal content.
pub fn content() -> impl Strategy<Value = String> {
    "[ -~]{0,256}".prop_map(String::from)
}

/// Generate a plausible well-being field value.
pub fn field_value() -> impl Strategy<Value = i64> {
    0i64..=100
}

/// Generate a reasonable timestamp.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=i64::MAX / 2
}

/// Generate a valid sealed envelope together with its plaintext.
pub fn sealed_envelope() -> impl Strategy<Value = (i64, ExternalCiphertext)> {
    (field_value(), any::<[u8; 16]>())
        .prop_map(|(value, nonce)| (value, ClearAlgebra::seal_with_nonce(value, nonce)))
}

/// Parameters for generating an entry draft.
#[derive(Debug, Clone)]
pub struct DraftParams {
    pub owner: Address,
    pub content: String,
    pub stress: i64,
    pub achievement: i64,
    pub mindset: i64,
    pub created_at: i64,
}

impl Arbitrary for DraftParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            address(),
            content(),
            field_value(),
            field_value(),
            field_value(),
            0i64..=1_700_000_000_000i64,
        )
            .prop_map(
                |(owner, content, stress, achievement, mindset, created_at)| DraftParams {
                    owner,
                    content,
                    stress,
                    achievement,
                    mindset,
                    created_at,
                },
            )
            .boxed()
    }
}

/// Import the params' three field values through `algebra` and build the
/// resulting draft.
pub fn draft_from_params(
    algebra: &ClearAlgebra,
    params: &DraftParams,
) -> cipherjournal_algebra::Result<EntryDraft> {
    use cipherjournal_algebra::CiphertextAlgebra;

    Ok(EntryDraft {
        owner: params.owner,
        content: params.content.clone(),
        stress: algebra.import_external(&ClearAlgebra::seal(params.stress))?,
        achievement: algebra.import_external(&ClearAlgebra::seal(params.achievement))?,
        mindset: algebra.import_external(&ClearAlgebra::seal(params.mindset))?,
        created_at: params.created_at,
    })
}
