//! Proptest generators for property-based testing.

use std::collections::BTreeMap;

use proptest::prelude::*;

use veridoc_core::{ContentAddress, ContentHash, RecordDraft, TransactionId};

/// Generate a random ContentHash.
pub fn content_hash() -> impl Strategy<Value = ContentHash> {
    any::<[u8; 32]>().prop_map(ContentHash::from_bytes)
}

/// Generate a random ContentAddress.
pub fn content_address() -> impl Strategy<Value = ContentAddress> {
    any::<[u8; 32]>().prop_map(ContentAddress::from_bytes)
}

/// Generate a random TransactionId.
pub fn transaction_id() -> impl Strategy<Value = TransactionId> {
    any::<[u8; 32]>().prop_map(TransactionId::from_bytes)
}

/// Generate an issuer identity.
pub fn issuer() -> impl Strategy<Value = String> {
    "[a-z][a-z-]{2,24}".prop_map(String::from)
}

/// Generate a document-type string from the registry vocabulary.
pub fn document_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("passport".to_string()),
        Just("moi-certificate".to_string()),
        Just("trade-license".to_string()),
        Just("title-deed".to_string()),
    ]
}

/// Generate a metadata map.
pub fn metadata() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z]{1,8}", "[a-zA-Z0-9 ]{0,16}", 0..4)
}

/// Generate document payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=max_len)
}

/// Generate a reasonable registration timestamp.
pub fn timestamp() -> impl Strategy<Value = i64> {
    1_500_000_000_000i64..=1_900_000_000_000i64
}

/// Parameters for generating a record draft.
#[derive(Debug, Clone)]
pub struct DraftParams {
    pub issuer: String,
    pub document_type: String,
    pub payload: Vec<u8>,
    pub metadata: BTreeMap<String, String>,
    pub registered_at: i64,
}

impl Arbitrary for DraftParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (issuer(), document_type(), payload(256), metadata(), timestamp())
            .prop_map(|(issuer, document_type, payload, metadata, registered_at)| DraftParams {
                issuer,
                document_type,
                payload,
                metadata,
                registered_at,
            })
            .boxed()
    }
}

/// Build a draft from parameters; hash and address derive from the payload.
pub fn draft_from_params(params: &DraftParams) -> RecordDraft {
    RecordDraft::new(
        params.issuer.as_str(),
        params.document_type.as_str(),
        ContentHash::hash(&params.payload),
        ContentAddress::derive(&params.payload),
    )
    .metadata_map(params.metadata.clone())
    .registered_at(params.registered_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veridoc_core::canonical_record_bytes;

    proptest! {
        #[test]
        fn test_canonical_encoding_deterministic(params: DraftParams) {
            let r1 = draft_from_params(&params).into_record(7, TransactionId::ZERO, 12);
            let r2 = draft_from_params(&params).into_record(7, TransactionId::ZERO, 12);

            prop_assert_eq!(canonical_record_bytes(&r1), canonical_record_bytes(&r2));
            prop_assert_eq!(r1.digest(), r2.digest());
        }

        #[test]
        fn test_digest_tracks_payload(
            params: DraftParams,
            other in payload(256),
        ) {
            prop_assume!(params.payload != other);

            let mut changed = params.clone();
            changed.payload = other;

            let r1 = draft_from_params(&params).into_record(1, TransactionId::ZERO, 12);
            let r2 = draft_from_params(&changed).into_record(1, TransactionId::ZERO, 12);

            prop_assert_ne!(r1.digest(), r2.digest());
        }
    }
}
