//! Merkle batch commitments over ledger records.
//!
//! Leaves are Blake3 digests of canonical record bytes; interior nodes hash
//! the concatenation of their children under a domain prefix. An odd level
//! duplicates its last digest, so a batch of three commits as
//! `combine(combine(a, b), combine(c, c))`.

use rand::RngCore;

use crate::hash::ContentHash;
use crate::record::DocumentRecord;

/// Domain prefix for interior node hashing.
const NODE_DOMAIN: &[u8] = b"veridoc-merkle-v0:";

/// Compute the Merkle root over a batch of records, in the given order.
///
/// The commitment is order-sensitive. An empty batch has no meaningful
/// commitment and yields a fresh random digest so it can never equal a
/// real root (placeholder, documented behavior).
pub fn merkle_root(records: &[DocumentRecord]) -> ContentHash {
    if records.is_empty() {
        return random_root();
    }

    let mut level: Vec<ContentHash> = records.iter().map(DocumentRecord::digest).collect();

    while level.len() > 1 {
        let mut next = Vec::with_capacity((level.len() + 1) / 2);
        for pair in level.chunks(2) {
            let left = &pair[0];
            // Odd level: duplicate the last digest
            let right = pair.get(1).unwrap_or(left);
            next.push(combine(left, right));
        }
        level = next;
    }

    level[0]
}

/// Hash two child digests into their parent.
pub fn combine(left: &ContentHash, right: &ContentHash) -> ContentHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(NODE_DOMAIN);
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    ContentHash::from_bytes(*hasher.finalize().as_bytes())
}

fn random_root() -> ContentHash {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    ContentHash::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{ContentAddress, TransactionId};
    use crate::record::RecordDraft;

    fn record(label: &str, seq: u64) -> DocumentRecord {
        RecordDraft::new(
            "issuer",
            "certificate",
            ContentHash::hash(label.as_bytes()),
            ContentAddress::derive(label.as_bytes()),
        )
        .registered_at(1736870400000)
        .into_record(seq, TransactionId::from_bytes([seq as u8; 32]), 12)
    }

    #[test]
    fn test_root_deterministic() {
        let batch = vec![record("a", 1), record("b", 2), record("c", 3)];
        assert_eq!(merkle_root(&batch), merkle_root(&batch));
    }

    #[test]
    fn test_root_order_sensitive() {
        let forward = vec![record("a", 1), record("b", 2)];
        let reversed = vec![record("b", 2), record("a", 1)];
        assert_ne!(merkle_root(&forward), merkle_root(&reversed));
    }

    #[test]
    fn test_single_record_root_is_its_digest() {
        let batch = vec![record("only", 1)];
        assert_eq!(merkle_root(&batch), batch[0].digest());
    }

    #[test]
    fn test_odd_level_duplicates_last() {
        let batch = vec![record("a", 1), record("b", 2), record("c", 3)];
        let a = batch[0].digest();
        let b = batch[1].digest();
        let c = batch[2].digest();

        let expected = combine(&combine(&a, &b), &combine(&c, &c));
        assert_eq!(merkle_root(&batch), expected);
    }

    #[test]
    fn test_empty_batch_random_placeholder() {
        // Two empty-batch roots must not collide
        assert_ne!(merkle_root(&[]), merkle_root(&[]));
    }

    #[test]
    fn test_four_records_balanced_tree() {
        let batch = vec![record("a", 1), record("b", 2), record("c", 3), record("d", 4)];
        let digests: Vec<ContentHash> = batch.iter().map(DocumentRecord::digest).collect();

        let expected = combine(
            &combine(&digests[0], &digests[1]),
            &combine(&digests[2], &digests[3]),
        );
        assert_eq!(merkle_root(&batch), expected);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn batch(max_len: usize) -> impl Strategy<Value = Vec<DocumentRecord>> {
            prop::collection::vec("[a-z]{1,12}", 1..=max_len).prop_map(|labels| {
                labels
                    .into_iter()
                    .enumerate()
                    .map(|(i, label)| record(&label, (i + 1) as u64))
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn root_deterministic(batch in batch(16)) {
                prop_assert_eq!(merkle_root(&batch), merkle_root(&batch));
            }

            #[test]
            fn appending_changes_root(batch in batch(16)) {
                let root = merkle_root(&batch);
                let mut extended = batch.clone();
                extended.push(record("appended", (batch.len() + 1) as u64));
                prop_assert_ne!(root, merkle_root(&extended));
            }
        }
    }
}
