//! Canonical CBOR encoding for deterministic record serialization.
//!
//! Implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (timestamps are i64 milliseconds)
//!
//! Determinism is what makes Merkle commitments meaningful: the same record
//! must produce identical bytes (and thus an identical leaf digest) on every
//! platform and in every process.

use ciborium::value::Value;

use crate::record::DocumentRecord;

/// Record field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const VERSION: u64 = 0;
    pub const CONTENT_HASH: u64 = 1;
    pub const TRANSACTION_ID: u64 = 2;
    pub const SEQ: u64 = 3;
    pub const ISSUER: u64 = 4;
    pub const DOCUMENT_TYPE: u64 = 5;
    pub const STORAGE_ADDRESS: u64 = 6;
    pub const METADATA: u64 = 7;
    pub const REGISTERED_AT: u64 = 8;
    pub const CONFIRMATIONS: u64 = 9;
    pub const CONFIRMED: u64 = 10;
}

/// Encode a record to canonical CBOR bytes.
pub fn canonical_record_bytes(record: &DocumentRecord) -> Vec<u8> {
    let value = record_to_cbor_value(record);
    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value);
    buf
}

/// Convert a record to a CBOR Value (map with integer keys).
fn record_to_cbor_value(record: &DocumentRecord) -> Value {
    // Build map entries in key order (already sorted 0-10)
    let mut entries = Vec::with_capacity(11);

    // 0: version
    entries.push((
        Value::Integer(keys::VERSION.into()),
        Value::Integer(record.version.into()),
    ));

    // 1: content_hash
    entries.push((
        Value::Integer(keys::CONTENT_HASH.into()),
        Value::Bytes(record.content_hash.0.to_vec()),
    ));

    // 2: transaction_id
    entries.push((
        Value::Integer(keys::TRANSACTION_ID.into()),
        Value::Bytes(record.transaction_id.0.to_vec()),
    ));

    // 3: seq
    entries.push((
        Value::Integer(keys::SEQ.into()),
        Value::Integer(record.seq.into()),
    ));

    // 4: issuer
    entries.push((
        Value::Integer(keys::ISSUER.into()),
        Value::Text(record.issuer.clone()),
    ));

    // 5: document_type
    entries.push((
        Value::Integer(keys::DOCUMENT_TYPE.into()),
        Value::Text(record.document_type.clone()),
    ));

    // 6: storage_address
    entries.push((
        Value::Integer(keys::STORAGE_ADDRESS.into()),
        Value::Bytes(record.storage_address.0.to_vec()),
    ));

    // 7: metadata (text-keyed map, canonically sorted by the encoder)
    let metadata_entries: Vec<(Value, Value)> = record
        .metadata
        .iter()
        .map(|(k, v)| (Value::Text(k.clone()), Value::Text(v.clone())))
        .collect();
    entries.push((
        Value::Integer(keys::METADATA.into()),
        Value::Map(metadata_entries),
    ));

    // 8: registered_at
    entries.push((
        Value::Integer(keys::REGISTERED_AT.into()),
        Value::Integer(record.registered_at.into()),
    ));

    // 9: confirmations
    entries.push((
        Value::Integer(keys::CONFIRMATIONS.into()),
        Value::Integer(record.confirmations.into()),
    ));

    // 10: confirmed
    entries.push((Value::Integer(keys::CONFIRMED.into()), Value::Bool(record.confirmed)));

    Value::Map(entries)
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => {
            encode_integer(buf, *i);
        }
        Value::Bytes(b) => {
            encode_bytes(buf, b);
        }
        Value::Text(s) => {
            encode_text(buf, s);
        }
        Value::Array(arr) => {
            encode_array(buf, arr);
        }
        Value::Map(entries) => {
            encode_map_canonical(buf, entries);
        }
        Value::Bool(b) => {
            buf.push(if *b { 0xf5 } else { 0xf4 });
        }
        Value::Null => {
            buf.push(0xf6);
        }
        Value::Float(_) => {
            panic!("floats not supported in canonical encoding");
        }
        _ => {
            panic!("unsupported CBOR value type");
        }
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        // Major type 0: unsigned integer
        encode_uint(buf, 0, n as u64);
    } else {
        // Major type 1: negative integer
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode an array (major type 4).
fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item);
    }
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    // Encode all keys first to sort by encoded bytes
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    // Sort by encoded key bytes (lexicographic)
    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    // Write map header
    encode_uint(buf, 5, key_value_pairs.len() as u64);

    // Write sorted key-value pairs
    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}
