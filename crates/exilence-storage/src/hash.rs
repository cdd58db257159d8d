//! Deterministic payload hashing using blake3.
//!
//! Digests are stored next to each payload and compared on save, so a store
//! that notifies without actually changing does not cause a disk write.

/// Computes the blake3 hash of a serialized payload.
pub fn hash_payload(payload: &str) -> blake3::Hash {
    blake3::hash(payload.as_bytes())
}

/// Hex form of [`hash_payload`], as stored in the `payload_hash` column.
pub fn payload_digest(payload: &str) -> String {
    hash_payload(payload).to_hex().to_string()
}
