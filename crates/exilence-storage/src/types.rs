//! Storage-layer record types.

/// A persisted record as read back from a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Logical store name (the record key).
    pub name: String,
    /// Opaque serialized payload.
    pub payload: String,
    /// Hex blake3 digest of `payload`, computed at write time.
    pub payload_hash: String,
}

/// Summary of a stored record (for listing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    pub name: String,
    pub payload_hash: String,
    /// Payload length in bytes.
    pub bytes: usize,
}

/// Result of a save call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The payload differed from the stored one and was written.
    Written,
    /// The stored payload already had the same digest; nothing was written.
    Unchanged,
}

impl SaveOutcome {
    pub fn was_written(self) -> bool {
        matches!(self, SaveOutcome::Written)
    }
}
