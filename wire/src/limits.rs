//! Configurable limits for bounded decoding.

/// Per-message decoding limits.
///
/// Collection counts read from the wire are validated against these before
/// iteration so a corrupt count cannot drive an unbounded allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of trace records kept for one message.
    pub max_trace_records: usize,

    /// Maximum element count accepted for any length-prefixed collection.
    pub max_collection_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // A full create block with an area-trigger shape is a few thousand fields.
            max_trace_records: 64 * 1024,
            max_collection_len: 1 << 16,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_trace_records: 256,
            max_collection_len: 64,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_trace_records: usize::MAX,
            max_collection_len: usize::MAX,
        }
    }
}
