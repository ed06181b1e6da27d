//! Decoder configuration.

use wire::Limits;

/// Settings for a decode run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Record a [`FieldTrace`](wire::FieldTrace) for every message.
    pub trace_fields: bool,
    /// Maximum number of trace records kept per message.
    pub max_trace_records: usize,
    /// Maximum element count accepted for any length-prefixed collection.
    pub max_collection_len: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        let limits = Limits::default();
        Self {
            trace_fields: true,
            max_trace_records: limits.max_trace_records,
            max_collection_len: limits.max_collection_len,
        }
    }
}

impl DecoderConfig {
    /// Creates a configuration suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        let limits = Limits::for_testing();
        Self {
            trace_fields: true,
            max_trace_records: limits.max_trace_records,
            max_collection_len: limits.max_collection_len,
        }
    }

    /// Creates a configuration with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            trace_fields: true,
            max_trace_records: usize::MAX,
            max_collection_len: usize::MAX,
        }
    }

    /// Returns a copy with field tracing switched off.
    #[must_use]
    pub const fn without_trace(mut self) -> Self {
        self.trace_fields = false;
        self
    }

    /// Per-message cursor limits.
    #[must_use]
    pub const fn limits(&self) -> Limits {
        Limits {
            max_trace_records: self.max_trace_records,
            max_collection_len: self.max_collection_len,
        }
    }
}
