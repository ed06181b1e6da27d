//! Per-message decode outcomes.

use std::fmt;

use bitstream::BitError;

/// How decoding one message ended.
///
/// None of these abort a run. Trace and effects produced before a failure
/// are kept for every status except [`DecodeStatus::UnhandledMessage`],
/// which produces neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The routine consumed exactly the declared payload.
    Ok,
    /// No routine resolves for the message's code and build.
    UnhandledMessage,
    /// The payload ran out; bit counts as reported by the cursor.
    Truncated { requested: usize, available: usize },
    /// The routine broke a cursor contract other than running out of data.
    Malformed(BitError),
    /// The routine stopped before the end of the declared payload.
    UnderreadPayload { declared: usize, consumed: usize },
    /// The routine read past the declared payload length.
    OverreadPayload { declared: usize, consumed: usize },
}

impl DecodeStatus {
    /// Classifies a routine failure.
    #[must_use]
    pub fn from_error(error: BitError) -> Self {
        match error {
            BitError::UnexpectedEof {
                requested,
                available,
            } => Self::Truncated {
                requested,
                available,
            },
            other => Self::Malformed(other),
        }
    }

    /// Compares what a successful routine consumed with what was declared.
    #[must_use]
    pub const fn from_lengths(declared: usize, consumed: usize) -> Self {
        if consumed < declared {
            Self::UnderreadPayload { declared, consumed }
        } else if consumed > declared {
            Self::OverreadPayload { declared, consumed }
        } else {
            Self::Ok
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for DecodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::UnhandledMessage => f.write_str("unhandled message"),
            Self::Truncated {
                requested,
                available,
            } => write!(
                f,
                "truncated: {requested} bits requested, {available} available"
            ),
            Self::Malformed(error) => write!(f, "malformed: {error}"),
            Self::UnderreadPayload { declared, consumed } => {
                write!(f, "underread: {consumed} of {declared} bytes consumed")
            }
            Self::OverreadPayload { declared, consumed } => {
                write!(f, "overread: {consumed} bytes consumed, {declared} declared")
            }
        }
    }
}

/// Running counts of message outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub messages: u64,
    pub ok: u64,
    pub unhandled: u64,
    pub truncated: u64,
    pub malformed: u64,
    pub underread: u64,
    pub overread: u64,
}

impl DispatchStats {
    /// Counts one outcome.
    pub fn record(&mut self, status: &DecodeStatus) {
        self.messages += 1;
        let slot = match status {
            DecodeStatus::Ok => &mut self.ok,
            DecodeStatus::UnhandledMessage => &mut self.unhandled,
            DecodeStatus::Truncated { .. } => &mut self.truncated,
            DecodeStatus::Malformed(_) => &mut self.malformed,
            DecodeStatus::UnderreadPayload { .. } => &mut self.underread,
            DecodeStatus::OverreadPayload { .. } => &mut self.overread,
        };
        *slot += 1;
    }

    /// Messages that did not end in [`DecodeStatus::Ok`].
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.messages - self.ok
    }
}
