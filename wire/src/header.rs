//! Message header types supplied by capture ingestion.

use std::fmt;

/// The protocol's discriminator for a payload's semantic type (an opcode).
///
/// Numeric values are revision-specific; the same logical message may carry
/// different codes in different builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageCode(u32);

impl MessageCode {
    /// Creates a message code from its raw value.
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Returns the raw code value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for MessageCode {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// A monotonically comparable protocol revision (client build number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProtocolBuild(u32);

impl ProtocolBuild {
    /// Creates a build from its raw number.
    #[must_use]
    pub const fn new(build: u32) -> Self {
        Self(build)
    }

    /// Returns the raw build number.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProtocolBuild {
    fn from(build: u32) -> Self {
        Self(build)
    }
}

impl fmt::Display for ProtocolBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which peer sent the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    ClientToServer,
    #[default]
    ServerToClient,
}

/// Capture timestamp in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptureTime(u64);

impl CaptureTime {
    /// Creates a timestamp from milliseconds since the epoch.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Returns milliseconds since the epoch.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

/// Header of one captured message, as handed over by capture ingestion.
///
/// `payload_len` is what the capture declared; the dispatcher compares it
/// with what the resolved routine actually consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageHeader {
    /// Message code.
    pub code: MessageCode,
    /// Protocol build the capture was taken with.
    pub build: ProtocolBuild,
    /// Declared payload length in bytes.
    pub payload_len: u32,
    /// Sender.
    pub direction: Direction,
    /// When the message was captured.
    pub time: CaptureTime,
    /// Position of the message within the capture.
    pub number: u64,
}

impl MessageHeader {
    /// Creates a server-to-client header with a zero timestamp.
    #[must_use]
    pub const fn new(code: MessageCode, build: ProtocolBuild, payload_len: u32) -> Self {
        Self {
            code,
            build,
            payload_len,
            direction: Direction::ServerToClient,
            time: CaptureTime::from_millis(0),
            number: 0,
        }
    }

    /// Sets the sender.
    #[must_use]
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the capture timestamp.
    #[must_use]
    pub const fn with_time(mut self, time: CaptureTime) -> Self {
        self.time = time;
        self
    }

    /// Sets the message's position within the capture.
    #[must_use]
    pub const fn with_number(mut self, number: u64) -> Self {
        self.number = number;
        self
    }
}
