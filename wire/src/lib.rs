//! Message headers, the traced payload cursor, and the identifier and
//! spatial codecs shared by every decode routine.
//!
//! This crate knows how individual values are laid out on the wire. It does
//! not know which messages exist or what they mean.
//!
//! # Design Principles
//!
//! - **Bit-exact codecs** - Fixed-point scales and identifier layouts match the wire exactly.
//! - **Bounded decoding** - Length prefixes are validated against [`Limits`] before iteration.
//! - **Tracing is observation only** - A [`Packet`] reads the same bytes with or without a trace.

mod guid;
mod header;
mod limits;
mod packet;
mod spatial;
mod trace;

pub use guid::{Guid128, HighGuidType};
pub use header::{CaptureTime, Direction, MessageCode, MessageHeader, ProtocolBuild};
pub use limits::Limits;
pub use packet::Packet;
pub use spatial::{
    Quaternion, Vector2, Vector3, Vector4, PACKED_QUAT_X_SCALE, PACKED_QUAT_YZ_SCALE,
    PACKED_VECTOR_SCALE,
};
pub use trace::{FieldPath, FieldTrace, PathSegment, TraceRecord, TraceValue};
