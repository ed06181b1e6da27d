//! Traced read cursor over one message payload.

use std::borrow::Cow;

use bitstream::{BitError, BitReader, BitResult};

use crate::guid::Guid128;
use crate::limits::Limits;
use crate::spatial::{Quaternion, Vector2, Vector3, Vector4};
use crate::trace::{FieldPath, FieldTrace, TraceValue};

/// A payload cursor that records every named read into a [`FieldTrace`].
///
/// Each `read_*` call reads exactly what the underlying [`BitReader`]
/// would read; whether tracing is enabled never changes the cursor.
#[derive(Debug, Clone)]
pub struct Packet<'a> {
    reader: BitReader<'a>,
    trace: FieldTrace,
    max_collection_len: usize,
}

macro_rules! traced_reads {
    ($($name:ident -> $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Reads a traced `", stringify!($ty), "`.")]
            pub fn $name(&mut self, name: &'static str, path: &FieldPath) -> BitResult<$ty> {
                let value = self.reader.$name()?;
                self.trace.push(name, value, path);
                Ok(value)
            }
        )*
    };
}

impl<'a> Packet<'a> {
    /// Creates a packet over `data` with the given limits.
    #[must_use]
    pub const fn new(data: &'a [u8], limits: &Limits, trace_fields: bool) -> Self {
        let trace = if trace_fields {
            FieldTrace::new(limits.max_trace_records)
        } else {
            FieldTrace::disabled()
        };
        Self {
            reader: BitReader::new(data),
            trace,
            max_collection_len: limits.max_collection_len,
        }
    }

    /// Creates an untraced packet with default limits.
    #[must_use]
    pub fn untraced(data: &'a [u8]) -> Self {
        Self::new(data, &Limits::default(), false)
    }

    traced_reads! {
        read_u8 -> u8,
        read_i8 -> i8,
        read_u16 -> u16,
        read_i16 -> i16,
        read_u32 -> u32,
        read_i32 -> i32,
        read_u64 -> u64,
        read_i64 -> i64,
        read_f32 -> f32,
    }

    /// Reads one traced bit.
    pub fn read_bit(&mut self, name: &'static str, path: &FieldPath) -> BitResult<bool> {
        let value = self.reader.read_bit()?;
        self.trace.push(name, value, path);
        Ok(value)
    }

    /// Reads one bit without recording it, for presence flags whose value
    /// only steers the layout.
    pub fn read_flag(&mut self) -> BitResult<bool> {
        self.reader.read_bit()
    }

    /// Reads a traced run of up to 32 bits.
    pub fn read_bits(&mut self, name: &'static str, bits: u8, path: &FieldPath) -> BitResult<u32> {
        let value = self.reader.read_bits(bits)?;
        self.trace.push(name, value, path);
        Ok(value)
    }

    /// Reads a run of bits without recording it, for lengths and counts.
    pub fn read_raw_bits(&mut self, bits: u8) -> BitResult<u32> {
        self.reader.read_bits(bits)
    }

    /// Reads an untraced `u32` collection count and validates it against
    /// the collection limit.
    pub fn read_count(&mut self) -> BitResult<usize> {
        let count = self.reader.read_u32()?;
        self.check_count(count as usize)
    }

    /// Reads a bit-packed collection count and validates it.
    pub fn read_bits_count(&mut self, bits: u8) -> BitResult<usize> {
        let count = self.reader.read_bits(bits)?;
        self.check_count(count as usize)
    }

    /// Validates a count read by other means.
    pub fn check_count(&self, count: usize) -> BitResult<usize> {
        if count > self.max_collection_len {
            return Err(BitError::LimitExceeded {
                count,
                max: self.max_collection_len,
            });
        }
        Ok(count)
    }

    /// Skips to the next byte boundary.
    pub fn realign(&mut self) {
        self.reader.realign();
    }

    /// Reads a traced NUL-terminated string.
    pub fn read_cstring(&mut self, name: &'static str, path: &FieldPath) -> BitResult<String> {
        let value = self.reader.read_cstring()?;
        self.trace.push(name, value.as_str(), path);
        Ok(value)
    }

    /// Reads a traced fixed-length string.
    pub fn read_string(
        &mut self,
        name: &'static str,
        len: usize,
        path: &FieldPath,
    ) -> BitResult<String> {
        let value = self.reader.read_string(len)?;
        self.trace.push(name, value.as_str(), path);
        Ok(value)
    }

    /// Reads raw bytes, traced as their length.
    pub fn read_bytes(
        &mut self,
        name: &'static str,
        len: usize,
        path: &FieldPath,
    ) -> BitResult<&'a [u8]> {
        let value = self.reader.read_bytes(len)?;
        self.trace.push(name, value.len() as u64, path);
        Ok(value)
    }

    /// Reads a traced packed identifier.
    pub fn read_guid(&mut self, name: &'static str, path: &FieldPath) -> BitResult<Guid128> {
        let value = Guid128::read_packed(&mut self.reader)?;
        self.trace.push(name, value, path);
        Ok(value)
    }

    pub fn read_vector2(&mut self, name: &'static str, path: &FieldPath) -> BitResult<Vector2> {
        let value = Vector2::read(&mut self.reader)?;
        self.trace.push(name, value, path);
        Ok(value)
    }

    pub fn read_vector3(&mut self, name: &'static str, path: &FieldPath) -> BitResult<Vector3> {
        let value = Vector3::read(&mut self.reader)?;
        self.trace.push(name, value, path);
        Ok(value)
    }

    pub fn read_vector4(&mut self, name: &'static str, path: &FieldPath) -> BitResult<Vector4> {
        let value = Vector4::read(&mut self.reader)?;
        self.trace.push(name, value, path);
        Ok(value)
    }

    /// Reads a traced packed (fixed-point) vector.
    pub fn read_packed_vector3(
        &mut self,
        name: &'static str,
        path: &FieldPath,
    ) -> BitResult<Vector3> {
        let value = Vector3::read_packed(&mut self.reader)?;
        self.trace.push(name, value, path);
        Ok(value)
    }

    pub fn read_quaternion(
        &mut self,
        name: &'static str,
        path: &FieldPath,
    ) -> BitResult<Quaternion> {
        let value = Quaternion::read(&mut self.reader)?;
        self.trace.push(name, value, path);
        Ok(value)
    }

    /// Reads a traced packed quaternion.
    pub fn read_packed_quaternion(
        &mut self,
        name: &'static str,
        path: &FieldPath,
    ) -> BitResult<Quaternion> {
        let value = Quaternion::read_packed(&mut self.reader)?;
        self.trace.push(name, value, path);
        Ok(value)
    }

    /// Records a derived value without reading.
    pub fn add_value(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<TraceValue>,
        path: &FieldPath,
    ) {
        self.trace.push(name, value, path);
    }

    /// Bytes consumed so far; a partially read byte counts as consumed.
    #[must_use]
    pub const fn consumed_bytes(&self) -> usize {
        self.reader.consumed_bytes()
    }

    #[must_use]
    pub const fn len_bytes(&self) -> usize {
        self.reader.len_bytes()
    }

    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        self.reader.bits_remaining()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.reader.is_empty()
    }

    #[must_use]
    pub const fn trace(&self) -> &FieldTrace {
        &self.trace
    }

    #[must_use]
    pub fn into_trace(self) -> FieldTrace {
        self.trace
    }
}
