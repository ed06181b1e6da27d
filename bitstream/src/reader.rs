//! Bit-level reader with bounded operations.

use crate::error::{BitError, BitResult};

/// Largest bit run a single [`BitReader::read_bits`] call may consume.
pub const MAX_BIT_RUN: u8 = 32;

/// A mixed bit/byte cursor over one message payload.
///
/// Bits are consumed most-significant-first within each byte. Byte-granular
/// reads (little-endian) require the cursor to sit on a byte boundary; call
/// [`realign`](Self::realign) after a bit run to discard the partial byte.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new `BitReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Returns the number of bits remaining to read.
    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        self.data
            .len()
            .saturating_mul(8)
            .saturating_sub(self.bit_pos)
    }

    /// Returns `true` if there are no more bits to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }

    /// Returns the current bit position.
    #[must_use]
    pub const fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Returns the bit offset within the current byte (0..=7).
    #[must_use]
    pub const fn bit_offset(&self) -> u8 {
        (self.bit_pos % 8) as u8
    }

    /// Returns the number of bytes touched so far; a partially read byte counts.
    #[must_use]
    pub const fn consumed_bytes(&self) -> usize {
        self.bit_pos.div_ceil(8)
    }

    /// Returns the length of the underlying buffer in bytes.
    #[must_use]
    pub const fn len_bytes(&self) -> usize {
        self.data.len()
    }

    /// Reads a single bit as a boolean.
    pub fn read_bit(&mut self) -> BitResult<bool> {
        self.ensure_bits(1)?;
        let byte_idx = self.bit_pos / 8;
        let bit_idx = self.bit_pos % 8;
        let bit = (self.data[byte_idx] >> (7 - bit_idx)) & 1;
        self.bit_pos += 1;
        Ok(bit == 1)
    }

    /// Reads up to 32 bits as an unsigned integer, MSB first.
    pub fn read_bits(&mut self, bits: u8) -> BitResult<u32> {
        if bits > MAX_BIT_RUN {
            return Err(BitError::InvalidBitCount {
                bits,
                max_bits: MAX_BIT_RUN,
            });
        }
        if bits == 0 {
            return Ok(0);
        }
        self.ensure_bits(bits as usize)?;

        let mut value = 0u32;
        for _ in 0..bits {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Ok(value)
    }

    /// Discards the rest of a partially read byte.
    ///
    /// A no-op when already on a byte boundary. Never fails: the partial
    /// byte is always inside the buffer.
    pub fn realign(&mut self) {
        let rem = self.bit_pos % 8;
        if rem != 0 {
            self.bit_pos += 8 - rem;
        }
    }

    /// Reads a byte-aligned `u8`.
    pub fn read_u8(&mut self) -> BitResult<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Reads a byte-aligned `i8`.
    pub fn read_i8(&mut self) -> BitResult<i8> {
        Ok(i8::from_le_bytes(self.read_array::<1>()?))
    }

    /// Reads a byte-aligned `u16` (little-endian).
    pub fn read_u16(&mut self) -> BitResult<u16> {
        Ok(u16::from_le_bytes(self.read_array::<2>()?))
    }

    /// Reads a byte-aligned `i16` (little-endian).
    pub fn read_i16(&mut self) -> BitResult<i16> {
        Ok(i16::from_le_bytes(self.read_array::<2>()?))
    }

    /// Reads a byte-aligned `u32` (little-endian).
    pub fn read_u32(&mut self) -> BitResult<u32> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }

    /// Reads a byte-aligned `i32` (little-endian).
    pub fn read_i32(&mut self) -> BitResult<i32> {
        Ok(i32::from_le_bytes(self.read_array::<4>()?))
    }

    /// Reads a byte-aligned `u64` (little-endian).
    pub fn read_u64(&mut self) -> BitResult<u64> {
        Ok(u64::from_le_bytes(self.read_array::<8>()?))
    }

    /// Reads a byte-aligned `i64` (little-endian).
    pub fn read_i64(&mut self) -> BitResult<i64> {
        Ok(i64::from_le_bytes(self.read_array::<8>()?))
    }

    /// Reads a byte-aligned IEEE-754 `f32` (little-endian).
    pub fn read_f32(&mut self) -> BitResult<f32> {
        Ok(f32::from_le_bytes(self.read_array::<4>()?))
    }

    /// Reads `len` byte-aligned bytes.
    pub fn read_bytes(&mut self, len: usize) -> BitResult<&'a [u8]> {
        self.ensure_aligned()?;
        self.ensure_bits(len.saturating_mul(8))?;
        let start = self.bit_pos / 8;
        let data: &'a [u8] = self.data;
        self.bit_pos += len * 8;
        Ok(&data[start..start + len])
    }

    /// Reads a fixed-length string, replacing invalid UTF-8 sequences.
    pub fn read_string(&mut self, len: usize) -> BitResult<String> {
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Reads a NUL-terminated string; the terminator is consumed but not returned.
    pub fn read_cstring(&mut self) -> BitResult<String> {
        self.ensure_aligned()?;
        let start = self.bit_pos / 8;
        let rest = &self.data[start..];
        let Some(len) = rest.iter().position(|&b| b == 0) else {
            return Err(BitError::UnexpectedEof {
                requested: (rest.len() + 1) * 8,
                available: rest.len() * 8,
            });
        };
        let value = String::from_utf8_lossy(&rest[..len]).into_owned();
        self.bit_pos += (len + 1) * 8;
        Ok(value)
    }

    fn ensure_aligned(&self) -> BitResult<()> {
        if self.bit_pos % 8 != 0 {
            return Err(BitError::MisalignedAccess {
                bit_position: self.bit_pos,
            });
        }
        Ok(())
    }

    fn ensure_bits(&self, bits: usize) -> BitResult<()> {
        let available = self.bits_remaining();
        if bits > available {
            return Err(BitError::UnexpectedEof {
                requested: bits,
                available,
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> BitResult<[u8; N]> {
        self.ensure_aligned()?;
        self.ensure_bits(N * 8)?;
        let idx = self.bit_pos / 8;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[idx..idx + N]);
        self.bit_pos += N * 8;
        Ok(out)
    }
}
