//! Plain and compressed spatial values.
//!
//! Packed vectors store three signed fixed-point axes in one `i32`
//! (11/11/10 bits, quarter-unit resolution). Packed quaternions store
//! three signed components in one `i64` (22/21/21 bits) with the scalar
//! part implied by normalization.

use std::ops::{Add, Mul, Sub};

use bitstream::{BitReader, BitResult, BitWriter};

/// Resolution of one packed-vector unit.
pub const PACKED_VECTOR_SCALE: f32 = 0.25;

/// Divisor of the packed quaternion's 22-bit x component (2^21).
pub const PACKED_QUAT_X_SCALE: f64 = 2_097_152.0;

/// Divisor of the packed quaternion's 21-bit y and z components (2^20).
pub const PACKED_QUAT_YZ_SCALE: f64 = 1_048_576.0;

/// Two-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn read(reader: &mut BitReader<'_>) -> BitResult<Self> {
        Ok(Self {
            x: reader.read_f32()?,
            y: reader.read_f32()?,
        })
    }

    pub fn write(self, writer: &mut BitWriter) -> BitResult<()> {
        writer.write_f32(self.x)?;
        writer.write_f32(self.y)
    }
}

/// Three-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise midpoint of two points.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        (self + other) * 0.5
    }

    /// Reads three little-endian `f32`s.
    pub fn read(reader: &mut BitReader<'_>) -> BitResult<Self> {
        Ok(Self {
            x: reader.read_f32()?,
            y: reader.read_f32()?,
            z: reader.read_f32()?,
        })
    }

    pub fn write(self, writer: &mut BitWriter) -> BitResult<()> {
        writer.write_f32(self.x)?;
        writer.write_f32(self.y)?;
        writer.write_f32(self.z)
    }

    /// Decodes a packed vector from its raw `i32`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn unpack(packed: i32) -> Self {
        let x = ((packed & 0x7FF) << 21) >> 21;
        let y = (((packed >> 11) & 0x7FF) << 21) >> 21;
        let z = packed >> 22;
        Self {
            x: x as f32 * PACKED_VECTOR_SCALE,
            y: y as f32 * PACKED_VECTOR_SCALE,
            z: z as f32 * PACKED_VECTOR_SCALE,
        }
    }

    /// Encodes into the packed form, rounding to the nearest quarter unit
    /// and saturating at each axis' range.
    #[must_use]
    pub fn pack(self) -> i32 {
        let x = quantize(self.x, 1024);
        let y = quantize(self.y, 1024);
        let z = quantize(self.z, 512);
        (x & 0x7FF) | ((y & 0x7FF) << 11) | (z << 22)
    }

    /// Reads one packed vector.
    pub fn read_packed(reader: &mut BitReader<'_>) -> BitResult<Self> {
        reader.read_i32().map(Self::unpack)
    }

    pub fn write_packed(self, writer: &mut BitWriter) -> BitResult<()> {
        writer.write_i32(self.pack())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn quantize(value: f32, half_range: i32) -> i32 {
    let steps = (value / PACKED_VECTOR_SCALE).round();
    (steps as i32).clamp(-half_range, half_range - 1)
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// A position with an orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub o: f32,
}

impl Vector4 {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, o: f32) -> Self {
        Self { x, y, z, o }
    }

    #[must_use]
    pub const fn from_position(position: Vector3, o: f32) -> Self {
        Self::new(position.x, position.y, position.z, o)
    }

    #[must_use]
    pub const fn position(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn read(reader: &mut BitReader<'_>) -> BitResult<Self> {
        Ok(Self {
            x: reader.read_f32()?,
            y: reader.read_f32()?,
            z: reader.read_f32()?,
            o: reader.read_f32()?,
        })
    }

    pub fn write(self, writer: &mut BitWriter) -> BitResult<()> {
        writer.write_f32(self.x)?;
        writer.write_f32(self.y)?;
        writer.write_f32(self.z)?;
        writer.write_f32(self.o)
    }
}

/// A rotation quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Reads four plain little-endian `f32`s.
    pub fn read(reader: &mut BitReader<'_>) -> BitResult<Self> {
        Ok(Self {
            x: reader.read_f32()?,
            y: reader.read_f32()?,
            z: reader.read_f32()?,
            w: reader.read_f32()?,
        })
    }

    /// Decodes a packed quaternion from its raw `i64`.
    ///
    /// The scalar part is recovered from unit length; when the vector part
    /// is already within 2^-20 of unit length it is taken as zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn unpack(packed: i64) -> Self {
        let x = (packed >> 42) as f64 / PACKED_QUAT_X_SCALE;
        let y = ((packed << 22) >> 43) as f64 / PACKED_QUAT_YZ_SCALE;
        let z = ((packed << 43) >> 43) as f64 / PACKED_QUAT_YZ_SCALE;
        let norm = x * x + y * y + z * z;
        let w = if (norm - 1.0).abs() >= 1.0 / PACKED_QUAT_YZ_SCALE {
            (1.0 - norm).max(0.0).sqrt()
        } else {
            0.0
        };
        Self::new(x as f32, y as f32, z as f32, w as f32)
    }

    /// Encodes the vector part into the packed form. The scalar part is
    /// not stored; callers should pass a quaternion with `w >= 0`.
    #[must_use]
    pub fn pack(self) -> i64 {
        let x = quantize_component(self.x, PACKED_QUAT_X_SCALE, 1 << 21);
        let y = quantize_component(self.y, PACKED_QUAT_YZ_SCALE, 1 << 20);
        let z = quantize_component(self.z, PACKED_QUAT_YZ_SCALE, 1 << 20);
        (x << 42) | ((y & 0x1F_FFFF) << 21) | (z & 0x1F_FFFF)
    }

    pub fn read_packed(reader: &mut BitReader<'_>) -> BitResult<Self> {
        reader.read_i64().map(Self::unpack)
    }

    pub fn write_packed(self, writer: &mut BitWriter) -> BitResult<()> {
        writer.write_i64(self.pack())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn quantize_component(value: f32, scale: f64, half_range: i64) -> i64 {
    let steps = (f64::from(value) * scale).round() as i64;
    steps.clamp(-half_range, half_range - 1)
}
