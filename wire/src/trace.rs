//! Field trace: an ordered record of every named value a routine read.

use std::borrow::Cow;
use std::fmt;

use crate::guid::Guid128;
use crate::spatial::{Quaternion, Vector2, Vector3, Vector4};

/// One segment of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSegment {
    /// Position within a repeated structure.
    Index(usize),
    /// Name of a nested structure.
    Label(Cow<'static, str>),
}

/// Location of a field inside nested and repeated structures, e.g.
/// `[0] CreateData MovementSpline [3]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path of a top-level field.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a copy extended with a repeat index.
    #[must_use]
    pub fn at(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// Returns a copy extended with a structure label.
    #[must_use]
    pub fn child(&self, label: impl Into<Cow<'static, str>>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Label(label.into()));
        Self(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match segment {
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Label(label) => f.write_str(label)?,
            }
        }
        Ok(())
    }
}

/// A traced value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraceValue {
    Bool(bool),
    UInt(u64),
    SInt(i64),
    Float(f32),
    Str(String),
    Guid(Guid128),
    Vector2(Vector2),
    Vector3(Vector3),
    Vector4(Vector4),
    Quaternion(Quaternion),
}

macro_rules! impl_from_for_trace_value {
    ($($ty:ty => $variant:ident via $conv:ty),* $(,)?) => {
        $(
            impl From<$ty> for TraceValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(<$conv>::from(value))
                }
            }
        )*
    };
}

impl_from_for_trace_value! {
    bool => Bool via bool,
    u8 => UInt via u64,
    u16 => UInt via u64,
    u32 => UInt via u64,
    u64 => UInt via u64,
    i8 => SInt via i64,
    i16 => SInt via i64,
    i32 => SInt via i64,
    i64 => SInt via i64,
    f32 => Float via f32,
    String => Str via String,
    &str => Str via String,
    Guid128 => Guid via Guid128,
    Vector2 => Vector2 via Vector2,
    Vector3 => Vector3 via Vector3,
    Vector4 => Vector4 via Vector4,
    Quaternion => Quaternion via Quaternion,
}

impl fmt::Display for TraceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::SInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
            Self::Guid(v) => write!(f, "{v}"),
            Self::Vector2(v) => write!(f, "X: {} Y: {}", v.x, v.y),
            Self::Vector3(v) => write!(f, "X: {} Y: {} Z: {}", v.x, v.y, v.z),
            Self::Vector4(v) => write!(f, "X: {} Y: {} Z: {} O: {}", v.x, v.y, v.z, v.o),
            Self::Quaternion(v) => write!(f, "X: {} Y: {} Z: {} W: {}", v.x, v.y, v.z, v.w),
        }
    }
}

/// One traced field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceRecord {
    pub name: Cow<'static, str>,
    pub value: TraceValue,
    pub path: FieldPath,
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}: {}", self.name, self.value)
        } else {
            write!(f, "{} {}: {}", self.path, self.name, self.value)
        }
    }
}

/// Ordered trace records for one message.
///
/// A disabled trace drops every record. An enabled trace keeps records up
/// to its limit and then only marks itself truncated.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldTrace {
    records: Vec<TraceRecord>,
    enabled: bool,
    limit: usize,
    truncated: bool,
}

impl FieldTrace {
    /// Creates a trace that records up to `limit` fields.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            records: Vec::new(),
            enabled: true,
            limit,
            truncated: false,
        }
    }

    /// Creates a trace that records nothing.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            records: Vec::new(),
            enabled: false,
            limit: 0,
            truncated: false,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` if records were dropped because the limit was hit.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Appends a record.
    pub fn push(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<TraceValue>,
        path: &FieldPath,
    ) {
        if !self.enabled {
            return;
        }
        if self.records.len() >= self.limit {
            self.truncated = true;
            return;
        }
        self.records.push(TraceRecord {
            name: name.into(),
            value: value.into(),
            path: path.clone(),
        });
    }

    #[must_use]
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finds the first record with `name`, at any path.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&TraceRecord> {
        self.records.iter().find(|record| record.name == name)
    }

    #[must_use]
    pub fn into_records(self) -> Vec<TraceRecord> {
        self.records
    }
}
