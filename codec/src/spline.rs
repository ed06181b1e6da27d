//! Movement splines and midpoint-relative path reconstruction.
//!
//! Server-driven paths are sent as their endpoints plus, for each interior
//! point, a packed offset from the path midpoint. A waypoint is recovered
//! as `midpoint - offset`, so every offset must be read before any
//! waypoint can be produced.

use std::iter::FusedIterator;
use std::vec;

use bitstream::BitResult;
use wire::{FieldPath, Guid128, Packet, Vector3};

/// Which way a spline mover faces.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SplineFacing {
    #[default]
    Normal,
    Spot(Vector3),
    Target { angle: f32, guid: Guid128 },
    Angle(f32),
}

/// Extra data of a spline that carries a spell visual.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellEffectExtra {
    pub target: Guid128,
    pub spell_visual_id: u32,
    pub progress_curve_id: u32,
    pub parabolic_curve_id: u32,
    pub jump_gravity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JumpExtra {
    pub jump_gravity: f32,
    pub start_time: u32,
    pub duration: u32,
}

/// A fully decoded server-driven move.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterSpline {
    pub id: u32,
    pub destination: Vector3,
    pub flags: u32,
    pub elapsed: i32,
    pub move_time: u32,
    pub fade_object_time: u32,
    pub mode: u8,
    pub transport: Guid128,
    pub vehicle_seat: i8,
    pub facing: SplineFacing,
    pub points: Vec<Vector3>,
    pub waypoints: Vec<Vector3>,
    pub spell_effect: Option<SpellEffectExtra>,
    pub jump: Option<JumpExtra>,
}

/// The spline part of a create block's movement.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplineState {
    pub id: i32,
    pub destination: Vector3,
    pub movement: Option<SplineMove>,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplineMove {
    pub flags: u32,
    pub elapsed: i32,
    pub duration: u32,
    pub duration_modifier: f32,
    pub next_duration_modifier: f32,
    pub facing: SplineFacing,
    pub points: Vec<Vector3>,
}

/// Literal points and packed midpoint offsets of one path, read in wire
/// order and turned into waypoints once complete.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedPath {
    start: Vector3,
    points: Vec<Vector3>,
    deltas: Vec<Vector3>,
}

impl PackedPath {
    /// Starts a path at the mover's current position.
    #[must_use]
    pub const fn new(start: Vector3) -> Self {
        Self {
            start,
            points: Vec::new(),
            deltas: Vec::new(),
        }
    }

    /// Reads `count` literal points, traced as `Points`.
    pub fn read_points(
        &mut self,
        packet: &mut Packet<'_>,
        count: usize,
        path: &FieldPath,
    ) -> BitResult<()> {
        self.points.reserve(count.min(packet.bits_remaining() / 96));
        for i in 0..count {
            let point = packet.read_vector3("Points", &path.at(i))?;
            self.points.push(point);
        }
        Ok(())
    }

    /// Reads `count` packed midpoint offsets. Offsets are not traced; the
    /// reconstructed waypoints are.
    pub fn read_deltas(
        &mut self,
        packet: &mut Packet<'_>,
        count: usize,
        path: &FieldPath,
    ) -> BitResult<()> {
        self.deltas.reserve(count.min(packet.bits_remaining() / 32));
        for i in 0..count {
            let delta = packet.read_packed_vector3("PackedDelta", &path.at(i))?;
            self.deltas.push(delta);
        }
        Ok(())
    }

    #[must_use]
    pub fn points(&self) -> &[Vector3] {
        &self.points
    }

    /// The end used for the midpoint: the first literal point, which the
    /// client treats as the path end, or `destination` if there is none.
    #[must_use]
    pub fn end(&self, destination: Vector3) -> Vector3 {
        self.points.first().copied().unwrap_or(destination)
    }

    /// Splits into the literal points and the reconstructed waypoints.
    #[must_use]
    pub fn finish(self, destination: Vector3) -> (Vec<Vector3>, Waypoints) {
        let end = self.end(destination);
        let waypoints = reconstruct_waypoints(self.start, end, self.deltas);
        (self.points, waypoints)
    }
}

/// Rebuilds interior waypoints as `midpoint(start, end) - delta`.
#[must_use]
pub fn reconstruct_waypoints(start: Vector3, end: Vector3, deltas: Vec<Vector3>) -> Waypoints {
    Waypoints {
        mid: start.midpoint(end),
        deltas: deltas.into_iter(),
    }
}

/// Reconstructed waypoints in path order. Consumed once.
#[derive(Debug)]
pub struct Waypoints {
    mid: Vector3,
    deltas: vec::IntoIter<Vector3>,
}

impl Waypoints {
    /// The midpoint every offset is relative to.
    #[must_use]
    pub const fn midpoint(&self) -> Vector3 {
        self.mid
    }
}

impl Iterator for Waypoints {
    type Item = Vector3;

    fn next(&mut self) -> Option<Vector3> {
        self.deltas.next().map(|delta| self.mid - delta)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.deltas.size_hint()
    }
}

impl ExactSizeIterator for Waypoints {}

impl FusedIterator for Waypoints {}
