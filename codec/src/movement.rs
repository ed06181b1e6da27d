//! Movement state carried by create blocks.

use wire::{Guid128, Quaternion, Vector3, Vector4};

use crate::spline::SplineState;

/// Movement speeds as sent, in yards per second (rates in radians per second).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Speeds {
    pub walk: f32,
    pub run: f32,
    pub run_back: f32,
    pub swim: f32,
    pub swim_back: f32,
    pub flight: f32,
    pub flight_back: f32,
    pub turn_rate: f32,
    pub pitch_rate: f32,
}

impl Speeds {
    /// Base walk speed every multiplier is relative to.
    pub const BASE_WALK: f32 = 2.5;
    /// Base run speed every multiplier is relative to.
    pub const BASE_RUN: f32 = 7.0;

    #[must_use]
    pub fn walk_rate(&self) -> f32 {
        self.walk / Self::BASE_WALK
    }

    #[must_use]
    pub fn run_rate(&self) -> f32 {
        self.run / Self::BASE_RUN
    }
}

/// Position relative to a transport the entity is riding.
///
/// The transport is referenced by identifier only; look it up in the
/// store when needed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportInfo {
    pub guid: Guid128,
    pub offset: Vector4,
    pub seat: u8,
    pub move_time: u32,
    pub prev_move_time: Option<u32>,
    pub vehicle_rec_id: Option<i32>,
}

/// Everything a create block says about how an entity moves.
///
/// Replaced wholesale by each movement-bearing create block.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementInfo {
    pub position: Vector3,
    pub orientation: f32,
    pub speeds: Speeds,
    /// 30-bit primary movement flags.
    pub flags: u32,
    /// 18-bit secondary movement flags.
    pub flags_extra: u32,
    pub transport: Option<TransportInfo>,
    pub spline: Option<SplineState>,
    pub rotation: Option<Quaternion>,
    pub vehicle_id: Option<u32>,
}
