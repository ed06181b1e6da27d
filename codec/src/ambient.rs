//! Run-scoped world context.

use std::collections::BTreeSet;

/// The current map, zone, area, phases and difficulty, as last set by a
/// world-state message. New entities are stamped with it on creation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmbientContext {
    map_id: Option<u32>,
    zone_id: Option<u32>,
    area_id: Option<u32>,
    phases: BTreeSet<u16>,
    difficulty_id: Option<u32>,
}

impl AmbientContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_current_map(&mut self, map_id: u32) {
        self.map_id = Some(map_id);
    }

    pub fn set_current_zone(&mut self, zone_id: u32) {
        self.zone_id = Some(zone_id);
    }

    pub fn set_current_area(&mut self, area_id: u32) {
        self.area_id = Some(area_id);
    }

    /// Replaces the active phase set.
    pub fn set_current_phases(&mut self, phases: BTreeSet<u16>) {
        self.phases = phases;
    }

    pub fn set_current_difficulty(&mut self, difficulty_id: u32) {
        self.difficulty_id = Some(difficulty_id);
    }

    #[must_use]
    pub const fn current_map(&self) -> Option<u32> {
        self.map_id
    }

    #[must_use]
    pub const fn current_zone(&self) -> Option<u32> {
        self.zone_id
    }

    #[must_use]
    pub const fn current_area(&self) -> Option<u32> {
        self.area_id
    }

    #[must_use]
    pub const fn current_phases(&self) -> &BTreeSet<u16> {
        &self.phases
    }

    #[must_use]
    pub const fn current_difficulty(&self) -> Option<u32> {
        self.difficulty_id
    }
}
