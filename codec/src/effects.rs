//! Staged side effects of one message.
//!
//! Routines never touch the store directly. They stage effects here, and
//! the dispatcher applies them in message order at commit time, so decoding
//! can run ahead of (or beside) the ordered commit.

use std::collections::BTreeSet;

use wire::Guid128;

use crate::entity::EntitySnapshot;
use crate::sink::SniffRecord;
use crate::store::RemovalReason;
use crate::values::ValuesUpdate;

/// One staged mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Upsert {
        guid: Guid128,
        snapshot: Box<EntitySnapshot>,
    },
    Update {
        guid: Guid128,
        values: ValuesUpdate,
    },
    Remove {
        guid: Guid128,
        reason: RemovalReason,
    },
    SetMap(u32),
    SetZone(u32),
    SetArea(u32),
    SetPhases(BTreeSet<u16>),
    SetDifficulty(u32),
    Emit(SniffRecord),
}

/// Effects in the order the routine staged them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Effects {
    staged: Vec<Effect>,
}

impl Effects {
    #[must_use]
    pub const fn new() -> Self {
        Self { staged: Vec::new() }
    }

    /// Stages a create block for `guid`.
    pub fn upsert(&mut self, guid: Guid128, snapshot: EntitySnapshot) {
        self.staged.push(Effect::Upsert {
            guid,
            snapshot: Box::new(snapshot),
        });
    }

    /// Stages a values block for `guid`.
    pub fn update(&mut self, guid: Guid128, values: ValuesUpdate) {
        self.staged.push(Effect::Update { guid, values });
    }

    pub fn remove(&mut self, guid: Guid128, reason: RemovalReason) {
        self.staged.push(Effect::Remove { guid, reason });
    }

    pub fn set_current_map(&mut self, map_id: u32) {
        self.staged.push(Effect::SetMap(map_id));
    }

    pub fn set_current_zone(&mut self, zone_id: u32) {
        self.staged.push(Effect::SetZone(zone_id));
    }

    pub fn set_current_area(&mut self, area_id: u32) {
        self.staged.push(Effect::SetArea(area_id));
    }

    pub fn set_current_phases(&mut self, phases: BTreeSet<u16>) {
        self.staged.push(Effect::SetPhases(phases));
    }

    pub fn set_current_difficulty(&mut self, difficulty_id: u32) {
        self.staged.push(Effect::SetDifficulty(difficulty_id));
    }

    /// Stages a record for the sink.
    pub fn emit(&mut self, record: SniffRecord) {
        self.staged.push(Effect::Emit(record));
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Effect] {
        &self.staged
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }
}

impl IntoIterator for Effects {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.staged.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_keep_staging_order() {
        let mut effects = Effects::new();
        effects.set_current_map(530);
        effects.remove(Guid128::new(0, 1), RemovalReason::Destroyed);
        effects.set_current_difficulty(2);
        assert_eq!(effects.len(), 3);
        let staged: Vec<_> = effects.into_iter().collect();
        assert_eq!(staged[0], Effect::SetMap(530));
        assert_eq!(staged[2], Effect::SetDifficulty(2));
    }
}
