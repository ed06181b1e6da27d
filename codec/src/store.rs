//! Entity store that folds create and update blocks into canonical records.

use std::collections::BTreeMap;

use tracing::{debug, trace};
use wire::{CaptureTime, Guid128};

use crate::ambient::AmbientContext;
use crate::entity::{Entity, EntitySnapshot};
use crate::values::ValuesUpdate;

/// Why an entity left the client's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RemovalReason {
    Destroyed,
    OutOfRange,
}

/// A recorded removal notice. The entity itself stays in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemovalEvent {
    pub guid: Guid128,
    pub reason: RemovalReason,
    pub time: CaptureTime,
}

/// Result of [`WorldStateStore::upsert_entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Merged {
        /// The resent block named a different entity kind than the stored one.
        kind_changed: bool,
    },
}

/// Entities keyed by identifier, plus removal events and the ambient context.
///
/// Append/merge only: nothing is ever deleted during a run.
#[derive(Debug, Clone, Default)]
pub struct WorldStateStore {
    entities: BTreeMap<Guid128, Entity>,
    removals: Vec<RemovalEvent>,
    ambient: AmbientContext,
    orphan_updates: u64,
}

impl WorldStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or merges the entity described by a create block.
    ///
    /// A new entity is stamped with the current ambient context; the map
    /// carried by the block wins over the ambient map. An existing entity
    /// keeps its stamp and gains the new block's fields: value fields and
    /// kind data present in `snapshot` overwrite, absent ones persist, the
    /// phase set is unioned and movement is replaced. A creature seen again
    /// at another position is flagged as moving.
    pub fn upsert_entity(
        &mut self,
        guid: Guid128,
        snapshot: EntitySnapshot,
        time: CaptureTime,
    ) -> UpsertOutcome {
        if let Some(stored) = self.entities.get_mut(&guid) {
            let kind_changed = stored.kind.merge_from(&snapshot.kind);
            if kind_changed {
                debug!(%guid, kind = ?stored.kind, "create block changed entity kind");
            }
            if stored.kind.is_unit() && stored.movement.position != snapshot.movement.position {
                stored.has_waypoints_or_random_movement = true;
            }
            stored.values.merge_from(&snapshot.values);
            stored.movement = snapshot.movement;
            stored
                .phases
                .extend(self.ambient.current_phases().iter().copied());
            trace!(%guid, "merged entity");
            return UpsertOutcome::Merged { kind_changed };
        }

        let ambient = &self.ambient;
        let entity = Entity {
            guid,
            kind: snapshot.kind,
            map_id: snapshot.map_id.or_else(|| ambient.current_map()),
            zone_id: ambient.current_zone(),
            area_id: ambient.current_area(),
            phases: ambient.current_phases().clone(),
            difficulty_id: ambient.current_difficulty(),
            values: snapshot.values,
            movement: snapshot.movement,
            has_waypoints_or_random_movement: false,
            first_seen: time,
        };
        self.entities.insert(guid, entity);
        trace!(%guid, "created entity");
        UpsertOutcome::Created
    }

    /// Applies a values block to a known entity. Returns `false`, and counts
    /// an orphan update, if the entity is unknown.
    pub fn apply_update(&mut self, guid: Guid128, update: &ValuesUpdate) -> bool {
        match self.entities.get_mut(&guid) {
            Some(entity) => {
                entity.values.merge_from(update);
                true
            }
            None => {
                self.orphan_updates += 1;
                debug!(%guid, "values update for unknown entity");
                false
            }
        }
    }

    /// Appends a removal event.
    pub fn record_removal(&mut self, guid: Guid128, reason: RemovalReason, time: CaptureTime) {
        self.removals.push(RemovalEvent { guid, reason, time });
    }

    #[must_use]
    pub fn entity(&self, guid: Guid128) -> Option<&Entity> {
        self.entities.get(&guid)
    }

    /// Entities in identifier order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn removals(&self) -> &[RemovalEvent] {
        &self.removals
    }

    /// Number of values updates dropped because their entity was unknown.
    #[must_use]
    pub const fn orphan_updates(&self) -> u64 {
        self.orphan_updates
    }

    #[must_use]
    pub const fn ambient(&self) -> &AmbientContext {
        &self.ambient
    }

    pub fn ambient_mut(&mut self) -> &mut AmbientContext {
        &mut self.ambient
    }
}
