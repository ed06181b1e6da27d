//! The stored entity model.

use std::collections::BTreeSet;

use wire::{CaptureTime, Guid128};

use crate::movement::MovementInfo;
use crate::values::ValuesUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitData {
    pub ai_anim_kit: Option<u16>,
    pub movement_anim_kit: Option<u16>,
    pub melee_anim_kit: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameObjectData {
    pub world_effect_id: Option<u32>,
    pub ai_anim_kit: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaTriggerData {
    pub area_trigger_id: u32,
    pub scale_curve_id: Option<i32>,
    pub morph_curve_id: Option<i32>,
    pub facing_curve_id: Option<i32>,
    pub move_curve_id: Option<i32>,
    pub anim_id: Option<i32>,
    pub anim_kit_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversationData {
    pub texture_kit_id: Option<u32>,
}

/// What kind of object an entity is, with the data only that kind carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Unit(UnitData),
    GameObject(GameObjectData),
    Player,
    AreaTrigger(AreaTriggerData),
    Conversation(ConversationData),
    #[default]
    Generic,
}

fn merge_opt<T: Copy>(stored: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *stored = incoming;
    }
}

impl EntityKind {
    /// Returns `true` if both kinds are the same variant.
    #[must_use]
    pub fn same_variant(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Folds `incoming` into `self`.
    ///
    /// With the same variant, fields set in `incoming` overwrite; unset ones
    /// are kept. A different variant replaces `self` and returns `true`.
    pub fn merge_from(&mut self, incoming: &Self) -> bool {
        match (self, incoming) {
            (Self::Unit(stored), Self::Unit(new)) => {
                merge_opt(&mut stored.ai_anim_kit, new.ai_anim_kit);
                merge_opt(&mut stored.movement_anim_kit, new.movement_anim_kit);
                merge_opt(&mut stored.melee_anim_kit, new.melee_anim_kit);
                false
            }
            (Self::GameObject(stored), Self::GameObject(new)) => {
                merge_opt(&mut stored.world_effect_id, new.world_effect_id);
                merge_opt(&mut stored.ai_anim_kit, new.ai_anim_kit);
                false
            }
            (Self::AreaTrigger(stored), Self::AreaTrigger(new)) => {
                stored.area_trigger_id = new.area_trigger_id;
                merge_opt(&mut stored.scale_curve_id, new.scale_curve_id);
                merge_opt(&mut stored.morph_curve_id, new.morph_curve_id);
                merge_opt(&mut stored.facing_curve_id, new.facing_curve_id);
                merge_opt(&mut stored.move_curve_id, new.move_curve_id);
                merge_opt(&mut stored.anim_id, new.anim_id);
                merge_opt(&mut stored.anim_kit_id, new.anim_kit_id);
                false
            }
            (Self::Conversation(stored), Self::Conversation(new)) => {
                merge_opt(&mut stored.texture_kit_id, new.texture_kit_id);
                false
            }
            (Self::Player, Self::Player) | (Self::Generic, Self::Generic) => false,
            (stored, new) => {
                *stored = *new;
                true
            }
        }
    }

    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Unit(_))
    }
}

/// What one create block says about an entity.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitySnapshot {
    pub kind: EntityKind,
    /// Map the create block was sent for, if the message carries one.
    pub map_id: Option<u32>,
    pub values: ValuesUpdate,
    pub movement: MovementInfo,
}

/// A stored entity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub guid: Guid128,
    pub kind: EntityKind,
    pub map_id: Option<u32>,
    pub zone_id: Option<u32>,
    pub area_id: Option<u32>,
    pub phases: BTreeSet<u16>,
    pub difficulty_id: Option<u32>,
    pub values: ValuesUpdate,
    pub movement: MovementInfo,
    /// Set when a creature was seen again at a different position.
    pub has_waypoints_or_random_movement: bool,
    pub first_seen: CaptureTime,
}

impl Entity {
    /// Template entry embedded in the identifier, if its type carries one.
    #[must_use]
    pub fn entry(&self) -> Option<u32> {
        self.guid.entry()
    }
}
