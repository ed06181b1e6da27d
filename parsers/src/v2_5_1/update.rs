//! `SMSG_UPDATE_OBJECT`: removals, values blocks and create blocks.

use bitstream::BitResult;
use codec::{
    read_values_update, AreaTriggerData, ConversationData, Effects, EntityKind, EntitySnapshot,
    GameObjectData, MessageContext, MovementInfo, RemovalReason, SniffAction, SniffRecord,
    StoreKind, UnitData,
};
use tracing::debug;
use wire::{FieldPath, Guid128, Packet};

use super::area_trigger::read_area_trigger;
use super::movement::{read_move_status, read_transport_data};

/// Block type byte of one object update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateType {
    Values,
    CreateObject1,
    CreateObject2,
}

impl UpdateType {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Values),
            1 => Some(Self::CreateObject1),
            2 => Some(Self::CreateObject2),
            _ => None,
        }
    }
}

/// Object type byte of a create block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ObjectType {
    Object = 0,
    Item = 1,
    Container = 2,
    Unit = 3,
    Player = 4,
    ActivePlayer = 5,
    GameObject = 6,
    DynamicObject = 7,
    Corpse = 8,
    AreaTrigger = 9,
    SceneObject = 10,
    Conversation = 11,
}

impl ObjectType {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => Self::Object,
            1 => Self::Item,
            2 => Self::Container,
            3 => Self::Unit,
            4 => Self::Player,
            5 => Self::ActivePlayer,
            6 => Self::GameObject,
            7 => Self::DynamicObject,
            8 => Self::Corpse,
            9 => Self::AreaTrigger,
            10 => Self::SceneObject,
            11 => Self::Conversation,
            _ => return None,
        })
    }

    /// The stored kind for a freshly created object of this type.
    #[must_use]
    pub const fn entity_kind(self) -> EntityKind {
        match self {
            Self::Unit => EntityKind::Unit(UnitData {
                ai_anim_kit: None,
                movement_anim_kit: None,
                melee_anim_kit: None,
            }),
            Self::GameObject => EntityKind::GameObject(GameObjectData {
                world_effect_id: None,
                ai_anim_kit: None,
            }),
            Self::Player | Self::ActivePlayer => EntityKind::Player,
            Self::AreaTrigger => EntityKind::AreaTrigger(AreaTriggerData {
                area_trigger_id: 0,
                scale_curve_id: None,
                morph_curve_id: None,
                facing_curve_id: None,
                move_curve_id: None,
                anim_id: None,
                anim_kit_id: None,
            }),
            Self::Conversation => EntityKind::Conversation(ConversationData {
                texture_kit_id: None,
            }),
            _ => EntityKind::Generic,
        }
    }
}

/// Whether the rest of the message can still be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// `SMSG_UPDATE_OBJECT`
pub fn handle_update_object(ctx: &mut MessageContext<'_>) -> BitResult<()> {
    let MessageContext {
        packet, effects, ..
    } = ctx;
    let root = FieldPath::root();

    let count = packet.read_u32("NumObjUpdates", &root)?;
    let count = packet.check_count(count as usize)?;
    let map = packet.read_u16("MapID", &root)?;

    if packet.read_bit("HasRemovedObjects", &root)? {
        packet.realign();
        read_removed_objects(packet, effects, &root)?;
    }
    packet.realign();
    packet.read_u32("DataSize", &root)?;

    for i in 0..count {
        let path = root.at(i);
        let raw = packet.read_u8("UpdateType", &path)?;
        let guid = packet.read_guid("ObjectGuid", &path)?;
        match UpdateType::from_raw(raw) {
            Some(UpdateType::Values) => {
                let values = read_values_update(packet, &path)?;
                effects.update(guid, values);
            }
            Some(UpdateType::CreateObject1 | UpdateType::CreateObject2) => {
                if read_create_object_block(packet, effects, guid, map, &path)? == Flow::Stop {
                    return Ok(());
                }
            }
            None => debug!(raw, %guid, "unknown update type"),
        }
    }
    Ok(())
}

fn read_removed_objects(
    packet: &mut Packet<'_>,
    effects: &mut Effects,
    path: &FieldPath,
) -> BitResult<()> {
    let destroyed = packet.read_i16("DestroyedObjCount", path)?;
    let removed = packet.read_u32("RemovedObjCount", path)?;
    let destroyed = packet.check_count(usize::try_from(destroyed).unwrap_or(0))?;
    let out_of_range = packet.check_count((removed as usize).saturating_sub(destroyed))?;

    let destroyed_path = path.child("Destroyed");
    for i in 0..destroyed {
        let guid = packet.read_guid("ObjectGUID", &destroyed_path.at(i))?;
        effects.remove(guid, RemovalReason::Destroyed);
    }
    let out_of_range_path = path.child("OutOfRange");
    for i in 0..out_of_range {
        let guid = packet.read_guid("ObjectGUID", &out_of_range_path.at(i))?;
        effects.remove(guid, RemovalReason::OutOfRange);
    }
    Ok(())
}

fn read_create_object_block(
    packet: &mut Packet<'_>,
    effects: &mut Effects,
    guid: Guid128,
    map: u16,
    path: &FieldPath,
) -> BitResult<Flow> {
    let raw = packet.read_u8("ObjectType", path)?;
    let object_type = ObjectType::from_raw(raw);
    let mut kind = object_type.map_or(EntityKind::Generic, ObjectType::entity_kind);
    packet.read_i32("HeirFlags", path)?;

    let (movement, flow) = read_create_data(packet, effects, guid, &mut kind, path)?;
    let values = match flow {
        Flow::Continue => read_values_update(packet, path)?,
        Flow::Stop => Default::default(),
    };

    effects.upsert(
        guid,
        EntitySnapshot {
            kind,
            map_id: Some(u32::from(map)),
            values,
            movement,
        },
    );

    let store = match object_type {
        Some(ObjectType::Unit) => Some(StoreKind::Unit),
        Some(ObjectType::GameObject) => Some(StoreKind::GameObject),
        _ => None,
    };
    if let (Some(store), Some(entry)) = (store, guid.entry()) {
        effects.emit(SniffRecord::SniffData {
            store,
            entry,
            action: SniffAction::Spawn,
        });
    }
    Ok(flow)
}

/// Reads the movement and per-kind create data that precede the values.
fn read_create_data(
    packet: &mut Packet<'_>,
    effects: &mut Effects,
    guid: Guid128,
    kind: &mut EntityKind,
    path: &FieldPath,
) -> BitResult<(MovementInfo, Flow)> {
    packet.realign();
    packet.read_bit("NoBirthAnim", path)?;
    packet.read_bit("EnablePortals", path)?;
    packet.read_bit("PlayHoverAnim", path)?;
    let has_movement_update = packet.read_bit("HasMovementUpdate", path)?;
    let has_movement_transport = packet.read_bit("HasMovementTransport", path)?;
    let has_stationary_position = packet.read_bit("Stationary", path)?;
    let has_combat_victim = packet.read_bit("HasCombatVictim", path)?;
    let has_server_time = packet.read_bit("HasServerTime", path)?;
    let has_vehicle_create = packet.read_bit("HasVehicleCreate", path)?;
    let has_anim_kit_create = packet.read_bit("HasAnimKitCreate", path)?;
    let has_rotation = packet.read_bit("HasRotation", path)?;
    let has_area_trigger = packet.read_bit("HasAreaTrigger", path)?;
    let has_game_object = packet.read_bit("HasGameObject", path)?;
    let has_smooth_phasing = packet.read_bit("HasSmoothPhasing", path)?;
    packet.read_bit("ThisIsYou", path)?;
    let has_scene_object = packet.read_bit("SceneObjCreate", path)?;
    let has_player_create_data = packet.read_bit("HasPlayerCreateData", path)?;
    let has_conversation = packet.read_bit("HasConversation", path)?;

    let mut movement = if has_movement_update {
        read_move_status(packet, effects, guid, path)?
    } else {
        MovementInfo::default()
    };
    packet.realign();

    let pause_times = packet.read_u32("PauseTimesCount", path)?;
    let pause_times = packet.check_count(pause_times as usize)?;

    if has_stationary_position {
        movement.position = packet.read_vector3("Stationary Position", path)?;
        movement.orientation = packet.read_f32("Stationary Orientation", path)?;
    }
    if has_combat_victim {
        packet.read_guid("CombatVictim Guid", path)?;
    }
    if has_server_time {
        packet.read_u32("ServerTime", path)?;
    }
    if has_vehicle_create {
        movement.vehicle_id = Some(packet.read_i32("RecID", path)? as u32);
        packet.read_f32("InitialRawFacing", path)?;
    }
    if has_anim_kit_create {
        let ai = packet.read_u16("AiID", path)?;
        let movement_kit = packet.read_u16("MovementID", path)?;
        let melee = packet.read_u16("MeleeID", path)?;
        match kind {
            EntityKind::Unit(unit) => {
                unit.ai_anim_kit = Some(ai);
                unit.movement_anim_kit = Some(movement_kit);
                unit.melee_anim_kit = Some(melee);
            }
            EntityKind::GameObject(game_object) => game_object.ai_anim_kit = Some(ai),
            _ => {}
        }
    }
    if has_rotation {
        movement.rotation = Some(packet.read_packed_quaternion("GameObject Rotation", path)?);
    }
    for i in 0..pause_times {
        packet.read_u32("PauseTimes", &path.at(i))?;
    }
    if has_movement_transport {
        movement.transport = Some(read_transport_data(packet, effects, guid, path)?);
    }

    if has_area_trigger {
        if let EntityKind::AreaTrigger(data) = kind {
            read_area_trigger(packet, effects, guid, data, path)?;
        }
    }

    if has_game_object {
        packet.realign();
        let world_effect_id = packet.read_u32("WorldEffectID", path)?;
        if let EntityKind::GameObject(game_object) = kind {
            if world_effect_id != 0 {
                game_object.world_effect_id = Some(world_effect_id);
            }
        }
        if packet.read_bit("bit8", path)? {
            packet.realign();
            packet.read_u32("Int1", path)?;
        }
    }

    if has_smooth_phasing {
        packet.realign();
        packet.read_bit("ReplaceActive", path)?;
        packet.read_bit("StopAnimKits", path)?;
        if packet.read_flag()? {
            packet.realign();
            packet.read_guid("ReplaceObject", path)?;
        }
    }

    if has_scene_object {
        packet.realign();
        let has_local_script_data = packet.read_bit("HasSceneLocalScriptData", path)?;
        let has_pet_battle = packet.read_bit("HasPetBattleFullUpdate", path)?;
        if has_local_script_data {
            packet.realign();
            let len = packet.read_raw_bits(7)?;
            packet.realign();
            packet.read_string("Data", len as usize, path)?;
        }
        if has_pet_battle {
            debug!(%guid, "pet battle create data is not decoded; stopping");
            return Ok((movement, Flow::Stop));
        }
    }

    if has_player_create_data {
        read_player_create_data(packet, path)?;
    }

    if has_conversation {
        packet.realign();
        if packet.read_bit("HasTextureKitID", path)? {
            packet.realign();
            let texture_kit_id = packet.read_u32("TextureKitID", path)?;
            if let EntityKind::Conversation(conversation) = kind {
                conversation.texture_kit_id = Some(texture_kit_id);
            }
        }
    }

    packet.realign();
    Ok((movement, Flow::Continue))
}

fn read_player_create_data(packet: &mut Packet<'_>, path: &FieldPath) -> BitResult<()> {
    packet.realign();
    let has_scene_instances = packet.read_bit("ScenePendingInstances", path)?;
    let has_rune_state = packet.read_bit("Runes", path)?;
    let has_unk_bcc = packet.read_bit("UnkBCC", path)?;
    packet.realign();

    if has_scene_instances {
        let count = packet.read_u32("SceneInstanceIDsCount", path)?;
        for i in 0..packet.check_count(count as usize)? {
            packet.read_i32("SceneInstanceIDs", &path.at(i))?;
        }
    }
    if has_rune_state {
        packet.read_u8("RechargingRuneMask", path)?;
        packet.read_u8("UsableRuneMask", path)?;
        let runes = packet.read_count()?;
        for i in 0..runes {
            packet.read_u8("RuneCooldown", &path.at(i))?;
        }
    }
    if has_unk_bcc {
        for i in 0..132 {
            packet.read_i32("UnkBCC", &path.at(i))?;
        }
    }
    Ok(())
}
