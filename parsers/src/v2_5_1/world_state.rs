//! Messages that move the client between maps, zones, phases and
//! difficulties.
//!
//! These only stage ambient-context changes. Entities created later in the
//! capture are stamped with whatever is current when they are committed.

use std::collections::BTreeSet;

use bitstream::BitResult;
use codec::MessageContext;
use wire::FieldPath;

/// `SMSG_INIT_WORLD_STATES`
pub fn handle_init_world_states(ctx: &mut MessageContext<'_>) -> BitResult<()> {
    let MessageContext {
        packet, effects, ..
    } = ctx;
    let root = FieldPath::root();

    let map_id = packet.read_i32("MapID", &root)?;
    effects.set_current_map(map_id as u32);
    let zone_id = packet.read_i32("AreaID", &root)?;
    effects.set_current_zone(zone_id as u32);
    let area_id = packet.read_i32("SubareaID", &root)?;
    effects.set_current_area(area_id as u32);

    let count = packet.read_u32("WorldStateCount", &root)?;
    for i in 0..packet.check_count(count as usize)? {
        let path = root.at(i);
        packet.read_i32("VariableID", &path)?;
        packet.read_i32("Value", &path)?;
    }
    Ok(())
}

/// `SMSG_PHASE_SHIFT_CHANGE`
pub fn handle_phase_shift_change(ctx: &mut MessageContext<'_>) -> BitResult<()> {
    let MessageContext {
        packet, effects, ..
    } = ctx;
    let root = FieldPath::root();

    packet.read_guid("Client", &root)?;
    packet.read_u32("PhaseShiftFlags", &root)?;
    let count = packet.read_u32("PhaseShiftCount", &root)?;
    let count = packet.check_count(count as usize)?;
    packet.read_guid("PersonalGUID", &root)?;

    let mut phases = BTreeSet::new();
    for i in 0..count {
        let path = root.at(i);
        packet.read_u16("PhaseFlags", &path)?;
        phases.insert(packet.read_u16("Id", &path)?);
    }
    effects.set_current_phases(phases);

    // Each list is prefixed with its size in bytes.
    for (list, name) in [
        ("VisibleMapIDs", "VisibleMapID"),
        ("PreloadMapIDs", "PreloadMapID"),
        ("UiMapPhaseIDs", "UiMapPhaseID"),
    ] {
        let bytes = packet.read_u32(list, &root)?;
        let path = root.child(list);
        for i in 0..packet.check_count(bytes as usize / 2)? {
            packet.read_i16(name, &path.at(i))?;
        }
    }
    Ok(())
}

/// `SMSG_SET_DUNGEON_DIFFICULTY`
pub fn handle_set_dungeon_difficulty(ctx: &mut MessageContext<'_>) -> BitResult<()> {
    let difficulty = ctx.packet.read_i32("DifficultyID", &FieldPath::root())?;
    ctx.effects.set_current_difficulty(difficulty as u32);
    Ok(())
}
