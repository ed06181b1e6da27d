//! Query responses: creature templates, player and pet names.

use bitstream::BitResult;
use codec::{
    CreatureQuestItem, CreatureTemplate, CreatureTemplateModel, MessageContext, ObjectName,
    SniffAction, SniffRecord, StoreKind,
};
use wire::FieldPath;

/// High bit of a queried entry marks a negative response.
const ENTRY_NOT_FOUND: u32 = 0x8000_0000;

/// Number of declined-name cases sent with player and pet names.
const DECLINED_NAME_CASES: usize = 5;

/// `SMSG_QUERY_CREATURE_RESPONSE`
///
/// Emits the creature template with its display models and quest items,
/// followed by a `QUERY_RESPONSE` sniff-data record and the creature's
/// name.
pub fn handle_query_creature_response(ctx: &mut MessageContext<'_>) -> BitResult<()> {
    let MessageContext {
        packet, effects, ..
    } = ctx;
    let root = FieldPath::root();

    let raw_entry = packet.read_u32("Entry", &root)?;
    let entry = raw_entry & !ENTRY_NOT_FOUND;
    if !packet.read_flag()? {
        return Ok(());
    }
    packet.realign();

    let mut creature = CreatureTemplate {
        entry,
        ..CreatureTemplate::default()
    };

    let title_len = packet.read_raw_bits(11)?;
    let title_alt_len = packet.read_raw_bits(11)?;
    let cursor_name_len = packet.read_raw_bits(6)?;
    creature.racial_leader = packet.read_bit("Leader", &root)?;

    let mut name_lens = [[0_u32; 2]; 4];
    for lens in &mut name_lens {
        lens[0] = packet.read_raw_bits(11)?;
        lens[1] = packet.read_raw_bits(11)?;
    }
    packet.realign();

    for (i, [name_len, name_alt_len]) in name_lens.into_iter().enumerate() {
        if name_len > 1 {
            let name = packet.read_cstring("Name", &root)?;
            if i == 0 {
                creature.name = Some(name);
            }
        }
        if name_alt_len > 1 {
            let name_alt = packet.read_cstring("NameAlt", &root)?;
            if i == 0 {
                creature.female_name = Some(name_alt);
            }
        }
    }

    creature.type_flags = packet.read_u32("Flags", &root)?;
    creature.type_flags2 = packet.read_u32("Flags2", &root)?;
    creature.creature_type = packet.read_i32("CreatureType", &root)?;
    creature.family = packet.read_i32("CreatureFamily", &root)?;
    creature.rank = packet.read_i32("Classification", &root)?;
    packet.read_i32("UnkBCC", &root)?;
    for (i, credit) in creature.kill_credits.iter_mut().enumerate() {
        *credit = packet.read_i32("ProxyCreatureID", &root.at(i))? as u32;
    }

    let display_count = packet.read_u32("DisplayIdCount", &root)?;
    let display_count = packet.check_count(display_count as usize)?;
    packet.read_f32("TotalProbability", &root)?;
    for i in 0..display_count {
        let path = root.at(i);
        let model = CreatureTemplateModel {
            creature_id: entry,
            idx: i as u32,
            display_id: packet.read_i32("CreatureDisplayID", &path)? as u32,
            display_scale: packet.read_f32("DisplayScale", &path)?,
            probability: packet.read_f32("Probability", &path)?,
        };
        effects.emit(SniffRecord::CreatureTemplateModel(model));
    }

    creature.health_modifier = packet.read_f32("HpMulti", &root)?;
    creature.mana_modifier = packet.read_f32("EnergyMulti", &root)?;
    let quest_items = packet.read_u32("QuestItems", &root)?;
    let quest_items = packet.check_count(quest_items as usize)?;
    creature.movement_id = packet.read_i32("CreatureMovementInfoID", &root)? as u32;
    creature.health_scaling_expansion = packet.read_i32("HealthScalingExpansion", &root)?;
    creature.required_expansion = packet.read_i32("RequiredExpansion", &root)?;
    creature.vignette_id = packet.read_i32("VignetteID", &root)? as u32;
    creature.unit_class = packet.read_i32("UnitClass", &root)? as u32;
    packet.read_i32("CreatureDifficultyID", &root)?;
    creature.widget_set_id = packet.read_i32("WidgetSetID", &root)?;
    creature.widget_set_unit_condition_id = packet.read_i32("WidgetSetUnitConditionID", &root)?;

    if title_len > 1 {
        creature.sub_name = Some(packet.read_cstring("Title", &root)?);
    }
    if title_alt_len > 1 {
        creature.title_alt = Some(packet.read_cstring("TitleAlt", &root)?);
    }
    if cursor_name_len > 1 {
        creature.icon_name = Some(packet.read_cstring("CursorName", &root)?);
    }

    for i in 0..quest_items {
        let item_id = packet.read_i32("QuestItem", &root.at(i))? as u32;
        effects.emit(SniffRecord::CreatureQuestItem(CreatureQuestItem {
            creature_entry: entry,
            idx: i as u32,
            item_id,
        }));
    }

    effects.emit(SniffRecord::SniffData {
        store: StoreKind::Unit,
        entry,
        action: SniffAction::QueryResponse,
    });
    let name = creature.name.clone();
    effects.emit(SniffRecord::CreatureTemplate(Box::new(creature)));
    effects.emit(SniffRecord::ObjectName(ObjectName {
        store: StoreKind::Unit,
        id: entry,
        name,
    }));
    Ok(())
}

/// `SMSG_QUERY_PLAYER_NAME_RESPONSE`
pub fn handle_query_player_name_response(ctx: &mut MessageContext<'_>) -> BitResult<()> {
    let packet = &mut ctx.packet;
    let root = FieldPath::root();

    let has_data = packet.read_u8("HasData", &root)?;
    packet.read_guid("Player Guid", &root)?;
    if has_data != 0 {
        return Ok(());
    }

    packet.read_bit("IsDeleted", &root)?;
    let name_len = packet.read_raw_bits(6)?;
    let mut declined = [0_u32; DECLINED_NAME_CASES];
    for len in &mut declined {
        *len = packet.read_raw_bits(7)?;
    }
    packet.realign();
    for (i, len) in declined.into_iter().enumerate() {
        packet.read_string("Name Declined", len as usize, &root.at(i))?;
    }

    packet.read_guid("AccountID", &root)?;
    packet.read_guid("BnetAccountID", &root)?;
    packet.read_guid("Player Guid", &root)?;
    packet.read_u64("GuildClubMemberID", &root)?;
    packet.read_u32("VirtualRealmAddress", &root)?;
    packet.read_u8("Race", &root)?;
    packet.read_u8("Gender", &root)?;
    packet.read_u8("Class", &root)?;
    packet.read_u8("Level", &root)?;
    packet.read_u8("UnkBCC", &root)?;
    packet.read_string("Name", name_len as usize, &root)?;
    Ok(())
}

/// `SMSG_QUERY_PET_NAME_RESPONSE`
pub fn handle_query_pet_name_response(ctx: &mut MessageContext<'_>) -> BitResult<()> {
    let packet = &mut ctx.packet;
    let root = FieldPath::root();

    packet.read_guid("PetID", &root)?;
    if !packet.read_bit("HasData", &root)? {
        return Ok(());
    }

    let len = packet.read_raw_bits(8)?;
    packet.read_bit("HasDeclined", &root)?;
    let mut declined = [0_u32; DECLINED_NAME_CASES];
    for slot in &mut declined {
        *slot = packet.read_raw_bits(7)?;
    }
    packet.realign();
    for (i, len) in declined.into_iter().enumerate() {
        packet.read_string("DeclinedNames", len as usize, &root.at(i))?;
    }

    packet.read_i64("Timestamp", &root)?;
    packet.read_string("Petname", len as usize, &root)?;
    Ok(())
}
