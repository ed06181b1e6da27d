//! Protocol 2.5.1 routines, valid from build 38835 onwards.

pub mod area_trigger;
pub mod character;
pub mod movement;
pub mod query;
pub mod update;
pub mod world_state;

use codec::Routine;
use registry::{BuildRange, RegistryResult, VersionRegistry};
use tracing::debug;
use wire::ProtocolBuild;

use crate::opcodes::{Opcode, OpcodeMap};

/// First build these layouts apply to.
pub const FIRST_BUILD: ProtocolBuild = ProtocolBuild::new(38835);

/// Every routine of this revision, by message.
pub const ROUTINES: [(Opcode, Routine); 10] = [
    (Opcode::PlayerLogin, character::handle_player_login),
    (Opcode::UpdateObject, update::handle_update_object),
    (Opcode::OnMonsterMove, movement::handle_on_monster_move),
    (Opcode::SpecialMountAnim, movement::handle_special_mount_anim),
    (
        Opcode::QueryCreatureResponse,
        query::handle_query_creature_response,
    ),
    (
        Opcode::QueryPlayerNameResponse,
        query::handle_query_player_name_response,
    ),
    (
        Opcode::QueryPetNameResponse,
        query::handle_query_pet_name_response,
    ),
    (Opcode::InitWorldStates, world_state::handle_init_world_states),
    (Opcode::PhaseShiftChange, world_state::handle_phase_shift_change),
    (
        Opcode::SetDungeonDifficulty,
        world_state::handle_set_dungeon_difficulty,
    ),
];

/// Registers every routine whose message has a code in `opcodes`, open
/// ended from [`FIRST_BUILD`]. Returns how many were registered.
pub fn register(
    registry: &mut VersionRegistry<Routine>,
    opcodes: &OpcodeMap,
) -> RegistryResult<usize> {
    let range = BuildRange::from(FIRST_BUILD);
    let mut registered = 0;
    for (opcode, routine) in ROUTINES {
        let Some(code) = opcodes.code(opcode) else {
            debug!(%opcode, "no code bound, skipping routine");
            continue;
        };
        registry.register(code, range, opcode.name(), routine)?;
        registered += 1;
    }
    Ok(registered)
}
