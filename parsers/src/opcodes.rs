//! Symbolic message names and their numeric codes.
//!
//! Numeric codes are reassigned between client builds, so routines are
//! written against [`Opcode`] and bound to numbers through an
//! [`OpcodeMap`] supplied for the capture being decoded.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use wire::MessageCode;

/// A message the reference routines know how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Opcode {
    #[serde(rename = "CMSG_PLAYER_LOGIN")]
    PlayerLogin,
    #[serde(rename = "SMSG_UPDATE_OBJECT")]
    UpdateObject,
    #[serde(rename = "SMSG_ON_MONSTER_MOVE")]
    OnMonsterMove,
    #[serde(rename = "SMSG_SPECIAL_MOUNT_ANIM")]
    SpecialMountAnim,
    #[serde(rename = "SMSG_QUERY_CREATURE_RESPONSE")]
    QueryCreatureResponse,
    #[serde(rename = "SMSG_QUERY_PLAYER_NAME_RESPONSE")]
    QueryPlayerNameResponse,
    #[serde(rename = "SMSG_QUERY_PET_NAME_RESPONSE")]
    QueryPetNameResponse,
    #[serde(rename = "SMSG_INIT_WORLD_STATES")]
    InitWorldStates,
    #[serde(rename = "SMSG_PHASE_SHIFT_CHANGE")]
    PhaseShiftChange,
    #[serde(rename = "SMSG_SET_DUNGEON_DIFFICULTY")]
    SetDungeonDifficulty,
}

impl Opcode {
    pub const ALL: [Self; 10] = [
        Self::PlayerLogin,
        Self::UpdateObject,
        Self::OnMonsterMove,
        Self::SpecialMountAnim,
        Self::QueryCreatureResponse,
        Self::QueryPlayerNameResponse,
        Self::QueryPetNameResponse,
        Self::InitWorldStates,
        Self::PhaseShiftChange,
        Self::SetDungeonDifficulty,
    ];

    /// The conventional upper-case name, e.g. `SMSG_UPDATE_OBJECT`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PlayerLogin => "CMSG_PLAYER_LOGIN",
            Self::UpdateObject => "SMSG_UPDATE_OBJECT",
            Self::OnMonsterMove => "SMSG_ON_MONSTER_MOVE",
            Self::SpecialMountAnim => "SMSG_SPECIAL_MOUNT_ANIM",
            Self::QueryCreatureResponse => "SMSG_QUERY_CREATURE_RESPONSE",
            Self::QueryPlayerNameResponse => "SMSG_QUERY_PLAYER_NAME_RESPONSE",
            Self::QueryPetNameResponse => "SMSG_QUERY_PET_NAME_RESPONSE",
            Self::InitWorldStates => "SMSG_INIT_WORLD_STATES",
            Self::PhaseShiftChange => "SMSG_PHASE_SHIFT_CHANGE",
            Self::SetDungeonDifficulty => "SMSG_SET_DUNGEON_DIFFICULTY",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric codes of one protocol revision, keyed by symbolic name.
///
/// Deserializes from a flat object such as
/// `{"SMSG_UPDATE_OBJECT": 10263, "CMSG_PLAYER_LOGIN": 13882}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpcodeMap {
    codes: BTreeMap<Opcode, MessageCode>,
}

impl OpcodeMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the map with `opcode` bound to `code`.
    #[must_use]
    pub fn with(mut self, opcode: Opcode, code: impl Into<MessageCode>) -> Self {
        self.insert(opcode, code);
        self
    }

    /// Binds `opcode` to `code`, returning the previous binding.
    pub fn insert(&mut self, opcode: Opcode, code: impl Into<MessageCode>) -> Option<MessageCode> {
        self.codes.insert(opcode, code.into())
    }

    #[must_use]
    pub fn code(&self, opcode: Opcode) -> Option<MessageCode> {
        self.codes.get(&opcode).copied()
    }

    /// Reverse lookup, for naming codes in reports.
    #[must_use]
    pub fn opcode(&self, code: MessageCode) -> Option<Opcode> {
        self.codes
            .iter()
            .find_map(|(&opcode, &bound)| (bound == code).then_some(opcode))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Opcode, MessageCode)> + '_ {
        self.codes.iter().map(|(&opcode, &code)| (opcode, code))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
