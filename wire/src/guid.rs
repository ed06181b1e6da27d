//! 128-bit entity identifiers and their packed wire form.
//!
//! The wire form is two presence masks (low half first, then high half)
//! followed by only the bytes whose mask bit is set, least significant
//! byte first. A zero identifier is therefore two zero mask bytes.

use std::fmt;

use bitstream::{BitReader, BitResult, BitWriter};

/// The kind of object an identifier names, stored in the top six bits of
/// the high half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum HighGuidType {
    Null = 0,
    Uniq = 1,
    Player = 2,
    Item = 3,
    WorldTransaction = 4,
    StaticDoor = 5,
    Transport = 6,
    Conversation = 7,
    Creature = 8,
    Vehicle = 9,
    Pet = 10,
    GameObject = 11,
    DynamicObject = 12,
    AreaTrigger = 13,
    Corpse = 14,
    LootObject = 15,
    SceneObject = 16,
    Scenario = 17,
    AiGroup = 18,
    DynamicDoor = 19,
    ClientActor = 20,
    Vignette = 21,
    CallForHelp = 22,
    AiResource = 23,
    AiLock = 24,
    AiLockTicket = 25,
    ChatChannel = 26,
    Party = 27,
    Guild = 28,
    WowAccount = 29,
    BNetAccount = 30,
    GmTask = 31,
    MobileSession = 32,
    RaidGroup = 33,
    Spell = 34,
    Mail = 35,
    WebObj = 36,
    LfgObject = 37,
    LfgList = 38,
    UserRouter = 39,
    PvpQueueGroup = 40,
    UserClient = 41,
    PetBattle = 42,
    UniqUserClient = 43,
    BattlePet = 44,
    CommerceObj = 45,
    ClientSession = 46,
    Cast = 47,
}

impl HighGuidType {
    const ALL: [Self; 48] = [
        Self::Null,
        Self::Uniq,
        Self::Player,
        Self::Item,
        Self::WorldTransaction,
        Self::StaticDoor,
        Self::Transport,
        Self::Conversation,
        Self::Creature,
        Self::Vehicle,
        Self::Pet,
        Self::GameObject,
        Self::DynamicObject,
        Self::AreaTrigger,
        Self::Corpse,
        Self::LootObject,
        Self::SceneObject,
        Self::Scenario,
        Self::AiGroup,
        Self::DynamicDoor,
        Self::ClientActor,
        Self::Vignette,
        Self::CallForHelp,
        Self::AiResource,
        Self::AiLock,
        Self::AiLockTicket,
        Self::ChatChannel,
        Self::Party,
        Self::Guild,
        Self::WowAccount,
        Self::BNetAccount,
        Self::GmTask,
        Self::MobileSession,
        Self::RaidGroup,
        Self::Spell,
        Self::Mail,
        Self::WebObj,
        Self::LfgObject,
        Self::LfgList,
        Self::UserRouter,
        Self::PvpQueueGroup,
        Self::UserClient,
        Self::PetBattle,
        Self::UniqUserClient,
        Self::BattlePet,
        Self::CommerceObj,
        Self::ClientSession,
        Self::Cast,
    ];

    /// Maps the raw six-bit tag to a known type.
    #[must_use]
    pub fn from_raw(raw: u8) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    /// Returns `true` if identifiers of this type embed a template entry.
    #[must_use]
    pub const fn has_entry(self) -> bool {
        matches!(
            self,
            Self::Creature
                | Self::Vehicle
                | Self::Pet
                | Self::GameObject
                | Self::DynamicObject
                | Self::AreaTrigger
                | Self::Conversation
                | Self::SceneObject
        )
    }
}

/// A canonical wide entity identifier.
///
/// Two identifiers are equal iff their bits are equal. All projections are
/// pure bit extractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Guid128 {
    high: u64,
    low: u64,
}

impl Guid128 {
    /// The all-zero identifier.
    pub const EMPTY: Self = Self { high: 0, low: 0 };

    /// Creates an identifier from its two halves.
    #[must_use]
    pub const fn new(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    /// Composes an identifier from its fields.
    #[must_use]
    pub const fn compose(
        high_type: HighGuidType,
        realm_id: u16,
        map_id: u16,
        entry: u32,
        server_id: u32,
        counter: u64,
    ) -> Self {
        let high = ((high_type as u64) << 58)
            | (((realm_id as u64) & 0x1FFF) << 42)
            | (((map_id as u64) & 0x1FFF) << 29)
            | (((entry as u64) & 0x7F_FFFF) << 6);
        let low = (((server_id as u64) & 0xFF_FFFF) << 40) | (counter & 0xFF_FFFF_FFFF);
        Self { high, low }
    }

    /// Returns the high half.
    #[must_use]
    pub const fn high(self) -> u64 {
        self.high
    }

    /// Returns the low half.
    #[must_use]
    pub const fn low(self) -> u64 {
        self.low
    }

    /// Returns `true` for the all-zero identifier.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.high == 0 && self.low == 0
    }

    /// Returns the raw six-bit type tag.
    #[must_use]
    pub const fn raw_high_type(self) -> u8 {
        ((self.high >> 58) & 0x3F) as u8
    }

    /// Returns the embedded object type, if it is a known one.
    #[must_use]
    pub fn high_type(self) -> Option<HighGuidType> {
        HighGuidType::from_raw(self.raw_high_type())
    }

    /// Returns the embedded template entry for types that carry one.
    #[must_use]
    pub fn entry(self) -> Option<u32> {
        match self.high_type() {
            Some(kind) if kind.has_entry() => Some(self.raw_entry()),
            _ => None,
        }
    }

    /// Returns the entry bits regardless of type.
    #[must_use]
    pub const fn raw_entry(self) -> u32 {
        ((self.high >> 6) & 0x7F_FFFF) as u32
    }

    /// Returns the sub-type, bits 0..6 of the high half.
    #[must_use]
    pub const fn sub_type(self) -> u8 {
        (self.high & 0x3F) as u8
    }

    /// Returns the realm, bits 42..55 of the high half.
    #[must_use]
    pub const fn realm_id(self) -> u16 {
        ((self.high >> 42) & 0x1FFF) as u16
    }

    /// Returns the map, bits 29..42 of the high half.
    #[must_use]
    pub const fn map_id(self) -> u16 {
        ((self.high >> 29) & 0x1FFF) as u16
    }

    /// Returns the server, bits 40..64 of the low half.
    #[must_use]
    pub const fn server_id(self) -> u32 {
        ((self.low >> 40) & 0xFF_FFFF) as u32
    }

    /// Returns the per-server spawn counter.
    #[must_use]
    pub const fn counter(self) -> u64 {
        self.low & 0xFF_FFFF_FFFF
    }

    /// Decodes the packed wire form.
    pub fn read_packed(reader: &mut BitReader<'_>) -> BitResult<Self> {
        let low_mask = reader.read_u8()?;
        let high_mask = reader.read_u8()?;
        let low = read_packed_u64(reader, low_mask)?;
        let high = read_packed_u64(reader, high_mask)?;
        Ok(Self { high, low })
    }

    /// Encodes the canonical packed wire form (no zero byte is ever marked present).
    pub fn write_packed(self, writer: &mut BitWriter) -> BitResult<()> {
        let (low_mask, low_bytes) = pack_u64(self.low);
        let (high_mask, high_bytes) = pack_u64(self.high);
        writer.write_u8(low_mask)?;
        writer.write_u8(high_mask)?;
        writer.write_bytes(&low_bytes)?;
        writer.write_bytes(&high_bytes)
    }
}

fn read_packed_u64(reader: &mut BitReader<'_>, mask: u8) -> BitResult<u64> {
    let mut value = 0u64;
    for i in 0..8 {
        if mask & (1 << i) != 0 {
            value |= u64::from(reader.read_u8()?) << (i * 8);
        }
    }
    Ok(value)
}

fn pack_u64(value: u64) -> (u8, Vec<u8>) {
    let mut mask = 0u8;
    let mut bytes = Vec::with_capacity(8);
    for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
        if byte != 0 {
            mask |= 1 << i;
            bytes.push(byte);
        }
    }
    (mask, bytes)
}

impl fmt::Display for Guid128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Full: 0x0");
        }
        write!(f, "Full: 0x{:016X}{:016X} ", self.high, self.low)?;
        match self.high_type() {
            Some(kind) => write!(f, "{kind:?}")?,
            None => write!(f, "Type{}", self.raw_high_type())?,
        }
        write!(
            f,
            "/{} R{}/S{} Map: {}",
            self.sub_type(),
            self.realm_id(),
            self.server_id(),
            self.map_id()
        )?;
        if let Some(entry) = self.entry() {
            write!(f, " Entry: {entry}")?;
        }
        write!(f, " Low: {}", self.counter())
    }
}
