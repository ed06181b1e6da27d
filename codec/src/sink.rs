//! Records handed to downstream consumers.

use std::fmt;

use wire::CaptureTime;

/// Which template store a sniff-data record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StoreKind {
    Unit,
    GameObject,
}

/// Why a template entry was seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SniffAction {
    Spawn,
    QueryResponse,
}

impl fmt::Display for SniffAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Spawn => "SPAWN",
            Self::QueryResponse => "QUERY_RESPONSE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureTemplate {
    pub entry: u32,
    pub name: Option<String>,
    pub female_name: Option<String>,
    pub sub_name: Option<String>,
    pub title_alt: Option<String>,
    pub icon_name: Option<String>,
    pub racial_leader: bool,
    pub type_flags: u32,
    pub type_flags2: u32,
    pub creature_type: i32,
    pub family: i32,
    pub rank: i32,
    pub kill_credits: [u32; 2],
    pub health_modifier: f32,
    pub mana_modifier: f32,
    pub movement_id: u32,
    pub health_scaling_expansion: i32,
    pub required_expansion: i32,
    pub vignette_id: u32,
    pub unit_class: u32,
    pub widget_set_id: i32,
    pub widget_set_unit_condition_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureTemplateModel {
    pub creature_id: u32,
    pub idx: u32,
    pub display_id: u32,
    pub display_scale: f32,
    pub probability: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureQuestItem {
    pub creature_entry: u32,
    pub idx: u32,
    pub item_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectName {
    pub store: StoreKind,
    pub id: u32,
    pub name: Option<String>,
}

/// Area trigger shape discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaTriggerShape {
    #[default]
    Sphere,
    Box,
    Polygon,
    Cylinder,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaTriggerTemplate {
    pub id: u32,
    pub flags: u32,
    pub shape: AreaTriggerShape,
    /// Shape parameters, laid out per shape.
    pub data: [f32; 6],
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaTriggerVertex {
    pub area_trigger_id: u32,
    pub idx: u32,
    pub x: f32,
    pub y: f32,
    pub target: Option<(f32, f32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleAccessory {
    pub entry: u32,
    pub accessory_entry: u32,
    pub seat_id: u8,
}

/// Discriminant of a [`SniffRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecordKind {
    SniffData,
    CreatureTemplate,
    CreatureTemplateModel,
    CreatureQuestItem,
    ObjectName,
    AreaTriggerTemplate,
    AreaTriggerVertex,
    VehicleAccessory,
}

/// A finalized record for downstream consumers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SniffRecord {
    SniffData {
        store: StoreKind,
        entry: u32,
        action: SniffAction,
    },
    CreatureTemplate(Box<CreatureTemplate>),
    CreatureTemplateModel(CreatureTemplateModel),
    CreatureQuestItem(CreatureQuestItem),
    ObjectName(ObjectName),
    AreaTriggerTemplate(AreaTriggerTemplate),
    AreaTriggerVertex(AreaTriggerVertex),
    VehicleAccessory(VehicleAccessory),
}

impl SniffRecord {
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::SniffData { .. } => RecordKind::SniffData,
            Self::CreatureTemplate(_) => RecordKind::CreatureTemplate,
            Self::CreatureTemplateModel(_) => RecordKind::CreatureTemplateModel,
            Self::CreatureQuestItem(_) => RecordKind::CreatureQuestItem,
            Self::ObjectName(_) => RecordKind::ObjectName,
            Self::AreaTriggerTemplate(_) => RecordKind::AreaTriggerTemplate,
            Self::AreaTriggerVertex(_) => RecordKind::AreaTriggerVertex,
            Self::VehicleAccessory(_) => RecordKind::VehicleAccessory,
        }
    }
}

/// Downstream consumer of finalized records.
///
/// The engine only ever appends; it never reads back.
pub trait RecordSink {
    fn emit(&mut self, kind: RecordKind, record: SniffRecord, time: CaptureTime);
}

/// A sink that keeps every record in emission order.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    records: Vec<(RecordKind, SniffRecord, CaptureTime)>,
}

impl VecSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[(RecordKind, SniffRecord, CaptureTime)] {
        &self.records
    }

    /// Records of one kind, in emission order.
    pub fn of_kind(&self, kind: RecordKind) -> impl Iterator<Item = &SniffRecord> + '_ {
        self.records
            .iter()
            .filter(move |(k, _, _)| *k == kind)
            .map(|(_, record, _)| record)
    }

    #[must_use]
    pub fn into_records(self) -> Vec<(RecordKind, SniffRecord, CaptureTime)> {
        self.records
    }
}

impl RecordSink for VecSink {
    fn emit(&mut self, kind: RecordKind, record: SniffRecord, time: CaptureTime) {
        self.records.push((kind, record, time));
    }
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RecordSink for NullSink {
    fn emit(&mut self, _kind: RecordKind, _record: SniffRecord, _time: CaptureTime) {}
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn emit(&mut self, kind: RecordKind, record: SniffRecord, time: CaptureTime) {
        (**self).emit(kind, record, time);
    }
}
