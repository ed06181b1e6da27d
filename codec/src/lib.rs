//! Decode dispatch and world-state reconstruction for captured sessions.
//!
//! A [`Dispatcher`] resolves each captured message to a decode routine
//! through a [`VersionRegistry`](registry::VersionRegistry), runs it over a
//! traced [`Packet`](wire::Packet), classifies the result and commits the
//! routine's staged [`Effects`] to a [`WorldStateStore`] and a
//! [`RecordSink`].
//!
//! # Features
//!
//! - Per-message [`DecodeStatus`] with payload length checks
//! - Entity store with ambient map/zone/area/phase stamping
//! - Values-update and spline decoding shared by message routines
//! - Parallel detached decoding with in-order commit
//!
//! # Design Principles
//!
//! - **A bad message never aborts a run** - Failures become a status; earlier effects persist.
//! - **Routines do not touch shared state** - They stage effects; only the dispatcher commits.
//! - **Deterministic** - The same capture produces the same store, sink contents and traces.

mod ambient;
mod config;
mod context;
mod dispatcher;
mod effects;
mod entity;
mod movement;
mod sink;
mod spline;
mod status;
mod store;
mod values;

pub use ambient::AmbientContext;
pub use config::DecoderConfig;
pub use context::MessageContext;
pub use dispatcher::{
    DecodedMessage, Decoder, Dispatcher, MessageOutcome, RawMessage, Routine,
};
pub use effects::{Effect, Effects};
pub use entity::{
    AreaTriggerData, ConversationData, Entity, EntityKind, EntitySnapshot, GameObjectData,
    UnitData,
};
pub use movement::{MovementInfo, Speeds, TransportInfo};
pub use sink::{
    AreaTriggerShape, AreaTriggerTemplate, AreaTriggerVertex, CreatureQuestItem,
    CreatureTemplate, CreatureTemplateModel, NullSink, ObjectName, RecordKind, RecordSink,
    SniffAction, SniffRecord, StoreKind, VecSink, VehicleAccessory,
};
pub use spline::{
    reconstruct_waypoints, JumpExtra, MonsterSpline, PackedPath, SpellEffectExtra, SplineFacing,
    SplineMove, SplineState, Waypoints,
};
pub use status::{DecodeStatus, DispatchStats};
pub use store::{RemovalEvent, RemovalReason, UpsertOutcome, WorldStateStore};
pub use values::{
    read_dynamic_block, read_values_block, read_values_update, DynamicField, ValuesUpdate,
};
