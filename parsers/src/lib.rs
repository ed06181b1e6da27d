//! Reference decode routines for captured game-client traffic.
//!
//! Each protocol revision lives in its own module and contributes routines
//! to a [`VersionRegistry`] under the build range it is valid for. Routines
//! are written against symbolic [`Opcode`]s; an [`OpcodeMap`] binds them to
//! the numeric codes of the capture being decoded.
//!
//! # Design Principles
//!
//! - **Routines mirror the wire** - Every field is read in wire order, under its wire name.
//! - **Explicit alignment** - A byte read that follows bit reads is preceded by a realign.
//! - **No shared state** - Routines stage effects; the dispatcher commits them.

mod opcodes;
pub mod v2_5_1;

pub use opcodes::{Opcode, OpcodeMap};

use codec::{Decoder, DecoderConfig, Routine};
use registry::{RegistryResult, VersionRegistry};

/// Builds a registry holding every known revision's routines.
pub fn registry(opcodes: &OpcodeMap) -> RegistryResult<VersionRegistry<Routine>> {
    let mut registry = VersionRegistry::new();
    v2_5_1::register(&mut registry, opcodes)?;
    Ok(registry)
}

/// Builds a decoder over [`registry`].
pub fn decoder(opcodes: &OpcodeMap, config: DecoderConfig) -> RegistryResult<Decoder> {
    Ok(Decoder::new(registry(opcodes)?, config))
}
