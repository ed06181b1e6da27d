//! Build-range routine registry for the sniffdec decoder.
//!
//! A [`VersionRegistry`] maps a message code and protocol build to at most
//! one routine. Protocol revisions are registered as build ranges; a newer
//! revision overrides an older one by registering a range with a larger
//! lower bound.
//!
//! # Design Principles
//!
//! - **Unique resolution** - Overlapping ranges are ordered by specificity; identical ranges are rejected.
//! - **Generic routines** - The registry stores any routine type and knows nothing about decoding.
//! - **Deterministic hashing** - [`registry_hash`] is stable given the same registrations.

mod error;
mod hash;
mod range;
mod registry;

pub use error::{RegistryError, RegistryResult};
pub use hash::registry_hash;
pub use range::BuildRange;
pub use registry::{Handler, Registration, VersionRegistry};
