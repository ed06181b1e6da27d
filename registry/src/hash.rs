//! Deterministic registry fingerprinting.

use blake3::Hasher;
use wire::ProtocolBuild;

use crate::registry::{Handler, VersionRegistry};

/// Computes a deterministic fingerprint of every registration, for comparing
/// registration tables between runs. Routine values do not contribute; only
/// codes, ranges, names and handler kinds do.
#[must_use]
pub fn registry_hash<R>(registry: &VersionRegistry<R>) -> u64 {
    let mut hasher = Hasher::new();
    write_u64(&mut hasher, registry.len() as u64);

    for registration in registry.iter() {
        write_u32(&mut hasher, registration.code.raw());
        write_bound(&mut hasher, registration.range.lower());
        write_bound(&mut hasher, registration.range.upper());
        write_u64(&mut hasher, registration.name.len() as u64);
        hasher.update(registration.name.as_bytes());
        match registration.handler {
            Handler::Routine(_) => write_u8(&mut hasher, 0),
            Handler::Removed => write_u8(&mut hasher, 1),
        }
    }

    let hash = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

fn write_bound(hasher: &mut Hasher, bound: Option<ProtocolBuild>) {
    match bound {
        None => write_u8(hasher, 0),
        Some(build) => {
            write_u8(hasher, 1);
            write_u32(hasher, build.raw());
        }
    }
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}

fn write_u64(hasher: &mut Hasher, value: u64) {
    hasher.update(&value.to_le_bytes());
}
