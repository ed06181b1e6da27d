//! Message code to routine resolution across protocol builds.

use std::collections::BTreeMap;

use wire::{MessageCode, ProtocolBuild};

use crate::error::{RegistryError, RegistryResult};
use crate::range::BuildRange;

/// What a registration resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler<R> {
    /// A decode routine.
    Routine(R),
    /// The code is known to carry no decodable payload in this range.
    Removed,
}

impl<R> Handler<R> {
    #[must_use]
    pub const fn routine(&self) -> Option<&R> {
        match self {
            Self::Routine(routine) => Some(routine),
            Self::Removed => None,
        }
    }
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration<R> {
    pub code: MessageCode,
    pub range: BuildRange,
    /// Symbolic message name, for logs and fingerprints.
    pub name: &'static str,
    pub handler: Handler<R>,
}

/// Maps `(code, build)` to at most one registration.
///
/// Each code may carry several registrations over different build ranges.
/// When more than one contains a build, the most specific wins (see
/// [`BuildRange::specificity_cmp`]); identical ranges are rejected at
/// registration time, so resolution is always unique.
#[derive(Debug, Clone)]
pub struct VersionRegistry<R> {
    entries: BTreeMap<MessageCode, Vec<Registration<R>>>,
}

impl<R> Default for VersionRegistry<R> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<R> VersionRegistry<R> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a routine for `code` over `range`.
    pub fn register(
        &mut self,
        code: MessageCode,
        range: BuildRange,
        name: &'static str,
        routine: R,
    ) -> RegistryResult<()> {
        self.insert(Registration {
            code,
            range,
            name,
            handler: Handler::Routine(routine),
        })
    }

    /// Marks `code` as having no routine over `range`, shadowing any less
    /// specific registration.
    pub fn register_removed(
        &mut self,
        code: MessageCode,
        range: BuildRange,
        name: &'static str,
    ) -> RegistryResult<()> {
        self.insert(Registration {
            code,
            range,
            name,
            handler: Handler::Removed,
        })
    }

    fn insert(&mut self, registration: Registration<R>) -> RegistryResult<()> {
        let code = registration.code;
        let range = registration.range;
        if range.is_empty() {
            return Err(RegistryError::InvalidRange { code, range });
        }
        let slot = self.entries.entry(code).or_default();
        if slot.iter().any(|existing| existing.range == range) {
            return Err(RegistryError::DuplicateRange { code, range });
        }
        // Kept sorted from least to most specific so iteration order does not
        // depend on registration order.
        let at = slot.partition_point(|existing| {
            existing.range.specificity_cmp(range) == std::cmp::Ordering::Less
        });
        slot.insert(at, registration);
        Ok(())
    }

    /// Resolves the registration for `code` at `build`, if any.
    #[must_use]
    pub fn resolve(&self, code: MessageCode, build: ProtocolBuild) -> Option<&Registration<R>> {
        self.entries
            .get(&code)?
            .iter()
            .rev()
            .find(|registration| registration.range.contains(build))
    }

    /// Resolves to a routine, treating removal entries as unhandled.
    #[must_use]
    pub fn resolve_routine(&self, code: MessageCode, build: ProtocolBuild) -> Option<&R> {
        self.resolve(code, build)
            .and_then(|registration| registration.handler.routine())
    }

    /// Registrations for `code`, least specific first.
    #[must_use]
    pub fn entries(&self, code: MessageCode) -> &[Registration<R>] {
        self.entries.get(&code).map_or(&[], Vec::as_slice)
    }

    /// Every registered code, ascending.
    pub fn codes(&self) -> impl Iterator<Item = MessageCode> + '_ {
        self.entries.keys().copied()
    }

    /// Every registration, by code then specificity.
    pub fn iter(&self) -> impl Iterator<Item = &Registration<R>> + '_ {
        self.entries.values().flatten()
    }

    /// Total number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(n: u32) -> ProtocolBuild {
        ProtocolBuild::new(n)
    }

    const CODE: MessageCode = MessageCode::new(0x2A);

    #[test]
    fn unknown_code_is_unresolved() {
        let registry: VersionRegistry<u8> = VersionRegistry::new();
        assert!(registry.resolve(CODE, b(1)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn build_outside_every_range_is_unresolved() {
        let mut registry = VersionRegistry::new();
        registry
            .register(CODE, BuildRange::from(b(38835)), "A", 1_u8)
            .unwrap();
        assert!(registry.resolve(CODE, b(38707)).is_none());
        assert_eq!(registry.resolve_routine(CODE, b(38835)), Some(&1));
    }

    #[test]
    fn newer_open_range_overrides_older() {
        let mut registry = VersionRegistry::new();
        registry
            .register(CODE, BuildRange::from(b(38707)), "old", 1_u8)
            .unwrap();
        registry
            .register(CODE, BuildRange::from(b(38835)), "new", 2_u8)
            .unwrap();
        assert_eq!(registry.resolve_routine(CODE, b(38707)), Some(&1));
        assert_eq!(registry.resolve_routine(CODE, b(38800)), Some(&1));
        assert_eq!(registry.resolve_routine(CODE, b(38835)), Some(&2));
        assert_eq!(registry.resolve_routine(CODE, b(40000)), Some(&2));
    }

    #[test]
    fn resolution_ignores_registration_order() {
        let mut forward = VersionRegistry::new();
        forward.register(CODE, BuildRange::all(), "a", 1_u8).unwrap();
        forward
            .register(CODE, BuildRange::between(b(10), b(20)), "b", 2)
            .unwrap();
        let mut backward = VersionRegistry::new();
        backward
            .register(CODE, BuildRange::between(b(10), b(20)), "b", 2_u8)
            .unwrap();
        backward.register(CODE, BuildRange::all(), "a", 1).unwrap();

        for n in [0, 10, 15, 20, 21] {
            assert_eq!(
                forward.resolve_routine(CODE, b(n)),
                backward.resolve_routine(CODE, b(n))
            );
        }
        assert_eq!(forward.entries(CODE), backward.entries(CODE));
    }

    #[test]
    fn removal_shadows_routine() {
        let mut registry = VersionRegistry::new();
        registry.register(CODE, BuildRange::all(), "X", 1_u8).unwrap();
        registry
            .register_removed(CODE, BuildRange::from(b(50)), "X")
            .unwrap();
        assert_eq!(registry.resolve_routine(CODE, b(49)), Some(&1));
        let removed = registry.resolve(CODE, b(50)).unwrap();
        assert_eq!(removed.handler, Handler::Removed);
        assert_eq!(registry.resolve_routine(CODE, b(50)), None);
    }

    #[test]
    fn duplicate_range_is_rejected() {
        let mut registry = VersionRegistry::new();
        registry.register(CODE, BuildRange::from(b(1)), "A", 1_u8).unwrap();
        let err = registry
            .register(CODE, BuildRange::from(b(1)), "B", 2)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateRange {
                code: CODE,
                range: BuildRange::from(b(1))
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut registry = VersionRegistry::new();
        let range = BuildRange::between(b(5), b(1));
        assert_eq!(
            registry.register(CODE, range, "A", 1_u8),
            Err(RegistryError::InvalidRange { code: CODE, range })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn introspection() {
        let mut registry = VersionRegistry::new();
        registry
            .register(MessageCode::new(3), BuildRange::all(), "C", 0_u8)
            .unwrap();
        registry
            .register(MessageCode::new(1), BuildRange::all(), "A", 0)
            .unwrap();
        registry
            .register(MessageCode::new(1), BuildRange::from(b(9)), "A", 1)
            .unwrap();
        let codes: Vec<_> = registry.codes().map(MessageCode::raw).collect();
        assert_eq!(codes, vec![1, 3]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.entries(MessageCode::new(1)).len(), 2);
        assert!(registry.entries(MessageCode::new(2)).is_empty());
        assert_eq!(registry.iter().count(), 3);
    }
}
