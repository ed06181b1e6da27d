use proptest::prelude::*;
use registry::{BuildRange, VersionRegistry};
use wire::{MessageCode, ProtocolBuild};

const CODE: MessageCode = MessageCode::new(0x10);

fn range_strategy() -> impl Strategy<Value = BuildRange> {
    (proptest::option::of(0u32..100), proptest::option::of(0u32..100)).prop_map(|(from, to)| {
        match (from, to) {
            (None, None) => BuildRange::all(),
            (Some(from), None) => BuildRange::from(ProtocolBuild::new(from)),
            (None, Some(to)) => BuildRange::until(ProtocolBuild::new(to)),
            (Some(from), Some(to)) => BuildRange::between(
                ProtocolBuild::new(from.min(to)),
                ProtocolBuild::new(from.max(to)),
            ),
        }
    })
}

proptest! {
    /// The resolved entry contains the build and is at least as specific as
    /// every other entry containing it.
    #[test]
    fn prop_resolution_is_most_specific(
        ranges in proptest::collection::vec(range_strategy(), 0..8),
        build in 0u32..110,
    ) {
        let mut registry = VersionRegistry::new();
        let mut accepted = Vec::new();
        for (i, range) in ranges.into_iter().enumerate() {
            if registry.register(CODE, range, "M", i).is_ok() {
                accepted.push((range, i));
            }
        }
        let build = ProtocolBuild::new(build);
        let containing: Vec<_> = accepted.iter().filter(|(r, _)| r.contains(build)).collect();

        match registry.resolve(CODE, build) {
            None => prop_assert!(containing.is_empty()),
            Some(found) => {
                prop_assert!(found.range.contains(build));
                for (range, _) in &containing {
                    prop_assert_ne!(
                        range.specificity_cmp(found.range),
                        std::cmp::Ordering::Greater
                    );
                }
                let winners = containing
                    .iter()
                    .filter(|(r, _)| r.specificity_cmp(found.range) == std::cmp::Ordering::Equal)
                    .count();
                prop_assert_eq!(winners, 1);
            }
        }
    }
}
