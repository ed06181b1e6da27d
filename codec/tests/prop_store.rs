use std::collections::BTreeMap;

use codec::{EntityKind, EntitySnapshot, UnitData, ValuesUpdate, WorldStateStore};
use proptest::prelude::*;
use wire::{CaptureTime, Guid128, HighGuidType};

fn snapshot_strategy() -> impl Strategy<Value = EntitySnapshot> {
    (
        proptest::collection::btree_map(0_u32..64, any::<u32>(), 0..8),
        proptest::option::of(any::<u16>()),
        -100.0_f32..100.0,
    )
        .prop_map(|(fields, anim, x)| {
            let mut snapshot = EntitySnapshot {
                kind: EntityKind::Unit(UnitData {
                    ai_anim_kit: anim,
                    ..UnitData::default()
                }),
                values: ValuesUpdate {
                    fields,
                    dynamic_fields: BTreeMap::new(),
                },
                ..EntitySnapshot::default()
            };
            snapshot.movement.position.x = x;
            snapshot
        })
}

proptest! {
    #[test]
    fn prop_upsert_is_idempotent(snapshot in snapshot_strategy(), map in any::<u32>()) {
        let guid = Guid128::compose(HighGuidType::Creature, 1, 0, 10, 1, 1);
        let mut store = WorldStateStore::new();
        store.ambient_mut().set_current_map(map);
        store.upsert_entity(guid, snapshot.clone(), CaptureTime::from_millis(5));
        let once = store.entity(guid).cloned();
        store.upsert_entity(guid, snapshot, CaptureTime::from_millis(9));
        prop_assert_eq!(store.entity(guid).cloned(), once);
    }

    #[test]
    fn prop_absent_fields_persist(first in snapshot_strategy(), second in snapshot_strategy()) {
        let guid = Guid128::compose(HighGuidType::Creature, 1, 0, 10, 1, 2);
        let mut store = WorldStateStore::new();
        store.upsert_entity(guid, first.clone(), CaptureTime::from_millis(1));
        store.upsert_entity(guid, second.clone(), CaptureTime::from_millis(2));
        let entity = store.entity(guid).unwrap();
        for (index, value) in &first.values.fields {
            let expected = second.values.fields.get(index).unwrap_or(value);
            prop_assert_eq!(entity.values.fields.get(index), Some(expected));
        }
        prop_assert_eq!(entity.first_seen, CaptureTime::from_millis(1));
    }
}
