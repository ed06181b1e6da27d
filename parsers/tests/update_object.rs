//! Update-object messages decoded end to end through the dispatcher.

mod common;

use bitstream::BitWriter;
use codec::{
    AreaTriggerShape, AreaTriggerTemplate, AreaTriggerVertex, DecodeStatus, EntityKind,
    GameObjectData, RecordKind, RemovalReason, SniffAction, SniffRecord, SplineFacing, SplineMove,
    SplineState, StoreKind, VehicleAccessory,
};
use common::{
    decode, dispatcher, write_create_flags, write_guid, write_move_status,
    write_move_status_head, write_values, write_vector3,
};
use parsers::v2_5_1::area_trigger::{HAS_ANIM_ID, HAS_CIRCULAR_MOVEMENT};
use parsers::Opcode;
use wire::{Guid128, HighGuidType, Quaternion, TraceValue, Vector2, Vector3, Vector4};

const MAP: u16 = 571;

fn creature(entry: u32, counter: u64) -> Guid128 {
    Guid128::compose(HighGuidType::Creature, 1, MAP, entry, 7, counter)
}

/// Writes the message prologue with no removals.
fn begin(writer: &mut BitWriter, updates: u32) {
    writer.write_u32(updates).unwrap();
    writer.write_u16(MAP).unwrap();
    writer.write_bit(false);
    writer.realign();
    writer.write_u32(0).unwrap();
}

fn begin_create(writer: &mut BitWriter, guid: Guid128, object_type: u8, flags: &[&str]) {
    writer.write_u8(1).unwrap();
    write_guid(writer, guid);
    writer.write_u8(object_type).unwrap();
    writer.write_i32(0).unwrap();
    write_create_flags(writer, flags);
}

fn creature_create(guid: Guid128, position: Vector3, fields: &[(u32, u32)]) -> Vec<u8> {
    let mut w = BitWriter::new();
    begin(&mut w, 1);
    begin_create(&mut w, guid, 3, &["HasMovementUpdate"]);
    write_move_status(&mut w, guid, position, 7.0);
    w.realign();
    w.write_u32(0).unwrap();
    write_values(&mut w, fields);
    w.finish()
}

#[test]
fn creature_create_block_is_stored_and_spawned() {
    let guid = creature(448, 1);
    let position = Vector3::new(-9_460.0, 62.5, 56.0);
    let payload = creature_create(guid, position, &[(0, 448), (5, 1_500)]);

    let mut d = dispatcher();
    let outcome = decode(&mut d, Opcode::UpdateObject, &payload, 1);
    assert_eq!(outcome.status, DecodeStatus::Ok);
    assert_eq!(outcome.routine, Some("SMSG_UPDATE_OBJECT"));

    let entity = d.store().entity(guid).unwrap();
    assert!(entity.kind.is_unit());
    assert_eq!(entity.map_id, Some(u32::from(MAP)));
    assert_eq!(entity.movement.position, position);
    assert_eq!(entity.movement.orientation, 1.5);
    assert_eq!(entity.movement.speeds.run, 7.0);
    assert_eq!(entity.values.fields.get(&5), Some(&1_500));
    assert!(!entity.has_waypoints_or_random_movement);

    let spawns: Vec<_> = d.sink().of_kind(RecordKind::SniffData).collect();
    assert_eq!(
        spawns,
        [&SniffRecord::SniffData {
            store: StoreKind::Unit,
            entry: 448,
            action: SniffAction::Spawn,
        }]
    );
}

#[test]
fn create_block_is_traced_with_indexed_paths() {
    let guid = creature(448, 1);
    let payload = creature_create(guid, Vector3::new(1.0, 2.0, 3.0), &[]);
    let mut d = dispatcher();
    let outcome = decode(&mut d, Opcode::UpdateObject, &payload, 1);

    let run = outcome.trace.find("RunSpeed").unwrap();
    assert_eq!(run.path.to_string(), "[0]");
    assert!(outcome.trace.find("HasMovementUpdate").is_some());
}

#[test]
fn values_update_merges_into_created_entity() {
    let guid = creature(448, 1);
    let mut d = dispatcher();
    let create = creature_create(guid, Vector3::new(1.0, 2.0, 3.0), &[(0, 448), (5, 1_500)]);
    decode(&mut d, Opcode::UpdateObject, &create, 1);

    let mut w = BitWriter::new();
    begin(&mut w, 1);
    w.write_u8(0).unwrap();
    write_guid(&mut w, guid);
    write_values(&mut w, &[(5, 900), (40, 3)]);
    let update = w.finish();

    let outcome = decode(&mut d, Opcode::UpdateObject, &update, 2);
    assert_eq!(outcome.status, DecodeStatus::Ok);
    let entity = d.store().entity(guid).unwrap();
    assert_eq!(entity.values.fields.get(&0), Some(&448));
    assert_eq!(entity.values.fields.get(&5), Some(&900));
    assert_eq!(entity.values.fields.get(&40), Some(&3));
    assert_eq!(d.store().orphan_updates(), 0);
}

#[test]
fn removals_are_recorded_without_deleting() {
    let kept = creature(448, 1);
    let gone = creature(299, 2);
    let mut d = dispatcher();
    let create = creature_create(kept, Vector3::new(1.0, 2.0, 3.0), &[]);
    decode(&mut d, Opcode::UpdateObject, &create, 1);

    let mut w = BitWriter::new();
    w.write_u32(0).unwrap();
    w.write_u16(MAP).unwrap();
    w.write_bit(true);
    w.realign();
    w.write_i16(1).unwrap();
    w.write_u32(2).unwrap();
    write_guid(&mut w, kept);
    write_guid(&mut w, gone);
    w.write_u32(0).unwrap();
    let payload = w.finish();

    let outcome = decode(&mut d, Opcode::UpdateObject, &payload, 2);
    assert_eq!(outcome.status, DecodeStatus::Ok);
    let removals: Vec<_> = d
        .store()
        .removals()
        .iter()
        .map(|event| (event.guid, event.reason))
        .collect();
    assert_eq!(
        removals,
        [
            (kept, RemovalReason::Destroyed),
            (gone, RemovalReason::OutOfRange)
        ]
    );
    assert!(d.store().entity(kept).is_some());
}

#[test]
fn creature_on_vehicle_is_reported_as_accessory() {
    let vehicle = Guid128::compose(HighGuidType::Vehicle, 1, MAP, 33_062, 7, 10);
    let rider = creature(33_114, 11);

    let mut w = BitWriter::new();
    begin(&mut w, 1);
    begin_create(&mut w, rider, 3, &["HasMovementTransport"]);
    w.realign();
    w.write_u32(0).unwrap();
    write_guid(&mut w, vehicle);
    Vector4::new(0.5, -1.0, 2.0, 3.1).write(&mut w).unwrap();
    w.write_u8(2).unwrap();
    w.write_u32(12_345).unwrap();
    w.write_bit(false);
    w.write_bit(true);
    w.realign();
    w.write_i32(160).unwrap();
    write_values(&mut w, &[]);
    let payload = w.finish();

    let mut d = dispatcher();
    let outcome = decode(&mut d, Opcode::UpdateObject, &payload, 1);
    assert_eq!(outcome.status, DecodeStatus::Ok);

    let accessories: Vec<_> = d.sink().of_kind(RecordKind::VehicleAccessory).collect();
    assert_eq!(
        accessories,
        [&SniffRecord::VehicleAccessory(VehicleAccessory {
            entry: 33_062,
            accessory_entry: 33_114,
            seat_id: 2,
        })]
    );
    let transport = d.store().entity(rider).unwrap().movement.transport.unwrap();
    assert_eq!(transport.guid, vehicle);
    assert_eq!(transport.seat, 2);
    assert_eq!(transport.prev_move_time, None);
    assert_eq!(transport.vehicle_rec_id, Some(160));
}

#[test]
fn game_object_create_reads_stationary_rotation_and_effects() {
    let guid = Guid128::compose(HighGuidType::GameObject, 1, MAP, 181_478, 7, 3);
    let position = Vector3::new(5_800.0, 640.0, 609.5);

    let mut w = BitWriter::new();
    begin(&mut w, 1);
    begin_create(
        &mut w,
        guid,
        6,
        &["Stationary", "HasAnimKitCreate", "HasRotation", "HasGameObject"],
    );
    w.realign();
    w.write_u32(0).unwrap();
    write_vector3(&mut w, position);
    w.write_f32(0.75).unwrap();
    w.write_u16(4).unwrap();
    w.write_u16(0).unwrap();
    w.write_u16(0).unwrap();
    Quaternion::new(0.0, 0.0, 0.0, 1.0).write_packed(&mut w).unwrap();
    w.write_u32(12).unwrap();
    w.write_bit(false);
    write_values(&mut w, &[(1, 1)]);
    let payload = w.finish();

    let mut d = dispatcher();
    let outcome = decode(&mut d, Opcode::UpdateObject, &payload, 1);
    assert_eq!(outcome.status, DecodeStatus::Ok);

    let entity = d.store().entity(guid).unwrap();
    assert_eq!(
        entity.kind,
        EntityKind::GameObject(GameObjectData {
            world_effect_id: Some(12),
            ai_anim_kit: Some(4),
        })
    );
    assert_eq!(entity.movement.position, position);
    assert_eq!(entity.movement.orientation, 0.75);
    assert!(entity.movement.rotation.is_some());
    assert!(d.sink().records().iter().any(|(_, record, _)| matches!(
        record,
        SniffRecord::SniffData {
            store: StoreKind::GameObject,
            entry: 181_478,
            action: SniffAction::Spawn,
        }
    )));
}

/// Area-trigger presence bits beyond the fixed header.
#[derive(Default)]
struct AreaTriggerBits {
    scale_curve: bool,
    anim_id: bool,
    /// Index of the shape bit to set: sphere, box, polygon, cylinder.
    shape: usize,
    spline: bool,
    circular: bool,
}

/// Writes an update creating one area trigger, up to and including its
/// trailing realign.
fn begin_area_trigger(writer: &mut BitWriter, guid: Guid128, bits: &AreaTriggerBits) {
    begin(writer, 1);
    begin_create(writer, guid, 9, &["HasAreaTrigger"]);
    writer.realign();
    writer.write_u32(0).unwrap();
    writer.realign();
    writer.write_u32(250).unwrap();
    write_vector3(writer, Vector3::default());
    for _ in 0..7 {
        writer.write_bit(false);
    }
    writer.write_bit(bits.scale_curve);
    writer.write_bits(0, 3).unwrap();
    // Anim id, anim kit, unkbit50, unk801.
    writer.write_bit(bits.anim_id);
    writer.write_bits(0, 3).unwrap();
    for shape in 0..4 {
        writer.write_bit(shape == bits.shape);
    }
    writer.write_bit(bits.spline);
    writer.write_bit(bits.circular);
    writer.write_bit(false);
}

fn area_trigger_guid() -> Guid128 {
    Guid128::compose(HighGuidType::AreaTrigger, 1, MAP, 12_345, 7, 4)
}

#[test]
fn area_trigger_create_emits_template() {
    let guid = area_trigger_guid();

    let mut w = BitWriter::new();
    let bits = AreaTriggerBits {
        scale_curve: true,
        anim_id: true,
        ..AreaTriggerBits::default()
    };
    begin_area_trigger(&mut w, guid, &bits);
    w.realign();
    w.write_u32(3).unwrap();
    w.write_i32(55).unwrap();
    w.write_f32(3.0).unwrap();
    w.write_f32(5.0).unwrap();
    write_values(&mut w, &[]);
    let payload = w.finish();

    let mut d = dispatcher();
    let outcome = decode(&mut d, Opcode::UpdateObject, &payload, 1);
    assert_eq!(outcome.status, DecodeStatus::Ok);

    let templates: Vec<_> = d.sink().of_kind(RecordKind::AreaTriggerTemplate).collect();
    assert_eq!(
        templates,
        [&SniffRecord::AreaTriggerTemplate(AreaTriggerTemplate {
            id: 12_345,
            flags: HAS_ANIM_ID,
            shape: AreaTriggerShape::Sphere,
            data: [3.0, 5.0, 0.0, 0.0, 0.0, 0.0],
        })]
    );
    match d.store().entity(guid).unwrap().kind {
        EntityKind::AreaTrigger(data) => {
            assert_eq!(data.area_trigger_id, 12_345);
            assert_eq!(data.scale_curve_id, Some(3));
            assert_eq!(data.anim_id, Some(55));
            assert_eq!(data.morph_curve_id, None);
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn area_trigger_polygon_emits_vertices_with_targets() {
    let guid = area_trigger_guid();

    let mut w = BitWriter::new();
    let bits = AreaTriggerBits {
        shape: 2,
        ..AreaTriggerBits::default()
    };
    begin_area_trigger(&mut w, guid, &bits);
    w.realign();
    w.write_u32(3).unwrap();
    w.write_u32(2).unwrap();
    w.write_f32(4.0).unwrap();
    w.write_f32(6.0).unwrap();
    for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 5.0)] {
        Vector2::new(x, y).write(&mut w).unwrap();
    }
    for (x, y) in [(1.0, 1.0), (11.0, 1.0)] {
        Vector2::new(x, y).write(&mut w).unwrap();
    }
    write_values(&mut w, &[]);
    let payload = w.finish();

    let mut d = dispatcher();
    let outcome = decode(&mut d, Opcode::UpdateObject, &payload, 1);
    assert_eq!(outcome.status, DecodeStatus::Ok);

    let vertices: Vec<_> = d.sink().of_kind(RecordKind::AreaTriggerVertex).collect();
    let vertex = |idx, x, y, target| {
        SniffRecord::AreaTriggerVertex(AreaTriggerVertex {
            area_trigger_id: 12_345,
            idx,
            x,
            y,
            target,
        })
    };
    assert_eq!(
        vertices,
        [
            &vertex(0, 0.0, 0.0, Some((1.0, 1.0))),
            &vertex(1, 10.0, 0.0, Some((11.0, 1.0))),
            &vertex(2, 10.0, 5.0, None),
        ]
    );

    let templates: Vec<_> = d.sink().of_kind(RecordKind::AreaTriggerTemplate).collect();
    assert_eq!(
        templates,
        [&SniffRecord::AreaTriggerTemplate(AreaTriggerTemplate {
            id: 12_345,
            flags: 0,
            shape: AreaTriggerShape::Polygon,
            data: [4.0, 6.0, 0.0, 0.0, 0.0, 0.0],
        })]
    );
    // Vertices precede their template.
    let kinds: Vec<_> = d.sink().records().iter().map(|(kind, _, _)| *kind).collect();
    assert_eq!(kinds[3], RecordKind::AreaTriggerTemplate);
}

#[test]
fn area_trigger_spline_and_circular_movement_are_consumed() {
    let guid = area_trigger_guid();

    let mut w = BitWriter::new();
    let bits = AreaTriggerBits {
        spline: true,
        circular: true,
        ..AreaTriggerBits::default()
    };
    begin_area_trigger(&mut w, guid, &bits);
    // Spline.
    w.realign();
    w.write_u32(3_000).unwrap();
    w.write_u32(100).unwrap();
    w.write_bits(2, 16).unwrap();
    w.realign();
    write_vector3(&mut w, Vector3::new(1.0, 2.0, 3.0));
    write_vector3(&mut w, Vector3::new(4.0, 5.0, 6.0));
    // Sphere.
    w.realign();
    w.write_f32(2.0).unwrap();
    w.write_f32(2.0).unwrap();
    // Circular movement with a path target and a centre.
    w.realign();
    w.write_bit(true);
    w.write_bit(true);
    w.write_bit(false);
    w.write_bit(true);
    w.realign();
    w.write_u32(5_000).unwrap();
    w.write_i32(0).unwrap();
    w.write_u32(0).unwrap();
    for value in [8.0, 0.0, 1.57, 0.5] {
        w.write_f32(value).unwrap();
    }
    write_guid(&mut w, creature(448, 1));
    write_vector3(&mut w, Vector3::new(100.0, 200.0, 30.0));
    write_values(&mut w, &[]);
    let payload = w.finish();

    let mut d = dispatcher();
    let outcome = decode(&mut d, Opcode::UpdateObject, &payload, 1);
    assert_eq!(outcome.status, DecodeStatus::Ok);
    assert!(outcome.trace.find("CanLoop").is_some());

    let templates: Vec<_> = d.sink().of_kind(RecordKind::AreaTriggerTemplate).collect();
    assert_eq!(
        templates,
        [&SniffRecord::AreaTriggerTemplate(AreaTriggerTemplate {
            id: 12_345,
            flags: HAS_CIRCULAR_MOVEMENT,
            shape: AreaTriggerShape::Sphere,
            data: [2.0, 2.0, 0.0, 0.0, 0.0, 0.0],
        })]
    );
}

/// Writes the spline part of a movement status, starting at its presence
/// bit, with a `MovementSplineMove` block.
fn write_create_spline(
    writer: &mut BitWriter,
    id: i32,
    destination: Vector3,
    facing: SplineFacing,
    points: &[Vector3],
    filter_keys: &[(f32, f32)],
) {
    writer.write_bit(true);
    writer.realign();
    writer.write_i32(id).unwrap();
    write_vector3(writer, destination);
    writer.write_bit(true);
    writer.realign();
    writer.write_u32(0x100).unwrap();
    writer.write_i32(150).unwrap();
    writer.write_u32(900).unwrap();
    writer.write_f32(1.0).unwrap();
    writer.write_f32(0.5).unwrap();

    let face = match facing {
        SplineFacing::Normal => 0,
        SplineFacing::Spot(_) => 1,
        SplineFacing::Target { .. } => 2,
        SplineFacing::Angle(_) => 3,
    };
    writer.write_bits(face, 2).unwrap();
    writer.write_bit(true);
    writer.write_bits(points.len() as u32, 16).unwrap();
    writer.write_bit(!filter_keys.is_empty());
    // Spell effect, jump, animation tier.
    writer.write_bits(0, 3).unwrap();
    if !filter_keys.is_empty() {
        writer.realign();
        writer.write_u32(filter_keys.len() as u32).unwrap();
        for &(key_in, key_out) in filter_keys {
            writer.write_f32(key_in).unwrap();
            writer.write_f32(key_out).unwrap();
        }
        writer.write_bits(1, 2).unwrap();
    }
    writer.realign();

    match facing {
        SplineFacing::Normal => {}
        SplineFacing::Spot(spot) => write_vector3(writer, spot),
        SplineFacing::Target { guid, .. } => write_guid(writer, guid),
        SplineFacing::Angle(angle) => writer.write_f32(angle).unwrap(),
    }
    writer.write_u32(77).unwrap();
    for &point in points {
        write_vector3(writer, point);
    }
}

fn creature_with_spline(
    guid: Guid128,
    facing: SplineFacing,
    points: &[Vector3],
    filter_keys: &[(f32, f32)],
) -> Vec<u8> {
    let mut w = BitWriter::new();
    begin(&mut w, 1);
    begin_create(&mut w, guid, 3, &["HasMovementUpdate"]);
    write_move_status_head(&mut w, guid, Vector3::default(), 7.0);
    write_create_spline(&mut w, 42, Vector3::new(10.0, 0.0, 0.0), facing, points, filter_keys);
    w.realign();
    w.write_u32(0).unwrap();
    write_values(&mut w, &[]);
    w.finish()
}

#[test]
fn create_block_spline_is_stored_for_every_facing() {
    let points = [Vector3::new(4.0, 0.0, 0.0), Vector3::new(10.0, 0.0, 0.0)];
    let target = creature(299, 9);
    let facings = [
        SplineFacing::Normal,
        SplineFacing::Spot(Vector3::new(7.0, 7.0, 7.0)),
        SplineFacing::Target {
            angle: 0.0,
            guid: target,
        },
        SplineFacing::Angle(2.5),
    ];

    for facing in facings {
        let guid = creature(448, 1);
        let payload = creature_with_spline(guid, facing, &points, &[]);
        let mut d = dispatcher();
        let outcome = decode(&mut d, Opcode::UpdateObject, &payload, 1);
        assert_eq!(outcome.status, DecodeStatus::Ok, "{facing:?}");

        let spline = d.store().entity(guid).unwrap().movement.spline.clone();
        assert_eq!(
            spline,
            Some(SplineState {
                id: 42,
                destination: Vector3::new(10.0, 0.0, 0.0),
                movement: Some(SplineMove {
                    flags: 0x100,
                    elapsed: 150,
                    duration: 900,
                    duration_modifier: 1.0,
                    next_duration_modifier: 0.5,
                    facing,
                    points: points.to_vec(),
                }),
            })
        );
    }
}

#[test]
fn create_block_spline_filter_keys_are_consumed() {
    let guid = creature(448, 1);
    let spot = SplineFacing::Spot(Vector3::new(7.0, 7.0, 7.0));
    let payload = creature_with_spline(
        guid,
        spot,
        &[Vector3::new(1.0, 1.0, 1.0)],
        &[(0.0, 1.0), (0.5, 2.0)],
    );

    let mut d = dispatcher();
    let outcome = decode(&mut d, Opcode::UpdateObject, &payload, 1);
    assert_eq!(outcome.status, DecodeStatus::Ok);
    assert!(outcome.trace.find("FilterFlags").is_some());

    let spline = d.store().entity(guid).unwrap().movement.spline.clone().unwrap();
    let movement = spline.movement.unwrap();
    assert_eq!(movement.facing, spot);
    assert_eq!(movement.points, [Vector3::new(1.0, 1.0, 1.0)]);
}

#[test]
fn create_block_spline_without_move_has_no_movement() {
    let guid = creature(448, 1);
    let mut w = BitWriter::new();
    begin(&mut w, 1);
    begin_create(&mut w, guid, 3, &["HasMovementUpdate"]);
    write_move_status_head(&mut w, guid, Vector3::default(), 7.0);
    w.write_bit(true);
    w.realign();
    w.write_i32(5).unwrap();
    write_vector3(&mut w, Vector3::new(3.0, 0.0, 0.0));
    w.write_bit(false);
    w.realign();
    w.write_u32(0).unwrap();
    write_values(&mut w, &[]);
    let payload = w.finish();

    let mut d = dispatcher();
    let outcome = decode(&mut d, Opcode::UpdateObject, &payload, 1);
    assert_eq!(outcome.status, DecodeStatus::Ok);
    assert_eq!(
        d.store().entity(guid).unwrap().movement.spline,
        Some(SplineState {
            id: 5,
            destination: Vector3::new(3.0, 0.0, 0.0),
            movement: None,
        })
    );
}

#[test]
fn unknown_update_type_is_skipped() {
    let guid = creature(448, 1);
    let mut w = BitWriter::new();
    begin(&mut w, 1);
    w.write_u8(9).unwrap();
    write_guid(&mut w, guid);
    let payload = w.finish();

    let mut d = dispatcher();
    let outcome = decode(&mut d, Opcode::UpdateObject, &payload, 1);
    assert_eq!(outcome.status, DecodeStatus::Ok);
    assert!(d.store().is_empty());
    assert_eq!(d.store().orphan_updates(), 0);
    assert_eq!(
        outcome.trace.find("UpdateType").map(|r| r.value.clone()),
        Some(TraceValue::UInt(9))
    );
}

#[test]
fn resent_creature_at_new_position_is_flagged() {
    let guid = creature(448, 1);
    let mut d = dispatcher();
    let first = creature_create(guid, Vector3::new(1.0, 2.0, 3.0), &[]);
    let second = creature_create(guid, Vector3::new(4.0, 2.0, 3.0), &[]);
    decode(&mut d, Opcode::UpdateObject, &first, 1);
    decode(&mut d, Opcode::UpdateObject, &second, 2);

    let entity = d.store().entity(guid).unwrap();
    assert!(entity.has_waypoints_or_random_movement);
    assert_eq!(entity.first_seen, common::header(Opcode::UpdateObject, &first, 1).time);
}

#[test]
fn truncated_create_block_reports_bits() {
    let guid = creature(448, 1);
    let payload = creature_create(guid, Vector3::new(1.0, 2.0, 3.0), &[(0, 1)]);
    let cut = &payload[..payload.len() - 6];

    let mut d = dispatcher();
    let outcome = decode(&mut d, Opcode::UpdateObject, cut, 1);
    assert!(matches!(outcome.status, DecodeStatus::Truncated { .. }));
    assert!(d.store().entity(guid).is_none());
}

#[test]
fn oversized_update_count_is_malformed() {
    let mut w = BitWriter::new();
    begin(&mut w, 1_000_000);
    let payload = w.finish();

    let mut d = dispatcher();
    let outcome = decode(&mut d, Opcode::UpdateObject, &payload, 1);
    assert!(matches!(outcome.status, DecodeStatus::Malformed(_)));
    assert!(d.store().is_empty());
}
