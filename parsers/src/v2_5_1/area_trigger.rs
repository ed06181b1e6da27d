//! The area-trigger part of a create block.

use bitstream::BitResult;
use codec::{
    AreaTriggerData, AreaTriggerShape, AreaTriggerTemplate, AreaTriggerVertex, Effects,
    SniffRecord,
};
use wire::{FieldPath, Guid128, Packet};

pub const HAS_ABSOLUTE_ORIENTATION: u32 = 0x0001;
pub const HAS_DYNAMIC_SHAPE: u32 = 0x0002;
pub const HAS_ATTACHED: u32 = 0x0004;
pub const FACE_MOVEMENT_DIRECTION: u32 = 0x0008;
pub const FOLLOWS_TERRAIN: u32 = 0x0010;
pub const UNK1: u32 = 0x0020;
pub const HAS_TARGET_ROLL_PITCH_YAW: u32 = 0x0040;
pub const HAS_ANIM_ID: u32 = 0x0080;
pub const UNK3: u32 = 0x0100;
pub const HAS_ANIM_KIT_ID: u32 = 0x0200;
pub const HAS_CIRCULAR_MOVEMENT: u32 = 0x0400;
pub const UNK901: u32 = 0x1000;

/// Reads one presence bit and folds it into `flags`.
fn flag_bit(
    packet: &mut Packet<'_>,
    flags: &mut u32,
    name: &'static str,
    flag: u32,
    path: &FieldPath,
) -> BitResult<()> {
    if packet.read_bit(name, path)? {
        *flags |= flag;
    }
    Ok(())
}

/// Reads the area-trigger data of `guid`, filling `data` and emitting its
/// template and polygon vertices.
pub(super) fn read_area_trigger(
    packet: &mut Packet<'_>,
    effects: &mut Effects,
    guid: Guid128,
    data: &mut AreaTriggerData,
    path: &FieldPath,
) -> BitResult<()> {
    let id = guid.entry().unwrap_or(0);
    data.area_trigger_id = id;
    let mut template = AreaTriggerTemplate {
        id,
        ..AreaTriggerTemplate::default()
    };
    let flags = &mut template.flags;

    packet.realign();
    packet.read_u32("ElapsedMs", path)?;
    packet.read_vector3("RollPitchYaw1", path)?;

    flag_bit(packet, flags, "HasAbsoluteOrientation", HAS_ABSOLUTE_ORIENTATION, path)?;
    flag_bit(packet, flags, "HasDynamicShape", HAS_DYNAMIC_SHAPE, path)?;
    flag_bit(packet, flags, "HasAttached", HAS_ATTACHED, path)?;
    flag_bit(packet, flags, "HasFaceMovementDir", FACE_MOVEMENT_DIRECTION, path)?;
    flag_bit(packet, flags, "HasFollowsTerrain", FOLLOWS_TERRAIN, path)?;
    flag_bit(packet, flags, "Unk bit WoD62x", UNK1, path)?;
    flag_bit(packet, flags, "HasTargetRollPitchYaw", HAS_TARGET_ROLL_PITCH_YAW, path)?;
    let has_scale_curve = packet.read_bit("HasScaleCurveID", path)?;
    let has_morph_curve = packet.read_bit("HasMorphCurveID", path)?;
    let has_facing_curve = packet.read_bit("HasFacingCurveID", path)?;
    let has_move_curve = packet.read_bit("HasMoveCurveID", path)?;
    flag_bit(packet, flags, "HasAnimID", HAS_ANIM_ID, path)?;
    flag_bit(packet, flags, "HasAnimKitID", HAS_ANIM_KIT_ID, path)?;
    flag_bit(packet, flags, "unkbit50", UNK3, path)?;
    let has_unk801 = packet.read_bit("unkbit801", path)?;

    // Later shape bits win.
    let mut shape = None;
    for (name, candidate) in [
        ("HasAreaTriggerSphere", AreaTriggerShape::Sphere),
        ("HasAreaTriggerBox", AreaTriggerShape::Box),
        ("HasAreaTriggerPolygon", AreaTriggerShape::Polygon),
        ("HasAreaTriggerCylinder", AreaTriggerShape::Cylinder),
    ] {
        if packet.read_bit(name, path)? {
            shape = Some(candidate);
        }
    }

    let has_spline = packet.read_bit("HasAreaTriggerSpline", path)?;
    flag_bit(packet, flags, "HasAreaTriggerCircularMovement", HAS_CIRCULAR_MOVEMENT, path)?;
    flag_bit(packet, flags, "HasAreaTriggerUnk901", UNK901, path)?;
    let flags = *flags;
    if flags & UNK3 != 0 {
        packet.read_flag()?;
    }

    if has_spline {
        read_area_trigger_spline(packet, &path.child("AreaTriggerSpline"))?;
    }
    packet.realign();

    if flags & HAS_TARGET_ROLL_PITCH_YAW != 0 {
        packet.read_vector3("TargetRollPitchYaw", path)?;
    }

    let mut curve = |present: bool, name: &'static str| -> BitResult<Option<i32>> {
        Ok(present
            .then(|| packet.read_u32(name, path))
            .transpose()?
            .map(|id| id as i32))
    };
    data.scale_curve_id = curve(has_scale_curve, "ScaleCurveID")?;
    data.morph_curve_id = curve(has_morph_curve, "MorphCurveID")?;
    data.facing_curve_id = curve(has_facing_curve, "FacingCurveID")?;
    data.move_curve_id = curve(has_move_curve, "MoveCurveID")?;

    if flags & HAS_ANIM_ID != 0 {
        data.anim_id = Some(packet.read_i32("AnimId", path)?);
    }
    if flags & HAS_ANIM_KIT_ID != 0 {
        data.anim_kit_id = Some(packet.read_i32("AnimKitId", path)?);
    }
    if has_unk801 {
        packet.read_u32("Unk801", path)?;
    }

    match shape {
        Some(AreaTriggerShape::Sphere) => {
            template.data[0] = packet.read_f32("Radius", path)?;
            template.data[1] = packet.read_f32("RadiusTarget", path)?;
        }
        Some(AreaTriggerShape::Box) => {
            let extents = packet.read_vector3("Extents", path)?;
            let target = packet.read_vector3("ExtentsTarget", path)?;
            template.data = [extents.x, extents.y, extents.z, target.x, target.y, target.z];
        }
        Some(AreaTriggerShape::Polygon) => {
            read_polygon(packet, effects, &mut template, path)?;
        }
        Some(AreaTriggerShape::Cylinder) => {
            for (slot, name) in [
                "Radius",
                "RadiusTarget",
                "Height",
                "HeightTarget",
                "LocationZOffset",
                "LocationZOffsetTarget",
            ]
            .into_iter()
            .enumerate()
            {
                template.data[slot] = packet.read_f32(name, path)?;
            }
        }
        None => {}
    }
    template.shape = shape.unwrap_or_default();

    if flags & UNK901 != 0 {
        packet.read_i32("Unk901", path)?;
        packet.read_vector3("Unk901Position", path)?;
    }

    if flags & HAS_CIRCULAR_MOVEMENT != 0 {
        read_circular_movement(packet, &path.child("AreaTriggerCircularMovement"))?;
    }

    effects.emit(SniffRecord::AreaTriggerTemplate(template));
    Ok(())
}

fn read_polygon(
    packet: &mut Packet<'_>,
    effects: &mut Effects,
    template: &mut AreaTriggerTemplate,
    path: &FieldPath,
) -> BitResult<()> {
    let vertices = packet.read_u32("VerticesCount", path)?;
    let vertices = packet.check_count(vertices as usize)?;
    let targets = packet.read_u32("VerticesTargetCount", path)?;
    let targets = packet.check_count(targets as usize)?;
    template.data[0] = packet.read_f32("Height", path)?;
    template.data[1] = packet.read_f32("HeightTarget", path)?;

    let mut polygon = Vec::with_capacity(vertices.min(packet.bits_remaining() / 64));
    for i in 0..vertices {
        let vertex = packet.read_vector2("Vertices", &path.at(i))?;
        polygon.push(AreaTriggerVertex {
            area_trigger_id: template.id,
            idx: i as u32,
            x: vertex.x,
            y: vertex.y,
            target: None,
        });
    }
    for i in 0..targets {
        let target = packet.read_vector2("VerticesTarget", &path.at(i))?;
        if let Some(vertex) = polygon.get_mut(i) {
            vertex.target = Some((target.x, target.y));
        }
    }

    for vertex in polygon {
        effects.emit(SniffRecord::AreaTriggerVertex(vertex));
    }
    Ok(())
}

fn read_area_trigger_spline(packet: &mut Packet<'_>, path: &FieldPath) -> BitResult<()> {
    packet.realign();
    packet.read_u32("TimeToTarget", path)?;
    packet.read_u32("ElapsedTimeForMovement", path)?;
    let points = packet.read_bits("PointsCount", 16, path)?;
    let points = packet.check_count(points as usize)?;
    packet.realign();
    for i in 0..points {
        packet.read_vector3("Points", &path.at(i))?;
    }
    Ok(())
}

fn read_circular_movement(packet: &mut Packet<'_>, path: &FieldPath) -> BitResult<()> {
    packet.realign();
    let has_path_target = packet.read_bit("HasPathTarget", path)?;
    let has_center = packet.read_bit("HasCenter", path)?;
    packet.read_bit("CounterClockwise", path)?;
    packet.read_bit("CanLoop", path)?;
    packet.realign();

    packet.read_u32("TimeToTarget", path)?;
    packet.read_i32("ElapsedTimeForMovement", path)?;
    packet.read_u32("StartDelay", path)?;
    packet.read_f32("Radius", path)?;
    packet.read_f32("BlendFromRadius", path)?;
    packet.read_f32("InitialAngle", path)?;
    packet.read_f32("ZOffset", path)?;

    if has_path_target {
        packet.read_guid("PathTarget", path)?;
    }
    if has_center {
        packet.read_vector3("Center", path)?;
    }
    Ok(())
}
