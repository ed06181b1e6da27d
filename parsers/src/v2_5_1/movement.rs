//! Server-driven movement and the movement parts of create blocks.

use bitstream::BitResult;
use codec::{
    Effects, JumpExtra, MessageContext, MonsterSpline, MovementInfo, PackedPath, SniffRecord,
    Speeds, SpellEffectExtra, SplineFacing, SplineMove, SplineState, TransportInfo,
    VehicleAccessory,
};
use wire::{FieldPath, Guid128, HighGuidType, Packet, Vector3};

/// `SMSG_ON_MONSTER_MOVE`
pub fn handle_on_monster_move(ctx: &mut MessageContext<'_>) -> BitResult<()> {
    let packet = &mut ctx.packet;
    let root = FieldPath::root();
    packet.read_guid("MoverGUID", &root)?;
    let position = packet.read_vector3("Position", &root)?;
    read_monster_spline(packet, position, &root.child("MovementMonsterSpline"))?;
    Ok(())
}

/// `SMSG_SPECIAL_MOUNT_ANIM`
pub fn handle_special_mount_anim(ctx: &mut MessageContext<'_>) -> BitResult<()> {
    let packet = &mut ctx.packet;
    let root = FieldPath::root();
    packet.read_guid("UnitGUID", &root)?;
    let count = packet.read_u32("SpellVisualKitCount", &root)?;
    for i in 0..packet.check_count(count as usize)? {
        packet.read_i32("SpellVisualKitID", &root.at(i))?;
    }
    Ok(())
}

/// Reads a server-driven move that starts at `start`.
///
/// Packed deltas are turned into waypoints relative to the midpoint
/// between `start` and the path end, and traced as `WayPoints`.
pub fn read_monster_spline(
    packet: &mut Packet<'_>,
    start: Vector3,
    path: &FieldPath,
) -> BitResult<MonsterSpline> {
    let id = packet.read_u32("Id", path)?;
    let destination = packet.read_vector3("Destination", path)?;
    packet.read_bit("CrzTeleport", path)?;
    packet.read_bits("StopDistanceTolerance", 3, path)?;
    packet.realign();

    let path = path.child("MovementSpline");
    let flags = packet.read_u32("Flags", &path)?;
    let elapsed = packet.read_i32("Elapsed", &path)?;
    let move_time = packet.read_u32("MoveTime", &path)?;
    let fade_object_time = packet.read_u32("FadeObjectTime", &path)?;
    let mode = packet.read_u8("Mode", &path)?;
    let transport = packet.read_guid("TransportGUID", &path)?;
    let vehicle_seat = packet.read_i8("VehicleSeat", &path)?;

    let face = packet.read_bits("Face", 2, &path)?;
    let points_count = packet.read_bits("PointsCount", 16, &path)?;
    let points_count = packet.check_count(points_count as usize)?;
    packet.read_bit("VehicleExitVoluntary", &path)?;
    packet.read_bit("Interpolate", &path)?;
    let deltas_count = packet.read_bits("PackedDeltasCount", 16, &path)?;
    let deltas_count = packet.check_count(deltas_count as usize)?;
    let has_filter = packet.read_bit("HasSplineFilter", &path)?;
    let has_spell_effect = packet.read_bit("HasSpellEffectExtraData", &path)?;
    let has_jump = packet.read_bit("HasJumpExtraData", &path)?;

    if has_filter {
        packet.realign();
        read_monster_spline_filter(packet, &path.child("MonsterSplineFilter"))?;
    }
    packet.realign();

    let facing = match face {
        1 => SplineFacing::Spot(packet.read_vector3("FaceSpot", &path)?),
        2 => {
            let angle = packet.read_f32("FaceDirection", &path)?;
            let guid = packet.read_guid("FacingGUID", &path)?;
            SplineFacing::Target { angle, guid }
        }
        3 => SplineFacing::Angle(packet.read_f32("FaceDirection", &path)?),
        _ => SplineFacing::Normal,
    };

    let mut route = PackedPath::new(start);
    route.read_points(packet, points_count, &path)?;
    route.read_deltas(packet, deltas_count, &path)?;

    let spell_effect = has_spell_effect
        .then(|| read_spell_effect_extra(packet, &path.child("MonsterSplineSpellEffectExtra")))
        .transpose()?;
    let jump = has_jump
        .then(|| read_jump_extra(packet, &path.child("MonsterSplineJumpExtraData")))
        .transpose()?;

    let (points, waypoints) = route.finish(destination);
    let waypoints = waypoints
        .enumerate()
        .map(|(i, waypoint)| {
            packet.add_value("WayPoints", waypoint, &path.at(i));
            waypoint
        })
        .collect();

    Ok(MonsterSpline {
        id,
        destination,
        flags,
        elapsed,
        move_time,
        fade_object_time,
        mode,
        transport,
        vehicle_seat,
        facing,
        points,
        waypoints,
        spell_effect,
        jump,
    })
}

fn read_monster_spline_filter(packet: &mut Packet<'_>, path: &FieldPath) -> BitResult<()> {
    let count = packet.read_u32("MonsterSplineFilterKey", path)?;
    let count = packet.check_count(count as usize)?;
    packet.read_f32("BaseSpeed", path)?;
    packet.read_i16("StartOffset", path)?;
    packet.read_f32("DistToPrevFilterKey", path)?;
    packet.read_i16("AddedToStart", path)?;
    for i in 0..count {
        let key = path.at(i);
        packet.read_i16("IDx", &key)?;
        packet.read_u16("Speed", &key)?;
    }
    packet.realign();
    packet.read_bits("FilterFlags", 2, path)?;
    Ok(())
}

fn read_spell_effect_extra(packet: &mut Packet<'_>, path: &FieldPath) -> BitResult<SpellEffectExtra> {
    Ok(SpellEffectExtra {
        target: packet.read_guid("TargetGUID", path)?,
        spell_visual_id: packet.read_u32("SpellVisualID", path)?,
        progress_curve_id: packet.read_u32("ProgressCurveID", path)?,
        parabolic_curve_id: packet.read_u32("ParabolicCurveID", path)?,
        jump_gravity: packet.read_f32("JumpGravity", path)?,
    })
}

fn read_jump_extra(packet: &mut Packet<'_>, path: &FieldPath) -> BitResult<JumpExtra> {
    Ok(JumpExtra {
        jump_gravity: packet.read_f32("JumpGravity", path)?,
        start_time: packet.read_u32("StartTime", path)?,
        duration: packet.read_u32("Duration", path)?,
    })
}

/// Reads the transport part of a movement block.
///
/// A creature riding a vehicle is reported as one of the vehicle's
/// accessories.
pub(super) fn read_transport_data(
    packet: &mut Packet<'_>,
    effects: &mut Effects,
    mover: Guid128,
    path: &FieldPath,
) -> BitResult<TransportInfo> {
    packet.realign();
    let guid = packet.read_guid("TransportGUID", path)?;
    let offset = packet.read_vector4("TransportPosition", path)?;
    let seat = packet.read_u8("VehicleSeatIndex", path)?;
    let move_time = packet.read_u32("MoveTime", path)?;
    let has_prev_move_time = packet.read_bit("HasPrevMoveTime", path)?;
    let has_vehicle_rec_id = packet.read_bit("HasVehicleRecID", path)?;
    packet.realign();
    let prev_move_time = has_prev_move_time
        .then(|| packet.read_u32("PrevMoveTime", path))
        .transpose()?;
    let vehicle_rec_id = has_vehicle_rec_id
        .then(|| packet.read_i32("VehicleRecID", path))
        .transpose()?;

    if guid.high_type() == Some(HighGuidType::Vehicle)
        && mover.high_type() == Some(HighGuidType::Creature)
    {
        if let (Some(entry), Some(accessory_entry)) = (guid.entry(), mover.entry()) {
            effects.emit(SniffRecord::VehicleAccessory(VehicleAccessory {
                entry,
                accessory_entry,
                seat_id: seat,
            }));
        }
    }

    Ok(TransportInfo {
        guid,
        offset,
        seat,
        move_time,
        prev_move_time,
        vehicle_rec_id,
    })
}

/// Reads the live movement status of a create block.
pub(super) fn read_move_status(
    packet: &mut Packet<'_>,
    effects: &mut Effects,
    mover: Guid128,
    path: &FieldPath,
) -> BitResult<MovementInfo> {
    let mut info = MovementInfo::default();
    packet.realign();
    packet.read_guid("MoverGUID", path)?;
    packet.read_u32("MoveTime", path)?;
    info.position = packet.read_vector3("Position", path)?;
    info.orientation = packet.read_f32("Orientation", path)?;
    packet.read_f32("Pitch", path)?;
    packet.read_f32("StepUpStartElevation", path)?;

    let remove_forces = packet.read_count()?;
    packet.read_i32("MoveIndex", path)?;
    for i in 0..remove_forces {
        packet.read_guid("RemoveForcesIDs", &path.at(i))?;
    }

    info.flags = packet.read_bits("MovementFlags", 30, path)?;
    info.flags_extra = packet.read_bits("MovementFlags2", 18, path)?;
    let has_transport = packet.read_bit("HasTransportData", path)?;
    let has_fall = packet.read_bit("HasFallData", path)?;
    packet.read_bit("HasSpline", path)?;
    packet.read_bit("HeightChangeFailed", path)?;
    packet.read_bit("RemoteTimeValid", path)?;

    if has_transport {
        info.transport = Some(read_transport_data(packet, effects, mover, path)?);
    }

    if has_fall {
        packet.realign();
        packet.read_u32("Fall Time", path)?;
        packet.read_f32("JumpVelocity", path)?;
        if packet.read_bit("Has Fall Direction", path)? {
            packet.realign();
            packet.read_vector2("Fall", path)?;
            packet.read_f32("Horizontal Speed", path)?;
        }
    }
    packet.realign();

    info.speeds = Speeds {
        walk: packet.read_f32("WalkSpeed", path)?,
        run: packet.read_f32("RunSpeed", path)?,
        run_back: packet.read_f32("RunBackSpeed", path)?,
        swim: packet.read_f32("SwimSpeed", path)?,
        swim_back: packet.read_f32("SwimBackSpeed", path)?,
        flight: packet.read_f32("FlightSpeed", path)?,
        flight_back: packet.read_f32("FlightBackSpeed", path)?,
        turn_rate: packet.read_f32("TurnRate", path)?,
        pitch_rate: packet.read_f32("PitchRate", path)?,
    };

    let force_count = packet.read_u32("MovementForceCount", path)?;
    let force_count = packet.check_count(force_count as usize)?;
    packet.read_f32("MovementForcesModMagnitude", path)?;
    packet.realign();
    let has_spline = packet.read_bit("HasMovementSpline", path)?;

    for i in 0..force_count {
        let force = path.child("MovementForce").at(i);
        packet.realign();
        packet.read_guid("Id", &force)?;
        packet.read_vector3("Origin", &force)?;
        packet.read_vector3("Direction", &force)?;
        packet.read_u32("TransportID", &force)?;
        packet.read_f32("Magnitude", &force)?;
        packet.read_bits("Type", 2, &force)?;
    }

    if has_spline {
        packet.realign();
        info.spline = Some(read_create_spline(packet, &path.child("MovementSpline"))?);
    }

    Ok(info)
}

fn read_create_spline(packet: &mut Packet<'_>, path: &FieldPath) -> BitResult<SplineState> {
    let id = packet.read_i32("ID", path)?;
    let destination = packet.read_vector3("Destination", path)?;
    let movement = if packet.read_bit("MovementSplineMove", path)? {
        packet.realign();
        Some(read_spline_move(packet, path)?)
    } else {
        None
    };
    Ok(SplineState {
        id,
        destination,
        movement,
    })
}

fn read_spline_move(packet: &mut Packet<'_>, path: &FieldPath) -> BitResult<SplineMove> {
    let flags = packet.read_u32("SplineFlags", path)?;
    let elapsed = packet.read_i32("Elapsed", path)?;
    let duration = packet.read_u32("Duration", path)?;
    let duration_modifier = packet.read_f32("DurationModifier", path)?;
    let next_duration_modifier = packet.read_f32("NextDurationModifier", path)?;

    let face = packet.read_bits("Face", 2, path)?;
    let has_special_time = packet.read_bit("HasSpecialTime", path)?;
    let points_count = packet.read_bits("PointsCount", 16, path)?;
    let points_count = packet.check_count(points_count as usize)?;
    let has_filter_key = packet.read_bit("HasSplineFilterKey", path)?;
    let has_spell_effect = packet.read_bit("HasSpellEffectExtraData", path)?;
    let has_jump = packet.read_bit("HasJumpExtraData", path)?;
    let has_anim_tier = packet.read_bit("HasAnimationTierTransition", path)?;

    if has_filter_key {
        packet.realign();
        let keys = packet.read_u32("FilterKeysCount", path)?;
        for i in 0..packet.check_count(keys as usize)? {
            let key = path.at(i);
            packet.read_f32("In", &key)?;
            packet.read_f32("Out", &key)?;
        }
        packet.read_bits("FilterFlags", 2, path)?;
    }
    packet.realign();

    let facing = match face {
        1 => SplineFacing::Spot(packet.read_vector3("FaceSpot", path)?),
        2 => SplineFacing::Target {
            angle: 0.0,
            guid: packet.read_guid("FaceGUID", path)?,
        },
        3 => SplineFacing::Angle(packet.read_f32("FaceDirection", path)?),
        _ => SplineFacing::Normal,
    };

    if has_special_time {
        packet.read_u32("SpecialTime", path)?;
    }

    let mut points = Vec::with_capacity(points_count.min(packet.bits_remaining() / 96));
    for i in 0..points_count {
        points.push(packet.read_vector3("Points", &path.at(i))?);
    }

    if has_spell_effect {
        read_spell_effect_extra(packet, path)?;
    }
    if has_jump {
        read_jump_extra(packet, path)?;
    }
    if has_anim_tier {
        packet.read_i32("TierTransitionID", path)?;
        packet.read_i32("StartTime", path)?;
        packet.read_i32("EndTime", path)?;
        packet.read_u8("AnimTier", path)?;
    }

    Ok(SplineMove {
        flags,
        elapsed,
        duration,
        duration_modifier,
        next_duration_modifier,
        facing,
        points,
    })
}
