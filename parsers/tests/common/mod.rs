#![allow(dead_code)]

use bitstream::BitWriter;
use codec::{DecoderConfig, Dispatcher, MessageOutcome, VecSink};
use parsers::{Opcode, OpcodeMap};
use wire::{CaptureTime, Guid128, MessageCode, MessageHeader, ProtocolBuild, Vector3};

pub const BUILD: ProtocolBuild = ProtocolBuild::new(38835);

pub const CREATE_FLAGS: [&str; 18] = [
    "NoBirthAnim",
    "EnablePortals",
    "PlayHoverAnim",
    "HasMovementUpdate",
    "HasMovementTransport",
    "Stationary",
    "HasCombatVictim",
    "HasServerTime",
    "HasVehicleCreate",
    "HasAnimKitCreate",
    "HasRotation",
    "HasAreaTrigger",
    "HasGameObject",
    "HasSmoothPhasing",
    "ThisIsYou",
    "SceneObjCreate",
    "HasPlayerCreateData",
    "HasConversation",
];

pub fn opcodes() -> OpcodeMap {
    Opcode::ALL
        .into_iter()
        .zip(0x100_u32..)
        .fold(OpcodeMap::new(), |map, (opcode, code)| map.with(opcode, code))
}

pub fn code(opcode: Opcode) -> MessageCode {
    opcodes().code(opcode).unwrap()
}

pub fn dispatcher() -> Dispatcher<VecSink> {
    let decoder = parsers::decoder(&opcodes(), DecoderConfig::for_testing()).unwrap();
    Dispatcher::new(decoder, VecSink::new())
}

pub fn header(opcode: Opcode, payload: &[u8], number: u64) -> MessageHeader {
    MessageHeader::new(code(opcode), BUILD, payload.len() as u32)
        .with_number(number)
        .with_time(CaptureTime::from_millis(10 * number))
}

pub fn decode(
    dispatcher: &mut Dispatcher<VecSink>,
    opcode: Opcode,
    payload: &[u8],
    number: u64,
) -> MessageOutcome {
    dispatcher.decode(header(opcode, payload, number), payload)
}

pub fn write_guid(writer: &mut BitWriter, guid: Guid128) {
    guid.write_packed(writer).unwrap();
}

pub fn write_vector3(writer: &mut BitWriter, v: Vector3) {
    v.write(writer).unwrap();
}

/// Writes the 18 create-block presence bits, setting the named ones.
pub fn write_create_flags(writer: &mut BitWriter, set: &[&str]) {
    for name in CREATE_FLAGS {
        writer.write_bit(set.contains(&name));
    }
}

/// Writes a movement status without transport, fall, forces or spline.
pub fn write_move_status(writer: &mut BitWriter, mover: Guid128, position: Vector3, run: f32) {
    write_move_status_head(writer, mover, position, run);
    writer.write_bit(false);
}

/// Writes a movement status up to, not including, the spline presence bit.
pub fn write_move_status_head(
    writer: &mut BitWriter,
    mover: Guid128,
    position: Vector3,
    run: f32,
) {
    writer.realign();
    write_guid(writer, mover);
    writer.write_u32(1_000).unwrap();
    write_vector3(writer, position);
    writer.write_f32(1.5).unwrap();
    writer.write_f32(0.0).unwrap();
    writer.write_f32(0.0).unwrap();
    writer.write_u32(0).unwrap();
    writer.write_i32(0).unwrap();
    writer.write_bits(0, 30).unwrap();
    writer.write_bits(0, 18).unwrap();
    for _ in 0..5 {
        writer.write_bit(false);
    }
    writer.realign();
    let speeds = [2.5, run, 4.5, 4.72, 2.5, 7.0, 4.5, 3.14, 3.14];
    for speed in speeds {
        writer.write_f32(speed).unwrap();
    }
    writer.write_u32(0).unwrap();
    writer.write_f32(1.0).unwrap();
    writer.realign();
}

/// Writes a values update with the given flat fields and no collections.
pub fn write_values(writer: &mut BitWriter, fields: &[(u32, u32)]) {
    writer.realign();
    let words = fields.iter().map(|(index, _)| index / 32 + 1).max().unwrap_or(0);
    writer.write_u8(words as u8).unwrap();
    let mut mask = vec![0_u32; words as usize];
    for (index, _) in fields {
        mask[(index / 32) as usize] |= 1 << (index % 32);
    }
    for word in &mask {
        writer.write_u32(*word).unwrap();
    }
    let mut sorted = fields.to_vec();
    sorted.sort_unstable();
    for (_, value) in sorted {
        writer.write_u32(value).unwrap();
    }
    writer.write_u8(0).unwrap();
}
