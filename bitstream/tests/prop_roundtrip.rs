use bitstream::{BitReader, BitWriter};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Bit(bool),
    Bits { bits: u8, value: u32 },
    Realign,
    U8(u8),
    I16(i16),
    U32(u32),
    I64(i64),
    F32(u32),
    CString(String),
}

fn mask_value(bits: u8, value: u32) -> u32 {
    if bits >= 32 {
        value
    } else {
        value & ((1u32 << bits) - 1)
    }
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(Op::Bit),
        (1u8..=32, any::<u32>()).prop_map(|(bits, value)| Op::Bits {
            bits,
            value: mask_value(bits, value),
        }),
        Just(Op::Realign),
        any::<u8>().prop_map(Op::U8),
        any::<i16>().prop_map(Op::I16),
        any::<u32>().prop_map(Op::U32),
        any::<i64>().prop_map(Op::I64),
        any::<u32>().prop_map(Op::F32),
        "[a-zA-Z ]{0,12}".prop_map(Op::CString),
    ]
}

fn is_byte_op(op: &Op) -> bool {
    !matches!(op, Op::Bit(_) | Op::Bits { .. } | Op::Realign)
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut writer = BitWriter::new();

        for op in &ops {
            if is_byte_op(op) {
                writer.realign();
            }
            match op {
                Op::Bit(b) => writer.write_bit(*b),
                Op::Bits { bits, value } => writer.write_bits(*value, *bits).unwrap(),
                Op::Realign => writer.realign(),
                Op::U8(v) => writer.write_u8(*v).unwrap(),
                Op::I16(v) => writer.write_i16(*v).unwrap(),
                Op::U32(v) => writer.write_u32(*v).unwrap(),
                Op::I64(v) => writer.write_i64(*v).unwrap(),
                Op::F32(raw) => writer.write_f32(f32::from_bits(*raw)).unwrap(),
                Op::CString(s) => writer.write_cstring(s).unwrap(),
            }
        }

        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);

        for op in &ops {
            if is_byte_op(op) {
                reader.realign();
            }
            match op {
                Op::Bit(b) => prop_assert_eq!(reader.read_bit().unwrap(), *b),
                Op::Bits { bits, value } => prop_assert_eq!(reader.read_bits(*bits).unwrap(), *value),
                Op::Realign => reader.realign(),
                Op::U8(v) => prop_assert_eq!(reader.read_u8().unwrap(), *v),
                Op::I16(v) => prop_assert_eq!(reader.read_i16().unwrap(), *v),
                Op::U32(v) => prop_assert_eq!(reader.read_u32().unwrap(), *v),
                Op::I64(v) => prop_assert_eq!(reader.read_i64().unwrap(), *v),
                Op::F32(raw) => prop_assert_eq!(reader.read_f32().unwrap().to_bits(), *raw),
                Op::CString(s) => prop_assert_eq!(&reader.read_cstring().unwrap(), s),
            }
        }
    }

    #[test]
    fn prop_reader_never_panics(data in prop::collection::vec(any::<u8>(), 0..64), runs in prop::collection::vec(0u8..=40, 0..32)) {
        let mut reader = BitReader::new(&data);
        for bits in runs {
            let before = reader.bit_position();
            match reader.read_bits(bits) {
                Ok(_) => prop_assert_eq!(reader.bit_position(), before + bits as usize),
                Err(_) => prop_assert_eq!(reader.bit_position(), before),
            }
        }
    }
}
