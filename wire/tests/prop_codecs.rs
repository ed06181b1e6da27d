use bitstream::{BitReader, BitWriter};
use proptest::prelude::*;
use wire::{Guid128, Quaternion, Vector3};

proptest! {
    #[test]
    fn prop_guid_packed_roundtrip(high in any::<u64>(), low in any::<u64>()) {
        let guid = Guid128::new(high, low);
        let mut writer = BitWriter::new();
        guid.write_packed(&mut writer).unwrap();
        let bytes = writer.finish();

        let present = high.to_le_bytes().iter().chain(low.to_le_bytes().iter())
            .filter(|b| **b != 0)
            .count();
        prop_assert_eq!(bytes.len(), 2 + present);

        let mut reader = BitReader::new(&bytes);
        prop_assert_eq!(Guid128::read_packed(&mut reader).unwrap(), guid);
        prop_assert!(reader.is_empty());
    }

    #[test]
    fn prop_guid_reader_never_panics(data in proptest::collection::vec(any::<u8>(), 0..24)) {
        let mut reader = BitReader::new(&data);
        let _ = Guid128::read_packed(&mut reader);
    }

    #[test]
    fn prop_packed_vector_is_a_fixed_point(packed in any::<i32>()) {
        let v = Vector3::unpack(packed);
        prop_assert_eq!(v.pack(), packed);
    }

    #[test]
    fn prop_packed_quaternion_components_roundtrip(packed in any::<i64>()) {
        let q = Quaternion::unpack(packed);
        prop_assert_eq!(q.pack(), packed);
        prop_assert!(q.w >= 0.0);
    }
}
