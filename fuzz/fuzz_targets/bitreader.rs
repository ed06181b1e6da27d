#![no_main]

use bitstream::BitReader;
use libfuzzer_sys::fuzz_target;
use wire::{Guid128, Quaternion, Vector3};

fuzz_target!(|data: &[u8]| {
    let mut reader = BitReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 8;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_bit();
            }
            1 => {
                let bits = (data[idx.saturating_sub(1)] % 40).saturating_add(1);
                let _ = reader.read_bits(bits);
            }
            2 => reader.realign(),
            3 => {
                let _ = reader.read_u32();
            }
            4 => {
                let _ = reader.read_cstring();
            }
            5 => {
                let _ = Guid128::read_packed(&mut reader);
            }
            6 => {
                let _ = Vector3::read_packed(&mut reader);
            }
            _ => {
                let _ = Quaternion::read_packed(&mut reader);
            }
        }
    }
});
