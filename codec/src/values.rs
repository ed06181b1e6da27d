//! Update-mask value blocks.
//!
//! A values block is a mask-word count byte, that many little-endian `u32`
//! mask words, then one `u32` per set mask bit in ascending bit order.
//! A collection block has the same outer mask; each set bit then carries a
//! `u16` count word (bit 15 flags one extra `u32`), the collection's own
//! mask words, and one `u32` per set bit of that mask.

use std::collections::BTreeMap;

use bitstream::BitResult;
use wire::{FieldPath, Packet};

const DYNAMIC_EXTRA_FLAG: u16 = 0x8000;
const DYNAMIC_COUNT_MASK: u16 = 0x7FFF;

/// Entries of one variable-length collection field, keyed by index.
pub type DynamicField = BTreeMap<u32, u32>;

/// The fields one values or create block carries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValuesUpdate {
    pub fields: BTreeMap<u32, u32>,
    pub dynamic_fields: BTreeMap<u32, DynamicField>,
}

impl ValuesUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.dynamic_fields.is_empty()
    }

    /// Overwrites every field present in `other`; absent fields are kept.
    pub fn merge_from(&mut self, other: &Self) {
        for (&index, &value) in &other.fields {
            self.fields.insert(index, value);
        }
        for (&index, entries) in &other.dynamic_fields {
            let slot = self.dynamic_fields.entry(index).or_default();
            for (&entry, &value) in entries {
                slot.insert(entry, value);
            }
        }
    }
}

/// Reads both blocks of a values update.
pub fn read_values_update(packet: &mut Packet<'_>, path: &FieldPath) -> BitResult<ValuesUpdate> {
    let fields = read_values_block(packet, path)?;
    let dynamic_fields = read_dynamic_block(packet, path)?;
    Ok(ValuesUpdate {
        fields,
        dynamic_fields,
    })
}

/// Reads a flat values block.
pub fn read_values_block(
    packet: &mut Packet<'_>,
    path: &FieldPath,
) -> BitResult<BTreeMap<u32, u32>> {
    let blocks = packet.read_u8("BlockCount", path)?;
    let mask = read_mask(packet, usize::from(blocks), path)?;
    let mut fields = BTreeMap::new();
    for index in set_bits(&mask) {
        let value = packet.read_u32("Value", &path.child("Fields").at(index as usize))?;
        fields.insert(index, value);
    }
    Ok(fields)
}

/// Reads a collection values block.
pub fn read_dynamic_block(
    packet: &mut Packet<'_>,
    path: &FieldPath,
) -> BitResult<BTreeMap<u32, DynamicField>> {
    let blocks = packet.read_u8("DynamicBlockCount", path)?;
    let mask = read_mask(packet, usize::from(blocks), path)?;
    let mut collections = BTreeMap::new();
    for index in set_bits(&mask) {
        let field_path = path.child("DynamicFields").at(index as usize);
        let word = packet.read_u16("DynamicCount", &field_path)?;
        if word & DYNAMIC_EXTRA_FLAG != 0 {
            packet.read_u32("DynamicChangeMask", &field_path)?;
        }
        let count = usize::from(word & DYNAMIC_COUNT_MASK);
        let entry_mask = read_mask(packet, count.div_ceil(32), &field_path)?;
        let mut entries = DynamicField::new();
        for entry in set_bits(&entry_mask) {
            let value = packet.read_u32("Value", &field_path.at(entry as usize))?;
            entries.insert(entry, value);
        }
        collections.insert(index, entries);
    }
    Ok(collections)
}

fn read_mask(packet: &mut Packet<'_>, words: usize, path: &FieldPath) -> BitResult<Vec<u32>> {
    let words = packet.check_count(words)?;
    let mut mask = Vec::with_capacity(words);
    for _ in 0..words {
        mask.push(packet.read_u32("Mask", path)?);
    }
    Ok(mask)
}

fn set_bits(mask: &[u32]) -> impl Iterator<Item = u32> + '_ {
    mask.iter().enumerate().flat_map(|(word_index, &word)| {
        (0..32u32)
            .filter(move |bit| word & (1 << bit) != 0)
            .map(move |bit| word_index as u32 * 32 + bit)
    })
}
