//! Mixed bit/byte cursor primitives for sniffdec.
//!
//! This crate provides [`BitReader`] (the per-message read cursor) and
//! [`BitWriter`] (its mirror, used to build payloads). Bit runs are read
//! most-significant-bit first; byte-granular values are little-endian and
//! may only be read on a byte boundary.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked and never wrap.
//! - **No domain knowledge** - This crate knows nothing about messages, identifiers or entities.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bit(true);
//! writer.write_bits(42, 7).unwrap();
//! writer.write_u16(0x1234).unwrap();
//!
//! let bytes = writer.finish();
//!
//! let mut reader = BitReader::new(&bytes);
//! assert!(reader.read_bit().unwrap());
//! assert_eq!(reader.read_bits(7).unwrap(), 42);
//! assert_eq!(reader.read_u16().unwrap(), 0x1234);
//! ```

mod error;
mod reader;
mod writer;

pub use error::{BitError, BitResult};
pub use reader::{BitReader, MAX_BIT_RUN};
pub use writer::BitWriter;
