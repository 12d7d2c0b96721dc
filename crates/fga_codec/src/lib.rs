//! This library handles the per-entry payload codecs used inside **FGA**
//! resource containers.
//!
//! Two record formats are packed into the shared container and are decoded
//! after an entry's bytes have been sliced out by
//! [`fga_container`](https://docs.rs/fga_container):
//!
//! ## Huffman text blocks
//!
//! | Field          | Description                                          |
//! |----------------|------------------------------------------------------|
//! | Symbol count   | 4 bytes, little endian: decoded length in bytes      |
//! | Tree bits      | Recursive leaf/internal description, MSB-first       |
//! | Path bits      | One left/right bit per tree level, per symbol        |
//! | Padding        | Zero bits to the next byte boundary, never examined  |
//!
//! See [`huffman`] for the tree grammar and the node id cap.
//!
//! ## Run-length pixel blocks
//!
//! A headerless sequence of `[3-byte value][1-byte count]` records, bounded
//! only by the entry size recorded in the container directory. See [`rle`]
//! for the header asymmetry the packer side carries.
//!
//! Both codecs are pure transformations over in-memory byte buffers; nothing
//! in this crate touches the filesystem.

pub mod bitio;
pub mod error;
pub mod huffman;
pub mod rle;

pub use bitio::{BitReader, BitWriter};
