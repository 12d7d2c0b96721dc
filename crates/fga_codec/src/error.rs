//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Input ended in the middle of a field
    #[error("input exhausted at byte {offset}")]
    Truncated {
        /// Byte offset at which the input ran out
        offset: usize,
    },

    /// A Huffman internal node id would reach the 511 limit
    #[error("huffman node id {id} reaches the 511 node limit")]
    Capacity {
        /// The id that could not be allocated
        id: u16,
    },

    /// More bits requested than a single read or write supports
    #[error("invalid bit count {count}, at most 32 bits per access")]
    InvalidBitCount {
        /// The requested number of bits
        count: u32,
    },

    /// Pixel data must be a whole number of 3-byte groups
    #[error("pixel buffer of {len} bytes is not divisible into 3-byte groups")]
    MisalignedPixels {
        /// Length of the offending buffer
        len: usize,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
