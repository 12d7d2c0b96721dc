//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// A directory segment extends past the end of the container
    #[error("directory segment at {offset:#x} is truncated")]
    TruncatedSegment {
        /// Absolute offset of the segment
        offset: u64,
    },

    /// The 33rd slot of a full segment is neither a sentinel nor a terminator
    #[error("segment at {offset:#x} ends in a malformed sentinel slot")]
    BadSentinel {
        /// Absolute offset of the segment
        offset: u64,
    },

    /// Directory chaining nested deeper than any sane container
    #[error("directory chain exceeds {limit} segments, input is likely corrupt")]
    ChainTooDeep {
        /// The enforced nesting limit
        limit: usize,
    },

    /// An entry name exceeds the fixed 12-byte field
    #[error("entry name {name:?} exceeds 12 bytes when encoded as Shift-JIS")]
    NameTooLong {
        /// The offending name
        name: String,
    },

    /// An entry name has no Shift-JIS representation
    #[error("entry name {name:?} cannot be encoded as Shift-JIS")]
    NameEncoding {
        /// The offending name
        name: String,
    },

    /// Unable to find requested file
    #[error("unable to find requested file")]
    FileNotFound(#[from] FileNotFoundError),
}

/// Error type to provide further information when a file has not been found
#[derive(Error, Diagnostic, Debug)]
#[error("unable to find requested file")]
pub enum FileNotFoundError {
    /// at index {0}
    #[error("at index {0}")]
    Index(usize),

    /// by name {0}
    #[error("by name {0}")]
    Name(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
