//! This library handles reading from and creating **FGA** resource
//! containers.
//!
//! # FGA Container Format Documentation
//!
//! An FGA container stores named resource entries behind a chain of fixed
//! size directory segments. The same container layout carries both of the
//! known payload formats (run-length pixel blocks and Huffman text blocks,
//! handled by the `fga_codec` crate); the directory itself is agnostic to
//! what the payload bytes mean.
//!
//! ## Directory Segments
//!
//! A segment is exactly 792 (0x318) bytes: 32 entry slots followed by one
//! sentinel slot, each 24 bytes.
//!
//! | Offset (bytes) | Field     | Description                                 |
//! |----------------|-----------|---------------------------------------------|
//! | 0x00           | Name      | 12 bytes: Shift-JIS entry name, NUL-padded  |
//! | 0x0C           | Offset    | 4 bytes LE: absolute offset of the payload  |
//! | 0x10           | Size      | 4 bytes LE: payload size in bytes           |
//! | 0x14           | Reserved  | 4 bytes: written as zero                    |
//!
//! Slot semantics, checked in order:
//!
//! - A name of 12 `0xFF` bytes marks the **sentinel**. A non-zero offset is
//!   the absolute position of a continuation segment whose entries belong to
//!   the same directory; zero ends the chain.
//! - A slot with offset and size both zero **terminates** the segment; later
//!   slots are not examined.
//! - Anything else is a regular entry.
//!
//! ## Interleaved Layout
//!
//! Writers emit `segment, payloads, segment, payloads, …`: each full block
//! of 32 entries produces one segment followed immediately by that block's
//! payload bytes, and the segment's sentinel points at the position right
//! behind those payloads where the next segment begins. The first segment
//! sits at offset 0, so the first payload byte of a container always lands
//! at 0x318.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.fga`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Name Encoding**: Shift-JIS, at most 12 bytes, NUL-trimmed on read
//!

pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use read::FgaArchive;
pub use types::FgaEntry;
pub use write::FgaWriter;
