//! Base types for the structure of FGA container directories.

use binrw::{BinRead, BinWrite};

/// Size in bytes of one directory segment: 32 entry slots plus the sentinel.
pub const SEGMENT_LEN: usize = 0x318;

/// Size in bytes of one directory slot.
pub const SLOT_LEN: usize = 24;

/// Number of entry slots in a segment, excluding the sentinel.
pub const ENTRY_SLOTS: usize = 32;

/// Size of the fixed, NUL-padded name field.
pub const NAME_LEN: usize = 12;

/// The all-0xFF name marking a segment's sentinel slot.
pub const SENTINEL_NAME: [u8; NAME_LEN] = [0xFF; NAME_LEN];

/// One 24-byte directory slot
///
/// Thirty-three of these make up a segment. A slot is one of:
///
/// - an entry: name, absolute offset and size of its payload,
/// - a terminator: zeroed offset and size under a regular name, ending the
///   segment without chaining,
/// - the sentinel: an all-0xFF name whose offset, when non-zero, chains to a
///   continuation segment elsewhere in the container.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct DirectorySlot {
    /// Shift-JIS entry name, NUL-padded to 12 bytes
    pub name: [u8; NAME_LEN],

    /// Absolute offset of the payload, or of the chained segment in a sentinel
    pub offset: u32,

    /// Size of the payload in bytes
    pub size: u32,

    /// Reserved, written as zero
    pub reserved: [u8; 4],
}

impl DirectorySlot {
    /// Build an entry slot over an already encoded name field.
    pub fn entry(name: [u8; NAME_LEN], offset: u32, size: u32) -> Self {
        Self {
            name,
            offset,
            size,
            reserved: [0; 4],
        }
    }

    /// Build the sentinel slot, chaining to `next` when non-zero.
    pub fn sentinel(next: u32) -> Self {
        Self {
            name: SENTINEL_NAME,
            offset: next,
            size: 0,
            reserved: [0; 4],
        }
    }

    /// Whether this slot carries the all-0xFF sentinel name.
    pub fn is_sentinel(&self) -> bool {
        self.name == SENTINEL_NAME
    }

    /// Whether this slot terminates its segment without chaining.
    pub fn is_terminator(&self) -> bool {
        self.offset == 0 && self.size == 0
    }
}

/// Structure representing an FGA directory entry.
#[derive(Debug, Clone, Default)]
pub struct FgaEntry {
    /// Name of the entry, decoded from Shift-JIS
    pub name: Box<str>,
    /// Raw name bytes with the NUL padding trimmed, kept in case the
    /// decoding above was lossy
    pub name_raw: Box<[u8]>,
    /// Absolute offset of the entry's payload
    pub offset: u32,
    /// Size of the entry's payload in bytes
    pub size: u32,
}
