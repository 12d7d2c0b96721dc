//! Types for reading FGA containers
//!

use binrw::BinRead;
use encoding_rs::SHIFT_JIS;
use indexmap::IndexMap;
use std::{
    borrow::Cow,
    fmt::{self, Debug},
    io::{self, Cursor, Read, Seek, SeekFrom},
    sync::Arc,
};
use tracing::debug;

use crate::{
    error::{Error, FileNotFoundError, Result},
    types::{DirectorySlot, FgaEntry, ENTRY_SLOTS, SEGMENT_LEN},
};

/// Upper bound on directory chain nesting before input is treated as corrupt.
///
/// Real containers chain one segment per 32 entries; this allows far more
/// than any shipped archive while keeping malformed input from walking the
/// stack indefinitely.
pub(crate) const MAX_CHAIN_DEPTH: usize = 1024;

/// A struct for reading an entry from an FGA container
pub struct FgaFile<'a, R: Read + Seek> {
    data: Cow<'a, FgaEntry>,
    reader: io::Take<&'a mut R>,
}

impl<R: Read + Seek> Debug for FgaFile<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FgaFile({:#?})", self.get_metadata())
    }
}

/// Methods for retrieving information on FGA container entries
impl<R: Read + Seek> FgaFile<'_, R> {
    /// Get the name of the entry
    ///
    /// # Warnings
    ///
    /// It is dangerous to use this name directly when extracting an archive.
    /// It may contain an absolute path (`/etc/shadow`), or break out of the
    /// current directory (`../runtime`). Carelessly writing to these paths
    /// allows an attacker to craft a container that will overwrite critical
    /// files.
    ///
    pub fn name(&self) -> &str {
        &self.get_metadata().name
    }

    /// Get the name of the entry, in the raw (internal) byte representation.
    ///
    /// Useful when the Shift-JIS decoding of [`FgaFile::name`] was lossy.
    pub fn name_raw(&self) -> &[u8] {
        &self.get_metadata().name_raw
    }

    /// Get the size of the entry's payload, in bytes
    pub fn size(&self) -> u32 {
        self.get_metadata().size
    }

    /// Get the absolute offset of the entry's payload
    pub fn offset(&self) -> u32 {
        self.get_metadata().offset
    }

    fn get_metadata(&self) -> &FgaEntry {
        self.data.as_ref()
    }
}

impl<R: Read + Seek> Read for FgaFile<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

#[derive(Debug)]
pub(crate) struct Shared {
    files: IndexMap<Box<str>, FgaEntry>,
}

/// FGA container reader
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_fga_contents(reader: impl Read + Seek) -> fga_container::error::Result<()> {
///     let mut fga = fga_container::FgaArchive::new(reader)?;
///
///     for i in 0..fga.len() {
///         let mut file = fga.by_index(i)?;
///         println!("Filename: {}", file.name());
///         std::io::copy(&mut file, &mut std::io::stdout())?;
///     }
///
///     Ok(())
/// }
/// ```
pub struct FgaArchive<R> {
    reader: R,
    shared: Arc<Shared>,
}

impl<R> FgaArchive<R> {
    /// Total size of the entry payloads in the container, if it can be
    /// known. Doesn't include the directory segments themselves.
    pub fn total_size(&self) -> Option<u64> {
        let mut total = 0u64;
        for file in self.shared.files.values() {
            total = total.checked_add(u64::from(file.size))?;
        }
        Some(total)
    }
}

impl<R: Read + Seek> FgaArchive<R> {
    /// Read an FGA container, collecting the entries of the directory chain
    /// starting at the reader's current position.
    pub fn new(mut reader: R) -> Result<FgaArchive<R>> {
        let entries = parse_chain(&mut reader, 0)?;

        let mut files = IndexMap::with_capacity(entries.len());
        for entry in entries {
            if let Some(displaced) = files.insert(entry.name.clone(), entry) {
                debug!(name = %displaced.name, "duplicate entry name, keeping the later slot");
            }
        }

        Ok(FgaArchive {
            reader,
            shared: Shared { files }.into(),
        })
    }

    /// Number of entries contained in this container.
    pub fn len(&self) -> usize {
        self.shared.files.len()
    }

    /// Whether this container holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over all the entry names in this container.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.shared.files.keys().map(|s| s.as_ref())
    }

    /// Get the index of an entry by name, if it's present.
    #[inline(always)]
    pub fn index_for_name(&self, name: &str) -> Option<usize> {
        self.shared.files.get_index_of(name)
    }

    /// Get the name of an entry, if it's present.
    #[inline(always)]
    pub fn name_for_index(&self, index: usize) -> Option<&str> {
        self.shared
            .files
            .get_index(index)
            .map(|(name, _)| name.as_ref())
    }

    /// Search for an entry by name
    pub fn by_name(&mut self, name: &str) -> Result<FgaFile<'_, R>> {
        let Some(index) = self.shared.files.get_index_of(name) else {
            return Err(Error::FileNotFound(FileNotFoundError::Name(
                name.to_owned(),
            )));
        };
        self.by_index(index)
    }

    /// Get a contained entry by index
    pub fn by_index(&mut self, file_number: usize) -> Result<FgaFile<'_, R>> {
        let (_, data) = self
            .shared
            .files
            .get_index(file_number)
            .ok_or(Error::FileNotFound(FileNotFoundError::Index(file_number)))?;

        self.reader.seek(SeekFrom::Start(u64::from(data.offset)))?;
        Ok(FgaFile {
            data: Cow::Borrowed(data),
            reader: self.reader.by_ref().take(u64::from(data.size)),
        })
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Parse one 792-byte segment at the reader's current position, following
/// sentinel chains recursively.
///
/// Chained entries are appended at the point their sentinel appears. The
/// reader position afterwards is unspecified; entries carry absolute offsets
/// and nothing may depend on where a parse leaves the cursor.
fn parse_chain<R: Read + Seek>(reader: &mut R, depth: usize) -> Result<Vec<FgaEntry>> {
    if depth >= MAX_CHAIN_DEPTH {
        return Err(Error::ChainTooDeep {
            limit: MAX_CHAIN_DEPTH,
        });
    }

    let base = reader.stream_position()?;
    let mut segment = vec![0u8; SEGMENT_LEN];
    reader.read_exact(&mut segment).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::TruncatedSegment { offset: base }
        } else {
            Error::IOError(e)
        }
    })?;
    debug!(offset = base, depth, "parsing directory segment");

    let mut entries = Vec::new();
    let mut slots = Cursor::new(&segment[..]);
    for slot_index in 0..=ENTRY_SLOTS {
        let slot = DirectorySlot::read(&mut slots)?;
        if slot.is_sentinel() {
            if slot.offset != 0 {
                reader.seek(SeekFrom::Start(u64::from(slot.offset)))?;
                entries.extend(parse_chain(reader, depth + 1)?);
            }
            continue;
        }
        if slot.is_terminator() {
            break;
        }
        if slot_index == ENTRY_SLOTS {
            // The 33rd slot may only ever be a sentinel or a terminator.
            return Err(Error::BadSentinel { offset: base });
        }
        entries.push(entry_from_slot(&slot));
    }

    Ok(entries)
}

fn entry_from_slot(slot: &DirectorySlot) -> FgaEntry {
    let trimmed = match slot.name.iter().rposition(|&b| b != 0) {
        Some(last) => &slot.name[..=last],
        None => &[],
    };
    let (name, _, _) = SHIFT_JIS.decode(trimmed);
    FgaEntry {
        name: name.into_owned().into(),
        name_raw: trimmed.into(),
        offset: slot.offset,
        size: slot.size,
    }
}
