//! Types for writing FGA containers
//!

use binrw::BinWrite;
use encoding_rs::SHIFT_JIS;
use std::io::{self, Cursor, Write};
use std::mem;
use tracing::instrument;

use crate::error::{Error, Result};
use crate::types::{DirectorySlot, ENTRY_SLOTS, NAME_LEN, SEGMENT_LEN};

/// FGA container generator
///
/// Entries are grouped into blocks of 32. Each block is laid out as one
/// 792-byte directory segment followed immediately by the block's payload
/// bytes; the sentinel slot of every segment but the last points at the next
/// segment in the file. This interleaving is what original containers carry
/// and what a byte-exact repack must reproduce.
///
/// ```
/// # fn doit() -> fga_container::error::Result<()>
/// # {
/// use std::io::Write;
/// use fga_container::FgaWriter;
///
/// // We use a buffer here, though you'd normally use a `File`
/// let mut fga = FgaWriter::new(std::io::Cursor::new(Vec::new()));
///
/// fga.start_file("HELLO.SRP")?;
/// fga.write(b"compressed payload bytes")?;
///
/// // Apply the changes you've made.
/// fga.finish()?;
///
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct FgaWriter<W: Write> {
    inner: W,
    /// Finished entries waiting for their segment to fill
    pending: Vec<([u8; NAME_LEN], Vec<u8>)>,
    current: Option<([u8; NAME_LEN], Vec<u8>)>,
    /// Running absolute offset of the next payload byte
    offset: u32,
}

impl<W: Write> FgaWriter<W> {
    /// Initializes the container.
    ///
    /// Before writing to this object, the [`FgaWriter::start_file`] function
    /// should be called. Nothing reaches the underlying writer until a full
    /// block of 32 entries is available or [`FgaWriter::finish`] is called.
    pub fn new(inner: W) -> FgaWriter<W> {
        FgaWriter {
            inner,
            pending: Vec::with_capacity(ENTRY_SLOTS),
            current: None,
            offset: SEGMENT_LEN as u32,
        }
    }

    /// Returns true if an entry is currently open for writing.
    pub const fn is_writing_file(&self) -> bool {
        self.current.is_some()
    }

    /// Start a new entry under `name`.
    ///
    /// The name must fit the fixed 12-byte field once encoded as Shift-JIS;
    /// anything longer or unencodable is refused outright rather than
    /// truncated.
    #[instrument(skip(self, name), err)]
    pub fn start_file(&mut self, name: impl AsRef<str>) -> Result<()> {
        self.finish_file();
        if self.pending.len() == ENTRY_SLOTS {
            self.flush_block(false)?;
        }

        let name = encode_name(name.as_ref())?;
        self.current = Some((name, Vec::new()));

        Ok(())
    }

    fn finish_file(&mut self) {
        if let Some(entry) = self.current.take() {
            self.pending.push(entry);
        }
    }

    /// Write one block: its directory segment, then its payloads in order.
    #[instrument(skip(self), fields(entries = self.pending.len()), err)]
    fn flush_block(&mut self, last: bool) -> Result<()> {
        let block = mem::take(&mut self.pending);

        let mut segment = Cursor::new(Vec::with_capacity(SEGMENT_LEN));
        for (name, data) in &block {
            DirectorySlot::entry(*name, self.offset, data.len() as u32).write(&mut segment)?;
            self.offset += data.len() as u32;
        }
        for _ in block.len()..ENTRY_SLOTS {
            DirectorySlot::default().write(&mut segment)?;
        }
        // At this point the running offset is exactly where the next
        // segment will start, directly behind this block's payloads.
        let next = if last { 0 } else { self.offset };
        DirectorySlot::sentinel(next).write(&mut segment)?;

        self.inner.write_all(&segment.into_inner())?;
        for (_, data) in &block {
            self.inner.write_all(data)?;
        }
        self.offset += SEGMENT_LEN as u32;

        Ok(())
    }

    /// Finish the last entry and write out the remaining block.
    ///
    /// A container with no entries still receives one all-zero segment with
    /// a zero sentinel, so the result always parses.
    ///
    /// This will return the writer, but one should normally not append any
    /// data to the end of the file.
    #[instrument(skip(self), err)]
    pub fn finish(mut self) -> Result<W> {
        self.finish_file();
        self.flush_block(true)?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for FgaWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some((_, data)) = self.current.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "No file has been started",
            ));
        };
        data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn encode_name(name: &str) -> Result<[u8; NAME_LEN]> {
    let (encoded, _, unmappable) = SHIFT_JIS.encode(name);
    if unmappable {
        return Err(Error::NameEncoding {
            name: name.to_owned(),
        });
    }
    if encoded.len() > NAME_LEN {
        return Err(Error::NameTooLong {
            name: name.to_owned(),
        });
    }
    let mut field = [0u8; NAME_LEN];
    field[..encoded.len()].copy_from_slice(&encoded);
    Ok(field)
}

#[cfg(test)]
mod test {
    use std::io::{Cursor, Write};

    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::error::{Error, Result};
    use crate::types::{ENTRY_SLOTS, SEGMENT_LEN, SENTINEL_NAME, SLOT_LEN};
    use crate::write::{encode_name, FgaWriter};

    fn slot_bytes(container: &[u8], segment: usize, slot: usize) -> &[u8] {
        let base = segment + slot * SLOT_LEN;
        &container[base..base + SLOT_LEN]
    }

    #[traced_test]
    #[test]
    fn write_single_block() -> Result<()> {
        let mut fga = FgaWriter::new(Cursor::new(Vec::new()));
        fga.start_file("A.EBP")?;
        fga.write_all(b"\x01\x02\x03\x04")?;
        fga.start_file("B.EBP")?;
        fga.write_all(b"\x05\x06")?;
        let container = fga.finish()?.into_inner();

        assert_eq!(container.len(), SEGMENT_LEN + 6);

        #[rustfmt::skip]
        let first = [
            0x41, 0x2E, 0x45, 0x42, 0x50, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x18, 0x03, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        #[rustfmt::skip]
        let second = [
            0x42, 0x2E, 0x45, 0x42, 0x50, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x1C, 0x03, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(slot_bytes(&container, 0, 0), first);
        assert_eq!(slot_bytes(&container, 0, 1), second);

        // Pad slots stay zeroed, the final sentinel carries no chain.
        assert_eq!(slot_bytes(&container, 0, 2), [0u8; SLOT_LEN]);
        let sentinel = slot_bytes(&container, 0, ENTRY_SLOTS);
        assert_eq!(&sentinel[..12], SENTINEL_NAME);
        assert_eq!(&sentinel[12..], [0u8; 12]);

        // Payloads follow the segment back to back.
        assert_eq!(&container[SEGMENT_LEN..], b"\x01\x02\x03\x04\x05\x06");

        Ok(())
    }

    #[traced_test]
    #[test]
    fn write_chains_full_blocks() -> Result<()> {
        // 33 entries of 3 bytes each force a second segment.
        let mut fga = FgaWriter::new(Cursor::new(Vec::new()));
        for i in 0..=ENTRY_SLOTS {
            fga.start_file(format!("E{i:03}.SRP"))?;
            fga.write_all(b"abc")?;
        }
        let container = fga.finish()?.into_inner();

        let second_segment = SEGMENT_LEN + ENTRY_SLOTS * 3;
        assert_eq!(container.len(), second_segment + SEGMENT_LEN + 3);

        // First sentinel points at the second segment.
        let sentinel = slot_bytes(&container, 0, ENTRY_SLOTS);
        assert_eq!(&sentinel[..12], SENTINEL_NAME);
        assert_eq!(
            u32::from_le_bytes(sentinel[12..16].try_into().unwrap()),
            second_segment as u32
        );

        // The 33rd entry lands behind the second segment, which ends the
        // chain with a zero sentinel.
        let last = slot_bytes(&container, second_segment, 0);
        assert_eq!(
            u32::from_le_bytes(last[12..16].try_into().unwrap()),
            (second_segment + SEGMENT_LEN) as u32
        );
        let sentinel = slot_bytes(&container, second_segment, ENTRY_SLOTS);
        assert_eq!(&sentinel[12..16], [0u8; 4]);

        Ok(())
    }

    #[test]
    fn write_empty_container_still_parses() -> Result<()> {
        let container = FgaWriter::new(Cursor::new(Vec::new()))
            .finish()?
            .into_inner();

        assert_eq!(container.len(), SEGMENT_LEN);
        assert_eq!(&container[..SLOT_LEN], [0u8; SLOT_LEN]);
        let sentinel = &container[ENTRY_SLOTS * SLOT_LEN..];
        assert_eq!(&sentinel[..12], SENTINEL_NAME);
        assert_eq!(&sentinel[12..], [0u8; 12]);

        Ok(())
    }

    #[test]
    fn write_without_starting_a_file() {
        let mut fga = FgaWriter::new(Cursor::new(Vec::new()));
        assert!(fga.write(b"orphan bytes").is_err());
    }

    #[test]
    fn name_fits_when_exactly_twelve_bytes() -> Result<()> {
        assert_eq!(encode_name("TWELVE.CHARS")?, *b"TWELVE.CHARS");
        Ok(())
    }

    #[test]
    fn name_encodes_as_shift_jis() -> Result<()> {
        // Three double-byte characters, NUL-padded to the fixed field.
        assert_eq!(
            encode_name("テスト")?,
            [0x83, 0x65, 0x83, 0x58, 0x83, 0x67, 0, 0, 0, 0, 0, 0]
        );
        Ok(())
    }

    #[test]
    fn name_too_long_is_refused() {
        let mut fga = FgaWriter::new(Cursor::new(Vec::new()));
        assert!(matches!(
            fga.start_file("THIRTEEN.BYTE"),
            Err(Error::NameTooLong { .. })
        ));
    }

    #[test]
    fn name_outside_shift_jis_is_refused() {
        let mut fga = FgaWriter::new(Cursor::new(Vec::new()));
        assert!(matches!(
            fga.start_file("💾.EBP"),
            Err(Error::NameEncoding { .. })
        ));
    }
}
