//! Run-length pixel block codec.
//!
//! A stored block is a bare sequence of `[3-byte value][u8 count]` records
//! with no header and no terminator; the enclosing directory entry bounds
//! the record stream. Each record expands to `count` copies of its value.
//!
//! The packer that produced the authentic archives additionally wrote a
//! 4-byte little-endian `source length - 2` header ahead of the records,
//! which the extraction side never consumes. [`encode`] reproduces that
//! header byte-for-byte; treat it as a suspected format mismatch until it
//! can be checked against more shipped archives, and strip it before
//! handing the records to [`decode`].

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{Error, Result};

/// Size of one stored record: 3 value bytes plus the repeat count.
pub const RECORD_LEN: usize = 4;

/// Expand a record stream until the slice is exhausted.
///
/// A trailing partial record means the entry was cut short and is an error,
/// never silently dropped.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());
    let mut records = data.chunks_exact(RECORD_LEN);
    for record in &mut records {
        let count = usize::from(record[3]);
        for _ in 0..count {
            out.extend_from_slice(&record[..3]);
        }
    }
    if !records.remainder().is_empty() {
        return Err(Error::Truncated {
            offset: data.len() - records.remainder().len(),
        });
    }
    Ok(out)
}

/// Store a pixel buffer as one record per 3-byte group, each with count 1.
///
/// No run detection is performed; the output is the header followed by
/// `len / 3` fixed-count records. The `len - 2` header value wraps for
/// sources shorter than two bytes.
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() % 3 != 0 {
        return Err(Error::MisalignedPixels { len: data.len() });
    }
    let mut out = Vec::with_capacity(data.len() / 3 * RECORD_LEN + 4);
    out.write_u32::<LittleEndian>((data.len() as u32).wrapping_sub(2))?;
    for group in data.chunks_exact(3) {
        out.extend_from_slice(group);
        out.push(1);
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encode_fixed_count_records() -> Result<()> {
        let source: Vec<u8> = b"\x01\x02\x03".repeat(5);
        let block = encode(&source)?;
        // 15 source bytes give header 13, then five count-1 records.
        assert_eq!(&block[..4], [0x0D, 0x00, 0x00, 0x00]);
        assert_eq!(block.len(), 4 + 5 * RECORD_LEN);
        for record in block[4..].chunks_exact(RECORD_LEN) {
            assert_eq!(record, [0x01, 0x02, 0x03, 0x01]);
        }
        Ok(())
    }

    #[test]
    fn decode_ignores_no_header() -> Result<()> {
        // The record stream alone, without the encoder's header.
        let source: Vec<u8> = b"\x01\x02\x03".repeat(5);
        let block = encode(&source)?;
        assert_eq!(decode(&block[4..])?, source);
        Ok(())
    }

    #[test]
    fn decode_expands_counts() -> Result<()> {
        let records = [0xAA, 0xBB, 0xCC, 0x03, 0x11, 0x22, 0x33, 0x01];
        let expected = [
            0xAA, 0xBB, 0xCC, 0xAA, 0xBB, 0xCC, 0xAA, 0xBB, 0xCC, 0x11, 0x22, 0x33,
        ];
        assert_eq!(decode(&records)?, expected);
        Ok(())
    }

    #[test]
    fn decode_zero_count_record() -> Result<()> {
        assert_eq!(decode(&[0xAA, 0xBB, 0xCC, 0x00])?, Vec::<u8>::new());
        Ok(())
    }

    #[test]
    fn round_trip_empty() -> Result<()> {
        let block = encode(b"")?;
        assert_eq!(decode(&block[4..])?, b"");
        Ok(())
    }

    #[test]
    fn round_trip_repeated_byte() -> Result<()> {
        let source = vec![0x5A; 300];
        let block = encode(&source)?;
        assert_eq!(decode(&block[4..])?, source);
        Ok(())
    }

    #[test]
    fn decode_partial_record() {
        assert!(matches!(
            decode(&[0x01, 0x02, 0x03, 0x01, 0x04, 0x05]),
            Err(Error::Truncated { offset: 4 })
        ));
    }

    #[test]
    fn encode_misaligned_input() {
        assert!(matches!(
            encode(&[0x01, 0x02]),
            Err(Error::MisalignedPixels { len: 2 })
        ));
    }
}
