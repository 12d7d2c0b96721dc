use std::io::{Cursor, Read, Write};

use pretty_assertions::assert_eq;
use tracing_test::traced_test;

use fga_container::error::Result;
use fga_container::{FgaArchive, FgaWriter};

const SEGMENT_LEN: usize = 0x318;

/// Deterministic payload for entry `i`, sized to straddle record shapes.
fn payload(i: usize) -> Vec<u8> {
    (0..(i % 97) + 3).map(|b| (b * 7 + i) as u8).collect()
}

#[traced_test]
#[test]
fn pack_and_reparse_preserves_entries() -> Result<()> {
    // 71 entries span three directory segments.
    let count = 71;
    let mut fga = FgaWriter::new(Cursor::new(Vec::new()));
    for i in 0..count {
        fga.start_file(format!("E{i:03}.SRP"))?;
        fga.write_all(&payload(i))?;
    }
    let container = fga.finish()?.into_inner();

    let mut archive = FgaArchive::new(Cursor::new(&container))?;
    assert_eq!(archive.len(), count);

    for i in 0..count {
        let mut file = archive.by_index(i)?;
        assert_eq!(file.name(), format!("E{i:03}.SRP"));
        assert_eq!(file.size() as usize, payload(i).len());

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        assert_eq!(bytes, payload(i));
    }

    Ok(())
}

#[test]
fn layout_interleaves_segments_and_payloads() -> Result<()> {
    let count = 40;
    let mut fga = FgaWriter::new(Cursor::new(Vec::new()));
    for i in 0..count {
        fga.start_file(format!("E{i:03}.EBP"))?;
        fga.write_all(&payload(i))?;
    }
    let container = fga.finish()?.into_inner();

    // First block: segment at 0, then the first 32 payloads back to back.
    let first_block: usize = (0..32).map(|i| payload(i).len()).sum();
    let mut expected = Vec::new();
    for i in 0..32 {
        expected.extend(payload(i));
    }
    assert_eq!(&container[SEGMENT_LEN..SEGMENT_LEN + first_block], expected);

    // The second segment starts one stride behind the first payload run and
    // is followed by the remaining payloads.
    let second_segment = SEGMENT_LEN + first_block;
    let sentinel = &container[32 * 24..SEGMENT_LEN];
    assert_eq!(&sentinel[..12], [0xFF; 12]);
    assert_eq!(
        u32::from_le_bytes(sentinel[12..16].try_into().unwrap()) as usize,
        second_segment
    );

    let second_block: usize = (32..count).map(|i| payload(i).len()).sum();
    assert_eq!(
        container.len(),
        second_segment + SEGMENT_LEN + second_block
    );

    // Offsets recorded in the second segment point behind both segments.
    let first_late_entry = &container[second_segment..second_segment + 24];
    assert_eq!(
        u32::from_le_bytes(first_late_entry[12..16].try_into().unwrap()) as usize,
        second_segment + SEGMENT_LEN
    );

    Ok(())
}

#[test]
fn packed_payloads_survive_codec_round_trip() -> Result<()> {
    // End to end: encode text entries, pack, reparse, slice, decode.
    let sources: Vec<(String, Vec<u8>)> = (0..5)
        .map(|i| {
            (
                format!("TXT{i}.SRP"),
                format!("entry {i}: the quick brown fox jumps over the lazy dog")
                    .into_bytes(),
            )
        })
        .collect();

    let mut fga = FgaWriter::new(Cursor::new(Vec::new()));
    for (name, text) in &sources {
        fga.start_file(name)?;
        let block = fga_codec::huffman::encode(text).expect("encoding cannot fail here");
        fga.write_all(&block)?;
    }
    let container = fga.finish()?.into_inner();

    let mut archive = FgaArchive::new(Cursor::new(&container))?;
    for (name, text) in &sources {
        let mut block = Vec::new();
        archive.by_name(name)?.read_to_end(&mut block)?;
        let decoded = fga_codec::huffman::decode(&block).expect("decoding what we packed");
        assert_eq!(&decoded, text);
    }

    Ok(())
}
