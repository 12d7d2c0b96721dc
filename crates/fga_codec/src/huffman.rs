//! Huffman-coded text block codec.
//!
//! A compressed block is `[u32 LE symbol count][tree bits][symbol path bits]`
//! padded with zeros to a byte boundary. The tree carries no implicit
//! structure; it is serialized in full ahead of the symbol bits and rebuilt
//! from scratch every time a block is decoded.
//!
//! The tree grammar, read MSB-first:
//!
//! - bit `0` followed by an 8-bit literal is a leaf (the decoded byte),
//! - bit `1` introduces an internal node: its left subtree follows, then its
//!   right subtree.
//!
//! Leaves are identified by their literal value (0-255). Internal node ids
//! are allocated monotonically from 256 and must never reach 511, bounding
//! the tree at 255 internal nodes (enough to chain all 256 byte values).
//!
//! The encoder builds a left-leaning chain ordered by descending frequency
//! rather than a weight-balanced merge. That trades compression ratio for a
//! construction the original packer used; changing it would still decode but
//! would no longer reproduce authentic archive bytes.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, Result};

/// First id available to internal nodes; anything below is a leaf byte.
const FIRST_NODE_ID: u16 = 256;

/// Internal node ids must stay strictly below this value.
const NODE_ID_LIMIT: u16 = 511;

/// Bitset over the 256 possible leaf values.
type SymbolSet = [u64; 4];

fn set_contains(set: &SymbolSet, byte: u8) -> bool {
    set[(byte >> 6) as usize] & (1u64 << (byte & 63)) != 0
}

fn set_insert(set: &mut SymbolSet, byte: u8) {
    set[(byte >> 6) as usize] |= 1u64 << (byte & 63);
}

/// Child tables for the internal nodes, indexed by `id - 256`.
///
/// A child is either a leaf value (< 256) or an earlier internal id.
#[derive(Debug, Default)]
struct Tree {
    left: Vec<u16>,
    right: Vec<u16>,
}

impl Tree {
    /// Reserve the next internal id with placeholder children.
    fn reserve(&mut self) -> Result<u16> {
        let id = FIRST_NODE_ID + self.left.len() as u16;
        if id >= NODE_ID_LIMIT {
            return Err(Error::Capacity { id });
        }
        self.left.push(0);
        self.right.push(0);
        Ok(id)
    }

    /// Allocate the next internal id over a known child pair.
    fn alloc(&mut self, left: u16, right: u16) -> Result<u16> {
        let id = self.reserve()?;
        self.left[(id - FIRST_NODE_ID) as usize] = left;
        self.right[(id - FIRST_NODE_ID) as usize] = right;
        Ok(id)
    }

    fn left_of(&self, id: u16) -> u16 {
        self.left[(id - FIRST_NODE_ID) as usize]
    }

    fn right_of(&self, id: u16) -> u16 {
        self.right[(id - FIRST_NODE_ID) as usize]
    }

    fn len(&self) -> usize {
        self.left.len()
    }

    /// Rebuild a tree from its bit-serialized description, returning the
    /// root id. Ids are assigned in the order internal markers appear, so
    /// recursion depth is bounded by the id cap checked in [`Tree::reserve`].
    fn read_node(&mut self, bits: &mut BitReader) -> Result<u16> {
        if bits.read_bit()? == 0 {
            return Ok(bits.read_bits(8)? as u16);
        }
        let id = self.reserve()?;
        let left = self.read_node(bits)?;
        self.left[(id - FIRST_NODE_ID) as usize] = left;
        let right = self.read_node(bits)?;
        self.right[(id - FIRST_NODE_ID) as usize] = right;
        Ok(id)
    }

    /// Serialize the subtree under `id` with the grammar `read_node` expects.
    fn write_node(&self, id: u16, bits: &mut BitWriter) -> Result<()> {
        if id < FIRST_NODE_ID {
            bits.write_bit(0);
            bits.write_bits(u32::from(id), 8)?;
        } else {
            bits.write_bit(1);
            self.write_node(self.left_of(id), bits)?;
            self.write_node(self.right_of(id), bits)?;
        }
        Ok(())
    }

    /// Chain the distinct bytes of `data` by descending frequency.
    ///
    /// Ties keep first-occurrence order, matching the packer this format
    /// comes from; a different tie order still decodes but produces
    /// different bytes. The two most frequent bytes share the first internal
    /// node, every further byte becomes the right child of a fresh root.
    fn build(&mut self, data: &[u8]) -> Result<u16> {
        let mut counts = [0u64; 256];
        let mut order: Vec<u8> = Vec::new();
        for &byte in data {
            if counts[byte as usize] == 0 {
                order.push(byte);
            }
            counts[byte as usize] += 1;
        }

        match order.as_slice() {
            // An empty source still serializes a (degenerate) tree so the
            // block stays self-describing.
            [] => return Ok(0),
            [byte] => return Ok(u16::from(*byte)),
            _ => {}
        }

        order.sort_by(|a, b| counts[*b as usize].cmp(&counts[*a as usize]));

        let mut root = self.alloc(u16::from(order[0]), u16::from(order[1]))?;
        for &byte in &order[2..] {
            root = self.alloc(root, u16::from(byte))?;
        }
        Ok(root)
    }

    /// Full leaf set per internal node, memoized in id order.
    ///
    /// Valid for trees built by [`Tree::build`], where both children of a
    /// node always carry smaller ids.
    fn symbol_sets(&self) -> Vec<SymbolSet> {
        let mut sets: Vec<SymbolSet> = Vec::with_capacity(self.len());
        for index in 0..self.len() {
            let mut set = [0u64; 4];
            for child in [self.left[index], self.right[index]] {
                if child < FIRST_NODE_ID {
                    set_insert(&mut set, child as u8);
                } else {
                    let child_set = sets[(child - FIRST_NODE_ID) as usize];
                    for (word, other) in set.iter_mut().zip(child_set) {
                        *word |= other;
                    }
                }
            }
            sets.push(set);
        }
        sets
    }
}

/// Decode one compressed block back into its source bytes.
///
/// The symbol count in the header is authoritative; the zero padding the
/// encoder appends after the last path bit is never examined.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut header = data;
    let count = header
        .read_u32::<LittleEndian>()
        .map_err(|_| Error::Truncated { offset: data.len() })?;

    let mut bits = BitReader::new(header);
    let mut tree = Tree::default();
    let root = tree.read_node(&mut bits)?;
    debug!(count, nodes = tree.len(), "decoding huffman block");

    let mut out = Vec::with_capacity(count.min(1 << 20) as usize);
    for _ in 0..count {
        let mut node = root;
        while node >= FIRST_NODE_ID {
            node = if bits.read_bit()? == 1 {
                tree.right_of(node)
            } else {
                tree.left_of(node)
            };
        }
        out.push(node as u8);
    }
    Ok(out)
}

/// Encode `data` as a compressed block.
///
/// Each input byte is resolved by walking down from the root, testing the
/// left subtree's memoized symbol set at every internal node. Subtree sets
/// are disjoint by construction, so the walk is unambiguous.
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() / 2 + 8);
    out.write_u32::<LittleEndian>(data.len() as u32)?;

    let mut tree = Tree::default();
    let root = tree.build(data)?;
    debug!(len = data.len(), nodes = tree.len(), "encoding huffman block");

    let mut bits = BitWriter::new();
    tree.write_node(root, &mut bits)?;

    let sets = tree.symbol_sets();
    for &byte in data {
        let mut node = root;
        while node >= FIRST_NODE_ID {
            let left = tree.left_of(node);
            let goes_left = if left < FIRST_NODE_ID {
                left as u8 == byte
            } else {
                set_contains(&sets[(left - FIRST_NODE_ID) as usize], byte)
            };
            if goes_left {
                bits.write_bit(0);
                node = left;
            } else {
                bits.write_bit(1);
                node = tree.right_of(node);
            }
        }
    }

    out.extend(bits.finish());
    Ok(out)
}
