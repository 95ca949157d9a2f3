use std::io::{self, Read, Write};

use crate::error::{HuffmanError, Result};
use crate::hufftree::HuffmanTree;

/// Packed code bits plus the metadata a decoder needs to ignore the padding
/// at the end of the last byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedBuffer {
    pub bytes: Vec<u8>,
    /// Number of meaningful bits in `bytes`.
    pub bit_count: usize,
    /// Number of symbols that were encoded.
    pub symbol_count: usize,
}

impl PackedBuffer {
    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    /// Zero bits appended to fill out the final byte.
    pub fn padding_bits(&self) -> usize {
        (self.bytes.len() * 8).saturating_sub(self.bit_count)
    }
}

/// Self-contained compressed form: the packed bits and the tree needed to
/// read them, written as
///
/// `u64 original_length | u64 bit_count | u64 tree_len | tree | u64 data_len | data`
///
/// with every integer little-endian. Empty content has no tree (`tree_len` 0).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressedData {
    pub packed: PackedBuffer,
    pub tree_data: Vec<u8>,
}

impl CompressedData {
    pub fn new(packed: PackedBuffer, tree: Option<&HuffmanTree>) -> Self {
        CompressedData {
            packed,
            tree_data: tree.map(HuffmanTree::serialize).unwrap_or_default(),
        }
    }

    pub fn tree(&self) -> Result<Option<HuffmanTree>> {
        if self.tree_data.is_empty() {
            return Ok(None);
        }
        HuffmanTree::deserialize(&self.tree_data).map(Some)
    }

    /// Size of the serialized form in bytes.
    pub fn serialized_len(&self) -> usize {
        8 * 4 + self.tree_data.len() + self.packed.bytes.len()
    }

    /// Everything in front of the packed data bytes.
    fn header(&self) -> Vec<u8> {
        let mut header = Vec::with_capacity(8 * 4 + self.tree_data.len());
        header.extend_from_slice(&(self.packed.symbol_count as u64).to_le_bytes());
        header.extend_from_slice(&(self.packed.bit_count as u64).to_le_bytes());
        header.extend_from_slice(&(self.tree_data.len() as u64).to_le_bytes());
        header.extend_from_slice(&self.tree_data);
        header.extend_from_slice(&(self.packed.bytes.len() as u64).to_le_bytes());
        header
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.header())?;
        writer.write_all(&self.packed.bytes)
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = self.header();
        bytes.extend_from_slice(&self.packed.bytes);
        bytes
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<CompressedData> {
        let symbol_count = to_usize(read_u64(reader, "original length")?)?;
        let bit_count = to_usize(read_u64(reader, "bit count")?)?;

        let tree_len = read_u64(reader, "tree length")?;
        let tree_data = read_exact_vec(reader, tree_len, "tree data")?;

        let data_len = read_u64(reader, "data length")?;
        let bytes = read_exact_vec(reader, data_len, "compressed data")?;

        Ok(CompressedData {
            packed: PackedBuffer {
                bytes,
                bit_count,
                symbol_count,
            },
            tree_data,
        })
    }

    pub fn deserialize(mut data: &[u8]) -> Result<CompressedData> {
        let compressed = CompressedData::read_from(&mut data)?;
        if !data.is_empty() {
            return Err(HuffmanError::InvalidData(format!(
                "{} trailing bytes after compressed data",
                data.len()
            )));
        }
        Ok(compressed)
    }
}

fn to_usize(value: u64) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| HuffmanError::InvalidData(format!("length {value} does not fit in memory")))
}

fn eof_as_invalid(err: io::Error, what: &str) -> HuffmanError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        HuffmanError::InvalidData(format!("unexpected end of data reading {what}"))
    } else {
        HuffmanError::Io(err)
    }
}

pub(crate) fn read_u32<R: Read>(reader: &mut R, what: &str) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|err| eof_as_invalid(err, what))?;
    Ok(u32::from_le_bytes(buf))
}

pub(crate) fn read_u64<R: Read>(reader: &mut R, what: &str) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader
        .read_exact(&mut buf)
        .map_err(|err| eof_as_invalid(err, what))?;
    Ok(u64::from_le_bytes(buf))
}

/// Reads exactly `len` bytes without trusting `len` for the allocation size.
fn read_exact_vec<R: Read>(reader: &mut R, len: u64, what: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.by_ref().take(len).read_to_end(&mut buf)?;
    if (buf.len() as u64) < len {
        return Err(HuffmanError::InvalidData(format!(
            "unexpected end of data reading {what}: {len} bytes declared, {} present",
            buf.len()
        )));
    }
    Ok(buf)
}
