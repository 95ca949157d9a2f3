use std::io::{Read, Write};

use tracing::{debug, trace};

use crate::bit_vec::{BitReader, BitVec};
use crate::code_table::CodeTable;
use crate::compressed_data::{CompressedData, PackedBuffer};
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};

/// Output of [`compress`]: everything produced by one run of the pipeline.
///
/// `tree` is `None` only when the content was empty, in which case the packed
/// buffer and code table are empty too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compressed {
    pub packed: PackedBuffer,
    pub code_table: CodeTable,
    pub tree: Option<HuffmanTree>,
}

impl Compressed {
    pub fn into_container(self) -> CompressedData {
        CompressedData::new(self.packed, self.tree.as_ref())
    }
}

/// Runs the whole pipeline on `content`: count symbols, build the tree, derive
/// codes and pack the bits. Empty content gives an empty [`Compressed`].
pub fn compress(content: &str) -> Result<Compressed> {
    if content.is_empty() {
        debug!("empty content, nothing to compress");
        return Ok(Compressed::default());
    }
    let codec = HuffmanCodec::from_content(content)?;
    let packed = codec.encode(content)?;
    let HuffmanCodec { tree, encode_table } = codec;
    Ok(Compressed {
        packed,
        code_table: encode_table,
        tree: Some(tree),
    })
}

/// Inverse of [`compress`]. Bits can only be replayed against the tree that
/// produced them; an empty buffer decodes to an empty string without one.
pub fn decode(packed: &PackedBuffer, tree: Option<&HuffmanTree>) -> Result<String> {
    if packed.bit_count == 0 && packed.symbol_count == 0 {
        return Ok(String::new());
    }
    let tree = tree.ok_or(HuffmanError::UninitializedState)?;
    decode_bits(packed, tree)
}

/// An immutable tree/code table pair. Holds no per-call state, so one codec
/// can serve any number of calls, from any number of threads.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    tree: HuffmanTree,
    encode_table: CodeTable,
}

impl HuffmanCodec {
    pub fn new(tree: HuffmanTree) -> Self {
        let encode_table = tree.generate_table();
        HuffmanCodec { tree, encode_table }
    }

    pub fn from_content(content: &str) -> Result<Self> {
        let frequencies = FrequencyTable::from_content(content);
        debug!(
            symbols = frequencies.total(),
            distinct = frequencies.len(),
            "counted symbol frequencies"
        );
        Ok(Self::new(HuffmanTree::from_frequencies(&frequencies)?))
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.encode_table
    }

    pub fn encode(&self, content: &str) -> Result<PackedBuffer> {
        let mut bit_vec = BitVec::new();
        let mut symbol_count = 0;
        for symbol in content.chars() {
            let code = self
                .encode_table
                .get(symbol)
                .ok_or(HuffmanError::UnknownSymbol(symbol))?;
            bit_vec.push_bits(code.bits());
            symbol_count += 1;
        }
        let (bytes, bit_count) = bit_vec.finish();

        debug!(symbol_count, bit_count, bytes = bytes.len(), "packed content");
        Ok(PackedBuffer {
            bytes,
            bit_count,
            symbol_count,
        })
    }

    pub fn decode(&self, packed: &PackedBuffer) -> Result<String> {
        decode_bits(packed, &self.tree)
    }

    /// Reads all of `input` as UTF-8, compresses it and writes the container
    /// to `output`. Returns the container so callers can report sizes.
    pub fn encode_from_reader<R: Read, W: Write>(
        mut input: R,
        mut output: W,
    ) -> Result<CompressedData> {
        let mut content = String::new();
        input.read_to_string(&mut content)?;

        let container = compress(&content)?.into_container();
        container.write_to(&mut output)?;
        output.flush()?;
        Ok(container)
    }

    /// Reads a container from `input` and writes the decoded text to `output`.
    /// Returns the number of symbols decoded.
    pub fn decode_from_reader<R: Read, W: Write>(mut input: R, mut output: W) -> Result<usize> {
        let container = CompressedData::read_from(&mut input)?;
        let tree = container.tree()?;
        let content = decode(&container.packed, tree.as_ref())?;

        output.write_all(content.as_bytes())?;
        output.flush()?;
        Ok(container.packed.symbol_count)
    }
}

/// Replays exactly `packed.bit_count` bits against `tree`. Padding after the
/// last valid bit is never read, so it cannot complete a spurious code.
fn decode_bits(packed: &PackedBuffer, tree: &HuffmanTree) -> Result<String> {
    let available = packed.bytes.len().saturating_mul(8);
    if packed.bit_count > available {
        return Err(HuffmanError::TruncatedStream {
            required: packed.bit_count,
            available,
        });
    }

    let mut content = String::with_capacity(packed.symbol_count.min(packed.bit_count));
    let mut decoded = 0usize;
    let mut bits = BitReader::new(&packed.bytes, packed.bit_count);

    let root = tree.root();
    if let HuffNode::Leaf { symbol, .. } = tree.at(root) {
        // a lone leaf is coded as a single 0 bit per symbol
        while let Some(bit) = bits.next() {
            if bit {
                return Err(HuffmanError::InvalidData(format!(
                    "unexpected 1 bit at position {} for a single-symbol tree",
                    bits.position() - 1
                )));
            }
            content.push(*symbol);
            decoded += 1;
        }
    } else {
        let mut current = root;
        for bit in bits.by_ref() {
            // current is always internal here: it restarts at the root after every leaf
            if let HuffNode::Internal { left, right, .. } = tree.at(current) {
                current = if bit { *right } else { *left };
            }
            if let HuffNode::Leaf { symbol, .. } = tree.at(current) {
                content.push(*symbol);
                decoded += 1;
                current = root;
            }
        }
        if current != root {
            return Err(HuffmanError::InvalidData(format!(
                "bit stream ends inside a code after {} bits",
                bits.position()
            )));
        }
    }

    if decoded != packed.symbol_count {
        return Err(HuffmanError::InvalidData(format!(
            "expected {} symbols, decoded {decoded}",
            packed.symbol_count
        )));
    }
    trace!(decoded, bits = packed.bit_count, "decoded bit stream");
    Ok(content)
}
