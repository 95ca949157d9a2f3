//! # huffpack
//!
//! Huffman compression for UTF-8 text. Symbols are Unicode scalar values,
//! codes are packed most-significant-bit first, and every packed buffer carries
//! its valid bit count so padding is never mistaken for data.
//!
//! ## Quick Start
//!
//! ```rust
//! use huffpack::{compress, decode};
//!
//! let compressed = compress("aaaabbbcc")?;
//! assert_eq!(compressed.packed.bit_count, 14);
//! assert_eq!(compressed.packed.bytes.len(), 2);
//!
//! let text = decode(&compressed.packed, compressed.tree.as_ref())?;
//! assert_eq!(text, "aaaabbbcc");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```
//!
//! Files go through [`HuffmanCodec::encode_from_reader`] and
//! [`HuffmanCodec::decode_from_reader`], which store the tree and bit count
//! alongside the packed bytes.

pub mod code_table;
pub mod compressed_data;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod min_heap;

// Internal modules - not part of public API
mod bit_vec;

// Re-export main types for convenience
pub use code_table::{Code, CodeTable};
pub use compressed_data::{CompressedData, PackedBuffer};
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use huffman_codec::{compress, decode, Compressed, HuffmanCodec};
pub use hufftree::{HuffNode, HuffmanTree, NodeId};
pub use min_heap::{HeapErr, MinHeap, Weighted};
