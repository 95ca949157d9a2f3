//! Error types shared by every stage of the compression pipeline.

use crate::min_heap::HeapErr;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Debug, thiserror::Error)]
pub enum HuffmanError {
    /// The content had no symbols, so there is nothing to build a tree from.
    #[error("input content is empty")]
    EmptyInput,

    /// Packed bits were handed to the decoder without a tree to replay them against.
    #[error("no Huffman tree is available for this operation")]
    UninitializedState,

    /// The content holds a symbol the code table was not built from.
    #[error("symbol {0:?} is not present in the code table")]
    UnknownSymbol(char),

    /// The packed bytes cannot hold the declared number of valid bits.
    #[error("packed stream is truncated: {required} bits declared, {available} available")]
    TruncatedStream { required: usize, available: usize },

    /// Corrupt container or bit stream.
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("priority queue error: {0}")]
    Heap(#[from] HeapErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
