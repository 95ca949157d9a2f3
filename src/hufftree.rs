use std::collections::BTreeMap;
use std::io::Cursor;

use tracing::debug;

use crate::code_table::CodeTable;
use crate::compressed_data::{read_u32, read_u64};
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::{MinHeap, Weighted};

/// Index of a node inside a tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: char,
    },
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }
}

/// What the priority queue actually holds while the tree is being built.
#[derive(Debug, Clone, Copy)]
struct Pending {
    weight: u64,
    node: NodeId,
}

impl Weighted for Pending {
    fn weight(&self) -> u64 {
        self.weight
    }
}

/// A full binary tree whose leaves are the distinct symbols of some content.
///
/// Nodes live in a flat arena and refer to their children by [`NodeId`]; the
/// tree never changes after it has been built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<HuffNode>,
    root: NodeId,
}

impl HuffmanTree {
    pub fn from_content(content: &str) -> Result<Self> {
        HuffmanTree::from_frequencies(&FrequencyTable::from_content(content))
    }

    /// Greedy Huffman construction: repeatedly merge the two lightest nodes,
    /// the first one extracted becoming the left child.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }

        let mut nodes: Vec<HuffNode> = frequencies
            .iter()
            .map(|(symbol, weight)| HuffNode::Leaf { weight, symbol })
            .collect();

        let mut heap = MinHeap::construct(nodes.iter().enumerate().map(|(i, node)| Pending {
            weight: node.weight(),
            node: NodeId(i),
        }));

        while heap.len() > 1 {
            let x = heap.extract_min()?;
            let y = heap.extract_min()?;

            let weight = x.weight.checked_add(y.weight).ok_or_else(|| {
                HuffmanError::InvalidData("combined symbol frequency overflows u64".into())
            })?;
            let id = NodeId(nodes.len());
            nodes.push(HuffNode::Internal {
                weight,
                left: x.node,
                right: y.node,
            });
            heap.insert(Pending { weight, node: id });
        }
        let root = heap.extract_min()?.node;

        debug!(
            symbols = frequencies.len(),
            nodes = nodes.len(),
            "built huffman tree"
        );
        Ok(HuffmanTree { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Looks up a node. Ids handed out by another tree may not exist here.
    pub fn node(&self, id: NodeId) -> Option<&HuffNode> {
        self.nodes.get(id.0)
    }

    /// Ids reached from this tree's own root and children always index its arena.
    pub(crate) fn at(&self, id: NodeId) -> &HuffNode {
        &self.nodes[id.0]
    }

    /// Total weight of the tree, i.e. the number of symbols it was built from.
    pub fn weight(&self) -> u64 {
        self.at(self.root).weight()
    }

    pub fn is_single_leaf(&self) -> bool {
        matches!(self.at(self.root), HuffNode::Leaf { .. })
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, HuffNode::Leaf { .. }))
            .count()
    }

    /// Length of the longest root-to-leaf path. A bare leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0)];
        while let Some((id, depth)) = stack.pop() {
            match self.at(id) {
                HuffNode::Leaf { .. } => deepest = deepest.max(depth),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        deepest
    }

    pub fn generate_table(&self) -> CodeTable {
        CodeTable::from_tree(self)
    }

    /// Recovers the frequency table the tree was built from.
    pub fn frequencies(&self) -> FrequencyTable {
        // leaves are distinct symbols and their weights sum to the root weight
        FrequencyTable::from_distinct(
            self.nodes
                .iter()
                .filter_map(|node| match node {
                    HuffNode::Leaf { weight, symbol } => Some((*symbol, *weight)),
                    HuffNode::Internal { .. } => None,
                })
                .collect(),
        )
    }

    /// Encodes the tree as its frequency table: a `u32` symbol count followed by
    /// `(u32 scalar value, u64 count)` pairs, all little-endian. Rebuilding from
    /// the same table yields the same tree.
    pub fn serialize(&self) -> Vec<u8> {
        let frequencies = self.frequencies();
        let mut bytes = Vec::with_capacity(4 + frequencies.len() * 12);
        bytes.extend_from_slice(&(frequencies.len() as u32).to_le_bytes());
        for (symbol, count) in frequencies.iter() {
            bytes.extend_from_slice(&u32::from(symbol).to_le_bytes());
            bytes.extend_from_slice(&count.to_le_bytes());
        }
        bytes
    }

    pub fn deserialize(data: &[u8]) -> Result<HuffmanTree> {
        let mut cursor = Cursor::new(data);
        let count = read_u32(&mut cursor, "tree symbol count")? as usize;

        let mut counts = BTreeMap::new();
        for _ in 0..count {
            let scalar = read_u32(&mut cursor, "tree symbol")?;
            let symbol = char::from_u32(scalar).ok_or_else(|| {
                HuffmanError::InvalidData(format!("{scalar:#x} is not a unicode scalar value"))
            })?;
            let frequency = read_u64(&mut cursor, "tree frequency")?;
            if frequency == 0 {
                return Err(HuffmanError::InvalidData(format!(
                    "symbol {symbol:?} has a zero frequency"
                )));
            }
            if counts.insert(symbol, frequency).is_some() {
                return Err(HuffmanError::InvalidData(format!(
                    "symbol {symbol:?} appears twice in tree"
                )));
            }
        }
        if cursor.position() as usize != data.len() {
            return Err(HuffmanError::InvalidData("trailing bytes after tree".into()));
        }

        let frequencies = FrequencyTable::from_counts(counts)?;
        HuffmanTree::from_frequencies(&frequencies)
    }

    /// Indented dump of the tree, left subtrees first.
    pub fn structure(&self) -> String {
        let mut out = String::from("Huffman Tree Structure:\n");
        let mut stack = vec![(self.root, 0, "root")];
        while let Some((id, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match self.at(id) {
                HuffNode::Leaf { weight, symbol } => {
                    out.push_str(&format!(
                        "{indent}{label}-> Leaf: {symbol:?} (U+{:04X}) [weight: {weight}]\n",
                        u32::from(*symbol)
                    ));
                }
                HuffNode::Internal {
                    weight,
                    left,
                    right,
                } => {
                    out.push_str(&format!("{indent}{label}-> Internal [weight: {weight}]\n"));
                    stack.push((*right, depth + 1, "R"));
                    stack.push((*left, depth + 1, "L"));
                }
            }
        }
        out
    }
}

impl TryFrom<&str> for HuffmanTree {
    type Error = HuffmanError;

    fn try_from(content: &str) -> Result<Self> {
        HuffmanTree::from_content(content)
    }
}
