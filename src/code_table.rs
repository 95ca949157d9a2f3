use std::collections::BTreeMap;
use std::fmt;

use crate::frequency::FrequencyTable;
use crate::hufftree::{HuffNode, HuffmanTree};

/// A single code word, most significant (first emitted) bit first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code word mapping derived from a [`HuffmanTree`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeTable {
    codes: BTreeMap<char, Code>,
}

impl CodeTable {
    /// Depth-first walk, `0` for left and `1` for right. A tree that is a
    /// single leaf still gets the one-bit code `0` so its symbols occupy bits.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        if let HuffNode::Leaf { symbol, .. } = tree.at(tree.root()) {
            codes.insert(*symbol, Code { bits: vec![false] });
            return CodeTable { codes };
        }

        let mut stack = vec![(tree.root(), Vec::new())];
        while let Some((id, path)) = stack.pop() {
            match tree.at(id) {
                HuffNode::Leaf { symbol, .. } => {
                    codes.insert(*symbol, Code { bits: path });
                }
                HuffNode::Internal { left, right, .. } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    let mut left_path = path;
                    left_path.push(false);
                    // left is pushed last so it is visited first
                    stack.push((*right, right_path));
                    stack.push((*left, left_path));
                }
            }
        }
        CodeTable { codes }
    }

    pub fn get(&self, symbol: char) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &Code)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Number of bits needed to encode content with these frequencies.
    /// Symbols missing from the table contribute nothing.
    pub fn encoded_bit_len(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .filter_map(|(symbol, count)| self.get(symbol).map(|code| count * code.len() as u64))
            .sum()
    }

    pub fn is_prefix_free(&self) -> bool {
        // in lexicographic order a prefix sorts directly before some word it prefixes
        let mut words: Vec<&Code> = self.codes.values().collect();
        words.sort_by(|a, b| a.bits.cmp(&b.bits));
        words.windows(2).all(|pair| !pair[0].is_prefix_of(pair[1]))
    }
}
