use std::collections::BTreeMap;

use crate::error::{HuffmanError, Result};

/// Occurrence count of every distinct symbol in a piece of content.
///
/// Kept ordered by symbol so that building a tree from the same table always
/// feeds the priority queue in the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<char, u64>,
}

impl FrequencyTable {
    /// Counts every `char` in `content`. Empty content gives an empty table.
    pub fn from_content(content: &str) -> Self {
        let counts = content.chars().fold(BTreeMap::new(), |mut acc, symbol| {
            *acc.entry(symbol).or_insert(0) += 1;
            acc
        });
        FrequencyTable { counts }
    }

    /// Builds a table from explicit pairs, dropping symbols with a zero count.
    /// Repeated symbols accumulate. Fails if the total count overflows `u64`,
    /// so every table has a representable total and tree weights never wrap.
    pub fn from_counts<I: IntoIterator<Item = (char, u64)>>(pairs: I) -> Result<Self> {
        let mut counts = BTreeMap::new();
        let mut total: u64 = 0;
        for (symbol, count) in pairs.into_iter().filter(|(_, count)| *count > 0) {
            total = total.checked_add(count).ok_or_else(|| {
                HuffmanError::InvalidData("total symbol frequency overflows u64".into())
            })?;
            // bounded by `total`
            *counts.entry(symbol).or_insert(0) += count;
        }
        Ok(FrequencyTable { counts })
    }

    /// Table over symbols already known to be distinct with a representable total.
    pub(crate) fn from_distinct(counts: BTreeMap<char, u64>) -> Self {
        FrequencyTable { counts }
    }

    pub fn get(&self, symbol: char) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

impl From<&str> for FrequencyTable {
    fn from(content: &str) -> Self {
        FrequencyTable::from_content(content)
    }
}
