//! Frequency counting over table columns.
//!
//! Provides the "most frequent value" and "value counts" building blocks the
//! statistics routines are made of.

use std::collections::BTreeMap;

// ── FrequencyTable ────────────────────────────────────────────────────────────

/// Occurrence counts of distinct values, kept in ascending value order.
#[derive(Debug, Clone)]
pub struct FrequencyTable<T> {
    counts: BTreeMap<T, usize>,
}

impl<T: Ord> FrequencyTable<T> {
    /// Count every value yielded by `values`.
    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        let mut counts: BTreeMap<T, usize> = BTreeMap::new();
        for value in values {
            *counts.entry(value).or_default() += 1;
        }
        Self { counts }
    }

    /// The most frequent value.
    ///
    /// Ties go to the smallest value, so the result is deterministic for a
    /// given multiset regardless of input order. `None` when empty.
    pub fn mode(&self) -> Option<&T> {
        let mut best: Option<(&T, usize)> = None;
        for (value, &count) in &self.counts {
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((value, count)),
            }
        }
        best.map(|(value, _)| value)
    }

    /// All distinct values with their counts, most common first. Equal
    /// counts are ordered by value.
    pub fn ranked(&self) -> Vec<(&T, usize)> {
        let mut ranked: Vec<(&T, usize)> = self.counts.iter().map(|(v, &c)| (v, c)).collect();
        // Stable sort keeps the ascending value order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Smallest value seen.
    pub fn min(&self) -> Option<&T> {
        self.counts.keys().next()
    }

    /// Largest value seen.
    pub fn max(&self) -> Option<&T> {
        self.counts.keys().next_back()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── mode ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_mode_picks_most_frequent() {
        let freq = FrequencyTable::from_values(["b", "a", "b", "c", "b", "a"]);
        assert_eq!(freq.mode(), Some(&"b"));
    }

    #[test]
    fn test_mode_tie_is_deterministic() {
        let forward = FrequencyTable::from_values([3, 1, 3, 1]);
        let backward = FrequencyTable::from_values([1, 3, 1, 3]);
        assert_eq!(forward.mode(), backward.mode());
    }

    #[test]
    fn test_mode_empty() {
        let freq: FrequencyTable<u32> = FrequencyTable::from_values(Vec::new());
        assert!(freq.mode().is_none());
        assert!(freq.ranked().is_empty());
    }

    // ── ranked ────────────────────────────────────────────────────────────────

    #[test]
    fn test_ranked_most_common_first() {
        let freq = FrequencyTable::from_values([
            "Subscriber",
            "Customer",
            "Subscriber",
            "Dependent",
            "Subscriber",
            "Customer",
        ]);
        let ranked: Vec<(&str, usize)> = freq.ranked().into_iter().map(|(v, c)| (*v, c)).collect();
        assert_eq!(
            ranked,
            vec![("Subscriber", 3), ("Customer", 2), ("Dependent", 1)]
        );
    }

    // ── min / max ─────────────────────────────────────────────────────────────

    #[test]
    fn test_min_max() {
        let freq = FrequencyTable::from_values([1989, 1899, 2016, 1989]);
        assert_eq!(freq.min(), Some(&1899));
        assert_eq!(freq.max(), Some(&2016));
    }
}
