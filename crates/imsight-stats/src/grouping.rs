//! Grouping, counting and ranking
//!
//! Groups preserve first-occurrence order of their keys: the first distinct
//! key seen in the input becomes the first group. Nothing is re-sorted unless
//! a consumer asks for it explicitly (see [`top_n`]).

use crate::error::{StatsError, StatsResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Items sharing one key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group<K, T> {
    /// The group key
    pub key: K,
    /// Members in input order
    pub members: Vec<T>,
}

impl<K, T> Group<K, T> {
    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the group has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The result of partitioning items by key
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping<K, T> {
    groups: Vec<Group<K, T>>,
    skipped: usize,
}

impl<K, T> Grouping<K, T> {
    /// Groups in first-occurrence order
    pub fn groups(&self) -> &[Group<K, T>] {
        &self.groups
    }

    /// Consume the grouping and return its groups
    pub fn into_groups(self) -> Vec<Group<K, T>> {
        self.groups
    }

    /// Number of items excluded because they produced no key
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of distinct groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no item produced a key
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of grouped items
    pub fn total(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Iterate over the group keys in order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.iter().map(|g| &g.key)
    }

    /// Iterate over the groups
    pub fn iter(&self) -> std::slice::Iter<'_, Group<K, T>> {
        self.groups.iter()
    }
}

impl<K, T> IntoIterator for Grouping<K, T> {
    type Item = Group<K, T>;
    type IntoIter = std::vec::IntoIter<Group<K, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Partition items by key, preserving first-occurrence order
///
/// Items for which `key_fn` returns `None` (typically a record missing the
/// grouping field) are excluded and counted in [`Grouping::skipped`].
pub fn group_by<I, T, K, F>(items: I, mut key_fn: F) -> Grouping<K, T>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash,
    F: FnMut(&T) -> Option<K>,
{
    let mut index: IndexMap<K, Vec<T>> = IndexMap::new();
    let mut skipped = 0;

    for item in items {
        match key_fn(&item) {
            Some(key) => index.entry(key).or_default().push(item),
            None => skipped += 1,
        }
    }

    let groups = index
        .into_iter()
        .map(|(key, members)| Group { key, members })
        .collect();

    Grouping { groups, skipped }
}

/// Round a fraction to a percentage with one decimal place
pub fn round_percentage(fraction: f64) -> f64 {
    (fraction * 1000.0).round() / 10.0
}

/// Count and share of one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frequency<K> {
    pub key: K,
    pub count: usize,
    /// Exact share of the total (0 to 1)
    pub fraction: f64,
    /// Share of the total in percent, rounded to one decimal
    pub percentage: f64,
}

/// Frequency of every distinct key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable<K> {
    pub entries: Vec<Frequency<K>>,
    /// Number of items that produced a key
    pub total: usize,
    /// Number of items excluded for lack of a key
    pub skipped: usize,
}

impl<K> FrequencyTable<K> {
    /// Largest group count
    pub fn max_count(&self) -> usize {
        self.entries.iter().map(|e| e.count).max().unwrap_or(0)
    }

    /// Keys in table order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|e| &e.key)
    }
}

/// Count items per key
///
/// Returns [`StatsError::EmptyDataset`] when no item produced a key, rather
/// than dividing by a zero total.
pub fn frequency_table<I, T, K, F>(items: I, key_fn: F) -> StatsResult<FrequencyTable<K>>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash,
    F: FnMut(&T) -> Option<K>,
{
    let grouping = group_by(items, key_fn);
    let total = grouping.total();
    if total == 0 {
        return Err(StatsError::EmptyDataset);
    }

    let skipped = grouping.skipped();
    let entries = grouping
        .into_iter()
        .map(|group| {
            let count = group.len();
            let fraction = count as f64 / total as f64;
            Frequency {
                key: group.key,
                count,
                fraction,
                percentage: round_percentage(fraction),
            }
        })
        .collect();

    Ok(FrequencyTable {
        entries,
        total,
        skipped,
    })
}

/// Sum of a numeric weight within one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEntry<K> {
    pub key: K,
    /// Number of items that contributed a weight
    pub count: usize,
    /// Sum of the weights
    pub value: f64,
    /// Share of the grand total in percent; `None` when the grand total is zero
    pub percentage: Option<f64>,
}

/// Per-key sums of a numeric weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTable<K> {
    pub entries: Vec<WeightedEntry<K>>,
    pub grand_total: f64,
    pub skipped: usize,
}

/// Sum a numeric weight per key
///
/// Items with no key or no weight are skipped.
pub fn weighted_table<I, T, K, F, W>(
    items: I,
    mut key_fn: F,
    mut weight_fn: W,
) -> StatsResult<WeightedTable<K>>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash,
    F: FnMut(&T) -> Option<K>,
    W: FnMut(&T) -> Option<f64>,
{
    let mut weight_skipped = 0;
    let grouping = group_by(
        items.into_iter().filter_map(|item| match weight_fn(&item) {
            Some(w) if w.is_finite() => Some((item, w)),
            _ => {
                weight_skipped += 1;
                None
            }
        }),
        |(item, _)| key_fn(item),
    );

    if grouping.is_empty() {
        return Err(StatsError::EmptyDataset);
    }

    let skipped = grouping.skipped() + weight_skipped;
    let sums: Vec<(K, usize, f64)> = grouping
        .into_iter()
        .map(|g| {
            let count = g.len();
            let value = g.members.iter().map(|(_, w)| w).sum();
            (g.key, count, value)
        })
        .collect();
    let grand_total: f64 = sums.iter().map(|(_, _, v)| v).sum();

    let entries = sums
        .into_iter()
        .map(|(key, count, value)| WeightedEntry {
            key,
            count,
            value,
            percentage: (grand_total != 0.0).then(|| round_percentage(value / grand_total)),
        })
        .collect();

    Ok(WeightedTable {
        entries,
        grand_total,
        skipped,
    })
}

/// An item with its position in a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked<T> {
    /// 1-based rank
    pub rank: usize,
    pub item: T,
    pub metric: f64,
}

/// The `n` items with the largest metric, descending
///
/// Ranks a copy of the references, so the caller's slice keeps its order.
/// The sort is stable: ties keep input order. Items without a finite metric
/// are left out.
pub fn top_n<T, F>(items: &[T], n: usize, mut metric_fn: F) -> Vec<Ranked<&T>>
where
    F: FnMut(&T) -> Option<f64>,
{
    let mut scored: Vec<(&T, f64)> = items
        .iter()
        .filter_map(|item| {
            metric_fn(item)
                .filter(|m| m.is_finite())
                .map(|m| (item, m))
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    scored
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, (item, metric))| Ranked {
            rank: i + 1,
            item,
            metric,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_first_occurrence_order() {
        let items = vec!["b", "a", "b", "c", "a"];
        let grouping = group_by(items, |s| Some(*s));

        let keys: Vec<_> = grouping.keys().copied().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(grouping.total(), 5);
        assert_eq!(grouping.skipped(), 0);
        assert_eq!(grouping.groups()[0].members, vec!["b", "b"]);
    }

    #[test]
    fn test_group_by_skips_missing_keys() {
        let items = vec![Some("x"), None, Some(""), Some("x")];
        let grouping = group_by(items, |item| *item);

        assert_eq!(grouping.len(), 2);
        assert_eq!(grouping.skipped(), 1);
        // The empty string is a real group, not a missing key
        assert!(grouping.keys().any(|k| k.is_empty()));
    }

    #[test]
    fn test_frequency_table_gender_example() {
        let records = vec!["Male", "Male", "Female"];
        let table = frequency_table(records, |g| Some(g.to_string())).unwrap();

        assert_eq!(table.total, 3);
        assert_eq!(table.entries[0].key, "Male");
        assert_eq!(table.entries[0].count, 2);
        assert_eq!(table.entries[0].percentage, 66.7);
        assert_eq!(table.entries[1].key, "Female");
        assert_eq!(table.entries[1].count, 1);
        assert_eq!(table.entries[1].percentage, 33.3);
        assert_eq!(table.max_count(), 2);
    }

    #[test]
    fn test_frequency_table_empty() {
        let empty: Vec<&str> = Vec::new();
        let result = frequency_table(empty, |s| Some(*s));
        assert_eq!(result.unwrap_err(), StatsError::EmptyDataset);

        // All keys missing is also empty
        let missing = vec![None::<&str>, None];
        assert!(frequency_table(missing, |s| *s).is_err());
    }

    #[test]
    fn test_round_percentage() {
        assert_eq!(round_percentage(0.5), 50.0);
        assert_eq!(round_percentage(1.0 / 3.0), 33.3);
        assert_eq!(round_percentage(0.14285714), 14.3);
    }

    #[test]
    fn test_weighted_table() {
        let rows = vec![("TX", Some(1.0)), ("NV", Some(0.0)), ("TX", Some(2.0)), ("NV", None)];
        let table = weighted_table(rows, |(k, _)| Some(*k), |(_, w)| *w).unwrap();

        assert_eq!(table.entries.len(), 2);
        assert_eq!(table.entries[0].key, "TX");
        assert_eq!(table.entries[0].value, 3.0);
        assert_eq!(table.entries[0].count, 2);
        assert_eq!(table.entries[0].percentage, Some(100.0));
        assert_eq!(table.entries[1].percentage, Some(0.0));
        assert_eq!(table.skipped, 1);
        assert_eq!(table.grand_total, 3.0);
    }

    #[test]
    fn test_weighted_table_zero_total() {
        let rows = vec![("a", 0.0), ("b", 0.0)];
        let table = weighted_table(rows, |(k, _)| Some(*k), |(_, w)| Some(*w)).unwrap();
        assert!(table.entries.iter().all(|e| e.percentage.is_none()));
    }

    #[test]
    fn test_top_n_is_stable_and_leaves_input_untouched() {
        let items = vec![("a", 5.0), ("b", 9.0), ("c", 5.0), ("d", 1.0), ("e", 9.0)];
        let before = items.clone();

        let top = top_n(&items, 4, |(_, v)| Some(*v));
        let names: Vec<_> = top.iter().map(|r| r.item.0).collect();

        assert_eq!(names, vec!["b", "e", "a", "c"]);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[3].metric, 5.0);
        assert_eq!(items, before);
    }

    #[test]
    fn test_top_n_drops_missing_metrics() {
        let items = vec![Some(1.0), None, Some(f64::NAN), Some(3.0)];
        let top = top_n(&items, 10, |v| *v);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].metric, 3.0);
    }
}
