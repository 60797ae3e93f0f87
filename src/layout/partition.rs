//! Grouping of records by level prefix and greedy two-bucket balancing.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::import::Record;

/// Records sharing one grouping-key value, with their summed weight.
#[derive(Debug, Clone)]
pub struct GroupWeight<'a> {
    /// Grouping-key value (a prefix of each record's path).
    pub key: &'a [String],
    /// Sum of the members' weights.
    pub weight: f64,
    /// Members, in input order.
    pub records: Vec<&'a Record>,
}

/// Per-level ordering of grouping keys.
///
/// A level whose every value parses as a finite number orders numerically
/// (`9` before `10`); any other level orders as text. The default orders
/// every level as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyOrder {
    numeric: Vec<bool>,
}

impl KeyOrder {
    /// Detect numeric levels among the first `levels` levels of `records`.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>, levels: usize) -> Self {
        let mut numeric = vec![true; levels];
        for record in records {
            for (level, flag) in numeric.iter_mut().enumerate() {
                *flag = *flag && parse_number(record.level_value(level)).is_some();
            }
        }
        Self { numeric }
    }

    /// Whether `level` (0-based) orders numerically.
    #[must_use]
    pub fn is_numeric(&self, level: usize) -> bool {
        self.numeric.get(level).copied().unwrap_or(false)
    }

    /// Compare two grouping keys level by level.
    ///
    /// Numerically equal values that are spelled differently (`1`, `1.0`)
    /// fall back to text order so distinct keys never compare equal.
    #[must_use]
    pub fn compare(&self, a: &[String], b: &[String]) -> Ordering {
        for (level, (x, y)) in a.iter().zip(b).enumerate() {
            let by_value = match (self.is_numeric(level), parse_number(x), parse_number(y)) {
                (true, Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            };
            let ord = by_value.then_with(|| x.cmp(y));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.len().cmp(&b.len())
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Key of `record` for a grouping depth, clamped to the available levels.
fn key_of(record: &Record, key_len: usize) -> &[String] {
    &record.path[..key_len.min(record.path.len())]
}

/// Number of distinct grouping-key values among `records`.
#[must_use]
pub fn distinct_keys(records: &[&Record], key_len: usize) -> usize {
    records
        .iter()
        .map(|r| key_of(r, key_len))
        .collect::<BTreeSet<_>>()
        .len()
}

/// Group `records` by their first `key_len` levels.
///
/// Groups come back heaviest first; groups of equal weight come in
/// ascending key order under `order`.
#[must_use]
pub fn group_weights<'a>(
    records: &[&'a Record],
    key_len: usize,
    order: &KeyOrder,
) -> Vec<GroupWeight<'a>> {
    let mut by_key: BTreeMap<&'a [String], GroupWeight<'a>> = BTreeMap::new();
    for &record in records {
        let key = key_of(record, key_len);
        let group = by_key.entry(key).or_insert_with(|| GroupWeight {
            key,
            weight: 0.0,
            records: Vec::new(),
        });
        group.weight += record.weight;
        group.records.push(record);
    }

    let mut groups: Vec<GroupWeight<'a>> = by_key.into_values().collect();
    groups.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| order.compare(a.key, b.key))
    });
    groups
}

/// Two weight-balanced halves of a list of items.
#[derive(Debug, Clone)]
pub struct Buckets<T> {
    pub first: Vec<T>,
    pub first_total: f64,
    pub second: Vec<T>,
    pub second_total: f64,
}

impl<T> Buckets<T> {
    /// Greedily assign weighted items, in the order given, to the lighter bucket.
    ///
    /// Ties go to the first bucket. Callers pass items heaviest first, which
    /// makes this the longest-processing-time heuristic for two bins.
    pub fn balance(items: impl IntoIterator<Item = (T, f64)>) -> Self {
        let mut buckets = Self {
            first: Vec::new(),
            first_total: 0.0,
            second: Vec::new(),
            second_total: 0.0,
        };
        for (item, weight) in items {
            if buckets.first_total <= buckets.second_total {
                buckets.first_total += weight;
                buckets.first.push(item);
            } else {
                buckets.second_total += weight;
                buckets.second.push(item);
            }
        }
        buckets
    }

    /// Combined weight of both buckets.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.first_total + self.second_total
    }

    /// Fraction of the total held by the first bucket, `None` when both are empty of weight.
    #[must_use]
    pub fn first_share(&self) -> Option<f64> {
        let total = self.total();
        (total > 0.0).then(|| self.first_total / total)
    }
}
