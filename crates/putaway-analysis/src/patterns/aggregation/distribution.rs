//! Zone/aisle share tables with a deterministic primary bucket.

use std::collections::BTreeMap;

use super::super::round2;

/// Counts per bucket, remembering the order buckets were first seen.
///
/// Feed buckets in rank order (highest-ranked slot first) so that a tie on
/// the top share goes to the bucket holding the highest-ranked slot.
#[derive(Debug, Default)]
pub struct Distribution {
    buckets: Vec<(String, u64)>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bucket: &str, count: u64) {
        if bucket.is_empty() {
            return;
        }
        match self.buckets.iter_mut().find(|(b, _)| b == bucket) {
            Some((_, c)) => *c += count,
            None => self.buckets.push((bucket.to_string(), count)),
        }
    }

    /// Bucket with the largest count; earliest-seen wins ties.
    pub fn primary(&self) -> Option<&str> {
        let mut best: Option<&(String, u64)> = None;
        for entry in &self.buckets {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(b, _)| b.as_str())
    }

    /// Shares as percent of `total`, rounded to 2 decimals.
    pub fn shares(&self, total: u64) -> BTreeMap<String, f64> {
        if total == 0 {
            return BTreeMap::new();
        }
        self.buckets
            .iter()
            .map(|(b, c)| (b.clone(), round2(*c as f64 / total as f64 * 100.0)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
