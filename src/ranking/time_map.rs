//! Per-athlete time maps and the rankings built from them

use crate::crawler::{ResultSink, TimedResult};
use std::collections::HashMap;

/// Athlete name to elapsed seconds, in first-seen order
///
/// Re-inserting a name overwrites its time but keeps its original position, so tie
/// order in the resulting ranking follows discovery order rather than names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeMap {
    entries: Vec<TimedResult>,
    index: HashMap<String, usize>,
}

impl TimeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a time, overwriting any earlier time for the same name
    pub fn insert(&mut self, name: impl Into<String>, seconds: u64) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&position) => self.entries[position].seconds = seconds,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push(TimedResult { name, seconds });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.index.get(name).map(|&i| self.entries[i].seconds)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &TimedResult> {
        self.entries.iter()
    }

    /// Merges `other` into this map; `other` wins on conflicts
    pub fn merge(&mut self, other: TimeMap) {
        for result in other.entries {
            self.insert(result.name, result.seconds);
        }
    }

    /// Sorts into a ranking, ascending by time, stable on insertion order
    pub fn into_ranking(self) -> RankingList {
        RankingList::from_results(self.entries)
    }
}

impl ResultSink for TimeMap {
    fn accept(&mut self, result: TimedResult) {
        self.insert(result.name, result.seconds);
    }
}

impl FromIterator<(String, u64)> for TimeMap {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut map = TimeMap::new();
        for (name, seconds) in iter {
            map.insert(name, seconds);
        }
        map
    }
}

/// A segment's results sorted ascending by elapsed time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingList {
    results: Vec<TimedResult>,
}

impl RankingList {
    /// Stable-sorts results ascending by elapsed time
    pub fn from_results(mut results: Vec<TimedResult>) -> Self {
        results.sort_by_key(|r| r.seconds);
        Self { results }
    }

    /// Field size
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedResult> {
        self.results.iter()
    }

    pub fn as_slice(&self) -> &[TimedResult] {
        &self.results
    }
}

impl<'a> IntoIterator for &'a RankingList {
    type Item = &'a TimedResult;
    type IntoIter = std::slice::Iter<'a, TimedResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
