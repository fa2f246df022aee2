//! Ranking consumers
//!
//! A consumer receives the finished ranking of one segment and records whatever its
//! tool needs: one athlete's rank, whether they appear at all, or points for everyone.

use crate::ranking::time_map::RankingList;
use std::collections::HashSet;

/// Processes the sorted ranking of one segment
pub trait RankingConsumer {
    fn process(&mut self, segment: &str, rankings: &RankingList);
}

/// One athlete's placing on one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRank {
    pub segment: String,
    /// 1-based Olympic rank (tied times share the best rank)
    pub rank: usize,
    pub field_size: usize,
}

/// Finds one athlete's Olympic rank and field size per segment
#[derive(Debug, Clone)]
pub struct RankLookup {
    athlete: String,
    records: Vec<SegmentRank>,
}

impl RankLookup {
    pub fn new(athlete: impl Into<String>) -> Self {
        Self {
            athlete: athlete.into(),
            records: Vec::new(),
        }
    }

    /// Matched segments, in processing order
    pub fn records(&self) -> &[SegmentRank] {
        &self.records
    }

    pub fn into_records(self) -> Vec<SegmentRank> {
        self.records
    }
}

impl RankingConsumer for RankLookup {
    fn process(&mut self, segment: &str, rankings: &RankingList) {
        let mut rank = 1;
        let mut previous = None;

        for (i, result) in rankings.iter().enumerate() {
            if previous != Some(result.seconds) {
                rank = i + 1;
            }
            previous = Some(result.seconds);

            if result.name == self.athlete {
                tracing::debug!("{} is ranked {} on segment {}", self.athlete, rank, segment);
                self.records.push(SegmentRank {
                    segment: segment.to_string(),
                    rank,
                    field_size: rankings.len(),
                });
                return;
            }
        }
    }
}

/// Records the segments in which an athlete appears
#[derive(Debug, Clone)]
pub struct PresenceTracker {
    athlete: String,
    found: HashSet<String>,
}

impl PresenceTracker {
    pub fn new(athlete: impl Into<String>) -> Self {
        Self {
            athlete: athlete.into(),
            found: HashSet::new(),
        }
    }

    pub fn found(&self) -> &HashSet<String> {
        &self.found
    }

    /// Segments from `all` the athlete has not appeared in, keeping `all`'s order
    pub fn missing<'a>(&self, all: &'a [String]) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        all.iter()
            .map(String::as_str)
            .filter(|segment| !self.found.contains(*segment) && seen.insert(*segment))
            .collect()
    }
}

impl RankingConsumer for PresenceTracker {
    fn process(&mut self, segment: &str, rankings: &RankingList) {
        if rankings.iter().any(|result| result.name == self.athlete) {
            self.found.insert(segment.to_string());
        }
    }
}
