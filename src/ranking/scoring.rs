//! Olympic tie-break scoring and per-run points accumulation

use crate::ranking::consumers::RankingConsumer;
use crate::ranking::time_map::RankingList;
use serde::Deserialize;
use std::collections::HashMap;

/// Points awarded per finishing position
///
/// Values are taken as configured; no sign or ordering constraints are applied.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ScoringConfig {
    /// Points by position: `points[0]` for first place, and so on
    pub points: Vec<i64>,

    /// Bonus added to every position covered by `points`
    pub participation_points: i64,

    /// Flat award for positions beyond `points`
    pub unmatched_participation_points: i64,
}

/// Awards points for one ascending ranking using Olympic tie-breaks
///
/// Tied times share the points of the best position in the tie, and the next distinct
/// time resumes at its own position. With points `[35, 30, 25, 20]` and times
/// `[10, 10, 12, 15]` the award is `[35, 35, 25, 20]`.
pub fn award_points(rankings: &RankingList, scoring: &ScoringConfig) -> Vec<i64> {
    let results = rankings.as_slice();
    let mut awarded: Vec<i64> = Vec::with_capacity(results.len());

    for (i, result) in results.iter().enumerate() {
        let points = if i > 0 && result.seconds == results[i - 1].seconds {
            awarded[i - 1]
        } else if i >= scoring.points.len() {
            scoring.unmatched_participation_points
        } else {
            scoring.participation_points + scoring.points[i]
        };
        awarded.push(points);
    }

    awarded
}

/// One row of a finished leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub points: i64,
    pub segments_completed: u32,
}

/// Running points and completion counts for one run configuration
///
/// Athletes are identified by display name, so two people sharing a name are
/// counted as one.
#[derive(Debug, Clone, Default)]
pub struct CollectedData {
    entries: Vec<LeaderboardEntry>,
    index: HashMap<String, usize>,
}

impl CollectedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one segment's award for an athlete
    pub fn record(&mut self, name: &str, points: i64) {
        match self.index.get(name) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.points += points;
                entry.segments_completed += 1;
            }
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(LeaderboardEntry {
                    name: name.to_string(),
                    points,
                    segments_completed: 1,
                });
            }
        }
    }

    pub fn points(&self, name: &str) -> Option<i64> {
        self.index.get(name).map(|&i| self.entries[i].points)
    }

    pub fn segments_completed(&self, name: &str) -> Option<u32> {
        self.index.get(name).map(|&i| self.entries[i].segments_completed)
    }

    /// Number of athletes seen so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Final leaderboard, descending by points
    ///
    /// Athletes on equal points keep the order in which they were first scored.
    pub fn finalize(self) -> Vec<LeaderboardEntry> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.points.cmp(&a.points));
        entries
    }
}

/// Scores each segment's ranking into a shared [`CollectedData`]
pub struct ScoringAggregator<'a> {
    scoring: &'a ScoringConfig,
    collected: &'a mut CollectedData,
}

impl<'a> ScoringAggregator<'a> {
    pub fn new(scoring: &'a ScoringConfig, collected: &'a mut CollectedData) -> Self {
        Self { scoring, collected }
    }
}

impl RankingConsumer for ScoringAggregator<'_> {
    fn process(&mut self, segment: &str, rankings: &RankingList) {
        let awarded = award_points(rankings, self.scoring);
        for (result, points) in rankings.iter().zip(awarded) {
            self.collected.record(&result.name, points);
        }
        tracing::debug!(
            "Scored {} athletes on segment {} ({} on the leaderboard)",
            rankings.len(),
            segment,
            self.collected.len()
        );
    }
}
