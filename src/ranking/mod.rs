//! Ranking module: from crawled times to rankings, rank lookups and points
//!
//! This module contains:
//! - Insertion-ordered time maps and sorted rankings
//! - The gatherer that merges query options per segment
//! - Ranking consumers (rank lookup, presence tracking, Olympic scoring)

mod consumers;
mod gatherer;
mod scoring;
mod time_map;

pub use consumers::{PresenceTracker, RankLookup, RankingConsumer, SegmentRank};
pub use gatherer::RankingGatherer;
pub use scoring::{award_points, CollectedData, LeaderboardEntry, ScoringAggregator, ScoringConfig};
pub use time_map::{RankingList, TimeMap};
