//! Ranking gatherer
//!
//! Crawls every query option of a run configuration for one segment, merges the
//! per-option times in configured order and hands the sorted ranking to a consumer.

use crate::config::RunConfig;
use crate::crawler::{PageFetcher, ParserFactory, SegmentCrawler};
use crate::ranking::consumers::RankingConsumer;
use crate::ranking::time_map::{RankingList, TimeMap};
use crate::LeaderboardError;

/// Builds segment rankings from one or more crawled sub-rankings
pub struct RankingGatherer<'a, F> {
    crawler: &'a SegmentCrawler<F>,
    factory: &'a dyn ParserFactory,
}

impl<'a, F: PageFetcher> RankingGatherer<'a, F> {
    pub fn new(crawler: &'a SegmentCrawler<F>, factory: &'a dyn ParserFactory) -> Self {
        Self { crawler, factory }
    }

    /// Crawls one query option into its own time map
    pub async fn crawl_option(&self, segment: &str, option: &str) -> Result<TimeMap, LeaderboardError> {
        let mut partial = TimeMap::new();
        let stats = self
            .crawler
            .crawl(segment, option, self.factory, &mut partial)
            .await?;
        tracing::debug!(
            "Segment {} ({}): {} records over {} pages",
            segment,
            option,
            stats.records,
            stats.pages
        );
        Ok(partial)
    }

    /// Crawls every option and merges them, later options winning per athlete
    pub async fn time_map(&self, segment: &str, run: &RunConfig) -> Result<TimeMap, LeaderboardError> {
        let mut merged = TimeMap::new();
        for option in &run.options {
            let partial = self.crawl_option(segment, option).await?;
            merged.merge(partial);
        }
        Ok(merged)
    }

    /// Builds the sorted ranking for one segment under one run configuration
    pub async fn gather(&self, segment: &str, run: &RunConfig) -> Result<RankingList, LeaderboardError> {
        Ok(self.time_map(segment, run).await?.into_ranking())
    }

    /// Gathers one segment and passes its ranking to `consumer`
    ///
    /// The consumer is only invoked once every option has been crawled successfully.
    pub async fn run(
        &self,
        segment: &str,
        run: &RunConfig,
        consumer: &mut dyn RankingConsumer,
    ) -> Result<(), LeaderboardError> {
        let rankings = self.gather(segment, run).await?;
        tracing::info!("Segment {}: {} athletes ranked", segment, rankings.len());
        consumer.process(segment, &rankings);
        Ok(())
    }
}
