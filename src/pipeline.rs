//! End-to-end tool flows
//!
//! Each flow drives the gatherer over every configured segment and collects the
//! results its tool writes out.

use crate::config::{Config, RunConfig};
use crate::crawler::{load_cookie_header, HttpFetcher, PageFetcher, ParserFactory, SegmentCrawler};
use crate::ranking::{
    CollectedData, LeaderboardEntry, PresenceTracker, RankLookup, RankingGatherer,
    ScoringAggregator, ScoringConfig, SegmentRank,
};
use crate::{ConfigError, LeaderboardError};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Builds an authenticated HTTP crawler from config and a cookie file
pub fn http_crawler(
    config: &Config,
    cookie_file: &Path,
) -> Result<SegmentCrawler<HttpFetcher>, LeaderboardError> {
    let base_url = Url::parse(&config.crawler.base_url)?;
    let host = base_url
        .host_str()
        .ok_or_else(|| ConfigError::InvalidUrl(format!("base_url '{}' has no host", base_url)))?;
    let cookie = load_cookie_header(cookie_file, host)?;
    let fetcher = HttpFetcher::from_config(&config.crawler, Some(&cookie))?;
    Ok(SegmentCrawler::new(fetcher, base_url))
}

/// Scores every segment under one run configuration
///
/// Returns the final leaderboard, descending by points.
pub async fn score_run<F: PageFetcher>(
    crawler: &SegmentCrawler<F>,
    factory: &dyn ParserFactory,
    segments: &[String],
    scoring: &ScoringConfig,
    run: &RunConfig,
) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
    let gatherer = RankingGatherer::new(crawler, factory);
    let mut collected = CollectedData::new();

    for segment in segments {
        let mut aggregator = ScoringAggregator::new(scoring, &mut collected);
        gatherer.run(segment, run, &mut aggregator).await?;
    }

    tracing::info!(
        "Run '{}': {} athletes over {} segments",
        run.output_file,
        collected.len(),
        segments.len()
    );
    Ok(collected.finalize())
}

/// Looks up one athlete's rank on every segment they appear in
pub async fn lookup_ranks<F: PageFetcher>(
    crawler: &SegmentCrawler<F>,
    factory: &dyn ParserFactory,
    segments: &[String],
    run: &RunConfig,
    athlete: &str,
) -> Result<Vec<SegmentRank>, LeaderboardError> {
    let gatherer = RankingGatherer::new(crawler, factory);
    let mut lookup = RankLookup::new(athlete);

    for segment in segments {
        gatherer.run(segment, run, &mut lookup).await?;
    }

    Ok(lookup.into_records())
}

/// Lists the segments an athlete has not appeared in, in configured order
pub async fn find_missing<F: PageFetcher>(
    crawler: &SegmentCrawler<F>,
    factory: &dyn ParserFactory,
    segments: &[String],
    option: &str,
    athlete: &str,
) -> Result<Vec<String>, LeaderboardError> {
    let gatherer = RankingGatherer::new(crawler, factory);
    let run = RunConfig::single_option(option);
    let mut tracker = PresenceTracker::new(athlete);

    let mut seen = HashSet::new();
    for segment in segments.iter().filter(|s| seen.insert(s.as_str())) {
        gatherer.run(segment, &run, &mut tracker).await?;
    }

    Ok(tracker
        .missing(segments)
        .into_iter()
        .map(str::to_string)
        .collect())
}
