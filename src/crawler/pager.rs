//! Paginated segment crawler
//!
//! Walks one (segment, query option) leaderboard page by page until a page comes
//! back with fewer rows than the page size.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::{ParserFactory, ResultSink};
use crate::LeaderboardError;
use url::Url;

/// Rows requested per leaderboard page
pub const PAGE_SIZE: usize = 100;

/// Totals for one completed (segment, option) crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrawlStats {
    pub pages: u32,
    pub records: usize,
}

/// Crawls paginated segment leaderboards through a [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct SegmentCrawler<F> {
    fetcher: F,
    base_url: Url,
}

impl<F: PageFetcher> SegmentCrawler<F> {
    /// Creates a crawler rooted at `base_url` (e.g. `https://www.strava.com/`)
    pub fn new(fetcher: F, base_url: Url) -> Self {
        Self { fetcher, base_url }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Builds the URL for one leaderboard page
    ///
    /// The query option is inserted verbatim, since it is already a query-string fragment.
    pub fn page_url(&self, segment: &str, option: &str, page: u32) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join(&format!("segments/{}", segment))?;
        let mut query = String::from("partial=true");
        let option = option.trim_matches('&');
        if !option.is_empty() {
            query.push('&');
            query.push_str(option);
        }
        query.push_str(&format!("&page={}&per_page={}", page, PAGE_SIZE));
        url.set_query(Some(&query));
        Ok(url)
    }

    /// Crawls every page of one (segment, option) leaderboard
    ///
    /// Each page is parsed by a fresh parser from `factory`, and every row is passed
    /// to `sink` as soon as it is parsed. Crawling stops after the first page holding
    /// fewer than [`PAGE_SIZE`] rows.
    ///
    /// # Errors
    ///
    /// Any transport or parse failure aborts the crawl immediately with the segment,
    /// option and page number attached. Pages are never skipped.
    pub async fn crawl(
        &self,
        segment: &str,
        option: &str,
        factory: &dyn ParserFactory,
        sink: &mut dyn ResultSink,
    ) -> Result<CrawlStats, LeaderboardError> {
        let mut stats = CrawlStats::default();
        let mut page = 1;

        loop {
            let url = self.page_url(segment, option, page)?;
            tracing::debug!("Processing URL: {}", url);

            let body = self
                .fetcher
                .fetch_page(&url)
                .await
                .map_err(|source| LeaderboardError::Network {
                    segment: segment.to_string(),
                    option: option.to_string(),
                    page,
                    source,
                })?;

            let mut parser = factory.new_parser();
            let found = parser
                .feed(&body, sink)
                .map_err(|source| LeaderboardError::Parse {
                    segment: segment.to_string(),
                    option: option.to_string(),
                    page,
                    source,
                })?;

            stats.pages = page;
            stats.records += found;
            tracing::debug!("Segment {} ({}) page {}: {} records", segment, option, page, found);

            if found < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(stats)
    }
}
