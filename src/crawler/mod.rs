//! Crawler module for leaderboard page fetching and parsing
//!
//! This module contains the scraping side of the pipeline, including:
//! - HTTP fetching with timeouts and optional retry
//! - The leaderboard markup state machine
//! - Paginated crawling of one (segment, query option) leaderboard
//! - Session credential loading and segment starring

mod fetcher;
mod pager;
mod parser;
mod session;
mod star;

#[cfg(test)]
pub(crate) mod testing;

pub use fetcher::{build_http_client, HttpFetcher, PageFetcher, RetryPolicy};
pub use pager::{CrawlStats, SegmentCrawler, PAGE_SIZE};
pub use parser::{
    format_elapsed, parse_elapsed, ParserFactory, ParserState, ResultSink, TimeParser,
    TimedResult,
};
pub use session::{cookie_header, load_cookie_header};
pub use star::{split_segment_list, star_segment};
