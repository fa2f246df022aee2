//! Segment Leaderboard: ranks athletes across timed segments
//!
//! This crate scrapes paginated segment leaderboards, extracts per-athlete elapsed
//! times and turns them into Olympic-style rankings, rank lookups, presence checks
//! and cumulative points leaderboards.

pub mod config;
pub mod crawler;
pub mod output;
pub mod pipeline;
pub mod ranking;

use thiserror::Error;

/// Main error type for leaderboard operations
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error on segment {segment} ({option}), page {page}: {source}")]
    Network {
        segment: String,
        option: String,
        page: u32,
        source: FetchError,
    },

    #[error("Parse error on segment {segment} ({option}), page {page}: {source}")]
    Parse {
        segment: String,
        option: String,
        page: u32,
        source: ParseError,
    },

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid session credential: {0}")]
    Credential(String),
}

/// Transport failures while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// Returns true if another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Http { source, .. } => source.is_connect() || source.is_timeout(),
            Self::Status { status, .. } => *status >= 500,
        }
    }
}

/// Markup or time text that did not match the leaderboard contract
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid elapsed time '{text}'")]
    InvalidTime { text: String },

    #[error("Unsupported elapsed time format '{text}' (expected SS, MM:SS or HH:MM:SS)")]
    UnsupportedTimeFormat { text: String },
}

/// Result type alias for leaderboard operations
pub type Result<T> = std::result::Result<T, LeaderboardError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{HttpFetcher, PageFetcher, SegmentCrawler, TimeParser, TimedResult};
pub use ranking::{CollectedData, RankingGatherer, RankingList, ScoringConfig, TimeMap};
