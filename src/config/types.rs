use crate::ranking::ScoringConfig;
use serde::{Deserialize, Deserializer};

/// Main configuration structure for a leaderboard run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Segment ids to crawl, in configured order
    #[serde(deserialize_with = "deserialize_segment_ids")]
    pub segments: Vec<String>,

    /// Per-rank points and participation bonuses
    #[serde(flatten)]
    pub scoring: ScoringConfig,

    /// Run configurations, each producing one output leaderboard
    pub runs: Vec<RunConfig>,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub markup: MarkupMarkers,
}

/// A named set of query options whose merged results form one leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Output file name, relative to the output directory
    pub output_file: String,

    /// Query-string fragments, merged in this order (later wins)
    pub options: Vec<String>,
}

impl RunConfig {
    /// Builds an ad-hoc run configuration from a single query option
    pub fn single_option(option: impl Into<String>) -> Self {
        Self {
            output_file: String::new(),
            options: vec![option.into()],
        }
    }
}

/// Crawler transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Root of the leaderboard site; segment pages live at `segments/<id>`
    pub base_url: String,

    /// Root of the REST API used for starring segments
    pub api_base_url: String,

    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Additional attempts for transient failures (0 disables retries)
    pub max_retries: u32,

    /// Base delay between retries in milliseconds, multiplied by the attempt number
    pub retry_delay_ms: u64,

    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.strava.com/".to_string(),
            api_base_url: "https://www.strava.com/api/v3/".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 0,
            retry_delay_ms: 1000,
            user_agent: format!("segment-leaderboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Markers locating leaderboard rows in the scraped markup
///
/// The scraped table layout is fixed; these only name its markers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkupMarkers {
    /// Class list on the cell that opens an athlete row
    pub row_class: String,

    /// Tag whose text is the athlete name
    pub link_tag: String,

    /// Tag carrying the row and time markers
    pub cell_tag: String,

    /// Class on the cell holding the elapsed time
    pub time_class: String,
}

impl Default for MarkupMarkers {
    fn default() -> Self {
        Self {
            row_class: "athlete track-click".to_string(),
            link_tag: "a".to_string(),
            cell_tag: "td".to_string(),
            time_class: "last-child".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SegmentId {
    Number(u64),
    Text(String),
}

/// Accepts segment ids written either as JSON numbers or strings
fn deserialize_segment_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids = Vec::<SegmentId>::deserialize(deserializer)?;
    Ok(ids
        .into_iter()
        .map(|id| match id {
            SegmentId::Number(n) => n.to_string(),
            SegmentId::Text(s) => s.trim().to_string(),
        })
        .collect())
}
