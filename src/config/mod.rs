//! Configuration module for Segment Leaderboard
//!
//! This module handles loading, parsing, and validating JSON (or TOML) configuration files.
//!
//! # Example
//!
//! ```no_run
//! use segment_leaderboard::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("leaderboard.json")).unwrap();
//! println!("Run configurations: {}", config.runs.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, MarkupMarkers, RunConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
