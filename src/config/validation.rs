use crate::config::types::{Config, CrawlerConfig, MarkupMarkers, RunConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
///
/// Point values are deliberately left alone: any sign or ordering is propagated as-is.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_segments(&config.segments)?;
    validate_runs(&config.runs)?;
    validate_crawler_config(&config.crawler)?;
    validate_markup(&config.markup)?;
    Ok(())
}

/// Validates the segment list
fn validate_segments(segments: &[String]) -> Result<(), ConfigError> {
    if segments.is_empty() {
        return Err(ConfigError::Validation(
            "segments must contain at least one segment id".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for segment in segments {
        if segment.is_empty() {
            return Err(ConfigError::Validation(
                "segment ids cannot be empty".to_string(),
            ));
        }
        if !seen.insert(segment.as_str()) {
            tracing::warn!("Segment {} is listed more than once and will be scored twice", segment);
        }
    }

    Ok(())
}

/// Validates run configurations
fn validate_runs(runs: &[RunConfig]) -> Result<(), ConfigError> {
    if runs.is_empty() {
        return Err(ConfigError::Validation(
            "runs must contain at least one run configuration".to_string(),
        ));
    }

    for (index, run) in runs.iter().enumerate() {
        if run.output_file.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "run {} has an empty output_file",
                index
            )));
        }

        if run.options.is_empty() {
            return Err(ConfigError::Validation(format!(
                "run '{}' must have at least one query option",
                run.output_file
            )));
        }
    }

    Ok(())
}

/// Validates crawler transport configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_http_url("base_url", &config.base_url)?;
    validate_http_url("api_base_url", &config.api_base_url)?;

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

/// Validates the markup markers
fn validate_markup(markup: &MarkupMarkers) -> Result<(), ConfigError> {
    let fields = [
        ("row_class", &markup.row_class),
        ("link_tag", &markup.link_tag),
        ("cell_tag", &markup.cell_tag),
        ("time_class", &markup.time_class),
    ];

    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "markup.{} cannot be empty",
                name
            )));
        }
    }

    Ok(())
}
