//! Segment starring through the platform's REST API

use crate::{FetchError, LeaderboardError};
use reqwest::Client;
use url::Url;

/// Marks one segment as starred for the token's owner
///
/// Sends `PUT {api_base}segments/{id}/starred` and returns the response body.
pub async fn star_segment(
    client: &Client,
    api_base: &Url,
    access_token: &str,
    segment: &str,
) -> Result<String, LeaderboardError> {
    let url = api_base.join(&format!("segments/{}/starred", segment))?;

    let response = client
        .put(url.clone())
        .bearer_auth(access_token)
        .form(&[("starred", "true")])
        .send()
        .await
        .map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    let body = response.text().await.map_err(|source| FetchError::Http {
        url: url.to_string(),
        source,
    })?;
    Ok(body)
}

/// Splits a comma-separated segment list, dropping blanks
pub fn split_segment_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
