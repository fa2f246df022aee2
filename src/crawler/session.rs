//! Session credential loading
//!
//! Crawling runs as an authenticated user. The credential is either a curl/Netscape
//! cookie jar or a file holding a raw `Cookie` header value.

use crate::ConfigError;
use reqwest::header::HeaderValue;
use std::path::Path;

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

/// A single cookie from a jar file
#[derive(Debug, Clone, PartialEq, Eq)]
struct JarCookie {
    domain: String,
    name: String,
    value: String,
}

/// Reads a cookie file and returns the `Cookie` header to send to `host`
///
/// # Errors
///
/// Fails if the file cannot be read or yields no cookies for `host`.
pub fn load_cookie_header(path: &Path, host: &str) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let header = cookie_header(&content, host)?;
    tracing::debug!("Loaded session cookie from {}", path.display());
    Ok(header)
}

/// Builds a `Cookie` header value from cookie file content
pub fn cookie_header(content: &str, host: &str) -> Result<String, ConfigError> {
    let jar = parse_jar(content);

    let header = if jar.is_empty() {
        // Not a jar: treat the content as a raw header value
        content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.strip_prefix("Cookie:").unwrap_or(line).trim().to_string())
            .unwrap_or_default()
    } else {
        jar.iter()
            .filter(|cookie| domain_matches(&cookie.domain, host))
            .map(|cookie| format!("{}={}", cookie.name, cookie.value))
            .collect::<Vec<_>>()
            .join("; ")
    };

    if header.is_empty() {
        return Err(ConfigError::Credential(format!(
            "no cookies found for host '{}'",
            host
        )));
    }

    if HeaderValue::from_str(&header).is_err() {
        return Err(ConfigError::Credential(
            "cookie contains characters not allowed in an HTTP header".to_string(),
        ));
    }

    Ok(header)
}

fn parse_jar(content: &str) -> Vec<JarCookie> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim_end_matches(['\r', '\n']);
            let line = match line.strip_prefix(HTTP_ONLY_PREFIX) {
                Some(rest) => rest,
                None if line.starts_with('#') => return None,
                None => line,
            };

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 7 {
                return None;
            }

            Some(JarCookie {
                domain: fields[0].to_string(),
                name: fields[5].to_string(),
                value: fields[6].to_string(),
            })
        })
        .collect()
}

fn domain_matches(cookie_domain: &str, host: &str) -> bool {
    let domain = cookie_domain.trim_start_matches('.').to_ascii_lowercase();
    let host = host.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{}", domain))
}
