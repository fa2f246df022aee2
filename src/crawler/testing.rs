//! In-memory fetchers and page builders for unit tests

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::format_elapsed;
use crate::FetchError;
use std::sync::Mutex;
use url::Url;

/// Renders a leaderboard table in the scraped site's layout
pub fn leaderboard_page(rows: &[(String, u64)]) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, (name, seconds))| {
            format!(
                r#"<tr>
                    <td>{rank}</td>
                    <td class="athlete track-click"><a href="/athletes/{rank}">{name}</a></td>
                    <td><a href="/activities/{rank}">Jan 1, 2020</a></td>
                    <td>15.2mi/h</td>
                    <td>150bpm</td>
                    <td class="last-child">{time}</td>
                </tr>"#,
                rank = i + 1,
                name = name,
                time = format_elapsed(*seconds)
            )
        })
        .collect();

    format!(
        "<html><body><table class=\"table table-striped table-leaderboard\">\
         <thead><tr><th>Rank</th><th>Name</th></tr></thead><tbody>{}</tbody></table></body></html>",
        body
    )
}

/// Serves canned pages, routed by a substring of the requested URL
///
/// Pages are picked by the URL's `page` parameter; anything off the script is a 404.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    routes: Vec<(String, Vec<String>)>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    /// Serves `pages` for every URL
    pub fn new(pages: Vec<String>) -> Self {
        Self::routed(vec![(String::new(), pages)])
    }

    /// Serves the pages of the first route whose pattern occurs in the URL
    pub fn routed(routes: Vec<(String, Vec<String>)>) -> Self {
        Self {
            routes,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requested.lock().unwrap().len()
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());

        let page: usize = url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or(1);

        self.routes
            .iter()
            .find(|(pattern, _)| url.as_str().contains(pattern.as_str()))
            .and_then(|(_, pages)| pages.get(page - 1))
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
