//! Integration tests for the crawl pipeline
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! crawl → parse → rank → score flow end-to-end.

use segment_leaderboard::config::{parse_config, Config};
use segment_leaderboard::crawler::{build_http_client, star_segment};
use segment_leaderboard::output::write_leaderboard;
use segment_leaderboard::pipeline::{find_missing, http_crawler, lookup_ranks, score_run};
use segment_leaderboard::{ConfigError, FetchError, LeaderboardError};
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COOKIE: &str = "_strava4_session=test-session";

/// Renders a leaderboard page in the scraped site's table layout
fn leaderboard_page<N: AsRef<str>, T: AsRef<str>>(rows: &[(N, T)]) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, (name, time))| {
            format!(
                r#"<tr><td>{rank}</td>
                <td class="athlete track-click"><div class="avatar"><a href="/athletes/{rank}"><img src="/a.png"></a></div>
                <a href="/athletes/{rank}">{name}</a></td>
                <td><a href="/activities/{rank}">Jun 1, 2021</a></td>
                <td class="last-child">{time}</td></tr>"#,
                rank = i + 1,
                name = name.as_ref(),
                time = time.as_ref()
            )
        })
        .collect();

    format!(
        r#"<table class="table table-striped table-leaderboard"><tbody>{}</tbody></table>"#,
        body
    )
}

/// Mounts one leaderboard page for a (segment, filter, page) triple
async fn mount_page(server: &MockServer, segment: &str, filter: &str, page: u32, html: String) {
    Mock::given(method("GET"))
        .and(path(format!("/segments/{}", segment)))
        .and(query_param("partial", "true"))
        .and(query_param("filter", filter))
        .and(query_param("page", page.to_string()))
        .and(query_param("per_page", "100"))
        .and(header("cookie", COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .expect(1)
        .mount(server)
        .await;
}

fn test_config(server: &MockServer, segments: &[&str], extra_crawler: &str) -> Config {
    let segments = segments
        .iter()
        .map(|s| format!("\"{}\"", s))
        .collect::<Vec<_>>()
        .join(", ");
    let json = format!(
        r#"{{
            "segments": [{segments}],
            "points": [35, 30, 25, 20],
            "participation_points": 0,
            "unmatched_participation_points": 5,
            "runs": [
                {{"output_file": "overall.csv", "options": ["filter=overall"]}},
                {{"output_file": "merged.csv", "options": ["filter=overall", "filter=recent"]}}
            ],
            "crawler": {{
                "base_url": "{base}/",
                "request_timeout_secs": 5{extra}
            }}
        }}"#,
        segments = segments,
        base = server.uri(),
        extra = extra_crawler
    );
    parse_config(&json, false).expect("valid test config")
}

fn cookie_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", COOKIE).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_leaderboard_over_multiple_pages_and_options() {
    let server = MockServer::start().await;

    // Segment 1, overall: a full page of 100 then a short page
    let mut first_page: Vec<(String, String)> = (0..100)
        .map(|i| (format!("Rider {:03}", i), format!("{}:00", 10 + i)))
        .collect();
    first_page[0] = ("Alice".to_string(), "5:00".to_string());
    first_page[1] = ("Bob".to_string(), "5:00".to_string());
    mount_page(&server, "1", "overall", 1, leaderboard_page(&first_page)).await;
    mount_page(
        &server,
        "1",
        "overall",
        2,
        leaderboard_page(&[("Carol", "2:00:00")]),
    )
    .await;

    // Segment 2, overall: a single short page
    mount_page(
        &server,
        "2",
        "overall",
        1,
        leaderboard_page(&[("Carol", "45"), ("Alice", "50")]),
    )
    .await;

    let config = test_config(&server, &["1", "2"], "");
    let cookies = cookie_file();
    let crawler = http_crawler(&config, cookies.path()).expect("crawler");

    let board = score_run(
        &crawler,
        &config.markup,
        &config.segments,
        &config.scoring,
        &config.runs[0],
    )
    .await
    .expect("scoring run");

    // Alice: 35 (tie for first) + 30; Bob: 35; Carol: 5 (101st) + 35
    let alice = board.iter().find(|e| e.name == "Alice").unwrap();
    let bob = board.iter().find(|e| e.name == "Bob").unwrap();
    let carol = board.iter().find(|e| e.name == "Carol").unwrap();
    assert_eq!((alice.points, alice.segments_completed), (65, 2));
    assert_eq!((bob.points, bob.segments_completed), (35, 1));
    assert_eq!((carol.points, carol.segments_completed), (40, 2));
    assert_eq!(board.len(), 101);
    assert_eq!(board[0].name, "Alice");
    assert!(board.windows(2).all(|w| w[0].points >= w[1].points));

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join(&config.runs[0].output_file);
    write_leaderboard(&out, &board).unwrap();
    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("Alice,65,2\n"));
    assert_eq!(content.lines().count(), 101);
}

#[tokio::test]
async fn test_later_option_overrides_earlier_option() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "7",
        "overall",
        1,
        leaderboard_page(&[("alice", "10"), ("bob", "15")]),
    )
    .await;
    mount_page(
        &server,
        "7",
        "recent",
        1,
        leaderboard_page(&[("alice", "20")]),
    )
    .await;

    let config = test_config(&server, &["7"], "");
    let cookies = cookie_file();
    let crawler = http_crawler(&config, cookies.path()).unwrap();

    let records = lookup_ranks(
        &crawler,
        &config.markup,
        &config.segments,
        &config.runs[1],
        "alice",
    )
    .await
    .unwrap();

    // alice's merged time is 20, behind bob's 15
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].rank, 2);
    assert_eq!(records[0].field_size, 2);
}

#[tokio::test]
async fn test_missing_segments() {
    let server = MockServer::start().await;

    mount_page(&server, "1", "overall", 1, leaderboard_page(&[("Dana", "1:00")])).await;
    mount_page(&server, "2", "overall", 1, leaderboard_page(&[("Eli", "1:00")])).await;
    mount_page(&server, "3", "overall", 1, leaderboard_page(&[("Dana", "2:00")])).await;

    let config = test_config(&server, &["1", "2", "3"], "");
    let cookies = cookie_file();
    let crawler = http_crawler(&config, cookies.path()).unwrap();

    let missing = find_missing(&crawler, &config.markup, &config.segments, "filter=overall", "Dana")
        .await
        .unwrap();
    assert_eq!(missing, vec!["2"]);
}

#[tokio::test]
async fn test_server_error_aborts_without_retry_by_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/segments/9"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, &["9"], "");
    let cookies = cookie_file();
    let crawler = http_crawler(&config, cookies.path()).unwrap();

    let err = score_run(
        &crawler,
        &config.markup,
        &config.segments,
        &config.scoring,
        &config.runs[0],
    )
    .await
    .unwrap_err();

    match err {
        LeaderboardError::Network {
            segment,
            option,
            page,
            source: FetchError::Status { status, .. },
        } => {
            assert_eq!(segment, "9");
            assert_eq!(option, "filter=overall");
            assert_eq!(page, 1);
            assert_eq!(status, 500);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_retried_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/segments/9"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let config = test_config(&server, &["9"], r#", "max_retries": 2, "retry_delay_ms": 1"#);
    let cookies = cookie_file();
    let crawler = http_crawler(&config, cookies.path()).unwrap();

    let result = find_missing(&crawler, &config.markup, &config.segments, "filter=overall", "x").await;
    assert!(matches!(result, Err(LeaderboardError::Network { .. })));
}

#[tokio::test]
async fn test_client_error_is_never_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/segments/4"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, &["4"], r#", "max_retries": 3, "retry_delay_ms": 1"#);
    let cookies = cookie_file();
    let crawler = http_crawler(&config, cookies.path()).unwrap();

    let result = find_missing(&crawler, &config.markup, &config.segments, "filter=overall", "x").await;
    assert!(matches!(
        result,
        Err(LeaderboardError::Network {
            source: FetchError::Status { status: 403, .. },
            ..
        })
    ));
}

#[tokio::test]
async fn test_malformed_time_is_a_parse_error() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "5",
        "overall",
        1,
        leaderboard_page(&[("Alice", "1:0x")]),
    )
    .await;

    let config = test_config(&server, &["5"], "");
    let cookies = cookie_file();
    let crawler = http_crawler(&config, cookies.path()).unwrap();

    let result = score_run(
        &crawler,
        &config.markup,
        &config.segments,
        &config.scoring,
        &config.runs[0],
    )
    .await;
    assert!(matches!(result, Err(LeaderboardError::Parse { page: 1, .. })));
}

#[tokio::test]
async fn test_unusable_session_cookie_is_a_config_error() {
    let server = MockServer::start().await;
    let config = test_config(&server, &["1"], "");

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"_session=abc\x7fdef\n").unwrap();
    file.flush().unwrap();

    let result = http_crawler(&config, file.path());
    assert!(matches!(
        result,
        Err(LeaderboardError::Config(ConfigError::Credential(_)))
    ));
}

#[tokio::test]
async fn test_missing_crawls_duplicate_segments_once() {
    let server = MockServer::start().await;

    mount_page(&server, "1", "overall", 1, leaderboard_page(&[("Dana", "1:00")])).await;
    mount_page(&server, "2", "overall", 1, leaderboard_page(&[("Eli", "1:00")])).await;

    let config = test_config(&server, &["2", "1", "2"], "");
    let cookies = cookie_file();
    let crawler = http_crawler(&config, cookies.path()).unwrap();

    let missing = find_missing(&crawler, &config.markup, &config.segments, "filter=overall", "Dana")
        .await
        .unwrap();
    assert_eq!(missing, vec!["2"]);
}

#[tokio::test]
async fn test_star_segment() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v3/segments/42/starred"))
        .and(header("authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":42,"starred":true}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_http_client(&Default::default(), None).unwrap();
    let api_base = url::Url::parse(&format!("{}/api/v3/", server.uri())).unwrap();

    let body = star_segment(&client, &api_base, "token-123", "42").await.unwrap();
    assert!(body.contains("\"starred\":true"));
}
