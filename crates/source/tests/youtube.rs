//! YouTube source integration tests.
//!
//! Starts an axum server that imitates the `videos` endpoint and points a
//! real `YouTubeSource` at it.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use vidtrend_source::error::ErrorKind;
use vidtrend_source::{Category, Credential, Region, SourceOptions, VideoSource, YouTubeSource};

const VALID: &str = "valid-key";
const EXHAUSTED: &str = "exhausted-key";
/// Accepted, but answered with a captive-portal style HTML page.
const GARBLED: &str = "garbled-key";

fn error(code: u16, reason: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message,
            "errors": [{ "message": message, "domain": "youtube.quota", "reason": reason }]
        }
    })
}

fn item(rank: usize, region: &str, category: &str) -> Value {
    let views = 5_000_000 - rank * 100_000;
    json!({
        "kind": "youtube#video",
        "id": format!("vid{rank:02}"),
        "snippet": {
            "publishedAt": "2025-06-01T12:00:00Z",
            "channelTitle": format!("Channel {rank}"),
            "title": format!("{region}/{category} #{rank}"),
            "thumbnails": {
                "default": { "url": format!("https://i.ytimg.com/vi/vid{rank:02}/default.jpg") },
                "medium": { "url": format!("https://i.ytimg.com/vi/vid{rank:02}/mqdefault.jpg") }
            }
        },
        "statistics": {
            "viewCount": views.to_string(),
            "likeCount": (views / 10).to_string(),
            "commentCount": (views / 100).to_string()
        }
    })
}

async fn videos(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("key").map(String::as_str) {
        Some(VALID) => {},
        Some(GARBLED) => {
            return (StatusCode::OK, "<html><body>Sign in to continue</body></html>").into_response();
        },
        Some(EXHAUSTED) => {
            let body = error(403, "quotaExceeded", "The request cannot be completed because you have exceeded your quota.");
            return (StatusCode::FORBIDDEN, Json(body)).into_response();
        },
        _ => {
            let body = error(400, "keyInvalid", "API key not valid. Please pass a valid API key.");
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        },
    }
    let region = params.get("regionCode").cloned().unwrap_or_default();
    let category = params.get("videoCategoryId").cloned().unwrap_or_else(|| "none".to_string());
    if region == "KR" {
        let body = error(404, "videoChartNotFound", "The requested video chart is not supported or is not available.");
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    }
    let requested = params.get("maxResults").and_then(|m| m.parse::<usize>().ok()).unwrap_or(5);
    // Brazil ignores maxResults entirely, so the client has to enforce its own cap.
    let count = if region == "BR" { 25 } else { requested.min(25) };
    let items = (0..count).map(|rank| item(rank, &region, &category)).collect::<Vec<_>>();
    Json(json!({ "kind": "youtube#videoListResponse", "items": items })).into_response()
}

/// Bind to port 0 and return the actual address.
async fn start_server() -> String {
    let app = Router::new().route("/youtube/v3/videos", get(videos));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/youtube/v3")
}

async fn source(max_results: u8) -> YouTubeSource {
    YouTubeSource::new(SourceOptions {
        base_url: start_server().await,
        max_results,
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn key(token: &str) -> Credential {
    Credential::new(token).unwrap()
}

#[tokio::test]
async fn fetch_returns_ranked_chart() {
    let source = source(10).await;
    let videos = source.fetch(Region::UnitedStates, Category::Gaming, &key(VALID)).await.unwrap();
    assert_eq!(videos.len(), 10);
    assert!(videos.windows(2).all(|w| w[0].views > w[1].views));
    let first = &videos[0];
    assert_eq!(first.id, "vid00");
    assert_eq!(first.title, "US/20 #0");
    assert_eq!(first.channel, "Channel 0");
    assert_eq!(first.region, Region::UnitedStates);
    assert_eq!(first.category, Category::Gaming);
    assert_eq!(first.likes, 500_000);
    assert_eq!(first.comments, 50_000);
    assert_eq!(first.thumbnail.as_deref(), Some("https://i.ytimg.com/vi/vid00/mqdefault.jpg"));
    assert!(first.published_at.is_some());
}

#[tokio::test]
async fn fetch_trending_sends_no_category() {
    let source = source(3).await;
    let videos = source.fetch(Region::India, Category::Trending, &key(VALID)).await.unwrap();
    assert_eq!(videos.len(), 3);
    assert_eq!(videos[0].title, "IN/none #0");
}

#[tokio::test]
async fn fetch_enforces_cap() {
    let source = source(10).await;
    let videos = source.fetch(Region::Brazil, Category::Music, &key(VALID)).await.unwrap();
    assert_eq!(videos.len(), 10);
}

#[tokio::test]
async fn fetch_invalid_key_is_authentication_error() {
    let source = source(10).await;
    let err = source.fetch(Region::India, Category::Music, &key("bad-token")).await.unwrap_err();
    assert!(matches!(&*err, ErrorKind::Authentication(m) if m.contains("API key not valid")));
}

#[tokio::test]
async fn fetch_quota_is_unavailable() {
    let source = source(10).await;
    let err = source.fetch(Region::India, Category::Music, &key(EXHAUSTED)).await.unwrap_err();
    assert!(matches!(&*err, ErrorKind::SourceUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn fetch_undecodable_success_is_malformed() {
    let source = source(10).await;
    let err = source.fetch(Region::France, Category::Music, &key(GARBLED)).await.unwrap_err();
    assert!(matches!(&*err, ErrorKind::MalformedResponse(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn fetch_missing_chart_is_empty() {
    let source = source(10).await;
    let videos = source.fetch(Region::SouthKorea, Category::Comedy, &key(VALID)).await.unwrap();
    assert!(videos.is_empty());
}

#[tokio::test]
async fn fetch_unreachable_is_unavailable() {
    // Nothing listens on the discard port.
    let source = YouTubeSource::new(SourceOptions {
        base_url: "http://127.0.0.1:9".to_string(),
        max_results: 10,
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let err = source.fetch(Region::Canada, Category::Sports, &key(VALID)).await.unwrap_err();
    assert!(matches!(&*err, ErrorKind::SourceUnavailable(_)));
    assert!(!format!("{err:?}").contains(VALID), "API key leaked into error");
}

#[tokio::test]
async fn verify_checks_credential() {
    let source = source(10).await;
    assert!(source.verify(&key(VALID)).await.is_ok());
    let err = source.verify(&key("nope")).await.unwrap_err();
    assert!(matches!(&*err, ErrorKind::Authentication(_)));
}
