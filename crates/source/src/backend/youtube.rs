//! YouTube Data API v3 source.
//!
//! Trending charts come from `GET /videos?chart=mostPopular`, which answers
//! with at most one page of up to 50 items, so a refresh is always exactly one
//! request.

use super::{DEFAULT_MAX_RESULTS, MAX_RESULTS, VideoSource};
use crate::error::{ErrorKind, Result};
use crate::models::{Category, Credential, Region, Video, VideoSnapshot};
use async_trait::async_trait;
use exn::ResultExt;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcDateTime};
use tracing::instrument;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("vidtrend/", env!("CARGO_PKG_VERSION"));

/// Error reasons the platform uses for quota and rate limiting. Any other
/// `403` means the key itself isn't allowed to make the request.
const RATE_REASONS: [&str; 4] = ["quotaExceeded", "rateLimitExceeded", "userRateLimitExceeded", "dailyLimitExceeded"];
const KEY_REASONS: [&str; 3] = ["keyInvalid", "keyExpired", "authError"];
/// Returned when the platform has no chart for a region/category pair.
const NO_CHART_REASON: &str = "videoChartNotFound";

/// Connection settings for [`YouTubeSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Cap on items per fetch; clamped to `1..=50`.
    pub max_results: u8,
    pub timeout: Duration,
}
impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Trending charts from the YouTube Data API.
#[derive(Debug, Clone)]
pub struct YouTubeSource {
    base_url: String,
    max_results: u8,
    client: reqwest::Client,
}
impl YouTubeSource {
    pub fn new(options: SourceOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(options.timeout)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self {
            base_url: options.base_url.trim_end_matches('/').to_string(),
            max_results: options.max_results.clamp(1, MAX_RESULTS),
            client,
        })
    }

    async fn request(&self, params: &[(&str, &str)], credential: &Credential) -> Result<Option<VideoListResponse>> {
        let response = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(params)
            .query(&[("key", credential.expose())])
            .send()
            .await
            // The URL carries the API key; keep it out of the error tree.
            .map_err(reqwest::Error::without_url)
            .or_raise(|| ErrorKind::SourceUnavailable("could not reach the video platform".to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .or_raise(|| ErrorKind::SourceUnavailable("response body was interrupted".to_string()))?;
        match classify(status, &body) {
            Outcome::Success => {
                let list = serde_json::from_str::<VideoListResponse>(&body)
                    .or_raise(|| ErrorKind::MalformedResponse("video list".to_string()))?;
                Ok(Some(list))
            },
            Outcome::NoChart => Ok(None),
            Outcome::Failed(kind) => {
                tracing::warn!(status = status.as_u16(), error = %kind, "video platform refused request");
                exn::bail!(kind)
            },
        }
    }
}

#[async_trait]
impl VideoSource for YouTubeSource {
    fn name(&self) -> &str {
        "youtube"
    }

    fn max_results(&self) -> usize {
        usize::from(self.max_results)
    }

    #[instrument(skip(self, credential), fields(region = region.code(), category = category.slug()))]
    async fn fetch(&self, region: Region, category: Category, credential: &Credential) -> Result<Vec<VideoSnapshot>> {
        let max_results = self.max_results.to_string();
        let mut params = vec![
            ("part", "snippet,statistics"),
            ("chart", "mostPopular"),
            ("regionCode", region.code()),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(id) = category.platform_id() {
            params.push(("videoCategoryId", id));
        }
        let Some(list) = self.request(&params, credential).await? else {
            tracing::info!("no chart available for this region and category");
            return Ok(Vec::new());
        };
        let videos = list
            .items
            .into_iter()
            .take(self.max_results())
            .map(|item| item.into_video(region, category).map(VideoSnapshot::new))
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(count = videos.len(), "fetched trending chart");
        Ok(videos)
    }

    #[instrument(skip_all)]
    async fn verify(&self, credential: &Credential) -> Result<()> {
        let params = [("part", "id"), ("chart", "mostPopular"), ("maxResults", "1")];
        self.request(&params, credential).await?;
        Ok(())
    }
}

enum Outcome {
    Success,
    NoChart,
    Failed(ErrorKind),
}

/// Decide what a response status (and error body, if any) means for us.
fn classify(status: StatusCode, body: &str) -> Outcome {
    if status.is_success() {
        return Outcome::Success;
    }
    let error = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
    let message = error.as_ref().map(|e| e.message.clone()).unwrap_or_else(|| status.to_string());
    let error = error.as_ref();
    match status {
        StatusCode::NOT_FOUND if has_reason(error, &[NO_CHART_REASON]) => Outcome::NoChart,
        StatusCode::UNAUTHORIZED => Outcome::Failed(ErrorKind::Authentication(message)),
        StatusCode::BAD_REQUEST if has_reason(error, &KEY_REASONS) || message.contains("API key") => {
            Outcome::Failed(ErrorKind::Authentication(message))
        },
        StatusCode::FORBIDDEN if has_reason(error, &RATE_REASONS) => {
            Outcome::Failed(ErrorKind::SourceUnavailable(message))
        },
        StatusCode::FORBIDDEN => Outcome::Failed(ErrorKind::Authentication(message)),
        _ => Outcome::Failed(ErrorKind::SourceUnavailable(message)),
    }
}

fn has_reason(error: Option<&ApiError>, reasons: &[&str]) -> bool {
    error.is_some_and(|e| e.errors.iter().any(|d| reasons.contains(&d.reason.as_str())))
}

#[derive(Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<ApiVideo>,
}

#[derive(Deserialize)]
struct ApiVideo {
    id: String,
    snippet: Option<Snippet>,
    #[serde(default)]
    statistics: Statistics,
}
impl ApiVideo {
    fn into_video(self, region: Region, category: Category) -> Result<Video> {
        let snippet = self.snippet.ok_or_else(|| {
            exn::Exn::from(ErrorKind::MalformedResponse(format!("video {} has no snippet", self.id)))
        })?;
        let published_at = snippet.published_at.as_deref().and_then(|raw| match parse_timestamp(raw) {
            Some(at) => Some(at),
            None => {
                tracing::warn!(video = %self.id, value = raw, "ignoring unparseable publish time");
                None
            },
        });
        let thumbnail = [snippet.thumbnails.medium, snippet.thumbnails.high, snippet.thumbnails.default]
            .into_iter()
            .flatten()
            .next()
            .map(|t| t.url);
        Ok(Video {
            views: count("viewCount", self.statistics.view_count.as_deref())?,
            likes: count("likeCount", self.statistics.like_count.as_deref())?,
            comments: count("commentCount", self.statistics.comment_count.as_deref())?,
            id: self.id,
            title: snippet.title,
            channel: snippet.channel_title,
            region,
            category,
            published_at,
            thumbnail,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    channel_title: String,
    published_at: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Deserialize, Default)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: String,
}

// The platform encodes counts as strings, and omits them entirely when the
// uploader hides them.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    reason: String,
}

fn count(field: &'static str, value: Option<&str>) -> Result<u64> {
    match value {
        None => Ok(0),
        Some(raw) => raw.trim().parse::<u64>().or_raise(|| ErrorKind::MalformedResponse(format!("{field}: {raw}"))),
    }
}

fn parse_timestamp(raw: &str) -> Option<UtcDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok().map(OffsetDateTime::to_utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn error_body(code: u16, reason: &str, message: &str) -> String {
        serde_json::json!({
            "error": {
                "code": code,
                "message": message,
                "errors": [{ "message": message, "domain": "youtube", "reason": reason }]
            }
        })
        .to_string()
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST, "keyInvalid", "API key not valid. Please pass a valid API key.")]
    #[case(StatusCode::BAD_REQUEST, "badRequest", "API key expired. Please renew the API key.")]
    #[case(StatusCode::FORBIDDEN, "forbidden", "The request cannot be completed.")]
    #[case(StatusCode::FORBIDDEN, "accessNotConfigured", "YouTube Data API has not been used in project")]
    #[case(StatusCode::UNAUTHORIZED, "unauthorized", "Login required")]
    fn test_classify_authentication(#[case] status: StatusCode, #[case] reason: &str, #[case] message: &str) {
        let outcome = classify(status, &error_body(status.as_u16(), reason, message));
        assert!(matches!(outcome, Outcome::Failed(ErrorKind::Authentication(m)) if m == message));
    }

    #[rstest]
    #[case(StatusCode::FORBIDDEN, "quotaExceeded")]
    #[case(StatusCode::FORBIDDEN, "rateLimitExceeded")]
    #[case(StatusCode::FORBIDDEN, "dailyLimitExceeded")]
    #[case(StatusCode::TOO_MANY_REQUESTS, "rateLimitExceeded")]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, "backendError")]
    #[case(StatusCode::SERVICE_UNAVAILABLE, "backendError")]
    fn test_classify_unavailable(#[case] status: StatusCode, #[case] reason: &str) {
        let outcome = classify(status, &error_body(status.as_u16(), reason, "nope"));
        assert!(matches!(outcome, Outcome::Failed(ErrorKind::SourceUnavailable(_))));
    }

    #[test]
    fn test_classify_no_chart() {
        let body = error_body(404, NO_CHART_REASON, "The chart could not be found.");
        assert!(matches!(classify(StatusCode::NOT_FOUND, &body), Outcome::NoChart));
    }

    #[test]
    fn test_classify_without_body() {
        let outcome = classify(StatusCode::BAD_GATEWAY, "<html>upstream fell over</html>");
        assert!(matches!(outcome, Outcome::Failed(ErrorKind::SourceUnavailable(m)) if m.contains("502")));
    }

    #[test]
    fn test_into_video_hidden_counts() {
        let item: ApiVideo = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "snippet": {
                "title": "A title",
                "channelTitle": "A channel",
                "publishedAt": "2025-01-02T03:04:05Z",
                "thumbnails": { "default": { "url": "https://i.ytimg.com/vi/abc/default.jpg" } }
            },
            "statistics": { "viewCount": "1200" }
        }))
        .unwrap();
        let video = item.into_video(Region::Canada, Category::Comedy).unwrap();
        assert_eq!(video.views, 1200);
        assert_eq!(video.likes, 0);
        assert_eq!(video.comments, 0);
        assert_eq!(video.region, Region::Canada);
        assert_eq!(video.thumbnail.as_deref(), Some("https://i.ytimg.com/vi/abc/default.jpg"));
        assert_eq!(video.published_at.unwrap().year(), 2025);
    }

    #[test]
    fn test_into_video_bad_count() {
        let item: ApiVideo = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "snippet": { "title": "t", "channelTitle": "c" },
            "statistics": { "viewCount": "-4" }
        }))
        .unwrap();
        let err = item.into_video(Region::Canada, Category::Comedy).unwrap_err();
        assert!(matches!(&*err, ErrorKind::MalformedResponse(m) if m == "viewCount: -4"));
    }

    #[test]
    fn test_options_are_clamped() {
        let source = YouTubeSource::new(SourceOptions { max_results: 200, ..Default::default() }).unwrap();
        assert_eq!(source.max_results(), 50);
        let source = YouTubeSource::new(SourceOptions { max_results: 0, ..Default::default() }).unwrap();
        assert_eq!(source.max_results(), 1);
    }
}
