//! In-memory video source for testing.

use super::{DEFAULT_MAX_RESULTS, VideoSource};
use crate::error::{ErrorKind, Result};
use crate::models::{Category, Credential, Region, Video, VideoSnapshot};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use time::{Duration, UtcDateTime};
use tokio::sync::RwLock;

/// In-memory video source for testing.
///
/// Charts are stored per (region, category) behind a [`RwLock`] so that a
/// test can change the numbers between two refreshes. A chart that was never
/// set is empty, exactly like a real region/category with nothing trending.
///
/// # Examples
///
/// ```ignore
/// use vidtrend_source::{Category, Credential, MockSource, Region, VideoSource};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = MockSource::default()
///     .with_credential("valid-key")
///     .with_generated_chart(Region::UnitedStates, Category::Gaming, 10);
/// let key = Credential::new("valid-key")?;
/// let videos = source.fetch(Region::UnitedStates, Category::Gaming, &key).await?;
/// assert_eq!(videos.len(), 10);
/// # Ok(())
/// # }
/// ```
pub struct MockSource {
    name: String,
    credential: Option<String>,
    max_results: usize,
    charts: RwLock<HashMap<(Region, Category), Vec<Video>>>,
    failure: RwLock<Option<ErrorKind>>,
    requests: AtomicUsize,
}

impl MockSource {
    /// Only accept this token; any other fails with
    /// [`Authentication`](ErrorKind::Authentication). Without this, every
    /// non-empty token is accepted.
    pub fn with_credential(mut self, token: impl Into<String>) -> Self {
        self.credential = Some(token.into());
        self
    }

    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Pre-populate a chart. Videos are returned in the given order.
    pub fn with_chart(mut self, region: Region, category: Category, videos: impl IntoIterator<Item = Video>) -> Self {
        self.charts.get_mut().insert((region, category), videos.into_iter().collect());
        self
    }

    /// Pre-populate a chart with `count` synthetic videos, most viewed first.
    pub fn with_generated_chart(self, region: Region, category: Category, count: usize) -> Self {
        self.with_chart(region, category, Self::generate(region, category, count))
    }

    /// Replace a chart after construction.
    pub async fn set_chart(&self, region: Region, category: Category, videos: impl IntoIterator<Item = Video>) {
        self.charts.write().await.insert((region, category), videos.into_iter().collect());
    }

    /// Make every following request fail with `kind`, until cleared with
    /// [`succeed()`](Self::succeed).
    pub async fn fail_with(&self, kind: ErrorKind) {
        *self.failure.write().await = Some(kind);
    }

    pub async fn succeed(&self) {
        *self.failure.write().await = None;
    }

    /// Number of requests that reached the "platform" (i.e. passed local
    /// credential validation).
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Synthetic chart: IDs `{region}-{category}-{rank}`, views descending by
    /// rank so the chart is ordered the same way a real one would be.
    pub fn generate(region: Region, category: Category, count: usize) -> Vec<Video> {
        let published = UtcDateTime::now() - Duration::hours(12);
        (0..count)
            .map(|rank| {
                let views = 1_000_000u64.saturating_sub(rank as u64 * 10_000);
                Video {
                    id: format!("{}-{}-{rank:02}", region.code(), category.slug()),
                    title: format!("{category} hit #{}", rank + 1),
                    channel: format!("Channel {}", rank + 1),
                    region,
                    category,
                    views,
                    likes: views / 20,
                    comments: views / 200,
                    published_at: Some(published),
                    thumbnail: None,
                }
            })
            .collect()
    }

    async fn check(&self, credential: &Credential) -> Result<()> {
        if let Some(expected) = &self.credential
            && expected != credential.expose()
        {
            exn::bail!(ErrorKind::Authentication("API key not valid".to_string()));
        }
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(kind) = self.failure.read().await.clone() {
            exn::bail!(kind);
        }
        Ok(())
    }
}
impl Default for MockSource {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            credential: None,
            max_results: usize::from(DEFAULT_MAX_RESULTS),
            charts: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
            requests: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl VideoSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_results(&self) -> usize {
        self.max_results
    }

    async fn fetch(&self, region: Region, category: Category, credential: &Credential) -> Result<Vec<VideoSnapshot>> {
        self.check(credential).await?;
        let guard = self.charts.read().await;
        let chart = guard.get(&(region, category)).map(Vec::as_slice).unwrap_or_default();
        Ok(chart
            .iter()
            .take(self.max_results)
            .cloned()
            .map(|video| VideoSnapshot::new(Video { region, category, ..video }))
            .collect())
    }

    async fn verify(&self, credential: &Credential) -> Result<()> {
        self.check(credential).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(token: &str) -> Credential {
        Credential::new(token).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_is_capped_and_ordered() {
        let source = MockSource::default()
            .with_max_results(5)
            .with_generated_chart(Region::UnitedStates, Category::Gaming, 20);
        let videos = source.fetch(Region::UnitedStates, Category::Gaming, &key("k")).await.unwrap();
        assert_eq!(videos.len(), 5);
        assert!(videos.windows(2).all(|w| w[0].views >= w[1].views));
    }

    #[tokio::test]
    async fn test_unknown_chart_is_empty() {
        let source = MockSource::default();
        let videos = source.fetch(Region::Japan, Category::Comedy, &key("k")).await.unwrap();
        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_credential() {
        let source = MockSource::default().with_credential("good");
        let err = source.fetch(Region::India, Category::Music, &key("bad-token")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Authentication(_)));
        assert_eq!(source.requests(), 0);
        assert!(source.verify(&key("good")).await.is_ok());
    }

    #[tokio::test]
    async fn test_failure_until_cleared() {
        let source = MockSource::default();
        source.fail_with(ErrorKind::SourceUnavailable("quotaExceeded".to_string())).await;
        let err = source.verify(&key("k")).await.unwrap_err();
        assert!(err.is_retryable());
        source.succeed().await;
        assert!(source.verify(&key("k")).await.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_stamps_requested_pair() {
        let videos = MockSource::generate(Region::Canada, Category::Music, 2);
        let source = MockSource::default().with_chart(Region::India, Category::Sports, videos);
        let fetched = source.fetch(Region::India, Category::Sports, &key("k")).await.unwrap();
        assert!(fetched.iter().all(|v| v.region == Region::India && v.category == Category::Sports));
    }
}
