//! Video source trait and implementations.
//!
//! This module defines the `VideoSource` trait, the narrow interface the rest
//! of the workspace uses to ask "what's trending right now?" without caring
//! which platform (or test double) answers.

#[cfg(any(test, feature = "mock"))]
mod mock;
mod youtube;

#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockSource;
pub use self::youtube::{DEFAULT_BASE_URL, SourceOptions, YouTubeSource};
use crate::error::Result;
use crate::models::{Category, Credential, Region, VideoSnapshot};
use async_trait::async_trait;

/// The platform will never return more than this many items per page, and a
/// trending chart is only ever fetched as a single page.
pub const MAX_RESULTS: u8 = 50;
/// Default number of trending items requested per refresh.
pub const DEFAULT_MAX_RESULTS: u8 = 10;

/// Unified interface for trending video sources.
///
/// # Examples
///
/// ```
/// use vidtrend_source::{Category, Credential, Region, VideoSource};
/// use vidtrend_source::error::Result;
///
/// async fn top_music_video(source: &dyn VideoSource, key: &Credential) -> Result<Option<String>> {
///     let videos = source.fetch(Region::India, Category::Music, key).await?;
///     Ok(videos.into_iter().next().map(|v| v.title.clone()))
/// }
/// ```
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Name of the source (used for logging only).
    fn name(&self) -> &str;

    /// The most items a single [`fetch()`](Self::fetch) will ever return.
    fn max_results(&self) -> usize;

    /// Fetch the current trending chart for a region and category.
    ///
    /// The result is in the source's own ranking order (most popular first)
    /// and never longer than [`max_results()`](Self::max_results). An empty
    /// chart is not an error.
    ///
    /// Fails with [`Authentication`](crate::error::ErrorKind::Authentication)
    /// when the credential is refused, and with
    /// [`SourceUnavailable`](crate::error::ErrorKind::SourceUnavailable) on
    /// network, quota or rate-limit failures. A partial chart is never
    /// returned.
    async fn fetch(&self, region: Region, category: Category, credential: &Credential) -> Result<Vec<VideoSnapshot>>;

    /// Check that the credential is accepted, using the cheapest request
    /// the platform offers.
    async fn verify(&self, credential: &Credential) -> Result<()>;
}
