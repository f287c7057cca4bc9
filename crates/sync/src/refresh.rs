use crate::error::{ErrorKind, Result};
use tracing::{info, instrument, warn};
use vidtrend_history::Repository;
use vidtrend_source::{Category, Credential, Region, VideoSnapshot, VideoSource};

/// Outcome of one successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub region: Region,
    pub category: Category,
    /// Number of videos the source returned.
    pub fetched: usize,
    /// Number of rows appended to history. Zero for an empty chart or a
    /// dry-run repository.
    pub recorded: u64,
    /// The fetched chart in the source's order.
    pub videos: Vec<VideoSnapshot>,
}

/// Fetch the current chart for a region/category pair and record it.
///
/// Nothing is written when the fetch fails. When recording fails the batch is
/// rolled back, so history never holds a partial chart.
#[instrument(skip(source, repo, credential), fields(backend = source.name()))]
pub async fn refresh(
    source: &dyn VideoSource,
    repo: &Repository,
    region: Region,
    category: Category,
    credential: &Credential,
) -> Result<RefreshReport> {
    let videos = match source.fetch(region, category, credential).await {
        Ok(videos) => videos,
        Err(err) => {
            warn!(error = %&*err, "fetch failed, nothing recorded");
            return Err(ErrorKind::fetch(err));
        },
    };
    let recorded = repo.record(&videos).await.map_err(ErrorKind::record)?;
    info!(fetched = videos.len(), recorded, "refresh complete");
    Ok(RefreshReport { region, category, fetched: videos.len(), recorded, videos })
}
