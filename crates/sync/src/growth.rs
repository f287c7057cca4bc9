use crate::error::{ErrorKind, Result};
use time::UtcDateTime;
use vidtrend_history::{QueryFilter, Repository, SortOrder};
use vidtrend_source::{Category, Region};

/// Metrics of one video at one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPoint {
    pub observed_at: UtcDateTime,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

/// A single video's recorded metrics, oldest observation first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowthSeries {
    pub video_id: String,
    pub region: Region,
    pub category: Category,
    /// Title at the most recent observation.
    pub title: Option<String>,
    pub points: Vec<GrowthPoint>,
}
impl GrowthSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Views gained between the first and last observation. Negative when the
    /// platform revised its count downwards.
    pub fn view_gain(&self) -> Option<i128> {
        let (first, last) = (self.points.first()?, self.points.last()?);
        Some(i128::from(last.views) - i128::from(first.views))
    }

    /// Average views per hour between the first and last observation. `None`
    /// with fewer than two observations.
    pub fn views_per_hour(&self) -> Option<f64> {
        let (first, last) = (self.points.first()?, self.points.last()?);
        let hours = (last.observed_at - first.observed_at).as_seconds_f64() / 3600.0;
        (hours > 0.0).then(|| self.view_gain().unwrap_or_default() as f64 / hours)
    }
}

/// Read the stored growth series of one video within a region/category pair.
///
/// An unknown video is an empty series, not an error.
pub async fn growth(
    repo: &Repository,
    region: Region,
    category: Category,
    video_id: impl Into<String>,
    since: Option<UtcDateTime>,
) -> Result<GrowthSeries> {
    let video_id = video_id.into();
    let filter = QueryFilter::new(region, category)
        .with_video(video_id.clone())
        .since(since)
        .ordered_by(SortOrder::Chronological);
    let snapshots = repo.query(&filter).await.map_err(ErrorKind::record)?;
    let title = snapshots.last().map(|s| s.title.clone());
    let points = snapshots
        .iter()
        .map(|s| GrowthPoint { observed_at: s.observed_at, views: s.views, likes: s.likes, comments: s.comments })
        .collect();
    Ok(GrowthSeries { video_id, region, category, title, points })
}
