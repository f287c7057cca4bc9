//! Serializable views of domain types, shared by the JSON API and the page
//! template.

use crate::error::{ErrorKind, Result};
use crate::format;
use exn::ResultExt;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcDateTime, UtcOffset};
use vidtrend_source::models::ObservationState;
use vidtrend_source::{Category, Recorded, Region, VideoSnapshot};
use vidtrend_sync::{GrowthSeries, RefreshReport};

pub(crate) fn rfc3339(at: UtcDateTime) -> Result<String> {
    at.to_offset(UtcOffset::UTC).format(&Rfc3339).or_raise(|| ErrorKind::invalid("timestamp out of range"))
}

pub(crate) fn parse_rfc3339(field: &str, raw: &str) -> Result<UtcDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339)
        .map(OffsetDateTime::to_utc)
        .or_raise(|| ErrorKind::invalid(format!("{field}: expected an RFC 3339 timestamp, got {raw:?}")))
}

#[derive(Debug, Serialize)]
pub struct VideoView {
    pub rank: usize,
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub region: &'static str,
    pub category: &'static str,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub engagement_rate: f64,
    pub comment_rate: f64,
    pub url: String,
    pub thumbnail: Option<String>,
    pub published_at: Option<String>,
    pub hours_since_published: Option<f64>,
    /// Only for recorded snapshots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<String>,
    /// Human-readable age, e.g. `"3.5h ago"`. Set by [`with_age()`](Self::with_age).
    pub age: Option<String>,
}
impl VideoView {
    fn build<S: ObservationState>(rank: usize, snapshot: &VideoSnapshot<S>, now: UtcDateTime) -> Result<Self> {
        let hours = snapshot.hours_since_published(now);
        Ok(Self {
            rank,
            video_id: snapshot.id.clone(),
            title: snapshot.title.clone(),
            channel: snapshot.channel.clone(),
            region: snapshot.region.code(),
            category: snapshot.category.slug(),
            views: snapshot.views,
            likes: snapshot.likes,
            comments: snapshot.comments,
            engagement_rate: snapshot.engagement_rate(),
            comment_rate: snapshot.comment_rate(),
            url: snapshot.url(),
            thumbnail: snapshot.thumbnail.clone(),
            published_at: snapshot.published_at.map(rfc3339).transpose()?,
            hours_since_published: hours,
            observed_at: None,
            age: None,
        })
    }

    pub fn recorded(rank: usize, snapshot: &VideoSnapshot<Recorded>, now: UtcDateTime) -> Result<Self> {
        let mut view = Self::build(rank, snapshot, now)?;
        view.observed_at = Some(rfc3339(snapshot.observed_at)?);
        Ok(view)
    }

    pub fn fetched<S: ObservationState>(rank: usize, snapshot: &VideoSnapshot<S>, now: UtcDateTime) -> Result<Self> {
        Self::build(rank, snapshot, now)
    }

    pub fn with_age(mut self) -> Self {
        self.age = self.hours_since_published.map(format::hours_ago);
        self
    }

    /// Views for a whole chart, ranked from 1 in the given order.
    pub fn chart(snapshots: &[VideoSnapshot<Recorded>], now: UtcDateTime) -> Result<Vec<Self>> {
        snapshots.iter().enumerate().map(|(i, s)| Self::recorded(i + 1, s, now)).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct GrowthPointView {
    pub observed_at: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

#[derive(Debug, Serialize)]
pub struct GrowthView {
    pub video_id: String,
    pub region: &'static str,
    pub category: &'static str,
    pub title: Option<String>,
    pub view_gain: Option<i64>,
    pub views_per_hour: Option<f64>,
    pub points: Vec<GrowthPointView>,
}
impl TryFrom<&GrowthSeries> for GrowthView {
    type Error = crate::error::Error;
    fn try_from(series: &GrowthSeries) -> std::result::Result<Self, Self::Error> {
        let points = series
            .points
            .iter()
            .map(|p| {
                Ok(GrowthPointView {
                    observed_at: rfc3339(p.observed_at)?,
                    views: p.views,
                    likes: p.likes,
                    comments: p.comments,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            video_id: series.video_id.clone(),
            region: series.region.code(),
            category: series.category.slug(),
            title: series.title.clone(),
            view_gain: series.view_gain().and_then(|gain| i64::try_from(gain).ok()),
            views_per_hour: series.views_per_hour(),
            points,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshView {
    pub region: &'static str,
    pub category: &'static str,
    pub fetched: usize,
    pub recorded: u64,
    pub videos: Vec<VideoView>,
}
impl RefreshView {
    pub fn build(report: &RefreshReport, now: UtcDateTime) -> Result<Self> {
        let videos = report
            .videos
            .iter()
            .enumerate()
            .map(|(i, s)| VideoView::fetched(i + 1, s, now))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            region: report.region.code(),
            category: report.category.slug(),
            fetched: report.fetched,
            recorded: report.recorded,
            videos,
        })
    }
}

/// An `<option>` in a selector.
#[derive(Debug, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}
impl Choice {
    pub fn regions(selected: Region) -> Vec<Self> {
        Region::ALL
            .iter()
            .map(|r| Self { value: r.code(), label: r.as_str(), selected: *r == selected })
            .collect()
    }

    pub fn categories(selected: Category) -> Vec<Self> {
        Category::ALL
            .iter()
            .map(|c| Self { value: c.slug(), label: c.as_str(), selected: *c == selected })
            .collect()
    }
}
