use super::{Category, Region};
use std::fmt::Debug;
use std::ops::Deref;
use time::UtcDateTime;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Attributes of a video as reported by the platform at fetch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    /// Platform video ID, stable across fetches.
    pub id: String,
    pub title: String,
    /// Channel display name.
    pub channel: String,
    pub region: Region,
    pub category: Category,
    pub views: u64,
    /// Zero when the uploader has hidden likes.
    pub likes: u64,
    /// Zero when comments are disabled.
    pub comments: u64,
    pub published_at: Option<UtcDateTime>,
    /// Medium-resolution thumbnail URL.
    pub thumbnail: Option<String>,
}
impl Video {
    pub fn url(&self) -> String {
        format!("{WATCH_URL}{}", self.id)
    }

    /// `(likes + comments) / views`, or zero for a video without views.
    pub fn engagement_rate(&self) -> f64 {
        Self::ratio(self.likes.saturating_add(self.comments), self.views)
    }

    /// `comments / views`, or zero for a video without views.
    pub fn comment_rate(&self) -> f64 {
        Self::ratio(self.comments, self.views)
    }

    /// Fractional hours between publication and `now`. `None` when the
    /// publication time is unknown.
    pub fn hours_since_published(&self, now: UtcDateTime) -> Option<f64> {
        self.published_at.map(|published| (now - published).as_seconds_f64() / 3600.0)
    }

    fn ratio(numerator: u64, denominator: u64) -> f64 {
        match denominator {
            0 => 0.0,
            d => numerator as f64 / d as f64,
        }
    }
}

// A snapshot is either fresh from the source (no observation time yet) or has
// been written to history, the only place an observation time gets assigned.
mod sealed {
    pub trait Sealed {}
}
pub trait ObservationState: sealed::Sealed {
    type Stamp: Debug + Clone + PartialEq + Eq;
}

/// Returned by a source; not yet written anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fetched;
impl sealed::Sealed for Fetched {}
impl ObservationState for Fetched {
    type Stamp = ();
}

/// Persisted in history with an assigned observation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recorded;
impl sealed::Sealed for Recorded {}
impl ObservationState for Recorded {
    type Stamp = UtcDateTime;
}

/// One observation of a video's metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSnapshot<S: ObservationState = Fetched> {
    video: Video,
    pub observed_at: S::Stamp,
}
impl<S: ObservationState> VideoSnapshot<S> {
    // Explicit version of self.deref()
    pub fn video(&self) -> &Video {
        &self.video
    }

    pub fn into_video(self) -> Video {
        self.video
    }
}
impl<S: ObservationState> Deref for VideoSnapshot<S> {
    type Target = Video;
    fn deref(&self) -> &Video {
        &self.video
    }
}
impl<S: ObservationState> AsRef<Video> for VideoSnapshot<S> {
    fn as_ref(&self) -> &Video {
        &self.video
    }
}

impl VideoSnapshot {
    pub fn new(video: Video) -> Self {
        Self { video, observed_at: () }
    }
}
impl<S: ObservationState> VideoSnapshot<S> {
    /// Stamp the snapshot with the time it was written to history.
    pub fn observed(self, at: UtcDateTime) -> VideoSnapshot<Recorded> {
        VideoSnapshot { video: self.video, observed_at: at }
    }
}
impl From<Video> for VideoSnapshot<Fetched> {
    fn from(video: Video) -> Self {
        Self::new(video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn video(views: u64, likes: u64, comments: u64) -> Video {
        Video {
            id: "dQw4w9WgXcQ".to_string(),
            title: "Never Gonna Give You Up".to_string(),
            channel: "Rick Astley".to_string(),
            region: Region::UnitedKingdom,
            category: Category::Music,
            views,
            likes,
            comments,
            published_at: None,
            thumbnail: None,
        }
    }

    #[test]
    fn test_rates() {
        let video = video(1_000, 40, 10);
        assert!((video.engagement_rate() - 0.05).abs() < f64::EPSILON);
        assert!((video.comment_rate() - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rates_without_views() {
        let video = video(0, 3, 1);
        assert_eq!(video.engagement_rate(), 0.0);
        assert_eq!(video.comment_rate(), 0.0);
    }

    #[test]
    fn test_url() {
        assert_eq!(video(0, 0, 0).url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn test_hours_since_published() {
        let now = UtcDateTime::now();
        let mut video = video(0, 0, 0);
        assert_eq!(video.hours_since_published(now), None);
        video.published_at = Some(now - Duration::minutes(90));
        let hours = video.hours_since_published(now).unwrap();
        assert!((hours - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_observed_keeps_video() {
        let at = UtcDateTime::now();
        let snapshot = VideoSnapshot::new(video(5, 1, 0)).observed(at);
        assert_eq!(snapshot.observed_at, at);
        assert_eq!(snapshot.views, 5);
        assert_eq!(snapshot.video().channel, "Rick Astley");
    }
}
