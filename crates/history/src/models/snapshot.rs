use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use time::UtcDateTime;
use vidtrend_source::models::ObservationState;
use vidtrend_source::{Category, Recorded, Region, Video, VideoSnapshot};

/// A snapshot as read back from `video_snapshots`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SnapshotRow {
    pub(crate) video_id: String,
    pub(crate) title: String,
    pub(crate) channel: String,
    pub(crate) region: String,
    pub(crate) category: String,
    pub(crate) views: i64,
    pub(crate) likes: i64,
    pub(crate) comments: i64,
    #[sqlx(default)]
    pub(crate) published_at: Option<i64>,
    #[sqlx(default)]
    pub(crate) thumbnail: Option<String>,
    pub(crate) observed_at: i64,
}
impl TryFrom<SnapshotRow> for VideoSnapshot<Recorded> {
    type Error = Error;
    fn try_from(row: SnapshotRow) -> std::result::Result<Self, Self::Error> {
        let video = Video {
            id: row.video_id,
            title: row.title,
            channel: row.channel,
            region: row.region.parse::<Region>().or_raise(|| ErrorKind::InvalidData("region"))?,
            category: row.category.parse::<Category>().or_raise(|| ErrorKind::InvalidData("category"))?,
            views: u64::try_from(row.views).or_raise(|| ErrorKind::InvalidData("views"))?,
            likes: u64::try_from(row.likes).or_raise(|| ErrorKind::InvalidData("likes"))?,
            comments: u64::try_from(row.comments).or_raise(|| ErrorKind::InvalidData("comments"))?,
            published_at: row
                .published_at
                .map(UtcDateTime::from_unix_timestamp)
                .transpose()
                .or_raise(|| ErrorKind::InvalidData("publish date"))?,
            thumbnail: row.thumbnail,
        };
        Ok(VideoSnapshot::new(video).observed(from_nanos(row.observed_at)?))
    }
}

/// A snapshot about to be inserted; everything except the observation time,
/// which only the write transaction knows.
#[derive(Debug)]
pub(crate) struct NewSnapshotRow {
    pub(crate) video_id: String,
    pub(crate) title: String,
    pub(crate) channel: String,
    pub(crate) region: &'static str,
    pub(crate) category: &'static str,
    pub(crate) views: i64,
    pub(crate) likes: i64,
    pub(crate) comments: i64,
    pub(crate) engagement_rate: f64,
    pub(crate) comment_rate: f64,
    pub(crate) published_at: Option<i64>,
    pub(crate) thumbnail: Option<String>,
}
impl<S: ObservationState> TryFrom<&VideoSnapshot<S>> for NewSnapshotRow {
    type Error = Error;
    fn try_from(snapshot: &VideoSnapshot<S>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            video_id: snapshot.id.clone(),
            title: snapshot.title.clone(),
            channel: snapshot.channel.clone(),
            // Codes and slugs are stable; display names are for humans.
            region: snapshot.region.code(),
            category: snapshot.category.slug(),
            views: i64::try_from(snapshot.views).or_raise(|| ErrorKind::InvalidData("views"))?,
            likes: i64::try_from(snapshot.likes).or_raise(|| ErrorKind::InvalidData("likes"))?,
            comments: i64::try_from(snapshot.comments).or_raise(|| ErrorKind::InvalidData("comments"))?,
            engagement_rate: snapshot.engagement_rate(),
            comment_rate: snapshot.comment_rate(),
            published_at: snapshot.published_at.map(UtcDateTime::unix_timestamp),
            thumbnail: snapshot.thumbnail.clone(),
        })
    }
}

pub(crate) fn to_nanos(at: UtcDateTime) -> Result<i64> {
    i64::try_from(at.unix_timestamp_nanos()).or_raise(|| ErrorKind::InvalidData("observation time"))
}

pub(crate) fn from_nanos(nanos: i64) -> Result<UtcDateTime> {
    UtcDateTime::from_unix_timestamp_nanos(i128::from(nanos)).or_raise(|| ErrorKind::InvalidData("observation time"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> SnapshotRow {
        SnapshotRow {
            video_id: "abc123".to_string(),
            title: "Title".to_string(),
            channel: "Channel".to_string(),
            region: "IN".to_string(),
            category: "music".to_string(),
            views: 10_000,
            likes: 500,
            comments: 50,
            published_at: Some(1_748_779_200),
            thumbnail: None,
            observed_at: 1_748_779_200_123_456_789,
        }
    }

    #[test]
    fn test_row_to_model() {
        let model = VideoSnapshot::<Recorded>::try_from(row()).unwrap();
        assert_eq!(model.region, Region::India);
        assert_eq!(model.category, Category::Music);
        assert_eq!(model.views, 10_000);
        // Nanosecond precision survives the round trip.
        assert_eq!(model.observed_at.nanosecond(), 123_456_789);
        assert_eq!(to_nanos(model.observed_at).unwrap(), 1_748_779_200_123_456_789);
    }

    #[test]
    fn test_row_with_unknown_region() {
        let row = SnapshotRow { region: "XX".to_string(), ..row() };
        let err = VideoSnapshot::<Recorded>::try_from(row).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidData("region"));
    }

    #[test]
    fn test_row_with_negative_count() {
        let row = SnapshotRow { likes: -1, ..row() };
        let err = VideoSnapshot::<Recorded>::try_from(row).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidData("likes"));
    }

    #[test]
    fn test_model_to_row() {
        let model = VideoSnapshot::<Recorded>::try_from(row()).unwrap();
        let row = NewSnapshotRow::try_from(&model).unwrap();
        assert_eq!(row.region, "IN");
        assert_eq!(row.category, "music");
        assert!((row.engagement_rate - 0.055).abs() < 1e-12);
        assert!((row.comment_rate - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_model_to_row_overflow() {
        let model = VideoSnapshot::<Recorded>::try_from(row()).unwrap();
        let mut video = model.into_video();
        video.views = u64::MAX;
        let err = NewSnapshotRow::try_from(&VideoSnapshot::new(video)).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidData("views"));
    }
}
