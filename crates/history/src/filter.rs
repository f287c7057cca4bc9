use crate::error::{Error, ErrorKind};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use time::UtcDateTime;
use vidtrend_source::{Category, Region};

/// How [`Repository::query`](crate::Repository::query) orders its results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest observation first; what growth charts want.
    #[default]
    Chronological,
    /// Highest view count first; what leaderboards want.
    MostViewed,
}
impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chronological => "chronological",
            Self::MostViewed => "most-viewed",
        }
    }
}
impl FromStr for SortOrder {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().replace('_', "-").as_str() {
            "chronological" | "time" | "oldest" => Self::Chronological,
            "most-viewed" | "views" | "leaderboard" => Self::MostViewed,
            _ => exn::bail!(ErrorKind::InvalidData("sort order")),
        })
    }
}
impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Scope of a historical read. Only region and category are required.
///
/// ```
/// use vidtrend_history::{QueryFilter, SortOrder};
/// use vidtrend_source::{Category, Region};
///
/// let filter = QueryFilter::new(Region::UnitedStates, Category::Gaming)
///     .with_video("dQw4w9WgXcQ")
///     .ordered_by(SortOrder::Chronological);
/// assert_eq!(filter.video_id.as_deref(), Some("dQw4w9WgXcQ"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    pub region: Region,
    pub category: Category,
    /// Inclusive lower bound on observation time.
    pub since: Option<UtcDateTime>,
    /// Inclusive upper bound on observation time.
    pub until: Option<UtcDateTime>,
    /// Restrict to a single video (for growth series).
    pub video_id: Option<String>,
    pub limit: Option<usize>,
    pub order: SortOrder,
}
impl QueryFilter {
    pub fn new(region: Region, category: Category) -> Self {
        Self {
            region,
            category,
            since: None,
            until: None,
            video_id: None,
            limit: None,
            order: SortOrder::default(),
        }
    }

    pub fn since(mut self, since: impl Into<Option<UtcDateTime>>) -> Self {
        self.since = since.into();
        self
    }

    pub fn until(mut self, until: impl Into<Option<UtcDateTime>>) -> Self {
        self.until = until.into();
        self
    }

    pub fn with_video(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }

    pub fn with_limit(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.limit = limit.into();
        self
    }

    pub fn ordered_by(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }
}
