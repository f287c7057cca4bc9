//! Append-only repository for video snapshots.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::filter::{QueryFilter, SortOrder};
use crate::models::{NewSnapshotRow, SnapshotRow, from_nanos, to_nanos};
use exn::ResultExt;
use sqlx::SqlitePool;
use time::UtcDateTime;
use tracing::{debug, instrument};
use vidtrend_source::models::ObservationState;
use vidtrend_source::{Category, Recorded, Region, VideoSnapshot};

type Snapshot = VideoSnapshot<Recorded>;

/// Repository for recording and reading back video snapshots.
///
/// # Guarantees
///
/// - Rows are only ever inserted; a database trigger rejects updates.
/// - One [`record()`](Self::record) call is one transaction and one
///   observation time.
/// - Observation times never go backwards, even if the wall clock does.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
    dry_run: bool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone(), dry_run: false }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    ///
    /// A dry-run repository reads normally but [`record()`](Self::record)
    /// writes nothing and reports zero rows.
    pub fn new(pool: SqlitePool, dry_run: bool) -> Self {
        Self { pool, dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Pick the observation time for a new batch.
    fn next_observation(now: i64, latest: Option<i64>) -> i64 {
        match latest {
            Some(latest) if latest >= now => latest.saturating_add(1),
            _ => now,
        }
    }

    fn limit(limit: Option<usize>) -> Result<i64> {
        // SQLite treats a negative LIMIT as no limit at all.
        limit.map_or(Ok(-1), |limit| i64::try_from(limit).or_raise(|| ErrorKind::InvalidData("limit")))
    }

    fn into_models(rows: Vec<SnapshotRow>) -> Result<Vec<Snapshot>> {
        rows.into_iter().map(Snapshot::try_from).collect()
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Append a batch of snapshots, all sharing one observation time.
    ///
    /// Returns the number of rows written. The batch is atomic: if any row
    /// fails (for example the same video twice, which returns
    /// [`ErrorKind::Constraint`]) nothing from the batch is kept.
    #[instrument(skip_all, fields(count = snapshots.len()))]
    pub async fn record<S: ObservationState>(&self, snapshots: &[VideoSnapshot<S>]) -> Result<u64> {
        if snapshots.is_empty() || self.dry_run {
            return Ok(0);
        }
        let rows = snapshots.iter().map(NewSnapshotRow::try_from).collect::<Result<Vec<_>>>()?;
        let mut tx = Database::begin_write(&self.pool).await?;
        let latest: Option<i64> = sqlx::query_scalar(include_str!("../queries/latest_observed_at.sql"))
            .fetch_one(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let observed_at = Self::next_observation(to_nanos(UtcDateTime::now())?, latest);
        let mut written = 0;
        for row in rows {
            let result = sqlx::query(include_str!("../queries/insert_snapshot.sql"))
                .bind(row.video_id)
                .bind(row.title)
                .bind(row.channel)
                .bind(row.region)
                .bind(row.category)
                .bind(row.views)
                .bind(row.likes)
                .bind(row.comments)
                .bind(row.engagement_rate)
                .bind(row.comment_rate)
                .bind(row.published_at)
                .bind(row.thumbnail)
                .bind(observed_at)
                .execute(&mut *tx)
                .await;
            match result {
                Ok(done) => written += done.rows_affected(),
                // Dropping the transaction rolls the whole batch back.
                Err(err) => {
                    let kind = match &err {
                        sqlx::Error::Database(db) if db.is_unique_violation() => ErrorKind::Constraint,
                        _ => ErrorKind::Database,
                    };
                    return Err(err).or_raise(|| kind);
                },
            }
        }
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        debug!(written, observed_at, "recorded snapshots");
        Ok(written)
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Every snapshot matching the filter, in the filter's order.
    pub async fn query(&self, filter: &QueryFilter) -> Result<Vec<Snapshot>> {
        let sql = match filter.order {
            SortOrder::Chronological => include_str!("../queries/query_chronological.sql"),
            SortOrder::MostViewed => include_str!("../queries/query_most_viewed.sql"),
        };
        let rows: Vec<SnapshotRow> = sqlx::query_as(sql)
            .bind(filter.region.code())
            .bind(filter.category.slug())
            .bind(filter.since.map(to_nanos).transpose()?)
            .bind(filter.until.map(to_nanos).transpose()?)
            .bind(filter.video_id.as_deref())
            .bind(Self::limit(filter.limit)?)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Self::into_models(rows)
    }

    /// The chart captured by the most recent refresh of this pair, most viewed
    /// first. Empty if the pair has never been recorded.
    pub async fn latest_chart(&self, region: Region, category: Category, limit: Option<usize>) -> Result<Vec<Snapshot>> {
        let rows: Vec<SnapshotRow> = sqlx::query_as(include_str!("../queries/latest_chart.sql"))
            .bind(region.code())
            .bind(category.slug())
            .bind(Self::limit(limit)?)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Self::into_models(rows)
    }

    /// Number of stored snapshots for the pair.
    pub async fn count(&self, region: Region, category: Category) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(include_str!("../queries/count_for_pair.sql"))
            .bind(region.code())
            .bind(category.slug())
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(count).or_raise(|| ErrorKind::InvalidData("count"))
    }

    /// Distinct observation times for the pair, oldest first. One per refresh
    /// that recorded anything.
    pub async fn observations(&self, region: Region, category: Category) -> Result<Vec<UtcDateTime>> {
        let stamps: Vec<i64> = sqlx::query_scalar(include_str!("../queries/list_observations.sql"))
            .bind(region.code())
            .bind(category.slug())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        stamps.into_iter().map(from_nanos).collect()
    }
}
