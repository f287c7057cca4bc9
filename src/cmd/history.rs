//! History command - print recorded snapshots
//!
//! # Usage
//!
//! ```bash
//! vidtrend history US gaming --order most-viewed --limit 20
//! vidtrend history US gaming --video dQw4w9WgXcQ --since 2025-06-01T00:00:00Z
//! ```

use crate::error::{ErrorKind, Result};
use clap::Args;
use exn::ResultExt;
use std::fmt::Write;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcDateTime};
use vidtrend_config::Config;
use vidtrend_dashboard::{compact, timestamp};
use vidtrend_history::{QueryFilter, Repository, SortOrder};
use vidtrend_source::{Recorded, VideoSnapshot};
use vidtrend_sync::GrowthSeries;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Region code or name
    region: String,
    /// Category slug, name or platform ID
    category: String,
    /// Only this video; also prints its growth
    #[arg(long)]
    video: Option<String>,
    /// `chronological` or `most-viewed`
    #[arg(long, default_value = "chronological")]
    order: String,
    /// At most this many rows
    #[arg(long)]
    limit: Option<usize>,
    /// Only observations at or after this RFC 3339 timestamp
    #[arg(long, value_parser = rfc3339)]
    since: Option<UtcDateTime>,
}

fn rfc3339(raw: &str) -> std::result::Result<UtcDateTime, time::error::Parse> {
    OffsetDateTime::parse(raw, &Rfc3339).map(OffsetDateTime::to_utc)
}

pub async fn run(args: HistoryArgs, config: &Config) -> Result<()> {
    let (region, category) = super::pair(&args.region, &args.category)?;
    let order = args.order.parse::<SortOrder>().or_raise(|| ErrorKind::Input("order"))?;
    let db = super::open_database(config).await?;
    let repo = Repository::from(&db);

    let mut filter = QueryFilter::new(region, category).since(args.since).with_limit(args.limit).ordered_by(order);
    if let Some(video) = &args.video {
        filter = filter.with_video(video.clone());
    }
    let snapshots = repo.query(&filter).await.or_raise(|| ErrorKind::History);
    let series = match (&snapshots, &args.video) {
        (Ok(_), Some(video)) => {
            Some(vidtrend_sync::growth(&repo, region, category, video.clone(), args.since).await.or_raise(|| ErrorKind::History))
        },
        _ => None,
    };
    db.close().await;

    print!("{}", render(&snapshots?));
    if let Some(series) = series.transpose()? {
        print!("{}", summary(&series));
    }
    Ok(())
}

fn render(snapshots: &[VideoSnapshot<Recorded>]) -> String {
    if snapshots.is_empty() {
        return "Nothing recorded.\n".to_string();
    }
    let mut out = format!("{:<20}  {:>7}  {:>7}  {:>8}  {:<14}  TITLE\n", "OBSERVED", "VIEWS", "LIKES", "COMMENTS", "VIDEO");
    for s in snapshots {
        let _ = writeln!(
            out,
            "{:<20}  {:>7}  {:>7}  {:>8}  {:<14}  {}",
            timestamp(s.observed_at),
            compact(s.views),
            compact(s.likes),
            compact(s.comments),
            s.id,
            s.title,
        );
    }
    out
}

fn summary(series: &GrowthSeries) -> String {
    let mut out = format!("{} observations of {}", series.points.len(), series.video_id);
    if let Some(gain) = series.view_gain() {
        let _ = write!(out, ", {gain:+} views");
    }
    if let Some(rate) = series.views_per_hour() {
        let _ = write!(out, " ({rate:.0}/h)");
    }
    out.push('\n');
    out
}
