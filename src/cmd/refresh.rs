//! Refresh command - fetch one chart and append it to history
//!
//! # Usage
//!
//! ```bash
//! vidtrend refresh US gaming
//! vidtrend refresh india 10 --api-key "$KEY" --dry-run
//! ```

use crate::error::{ErrorKind, Result};
use clap::Args;
use exn::ResultExt;
use std::fmt::Write;
use time::UtcDateTime;
use vidtrend_config::Config;
use vidtrend_dashboard::{compact, percent};
use vidtrend_history::Repository;
use vidtrend_sync::RefreshReport;

#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Region code or name, e.g. `US` or `India`
    region: String,
    /// Category slug, name or platform ID, e.g. `gaming` or `20`
    category: String,
    /// API key. Defaults to `source.api_key` from the configuration.
    #[arg(long)]
    api_key: Option<String>,
    /// Fetch and print the chart without recording it
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: RefreshArgs, config: &Config) -> Result<()> {
    let (region, category) = super::pair(&args.region, &args.category)?;
    let credential = super::credential(args.api_key.as_deref(), config)?;
    let source = super::source(config)?;
    let db = super::open_database(config).await?;
    let repo = Repository::new(db.pool().clone(), args.dry_run);

    let report = vidtrend_sync::refresh(&source, &repo, region, category, &credential).await;
    db.close().await;
    let report = report.or_raise(|| ErrorKind::Refresh)?;
    print!("{}", render(&report, UtcDateTime::now(), repo.is_dry_run()));
    Ok(())
}

fn render(report: &RefreshReport, now: UtcDateTime, dry_run: bool) -> String {
    let mut out = format!("Trending in {} · {}: ", report.region, report.category);
    if dry_run {
        let _ = writeln!(out, "fetched {} (dry run, nothing recorded)", report.fetched);
    } else {
        let _ = writeln!(out, "fetched {}, recorded {}", report.fetched, report.recorded);
    }
    if report.videos.is_empty() {
        return out;
    }
    let _ = writeln!(out, "{:>3}  {:>7}  {:>7}  {:>8}  {:>7}  {:>6}  TITLE", "#", "VIEWS", "LIKES", "COMMENTS", "ENGAGE", "AGE");
    for (i, video) in report.videos.iter().enumerate() {
        let age = video.hours_since_published(now).map(|h| format!("{h:.1}h")).unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:>3}  {:>7}  {:>7}  {:>8}  {:>7}  {:>6}  {} ({})",
            i + 1,
            compact(video.views),
            compact(video.likes),
            compact(video.comments),
            percent(video.engagement_rate()),
            age,
            video.title,
            video.channel,
        );
    }
    out
}
