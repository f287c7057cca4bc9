use super::{credential, non_blank, selection};
use crate::error::{ApiError, ErrorKind, Result};
use crate::format;
use crate::state::AppState;
use crate::views::{Choice, GrowthView, VideoView};
use axum::Form;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use time::UtcDateTime;
use vidtrend_source::{Category, Region};

const SPARK_WIDTH: f64 = 320.0;
const SPARK_HEIGHT: f64 = 80.0;

/// SVG polyline points for a series, scaled to fill the sparkline box.
/// `None` with fewer than two values.
fn sparkline(values: &[u64]) -> Option<String> {
    if values.len() < 2 {
        return None;
    }
    let min = values.iter().copied().min()? as f64;
    let max = values.iter().copied().max()? as f64;
    let range = if max > min { max - min } else { 1.0 };
    let step = SPARK_WIDTH / (values.len() - 1) as f64;
    let points = values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{:.1},{:.1}", i as f64 * step, SPARK_HEIGHT - (*v as f64 - min) / range * SPARK_HEIGHT))
        .collect::<Vec<_>>();
    Some(points.join(" "))
}

#[derive(Debug, Serialize)]
struct Growth {
    #[serde(flatten)]
    series: GrowthView,
    observations: usize,
    views_line: Option<String>,
    likes_line: Option<String>,
    comments_line: Option<String>,
}

#[derive(Debug, Serialize)]
struct IndexContext {
    region: &'static str,
    region_code: &'static str,
    category: &'static str,
    category_slug: &'static str,
    regions: Vec<Choice>,
    categories: Vec<Choice>,
    videos: Vec<VideoView>,
    snapshots: u64,
    refreshes: usize,
    refreshed_at: Option<String>,
    growth: Option<Growth>,
    has_credential: bool,
    notice: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
    region: Option<String>,
    category: Option<String>,
    /// Show the growth series of this video.
    video: Option<String>,
    /// Rows recorded by the refresh that redirected here.
    recorded: Option<u64>,
}

async fn render(
    state: &AppState,
    region: Region,
    category: Category,
    video: Option<&str>,
    notice: Option<String>,
    error: Option<String>,
) -> Result<String> {
    let repo = state.repo();
    let now = UtcDateTime::now();
    let chart = repo.latest_chart(region, category, None).await.map_err(ErrorKind::history)?;
    let videos = VideoView::chart(&chart, now)?.into_iter().map(VideoView::with_age).collect();
    let observations = repo.observations(region, category).await.map_err(ErrorKind::history)?;
    let growth = match video {
        Some(video) => {
            let series = vidtrend_sync::growth(repo, region, category, video, None).await.map_err(ErrorKind::sync)?;
            let line = |metric: fn(&vidtrend_sync::GrowthPoint) -> u64| {
                sparkline(&series.points.iter().map(metric).collect::<Vec<_>>())
            };
            Some(Growth {
                observations: series.points.len(),
                views_line: line(|p| p.views),
                likes_line: line(|p| p.likes),
                comments_line: line(|p| p.comments),
                series: GrowthView::try_from(&series)?,
            })
        },
        None => None,
    };
    let context = IndexContext {
        region: region.as_str(),
        region_code: region.code(),
        category: category.as_str(),
        category_slug: category.slug(),
        regions: Choice::regions(region),
        categories: Choice::categories(category),
        videos,
        snapshots: repo.count(region, category).await.map_err(ErrorKind::history)?,
        refreshes: observations.len(),
        refreshed_at: observations.last().copied().map(format::timestamp),
        growth,
        has_credential: state.credential().is_some(),
        notice,
        error,
    };
    state.page().render(context)
}

/// The dashboard page for one region/category pair.
pub async fn index(State(state): State<AppState>, Query(params): Query<IndexParams>) -> std::result::Result<Html<String>, ApiError> {
    let (region, category) = selection(&state, params.region.as_deref(), params.category.as_deref())?;
    let notice = params.recorded.map(|n| format!("Refreshed: recorded {n} videos."));
    let video = non_blank(params.video.as_deref());
    Ok(Html(render(&state, region, category, video, notice, None).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshForm {
    region: Option<String>,
    category: Option<String>,
    api_key: Option<String>,
}

/// Refresh from the page's form. Redirects back to the page on success; on
/// failure the page is shown again with the error and a matching status.
pub async fn refresh(State(state): State<AppState>, Form(form): Form<RefreshForm>) -> Response {
    let (region, category) = match selection(&state, form.region.as_deref(), form.category.as_deref()) {
        Ok(pair) => pair,
        Err(err) => return ApiError::from(err).into_response(),
    };
    let outcome = match credential(&state, form.api_key.as_deref()) {
        Ok(credential) => vidtrend_sync::refresh(&**state.source(), state.repo(), region, category, &credential)
            .await
            .map_err(|err| ApiError::from(ErrorKind::sync(err))),
        Err(err) => Err(err),
    };
    match outcome {
        Ok(report) => {
            let location = format!("/?region={}&category={}&recorded={}", region.code(), category.slug(), report.recorded);
            Redirect::to(&location).into_response()
        },
        Err(err) => {
            let status: StatusCode = err.kind().status();
            tracing::warn!(error = %err.kind(), %status, "refresh from dashboard failed");
            match render(&state, region, category, None, None, Some(err.kind().to_string())).await {
                Ok(page) => (status, Html(page)).into_response(),
                Err(render_err) => ApiError::from(render_err).into_response(),
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_scales_to_box() {
        let line = sparkline(&[100, 150, 200]).unwrap();
        assert_eq!(line, "0.0,80.0 160.0,40.0 320.0,0.0");
    }

    #[test]
    fn test_sparkline_flat_and_short() {
        assert_eq!(sparkline(&[5]), None);
        assert_eq!(sparkline(&[7, 7]).unwrap(), "0.0,80.0 320.0,80.0");
    }
}
