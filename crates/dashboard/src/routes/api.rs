use super::{credential, non_blank, parse_limit, selection};
use crate::error::{ApiError, ErrorKind};
use crate::state::AppState;
use crate::views::{GrowthView, RefreshView, VideoView, parse_rfc3339};
use axum::Json;
use axum::extract::{Query, State};
use exn::ResultExt;
use serde::Deserialize;
use time::UtcDateTime;
use vidtrend_history::{QueryFilter, SortOrder};

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

fn timestamp(field: &str, raw: Option<&str>) -> crate::error::Result<Option<UtcDateTime>> {
    non_blank(raw).map(|raw| parse_rfc3339(field, raw)).transpose()
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartParams {
    region: Option<String>,
    category: Option<String>,
    limit: Option<String>,
}

/// The most recently recorded chart for a pair, most viewed first.
pub async fn latest(State(state): State<AppState>, Query(params): Query<ChartParams>) -> ApiResult<Vec<VideoView>> {
    let (region, category) = selection(&state, params.region.as_deref(), params.category.as_deref())?;
    let limit = parse_limit(params.limit.as_deref())?;
    let chart = state.repo().latest_chart(region, category, limit).await.map_err(ErrorKind::history)?;
    Ok(Json(VideoView::chart(&chart, UtcDateTime::now())?))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    region: Option<String>,
    category: Option<String>,
    video_id: Option<String>,
    since: Option<String>,
    until: Option<String>,
    order: Option<String>,
    limit: Option<String>,
}

/// Every stored snapshot for a pair, optionally narrowed to one video or a
/// time window.
pub async fn history(State(state): State<AppState>, Query(params): Query<HistoryParams>) -> ApiResult<Vec<VideoView>> {
    let (region, category) = selection(&state, params.region.as_deref(), params.category.as_deref())?;
    let order = match non_blank(params.order.as_deref()) {
        Some(raw) => {
            raw.parse::<SortOrder>().or_raise(|| ErrorKind::invalid(format!("order: unknown sort order {raw:?}")))?
        },
        None => SortOrder::default(),
    };
    let mut filter = QueryFilter::new(region, category)
        .since(timestamp("since", params.since.as_deref())?)
        .until(timestamp("until", params.until.as_deref())?)
        .with_limit(parse_limit(params.limit.as_deref())?)
        .ordered_by(order);
    if let Some(video_id) = non_blank(params.video_id.as_deref()) {
        filter = filter.with_video(video_id);
    }
    let snapshots = state.repo().query(&filter).await.map_err(ErrorKind::history)?;
    Ok(Json(VideoView::chart(&snapshots, UtcDateTime::now())?))
}

#[derive(Debug, Default, Deserialize)]
pub struct GrowthParams {
    region: Option<String>,
    category: Option<String>,
    video_id: Option<String>,
    since: Option<String>,
}

/// Chronological views/likes/comments of one video.
pub async fn growth(State(state): State<AppState>, Query(params): Query<GrowthParams>) -> ApiResult<GrowthView> {
    let (region, category) = selection(&state, params.region.as_deref(), params.category.as_deref())?;
    let video_id = non_blank(params.video_id.as_deref()).ok_or_else(|| ErrorKind::invalid("video_id is required"))?;
    let since = timestamp("since", params.since.as_deref())?;
    let series = vidtrend_sync::growth(state.repo(), region, category, video_id, since).await.map_err(ErrorKind::sync)?;
    Ok(Json(GrowthView::try_from(&series)?))
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshParams {
    region: Option<String>,
    category: Option<String>,
    api_key: Option<String>,
}

/// Run a refresh and return what was fetched.
pub async fn refresh(State(state): State<AppState>, Query(params): Query<RefreshParams>) -> ApiResult<RefreshView> {
    let (region, category) = selection(&state, params.region.as_deref(), params.category.as_deref())?;
    let credential = credential(&state, params.api_key.as_deref())?;
    let report = vidtrend_sync::refresh(&**state.source(), state.repo(), region, category, &credential)
        .await
        .map_err(ErrorKind::sync)?;
    Ok(Json(RefreshView::build(&report, UtcDateTime::now())?))
}
