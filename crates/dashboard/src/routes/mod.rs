//! HTTP routes.
//!
//! - `/`, `/refresh`: the HTML dashboard.
//! - `/api/*`: JSON endpoints over the same data.
//! - `/health`: liveness.

mod api;
mod ops;
mod pages;

use crate::error::{ApiError, ErrorKind, Result};
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use exn::ResultExt;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};
use vidtrend_source::{Category, Credential, Region};

/// Build the complete router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/refresh", post(pages::refresh))
        .route("/api/latest", get(api::latest))
        .route("/api/history", get(api::history))
        .route("/api/growth", get(api::growth))
        .route("/api/refresh", post(api::refresh))
        .route("/health", get(ops::health))
        .with_state(state)
}

/// Bind to `listen` and serve until Ctrl-C.
pub async fn serve(listen: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(listen).await.or_raise(|| ErrorKind::Server)?;
    info!(addr = %listen, "dashboard listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .or_raise(|| ErrorKind::Server)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(err) => {
            warn!(error = %err, "could not listen for Ctrl-C; serving until killed");
            std::future::pending::<()>().await;
        },
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Region and category from request parameters, falling back to the
/// configured defaults when absent or blank.
fn selection(state: &AppState, region: Option<&str>, category: Option<&str>) -> Result<(Region, Category)> {
    let region = match non_blank(region) {
        Some(raw) => raw.parse::<Region>().map_err(ErrorKind::source)?,
        None => state.default_region(),
    };
    let category = match non_blank(category) {
        Some(raw) => raw.parse::<Category>().map_err(ErrorKind::source)?,
        None => state.default_category(),
    };
    Ok((region, category))
}

/// A row limit the store can bind, i.e. no larger than `i64::MAX`.
fn parse_limit(raw: Option<&str>) -> Result<Option<usize>> {
    let Some(raw) = non_blank(raw) else {
        return Ok(None);
    };
    let limit = raw.parse::<usize>().or_raise(|| ErrorKind::invalid(format!("limit: not a number: {raw:?}")))?;
    if i64::try_from(limit).is_err() {
        exn::bail!(ErrorKind::invalid(format!("limit: too large: {raw}")));
    }
    Ok(Some(limit))
}

/// The request's own API key if it has one, otherwise the configured one.
fn credential(state: &AppState, api_key: Option<&str>) -> std::result::Result<Credential, ApiError> {
    match non_blank(api_key) {
        Some(key) => Credential::new(key).map_err(|err| ApiError::from(ErrorKind::source(err))),
        None => state
            .credential()
            .cloned()
            .ok_or_else(|| ApiError::from(ErrorKind::Authentication("no API key provided".to_string()))),
    }
}
