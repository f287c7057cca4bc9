//! Web dashboard and JSON API for trending video history.
//!
//! The page shows the most recently recorded chart for a region/category
//! pair, lets the user trigger a refresh, and plots the stored growth of any
//! listed video. Every page view reads from history; only a refresh talks to
//! the video source.

pub mod error;
mod format;
mod routes;
mod state;
mod templates;
mod views;

pub use crate::format::{compact, percent, timestamp};
pub use crate::routes::{build_router, serve};
pub use crate::state::AppState;
