//! Trending video sources.
//!
//! A source answers one question: which videos are trending right now for a
//! given [`Region`] and [`Category`]? The answer is an ordered list of
//! [`VideoSnapshot`]s in the [`Fetched`] state, i.e. without an observation
//! time. Observation times are assigned by whoever records them (see
//! `vidtrend-history`), never by the source.
//!
//! # Sources
//! - [`YouTubeSource`]: the YouTube Data API v3 `mostPopular` chart.
//! - `MockSource` (feature `mock`): in-memory charts for tests.

pub mod backend;
pub mod error;
pub mod models;

#[cfg(any(test, feature = "mock"))]
pub use crate::backend::MockSource;
pub use crate::backend::{DEFAULT_BASE_URL, DEFAULT_MAX_RESULTS, MAX_RESULTS, SourceOptions, VideoSource, YouTubeSource};
pub use crate::models::{Category, Credential, Fetched, Recorded, Region, Video, VideoSnapshot};
use std::sync::Arc;

pub type SourceHandle = Arc<dyn VideoSource>;
