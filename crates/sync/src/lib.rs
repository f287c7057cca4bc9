//! Fetch-and-record refresh.
//!
//! A refresh asks a [`VideoSource`](vidtrend_source::VideoSource) for the
//! current chart of one region/category pair and appends the whole chart to
//! history as a single batch. Growth series are read back from that history.

pub mod error;
mod growth;
mod refresh;

pub use crate::growth::{GrowthPoint, GrowthSeries, growth};
pub use crate::refresh::{RefreshReport, refresh};
