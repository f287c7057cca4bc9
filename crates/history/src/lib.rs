//! SQLite snapshot history for trending videos.
//!
//! Every refresh appends one row per fetched video to a single
//! `video_snapshots` table. Rows are never updated or deleted by this crate;
//! the table is an append-only log and growth charts are simply range
//! queries over it.
//!
//! # Observation times
//! A batch passed to [`Repository::record`] shares one observation time,
//! assigned inside the write transaction. Observation times are strictly
//! increasing per database, so recording the same batch twice always yields
//! two distinguishable sets of rows and `(video_id, observed_at)` stays
//! unique.

mod db;
pub mod error;
mod filter;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::filter::{QueryFilter, SortOrder};
pub use crate::repo::Repository;
