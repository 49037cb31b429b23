//! Subject and assessment tracking with weighted average mark (WAM) aggregation
//! and goal projection.
//!
//! The arithmetic core lives in [`grades::aggregate`] and [`grades::goal`]; both are
//! pure functions over subject snapshots. Everything else in [`grades`] wraps that
//! core with record editing, storage, import and an HTTP surface.

pub mod config;
pub mod error;
pub mod grades;
pub mod telemetry;
