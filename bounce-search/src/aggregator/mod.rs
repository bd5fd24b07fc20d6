//! Search aggregator: concurrent provider queries, dedup, scoring, ranking.
//!
//! This module fans criteria out to every registered provider
//! concurrently, deduplicates listings by `(lat, lon, name)`, scores each
//! listing from price, transit and service factors, and splits the ranked
//! set into highlights and the rest.

pub mod dedup;
pub mod ranking;
pub mod scoring;
pub mod search;

pub use search::Aggregator;
