//! Upstream data sources.
//!
//! Each source gets its own file under `ingest/`.

pub mod kma;

#[cfg(test)]
pub(crate) mod fixtures;

pub use kma::{KmaClient, ObservationSource, UpstreamResponse};
