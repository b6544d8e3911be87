//! Ultra-short-term nowcast (초단기실황) lookup for Korean metropolitan
//! cities, backed by the KMA `getUltraSrtNcst` API and exposed as Model
//! Context Protocol tools.
//!
//! Flow: `regions` resolves the city, `schedule` plans the query windows,
//! `ingest::kma` fetches, `analysis::groupings` normalizes, and `nowcast`
//! ties the steps together. `server` hosts the result over stdio or HTTP.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod nowcast;
pub mod regions;
pub mod schedule;
pub mod server;

pub use nowcast::Nowcaster;
