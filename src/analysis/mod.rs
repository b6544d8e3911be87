//! Data organization for upstream observations.
//!
//! Submodules:
//! - `groupings` — turns the flat upstream item list into labeled,
//!   unit-tagged entries under the five display groups.

pub mod groupings;

pub use groupings::{cast_value, normalize_observations};
