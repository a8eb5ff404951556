//! Pure aggregation over geodata responses.
//!
//! Everything in here is deterministic and side-effect-free: the same
//! feature collection, category set and threshold always produce the same
//! statistics. The session layer re-runs these functions whenever the user
//! changes a selection, without touching the network.

pub mod coverage;

pub mod display;

pub mod district_means;

pub use coverage::grid_statistics;
pub use display::{district_headline, max_travel_time};
pub use district_means::district_statistics;
