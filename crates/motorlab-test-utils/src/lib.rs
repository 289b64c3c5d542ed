//! Shared test utilities for motorlab crates.
//!
//! Deterministic RNG construction and random sampling of physically valid
//! motor parameters.

pub mod params;
pub mod rng;

pub use params::{ParameterRanges, random_parameters};
pub use rng::seeded_rng;
