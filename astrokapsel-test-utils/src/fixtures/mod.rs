//! Database fixtures and mock endpoint helpers.

pub mod comet;
pub mod generation;
