//! JSON data transfer objects shared with API clients.

pub mod api;
pub mod comet;
pub mod generation;
pub mod window;
