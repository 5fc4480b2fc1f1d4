//! HTTP controller endpoints for the astroKapsel web API.
//!
//! Axum handlers for the comet registry, the per-session window view, summary generation
//! and stored illustrations. Handlers resolve the session workspace, call into the service
//! layer and return DTOs; every handler is documented for the OpenAPI document with utoipa.

pub mod comet;
pub mod generation;
pub mod image;
pub mod util;
pub mod window;
