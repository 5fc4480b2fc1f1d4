//! Service layer.
//!
//! Services hold the business logic between the HTTP controllers and the repositories:
//! the comet registry, the window builder and summary index, per-session workspaces and the
//! generation orchestrator.

pub mod change;
pub mod comet;
pub mod image;
pub mod index;
pub mod orchestrator;
pub mod reference;
pub mod retry;
pub mod summary;
pub mod window;
pub mod workspace;
