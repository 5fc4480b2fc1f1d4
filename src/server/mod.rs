//! Server application core modules.
//!
//! This module contains all server-side functionality for astroKapsel: HTTP routing, the
//! comet/flyby/summary repositories, the generation service client, and the services that
//! derive flyby windows, reconcile stored summaries into a per-session index, and orchestrate
//! summary generation.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod generation;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
