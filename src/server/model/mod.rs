//! Server application models and type definitions.
//!
//! This module contains the shared application state handed to every handler, database
//! model type aliases, and the typed wrappers for values kept in the client session.

pub mod app;
pub mod db;
pub mod session;
