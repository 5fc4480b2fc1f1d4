//! astroKapsel server library.
//!
//! Comet registry with AI-generated narratives for the years between two consecutive
//! perihelion passages ("flyby windows").

pub mod model;
pub mod server;
