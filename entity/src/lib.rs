//! SeaORM entities for the astroKapsel comet registry.

pub mod prelude;

pub mod comet;
pub mod flyby;
pub mod flyby_summary;
pub mod image_blob;
