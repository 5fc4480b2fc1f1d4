//! Data access layer repositories.
//!
//! Repositories wrap SeaORM queries for one table each. They are generic over
//! `ConnectionTrait` so callers can pass either the connection pool or an open transaction.

pub mod comet;
pub mod flyby;
pub mod image;
pub mod summary;
