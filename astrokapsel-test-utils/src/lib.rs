//! Test scaffolding for the astroKapsel server.
//!
//! Tests configure their environment declaratively with [`TestBuilder`] (tables, fixtures,
//! mock generation service endpoints) and then run against the returned [`TestContext`].

pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        fixtures::{comet::factory, generation::job},
        TestBuilder, TestContext, TestError,
    };
}
