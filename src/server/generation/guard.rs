//! Process-wide generation client.
//!
//! The client is built once on first initialization; later calls hand back the same
//! instance and ignore the configuration they were given.

use once_cell::sync::OnceCell;

use crate::server::{
    error::Error,
    generation::{GenerationClient, GenerationConfig},
};

static GENERATION_CLIENT: OnceCell<GenerationClient> = OnceCell::new();

/// Builds the client on first call and returns the shared instance afterwards.
pub fn init(config: GenerationConfig) -> Result<GenerationClient, Error> {
    GENERATION_CLIENT
        .get_or_try_init(|| {
            tracing::info!(api_url = %config.api_url, "Initializing generation client");
            GenerationClient::new(config)
        })
        .cloned()
}

pub fn get() -> Option<GenerationClient> {
    GENERATION_CLIENT.get().cloned()
}

pub fn is_initialized() -> bool {
    GENERATION_CLIENT.get().is_some()
}
