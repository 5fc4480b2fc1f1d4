use sea_orm::DatabaseConnection;

use crate::server::{
    config::Config,
    generation::GenerationClient,
    service::{change::ChangeFeed, orchestrator::GenerationOrchestrator, workspace::WorkspaceHub},
};

const CHANGE_FEED_CAPACITY: usize = 256;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Store change notifications
    pub changes: ChangeFeed,
    /// Per-session workspaces (loaded comet, summary index, generation state)
    pub workspaces: WorkspaceHub,
    /// Drives summary generation for flyby windows
    pub orchestrator: GenerationOrchestrator,
    /// Base URL used to build public image links
    pub public_base_url: String,
}

impl AppState {
    /// Assembles application state from a database connection and generation client.
    pub fn new(db: DatabaseConnection, generation_client: GenerationClient, config: &Config) -> Self {
        let changes = ChangeFeed::new(CHANGE_FEED_CAPACITY);
        let orchestrator = GenerationOrchestrator::new(
            db.clone(),
            generation_client,
            changes.clone(),
            config.poll_settings(),
            config.public_base_url.clone(),
        );

        Self {
            db,
            changes,
            workspaces: WorkspaceHub::default(),
            orchestrator,
            public_base_url: config.public_base_url.clone(),
        }
    }
}
