//! Test utilities for creating AppState against the mock generation service

use std::time::Duration;

use astrokapsel::server::{
    config::Config,
    generation::GenerationClient,
    model::{app::AppState, session::SessionWorkspaceId},
    service::{orchestrator::state::GenerationState, workspace::Workspace},
};
use astrokapsel_test_utils::{
    constant::{TEST_GENERATION_API_KEY, TEST_IMAGE_MODEL, TEST_PUBLIC_BASE_URL, TEST_TEXT_MODEL},
    TestContext,
};
use tower_sessions::Session;

const TEST_POLL_INTERVAL_MS: u64 = 10;
const TEST_POLL_ATTEMPTS: u32 = 3;

/// Builds a configuration pointing at the mock generation service.
pub fn test_config(
    generation_url: &str,
    api_key: Option<&str>,
    poll_interval_ms: u64,
    poll_attempts: u32,
) -> Config {
    let poll_interval_ms = poll_interval_ms.to_string();
    let poll_attempts = poll_attempts.to_string();

    Config::from_lookup(|var| {
        let value = match var {
            "DATABASE_URL" => "sqlite::memory:",
            "PUBLIC_BASE_URL" => TEST_PUBLIC_BASE_URL,
            "GENERATION_API_URL" => generation_url,
            "GENERATION_API_KEY" => api_key?,
            "GENERATION_TEXT_MODEL" => TEST_TEXT_MODEL,
            "GENERATION_IMAGE_MODEL" => TEST_IMAGE_MODEL,
            "GENERATION_POLL_INTERVAL_MS" => poll_interval_ms.as_str(),
            "GENERATION_POLL_ATTEMPTS" => poll_attempts.as_str(),
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("Failed to build test configuration")
}

/// Extension trait for TestContext to create AppState sharing the test database
pub trait TestContextExt {
    /// AppState whose generation client talks to the mock server, polling every 10ms up to 3 times
    fn into_app_state(&self) -> AppState;
    /// AppState with a custom polling budget
    fn into_app_state_with_polling(&self, interval_ms: u64, attempts: u32) -> AppState;
    /// AppState whose generation client has no API key
    fn into_unconfigured_app_state(&self) -> AppState;
}

fn app_state(test: &TestContext, api_key: Option<&str>, interval_ms: u64, attempts: u32) -> AppState {
    let config = test_config(&test.generation_url(), api_key, interval_ms, attempts);
    // Not built through the process-wide guard so each test talks to its own mock server
    let client = GenerationClient::new(config.generation_config())
        .expect("Failed to build generation client");

    AppState::new(test.db.clone(), client, &config)
}

impl TestContextExt for TestContext {
    fn into_app_state(&self) -> AppState {
        self.into_app_state_with_polling(TEST_POLL_INTERVAL_MS, TEST_POLL_ATTEMPTS)
    }

    fn into_app_state_with_polling(&self, interval_ms: u64, attempts: u32) -> AppState {
        app_state(self, Some(TEST_GENERATION_API_KEY), interval_ms, attempts)
    }

    fn into_unconfigured_app_state(&self) -> AppState {
        app_state(self, None, TEST_POLL_INTERVAL_MS, TEST_POLL_ATTEMPTS)
    }
}

/// Workspace assigned to the session, creating both the id and the workspace if needed.
pub async fn session_workspace(state: &AppState, session: &Session) -> Workspace {
    let workspace_id = SessionWorkspaceId::get_or_create(session)
        .await
        .expect("Failed to read session workspace id");

    state.workspaces.get_or_create(&workspace_id).await
}

/// Waits until the workspace has no generation in flight and returns its state.
///
/// # Panics
/// Panics if the generation is still in flight after ten seconds
pub async fn wait_for_settled(workspace: &Workspace) -> GenerationState {
    for _ in 0..1000 {
        {
            let state = workspace.lock().await;
            if !state.generation.is_in_flight() {
                return state.generation.clone();
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("Generation did not settle in time");
}
