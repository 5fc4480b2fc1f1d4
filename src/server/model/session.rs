//! Workspace session data models.
//!
//! Each browser session owns one workspace: the comet it has loaded, its summary index and
//! the state of any generation in flight. The session only stores the workspace identifier;
//! the workspace itself lives in the [`WorkspaceHub`](crate::server::service::workspace::WorkspaceHub).

use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::server::error::Error;

/// Session key for the workspace identifier.
pub const SESSION_WORKSPACE_ID_KEY: &str = "astrokapsel:workspace:id";

const WORKSPACE_ID_LENGTH: usize = 32;

/// Session wrapper for the workspace identifier.
#[derive(Default, Deserialize, Serialize, Debug)]
pub struct SessionWorkspaceId(pub String);

impl SessionWorkspaceId {
    /// Stores the workspace identifier in the session, replacing any previous value.
    pub async fn insert(session: &Session, workspace_id: &str) -> Result<(), Error> {
        session
            .insert(
                SESSION_WORKSPACE_ID_KEY,
                SessionWorkspaceId(workspace_id.to_string()),
            )
            .await?;

        Ok(())
    }

    /// Retrieves the workspace identifier from the session.
    ///
    /// # Returns
    /// - `Ok(Some(String))` - Session already has a workspace
    /// - `Ok(None)` - No workspace has been assigned to this session yet
    /// - `Err(Error::SessionError)` - Session retrieval or deserialization failed
    pub async fn get(session: &Session) -> Result<Option<String>, Error> {
        let workspace_id: Option<SessionWorkspaceId> =
            session.get(SESSION_WORKSPACE_ID_KEY).await?;

        Ok(workspace_id.map(|id| id.0))
    }

    /// Retrieves the workspace identifier, assigning a fresh random one when absent.
    pub async fn get_or_create(session: &Session) -> Result<String, Error> {
        if let Some(workspace_id) = Self::get(session).await? {
            return Ok(workspace_id);
        }

        let workspace_id: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(WORKSPACE_ID_LENGTH)
            .map(char::from)
            .collect();

        Self::insert(session, &workspace_id).await?;

        Ok(workspace_id)
    }
}
