use tower_sessions::Session;

use crate::server::{
    error::Error,
    model::{app::AppState, session::SessionWorkspaceId},
    service::workspace::Workspace,
};

/// Workspace of the requesting session, created on first use.
pub async fn session_workspace(state: &AppState, session: &Session) -> Result<Workspace, Error> {
    let workspace_id = SessionWorkspaceId::get_or_create(session).await?;

    Ok(state.workspaces.get_or_create(&workspace_id).await)
}

/// Workspace of the requesting session if one was already created.
///
/// Read-only routes use this so they never allocate a workspace.
pub async fn existing_session_workspace(
    state: &AppState,
    session: &Session,
) -> Result<Option<Workspace>, Error> {
    let Some(workspace_id) = SessionWorkspaceId::get(session).await? else {
        return Ok(None);
    };

    Ok(state.workspaces.get(&workspace_id).await)
}
