use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{api::ErrorDto, window::CometWindowsDto},
    server::{
        controller::util::session_workspace,
        error::Error,
        model::app::AppState,
        service::window::WindowKey,
    },
};

pub static WINDOW_TAG: &str = "window";

/// Load a comet into the session and list its flyby windows
///
/// Windows are returned in chronological order together with their cached summaries, the
/// session's selected window and its generation status.
#[utoipa::path(
    get,
    path = "/api/comets/{comet_id}/windows",
    tag = WINDOW_TAG,
    params(("comet_id" = i32, Path, description = "Comet ID")),
    responses(
        (status = 200, description = "Windows of the comet", body = CometWindowsDto),
        (status = 404, description = "Comet not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_windows(
    State(state): State<AppState>,
    session: Session,
    Path(comet_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let workspace = session_workspace(&state, &session).await?;

    let mut guard = workspace.lock().await;
    workspace
        .ensure_view(&mut guard, &state.db, &state.changes, comet_id)
        .await?;

    let windows = guard
        .to_dto()
        .ok_or_else(|| Error::InternalError("workspace has no view after loading".to_string()))?;

    Ok((StatusCode::OK, Json(windows)))
}

/// Select a flyby window in the session
#[utoipa::path(
    put,
    path = "/api/comets/{comet_id}/windows/{window_key}/selection",
    tag = WINDOW_TAG,
    params(
        ("comet_id" = i32, Path, description = "Comet ID"),
        ("window_key" = String, Path, description = "Window key, `{flyby id}-{flyby id}`")
    ),
    responses(
        (status = 200, description = "Window selected", body = CometWindowsDto),
        (status = 400, description = "Malformed window key", body = ErrorDto),
        (status = 404, description = "Comet or window not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn select_window(
    State(state): State<AppState>,
    session: Session,
    Path((comet_id, window_key)): Path<(i32, String)>,
) -> Result<impl IntoResponse, Error> {
    let key: WindowKey = window_key.parse()?;
    let workspace = session_workspace(&state, &session).await?;

    let mut guard = workspace.lock().await;
    workspace
        .ensure_view(&mut guard, &state.db, &state.changes, comet_id)
        .await?;
    workspace.select(&mut guard, comet_id, key)?;

    let windows = guard
        .to_dto()
        .ok_or_else(|| Error::InternalError("workspace has no view after loading".to_string()))?;

    Ok((StatusCode::OK, Json(windows)))
}
