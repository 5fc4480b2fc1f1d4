use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        comet::{CometDto, CometSummaryDto, FlybyDto, NewFlybyDto, RegisterCometDto},
    },
    server::{error::Error, model::app::AppState, service::comet::CometService},
};

pub static COMET_TAG: &str = "comet";

/// Register a comet with its initial flybys
#[utoipa::path(
    post,
    path = "/api/comets",
    tag = COMET_TAG,
    request_body = RegisterCometDto,
    responses(
        (status = 201, description = "Comet registered", body = CometDto),
        (status = 400, description = "Invalid designation or flyby date", body = ErrorDto),
        (status = 409, description = "Designation already registered", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register_comet(
    State(state): State<AppState>,
    Json(comet): Json<RegisterCometDto>,
) -> Result<impl IntoResponse, Error> {
    let comet = CometService::new(&state.db, &state.changes)
        .register(comet)
        .await?;

    Ok((StatusCode::CREATED, Json(comet)))
}

/// List registered comets
#[utoipa::path(
    get,
    path = "/api/comets",
    tag = COMET_TAG,
    responses(
        (status = 200, description = "Registered comets ordered by designation", body = Vec<CometSummaryDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_comets(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let comets = CometService::new(&state.db, &state.changes).list().await?;

    Ok((StatusCode::OK, Json(comets)))
}

/// Get a comet with its flybys
#[utoipa::path(
    get,
    path = "/api/comets/{comet_id}",
    tag = COMET_TAG,
    params(("comet_id" = i32, Path, description = "Comet ID")),
    responses(
        (status = 200, description = "Comet with its flybys", body = CometDto),
        (status = 404, description = "Comet not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_comet(
    State(state): State<AppState>,
    Path(comet_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let comet = CometService::new(&state.db, &state.changes)
        .get(comet_id)
        .await?;

    Ok((StatusCode::OK, Json(comet)))
}

/// Record a perihelion passage of a comet
#[utoipa::path(
    post,
    path = "/api/comets/{comet_id}/flybys",
    tag = COMET_TAG,
    params(("comet_id" = i32, Path, description = "Comet ID")),
    request_body = NewFlybyDto,
    responses(
        (status = 201, description = "Flyby recorded", body = FlybyDto),
        (status = 400, description = "Invalid flyby date", body = ErrorDto),
        (status = 404, description = "Comet not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_flyby(
    State(state): State<AppState>,
    Path(comet_id): Path<i32>,
    Json(flyby): Json<NewFlybyDto>,
) -> Result<impl IntoResponse, Error> {
    let flyby = CometService::new(&state.db, &state.changes)
        .add_flyby(comet_id, flyby)
        .await?;

    Ok((StatusCode::CREATED, Json(flyby)))
}
