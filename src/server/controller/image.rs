use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::{
    model::api::ErrorDto,
    server::{
        error::{error_response, Error},
        model::app::AppState,
        service::image::ImageService,
    },
};

pub static IMAGE_TAG: &str = "image";

/// Get a stored summary illustration
#[utoipa::path(
    get,
    path = "/api/images/{image_id}",
    tag = IMAGE_TAG,
    params(("image_id" = i32, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image bytes with their stored content type"),
        (status = 404, description = "Image not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_image(
    State(state): State<AppState>,
    Path(image_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let service = ImageService::new(&state.db, &state.public_base_url);

    let Some(image) = service.get(image_id).await? else {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            format!("Image {} not found", image_id),
        ));
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, image.content_type)],
        image.data,
    )
        .into_response())
}
