//! Tests for the illustration endpoint.

use axum::{
    body::to_bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use astrokapsel::server::{controller::image::get_image, data::image::ImageRepository};

use super::*;

/// Expect the stored bytes with their content type
#[tokio::test]
async fn get_image_returns_bytes() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;
    let image = ImageRepository::new(&test.db)
        .create("image/png".to_string(), vec![0x89, b'P', b'N', b'G'])
        .await?;

    let result = get_image(State(test.into_app_state()), Path(image.id)).await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(bytes.as_ref(), &[0x89, b'P', b'N', b'G']);

    Ok(())
}

/// Expect 404 Not Found for an unknown image
#[tokio::test]
async fn get_image_not_found() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;

    let result = get_image(State(test.into_app_state()), Path(3)).await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}
