//! Tests for the comet registry endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use astrokapsel::{
    model::comet::{NewFlybyDto, RegisterCometDto},
    server::controller::comet::{add_flyby, get_comet, list_comets, register_comet},
};

use super::*;

fn halley() -> RegisterCometDto {
    RegisterCometDto {
        designation: "1P/Halley".to_string(),
        name: Some("Halley's Comet".to_string()),
        flybys: vec![
            NewFlybyDto {
                year: Some(1758.0),
                ..Default::default()
            },
            NewFlybyDto {
                year: Some(1835.0),
                ..Default::default()
            },
        ],
    }
}

/// Expect 201 Created when registering a valid comet with flybys
#[tokio::test]
async fn register_comet_created() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;

    let result = register_comet(State(test.into_app_state()), Json(halley())).await;

    assert!(result.is_ok());
    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CREATED);

    Ok(())
}

/// Expect 400 Bad Request for a designation that is not a NASA designation
#[tokio::test]
async fn register_comet_invalid_designation() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;

    let mut comet = halley();
    comet.designation = "Halley".to_string();

    let result = register_comet(State(test.into_app_state()), Json(comet)).await;

    assert!(result.is_err());
    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect 400 Bad Request when a flyby gives both a year and a Julian Day
#[tokio::test]
async fn register_comet_conflicting_flyby_dates() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;

    let mut comet = halley();
    comet.flybys.push(NewFlybyDto {
        year: Some(1910.0),
        julian_day: Some(2_418_781.5),
        description: None,
    });

    let result = register_comet(State(test.into_app_state()), Json(comet)).await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

/// Expect 409 Conflict when the designation is already registered
#[tokio::test]
async fn register_comet_duplicate() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;
    test.comets().insert_comet("1P/Halley").await?;

    let result = register_comet(State(test.into_app_state()), Json(halley())).await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    Ok(())
}

/// Expect 200 OK listing registered comets
#[tokio::test]
async fn list_comets_ok() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;
    test.comets().insert_comet("2P/Encke").await?;
    test.comets().insert_comet("1P/Halley").await?;

    let result = list_comets(State(test.into_app_state())).await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

/// Expect 404 Not Found for an unknown comet
#[tokio::test]
async fn get_comet_not_found() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;

    let result = get_comet(State(test.into_app_state()), Path(42)).await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Expect 201 Created when adding a flyby by Julian Day
#[tokio::test]
async fn add_flyby_created() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;

    let flyby = NewFlybyDto {
        year: None,
        julian_day: Some(2_446_470.5),
        description: Some("Giotto encounter".to_string()),
    };
    let result = add_flyby(State(test.into_app_state()), Path(comet.id), Json(flyby)).await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CREATED);

    Ok(())
}

/// Expect 404 Not Found when adding a flyby to an unknown comet
#[tokio::test]
async fn add_flyby_comet_not_found() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;

    let flyby = NewFlybyDto {
        year: Some(1986.1),
        ..Default::default()
    };
    let result = add_flyby(State(test.into_app_state()), Path(7), Json(flyby)).await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}
