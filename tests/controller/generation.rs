//! Tests for the summary generation endpoints.

use axum::{
    body::to_bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use astrokapsel::{
    model::generation::{
        GenerateSummaryDto, GenerationOutcomeDto, GenerationPhaseDto, GenerationResponseDto,
        GenerationStatusDto,
    },
    server::{
        controller::generation::{cancel_generation, generate_summary, get_generation_status},
        model::session::SessionWorkspaceId,
    },
};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::*;
use crate::util::{session_workspace, wait_for_settled};

async fn body<T: DeserializeOwned>(resp: Response) -> T {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(comet_id: i32, previous_flyby_id: i32, next_flyby_id: i32) -> GenerateSummaryDto {
    GenerateSummaryDto {
        comet_id: Some(comet_id),
        previous_flyby_id: Some(previous_flyby_id),
        next_flyby_id: Some(next_flyby_id),
        ..Default::default()
    }
}

/// Expect 400 Bad Request and an input failure when a flyby ID is missing
#[tokio::test]
async fn generate_missing_field() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_astro_tables()
        .with_job_submission_endpoint("text", job::queued("job-1"), 0)
        .build()
        .await?;
    let state = test.into_app_state();

    let dto = GenerateSummaryDto {
        comet_id: Some(1),
        previous_flyby_id: Some(1),
        next_flyby_id: None,
        ..Default::default()
    };
    let result = generate_summary(State(state.clone()), test.session.clone(), Json(dto)).await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let status = get_generation_status(State(state), test.session.clone())
        .await
        .unwrap()
        .into_response();
    let status: GenerationStatusDto = body(status).await;
    assert_eq!(status.phase, GenerationPhaseDto::Failed);
    assert_eq!(status.failure.as_deref(), Some("input"));

    test.assert_mocks();

    Ok(())
}

/// Expect 503 Service Unavailable when no API key is configured
#[tokio::test]
async fn generate_not_configured() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let first = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    let second = test.comets().insert_flyby(comet.id, Some(1835.0)).await?;

    let result = generate_summary(
        State(test.into_unconfigured_app_state()),
        test.session.clone(),
        Json(request(comet.id, first.id, second.id)),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    Ok(())
}

/// Expect 404 Not Found when the two flybys do not bound a window
#[tokio::test]
async fn generate_window_not_found() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let first = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    test.comets().insert_flyby(comet.id, Some(1835.0)).await?;
    let third = test.comets().insert_flyby(comet.id, Some(1910.0)).await?;

    let result = generate_summary(
        State(test.into_app_state()),
        test.session.clone(),
        Json(request(comet.id, first.id, third.id)),
    )
    .await;

    let resp = result.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

/// Expect 200 OK with the cached summary and no request to the generation service
#[tokio::test]
async fn generate_already_summarized() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_astro_tables()
        .with_job_submission_endpoint("text", job::queued("job-1"), 0)
        .build()
        .await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let first = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    let second = test.comets().insert_flyby(comet.id, Some(1835.0)).await?;
    let summary = test
        .comets()
        .insert_summary(comet.id, Some(json!(first.id)), Some(json!(second.id)), "Return")
        .await?;

    // Flyby order of the request does not matter
    let result = generate_summary(
        State(test.into_app_state()),
        test.session.clone(),
        Json(request(comet.id, second.id, first.id)),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let response: GenerationResponseDto = body(resp).await;
    assert_eq!(response.outcome, GenerationOutcomeDto::AlreadySummarized);
    assert_eq!(response.summary.map(|s| s.id), Some(summary.id));

    test.assert_mocks();

    Ok(())
}

/// Expect 202 Accepted when a generation is started
#[tokio::test]
async fn generate_started() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_astro_tables()
        .with_job_submission_endpoint(
            "text",
            job::succeeded_text("job-1", &job::summary_text("Age of Sail", "Ships.")),
            1,
        )
        .build()
        .await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let first = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    let second = test.comets().insert_flyby(comet.id, Some(1835.0)).await?;
    let state = test.into_app_state();

    let result = generate_summary(
        State(state.clone()),
        test.session.clone(),
        Json(request(comet.id, first.id, second.id)),
    )
    .await;

    let resp = result.unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let response: GenerationResponseDto = body(resp).await;
    assert_eq!(response.outcome, GenerationOutcomeDto::Started);
    assert!(response.summary.is_none());

    let workspace = session_workspace(&state, &test.session).await;
    wait_for_settled(&workspace).await;

    test.assert_mocks();

    Ok(())
}

/// Expect 409 Conflict when another window of the session is being generated
#[tokio::test]
async fn generate_rejected_while_in_flight() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_astro_tables()
        .with_job_submission_endpoint("text", job::queued("job-1"), 1)
        .with_job_status_endpoint("job-1", job::running("job-1"), 1)
        .build()
        .await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let first = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    let second = test.comets().insert_flyby(comet.id, Some(1835.0)).await?;
    let third = test.comets().insert_flyby(comet.id, Some(1910.0)).await?;
    let state = test.into_app_state_with_polling(50, 100);

    let started = generate_summary(
        State(state.clone()),
        test.session.clone(),
        Json(request(comet.id, first.id, second.id)),
    )
    .await;
    assert_eq!(started.unwrap().into_response().status(), StatusCode::ACCEPTED);

    let rejected = generate_summary(
        State(state.clone()),
        test.session.clone(),
        Json(request(comet.id, second.id, third.id)),
    )
    .await;

    let resp = rejected.err().unwrap().into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The rejection leaves the first generation untouched
    let workspace = session_workspace(&state, &test.session).await;
    {
        let guard = workspace.lock().await;
        assert!(guard.generation.is_in_flight());
        assert_eq!(
            guard.generation.window().map(|key| key.to_string()),
            Some(format!("{}-{}", first.id, second.id))
        );
    }

    cancel_generation(State(state), test.session.clone())
        .await
        .unwrap();
    wait_for_settled(&workspace).await;

    Ok(())
}

/// Expect 202 Accepted when cancelling and the generation to end as failed
#[tokio::test]
async fn cancel_in_flight_generation() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_astro_tables()
        .with_job_submission_endpoint("text", job::queued("job-1"), 1)
        .with_job_status_endpoint("job-1", job::running("job-1"), 1)
        .build()
        .await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let first = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    let second = test.comets().insert_flyby(comet.id, Some(1835.0)).await?;
    let state = test.into_app_state_with_polling(50, 100);

    generate_summary(
        State(state.clone()),
        test.session.clone(),
        Json(request(comet.id, first.id, second.id)),
    )
    .await
    .unwrap();

    let resp = cancel_generation(State(state.clone()), test.session.clone())
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let workspace = session_workspace(&state, &test.session).await;
    let settled = wait_for_settled(&workspace).await;

    let status = settled.to_dto();
    assert_eq!(status.phase, GenerationPhaseDto::Failed);
    assert_eq!(status.failure.as_deref(), Some("generation"));
    assert_eq!(status.message, "Generation was cancelled");

    Ok(())
}

/// Expect 200 OK when there is nothing to cancel
#[tokio::test]
async fn cancel_without_generation() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;

    let state = test.into_app_state();

    let resp = cancel_generation(State(state.clone()), test.session.clone())
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), StatusCode::OK);

    let status: GenerationStatusDto = body(resp).await;
    assert_eq!(status.phase, GenerationPhaseDto::Idle);
    assert_eq!(state.workspaces.count().await, 0);

    Ok(())
}

/// Expect status reads from a new session to report idle without allocating a workspace
#[tokio::test]
async fn status_does_not_create_workspace() -> Result<(), TestError> {
    let test = TestBuilder::new().with_astro_tables().build().await?;
    let state = test.into_app_state();

    for _ in 0..3 {
        let resp = get_generation_status(State(state.clone()), test.session.clone())
            .await
            .unwrap()
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let status: GenerationStatusDto = body(resp).await;
        assert_eq!(status.phase, GenerationPhaseDto::Idle);
        assert_eq!(status.window, None);
    }

    assert_eq!(state.workspaces.count().await, 0);
    assert_eq!(SessionWorkspaceId::get(&test.session).await.unwrap(), None);

    Ok(())
}
