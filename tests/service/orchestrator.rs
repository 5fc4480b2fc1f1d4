//! End-to-end generation scenarios: admission, polling, parsing, write-back and cache update.

use astrokapsel::server::{
    data::summary::SummaryRepository,
    error::{generation::GenerationError, Error},
    service::{
        orchestrator::{
            state::{FailureKind, GenerationState},
            Admission, GenerationRequest,
        },
        window::WindowKey,
    },
};

use sea_orm::ConnectionTrait;
use serde_json::json;

use super::*;
use crate::util::wait_for_settled;

fn request(comet_id: i32, previous_flyby_id: i32, next_flyby_id: i32) -> GenerationRequest {
    GenerationRequest {
        comet_id: Some(comet_id),
        previous_flyby_id: Some(previous_flyby_id),
        next_flyby_id: Some(next_flyby_id),
        ..Default::default()
    }
}

/// Expect a polled job to be written back, cached, and a repeated call to send nothing
#[tokio::test]
async fn generates_then_serves_from_cache() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_astro_tables()
        .with_job_submission_endpoint("text", job::queued("job-1"), 1)
        .with_job_status_endpoint("job-1", job::running("job-1"), 1)
        .with_job_status_endpoint(
            "job-1",
            job::succeeded_text(
                "job-1",
                &job::summary_text("Between Halley's returns", "Seventy-seven years of history."),
            ),
            1,
        )
        .build()
        .await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let f1758 = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    let f1835 = test.comets().insert_flyby(comet.id, Some(1835.0)).await?;

    let state = test.into_app_state();
    let workspace = state.workspaces.get_or_create("workspace-a").await;

    let admission = state
        .orchestrator
        .generate(&workspace, request(comet.id, f1758.id, f1835.id))
        .await
        .unwrap();
    assert!(matches!(admission, Admission::Started(GenerationState::Requesting { .. })));

    let settled = wait_for_settled(&workspace).await;
    let GenerationState::Succeeded { summary_id, .. } = settled else {
        panic!("expected success, got {settled:?}");
    };

    let stored = SummaryRepository::new(&test.db)
        .find_by_id(summary_id)
        .await?
        .unwrap();
    assert_eq!(stored.title, "Between Halley's returns");
    assert_eq!(stored.body, "Seventy-seven years of history.");
    assert_eq!(stored.model, "test-text-model");
    assert_eq!(stored.previous_flyby, Some(serde_json::json!(f1758.id)));
    assert_eq!(stored.next_flyby, Some(serde_json::json!(f1835.id)));

    let key = WindowKey::new(f1758.id, f1835.id);
    {
        let guard = workspace.lock().await;
        let view = guard.view.as_ref().unwrap();
        assert_eq!(view.index.get(&key).map(|s| s.id), Some(summary_id));
        assert_eq!(guard.selected, Some(key));
    }

    // Reversed flyby order hits the same cache entry
    let again = state
        .orchestrator
        .generate(&workspace, request(comet.id, f1835.id, f1758.id))
        .await
        .unwrap();
    assert!(matches!(again, Admission::AlreadySummarized(summary) if summary.id == summary_id));

    test.assert_mocks();

    Ok(())
}

/// Expect unparseable output to store nothing and rebuild the index from the store
///
/// A summary written behind the workspace's back while the job runs only shows up in the
/// index if the failure path reconciled against the store.
#[tokio::test]
async fn unparseable_output_stores_nothing() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_astro_tables()
        .with_job_submission_endpoint("text", job::queued("job-1"), 1)
        .with_job_status_endpoint("job-1", job::running("job-1"), 1)
        .with_job_status_endpoint(
            "job-1",
            job::succeeded_text("job-1", "Once upon a time, a comet."),
            1,
        )
        .build()
        .await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let first = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    let second = test.comets().insert_flyby(comet.id, Some(1835.0)).await?;

    let state = test.into_app_state_with_polling(50, 10);
    let workspace = state.workspaces.get_or_create("workspace-a").await;

    state
        .orchestrator
        .generate(&workspace, request(comet.id, first.id, second.id))
        .await
        .unwrap();

    // Not published on the change feed, so only a store reload can pick it up
    let external = test
        .comets()
        .insert_summary(
            comet.id,
            Some(json!(first.id)),
            Some(json!(second.id)),
            "Written elsewhere",
        )
        .await?;

    let settled = wait_for_settled(&workspace).await;
    let GenerationState::Failed { kind, message, .. } = &settled else {
        panic!("expected failure, got {settled:?}");
    };
    assert_eq!(*kind, FailureKind::Generation);
    assert!(message.starts_with("Unable to parse"));

    let summaries = SummaryRepository::new(&test.db)
        .list_by_comet(comet.id)
        .await?;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, external.id);

    {
        let guard = workspace.lock().await;
        let index = &guard.view.as_ref().unwrap().index;
        let key = WindowKey::new(first.id, second.id);
        assert_eq!(index.get(&key).map(|s| s.id), Some(external.id));
    }
    assert!(!workspace.is_stale());

    test.assert_mocks();

    Ok(())
}

/// Expect a store failure during write-back to end as a write-back failure with no cache entry
#[tokio::test]
async fn write_back_failure_reports_write_back() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_astro_tables()
        .with_job_submission_endpoint("text", job::queued("job-1"), 1)
        .with_job_status_endpoint(
            "job-1",
            job::succeeded_text(
                "job-1",
                &job::summary_text("Between Halley's returns", "Seventy-seven years of history."),
            ),
            1,
        )
        .build()
        .await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let first = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    let second = test.comets().insert_flyby(comet.id, Some(1835.0)).await?;

    let state = test.into_app_state_with_polling(50, 10);
    let workspace = state.workspaces.get_or_create("workspace-a").await;

    state
        .orchestrator
        .generate(&workspace, request(comet.id, first.id, second.id))
        .await
        .unwrap();

    // Makes every insert into the summary table fail while the job is polled
    test.db
        .execute_unprepared("ALTER TABLE flyby_summary RENAME TO flyby_summary_unavailable")
        .await?;

    let settled = wait_for_settled(&workspace).await;
    let GenerationState::Failed { kind, window, .. } = &settled else {
        panic!("expected failure, got {settled:?}");
    };
    assert_eq!(*kind, FailureKind::WriteBack);
    assert_eq!(*window, Some(WindowKey::new(first.id, second.id)));
    assert_eq!(settled.to_dto().failure.as_deref(), Some("write_back"));

    {
        let guard = workspace.lock().await;
        assert!(guard.view.as_ref().unwrap().index.is_empty());
        assert!(guard.cancel.is_none());
    }

    test.assert_mocks();

    Ok(())
}

/// Expect a request for another comet to be rejected without replacing the loaded view
#[tokio::test]
async fn rejects_other_comet_while_in_flight() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_astro_tables()
        .with_job_submission_endpoint("text", job::queued("job-1"), 1)
        .with_job_status_endpoint("job-1", job::running("job-1"), 100)
        .build()
        .await?;
    let halley = test.comets().insert_comet("1P/Halley").await?;
    let f1758 = test.comets().insert_flyby(halley.id, Some(1758.0)).await?;
    let f1835 = test.comets().insert_flyby(halley.id, Some(1835.0)).await?;
    let encke = test.comets().insert_comet("2P/Encke").await?;
    let f1786 = test.comets().insert_flyby(encke.id, Some(1786.0)).await?;
    let f1795 = test.comets().insert_flyby(encke.id, Some(1795.0)).await?;

    let state = test.into_app_state_with_polling(50, 100);
    let workspace = state.workspaces.get_or_create("workspace-a").await;
    let halley_window = WindowKey::new(f1758.id, f1835.id);

    state
        .orchestrator
        .generate(&workspace, request(halley.id, f1758.id, f1835.id))
        .await
        .unwrap();

    let result = state
        .orchestrator
        .generate(&workspace, request(encke.id, f1786.id, f1795.id))
        .await;

    assert!(matches!(
        result,
        Err(Error::GenerationError(GenerationError::InFlight { window })) if window == halley_window.to_string()
    ));
    {
        let guard = workspace.lock().await;
        assert_eq!(guard.view.as_ref().unwrap().comet.id, halley.id);
        assert_eq!(guard.selected, Some(halley_window));
        assert_eq!(guard.generation.window(), Some(halley_window));
        assert!(guard.generation.is_in_flight());
    }

    assert!(state.orchestrator.cancel(&workspace).await);
    let settled = wait_for_settled(&workspace).await;
    assert!(matches!(settled, GenerationState::Failed { .. }));

    Ok(())
}

/// Expect a job still running after the polling budget to fail as timed out
#[tokio::test]
async fn times_out_after_polling_budget() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_astro_tables()
        .with_job_submission_endpoint("text", job::queued("job-1"), 1)
        .with_job_status_endpoint("job-1", job::running("job-1"), 3)
        .build()
        .await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let first = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    let second = test.comets().insert_flyby(comet.id, Some(1835.0)).await?;

    let state = test.into_app_state();
    let workspace = state.workspaces.get_or_create("workspace-a").await;

    state
        .orchestrator
        .generate(&workspace, request(comet.id, first.id, second.id))
        .await
        .unwrap();

    let settled = wait_for_settled(&workspace).await;
    assert_eq!(
        settled.message(),
        "Generation did not finish after 3 status checks"
    );
    assert_eq!(settled.to_dto().failure.as_deref(), Some("generation"));

    test.assert_mocks();

    Ok(())
}

/// Expect a failed job to be reported with the service's error
#[tokio::test]
async fn reports_failed_job() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_astro_tables()
        .with_job_submission_endpoint("text", job::failed("job-1", "quota exceeded"), 1)
        .build()
        .await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let first = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    let second = test.comets().insert_flyby(comet.id, Some(1835.0)).await?;

    let state = test.into_app_state();
    let workspace = state.workspaces.get_or_create("workspace-a").await;

    state
        .orchestrator
        .generate(&workspace, request(comet.id, first.id, second.id))
        .await
        .unwrap();

    let settled = wait_for_settled(&workspace).await;
    assert_eq!(settled.message(), "Generation job failed: quota exceeded");

    test.assert_mocks();

    Ok(())
}

/// Expect an illustration to be stored and attached to the new summary
#[tokio::test]
async fn attaches_illustration() -> Result<(), TestError> {
    let png = [0x89, b'P', b'N', b'G'];
    let test = TestBuilder::new()
        .with_astro_tables()
        .with_job_submission_endpoint(
            "text",
            job::succeeded_text("job-1", &job::summary_text("Age of Sail", "Ships.")),
            1,
        )
        .with_job_submission_endpoint("image", job::succeeded_image("job-2", "image/png", &png), 1)
        .build()
        .await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let first = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    let second = test.comets().insert_flyby(comet.id, Some(1835.0)).await?;

    let state = test.into_app_state();
    let workspace = state.workspaces.get_or_create("workspace-a").await;

    let mut with_image = request(comet.id, first.id, second.id);
    with_image.with_image = true;
    state
        .orchestrator
        .generate(&workspace, with_image)
        .await
        .unwrap();

    let settled = wait_for_settled(&workspace).await;
    let GenerationState::Succeeded {
        summary_id,
        message,
        ..
    } = settled
    else {
        panic!("expected success, got {settled:?}");
    };
    assert!(!message.contains("illustration failed"));

    let stored = SummaryRepository::new(&test.db)
        .find_by_id(summary_id)
        .await?
        .unwrap();
    let image_url = stored.image_url.unwrap();
    assert!(image_url.starts_with("http://localhost:8080/api/images/"));

    {
        let guard = workspace.lock().await;
        let cached = guard
            .view
            .as_ref()
            .unwrap()
            .index
            .get(&WindowKey::new(first.id, second.id))
            .unwrap();
        assert_eq!(cached.image_url.as_deref(), Some(image_url.as_str()));
    }

    test.assert_mocks();

    Ok(())
}

/// Expect a failed illustration to keep the summary and mention the failure
#[tokio::test]
async fn illustration_failure_keeps_summary() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_astro_tables()
        .with_job_submission_endpoint(
            "text",
            job::succeeded_text("job-1", &job::summary_text("Age of Sail", "Ships.")),
            1,
        )
        .with_job_submission_endpoint("image", job::failed("job-2", "unsafe prompt"), 1)
        .build()
        .await?;
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let first = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    let second = test.comets().insert_flyby(comet.id, Some(1835.0)).await?;

    let state = test.into_app_state();
    let workspace = state.workspaces.get_or_create("workspace-a").await;

    let mut with_image = request(comet.id, first.id, second.id);
    with_image.with_image = true;
    state
        .orchestrator
        .generate(&workspace, with_image)
        .await
        .unwrap();

    let settled = wait_for_settled(&workspace).await;
    let GenerationState::Succeeded {
        summary_id,
        message,
        ..
    } = settled
    else {
        panic!("expected success, got {settled:?}");
    };
    assert!(message.contains("illustration failed"));

    let stored = SummaryRepository::new(&test.db)
        .find_by_id(summary_id)
        .await?
        .unwrap();
    assert!(stored.image_url.is_none());

    test.assert_mocks();

    Ok(())
}

/// Expect a generation service error status to fail the generation
#[tokio::test]
async fn submission_error_status_fails_generation() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_astro_tables().build().await?;
    let _mock = test
        .generation()
        .create_error_endpoint("POST", "/v1/jobs", 500, 1);
    let comet = test.comets().insert_comet("1P/Halley").await?;
    let first = test.comets().insert_flyby(comet.id, Some(1758.0)).await?;
    let second = test.comets().insert_flyby(comet.id, Some(1835.0)).await?;

    let state = test.into_app_state();
    let workspace = state.workspaces.get_or_create("workspace-a").await;

    state
        .orchestrator
        .generate(&workspace, request(comet.id, first.id, second.id))
        .await
        .unwrap();

    let settled = wait_for_settled(&workspace).await;
    assert!(settled
        .message()
        .starts_with("Generation service responded with status 500"));
    assert!(SummaryRepository::new(&test.db)
        .list_by_comet(comet.id)
        .await?
        .is_empty());

    Ok(())
}
