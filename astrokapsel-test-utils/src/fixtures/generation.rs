//! Mock generation service endpoints and job documents.

use mockito::{Matcher, Mock};
use serde_json::{json, Value};

use crate::TestContext;

/// Job documents as returned by the generation service.
pub mod job {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde_json::{json, Value};

    pub fn queued(id: &str) -> Value {
        json!({ "id": id, "status": "queued" })
    }

    pub fn running(id: &str) -> Value {
        json!({ "id": id, "status": "running" })
    }

    pub fn succeeded_text(id: &str, text: &str) -> Value {
        json!({ "id": id, "status": "succeeded", "output": { "text": text } })
    }

    /// Successful image job carrying `bytes` as base64 inline data.
    pub fn succeeded_image(id: &str, mime_type: &str, bytes: &[u8]) -> Value {
        json!({
            "id": id,
            "status": "succeeded",
            "output": { "image": { "mime_type": mime_type, "data": STANDARD.encode(bytes) } }
        })
    }

    pub fn failed(id: &str, error: &str) -> Value {
        json!({ "id": id, "status": "failed", "error": error })
    }

    /// Summary text in the JSON shape the summary parser expects.
    pub fn summary_text(title: &str, body: &str) -> String {
        json!({ "title": title, "body": body }).to_string()
    }
}

impl TestContext {
    /// Access mock endpoint helpers for the generation service.
    pub fn generation(&mut self) -> GenerationFixtures<'_> {
        GenerationFixtures { context: self }
    }
}

pub struct GenerationFixtures<'a> {
    context: &'a mut TestContext,
}

impl GenerationFixtures<'_> {
    /// Mock `POST /v1/jobs` for submissions whose body carries `"kind": kind`.
    pub fn create_submission_endpoint(
        &mut self,
        kind: &str,
        job: Value,
        expected_requests: usize,
    ) -> Mock {
        self.context
            .server
            .mock("POST", "/v1/jobs")
            .match_body(Matcher::PartialJson(json!({ "kind": kind })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(job.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Mock `GET /v1/jobs/{job_id}`.
    pub fn create_job_endpoint(&mut self, job_id: &str, job: Value, expected_requests: usize) -> Mock {
        let url = format!("/v1/jobs/{}", job_id);

        self.context
            .server
            .mock("GET", url.as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(job.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Mock an endpoint answering with a bare error status.
    pub fn create_error_endpoint(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        expected_requests: usize,
    ) -> Mock {
        self.context
            .server
            .mock(method, path)
            .with_status(status)
            .with_body(json!({ "error": "mock failure" }).to_string())
            .expect(expected_requests)
            .create()
    }
}
