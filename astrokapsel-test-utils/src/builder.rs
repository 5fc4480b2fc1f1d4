//! Declarative test builder.
//!
//! Configuration methods queue work that is executed in a fixed order by `build()`: tables
//! first, then mock endpoints.

use mockito::Mock;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};
use serde_json::Value;

use crate::{error::TestError, TestContext};

/// Builder for declarative test initialization.
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    include_astro_tables: bool,

    mock_builders: Vec<Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>>,

    submission_endpoints: Vec<(String, Value, usize)>, // (job kind, response job, expected_requests)
    job_endpoints: Vec<(String, Value, usize)>,        // (job id, response job, expected_requests)
}

impl TestBuilder {
    /// Create an empty builder with no tables or mock endpoints configured.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_astro_tables: false,
            mock_builders: Vec::new(),
            submission_endpoints: Vec::new(),
            job_endpoints: Vec::new(),
        }
    }

    /// Add every table of the comet registry: comet, flyby, flyby_summary and image_blob.
    pub fn with_astro_tables(mut self) -> Self {
        self.include_astro_tables = true;
        self
    }

    /// Add a single entity table to the test database.
    ///
    /// Tables are created in the order they were added, so parents must come before the
    /// entities that reference them.
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Add a mock `POST /v1/jobs` endpoint answering submissions of the given job kind.
    ///
    /// # Arguments
    /// - `kind` - Job kind matched in the request body, `text` or `image`
    /// - `job` - Job document returned to the caller (see [`job`](crate::fixtures::generation::job))
    /// - `expected_requests` - Number of times this endpoint should be called
    pub fn with_job_submission_endpoint(
        mut self,
        kind: impl Into<String>,
        job: Value,
        expected_requests: usize,
    ) -> Self {
        self.submission_endpoints
            .push((kind.into(), job, expected_requests));
        self
    }

    /// Add a mock `GET /v1/jobs/{job_id}` endpoint.
    ///
    /// Several endpoints may be added for the same job; they answer in the order they were
    /// added, each one until its expected request count is reached.
    pub fn with_job_status_endpoint(
        mut self,
        job_id: impl Into<String>,
        job: Value,
        expected_requests: usize,
    ) -> Self {
        self.job_endpoints
            .push((job_id.into(), job, expected_requests));
        self
    }

    /// Add a custom mock endpoint with full control over the mockito server.
    pub fn with_mock_endpoint<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(setup));
        self
    }

    /// Build the test context.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Test environment ready for use
    /// - `Err(TestError::DbErr)` - Database connection or table creation failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut context = TestContext::new().await?;

        // 1. Create tables
        let mut all_tables = Vec::new();

        if self.include_astro_tables {
            let schema = Schema::new(sea_orm::DbBackend::Sqlite);
            all_tables.extend(vec![
                schema.create_table_from_entity(entity::prelude::Comet),
                schema.create_table_from_entity(entity::prelude::Flyby),
                schema.create_table_from_entity(entity::prelude::FlybySummary),
                schema.create_table_from_entity(entity::prelude::ImageBlob),
            ]);
        }

        all_tables.extend(self.tables);
        context.with_tables(all_tables).await?;

        // 2. Create mock endpoints
        // Custom endpoints first so sequential matching on a shared path stays predictable
        let mut mocks = Vec::new();

        for builder in self.mock_builders {
            mocks.push(builder(&mut context.server));
        }

        for (kind, job, expected) in self.submission_endpoints {
            mocks.push(
                context
                    .generation()
                    .create_submission_endpoint(&kind, job, expected),
            );
        }

        for (job_id, job, expected) in self.job_endpoints {
            mocks.push(
                context
                    .generation()
                    .create_job_endpoint(&job_id, job, expected),
            );
        }

        context.mocks = mocks;

        Ok(context)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
