//! Comet registry fixtures.
//!
//! [`factory`] builds models in memory for pure tests; [`CometFixtures`] inserts rows into
//! the test database.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue};
use serde_json::Value;

use crate::{error::TestError, TestContext};

/// In-memory model factories.
pub mod factory {
    use chrono::{NaiveDateTime, Utc};

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    pub fn comet(id: i32, designation: &str) -> entity::comet::Model {
        entity::comet::Model {
            id,
            designation: designation.to_string(),
            name: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    pub fn flyby(id: i32, comet_id: i32, year: Option<f64>) -> entity::flyby::Model {
        entity::flyby::Model {
            id,
            comet_id,
            year,
            description: None,
            created_at: now(),
        }
    }

    pub fn summary(
        id: i32,
        comet_id: i32,
        previous_flyby: Option<serde_json::Value>,
        next_flyby: Option<serde_json::Value>,
    ) -> entity::flyby_summary::Model {
        entity::flyby_summary::Model {
            id,
            comet_id,
            previous_flyby,
            next_flyby,
            title: format!("Summary {id}"),
            body: format!("Body of summary {id}"),
            image_url: None,
            model: "test-text-model".to_string(),
            generated_at: now(),
        }
    }
}

impl TestContext {
    /// Access database fixtures for the comet registry tables.
    pub fn comets(&self) -> CometFixtures<'_> {
        CometFixtures { context: self }
    }
}

pub struct CometFixtures<'a> {
    context: &'a TestContext,
}

impl CometFixtures<'_> {
    pub async fn insert_comet(&self, designation: &str) -> Result<entity::comet::Model, TestError> {
        let now = Utc::now().naive_utc();
        let comet = entity::comet::ActiveModel {
            designation: ActiveValue::Set(designation.to_string()),
            name: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(comet.insert(&self.context.db).await?)
    }

    pub async fn insert_flyby(
        &self,
        comet_id: i32,
        year: Option<f64>,
    ) -> Result<entity::flyby::Model, TestError> {
        let flyby = entity::flyby::ActiveModel {
            comet_id: ActiveValue::Set(comet_id),
            year: ActiveValue::Set(year),
            description: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        Ok(flyby.insert(&self.context.db).await?)
    }

    /// Insert a summary whose flyby references are stored exactly as given.
    pub async fn insert_summary(
        &self,
        comet_id: i32,
        previous_flyby: Option<Value>,
        next_flyby: Option<Value>,
        title: &str,
    ) -> Result<entity::flyby_summary::Model, TestError> {
        let summary = entity::flyby_summary::ActiveModel {
            comet_id: ActiveValue::Set(comet_id),
            previous_flyby: ActiveValue::Set(previous_flyby),
            next_flyby: ActiveValue::Set(next_flyby),
            title: ActiveValue::Set(title.to_string()),
            body: ActiveValue::Set(format!("{title} body")),
            image_url: ActiveValue::Set(None),
            model: ActiveValue::Set("test-text-model".to_string()),
            generated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        Ok(summary.insert(&self.context.db).await?)
    }
}
