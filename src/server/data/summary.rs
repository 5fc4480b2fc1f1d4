use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};
use serde_json::json;

/// Fields of a freshly generated summary.
#[derive(Clone, Debug)]
pub struct NewSummary {
    pub comet_id: i32,
    pub previous_flyby_id: i32,
    pub next_flyby_id: i32,
    pub title: String,
    pub body: String,
    pub model: String,
}

pub struct SummaryRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SummaryRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Insert a summary. Flyby references are always written as bare ids.
    pub async fn create(&self, summary: NewSummary) -> Result<entity::flyby_summary::Model, DbErr> {
        let summary = entity::flyby_summary::ActiveModel {
            comet_id: ActiveValue::Set(summary.comet_id),
            previous_flyby: ActiveValue::Set(Some(json!(summary.previous_flyby_id))),
            next_flyby: ActiveValue::Set(Some(json!(summary.next_flyby_id))),
            title: ActiveValue::Set(summary.title),
            body: ActiveValue::Set(summary.body),
            image_url: ActiveValue::Set(None),
            model: ActiveValue::Set(summary.model),
            generated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        summary.insert(self.db).await
    }

    pub async fn find_by_id(
        &self,
        summary_id: i32,
    ) -> Result<Option<entity::flyby_summary::Model>, DbErr> {
        entity::prelude::FlybySummary::find_by_id(summary_id)
            .one(self.db)
            .await
    }

    /// Summaries of a comet in ascending id order
    pub async fn list_by_comet(
        &self,
        comet_id: i32,
    ) -> Result<Vec<entity::flyby_summary::Model>, DbErr> {
        entity::prelude::FlybySummary::find()
            .filter(entity::flyby_summary::Column::CometId.eq(comet_id))
            .order_by_asc(entity::flyby_summary::Column::Id)
            .all(self.db)
            .await
    }

    /// Attach an image URL to a summary that has none yet.
    ///
    /// # Returns
    /// - `Ok(Some(Model))` - The URL was attached, updated record returned
    /// - `Ok(None)` - Summary missing or it already carries an image URL
    pub async fn set_image_url(
        &self,
        summary_id: i32,
        image_url: String,
    ) -> Result<Option<entity::flyby_summary::Model>, DbErr> {
        let result = entity::prelude::FlybySummary::update_many()
            .col_expr(
                entity::flyby_summary::Column::ImageUrl,
                Expr::value(image_url),
            )
            .filter(entity::flyby_summary::Column::Id.eq(summary_id))
            .filter(entity::flyby_summary::Column::ImageUrl.is_null())
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_by_id(summary_id).await
    }
}
