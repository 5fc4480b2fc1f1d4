use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct CometRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CometRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Insert a comet; the designation must already be normalized.
    pub async fn create(
        &self,
        designation: String,
        name: Option<String>,
    ) -> Result<entity::comet::Model, DbErr> {
        let comet = entity::comet::ActiveModel {
            designation: ActiveValue::Set(designation),
            name: ActiveValue::Set(name),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        comet.insert(self.db).await
    }

    pub async fn find_by_id(&self, comet_id: i32) -> Result<Option<entity::comet::Model>, DbErr> {
        entity::prelude::Comet::find_by_id(comet_id)
            .one(self.db)
            .await
    }

    pub async fn find_by_designation(
        &self,
        designation: &str,
    ) -> Result<Option<entity::comet::Model>, DbErr> {
        entity::prelude::Comet::find()
            .filter(entity::comet::Column::Designation.eq(designation))
            .one(self.db)
            .await
    }

    /// All comets ordered by designation
    pub async fn list(&self) -> Result<Vec<entity::comet::Model>, DbErr> {
        entity::prelude::Comet::find()
            .order_by_asc(entity::comet::Column::Designation)
            .all(self.db)
            .await
    }
}
