use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Tolerance used when matching a stored flyby by its year.
const YEAR_MATCH_TOLERANCE: f64 = 1e-6;

pub struct FlybyRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> FlybyRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        comet_id: i32,
        year: Option<f64>,
        description: Option<String>,
    ) -> Result<entity::flyby::Model, DbErr> {
        let flyby = entity::flyby::ActiveModel {
            comet_id: ActiveValue::Set(comet_id),
            year: ActiveValue::Set(year),
            description: ActiveValue::Set(description),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        flyby.insert(self.db).await
    }

    pub async fn find_by_id(&self, flyby_id: i32) -> Result<Option<entity::flyby::Model>, DbErr> {
        entity::prelude::Flyby::find_by_id(flyby_id)
            .one(self.db)
            .await
    }

    /// Flybys of a comet in insertion order
    pub async fn list_by_comet(&self, comet_id: i32) -> Result<Vec<entity::flyby::Model>, DbErr> {
        entity::prelude::Flyby::find()
            .filter(entity::flyby::Column::CometId.eq(comet_id))
            .order_by_asc(entity::flyby::Column::Id)
            .all(self.db)
            .await
    }

    /// Point lookup of a comet's flyby by perihelion year.
    ///
    /// Used to resolve summary references that carry a year but no id. When several flybys
    /// share the year the oldest record wins.
    pub async fn find_by_comet_and_year(
        &self,
        comet_id: i32,
        year: f64,
    ) -> Result<Option<entity::flyby::Model>, DbErr> {
        entity::prelude::Flyby::find()
            .filter(entity::flyby::Column::CometId.eq(comet_id))
            .filter(entity::flyby::Column::Year.between(
                year - YEAR_MATCH_TOLERANCE,
                year + YEAR_MATCH_TOLERANCE,
            ))
            .order_by_asc(entity::flyby::Column::Id)
            .one(self.db)
            .await
    }
}
