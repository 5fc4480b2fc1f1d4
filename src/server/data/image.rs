use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, EntityTrait};

pub struct ImageRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ImageRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        content_type: String,
        data: Vec<u8>,
    ) -> Result<entity::image_blob::Model, DbErr> {
        let image = entity::image_blob::ActiveModel {
            content_type: ActiveValue::Set(content_type),
            data: ActiveValue::Set(data),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        image.insert(self.db).await
    }

    pub async fn find_by_id(
        &self,
        image_id: i32,
    ) -> Result<Option<entity::image_blob::Model>, DbErr> {
        entity::prelude::ImageBlob::find_by_id(image_id)
            .one(self.db)
            .await
    }
}
