use base64::{engine::general_purpose::STANDARD, Engine};
use sea_orm::DatabaseConnection;

use crate::server::{
    data::image::ImageRepository,
    error::{generation::GenerationError, Error},
    generation::model::InlineImage,
    model::db::ImageBlobModel,
};

/// Stores generated illustrations and serves them back.
pub struct ImageService<'a> {
    db: &'a DatabaseConnection,
    public_base_url: &'a str,
}

impl<'a> ImageService<'a> {
    pub fn new(db: &'a DatabaseConnection, public_base_url: &'a str) -> Self {
        Self {
            db,
            public_base_url,
        }
    }

    /// Decodes a base64 image payload and stores it.
    ///
    /// # Returns
    /// - `Ok(ImageBlobModel)` - Stored image
    /// - `Err(Error::GenerationError(InvalidImage))` - Not an image type or not valid base64
    /// - `Err(Error::DbErr)` - Storing failed
    pub async fn store_inline(&self, image: &InlineImage) -> Result<ImageBlobModel, Error> {
        if !image.mime_type.starts_with("image/") {
            return Err(GenerationError::InvalidImage(format!(
                "unexpected content type {}",
                image.mime_type
            ))
            .into());
        }

        let data = STANDARD
            .decode(image.data.trim())
            .map_err(|err| GenerationError::InvalidImage(err.to_string()))?;
        if data.is_empty() {
            return Err(GenerationError::InvalidImage("empty image payload".to_string()).into());
        }

        let stored = ImageRepository::new(self.db)
            .create(image.mime_type.clone(), data)
            .await?;

        tracing::debug!(image_id = stored.id, bytes = stored.data.len(), "Stored illustration");

        Ok(stored)
    }

    pub async fn get(&self, image_id: i32) -> Result<Option<ImageBlobModel>, Error> {
        Ok(ImageRepository::new(self.db).find_by_id(image_id).await?)
    }

    /// Public URL under which an image is served.
    pub fn image_url(&self, image_id: i32) -> String {
        format!(
            "{}/api/images/{}",
            self.public_base_url.trim_end_matches('/'),
            image_id
        )
    }
}
