use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ImageBlob::Table)
                    .if_not_exists()
                    .col(pk_auto(ImageBlob::Id))
                    .col(string(ImageBlob::ContentType))
                    .col(blob(ImageBlob::Data))
                    .col(timestamp(ImageBlob::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ImageBlob::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ImageBlob {
    Table,
    Id,
    ContentType,
    Data,
    CreatedAt,
}
