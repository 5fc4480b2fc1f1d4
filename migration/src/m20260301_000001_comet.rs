use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comet::Table)
                    .if_not_exists()
                    .col(pk_auto(Comet::Id))
                    .col(string_uniq(Comet::Designation))
                    .col(string_null(Comet::Name))
                    .col(timestamp(Comet::CreatedAt))
                    .col(timestamp(Comet::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comet::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Comet {
    Table,
    Id,
    Designation,
    Name,
    CreatedAt,
    UpdatedAt,
}
