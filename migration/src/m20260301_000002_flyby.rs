use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260301_000001_comet::Comet;

static IDX_FLYBY_COMET_ID: &str = "idx-flyby-comet_id";
static FK_FLYBY_COMET_ID: &str = "fk-flyby-comet_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Flyby::Table)
                    .if_not_exists()
                    .col(pk_auto(Flyby::Id))
                    .col(integer(Flyby::CometId))
                    .col(double_null(Flyby::Year))
                    .col(text_null(Flyby::Description))
                    .col(timestamp(Flyby::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_FLYBY_COMET_ID)
                            .from(Flyby::Table, Flyby::CometId)
                            .to(Comet::Table, Comet::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_FLYBY_COMET_ID)
                    .table(Flyby::Table)
                    .col(Flyby::CometId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_FLYBY_COMET_ID)
                    .table(Flyby::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Flyby::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Flyby {
    Table,
    Id,
    CometId,
    Year,
    Description,
    CreatedAt,
}
