use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260301_000001_comet::Comet;

static IDX_FLYBY_SUMMARY_COMET_ID: &str = "idx-flyby_summary-comet_id";
static FK_FLYBY_SUMMARY_COMET_ID: &str = "fk-flyby_summary-comet_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No uniqueness over the flyby pair: concurrent sessions may both write a
        // summary for the same window and the index keeps the newest one.
        manager
            .create_table(
                Table::create()
                    .table(FlybySummary::Table)
                    .if_not_exists()
                    .col(pk_auto(FlybySummary::Id))
                    .col(integer(FlybySummary::CometId))
                    .col(json_null(FlybySummary::PreviousFlyby))
                    .col(json_null(FlybySummary::NextFlyby))
                    .col(string(FlybySummary::Title))
                    .col(text(FlybySummary::Body))
                    .col(string_null(FlybySummary::ImageUrl))
                    .col(string(FlybySummary::Model))
                    .col(timestamp(FlybySummary::GeneratedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_FLYBY_SUMMARY_COMET_ID)
                            .from(FlybySummary::Table, FlybySummary::CometId)
                            .to(Comet::Table, Comet::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_FLYBY_SUMMARY_COMET_ID)
                    .table(FlybySummary::Table)
                    .col(FlybySummary::CometId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_FLYBY_SUMMARY_COMET_ID)
                    .table(FlybySummary::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(FlybySummary::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum FlybySummary {
    Table,
    Id,
    CometId,
    PreviousFlyby,
    NextFlyby,
    Title,
    Body,
    ImageUrl,
    Model,
    GeneratedAt,
}
