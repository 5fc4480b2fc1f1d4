use sea_orm::entity::prelude::*;

/// Generated narrative for the interval between two flybys of a comet.
///
/// The flyby references keep the shape they were written in: a bare id, an
/// embedded object or a one-element array. Records written by the server always
/// carry bare ids; imported records may not.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "flyby_summary")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub comet_id: i32,
    #[sea_orm(column_type = "Json", nullable)]
    pub previous_flyby: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub next_flyby: Option<Json>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub image_url: Option<String>,
    pub model: String,
    pub generated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::comet::Entity",
        from = "Column::CometId",
        to = "super::comet::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Comet,
}

impl Related<super::comet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
