use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "flyby")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub comet_id: i32,
    #[sea_orm(column_type = "Double", nullable)]
    pub year: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: DateTime,
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
