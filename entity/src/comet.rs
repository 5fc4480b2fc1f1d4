use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comet")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub designation: String,
    pub name: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::flyby::Entity")]
    Flyby,
    #[sea_orm(has_many = "super::flyby_summary::Entity")]
    FlybySummary,
}

impl Related<super::flyby::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flyby.def()
    }
}

impl Related<super::flyby_summary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FlybySummary.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
