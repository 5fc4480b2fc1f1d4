pub use sea_orm_migration::prelude::*;

mod m20260301_000001_comet;
mod m20260301_000002_flyby;
mod m20260301_000003_flyby_summary;
mod m20260301_000004_image_blob;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_comet::Migration),
            Box::new(m20260301_000002_flyby::Migration),
            Box::new(m20260301_000003_flyby_summary::Migration),
            Box::new(m20260301_000004_image_blob::Migration),
        ]
    }
}
