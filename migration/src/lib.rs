pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_bruker;
mod m20260301_000002_create_selskap_prosjekt;
mod m20260301_000003_create_tilbud;
mod m20260301_000004_create_hendelse_dokument;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_bruker::Migration),
            Box::new(m20260301_000002_create_selskap_prosjekt::Migration),
            Box::new(m20260301_000003_create_tilbud::Migration),
            Box::new(m20260301_000004_create_hendelse_dokument::Migration),
        ]
    }
}
