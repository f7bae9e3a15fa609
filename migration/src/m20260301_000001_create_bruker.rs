use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bruker::Table)
                    .if_not_exists()
                    .col(pk_uuid(Bruker::Id))
                    .col(string_len(Bruker::Epost, 255).unique_key())
                    .col(string(Bruker::Navn))
                    .col(string_len(Bruker::Rolle, 20))
                    .col(boolean(Bruker::Aktiv).default(true))
                    .col(timestamp_with_time_zone(Bruker::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Bruker::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bruker::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Bruker {
    Table,
    Id,
    Epost,
    Navn,
    Rolle,
    Aktiv,
    CreatedAt,
    UpdatedAt,
}
