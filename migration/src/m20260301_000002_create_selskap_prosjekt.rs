//! Companies, their projects and the incoming guarantee requests (saker)

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Selskap::Table)
                    .if_not_exists()
                    .col(pk_uuid(Selskap::Id))
                    .col(string_len(Selskap::Organisasjonsnummer, 9).unique_key())
                    .col(string(Selskap::Navn))
                    .col(string_null(Selskap::Gateadresse))
                    .col(string_len_null(Selskap::Postnummer, 4))
                    .col(string_null(Selskap::Poststed))
                    .col(string_null(Selskap::Telefon))
                    .col(string_null(Selskap::Epost))
                    .col(string_null(Selskap::Kontaktperson))
                    .col(decimal_len_null(Selskap::Ramme, 18, 2))
                    .col(timestamp_with_time_zone(Selskap::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Selskap::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Prosjekt::Table)
                    .if_not_exists()
                    .col(pk_uuid(Prosjekt::Id))
                    .col(uuid(Prosjekt::SelskapId))
                    .col(string(Prosjekt::Navn))
                    .col(string_len_null(Prosjekt::Prosjekttype, 40))
                    .col(string_len(Prosjekt::Status, 40).default("Ny"))
                    .col(uuid_null(Prosjekt::AnsvarligRadgiverId))
                    .col(string_null(Prosjekt::Gateadresse))
                    .col(string_len_null(Prosjekt::Postnummer, 4))
                    .col(string_null(Prosjekt::Poststed))
                    .col(text_null(Prosjekt::Kommentar))
                    .col(timestamp_with_time_zone(Prosjekt::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Prosjekt::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prosjekt_selskap")
                            .from(Prosjekt::Table, Prosjekt::SelskapId)
                            .to(Selskap::Table, Selskap::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prosjekt_radgiver")
                            .from(Prosjekt::Table, Prosjekt::AnsvarligRadgiverId)
                            .to(Bruker::Table, Bruker::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_prosjekt_selskap_id")
                    .table(Prosjekt::Table)
                    .col(Prosjekt::SelskapId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GarantiSak::Table)
                    .if_not_exists()
                    .col(pk_uuid(GarantiSak::Id))
                    .col(string_len(GarantiSak::Saksnummer, 32).unique_key())
                    .col(uuid(GarantiSak::SelskapId))
                    .col(uuid_null(GarantiSak::ProsjektId))
                    .col(text_null(GarantiSak::Beskrivelse))
                    .col(string_null(GarantiSak::Kilde))
                    .col(uuid_null(GarantiSak::OpprettetAv))
                    .col(timestamp_with_time_zone(GarantiSak::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_garanti_sak_selskap")
                            .from(GarantiSak::Table, GarantiSak::SelskapId)
                            .to(Selskap::Table, Selskap::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_garanti_sak_prosjekt")
                            .from(GarantiSak::Table, GarantiSak::ProsjektId)
                            .to(Prosjekt::Table, Prosjekt::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GarantiSak::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Prosjekt::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Selskap::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Selskap {
    Table,
    Id,
    Organisasjonsnummer,
    Navn,
    Gateadresse,
    Postnummer,
    Poststed,
    Telefon,
    Epost,
    Kontaktperson,
    Ramme,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Prosjekt {
    Table,
    Id,
    SelskapId,
    Navn,
    Prosjekttype,
    Status,
    AnsvarligRadgiverId,
    Gateadresse,
    Postnummer,
    Poststed,
    Kommentar,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GarantiSak {
    Table,
    Id,
    Saksnummer,
    SelskapId,
    ProsjektId,
    Beskrivelse,
    Kilde,
    OpprettetAv,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Bruker {
    Table,
    Id,
}
