//! Offers and their children: beregning (1:1), enheter and benefisienter

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tilbud::Table)
                    .if_not_exists()
                    .col(pk_uuid(Tilbud::Id))
                    .col(uuid(Tilbud::ProsjektId))
                    .col(string_len(Tilbud::Tilbudsnummer, 32))
                    .col(string(Tilbud::Produkttype))
                    .col(string_len(Tilbud::Status, 40).default("Utkast"))
                    .col(integer(Tilbud::Versjonsnummer).default(1))
                    .col(text_null(Tilbud::Kommentar))
                    .col(uuid_null(Tilbud::OpprettetAv))
                    .col(timestamp_with_time_zone(Tilbud::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Tilbud::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tilbud_prosjekt")
                            .from(Tilbud::Table, Tilbud::ProsjektId)
                            .to(Prosjekt::Table, Prosjekt::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tilbud_prosjekt_id")
                    .table(Tilbud::Table)
                    .col(Tilbud::ProsjektId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TilbudBeregning::Table)
                    .if_not_exists()
                    .col(pk_uuid(TilbudBeregning::Id))
                    .col(uuid(TilbudBeregning::TilbudId).unique_key())
                    .col(decimal_len(TilbudBeregning::Kontraktssum, 18, 2))
                    .col(integer(TilbudBeregning::UtforelsestidMaaneder))
                    .col(integer(TilbudBeregning::GarantitidAar))
                    .col(decimal_len(TilbudBeregning::RenteUtforelse, 9, 4))
                    .col(decimal_len(TilbudBeregning::RenteGaranti, 9, 4))
                    .col(decimal_len(TilbudBeregning::Etableringsgebyr, 18, 2))
                    .col(decimal_len(TilbudBeregning::PremieUtforelse, 18, 2))
                    .col(decimal_len(TilbudBeregning::PremieGaranti, 18, 2))
                    .col(decimal_len(TilbudBeregning::TotalPremie, 18, 2))
                    .col(timestamp_with_time_zone(TilbudBeregning::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(TilbudBeregning::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tilbud_beregning_tilbud")
                            .from(TilbudBeregning::Table, TilbudBeregning::TilbudId)
                            .to(Tilbud::Table, Tilbud::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TilbudEnhet::Table)
                    .if_not_exists()
                    .col(pk_uuid(TilbudEnhet::Id))
                    .col(uuid(TilbudEnhet::TilbudId))
                    .col(string(TilbudEnhet::Betegnelse))
                    .col(string(TilbudEnhet::Enhetstype))
                    .col(decimal_len(TilbudEnhet::AndelAvHelhet, 7, 4))
                    .col(timestamp_with_time_zone(TilbudEnhet::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(TilbudEnhet::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tilbud_enhet_tilbud")
                            .from(TilbudEnhet::Table, TilbudEnhet::TilbudId)
                            .to(Tilbud::Table, Tilbud::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TilbudBenefisient::Table)
                    .if_not_exists()
                    .col(pk_uuid(TilbudBenefisient::Id))
                    .col(uuid(TilbudBenefisient::TilbudId))
                    .col(uuid_null(TilbudBenefisient::EnhetId))
                    .col(string_len(TilbudBenefisient::BenefisientType, 20))
                    .col(string(TilbudBenefisient::Navn))
                    .col(string_len_null(TilbudBenefisient::Organisasjonsnummer, 9))
                    .col(string_len_null(TilbudBenefisient::Personident, 11))
                    .col(decimal_len(TilbudBenefisient::Andel, 7, 4))
                    .col(boolean(TilbudBenefisient::Aktiv).default(true))
                    .col(timestamp_with_time_zone(TilbudBenefisient::AktivFra).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(TilbudBenefisient::AktivTil))
                    .col(timestamp_with_time_zone(TilbudBenefisient::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(TilbudBenefisient::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tilbud_benefisient_tilbud")
                            .from(TilbudBenefisient::Table, TilbudBenefisient::TilbudId)
                            .to(Tilbud::Table, Tilbud::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tilbud_benefisient_enhet")
                            .from(TilbudBenefisient::Table, TilbudBenefisient::EnhetId)
                            .to(TilbudEnhet::Table, TilbudEnhet::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Share validation scans one (tilbud, enhet) scope at a time
        manager
            .create_index(
                Index::create()
                    .name("idx_tilbud_benefisient_scope")
                    .table(TilbudBenefisient::Table)
                    .col(TilbudBenefisient::TilbudId)
                    .col(TilbudBenefisient::EnhetId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TilbudBenefisient::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TilbudEnhet::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TilbudBeregning::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tilbud::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tilbud {
    Table,
    Id,
    ProsjektId,
    Tilbudsnummer,
    Produkttype,
    Status,
    Versjonsnummer,
    Kommentar,
    OpprettetAv,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TilbudBeregning {
    Table,
    Id,
    TilbudId,
    Kontraktssum,
    UtforelsestidMaaneder,
    GarantitidAar,
    RenteUtforelse,
    RenteGaranti,
    Etableringsgebyr,
    PremieUtforelse,
    PremieGaranti,
    TotalPremie,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TilbudEnhet {
    Table,
    Id,
    TilbudId,
    Betegnelse,
    Enhetstype,
    AndelAvHelhet,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TilbudBenefisient {
    Table,
    Id,
    TilbudId,
    EnhetId,
    BenefisientType,
    Navn,
    Organisasjonsnummer,
    Personident,
    Andel,
    Aktiv,
    AktivFra,
    AktivTil,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Prosjekt {
    Table,
    Id,
}
