//! Audit log (hendelser) and uploaded documents

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GarantiSakHendelse::Table)
                    .if_not_exists()
                    .col(pk_uuid(GarantiSakHendelse::Id))
                    .col(uuid_null(GarantiSakHendelse::SakId))
                    .col(uuid_null(GarantiSakHendelse::SelskapId))
                    .col(uuid_null(GarantiSakHendelse::ProsjektId))
                    .col(string_len(GarantiSakHendelse::HendelseType, 64))
                    .col(text(GarantiSakHendelse::Beskrivelse))
                    .col(uuid_null(GarantiSakHendelse::UtfortAv))
                    .col(timestamp_with_time_zone(GarantiSakHendelse::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hendelse_selskap_id")
                    .table(GarantiSakHendelse::Table)
                    .col(GarantiSakHendelse::SelskapId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hendelse_prosjekt_id")
                    .table(GarantiSakHendelse::Table)
                    .col(GarantiSakHendelse::ProsjektId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GarantiDokument::Table)
                    .if_not_exists()
                    .col(pk_uuid(GarantiDokument::Id))
                    .col(uuid_null(GarantiDokument::SakId))
                    .col(uuid_null(GarantiDokument::SelskapId))
                    .col(uuid_null(GarantiDokument::ProsjektId))
                    .col(string(GarantiDokument::Filnavn))
                    .col(string_null(GarantiDokument::ContentType))
                    .col(big_integer(GarantiDokument::Storrelse))
                    .col(string_null(GarantiDokument::DokumentType))
                    .col(text_null(GarantiDokument::Beskrivelse))
                    .col(text(GarantiDokument::BlobUrl))
                    .col(string(GarantiDokument::ContainerName))
                    .col(string(GarantiDokument::BlobName))
                    .col(uuid_null(GarantiDokument::LastetOppAv))
                    .col(timestamp_with_time_zone(GarantiDokument::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Exactly one owner column must be set
        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE garanti_dokument ADD CONSTRAINT chk_garanti_dokument_owner CHECK (\
                 (sak_id IS NOT NULL)::int + (selskap_id IS NOT NULL)::int + (prosjekt_id IS NOT NULL)::int = 1)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GarantiDokument::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GarantiSakHendelse::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GarantiSakHendelse {
    Table,
    Id,
    SakId,
    SelskapId,
    ProsjektId,
    HendelseType,
    Beskrivelse,
    UtfortAv,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GarantiDokument {
    Table,
    Id,
    SakId,
    SelskapId,
    ProsjektId,
    Filnavn,
    ContentType,
    Storrelse,
    DokumentType,
    Beskrivelse,
    BlobUrl,
    ContainerName,
    BlobName,
    LastetOppAv,
    CreatedAt,
}
