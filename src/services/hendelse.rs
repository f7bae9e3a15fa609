//! Audit trail (hendelser) for saker, selskaper and prosjekter
//!
//! Hendelser have no foreign keys so the trail survives deletion of the owner.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::fmt::Display;
use uuid::Uuid;

use crate::entities::{garanti_sak_hendelse, prelude::*};
use crate::error::ServiceResult;
use crate::models::common::EntityContext;
use crate::models::hendelse::HendelseDto;

/// Hendelse type names
pub mod typer {
    pub const SAK_OPPRETTET: &str = "SakOpprettet";
    pub const SELSKAP_OPPRETTET: &str = "SelskapOpprettet";
    pub const SELSKAP_ENDRET: &str = "SelskapEndret";
    pub const SELSKAP_SLETTET: &str = "SelskapSlettet";
    pub const PROSJEKT_OPPRETTET: &str = "ProsjektOpprettet";
    pub const PROSJEKT_ENDRET: &str = "ProsjektEndret";
    pub const PROSJEKT_SLETTET: &str = "ProsjektSlettet";
    pub const RADGIVER_TILDELT: &str = "RadgiverTildelt";
    pub const STATUS_ENDRET: &str = "StatusEndret";
    pub const TILBUD_OPPRETTET: &str = "TilbudOpprettet";
    pub const TILBUD_ENDRET: &str = "TilbudEndret";
    pub const TILBUD_SLETTET: &str = "TilbudSlettet";
    pub const BEREGNING_LAGRET: &str = "BeregningLagret";
    pub const BENEFISIENT_ENDRET: &str = "BenefisientEndret";
    pub const ENHET_ENDRET: &str = "EnhetEndret";
    pub const DOKUMENT_LASTET_OPP: &str = "DokumentLastetOpp";
    pub const DOKUMENT_SLETTET: &str = "DokumentSlettet";
}

const DEFAULT_LIMIT: u64 = 200;

pub async fn log_hendelse<C: ConnectionTrait>(
    db: &C,
    context: EntityContext,
    hendelse_type: &str,
    beskrivelse: impl Into<String>,
    utfort_av: Option<Uuid>,
) -> ServiceResult<()> {
    let (sak_id, selskap_id, prosjekt_id) = context.foreign_keys();
    let beskrivelse = beskrivelse.into();

    let hendelse = garanti_sak_hendelse::ActiveModel {
        id: Set(Uuid::new_v4()),
        sak_id: Set(sak_id),
        selskap_id: Set(selskap_id),
        prosjekt_id: Set(prosjekt_id),
        hendelse_type: Set(hendelse_type.to_string()),
        beskrivelse: Set(beskrivelse.clone()),
        utfort_av: Set(utfort_av),
        created_at: Set(Utc::now().fixed_offset()),
    };

    GarantiSakHendelse::insert(hendelse).exec_without_returning(db).await?;
    tracing::debug!(?context, hendelse_type, beskrivelse = %beskrivelse, "Hendelse logged");
    Ok(())
}

/// Newest first
pub async fn list_hendelser<C: ConnectionTrait>(
    db: &C,
    context: EntityContext,
    limit: Option<u64>,
) -> ServiceResult<Vec<HendelseDto>> {
    let column = match context {
        EntityContext::Sak(_) => garanti_sak_hendelse::Column::SakId,
        EntityContext::Selskap(_) => garanti_sak_hendelse::Column::SelskapId,
        EntityContext::Prosjekt(_) => garanti_sak_hendelse::Column::ProsjektId,
    };

    let rows = GarantiSakHendelse::find()
        .filter(column.eq(context.id()))
        .order_by_desc(garanti_sak_hendelse::Column::CreatedAt)
        .limit(limit.unwrap_or(DEFAULT_LIMIT))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(HendelseDto::from).collect())
}

/// Collects field changes into a Norwegian description
#[derive(Debug, Default)]
pub struct Endringer {
    linjer: Vec<String>,
}

impl Endringer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the change only if the values differ
    pub fn felt<T: PartialEq + Display>(&mut self, navn: &str, fra: &T, til: &T) {
        if fra != til {
            self.linjer.push(format!("{} endret fra «{}» til «{}»", navn, fra, til));
        }
    }

    pub fn valgfritt<T: PartialEq + Display>(&mut self, navn: &str, fra: &Option<T>, til: &Option<T>) {
        if fra == til {
            return;
        }
        let vis = |v: &Option<T>| v.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "(tom)".to_string());
        self.linjer.push(format!("{} endret fra «{}» til «{}»", navn, vis(fra), vis(til)));
    }

    pub fn is_empty(&self) -> bool {
        self.linjer.is_empty()
    }

    pub fn beskrivelse(&self, prefix: &str) -> String {
        format!("{}: {}", prefix, self.linjer.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[test]
    fn test_endringer_only_records_differences() {
        let mut e = Endringer::new();
        e.felt("navn", &"Fjord Bygg AS".to_string(), &"Fjord Bygg AS".to_string());
        assert!(e.is_empty());

        e.felt("navn", &"Fjord Bygg".to_string(), &"Fjord Bygg AS".to_string());
        e.valgfritt("poststed", &None::<String>, &Some("Bergen".to_string()));
        assert_eq!(
            e.beskrivelse("Selskap oppdatert"),
            "Selskap oppdatert: navn endret fra «Fjord Bygg» til «Fjord Bygg AS»; poststed endret fra «(tom)» til «Bergen»"
        );
    }

    #[tokio::test]
    async fn test_log_hendelse_writes_one_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();

        let prosjekt_id = Uuid::new_v4();
        log_hendelse(&db, EntityContext::Prosjekt(prosjekt_id), typer::PROSJEKT_OPPRETTET, "Prosjekt opprettet", None)
            .await
            .unwrap();

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("garanti_sak_hendelse"));
    }
}
