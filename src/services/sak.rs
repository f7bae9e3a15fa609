//! Garantisaker and the new-guarantee-request flow

use chrono::{Datelike, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{garanti_sak, prelude::*};
use crate::error::{ServiceError, ServiceResult};
use crate::models::common::EntityContext;
use crate::models::prosjekt::CreateProsjektRequest;
use crate::models::sak::{NewGuaranteeRequest, NewGuaranteeResponse, SakDto};
use crate::models::selskap::CreateSelskapRequest;
use crate::services::hendelse::{self, typer};
use crate::services::prosjekt::{self, NyttProsjekt};
use crate::services::selskap::{self, NyttSelskap};
use crate::services::validation;

/// `GS-<year>-<first 8 hex digits of the id>`
pub fn saksnummer_for(id: Uuid, year: i32) -> String {
    let hex = id.simple().to_string().to_uppercase();
    format!("GS-{}-{}", year, &hex[..8])
}

#[derive(Clone)]
pub struct SakService {
    db: Arc<DatabaseConnection>,
}

impl SakService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Registers a guarantee request: reuses the selskap with the same
    /// organisasjonsnummer or creates it, then creates a prosjekt (`Ny`) and
    /// a sak. Everything happens in one transaction.
    pub async fn handle_new_guarantee_request(
        &self,
        req: NewGuaranteeRequest,
    ) -> ServiceResult<NewGuaranteeResponse> {
        let nytt_selskap = NyttSelskap::validate(&CreateSelskapRequest {
            organisasjonsnummer: req.organisasjonsnummer.clone(),
            navn: req.selskapsnavn.clone(),
            gateadresse: req.gateadresse.clone(),
            postnummer: req.postnummer.clone(),
            poststed: req.poststed.clone(),
            telefon: req.telefon.clone(),
            epost: req.epost.clone(),
            kontaktperson: req.kontaktperson.clone(),
            ramme: None,
            utfort_av: req.utfort_av,
        })?;
        let prosjektnavn = validation::require_text("prosjektnavn", &req.prosjektnavn)?;
        let beskrivelse = validation::optional_text(req.beskrivelse.as_deref());
        let kilde = validation::optional_text(req.kilde.as_deref());

        let txn = self.db.begin().await?;

        let (selskap, ny_selskap) = match selskap::find_by_orgnr(&txn, &nytt_selskap.organisasjonsnummer).await? {
            Some(existing) => {
                tracing::debug!(selskap_id = %existing.id, "Reusing existing selskap");
                (existing, false)
            }
            None => (selskap::insert_selskap(&txn, nytt_selskap, req.utfort_av).await?, true),
        };

        let nytt_prosjekt = NyttProsjekt::validate(&CreateProsjektRequest {
            selskap_id: selskap.id,
            navn: prosjektnavn,
            prosjekttype: req.prosjekttype,
            gateadresse: req.gateadresse.clone(),
            postnummer: req.postnummer.clone(),
            poststed: req.poststed.clone(),
            kommentar: None,
            utfort_av: req.utfort_av,
        })?;
        let prosjekt = prosjekt::insert_prosjekt(&txn, nytt_prosjekt, req.utfort_av).await?;

        let sak_id = Uuid::new_v4();
        let sak = garanti_sak::ActiveModel {
            id: Set(sak_id),
            saksnummer: Set(saksnummer_for(sak_id, Utc::now().year())),
            selskap_id: Set(selskap.id),
            prosjekt_id: Set(Some(prosjekt.id)),
            beskrivelse: Set(beskrivelse),
            kilde: Set(kilde),
            opprettet_av: Set(req.utfort_av),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&txn)
        .await?;

        hendelse::log_hendelse(
            &txn,
            EntityContext::Sak(sak.id),
            typer::SAK_OPPRETTET,
            format!(
                "Garantisak {} opprettet for «{}», prosjekt «{}»",
                sak.saksnummer, selskap.navn, prosjekt.navn
            ),
            req.utfort_av,
        )
        .await?;

        txn.commit().await?;

        tracing::info!(
            sak_id = %sak.id,
            saksnummer = %sak.saksnummer,
            selskap_id = %selskap.id,
            ny_selskap,
            "New guarantee request registered"
        );

        Ok(NewGuaranteeResponse {
            selskap_id: selskap.id,
            prosjekt_id: prosjekt.id,
            ny_selskap,
            sak: sak.into(),
        })
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<SakDto> {
        GarantiSak::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(SakDto::from)
            .ok_or_else(|| ServiceError::not_found("Sak", id))
    }

    pub async fn list_for_selskap(&self, selskap_id: Uuid) -> ServiceResult<Vec<SakDto>> {
        let rows = GarantiSak::find()
            .filter(garanti_sak::Column::SelskapId.eq(selskap_id))
            .order_by_desc(garanti_sak::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(SakDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::prosjekt::{ProsjektStatus, Prosjekttype};
    use crate::entities::{prosjekt as prosjekt_entity, selskap as selskap_entity};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    const ORGNR: &str = "987654321";

    fn selskap_model() -> selskap_entity::Model {
        let now = Utc::now().fixed_offset();
        selskap_entity::Model {
            id: Uuid::new_v4(),
            organisasjonsnummer: ORGNR.to_string(),
            navn: "Fjord Bygg AS".to_string(),
            gateadresse: None,
            postnummer: None,
            poststed: None,
            telefon: None,
            epost: None,
            kontaktperson: None,
            ramme: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn prosjekt_model(selskap_id: Uuid) -> prosjekt_entity::Model {
        let now = Utc::now().fixed_offset();
        prosjekt_entity::Model {
            id: Uuid::new_v4(),
            selskap_id,
            navn: "Sjøkanten".to_string(),
            prosjekttype: Some(Prosjekttype::Borettslag),
            status: ProsjektStatus::Ny,
            ansvarlig_radgiver_id: None,
            gateadresse: None,
            postnummer: None,
            poststed: None,
            kommentar: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sak_model(selskap_id: Uuid, prosjekt_id: Uuid) -> garanti_sak::Model {
        let id = Uuid::new_v4();
        garanti_sak::Model {
            id,
            saksnummer: saksnummer_for(id, 2026),
            selskap_id,
            prosjekt_id: Some(prosjekt_id),
            beskrivelse: None,
            kilde: None,
            opprettet_av: None,
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn request() -> NewGuaranteeRequest {
        NewGuaranteeRequest {
            organisasjonsnummer: ORGNR.to_string(),
            selskapsnavn: "Fjord Bygg AS".to_string(),
            prosjektnavn: "Sjøkanten".to_string(),
            prosjekttype: Some(Prosjekttype::Borettslag),
            ..Default::default()
        }
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult { last_insert_id: 0, rows_affected: 1 }
    }

    #[test]
    fn test_saksnummer_format() {
        let id = Uuid::parse_str("a1b2c3d4-0000-0000-0000-000000000000").unwrap();
        assert_eq!(saksnummer_for(id, 2026), "GS-2026-A1B2C3D4");
    }

    #[tokio::test]
    async fn test_existing_selskap_is_reused() {
        let selskap = selskap_model();
        let prosjekt = prosjekt_model(selskap.id);
        let sak = sak_model(selskap.id, prosjekt.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![selskap.clone()]])
            .append_query_results([vec![prosjekt.clone()]])
            .append_query_results([vec![sak.clone()]])
            .append_exec_results([exec_ok(), exec_ok()])
            .into_connection();

        let resp = SakService::new(db).handle_new_guarantee_request(request()).await.unwrap();
        assert_eq!(resp.selskap_id, selskap.id);
        assert!(!resp.ny_selskap);
        assert_eq!(resp.prosjekt_id, prosjekt.id);
        assert_eq!(resp.sak.saksnummer, sak.saksnummer);
    }

    #[tokio::test]
    async fn test_missing_selskap_is_created() {
        let selskap = selskap_model();
        let prosjekt = prosjekt_model(selskap.id);
        let sak = sak_model(selskap.id, prosjekt.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<selskap_entity::Model>::new()])
            .append_query_results([vec![selskap.clone()]])
            .append_query_results([vec![prosjekt.clone()]])
            .append_query_results([vec![sak.clone()]])
            .append_exec_results([exec_ok(), exec_ok(), exec_ok()])
            .into_connection();

        let resp = SakService::new(db).handle_new_guarantee_request(request()).await.unwrap();
        assert!(resp.ny_selskap);
        assert_eq!(resp.selskap_id, selskap.id);
    }

    #[tokio::test]
    async fn test_invalid_orgnr_fails_before_db() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let mut req = request();
        req.organisasjonsnummer = "12345".to_string();

        let err = SakService::new(db).handle_new_guarantee_request(req).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
