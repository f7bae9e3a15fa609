//! Prosjekt CRUD, adviser assignment and status recompute

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::prosjekt::{self, ProsjektStatus, Prosjekttype};
use crate::entities::{prelude::*, tilbud};
use crate::error::{ServiceError, ServiceResult};
use crate::models::common::EntityContext;
use crate::models::prosjekt::{
    AssignRadgiverRequest, CreateProsjektRequest, ProsjektDto, UpdateProsjektRequest,
};
use crate::services::hendelse::{self, typer, Endringer};
use crate::services::status_derivation::{derive_prosjekt_status, FALLBACK_STATUS};
use crate::services::{bruker, selskap, validation};

#[derive(Debug, Clone)]
pub struct NyttProsjekt {
    pub selskap_id: Uuid,
    pub navn: String,
    pub prosjekttype: Option<Prosjekttype>,
    pub gateadresse: Option<String>,
    pub postnummer: Option<String>,
    pub poststed: Option<String>,
    pub kommentar: Option<String>,
}

impl NyttProsjekt {
    pub fn validate(req: &CreateProsjektRequest) -> ServiceResult<Self> {
        Ok(Self {
            selskap_id: req.selskap_id,
            navn: validation::require_text("navn", &req.navn)?,
            prosjekttype: req.prosjekttype,
            gateadresse: validation::optional_text(req.gateadresse.as_deref()),
            postnummer: validation::optional_text(req.postnummer.as_deref())
                .map(|p| validation::validate_postnummer(&p))
                .transpose()?,
            poststed: validation::optional_text(req.poststed.as_deref()),
            kommentar: validation::optional_text(req.kommentar.as_deref()),
        })
    }
}

pub async fn find_required<C: ConnectionTrait>(db: &C, id: Uuid) -> ServiceResult<prosjekt::Model> {
    Prosjekt::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Prosjekt", id))
}

/// New prosjekter always start as `Ny`
pub async fn insert_prosjekt<C: ConnectionTrait>(
    db: &C,
    nytt: NyttProsjekt,
    utfort_av: Option<Uuid>,
) -> ServiceResult<prosjekt::Model> {
    let now = Utc::now().fixed_offset();
    let model = prosjekt::ActiveModel {
        id: Set(Uuid::new_v4()),
        selskap_id: Set(nytt.selskap_id),
        navn: Set(nytt.navn),
        prosjekttype: Set(nytt.prosjekttype),
        status: Set(ProsjektStatus::Ny),
        ansvarlig_radgiver_id: Set(None),
        gateadresse: Set(nytt.gateadresse),
        postnummer: Set(nytt.postnummer),
        poststed: Set(nytt.poststed),
        kommentar: Set(nytt.kommentar),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    hendelse::log_hendelse(
        db,
        EntityContext::Prosjekt(model.id),
        typer::PROSJEKT_OPPRETTET,
        format!("Prosjekt «{}» opprettet", model.navn),
        utfort_av,
    )
    .await?;

    tracing::info!(prosjekt_id = %model.id, selskap_id = %model.selskap_id, "Prosjekt created");
    Ok(model)
}

async fn set_status<C: ConnectionTrait>(
    db: &C,
    prosjekt: prosjekt::Model,
    status: ProsjektStatus,
    utfort_av: Option<Uuid>,
) -> ServiceResult<()> {
    let fra = prosjekt.status;
    let id = prosjekt.id;
    let mut active: prosjekt::ActiveModel = prosjekt.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().fixed_offset());
    active.update(db).await?;

    hendelse::log_hendelse(
        db,
        EntityContext::Prosjekt(id),
        typer::STATUS_ENDRET,
        format!("Status endret fra «{}» til «{}»", fra.label(), status.label()),
        utfort_av,
    )
    .await
}

async fn try_recompute(
    db: &DatabaseConnection,
    prosjekt_id: Uuid,
    utfort_av: Option<Uuid>,
) -> ServiceResult<ProsjektStatus> {
    let prosjekt = find_required(db, prosjekt_id).await?;
    let statuses: Vec<_> = Tilbud::find()
        .filter(tilbud::Column::ProsjektId.eq(prosjekt_id))
        .all(db)
        .await?
        .into_iter()
        .map(|t| t.status)
        .collect();

    let mut derived = derive_prosjekt_status(&statuses);
    if derived == ProsjektStatus::Ny && prosjekt.ansvarlig_radgiver_id.is_some() {
        derived = ProsjektStatus::Tildelt;
    }

    if derived != prosjekt.status {
        let txn = db.begin().await?;
        set_status(&txn, prosjekt, derived, utfort_av).await?;
        txn.commit().await?;
        tracing::info!(%prosjekt_id, status = ?derived, "Prosjekt status recomputed");
    }
    Ok(derived)
}

/// Re-derive the project status from its tilbud. Never fails: on error the
/// fallback status is applied and the error logged.
pub async fn recompute_status(
    db: &DatabaseConnection,
    prosjekt_id: Uuid,
    utfort_av: Option<Uuid>,
) -> ProsjektStatus {
    match try_recompute(db, prosjekt_id, utfort_av).await {
        Ok(status) => status,
        Err(err) => {
            tracing::warn!(%prosjekt_id, error = %err, "Status derivation failed, applying fallback");
            let fallback = async {
                let prosjekt = find_required(db, prosjekt_id).await?;
                if prosjekt.status != FALLBACK_STATUS {
                    set_status(db, prosjekt, FALLBACK_STATUS, utfort_av).await?;
                }
                Ok::<_, ServiceError>(())
            };
            if let Err(err) = fallback.await {
                tracing::warn!(%prosjekt_id, error = %err, "Could not apply fallback status");
            }
            FALLBACK_STATUS
        }
    }
}

#[derive(Clone)]
pub struct ProsjektService {
    db: Arc<DatabaseConnection>,
}

impl ProsjektService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<ProsjektDto> {
        Ok(find_required(self.db.as_ref(), id).await?.into())
    }

    pub async fn list_for_selskap(&self, selskap_id: Uuid) -> ServiceResult<Vec<ProsjektDto>> {
        let rows = Prosjekt::find()
            .filter(prosjekt::Column::SelskapId.eq(selskap_id))
            .order_by_desc(prosjekt::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(ProsjektDto::from).collect())
    }

    pub async fn create(&self, req: CreateProsjektRequest) -> ServiceResult<ProsjektDto> {
        let nytt = NyttProsjekt::validate(&req)?;
        selskap::find_required(self.db.as_ref(), nytt.selskap_id).await?;

        let txn = self.db.begin().await?;
        let model = insert_prosjekt(&txn, nytt, req.utfort_av).await?;
        txn.commit().await?;
        Ok(model.into())
    }

    pub async fn update(&self, req: UpdateProsjektRequest) -> ServiceResult<ProsjektDto> {
        let existing = find_required(self.db.as_ref(), req.id).await?;

        let navn = match req.navn.as_deref() {
            Some(n) => validation::require_text("navn", n)?,
            None => existing.navn.clone(),
        };
        let postnummer = match req.postnummer.as_deref() {
            Some(p) => validation::optional_text(Some(p))
                .map(|p| validation::validate_postnummer(&p))
                .transpose()?,
            None => existing.postnummer.clone(),
        };
        let keep = |new: &Option<String>, old: &Option<String>| match new {
            Some(v) => validation::optional_text(Some(v.as_str())),
            None => old.clone(),
        };
        let gateadresse = keep(&req.gateadresse, &existing.gateadresse);
        let poststed = keep(&req.poststed, &existing.poststed);
        let kommentar = keep(&req.kommentar, &existing.kommentar);
        let prosjekttype = req.prosjekttype.or(existing.prosjekttype);

        let mut endringer = Endringer::new();
        endringer.felt("navn", &existing.navn, &navn);
        endringer.valgfritt(
            "prosjekttype",
            &existing.prosjekttype.map(|t| format!("{:?}", t)),
            &prosjekttype.map(|t| format!("{:?}", t)),
        );
        endringer.valgfritt("gateadresse", &existing.gateadresse, &gateadresse);
        endringer.valgfritt("postnummer", &existing.postnummer, &postnummer);
        endringer.valgfritt("poststed", &existing.poststed, &poststed);
        endringer.valgfritt("kommentar", &existing.kommentar, &kommentar);

        if endringer.is_empty() {
            return Ok(existing.into());
        }

        let txn = self.db.begin().await?;
        let mut active: prosjekt::ActiveModel = existing.into();
        active.navn = Set(navn);
        active.prosjekttype = Set(prosjekttype);
        active.gateadresse = Set(gateadresse);
        active.postnummer = Set(postnummer);
        active.poststed = Set(poststed);
        active.kommentar = Set(kommentar);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        hendelse::log_hendelse(
            &txn,
            EntityContext::Prosjekt(updated.id),
            typer::PROSJEKT_ENDRET,
            endringer.beskrivelse("Prosjekt oppdatert"),
            req.utfort_av,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(prosjekt_id = %updated.id, "Prosjekt updated");
        Ok(updated.into())
    }

    /// Assigning an adviser moves a `Ny` prosjekt to `Tildelt`
    pub async fn assign_radgiver(&self, req: AssignRadgiverRequest) -> ServiceResult<ProsjektDto> {
        let existing = find_required(self.db.as_ref(), req.prosjekt_id).await?;
        let radgiver = bruker::find_assignable_radgiver(self.db.as_ref(), req.radgiver_id).await?;

        let mut beskrivelse = format!("Rådgiver «{}» tildelt", radgiver.navn);
        let txn = self.db.begin().await?;
        let fra = existing.status;
        let mut active: prosjekt::ActiveModel = existing.into();
        active.ansvarlig_radgiver_id = Set(Some(radgiver.id));
        if fra == ProsjektStatus::Ny {
            active.status = Set(ProsjektStatus::Tildelt);
            beskrivelse.push_str(&format!(
                ", status endret fra «{}» til «{}»",
                fra.label(),
                ProsjektStatus::Tildelt.label()
            ));
        }
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        hendelse::log_hendelse(
            &txn,
            EntityContext::Prosjekt(updated.id),
            typer::RADGIVER_TILDELT,
            beskrivelse,
            req.utfort_av,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(prosjekt_id = %updated.id, radgiver_id = %radgiver.id, "Radgiver assigned");
        Ok(updated.into())
    }

    pub async fn delete(&self, id: Uuid, utfort_av: Option<Uuid>) -> ServiceResult<()> {
        let existing = find_required(self.db.as_ref(), id).await?;

        let txn = self.db.begin().await?;
        Prosjekt::delete_by_id(id).exec(&txn).await?;
        hendelse::log_hendelse(
            &txn,
            EntityContext::Selskap(existing.selskap_id),
            typer::PROSJEKT_SLETTET,
            format!("Prosjekt «{}» slettet", existing.navn),
            utfort_av,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(prosjekt_id = %id, "Prosjekt deleted");
        Ok(())
    }
}
