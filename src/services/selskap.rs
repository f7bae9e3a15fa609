//! Selskap (customer company) CRUD
//!
//! `organisasjonsnummer` is the natural key and can never change once the
//! selskap exists.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{prelude::*, selskap};
use crate::error::{ServiceError, ServiceResult};
use crate::models::common::EntityContext;
use crate::models::selskap::{
    CreateSelskapRequest, SelskapDto, SelskapListQuery, SelskapListResponse, UpdateSelskapRequest,
};
use crate::services::hendelse::{self, typer, Endringer};
use crate::services::validation;

const DEFAULT_PAGE_SIZE: u64 = 50;

/// Validated fields for a new selskap
#[derive(Debug, Clone)]
pub struct NyttSelskap {
    pub organisasjonsnummer: String,
    pub navn: String,
    pub gateadresse: Option<String>,
    pub postnummer: Option<String>,
    pub poststed: Option<String>,
    pub telefon: Option<String>,
    pub epost: Option<String>,
    pub kontaktperson: Option<String>,
    pub ramme: Option<Decimal>,
}

impl NyttSelskap {
    pub fn validate(req: &CreateSelskapRequest) -> ServiceResult<Self> {
        Ok(Self {
            organisasjonsnummer: validation::validate_orgnr(&req.organisasjonsnummer)?,
            navn: validation::require_text("navn", &req.navn)?,
            gateadresse: validation::optional_text(req.gateadresse.as_deref()),
            postnummer: validation::optional_text(req.postnummer.as_deref())
                .map(|p| validation::validate_postnummer(&p))
                .transpose()?,
            poststed: validation::optional_text(req.poststed.as_deref()),
            telefon: validation::optional_text(req.telefon.as_deref()),
            epost: validation::optional_text(req.epost.as_deref())
                .map(|e| validation::validate_epost(&e))
                .transpose()?,
            kontaktperson: validation::optional_text(req.kontaktperson.as_deref()),
            ramme: validate_ramme(req.ramme)?,
        })
    }
}

fn validate_ramme(ramme: Option<Decimal>) -> ServiceResult<Option<Decimal>> {
    match ramme {
        Some(r) if r < Decimal::ZERO => Err(ServiceError::validation("ramme", "kan ikke være negativ")),
        other => Ok(other),
    }
}

pub async fn find_by_orgnr<C: ConnectionTrait>(db: &C, orgnr: &str) -> ServiceResult<Option<selskap::Model>> {
    Ok(Selskap::find()
        .filter(selskap::Column::Organisasjonsnummer.eq(orgnr))
        .one(db)
        .await?)
}

pub async fn find_required<C: ConnectionTrait>(db: &C, id: Uuid) -> ServiceResult<selskap::Model> {
    Selskap::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Selskap", id))
}

/// Insert and log; runs inside the caller's transaction
pub async fn insert_selskap<C: ConnectionTrait>(
    db: &C,
    nytt: NyttSelskap,
    utfort_av: Option<Uuid>,
) -> ServiceResult<selskap::Model> {
    let now = Utc::now().fixed_offset();
    let model = selskap::ActiveModel {
        id: Set(Uuid::new_v4()),
        organisasjonsnummer: Set(nytt.organisasjonsnummer),
        navn: Set(nytt.navn),
        gateadresse: Set(nytt.gateadresse),
        postnummer: Set(nytt.postnummer),
        poststed: Set(nytt.poststed),
        telefon: Set(nytt.telefon),
        epost: Set(nytt.epost),
        kontaktperson: Set(nytt.kontaktperson),
        ramme: Set(nytt.ramme),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    hendelse::log_hendelse(
        db,
        EntityContext::Selskap(model.id),
        typer::SELSKAP_OPPRETTET,
        format!("Selskap «{}» ({}) opprettet", model.navn, model.organisasjonsnummer),
        utfort_av,
    )
    .await?;

    tracing::info!(selskap_id = %model.id, orgnr = %model.organisasjonsnummer, "Selskap created");
    Ok(model)
}

#[derive(Clone)]
pub struct SelskapService {
    db: Arc<DatabaseConnection>,
}

impl SelskapService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    pub async fn list(&self, query: SelskapListQuery) -> ServiceResult<SelskapListResponse> {
        let mut select = Selskap::find().order_by_asc(selskap::Column::Navn);

        if let Some(sok) = validation::optional_text(query.sok.as_deref()) {
            let pattern = format!("%{}%", sok.to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(selskap::Column::Navn))).like(pattern))
                    .add(selskap::Column::Organisasjonsnummer.contains(&sok)),
            );
        }

        let total = select.clone().count(self.db.as_ref()).await?;
        let rows = select
            .limit(query.limit.unwrap_or(DEFAULT_PAGE_SIZE))
            .offset(query.offset.unwrap_or(0))
            .all(self.db.as_ref())
            .await?;

        Ok(SelskapListResponse {
            selskaper: rows.into_iter().map(SelskapDto::from).collect(),
            total,
        })
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<SelskapDto> {
        Ok(find_required(self.db.as_ref(), id).await?.into())
    }

    pub async fn get_by_orgnr(&self, orgnr: &str) -> ServiceResult<Option<SelskapDto>> {
        let orgnr = validation::validate_orgnr(orgnr)?;
        Ok(find_by_orgnr(self.db.as_ref(), &orgnr).await?.map(SelskapDto::from))
    }

    pub async fn create(&self, req: CreateSelskapRequest) -> ServiceResult<SelskapDto> {
        let nytt = NyttSelskap::validate(&req)?;

        if let Some(existing) = find_by_orgnr(self.db.as_ref(), &nytt.organisasjonsnummer).await? {
            return Err(ServiceError::validation(
                "organisasjonsnummer",
                format!("er allerede registrert på «{}»", existing.navn),
            ));
        }

        let txn = self.db.begin().await?;
        let model = insert_selskap(&txn, nytt, req.utfort_av).await?;
        txn.commit().await?;

        Ok(model.into())
    }

    pub async fn update(&self, req: UpdateSelskapRequest) -> ServiceResult<SelskapDto> {
        let existing = find_required(self.db.as_ref(), req.id).await?;

        if let Some(orgnr) = req.organisasjonsnummer.as_deref() {
            let unchanged = validation::validate_orgnr(orgnr)
                .map(|o| o == existing.organisasjonsnummer)
                .unwrap_or(false);
            if !unchanged {
                return Err(ServiceError::validation("organisasjonsnummer", "kan ikke endres"));
            }
        }

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
        let epost = match req.epost.as_deref() {
            Some(e) => validation::optional_text(Some(e))
                .map(|e| validation::validate_epost(&e))
                .transpose()?,
            None => existing.epost.clone(),
        };
        let keep = |new: &Option<String>, old: &Option<String>| match new {
            Some(v) => validation::optional_text(Some(v.as_str())),
            None => old.clone(),
        };
        let gateadresse = keep(&req.gateadresse, &existing.gateadresse);
        let poststed = keep(&req.poststed, &existing.poststed);
        let telefon = keep(&req.telefon, &existing.telefon);
        let kontaktperson = keep(&req.kontaktperson, &existing.kontaktperson);
        let ramme = match req.ramme {
            Some(_) => validate_ramme(req.ramme)?,
            None => existing.ramme,
        };

        let mut endringer = Endringer::new();
        endringer.felt("navn", &existing.navn, &navn);
        endringer.valgfritt("gateadresse", &existing.gateadresse, &gateadresse);
        endringer.valgfritt("postnummer", &existing.postnummer, &postnummer);
        endringer.valgfritt("poststed", &existing.poststed, &poststed);
        endringer.valgfritt("telefon", &existing.telefon, &telefon);
        endringer.valgfritt("epost", &existing.epost, &epost);
        endringer.valgfritt("kontaktperson", &existing.kontaktperson, &kontaktperson);
        endringer.valgfritt("ramme", &existing.ramme, &ramme);

        if endringer.is_empty() {
            return Ok(existing.into());
        }

        let txn = self.db.begin().await?;
        let mut active: selskap::ActiveModel = existing.into();
        active.navn = Set(navn);
        active.gateadresse = Set(gateadresse);
        active.postnummer = Set(postnummer);
        active.poststed = Set(poststed);
        active.telefon = Set(telefon);
        active.epost = Set(epost);
        active.kontaktperson = Set(kontaktperson);
        active.ramme = Set(ramme);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        hendelse::log_hendelse(
            &txn,
            EntityContext::Selskap(updated.id),
            typer::SELSKAP_ENDRET,
            endringer.beskrivelse("Selskap oppdatert"),
            req.utfort_av,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(selskap_id = %updated.id, "Selskap updated");
        Ok(updated.into())
    }

    /// Prosjekter, tilbud and saker under the selskap are removed by cascade.
    /// Dokumenter have no foreign key and stay, with their blobs, next to the
    /// hendelse log; remove them first through `DokumentService::delete`.
    pub async fn delete(&self, id: Uuid, utfort_av: Option<Uuid>) -> ServiceResult<()> {
        let existing = find_required(self.db.as_ref(), id).await?;

        let txn = self.db.begin().await?;
        Selskap::delete_by_id(id).exec(&txn).await?;
        hendelse::log_hendelse(
            &txn,
            EntityContext::Selskap(id),
            typer::SELSKAP_SLETTET,
            format!("Selskap «{}» ({}) slettet", existing.navn, existing.organisasjonsnummer),
            utfort_av,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(selskap_id = %id, "Selskap deleted");
        Ok(())
    }
}
