//! Benefisienter on a tilbud, optionally tied to one enhet
//!
//! Every mutation that can raise the active total re-checks the scope sum.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::tilbud_benefisient::{self, BenefisientType};
use crate::entities::{prelude::*, tilbud_enhet};
use crate::error::{ServiceError, ServiceResult};
use crate::models::benefisient::{
    BenefisientDto, BenefisientListQuery, CreateBenefisientRequest, UpdateBenefisientRequest,
};
use crate::services::hendelse::typer;
use crate::services::share_validation::{validate_andel_range, validate_scope_total};
use crate::services::{tilbud, validation};

/// Active shares in the scope (tilbud + enhet, or tilbud without enhet)
pub async fn other_active_andeler<C: ConnectionTrait>(
    db: &C,
    tilbud_id: Uuid,
    enhet_id: Option<Uuid>,
    exclude: Option<Uuid>,
) -> ServiceResult<Vec<Decimal>> {
    let mut select = TilbudBenefisient::find()
        .filter(tilbud_benefisient::Column::TilbudId.eq(tilbud_id))
        .filter(tilbud_benefisient::Column::Aktiv.eq(true));
    select = match enhet_id {
        Some(enhet_id) => select.filter(tilbud_benefisient::Column::EnhetId.eq(enhet_id)),
        None => select.filter(tilbud_benefisient::Column::EnhetId.is_null()),
    };
    if let Some(exclude) = exclude {
        select = select.filter(tilbud_benefisient::Column::Id.ne(exclude));
    }
    Ok(select.all(db).await?.into_iter().map(|b| b.andel).collect())
}

/// Juridisk needs an organisasjonsnummer, Fysisk a personident
fn validate_identity(
    benefisient_type: BenefisientType,
    organisasjonsnummer: Option<&str>,
    personident: Option<&str>,
) -> ServiceResult<(Option<String>, Option<String>)> {
    match benefisient_type {
        BenefisientType::Juridisk => {
            let orgnr = validation::optional_text(organisasjonsnummer)
                .ok_or_else(|| ServiceError::validation("organisasjonsnummer", "er påkrevd for juridisk person"))?;
            Ok((Some(validation::validate_orgnr(&orgnr)?), None))
        }
        BenefisientType::Fysisk => {
            let ident = validation::optional_text(personident)
                .ok_or_else(|| ServiceError::validation("personident", "er påkrevd for fysisk person"))?;
            Ok((None, Some(validation::validate_personident(&ident)?)))
        }
    }
}

async fn find_required<C: ConnectionTrait>(db: &C, id: Uuid) -> ServiceResult<tilbud_benefisient::Model> {
    TilbudBenefisient::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Benefisient", id))
}

#[derive(Clone)]
pub struct BenefisientService {
    db: Arc<DatabaseConnection>,
}

impl BenefisientService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    pub async fn list(&self, query: BenefisientListQuery) -> ServiceResult<Vec<BenefisientDto>> {
        let mut select = TilbudBenefisient::find()
            .filter(tilbud_benefisient::Column::TilbudId.eq(query.tilbud_id))
            .order_by_asc(tilbud_benefisient::Column::AktivFra);
        if !query.inkluder_inaktive {
            select = select.filter(tilbud_benefisient::Column::Aktiv.eq(true));
        }
        let rows = select.all(self.db.as_ref()).await?;
        Ok(rows.into_iter().map(BenefisientDto::from).collect())
    }

    pub async fn create(&self, req: CreateBenefisientRequest) -> ServiceResult<BenefisientDto> {
        let navn = validation::require_text("navn", &req.navn)?;
        let (organisasjonsnummer, personident) = validate_identity(
            req.benefisient_type,
            req.organisasjonsnummer.as_deref(),
            req.personident.as_deref(),
        )?;
        validate_andel_range(req.andel)?;

        let tilbud = tilbud::find_required(self.db.as_ref(), req.tilbud_id).await?;
        if let Some(enhet_id) = req.enhet_id {
            let enhet = TilbudEnhet::find_by_id(enhet_id)
                .one(self.db.as_ref())
                .await?
                .ok_or_else(|| ServiceError::not_found("Enhet", enhet_id))?;
            if enhet.tilbud_id != tilbud.id {
                return Err(ServiceError::validation("enhetId", "tilhører et annet tilbud"));
            }
        }

        let others = other_active_andeler(self.db.as_ref(), tilbud.id, req.enhet_id, None).await?;
        validate_scope_total(req.andel, &others)?;

        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;
        let model = tilbud_benefisient::ActiveModel {
            id: Set(Uuid::new_v4()),
            tilbud_id: Set(tilbud.id),
            enhet_id: Set(req.enhet_id),
            benefisient_type: Set(req.benefisient_type),
            navn: Set(navn),
            organisasjonsnummer: Set(organisasjonsnummer),
            personident: Set(personident),
            andel: Set(req.andel),
            aktiv: Set(true),
            aktiv_fra: Set(now),
            aktiv_til: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let tilbud = tilbud::bump_version(&txn, tilbud).await?;
        tilbud::log_tilbud_hendelse(
            &txn,
            &tilbud,
            typer::BENEFISIENT_ENDRET,
            format!("benefisient «{}» lagt til med andel {} %", model.navn, model.andel.normalize()),
            req.utfort_av,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(benefisient_id = %model.id, tilbud_id = %model.tilbud_id, "Benefisient created");
        Ok(model.into())
    }

    pub async fn update(&self, req: UpdateBenefisientRequest) -> ServiceResult<BenefisientDto> {
        let existing = find_required(self.db.as_ref(), req.id).await?;

        let navn = match req.navn.as_deref() {
            Some(n) => validation::require_text("navn", n)?,
            None => existing.navn.clone(),
        };
        let (organisasjonsnummer, personident) = validate_identity(
            existing.benefisient_type,
            req.organisasjonsnummer.as_deref().or(existing.organisasjonsnummer.as_deref()),
            req.personident.as_deref().or(existing.personident.as_deref()),
        )?;
        let andel = req.andel.unwrap_or(existing.andel);
        validate_andel_range(andel)?;

        if existing.aktiv && andel > existing.andel {
            let others =
                other_active_andeler(self.db.as_ref(), existing.tilbud_id, existing.enhet_id, Some(existing.id)).await?;
            validate_scope_total(andel, &others)?;
        }

        let tilbud = tilbud::find_required(self.db.as_ref(), existing.tilbud_id).await?;
        let beskrivelse = if andel != existing.andel {
            format!(
                "benefisient «{}» endret, andel fra {} % til {} %",
                navn,
                existing.andel.normalize(),
                andel.normalize()
            )
        } else {
            format!("benefisient «{}» endret", navn)
        };

        let txn = self.db.begin().await?;
        let mut active: tilbud_benefisient::ActiveModel = existing.into();
        active.navn = Set(navn);
        active.organisasjonsnummer = Set(organisasjonsnummer);
        active.personident = Set(personident);
        active.andel = Set(andel);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        let tilbud = tilbud::bump_version(&txn, tilbud).await?;
        tilbud::log_tilbud_hendelse(&txn, &tilbud, typer::BENEFISIENT_ENDRET, beskrivelse, req.utfort_av).await?;
        txn.commit().await?;

        Ok(updated.into())
    }

    /// Sets `aktiv = false` and stamps `aktiv_til`
    pub async fn deactivate(&self, id: Uuid, utfort_av: Option<Uuid>) -> ServiceResult<BenefisientDto> {
        let existing = find_required(self.db.as_ref(), id).await?;
        if !existing.aktiv {
            return Ok(existing.into());
        }
        let tilbud = tilbud::find_required(self.db.as_ref(), existing.tilbud_id).await?;

        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;
        let mut active: tilbud_benefisient::ActiveModel = existing.into();
        active.aktiv = Set(false);
        active.aktiv_til = Set(Some(now));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        let tilbud = tilbud::bump_version(&txn, tilbud).await?;
        tilbud::log_tilbud_hendelse(
            &txn,
            &tilbud,
            typer::BENEFISIENT_ENDRET,
            format!("benefisient «{}» deaktivert", updated.navn),
            utfort_av,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(benefisient_id = %id, "Benefisient deactivated");
        Ok(updated.into())
    }

    /// Re-validates the scope before clearing `aktiv_til`
    pub async fn reactivate(&self, id: Uuid, utfort_av: Option<Uuid>) -> ServiceResult<BenefisientDto> {
        let existing = find_required(self.db.as_ref(), id).await?;
        if existing.aktiv {
            return Ok(existing.into());
        }

        let others =
            other_active_andeler(self.db.as_ref(), existing.tilbud_id, existing.enhet_id, Some(existing.id)).await?;
        validate_scope_total(existing.andel, &others)?;
        let tilbud = tilbud::find_required(self.db.as_ref(), existing.tilbud_id).await?;

        let txn = self.db.begin().await?;
        let mut active: tilbud_benefisient::ActiveModel = existing.into();
        active.aktiv = Set(true);
        active.aktiv_til = Set(None);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        let tilbud = tilbud::bump_version(&txn, tilbud).await?;
        tilbud::log_tilbud_hendelse(
            &txn,
            &tilbud,
            typer::BENEFISIENT_ENDRET,
            format!("benefisient «{}» reaktivert", updated.navn),
            utfort_av,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(benefisient_id = %id, "Benefisient reactivated");
        Ok(updated.into())
    }

    pub async fn delete(&self, id: Uuid, utfort_av: Option<Uuid>) -> ServiceResult<()> {
        let existing = find_required(self.db.as_ref(), id).await?;
        let tilbud = tilbud::find_required(self.db.as_ref(), existing.tilbud_id).await?;

        let txn = self.db.begin().await?;
        TilbudBenefisient::delete_by_id(id).exec(&txn).await?;
        let tilbud = tilbud::bump_version(&txn, tilbud).await?;
        tilbud::log_tilbud_hendelse(
            &txn,
            &tilbud,
            typer::BENEFISIENT_ENDRET,
            format!("benefisient «{}» slettet", existing.navn),
            utfort_av,
        )
        .await?;
        txn.commit().await?;
        Ok(())
    }
}

/// Active benefisienter pointing at the given enheter
pub async fn count_active_on_enheter<C: ConnectionTrait>(db: &C, enhet_ids: &[Uuid]) -> ServiceResult<usize> {
    if enhet_ids.is_empty() {
        return Ok(0);
    }
    let rows = TilbudBenefisient::find()
        .filter(tilbud_benefisient::Column::EnhetId.is_in(enhet_ids.iter().copied()))
        .filter(tilbud_benefisient::Column::Aktiv.eq(true))
        .all(db)
        .await?;
    Ok(rows.len())
}

/// Enheter belonging to the tilbud, for scope lookups
pub async fn enhet_ids_for_tilbud<C: ConnectionTrait>(db: &C, tilbud_id: Uuid) -> ServiceResult<Vec<Uuid>> {
    Ok(TilbudEnhet::find()
        .filter(tilbud_enhet::Column::TilbudId.eq(tilbud_id))
        .all(db)
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect())
}
