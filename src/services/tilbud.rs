//! Tilbud CRUD
//!
//! Each mutation and its hendelse commit together; the prosjekt status is
//! recomputed after the commit and never fails the mutation.

use chrono::{Datelike, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::tilbud::{self, TilbudStatus};
use crate::entities::{prelude::*, tilbud_beregning};
use crate::error::{ServiceError, ServiceResult};
use crate::models::beregning::BeregningDto;
use crate::models::common::EntityContext;
use crate::models::tilbud::{CreateTilbudRequest, TilbudDto, UpdateTilbudRequest};
use crate::services::hendelse::{self, typer, Endringer};
use crate::services::{prosjekt, validation};

pub fn tilbudsnummer_for(id: Uuid, year: i32) -> String {
    let hex = id.simple().to_string().to_uppercase();
    format!("T-{}-{}", year, &hex[..8])
}

pub async fn find_required<C: ConnectionTrait>(db: &C, id: Uuid) -> ServiceResult<tilbud::Model> {
    Tilbud::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tilbud", id))
}

/// Increment the change counter after a mutation of the tilbud or its children
pub async fn bump_version<C: ConnectionTrait>(db: &C, tilbud: tilbud::Model) -> ServiceResult<tilbud::Model> {
    let versjon = tilbud.versjonsnummer + 1;
    let mut active: tilbud::ActiveModel = tilbud.into();
    active.versjonsnummer = Set(versjon);
    active.updated_at = Set(Utc::now().fixed_offset());
    Ok(active.update(db).await?)
}

/// Log against the owning prosjekt, prefixed with the tilbud number
pub async fn log_tilbud_hendelse<C: ConnectionTrait>(
    db: &C,
    tilbud: &tilbud::Model,
    hendelse_type: &str,
    tekst: impl std::fmt::Display,
    utfort_av: Option<Uuid>,
) -> ServiceResult<()> {
    hendelse::log_hendelse(
        db,
        EntityContext::Prosjekt(tilbud.prosjekt_id),
        hendelse_type,
        format!("Tilbud {}: {}", tilbud.tilbudsnummer, tekst),
        utfort_av,
    )
    .await
}

fn to_dto((tilbud, beregning): (tilbud::Model, Option<tilbud_beregning::Model>)) -> TilbudDto {
    TilbudDto::from(tilbud).with_beregning(beregning.map(BeregningDto::from))
}

#[derive(Clone)]
pub struct TilbudService {
    db: Arc<DatabaseConnection>,
}

impl TilbudService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<TilbudDto> {
        Tilbud::find_by_id(id)
            .find_also_related(TilbudBeregning)
            .one(self.db.as_ref())
            .await?
            .map(to_dto)
            .ok_or_else(|| ServiceError::not_found("Tilbud", id))
    }

    pub async fn list_for_prosjekt(&self, prosjekt_id: Uuid) -> ServiceResult<Vec<TilbudDto>> {
        let rows = Tilbud::find()
            .filter(tilbud::Column::ProsjektId.eq(prosjekt_id))
            .order_by_asc(tilbud::Column::CreatedAt)
            .find_also_related(TilbudBeregning)
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(to_dto).collect())
    }

    pub async fn create(&self, req: CreateTilbudRequest) -> ServiceResult<TilbudDto> {
        let produkttype = validation::require_text("produkttype", &req.produkttype)?;
        let kommentar = validation::optional_text(req.kommentar.as_deref());
        let prosjekt = prosjekt::find_required(self.db.as_ref(), req.prosjekt_id).await?;

        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;
        let model = tilbud::ActiveModel {
            id: Set(id),
            prosjekt_id: Set(prosjekt.id),
            tilbudsnummer: Set(tilbudsnummer_for(id, now.year())),
            produkttype: Set(produkttype),
            status: Set(req.status.unwrap_or(TilbudStatus::Utkast)),
            versjonsnummer: Set(1),
            kommentar: Set(kommentar),
            opprettet_av: Set(req.utfort_av),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        log_tilbud_hendelse(
            &txn,
            &model,
            typer::TILBUD_OPPRETTET,
            format!("opprettet ({}, status «{}»)", model.produkttype, model.status.label()),
            req.utfort_av,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(tilbud_id = %model.id, prosjekt_id = %model.prosjekt_id, "Tilbud created");
        prosjekt::recompute_status(self.db.as_ref(), model.prosjekt_id, req.utfort_av).await;
        Ok(model.into())
    }

    pub async fn update(&self, req: UpdateTilbudRequest) -> ServiceResult<TilbudDto> {
        let existing = find_required(self.db.as_ref(), req.id).await?;

        let produkttype = match req.produkttype.as_deref() {
            Some(p) => validation::require_text("produkttype", p)?,
            None => existing.produkttype.clone(),
        };
        let kommentar = match req.kommentar.as_deref() {
            Some(k) => validation::optional_text(Some(k)),
            None => existing.kommentar.clone(),
        };
        let status = req.status.unwrap_or(existing.status);

        let mut endringer = Endringer::new();
        endringer.felt("produkttype", &existing.produkttype, &produkttype);
        endringer.felt("status", &existing.status.label(), &status.label());
        endringer.valgfritt("kommentar", &existing.kommentar, &kommentar);

        if endringer.is_empty() {
            return Ok(existing.into());
        }

        let txn = self.db.begin().await?;
        let mut active: tilbud::ActiveModel = existing.clone().into();
        active.produkttype = Set(produkttype);
        active.status = Set(status);
        active.kommentar = Set(kommentar);
        active.versjonsnummer = Set(existing.versjonsnummer + 1);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        log_tilbud_hendelse(
            &txn,
            &updated,
            typer::TILBUD_ENDRET,
            endringer.beskrivelse("oppdatert"),
            req.utfort_av,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(tilbud_id = %updated.id, versjon = updated.versjonsnummer, "Tilbud updated");
        if status != existing.status {
            prosjekt::recompute_status(self.db.as_ref(), updated.prosjekt_id, req.utfort_av).await;
        }
        Ok(updated.into())
    }

    /// Beregning, enheter and benefisienter are removed by cascade
    pub async fn delete(&self, id: Uuid, utfort_av: Option<Uuid>) -> ServiceResult<()> {
        let existing = find_required(self.db.as_ref(), id).await?;

        let txn = self.db.begin().await?;
        Tilbud::delete_by_id(id).exec(&txn).await?;
        log_tilbud_hendelse(&txn, &existing, typer::TILBUD_SLETTET, "slettet", utfort_av).await?;
        txn.commit().await?;

        tracing::info!(tilbud_id = %id, "Tilbud deleted");
        prosjekt::recompute_status(self.db.as_ref(), existing.prosjekt_id, utfort_av).await;
        Ok(())
    }
}
