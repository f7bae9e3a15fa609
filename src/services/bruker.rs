//! Application users and roles

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::bruker::{self, Rolle};
use crate::entities::prelude::*;
use crate::error::{ServiceError, ServiceResult};
use crate::models::bruker::{BrukerDto, BrukerListQuery, CreateBrukerRequest, UpdateRolleRequest};
use crate::services::validation;

/// Roles that can be responsible adviser on a prosjekt
pub fn kan_vaere_radgiver(rolle: Rolle) -> bool {
    matches!(rolle, Rolle::Radgiver | Rolle::Admin)
}

pub async fn find_required<C: ConnectionTrait>(db: &C, id: Uuid) -> ServiceResult<bruker::Model> {
    Bruker::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Bruker", id))
}

/// The user must exist, be active and hold an adviser-capable role
pub async fn find_assignable_radgiver<C: ConnectionTrait>(db: &C, id: Uuid) -> ServiceResult<bruker::Model> {
    let bruker = find_required(db, id).await?;
    if !bruker.aktiv {
        return Err(ServiceError::BusinessRule(format!("Bruker «{}» er deaktivert", bruker.navn)));
    }
    if !kan_vaere_radgiver(bruker.rolle) {
        return Err(ServiceError::BusinessRule(format!(
            "Bruker «{}» har ikke rådgiverrolle",
            bruker.navn
        )));
    }
    Ok(bruker)
}

#[derive(Clone)]
pub struct BrukerService {
    db: Arc<DatabaseConnection>,
}

impl BrukerService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    pub async fn list(&self, query: BrukerListQuery) -> ServiceResult<Vec<BrukerDto>> {
        let mut select = Bruker::find().order_by_asc(bruker::Column::Navn);
        if !query.inkluder_inaktive {
            select = select.filter(bruker::Column::Aktiv.eq(true));
        }
        let rows = select.all(self.db.as_ref()).await?;
        Ok(rows.into_iter().map(BrukerDto::from).collect())
    }

    pub async fn create(&self, req: CreateBrukerRequest) -> ServiceResult<BrukerDto> {
        let epost = validation::validate_epost(&req.epost)?;
        let navn = validation::require_text("navn", &req.navn)?;

        let existing = Bruker::find()
            .filter(bruker::Column::Epost.eq(&epost))
            .one(self.db.as_ref())
            .await?;
        if existing.is_some() {
            return Err(ServiceError::validation("epost", "er allerede i bruk"));
        }

        let now = Utc::now().fixed_offset();
        let model = bruker::ActiveModel {
            id: Set(Uuid::new_v4()),
            epost: Set(epost),
            navn: Set(navn),
            rolle: Set(req.rolle),
            aktiv: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await?;

        tracing::info!(bruker_id = %model.id, rolle = ?model.rolle, "Bruker created");
        Ok(model.into())
    }

    pub async fn update_rolle(&self, req: UpdateRolleRequest) -> ServiceResult<BrukerDto> {
        let existing = find_required(self.db.as_ref(), req.id).await?;
        if existing.rolle == req.rolle {
            return Ok(existing.into());
        }

        let fra = existing.rolle;
        let mut active: bruker::ActiveModel = existing.into();
        active.rolle = Set(req.rolle);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(self.db.as_ref()).await?;

        tracing::info!(bruker_id = %updated.id, fra = ?fra, til = ?updated.rolle, "Bruker role changed");
        Ok(updated.into())
    }

    /// Users are never deleted; prosjekter keep pointing at them
    pub async fn deactivate(&self, id: Uuid) -> ServiceResult<BrukerDto> {
        let existing = find_required(self.db.as_ref(), id).await?;
        if !existing.aktiv {
            return Ok(existing.into());
        }

        let mut active: bruker::ActiveModel = existing.into();
        active.aktiv = Set(false);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(self.db.as_ref()).await?;

        tracing::info!(bruker_id = %updated.id, "Bruker deactivated");
        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn bruker(rolle: Rolle, aktiv: bool) -> bruker::Model {
        let now = Utc::now().fixed_offset();
        bruker::Model {
            id: Uuid::new_v4(),
            epost: "kari@megler.no".to_string(),
            navn: "Kari Nordmann".to_string(),
            rolle,
            aktiv,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_adviser_roles() {
        assert!(kan_vaere_radgiver(Rolle::Radgiver));
        assert!(kan_vaere_radgiver(Rolle::Admin));
        assert!(!kan_vaere_radgiver(Rolle::Underwriter));
        assert!(!kan_vaere_radgiver(Rolle::Leser));
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_be_assigned() {
        let b = bruker(Rolle::Radgiver, false);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![b.clone()]])
            .into_connection();
        let err = find_assignable_radgiver(&db, b.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn test_reader_cannot_be_assigned() {
        let b = bruker(Rolle::Leser, true);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![b.clone()]])
            .into_connection();
        assert!(find_assignable_radgiver(&db, b.id).await.is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_taken_epost() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bruker(Rolle::Radgiver, true)]])
            .into_connection();
        let err = BrukerService::new(db)
            .create(CreateBrukerRequest {
                epost: "KARI@megler.no".to_string(),
                navn: "Kari N".to_string(),
                rolle: Rolle::Radgiver,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "epost: er allerede i bruk");
    }
}
