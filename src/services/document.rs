//! Documents attached to a sak, selskap or prosjekt
//!
//! The blob is written before the row. A failed row insert removes the blob
//! again so storage never holds unreferenced uploads from this path.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{garanti_dokument, prelude::*};
use crate::error::{ServiceError, ServiceResult};
use crate::models::common::EntityContext;
use crate::models::dokument::{DokumentDto, DokumentUrlResponse, UploadDokumentRequest};
use crate::services::blob_storage::BlobStorage;
use crate::services::hendelse::{self, typer};
use crate::services::{prosjekt, selskap, validation};

pub const MAX_DOKUMENT_BYTES: usize = 25 * 1024 * 1024;

pub fn blob_name_for(id: Uuid, filnavn: &str) -> String {
    format!("{}-{}", id, validation::sanitize_filename(filnavn))
}

async fn ensure_owner_exists<C: ConnectionTrait>(db: &C, context: EntityContext) -> ServiceResult<()> {
    match context {
        EntityContext::Sak(id) => {
            GarantiSak::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("Sak", id))?;
        }
        EntityContext::Selskap(id) => {
            selskap::find_required(db, id).await?;
        }
        EntityContext::Prosjekt(id) => {
            prosjekt::find_required(db, id).await?;
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct DokumentService {
    db: Arc<DatabaseConnection>,
    storage: Arc<dyn BlobStorage>,
}

impl DokumentService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>, storage: Arc<dyn BlobStorage>) -> Self {
        Self { db: db.into(), storage }
    }

    pub async fn upload(&self, req: UploadDokumentRequest) -> ServiceResult<DokumentDto> {
        let filnavn = validation::require_text("filnavn", &req.filnavn)?;
        let innhold = BASE64
            .decode(req.innhold_base64.trim())
            .map_err(|_| ServiceError::validation("innhold", "er ikke gyldig base64"))?;
        if innhold.is_empty() {
            return Err(ServiceError::validation("innhold", "filen er tom"));
        }
        if innhold.len() > MAX_DOKUMENT_BYTES {
            return Err(ServiceError::validation(
                "innhold",
                format!("filen er større enn {} MB", MAX_DOKUMENT_BYTES / (1024 * 1024)),
            ));
        }

        ensure_owner_exists(self.db.as_ref(), req.context).await?;

        let id = Uuid::new_v4();
        let blob_name = blob_name_for(id, &filnavn);
        let storrelse = innhold.len() as i64;
        let content_type = validation::optional_text(req.content_type.as_deref());
        let stored = self
            .storage
            .upload(&blob_name, content_type.as_deref(), innhold)
            .await?;

        let (sak_id, selskap_id, prosjekt_id) = req.context.foreign_keys();
        let row = garanti_dokument::ActiveModel {
            id: Set(id),
            sak_id: Set(sak_id),
            selskap_id: Set(selskap_id),
            prosjekt_id: Set(prosjekt_id),
            filnavn: Set(filnavn.clone()),
            content_type: Set(content_type),
            storrelse: Set(storrelse),
            dokument_type: Set(validation::optional_text(req.dokument_type.as_deref())),
            beskrivelse: Set(validation::optional_text(req.beskrivelse.as_deref())),
            blob_url: Set(stored.url.clone()),
            container_name: Set(stored.container_name.clone()),
            blob_name: Set(stored.blob_name.clone()),
            lastet_opp_av: Set(req.utfort_av),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let model = match self.persist(row, req.context, &filnavn, req.utfort_av).await {
            Ok(model) => model,
            Err(err) => {
                if let Err(cleanup) = self.storage.delete(&stored.container_name, &stored.blob_name).await {
                    tracing::warn!(blob = %stored.blob_name, error = %cleanup, "Orphaned blob after failed insert");
                }
                return Err(err);
            }
        };

        tracing::info!(dokument_id = %model.id, context = ?req.context, storrelse, "Dokument uploaded");

        // The row is committed; a missing link is fetched later through get_url
        let sas_url = match self.storage.read_url(&model.container_name, &model.blob_name).await {
            Ok(link) => Some(link.url),
            Err(err) => {
                tracing::warn!(dokument_id = %model.id, error = %err, "No read link for uploaded dokument");
                None
            }
        };

        let mut dto = DokumentDto::from(model);
        dto.sas_url = sas_url;
        Ok(dto)
    }

    async fn persist(
        &self,
        row: garanti_dokument::ActiveModel,
        context: EntityContext,
        filnavn: &str,
        utfort_av: Option<Uuid>,
    ) -> ServiceResult<garanti_dokument::Model> {
        let txn = self.db.begin().await?;
        let model = row.insert(&txn).await?;
        hendelse::log_hendelse(
            &txn,
            context,
            typer::DOKUMENT_LASTET_OPP,
            format!("Dokument «{}» lastet opp", filnavn),
            utfort_av,
        )
        .await?;
        txn.commit().await?;
        Ok(model)
    }

    pub async fn list(&self, context: EntityContext) -> ServiceResult<Vec<DokumentDto>> {
        let column = match context {
            EntityContext::Sak(_) => garanti_dokument::Column::SakId,
            EntityContext::Selskap(_) => garanti_dokument::Column::SelskapId,
            EntityContext::Prosjekt(_) => garanti_dokument::Column::ProsjektId,
        };
        let rows = GarantiDokument::find()
            .filter(column.eq(context.id()))
            .order_by_desc(garanti_dokument::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(DokumentDto::from).collect())
    }

    async fn find_required(&self, id: Uuid) -> ServiceResult<garanti_dokument::Model> {
        GarantiDokument::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("Dokument", id))
    }

    /// Fresh 15-minute read link
    pub async fn get_url(&self, id: Uuid) -> ServiceResult<DokumentUrlResponse> {
        let dokument = self.find_required(id).await?;
        let link = self
            .storage
            .read_url(&dokument.container_name, &dokument.blob_name)
            .await?;
        tracing::debug!(dokument_id = %id, "Read link issued");
        Ok(DokumentUrlResponse {
            url: link.url,
            utloper: link.expires_at.fixed_offset(),
        })
    }

    pub async fn delete(&self, id: Uuid, utfort_av: Option<Uuid>) -> ServiceResult<()> {
        let dokument = self.find_required(id).await?;
        self.storage
            .delete(&dokument.container_name, &dokument.blob_name)
            .await?;

        let txn = self.db.begin().await?;
        GarantiDokument::delete_by_id(id).exec(&txn).await?;
        if let Some(context) =
            EntityContext::from_foreign_keys(dokument.sak_id, dokument.selskap_id, dokument.prosjekt_id)
        {
            hendelse::log_hendelse(
                &txn,
                context,
                typer::DOKUMENT_SLETTET,
                format!("Dokument «{}» slettet", dokument.filnavn),
                utfort_av,
            )
            .await?;
        }
        txn.commit().await?;

        tracing::info!(dokument_id = %id, "Dokument deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::selskap as selskap_entity;
    use crate::services::blob_storage::{InMemoryBlobStorage, SignedUrl, StoredBlob};
    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    /// Stores blobs but cannot sign read links
    struct UnsignableStorage(InMemoryBlobStorage);

    #[async_trait]
    impl BlobStorage for UnsignableStorage {
        fn container(&self) -> &str {
            self.0.container()
        }

        async fn upload(&self, blob_name: &str, content_type: Option<&str>, data: Vec<u8>) -> ServiceResult<StoredBlob> {
            self.0.upload(blob_name, content_type, data).await
        }

        async fn read_url(&self, _container: &str, _blob_name: &str) -> ServiceResult<SignedUrl> {
            Err(ServiceError::Infrastructure("Key Vault utilgjengelig".to_string()))
        }

        async fn delete(&self, container: &str, blob_name: &str) -> ServiceResult<()> {
            self.0.delete(container, blob_name).await
        }
    }

    fn selskap_row(id: Uuid) -> selskap_entity::Model {
        let now = Utc::now().fixed_offset();
        selskap_entity::Model {
            id,
            organisasjonsnummer: "987654321".to_string(),
            navn: "Bygg AS".to_string(),
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

    fn dokument_row(id: Uuid, selskap_id: Uuid, blob_name: &str) -> garanti_dokument::Model {
        garanti_dokument::Model {
            id,
            sak_id: None,
            selskap_id: Some(selskap_id),
            prosjekt_id: None,
            filnavn: "kontrakt.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            storrelse: 4,
            dokument_type: None,
            beskrivelse: None,
            blob_url: format!("memory://garanti-dokumenter/{}", blob_name),
            container_name: "garanti-dokumenter".to_string(),
            blob_name: blob_name.to_string(),
            lastet_opp_av: None,
            created_at: Utc::now().fixed_offset(),
        }
    }

    fn upload_request(context: EntityContext, innhold: &str) -> UploadDokumentRequest {
        UploadDokumentRequest {
            context,
            filnavn: "kontrakt.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            innhold_base64: innhold.to_string(),
            dokument_type: None,
            beskrivelse: None,
            utfort_av: None,
        }
    }

    #[test]
    fn test_blob_name_is_prefixed_with_id() {
        let id = Uuid::nil();
        assert_eq!(
            blob_name_for(id, "Kontrakt/2026.pdf"),
            format!("{}-{}", id, validation::sanitize_filename("Kontrakt/2026.pdf"))
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_invalid_base64_before_db() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let storage = Arc::new(InMemoryBlobStorage::new("garanti-dokumenter"));
        let service = DokumentService::new(db, storage.clone());

        let err = service
            .upload(upload_request(EntityContext::Selskap(Uuid::new_v4()), "%%%"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.starts_with("innhold")));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_upload_stores_blob_and_returns_link() {
        let selskap_id = Uuid::new_v4();
        let dokument_id = Uuid::new_v4();
        let blob_name = blob_name_for(dokument_id, "kontrakt.pdf");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![selskap_row(selskap_id)]])
            .append_query_results([vec![dokument_row(dokument_id, selskap_id, &blob_name)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();
        let storage = Arc::new(InMemoryBlobStorage::new("garanti-dokumenter"));
        let service = DokumentService::new(db, storage.clone());

        // "%PDF"
        let dto = service
            .upload(upload_request(EntityContext::Selskap(selskap_id), "JVBERg=="))
            .await
            .unwrap();

        assert_eq!(dto.context, Some(EntityContext::Selskap(selskap_id)));
        assert_eq!(storage.len(), 1);
        assert!(dto.sas_url.is_some());
    }

    #[tokio::test]
    async fn test_failed_insert_removes_blob() {
        let selskap_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![selskap_row(selskap_id)]])
            .append_query_errors([DbErr::Custom("insert failed".to_string())])
            .into_connection();
        let storage = Arc::new(InMemoryBlobStorage::new("garanti-dokumenter"));
        let service = DokumentService::new(db, storage.clone());

        let result = service
            .upload(upload_request(EntityContext::Selskap(selskap_id), "JVBERg=="))
            .await;
        assert!(result.is_err());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_upload_to_missing_owner_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<selskap_entity::Model>::new()])
            .into_connection();
        let storage = Arc::new(InMemoryBlobStorage::new("garanti-dokumenter"));
        let service = DokumentService::new(db, storage.clone());

        let err = service
            .upload(upload_request(EntityContext::Selskap(Uuid::new_v4()), "JVBERg=="))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_committed_upload_survives_link_failure() {
        let selskap_id = Uuid::new_v4();
        let dokument_id = Uuid::new_v4();
        let blob_name = blob_name_for(dokument_id, "kontrakt.pdf");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![selskap_row(selskap_id)]])
            .append_query_results([vec![dokument_row(dokument_id, selskap_id, &blob_name)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();
        let storage = Arc::new(UnsignableStorage(InMemoryBlobStorage::new("garanti-dokumenter")));
        let service = DokumentService::new(db, storage.clone());

        let dto = service
            .upload(upload_request(EntityContext::Selskap(selskap_id), "JVBERg=="))
            .await
            .unwrap();

        assert_eq!(dto.id, dokument_id);
        assert_eq!(dto.sas_url, None);
        assert_eq!(storage.0.len(), 1);
    }
}
