//! `garanti:*Dokument*` channels

use crate::{
    error::ServiceResult,
    models::{
        common::IdRequest,
        dokument::{DokumentDto, DokumentListQuery, DokumentUrlResponse, UploadDokumentRequest},
    },
    services::document::DokumentService,
    AppState,
};

fn service(state: &AppState) -> DokumentService {
    DokumentService::new(state.db.clone(), state.blob_storage.clone())
}

pub async fn upload_dokument(state: &AppState, req: UploadDokumentRequest) -> ServiceResult<DokumentDto> {
    tracing::info!(filnavn = %req.filnavn, context = ?req.context, "Uploading dokument");
    service(state).upload(req).await
}

pub async fn get_dokumenter(state: &AppState, query: DokumentListQuery) -> ServiceResult<Vec<DokumentDto>> {
    service(state).list(query.context).await
}

pub async fn get_dokument_url(state: &AppState, req: IdRequest) -> ServiceResult<DokumentUrlResponse> {
    service(state).get_url(req.id).await
}

pub async fn delete_dokument(state: &AppState, req: IdRequest) -> ServiceResult<bool> {
    service(state).delete(req.id, req.utfort_av).await?;
    Ok(true)
}
