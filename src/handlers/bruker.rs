//! `bruker:*` channels

use crate::{
    error::ServiceResult,
    models::{
        bruker::{BrukerDto, BrukerListQuery, CreateBrukerRequest, UpdateRolleRequest},
        common::IdRequest,
    },
    services::bruker::BrukerService,
    AppState,
};

pub async fn list(state: &AppState, query: BrukerListQuery) -> ServiceResult<Vec<BrukerDto>> {
    BrukerService::new(state.db.clone()).list(query).await
}

pub async fn create(state: &AppState, req: CreateBrukerRequest) -> ServiceResult<BrukerDto> {
    BrukerService::new(state.db.clone()).create(req).await
}

pub async fn update_rolle(state: &AppState, req: UpdateRolleRequest) -> ServiceResult<BrukerDto> {
    BrukerService::new(state.db.clone()).update_rolle(req).await
}

pub async fn deactivate(state: &AppState, req: IdRequest) -> ServiceResult<BrukerDto> {
    BrukerService::new(state.db.clone()).deactivate(req.id).await
}
