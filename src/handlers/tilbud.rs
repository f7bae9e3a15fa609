//! `tilbud:*` channels: tilbud, beregning, benefisienter and enheter

use crate::{
    error::ServiceResult,
    models::{
        benefisient::{
            BenefisientDto, BenefisientListQuery, CreateBenefisientRequest, UpdateBenefisientRequest,
        },
        beregning::{BeregningDto, SaveBeregningRequest},
        common::IdRequest,
        enhet::{CreateEnhetRequest, EnhetDto, GenererEnheterRequest, UpdateEnhetRequest},
        tilbud::{CreateTilbudRequest, ProsjektIdRequest, TilbudDto, TilbudIdRequest, UpdateTilbudRequest},
    },
    services::{
        benefisient::BenefisientService, beregning::BeregningService, enhet::EnhetService,
        tilbud::TilbudService,
    },
    AppState,
};

pub async fn get_tilbud(state: &AppState, req: IdRequest) -> ServiceResult<TilbudDto> {
    TilbudService::new(state.db.clone()).get(req.id).await
}

pub async fn get_tilbud_for_prosjekt(state: &AppState, req: ProsjektIdRequest) -> ServiceResult<Vec<TilbudDto>> {
    TilbudService::new(state.db.clone())
        .list_for_prosjekt(req.prosjekt_id)
        .await
}

pub async fn create_tilbud(state: &AppState, req: CreateTilbudRequest) -> ServiceResult<TilbudDto> {
    TilbudService::new(state.db.clone()).create(req).await
}

pub async fn update_tilbud(state: &AppState, req: UpdateTilbudRequest) -> ServiceResult<TilbudDto> {
    TilbudService::new(state.db.clone()).update(req).await
}

pub async fn delete_tilbud(state: &AppState, req: IdRequest) -> ServiceResult<bool> {
    TilbudService::new(state.db.clone())
        .delete(req.id, req.utfort_av)
        .await?;
    Ok(true)
}

/// `null` when no beregning has been saved yet
pub async fn get_beregning(state: &AppState, req: TilbudIdRequest) -> ServiceResult<Option<BeregningDto>> {
    BeregningService::new(state.db.clone()).get(req.tilbud_id).await
}

pub async fn save_beregning(state: &AppState, req: SaveBeregningRequest) -> ServiceResult<BeregningDto> {
    BeregningService::new(state.db.clone()).save(req).await
}

pub async fn get_benefisienter(state: &AppState, query: BenefisientListQuery) -> ServiceResult<Vec<BenefisientDto>> {
    BenefisientService::new(state.db.clone()).list(query).await
}

pub async fn create_benefisient(state: &AppState, req: CreateBenefisientRequest) -> ServiceResult<BenefisientDto> {
    BenefisientService::new(state.db.clone()).create(req).await
}

pub async fn update_benefisient(state: &AppState, req: UpdateBenefisientRequest) -> ServiceResult<BenefisientDto> {
    BenefisientService::new(state.db.clone()).update(req).await
}

pub async fn deactivate_benefisient(state: &AppState, req: IdRequest) -> ServiceResult<BenefisientDto> {
    BenefisientService::new(state.db.clone())
        .deactivate(req.id, req.utfort_av)
        .await
}

pub async fn reactivate_benefisient(state: &AppState, req: IdRequest) -> ServiceResult<BenefisientDto> {
    BenefisientService::new(state.db.clone())
        .reactivate(req.id, req.utfort_av)
        .await
}

pub async fn delete_benefisient(state: &AppState, req: IdRequest) -> ServiceResult<bool> {
    BenefisientService::new(state.db.clone())
        .delete(req.id, req.utfort_av)
        .await?;
    Ok(true)
}

pub async fn get_enheter(state: &AppState, req: TilbudIdRequest) -> ServiceResult<Vec<EnhetDto>> {
    EnhetService::new(state.db.clone()).list(req.tilbud_id).await
}

pub async fn create_enhet(state: &AppState, req: CreateEnhetRequest) -> ServiceResult<EnhetDto> {
    EnhetService::new(state.db.clone()).create(req).await
}

pub async fn update_enhet(state: &AppState, req: UpdateEnhetRequest) -> ServiceResult<EnhetDto> {
    EnhetService::new(state.db.clone()).update(req).await
}

pub async fn delete_enhet(state: &AppState, req: IdRequest) -> ServiceResult<bool> {
    EnhetService::new(state.db.clone())
        .delete(req.id, req.utfort_av)
        .await?;
    Ok(true)
}

pub async fn generer_enheter(state: &AppState, req: GenererEnheterRequest) -> ServiceResult<Vec<EnhetDto>> {
    tracing::info!(tilbud_id = %req.tilbud_id, antall = req.antall, "Generating enheter");
    EnhetService::new(state.db.clone()).generer(req).await
}
