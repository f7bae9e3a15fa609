//! `garanti:*` channels: saker, selskaper, prosjekter, hendelser and ramme

use crate::{
    error::{ServiceError, ServiceResult},
    models::{
        common::IdRequest,
        hendelse::{HendelseDto, HendelseQuery},
        prosjekt::{
            AssignRadgiverRequest, CreateProsjektRequest, ProsjektDto, SelskapIdRequest,
            UpdateProsjektRequest,
        },
        ramme::{RammeForbruk, RammeForbrukRequest, RammeValidering, ValiderRammeRequest},
        sak::{NewGuaranteeRequest, NewGuaranteeResponse, SakDto},
        selskap::{
            CreateSelskapRequest, OrgnrRequest, SelskapDto, SelskapListQuery, SelskapListResponse,
            UpdateSelskapRequest,
        },
    },
    services::{
        hendelse, prosjekt::ProsjektService, ramme::RammeService, sak::SakService,
        selskap::SelskapService, validation,
    },
    AppState,
};

pub async fn create_sak(state: &AppState, req: NewGuaranteeRequest) -> ServiceResult<NewGuaranteeResponse> {
    tracing::info!(orgnr = %req.organisasjonsnummer, "New guarantee request");
    SakService::new(state.db.clone())
        .handle_new_guarantee_request(req)
        .await
}

pub async fn get_sak(state: &AppState, req: IdRequest) -> ServiceResult<SakDto> {
    SakService::new(state.db.clone()).get(req.id).await
}

pub async fn get_saker_for_selskap(state: &AppState, req: SelskapIdRequest) -> ServiceResult<Vec<SakDto>> {
    SakService::new(state.db.clone())
        .list_for_selskap(req.selskap_id)
        .await
}

pub async fn list_selskaper(state: &AppState, query: SelskapListQuery) -> ServiceResult<SelskapListResponse> {
    SelskapService::new(state.db.clone()).list(query).await
}

pub async fn get_selskap(state: &AppState, req: IdRequest) -> ServiceResult<SelskapDto> {
    SelskapService::new(state.db.clone()).get(req.id).await
}

pub async fn get_selskap_by_orgnr(state: &AppState, req: OrgnrRequest) -> ServiceResult<SelskapDto> {
    let orgnr = validation::validate_orgnr(&req.organisasjonsnummer)?;
    SelskapService::new(state.db.clone())
        .get_by_orgnr(&orgnr)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Selskap med organisasjonsnummer {} finnes ikke", orgnr)))
}

pub async fn create_selskap(state: &AppState, req: CreateSelskapRequest) -> ServiceResult<SelskapDto> {
    SelskapService::new(state.db.clone()).create(req).await
}

pub async fn update_selskap(state: &AppState, req: UpdateSelskapRequest) -> ServiceResult<SelskapDto> {
    SelskapService::new(state.db.clone()).update(req).await
}

pub async fn delete_selskap(state: &AppState, req: IdRequest) -> ServiceResult<bool> {
    SelskapService::new(state.db.clone())
        .delete(req.id, req.utfort_av)
        .await?;
    Ok(true)
}

pub async fn get_prosjekt(state: &AppState, req: IdRequest) -> ServiceResult<ProsjektDto> {
    ProsjektService::new(state.db.clone()).get(req.id).await
}

pub async fn get_prosjekter_for_selskap(state: &AppState, req: SelskapIdRequest) -> ServiceResult<Vec<ProsjektDto>> {
    ProsjektService::new(state.db.clone())
        .list_for_selskap(req.selskap_id)
        .await
}

pub async fn create_prosjekt(state: &AppState, req: CreateProsjektRequest) -> ServiceResult<ProsjektDto> {
    ProsjektService::new(state.db.clone()).create(req).await
}

pub async fn update_prosjekt(state: &AppState, req: UpdateProsjektRequest) -> ServiceResult<ProsjektDto> {
    ProsjektService::new(state.db.clone()).update(req).await
}

pub async fn assign_radgiver(state: &AppState, req: AssignRadgiverRequest) -> ServiceResult<ProsjektDto> {
    ProsjektService::new(state.db.clone())
        .assign_radgiver(req)
        .await
}

pub async fn delete_prosjekt(state: &AppState, req: IdRequest) -> ServiceResult<bool> {
    ProsjektService::new(state.db.clone())
        .delete(req.id, req.utfort_av)
        .await?;
    Ok(true)
}

pub async fn get_hendelser(state: &AppState, query: HendelseQuery) -> ServiceResult<Vec<HendelseDto>> {
    hendelse::list_hendelser(state.db.as_ref(), query.context, query.limit).await
}

pub async fn get_ramme_forbruk(state: &AppState, req: RammeForbrukRequest) -> ServiceResult<RammeForbruk> {
    RammeService::new(state.db.clone())
        .get_forbruk(req.selskap_id, req.ekskluder_prosjekt_id)
        .await
}

pub async fn valider_ramme(state: &AppState, req: ValiderRammeRequest) -> ServiceResult<RammeValidering> {
    RammeService::new(state.db.clone())
        .valider(req.selskap_id, req.nytt_belop, req.ekskluder_prosjekt_id)
        .await
}
