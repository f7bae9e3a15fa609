// src/lib.rs

use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use services::{blob_storage::BlobStorage, report_api::ReportApiService};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub blob_storage: Arc<dyn BlobStorage>,
    pub report_api: ReportApiService,
}

pub mod entities {
    pub mod prelude;
    pub mod bruker;
    pub mod garanti_dokument;
    pub mod garanti_sak;
    pub mod garanti_sak_hendelse;
    pub mod prosjekt;
    pub mod selskap;
    pub mod tilbud;
    pub mod tilbud_benefisient;
    pub mod tilbud_beregning;
    pub mod tilbud_enhet;
}

pub mod services {
    pub mod benefisient;
    pub mod beregning;
    pub mod beregning_calculator;
    pub mod blob_storage;
    pub mod bruker;
    pub mod csv_export;
    pub mod document;
    pub mod enhet;
    pub mod hendelse;
    pub mod key_vault;
    pub mod prosjekt;
    pub mod ramme;
    pub mod report_aggregator;
    pub mod report_api;
    pub mod rounding;
    pub mod sak;
    pub mod selskap;
    pub mod share_validation;
    pub mod status_derivation;
    pub mod tariffs;
    pub mod text_normalize;
    pub mod tilbud;
    pub mod truck_calculator;
    pub mod validation;
    pub mod vehicle_calculator;
}

pub mod config;
pub mod error;
pub mod handlers;
pub mod ipc;
pub mod models;

async fn health() -> &'static str {
    "megler-backend ok"
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/ipc/{channel}", post(ipc::handle_ipc))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
