use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use megler_backend::{
    build_router,
    services::{blob_storage::InMemoryBlobStorage, report_api::ReportApiService},
    AppState,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Empty mock database for channels that never reach it
#[allow(dead_code)]
pub fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

/// App state over the given connection, in-memory blobs and no report API
pub fn test_app_state(db: DatabaseConnection) -> AppState {
    AppState {
        db: Arc::new(db),
        blob_storage: Arc::new(InMemoryBlobStorage::new("garanti-dokumenter")),
        report_api: ReportApiService::new(None, None, 60),
    }
}

pub fn test_router(db: DatabaseConnection) -> Router {
    build_router(test_app_state(db))
}

/// POST to an IPC channel and return the parsed envelope.
/// Every channel answers 200, so the status is checked here.
pub async fn call_ipc(app: Router, channel: &str, params: Value) -> Value {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/ipc/{}", channel))
                .header("content-type", "application/json")
                .body(Body::from(params.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
