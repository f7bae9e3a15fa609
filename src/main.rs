use megler_backend::{
    build_router,
    config::{AppConfig, DocumentStorageKind},
    services::{
        blob_storage::{AzureBlobStorage, BlobStorage, InMemoryBlobStorage},
        report_api::ReportApiService,
    },
    AppState,
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,megler_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    // Connect to database
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    if config.run_migrations {
        tracing::info!("Running migrations...");
        migration::Migrator::up(&db, None).await?;
    } else {
        tracing::info!("Migrations disabled (RUN_MIGRATIONS=false)");
    }

    let blob_storage: Arc<dyn BlobStorage> = match (&config.document_storage, &config.azure) {
        (DocumentStorageKind::Azure, Some(azure)) => {
            tracing::info!(account = %azure.storage_account, container = %config.document_container, "Using Azure Blob Storage");
            Arc::new(AzureBlobStorage::new(
                reqwest::Client::new(),
                azure,
                config.document_container.clone(),
            ))
        }
        _ => {
            tracing::warn!("Using in-memory document storage; uploads are lost on restart");
            Arc::new(InMemoryBlobStorage::new(config.document_container.clone()))
        }
    };

    if config.report_api_url.is_none() {
        tracing::warn!("REPORT_API_URL not set; rapport channels will fail");
    }
    let report_api = ReportApiService::new(
        config.report_api_url.clone(),
        config.report_api_key.clone(),
        config.report_cache_ttl_secs,
    );

    let state = AppState {
        db: Arc::new(db),
        blob_storage,
        report_api,
    };

    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
