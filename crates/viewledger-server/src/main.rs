use std::sync::Arc;

use viewledger_core::store::memory::MemStore;
use viewledger_core::store::Store;
use viewledger_core::tracking::service::TrackingService;
use viewledger_server::store::PgStore;
use viewledger_server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().init();

    let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("SERVER_PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("{}:{}", host, port);

    let store: Arc<dyn Store> = match std::env::var("DATABASE_URL") {
        Ok(db_url) => Arc::new(PgStore::connect(&db_url).await?),
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, falling back to the in-memory store");
            Arc::new(MemStore::new())
        }
    };

    let state = AppState {
        service: Arc::new(TrackingService::new(store)),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("server running on {bind_addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
