use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::env::ensure_data_dir;
use configs::{AppConfig, StorageBackend};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::{
    auth::{CredentialGate, ExpectedCredentials},
    repository::{InMemoryPersonRepository, JsonPersonRepository, JsonRepositoryOptions, PersonRepository},
    storage::{FileStorage, FsStorage},
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Construct the configured backend and gate.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let repo: Arc<dyn PersonRepository> = match cfg.storage.backend {
        StorageBackend::Memory => {
            info!("using in-memory person store; data is lost on exit");
            Arc::new(InMemoryPersonRepository::new())
        }
        StorageBackend::Json => {
            ensure_data_dir(&cfg.storage.path).await?;
            let storage: Arc<dyn FileStorage> = Arc::new(FsStorage);
            let options = JsonRepositoryOptions { strict_load: cfg.storage.strict_load };
            JsonPersonRepository::open_with(&cfg.storage.path, storage, options).await?
        }
    };

    let gate = CredentialGate::new(ExpectedCredentials::from_parts(
        cfg.auth.username.clone(),
        cfg.auth.password.clone(),
    ));
    if !gate.is_configured() {
        warn!("AUTH_USERNAME/AUTH_PASSWORD not configured; every API request will be rejected");
    }

    Ok(ServerState { repo, gate: Arc::new(gate) })
}

pub fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    cfg.server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address {}: {e}", cfg.server.bind_addr())))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; shutdown only by termination");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, backend = ?cfg.storage.backend, "starting persons server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
