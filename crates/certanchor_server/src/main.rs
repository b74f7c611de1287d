//! Certanchor Server
//!
//! Blockchain-anchored certificate issuance and verification over HTTP.

#![warn(missing_docs)]
#![warn(clippy::all)]

use anyhow::Result;
use certanchor_ledger::LedgerAdapter;
use certanchor_registry::Registry;
use certanchor_render::CertificateRenderer;
use certanchor_server::{Settings, api};
use certanchor_service::CertService;
use certanchor_store::ArtifactStore;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "certanchor=info,tower_http=info".into()),
        )
        .init();

    let registry = Registry::open(&settings.db_path)?;
    let renderer = CertificateRenderer::new(settings.staging_dir.clone())?;
    let store = ArtifactStore::connect(settings.remote_config(), settings.local_config()).await?;
    let ledger = LedgerAdapter::from_config(settings.ledger_config())?;

    let service = CertService::new(
        registry,
        renderer,
        store,
        ledger,
        settings.service_config(),
    );
    let app = api::router(service);

    let listener = tokio::net::TcpListener::bind(settings.bind).await?;
    info!(addr = %settings.bind, "certanchor server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
