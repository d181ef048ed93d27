pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod observability;

use std::sync::Arc;

use anyhow::Result;
use infrastructure::{
    axum_http::http_serve,
    sqlite::{
        schema_manager,
        storage_resolver::{self, StorageCandidate},
    },
};
use tracing::{info, warn};

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("proposal-desk")?;

    let dotenvy_env = config::config_loader::load()?;
    info!("ENV has been loaded");

    if let Some(marker) = &dotenvy_env.database.managed_runtime {
        info!(%marker, "Managed runtime detected");
    }

    let candidates = StorageCandidate::from_config(&dotenvy_env.database);
    let storage = storage_resolver::resolve(
        &candidates,
        &dotenvy_env.database.connection_options(),
    )?;
    if storage.location.is_persistent() {
        info!(location = %storage.location, "Storage has been resolved");
    } else {
        warn!(location = %storage.location, "Storage is not persistent");
    }

    schema_manager::ensure_schema(&storage.db_pool)?;
    info!("Schema is up to date");

    http_serve::start(Arc::new(dotenvy_env), Arc::new(storage.db_pool)).await?;

    Ok(())
}
