//! Server entry-point: loads settings, prepares storage and serves the blog.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use quill::inbound::http::health::HealthState;
use quill::inbound::http::session_config::{
    BuildMode, key_fingerprint, session_settings_from_env,
};
use quill::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations_async};
use quill::settings::ServerSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session key loaded"
    );

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr(),
    )
    .with_media_root(settings.media_root())
    .with_index_ttl(settings.index_cache_ttl());

    if let Some(database_url) = settings.database_url.clone() {
        config = config.with_db_pool(connect(database_url, settings.db_pool_size).await?);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("quill")
            .endpoint("/metrics")
            .build()
    }));

    info!(addr = %settings.bind_addr(), "starting server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}

/// Apply pending migrations, then open the pool.
async fn connect(database_url: String, pool_size: Option<u32>) -> io::Result<DbPool> {
    let applied = run_pending_migrations_async(database_url.clone())
        .await
        .map_err(io::Error::other)?;
    info!(count = applied.len(), "migrations checked");

    let mut pool_config = PoolConfig::new(database_url);
    if let Some(size) = pool_size {
        pool_config = pool_config.with_max_size(size);
    }
    DbPool::new(pool_config)
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))
}

/// Build Prometheus middleware, logging and continuing without it on failure.
#[cfg(feature = "metrics")]
fn initialize_metrics<E, F>(build: F) -> Option<PrometheusMetrics>
where
    E: std::fmt::Display,
    F: FnOnce() -> Result<PrometheusMetrics, E>,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "metrics disabled: Prometheus setup failed");
            None
        }
    }
}
