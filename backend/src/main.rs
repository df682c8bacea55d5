//! Fan-club service entry point.

mod server;

#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use actix_web::web;
use color_eyre::eyre::WrapErr;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use fanclub::config::AppSettings;
use ortho_config::OrthoConfig as _;
use fanclub::inbound::http::health::HealthState;
use fanclub::inbound::http::session_config::{BuildMode, session_settings};
use fanclub::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load configuration")?;
    let session = session_settings(&settings.session_toggles(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    let bind_addr = settings.bind_addr()?;

    let config = ServerConfig::new(session.key, session.cookie_secure, session.same_site, bind_addr);
    let config = match settings.database_url() {
        Some(url) => config.with_db_pool(connect_database(url, &settings).await?),
        None => config,
    };
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("fanclub")
            .endpoint("/metrics")
            .build()
    }));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "fan-club service listening");
    server.await?;
    Ok(())
}

async fn connect_database(url: &str, settings: &AppSettings) -> color_eyre::Result<DbPool> {
    let migration_url = url.to_owned();
    tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .wrap_err("migration task panicked")??;
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections()?))
        .await?;
    Ok(pool)
}

/// Build the Prometheus middleware, serving without `/metrics` on failure.
#[cfg(feature = "metrics")]
fn initialize_metrics<F, E>(build: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "metrics disabled: Prometheus middleware failed to build");
            None
        }
    }
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
    use super::*;

    #[test]
    fn initialize_metrics_returns_none_on_error() {
        let metrics = initialize_metrics(|| -> Result<PrometheusMetrics, &str> { Err("boom") });
        assert!(metrics.is_none(), "expected metrics to be absent on error");
    }

    #[test]
    fn initialize_metrics_returns_metrics_on_success() {
        let metrics = initialize_metrics(|| {
            PrometheusMetricsBuilder::new("test")
                .endpoint("/metrics")
                .build()
        });
        assert!(metrics.is_some(), "expected metrics to be present on success");
    }
}
