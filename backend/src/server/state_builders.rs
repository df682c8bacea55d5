//! Adapter selection for the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{info, warn};

use fanclub::inbound::http::state::{HttpState, HttpStateAdapters};
use fanclub::outbound::memory::InMemoryStore;
use fanclub::outbound::persistence::{
    DbPool, DieselDocumentRepository, DieselPointsLedgerRepository, DieselUserRepository,
};
use fanclub::outbound::verification::{HostAllowListVerifier, SizeThresholdClassifier};

use super::ServerConfig;

/// Wire the services over PostgreSQL when a pool is configured, otherwise
/// over a process-local store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            diesel_state(pool)
        }
        None => {
            warn!("no database configured; state is kept in memory and lost on restart");
            memory_state()
        }
    };
    web::Data::new(state)
}

fn diesel_state(pool: &DbPool) -> HttpState {
    HttpState::from_adapters(HttpStateAdapters {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        ledger: Arc::new(DieselPointsLedgerRepository::new(pool.clone())),
        documents: Arc::new(DieselDocumentRepository::new(pool.clone())),
        verifier: Arc::new(HostAllowListVerifier),
        classifier: Arc::new(SizeThresholdClassifier::default()),
        clock: Arc::new(DefaultClock),
    })
}

fn memory_state() -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    HttpState::from_adapters(HttpStateAdapters {
        users: store.clone(),
        ledger: store.clone(),
        documents: store,
        verifier: Arc::new(HostAllowListVerifier),
        classifier: Arc::new(SizeThresholdClassifier::default()),
        clock: Arc::new(DefaultClock),
    })
}
