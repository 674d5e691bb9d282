//! Shared application state.

use std::sync::Arc;

use warung_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;
use crate::services::ledger::LedgerService;
use crate::services::reports::ReportService;

/// State shared by every handler. Cheap to clone: the pool is shared and
/// the rest is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    /// Builds the state from a connected database and loaded config.
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = Arc::new(JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_lifetime_secs,
        ));
        AppState {
            db,
            config: Arc::new(config),
            jwt,
        }
    }

    /// The checkout/void orchestration service.
    pub fn ledger(&self) -> LedgerService {
        LedgerService::new(self.db.clone())
    }

    /// The report orchestration service.
    pub fn reports(&self) -> ReportService {
        ReportService::new(self.db.clone())
    }
}
