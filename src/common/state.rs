// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::common::dev_mode::DevModeConfig;
use crate::entries::services::EntryService;
use crate::services::BillingProvider;
use crate::stats::services::StatsService;

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub dev_mode: DevModeConfig,
    pub billing: Arc<dyn BillingProvider>,
    pub entry_service: Arc<EntryService>,
    pub stats_service: Arc<StatsService>,
}
