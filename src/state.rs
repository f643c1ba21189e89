use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use crate::date_utils::YearMonth;
use crate::error::AppResult;
use crate::models::ExpenditureRecord;
use crate::services::budget_client::BudgetApi;
use crate::services::overlay::{self, PendingSpends};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: BudgetApi,
    pub pending: Arc<Mutex<PendingSpends>>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let api = BudgetApi::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            api,
            pending: Arc::new(Mutex::new(PendingSpends::new())),
        })
    }

    /// Never held across an `.await`.
    pub fn pending(&self) -> MutexGuard<'_, PendingSpends> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Server records for `ym` plus anything submitted that the server
    /// listing does not contain yet.
    pub fn merged_records(&self, ym: YearMonth, server: &[ExpenditureRecord]) -> Vec<ExpenditureRecord> {
        let mut pending = self.pending();
        let delivered = pending.prune(server);
        if delivered > 0 {
            tracing::debug!(delivered, "Dropped pending spends now listed by the backend");
        }
        overlay::merge(&pending, ym, server)
    }
}
