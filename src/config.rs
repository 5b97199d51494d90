use std::path::PathBuf;

use crate::domain::BudgetScope;

pub const DEFAULT_DATABASE: &str = "monefy.db";

/// Runtime configuration for a [`FinanceService`](crate::application::FinanceService).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite file holding settings and ledger snapshots
    pub database_path: PathBuf,
    /// Start from the demo data set when nothing has been saved yet
    pub seed_on_empty: bool,
    pub budget_scope: BudgetScope,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE),
            seed_on_empty: true,
            budget_scope: BudgetScope::AllTime,
        }
    }
}

impl AppConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed_on_empty: bool) -> Self {
        self.seed_on_empty = seed_on_empty;
        self
    }

    pub fn with_budget_scope(mut self, scope: BudgetScope) -> Self {
        self.budget_scope = scope;
        self
    }

    /// SQLite URL that creates the file when missing.
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.database_path.display())
    }
}
