// Application layer - use cases and orchestration over the ledger,
// settings and snapshot persistence.

pub mod error;
pub mod reporting;
mod service;

pub use error::*;
pub use service::{
    BudgetStatus, FinanceService, TransactionUpdate, RESET_CONFIRMATION, SALARY_CATEGORY,
};
