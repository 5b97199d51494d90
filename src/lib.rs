pub mod application;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;

pub use application::FinanceService;
pub use config::AppConfig;
pub use domain::*;
pub use storage::Repository;
