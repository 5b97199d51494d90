// CSV and JSON import/export

pub mod export;
pub mod import;

pub use export::{Exporter, TRANSACTION_CSV_HEADER};
pub use import::{read_snapshot_json, read_transactions_csv, ImportError, ImportResult};
