mod repository;

pub use repository::*;

/// SQL migration for the settings key-value table
pub const MIGRATION_001_SETTINGS: &str = include_str!("migrations/001_settings.sql");

/// SQL migration for ledger snapshots
pub const MIGRATION_002_SNAPSHOTS: &str = include_str!("migrations/002_snapshots.sql");
