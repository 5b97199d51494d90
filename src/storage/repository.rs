use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::domain::LedgerSnapshot;

use super::{MIGRATION_001_SETTINGS, MIGRATION_002_SNAPSHOTS};

/// How many snapshots to keep after each save.
pub const SNAPSHOT_RETENTION: i64 = 20;

/// Metadata for a stored snapshot, without its payload.
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    pub id: i64,
    pub saved_at: DateTime<Utc>,
    pub transaction_count: i64,
    pub budget_count: i64,
}

/// Repository for persisting settings and ledger snapshots.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_SETTINGS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        sqlx::query(MIGRATION_002_SNAPSHOTS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 002")?;

        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Settings
    // ========================

    /// Get a raw setting value.
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read setting '{}'", key))?;

        Ok(row.map(|r| r.get("value")))
    }

    /// Insert or replace a setting value.
    pub async fn put_setting(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write setting '{}'", key))?;

        debug!(key, "setting saved");
        Ok(())
    }

    /// Remove a setting. Returns true if it existed.
    pub async fn remove_setting(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to remove setting '{}'", key))?;
        Ok(result.rows_affected() > 0)
    }

    /// List all settings ordered by key.
    pub async fn list_settings(&self) -> Result<Vec<(String, String)>> {
        let rows = sqlx::query("SELECT key, value FROM settings ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list settings")?;

        Ok(rows.iter().map(|r| (r.get("key"), r.get("value"))).collect())
    }

    // ========================
    // Snapshots
    // ========================

    /// Store a new snapshot and prune old ones beyond the retention limit.
    pub async fn save_snapshot(&self, snapshot: &LedgerSnapshot) -> Result<i64> {
        let data = serde_json::to_string(snapshot).context("Failed to serialize snapshot")?;

        let row = sqlx::query(
            r#"
            INSERT INTO ledger_snapshots (saved_at, transaction_count, budget_count, data)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(snapshot.transactions.len() as i64)
        .bind(snapshot.budgets.len() as i64)
        .bind(&data)
        .fetch_one(&self.pool)
        .await
        .context("Failed to save snapshot")?;

        let id: i64 = row.get("id");

        sqlx::query("DELETE FROM ledger_snapshots WHERE id <= ?")
            .bind(id - SNAPSHOT_RETENTION)
            .execute(&self.pool)
            .await
            .context("Failed to prune old snapshots")?;

        debug!(
            snapshot_id = id,
            transactions = snapshot.transactions.len(),
            budgets = snapshot.budgets.len(),
            "snapshot saved"
        );
        Ok(id)
    }

    /// Load the most recent snapshot, if any.
    pub async fn latest_snapshot(&self) -> Result<Option<LedgerSnapshot>> {
        let row = sqlx::query("SELECT data FROM ledger_snapshots ORDER BY id DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch latest snapshot")?;

        match row {
            Some(row) => {
                let data: String = row.get("data");
                let snapshot =
                    serde_json::from_str(&data).context("Stored snapshot is not valid JSON")?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    /// List stored snapshots, newest first.
    pub async fn list_snapshots(&self) -> Result<Vec<SnapshotInfo>> {
        let rows = sqlx::query(
            r#"
            SELECT id, saved_at, transaction_count, budget_count
            FROM ledger_snapshots
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list snapshots")?;

        rows.iter().map(Self::row_to_snapshot_info).collect()
    }

    fn row_to_snapshot_info(row: &sqlx::sqlite::SqliteRow) -> Result<SnapshotInfo> {
        let saved_at_str: String = row.get("saved_at");
        Ok(SnapshotInfo {
            id: row.get("id"),
            saved_at: DateTime::parse_from_rfc3339(&saved_at_str)
                .context("Invalid saved_at timestamp")?
                .with_timezone(&Utc),
            transaction_count: row.get("transaction_count"),
            budget_count: row.get("budget_count"),
        })
    }

    /// Delete all settings and snapshots.
    pub async fn clear_all(&self) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin reset")?;

        sqlx::query("DELETE FROM settings")
            .execute(&mut *tx)
            .await
            .context("Failed to clear settings")?;
        sqlx::query("DELETE FROM ledger_snapshots")
            .execute(&mut *tx)
            .await
            .context("Failed to clear snapshots")?;

        tx.commit().await.context("Failed to commit reset")?;
        Ok(())
    }
}
