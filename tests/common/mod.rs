// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use monefy::application::FinanceService;
use monefy::config::AppConfig;
use monefy::domain::{Clock, NewTransaction};
use tempfile::TempDir;

/// Reference "today" for date-windowed assertions
pub const TODAY: &str = "2024-05-15";

/// Helper to create an empty test service with a temporary database
pub async fn test_service() -> Result<(FinanceService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = open(&temp_dir, false).await?;
    Ok((service, temp_dir))
}

/// Helper to create a test service starting from the demo data
pub async fn seeded_service() -> Result<(FinanceService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = open(&temp_dir, true).await?;
    Ok((service, temp_dir))
}

/// Open (or reopen) the service on the database inside `dir`
pub async fn open(dir: &TempDir, seed: bool) -> Result<FinanceService> {
    let config = AppConfig::new(dir.path().join("test.db")).with_seed(seed);
    Ok(FinanceService::open(config)
        .await?
        .with_clock(Clock::Fixed(parse_date(TODAY))))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

pub fn expense(amount: i64, category: &str, description: &str, date: &str) -> NewTransaction {
    NewTransaction::expense(amount, category, description, parse_date(date))
}

pub fn income(amount: i64, category: &str, description: &str, date: &str) -> NewTransaction {
    NewTransaction::income(amount, category, description, parse_date(date))
}
