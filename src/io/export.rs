use anyhow::Result;
use std::io::Write;

use crate::domain::{format_cents, Ledger, LedgerSnapshot};

/// Column order for the transactions CSV, shared with the importer.
pub const TRANSACTION_CSV_HEADER: [&str; 5] = ["date", "description", "category", "type", "amount"];

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Export transactions to CSV, in stored order. Amounts are unsigned
    /// decimals; the `type` column carries the direction.
    pub fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(TRANSACTION_CSV_HEADER)?;

        let mut count = 0;
        for transaction in self.ledger.transactions() {
            csv_writer.write_record([
                transaction.date.format("%Y-%m-%d").to_string(),
                transaction.description.clone(),
                transaction.category.clone(),
                transaction.kind.as_str().to_string(),
                format_cents(transaction.amount_cents),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export budgets to CSV format
    pub fn export_budgets_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["category", "limit", "spent", "period"])?;

        let mut count = 0;
        for budget in self.ledger.budgets() {
            csv_writer.write_record([
                budget.category.clone(),
                format_cents(budget.limit_cents),
                format_cents(budget.spent_cents),
                budget.period.as_str().to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full ledger as a pretty-printed JSON snapshot
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = self.ledger.snapshot();

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{NewBudget, NewTransaction};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_transactions_csv() {
        let mut ledger = Ledger::new();
        ledger
            .add_transaction(NewTransaction::expense(
                5000,
                "Alimentação",
                "Mercado, feira",
                date("2024-05-10"),
            ))
            .unwrap();
        ledger
            .add_transaction(NewTransaction::income(
                123456,
                "Salário",
                "Salário mensal",
                date("2024-05-01"),
            ))
            .unwrap();

        let mut out = Vec::new();
        let count = Exporter::new(&ledger).export_transactions_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count, 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,description,category,type,amount");
        assert_eq!(lines[1], "2024-05-10,\"Mercado, feira\",Alimentação,expense,50.00");
        assert_eq!(lines[2], "2024-05-01,Salário mensal,Salário,income,1234.56");
    }

    #[test]
    fn test_budgets_csv_includes_spent() {
        let mut ledger = Ledger::new();
        ledger
            .add_budget(NewBudget::monthly("Transporte", 40000))
            .unwrap();
        ledger
            .add_transaction(NewTransaction::expense(
                15000,
                "Transporte",
                "Combustível",
                date("2024-05-20"),
            ))
            .unwrap();

        let mut out = Vec::new();
        Exporter::new(&ledger).export_budgets_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            ["category,limit,spent,period", "Transporte,400.00,150.00,monthly"]
        );
    }

    #[test]
    fn test_empty_ledger_exports_header_only() {
        let ledger = Ledger::new();
        let mut out = Vec::new();
        let count = Exporter::new(&ledger).export_transactions_csv(&mut out).unwrap();
        assert_eq!(count, 0);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_full_json_is_a_loadable_snapshot() {
        let ledger = Ledger::seeded();
        let mut out = Vec::new();
        Exporter::new(&ledger).export_full_json(&mut out).unwrap();

        let snapshot: LedgerSnapshot = serde_json::from_slice(&out).unwrap();
        let mut restored = Ledger::new();
        restored.load(snapshot).unwrap();
        assert_eq!(restored.transactions(), ledger.transactions());
        assert_eq!(restored.budgets(), ledger.budgets());
    }
}
