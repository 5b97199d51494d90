use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::Read;

use crate::domain::{parse_cents, LedgerSnapshot, NewTransaction, TransactionType};

/// Transactions parsed from a CSV file, plus the rows that failed
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub transactions: Vec<NewTransaction>,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

impl ImportError {
    fn at(line: usize, field: &str, error: impl Into<String>) -> Self {
        Self {
            line,
            field: Some(field.to_string()),
            error: error.into(),
        }
    }
}

/// Read transactions in the exported CSV layout
/// (`date,description,category,type,amount`). Bad rows are collected as
/// errors and skipped; nothing is applied to a ledger here.
pub fn read_transactions_csv<R: Read>(reader: R) -> Result<ImportResult> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut result = ImportResult::default();

    for (line_num, record) in csv_reader.records().enumerate() {
        let line = line_num + 2; // +2 for header and 0-indexing

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                result.errors.push(ImportError {
                    line,
                    field: None,
                    error: format!("CSV parse error: {}", e),
                });
                continue;
            }
        };

        let field = |i: usize| record.get(i).unwrap_or("").trim();

        let date = match NaiveDate::parse_from_str(field(0), "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                result
                    .errors
                    .push(ImportError::at(line, "date", format!("Invalid date: {}", field(0))));
                continue;
            }
        };

        let kind = match TransactionType::from_str(field(3)) {
            Some(k) => k,
            None => {
                result
                    .errors
                    .push(ImportError::at(line, "type", format!("Invalid type: {}", field(3))));
                continue;
            }
        };

        let amount_cents = match parse_cents(field(4)) {
            Ok(a) if a > 0 => a,
            Ok(a) => {
                result.errors.push(ImportError::at(
                    line,
                    "amount",
                    format!("Amount must be positive, got {}", a),
                ));
                continue;
            }
            Err(e) => {
                result
                    .errors
                    .push(ImportError::at(line, "amount", format!("Invalid amount: {}", e)));
                continue;
            }
        };

        if field(1).is_empty() {
            result
                .errors
                .push(ImportError::at(line, "description", "Missing description"));
            continue;
        }
        if field(2).is_empty() {
            result
                .errors
                .push(ImportError::at(line, "category", "Missing category"));
            continue;
        }

        result.transactions.push(NewTransaction::new(
            kind,
            amount_cents,
            field(2),
            field(1),
            date,
        ));
    }

    Ok(result)
}

/// Read a full JSON snapshot as written by `Exporter::export_full_json`.
pub fn read_snapshot_json<R: Read>(reader: R) -> Result<LedgerSnapshot> {
    serde_json::from_reader(reader).context("Invalid snapshot JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_transactions_csv() {
        let data = "\
date,description,category,type,amount
2024-05-10,Mercado,Alimentação,expense,50.00
2024-05-01,Salário mensal,Salário,receita,\"5.000,00\"
";
        let result = read_transactions_csv(data.as_bytes()).unwrap();

        assert!(result.errors.is_empty());
        assert_eq!(result.transactions.len(), 2);
        assert_eq!(result.transactions[0].amount_cents, 5000);
        assert_eq!(result.transactions[0].kind, TransactionType::Expense);
        assert_eq!(result.transactions[1].amount_cents, 500000);
        assert_eq!(result.transactions[1].kind, TransactionType::Income);
    }

    #[test]
    fn test_bad_rows_are_reported_with_line_numbers() {
        let data = "\
date,description,category,type,amount
10/05/2024,Mercado,Alimentação,expense,50.00
2024-05-10,Mercado,Alimentação,transfer,50.00
2024-05-10,Mercado,Alimentação,expense,abc
2024-05-10,Mercado,Alimentação,expense,0
2024-05-10,,Alimentação,expense,10
2024-05-11,Cinema,Lazer,expense,30
";
        let result = read_transactions_csv(data.as_bytes()).unwrap();

        assert_eq!(result.transactions.len(), 1);
        let fields: Vec<(usize, Option<&str>)> = result
            .errors
            .iter()
            .map(|e| (e.line, e.field.as_deref()))
            .collect();
        assert_eq!(
            fields,
            [
                (2, Some("date")),
                (3, Some("type")),
                (4, Some("amount")),
                (5, Some("amount")),
                (6, Some("description")),
            ]
        );
    }

    #[test]
    fn test_read_snapshot_json_rejects_garbage() {
        assert!(read_snapshot_json("not json".as_bytes()).is_err());
    }
}
