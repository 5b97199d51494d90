use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Transaction, TransactionType};

/// Longest window a cash-flow report covers, in months.
pub const MAX_CASH_FLOW_MONTHS: u32 = 120;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub kind: TransactionType,
    pub categories: Vec<CategorySummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: i64,
    pub average: Cents,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeExpenseReport {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub total_income: Cents,
    pub total_expense: Cents,
    pub net: Cents,
    pub income_categories: Vec<CategorySummary>,
    pub expense_categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowReport {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub periods: Vec<CashFlowPeriod>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowPeriod {
    /// First day of the month
    pub period_start: NaiveDate,
    /// First day of the following month (exclusive)
    pub period_end: NaiveDate,
    pub inflow: Cents,
    pub outflow: Cents,
    pub net: Cents,
}

/// Totals per category for one transaction type within `[from, to]`,
/// largest first. Percentages are shares of the overall total.
pub fn summarize_categories(
    transactions: &[Transaction],
    kind: TransactionType,
    from: NaiveDate,
    to: NaiveDate,
) -> (Vec<CategorySummary>, Cents) {
    let mut totals: BTreeMap<&str, (Cents, i64)> = BTreeMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.kind == kind && t.date >= from && t.date <= to)
    {
        let entry = totals.entry(t.category.as_str()).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(t.amount_cents);
        entry.1 += 1;
    }

    let grand_total = totals
        .values()
        .fold(0, |sum: Cents, (total, _)| sum.saturating_add(*total));
    let mut summaries: Vec<CategorySummary> = totals
        .into_iter()
        .map(|(category, (total, count))| CategorySummary {
            category: category.to_string(),
            total,
            count,
            average: total / count,
            percentage: if grand_total > 0 {
                total as f64 / grand_total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();

    // BTreeMap order breaks ties alphabetically
    summaries.sort_by(|a, b| b.total.cmp(&a.total));
    (summaries, grand_total)
}

pub fn build_category_report(
    transactions: &[Transaction],
    kind: TransactionType,
    from: NaiveDate,
    to: NaiveDate,
) -> CategoryReport {
    let (categories, total) = summarize_categories(transactions, kind, from, to);
    CategoryReport {
        from_date: from,
        to_date: to,
        kind,
        categories,
        total,
    }
}

pub fn build_income_expense_report(
    transactions: &[Transaction],
    from: NaiveDate,
    to: NaiveDate,
) -> IncomeExpenseReport {
    let (income_categories, total_income) =
        summarize_categories(transactions, TransactionType::Income, from, to);
    let (expense_categories, total_expense) =
        summarize_categories(transactions, TransactionType::Expense, from, to);

    IncomeExpenseReport {
        from_date: from,
        to_date: to,
        total_income,
        total_expense,
        net: total_income.saturating_sub(total_expense),
        income_categories,
        expense_categories,
    }
}

/// Month-by-month inflow and outflow for the `months` calendar months
/// ending with the month containing `today`, oldest first. `months` is
/// clamped to `1..=MAX_CASH_FLOW_MONTHS`.
pub fn build_cash_flow_report(
    transactions: &[Transaction],
    today: NaiveDate,
    months: u32,
) -> CashFlowReport {
    let months = months.clamp(1, MAX_CASH_FLOW_MONTHS);
    let current_month = today.with_day(1).unwrap_or(today);
    let first_month = current_month
        .checked_sub_months(Months::new(months - 1))
        .unwrap_or(current_month);

    let mut periods = Vec::with_capacity(months as usize);
    let mut start = first_month;
    for _ in 0..months {
        let end = start
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);

        let (inflow, outflow) = transactions
            .iter()
            .filter(|t| t.date >= start && t.date < end)
            .fold((0 as Cents, 0 as Cents), |(inflow, outflow), t| match t.kind {
                TransactionType::Income => (inflow.saturating_add(t.amount_cents), outflow),
                TransactionType::Expense => (inflow, outflow.saturating_add(t.amount_cents)),
            });

        periods.push(CashFlowPeriod {
            period_start: start,
            period_end: end,
            inflow,
            outflow,
            net: inflow.saturating_sub(outflow),
        });
        start = end;
    }

    CashFlowReport {
        from_date: first_month,
        to_date: today,
        periods,
    }
}
