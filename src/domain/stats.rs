use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Cents, PeriodType, Transaction};

/// Aggregate figures derived from the transaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Income minus expenses over the whole history
    pub total_balance: Cents,
    pub monthly_income: Cents,
    pub monthly_expenses: Cents,
    pub yearly_income: Cents,
    pub yearly_expenses: Cents,
}

impl Stats {
    pub fn monthly_net(&self) -> Cents {
        self.monthly_income - self.monthly_expenses
    }

    /// Share of this month's income that was not spent, in whole percent.
    /// `None` when there is no income this month.
    pub fn savings_rate(&self) -> Option<i64> {
        if self.monthly_income <= 0 {
            return None;
        }
        Some((self.monthly_net() as f64 / self.monthly_income as f64 * 100.0).round() as i64)
    }

    /// Share of this month's income that was spent, in whole percent.
    pub fn expense_ratio(&self) -> Option<i64> {
        if self.monthly_income <= 0 {
            return None;
        }
        Some((self.monthly_expenses as f64 / self.monthly_income as f64 * 100.0).round() as i64)
    }

    pub fn is_saving(&self) -> bool {
        self.monthly_income > self.monthly_expenses
    }
}

/// Compute stats as of `today`. Month and year windows are calendar-based;
/// the balance is unfiltered by date.
pub fn compute_stats(transactions: &[Transaction], today: NaiveDate) -> Stats {
    transactions.iter().fold(Stats::default(), |mut stats, t| {
        stats.total_balance = stats.total_balance.saturating_add(t.signed_amount());

        if t.date.year() == today.year() {
            let same_month = t.date.month() == today.month();
            if t.is_income() {
                stats.yearly_income = stats.yearly_income.saturating_add(t.amount_cents);
                if same_month {
                    stats.monthly_income = stats.monthly_income.saturating_add(t.amount_cents);
                }
            } else {
                stats.yearly_expenses = stats.yearly_expenses.saturating_add(t.amount_cents);
                if same_month {
                    stats.monthly_expenses = stats.monthly_expenses.saturating_add(t.amount_cents);
                }
            }
        }
        stats
    })
}

/// Sum of expense amounts whose category equals `category`, across all dates.
pub fn compute_category_spent(category: &str, transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.category == category)
        .fold(0, |sum: Cents, t| sum.saturating_add(t.amount_cents))
}

/// Like [`compute_category_spent`], restricted to the period containing `today`.
pub fn compute_category_spent_in_period(
    category: &str,
    transactions: &[Transaction],
    period: PeriodType,
    today: NaiveDate,
) -> Cents {
    let (start, end) = period.current_period(today);
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.category == category)
        .filter(|t| t.date >= start && t.date < end)
        .fold(0, |sum: Cents, t| sum.saturating_add(t.amount_cents))
}
