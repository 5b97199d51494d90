use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type BudgetId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Weekly,
    Monthly,
    Yearly,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Weekly => "weekly",
            PeriodType::Monthly => "monthly",
            PeriodType::Yearly => "yearly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "weekly" | "semanal" => Some(PeriodType::Weekly),
            "monthly" | "mensal" => Some(PeriodType::Monthly),
            "yearly" | "anual" => Some(PeriodType::Yearly),
            _ => None,
        }
    }

    /// Get the `[start, end)` range of the period containing `today`.
    pub fn current_period(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            PeriodType::Weekly => {
                // Week starts on Monday
                let weekday = today.weekday().num_days_from_monday();
                let start = today - Duration::days(weekday as i64);
                (start, start + Duration::days(7))
            }
            PeriodType::Monthly => {
                let start = first_of_month(today.year(), today.month());
                let end = if today.month() == 12 {
                    first_of_month(today.year() + 1, 1)
                } else {
                    first_of_month(today.year(), today.month() + 1)
                };
                (start, end)
            }
            PeriodType::Yearly => (
                first_of_month(today.year(), 1),
                first_of_month(today.year() + 1, 1),
            ),
        }
    }

    pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        let (start, end) = self.current_period(today);
        date >= start && date < end
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // Day 1 exists for every month of every representable year
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-category spending ceiling. `spent_cents` is owned by the ledger and
/// recomputed from transactions; callers cannot set it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub category: String,
    pub limit_cents: Cents,
    #[serde(default)]
    pub spent_cents: Cents,
    pub period: PeriodType,
}

impl Budget {
    pub fn remaining(&self) -> Cents {
        self.limit_cents - self.spent_cents
    }

    /// Share of the limit already spent, in percent. May exceed 100.
    pub fn usage_percentage(&self) -> f64 {
        if self.limit_cents <= 0 {
            return 0.0;
        }
        self.spent_cents as f64 / self.limit_cents as f64 * 100.0
    }

    pub fn health(&self) -> BudgetHealth {
        BudgetHealth::from_percentage(self.usage_percentage())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBudget {
    pub category: String,
    pub limit_cents: Cents,
    pub period: PeriodType,
}

impl NewBudget {
    pub fn new(category: impl Into<String>, limit_cents: Cents, period: PeriodType) -> Self {
        Self {
            category: category.into(),
            limit_cents,
            period,
        }
    }

    pub fn monthly(category: impl Into<String>, limit_cents: Cents) -> Self {
        Self::new(category, limit_cents, PeriodType::Monthly)
    }

    pub fn into_budget(self, id: BudgetId) -> Budget {
        Budget {
            id,
            category: self.category,
            limit_cents: self.limit_cents,
            spent_cents: 0,
            period: self.period,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetHealth {
    Ok,
    Attention,
    Critical,
    Exceeded,
}

impl BudgetHealth {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            BudgetHealth::Exceeded
        } else if percentage >= 90.0 {
            BudgetHealth::Critical
        } else if percentage >= 70.0 {
            BudgetHealth::Attention
        } else {
            BudgetHealth::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetHealth::Ok => "ok",
            BudgetHealth::Attention => "attention",
            BudgetHealth::Critical => "critical",
            BudgetHealth::Exceeded => "exceeded",
        }
    }
}

impl std::fmt::Display for BudgetHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_period_type_roundtrip() {
        for pt in [PeriodType::Weekly, PeriodType::Monthly, PeriodType::Yearly] {
            let parsed = PeriodType::from_str(pt.as_str()).unwrap();
            assert_eq!(pt, parsed);
        }
        assert_eq!(PeriodType::from_str("Mensal"), Some(PeriodType::Monthly));
    }

    #[test]
    fn test_monthly_period() {
        let (start, end) = PeriodType::Monthly.current_period(date("2024-01-15"));
        assert_eq!(start, date("2024-01-01"));
        assert_eq!(end, date("2024-02-01"));
    }

    #[test]
    fn test_monthly_period_december() {
        let (start, end) = PeriodType::Monthly.current_period(date("2024-12-31"));
        assert_eq!(start, date("2024-12-01"));
        assert_eq!(end, date("2025-01-01"));
    }

    #[test]
    fn test_weekly_period_starts_monday() {
        // 2024-05-15 is a Wednesday
        let (start, end) = PeriodType::Weekly.current_period(date("2024-05-15"));
        assert_eq!(start, date("2024-05-13"));
        assert_eq!(end, date("2024-05-20"));
    }

    #[test]
    fn test_yearly_period() {
        let (start, end) = PeriodType::Yearly.current_period(date("2024-06-15"));
        assert_eq!(start, date("2024-01-01"));
        assert_eq!(end, date("2025-01-01"));
        assert!(PeriodType::Yearly.contains(date("2024-06-15"), date("2024-12-31")));
        assert!(!PeriodType::Yearly.contains(date("2024-06-15"), date("2023-12-31")));
    }

    #[test]
    fn test_budget_health_thresholds() {
        let mut budget = NewBudget::monthly("Lazer", 10000).into_budget(Uuid::new_v4());
        assert_eq!(budget.health(), BudgetHealth::Ok);

        budget.spent_cents = 7000;
        assert_eq!(budget.health(), BudgetHealth::Attention);

        budget.spent_cents = 9500;
        assert_eq!(budget.health(), BudgetHealth::Critical);

        budget.spent_cents = 12000;
        assert_eq!(budget.health(), BudgetHealth::Exceeded);
        assert_eq!(budget.remaining(), -2000);
    }
}
