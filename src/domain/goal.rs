use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type GoalId = Uuid;

pub const DEFAULT_GOAL_CATEGORY: &str = "Reserva";

/// A savings target with a deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub target_cents: Cents,
    /// Never negative
    pub current_cents: Cents,
    pub deadline: NaiveDate,
    pub category: String,
}

impl Goal {
    pub fn new(
        name: impl Into<String>,
        target_cents: Cents,
        deadline: NaiveDate,
        category: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target_cents,
            current_cents: 0,
            deadline,
            category: category.unwrap_or_else(|| DEFAULT_GOAL_CATEGORY.to_string()),
        }
    }

    /// Add (or withdraw, when negative) money. The balance floors at zero.
    pub fn contribute(&mut self, amount_cents: Cents) {
        self.current_cents = self.current_cents.saturating_add(amount_cents).max(0);
    }

    /// Progress towards the target, capped at 100.
    pub fn progress_percentage(&self) -> f64 {
        if self.target_cents <= 0 {
            return 0.0;
        }
        (self.current_cents as f64 / self.target_cents as f64 * 100.0).min(100.0)
    }

    pub fn remaining(&self) -> Cents {
        self.target_cents.saturating_sub(self.current_cents).max(0)
    }

    pub fn is_reached(&self) -> bool {
        self.current_cents >= self.target_cents
    }

    /// Days until the deadline; negative once it has passed.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_contribute_floors_at_zero() {
        let mut goal = Goal::new("Emergência", 1000000, date("2024-12-31"), None);
        goal.contribute(350000);
        assert_eq!(goal.current_cents, 350000);

        goal.contribute(-500000);
        assert_eq!(goal.current_cents, 0);
        assert_eq!(goal.category, DEFAULT_GOAL_CATEGORY);
    }

    #[test]
    fn test_progress_is_capped() {
        let mut goal = Goal::new("Viagem", 800000, date("2024-07-15"), Some("Lazer".into()));
        goal.contribute(210000);
        assert!((goal.progress_percentage() - 26.25).abs() < 1e-9);

        goal.contribute(1000000);
        assert_eq!(goal.progress_percentage(), 100.0);
        assert!(goal.is_reached());
        assert_eq!(goal.remaining(), 0);
    }

    #[test]
    fn test_contribute_saturates() {
        let mut goal = Goal::new("Casa", i64::MAX, date("2030-01-01"), None);
        goal.contribute(i64::MAX);
        goal.contribute(1);
        assert_eq!(goal.current_cents, i64::MAX);
        assert!(goal.is_reached());
    }

    #[test]
    fn test_days_remaining() {
        let goal = Goal::new("Curso", 100000, date("2024-06-01"), None);
        assert_eq!(goal.days_remaining(date("2024-05-15")), 17);
        assert_eq!(goal.days_remaining(date("2024-06-03")), -2);
    }
}
