use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    compute_category_spent, compute_category_spent_in_period, compute_stats, Budget, BudgetId,
    CategoryCatalog, Cents, Goal, GoalId, NewBudget, NewTransaction, Stats, Transaction,
    TransactionId, TransactionQuery,
};

/// Which transactions feed a budget's `spent` total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetScope {
    /// Every expense in the category, regardless of date
    #[default]
    AllTime,
    /// Only expenses inside the budget's period containing today
    CurrentPeriod,
}

impl BudgetScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetScope::AllTime => "all-time",
            BudgetScope::CurrentPeriod => "period",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all-time" | "all" => Some(BudgetScope::AllTime),
            "period" | "current-period" => Some(BudgetScope::CurrentPeriod),
            _ => None,
        }
    }
}

impl std::str::FromStr for BudgetScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BudgetScope::from_str(s).ok_or_else(|| format!("unknown budget scope '{}'", s))
    }
}

/// Source of "today" for date-windowed computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

/// Full serializable ledger state, used for persistence and JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    InvalidAmount(Cents),
    MissingField(&'static str),
    TransactionNotFound(TransactionId),
    BudgetNotFound(BudgetId),
    GoalNotFound(GoalId),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::InvalidAmount(cents) => {
                write!(f, "Amount must be positive, got {} cents", cents)
            }
            LedgerError::MissingField(field) => write!(f, "Missing required field: {}", field),
            LedgerError::TransactionNotFound(id) => write!(f, "Transaction not found: {}", id),
            LedgerError::BudgetNotFound(id) => write!(f, "Budget not found: {}", id),
            LedgerError::GoalNotFound(id) => write!(f, "Goal not found: {}", id),
        }
    }
}

impl std::error::Error for LedgerError {}

fn validate_transaction_fields(
    amount_cents: Cents,
    category: &str,
    description: &str,
) -> Result<(), LedgerError> {
    if amount_cents <= 0 {
        return Err(LedgerError::InvalidAmount(amount_cents));
    }
    if description.trim().is_empty() {
        return Err(LedgerError::MissingField("description"));
    }
    if category.trim().is_empty() {
        return Err(LedgerError::MissingField("category"));
    }
    Ok(())
}

fn validate_budget_fields(category: &str, limit_cents: Cents) -> Result<(), LedgerError> {
    if limit_cents <= 0 {
        return Err(LedgerError::InvalidAmount(limit_cents));
    }
    if category.trim().is_empty() {
        return Err(LedgerError::MissingField("category"));
    }
    Ok(())
}

/// In-memory store of transactions, budgets and goals.
///
/// Every transaction mutation ends by recomputing budget totals, so
/// `Budget::spent_cents` always reflects the current transaction list.
/// Invalid input is rejected before anything is changed.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    goals: Vec<Goal>,
    categories: CategoryCatalog,
    scope: BudgetScope,
    clock: Clock,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demo data set used on first start.
    pub fn seeded() -> Self {
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
        let mut ledger = Self::new();

        ledger.transactions = [
            NewTransaction::income(500000, "Salário", "Salário mensal", ymd(2024, 5, 1)),
            NewTransaction::expense(120000, "Moradia", "Aluguel", ymd(2024, 5, 5)),
            NewTransaction::expense(35000, "Alimentação", "Supermercado", ymd(2024, 5, 10)),
            NewTransaction::income(80000, "Freelance", "Projeto web", ymd(2024, 5, 15)),
            NewTransaction::expense(15000, "Transporte", "Combustível", ymd(2024, 5, 20)),
        ]
        .into_iter()
        .map(|t| t.into_transaction(Uuid::new_v4()))
        .collect();

        ledger.budgets = [
            NewBudget::monthly("Alimentação", 80000),
            NewBudget::monthly("Transporte", 40000),
            NewBudget::monthly("Lazer", 30000),
        ]
        .into_iter()
        .map(|b| b.into_budget(Uuid::new_v4()))
        .collect();

        ledger.recompute_budgets();
        ledger
    }

    pub fn with_budget_scope(mut self, scope: BudgetScope) -> Self {
        self.scope = scope;
        self.recompute_budgets();
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self.recompute_budgets();
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn budget_scope(&self) -> BudgetScope {
        self.scope
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn categories(&self) -> &CategoryCatalog {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.budgets.is_empty() && self.goals.is_empty()
    }

    // ========================
    // Transactions
    // ========================

    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Assign an id, append, and recompute budgets.
    pub fn add_transaction(&mut self, input: NewTransaction) -> Result<Transaction, LedgerError> {
        validate_transaction_fields(input.amount_cents, &input.category, &input.description)?;

        let transaction = input.into_transaction(Uuid::new_v4());
        self.transactions.push(transaction.clone());
        self.recompute_budgets();
        Ok(transaction)
    }

    /// Replace the transaction with the same id wholesale.
    pub fn update_transaction(&mut self, transaction: Transaction) -> Result<(), LedgerError> {
        validate_transaction_fields(
            transaction.amount_cents,
            &transaction.category,
            &transaction.description,
        )?;

        let slot = self
            .transactions
            .iter_mut()
            .find(|t| t.id == transaction.id)
            .ok_or(LedgerError::TransactionNotFound(transaction.id))?;
        *slot = transaction;
        self.recompute_budgets();
        Ok(())
    }

    pub fn delete_transaction(&mut self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(LedgerError::TransactionNotFound(id))?;
        let removed = self.transactions.remove(index);
        self.recompute_budgets();
        Ok(removed)
    }

    pub fn query(&self, query: &TransactionQuery) -> Vec<&Transaction> {
        query.apply(&self.transactions)
    }

    /// The expense with the highest amount; the earliest recorded wins ties.
    pub fn largest_expense(&self) -> Option<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.is_expense())
            .fold(None, |best: Option<&Transaction>, t| match best {
                Some(b) if b.amount_cents >= t.amount_cents => Some(b),
                _ => Some(t),
            })
    }

    // ========================
    // Budgets
    // ========================

    pub fn budget(&self, id: BudgetId) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.id == id)
    }

    pub fn budget_for_category(&self, category: &str) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.category == category)
    }

    pub fn add_budget(&mut self, input: NewBudget) -> Result<Budget, LedgerError> {
        validate_budget_fields(&input.category, input.limit_cents)?;

        let mut budget = input.into_budget(Uuid::new_v4());
        budget.spent_cents = self.spent_for(&budget);
        self.budgets.push(budget.clone());
        Ok(budget)
    }

    /// Replace the budget with the same id. The caller's `spent_cents` is
    /// ignored; the stored value is derived from the transactions.
    pub fn update_budget(&mut self, mut budget: Budget) -> Result<Budget, LedgerError> {
        validate_budget_fields(&budget.category, budget.limit_cents)?;

        budget.spent_cents = self.spent_for(&budget);
        let slot = self
            .budgets
            .iter_mut()
            .find(|b| b.id == budget.id)
            .ok_or(LedgerError::BudgetNotFound(budget.id))?;
        *slot = budget.clone();
        Ok(budget)
    }

    pub fn delete_budget(&mut self, id: BudgetId) -> Result<Budget, LedgerError> {
        let index = self
            .budgets
            .iter()
            .position(|b| b.id == id)
            .ok_or(LedgerError::BudgetNotFound(id))?;
        Ok(self.budgets.remove(index))
    }

    fn spent_for(&self, budget: &Budget) -> Cents {
        match self.scope {
            BudgetScope::AllTime => compute_category_spent(&budget.category, &self.transactions),
            BudgetScope::CurrentPeriod => compute_category_spent_in_period(
                &budget.category,
                &self.transactions,
                budget.period,
                self.today(),
            ),
        }
    }

    /// Recompute every budget's `spent_cents`. Returns true if any value changed.
    pub fn recompute_budgets(&mut self) -> bool {
        let totals: Vec<Cents> = self.budgets.iter().map(|b| self.spent_for(b)).collect();

        let mut changed = false;
        for (budget, spent) in self.budgets.iter_mut().zip(totals) {
            if budget.spent_cents != spent {
                budget.spent_cents = spent;
                changed = true;
            }
        }
        changed
    }

    // ========================
    // Goals
    // ========================

    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn add_goal(
        &mut self,
        name: String,
        target_cents: Cents,
        deadline: NaiveDate,
        category: Option<String>,
    ) -> Result<Goal, LedgerError> {
        if name.trim().is_empty() {
            return Err(LedgerError::MissingField("name"));
        }
        if target_cents <= 0 {
            return Err(LedgerError::InvalidAmount(target_cents));
        }

        let goal = Goal::new(name, target_cents, deadline, category);
        self.goals.push(goal.clone());
        Ok(goal)
    }

    /// Add to (or withdraw from, when negative) a goal's saved amount.
    pub fn contribute_to_goal(
        &mut self,
        id: GoalId,
        amount_cents: Cents,
    ) -> Result<Goal, LedgerError> {
        if amount_cents == 0 {
            return Err(LedgerError::InvalidAmount(amount_cents));
        }
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(LedgerError::GoalNotFound(id))?;
        goal.contribute(amount_cents);
        Ok(goal.clone())
    }

    pub fn delete_goal(&mut self, id: GoalId) -> Result<Goal, LedgerError> {
        let index = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or(LedgerError::GoalNotFound(id))?;
        Ok(self.goals.remove(index))
    }

    // ========================
    // Stats and state
    // ========================

    /// Stats as of the ledger's clock.
    pub fn calculate_stats(&self) -> Stats {
        self.calculate_stats_at(self.today())
    }

    pub fn calculate_stats_at(&self, today: NaiveDate) -> Stats {
        compute_stats(&self.transactions, today)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            transactions: self.transactions.clone(),
            budgets: self.budgets.clone(),
            goals: self.goals.clone(),
        }
    }

    /// Replace all state with a snapshot. Budget totals in the snapshot are
    /// discarded and recomputed. A snapshot with invalid records is rejected
    /// as a whole.
    pub fn load(&mut self, snapshot: LedgerSnapshot) -> Result<(), LedgerError> {
        for t in &snapshot.transactions {
            validate_transaction_fields(t.amount_cents, &t.category, &t.description)?;
        }
        for b in &snapshot.budgets {
            validate_budget_fields(&b.category, b.limit_cents)?;
        }
        for g in &snapshot.goals {
            if g.target_cents <= 0 {
                return Err(LedgerError::InvalidAmount(g.target_cents));
            }
        }

        self.transactions = snapshot.transactions;
        self.budgets = snapshot.budgets;
        self.goals = snapshot.goals;
        self.recompute_budgets();
        Ok(())
    }

    /// Drop all transactions, budgets and goals.
    pub fn clear(&mut self) {
        self.transactions.clear();
        self.budgets.clear();
        self.goals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PeriodType, TransactionType};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn fixed(day: &str) -> Ledger {
        Ledger::new().with_clock(Clock::Fixed(date(day)))
    }

    fn spent(ledger: &Ledger, category: &str) -> Cents {
        ledger.budget_for_category(category).unwrap().spent_cents
    }

    #[test]
    fn test_seeded_budgets_match_transactions() {
        let ledger = Ledger::seeded();
        assert_eq!(ledger.transactions().len(), 5);
        assert_eq!(spent(&ledger, "Alimentação"), 35000);
        assert_eq!(spent(&ledger, "Transporte"), 15000);
        assert_eq!(spent(&ledger, "Lazer"), 0);
        assert_eq!(ledger.calculate_stats().total_balance, 410000);
    }

    #[test]
    fn test_add_transaction_assigns_unique_ids() {
        let mut ledger = fixed("2024-05-15");
        let a = ledger
            .add_transaction(NewTransaction::expense(100, "Lazer", "a", date("2024-05-01")))
            .unwrap();
        let b = ledger
            .add_transaction(NewTransaction::expense(100, "Lazer", "b", date("2024-05-01")))
            .unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(ledger.transaction(a.id), Some(&a));
    }

    #[test]
    fn test_total_balance_is_signed_sum() {
        let mut ledger = fixed("2024-05-15");
        let inputs = [
            (TransactionType::Income, 100000, "2024-05-01"),
            (TransactionType::Expense, 2550, "2021-02-03"),
            (TransactionType::Expense, 99999, "2024-05-14"),
            (TransactionType::Income, 1, "2030-01-01"),
        ];
        let mut expected = 0;
        for (kind, amount, day) in inputs {
            ledger
                .add_transaction(NewTransaction::new(kind, amount, "Outros", "x", date(day)))
                .unwrap();
            expected += match kind {
                TransactionType::Income => amount,
                TransactionType::Expense => -amount,
            };
            assert_eq!(ledger.calculate_stats().total_balance, expected);
        }
    }

    #[test]
    fn test_add_expense_increases_budget_spent() {
        let mut ledger = fixed("2024-05-15");
        ledger
            .add_budget(NewBudget::monthly("Alimentação", 80000))
            .unwrap();
        let before = spent(&ledger, "Alimentação");

        ledger
            .add_transaction(NewTransaction::expense(
                10000,
                "Alimentação",
                "Feira",
                date("2024-05-15"),
            ))
            .unwrap();

        assert_eq!(spent(&ledger, "Alimentação"), before + 10000);
    }

    #[test]
    fn test_income_does_not_count_towards_budget() {
        let mut ledger = fixed("2024-05-15");
        ledger.add_budget(NewBudget::monthly("Vendas", 1000)).unwrap();
        ledger
            .add_transaction(NewTransaction::income(5000, "Vendas", "Bicicleta", date("2024-05-02")))
            .unwrap();
        assert_eq!(spent(&ledger, "Vendas"), 0);
    }

    #[test]
    fn test_delete_excludes_amount_from_sums() {
        let mut ledger = fixed("2024-05-15");
        ledger.add_budget(NewBudget::monthly("Lazer", 30000)).unwrap();
        let keep = ledger
            .add_transaction(NewTransaction::expense(2000, "Lazer", "Cinema", date("2024-05-03")))
            .unwrap();
        let gone = ledger
            .add_transaction(NewTransaction::expense(5000, "Lazer", "Show", date("2024-05-04")))
            .unwrap();

        let removed = ledger.delete_transaction(gone.id).unwrap();
        assert_eq!(removed, gone);

        let stats = ledger.calculate_stats();
        assert_eq!(stats.total_balance, -keep.amount_cents);
        assert_eq!(stats.monthly_expenses, 2000);
        assert_eq!(stats.yearly_expenses, 2000);
        assert_eq!(spent(&ledger, "Lazer"), 2000);
    }

    #[test]
    fn test_update_moves_amount_between_budgets() {
        let mut ledger = fixed("2024-05-15");
        ledger.add_budget(NewBudget::monthly("Lazer", 30000)).unwrap();
        ledger.add_budget(NewBudget::monthly("Compras", 30000)).unwrap();
        let mut tx = ledger
            .add_transaction(NewTransaction::expense(4500, "Lazer", "Tênis", date("2024-05-03")))
            .unwrap();
        assert_eq!(spent(&ledger, "Lazer"), 4500);

        tx.category = "Compras".to_string();
        ledger.update_transaction(tx).unwrap();

        assert_eq!(spent(&ledger, "Lazer"), 0);
        assert_eq!(spent(&ledger, "Compras"), 4500);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut ledger = Ledger::seeded();
        let before = ledger.budgets().to_vec();

        assert!(!ledger.recompute_budgets());
        assert!(!ledger.recompute_budgets());
        assert_eq!(ledger.budgets(), before.as_slice());
    }

    #[test]
    fn test_rejects_non_positive_amount_without_mutation() {
        let mut ledger = fixed("2024-05-15");
        for amount in [0, -100] {
            let result = ledger.add_transaction(NewTransaction::expense(
                amount,
                "Lazer",
                "x",
                date("2024-05-01"),
            ));
            assert_eq!(result, Err(LedgerError::InvalidAmount(amount)));
        }
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn test_rejects_missing_fields() {
        let mut ledger = fixed("2024-05-15");
        let result =
            ledger.add_transaction(NewTransaction::expense(100, " ", "x", date("2024-05-01")));
        assert_eq!(result, Err(LedgerError::MissingField("category")));

        let result =
            ledger.add_transaction(NewTransaction::expense(100, "Lazer", "", date("2024-05-01")));
        assert_eq!(result, Err(LedgerError::MissingField("description")));
    }

    #[test]
    fn test_update_rejects_invalid_and_keeps_original() {
        let mut ledger = fixed("2024-05-15");
        let tx = ledger
            .add_transaction(NewTransaction::expense(100, "Lazer", "x", date("2024-05-01")))
            .unwrap();
        let mut bad = tx.clone();
        bad.amount_cents = 0;
        assert!(ledger.update_transaction(bad).is_err());
        assert_eq!(ledger.transaction(tx.id), Some(&tx));
    }

    #[test]
    fn test_not_found_is_reported() {
        let mut ledger = fixed("2024-05-15");
        let missing = Uuid::new_v4();
        assert_eq!(
            ledger.delete_transaction(missing),
            Err(LedgerError::TransactionNotFound(missing))
        );

        let ghost = NewTransaction::expense(100, "Lazer", "x", date("2024-05-01"))
            .into_transaction(missing);
        assert_eq!(
            ledger.update_transaction(ghost),
            Err(LedgerError::TransactionNotFound(missing))
        );
        assert_eq!(
            ledger.delete_budget(missing),
            Err(LedgerError::BudgetNotFound(missing))
        );
        assert_eq!(
            ledger.contribute_to_goal(missing, 100),
            Err(LedgerError::GoalNotFound(missing))
        );
    }

    #[test]
    fn test_update_budget_ignores_caller_spent() {
        let mut ledger = Ledger::seeded();
        let mut budget = ledger.budget_for_category("Alimentação").unwrap().clone();
        budget.spent_cents = 1;
        budget.limit_cents = 90000;

        let updated = ledger.update_budget(budget).unwrap();
        assert_eq!(updated.spent_cents, 35000);
        assert_eq!(updated.limit_cents, 90000);
    }

    #[test]
    fn test_add_budget_derives_spent_from_history() {
        let mut ledger = Ledger::seeded();
        let budget = ledger.add_budget(NewBudget::monthly("Moradia", 150000)).unwrap();
        assert_eq!(budget.spent_cents, 120000);
    }

    #[test]
    fn test_stats_with_fixed_date() {
        let mut ledger = fixed("2024-05-15");
        ledger
            .add_transaction(NewTransaction::income(100000, "Salário", "s", date("2024-05-01")))
            .unwrap();
        ledger
            .add_transaction(NewTransaction::expense(30000, "Moradia", "a", date("2024-05-10")))
            .unwrap();
        ledger
            .add_transaction(NewTransaction::expense(5000, "Lazer", "b", date("2023-12-01")))
            .unwrap();

        let stats = ledger.calculate_stats();
        assert_eq!(stats.monthly_income, 100000);
        assert_eq!(stats.monthly_expenses, 30000);
        assert_eq!(stats.total_balance, 65000);
        assert_eq!(stats.yearly_expenses, 30000);
    }

    #[test]
    fn test_period_scope_windows_budget() {
        let mut ledger = Ledger::new()
            .with_clock(Clock::Fixed(date("2024-05-15")))
            .with_budget_scope(BudgetScope::CurrentPeriod);
        ledger
            .add_budget(NewBudget::new("Lazer", 30000, PeriodType::Weekly))
            .unwrap();
        ledger
            .add_transaction(NewTransaction::expense(1000, "Lazer", "in", date("2024-05-13")))
            .unwrap();
        ledger
            .add_transaction(NewTransaction::expense(2000, "Lazer", "out", date("2024-05-12")))
            .unwrap();

        assert_eq!(spent(&ledger, "Lazer"), 1000);
    }

    #[test]
    fn test_largest_expense() {
        let ledger = Ledger::seeded();
        let largest = ledger.largest_expense().unwrap();
        assert_eq!(largest.description, "Aluguel");
        assert!(Ledger::new().largest_expense().is_none());
    }

    #[test]
    fn test_snapshot_load_recomputes_spent() {
        let source = Ledger::seeded();
        let mut snapshot = source.snapshot();
        for budget in &mut snapshot.budgets {
            budget.spent_cents = 999;
        }

        let mut ledger = Ledger::new();
        ledger.load(snapshot).unwrap();

        assert_eq!(ledger.transactions(), source.transactions());
        assert_eq!(ledger.budgets(), source.budgets());
    }

    #[test]
    fn test_load_rejects_invalid_snapshot() {
        let mut snapshot = Ledger::seeded().snapshot();
        snapshot.transactions[0].amount_cents = -1;

        let mut ledger = Ledger::new();
        assert!(ledger.load(snapshot).is_err());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_goals_lifecycle() {
        let mut ledger = fixed("2024-05-15");
        let goal = ledger
            .add_goal("Emergência".into(), 1000000, date("2024-12-31"), None)
            .unwrap();
        let goal = ledger.contribute_to_goal(goal.id, 350000).unwrap();
        assert_eq!(goal.current_cents, 350000);

        assert!(ledger.add_goal("".into(), 100, date("2024-12-31"), None).is_err());
        assert!(ledger.contribute_to_goal(goal.id, 0).is_err());

        ledger.delete_goal(goal.id).unwrap();
        assert!(ledger.goals().is_empty());
    }
}
