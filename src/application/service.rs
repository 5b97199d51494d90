use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::assistant::{Assistant, Reply};
use crate::config::AppConfig;
use crate::domain::{
    is_valid_phone, Budget, BudgetHealth, Cents, Clock, Goal, GoalId, Ledger, LedgerSnapshot,
    NewBudget, NewTransaction, NotificationPreferences, PeriodType, Stats, Transaction,
    TransactionId, TransactionQuery, TransactionType, WhatsAppConnection,
    NOTIFICATION_PREFERENCES_KEY, WHATSAPP_CONNECTED_KEY, WHATSAPP_PHONE_KEY,
};
use crate::storage::Repository;

use super::reporting::{
    build_cash_flow_report, build_category_report, build_income_expense_report, CashFlowReport,
    CategoryReport, IncomeExpenseReport,
};
use super::AppError;

/// Word the user must type to wipe all data.
pub const RESET_CONFIRMATION: &str = "RESETAR";

pub const SALARY_CATEGORY: &str = "Salário";

/// Partial edit of a transaction; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub kind: Option<TransactionType>,
    pub amount_cents: Option<Cents>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

/// Budget status information
#[derive(Debug, Clone)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub percentage: f64,
    pub health: BudgetHealth,
    /// Usage reached the user's alert threshold
    pub alert: bool,
}

/// Application service providing high-level operations over the ledger.
///
/// Holds the in-memory [`Ledger`] and writes a snapshot to the repository
/// after every successful mutation. A mutation only becomes visible once its
/// snapshot is saved.
pub struct FinanceService {
    ledger: Ledger,
    repo: Repository,
    assistant: Assistant,
    config: AppConfig,
}

impl FinanceService {
    /// Open the database and restore the latest snapshot. With nothing saved,
    /// starts from the demo data set when the config allows it.
    pub async fn open(config: AppConfig) -> Result<Self, AppError> {
        let repo = Repository::init(&config.database_url()).await?;
        let mut ledger = Ledger::new().with_budget_scope(config.budget_scope);

        match repo.latest_snapshot().await? {
            Some(snapshot) => {
                debug!(
                    transactions = snapshot.transactions.len(),
                    budgets = snapshot.budgets.len(),
                    "restoring snapshot"
                );
                ledger
                    .load(snapshot)
                    .map_err(|e| AppError::InvalidSnapshot(e.to_string()))?;
            }
            None if config.seed_on_empty => {
                info!("no saved data, starting from demo data");
                ledger = Ledger::seeded().with_budget_scope(config.budget_scope);
                repo.save_snapshot(&ledger.snapshot()).await?;
            }
            None => debug!("no saved data, starting empty"),
        }

        Ok(Self {
            ledger,
            repo,
            assistant: Assistant::default(),
            config,
        })
    }

    /// Pin "today" for date-windowed computations.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.ledger = std::mem::take(&mut self.ledger).with_clock(clock);
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Run `op` on a copy of the ledger and save the result. The copy
    /// replaces the live ledger only when both succeed.
    async fn commit<T, E>(
        &mut self,
        op: impl FnOnce(&mut Ledger) -> Result<T, E>,
    ) -> Result<T, AppError>
    where
        AppError: From<E>,
    {
        let mut next = self.ledger.clone();
        let output = op(&mut next)?;
        self.repo.save_snapshot(&next.snapshot()).await?;
        self.ledger = next;
        Ok(output)
    }

    // ========================
    // Transaction operations
    // ========================

    /// Resolve a full id or a unique id prefix.
    pub fn resolve_transaction_id(&self, id_or_prefix: &str) -> Result<TransactionId, AppError> {
        let ids: Vec<_> = self.ledger.transactions().iter().map(|t| t.id).collect();
        resolve_id(&ids, id_or_prefix)
            .ok_or_else(|| AppError::TransactionNotFound(id_or_prefix.to_string()))
    }

    pub fn get_transaction(&self, id: TransactionId) -> Result<&Transaction, AppError> {
        self.ledger
            .transaction(id)
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))
    }

    pub async fn add_transaction(&mut self, input: NewTransaction) -> Result<Transaction, AppError> {
        let transaction = self.commit(|ledger| ledger.add_transaction(input)).await?;
        info!(
            id = %transaction.id,
            kind = transaction.kind.as_str(),
            amount = transaction.amount_cents,
            category = %transaction.category,
            "transaction added"
        );
        Ok(transaction)
    }

    /// Record a monthly salary as income with the standard category and tags.
    pub async fn record_salary(
        &mut self,
        amount_cents: Cents,
        date: NaiveDate,
    ) -> Result<Transaction, AppError> {
        let input = NewTransaction::income(amount_cents, SALARY_CATEGORY, "Salário mensal", date)
            .with_tags(vec!["salário".to_string(), "renda fixa".to_string()]);
        self.add_transaction(input).await
    }

    pub async fn update_transaction(
        &mut self,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, AppError> {
        let mut transaction = self.get_transaction(id)?.clone();
        if let Some(kind) = update.kind {
            transaction.kind = kind;
        }
        if let Some(amount) = update.amount_cents {
            transaction.amount_cents = amount;
        }
        if let Some(category) = update.category {
            transaction.category = category;
        }
        if let Some(description) = update.description {
            transaction.description = description;
        }
        if let Some(date) = update.date {
            transaction.date = date;
        }
        if let Some(tags) = update.tags {
            transaction.tags = tags;
        }

        let updated = transaction.clone();
        self.commit(|ledger| ledger.update_transaction(updated)).await?;
        info!(id = %id, "transaction updated");
        Ok(transaction)
    }

    pub async fn delete_transaction(&mut self, id: TransactionId) -> Result<Transaction, AppError> {
        let removed = self.commit(|ledger| ledger.delete_transaction(id)).await?;
        info!(id = %id, "transaction deleted");
        Ok(removed)
    }

    pub fn list_transactions(&self, query: &TransactionQuery) -> Vec<&Transaction> {
        self.ledger.query(query)
    }

    // ========================
    // Budget operations
    // ========================

    pub fn get_budget(&self, category: &str) -> Result<&Budget, AppError> {
        self.ledger
            .budget_for_category(category)
            .ok_or_else(|| AppError::BudgetNotFound(category.to_string()))
    }

    /// Create a budget. One budget per category.
    pub async fn create_budget(&mut self, input: NewBudget) -> Result<Budget, AppError> {
        if self.ledger.budget_for_category(&input.category).is_some() {
            return Err(AppError::BudgetAlreadyExists(input.category));
        }

        let budget = self.commit(|ledger| ledger.add_budget(input)).await?;
        info!(category = %budget.category, limit = budget.limit_cents, "budget created");
        Ok(budget)
    }

    /// Change a budget's limit and/or period.
    pub async fn update_budget(
        &mut self,
        category: &str,
        limit_cents: Option<Cents>,
        period: Option<PeriodType>,
    ) -> Result<Budget, AppError> {
        let mut budget = self.get_budget(category)?.clone();
        if let Some(limit) = limit_cents {
            budget.limit_cents = limit;
        }
        if let Some(period) = period {
            budget.period = period;
        }

        let budget = self.commit(|ledger| ledger.update_budget(budget)).await?;
        info!(category = %budget.category, "budget updated");
        Ok(budget)
    }

    pub async fn delete_budget(&mut self, category: &str) -> Result<Budget, AppError> {
        let id = self.get_budget(category)?.id;
        let removed = self.commit(|ledger| ledger.delete_budget(id)).await?;
        info!(category, "budget deleted");
        Ok(removed)
    }

    /// Usage and health of every budget, with alerts from the user's threshold.
    pub async fn budget_statuses(&self) -> Result<Vec<BudgetStatus>, AppError> {
        let threshold = f64::from(self.notification_preferences().await?.alert_threshold);

        Ok(self
            .ledger
            .budgets()
            .iter()
            .map(|budget| {
                let percentage = budget.usage_percentage();
                BudgetStatus {
                    budget: budget.clone(),
                    percentage,
                    health: budget.health(),
                    alert: percentage >= threshold,
                }
            })
            .collect())
    }

    // ========================
    // Goal operations
    // ========================

    pub fn resolve_goal_id(&self, id_or_prefix: &str) -> Result<GoalId, AppError> {
        let ids: Vec<_> = self.ledger.goals().iter().map(|g| g.id).collect();
        resolve_id(&ids, id_or_prefix).ok_or_else(|| AppError::GoalNotFound(id_or_prefix.to_string()))
    }

    pub async fn add_goal(
        &mut self,
        name: String,
        target_cents: Cents,
        deadline: NaiveDate,
        category: Option<String>,
    ) -> Result<Goal, AppError> {
        let goal = self
            .commit(|ledger| ledger.add_goal(name, target_cents, deadline, category))
            .await?;
        info!(id = %goal.id, name = %goal.name, target = goal.target_cents, "goal added");
        Ok(goal)
    }

    pub async fn contribute_to_goal(
        &mut self,
        id: GoalId,
        amount_cents: Cents,
    ) -> Result<Goal, AppError> {
        let goal = self
            .commit(|ledger| ledger.contribute_to_goal(id, amount_cents))
            .await?;
        info!(id = %id, amount = amount_cents, current = goal.current_cents, "goal updated");
        Ok(goal)
    }

    pub async fn delete_goal(&mut self, id: GoalId) -> Result<Goal, AppError> {
        let removed = self.commit(|ledger| ledger.delete_goal(id)).await?;
        info!(id = %id, "goal deleted");
        Ok(removed)
    }

    // ========================
    // Stats and reports
    // ========================

    pub fn stats(&self) -> Stats {
        self.ledger.calculate_stats()
    }

    pub fn stats_at(&self, today: NaiveDate) -> Stats {
        self.ledger.calculate_stats_at(today)
    }

    pub fn category_report(
        &self,
        kind: TransactionType,
        from: NaiveDate,
        to: NaiveDate,
    ) -> CategoryReport {
        build_category_report(self.ledger.transactions(), kind, from, to)
    }

    pub fn income_expense_report(&self, from: NaiveDate, to: NaiveDate) -> IncomeExpenseReport {
        build_income_expense_report(self.ledger.transactions(), from, to)
    }

    pub fn cash_flow_report(&self, months: u32) -> CashFlowReport {
        build_cash_flow_report(self.ledger.transactions(), self.ledger.today(), months)
    }

    // ========================
    // Snapshots
    // ========================

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }

    /// Replace all ledger data with the snapshot and persist it.
    pub async fn load_snapshot(&mut self, snapshot: LedgerSnapshot) -> Result<(), AppError> {
        self.commit(|ledger| {
            ledger
                .load(snapshot)
                .map_err(|e| AppError::InvalidSnapshot(e.to_string()))
        })
        .await?;
        info!(
            transactions = self.ledger.transactions().len(),
            budgets = self.ledger.budgets().len(),
            goals = self.ledger.goals().len(),
            "snapshot loaded"
        );
        Ok(())
    }

    // ========================
    // Settings
    // ========================

    /// Stored notification preferences, or the defaults when none are saved
    /// or the stored value is unreadable.
    pub async fn notification_preferences(&self) -> Result<NotificationPreferences, AppError> {
        let Some(raw) = self.repo.get_setting(NOTIFICATION_PREFERENCES_KEY).await? else {
            return Ok(NotificationPreferences::default());
        };
        match serde_json::from_str(&raw) {
            Ok(prefs) => Ok(prefs),
            Err(e) => {
                warn!(error = %e, "stored notification preferences are invalid, using defaults");
                Ok(NotificationPreferences::default())
            }
        }
    }

    pub async fn save_notification_preferences(
        &self,
        prefs: &NotificationPreferences,
    ) -> Result<(), AppError> {
        let raw = serde_json::to_string(prefs)?;
        self.repo.put_setting(NOTIFICATION_PREFERENCES_KEY, &raw).await?;
        info!("notification preferences saved");
        Ok(())
    }

    /// Change one preference by key and save.
    pub async fn update_preference(
        &self,
        key: &str,
        value: &str,
    ) -> Result<NotificationPreferences, AppError> {
        let mut prefs = self.notification_preferences().await?;
        prefs.set(key, value).map_err(AppError::InvalidSetting)?;
        self.save_notification_preferences(&prefs).await?;
        Ok(prefs)
    }

    pub async fn connect_whatsapp(&self, phone: &str) -> Result<WhatsAppConnection, AppError> {
        let phone = phone.trim();
        if !is_valid_phone(phone) {
            return Err(AppError::InvalidPhone(phone.to_string()));
        }

        self.repo.put_setting(WHATSAPP_PHONE_KEY, phone).await?;
        self.repo.put_setting(WHATSAPP_CONNECTED_KEY, "true").await?;
        info!("whatsapp connected");
        Ok(WhatsAppConnection {
            connected: true,
            phone: Some(phone.to_string()),
        })
    }

    pub async fn disconnect_whatsapp(&self) -> Result<(), AppError> {
        self.repo.remove_setting(WHATSAPP_PHONE_KEY).await?;
        self.repo.remove_setting(WHATSAPP_CONNECTED_KEY).await?;
        info!("whatsapp disconnected");
        Ok(())
    }

    pub async fn whatsapp_status(&self) -> Result<WhatsAppConnection, AppError> {
        let connected = self
            .repo
            .get_setting(WHATSAPP_CONNECTED_KEY)
            .await?
            .is_some_and(|v| v == "true");
        let phone = self.repo.get_setting(WHATSAPP_PHONE_KEY).await?;
        Ok(WhatsAppConnection { connected, phone })
    }

    // ========================
    // Assistant and reset
    // ========================

    /// Answer a chat message. Messages that record a transaction are persisted.
    pub async fn chat(&mut self, message: &str) -> Result<Reply, AppError> {
        let mut next = self.ledger.clone();
        let reply = self.assistant.respond(message, &mut next)?;
        if let Reply::Recorded(transaction) = &reply {
            self.repo.save_snapshot(&next.snapshot()).await?;
            self.ledger = next;
            info!(
                id = %transaction.id,
                kind = transaction.kind.as_str(),
                amount = transaction.amount_cents,
                "transaction recorded from chat"
            );
        }
        Ok(reply)
    }

    /// Wipe settings, history and ledger data. Requires the exact
    /// confirmation word. The empty state is saved so the next start does
    /// not fall back to demo data.
    pub async fn reset(&mut self, confirmation: &str) -> Result<(), AppError> {
        if confirmation != RESET_CONFIRMATION {
            return Err(AppError::ResetNotConfirmed {
                expected: RESET_CONFIRMATION,
            });
        }

        self.repo.clear_all().await?;
        self.commit(|ledger| {
            ledger.clear();
            Ok::<_, AppError>(())
        })
        .await?;
        warn!("all data reset");
        Ok(())
    }
}

fn resolve_id(ids: &[uuid::Uuid], id_or_prefix: &str) -> Option<uuid::Uuid> {
    if let Ok(id) = uuid::Uuid::parse_str(id_or_prefix) {
        return ids.contains(&id).then_some(id);
    }

    let prefix = id_or_prefix.to_lowercase();
    if prefix.is_empty() {
        return None;
    }
    let mut matches = ids.iter().filter(|id| id.to_string().starts_with(&prefix));
    match (matches.next(), matches.next()) {
        (Some(id), None) => Some(*id),
        _ => None,
    }
}
