mod common;

use anyhow::Result;
use common::{expense, open, parse_date, seeded_service, test_service};
use monefy::application::AppError;
use monefy::domain::{BudgetScope, Clock, NewBudget};
use monefy::{AppConfig, FinanceService};
use tempfile::TempDir;

#[tokio::test]
async fn test_first_start_uses_demo_data() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    assert_eq!(service.ledger().transactions().len(), 5);
    assert_eq!(service.ledger().budgets().len(), 3);
    assert_eq!(service.stats().total_balance, 410000);
    assert_eq!(service.get_budget("Alimentação")?.spent_cents, 35000);

    Ok(())
}

#[tokio::test]
async fn test_demo_data_is_saved_on_first_start() -> Result<()> {
    let temp = TempDir::new()?;

    let id = {
        let service = open(&temp, true).await?;
        assert_eq!(service.repository().list_snapshots().await?.len(), 1);
        service.ledger().transactions()[0].id
    };

    let mut service = open(&temp, true).await?;
    assert_eq!(service.repository().list_snapshots().await?.len(), 1);
    let removed = service.delete_transaction(id).await?;
    assert_eq!(removed.id, id);
    assert_eq!(service.ledger().transactions().len(), 4);

    Ok(())
}

#[tokio::test]
async fn test_no_seed_starts_empty() -> Result<()> {
    let (service, _temp) = test_service().await?;
    assert!(service.ledger().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_state_survives_reopen() -> Result<()> {
    let temp = TempDir::new()?;

    {
        let mut service = open(&temp, false).await?;
        service
            .create_budget(NewBudget::monthly("Alimentação", 80000))
            .await?;
        service
            .add_transaction(expense(4200, "Alimentação", "Feira", "2024-05-11"))
            .await?;
        service
            .add_goal(
                "Viagem".into(),
                300000,
                parse_date("2024-12-31"),
                None,
            )
            .await?;
    }

    let service = open(&temp, true).await?;
    assert_eq!(service.ledger().transactions().len(), 1);
    assert_eq!(service.ledger().goals().len(), 1);
    assert_eq!(service.get_budget("Alimentação")?.spent_cents, 4200);
    assert_eq!(service.ledger().goals()[0].category, "Reserva");

    Ok(())
}

#[tokio::test]
async fn test_every_mutation_saves_a_snapshot() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    let t = service
        .add_transaction(expense(1000, "Lazer", "Cinema", "2024-05-11"))
        .await?;
    service.delete_transaction(t.id).await?;

    let history = service.repository().list_snapshots().await?;
    assert_eq!(history.len(), 2);
    // Newest first
    assert_eq!(history[0].transaction_count, 0);
    assert_eq!(history[1].transaction_count, 1);

    Ok(())
}

#[tokio::test]
async fn test_reset_requires_confirmation() -> Result<()> {
    let (mut service, temp) = seeded_service().await?;

    let result = service.reset("resetar").await;
    assert!(matches!(result, Err(AppError::ResetNotConfirmed { .. })));
    assert_eq!(service.ledger().transactions().len(), 5);

    service.connect_whatsapp("+55 11 99999-9999").await?;
    service.reset("RESETAR").await?;
    assert!(service.ledger().is_empty());
    assert!(!service.whatsapp_status().await?.connected);
    drop(service);

    // The empty state is kept; demo data does not come back
    let reopened = open(&temp, true).await?;
    assert!(reopened.ledger().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_goal_lifecycle() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    let goal = service
        .add_goal(
            "Reserva de emergência".into(),
            100000,
            parse_date("2024-12-31"),
            Some("Poupança".into()),
        )
        .await?;

    let goal = service.contribute_to_goal(goal.id, 60000).await?;
    assert_eq!(goal.current_cents, 60000);
    assert!(!goal.is_reached());

    let goal = service.contribute_to_goal(goal.id, 50000).await?;
    assert!(goal.is_reached());
    assert!((goal.progress_percentage() - 100.0).abs() < 1e-9);

    // Withdrawals never go below zero
    let goal = service.contribute_to_goal(goal.id, -500000).await?;
    assert_eq!(goal.current_cents, 0);

    let zero = service.contribute_to_goal(goal.id, 0).await;
    assert!(matches!(zero, Err(AppError::InvalidAmount(_))));

    let prefix = goal.id.to_string()[..8].to_string();
    let id = service.resolve_goal_id(&prefix)?;
    service.delete_goal(id).await?;
    assert!(service.ledger().goals().is_empty());
    assert!(matches!(
        service.delete_goal(id).await,
        Err(AppError::GoalNotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn test_period_scope_ignores_old_expenses() -> Result<()> {
    let temp = TempDir::new()?;
    let config = AppConfig::new(temp.path().join("scope.db"))
        .with_seed(false)
        .with_budget_scope(BudgetScope::CurrentPeriod);
    let mut service = FinanceService::open(config)
        .await?
        .with_clock(Clock::Fixed(parse_date("2024-05-15")));

    service
        .create_budget(NewBudget::monthly("Alimentação", 80000))
        .await?;
    service
        .add_transaction(expense(10000, "Alimentação", "Mercado abril", "2024-04-28"))
        .await?;
    service
        .add_transaction(expense(2500, "Alimentação", "Mercado maio", "2024-05-02"))
        .await?;

    assert_eq!(service.get_budget("Alimentação")?.spent_cents, 2500);

    Ok(())
}

#[tokio::test]
async fn test_reports() -> Result<()> {
    let (service, _temp) = seeded_service().await?;

    let report = service.income_expense_report(parse_date("2024-05-01"), parse_date("2024-05-31"));
    assert_eq!(report.total_income, 580000);
    assert_eq!(report.total_expense, 170000);
    assert_eq!(report.net, 410000);
    assert_eq!(report.expense_categories[0].category, "Moradia");

    let cash_flow = service.cash_flow_report(2);
    assert_eq!(cash_flow.periods.len(), 2);
    assert_eq!(cash_flow.periods[1].inflow, 580000);
    assert_eq!(cash_flow.periods[0].inflow, 0);

    Ok(())
}

#[tokio::test]
async fn test_failed_save_leaves_ledger_unchanged() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    service
        .create_budget(NewBudget::monthly("Lazer", 20000))
        .await?;

    sqlx::query("DROP TABLE ledger_snapshots")
        .execute(service.repository().pool())
        .await?;

    let result = service
        .add_transaction(expense(1000, "Lazer", "Cinema", "2024-05-11"))
        .await;
    assert!(matches!(result, Err(AppError::Database(_))));
    assert!(service.ledger().transactions().is_empty());
    assert_eq!(service.get_budget("Lazer")?.spent_cents, 0);

    let result = service.chat("gastei 30 com cinema").await;
    assert!(matches!(result, Err(AppError::Database(_))));
    assert!(service.ledger().transactions().is_empty());

    let result = service.delete_budget("Lazer").await;
    assert!(matches!(result, Err(AppError::Database(_))));
    assert!(service.get_budget("Lazer").is_ok());

    Ok(())
}
