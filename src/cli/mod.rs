use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::application::reporting::{CategorySummary, MAX_CASH_FLOW_MONTHS};
use crate::application::{FinanceService, TransactionUpdate, RESET_CONFIRMATION};
use crate::assistant::Reply;
use crate::config::{AppConfig, DEFAULT_DATABASE};
use crate::domain::{
    format_brl, infer_category, parse_cents, BudgetScope, NewBudget, NewTransaction, PeriodType,
    SortField, SortOrder, Stats, Transaction, TransactionQuery, TransactionType,
};

/// Monefy - Personal Finance Manager
#[derive(Parser)]
#[command(name = "monefy")]
#[command(about = "Track income, expenses, budgets and goals from the terminal")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "MONEFY_DATABASE", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Start with an empty ledger instead of demo data
    #[arg(long, global = true, env = "MONEFY_NO_SEED")]
    pub no_seed: bool,

    /// Which expenses count toward a budget: all-time, period
    #[arg(long, global = true, env = "MONEFY_BUDGET_SCOPE", default_value = "all-time")]
    pub budget_scope: BudgetScope,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database (and the demo data unless --no-seed)
    Init,

    /// Record a transaction
    Add {
        /// Amount (e.g., "50", "50.00" or "R$ 1.234,56")
        amount: String,

        /// Description of the transaction
        #[arg(short, long)]
        description: String,

        /// Category (inferred from the description if omitted)
        #[arg(short, long)]
        category: Option<String>,

        /// Type: income, expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID (or unique prefix)
        id: String,

        #[arg(short, long)]
        amount: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// Type: income, expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Comma-separated tags, replacing the current ones
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID (or unique prefix)
        id: String,
    },

    /// Show a single transaction
    Show {
        /// Transaction ID (or unique prefix)
        id: String,
    },

    /// List transactions
    List {
        /// Search in descriptions
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Filter by type: income, expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Sort by: date, amount, description
        #[arg(long, default_value = "date")]
        sort: String,

        /// Order: asc, desc
        #[arg(long, default_value = "desc")]
        order: String,

        /// Maximum number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Balance and monthly/yearly totals
    Stats {
        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Record a salary payment
    Salary {
        /// Amount
        amount: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List known categories
    Categories {
        /// Type: income, expense (both if omitted)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Generate reports and analytics
    #[command(subcommand)]
    Report(ReportCommands),

    /// Notification and WhatsApp settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Talk to the assistant (interactive when no message is given)
    Chat {
        /// Message, e.g. "gastei 50 com mercado"
        message: Vec<String>,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: transactions, budgets, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import data from CSV or JSON
    Import {
        /// What to import: transactions, full
        import_type: String,

        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,
    },

    /// List saved snapshots
    History,

    /// Delete all data
    Reset {
        /// Confirmation word (prompted if omitted)
        #[arg(long)]
        confirm: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget for a category
    Create {
        /// Category
        category: String,

        /// Limit per period (e.g., "800.00")
        amount: String,

        /// Period type: weekly, monthly, yearly
        #[arg(short, long, default_value = "monthly")]
        period: String,
    },

    /// List all budgets
    List,

    /// Show usage against limits
    Status,

    /// Change a budget's limit or period
    Update {
        /// Category
        category: String,

        /// New limit
        #[arg(short, long)]
        amount: Option<String>,

        /// New period type: weekly, monthly, yearly
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Delete a budget
    Delete {
        /// Category
        category: String,
    },
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Add {
        /// Goal name
        name: String,

        /// Target amount
        target: String,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: String,

        /// Category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List goals and progress
    List,

    /// Add money to a goal
    Contribute {
        /// Goal ID (or unique prefix)
        id: String,

        /// Amount
        amount: String,

        /// Take money out instead
        #[arg(long)]
        withdraw: bool,
    },

    /// Delete a goal
    Delete {
        /// Goal ID (or unique prefix)
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Breakdown by category
    Categories {
        /// Type: income, expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,

        /// Start date (YYYY-MM-DD, defaults to start of current month)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Income vs Expense analysis
    IncomeExpense {
        /// Start date (YYYY-MM-DD, defaults to start of current month)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        to: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Month-by-month cash flow
    Cashflow {
        /// Number of months, ending with the current one
        #[arg(
            short,
            long,
            default_value = "6",
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_CASH_FLOW_MONTHS))
        )]
        months: u32,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show notification preferences and WhatsApp status
    Show,

    /// Change a notification preference
    Set {
        /// daily-summary, weekly-summary, budget-alerts, financial-tips,
        /// expense-reminders, summary-time, alert-threshold
        key: String,

        /// New value (on/off, HH:MM or a percentage)
        value: String,
    },

    /// Link a WhatsApp number
    Connect {
        /// Phone number, e.g. "+55 11 99999-9999"
        phone: String,
    },

    /// Unlink WhatsApp
    Disconnect,
}

impl Cli {
    fn config(&self) -> AppConfig {
        AppConfig::new(self.database.clone())
            .with_seed(!self.no_seed)
            .with_budget_scope(self.budget_scope)
    }

    pub async fn run(self) -> Result<()> {
        let config = self.config();
        let mut service = FinanceService::open(config)
            .await
            .with_context(|| format!("Failed to open database: {}", self.database.display()))?;

        match self.command {
            Commands::Init => {
                println!("Database ready: {}", self.database.display());
                println!(
                    "  {} transactions, {} budgets, {} goals",
                    service.ledger().transactions().len(),
                    service.ledger().budgets().len(),
                    service.ledger().goals().len()
                );
            }

            Commands::Add {
                amount,
                description,
                category,
                kind,
                date,
                tags,
            } => {
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let kind = parse_kind(&kind)?;
                let category = category
                    .unwrap_or_else(|| infer_category(kind, &description).to_string());
                let date = parse_date_or_today(date, service.ledger().today())?;
                let tags = tags.map(|t| split_tags(&t)).unwrap_or_default();

                let input = NewTransaction::new(kind, amount_cents, category, description, date)
                    .with_tags(tags);
                let transaction = service.add_transaction(input).await?;
                println!("Recorded {}", describe(&transaction));
                println!("  ID: {}", transaction.id);
            }

            Commands::Edit {
                id,
                amount,
                description,
                category,
                kind,
                date,
                tags,
            } => {
                let id = service.resolve_transaction_id(&id)?;
                let update = TransactionUpdate {
                    kind: kind.as_deref().map(parse_kind).transpose()?,
                    amount_cents: amount
                        .as_deref()
                        .map(parse_cents)
                        .transpose()
                        .context("Invalid amount format")?,
                    category,
                    description,
                    date: date.as_deref().map(parse_date).transpose()?,
                    tags: tags.map(|t| split_tags(&t)),
                };
                let transaction = service.update_transaction(id, update).await?;
                println!("Updated {}", describe(&transaction));
            }

            Commands::Delete { id } => {
                let id = service.resolve_transaction_id(&id)?;
                let removed = service.delete_transaction(id).await?;
                println!("Deleted {}", describe(&removed));
            }

            Commands::Show { id } => {
                let id = service.resolve_transaction_id(&id)?;
                let transaction = service.get_transaction(id)?;
                print_transaction_details(transaction);
            }

            Commands::List {
                search,
                category,
                kind,
                from,
                to,
                sort,
                order,
                limit,
            } => {
                let query = TransactionQuery {
                    search,
                    category,
                    kind: kind.as_deref().map(parse_kind).transpose()?,
                    from_date: from.as_deref().map(parse_date).transpose()?,
                    to_date: to.as_deref().map(parse_date).transpose()?,
                    sort_by: SortField::from_str(&sort).ok_or_else(|| {
                        anyhow::anyhow!("Invalid sort '{}'. Valid: date, amount, description", sort)
                    })?,
                    order: SortOrder::from_str(&order)
                        .ok_or_else(|| anyhow::anyhow!("Invalid order '{}'. Valid: asc, desc", order))?,
                    limit,
                };
                print_transactions(&service.list_transactions(&query));
            }

            Commands::Stats { date } => {
                let stats = match date {
                    Some(d) => service.stats_at(parse_date(&d)?),
                    None => service.stats(),
                };
                print_stats(&stats);
            }

            Commands::Salary { amount, date } => {
                let amount_cents = parse_cents(&amount).context("Invalid amount format")?;
                let date = parse_date_or_today(date, service.ledger().today())?;
                let transaction = service.record_salary(amount_cents, date).await?;
                println!("Recorded {}", describe(&transaction));
            }

            Commands::Categories { kind } => {
                let catalog = service.ledger().categories();
                let kinds = match kind {
                    Some(k) => vec![parse_kind(&k)?],
                    None => vec![TransactionType::Income, TransactionType::Expense],
                };
                for kind in kinds {
                    println!("{}:", kind);
                    for category in catalog.for_type(kind) {
                        println!("  {}", category);
                    }
                }
            }

            Commands::Budget(cmd) => run_budget_command(&mut service, cmd).await?,
            Commands::Goal(cmd) => run_goal_command(&mut service, cmd).await?,
            Commands::Report(cmd) => run_report_command(&service, cmd)?,
            Commands::Settings(cmd) => run_settings_command(&service, cmd).await?,

            Commands::Chat { message } => {
                if message.is_empty() {
                    run_chat_loop(&mut service).await?;
                } else {
                    let reply = service.chat(&message.join(" ")).await?;
                    println!("{}", render_reply(&reply));
                }
            }

            Commands::Export {
                export_type,
                output,
            } => run_export_command(&service, &export_type, output.as_deref())?,

            Commands::Import {
                import_type,
                input,
                dry_run,
            } => run_import_command(&mut service, &import_type, input.as_deref(), dry_run).await?,

            Commands::History => {
                let snapshots = service.repository().list_snapshots().await?;
                if snapshots.is_empty() {
                    println!("No saved snapshots.");
                } else {
                    println!("{:<6} {:<26} {:>12} {:>8}", "ID", "SAVED AT", "TRANSACTIONS", "BUDGETS");
                    println!("{}", "-".repeat(55));
                    for info in snapshots {
                        println!(
                            "{:<6} {:<26} {:>12} {:>8}",
                            info.id,
                            info.saved_at.format("%Y-%m-%d %H:%M:%S"),
                            info.transaction_count,
                            info.budget_count
                        );
                    }
                }
            }

            Commands::Reset { confirm } => {
                let confirmation = match confirm {
                    Some(c) => c,
                    None => prompt(&format!(
                        "This deletes all data. Type {} to confirm: ",
                        RESET_CONFIRMATION
                    ))?,
                };
                service.reset(confirmation.trim()).await?;
                println!("All data deleted.");
            }
        }

        Ok(())
    }
}

async fn run_budget_command(service: &mut FinanceService, cmd: BudgetCommands) -> Result<()> {
    match cmd {
        BudgetCommands::Create {
            category,
            amount,
            period,
        } => {
            let limit_cents =
                parse_cents(&amount).context("Invalid amount format. Use '400.00' or '400'")?;
            let period = parse_period(&period)?;

            let budget = service
                .create_budget(NewBudget::new(category, limit_cents, period))
                .await?;
            println!(
                "Created budget: {} ({} per {}, {} spent)",
                budget.category,
                format_brl(budget.limit_cents),
                budget.period,
                format_brl(budget.spent_cents)
            );
        }

        BudgetCommands::List => {
            let budgets = service.ledger().budgets();
            if budgets.is_empty() {
                println!("No budgets found.");
            } else {
                println!("{:<20} {:>14} {:<10}", "CATEGORY", "LIMIT", "PERIOD");
                println!("{}", "-".repeat(46));
                for budget in budgets {
                    println!(
                        "{:<20} {:>14} {:<10}",
                        truncate(&budget.category, 20),
                        format_brl(budget.limit_cents),
                        budget.period
                    );
                }
            }
        }

        BudgetCommands::Status => {
            let statuses = service.budget_statuses().await?;
            if statuses.is_empty() {
                println!("No budgets found.");
            } else {
                println!(
                    "{:<20} {:>14} {:>14} {:>14} {:>7} {:<10}",
                    "CATEGORY", "LIMIT", "SPENT", "REMAINING", "USED", "STATUS"
                );
                println!("{}", "-".repeat(84));
                for status in statuses {
                    println!(
                        "{:<20} {:>14} {:>14} {:>14} {:>6.1}% {:<10}{}",
                        truncate(&status.budget.category, 20),
                        format_brl(status.budget.limit_cents),
                        format_brl(status.budget.spent_cents),
                        format_brl(status.budget.remaining()),
                        status.percentage,
                        status.health.as_str(),
                        if status.alert { " !" } else { "" }
                    );
                }
            }
        }

        BudgetCommands::Update {
            category,
            amount,
            period,
        } => {
            let limit_cents = amount
                .as_deref()
                .map(parse_cents)
                .transpose()
                .context("Invalid amount format")?;
            let period = period.as_deref().map(parse_period).transpose()?;

            let budget = service.update_budget(&category, limit_cents, period).await?;
            println!(
                "Updated budget: {} ({} per {})",
                budget.category,
                format_brl(budget.limit_cents),
                budget.period
            );
        }

        BudgetCommands::Delete { category } => {
            service.delete_budget(&category).await?;
            println!("Deleted budget: {}", category);
        }
    }

    Ok(())
}

async fn run_goal_command(service: &mut FinanceService, cmd: GoalCommands) -> Result<()> {
    match cmd {
        GoalCommands::Add {
            name,
            target,
            deadline,
            category,
        } => {
            let target_cents = parse_cents(&target).context("Invalid target amount")?;
            let deadline = parse_date(&deadline)?;
            let goal = service
                .add_goal(name, target_cents, deadline, category)
                .await?;
            println!(
                "Created goal: {} ({} by {})",
                goal.name,
                format_brl(goal.target_cents),
                goal.deadline
            );
            println!("  ID: {}", goal.id);
        }

        GoalCommands::List => {
            let today = service.ledger().today();
            let goals = service.ledger().goals();
            if goals.is_empty() {
                println!("No goals found.");
            } else {
                println!(
                    "{:<10} {:<20} {:>14} {:>14} {:>7} {:>6}",
                    "ID", "NAME", "SAVED", "TARGET", "DONE", "DAYS"
                );
                println!("{}", "-".repeat(76));
                for goal in goals {
                    println!(
                        "{:<10} {:<20} {:>14} {:>14} {:>6.1}% {:>6}",
                        &goal.id.to_string()[..8],
                        truncate(&goal.name, 20),
                        format_brl(goal.current_cents),
                        format_brl(goal.target_cents),
                        goal.progress_percentage(),
                        goal.days_remaining(today)
                    );
                }
            }
        }

        GoalCommands::Contribute {
            id,
            amount,
            withdraw,
        } => {
            let id = service.resolve_goal_id(&id)?;
            let amount_cents = parse_cents(&amount).context("Invalid amount format")?;
            let amount_cents = if withdraw { -amount_cents } else { amount_cents };

            let goal = service.contribute_to_goal(id, amount_cents).await?;
            println!(
                "{}: {} of {} ({:.1}%)",
                goal.name,
                format_brl(goal.current_cents),
                format_brl(goal.target_cents),
                goal.progress_percentage()
            );
            if goal.is_reached() {
                println!("Goal reached!");
            }
        }

        GoalCommands::Delete { id } => {
            let id = service.resolve_goal_id(&id)?;
            let goal = service.delete_goal(id).await?;
            println!("Deleted goal: {}", goal.name);
        }
    }

    Ok(())
}

fn run_report_command(service: &FinanceService, cmd: ReportCommands) -> Result<()> {
    let today = service.ledger().today();

    match cmd {
        ReportCommands::Categories {
            kind,
            from,
            to,
            format,
        } => {
            let kind = parse_kind(&kind)?;
            let (from_date, to_date) = parse_date_range(from, to, today)?;
            let report = service.category_report(kind, from_date, to_date);

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "csv" => write_category_csv(std::io::stdout().lock(), &report.categories)?,
                _ => {
                    println!("Category Report ({})", kind);
                    println!("Period: {} to {}", from_date, to_date);
                    println!();
                    println!(
                        "{:<20} {:>14} {:>8} {:>14} {:>8}",
                        "CATEGORY", "TOTAL", "COUNT", "AVERAGE", "PERCENT"
                    );
                    println!("{}", "-".repeat(68));

                    for cat in &report.categories {
                        println!(
                            "{:<20} {:>14} {:>8} {:>14} {:>7.1}%",
                            truncate(&cat.category, 20),
                            format_brl(cat.total),
                            cat.count,
                            format_brl(cat.average),
                            cat.percentage
                        );
                    }

                    println!("{}", "-".repeat(68));
                    println!("{:<20} {:>14}", "TOTAL", format_brl(report.total));
                }
            }
        }

        ReportCommands::IncomeExpense { from, to, format } => {
            let (from_date, to_date) = parse_date_range(from, to, today)?;
            let report = service.income_expense_report(from_date, to_date);

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "csv" => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout().lock());
                    writer.write_record(["type", "amount"])?;
                    writer.write_record(["income", &report.total_income.to_string()])?;
                    writer.write_record(["expense", &report.total_expense.to_string()])?;
                    writer.write_record(["net", &report.net.to_string()])?;
                    writer.flush()?;
                }
                _ => {
                    println!("Income vs Expense Report");
                    println!("Period: {} to {}", from_date, to_date);
                    println!();
                    println!("Total Income:   {:>16}", format_brl(report.total_income));
                    println!("Total Expense:  {:>16}", format_brl(report.total_expense));
                    println!("{}", "-".repeat(33));
                    println!("Net:            {:>16}", format_brl(report.net));

                    if !report.expense_categories.is_empty() {
                        println!();
                        println!("Top Expense Categories:");
                        for (i, cat) in report.expense_categories.iter().take(10).enumerate() {
                            println!(
                                "  {}. {:<18} {:>14} ({:.1}%)",
                                i + 1,
                                truncate(&cat.category, 18),
                                format_brl(cat.total),
                                cat.percentage
                            );
                        }
                    }
                }
            }
        }

        ReportCommands::Cashflow { months, format } => {
            let report = service.cash_flow_report(months);

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "csv" => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout().lock());
                    writer.write_record(["period_start", "period_end", "inflow", "outflow", "net"])?;
                    for period in &report.periods {
                        writer.write_record([
                            period.period_start.to_string(),
                            period.period_end.to_string(),
                            period.inflow.to_string(),
                            period.outflow.to_string(),
                            period.net.to_string(),
                        ])?;
                    }
                    writer.flush()?;
                }
                _ => {
                    println!("Cash Flow Report");
                    println!("Period: {} to {}", report.from_date, report.to_date);
                    println!();
                    println!(
                        "{:<10} {:>16} {:>16} {:>16}",
                        "MONTH", "INFLOW", "OUTFLOW", "NET"
                    );
                    println!("{}", "-".repeat(61));
                    for period in &report.periods {
                        println!(
                            "{:<10} {:>16} {:>16} {:>16}",
                            period.period_start.format("%Y-%m"),
                            format_brl(period.inflow),
                            format_brl(period.outflow),
                            format_brl(period.net)
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

async fn run_settings_command(service: &FinanceService, cmd: SettingsCommands) -> Result<()> {
    match cmd {
        SettingsCommands::Show => {
            let prefs = service.notification_preferences().await?;
            let on_off = |b: bool| if b { "on" } else { "off" };

            println!("Notifications:");
            println!("  daily-summary:     {}", on_off(prefs.daily_summary));
            println!("  weekly-summary:    {}", on_off(prefs.weekly_summary));
            println!("  budget-alerts:     {}", on_off(prefs.budget_alerts));
            println!("  financial-tips:    {}", on_off(prefs.financial_tips));
            println!("  expense-reminders: {}", on_off(prefs.expense_reminders));
            println!("  summary-time:      {}", prefs.summary_time);
            println!("  alert-threshold:   {}%", prefs.alert_threshold);

            let whatsapp = service.whatsapp_status().await?;
            println!();
            match (whatsapp.connected, whatsapp.phone) {
                (true, Some(phone)) => println!("WhatsApp: connected ({})", phone),
                _ => println!("WhatsApp: not connected"),
            }
        }

        SettingsCommands::Set { key, value } => {
            service.update_preference(&key, &value).await?;
            println!("Set {} = {}", key, value);
        }

        SettingsCommands::Connect { phone } => {
            let connection = service.connect_whatsapp(&phone).await?;
            println!(
                "WhatsApp connected: {}",
                connection.phone.unwrap_or_default()
            );
        }

        SettingsCommands::Disconnect => {
            service.disconnect_whatsapp().await?;
            println!("WhatsApp disconnected.");
        }
    }

    Ok(())
}

async fn run_chat_loop(service: &mut FinanceService) -> Result<()> {
    use std::io::BufRead;

    println!("Olá! Sou seu assistente financeiro. Digite 'ajuda' para ver os comandos ou 'sair' para encerrar.");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if matches!(message.to_lowercase().as_str(), "sair" | "exit" | "quit") {
            break;
        }

        match service.chat(message).await {
            Ok(reply) => println!("{}\n", render_reply(&reply)),
            Err(e) => println!("Não consegui registrar: {}\n", e),
        }
    }
    Ok(())
}

fn run_export_command(
    service: &FinanceService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service.ledger());

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "transactions" => {
            let count = exporter.export_transactions_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "budgets" => {
            let count = exporter.export_budgets_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} budgets", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported full ledger: {} transactions, {} budgets, {} goals",
                    snapshot.transactions.len(),
                    snapshot.budgets.len(),
                    snapshot.goals.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: transactions, budgets, full",
                export_type
            );
        }
    }

    Ok(())
}

async fn run_import_command(
    service: &mut FinanceService,
    import_type: &str,
    input: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    use crate::io::{read_snapshot_json, read_transactions_csv};
    use std::fs::File;
    use std::io::{stdin, Read};

    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    match import_type {
        "transactions" => {
            let result = read_transactions_csv(reader)?;
            let mut imported = 0;
            if !dry_run {
                for input in result.transactions.iter().cloned() {
                    service.add_transaction(input).await?;
                    imported += 1;
                }
            }

            if dry_run {
                println!("Validation complete");
                println!("  Valid:    {}", result.transactions.len());
            } else {
                println!("Import complete");
                println!("  Imported: {}", imported);
            }
            println!("  Errors:   {}", result.errors.len());

            if !result.errors.is_empty() {
                println!("\nErrors:");
                for error in result.errors.iter().take(10) {
                    println!(
                        "  Line {}: {}",
                        error.line,
                        error
                            .field
                            .as_ref()
                            .map(|f| format!("{}: ", f))
                            .unwrap_or_default()
                            + &error.error
                    );
                }
                if result.errors.len() > 10 {
                    println!("  ... and {} more errors", result.errors.len() - 10);
                }
            }
        }
        "full" => {
            let snapshot = read_snapshot_json(reader)?;
            let counts = (
                snapshot.transactions.len(),
                snapshot.budgets.len(),
                snapshot.goals.len(),
            );
            if !dry_run {
                service.load_snapshot(snapshot).await?;
            }
            println!(
                "{}: {} transactions, {} budgets, {} goals",
                if dry_run { "Valid snapshot" } else { "Loaded snapshot" },
                counts.0,
                counts.1,
                counts.2
            );
        }
        _ => {
            anyhow::bail!(
                "Invalid import type '{}'. Valid types: transactions, full",
                import_type
            );
        }
    }

    Ok(())
}

/// Render an assistant reply as chat text.
pub fn render_reply(reply: &Reply) -> String {
    match reply {
        Reply::Recorded(t) => {
            let verb = match t.kind {
                TransactionType::Expense => "Gasto",
                TransactionType::Income => "Receita",
            };
            format!(
                "{} de {} registrado em {}: {}",
                verb,
                format_brl(t.amount_cents),
                t.category,
                t.description
            )
        }
        Reply::SpendingSummary(stats) => format!(
            "Gastos do mês: {}\nReceitas do mês: {}\nSaldo do mês: {}",
            format_brl(stats.monthly_expenses),
            format_brl(stats.monthly_income),
            format_brl(stats.monthly_net())
        ),
        Reply::Report {
            stats,
            largest_expense,
            tip,
        } => {
            let mut lines = vec![
                "Relatório financeiro".to_string(),
                format!("Saldo total: {}", format_brl(stats.total_balance)),
                format!("Receitas do mês: {}", format_brl(stats.monthly_income)),
                format!("Gastos do mês: {}", format_brl(stats.monthly_expenses)),
            ];
            if let Some(ratio) = stats.expense_ratio() {
                lines.push(format!("Gastos sobre a renda: {}%", ratio));
            }
            if let Some(rate) = stats.savings_rate() {
                lines.push(format!("Taxa de poupança: {}%", rate));
            }
            if let Some(t) = largest_expense {
                lines.push(format!(
                    "Maior gasto: {} ({})",
                    t.description,
                    format_brl(t.amount_cents)
                ));
            }
            lines.push(format!("Dica: {}", tip));
            lines.join("\n")
        }
        Reply::Tip(tip) => format!("Dica: {}", tip),
        Reply::Help(entries) => {
            let mut lines = vec!["Comandos disponíveis:".to_string()];
            lines.extend(
                entries
                    .iter()
                    .map(|(example, what)| format!("  \"{}\" - {}", example, what)),
            );
            lines.join("\n")
        }
        Reply::Fallback => {
            "Não entendi. Tente \"gastei R$50 com mercado\" ou digite \"ajuda\".".to_string()
        }
    }
}

fn print_transactions(transactions: &[&Transaction]) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:<10} {:<12} {:>14} {:<16} DESCRIPTION",
        "ID", "DATE", "AMOUNT", "CATEGORY"
    );
    println!("{}", "-".repeat(80));
    for t in transactions {
        println!(
            "{:<10} {:<12} {:>14} {:<16} {}",
            &t.id.to_string()[..8],
            t.date,
            format_brl(t.signed_amount()),
            truncate(&t.category, 16),
            truncate(&t.description, 30)
        );
    }
}

fn print_transaction_details(t: &Transaction) {
    println!("Transaction: {}", t.id);
    println!("  Date:        {}", t.date);
    println!("  Type:        {}", t.kind);
    println!("  Amount:      {}", format_brl(t.amount_cents));
    println!("  Category:    {}", t.category);
    println!("  Description: {}", t.description);
    if !t.tags.is_empty() {
        println!("  Tags:        {}", t.tags.join(", "));
    }
}

fn print_stats(stats: &Stats) {
    println!("Total balance:     {:>16}", format_brl(stats.total_balance));
    println!();
    println!("This month");
    println!("  Income:          {:>16}", format_brl(stats.monthly_income));
    println!("  Expenses:        {:>16}", format_brl(stats.monthly_expenses));
    println!("  Net:             {:>16}", format_brl(stats.monthly_net()));
    if let Some(rate) = stats.savings_rate() {
        println!("  Savings rate:    {:>15}%", rate);
    }
    println!();
    println!("This year");
    println!("  Income:          {:>16}", format_brl(stats.yearly_income));
    println!("  Expenses:        {:>16}", format_brl(stats.yearly_expenses));
}

fn describe(t: &Transaction) -> String {
    format!(
        "{} {} in {} ({}, {})",
        t.kind,
        format_brl(t.amount_cents),
        t.category,
        t.description,
        t.date
    )
}

fn parse_kind(s: &str) -> Result<TransactionType> {
    TransactionType::from_str(s)
        .ok_or_else(|| anyhow::anyhow!("Invalid type '{}'. Valid types: income, expense", s))
}

fn parse_period(s: &str) -> Result<PeriodType> {
    PeriodType::from_str(s).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid period type '{}'. Valid types: weekly, monthly, yearly",
            s
        )
    })
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").context("Date must be in YYYY-MM-DD format")
}

fn parse_date_or_today(date: Option<String>, today: NaiveDate) -> Result<NaiveDate> {
    date.as_deref().map(parse_date).transpose().map(|d| d.unwrap_or(today))
}

/// Defaults to the current month up to today.
fn parse_date_range(
    from: Option<String>,
    to: Option<String>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let to_date = match to {
        Some(date_str) => parse_date(&date_str)?,
        None => today,
    };
    let from_date = match from {
        Some(date_str) => parse_date(&date_str)?,
        None => today.with_day(1).unwrap_or(today),
    };
    Ok((from_date, to_date))
}

fn split_tags(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn prompt(message: &str) -> Result<String> {
    use std::io::Write;

    print!("{}", message);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read confirmation")?;
    Ok(line)
}

fn write_category_csv<W: std::io::Write>(writer: W, categories: &[CategorySummary]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["category", "total", "count", "average", "percentage"])?;
    for cat in categories {
        writer.write_record([
            cat.category.clone(),
            cat.total.to_string(),
            cat.count.to_string(),
            cat.average.to_string(),
            format!("{:.2}", cat.percentage),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
