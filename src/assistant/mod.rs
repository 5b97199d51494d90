//! Rule-based finance assistant.
//!
//! Messages are lowercased and run through an ordered rule list; the first
//! rule whose predicate matches produces the [`Command`]. Executing a command
//! against a [`Ledger`] yields a structured [`Reply`] that callers render.

mod rules;

use chrono::{Datelike, NaiveDate};

use crate::domain::{
    Cents, Ledger, LedgerError, NewTransaction, Stats, Transaction, TransactionType,
};

pub use rules::{Rule, default_rules};

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Record {
        kind: TransactionType,
        amount_cents: Cents,
        description: String,
        category: String,
    },
    SpendingSummary,
    Report,
    Tip,
    Help,
    Unknown,
}

/// Outcome of a command, for the caller to render.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Recorded(Transaction),
    SpendingSummary(Stats),
    Report {
        stats: Stats,
        largest_expense: Option<Transaction>,
        tip: &'static str,
    },
    Tip(&'static str),
    Help(&'static [(&'static str, &'static str)]),
    Fallback,
}

pub const TIPS: &[&str] = &[
    "Tente reduzir 10% dos gastos com alimentação usando cupons de desconto.",
    "Configure um orçamento mensal para cada categoria de gasto.",
    "Use a regra 50/30/20: 50% necessidades, 30% desejos, 20% poupança.",
    "Analise seus gastos semanalmente para identificar padrões.",
    "Considere cozinhar mais em casa para economizar com alimentação.",
];

/// Example phrases and what they do.
pub const HELP: &[(&str, &str)] = &[
    ("gastei R$50 com mercado", "registrar gasto"),
    ("recebi R$200 de freelance", "registrar receita"),
    ("quanto gastei este mês?", "ver gastos"),
    ("meu relatório", "resumo completo"),
    ("dica de economia", "sugestões"),
    ("ajuda", "ver comandos"),
];

/// Pick a tip from the month's figures. Overspending always gets the budget
/// tip; otherwise tips rotate by day of month.
pub fn pick_tip(stats: &Stats, today: NaiveDate) -> &'static str {
    if stats.monthly_expenses > stats.monthly_income {
        return TIPS[1];
    }
    TIPS[today.day() as usize % TIPS.len()]
}

pub struct Assistant {
    rules: Vec<Rule>,
}

impl Default for Assistant {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Assistant {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Classify a message. First matching rule wins.
    pub fn interpret(&self, message: &str) -> Command {
        let lower = message.trim().to_lowercase();
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(&lower))
            .map(|rule| (rule.handler)(&lower))
            .unwrap_or(Command::Unknown)
    }

    /// Execute a command against the ledger. Recording commands date the
    /// transaction with the ledger's today.
    pub fn execute(&self, command: Command, ledger: &mut Ledger) -> Result<Reply, LedgerError> {
        let today = ledger.today();
        let reply = match command {
            Command::Record {
                kind,
                amount_cents,
                description,
                category,
            } => {
                let input = NewTransaction::new(kind, amount_cents, category, description, today);
                Reply::Recorded(ledger.add_transaction(input)?)
            }
            Command::SpendingSummary => Reply::SpendingSummary(ledger.calculate_stats()),
            Command::Report => {
                let stats = ledger.calculate_stats();
                Reply::Report {
                    stats,
                    largest_expense: ledger.largest_expense().cloned(),
                    tip: pick_tip(&stats, today),
                }
            }
            Command::Tip => Reply::Tip(pick_tip(&ledger.calculate_stats(), today)),
            Command::Help => Reply::Help(HELP),
            Command::Unknown => Reply::Fallback,
        };
        Ok(reply)
    }

    pub fn respond(&self, message: &str, ledger: &mut Ledger) -> Result<Reply, LedgerError> {
        let command = self.interpret(message);
        self.execute(command, ledger)
    }
}
