use std::sync::LazyLock;

use regex::Regex;

use super::Command;
use crate::domain::{infer_category, parse_cents, TransactionType};

static EXPENSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"gastei?\s+(?:r?\$\s*)?(\d+(?:[.,]\d{1,2})?)\s+(?:(?:com|em|de|para)\s+)?(.+)",
    )
    .expect("expense pattern is valid")
});

static INCOME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:recebi|ganhei)\s+(?:r?\$\s*)?(\d+(?:[.,]\d{1,2})?)\s+(?:(?:com|em|de|do|da|por)\s+)?(.+)",
    )
    .expect("income pattern is valid")
});

/// A predicate on the lowercased message and the command it produces.
pub struct Rule {
    pub name: &'static str,
    pub predicate: fn(&str) -> bool,
    pub handler: fn(&str) -> Command,
}

fn contains_any(message: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| message.contains(n))
}

fn record_from(re: &Regex, kind: TransactionType, message: &str) -> Command {
    let Some(caps) = re.captures(message) else {
        return Command::Unknown;
    };
    let Ok(amount_cents) = parse_cents(&caps[1]) else {
        return Command::Unknown;
    };
    let description = caps[2].trim().to_string();
    let category = infer_category(kind, &description).to_string();

    Command::Record {
        kind,
        amount_cents,
        description,
        category,
    }
}

/// The built-in rule table, in evaluation order.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            name: "record-expense",
            predicate: |m| EXPENSE_RE.is_match(m),
            handler: |m| record_from(&EXPENSE_RE, TransactionType::Expense, m),
        },
        Rule {
            name: "record-income",
            predicate: |m| INCOME_RE.is_match(m),
            handler: |m| record_from(&INCOME_RE, TransactionType::Income, m),
        },
        Rule {
            name: "spending-summary",
            predicate: |m| contains_any(m, &["quanto gastei", "meus gastos"]),
            handler: |_| Command::SpendingSummary,
        },
        Rule {
            name: "report",
            predicate: |m| contains_any(m, &["relatório", "relatorio", "resumo"]),
            handler: |_| Command::Report,
        },
        Rule {
            name: "tip",
            predicate: |m| contains_any(m, &["dica", "economizar"]),
            handler: |_| Command::Tip,
        },
        Rule {
            name: "help",
            predicate: |m| contains_any(m, &["ajuda", "comandos"]),
            handler: |_| Command::Help,
        },
    ]
}
