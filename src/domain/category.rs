use serde::{Deserialize, Serialize};

use super::TransactionType;

/// Category assigned when no keyword matches.
pub const FALLBACK_CATEGORY: &str = "Outros";

/// Recognized category labels, split by transaction type.
/// The catalog is advisory: transactions may carry any label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        let to_vec = |labels: &[&str]| labels.iter().map(|s| s.to_string()).collect();
        Self {
            income: to_vec(&["Salário", "Freelance", "Investimentos", "Vendas", "Outros"]),
            expense: to_vec(&[
                "Moradia",
                "Alimentação",
                "Transporte",
                "Saúde",
                "Educação",
                "Lazer",
                "Compras",
                "Outros",
            ]),
        }
    }
}

impl CategoryCatalog {
    pub fn for_type(&self, kind: TransactionType) -> &[String] {
        match kind {
            TransactionType::Income => &self.income,
            TransactionType::Expense => &self.expense,
        }
    }

    pub fn is_known(&self, kind: TransactionType, category: &str) -> bool {
        self.for_type(kind).iter().any(|c| c == category)
    }
}

const EXPENSE_KEYWORDS: &[(&[&str], &str)] = &[
    (
        &["mercado", "supermercado", "comida", "restaurante"],
        "Alimentação",
    ),
    (&["uber", "gasolina", "combustível", "ônibus"], "Transporte"),
    (&["aluguel", "conta", "luz", "água"], "Moradia"),
    (&["cinema", "festa", "bar", "lazer"], "Lazer"),
    (&["remédio", "médico", "hospital"], "Saúde"),
];

const INCOME_KEYWORDS: &[(&[&str], &str)] = &[
    (&["salário", "salario"], "Salário"),
    (&["freelance", "freela", "projeto"], "Freelance"),
    (&["dividendo", "investimento", "rendimento"], "Investimentos"),
    (&["venda", "vendi"], "Vendas"),
];

fn lookup(table: &[(&[&str], &'static str)], description: &str) -> &'static str {
    let lower = description.to_lowercase();
    table
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(FALLBACK_CATEGORY)
}

/// Infer an expense category from free text. First matching row wins.
pub fn infer_expense_category(description: &str) -> &'static str {
    lookup(EXPENSE_KEYWORDS, description)
}

pub fn infer_income_category(description: &str) -> &'static str {
    lookup(INCOME_KEYWORDS, description)
}

pub fn infer_category(kind: TransactionType, description: &str) -> &'static str {
    match kind {
        TransactionType::Income => infer_income_category(description),
        TransactionType::Expense => infer_expense_category(description),
    }
}
