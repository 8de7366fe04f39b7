use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use rentflow_core::budgets::{self, Category, Expense};

use crate::input;

/// Arguments for the monthly budget summary
#[derive(Args)]
pub struct BudgetSummaryArgs {
    /// Path to JSON file with expenses and (optionally) categories
    #[arg(long)]
    pub input: Option<String>,

    /// Month to summarise (YYYY-MM)
    #[arg(long)]
    pub month: String,
}

/// On-disk shape: categories fall back to the stock set when omitted.
#[derive(Deserialize)]
struct BudgetFile {
    expenses: Vec<Expense>,
    #[serde(default)]
    categories: Option<Vec<Category>>,
}

pub fn run_budget_summary(args: BudgetSummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let file: BudgetFile = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for the budget summary".into());
    };

    let categories = file
        .categories
        .unwrap_or_else(budgets::default_categories);

    let summary = budgets::summarize_month(&args.month, &file.expenses, &categories)?;
    Ok(serde_json::to_value(summary)?)
}
