use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RentFlowError;
use crate::types::{Money, Percent};
use crate::RentFlowResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single spending record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount: Money,
    /// Id of the category this expense is booked under
    pub category: String,
    /// ISO date (YYYY-MM-DD) the expense occurred
    pub date: String,
    #[serde(default)]
    pub description: String,
}

/// A spending category with a monthly budget; a zero budget means none set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub budget: Money,
    #[serde(default)]
    pub is_custom: bool,
}

/// Per-category roll-up for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: Category,
    pub spent: Money,
    pub budget: Money,
    /// spent over budget in percent; zero when no budget is set
    pub percentage: Percent,
    pub is_over_budget: bool,
}

/// Whole-month roll-up across all categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySpending {
    /// YYYY-MM key of the summarised month
    pub month: String,
    /// Every expense dated in the month, budgeted category or not
    pub total_spent: Money,
    pub budget_total: Money,
    /// total_spent over budget_total in percent; zero when no budgets are set
    pub budget_used_pct: Percent,
    pub categories: Vec<CategorySpending>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The ten stock categories shipped with the app, budgets unset.
pub fn default_categories() -> Vec<Category> {
    [
        ("food", "Food & Dining", "🍔", "#FF6B6B"),
        ("transport", "Transportation", "🚗", "#4ECDC4"),
        ("housing", "Housing", "🏠", "#45B7D1"),
        ("healthcare", "Healthcare", "💊", "#96CEB4"),
        ("entertainment", "Entertainment", "🎬", "#FFEAA7"),
        ("shopping", "Shopping", "👕", "#DFE6E9"),
        ("education", "Education", "📚", "#74B9FF"),
        ("savings", "Savings", "💰", "#55EFC4"),
        ("gifts", "Gifts", "🎁", "#FD79A8"),
        ("bills", "Bills", "📱", "#A29BFE"),
    ]
    .into_iter()
    .map(|(id, name, icon, color)| Category {
        id: id.into(),
        name: name.into(),
        icon: icon.into(),
        color: color.into(),
        budget: Decimal::ZERO,
        is_custom: false,
    })
    .collect()
}

/// Summarise one month of expenses against category budgets.
///
/// Expenses dated outside `month` are ignored. Expenses booked under an id
/// missing from `categories` still count toward the month total, the same
/// way the expense list screen sums everything it shows.
pub fn summarize_month(
    month: &str,
    expenses: &[Expense],
    categories: &[Category],
) -> RentFlowResult<MonthlySpending> {
    validate_month_key(month)?;

    let in_month: Vec<&Expense> = expenses
        .iter()
        .filter(|e| e.date.starts_with(month))
        .collect();

    let total_spent: Money = in_month.iter().map(|e| e.amount).sum();
    let budget_total: Money = categories.iter().map(|c| c.budget).sum();

    let categories = categories
        .iter()
        .map(|category| {
            let spent: Money = in_month
                .iter()
                .filter(|e| e.category == category.id)
                .map(|e| e.amount)
                .sum();

            let percentage = if category.budget > Decimal::ZERO {
                spent / category.budget * dec!(100)
            } else {
                Decimal::ZERO
            };

            CategorySpending {
                category: category.clone(),
                spent,
                budget: category.budget,
                percentage,
                is_over_budget: spent > category.budget && category.budget > Decimal::ZERO,
            }
        })
        .collect();

    let budget_used_pct = if budget_total > Decimal::ZERO {
        total_spent / budget_total * dec!(100)
    } else {
        Decimal::ZERO
    };

    Ok(MonthlySpending {
        month: month.to_string(),
        total_spent,
        budget_total,
        budget_used_pct,
        categories,
    })
}

/// Expect a zero-padded YYYY-MM key; anchoring to the first of the month
/// lets chrono reject impossible months.
fn validate_month_key(month: &str) -> RentFlowResult<()> {
    let anchored = format!("{month}-01");
    if month.len() != 7 || NaiveDate::parse_from_str(&anchored, "%Y-%m-%d").is_err() {
        return Err(RentFlowError::InvalidInput {
            field: "month".into(),
            reason: format!("'{month}' is not a YYYY-MM month key"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
