use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::cashflow::PropertyInputs;
use crate::error::RentFlowError;
use crate::RentFlowResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A named, saved set of property inputs.
///
/// Scenarios are owned by the caller's persistence layer; the engine only
/// ever reads `inputs` and never mutates or stores the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub inputs: PropertyInputs,
    pub created_at: DateTime<Utc>,
}

/// Starter input set offered when building a new scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub inputs: PropertyInputs,
}

impl PropertyTemplate {
    /// Copy of the template's prefilled inputs, ready for editing.
    pub fn instantiate(&self) -> PropertyInputs {
        self.inputs.clone()
    }
}

// ---------------------------------------------------------------------------
// Built-in templates
// ---------------------------------------------------------------------------

/// The stock templates shipped with the app: a rented flat, a family house
/// and a small commercial unit. Fields a template does not prefill stay
/// zero, the same as blank form inputs.
pub fn builtin_templates() -> Vec<PropertyTemplate> {
    vec![
        PropertyTemplate {
            id: "apartment".into(),
            name: "City apartment".into(),
            description: "Two-room flat let long-term".into(),
            icon: "🏢".into(),
            inputs: PropertyInputs {
                purchase_price: dec!(3500000),
                equity_investment: dec!(700000),
                loan_amount: dec!(2800000),
                interest_rate_pct: dec!(4.5),
                loan_term_years: dec!(30),
                expected_rent: dec!(18000),
                occupancy_pct: dec!(95),
                repair_fund: dec!(800),
                management_fee: dec!(500),
                insurance: dec!(300),
                property_tax_annual: dec!(1800),
                utilities: dec!(2500),
                internet: dec!(400),
                unexpected_costs: dec!(500),
                ..PropertyInputs::default()
            },
        },
        PropertyTemplate {
            id: "house".into(),
            name: "Family house".into(),
            description: "Detached house, self-managed".into(),
            icon: "🏠".into(),
            inputs: PropertyInputs {
                purchase_price: dec!(6200000),
                equity_investment: dec!(1240000),
                loan_amount: dec!(4960000),
                interest_rate_pct: dec!(4.8),
                loan_term_years: dec!(25),
                expected_rent: dec!(25000),
                occupancy_pct: dec!(90),
                repair_fund: dec!(1500),
                insurance: dec!(600),
                property_tax_annual: dec!(3600),
                utilities: dec!(3000),
                internet: dec!(500),
                unexpected_costs: dec!(1000),
                ..PropertyInputs::default()
            },
        },
        PropertyTemplate {
            id: "commercial".into(),
            name: "Commercial unit".into(),
            description: "Street-level retail space, tenant pays utilities".into(),
            icon: "🏬".into(),
            inputs: PropertyInputs {
                purchase_price: dec!(9500000),
                equity_investment: dec!(2850000),
                loan_amount: dec!(6650000),
                interest_rate_pct: dec!(5.5),
                loan_term_years: dec!(20),
                expected_rent: dec!(55000),
                occupancy_pct: dec!(85),
                repair_fund: dec!(2000),
                management_fee: dec!(2500),
                insurance: dec!(1200),
                property_tax_annual: dec!(12000),
                other_costs: dec!(1500),
                unexpected_costs: dec!(2000),
                ..PropertyInputs::default()
            },
        },
    ]
}

/// Look up a built-in template by id.
pub fn template_by_id(id: &str) -> RentFlowResult<PropertyTemplate> {
    builtin_templates()
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| RentFlowError::InvalidInput {
            field: "template".into(),
            reason: format!("Unknown template '{id}'"),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
