use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rentflow_core::cashflow::{self, PropertyInputs};
use rentflow_core::scenario;

use crate::input;

/// Arguments for the cash-flow calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CashFlowArgs {
    /// Path to JSON input file with property inputs
    #[arg(long)]
    pub input: Option<String>,

    /// Built-in template id used as the starting point (see `templates`)
    #[arg(long)]
    pub template: Option<String>,

    /// Purchase price of the property
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Owner's own cash put into the purchase
    #[arg(long)]
    pub equity_investment: Option<Decimal>,

    /// Mortgage principal
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate as a percentage (5 = 5%)
    #[arg(long)]
    pub interest_rate_pct: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub loan_term_years: Option<Decimal>,

    /// Expected monthly rent at full occupancy
    #[arg(long)]
    pub expected_rent: Option<Decimal>,

    /// Occupancy rate as a percentage
    #[arg(long)]
    pub occupancy_pct: Option<Decimal>,

    /// Monthly repair fund contribution
    #[arg(long)]
    pub repair_fund: Option<Decimal>,

    /// Monthly property management fee
    #[arg(long)]
    pub management_fee: Option<Decimal>,

    /// Monthly insurance premium
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Property tax per year
    #[arg(long)]
    pub property_tax_annual: Option<Decimal>,

    /// Monthly utilities
    #[arg(long)]
    pub utilities: Option<Decimal>,

    /// Monthly internet
    #[arg(long)]
    pub internet: Option<Decimal>,

    /// Other recurring monthly costs
    #[arg(long)]
    pub other_costs: Option<Decimal>,

    /// Monthly reserve for unexpected costs
    #[arg(long)]
    pub unexpected_costs: Option<Decimal>,
}

pub fn run_cash_flow(args: CashFlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut inputs: PropertyInputs = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else if let Some(ref id) = args.template {
        scenario::template_by_id(id)?.instantiate()
    } else {
        // Blank form: every field starts at zero
        PropertyInputs::default()
    };

    apply_overrides(&mut inputs, &args);

    let result = cashflow::analyze_cash_flow(&inputs);
    Ok(serde_json::to_value(result)?)
}

fn apply_overrides(inputs: &mut PropertyInputs, args: &CashFlowArgs) {
    if let Some(v) = args.purchase_price {
        inputs.purchase_price = v;
    }
    if let Some(v) = args.equity_investment {
        inputs.equity_investment = v;
    }
    if let Some(v) = args.loan_amount {
        inputs.loan_amount = v;
    }
    if let Some(v) = args.interest_rate_pct {
        inputs.interest_rate_pct = v;
    }
    if let Some(v) = args.loan_term_years {
        inputs.loan_term_years = v;
    }
    if let Some(v) = args.expected_rent {
        inputs.expected_rent = v;
    }
    if let Some(v) = args.occupancy_pct {
        inputs.occupancy_pct = v;
    }
    if let Some(v) = args.repair_fund {
        inputs.repair_fund = v;
    }
    if let Some(v) = args.management_fee {
        inputs.management_fee = v;
    }
    if let Some(v) = args.insurance {
        inputs.insurance = v;
    }
    if let Some(v) = args.property_tax_annual {
        inputs.property_tax_annual = v;
    }
    if let Some(v) = args.utilities {
        inputs.utilities = v;
    }
    if let Some(v) = args.internet {
        inputs.internet = v;
    }
    if let Some(v) = args.other_costs {
        inputs.other_costs = v;
    }
    if let Some(v) = args.unexpected_costs {
        inputs.unexpected_costs = v;
    }
}
