use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use rentflow_core::profit_timer::{self, Adjustment, ProfitTimerInputs};
use rentflow_core::scenario::Scenario;

use crate::input;

/// Arguments for the profit-timer projection
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ProfitTimerArgs {
    /// Path to JSON input file with scenario and both adjustments
    #[arg(long)]
    pub input: Option<String>,

    /// Path to JSON file holding just the scenario; adjustments come from flags
    #[arg(long)]
    pub scenario: Option<String>,

    /// Unit of the rent growth value
    #[arg(long, value_enum, default_value = "percentage")]
    pub rent_growth_type: AdjustmentKind,

    /// Rent growth applied at the end of every year
    #[arg(long, default_value = "0")]
    pub rent_growth_value: Decimal,

    /// Unit of the expense reduction value
    #[arg(long, value_enum, default_value = "percentage")]
    pub expense_reduction_type: AdjustmentKind,

    /// Expense reduction applied at the end of every year
    #[arg(long, default_value = "0")]
    pub expense_reduction_value: Decimal,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AdjustmentKind {
    Percentage,
    Fixed,
}

impl AdjustmentKind {
    fn with_value(self, value: Decimal) -> Adjustment {
        match self {
            AdjustmentKind::Percentage => Adjustment::Percentage(value),
            AdjustmentKind::Fixed => Adjustment::Fixed(value),
        }
    }
}

pub fn run_profit_timer(args: ProfitTimerArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: ProfitTimerInputs = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(ref path) = args.scenario {
        let scenario: Scenario = input::file::read_json(path)?;
        ProfitTimerInputs {
            scenario,
            rent_growth: args.rent_growth_type.with_value(args.rent_growth_value),
            expense_reduction: args
                .expense_reduction_type
                .with_value(args.expense_reduction_value),
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json>, --scenario <file.json> or stdin required for the profit timer".into());
    };

    let result = profit_timer::analyze_time_to_positive(&inputs);
    Ok(serde_json::to_value(result)?)
}
