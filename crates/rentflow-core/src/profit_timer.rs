use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::cashflow::{calculate_cash_flow, CalculationResults};
use crate::scenario::Scenario;
use crate::types::{with_metadata, ComputationOutput, Money, Years};

/// Projection horizon: 50 years of monthly steps. Keeps pathological
/// assumptions (zero growth against a permanent deficit) from looping
/// forever.
const MAX_MONTHS: u32 = 600;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Annual adjustment applied to rent or to operating expenses.
///
/// The tag selects the unit of the value: `percentage` scales the current
/// amount, `fixed` shifts it by an absolute currency delta. Both consumers
/// must handle both cases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Adjustment {
    Percentage(Decimal),
    Fixed(Decimal),
}

impl Adjustment {
    /// No year-over-year change.
    pub const NONE: Adjustment = Adjustment::Fixed(Decimal::ZERO);

    /// Apply one year of growth to `amount`.
    fn grow(&self, amount: Money) -> Money {
        match self {
            Adjustment::Percentage(pct) => amount * (Decimal::ONE + pct / dec!(100)),
            Adjustment::Fixed(delta) => amount + delta,
        }
    }

    /// Apply one year of reduction to `amount`. A fixed reduction is floored
    /// at zero; a percentage reduction above 100% is left to go negative,
    /// matching the multiplicative arithmetic.
    fn reduce(&self, amount: Money) -> Money {
        match self {
            Adjustment::Percentage(pct) => amount * (Decimal::ONE - pct / dec!(100)),
            Adjustment::Fixed(delta) => {
                let reduced = amount - delta;
                if reduced < Decimal::ZERO {
                    Decimal::ZERO
                } else {
                    reduced
                }
            }
        }
    }
}

/// Input for the profit-timer projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitTimerInputs {
    /// Saved scenario whose inputs seed the baseline snapshot
    pub scenario: Scenario,
    /// Applied to rent at the end of every completed year
    pub rent_growth: Adjustment,
    /// Applied to operating expenses at the end of every completed year
    pub expense_reduction: Adjustment,
}

/// One simulated month. Ordering in the timeline is chronological and is
/// the primary output consumed by charts and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTimelineItem {
    /// 1-based month index; 0 marks the baseline entry of a scenario that
    /// was already positive
    pub month: u32,
    /// month / 12 to one decimal place
    pub year: Years,
    /// Effective rent for the month, rounded to whole currency units
    pub rent: Money,
    /// Operating expenses plus mortgage payment, rounded
    pub expenses: Money,
    /// rent minus expenses, rounded
    pub cash_flow: Money,
    pub is_positive: bool,
}

/// Outcome of the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitTimerResult {
    pub months_to_positive: u32,
    /// months_to_positive / 12 to one decimal place
    pub years_to_positive: Years,
    pub monthly_timeline: Vec<MonthlyTimelineItem>,
    /// Cash flow of the terminating month, rounded
    pub final_cash_flow: Money,
    /// Set when the horizon ran out with the cash flow still negative
    pub is_never_positive: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Walk a negative-cash-flow scenario forward month by month until the cash
/// flow first turns non-negative, or the 50-year horizon runs out.
///
/// The baseline comes from [`calculate_cash_flow`]. Rent and operating
/// expenses are adjusted once per completed year and compound on the running
/// state; the mortgage payment is fixed for the life of the loan and never
/// adjusted. Deterministic and bounded, like the calculator it builds on.
pub fn calculate_time_to_positive(inputs: &ProfitTimerInputs) -> ProfitTimerResult {
    let baseline = calculate_cash_flow(&inputs.scenario.inputs);

    // Nothing to project when the scenario already carries itself.
    if baseline.monthly_cash_flow >= Decimal::ZERO {
        return already_positive(&baseline);
    }

    let mortgage_payment = baseline.monthly_mortgage_payment;
    let mut current_rent = baseline.effective_rent;
    let mut current_operating_expenses = baseline.total_monthly_expenses;
    let mut timeline = Vec::with_capacity(MAX_MONTHS as usize);

    for month in 1..=MAX_MONTHS {
        // Annual adjustments land once per completed year and compound on
        // the running state, never on the baseline.
        if month % 12 == 0 {
            current_rent = inputs.rent_growth.grow(current_rent);
            current_operating_expenses =
                inputs.expense_reduction.reduce(current_operating_expenses);
        }

        let total_expenses = current_operating_expenses + mortgage_payment;
        let cash_flow = current_rent - total_expenses;

        timeline.push(MonthlyTimelineItem {
            month,
            year: year_fraction(month),
            rent: round_currency(current_rent),
            expenses: round_currency(total_expenses),
            cash_flow: round_currency(cash_flow),
            is_positive: cash_flow >= Decimal::ZERO,
        });

        if cash_flow >= Decimal::ZERO {
            return ProfitTimerResult {
                months_to_positive: month,
                years_to_positive: year_fraction(month),
                monthly_timeline: timeline,
                final_cash_flow: round_currency(cash_flow),
                is_never_positive: false,
            };
        }
    }

    // Horizon exhausted with the cash flow still negative.
    let final_cash_flow = current_rent - (current_operating_expenses + mortgage_payment);
    ProfitTimerResult {
        months_to_positive: MAX_MONTHS,
        years_to_positive: year_fraction(MAX_MONTHS),
        monthly_timeline: timeline,
        final_cash_flow: round_currency(final_cash_flow),
        is_never_positive: true,
    }
}

/// Run the projection and wrap it in the standard output envelope.
pub fn analyze_time_to_positive(
    inputs: &ProfitTimerInputs,
) -> ComputationOutput<ProfitTimerResult> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let Adjustment::Percentage(pct) = inputs.expense_reduction {
        if pct > dec!(100) {
            warnings.push(format!(
                "Expense reduction of {pct}% drives operating expenses negative after the first year"
            ));
        }
    }

    let result = calculate_time_to_positive(inputs);

    if result.months_to_positive == 0 {
        warnings.push(
            "Baseline cash flow is already non-negative; no projection was run".into(),
        );
    }

    if result.is_never_positive {
        warnings.push(
            "Cash flow stays negative across the full 50-year horizon under these assumptions"
                .into(),
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Profit Timer Projection (Bounded Monthly Simulation)",
        inputs,
        warnings,
        elapsed,
        result,
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn already_positive(baseline: &CalculationResults) -> ProfitTimerResult {
    let expenses = baseline.total_monthly_expenses + baseline.monthly_mortgage_payment;
    ProfitTimerResult {
        months_to_positive: 0,
        years_to_positive: Decimal::ZERO,
        monthly_timeline: vec![MonthlyTimelineItem {
            month: 0,
            year: Decimal::ZERO,
            rent: baseline.effective_rent,
            expenses,
            cash_flow: baseline.monthly_cash_flow,
            is_positive: true,
        }],
        final_cash_flow: baseline.monthly_cash_flow,
        is_never_positive: false,
    }
}

fn year_fraction(month: u32) -> Years {
    (Decimal::from(month) / dec!(12))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Whole currency units, halves away from zero.
fn round_currency(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
