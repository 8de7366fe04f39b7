use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, Money, Percent, Years};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Raw inputs for a single property purchase scenario.
///
/// Every expense field is a monthly amount except `property_tax_annual`,
/// which is entered per year and pro-rated when expenses are summed. Fields
/// absent from the input deserialise to zero, matching blank form entries.
/// The engine performs no range validation; negative or out-of-range values
/// propagate into arithmetically defined results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyInputs {
    /// Purchase price of the property
    pub purchase_price: Money,
    /// Owner's own cash put into the purchase
    pub equity_investment: Money,
    /// Mortgage principal
    pub loan_amount: Money,
    /// Annual interest rate as a percentage (5 = 5%)
    pub interest_rate_pct: Percent,
    /// Loan term in years
    pub loan_term_years: Years,
    /// Expected monthly rent at full occupancy
    pub expected_rent: Money,
    /// Occupancy rate as a percentage, expected in [0, 100] but not clamped
    pub occupancy_pct: Percent,
    /// Monthly contribution to the building repair fund
    pub repair_fund: Money,
    /// Monthly property management fee
    pub management_fee: Money,
    /// Monthly insurance premium
    pub insurance: Money,
    /// Property tax per year (the only annual expense field)
    pub property_tax_annual: Money,
    /// Monthly utilities
    pub utilities: Money,
    /// Monthly internet
    pub internet: Money,
    /// Other recurring monthly costs
    pub other_costs: Money,
    /// Monthly reserve for unexpected costs
    pub unexpected_costs: Money,
}

/// Snapshot of every metric derived from one set of property inputs.
///
/// Produced fresh on each call and never mutated; it has no identity beyond
/// the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResults {
    /// Monthly annuity payment on the mortgage
    pub monthly_mortgage_payment: Money,
    /// Owner's cash tied up in the purchase
    pub total_investment: Money,
    /// Expected rent scaled by occupancy
    pub effective_rent: Money,
    /// Sum of all operating expense lines, property tax pro-rated monthly
    pub total_monthly_expenses: Money,
    /// Net operating income: effective rent minus operating expenses,
    /// before debt service
    pub noi: Money,
    /// NOI minus mortgage payment
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    /// Annual cash flow over equity invested, in percent
    pub cash_on_cash_return: Percent,
    /// Mortgage payments over a full year
    pub annual_debt_service: Money,
    pub annual_operating_expenses: Money,
    pub annual_rental_income: Money,
    /// Annualised NOI over purchase price, in percent
    pub cap_rate: Percent,
    /// Currently defined as cash-on-cash return; reported separately
    pub roi: Percent,
    /// Debt service coverage ratio: NOI over mortgage payment, zero when
    /// there is no debt service
    pub dscr: Decimal,
    /// Occupancy at which rent exactly covers expenses plus debt service
    pub break_even_occupancy: Percent,
    /// Annual cash flow over purchase price, in percent
    pub total_investment_roi: Percent,
    /// Operating expenses as a share of effective rent
    pub expense_ratio: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Monthly payment on an amortising loan.
///
/// Standard annuity formula `M = P * r(1+r)^n / ((1+r)^n - 1)` with the
/// monthly rate `r` derived from the annual percentage rate. A zero rate
/// falls back to straight-line repayment, and a non-positive principal or
/// term yields a zero payment.
pub fn monthly_mortgage_payment(
    principal: Money,
    annual_rate_pct: Percent,
    years: Years,
) -> Money {
    if principal <= Decimal::ZERO || years <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let months = years * dec!(12);
    if annual_rate_pct.is_zero() {
        // Interest-free: straight-line amortisation
        return principal / months;
    }

    let monthly_rate = annual_rate_pct / dec!(100) / dec!(12);
    match (Decimal::ONE + monthly_rate).checked_powd(months) {
        Some(compound) if compound != Decimal::ONE => {
            principal * monthly_rate * compound / (compound - Decimal::ONE)
        }
        // The compounding factor overflowed or degenerated; at that scale
        // the annuity converges on interest-only.
        _ => principal * monthly_rate,
    }
}

/// Derive the full cash-flow snapshot for one property.
///
/// Total over its whole input domain: every ratio with a non-positive
/// denominator reports zero instead of failing, so callers always have a
/// renderable result.
pub fn calculate_cash_flow(inputs: &PropertyInputs) -> CalculationResults {
    let monthly_payment = monthly_mortgage_payment(
        inputs.loan_amount,
        inputs.interest_rate_pct,
        inputs.loan_term_years,
    );

    let total_investment = inputs.equity_investment;
    let effective_rent = inputs.expected_rent * inputs.occupancy_pct / dec!(100);

    // Property tax is entered per year; everything else is already monthly.
    let total_monthly_expenses = inputs.repair_fund
        + inputs.management_fee
        + inputs.insurance
        + inputs.property_tax_annual / dec!(12)
        + inputs.utilities
        + inputs.internet
        + inputs.other_costs
        + inputs.unexpected_costs;

    let noi = effective_rent - total_monthly_expenses;
    let monthly_cash_flow = noi - monthly_payment;
    let annual_cash_flow = monthly_cash_flow * dec!(12);

    let cash_on_cash_return = pct_of(annual_cash_flow, total_investment);
    let cap_rate = pct_of(noi * dec!(12), inputs.purchase_price);
    let dscr = ratio_of(noi, monthly_payment);
    let break_even_occupancy = pct_of(
        total_monthly_expenses + monthly_payment,
        inputs.expected_rent,
    );
    let total_investment_roi = pct_of(annual_cash_flow, inputs.purchase_price);
    let expense_ratio = pct_of(total_monthly_expenses, effective_rent);

    CalculationResults {
        monthly_mortgage_payment: monthly_payment,
        total_investment,
        effective_rent,
        total_monthly_expenses,
        noi,
        monthly_cash_flow,
        annual_cash_flow,
        cash_on_cash_return,
        annual_debt_service: monthly_payment * dec!(12),
        annual_operating_expenses: total_monthly_expenses * dec!(12),
        annual_rental_income: effective_rent * dec!(12),
        cap_rate,
        roi: cash_on_cash_return,
        dscr,
        break_even_occupancy,
        total_investment_roi,
        expense_ratio,
    }
}

/// Run the cash-flow calculation and wrap it in the standard output envelope
/// with an input echo and data-quality warnings.
///
/// Warnings are observational only; they never alter the computed metrics.
pub fn analyze_cash_flow(inputs: &PropertyInputs) -> ComputationOutput<CalculationResults> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if inputs.occupancy_pct < Decimal::ZERO || inputs.occupancy_pct > dec!(100) {
        warnings.push(format!(
            "Occupancy rate {}% is outside 0-100; effective rent will not be economically meaningful",
            inputs.occupancy_pct
        ));
    }

    if inputs.expected_rent < Decimal::ZERO {
        warnings.push("Expected rent is negative; results are arithmetic only".into());
    }

    if inputs.loan_amount > Decimal::ZERO && inputs.loan_term_years <= Decimal::ZERO {
        warnings.push(
            "Loan amount is set but the loan term is zero; the scenario is treated as debt-free"
                .into(),
        );
    }

    let results = calculate_cash_flow(inputs);

    if results.total_monthly_expenses < Decimal::ZERO {
        warnings.push("Total monthly expenses are negative; check expense line items".into());
    }

    if results.monthly_mortgage_payment.is_zero() && inputs.loan_amount > Decimal::ZERO {
        warnings.push("DSCR is reported as 0 because no debt service was computed".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Rental Property Cash Flow Analysis",
        inputs,
        warnings,
        elapsed,
        results,
    )
}

// ---------------------------------------------------------------------------
// Guarded ratios
// ---------------------------------------------------------------------------

/// num / den * 100, or zero when the denominator is not positive.
fn pct_of(num: Decimal, den: Decimal) -> Percent {
    if den <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        num / den * dec!(100)
    }
}

/// num / den, or zero when the denominator is not positive.
fn ratio_of(num: Decimal, den: Decimal) -> Decimal {
    if den <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        num / den
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    /// Leveraged flat with a slightly negative cash flow
    fn sample_inputs() -> PropertyInputs {
        PropertyInputs {
            purchase_price: dec!(200000),
            equity_investment: dec!(50000),
            loan_amount: dec!(150000),
            interest_rate_pct: dec!(5),
            loan_term_years: dec!(30),
            expected_rent: dec!(1200),
            occupancy_pct: dec!(95),
            repair_fund: dec!(50),
            management_fee: dec!(60),
            insurance: dec!(20),
            property_tax_annual: dec!(600),
            utilities: dec!(100),
            internet: dec!(20),
            other_costs: dec!(30),
            unexpected_costs: dec!(40),
        }
    }

    // --- Mortgage payment ---

    #[test]
    fn test_mortgage_payment_annuity() {
        // 2,000,000 at 5% over 30 years, closed-form annuity ~10,736/mo
        let payment = monthly_mortgage_payment(dec!(2000000), dec!(5), dec!(30));
        assert!(
            payment > dec!(10730) && payment < dec!(10740),
            "Monthly payment {} outside expected range",
            payment
        );
    }

    #[test]
    fn test_mortgage_payment_zero_rate() {
        // Interest-free loans amortise straight-line: 1,200,000 / 120
        let payment = monthly_mortgage_payment(dec!(1200000), Decimal::ZERO, dec!(10));
        assert_eq!(payment, dec!(10000));
    }

    #[test]
    fn test_mortgage_payment_degenerate_inputs() {
        assert_eq!(
            monthly_mortgage_payment(Decimal::ZERO, dec!(5), dec!(30)),
            Decimal::ZERO
        );
        assert_eq!(
            monthly_mortgage_payment(dec!(-100000), dec!(5), dec!(30)),
            Decimal::ZERO
        );
        assert_eq!(
            monthly_mortgage_payment(dec!(100000), dec!(5), Decimal::ZERO),
            Decimal::ZERO
        );
        assert_eq!(
            monthly_mortgage_payment(dec!(100000), dec!(5), dec!(-1)),
            Decimal::ZERO
        );
    }

    // --- Core snapshot ---

    #[test]
    fn test_effective_rent_and_expenses() {
        let results = calculate_cash_flow(&sample_inputs());

        // 1200 * 95% = 1140
        assert_eq!(results.effective_rent, dec!(1140));

        // 50 + 60 + 20 + 600/12 + 100 + 20 + 30 + 40 = 370
        assert_eq!(results.total_monthly_expenses, dec!(370));

        // NOI excludes the mortgage payment
        assert_eq!(results.noi, dec!(770));

        assert_eq!(results.annual_rental_income, dec!(13680));
        assert_eq!(results.annual_operating_expenses, dec!(4440));
        assert_eq!(results.total_investment, dec!(50000));
    }

    #[test]
    fn test_monthly_cash_flow_is_noi_less_debt_service() {
        let results = calculate_cash_flow(&sample_inputs());

        // 150,000 at 5% over 30 years is ~805/mo, leaving a small deficit
        assert!(
            results.monthly_mortgage_payment > dec!(800)
                && results.monthly_mortgage_payment < dec!(810)
        );
        assert_eq!(
            results.monthly_cash_flow,
            results.noi - results.monthly_mortgage_payment
        );
        assert!(results.monthly_cash_flow < Decimal::ZERO);
        assert_eq!(results.annual_cash_flow, results.monthly_cash_flow * dec!(12));
        assert_eq!(
            results.annual_debt_service,
            results.monthly_mortgage_payment * dec!(12)
        );
    }

    #[test]
    fn test_return_ratios() {
        let results = calculate_cash_flow(&sample_inputs());

        // Cap rate = 770 * 12 / 200,000 * 100 = 4.62%
        assert_eq!(results.cap_rate, dec!(4.62));

        // Expense ratio = 370 / 1140 * 100
        assert_eq!(
            results.expense_ratio,
            dec!(370) / dec!(1140) * dec!(100)
        );

        // DSCR just under 1x for this scenario
        assert!(results.dscr > dec!(0.9) && results.dscr < Decimal::ONE);

        // Break-even occupancy close to but below 100%
        assert!(
            results.break_even_occupancy > dec!(95)
                && results.break_even_occupancy < dec!(100)
        );
    }

    #[test]
    fn test_roi_equals_cash_on_cash() {
        let results = calculate_cash_flow(&sample_inputs());
        assert_eq!(results.roi, results.cash_on_cash_return);
    }

    // --- Guarded denominators ---

    #[test]
    fn test_zero_purchase_price_guards() {
        let mut inputs = sample_inputs();
        inputs.purchase_price = Decimal::ZERO;
        let results = calculate_cash_flow(&inputs);

        assert_eq!(results.cap_rate, Decimal::ZERO);
        assert_eq!(results.total_investment_roi, Decimal::ZERO);
    }

    #[test]
    fn test_zero_equity_guards() {
        let mut inputs = sample_inputs();
        inputs.equity_investment = Decimal::ZERO;
        let results = calculate_cash_flow(&inputs);

        assert_eq!(results.cash_on_cash_return, Decimal::ZERO);
        assert_eq!(results.roi, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rent_guards() {
        let mut inputs = sample_inputs();
        inputs.expected_rent = Decimal::ZERO;
        let results = calculate_cash_flow(&inputs);

        assert_eq!(results.break_even_occupancy, Decimal::ZERO);
        assert_eq!(results.expense_ratio, Decimal::ZERO);
    }

    #[test]
    fn test_dscr_zero_without_debt() {
        let mut inputs = sample_inputs();
        inputs.loan_amount = Decimal::ZERO;
        let results = calculate_cash_flow(&inputs);

        assert_eq!(results.monthly_mortgage_payment, Decimal::ZERO);
        assert_eq!(results.dscr, Decimal::ZERO);
    }

    // --- Period conversion ---

    #[test]
    fn test_property_tax_is_pro_rated_monthly() {
        let base = calculate_cash_flow(&sample_inputs());

        let mut doubled = sample_inputs();
        doubled.property_tax_annual = doubled.property_tax_annual * dec!(2);
        let results = calculate_cash_flow(&doubled);

        // Doubling the annual tax moves monthly expenses by exactly 600/12
        assert_eq!(
            results.total_monthly_expenses - base.total_monthly_expenses,
            dec!(50)
        );
    }

    // --- Implicitly trusted inputs ---

    #[test]
    fn test_occupancy_is_not_clamped() {
        let mut inputs = sample_inputs();
        inputs.occupancy_pct = dec!(150);
        let results = calculate_cash_flow(&inputs);
        assert_eq!(results.effective_rent, dec!(1800));

        inputs.occupancy_pct = dec!(-10);
        let results = calculate_cash_flow(&inputs);
        assert_eq!(results.effective_rent, dec!(-120));
    }

    #[test]
    fn test_negative_rent_flows_through() {
        let mut inputs = sample_inputs();
        inputs.expected_rent = dec!(-500);
        inputs.occupancy_pct = dec!(100);
        let results = calculate_cash_flow(&inputs);

        assert_eq!(results.effective_rent, dec!(-500));
        assert_eq!(results.noi, dec!(-870));
    }

    #[test]
    fn test_idempotence() {
        let inputs = sample_inputs();
        assert_eq!(calculate_cash_flow(&inputs), calculate_cash_flow(&inputs));
    }

    // --- Serde defaults ---

    #[test]
    fn test_missing_fields_deserialise_to_zero() {
        let inputs: PropertyInputs =
            serde_json::from_str(r#"{"expected_rent": "900", "occupancy_pct": "100"}"#).unwrap();

        assert_eq!(inputs.expected_rent, dec!(900));
        assert_eq!(inputs.purchase_price, Decimal::ZERO);
        assert_eq!(inputs.unexpected_costs, Decimal::ZERO);

        let results = calculate_cash_flow(&inputs);
        assert_eq!(results.monthly_cash_flow, dec!(900));
    }

    // --- Envelope ---

    #[test]
    fn test_analyze_warns_on_out_of_range_occupancy() {
        let mut inputs = sample_inputs();
        inputs.occupancy_pct = dec!(130);
        let output = analyze_cash_flow(&inputs);

        assert!(output
            .warnings
            .iter()
            .any(|w| w.contains("Occupancy rate")));
    }

    #[test]
    fn test_analyze_methodology_string() {
        let output = analyze_cash_flow(&sample_inputs());
        assert_eq!(output.methodology, "Rental Property Cash Flow Analysis");
        assert!(output.warnings.is_empty());
    }
}
