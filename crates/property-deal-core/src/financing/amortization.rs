use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Pct, HUNDRED, MONTHS_PER_YEAR};

/// How the mortgage principal is serviced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmortizationMode {
    /// Capital and interest, fixed annuity payment
    #[default]
    Repayment,
    /// Interest only; principal repaid at term end
    InterestOnly,
}

/// Loan terms supplied with a deal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingInputs {
    /// Annual interest rate in percent (5 = 5% APR)
    pub annual_rate_pct: Pct,
    /// Mortgage term in whole years
    pub term_years: u32,
    #[serde(default)]
    pub mode: AmortizationMode,
}

/// Monthly mortgage payment.
///
/// Out-of-domain inputs (non-positive principal, negative rate, zero term)
/// return 0 rather than an error. Callers must read that 0 as "not
/// computable", not as a debt-free deal.
pub fn compute_debt_service(
    principal: Money,
    annual_rate_pct: Pct,
    term_years: u32,
    mode: AmortizationMode,
) -> Money {
    if principal <= Decimal::ZERO || annual_rate_pct < Decimal::ZERO || term_years == 0 {
        return Decimal::ZERO;
    }

    match mode {
        // Multiply before dividing so round figures stay exact
        AmortizationMode::InterestOnly => principal * annual_rate_pct / HUNDRED / MONTHS_PER_YEAR,
        AmortizationMode::Repayment => {
            let monthly_rate = annual_rate_pct / HUNDRED / MONTHS_PER_YEAR;
            let total_months = u64::from(term_years) * 12;
            if monthly_rate.is_zero() {
                // Interest-free: straight-line amortisation
                return principal / Decimal::from(total_months);
            }
            annuity_payment(principal, monthly_rate, total_months)
        }
    }
}

/// Standard fixed-rate mortgage payment: P * r(1+r)^n / ((1+r)^n - 1),
/// evaluated as P * r / (1 - (1+r)^-n) so no term grows with the compound factor.
fn annuity_payment(principal: Money, monthly_rate: Decimal, total_months: u64) -> Money {
    match (Decimal::ONE + monthly_rate).checked_powu(total_months) {
        Some(compound) if compound > Decimal::ONE => {
            principal * monthly_rate / (Decimal::ONE - Decimal::ONE / compound)
        }
        // (1+r)^n beyond Decimal range: the annuity has converged on pure interest
        _ => principal * monthly_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_interest_only() {
        let payment = compute_debt_service(
            dec!(100000),
            dec!(5),
            25,
            AmortizationMode::InterestOnly,
        );
        let diff = (payment - dec!(416.6666666)).abs();
        assert!(diff < dec!(0.0001), "got {payment}");
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let payment =
            compute_debt_service(dec!(120000), Decimal::ZERO, 10, AmortizationMode::Repayment);
        assert_eq!(payment, dec!(1000));
    }

    #[test]
    fn test_repayment_annuity() {
        let payment = compute_debt_service(dec!(100000), dec!(5), 25, AmortizationMode::Repayment);
        assert!(
            (payment - dec!(584.59)).abs() < dec!(0.01),
            "Monthly payment {payment} outside expected range"
        );
    }

    #[test]
    fn test_thirty_year_sanity() {
        // £750k at 6.5% over 30 years, expected ~£4,740/mo
        let payment =
            compute_debt_service(dec!(750000), dec!(6.5), 30, AmortizationMode::Repayment);
        assert!(payment > dec!(4700) && payment < dec!(4800));
    }

    #[test]
    fn test_degenerate_inputs_return_zero() {
        let mode = AmortizationMode::Repayment;
        assert_eq!(compute_debt_service(dec!(-1), dec!(5), 25, mode), Decimal::ZERO);
        assert_eq!(compute_debt_service(Decimal::ZERO, dec!(5), 25, mode), Decimal::ZERO);
        assert_eq!(compute_debt_service(dec!(100000), dec!(5), 0, mode), Decimal::ZERO);
        assert_eq!(compute_debt_service(dec!(100000), dec!(-0.5), 25, mode), Decimal::ZERO);
    }

    #[test]
    fn test_repayment_exceeds_interest_only() {
        let io = compute_debt_service(dec!(200000), dec!(4), 25, AmortizationMode::InterestOnly);
        let rp = compute_debt_service(dec!(200000), dec!(4), 25, AmortizationMode::Repayment);
        assert!(rp > io);
    }

    #[test]
    fn test_extreme_rate_does_not_overflow() {
        let payment = compute_debt_service(dec!(100000), dec!(1000), 40, AmortizationMode::Repayment);
        let io = compute_debt_service(dec!(100000), dec!(1000), 40, AmortizationMode::InterestOnly);
        assert!((payment - io).abs() < dec!(0.01), "got {payment} vs {io}");
    }

    #[test]
    fn test_high_rate_long_term_stays_in_range() {
        // (1+r)^n fits in a Decimal here but P * r * (1+r)^n would not
        for (principal, rate, years) in [
            (dec!(100000), dec!(100), 60),
            (dec!(1000000), dec!(60), 95),
            (dec!(2500000), dec!(250), 30),
        ] {
            let payment = compute_debt_service(principal, rate, years, AmortizationMode::Repayment);
            let io = compute_debt_service(principal, rate, years, AmortizationMode::InterestOnly);
            assert!((payment - io).abs() < dec!(0.01), "got {payment} vs {io}");
        }
    }
}
