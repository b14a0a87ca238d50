use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::financing::amortization::{compute_debt_service, AmortizationMode, FinancingInputs};
use crate::purchase::stamp_duty::compute_tax;
use crate::types::{ratio_or_zero, Money, Pct, Rate, HUNDRED, MONTHS_PER_YEAR};

/// One-off acquisition costs paid in cash at completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneOffCosts {
    /// Legal & conveyancing
    #[serde(default)]
    pub legal: Money,
    /// Broker / arrangement fees
    #[serde(default)]
    pub broker: Money,
    /// Survey & searches
    #[serde(default)]
    pub survey: Money,
    /// Refurbishment / furniture
    #[serde(default)]
    pub refurbishment: Money,
    #[serde(default)]
    pub other: Money,
}

impl OneOffCosts {
    pub fn total(&self) -> Money {
        self.legal + self.broker + self.survey + self.refurbishment + self.other
    }
}

/// Acquisition inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseInputs {
    /// Purchase price
    pub price: Money,
    /// Deposit as a percentage of price (0-100)
    pub deposit_pct: Pct,
    #[serde(default)]
    pub one_off_costs: OneOffCosts,
    /// Manually entered stamp duty, replacing the band calculation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_override: Option<Money>,
}

/// Upfront position of a deal, built once and shared by both regimes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseContext {
    pub price: Money,
    pub deposit: Money,
    pub loan: Money,
    /// Stamp duty actually charged (override or band calculation)
    pub tax: Money,
    /// Whether `tax` came from `tax_override`
    pub tax_overridden: bool,
    pub one_off_costs: Money,
    /// deposit + tax + one-off costs
    pub upfront_cash: Money,
    /// Loan-to-value (loan / price, 0 when price is 0)
    pub ltv: Rate,
    pub mode: AmortizationMode,
    /// Monthly mortgage payment, identical for LTR and STR
    pub monthly_debt_service: Money,
    pub annual_debt_service: Money,
}

/// Aggregate price, deposit, loan, tax and one-off costs into the cash
/// required to complete, and attach the mortgage payment.
pub fn build_purchase_context(
    purchase: &PurchaseInputs,
    financing: &FinancingInputs,
) -> PurchaseContext {
    let price = purchase.price;
    let deposit = price * purchase.deposit_pct / HUNDRED;
    let loan = (price - deposit).max(Decimal::ZERO);

    let (tax, tax_overridden) = match purchase.tax_override {
        Some(manual) => (manual, true),
        None => (compute_tax(price), false),
    };

    let one_off_costs = purchase.one_off_costs.total();
    let upfront_cash = deposit + tax + one_off_costs;

    let monthly_debt_service = compute_debt_service(
        loan,
        financing.annual_rate_pct,
        financing.term_years,
        financing.mode,
    );

    PurchaseContext {
        price,
        deposit,
        loan,
        tax,
        tax_overridden,
        one_off_costs,
        upfront_cash,
        ltv: ratio_or_zero(loan, price),
        mode: financing.mode,
        monthly_debt_service,
        annual_debt_service: monthly_debt_service * MONTHS_PER_YEAR,
    }
}
