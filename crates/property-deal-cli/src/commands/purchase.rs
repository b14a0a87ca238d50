use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use property_deal_core::financing::amortization::{
    compute_debt_service, AmortizationMode, FinancingInputs,
};
use property_deal_core::purchase::context::{build_purchase_context, PurchaseInputs};
use property_deal_core::purchase::stamp_duty;
use property_deal_core::MONTHS_PER_YEAR;

use crate::input;

/// Arguments for the stamp duty calculation
#[derive(Args)]
pub struct StampDutyArgs {
    /// Purchase price
    #[arg(long)]
    pub price: Decimal,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RepaymentMode {
    Repayment,
    InterestOnly,
}

impl From<RepaymentMode> for AmortizationMode {
    fn from(mode: RepaymentMode) -> Self {
        match mode {
            RepaymentMode::Repayment => AmortizationMode::Repayment,
            RepaymentMode::InterestOnly => AmortizationMode::InterestOnly,
        }
    }
}

/// Arguments for the mortgage payment calculation
#[derive(Args)]
pub struct DebtServiceArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate in percent (e.g. 5 for 5%)
    #[arg(long)]
    pub rate: Decimal,

    /// Term in years
    #[arg(long, default_value_t = 25)]
    pub term: u32,

    #[arg(long, value_enum, default_value = "repayment")]
    pub mode: RepaymentMode,
}

/// Arguments for the purchase position
#[derive(Args)]
pub struct PurchaseArgs {
    /// Path to JSON input with `purchase` and `financing` sections
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct PurchaseRequest {
    purchase: PurchaseInputs,
    financing: FinancingInputs,
}

pub fn run_stamp_duty(args: StampDutyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = stamp_duty::calculate_stamp_duty(args.price)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_debt_service(args: DebtServiceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.principal < Decimal::ZERO {
        return Err("--principal must not be negative".into());
    }
    if args.rate < Decimal::ZERO {
        return Err("--rate must not be negative".into());
    }
    if args.term == 0 {
        return Err("--term must be at least 1 year".into());
    }

    let monthly = compute_debt_service(args.principal, args.rate, args.term, args.mode.into());
    Ok(json!({
        "result": {
            "monthly_payment": monthly.round_dp(2),
            "annual_debt_service": (monthly * MONTHS_PER_YEAR).round_dp(2),
        }
    }))
}

pub fn run_purchase(args: PurchaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::file::read_document(args.input.as_deref(), "the purchase position")?;
    let request: PurchaseRequest = serde_json::from_value(data)?;
    if request.purchase.price < Decimal::ZERO {
        return Err("purchase.price must not be negative".into());
    }
    let context = build_purchase_context(&request.purchase, &request.financing);
    Ok(json!({ "result": context }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debt_service_interest_only() {
        let value = run_debt_service(DebtServiceArgs {
            principal: dec!(150000),
            rate: dec!(5),
            term: 25,
            mode: RepaymentMode::InterestOnly,
        })
        .unwrap();
        let read = |key: &str| -> Decimal {
            value["result"][key].as_str().unwrap().parse().unwrap()
        };
        assert_eq!(read("monthly_payment"), dec!(625));
        assert_eq!(read("annual_debt_service"), dec!(7500));
    }

    #[test]
    fn test_debt_service_rejects_zero_term() {
        let err = run_debt_service(DebtServiceArgs {
            principal: dec!(150000),
            rate: dec!(5),
            term: 0,
            mode: RepaymentMode::Repayment,
        })
        .unwrap_err();
        assert!(err.to_string().contains("--term"));
    }

    #[test]
    fn test_purchase_position_from_file() {
        let path = fixtures::write_json("purchase", &fixtures::sample_deal());
        let value = run_purchase(PurchaseArgs { input: Some(path) }).unwrap();
        let context: property_deal_core::purchase::context::PurchaseContext =
            serde_json::from_value(value["result"].clone()).unwrap();
        assert_eq!(context.tax, dec!(10100));
        assert_eq!(context.loan, dec!(135000));
        assert_eq!(context.upfront_cash, dec!(57500));
    }
}
