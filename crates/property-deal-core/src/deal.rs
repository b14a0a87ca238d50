use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PropertyDealError;
use crate::financing::amortization::{AmortizationMode, FinancingInputs};
use crate::proforma::assumptions::{
    Assumptions, CleaningPolicy, LtrAssumptions, Regime, StrAssumptions,
};
use crate::proforma::engine::{compute_proforma, ProformaResult};
use crate::purchase::context::{build_purchase_context, PurchaseContext, PurchaseInputs};
use crate::returns::metrics::{compute_roi_metrics, BreakEven, RegimeParams, RoiMetrics};
#[cfg(feature = "scenarios")]
use crate::scenarios::scenario::{compute_scenarios, ScenarioDeltas, ScenarioTriple};
use crate::types::{with_metadata, ComputationOutput, Money, Ratio, HUNDRED};
use crate::PropertyDealResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A complete deal: purchase, mortgage, and assumptions for both regimes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealInput {
    pub purchase: PurchaseInputs,
    pub financing: FinancingInputs,
    pub long_term: LtrAssumptions,
    pub short_term: StrAssumptions,
    #[cfg(feature = "scenarios")]
    #[serde(default)]
    pub scenario_deltas: ScenarioDeltas,
}

impl DealInput {
    /// Deserialise a deal from a JSON document.
    pub fn from_value(value: serde_json::Value) -> PropertyDealResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Pro-forma, metrics and scenarios for one regime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeAnalysis {
    pub proforma: ProformaResult,
    pub metrics: RoiMetrics,
    #[cfg(feature = "scenarios")]
    pub scenarios: ScenarioTriple,
}

/// One row of the regime comparison, with the export column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "Scenario")]
    pub regime: String,
    #[serde(rename = "Monthly cashflow")]
    pub monthly_cashflow: Money,
    #[serde(rename = "Annual cashflow")]
    pub annual_cashflow: Money,
    #[serde(rename = "Cash-on-cash (%)")]
    pub cash_on_cash_pct: Decimal,
}

impl From<&ProformaResult> for SummaryRow {
    fn from(proforma: &ProformaResult) -> Self {
        SummaryRow {
            regime: proforma.regime.label().to_string(),
            monthly_cashflow: proforma.cashflow.monthly.round_dp(2),
            annual_cashflow: proforma.cashflow.annual.round_dp(2),
            cash_on_cash_pct: proforma.cash_on_cash_pct.round_dp(2),
        }
    }
}

/// Full appraisal of a deal under both regimes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealAnalysisOutput {
    pub purchase: PurchaseContext,
    pub long_term: RegimeAnalysis,
    pub short_term: RegimeAnalysis,
    pub summary: Vec<SummaryRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Appraise a deal as a long-term and a short-term let.
///
/// Runs the purchase context, both pro-formas, their return metrics and
/// (with the `scenarios` feature) worst/base/best sensitivities. Unusual
/// but computable outcomes are reported as warnings.
pub fn analyse_deal(input: &DealInput) -> PropertyDealResult<ComputationOutput<DealAnalysisOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let purchase = build_purchase_context(&input.purchase, &input.financing);
    purchase_warnings(&purchase, &mut warnings);

    let long_term = analyse_regime(
        &Assumptions::Ltr(input.long_term.clone()),
        input,
        &purchase,
        &mut warnings,
    );
    let short_term = analyse_regime(
        &Assumptions::Str(input.short_term.clone()),
        input,
        &purchase,
        &mut warnings,
    );

    let summary = summary_rows(&long_term.proforma, &short_term.proforma);

    let output = DealAnalysisOutput {
        purchase,
        long_term,
        short_term,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Buy-to-Let Deal Appraisal (LTR vs STR)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Appraise a deal under one regime only.
pub fn analyse_single_regime(
    input: &DealInput,
    regime: Regime,
) -> PropertyDealResult<ComputationOutput<RegimeAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let purchase = build_purchase_context(&input.purchase, &input.financing);
    purchase_warnings(&purchase, &mut warnings);

    let assumptions = match regime {
        Regime::Ltr => Assumptions::Ltr(input.long_term.clone()),
        Regime::Str => Assumptions::Str(input.short_term.clone()),
    };
    let output = analyse_regime(&assumptions, input, &purchase, &mut warnings);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!("Buy-to-Let Operating Pro-forma ({})", regime.label()),
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Regime comparison rows: long-term let first, then short-term let.
pub fn summary_rows(long_term: &ProformaResult, short_term: &ProformaResult) -> Vec<SummaryRow> {
    vec![SummaryRow::from(long_term), SummaryRow::from(short_term)]
}

fn analyse_regime(
    assumptions: &Assumptions,
    #[cfg_attr(not(feature = "scenarios"), allow(unused_variables))] input: &DealInput,
    purchase: &PurchaseContext,
    warnings: &mut Vec<String>,
) -> RegimeAnalysis {
    let proforma = compute_proforma(
        assumptions,
        purchase.monthly_debt_service,
        purchase.price,
        purchase.upfront_cash,
    );
    let metrics = compute_roi_metrics(
        &proforma,
        purchase.upfront_cash,
        &RegimeParams::from(assumptions),
    );

    regime_warnings(assumptions, &proforma, &metrics, warnings);

    #[cfg(feature = "scenarios")]
    let scenarios = compute_scenarios(
        assumptions,
        &input.scenario_deltas,
        purchase.monthly_debt_service,
        purchase.price,
        purchase.upfront_cash,
    );

    RegimeAnalysis {
        proforma,
        metrics,
        #[cfg(feature = "scenarios")]
        scenarios,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn require_non_negative(field: &str, value: Decimal) -> PropertyDealResult<()> {
    if value < Decimal::ZERO {
        return Err(PropertyDealError::InvalidInput {
            field: field.into(),
            reason: "Must not be negative".into(),
        });
    }
    Ok(())
}

fn require_percentage(field: &str, value: Decimal) -> PropertyDealResult<()> {
    if value < Decimal::ZERO || value > HUNDRED {
        return Err(PropertyDealError::InvalidInput {
            field: field.into(),
            reason: "Must be between 0 and 100".into(),
        });
    }
    Ok(())
}

/// Reject inputs outside the ranges the engine is defined for.
pub fn validate_input(input: &DealInput) -> PropertyDealResult<()> {
    let purchase = &input.purchase;
    require_non_negative("purchase.price", purchase.price)?;
    require_percentage("purchase.deposit_pct", purchase.deposit_pct)?;

    let costs = &purchase.one_off_costs;
    for (field, value) in [
        ("purchase.one_off_costs.legal", costs.legal),
        ("purchase.one_off_costs.broker", costs.broker),
        ("purchase.one_off_costs.survey", costs.survey),
        ("purchase.one_off_costs.refurbishment", costs.refurbishment),
        ("purchase.one_off_costs.other", costs.other),
    ] {
        require_non_negative(field, value)?;
    }
    if let Some(tax) = purchase.tax_override {
        require_non_negative("purchase.tax_override", tax)?;
    }

    require_non_negative("financing.annual_rate_pct", input.financing.annual_rate_pct)?;
    if input.financing.term_years < 1 {
        return Err(PropertyDealError::InvalidInput {
            field: "financing.term_years".into(),
            reason: "Mortgage term must be at least 1 year".into(),
        });
    }

    let ltr = &input.long_term;
    require_non_negative("long_term.monthly_rent", ltr.monthly_rent)?;
    require_percentage("long_term.voids_pct", ltr.voids_pct)?;
    require_percentage("long_term.management_pct", ltr.management_pct)?;
    require_percentage("long_term.maintenance_pct", ltr.maintenance_pct)?;

    let str_let = &input.short_term;
    require_non_negative("short_term.nightly_rate", str_let.nightly_rate)?;
    require_percentage("short_term.occupancy_pct", str_let.occupancy_pct)?;
    require_percentage("short_term.management_pct", str_let.management_pct)?;
    require_percentage("short_term.platform_fee_pct", str_let.platform_fee_pct)?;
    if let CleaningPolicy::PerStay {
        average_stay_nights,
        ..
    } = str_let.cleaning
    {
        if average_stay_nights <= Decimal::ZERO {
            return Err(PropertyDealError::InvalidInput {
                field: "short_term.cleaning.average_stay_nights".into(),
                reason: "Average stay must be positive for per-stay cleaning".into(),
            });
        }
    }

    #[cfg(feature = "scenarios")]
    {
        let d = &input.scenario_deltas;
        require_non_negative("scenario_deltas.rent_delta_pct", d.rent_delta_pct)?;
        require_non_negative("scenario_deltas.cost_delta_pct", d.cost_delta_pct)?;
        require_non_negative("scenario_deltas.occupancy_delta_points", d.occupancy_delta_points)?;
        require_non_negative("scenario_deltas.nightly_rate_delta_pct", d.nightly_rate_delta_pct)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

fn purchase_warnings(purchase: &PurchaseContext, warnings: &mut Vec<String>) {
    if purchase.loan > Decimal::ZERO && purchase.monthly_debt_service.is_zero() {
        warnings.push(
            "Mortgage payment could not be computed from the loan terms; debt service shown as 0"
                .into(),
        );
    }
    if purchase.tax_overridden {
        warnings.push(format!(
            "Stamp duty overridden manually ({}); band calculation not applied",
            purchase.tax
        ));
    }
    if purchase.mode == AmortizationMode::InterestOnly && purchase.loan > Decimal::ZERO {
        warnings.push(format!(
            "Interest-only mortgage; loan of {} remains outstanding at term end",
            purchase.loan.round_dp(2)
        ));
    }
    if purchase.ltv > dec!(0.80) {
        warnings.push(format!(
            "LTV of {:.1}% exceeds 80%; high leverage",
            purchase.ltv * HUNDRED
        ));
    }
}

fn regime_warnings(
    assumptions: &Assumptions,
    proforma: &ProformaResult,
    metrics: &RoiMetrics,
    warnings: &mut Vec<String>,
) {
    let label = proforma.regime.label();

    if let Ratio::Finite(dscr) = metrics.dscr {
        if dscr < Decimal::ONE {
            warnings.push(format!(
                "{label}: DSCR of {dscr:.2} is below 1.00x; NOI does not cover the mortgage"
            ));
        }
    }

    if proforma.cashflow.annual < Decimal::ZERO {
        warnings.push(format!(
            "{label}: negative annual cashflow of {}",
            proforma.cashflow.annual.round_dp(2)
        ));
    }

    if let (Assumptions::Str(str_let), Some(be)) = (assumptions, metrics.break_even_occupancy) {
        match be {
            BreakEven::Undefined => warnings.push(format!(
                "{label}: nightly rate after fees does not cover cleaning; break-even occupancy undefined"
            )),
            BreakEven::Occupancy(f) => {
                let assumed = str_let.occupancy_pct / HUNDRED;
                if f > assumed {
                    warnings.push(format!(
                        "{label}: break-even occupancy {:.1}% exceeds assumed occupancy {:.1}%",
                        f * HUNDRED,
                        str_let.occupancy_pct
                    ));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::purchase::context::OneOffCosts;
    use pretty_assertions::assert_eq;

    /// £100k purchase, 25% down, 5% over 25 years
    fn sample_input() -> DealInput {
        DealInput {
            purchase: PurchaseInputs {
                price: dec!(100000),
                deposit_pct: dec!(25),
                one_off_costs: OneOffCosts {
                    legal: dec!(1500),
                    broker: dec!(500),
                    survey: dec!(400),
                    refurbishment: Decimal::ZERO,
                    other: Decimal::ZERO,
                },
                tax_override: None,
            },
            financing: FinancingInputs {
                annual_rate_pct: dec!(5),
                term_years: 25,
                mode: AmortizationMode::Repayment,
            },
            long_term: LtrAssumptions {
                monthly_rent: dec!(800),
                voids_pct: dec!(5),
                management_pct: dec!(10),
                maintenance_pct: dec!(5),
                service_charge_annual: Decimal::ZERO,
                ground_rent_annual: Decimal::ZERO,
                insurance_annual: dec!(250),
                letting_fees_annual: Decimal::ZERO,
                other_monthly: Decimal::ZERO,
            },
            short_term: StrAssumptions {
                nightly_rate: dec!(100),
                occupancy_pct: dec!(60),
                cleaning: CleaningPolicy::PerStay {
                    cost_per_stay: dec!(40),
                    average_stay_nights: dec!(3),
                },
                management_pct: dec!(15),
                platform_fee_pct: dec!(3),
                utilities_monthly: dec!(250),
                linen_monthly: dec!(60),
                rates_annual: Decimal::ZERO,
            },
            #[cfg(feature = "scenarios")]
            scenario_deltas: ScenarioDeltas::default(),
        }
    }

    #[test]
    fn test_purchase_position() {
        let result = analyse_deal(&sample_input()).unwrap();
        let p = &result.result.purchase;
        assert_eq!(p.deposit, dec!(25000));
        assert_eq!(p.loan, dec!(75000));
        assert_eq!(p.tax, dec!(5000));
        // 25000 + 5000 + 2400
        assert_eq!(p.upfront_cash, dec!(32400));
    }

    #[test]
    fn test_debt_service_shared_by_both_regimes() {
        let result = analyse_deal(&sample_input()).unwrap();
        let out = &result.result;
        assert_eq!(
            out.long_term.proforma.debt_service,
            out.short_term.proforma.debt_service
        );
        assert_eq!(
            out.long_term.proforma.debt_service.monthly,
            out.purchase.monthly_debt_service
        );
    }

    #[test]
    fn test_summary_rows() {
        let result = analyse_deal(&sample_input()).unwrap();
        let out = &result.result;
        assert_eq!(out.summary.len(), 2);
        assert_eq!(out.summary[0].regime, "Long-term let");
        assert_eq!(out.summary[1].regime, "Short-term let");
        assert_eq!(
            out.summary[0].annual_cashflow,
            out.long_term.proforma.cashflow.annual.round_dp(2)
        );
    }

    #[test]
    fn test_summary_row_column_names() {
        let row = SummaryRow {
            regime: "Long-term let".into(),
            monthly_cashflow: dec!(100),
            annual_cashflow: dec!(1200),
            cash_on_cash_pct: dec!(4.5),
        };
        let json = serde_json::to_value(&row).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["Scenario", "Monthly cashflow", "Annual cashflow", "Cash-on-cash (%)"] {
            assert!(obj.contains_key(key), "missing column {key}");
        }
    }

    #[test]
    fn test_methodology_string() {
        let result = analyse_deal(&sample_input()).unwrap();
        assert_eq!(result.methodology, "Buy-to-Let Deal Appraisal (LTR vs STR)");
    }

    #[test]
    fn test_short_term_break_even_reported() {
        let result = analyse_deal(&sample_input()).unwrap();
        let out = &result.result;
        assert!(out.long_term.metrics.break_even_occupancy.is_none());
        let be = out.short_term.metrics.break_even_occupancy.unwrap();
        assert!(matches!(be, BreakEven::Occupancy(_)));
    }

    #[test]
    fn test_invalid_deposit_rejected() {
        let mut input = sample_input();
        input.purchase.deposit_pct = dec!(120);
        let err = analyse_deal(&input).unwrap_err();
        assert!(err.to_string().contains("deposit_pct"));
    }

    #[test]
    fn test_zero_term_rejected() {
        let mut input = sample_input();
        input.financing.term_years = 0;
        assert!(analyse_deal(&input).is_err());
    }

    #[test]
    fn test_zero_average_stay_rejected() {
        let mut input = sample_input();
        input.short_term.cleaning = CleaningPolicy::PerStay {
            cost_per_stay: dec!(40),
            average_stay_nights: Decimal::ZERO,
        };
        assert!(analyse_deal(&input).is_err());
    }

    #[test]
    fn test_occupancy_out_of_range_rejected() {
        let mut input = sample_input();
        input.short_term.occupancy_pct = dec!(101);
        assert!(analyse_deal(&input).is_err());
    }

    #[test]
    fn test_negative_cashflow_warning() {
        let mut input = sample_input();
        input.long_term.monthly_rent = dec!(300);
        let result = analyse_deal(&input).unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| w.starts_with("Long-term let: negative annual cashflow")));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.starts_with("Long-term let: DSCR")));
    }

    #[test]
    fn test_tax_override_and_interest_only_warnings() {
        let mut input = sample_input();
        input.purchase.tax_override = Some(dec!(1000));
        input.financing.mode = AmortizationMode::InterestOnly;
        let result = analyse_deal(&input).unwrap();
        assert_eq!(result.result.purchase.tax, dec!(1000));
        assert!(result.warnings.iter().any(|w| w.contains("overridden")));
        assert!(result.warnings.iter().any(|w| w.contains("Interest-only")));
    }

    #[test]
    fn test_undefined_break_even_warning() {
        let mut input = sample_input();
        input.short_term.cleaning = CleaningPolicy::PerOccupiedNight {
            cost_per_night: dec!(95),
        };
        let result = analyse_deal(&input).unwrap();
        assert_eq!(
            result.result.short_term.metrics.break_even_occupancy,
            Some(BreakEven::Undefined)
        );
        assert!(result.warnings.iter().any(|w| w.contains("undefined")));
    }

    #[test]
    fn test_cash_purchase_has_infinite_dscr() {
        let mut input = sample_input();
        input.purchase.deposit_pct = dec!(100);
        let result = analyse_deal(&input).unwrap();
        assert!(result.result.long_term.metrics.dscr.is_infinite());
        assert!(result.result.short_term.metrics.dscr.is_infinite());
    }

    #[test]
    fn test_from_value_reports_serialization_error() {
        let err = DealInput::from_value(serde_json::json!({ "purchase": 5 })).unwrap_err();
        assert!(matches!(err, PropertyDealError::SerializationError(_)));
    }

    #[test]
    fn test_single_regime_matches_full_appraisal() {
        let input = sample_input();
        let full = analyse_deal(&input).unwrap();
        let single = analyse_single_regime(&input, Regime::Str).unwrap();
        assert_eq!(single.result.proforma, full.result.short_term.proforma);
        assert_eq!(single.result.metrics, full.result.short_term.metrics);
        assert_eq!(
            single.methodology,
            "Buy-to-Let Operating Pro-forma (Short-term let)"
        );
    }

    #[cfg(feature = "scenarios")]
    #[test]
    fn test_input_deltas_reach_each_regime() {
        let mut input = sample_input();
        input.scenario_deltas = ScenarioDeltas {
            rent_delta_pct: Decimal::ZERO,
            cost_delta_pct: Decimal::ZERO,
            occupancy_delta_points: Decimal::ZERO,
            nightly_rate_delta_pct: Decimal::ZERO,
        };
        let result = analyse_deal(&input).unwrap();
        for regime in [&result.result.long_term, &result.result.short_term] {
            assert_eq!(regime.scenarios.worst, regime.scenarios.base);
            assert_eq!(regime.scenarios.cashflow_spread_annual, Decimal::ZERO);
        }
    }

    #[cfg(feature = "scenarios")]
    #[test]
    fn test_scenarios_attached() {
        let result = analyse_deal(&sample_input()).unwrap();
        let st = &result.result.short_term.scenarios;
        assert_eq!(st.base, result.result.short_term.proforma);
        assert!(st.best.cashflow.annual >= st.worst.cashflow.annual);
    }
}
