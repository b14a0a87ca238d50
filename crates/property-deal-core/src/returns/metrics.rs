use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::proforma::assumptions::{Assumptions, Regime, StrAssumptions};
use crate::proforma::engine::ProformaResult;
use crate::types::{Money, Pct, Rate, Ratio, HUNDRED, NIGHTS_PER_YEAR};

/// Break-even occupancy of a short-term let.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEven {
    /// Fraction of nights (0-1) at which NOI covers annual debt service
    Occupancy(Rate),
    /// Each occupied night loses money after fees and cleaning, so no
    /// occupancy breaks even
    Undefined,
}

impl BreakEven {
    /// Numeric projection; an undefined break-even reads as 0.
    pub fn as_fraction(&self) -> Rate {
        match self {
            BreakEven::Occupancy(f) => *f,
            BreakEven::Undefined => Decimal::ZERO,
        }
    }
}

/// Short-term let drivers needed to invert the pro-forma for break-even.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrBreakEvenParams {
    pub nightly_rate: Money,
    /// Management + platform, % of revenue
    pub revenue_fees_pct: Pct,
    pub cleaning_cost_per_night: Money,
    /// Fixed costs excluding debt service
    pub annual_fixed_costs: Money,
}

impl From<&StrAssumptions> for StrBreakEvenParams {
    fn from(str_let: &StrAssumptions) -> Self {
        StrBreakEvenParams {
            nightly_rate: str_let.nightly_rate,
            revenue_fees_pct: str_let.revenue_fees_pct(),
            cleaning_cost_per_night: str_let.cleaning.cost_per_occupied_night(),
            annual_fixed_costs: str_let.annual_fixed_costs(),
        }
    }
}

/// Regime-specific extras for the ROI metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegimeParams {
    Ltr,
    Str(StrBreakEvenParams),
}

impl From<&Assumptions> for RegimeParams {
    fn from(assumptions: &Assumptions) -> Self {
        match assumptions {
            Assumptions::Ltr(_) => RegimeParams::Ltr,
            Assumptions::Str(str_let) => RegimeParams::Str(str_let.into()),
        }
    }
}

/// Return metrics derived from a completed pro-forma.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiMetrics {
    pub regime: Regime,
    /// Annual NOI / annual debt service
    pub dscr: Ratio,
    /// Years of cashflow needed to recover the upfront cash
    pub payback_years: Ratio,
    /// Short-term lets only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_even_occupancy: Option<BreakEven>,
}

/// Derive DSCR, payback and (STR only) break-even occupancy.
pub fn compute_roi_metrics(
    proforma: &ProformaResult,
    upfront_cash: Money,
    params: &RegimeParams,
) -> RoiMetrics {
    let annual_debt_service = proforma.debt_service.annual;

    let break_even_occupancy = match params {
        RegimeParams::Ltr => None,
        RegimeParams::Str(p) => Some(break_even_occupancy(p, annual_debt_service)),
    };

    RoiMetrics {
        regime: proforma.regime,
        dscr: dscr(proforma.noi.annual, annual_debt_service),
        payback_years: payback_years(upfront_cash, proforma.cashflow.annual),
        break_even_occupancy,
    }
}

/// NOI / debt service; infinite when there is no debt service.
pub fn dscr(noi_annual: Money, debt_service_annual: Money) -> Ratio {
    if debt_service_annual.is_zero() {
        Ratio::Infinite
    } else {
        Ratio::Finite(noi_annual / debt_service_annual)
    }
}

/// Upfront cash / annual cashflow; infinite when cashflow never recovers it.
pub fn payback_years(upfront_cash: Money, cashflow_annual: Money) -> Ratio {
    if cashflow_annual <= Decimal::ZERO {
        Ratio::Infinite
    } else {
        Ratio::Finite(upfront_cash / cashflow_annual)
    }
}

/// Occupancy at which a nightly let covers its fixed costs and mortgage.
///
/// Contribution per occupied night:
/// m = rate * (1 - fees%) - cleaning per night.
/// Break-even = (fixed + debt service) / (m * 365), clamped to [0, 1].
pub fn break_even_occupancy(params: &StrBreakEvenParams, annual_debt_service: Money) -> BreakEven {
    let fee_share = params.revenue_fees_pct / HUNDRED;
    let margin = params.nightly_rate * (Decimal::ONE - fee_share) - params.cleaning_cost_per_night;

    if margin <= Decimal::ZERO {
        return BreakEven::Undefined;
    }

    let required = (params.annual_fixed_costs + annual_debt_service) / (margin * NIGHTS_PER_YEAR);
    BreakEven::Occupancy(required.clamp(Decimal::ZERO, Decimal::ONE))
}
