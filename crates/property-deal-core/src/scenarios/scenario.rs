use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::proforma::assumptions::{Assumptions, LtrAssumptions, Regime, StrAssumptions};
use crate::proforma::engine::{compute_proforma, ProformaResult};
use crate::types::{Money, Pct, HUNDRED};

/// Sensitivity shocks applied symmetrically for the worst and best cases.
///
/// All deltas are non-negative magnitudes; the direction comes from the case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDeltas {
    /// LTR: % change in monthly rent
    #[serde(default = "default_delta")]
    pub rent_delta_pct: Pct,
    /// LTR: % change in the voids/management/maintenance rates
    #[serde(default = "default_delta")]
    pub cost_delta_pct: Pct,
    /// STR: occupancy change in percentage points
    #[serde(default = "default_delta")]
    pub occupancy_delta_points: Pct,
    /// STR: % change in the nightly rate
    #[serde(default = "default_delta")]
    pub nightly_rate_delta_pct: Pct,
}

fn default_delta() -> Pct {
    dec!(10)
}

impl Default for ScenarioDeltas {
    fn default() -> Self {
        ScenarioDeltas {
            rent_delta_pct: default_delta(),
            cost_delta_pct: default_delta(),
            occupancy_delta_points: default_delta(),
            nightly_rate_delta_pct: default_delta(),
        }
    }
}

/// Worst / base / best pro-formas for one regime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioTriple {
    pub regime: Regime,
    pub worst: ProformaResult,
    pub base: ProformaResult,
    pub best: ProformaResult,
    /// best - worst annual cashflow
    pub cashflow_spread_annual: Money,
}

/// Cashflow headline of one case, for tabular output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRow {
    #[serde(rename = "Case")]
    pub case: String,
    #[serde(rename = "Annual revenue")]
    pub revenue_annual: Money,
    #[serde(rename = "Annual NOI")]
    pub noi_annual: Money,
    #[serde(rename = "Monthly cashflow")]
    pub cashflow_monthly: Money,
    #[serde(rename = "Annual cashflow")]
    pub cashflow_annual: Money,
    #[serde(rename = "Cash-on-cash (%)")]
    pub cash_on_cash_pct: Decimal,
}

impl ScenarioTriple {
    /// Worst, base and best as rows, rounded to pennies.
    pub fn rows(&self) -> Vec<ScenarioRow> {
        [("Worst", &self.worst), ("Base", &self.base), ("Best", &self.best)]
            .into_iter()
            .map(|(case, p)| ScenarioRow {
                case: case.to_string(),
                revenue_annual: p.revenue.annual.round_dp(2),
                noi_annual: p.noi.annual.round_dp(2),
                cashflow_monthly: p.cashflow.monthly.round_dp(2),
                cashflow_annual: p.cashflow.annual.round_dp(2),
                cash_on_cash_pct: p.cash_on_cash_pct.round_dp(2),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Worst,
    Best,
}

impl Case {
    /// +1 for the best case, -1 for the worst.
    fn sign(self) -> Decimal {
        match self {
            Case::Worst => Decimal::NEGATIVE_ONE,
            Case::Best => Decimal::ONE,
        }
    }
}

/// Recompute a regime's pro-forma under worst and best shocks.
///
/// Every case is an independent recomputation from `base`; nothing carries
/// over between runs. Debt service and the purchase position are unchanged.
pub fn compute_scenarios(
    base: &Assumptions,
    deltas: &ScenarioDeltas,
    debt_service_monthly: Money,
    price: Money,
    upfront_cash: Money,
) -> ScenarioTriple {
    let run = |assumptions: &Assumptions| {
        compute_proforma(assumptions, debt_service_monthly, price, upfront_cash)
    };

    let worst = run(&perturb(base, deltas, Case::Worst));
    let base_case = run(base);
    let best = run(&perturb(base, deltas, Case::Best));

    ScenarioTriple {
        regime: base.regime(),
        cashflow_spread_annual: best.cashflow.annual - worst.cashflow.annual,
        worst,
        base: base_case,
        best,
    }
}

fn perturb(base: &Assumptions, deltas: &ScenarioDeltas, case: Case) -> Assumptions {
    match base {
        Assumptions::Ltr(ltr) => Assumptions::Ltr(perturb_ltr(ltr, deltas, case)),
        Assumptions::Str(str_let) => Assumptions::Str(perturb_str(str_let, deltas, case)),
    }
}

/// Scale `value` by (1 + sign * pct/100), floored at zero.
fn shift_pct(value: Decimal, pct: Pct, sign: Decimal) -> Decimal {
    (value * (Decimal::ONE + sign * pct / HUNDRED)).max(Decimal::ZERO)
}

fn perturb_ltr(ltr: &LtrAssumptions, deltas: &ScenarioDeltas, case: Case) -> LtrAssumptions {
    let sign = case.sign();
    // Costs move against rent: the worst case raises them
    let cost_sign = -sign;
    LtrAssumptions {
        monthly_rent: shift_pct(ltr.monthly_rent, deltas.rent_delta_pct, sign),
        voids_pct: shift_pct(ltr.voids_pct, deltas.cost_delta_pct, cost_sign),
        management_pct: shift_pct(ltr.management_pct, deltas.cost_delta_pct, cost_sign),
        maintenance_pct: shift_pct(ltr.maintenance_pct, deltas.cost_delta_pct, cost_sign),
        ..ltr.clone()
    }
}

fn perturb_str(str_let: &StrAssumptions, deltas: &ScenarioDeltas, case: Case) -> StrAssumptions {
    let sign = case.sign();
    let occupancy = (str_let.occupancy_pct + sign * deltas.occupancy_delta_points)
        .clamp(Decimal::ZERO, HUNDRED);
    StrAssumptions {
        nightly_rate: shift_pct(str_let.nightly_rate, deltas.nightly_rate_delta_pct, sign),
        occupancy_pct: occupancy,
        ..str_let.clone()
    }
}
