use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::proforma::assumptions::{Assumptions, LtrAssumptions, Regime, StrAssumptions};
use crate::types::{ratio_or_zero, Money, Period, Rate, HUNDRED};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Period in which a regime's line items are natively stated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    Monthly,
    Annual,
}

/// A signed line of the operating statement (income positive, costs negative).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub amount: Money,
}

impl LineItem {
    fn income(label: &str, amount: Money) -> Self {
        LineItem {
            label: label.into(),
            amount,
        }
    }

    fn cost(label: &str, amount: Money) -> Self {
        LineItem {
            label: label.into(),
            amount: -amount,
        }
    }
}

/// Steady-state operating statement for one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProformaResult {
    pub regime: Regime,
    pub revenue: Period,
    pub operating_costs: Period,
    /// Net operating income: revenue - operating costs, before debt service
    pub noi: Period,
    pub debt_service: Period,
    /// NOI - debt service
    pub cashflow: Period,
    /// Annual revenue / price (0 when price is 0)
    pub gross_yield: Rate,
    /// Annual NOI / price (0 when price is 0)
    pub net_yield: Rate,
    /// Annual cashflow / upfront cash x 100 (0 when upfront cash <= 0)
    pub cash_on_cash_pct: Decimal,
    /// Period the breakdown is stated in
    pub breakdown_basis: Basis,
    pub breakdown: Vec<LineItem>,
}

/// Regime-specific revenue and operating cost model, before aggregation.
struct OperatingModel {
    revenue: Period,
    operating_costs: Period,
    basis: Basis,
    income: LineItem,
    costs: Vec<LineItem>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the operating pro-forma for either regime.
///
/// Both regimes share one aggregation: NOI = revenue - operating costs and
/// cashflow = NOI - debt service, applied to the monthly and annual figures
/// independently so each annual identity holds exactly. LTR figures are
/// monthly-first (annual = x12), STR figures annual-first (monthly = /12).
pub fn compute_proforma(
    assumptions: &Assumptions,
    debt_service_monthly: Money,
    price: Money,
    upfront_cash: Money,
) -> ProformaResult {
    let model = match assumptions {
        Assumptions::Ltr(ltr) => long_term_model(ltr),
        Assumptions::Str(str_let) => short_term_model(str_let),
    };

    let debt_service = Period::from_monthly(debt_service_monthly);
    let noi = subtract(model.revenue, model.operating_costs);
    let cashflow = subtract(noi, debt_service);

    let mortgage = match model.basis {
        Basis::Monthly => debt_service.monthly,
        Basis::Annual => debt_service.annual,
    };
    let mut breakdown = Vec::with_capacity(model.costs.len() + 2);
    breakdown.push(model.income);
    breakdown.extend(model.costs);
    breakdown.push(LineItem::cost("Mortgage", mortgage));

    ProformaResult {
        regime: assumptions.regime(),
        revenue: model.revenue,
        operating_costs: model.operating_costs,
        noi,
        debt_service,
        cashflow,
        gross_yield: ratio_or_zero(model.revenue.annual, price),
        net_yield: ratio_or_zero(noi.annual, price),
        cash_on_cash_pct: ratio_or_zero(cashflow.annual, upfront_cash) * HUNDRED,
        breakdown_basis: model.basis,
        breakdown,
    }
}

fn subtract(a: Period, b: Period) -> Period {
    Period {
        monthly: a.monthly - b.monthly,
        annual: a.annual - b.annual,
    }
}

// ---------------------------------------------------------------------------
// Regime models
// ---------------------------------------------------------------------------

fn long_term_model(ltr: &LtrAssumptions) -> OperatingModel {
    let rent = ltr.monthly_rent;
    let management = rent * ltr.management_pct / HUNDRED;
    let maintenance = rent * ltr.maintenance_pct / HUNDRED;
    let voids = rent * ltr.voids_pct / HUNDRED;
    let fixed = ltr.monthly_fixed_costs();

    let opex = management + maintenance + voids + fixed;

    OperatingModel {
        revenue: Period::from_monthly(rent),
        operating_costs: Period::from_monthly(opex),
        basis: Basis::Monthly,
        income: LineItem::income("Rent", rent),
        costs: vec![
            LineItem::cost("Management", management),
            LineItem::cost("Maintenance", maintenance),
            LineItem::cost("Voids", voids),
            LineItem::cost("Fixed costs", fixed),
        ],
    }
}

fn short_term_model(str_let: &StrAssumptions) -> OperatingModel {
    let nights = str_let.occupied_nights();
    let revenue = str_let.nightly_rate * nights;
    let management = revenue * str_let.management_pct / HUNDRED;
    let platform = revenue * str_let.platform_fee_pct / HUNDRED;
    let cleaning = str_let.cleaning.annual_cost(nights);
    let fixed = str_let.annual_fixed_costs();

    let opex = management + platform + cleaning + fixed;

    OperatingModel {
        revenue: Period::from_annual(revenue),
        operating_costs: Period::from_annual(opex),
        basis: Basis::Annual,
        income: LineItem::income("Revenue", revenue),
        costs: vec![
            LineItem::cost("Management", management),
            LineItem::cost("Platform fees", platform),
            LineItem::cost("Cleaning", cleaning),
            LineItem::cost("Fixed costs", fixed),
        ],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
