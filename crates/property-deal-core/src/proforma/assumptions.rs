use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Pct, HUNDRED, MONTHS_PER_YEAR, NIGHTS_PER_YEAR};

/// Operating regime of the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Long-term tenancy
    Ltr,
    /// Short-term / nightly letting
    Str,
}

impl Regime {
    /// Row label used in summaries and exports.
    pub fn label(&self) -> &'static str {
        match self {
            Regime::Ltr => "Long-term let",
            Regime::Str => "Short-term let",
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Long-term let
// ---------------------------------------------------------------------------

/// Revenue and cost drivers for a long-term tenancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LtrAssumptions {
    pub monthly_rent: Money,
    /// Void allowance, % of rent
    #[serde(default)]
    pub voids_pct: Pct,
    /// Letting agent management, % of rent
    #[serde(default)]
    pub management_pct: Pct,
    /// Maintenance allowance, % of rent
    #[serde(default)]
    pub maintenance_pct: Pct,
    #[serde(default)]
    pub service_charge_annual: Money,
    #[serde(default)]
    pub ground_rent_annual: Money,
    /// Landlord insurance
    #[serde(default)]
    pub insurance_annual: Money,
    /// Letting / tenancy refresh fees
    #[serde(default)]
    pub letting_fees_annual: Money,
    #[serde(default)]
    pub other_monthly: Money,
}

impl LtrAssumptions {
    pub fn annual_fixed_costs(&self) -> Money {
        self.service_charge_annual
            + self.ground_rent_annual
            + self.insurance_annual
            + self.letting_fees_annual
    }

    /// Fixed costs per month: other monthly costs plus annual fixed costs / 12.
    pub fn monthly_fixed_costs(&self) -> Money {
        self.other_monthly + self.annual_fixed_costs() / MONTHS_PER_YEAR
    }
}

// ---------------------------------------------------------------------------
// Short-term let
// ---------------------------------------------------------------------------

/// How cleaning is charged for a short-term let.
///
/// Both formulas are in use for nightly lets, so the choice is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CleaningPolicy {
    /// One clean per stay; stays/year = occupied nights / average stay
    PerStay {
        cost_per_stay: Money,
        average_stay_nights: Decimal,
    },
    /// One clean per occupied night
    PerOccupiedNight { cost_per_night: Money },
}

impl CleaningPolicy {
    /// Cleaning cost attributable to each occupied night.
    ///
    /// A per-stay policy with a non-positive average stay has no defined
    /// stay count and costs nothing.
    pub fn cost_per_occupied_night(&self) -> Money {
        match *self {
            CleaningPolicy::PerStay {
                cost_per_stay,
                average_stay_nights,
            } => {
                if average_stay_nights <= Decimal::ZERO {
                    Decimal::ZERO
                } else {
                    cost_per_stay / average_stay_nights
                }
            }
            CleaningPolicy::PerOccupiedNight { cost_per_night } => cost_per_night,
        }
    }

    pub fn annual_cost(&self, occupied_nights: Decimal) -> Money {
        match *self {
            CleaningPolicy::PerStay {
                cost_per_stay,
                average_stay_nights,
            } => {
                if average_stay_nights <= Decimal::ZERO {
                    return Decimal::ZERO;
                }
                let stays = (occupied_nights / average_stay_nights).max(Decimal::ZERO);
                cost_per_stay * stays
            }
            CleaningPolicy::PerOccupiedNight { cost_per_night } => {
                cost_per_night * occupied_nights
            }
        }
    }
}

/// Revenue and cost drivers for a short-term / nightly let.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrAssumptions {
    pub nightly_rate: Money,
    /// Share of the 365 nights occupied, 0-100
    pub occupancy_pct: Pct,
    pub cleaning: CleaningPolicy,
    /// Management, % of revenue
    #[serde(default)]
    pub management_pct: Pct,
    /// Platform / OTA fee, % of revenue
    #[serde(default)]
    pub platform_fee_pct: Pct,
    #[serde(default)]
    pub utilities_monthly: Money,
    /// Linen and laundry
    #[serde(default)]
    pub linen_monthly: Money,
    /// Council tax or business rates
    #[serde(default)]
    pub rates_annual: Money,
}

impl StrAssumptions {
    pub fn occupied_nights(&self) -> Decimal {
        NIGHTS_PER_YEAR * self.occupancy_pct / HUNDRED
    }

    /// Management + platform fees, as a percentage of revenue.
    pub fn revenue_fees_pct(&self) -> Pct {
        self.management_pct + self.platform_fee_pct
    }

    /// Utilities and linen (x12) plus annual rates.
    pub fn annual_fixed_costs(&self) -> Money {
        self.utilities_monthly * MONTHS_PER_YEAR
            + self.linen_monthly * MONTHS_PER_YEAR
            + self.rates_annual
    }
}

// ---------------------------------------------------------------------------
// Tagged assumptions
// ---------------------------------------------------------------------------

/// Regime-tagged assumptions fed to the single pro-forma engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "regime", rename_all = "snake_case")]
pub enum Assumptions {
    Ltr(LtrAssumptions),
    Str(StrAssumptions),
}

impl Assumptions {
    pub fn regime(&self) -> Regime {
        match self {
            Assumptions::Ltr(_) => Regime::Ltr,
            Assumptions::Str(_) => Regime::Str,
        }
    }
}
