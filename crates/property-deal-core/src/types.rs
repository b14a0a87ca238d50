use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Fractions expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Percentages as entered by the user (5 = 5%).
pub type Pct = Decimal;

pub const MONTHS_PER_YEAR: Decimal = dec!(12);
pub const NIGHTS_PER_YEAR: Decimal = dec!(365);
pub const HUNDRED: Decimal = dec!(100);

/// A figure carried on both a monthly and an annual basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub monthly: Money,
    pub annual: Money,
}

impl Period {
    /// Monthly-first figure: annual = monthly * 12
    pub fn from_monthly(monthly: Money) -> Self {
        Period {
            monthly,
            annual: monthly * MONTHS_PER_YEAR,
        }
    }

    /// Annual-first figure: monthly = annual / 12
    pub fn from_annual(annual: Money) -> Self {
        Period {
            monthly: annual / MONTHS_PER_YEAR,
            annual,
        }
    }
}

/// A ratio whose divisor may vanish.
///
/// `Infinite` is returned instead of faulting when the divisor is zero or
/// non-positive (per the metric's own rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ratio {
    Finite(Decimal),
    Infinite,
}

impl Ratio {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Ratio::Infinite)
    }

    pub fn finite(&self) -> Option<Decimal> {
        match self {
            Ratio::Finite(v) => Some(*v),
            Ratio::Infinite => None,
        }
    }
}

/// `numerator / denominator`, or `Decimal::ZERO` when the denominator is not positive.
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
