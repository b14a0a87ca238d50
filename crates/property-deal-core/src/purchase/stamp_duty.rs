use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PropertyDealError;
use crate::types::{ratio_or_zero, with_metadata, ComputationOutput, Money, Rate};
use crate::PropertyDealResult;

// ---------------------------------------------------------------------------
// Band table
// ---------------------------------------------------------------------------

/// One marginal band of the purchase-tax schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBand {
    /// Upper threshold of the band; `None` for the open-ended top band
    pub threshold: Option<Money>,
    /// Marginal rate applied to the slice inside the band
    pub rate: Rate,
}

/// England & NI residential rates with the additional-property surcharge
/// (+5% on every band), effective 1 April 2025.
pub static ADDITIONAL_PROPERTY_BANDS: [TaxBand; 5] = [
    TaxBand {
        threshold: Some(dec!(125000)),
        rate: dec!(0.05),
    },
    TaxBand {
        threshold: Some(dec!(250000)),
        rate: dec!(0.07),
    },
    TaxBand {
        threshold: Some(dec!(925000)),
        rate: dec!(0.10),
    },
    TaxBand {
        threshold: Some(dec!(1500000)),
        rate: dec!(0.15),
    },
    TaxBand {
        threshold: None,
        rate: dec!(0.17),
    },
];

/// The portion of a price taxed inside a single band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandSlice {
    pub floor: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<Money>,
    pub rate: Rate,
    pub taxable_amount: Money,
    pub tax: Money,
}

/// Stamp duty result with the per-band build-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampDutyOutput {
    pub price: Money,
    pub tax: Money,
    /// tax / price (0 when price is 0)
    pub effective_rate: Rate,
    pub bands: Vec<BandSlice>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Purchase tax due on `price` under the additional-property schedule.
///
/// Marginal: each band only taxes the slice of price above the previous
/// threshold, so the result is continuous at every boundary.
/// `price` must be non-negative; a zero price owes nothing.
pub fn compute_tax(price: Money) -> Money {
    let tax: Money = tax_breakdown(price).iter().map(|s| s.tax).sum();
    tax.max(Decimal::ZERO)
}

/// Per-band slices for `price`, in ascending threshold order.
///
/// Bands wholly above the price are omitted.
pub fn tax_breakdown(price: Money) -> Vec<BandSlice> {
    let mut slices = Vec::new();
    let mut previous = Decimal::ZERO;

    for band in ADDITIONAL_PROPERTY_BANDS.iter() {
        let upper = band.threshold.map_or(price, |t| t.min(price));
        let taxable_amount = upper - previous;
        if taxable_amount > Decimal::ZERO {
            slices.push(BandSlice {
                floor: previous,
                ceiling: band.threshold,
                rate: band.rate,
                taxable_amount,
                tax: taxable_amount * band.rate,
            });
        }

        match band.threshold {
            Some(threshold) if price > threshold => previous = threshold,
            _ => break,
        }
    }

    slices
}

/// Stamp duty with the band build-up, wrapped in the standard envelope.
pub fn calculate_stamp_duty(price: Money) -> PropertyDealResult<ComputationOutput<StampDutyOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if price < Decimal::ZERO {
        return Err(PropertyDealError::InvalidInput {
            field: "price".into(),
            reason: "Purchase price cannot be negative".into(),
        });
    }

    let bands = tax_breakdown(price);
    let tax: Money = bands.iter().map(|s| s.tax).sum();
    let effective_rate = ratio_or_zero(tax, price);

    if price > dec!(1500000) {
        warnings.push("Price falls in the 17% top band; verify with a conveyancer".into());
    }

    let output = StampDutyOutput {
        price,
        tax,
        effective_rate,
        bands,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SDLT (England & NI, additional property surcharge)",
        &serde_json::json!({ "price": price.to_string() }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
