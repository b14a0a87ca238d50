use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use property_deal_core::deal::{analyse_single_regime, DealInput};
use property_deal_core::proforma::Regime;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RegimeArg {
    /// Long-term let
    Ltr,
    /// Short-term (nightly) let
    Str,
}

impl From<RegimeArg> for Regime {
    fn from(arg: RegimeArg) -> Self {
        match arg {
            RegimeArg::Ltr => Regime::Ltr,
            RegimeArg::Str => Regime::Str,
        }
    }
}

/// Arguments for a single-regime pro-forma
#[derive(Args)]
pub struct ProformaArgs {
    /// Path to JSON deal input
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, value_enum)]
    pub regime: RegimeArg,
}

/// Arguments for worst/base/best scenarios
#[derive(Args)]
pub struct ScenariosArgs {
    /// Path to JSON deal input (scenario_deltas optional)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, value_enum)]
    pub regime: RegimeArg,
}

pub fn run_proforma(args: ProformaArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::file::read_document(args.input.as_deref(), "the pro-forma")?;
    let deal = DealInput::from_value(data)?;
    let result = analyse_single_regime(&deal, args.regime.into())?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_scenarios(args: ScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::file::read_document(args.input.as_deref(), "scenario analysis")?;
    let deal = DealInput::from_value(data)?;
    let analysis = analyse_single_regime(&deal, args.regime.into())?;
    let triple = &analysis.result.scenarios;
    Ok(json!({
        "result": triple.rows(),
        "methodology": format!("Worst / Base / Best Sensitivity ({})", triple.regime.label()),
        "warnings": analysis.warnings,
    }))
}
