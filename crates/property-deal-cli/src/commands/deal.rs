use clap::Args;
use serde_json::{json, Value};

use property_deal_core::deal::{analyse_deal, DealInput};

use crate::input;

/// Arguments for the full LTR vs STR appraisal
#[derive(Args)]
pub struct AnalyseArgs {
    /// Path to JSON deal input
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the regime comparison table
#[derive(Args)]
pub struct SummaryArgs {
    /// Path to JSON deal input
    #[arg(long)]
    pub input: Option<String>,
}

fn load_deal(path: Option<&str>) -> Result<DealInput, Box<dyn std::error::Error>> {
    let data = input::file::read_document(path, "deal analysis")?;
    Ok(DealInput::from_value(data)?)
}

pub fn run_analyse(args: AnalyseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal = load_deal(args.input.as_deref())?;
    let result = analyse_deal(&deal)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal = load_deal(args.input.as_deref())?;
    let result = analyse_deal(&deal)?;
    Ok(json!({
        "result": result.result.summary,
        "methodology": result.methodology,
        "warnings": result.warnings,
    }))
}
