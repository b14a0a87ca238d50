mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::deal::{AnalyseArgs, SummaryArgs};
use commands::proforma::{ProformaArgs, ScenariosArgs};
use commands::purchase::{DebtServiceArgs, PurchaseArgs, StampDutyArgs};

/// Buy-to-let deal appraisal
#[derive(Parser)]
#[command(
    name = "deal",
    version,
    about = "Buy-to-let deal appraisal",
    long_about = "Compare a residential purchase as a long-term let and a short-term \
                  (nightly) let with decimal precision: stamp duty, mortgage payments, \
                  operating pro-formas, DSCR, payback, break-even occupancy and \
                  worst/base/best scenarios."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Stamp duty on an additional residential property
    StampDuty(StampDutyArgs),
    /// Monthly mortgage payment
    DebtService(DebtServiceArgs),
    /// Deposit, loan, tax and cash required to complete
    Purchase(PurchaseArgs),
    /// Operating pro-forma and return metrics for one regime
    Proforma(ProformaArgs),
    /// Worst / base / best cashflow for one regime
    Scenarios(ScenariosArgs),
    /// Full appraisal under both regimes
    Analyse(AnalyseArgs),
    /// Regime comparison table
    Summary(SummaryArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::StampDuty(args) => commands::purchase::run_stamp_duty(args),
        Commands::DebtService(args) => commands::purchase::run_debt_service(args),
        Commands::Purchase(args) => commands::purchase::run_purchase(args),
        Commands::Proforma(args) => commands::proforma::run_proforma(args),
        Commands::Scenarios(args) => commands::proforma::run_scenarios(args),
        Commands::Analyse(args) => commands::deal::run_analyse(args),
        Commands::Summary(args) => commands::deal::run_summary(args),
        Commands::Version => {
            println!("deal {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
