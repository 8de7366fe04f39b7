mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::budgets::BudgetSummaryArgs;
use commands::cashflow::CashFlowArgs;
use commands::profit_timer::ProfitTimerArgs;

/// Rental property cash-flow analysis
#[derive(Parser)]
#[command(
    name = "rentflow",
    version,
    about = "Rental property cash-flow analysis",
    long_about = "A CLI for analysing rental property purchase scenarios with \
                  decimal precision. Computes mortgage, cash-flow and return \
                  metrics, projects when a negative cash flow turns positive, \
                  and summarises monthly spending against category budgets."
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
    /// Compute cash-flow and return metrics for a property scenario
    CashFlow(CashFlowArgs),
    /// Project when a negative cash flow turns positive
    ProfitTimer(ProfitTimerArgs),
    /// Summarise one month of spending against category budgets
    BudgetSummary(BudgetSummaryArgs),
    /// List the built-in property templates
    Templates,
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
        Commands::CashFlow(args) => commands::cashflow::run_cash_flow(args),
        Commands::ProfitTimer(args) => commands::profit_timer::run_profit_timer(args),
        Commands::BudgetSummary(args) => commands::budgets::run_budget_summary(args),
        Commands::Templates => commands::templates::run_templates(),
        Commands::Version => {
            println!("rentflow {}", env!("CARGO_PKG_VERSION"));
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
