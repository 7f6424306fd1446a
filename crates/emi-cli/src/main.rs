mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io::{self, Write};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::loan::LoanArgs;
use commands::report::{ReportArgs, ReportOutcome};
use config::{EmiConfig, LogLevel};

/// EMI calculator: monthly installments, amortization schedules and reports
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "EMI calculations, amortization schedules and loan reports",
    long_about = "Computes the equated monthly installment for a loan, its full \
                  amortization schedule, and printable text or HTML reports \
                  with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Configuration file (TOML); defaults to ./emi.toml when present
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log level (overrides the config file; RUST_LOG overrides both)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the monthly installment and loan totals
    Payment(LoanArgs),
    /// Generate the full month-by-month amortization schedule
    Schedule(LoanArgs),
    /// Render a printable EMI report (text or HTML)
    Report(ReportArgs),
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

fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let config = EmiConfig::load(cli.config.as_deref()).unwrap_or_else(|e| fail(e));
    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        cli.log_level.unwrap_or(config.log_level)
    };
    init_tracing(level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::loan::run_payment(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Report(args) => match commands::report::run_report(args, &config) {
            Ok(ReportOutcome::Document(doc)) => {
                print!("{}", doc);
                process::exit(0);
            }
            Ok(ReportOutcome::Written(summary)) => Ok(summary),
            Err(e) => Err(e),
        },
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if let Err(e) = output::format_output(&cli.output, &value, &mut out) {
                fail(e);
            }
            let _ = out.flush();
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}
