use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use emi_core::amortization::{self, LoanTerms};

use crate::input;

/// Loan terms shared by every calculation command
#[derive(Args, Debug)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 9.99)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Tenure in years; fractional values allowed (e.g. 2.5)
    #[arg(long, alias = "tenure")]
    pub tenure_years: Option<Decimal>,
}

impl LoanArgs {
    fn has_flags(&self) -> bool {
        self.principal.is_some() || self.annual_rate.is_some() || self.tenure_years.is_some()
    }
}

/// Resolve loan terms from --input, individual flags, or piped stdin, in that order.
pub fn resolve_terms(args: &LoanArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if args.has_flags() {
        LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            tenure_years: args
                .tenure_years
                .ok_or("--tenure-years is required (or provide --input)")?,
        }
    } else if let Some(terms) = input::stdin::read_stdin()? {
        terms
    } else {
        return Err(
            "--principal, --annual-rate and --tenure-years (or --input <file>, or stdin) required"
                .into(),
        );
    };

    terms.validate()?;
    debug!(?terms, "resolved loan terms");
    Ok(terms)
}

pub fn run_payment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = resolve_terms(&args)?;
    let result = amortization::analyze_loan(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = resolve_terms(&args)?;
    let result = amortization::amortize(&terms)?;
    Ok(serde_json::to_value(result)?)
}
