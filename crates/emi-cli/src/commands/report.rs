use clap::{Args, ValueEnum};
use serde_json::{json, Value};
use std::fs;
use tracing::info;

use emi_core::report::{EmiReport, ReportFormat};

use super::loan::{resolve_terms, LoanArgs};
use crate::config::EmiConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DocumentFormat {
    Text,
    Html,
}

impl From<DocumentFormat> for ReportFormat {
    fn from(f: DocumentFormat) -> Self {
        match f {
            DocumentFormat::Text => ReportFormat::Text,
            DocumentFormat::Html => ReportFormat::Html,
        }
    }
}

/// Arguments for the exportable EMI report
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Document format
    #[arg(long, value_enum, default_value = "text")]
    pub format: DocumentFormat,

    /// Write the document to this file instead of stdout
    #[arg(long)]
    pub out: Option<String>,

    /// Number of schedule rows to include (overrides config)
    #[arg(long)]
    pub preview: Option<usize>,
}

pub enum ReportOutcome {
    /// Rendered document for stdout
    Document(String),
    /// Document was written to disk; description of what was written
    Written(Value),
}

pub fn run_report(
    args: ReportArgs,
    config: &EmiConfig,
) -> Result<ReportOutcome, Box<dyn std::error::Error>> {
    if args.preview == Some(0) {
        return Err("--preview must be at least 1".into());
    }

    let terms = resolve_terms(&args.loan)?;
    let options = config.report_options(args.preview);
    let generated_on = chrono::Local::now().naive_local();

    let report = EmiReport::build(&terms, &options, generated_on)?;
    let document = report.render(args.format.into());

    match args.out {
        None => Ok(ReportOutcome::Document(document)),
        Some(path) => {
            fs::write(&path, &document)
                .map_err(|e| format!("Failed to write '{}': {}", path, e))?;
            info!(path = %path, bytes = document.len(), "report written");
            Ok(ReportOutcome::Written(json!({
                "path": path,
                "format": format!("{:?}", args.format).to_lowercase(),
                "bytes": document.len(),
                "total_periods": report.summary.total_periods,
                "preview_periods": report.preview.len(),
            })))
        }
    }
}
