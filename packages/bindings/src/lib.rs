use napi::Result as NapiResult;
use napi_derive::napi;

use emi_core::amortization::{self, LoanTerms};
use emi_core::report::{EmiReport, ReportFormat, ReportOptions};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_terms(input_json: &str) -> NapiResult<LoanTerms> {
    let terms: LoanTerms = serde_json::from_str(input_json).map_err(to_napi_error)?;
    terms.validate().map_err(to_napi_error)?;
    Ok(terms)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Monthly installment for `{principal, annual_rate_percent, tenure_years}`,
/// returned as a decimal string.
#[napi]
pub fn compute_periodic_payment(input_json: String) -> NapiResult<String> {
    let terms = parse_terms(&input_json)?;
    let payment = terms.periodic_payment().map_err(to_napi_error)?;
    Ok(payment.to_string())
}

#[napi]
pub fn generate_schedule(input_json: String) -> NapiResult<String> {
    let terms = parse_terms(&input_json)?;
    let output = amortization::amortize(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn loan_summary(input_json: String) -> NapiResult<String> {
    let terms = parse_terms(&input_json)?;
    let output = amortization::analyze_loan(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct ReportRequest {
    terms: LoanTerms,
    #[serde(default)]
    options: ReportOptions,
}

/// Render a printable report. `format` is `"text"` or `"html"`.
#[napi]
pub fn render_report(input_json: String, format: String) -> NapiResult<String> {
    let request: ReportRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let format = match format.to_lowercase().as_str() {
        "text" => ReportFormat::Text,
        "html" => ReportFormat::Html,
        other => return Err(to_napi_error(format!("Unknown report format: {other}"))),
    };

    let generated_on = chrono::Local::now().naive_local();
    let report =
        EmiReport::build(&request.terms, &request.options, generated_on).map_err(to_napi_error)?;
    Ok(report.render(format))
}
