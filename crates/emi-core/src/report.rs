//! Exportable EMI report.
//!
//! Bundles loan details, the payment summary and a preview window of the
//! amortization schedule, and renders them either as plain text or as a
//! standalone printable HTML page.

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

use crate::amortization::{LoanSummary, LoanTerms, PaymentPeriod};
use crate::format::CurrencyFormat;
use crate::types::Years;
use crate::EmiResult;

/// Rows of the schedule shown when no preview length is configured.
pub const DEFAULT_PREVIEW_PERIODS: usize = 12;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Html,
}

/// Presentation settings for a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub title: String,
    pub company: String,
    /// Extra lines printed under the company name in the footer.
    pub footer_lines: Vec<String>,
    pub preview_periods: usize,
    pub currency: CurrencyFormat,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            title: "EMI Calculator Report".to_string(),
            company: "Easy Personal Loan Services".to_string(),
            footer_lines: Vec::new(),
            preview_periods: DEFAULT_PREVIEW_PERIODS,
            currency: CurrencyFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiReport {
    pub options: ReportOptions,
    pub generated_on: NaiveDateTime,
    pub summary: LoanSummary,
    /// Leading rows of the schedule.
    pub preview: Vec<PaymentPeriod>,
    /// True when the schedule runs past the preview window.
    pub has_more_periods: bool,
}

impl EmiReport {
    pub fn build(
        terms: &LoanTerms,
        options: &ReportOptions,
        generated_on: NaiveDateTime,
    ) -> EmiResult<Self> {
        let schedule = terms.schedule()?;
        let summary = LoanSummary {
            principal: terms.principal,
            annual_rate_percent: terms.annual_rate_percent,
            tenure_years: terms.tenure_years,
            total_periods: schedule.total_periods,
            monthly_payment: schedule.periodic_payment_amount,
            total_interest: schedule.total_interest,
            total_amount: schedule.total_paid,
        };

        let has_more_periods = schedule.schedule.len() > options.preview_periods;
        let mut preview = schedule.schedule;
        preview.truncate(options.preview_periods);

        Ok(EmiReport {
            options: options.clone(),
            generated_on,
            summary,
            preview,
            has_more_periods,
        })
    }

    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Text => self.render_text(),
            ReportFormat::Html => self.render_html(),
        }
    }

    fn money(&self, amount: Decimal) -> String {
        self.options.currency.format_money(amount)
    }

    fn summary_rows(&self) -> [(&'static str, String); 4] {
        let s = &self.summary;
        [
            ("Monthly EMI", self.money(s.monthly_payment)),
            ("Principal Amount", self.money(s.principal)),
            ("Total Interest", self.money(s.total_interest)),
            ("Total Amount Payable", self.money(s.total_amount)),
        ]
    }

    fn detail_rows(&self) -> [(&'static str, String); 3] {
        let s = &self.summary;
        [
            ("Loan Amount", self.money(s.principal)),
            ("Interest Rate", format!("{}% p.a.", s.annual_rate_percent.normalize())),
            (
                "Loan Tenure",
                format!("{} ({} months)", tenure_label(s.tenure_years), s.total_periods),
            ),
        ]
    }

    fn schedule_heading(&self) -> String {
        format!(
            "Amortization Schedule (First {} Months)",
            self.preview.len()
        )
    }

    fn period_cells(&self, p: &PaymentPeriod) -> [String; 5] {
        [
            p.period_index.to_string(),
            self.money(p.principal_component),
            self.money(p.interest_component),
            self.money(p.payment_amount),
            self.money(p.remaining_balance),
        ]
    }

    /// Plain-text report with right-aligned amount columns.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // fmt::Write into a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    /// Standalone printable HTML page.
    pub fn render_html(&self) -> String {
        let mut out = String::new();
        let _ = self.write_html(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "{}", self.options.title)?;
        writeln!(out, "{}", self.options.company)?;
        writeln!(
            out,
            "Generated on: {}",
            self.generated_on.format("%Y-%m-%d %H:%M:%S")
        )?;

        writeln!(out, "\nLoan Details:")?;
        for (label, value) in self.detail_rows() {
            writeln!(out, "  {label:<22}{value}")?;
        }

        writeln!(out, "\nPayment Summary:")?;
        for (label, value) in self.summary_rows() {
            writeln!(out, "  {label:<22}{value:>16}")?;
        }

        writeln!(out, "\n{}:", self.schedule_heading())?;
        writeln!(
            out,
            "  {:<14}{:>14}{:>14}{:>14}{:>16}",
            "Month", "Principal", "Interest", "EMI", "Balance"
        )?;
        for p in &self.preview {
            let [month, principal, interest, emi, balance] = self.period_cells(p);
            writeln!(
                out,
                "  {month:<14}{principal:>14}{interest:>14}{emi:>14}{balance:>16}"
            )?;
        }
        if self.has_more_periods {
            writeln!(
                out,
                "  {:<14}{:>14}{:>14}{:>14}{:>16}",
                "Final Payment",
                "-",
                "-",
                "-",
                self.money(Decimal::ZERO)
            )?;
        }

        writeln!(out, "\n{} - {}", self.options.company, self.options.title)?;
        for line in &self.options.footer_lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn write_html(&self, out: &mut String) -> fmt::Result {
        let title = escape_html(&self.options.title);
        let company = escape_html(&self.options.company);

        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html>\n<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>{title} - {company}</title>")?;
        writeln!(out, "<style>\n{}</style>", HTML_STYLE)?;
        writeln!(out, "</head>\n<body>")?;
        writeln!(out, "<h1>{title}</h1>\n<h2>{company}</h2>")?;
        writeln!(
            out,
            "<p><strong>Generated on:</strong> {}</p>",
            self.generated_on.format("%Y-%m-%d %H:%M:%S")
        )?;

        writeln!(out, "<div class=\"summary\">\n<h3>Loan Details</h3>")?;
        for (label, value) in self.detail_rows() {
            writeln!(out, "<p><strong>{label}:</strong> {}</p>", escape_html(&value))?;
        }
        writeln!(out, "<h3>Payment Summary</h3>")?;
        for (label, value) in self.summary_rows() {
            writeln!(out, "<p><strong>{label}:</strong> {}</p>", escape_html(&value))?;
        }
        writeln!(out, "</div>")?;

        writeln!(out, "<h3>{}</h3>", self.schedule_heading())?;
        writeln!(out, "<table>\n<thead>\n<tr>")?;
        for h in ["Month", "Principal Paid", "Interest Paid", "EMI", "Remaining Balance"] {
            writeln!(out, "<th>{h}</th>")?;
        }
        writeln!(out, "</tr>\n</thead>\n<tbody>")?;
        for p in &self.preview {
            write!(out, "<tr>")?;
            for cell in self.period_cells(p) {
                write!(out, "<td>{}</td>", escape_html(&cell))?;
            }
            writeln!(out, "</tr>")?;
        }
        if self.has_more_periods {
            writeln!(
                out,
                "<tr class=\"final\"><td>Final Payment</td><td>-</td><td>-</td><td>-</td><td>{}</td></tr>",
                escape_html(&self.money(Decimal::ZERO))
            )?;
        }
        writeln!(out, "</tbody>\n</table>")?;

        writeln!(out, "<div class=\"footer\">\n<p>{company}</p>")?;
        for line in &self.options.footer_lines {
            writeln!(out, "<p>{}</p>", escape_html(line))?;
        }
        writeln!(out, "</div>\n</body>\n</html>")
    }
}

const HTML_STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
h1 { color: #0052D4; text-align: center; }
.summary { background: #f0f5ff; padding: 20px; border-radius: 10px; margin: 20px 0; }
table { width: 100%; border-collapse: collapse; margin: 20px 0; }
th, td { padding: 10px; border: 1px solid #ddd; text-align: left; }
th { background: #0052D4; color: white; }
tr.final { font-weight: bold; background: #f8f9fa; }
.footer { margin-top: 40px; text-align: center; color: #666; }
";

/// Human-readable tenure: "1 Year", otherwise rounded to one decimal place
/// ("2.5 Years", "2.8 Years" for 2.75).
pub fn tenure_label(years: Years) -> String {
    if years == Decimal::ONE {
        "1 Year".to_string()
    } else {
        let rounded = years.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.1} Years", rounded)
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tenure_label() {
        assert_eq!(tenure_label(dec!(1)), "1 Year");
        assert_eq!(tenure_label(dec!(1.0)), "1 Year");
        assert_eq!(tenure_label(dec!(2)), "2.0 Years");
        assert_eq!(tenure_label(dec!(0.5)), "0.5 Years");
    }

    #[test]
    fn test_tenure_label_rounds_half_up() {
        assert_eq!(tenure_label(dec!(2.75)), "2.8 Years");
        assert_eq!(tenure_label(dec!(1.25)), "1.3 Years");
        assert_eq!(tenure_label(dec!(0.99)), "1.0 Years");
        assert_eq!(tenure_label(dec!(3.04)), "3.0 Years");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("A & B <x>"), "A &amp; B &lt;x&gt;");
        assert_eq!(escape_html("it's \"q\""), "it&#39;s &quot;q&quot;");
    }

    #[test]
    fn test_options_partial_deserialize() {
        let opts: ReportOptions = serde_json::from_str(r#"{"preview_periods": 6}"#).unwrap();
        assert_eq!(opts.preview_periods, 6);
        assert_eq!(opts.title, "EMI Calculator Report");
    }
}
