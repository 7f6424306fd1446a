//! Level-payment (EMI) loan amortization.
//!
//! Computes the equated monthly installment for a loan and the full
//! period-by-period split of each payment into principal and interest.
//! Every function here is pure: the same `LoanTerms` always produce the same
//! schedule, and no state survives a call. All math in `rust_decimal::Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::EmiError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::EmiResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);

const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Terms of a single loan calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed, in currency units.
    pub principal: Money,
    /// Annual interest rate as a percentage (e.g., 9.99 = 9.99% p.a.).
    pub annual_rate_percent: Decimal,
    /// Loan tenure in years; fractional tenures are allowed.
    pub tenure_years: Years,
}

impl LoanTerms {
    /// Build validated loan terms.
    pub fn new(
        principal: Money,
        annual_rate_percent: Decimal,
        tenure_years: Years,
    ) -> EmiResult<Self> {
        let terms = LoanTerms {
            principal,
            annual_rate_percent,
            tenure_years,
        };
        terms.validate()?;
        Ok(terms)
    }

    /// Check every field against its domain. Period count is checked too,
    /// so a tenure shorter than half a month is rejected here.
    pub fn validate(&self) -> EmiResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(EmiError::invalid("principal", "Principal must be > 0"));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(EmiError::invalid(
                "annual_rate_percent",
                "Annual interest rate cannot be negative",
            ));
        }
        if self.tenure_years <= Decimal::ZERO {
            return Err(EmiError::invalid("tenure_years", "Tenure must be > 0"));
        }
        self.total_periods().map(|_| ())
    }

    /// Monthly interest rate as a decimal: `annual_rate_percent / 100 / 12`.
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate_percent / PERCENT / MONTHS_PER_YEAR
    }

    /// Number of monthly payments, `tenure_years * 12` rounded half away from zero.
    pub fn total_periods(&self) -> EmiResult<u32> {
        let months = self
            .tenure_years
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or_else(|| EmiError::invalid("tenure_years", "Tenure is too large"))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        let n = months
            .to_u32()
            .ok_or_else(|| EmiError::invalid("tenure_years", "Tenure is too large"))?;
        if n == 0 {
            return Err(EmiError::invalid(
                "tenure_years",
                "Tenure rounds to zero monthly payments",
            ));
        }
        Ok(n)
    }

    /// True when `tenure_years * 12` is not a whole number of months.
    pub fn has_fractional_months(&self) -> bool {
        !(self.tenure_years * MONTHS_PER_YEAR).fract().is_zero()
    }

    /// Equated monthly installment for these terms.
    pub fn periodic_payment(&self) -> EmiResult<Money> {
        self.validate()?;
        level_payment(self.principal, self.monthly_rate(), self.total_periods()?)
    }

    /// Full amortization schedule for these terms.
    pub fn schedule(&self) -> EmiResult<AmortizationResult> {
        self.validate()?;
        amortize_terms(self)
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One row of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPeriod {
    /// 1-based month number.
    pub period_index: u32,
    /// Portion of the payment that reduces the balance.
    pub principal_component: Money,
    /// Portion of the payment covering interest accrued this month.
    pub interest_component: Money,
    /// Installment paid this month.
    pub payment_amount: Money,
    /// Outstanding balance after this month's payment.
    pub remaining_balance: Money,
}

/// Periodic payment, totals and the full schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub periodic_payment_amount: Money,
    pub total_periods: u32,
    /// `periodic_payment_amount * total_periods`.
    pub total_paid: Money,
    /// `total_paid - principal`.
    pub total_interest: Money,
    pub schedule: Vec<PaymentPeriod>,
}

/// Headline figures shown by a calculator front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub principal: Money,
    pub annual_rate_percent: Decimal,
    pub tenure_years: Years,
    pub total_periods: u32,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_amount: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Equated monthly installment for a level-payment loan.
///
/// `EMI = P * r * (1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate and `n`
/// the number of months; a zero rate degenerates to `P / n`.
pub fn compute_periodic_payment(
    principal: Money,
    annual_rate_percent: Decimal,
    tenure_years: Years,
) -> EmiResult<Money> {
    LoanTerms::new(principal, annual_rate_percent, tenure_years)?.periodic_payment()
}

/// Periodic payment plus the month-by-month amortization schedule.
pub fn generate_schedule(
    principal: Money,
    annual_rate_percent: Decimal,
    tenure_years: Years,
) -> EmiResult<AmortizationResult> {
    LoanTerms::new(principal, annual_rate_percent, tenure_years)?.schedule()
}

/// Monthly payment, total interest and total amount payable.
pub fn summarize(terms: &LoanTerms) -> EmiResult<LoanSummary> {
    terms.validate()?;
    let total_periods = terms.total_periods()?;
    let monthly_payment = level_payment(terms.principal, terms.monthly_rate(), total_periods)?;
    let (total_amount, total_interest) = totals(terms.principal, monthly_payment, total_periods)?;

    Ok(LoanSummary {
        principal: terms.principal,
        annual_rate_percent: terms.annual_rate_percent,
        tenure_years: terms.tenure_years,
        total_periods,
        monthly_payment,
        total_interest,
        total_amount,
    })
}

/// Loan summary wrapped in the standard computation envelope.
pub fn analyze_loan(terms: &LoanTerms) -> EmiResult<ComputationOutput<LoanSummary>> {
    let start = Instant::now();
    let summary = summarize(terms)?;
    let warnings = term_warnings(terms, summary.total_periods);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment annuity (EMI)",
        terms,
        warnings,
        elapsed,
        summary,
    ))
}

/// Full amortization schedule wrapped in the standard computation envelope.
pub fn amortize(terms: &LoanTerms) -> EmiResult<ComputationOutput<AmortizationResult>> {
    let start = Instant::now();
    let result = terms.schedule()?;
    let warnings = term_warnings(terms, result.total_periods);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment annuity amortization schedule",
        terms,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn level_payment(principal: Money, monthly_rate: Rate, periods: u32) -> EmiResult<Money> {
    let n = Decimal::from(periods);
    if monthly_rate.is_zero() {
        return Ok(principal / n);
    }

    let overflow = || EmiError::invalid("tenure_years", "Compounding factor overflowed");
    let factor = (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(periods))
        .ok_or_else(overflow)?;
    let numerator = principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(factor))
        .ok_or_else(overflow)?;

    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        // Rate too small to register in (1+r)^n; amortize as interest-free.
        return Ok(principal / n);
    }
    numerator.checked_div(denominator).ok_or_else(overflow)
}

/// `(total_paid, total_interest)` for a level payment over `periods` months.
fn totals(principal: Money, payment: Money, periods: u32) -> EmiResult<(Money, Money)> {
    let overflow = || EmiError::invalid("principal", "Total payable overflowed");
    let total_paid = payment
        .checked_mul(Decimal::from(periods))
        .ok_or_else(overflow)?;
    let total_interest = total_paid.checked_sub(principal).ok_or_else(overflow)?;
    Ok((total_paid, total_interest))
}

fn amortize_terms(terms: &LoanTerms) -> EmiResult<AmortizationResult> {
    let n = terms.total_periods()?;
    let r = terms.monthly_rate();
    let payment = level_payment(terms.principal, r, n)?;
    let (total_paid, total_interest) = totals(terms.principal, payment, n)?;
    debug!(principal = %terms.principal, monthly_rate = %r, periods = n, payment = %payment, "amortizing loan");

    let mut schedule = Vec::with_capacity(n as usize);
    let mut balance = terms.principal;

    for period_index in 1..=n {
        let interest_component = balance * r;
        let principal_component = payment - interest_component;
        balance -= principal_component;

        // Level payment retires the loan on the last month; whatever is left
        // is rounding drift.
        if period_index == n && !balance.is_zero() {
            debug!(residual = %balance, "absorbing final-period drift");
            balance = Decimal::ZERO;
        } else if balance < Decimal::ZERO {
            balance = Decimal::ZERO;
        }

        schedule.push(PaymentPeriod {
            period_index,
            principal_component,
            interest_component,
            payment_amount: payment,
            remaining_balance: balance,
        });
    }

    Ok(AmortizationResult {
        periodic_payment_amount: payment,
        total_periods: n,
        total_paid,
        total_interest,
        schedule,
    })
}

fn term_warnings(terms: &LoanTerms, periods: u32) -> Vec<String> {
    let mut warnings = Vec::new();
    if terms.has_fractional_months() {
        warnings.push(format!(
            "Tenure of {} years is not a whole number of months; rounded to {} payments",
            terms.tenure_years, periods
        ));
    }
    if terms.annual_rate_percent.is_zero() {
        warnings.push("Zero interest rate: every payment is principal only".into());
    }
    warnings
}
