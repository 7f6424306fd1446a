//! Currency display for reports and front ends.
//!
//! Amounts are shown in whole currency units, rounded half away from zero,
//! with either Indian (`12,34,567`) or Western (`1,234,567`) digit grouping.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Digit grouping convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitGrouping {
    /// Last three digits, then pairs: 12,34,567
    #[default]
    Indian,
    /// Groups of three: 1,234,567
    Western,
}

/// The single currency convention used when rendering amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub grouping: DigitGrouping,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: "₹".to_string(),
            grouping: DigitGrouping::Indian,
        }
    }
}

impl CurrencyFormat {
    /// `₹4,396` style rendering of a monetary amount.
    pub fn format_money(&self, amount: Decimal) -> String {
        let (negative, digits) = whole_units(amount);
        let grouped = group_digits(&digits, self.grouping);
        if negative {
            format!("-{}{}", self.symbol, grouped)
        } else {
            format!("{}{}", self.symbol, grouped)
        }
    }
}

fn whole_units(amount: Decimal) -> (bool, String) {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    // -0.4 rounds to -0
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    (negative, rounded.abs().trunc().normalize().to_string())
}

fn group_digits(digits: &str, grouping: DigitGrouping) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(len - 3);
    let head_group = match grouping {
        DigitGrouping::Indian => 2,
        DigitGrouping::Western => 3,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(head_group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(tail);
    groups.join(",")
}
