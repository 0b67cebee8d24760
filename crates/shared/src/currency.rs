//! Money formatting for user-facing price displays
//!
//! Formatting is total: zero, negative and missing amounts all render
//! without error. Missing amounts render as [`FALLBACK_DISPLAY`].

use rust_decimal::{Decimal, RoundingStrategy};

/// Neutral placeholder for a price that could not be resolved
pub const FALLBACK_DISPLAY: &str = "N/A";

/// Locale rules for rendering an amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    prefix: String,
    thousands_separator: char,
    decimal_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::brl()
    }
}

impl CurrencyFormat {
    /// Brazilian real: `R$ 1.234,56`
    pub fn brl() -> Self {
        Self {
            prefix: "R$".to_string(),
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }

    /// Same grouping rules with a different literal prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `R$ 1.234,56`, with a leading `-` for negative amounts
    pub fn format(&self, amount: Decimal) -> String {
        let (negative, digits) = self.split(amount);
        let sign = if negative { "-" } else { "" };
        if self.prefix.is_empty() {
            format!("{sign}{digits}")
        } else {
            format!("{sign}{} {digits}", self.prefix)
        }
    }

    /// Like [`format`](Self::format), rendering `None` as the fallback
    pub fn format_opt(&self, amount: Option<Decimal>) -> String {
        amount
            .map(|a| self.format(a))
            .unwrap_or_else(|| FALLBACK_DISPLAY.to_string())
    }

    /// Grouped digits without the prefix: `1.234,56`
    pub fn format_digits(&self, amount: Decimal) -> String {
        let (negative, digits) = self.split(amount);
        if negative {
            format!("-{digits}")
        } else {
            digits
        }
    }

    fn split(&self, amount: Decimal) -> (bool, String) {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let rounded = rounded.abs();

        // Integer and fraction separately; a full rescale overflows past 26 digits
        let whole = rounded.trunc().mantissa().unsigned_abs();
        let mut fraction = rounded.fract();
        fraction.rescale(2);

        (
            negative,
            format!(
                "{}{}{:02}",
                group_thousands(whole, self.thousands_separator),
                self.decimal_separator,
                fraction.mantissa()
            ),
        )
    }
}

/// Format with the default Brazilian real rules
pub fn format_brl(amount: Decimal) -> String {
    CurrencyFormat::brl().format(amount)
}

fn group_thousands(n: u128, separator: char) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(separator);
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
