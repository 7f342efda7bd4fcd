//! Monetary amount formatting.
//!
//! Every surface that shows money goes through [`format_currency`] so the
//! site renders amounts one way only: Norwegian bokmål, whole kroner.
//!
//! ```text
//!  12345.0   →  "12 345 kr"
//!  -500.0    →  "−500 kr"
//!  0.4       →  "0 kr"
//! ```
//!
//! Spaces in the output are U+00A0 and the minus sign is U+2212, matching the
//! `nb-NO` monetary convention.

use crate::error::SiteError;

/// Locale conventions for rendering a currency amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyFormat {
    /// BCP 47 tag, informational.
    pub locale: &'static str,
    /// ISO 4217 code, informational.
    pub currency: &'static str,
    pub symbol: &'static str,
    pub group_separator: char,
    pub symbol_separator: char,
    pub minus_sign: char,
}

/// Norwegian kroner as written in `nb-NO`.
pub const NOK: CurrencyFormat = CurrencyFormat {
    locale: "nb-NO",
    currency: "NOK",
    symbol: "kr",
    group_separator: '\u{a0}',
    symbol_separator: '\u{a0}',
    minus_sign: '\u{2212}',
};

impl CurrencyFormat {
    /// Render `value` rounded to whole units (half away from zero).
    ///
    /// Non-finite values are rejected rather than clamped.
    pub fn format(&self, value: f64) -> Result<String, SiteError> {
        if !value.is_finite() {
            return Err(SiteError::InvalidInput(format!(
                "cannot format non-finite amount {}",
                value
            )));
        }

        let rounded = value.round();
        // -0.0 compares equal to 0.0, so rounded-away negatives print unsigned
        let negative = rounded < 0.0;
        let digits = format!("{:.0}", rounded.abs());

        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 8);
        if negative {
            out.push(self.minus_sign);
        }
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(ch);
        }
        out.push(self.symbol_separator);
        out.push_str(self.symbol);
        Ok(out)
    }
}

/// Format an amount in the site's fixed locale and currency.
pub fn format_currency(value: f64) -> Result<String, SiteError> {
    NOK.format(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Swap the locale's non-ASCII characters for readable ones.
    fn plain(s: &str) -> String {
        s.replace('\u{a0}', " ").replace('\u{2212}', "-")
    }

    #[test]
    fn test_zero_has_no_sign_or_decimals() {
        assert_eq!(plain(&format_currency(0.0).unwrap()), "0 kr");
        assert_eq!(plain(&format_currency(-0.0).unwrap()), "0 kr");
        assert_eq!(plain(&format_currency(-0.4).unwrap()), "0 kr");
    }

    #[test]
    fn test_negative_is_distinct() {
        let positive = format_currency(500.0).unwrap();
        let negative = format_currency(-500.0).unwrap();
        assert_ne!(positive, negative);
        assert_eq!(negative, "\u{2212}500\u{a0}kr");
    }

    #[test]
    fn test_grouping() {
        let cases = [
            (999.0, "999 kr"),
            (1000.0, "1 000 kr"),
            (12345.0, "12 345 kr"),
            (123456.0, "123 456 kr"),
            (1234567.0, "1 234 567 kr"),
            (-98765432.0, "-98 765 432 kr"),
        ];
        for (value, expected) in cases {
            assert_eq!(plain(&format_currency(value).unwrap()), expected, "{value}");
        }
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(plain(&format_currency(1499.5).unwrap()), "1 500 kr");
        assert_eq!(plain(&format_currency(-2.5).unwrap()), "-3 kr");
        assert_eq!(plain(&format_currency(10.49).unwrap()), "10 kr");
    }

    #[test]
    fn test_non_finite_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(format_currency(value), Err(SiteError::InvalidInput(_))));
        }
    }
}
