//! Culture data and the numeric literal parser.
//!
//! [`NumberFormat`] carries the symbols a culture uses when writing numbers
//! (decimal and group separators, signs, percent and special-value symbols).
//! [`NumberStyles`] selects which of those decorations a parse accepts.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Which elements a numeric string may contain when parsed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct NumberStyles: u32 {
        /// Leading white space is ignored.
        const ALLOW_LEADING_WHITE = 1;
        /// Trailing white space is ignored.
        const ALLOW_TRAILING_WHITE = 1 << 1;
        /// A leading sign is accepted.
        const ALLOW_LEADING_SIGN = 1 << 2;
        /// A trailing sign is accepted.
        const ALLOW_TRAILING_SIGN = 1 << 3;
        /// Enclosing parentheses mark a negative number.
        const ALLOW_PARENTHESES = 1 << 4;
        /// A decimal separator is accepted.
        const ALLOW_DECIMAL_POINT = 1 << 5;
        /// Group separators are accepted in the integer part.
        const ALLOW_THOUSANDS = 1 << 6;
        /// An exponent (`e`/`E`) is accepted.
        const ALLOW_EXPONENT = 1 << 7;
        /// The culture's currency symbol is accepted.
        const ALLOW_CURRENCY_SYMBOL = 1 << 8;

        /// White space and a leading sign.
        const INTEGER = Self::ALLOW_LEADING_WHITE.bits()
            | Self::ALLOW_TRAILING_WHITE.bits()
            | Self::ALLOW_LEADING_SIGN.bits();
        /// `INTEGER` plus decimal point and exponent.
        const FLOAT = Self::INTEGER.bits()
            | Self::ALLOW_DECIMAL_POINT.bits()
            | Self::ALLOW_EXPONENT.bits();
        /// `INTEGER` plus trailing sign, decimal point and group separators.
        const NUMBER = Self::INTEGER.bits()
            | Self::ALLOW_TRAILING_SIGN.bits()
            | Self::ALLOW_DECIMAL_POINT.bits()
            | Self::ALLOW_THOUSANDS.bits();
        /// Every decoration except the exponent.
        const CURRENCY = Self::NUMBER.bits()
            | Self::ALLOW_PARENTHESES.bits()
            | Self::ALLOW_CURRENCY_SYMBOL.bits();
        /// Every decoration.
        const ANY = Self::CURRENCY.bits() | Self::ALLOW_EXPONENT.bits();
    }
}

impl Default for NumberStyles {
    fn default() -> Self {
        Self::ANY
    }
}

/// Placement of the percent symbol relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PercentPattern {
    /// `n %`
    #[default]
    NumberSpacePercent,
    /// `n%`
    NumberPercent,
    /// `%n`
    PercentNumber,
}

/// Culture-specific symbols used to render and parse numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    /// Decimal separator
    pub decimal_separator: String,
    /// Group (thousands) separator
    pub group_separator: String,
    /// Digits per group
    pub group_size: usize,
    /// Negative sign
    pub negative_sign: String,
    /// Positive sign
    pub positive_sign: String,
    /// Percent symbol
    pub percent_symbol: String,
    /// Percent placement
    pub percent_pattern: PercentPattern,
    /// Currency symbol
    pub currency_symbol: String,
    /// Default decimals for `F`/`N` formats
    pub number_decimal_digits: usize,
    /// Default decimals for the `P` format
    pub percent_decimal_digits: usize,
    /// Symbol for not-a-number
    pub nan_symbol: String,
    /// Symbol for positive infinity
    pub positive_infinity_symbol: String,
    /// Symbol for negative infinity
    pub negative_infinity_symbol: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::invariant()
    }
}

impl NumberFormat {
    /// Culture-neutral symbols.
    #[must_use]
    pub fn invariant() -> Self {
        Self {
            decimal_separator: ".".to_string(),
            group_separator: ",".to_string(),
            group_size: 3,
            negative_sign: "-".to_string(),
            positive_sign: "+".to_string(),
            percent_symbol: "%".to_string(),
            percent_pattern: PercentPattern::NumberSpacePercent,
            currency_symbol: "¤".to_string(),
            number_decimal_digits: 2,
            percent_decimal_digits: 2,
            nan_symbol: "NaN".to_string(),
            positive_infinity_symbol: "Infinity".to_string(),
            negative_infinity_symbol: "-Infinity".to_string(),
        }
    }

    /// English (United States).
    #[must_use]
    pub fn en_us() -> Self {
        Self {
            percent_pattern: PercentPattern::NumberPercent,
            currency_symbol: "$".to_string(),
            positive_infinity_symbol: "∞".to_string(),
            negative_infinity_symbol: "-∞".to_string(),
            ..Self::invariant()
        }
    }

    /// German (Germany): comma decimal separator, dot grouping.
    #[must_use]
    pub fn de_de() -> Self {
        Self {
            decimal_separator: ",".to_string(),
            group_separator: ".".to_string(),
            currency_symbol: "€".to_string(),
            positive_infinity_symbol: "∞".to_string(),
            negative_infinity_symbol: "-∞".to_string(),
            ..Self::invariant()
        }
    }

    /// Set the decimal separator.
    #[must_use]
    pub fn decimal_separator(mut self, sep: impl Into<String>) -> Self {
        self.decimal_separator = sep.into();
        self
    }

    /// Set the group separator.
    #[must_use]
    pub fn group_separator(mut self, sep: impl Into<String>) -> Self {
        self.group_separator = sep.into();
        self
    }

    /// Set the percent symbol.
    #[must_use]
    pub fn percent_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.percent_symbol = symbol.into();
        self
    }

    /// Set the percent placement.
    #[must_use]
    pub const fn percent_pattern(mut self, pattern: PercentPattern) -> Self {
        self.percent_pattern = pattern;
        self
    }
}

/// Parse `text` as a number, accepting only the decorations in `styles`.
///
/// Returns `None` when the text is not a complete numeric literal.
pub fn parse_number(text: &str, styles: NumberStyles, nf: &NumberFormat) -> Option<f64> {
    let mut s = text;
    if styles.contains(NumberStyles::ALLOW_LEADING_WHITE) {
        s = s.trim_start();
    }
    if styles.contains(NumberStyles::ALLOW_TRAILING_WHITE) {
        s = s.trim_end();
    }
    if s.is_empty() {
        return None;
    }

    if let Some(special) = parse_special(s, nf) {
        return Some(special);
    }

    let mut negative = false;
    let mut parenthesized = false;
    if styles.contains(NumberStyles::ALLOW_PARENTHESES) {
        if let Some(inner) = s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            negative = true;
            parenthesized = true;
            s = inner.trim();
        }
    }

    if styles.contains(NumberStyles::ALLOW_CURRENCY_SYMBOL) && !nf.currency_symbol.is_empty() {
        if let Some(rest) = s.strip_prefix(nf.currency_symbol.as_str()) {
            s = rest.trim_start();
        } else if let Some(rest) = s.strip_suffix(nf.currency_symbol.as_str()) {
            s = rest.trim_end();
        }
    }

    let mut signed = false;
    if styles.contains(NumberStyles::ALLOW_LEADING_SIGN) {
        if let Some(rest) = strip_sign_prefix(s, nf) {
            signed = true;
            negative |= rest.0;
            s = rest.1;
        }
    }
    if !signed && styles.contains(NumberStyles::ALLOW_TRAILING_SIGN) {
        if let Some(rest) = strip_sign_suffix(s, nf) {
            signed = true;
            negative |= rest.0;
            s = rest.1;
        }
    }
    // "(-5)" is rejected rather than read as a double negative.
    if signed && parenthesized {
        return None;
    }

    let literal = normalize_digits(s, styles, nf)?;
    let magnitude: f64 = literal.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Recognize the NaN and infinity symbols, case-insensitively.
fn parse_special(s: &str, nf: &NumberFormat) -> Option<f64> {
    if s.eq_ignore_ascii_case(&nf.nan_symbol) {
        Some(f64::NAN)
    } else if s.eq_ignore_ascii_case(&nf.positive_infinity_symbol)
        || s == "∞"
        || s.eq_ignore_ascii_case("Infinity")
    {
        Some(f64::INFINITY)
    } else if s.eq_ignore_ascii_case(&nf.negative_infinity_symbol)
        || s == "-∞"
        || s.eq_ignore_ascii_case("-Infinity")
    {
        Some(f64::NEG_INFINITY)
    } else {
        None
    }
}

fn strip_sign_prefix<'a>(s: &'a str, nf: &NumberFormat) -> Option<(bool, &'a str)> {
    if let Some(rest) = s.strip_prefix(nf.negative_sign.as_str()) {
        Some((true, rest))
    } else {
        s.strip_prefix(nf.positive_sign.as_str()).map(|rest| (false, rest))
    }
}

fn strip_sign_suffix<'a>(s: &'a str, nf: &NumberFormat) -> Option<(bool, &'a str)> {
    if let Some(rest) = s.strip_suffix(nf.negative_sign.as_str()) {
        Some((true, rest))
    } else {
        s.strip_suffix(nf.positive_sign.as_str()).map(|rest| (false, rest))
    }
}

/// Rewrite the unsigned body of a culture literal into Rust float syntax.
fn normalize_digits(s: &str, styles: NumberStyles, nf: &NumberFormat) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    let mut mantissa_digits = 0usize;

    // Integer part, with optional group separators after the first digit.
    loop {
        if let Some(c) = rest.chars().next().filter(char::is_ascii_digit) {
            out.push(c);
            mantissa_digits += 1;
            rest = &rest[1..];
        } else if styles.contains(NumberStyles::ALLOW_THOUSANDS)
            && mantissa_digits > 0
            && !nf.group_separator.is_empty()
            && rest.starts_with(nf.group_separator.as_str())
        {
            rest = &rest[nf.group_separator.len()..];
        } else {
            break;
        }
    }

    if styles.contains(NumberStyles::ALLOW_DECIMAL_POINT) && !nf.decimal_separator.is_empty() {
        if let Some(frac) = rest.strip_prefix(nf.decimal_separator.as_str()) {
            out.push('.');
            rest = frac;
            while let Some(c) = rest.chars().next().filter(char::is_ascii_digit) {
                out.push(c);
                mantissa_digits += 1;
                rest = &rest[1..];
            }
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if styles.contains(NumberStyles::ALLOW_EXPONENT) {
        if let Some(exp) = rest.strip_prefix(['e', 'E']) {
            out.push('e');
            rest = exp;
            if let Some(r) = rest.strip_prefix('+') {
                rest = r;
            } else if let Some(r) = rest.strip_prefix('-') {
                out.push('-');
                rest = r;
            }
            let mut exp_digits = 0usize;
            while let Some(c) = rest.chars().next().filter(char::is_ascii_digit) {
                out.push(c);
                exp_digits += 1;
                rest = &rest[1..];
            }
            if exp_digits == 0 {
                return None;
            }
        }
    }

    rest.is_empty().then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any(text: &str) -> Option<f64> {
        parse_number(text, NumberStyles::ANY, &NumberFormat::invariant())
    }

    // =========================================================================
    // NumberStyles Tests
    // =========================================================================

    #[test]
    fn test_styles_composites() {
        assert_eq!(NumberStyles::INTEGER.bits(), 7);
        assert_eq!(NumberStyles::FLOAT.bits(), 167);
        assert_eq!(NumberStyles::NUMBER.bits(), 111);
        assert_eq!(NumberStyles::ANY.bits(), 511);
        assert_eq!(NumberStyles::default(), NumberStyles::ANY);
    }

    // =========================================================================
    // parse_number Tests
    // =========================================================================

    #[test]
    fn test_parse_plain() {
        assert_eq!(any("42"), Some(42.0));
        assert_eq!(any("  -3.5  "), Some(-3.5));
        assert_eq!(any("+7"), Some(7.0));
    }

    #[test]
    fn test_parse_thousands_and_exponent() {
        assert_eq!(any("1,234.5"), Some(1234.5));
        assert_eq!(any("1.5e3"), Some(1500.0));
        assert_eq!(any("2E-2"), Some(0.02));
    }

    #[test]
    fn test_parse_parentheses_and_trailing_sign() {
        assert_eq!(any("(12)"), Some(-12.0));
        assert_eq!(any("12-"), Some(-12.0));
        assert_eq!(any("(-12)"), None);
    }

    #[test]
    fn test_parse_currency() {
        let nf = NumberFormat::en_us();
        assert_eq!(parse_number("$5.25", NumberStyles::ANY, &nf), Some(5.25));
        assert_eq!(parse_number("$5.25", NumberStyles::FLOAT, &nf), None);
    }

    #[test]
    fn test_parse_special_symbols() {
        assert!(any("nan").is_some_and(f64::is_nan));
        assert_eq!(any("Infinity"), Some(f64::INFINITY));
        assert_eq!(any("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(any("∞"), Some(f64::INFINITY));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(any(""), None);
        assert_eq!(any("   "), None);
        assert_eq!(any("90°"), None);
        assert_eq!(any("1.2.3"), None);
        assert_eq!(any("e5"), None);
        assert_eq!(any("5e"), None);
        assert_eq!(any(",5"), None);
    }

    #[test]
    fn test_parse_style_restrictions() {
        let nf = NumberFormat::invariant();
        assert_eq!(parse_number("1,000", NumberStyles::FLOAT, &nf), None);
        assert_eq!(parse_number("1.5", NumberStyles::INTEGER, &nf), None);
        assert_eq!(parse_number(" 1", NumberStyles::empty(), &nf), None);
        assert_eq!(parse_number("1", NumberStyles::empty(), &nf), Some(1.0));
    }

    #[test]
    fn test_parse_german_culture() {
        let nf = NumberFormat::de_de();
        assert_eq!(parse_number("1.234,5", NumberStyles::ANY, &nf), Some(1234.5));
        assert_eq!(parse_number("0,25", NumberStyles::ANY, &nf), Some(0.25));
    }

    #[test]
    fn test_number_format_serde_defaults() {
        let nf: NumberFormat = serde_json::from_str(r#"{"decimal_separator": ","}"#).unwrap();
        assert_eq!(nf.decimal_separator, ",");
        assert_eq!(nf.group_separator, ",");
        assert_eq!(nf.nan_symbol, "NaN");
    }

    proptest! {
        #[test]
        fn prop_parse_matches_display(v in -1.0e9f64..1.0e9) {
            let text = v.to_string();
            prop_assert_eq!(any(&text), Some(v));
        }
    }
}
