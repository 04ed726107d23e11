//! Built-in number rendering.
//!
//! Format strings follow the familiar standard/custom numeric conventions:
//!
//! - Standard: `G`/`g` (general, shortest round-trip by default), `F`/`f`
//!   (fixed), `N`/`n` (fixed with grouping), `P`/`p` (percent), `E`/`e`
//!   (exponential), each with an optional precision, e.g. `N2`.
//! - Custom: `0` and `#` digit placeholders, `.` decimal point, `,` grouping
//!   (or divide by 1000 when it directly precedes the decimal point), `%`,
//!   `\x` escapes, quoted literals, and up to three `;`-separated sections
//!   (positive; negative; zero).
//! - Composite: templates containing `{0}` or `{0:fmt}`, e.g. `"{0:F1} °"`.

use crate::number_style::{NumberFormat, PercentPattern};

/// Literal rendered for a NaN value, and accepted (case-insensitively) when parsing.
pub const NAN_TOKEN: &str = "NaN";

/// Whether the format string selects percent formatting.
///
/// Only the first `P` is considered, and it is ignored when quotes appear
/// both before and after it (a quoted literal such as `0 'Pa'`).
pub fn is_percent(format_string: &str) -> bool {
    let Some(index) = format_string.find('P') else {
        return false;
    };
    let quoted = format_string[..index].contains('\'') && format_string[index..].contains('\'');
    !quoted
}

/// Whether the format string is a composite template with a value placeholder.
pub fn is_composite(format_string: &str) -> bool {
    format_string.contains("{0")
}

/// Render `value` with a standard or custom format string.
pub fn format_number(value: f64, format_string: &str, nf: &NumberFormat) -> String {
    if value.is_nan() {
        return nf.nan_symbol.clone();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            nf.positive_infinity_symbol.clone()
        } else {
            nf.negative_infinity_symbol.clone()
        };
    }

    match standard_specifier(format_string) {
        Some((spec, precision)) => match spec {
            'G' | 'g' | 'R' | 'r' => general(value, precision, spec.is_ascii_uppercase(), nf),
            'F' | 'f' => fixed(value, precision.unwrap_or(nf.number_decimal_digits), false, nf),
            'N' | 'n' => fixed(value, precision.unwrap_or(nf.number_decimal_digits), true, nf),
            'P' | 'p' => percent(value, precision.unwrap_or(nf.percent_decimal_digits), nf),
            'E' | 'e' => exponential(value, precision.unwrap_or(6), spec == 'E', nf),
            _ => custom(value, format_string, nf),
        },
        None => custom(value, format_string, nf),
    }
}

/// Render `value` into a composite template.
///
/// `{{` and `}}` escape braces; `{0[,alignment][:format]}` is replaced with
/// the formatted value. Placeholders for other argument indices are kept
/// verbatim.
pub fn format_composite(template: &str, value: f64, nf: &NumberFormat) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut item = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    item.push(inner);
                }
                if closed {
                    match render_item(&item, value, nf) {
                        Some(rendered) => out.push_str(&rendered),
                        None => {
                            out.push('{');
                            out.push_str(&item);
                            out.push('}');
                        }
                    }
                } else {
                    out.push('{');
                    out.push_str(&item);
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn render_item(item: &str, value: f64, nf: &NumberFormat) -> Option<String> {
    let (head, format_string) = item.split_once(':').unwrap_or((item, ""));
    let (index, alignment) = match head.split_once(',') {
        Some((index, align)) => (index.trim(), Some(align.trim().parse::<i32>().ok()?)),
        None => (head.trim(), None),
    };
    if index != "0" {
        return None;
    }

    let rendered = format_number(value, format_string, nf);
    Some(match alignment {
        Some(width) if width < 0 => {
            format!("{rendered:<w$}", w = width.unsigned_abs() as usize)
        }
        Some(width) => format!("{rendered:>w$}", w = width as usize),
        None => rendered,
    })
}

/// Split `"N2"` into `('N', Some(2))`; `""` is general formatting.
fn standard_specifier(format_string: &str) -> Option<(char, Option<usize>)> {
    let mut chars = format_string.chars();
    let Some(spec) = chars.next() else {
        return Some(('G', None));
    };
    if !spec.is_ascii_alphabetic() {
        return None;
    }
    let rest = chars.as_str();
    if rest.is_empty() {
        return Some((spec, None));
    }
    if rest.len() <= 2 && rest.chars().all(|c| c.is_ascii_digit()) {
        return rest.parse().ok().map(|p| (spec, Some(p)));
    }
    None
}

// =============================================================================
// Standard formats
// =============================================================================

/// Significant digits (no trailing zeros) and the decimal exponent of the first one.
fn significant_digits(abs: f64, precision: Option<usize>) -> (String, i32) {
    let sci = match precision {
        Some(p) if p > 0 => format!("{:.*e}", p - 1, abs),
        _ => format!("{abs:e}"),
    };
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let mut digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    while digits.len() > 1 && digits.ends_with('0') {
        digits.pop();
    }
    (digits, exponent.parse().unwrap_or(0))
}

fn general(value: f64, precision: Option<usize>, upper: bool, nf: &NumberFormat) -> String {
    let abs = value.abs();
    if abs == 0.0 {
        return "0".to_string();
    }
    let (digits, exponent) = significant_digits(abs, precision);
    let limit = precision.filter(|p| *p > 0).map_or(15, |p| p as i32);

    let body = if exponent >= limit || exponent < -4 {
        let mut s = digits[..1].to_string();
        if digits.len() > 1 {
            s.push_str(&nf.decimal_separator);
            s.push_str(&digits[1..]);
        }
        s.push(if upper { 'E' } else { 'e' });
        s.push(if exponent < 0 { '-' } else { '+' });
        s.push_str(&format!("{:02}", exponent.unsigned_abs()));
        s
    } else if exponent >= 0 {
        let int_len = exponent as usize + 1;
        if digits.len() <= int_len {
            format!("{digits:0<int_len$}")
        } else {
            format!(
                "{}{}{}",
                &digits[..int_len],
                nf.decimal_separator,
                &digits[int_len..]
            )
        }
    } else {
        let zeros = "0".repeat((-exponent - 1) as usize);
        format!("0{}{zeros}{digits}", nf.decimal_separator)
    };

    with_sign(value < 0.0, body, nf)
}

fn fixed(value: f64, decimals: usize, grouped: bool, nf: &NumberFormat) -> String {
    let s = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), ""));
    let nonzero = s.bytes().any(|b| (b'1'..=b'9').contains(&b));

    let mut body = if grouped {
        group_digits(int_part, nf)
    } else {
        int_part.to_string()
    };
    if !frac_part.is_empty() {
        body.push_str(&nf.decimal_separator);
        body.push_str(frac_part);
    }
    with_sign(value < 0.0 && nonzero, body, nf)
}

fn percent(value: f64, decimals: usize, nf: &NumberFormat) -> String {
    let number = fixed(value * 100.0, decimals, true, nf);
    match nf.percent_pattern {
        PercentPattern::NumberSpacePercent => format!("{number} {}", nf.percent_symbol),
        PercentPattern::NumberPercent => format!("{number}{}", nf.percent_symbol),
        PercentPattern::PercentNumber => format!("{}{number}", nf.percent_symbol),
    }
}

fn exponential(value: f64, decimals: usize, upper: bool, nf: &NumberFormat) -> String {
    let s = format!("{:.*e}", decimals, value.abs());
    let (mantissa, exponent) = s.split_once('e').unwrap_or((s.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let body = format!(
        "{}{}{}{:03}",
        mantissa.replacen('.', &nf.decimal_separator, 1),
        if upper { 'E' } else { 'e' },
        if exponent < 0 { '-' } else { '+' },
        exponent.unsigned_abs()
    );
    with_sign(value < 0.0, body, nf)
}

fn with_sign(negative: bool, body: String, nf: &NumberFormat) -> String {
    if negative {
        format!("{}{body}", nf.negative_sign)
    } else {
        body
    }
}

fn group_digits(int_part: &str, nf: &NumberFormat) -> String {
    let size = nf.group_size.max(1);
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / size * nf.group_separator.len());
    for (i, c) in int_part.chars().enumerate() {
        out.push(c);
        let remaining = len - i - 1;
        if remaining > 0 && remaining % size == 0 {
            out.push_str(&nf.group_separator);
        }
    }
    out
}

// =============================================================================
// Custom formats
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    Zero,
    Hash,
    Point,
    Comma,
    Percent,
}

impl Token {
    const fn is_digit(&self) -> bool {
        matches!(self, Self::Zero | Self::Hash)
    }
}

fn tokenize(section: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = section.chars();
    let mut seen_point = false;
    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let literal: String = chars.by_ref().take_while(|&q| q != c).collect();
                tokens.push(Token::Literal(literal));
            }
            '\\' => {
                if let Some(escaped) = chars.next() {
                    tokens.push(Token::Literal(escaped.to_string()));
                }
            }
            '0' => tokens.push(Token::Zero),
            '#' => tokens.push(Token::Hash),
            '.' if !seen_point => {
                seen_point = true;
                tokens.push(Token::Point);
            }
            '.' => {}
            ',' => tokens.push(Token::Comma),
            '%' => tokens.push(Token::Percent),
            other => tokens.push(Token::Literal(other.to_string())),
        }
    }
    tokens
}

/// Split on `;` outside quotes and escapes.
fn split_sections(pattern: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in pattern.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (None, '\\') => escaped = true,
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), _) if q == c => quote = None,
            (None, ';') => {
                sections.push(&pattern[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    sections.push(&pattern[start..]);
    sections
}

/// Layout facts derived from one custom section.
struct Layout {
    int_placeholders: usize,
    min_int: usize,
    min_frac: usize,
    max_frac: usize,
    grouping: bool,
    scale_commas: i32,
    percents: i32,
}

impl Layout {
    fn analyze(tokens: &[Token]) -> Self {
        let point = tokens.iter().position(|t| *t == Token::Point);
        let (int_tokens, frac_tokens) = match point {
            Some(p) => (&tokens[..p], &tokens[p + 1..]),
            None => (tokens, &[][..]),
        };

        let int_digits: Vec<&Token> = int_tokens.iter().filter(|t| t.is_digit()).collect();
        let min_int = int_digits
            .iter()
            .position(|t| **t == Token::Zero)
            .map_or(0, |first_zero| int_digits.len() - first_zero);

        let frac_digits: Vec<&Token> = frac_tokens.iter().filter(|t| t.is_digit()).collect();
        let min_frac = frac_digits
            .iter()
            .rposition(|t| **t == Token::Zero)
            .map_or(0, |last_zero| last_zero + 1);

        // Commas directly left of the decimal point (or the last integer
        // placeholder) scale; commas between integer placeholders group.
        let last_int_digit = int_tokens.iter().rposition(Token::is_digit);
        let scale_end = point.unwrap_or_else(|| {
            last_int_digit.map_or(0, |i| i + 1 + trailing_commas(&int_tokens[i + 1..]))
        });
        let mut scale_commas = 0;
        let mut i = scale_end;
        while i > 0 && int_tokens.get(i - 1) == Some(&Token::Comma) {
            scale_commas += 1;
            i -= 1;
        }
        let first_int_digit = int_tokens.iter().position(Token::is_digit);
        let grouping = match (first_int_digit, last_int_digit) {
            (Some(first), Some(last)) => int_tokens[first..=last].contains(&Token::Comma),
            _ => false,
        };

        Self {
            int_placeholders: int_digits.len(),
            min_int,
            min_frac,
            max_frac: frac_digits.len(),
            grouping,
            scale_commas,
            percents: tokens.iter().filter(|t| **t == Token::Percent).count() as i32,
        }
    }
}

fn trailing_commas(tokens: &[Token]) -> usize {
    tokens.iter().take_while(|t| **t == Token::Comma).count()
}

fn custom(value: f64, pattern: &str, nf: &NumberFormat) -> String {
    let sections = split_sections(pattern);
    let (section, signed) = if value < 0.0 && sections.len() >= 2 && !sections[1].is_empty() {
        (sections[1], false)
    } else if value == 0.0 && sections.len() >= 3 && !sections[2].is_empty() {
        (sections[2], false)
    } else {
        (sections[0], true)
    };

    let tokens = tokenize(section);
    let layout = Layout::analyze(&tokens);
    let scaled = value.abs() * 100f64.powi(layout.percents) / 1000f64.powi(layout.scale_commas);

    let s = format!("{:.*}", layout.max_frac, scaled);
    let (int_raw, frac_raw) = s.split_once('.').unwrap_or((s.as_str(), ""));
    let mut frac = frac_raw.to_string();
    while frac.len() > layout.min_frac && frac.ends_with('0') {
        frac.pop();
    }
    let int_trimmed = int_raw.trim_start_matches('0');
    let int_digits: Vec<char> = format!("{int_trimmed:0>w$}", w = layout.min_int)
        .chars()
        .collect();
    let is_zero = int_digits.iter().all(|c| *c == '0') && frac.bytes().all(|b| b == b'0');

    let mut out = String::new();
    let mut int_index = 0usize;
    let mut frac_index = 0usize;
    let mut placeholder = 0usize;
    let mut emitted_int = false;
    let len = int_digits.len() as isize;
    let slots = layout.int_placeholders as isize;

    let emit_int = |out: &mut String, upto: usize, int_index: &mut usize| {
        while *int_index < upto {
            out.push(int_digits[*int_index]);
            *int_index += 1;
            let remaining = int_digits.len() - *int_index;
            if layout.grouping && remaining > 0 && remaining % nf.group_size.max(1) == 0 {
                out.push_str(&nf.group_separator);
            }
        }
    };

    let mut in_fraction = false;
    for token in &tokens {
        match token {
            Token::Zero | Token::Hash if !in_fraction => {
                let end = (len - slots + placeholder as isize + 1).clamp(0, len) as usize;
                emit_int(&mut out, end, &mut int_index);
                placeholder += 1;
                emitted_int = true;
            }
            Token::Zero | Token::Hash => {
                if let Some(c) = frac.chars().nth(frac_index) {
                    out.push(c);
                }
                frac_index += 1;
            }
            Token::Point => {
                if !emitted_int {
                    emit_int(&mut out, int_digits.len(), &mut int_index);
                }
                in_fraction = true;
                if !frac.is_empty() {
                    out.push_str(&nf.decimal_separator);
                }
            }
            Token::Comma => {}
            Token::Percent => out.push_str(&nf.percent_symbol),
            Token::Literal(text) => out.push_str(text),
        }
    }

    with_sign(signed && value < 0.0 && !is_zero, out, nf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fmt(value: f64, format_string: &str) -> String {
        format_number(value, format_string, &NumberFormat::invariant())
    }

    // =========================================================================
    // Percent / Composite Detection Tests
    // =========================================================================

    #[test]
    fn test_is_percent() {
        assert!(is_percent("P"));
        assert!(is_percent("P2"));
        assert!(is_percent("0.00 P"));
        assert!(!is_percent("0.00 'P'"));
        assert!(!is_percent("N2"));
        assert!(!is_percent("p2"));
    }

    #[test]
    fn test_is_percent_only_first_p_counts() {
        // First P is quoted, so the format is not treated as percent even
        // though a second, unquoted P follows.
        assert!(!is_percent("'P' P"));
    }

    #[test]
    fn test_is_composite() {
        assert!(is_composite("{0:F1} °"));
        assert!(is_composite("{0}"));
        assert!(!is_composite("F1"));
    }

    // =========================================================================
    // Standard Format Tests
    // =========================================================================

    #[test]
    fn test_general_shortest() {
        assert_eq!(fmt(0.0, ""), "0");
        assert_eq!(fmt(1.5, ""), "1.5");
        assert_eq!(fmt(-42.0, "G"), "-42");
        assert_eq!(fmt(0.1, ""), "0.1");
        assert_eq!(fmt(0.0001, ""), "0.0001");
        assert_eq!(fmt(0.00001, ""), "1E-05");
        assert_eq!(fmt(1e15, ""), "1E+15");
        assert_eq!(fmt(123_456_789.0, ""), "123456789");
    }

    #[test]
    fn test_general_precision() {
        assert_eq!(fmt(1234.5678, "G6"), "1234.57");
        assert_eq!(fmt(1234.5678, "G2"), "1.2E+03");
        assert_eq!(fmt(1234.5678, "g2"), "1.2e+03");
    }

    #[test]
    fn test_fixed_and_number() {
        assert_eq!(fmt(3.14159, "F2"), "3.14");
        assert_eq!(fmt(3.0, "F"), "3.00");
        assert_eq!(fmt(1_234_567.891, "N2"), "1,234,567.89");
        assert_eq!(fmt(-1234.4, "N0"), "-1,234");
        assert_eq!(fmt(-0.001, "F2"), "0.00");
    }

    #[test]
    fn test_percent_standard() {
        assert_eq!(fmt(0.125, "P1"), "12.5 %");
        let nf = NumberFormat::en_us();
        assert_eq!(format_number(0.5, "P0", &nf), "50%");
    }

    #[test]
    fn test_exponential() {
        assert_eq!(fmt(1234.5, "E2"), "1.23E+003");
        assert_eq!(fmt(0.00012, "e1"), "1.2e-004");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(fmt(f64::NAN, "F2"), "NaN");
        assert_eq!(fmt(f64::INFINITY, ""), "Infinity");
        assert_eq!(fmt(f64::NEG_INFINITY, "N"), "-Infinity");
    }

    #[test]
    fn test_culture_separators() {
        let nf = NumberFormat::de_de();
        assert_eq!(format_number(1234.5, "N1", &nf), "1.234,5");
    }

    // =========================================================================
    // Custom Format Tests
    // =========================================================================

    #[test]
    fn test_custom_placeholders() {
        assert_eq!(fmt(5.0, "00.00"), "05.00");
        assert_eq!(fmt(0.5, "#.##"), ".5");
        assert_eq!(fmt(1234.5, "#,##0.0"), "1,234.5");
        assert_eq!(fmt(12.345, "0.#"), "12.3");
    }

    #[test]
    fn test_custom_literals() {
        assert_eq!(fmt(90.0, "0°"), "90°");
        assert_eq!(fmt(3.5, "0.0 'kg'"), "3.5 kg");
        assert_eq!(fmt(7.0, "\\#0"), "#7");
        assert_eq!(fmt(-7.0, "0 m"), "-7 m");
    }

    #[test]
    fn test_custom_percent_and_scaling() {
        assert_eq!(fmt(0.25, "0%"), "25%");
        assert_eq!(fmt(1_500_000.0, "0,,"), "2");
        assert_eq!(fmt(1_500_000.0, "0,,.0"), "1.5");
    }

    #[test]
    fn test_custom_sections() {
        assert_eq!(fmt(5.0, "0;(0);zero"), "5");
        assert_eq!(fmt(-5.0, "0;(0);zero"), "(5)");
        assert_eq!(fmt(0.0, "0;(0);zero"), "zero");
    }

    #[test]
    fn test_custom_interleaved_literals() {
        assert_eq!(fmt(1234.0, "00-00"), "12-34");
        assert_eq!(fmt(123_456.0, "00-00"), "1234-56");
    }

    // =========================================================================
    // Composite Tests
    // =========================================================================

    #[test]
    fn test_composite_template() {
        let nf = NumberFormat::invariant();
        assert_eq!(format_composite("{0:F1} °", 90.0, &nf), "90.0 °");
        assert_eq!(format_composite("Value: {0}", 2.5, &nf), "Value: 2.5");
        assert_eq!(format_composite("{{{0}}}", 1.0, &nf), "{1}");
        assert_eq!(format_composite("{0,5:F0}|", 3.0, &nf), "    3|");
        assert_eq!(format_composite("{1}", 3.0, &nf), "{1}");
    }

    proptest! {
        #[test]
        fn prop_general_roundtrips(v in -1.0e12f64..1.0e12) {
            let text = fmt(v, "");
            let back: f64 = text.parse().unwrap();
            prop_assert_eq!(back, v);
        }

        #[test]
        fn prop_fixed_has_requested_decimals(v in -1.0e6f64..1.0e6, d in 0usize..6) {
            let text = fmt(v, &format!("F{d}"));
            let decimals = text.split_once('.').map_or(0, |(_, f)| f.len());
            prop_assert_eq!(decimals, d);
        }
    }
}
