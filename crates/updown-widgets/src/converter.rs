//! Text ↔ value conversion for numeric inputs.
//!
//! [`ValueFormatter`] is the single place the widget turns a value into text
//! and back. A [`TextConverter`], when configured, replaces the built-in
//! rules entirely; otherwise formatting follows the format string and
//! [`NumberFormat`], and parsing follows [`NumberStyles`].

use crate::error::NumericError;
use crate::format::{format_composite, format_number, is_composite, is_percent, NAN_TOKEN};
use crate::number_style::{parse_number, NumberFormat, NumberStyles};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A pluggable converter between display text and a numeric value.
pub trait TextConverter: Send + Sync {
    /// Render a value. `None` clears the text.
    fn to_text(&self, value: Option<f64>, nf: &NumberFormat) -> Option<String>;

    /// Parse text. `Ok(None)` clears the value.
    fn from_text(&self, text: &str, nf: &NumberFormat) -> Result<Option<f64>, NumericError>;
}

type FormatFn = Box<dyn Fn(f64) -> String + Send + Sync>;
type ParseFn = Box<dyn Fn(&str) -> Option<f64> + Send + Sync>;

/// A converter built from a pair of closures.
///
/// ```
/// use updown_widgets::{FnConverter, NumberFormat, TextConverter};
///
/// let minutes = FnConverter::new(
///     |n| format!("{}:{:02}", (n / 60.0).floor(), (n % 60.0).floor()),
///     |s| {
///         let (m, s) = s.split_once(':')?;
///         Some(m.parse::<f64>().ok()? * 60.0 + s.parse::<f64>().ok()?)
///     },
/// );
/// let nf = NumberFormat::invariant();
/// assert_eq!(minutes.to_text(Some(75.0), &nf).as_deref(), Some("1:15"));
/// assert_eq!(minutes.from_text("2:30", &nf), Ok(Some(150.0)));
/// ```
pub struct FnConverter {
    format: FormatFn,
    parse: ParseFn,
}

impl FnConverter {
    /// Create a converter from a formatter and a parser.
    pub fn new(
        format: impl Fn(f64) -> String + Send + Sync + 'static,
        parse: impl Fn(&str) -> Option<f64> + Send + Sync + 'static,
    ) -> Self {
        Self {
            format: Box::new(format),
            parse: Box::new(parse),
        }
    }
}

impl fmt::Debug for FnConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConverter").finish_non_exhaustive()
    }
}

impl TextConverter for FnConverter {
    fn to_text(&self, value: Option<f64>, _nf: &NumberFormat) -> Option<String> {
        value.map(|v| (self.format)(v))
    }

    fn from_text(&self, text: &str, _nf: &NumberFormat) -> Result<Option<f64>, NumericError> {
        (self.parse)(text)
            .map(Some)
            .ok_or_else(|| NumericError::Converter(format!("cannot parse {text:?}")))
    }
}

/// Display and parse integers in base 2, 8 or 16.
///
/// Fractional parts are truncated when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadixConverter {
    radix: u32,
    min_width: usize,
    upper: bool,
}

impl RadixConverter {
    /// Binary integers.
    #[must_use]
    pub const fn binary() -> Self {
        Self {
            radix: 2,
            min_width: 0,
            upper: false,
        }
    }

    /// Octal integers.
    #[must_use]
    pub const fn octal() -> Self {
        Self {
            radix: 8,
            min_width: 0,
            upper: false,
        }
    }

    /// Hexadecimal integers.
    #[must_use]
    pub const fn hexadecimal(upper: bool) -> Self {
        Self {
            radix: 16,
            min_width: 0,
            upper,
        }
    }

    /// Left-pad rendered digits with zeros to at least `width`.
    #[must_use]
    pub const fn min_width(mut self, width: usize) -> Self {
        self.min_width = width;
        self
    }

    fn prefix(&self) -> &'static str {
        match self.radix {
            2 => "0b",
            8 => "0o",
            _ => "0x",
        }
    }
}

impl TextConverter for RadixConverter {
    fn to_text(&self, value: Option<f64>, nf: &NumberFormat) -> Option<String> {
        let v = value?;
        if v.is_nan() {
            return Some(nf.nan_symbol.clone());
        }
        let n = v as i64;
        let magnitude = n.unsigned_abs();
        let w = self.min_width;
        let digits = match (self.radix, self.upper) {
            (2, _) => format!("{magnitude:0>w$b}"),
            (8, _) => format!("{magnitude:0>w$o}"),
            (_, true) => format!("{magnitude:0>w$X}"),
            (_, false) => format!("{magnitude:0>w$x}"),
        };
        Some(if n < 0 {
            format!("{}{digits}", nf.negative_sign)
        } else {
            digits
        })
    }

    fn from_text(&self, text: &str, nf: &NumberFormat) -> Result<Option<f64>, NumericError> {
        let trimmed = text.trim();
        let (negative, body) = match trimmed.strip_prefix(nf.negative_sign.as_str()) {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let body = body
            .strip_prefix(self.prefix())
            .or_else(|| body.strip_prefix(&self.prefix().to_uppercase()))
            .unwrap_or(body);
        let invalid = |reason: String| {
            NumericError::Converter(format!("{text:?} is not a base-{} integer: {reason}", self.radix))
        };
        if body.starts_with(['+', '-']) {
            return Err(invalid("unexpected sign".to_string()));
        }
        let magnitude = i64::from_str_radix(body, self.radix).map_err(|e| invalid(e.to_string()))?;
        let n = if negative {
            magnitude
                .checked_neg()
                .ok_or_else(|| invalid("out of range".to_string()))?
        } else {
            magnitude
        };
        Ok(Some(n as f64))
    }
}

/// The formatter/parser adapter shared by the sync engine.
#[derive(Clone, Default)]
pub struct ValueFormatter {
    /// Standard, custom or composite format string.
    pub format_string: String,
    /// Culture symbols.
    pub number_format: NumberFormat,
    /// Styles accepted by the direct numeric parse.
    pub parsing_number_style: NumberStyles,
    /// Custom converter; wins over every built-in rule when present.
    pub text_converter: Option<Arc<dyn TextConverter>>,
}

impl fmt::Debug for ValueFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueFormatter")
            .field("format_string", &self.format_string)
            .field("number_format", &self.number_format)
            .field("parsing_number_style", &self.parsing_number_style)
            .field("text_converter", &self.text_converter.is_some())
            .finish()
    }
}

impl ValueFormatter {
    /// Render a value to display text.
    pub fn format(&self, value: Option<f64>) -> Option<String> {
        if let Some(converter) = &self.text_converter {
            return converter.to_text(value, &self.number_format);
        }
        let v = value?;
        if is_composite(&self.format_string) {
            return Some(format_composite(&self.format_string, v, &self.number_format));
        }
        if v.is_nan() {
            return Some(NAN_TOKEN.to_string());
        }
        Some(format_number(v, &self.format_string, &self.number_format))
    }

    /// Parse display text into a value.
    ///
    /// `rendered` is the current value's display text; it is consulted only
    /// when the direct parse fails, to strip decorations the format adds.
    pub fn parse(&self, rendered: Option<&str>, raw: Option<&str>) -> Result<Option<f64>, NumericError> {
        let Some(text) = raw.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        if let Some(converter) = &self.text_converter {
            return converter.from_text(text, &self.number_format);
        }
        if text.trim().eq_ignore_ascii_case(NAN_TOKEN) {
            return Ok(Some(f64::NAN));
        }
        if is_percent(&self.format_string) {
            return self.parse_percent(text).map(Some);
        }
        if let Some(v) = parse_number(text, self.parsing_number_style, &self.number_format) {
            return Ok(Some(v));
        }
        self.parse_decorated(rendered.unwrap_or_default(), text)
            .map(Some)
            .ok_or_else(|| NumericError::format(text))
    }

    fn parse_percent(&self, text: &str) -> Result<f64, NumericError> {
        let symbol = self.number_format.percent_symbol.as_str();
        let stripped = if symbol.is_empty() {
            text.to_string()
        } else {
            text.replace(symbol, "")
        };
        parse_number(&stripped, NumberStyles::ANY, &self.number_format)
            .map(|v| v / 100.0)
            .ok_or_else(|| NumericError::format(text))
    }

    /// Retry a failed parse after removing the format's decorative characters.
    ///
    /// Applies only when the current rendered text is itself unparsable (the
    /// format adds adornments such as units) and every non-digit character of
    /// `text` also appears in it. Every non-digit character is then removed,
    /// separators and signs included, so `"2.5°"` recovers as `25`.
    fn parse_decorated(&self, rendered: &str, text: &str) -> Option<f64> {
        let style = self.parsing_number_style;
        let nf = &self.number_format;
        if parse_number(rendered, style, nf).is_some() {
            return None;
        }

        let rendered_marks: HashSet<char> =
            rendered.chars().filter(|c| !c.is_ascii_digit()).collect();
        let text_marks: HashSet<char> = text.chars().filter(|c| !c.is_ascii_digit()).collect();
        if !text_marks.is_subset(&rendered_marks) {
            return None;
        }

        let stripped: String = text.chars().filter(|c| !text_marks.contains(c)).collect();

        let parsed = parse_number(&stripped, style, nf);
        if parsed.is_some() {
            log::debug!("parsed {text:?} as {stripped:?} after removing format decorations");
        }
        parsed
    }
}
