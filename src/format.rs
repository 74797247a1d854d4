//! Locale-aware formatting of hours and monetary amounts

use serde_json::Value;
use tracing::warn;

/// Where a currency symbol goes relative to the number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPlacement {
    /// `$1,500.00`
    Before,
    /// `R$ 1.500,00`
    BeforeSpaced,
    /// `1.500,00 €`
    After,
}

/// Separators and symbol placement for a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleFormat {
    pub group: char,
    pub decimal: char,
    pub placement: SymbolPlacement,
}

impl LocaleFormat {
    /// US English conventions, used for unknown or missing locales
    pub const EN_US: Self = Self {
        group: ',',
        decimal: '.',
        placement: SymbolPlacement::Before,
    };

    /// Resolve a BCP 47 tag such as `de-DE` by its language subtag
    pub fn for_locale(locale: Option<&str>) -> Self {
        let Some(tag) = locale else {
            return Self::EN_US;
        };
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match language.as_str() {
            "de" | "es" | "it" | "da" | "tr" | "id" => Self {
                group: '.',
                decimal: ',',
                placement: SymbolPlacement::After,
            },
            "nl" | "pt" => Self {
                group: '.',
                decimal: ',',
                placement: SymbolPlacement::BeforeSpaced,
            },
            "fr" => Self {
                group: '\u{202F}',
                decimal: ',',
                placement: SymbolPlacement::After,
            },
            "sv" | "nb" | "no" | "fi" | "pl" | "cs" | "ru" => Self {
                group: '\u{00A0}',
                decimal: ',',
                placement: SymbolPlacement::After,
            },
            _ => Self::EN_US,
        }
    }
}

/// Symbol and fraction digits for an ISO 4217 code
pub fn currency_symbol(code: &str) -> (String, usize) {
    let code = code.trim().to_ascii_uppercase();
    let (symbol, digits) = match code.as_str() {
        "USD" => ("$", 2),
        "EUR" => ("\u{20AC}", 2),
        "GBP" => ("\u{00A3}", 2),
        "JPY" => ("\u{00A5}", 0),
        "KRW" => ("KRW", 0),
        "CAD" => ("CA$", 2),
        "AUD" => ("A$", 2),
        "NZD" => ("NZ$", 2),
        "MXN" => ("MX$", 2),
        "BRL" => ("R$", 2),
        "CHF" => ("CHF", 2),
        _ => return (code, 2),
    };
    (symbol.to_string(), digits)
}

/// Interpret a JSON value as a number; numeric strings count
pub fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Raw string form of a value that could not be formatted as a number
fn raw_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Format a number with fixed decimals and locale grouping
pub fn format_fixed(value: f64, decimals: usize, locale: &LocaleFormat) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    let mut out = String::new();
    let is_zero = rendered.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, locale.group));
    if let Some(frac) = frac_part {
        out.push(locale.decimal);
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Format hours with one decimal, e.g. `12.5`.
///
/// A missing value counts as zero; anything non-numeric is returned as-is.
pub fn format_hours(value: Option<&Value>, locale: Option<&str>) -> String {
    let format = LocaleFormat::for_locale(locale);
    match value {
        None | Some(Value::Null) => format_fixed(0.0, 1, &format),
        Some(value) => match numeric_value(value) {
            Some(hours) => format_fixed(hours, 1, &format),
            None => {
                warn!("Non-numeric hours value {}", value);
                raw_string(value)
            }
        },
    }
}

/// Format an amount given in minor units (cents), e.g. `150000` → `$1,500.00`.
///
/// With both a locale and a currency the currency's symbol and placement are
/// used; otherwise the locale's grouping with two decimals behind a literal
/// `$`. A missing value counts as zero; anything non-numeric is returned
/// as-is.
pub fn format_amount(value: Option<&Value>, locale: Option<&str>, currency: Option<&str>) -> String {
    let cents = match value {
        None | Some(Value::Null) => 0.0,
        Some(value) => match numeric_value(value) {
            Some(cents) => cents,
            None => {
                warn!("Non-numeric amount value {}", value);
                return raw_string(value);
            }
        },
    };
    format_minor_units(cents, locale, currency)
}

/// Format a numeric amount in minor units
pub fn format_minor_units(cents: f64, locale: Option<&str>, currency: Option<&str>) -> String {
    let major = cents / 100.0;
    let format = LocaleFormat::for_locale(locale);

    match (locale, currency.filter(|c| !c.trim().is_empty())) {
        (Some(_), Some(code)) => {
            let (symbol, digits) = currency_symbol(code);
            let number = format_fixed(major.abs(), digits, &format);
            let sign = if major < 0.0 && number.chars().any(|c| c.is_ascii_digit() && c != '0') {
                "-"
            } else {
                ""
            };
            match format.placement {
                SymbolPlacement::Before => format!("{sign}{symbol}{number}"),
                SymbolPlacement::BeforeSpaced => format!("{sign}{symbol}\u{00A0}{number}"),
                SymbolPlacement::After => format!("{sign}{number}\u{00A0}{symbol}"),
            }
        }
        _ => {
            let number = format_fixed(major, 2, &format);
            match number.strip_prefix('-') {
                Some(positive) => format!("-${positive}"),
                None => format!("${number}"),
            }
        }
    }
}
