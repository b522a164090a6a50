// parsing of user-entered amounts such as "Rp 1.250.000,50" or "19,99%"

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, SnowballError};

/// separator convention of an input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NumberFormat {
    /// `1,234.56`
    Standard,
    /// `1.234,56`
    Continental,
    /// guess separators from the input itself
    #[default]
    Auto,
}

impl NumberFormat {
    fn separators(self, body: &str) -> Separators {
        match self {
            NumberFormat::Standard => Separators { decimal: Some('.'), thousands: Some(',') },
            NumberFormat::Continental => Separators { decimal: Some(','), thousands: Some('.') },
            NumberFormat::Auto => detect_separators(body),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Separators {
    decimal: Option<char>,
    thousands: Option<char>,
}

fn is_separator(c: char) -> bool {
    c == '.' || c == ','
}

const CURRENCY_SYMBOLS: &str = "$€£¥₹₩₽₺₫฿₱₦¢";

/// `$`, `€`, `Rp`, `USD` or `US$`
fn is_currency_marker(s: &str) -> bool {
    let code_len = s.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    let (code, symbols) = s.split_at(code_len);
    let code_ok = code.is_empty()
        || ((2..=3).contains(&code.len()) && code.starts_with(|c: char| c.is_ascii_uppercase()));
    let symbols_ok = symbols.chars().count() <= 1
        && symbols.chars().all(|c| CURRENCY_SYMBOLS.contains(c));
    !s.is_empty() && code_ok && symbols_ok
}

fn invalid(input: &str, reason: &str) -> SnowballError {
    SnowballError::InvalidAmount {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

/// guess which separator is the decimal point
///
/// both present: the last one is decimal. a single separator occurring once is
/// decimal unless exactly three digits follow a non-zero integer part.
fn detect_separators(body: &str) -> Separators {
    let last_dot = body.rfind('.');
    let last_comma = body.rfind(',');

    match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => {
            if dot > comma {
                Separators { decimal: Some('.'), thousands: Some(',') }
            } else {
                Separators { decimal: Some(','), thousands: Some('.') }
            }
        }
        (Some(_), None) => single_separator('.', ',', body),
        (None, Some(_)) => single_separator(',', '.', body),
        (None, None) => Separators { decimal: None, thousands: None },
    }
}

fn single_separator(sep: char, other: char, body: &str) -> Separators {
    let occurrences = body.matches(sep).count();
    if occurrences > 1 {
        return Separators { decimal: Some(other), thousands: Some(sep) };
    }

    let (int_part, frac_part) = body.split_once(sep).unwrap_or((body, ""));
    let leading_zero = int_part.is_empty() || int_part.chars().all(|c| c == '0');
    if frac_part.len() == 3 && !leading_zero {
        Separators { decimal: Some(other), thousands: Some(sep) }
    } else {
        Separators { decimal: Some(sep), thousands: Some(other) }
    }
}

fn validate_grouping(input: &str, int_part: &str, thousands: Option<char>) -> Result<String> {
    let Some(thousands) = thousands.filter(|t| int_part.contains(*t)) else {
        if int_part.chars().all(|c| c.is_ascii_digit()) {
            return Ok(int_part.to_string());
        }
        return Err(invalid(input, "misplaced separator"));
    };

    let mut digits = String::with_capacity(int_part.len());
    for (i, group) in int_part.split(thousands).enumerate() {
        let well_formed = group.chars().all(|c| c.is_ascii_digit())
            && if i == 0 {
                (1..=3).contains(&group.len())
            } else {
                group.len() == 3
            };
        if !well_formed {
            return Err(invalid(input, "malformed digit grouping"));
        }
        digits.push_str(group);
    }
    Ok(digits)
}

/// parse a currency amount entered by a user
pub fn parse_money(input: &str, format: NumberFormat) -> Result<Money> {
    let compact: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'')
        .collect();
    if compact.is_empty() {
        return Err(invalid(input, "empty input"));
    }

    let first_digit = compact
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit())
        .map(|(i, _)| i)
        .ok_or_else(|| invalid(input, "no digits"))?;

    // a separator directly before the first digit belongs to the number (".5")
    let mut start = first_digit;
    if compact[..first_digit].ends_with(is_separator) {
        start = first_digit - 1;
    }

    let last_digit = compact
        .char_indices()
        .filter(|(_, c)| c.is_ascii_digit())
        .map(|(i, _)| i)
        .last()
        .unwrap_or(first_digit);
    let end = last_digit + 1;

    let prefix = &compact[..start];
    let body = &compact[start..end];
    let suffix = &compact[end..];

    if suffix.starts_with(is_separator) {
        return Err(invalid(input, "trailing separator"));
    }
    if prefix.matches(['-', '+']).count() > 1 {
        return Err(invalid(input, "repeated sign"));
    }
    let negative = prefix.contains('-');
    let marker: String = prefix.chars().filter(|c| *c != '-' && *c != '+').collect();
    if !marker.is_empty() {
        if !is_currency_marker(&marker) {
            return Err(invalid(input, "unrecognised prefix"));
        }
        // "$.50" could mean fifty or half a dollar
        if body.starts_with(is_separator) {
            return Err(invalid(input, "separator after currency marker"));
        }
    }
    if !suffix.is_empty() && suffix != "%" && !is_currency_marker(suffix) {
        return Err(invalid(input, "unrecognised suffix"));
    }
    if let Some(c) = body.chars().find(|c| !c.is_ascii_digit() && !is_separator(*c)) {
        return Err(invalid(input, &format!("unexpected character {c:?}")));
    }

    let separators = format.separators(body);
    let (int_part, frac_part) = match separators.decimal {
        Some(decimal) => match body.split_once(decimal) {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (body, None),
        },
        None => (body, None),
    };

    let int_digits = validate_grouping(input, int_part, separators.thousands)?;
    let mut normalized = String::with_capacity(body.len() + 2);
    if negative {
        normalized.push('-');
    }
    normalized.push_str(if int_digits.is_empty() { "0" } else { &int_digits });

    if let Some(frac) = frac_part {
        if frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid(input, "malformed fractional part"));
        }
        normalized.push('.');
        normalized.push_str(frac);
    }

    let value = Decimal::from_str(&normalized).map_err(|e| invalid(input, &e.to_string()))?;
    let amount = Money::from_decimal(value);
    if !amount.is_within_limit() {
        return Err(invalid(input, "exceeds maximum amount"));
    }
    Ok(amount)
}

/// parse an amount that must not be negative (balances, minimum payments)
pub fn parse_non_negative_money(input: &str, format: NumberFormat) -> Result<Money> {
    let amount = parse_money(input, format)?;
    if amount.is_negative() {
        return Err(invalid(input, "must not be negative"));
    }
    Ok(amount)
}

/// parse an annual percentage such as `"19.99"` or `"7,5%"`
pub fn parse_rate(input: &str, format: NumberFormat) -> Result<Rate> {
    let value = parse_non_negative_money(input, format)?;
    Ok(Rate::from_percent_decimal(value.as_decimal()))
}
