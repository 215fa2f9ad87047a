//! Currency formatting with Indian digit grouping

use bigdecimal::rounding::RoundingMode;
use bigdecimal::BigDecimal;

/// Placeholder rendered when an amount is missing; formatting never fails
pub const MISSING_AMOUNT: &str = "--";

/// Round an amount to two decimal places for presentation
///
/// Internal computation keeps full precision; this is the only place a value
/// is shortened, using half-up rounding.
pub fn round_display(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

/// Unicode currency symbol for an ISO-ish currency code
pub fn currency_symbol(code: &str) -> &str {
    match code.to_ascii_uppercase().as_str() {
        "INR" => "\u{20b9}",
        "USD" => "$",
        "EUR" => "\u{20ac}",
        "GBP" => "\u{a3}",
        _ => code,
    }
}

/// ASCII currency label for contexts that cannot encode the symbol
/// (the PDF renderer's built-in fonts)
pub fn currency_ascii(code: &str) -> &str {
    match code.to_ascii_uppercase().as_str() {
        "INR" => "Rs.",
        "USD" => "$",
        "EUR" => "EUR",
        "GBP" => "GBP",
        _ => code,
    }
}

/// Format an amount with the digit grouping of the given currency, without
/// a symbol
///
/// INR uses Indian grouping (groups of 2 after the first 3 digits); other
/// currencies group by 3.
pub fn format_amount(amount: &BigDecimal, currency_code: &str) -> String {
    let rounded = round_display(amount);
    let text = rounded.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let grouped = if currency_code.eq_ignore_ascii_case("INR") {
        group_indian(int_part)
    } else {
        group_western(int_part)
    };

    format!("{sign}{grouped}.{frac_part}")
}

/// Render an amount with its currency symbol
///
/// Missing input renders a placeholder rather than failing; document
/// rendering must never abort over a formatting gap.
pub fn format_currency(amount: Option<&BigDecimal>, currency_code: &str) -> String {
    match amount {
        Some(amount) => format!(
            "{}{}",
            currency_symbol(currency_code),
            format_amount(amount, currency_code)
        ),
        None => MISSING_AMOUNT.to_string(),
    }
}

/// Indian digit grouping: groups of 2 after the rightmost group of 3
/// (12,34,567)
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let bytes = head.as_bytes();
    let mut end = bytes.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Western digit grouping: groups of 3 (1,234,567)
fn group_western(digits: &str) -> String {
    let mut groups: Vec<&str> = Vec::new();
    let mut end = digits.len();
    while end > 0 {
        let start = end.saturating_sub(3);
        groups.push(&digits[start..end]);
        end = start;
    }
    groups.reverse();
    groups.join(",")
}
