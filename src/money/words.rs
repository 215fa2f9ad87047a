//! Amount-in-words conversion using the Indian numbering scale

use bigdecimal::rounding::RoundingMode;
use bigdecimal::{BigDecimal, ToPrimitive};

use crate::types::{DocumentError, DocumentResult};

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Convert a monetary amount into words on the Indian scale
/// (crore = 10^7, lakh = 10^5, thousand, hundred)
///
/// The amount is converted to integer paise before decomposition, so there
/// is no floating point involved and a fractional part that rounds up to
/// 100 paise carries into the rupee part instead of reading "100 Paise".
/// The paise clause is appended only when the fractional part is nonzero.
pub fn amount_in_words(amount: &BigDecimal) -> DocumentResult<String> {
    if amount < &BigDecimal::from(0) {
        return Err(DocumentError::Validation(
            "Amount in words requires a non-negative amount".to_string(),
        ));
    }

    let total_paise = (amount * BigDecimal::from(100))
        .with_scale_round(0, RoundingMode::HalfUp)
        .to_i128()
        .ok_or_else(|| {
            DocumentError::Validation(format!("Amount {amount} is too large to spell out"))
        })?;

    let rupees = total_paise / 100;
    let paise = total_paise % 100;

    let rupee_words = if rupees == 0 {
        "Zero".to_string()
    } else {
        integer_words(rupees)
    };

    let mut out = format!("{rupee_words} Rupees");
    if paise > 0 {
        out.push_str(" and ");
        out.push_str(&two_digit_words(paise as u8));
        out.push_str(" Paise");
    }
    out.push_str(" Only");
    Ok(out)
}

/// Spell out a positive integer on the Indian scale
///
/// The crore part recurses, so magnitudes beyond 10^9 decompose as
/// "<words> Crore <rest>" without precision loss.
fn integer_words(n: i128) -> String {
    if n < 100 {
        return two_digit_words(n as u8);
    }
    if n < 1_000 {
        return three_digit_words(n as u16);
    }
    if n < 100_000 {
        return join_parts(
            &format!("{} Thousand", two_digit_words((n / 1_000) as u8)),
            n % 1_000,
        );
    }
    if n < 10_000_000 {
        return join_parts(
            &format!("{} Lakh", two_digit_words((n / 100_000) as u8)),
            n % 100_000,
        );
    }
    join_parts(
        &format!("{} Crore", integer_words(n / 10_000_000)),
        n % 10_000_000,
    )
}

fn join_parts(head: &str, rest: i128) -> String {
    if rest == 0 {
        head.to_string()
    } else {
        format!("{head} {}", integer_words(rest))
    }
}

fn two_digit_words(n: u8) -> String {
    let n = n as usize;
    if n < 20 {
        ONES[n].to_string()
    } else if n % 10 == 0 {
        TENS[n / 10].to_string()
    } else {
        format!("{} {}", TENS[n / 10], ONES[n % 10])
    }
}

fn three_digit_words(n: u16) -> String {
    let hundreds = (n / 100) as u8;
    let rest = (n % 100) as u8;
    if rest == 0 {
        format!("{} Hundred", ONES[hundreds as usize])
    } else {
        format!(
            "{} Hundred {}",
            ONES[hundreds as usize],
            two_digit_words(rest)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn words(value: &str) -> String {
        amount_in_words(&BigDecimal::from_str(value).unwrap()).unwrap()
    }

    #[test]
    fn test_zero_rupees() {
        assert_eq!(words("0"), "Zero Rupees Only");
    }

    #[test]
    fn test_whole_rupees_have_no_paise_clause() {
        assert_eq!(words("1"), "One Rupees Only");
        assert_eq!(words("40"), "Forty Rupees Only");
        assert_eq!(words("100"), "One Hundred Rupees Only");
    }

    #[test]
    fn test_indian_scale_decomposition() {
        assert_eq!(
            words("1234567.89"),
            "Twelve Lakh Thirty Four Thousand Five Hundred Sixty Seven Rupees and Eighty Nine Paise Only"
        );
    }

    #[test]
    fn test_crore_and_beyond() {
        assert_eq!(words("10000000"), "One Crore Rupees Only");
        assert_eq!(
            words("1234567890"),
            "One Hundred Twenty Three Crore Forty Five Lakh Sixty Seven Thousand Eight Hundred Ninety Rupees Only"
        );
    }

    #[test]
    fn test_paise_only_amount() {
        assert_eq!(words("0.05"), "Zero Rupees and Five Paise Only");
    }

    #[test]
    fn test_paise_carry_bumps_rupees() {
        // 99.999 rounds to 100.00, never "Ninety Nine Rupees and One Hundred Paise"
        assert_eq!(words("99.999"), "One Hundred Rupees Only");
    }

    #[test]
    fn test_teens_and_tens() {
        assert_eq!(words("19.19"), "Nineteen Rupees and Nineteen Paise Only");
        assert_eq!(words("90.09"), "Ninety Rupees and Nine Paise Only");
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = amount_in_words(&BigDecimal::from(-1));
        assert!(matches!(result, Err(DocumentError::Validation(_))));
    }
}
