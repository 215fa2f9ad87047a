//! Validation utilities

use bigdecimal::BigDecimal;

use crate::types::*;

/// Validate that a quantity is strictly positive
pub fn validate_quantity(quantity: &BigDecimal) -> DocumentResult<()> {
    if *quantity <= BigDecimal::from(0) {
        Err(DocumentError::Validation(
            "Quantity must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a unit price is not negative
pub fn validate_unit_price(unit_price: &BigDecimal) -> DocumentResult<()> {
    if *unit_price < BigDecimal::from(0) {
        Err(DocumentError::Validation(
            "Unit price cannot be negative".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a line item description is usable
pub fn validate_description(description: &str) -> DocumentResult<()> {
    if description.trim().is_empty() {
        return Err(DocumentError::Validation(
            "Line item description cannot be empty".to_string(),
        ));
    }

    if description.len() > 500 {
        return Err(DocumentError::Validation(
            "Line item description cannot exceed 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate a single line item
///
/// Malformed quantity/price is rejected outright, never silently clamped;
/// only derived discount and tax values are clamped downstream.
pub fn validate_line_item(item: &LineItem) -> DocumentResult<()> {
    validate_description(&item.description)?;
    validate_quantity(&item.quantity)?;
    validate_unit_price(&item.unit_price)?;
    Ok(())
}

/// Validate that a discount spec carries a non-negative value
pub fn validate_discount(discount: &DiscountSpec) -> DocumentResult<()> {
    if discount.value < BigDecimal::from(0) {
        return Err(DocumentError::Validation(
            "Discount value cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// Validate an ISO-ish currency code (three letters)
pub fn validate_currency_code(code: &str) -> DocumentResult<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DocumentError::Validation(format!(
            "'{code}' is not a three-letter currency code"
        )));
    }
    Ok(())
}

/// Validate a UPI virtual payment address (user@handle)
pub fn validate_upi_id(upi_id: &str) -> DocumentResult<()> {
    let mut parts = upi_id.splitn(2, '@');
    let user = parts.next().unwrap_or("");
    let handle = parts.next().unwrap_or("");

    if user.is_empty() || handle.is_empty() {
        return Err(DocumentError::Validation(format!(
            "'{upi_id}' is not a valid UPI id"
        )));
    }

    Ok(())
}
