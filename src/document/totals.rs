//! Document totals derivation from line items, discount, and tax

use bigdecimal::BigDecimal;

use crate::types::*;
use crate::utils::validation;

/// Compute document totals from line items plus discount and tax
/// configuration
///
/// Pure and deterministic: the same inputs always produce the same totals,
/// and the inputs are never mutated. The derived discount amount is clamped
/// to [0, subtotal]; quantity and price are validated, not clamped. All
/// arithmetic stays at full precision; rounding belongs to presentation.
pub fn compute_totals(
    line_items: &[LineItem],
    discount: &DiscountSpec,
    tax: &TaxSpec,
) -> DocumentResult<DocumentTotals> {
    for item in line_items {
        validation::validate_line_item(item)?;
    }
    validation::validate_discount(discount)?;
    tax.validate()?;

    let subtotal: BigDecimal = line_items.iter().map(|item| item.line_total()).sum();

    let raw_discount = match discount.discount_type {
        DiscountType::Percentage => &subtotal * &discount.value / BigDecimal::from(100),
        DiscountType::Fixed => discount.value.clone(),
    };
    let discount_amount = raw_discount.min(subtotal.clone()).max(BigDecimal::from(0));

    let taxable_amount = &subtotal - &discount_amount;
    let tax_amount = &taxable_amount * &tax.rate / BigDecimal::from(100);
    let total_amount = &taxable_amount + &tax_amount;

    Ok(DocumentTotals {
        subtotal,
        discount_amount,
        taxable_amount,
        tax_amount,
        total_amount,
    })
}
