//! Validation utilities for the Furniture Shop Management Platform
//!
//! Form-shaped inputs are validated before any store mutation; failures
//! short-circuit with a human-readable message.

use rust_decimal::Decimal;

use crate::types::WALK_IN_CUSTOMER;

// ============================================================================
// Product Validations
// ============================================================================

/// Validate a product name (non-empty, at most 255 characters)
pub fn validate_product_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Product name cannot be empty");
    }
    if trimmed.len() > 255 {
        return Err("Product name must be at most 255 characters");
    }
    Ok(())
}

/// Validate a price (zero allowed, negative rejected)
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate a stock level (zero allowed, negative rejected)
pub fn validate_stock(stock: i32) -> Result<(), &'static str> {
    if stock < 0 {
        return Err("Stock cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Billing Validations
// ============================================================================

/// Validate a purchased/sold quantity (must be positive)
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be greater than 0");
    }
    Ok(())
}

/// Validate a payment amount (must be positive)
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be greater than 0");
    }
    Ok(())
}

/// Validate an initial payment (zero allowed, negative rejected)
pub fn validate_initial_payment(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Initial payment cannot be negative");
    }
    Ok(())
}

/// Validate an expenditure category (non-empty)
pub fn validate_category(category: &str) -> Result<(), &'static str> {
    if category.trim().is_empty() {
        return Err("Category cannot be empty");
    }
    Ok(())
}

/// Resolve the customer name for a sale, falling back to the walk-in default
pub fn customer_or_walk_in(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => WALK_IN_CUSTOMER.to_string(),
    }
}

// ============================================================================
// Period Validations
// ============================================================================

/// Validate a calendar month number
pub fn validate_month(month: u32) -> Result<(), &'static str> {
    if !(1..=12).contains(&month) {
        return Err("Month must be between 1 and 12");
    }
    Ok(())
}

/// Validate a report year is in a sane window
pub fn validate_year(year: i32) -> Result<(), &'static str> {
    if !(2000..=2100).contains(&year) {
        return Err("Year must be between 2000 and 2100");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Teak Dining Table").is_ok());
        assert!(validate_product_name("  ").is_err());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(dec("0")).is_ok());
        assert!(validate_price(dec("1299.99")).is_ok());
        assert!(validate_price(dec("-0.01")).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(25).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(dec("0.01")).is_ok());
        assert!(validate_amount(Decimal::ZERO).is_err());
        assert!(validate_amount(dec("-10")).is_err());
    }

    #[test]
    fn test_validate_initial_payment() {
        assert!(validate_initial_payment(Decimal::ZERO).is_ok());
        assert!(validate_initial_payment(dec("500")).is_ok());
        assert!(validate_initial_payment(dec("-500")).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("Transport").is_ok());
        assert!(validate_category("   ").is_err());
    }

    #[test]
    fn test_customer_or_walk_in() {
        assert_eq!(customer_or_walk_in(Some("Asha Verma")), "Asha Verma");
        assert_eq!(customer_or_walk_in(Some("  ")), "Walk-in");
        assert_eq!(customer_or_walk_in(None), "Walk-in");
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_validate_year() {
        assert!(validate_year(2024).is_ok());
        assert!(validate_year(1999).is_err());
        assert!(validate_year(2101).is_err());
    }
}
