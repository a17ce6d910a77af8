//! Stock rules for products
//!
//! Stock moves in exactly two directions: purchases receive units into the
//! shop, sales issue units out of it. Issuing more than is on hand is
//! rejected before anything is written.

use super::BillingError;

/// Add purchased units to the current stock level
pub fn receive_stock(stock: i32, quantity: i32) -> i32 {
    stock + quantity
}

/// Remove sold units from the current stock level
///
/// Fails when `quantity` exceeds what is on hand; stock never goes negative.
pub fn issue_stock(stock: i32, quantity: i32) -> Result<i32, BillingError> {
    if quantity > stock {
        return Err(BillingError::InsufficientStock {
            requested: quantity,
            available: stock,
        });
    }
    Ok(stock - quantity)
}

/// Check whether a stock level sits at or below the reorder threshold
pub fn is_low_stock(stock: i32, threshold: i32) -> bool {
    stock <= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receive_stock() {
        assert_eq!(receive_stock(0, 5), 5);
        assert_eq!(receive_stock(10, 3), 13);
    }

    #[test]
    fn test_issue_stock_ok() {
        assert_eq!(issue_stock(10, 4).unwrap(), 6);
        assert_eq!(issue_stock(10, 10).unwrap(), 0);
    }

    #[test]
    fn test_issue_stock_insufficient() {
        let err = issue_stock(1, 2).unwrap_err();
        assert_eq!(
            err,
            BillingError::InsufficientStock {
                requested: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_low_stock_threshold() {
        assert!(is_low_stock(0, 5));
        assert!(is_low_stock(5, 5));
        assert!(!is_low_stock(6, 5));
    }
}
