//! Point-of-sale billing tests
//!
//! Tests for customer-side billing including:
//! - Totals from line items
//! - Stock checks reject short inventory without touching it
//! - Installments never overpay, never drive the balance negative,
//!   and flip the status exactly at zero balance

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::product::{issue_stock, receive_stock};
use shared::models::sale::{
    apply_installment, initial_sale_state, sale_total, SaleLine, SaleStatus,
};
use shared::models::BillingError;
use shared::validation::customer_or_walk_in;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Sale total sums the line totals
    #[test]
    fn test_sale_total() {
        let lines = vec![
            SaleLine {
                quantity: 2,
                unit_price: dec("15000"),
            },
            SaleLine {
                quantity: 4,
                unit_price: dec("2250.50"),
            },
        ];
        assert_eq!(sale_total(&lines), dec("39002.00"));
    }

    /// Selling two units against one in stock is rejected and the stock
    /// figure is untouched
    #[test]
    fn test_insufficient_stock_rejected() {
        let stock = 1;
        let result = issue_stock(stock, 2);
        assert_eq!(
            result,
            Err(BillingError::InsufficientStock {
                requested: 2,
                available: 1
            })
        );
        assert_eq!(stock, 1);
    }

    /// Selling the full stock leaves zero, not an error
    #[test]
    fn test_full_stock_sale_allowed() {
        assert_eq!(issue_stock(3, 3).unwrap(), 0);
    }

    /// Stock round-trips through a purchase then a sale
    #[test]
    fn test_stock_round_trip() {
        let stocked = receive_stock(2, 5);
        assert_eq!(stocked, 7);
        assert_eq!(issue_stock(stocked, 7).unwrap(), 0);
    }

    /// A sale with no down payment starts pending at the full balance
    #[test]
    fn test_sale_without_down_payment() {
        let (balance, status) = initial_sale_state(dec("20000"), Decimal::ZERO);
        assert_eq!(balance, dec("20000"));
        assert_eq!(status, SaleStatus::Pending);
    }

    /// A sale paid in full at the counter starts settled
    #[test]
    fn test_sale_paid_at_counter() {
        let (balance, status) = initial_sale_state(dec("20000"), dec("20000"));
        assert_eq!(balance, Decimal::ZERO);
        assert_eq!(status, SaleStatus::Paid);
    }

    /// Installments reduce the balance and settle at zero
    #[test]
    fn test_installment_sequence() {
        let mut paid = dec("5000");
        let mut balance = dec("15000");

        let outcome = apply_installment(paid, balance, dec("7000")).unwrap();
        paid = outcome.paid_to_date;
        balance = outcome.balance_amount;
        assert_eq!(balance, dec("8000"));
        assert_eq!(outcome.status, SaleStatus::Pending);

        let outcome = apply_installment(paid, balance, dec("8000")).unwrap();
        assert_eq!(outcome.balance_amount, Decimal::ZERO);
        assert_eq!(outcome.status, SaleStatus::Paid);
        assert_eq!(outcome.paid_to_date, dec("20000"));
    }

    /// An installment above the balance is rejected
    #[test]
    fn test_installment_overpayment_rejected() {
        let result = apply_installment(dec("5000"), dec("1000"), dec("1000.01"));
        assert!(matches!(
            result,
            Err(BillingError::PaymentExceedsOutstanding { .. })
        ));
    }

    /// Zero and negative installments are rejected
    #[test]
    fn test_installment_non_positive_rejected() {
        assert_eq!(
            apply_installment(dec("0"), dec("1000"), Decimal::ZERO),
            Err(BillingError::NonPositiveAmount)
        );
        assert_eq!(
            apply_installment(dec("0"), dec("1000"), dec("-50")),
            Err(BillingError::NonPositiveAmount)
        );
    }

    /// A blank customer name falls back to the walk-in default
    #[test]
    fn test_walk_in_default() {
        assert_eq!(customer_or_walk_in(None), "Walk-in");
        assert_eq!(customer_or_walk_in(Some("")), "Walk-in");
        assert_eq!(customer_or_walk_in(Some("Meera Pillai")), "Meera Pillai");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating line quantities
    fn quantity_strategy() -> impl Strategy<Value = i32> {
        1i32..=50
    }

    /// Strategy for generating unit prices
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (100i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2)) // 1.00 to 100000.00
    }

    /// Strategy for generating installment amounts
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2)) // 0.01 to 10000.00
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Sale total equals the fold over line totals
        #[test]
        fn prop_sale_total_is_fold(
            lines in prop::collection::vec(
                (quantity_strategy(), price_strategy()),
                1..10
            )
        ) {
            let sale_lines: Vec<SaleLine> = lines
                .iter()
                .map(|(quantity, unit_price)| SaleLine {
                    quantity: *quantity,
                    unit_price: *unit_price,
                })
                .collect();

            let expected: Decimal = lines
                .iter()
                .map(|(q, p)| Decimal::from(*q) * *p)
                .sum();

            prop_assert_eq!(sale_total(&sale_lines), expected);
        }

        /// Issuing stock either fails leaving the level alone, or
        /// succeeds with exactly the difference
        #[test]
        fn prop_issue_stock_exact(
            stock in 0i32..=100,
            requested in 1i32..=100
        ) {
            match issue_stock(stock, requested) {
                Ok(remaining) => {
                    prop_assert!(requested <= stock);
                    prop_assert_eq!(remaining, stock - requested);
                    prop_assert!(remaining >= 0);
                }
                Err(_) => prop_assert!(requested > stock),
            }
        }

        /// An accepted installment sequence never overpays, never goes
        /// negative, and flips to paid exactly at zero balance
        #[test]
        fn prop_installment_sequence_invariants(
            total in price_strategy(),
            amounts in prop::collection::vec(amount_strategy(), 1..20)
        ) {
            let (mut balance, _) = initial_sale_state(total, Decimal::ZERO);
            let mut paid = Decimal::ZERO;

            for amount in amounts {
                match apply_installment(paid, balance, amount) {
                    Ok(outcome) => {
                        paid = outcome.paid_to_date;
                        balance = outcome.balance_amount;

                        prop_assert!(balance >= Decimal::ZERO);
                        prop_assert!(paid <= total);
                        prop_assert_eq!(paid + balance, total);
                        prop_assert_eq!(
                            outcome.status == SaleStatus::Paid,
                            balance == Decimal::ZERO
                        );
                    }
                    Err(_) => continue,
                }
            }
        }

        /// The balance plus the down payment always reconstructs the total
        #[test]
        fn prop_initial_state_reconstructs_total(
            total in price_strategy(),
            down_fraction in 0u32..=100
        ) {
            let down = total * Decimal::from(down_fraction) / Decimal::from(100);
            let (balance, status) = initial_sale_state(total, down);

            prop_assert_eq!(balance + down, total);
            prop_assert_eq!(status == SaleStatus::Paid, balance <= Decimal::ZERO);
        }
    }
}
