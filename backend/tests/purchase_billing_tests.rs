//! Supplier purchase bookkeeping tests
//!
//! Tests for the partial-payment ledger including:
//! - Paid amount never leaves the [0, total] window
//! - Status flips to paid exactly when the total is covered
//! - Payment deletion never leaves the paid amount negative
//! - Pending-bill stats agree with a direct fold over the same rows

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::purchase::{
    apply_supplier_payment, initial_purchase_state, is_pending_bill, outstanding,
    pending_bill_stats, purchase_total, remove_supplier_payment, settle_purchase,
    PendingBillFigure, PurchaseStatus,
};
use shared::models::BillingError;

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

    /// Total is quantity times unit price
    #[test]
    fn test_purchase_total() {
        assert_eq!(purchase_total(12, dec("850.00")), dec("10200.00"));
        assert_eq!(purchase_total(1, dec("0")), Decimal::ZERO);
    }

    /// A purchase recorded as paid is settled in full up front
    #[test]
    fn test_paid_purchase_settles_up_front() {
        let total = purchase_total(4, dec("2500"));
        let (paid, status) = initial_purchase_state(total, PurchaseStatus::Paid, Decimal::ZERO);
        assert_eq!(paid, dec("10000"));
        assert_eq!(status, PurchaseStatus::Paid);
        assert!(!is_pending_bill(total, paid));
    }

    /// A pending purchase carries the initial payment as given
    #[test]
    fn test_pending_purchase_keeps_initial_payment() {
        let total = dec("10000");
        let (paid, status) = initial_purchase_state(total, PurchaseStatus::Pending, dec("2500"));
        assert_eq!(paid, dec("2500"));
        assert_eq!(status, PurchaseStatus::Pending);
        assert_eq!(outstanding(total, paid), dec("7500"));
    }

    /// Follow-up payments accumulate and settle the bill at the total
    #[test]
    fn test_payment_sequence_settles() {
        let total = dec("9000");
        let mut paid = dec("3000");
        let mut status = PurchaseStatus::Pending;

        for amount in ["2000", "2000", "2000"] {
            let (new_paid, new_status) =
                apply_supplier_payment(total, paid, status, dec(amount)).unwrap();
            paid = new_paid;
            status = new_status;
        }

        assert_eq!(paid, total);
        assert_eq!(status, PurchaseStatus::Paid);
    }

    /// A payment above the outstanding amount is rejected untouched
    #[test]
    fn test_overpayment_rejected() {
        let result =
            apply_supplier_payment(dec("5000"), dec("4500"), PurchaseStatus::Pending, dec("501"));
        assert!(matches!(
            result,
            Err(BillingError::PaymentExceedsOutstanding { .. })
        ));
    }

    /// An exact remaining amount is accepted
    #[test]
    fn test_exact_remaining_accepted() {
        let (paid, status) =
            apply_supplier_payment(dec("5000"), dec("4500"), PurchaseStatus::Pending, dec("500"))
                .unwrap();
        assert_eq!(paid, dec("5000"));
        assert_eq!(status, PurchaseStatus::Paid);
    }

    /// Deleting a payment reopens a settled bill
    #[test]
    fn test_delete_payment_reopens_bill() {
        let (paid, status) =
            remove_supplier_payment(dec("5000"), dec("5000"), PurchaseStatus::Paid, dec("500"));
        assert_eq!(paid, dec("4500"));
        assert_eq!(status, PurchaseStatus::Pending);
    }

    /// Deleting more than was paid floors the paid amount at zero
    #[test]
    fn test_delete_payment_floors_at_zero() {
        let (paid, _) =
            remove_supplier_payment(dec("5000"), dec("300"), PurchaseStatus::Pending, dec("800"));
        assert_eq!(paid, Decimal::ZERO);
    }

    /// Force-settling jumps the paid amount to the total
    #[test]
    fn test_mark_paid_jumps_to_total() {
        let (paid, status) = settle_purchase(dec("7200"), PurchaseStatus::Pending).unwrap();
        assert_eq!(paid, dec("7200"));
        assert_eq!(status, PurchaseStatus::Paid);
    }

    /// Force-settling an already-paid purchase fails
    #[test]
    fn test_mark_paid_twice_fails() {
        assert_eq!(
            settle_purchase(dec("7200"), PurchaseStatus::Paid),
            Err(BillingError::AlreadySettled)
        );
    }

    /// Stats agree with a direct fold over the same bills
    #[test]
    fn test_pending_stats_against_direct_fold() {
        let bills = vec![
            PendingBillFigure {
                supplier_name: "Oak & Co".to_string(),
                outstanding: dec("1200"),
            },
            PendingBillFigure {
                supplier_name: "Veneer Works".to_string(),
                outstanding: dec("800"),
            },
        ];

        let stats = pending_bill_stats(&bills);
        let direct_sum: Decimal = bills.iter().map(|b| b.outstanding).sum();

        assert_eq!(stats.total_outstanding, direct_sum);
        assert_eq!(stats.bill_count, 2);
        assert_eq!(stats.average_outstanding, direct_sum / Decimal::from(2));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating bill totals
    fn total_strategy() -> impl Strategy<Value = Decimal> {
        (1000i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2)) // 10.00 to 100000.00
    }

    /// Strategy for generating payment amounts
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2)) // 0.01 to 10000.00
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Paid amount stays in [0, total] across any accepted payment sequence,
        /// and the status matches the invariant at every step
        #[test]
        fn prop_payment_sequence_invariants(
            total in total_strategy(),
            amounts in prop::collection::vec(amount_strategy(), 1..20)
        ) {
            let mut paid = Decimal::ZERO;
            let mut status = PurchaseStatus::Pending;

            for amount in amounts {
                match apply_supplier_payment(total, paid, status, amount) {
                    Ok((new_paid, new_status)) => {
                        paid = new_paid;
                        status = new_status;
                    }
                    Err(_) => continue, // rejected payments change nothing
                }

                prop_assert!(paid >= Decimal::ZERO);
                prop_assert!(paid <= total);
                prop_assert_eq!(status == PurchaseStatus::Paid, paid >= total);
            }
        }

        /// A rejected overpayment is exactly one above the outstanding window
        #[test]
        fn prop_overpayment_always_rejected(
            total in total_strategy(),
            paid_fraction in 0u32..100,
            excess in amount_strategy()
        ) {
            let paid = total * Decimal::from(paid_fraction) / Decimal::from(100);
            let amount = (total - paid) + excess;

            let result = apply_supplier_payment(total, paid, PurchaseStatus::Pending, amount);
            let matched = matches!(
                result,
                Err(BillingError::PaymentExceedsOutstanding { .. })
            );
            prop_assert!(matched);
        }

        /// Deleting any payment never leaves the paid amount negative
        #[test]
        fn prop_delete_never_negative(
            total in total_strategy(),
            paid in amount_strategy(),
            removed in amount_strategy()
        ) {
            let (new_paid, _) =
                remove_supplier_payment(total, paid, PurchaseStatus::Pending, removed);
            prop_assert!(new_paid >= Decimal::ZERO);
        }

        /// Applying then deleting the same payment restores the paid amount
        #[test]
        fn prop_apply_then_delete_round_trips(
            total in total_strategy(),
            amount in amount_strategy()
        ) {
            prop_assume!(amount <= total);

            let (paid_after, status_after) =
                apply_supplier_payment(total, Decimal::ZERO, PurchaseStatus::Pending, amount)
                    .unwrap();
            let (paid_back, _) =
                remove_supplier_payment(total, paid_after, status_after, amount);

            prop_assert_eq!(paid_back, Decimal::ZERO);
        }

        /// Stats totals always equal the direct fold, and per-supplier
        /// outstanding sums to the grand total
        #[test]
        fn prop_stats_consistent(
            outstandings in prop::collection::vec(amount_strategy(), 0..20),
            supplier_pick in prop::collection::vec(0usize..3, 0..20)
        ) {
            let suppliers = ["Oak & Co", "Veneer Works", "Sharma Timber"];
            let bills: Vec<PendingBillFigure> = outstandings
                .iter()
                .zip(supplier_pick.iter().chain(std::iter::repeat(&0)))
                .map(|(outstanding, idx)| PendingBillFigure {
                    supplier_name: suppliers[*idx].to_string(),
                    outstanding: *outstanding,
                })
                .collect();

            let stats = pending_bill_stats(&bills);
            let direct_sum: Decimal = bills.iter().map(|b| b.outstanding).sum();
            let supplier_sum: Decimal = stats.by_supplier.iter().map(|s| s.outstanding).sum();
            let supplier_count: i64 = stats.by_supplier.iter().map(|s| s.bill_count).sum();

            prop_assert_eq!(stats.total_outstanding, direct_sum);
            prop_assert_eq!(supplier_sum, direct_sum);
            prop_assert_eq!(stats.bill_count, bills.len() as i64);
            prop_assert_eq!(supplier_count, bills.len() as i64);
        }
    }
}

// ============================================================================
// Scenario Helpers (ledger walk without a database)
// ============================================================================

#[cfg(test)]
mod scenario_tests {
    use super::*;

    /// Walk a purchase through create -> pay -> delete -> settle
    #[test]
    fn test_full_ledger_walk() {
        let total = purchase_total(6, dec("1500"));
        assert_eq!(total, dec("9000"));

        // Created pending with a down payment
        let (mut paid, mut status) =
            initial_purchase_state(total, PurchaseStatus::Pending, dec("2000"));
        assert!(is_pending_bill(total, paid));

        // Two installments
        let (p, s) = apply_supplier_payment(total, paid, status, dec("3000")).unwrap();
        paid = p;
        status = s;
        let (p, s) = apply_supplier_payment(total, paid, status, dec("4000")).unwrap();
        paid = p;
        status = s;
        assert_eq!(paid, total);
        assert_eq!(status, PurchaseStatus::Paid);

        // The last installment is deleted, reopening the bill
        let (p, s) = remove_supplier_payment(total, paid, status, dec("4000"));
        paid = p;
        status = s;
        assert_eq!(paid, dec("5000"));
        assert_eq!(status, PurchaseStatus::Pending);

        // Finally force-settled
        let (p, s) = settle_purchase(total, status).unwrap();
        assert_eq!(p, total);
        assert_eq!(s, PurchaseStatus::Paid);
    }
}
