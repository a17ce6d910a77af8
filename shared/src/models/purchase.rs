//! Supplier purchase bookkeeping rules
//!
//! A purchase is settled through an optional initial payment plus any number
//! of follow-up supplier payments. These functions keep `paid_amount` and the
//! paid/pending status consistent across creation, payments, payment
//! deletions, and force-settlement.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::BillingError;

/// Settlement status of a supplier purchase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Paid,
    Pending,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Paid => "paid",
            PurchaseStatus::Pending => "pending",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "paid" => Some(PurchaseStatus::Paid),
            "pending" => Some(PurchaseStatus::Pending),
            _ => None,
        }
    }
}

impl std::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Total owed to the supplier for a purchase
pub fn purchase_total(quantity: i32, price_per_unit: Decimal) -> Decimal {
    Decimal::from(quantity) * price_per_unit
}

/// Amount still owed on a purchase
pub fn outstanding(total: Decimal, paid_amount: Decimal) -> Decimal {
    total - paid_amount
}

/// A purchase counts as a pending bill while anything is still owed
pub fn is_pending_bill(total: Decimal, paid_amount: Decimal) -> bool {
    total - paid_amount > Decimal::ZERO
}

/// Paid amount and status at purchase creation
///
/// A purchase recorded as paid is settled in full up front. A pending
/// purchase carries the initial payment as given; the caller caps it at the
/// total, and the status stays pending regardless of the amount.
pub fn initial_purchase_state(
    total: Decimal,
    status: PurchaseStatus,
    initial_payment: Decimal,
) -> (Decimal, PurchaseStatus) {
    match status {
        PurchaseStatus::Paid => (total, PurchaseStatus::Paid),
        PurchaseStatus::Pending => (initial_payment, PurchaseStatus::Pending),
    }
}

/// Apply a follow-up supplier payment to a purchase
///
/// Rejects non-positive amounts and anything that would overshoot the total.
/// The status flips to paid once the full total is covered and is otherwise
/// left unchanged; it never reverts paid -> pending here.
pub fn apply_supplier_payment(
    total: Decimal,
    paid_amount: Decimal,
    status: PurchaseStatus,
    amount: Decimal,
) -> Result<(Decimal, PurchaseStatus), BillingError> {
    if amount <= Decimal::ZERO {
        return Err(BillingError::NonPositiveAmount);
    }
    if paid_amount + amount > total {
        return Err(BillingError::PaymentExceedsOutstanding {
            amount,
            outstanding: outstanding(total, paid_amount),
        });
    }

    let new_paid = paid_amount + amount;
    let new_status = if new_paid >= total {
        PurchaseStatus::Paid
    } else {
        status
    };
    Ok((new_paid, new_status))
}

/// Back out a deleted supplier payment
///
/// The paid amount is floored at zero so a deletion can never leave it
/// negative. The status reverts paid -> pending only when the purchase was
/// paid and the remaining amount no longer covers the total.
pub fn remove_supplier_payment(
    total: Decimal,
    paid_amount: Decimal,
    status: PurchaseStatus,
    amount: Decimal,
) -> (Decimal, PurchaseStatus) {
    let new_paid = (paid_amount - amount).max(Decimal::ZERO);
    let new_status = if status == PurchaseStatus::Paid && new_paid < total {
        PurchaseStatus::Pending
    } else {
        status
    };
    (new_paid, new_status)
}

/// Force-settle a purchase: paid amount jumps to the total, status to paid
///
/// No payment row is written for the jump, so the payment history stays
/// short of the paid amount after this call. Fails when already settled.
pub fn settle_purchase(
    total: Decimal,
    status: PurchaseStatus,
) -> Result<(Decimal, PurchaseStatus), BillingError> {
    if status == PurchaseStatus::Paid {
        return Err(BillingError::AlreadySettled);
    }
    Ok((total, PurchaseStatus::Paid))
}

/// One pending bill, reduced to what the stats need
#[derive(Debug, Clone, Serialize)]
pub struct PendingBillFigure {
    pub supplier_name: String,
    pub outstanding: Decimal,
}

/// Outstanding amounts grouped under one supplier
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SupplierOutstanding {
    pub supplier_name: String,
    pub outstanding: Decimal,
    pub bill_count: i64,
}

/// Aggregate stats over a set of pending bills
#[derive(Debug, Clone, Serialize)]
pub struct PendingBillStats {
    pub total_outstanding: Decimal,
    pub bill_count: i64,
    pub average_outstanding: Decimal,
    pub by_supplier: Vec<SupplierOutstanding>,
}

/// Fold pending bills into sum, count, average, and per-supplier totals
pub fn pending_bill_stats(bills: &[PendingBillFigure]) -> PendingBillStats {
    let total_outstanding: Decimal = bills.iter().map(|b| b.outstanding).sum();
    let bill_count = bills.len() as i64;
    let average_outstanding = if bill_count > 0 {
        total_outstanding / Decimal::from(bill_count)
    } else {
        Decimal::ZERO
    };

    let mut grouped: BTreeMap<String, (Decimal, i64)> = BTreeMap::new();
    for bill in bills {
        let entry = grouped
            .entry(bill.supplier_name.clone())
            .or_insert((Decimal::ZERO, 0));
        entry.0 += bill.outstanding;
        entry.1 += 1;
    }

    let by_supplier = grouped
        .into_iter()
        .map(|(supplier_name, (outstanding, bill_count))| SupplierOutstanding {
            supplier_name,
            outstanding,
            bill_count,
        })
        .collect();

    PendingBillStats {
        total_outstanding,
        bill_count,
        average_outstanding,
        by_supplier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_purchase_total() {
        assert_eq!(purchase_total(4, dec("250.50")), dec("1002.00"));
    }

    #[test]
    fn test_initial_state_paid() {
        let (paid, status) = initial_purchase_state(dec("1000"), PurchaseStatus::Paid, dec("0"));
        assert_eq!(paid, dec("1000"));
        assert_eq!(status, PurchaseStatus::Paid);
    }

    #[test]
    fn test_initial_state_pending_keeps_given_payment() {
        let (paid, status) =
            initial_purchase_state(dec("1000"), PurchaseStatus::Pending, dec("400"));
        assert_eq!(paid, dec("400"));
        assert_eq!(status, PurchaseStatus::Pending);
    }

    /// The initial payment is taken as given, even at the full total; the
    /// caller decides the status at creation time.
    #[test]
    fn test_initial_state_pending_not_clamped() {
        let (paid, status) =
            initial_purchase_state(dec("1000"), PurchaseStatus::Pending, dec("1000"));
        assert_eq!(paid, dec("1000"));
        assert_eq!(status, PurchaseStatus::Pending);
    }

    #[test]
    fn test_apply_payment_partial() {
        let (paid, status) =
            apply_supplier_payment(dec("1000"), dec("200"), PurchaseStatus::Pending, dec("300"))
                .unwrap();
        assert_eq!(paid, dec("500"));
        assert_eq!(status, PurchaseStatus::Pending);
    }

    #[test]
    fn test_apply_payment_settles() {
        let (paid, status) =
            apply_supplier_payment(dec("1000"), dec("600"), PurchaseStatus::Pending, dec("400"))
                .unwrap();
        assert_eq!(paid, dec("1000"));
        assert_eq!(status, PurchaseStatus::Paid);
    }

    #[test]
    fn test_apply_payment_rejects_overshoot() {
        let err =
            apply_supplier_payment(dec("1000"), dec("800"), PurchaseStatus::Pending, dec("300"))
                .unwrap_err();
        assert_eq!(
            err,
            BillingError::PaymentExceedsOutstanding {
                amount: dec("300"),
                outstanding: dec("200"),
            }
        );
    }

    #[test]
    fn test_apply_payment_rejects_non_positive() {
        assert_eq!(
            apply_supplier_payment(dec("1000"), dec("0"), PurchaseStatus::Pending, dec("0")),
            Err(BillingError::NonPositiveAmount)
        );
        assert_eq!(
            apply_supplier_payment(dec("1000"), dec("0"), PurchaseStatus::Pending, dec("-5")),
            Err(BillingError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_remove_payment_reverts_status() {
        let (paid, status) =
            remove_supplier_payment(dec("1000"), dec("1000"), PurchaseStatus::Paid, dec("400"));
        assert_eq!(paid, dec("600"));
        assert_eq!(status, PurchaseStatus::Pending);
    }

    #[test]
    fn test_remove_payment_keeps_pending() {
        let (paid, status) =
            remove_supplier_payment(dec("1000"), dec("500"), PurchaseStatus::Pending, dec("200"));
        assert_eq!(paid, dec("300"));
        assert_eq!(status, PurchaseStatus::Pending);
    }

    #[test]
    fn test_remove_payment_floors_at_zero() {
        let (paid, _) =
            remove_supplier_payment(dec("1000"), dec("100"), PurchaseStatus::Pending, dec("250"));
        assert_eq!(paid, Decimal::ZERO);
    }

    #[test]
    fn test_settle_purchase() {
        let (paid, status) = settle_purchase(dec("1000"), PurchaseStatus::Pending).unwrap();
        assert_eq!(paid, dec("1000"));
        assert_eq!(status, PurchaseStatus::Paid);
    }

    #[test]
    fn test_settle_purchase_already_paid() {
        assert_eq!(
            settle_purchase(dec("1000"), PurchaseStatus::Paid),
            Err(BillingError::AlreadySettled)
        );
    }

    #[test]
    fn test_pending_bill_detection() {
        assert!(is_pending_bill(dec("1000"), dec("999.99")));
        assert!(!is_pending_bill(dec("1000"), dec("1000")));
    }

    #[test]
    fn test_pending_bill_stats() {
        let bills = vec![
            PendingBillFigure {
                supplier_name: "Sharma Timber".to_string(),
                outstanding: dec("500"),
            },
            PendingBillFigure {
                supplier_name: "Luxe Fabrics".to_string(),
                outstanding: dec("300"),
            },
            PendingBillFigure {
                supplier_name: "Sharma Timber".to_string(),
                outstanding: dec("200"),
            },
        ];

        let stats = pending_bill_stats(&bills);
        assert_eq!(stats.total_outstanding, dec("1000"));
        assert_eq!(stats.bill_count, 3);
        assert!(stats.average_outstanding > dec("333.33"));
        assert!(stats.average_outstanding < dec("333.34"));

        assert_eq!(stats.by_supplier.len(), 2);
        let sharma = stats
            .by_supplier
            .iter()
            .find(|s| s.supplier_name == "Sharma Timber")
            .unwrap();
        assert_eq!(sharma.outstanding, dec("700"));
        assert_eq!(sharma.bill_count, 2);
    }

    #[test]
    fn test_pending_bill_stats_empty() {
        let stats = pending_bill_stats(&[]);
        assert_eq!(stats.total_outstanding, Decimal::ZERO);
        assert_eq!(stats.bill_count, 0);
        assert_eq!(stats.average_outstanding, Decimal::ZERO);
        assert!(stats.by_supplier.is_empty());
    }
}
