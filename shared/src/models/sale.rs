//! Customer sale billing rules
//!
//! A sale totals its line items, takes an initial payment at the counter,
//! and carries the rest as a balance paid off in installments. These
//! functions keep `balance_amount`, the paid-to-date figure, and the
//! paid/pending status consistent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::BillingError;

/// Settlement status of a customer sale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Paid,
    Pending,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Paid => "paid",
            SaleStatus::Pending => "pending",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "paid" => Some(SaleStatus::Paid),
            "pending" => Some(SaleStatus::Pending),
            _ => None,
        }
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One priced line of a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl SaleLine {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Total billed across all line items
pub fn sale_total(lines: &[SaleLine]) -> Decimal {
    lines.iter().map(SaleLine::line_total).sum()
}

/// Balance and status at sale creation
///
/// The balance is whatever the initial payment leaves uncovered; the sale is
/// pending while that balance is above zero.
pub fn initial_sale_state(total: Decimal, initial_payment: Decimal) -> (Decimal, SaleStatus) {
    let balance = total - initial_payment;
    let status = if balance > Decimal::ZERO {
        SaleStatus::Pending
    } else {
        SaleStatus::Paid
    };
    (balance, status)
}

/// Result of applying one installment to a sale
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InstallmentOutcome {
    pub paid_to_date: Decimal,
    pub balance_amount: Decimal,
    pub status: SaleStatus,
}

/// Apply an installment payment to a pending sale
///
/// Rejects non-positive amounts and amounts above the current balance. The
/// balance is floored at zero and the sale flips to paid exactly when it
/// reaches zero.
pub fn apply_installment(
    paid_to_date: Decimal,
    balance_amount: Decimal,
    amount: Decimal,
) -> Result<InstallmentOutcome, BillingError> {
    if amount <= Decimal::ZERO {
        return Err(BillingError::NonPositiveAmount);
    }
    if amount > balance_amount {
        return Err(BillingError::PaymentExceedsOutstanding {
            amount,
            outstanding: balance_amount,
        });
    }

    let new_balance = (balance_amount - amount).max(Decimal::ZERO);
    let status = if new_balance == Decimal::ZERO {
        SaleStatus::Paid
    } else {
        SaleStatus::Pending
    };

    Ok(InstallmentOutcome {
        paid_to_date: paid_to_date + amount,
        balance_amount: new_balance,
        status,
    })
}
