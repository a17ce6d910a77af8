//! Domain models and billing rules for the Furniture Shop Management Platform

use rust_decimal::Decimal;
use thiserror::Error;

pub mod expenditure;
pub mod product;
pub mod purchase;
pub mod report;
pub mod sale;

pub use expenditure::*;
pub use product::*;
pub use purchase::*;
pub use report::*;
pub use sale::*;

/// Errors raised by the billing and stock rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("Payment of {amount} exceeds the outstanding balance of {outstanding}")]
    PaymentExceedsOutstanding {
        amount: Decimal,
        outstanding: Decimal,
    },

    #[error("Bill is already settled")]
    AlreadySettled,

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("A sale must contain at least one item")]
    EmptySale,
}
