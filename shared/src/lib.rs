//! Shared types and billing rules for the Furniture Shop Management Platform
//!
//! This crate contains the pure domain logic shared between the backend and
//! its test suites: entity statuses, partial-payment bookkeeping, report
//! period arithmetic, and input validation. It performs no I/O.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
