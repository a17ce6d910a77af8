//! Business logic services for the Furniture Shop Management Platform

pub mod dashboard;
pub mod expenditure;
pub mod payment;
pub mod product;
pub mod purchase;
pub mod report;
pub mod sale;

pub use dashboard::DashboardService;
pub use expenditure::ExpenditureService;
pub use payment::PaymentService;
pub use product::ProductService;
pub use purchase::PurchaseService;
pub use report::ReportService;
pub use sale::SaleService;
