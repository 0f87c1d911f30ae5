pub mod organisations;
pub mod reports;
pub mod transactions;
