//! The module contains the errors the engine can return.
//!
//! Report processing never fails: unreadable amounts are coerced to zero (see
//! [`coerce`](crate::coerce)). The only failure left is a list page that
//! breaks the pagination bounds.
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid page: {0}")]
    InvalidPage(String),
}
