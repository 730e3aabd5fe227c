//! The module contains the errors the engine can return.
//!
//! The four reconciliation stages never fail. Errors only come from the
//! operations that validate input:
//!
//! - [`InvalidWeight`] returned when a weight cannot be parsed or is out of range.
//! - [`InvalidRange`] returned when a classification range is malformed or overlaps.
//! - [`InvalidTransfer`] returned when a transfer breaks a session rule.
//! - [`KeyNotFound`] returned when a referenced item does not exist.
//!
//!  [`InvalidWeight`]: EngineError::InvalidWeight
//!  [`InvalidRange`]: EngineError::InvalidRange
//!  [`InvalidTransfer`]: EngineError::InvalidTransfer
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
}
