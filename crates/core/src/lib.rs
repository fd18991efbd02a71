//! Shared primitives for all Rust crates in the cart rule workspace.

#![forbid(unsafe_code)]

/// Constraint codes and violations raised by domain validation.
pub mod constraint;

use thiserror::Error;

pub use constraint::{ConstraintCode, ConstraintFamily, ConstraintViolation};

/// Result type used across cart rule crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input could not be decoded into the expected shape.
    #[error("validation error: {0}")]
    Validation(String),

    /// Input was decoded but violates a domain constraint.
    #[error("constraint violation: {0}")]
    Constraint(#[from] ConstraintViolation),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a constraint violation on one field.
    #[must_use]
    pub fn constraint(code: ConstraintCode, field: impl Into<String>) -> Self {
        Self::Constraint(ConstraintViolation::new(code, field))
    }

    /// Re-targets a constraint error to a form field path; other errors pass through.
    #[must_use]
    pub fn at_field(self, field: impl Into<String>) -> Self {
        match self {
            Self::Constraint(violation) => Self::Constraint(violation.with_field(field)),
            other => other,
        }
    }

    /// Returns the violated constraint code, if this is a constraint error.
    #[must_use]
    pub fn constraint_code(&self) -> Option<ConstraintCode> {
        match self {
            Self::Constraint(violation) => Some(violation.code()),
            Self::Validation(_) | Self::Internal(_) => None,
        }
    }
}
