//! Error types for fixed-point arithmetic and token precision handling
//!
//! Every arithmetic failure in the curve math surfaces as one of these
//! variants instead of a panic, so callers can decide how to degrade.

use thiserror::Error;

/// Errors that can occur during fixed-point arithmetic operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FixedPointError {
    /// Intermediate result does not fit the 256-bit signed representation
    #[error("Overflow in fixed-point operation: {operation}")]
    Overflow { operation: &'static str },

    /// Division by zero in fixed-point arithmetic
    #[error("Division by zero in fixed-point arithmetic")]
    DivisionByZero,

    /// Invalid decimal string format
    #[error("Invalid decimal string: '{input}' - expected numeric format")]
    InvalidDecimal { input: String },

    /// A signed value was used where a token amount (non-negative) is required
    #[error("Negative value {value} cannot be used as a token amount")]
    NegativeAmount { value: String },

    /// Value cannot be represented in the target type without losing digits
    #[error("Precision loss: {value} cannot be represented exactly")]
    PrecisionLoss { value: String },
}
