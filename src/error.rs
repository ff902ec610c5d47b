//! # Resolution Error Types
//!
//! Structured error types for expression route resolution, built on thiserror.
//!
//! Shape errors and missing dispatch targets are programmer or configuration
//! errors surfaced at first use. Evaluation errors raised while computing an
//! argument value pass through untouched.

use crate::models::MethodIdentity;
use thiserror::Error;

/// Errors returned by route resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The invocation body is not a single direct method call
    #[error("Invalid invocation expression: {reason}")]
    InvalidExpressionShape { reason: String },

    /// The invoked method has no receiver instance
    #[error("Static invocation not supported: {method} has no receiver instance")]
    StaticInvocationNotSupported { method: MethodIdentity },

    /// No registered handler action matches the invoked method
    #[error("Dispatch target not found: {method} is not registered as a handler action")]
    DispatchTargetNotFound { method: MethodIdentity },

    /// An argument expression failed while being evaluated
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl ResolveError {
    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        Self::InvalidExpressionShape {
            reason: reason.into(),
        }
    }
}

/// Errors raised by the argument evaluator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("Handler parameter cannot be evaluated during route resolution")]
    UnboundParameter,

    #[error("Member '{member}' not found on {found}")]
    MemberNotFound { member: String, found: String },

    #[error("Null reference while accessing '{member}'")]
    NullReference { member: String },

    #[error("Index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("Type mismatch in {operation}: expected {expected}, found {found}")]
    TypeMismatch {
        operation: String,
        expected: String,
        found: String,
    },

    #[error("Division by zero in {operation}")]
    DivideByZero { operation: String },

    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: String },

    #[error("Non-finite number produced by {operation}")]
    NonFiniteNumber { operation: String },

    #[error("Unsupported expression node in argument position: {node}")]
    UnsupportedNode { node: String },

    #[error("Expression nesting exceeds depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("Argument serialization error: {message}")]
    Serialization { message: String },

    #[error("{message}")]
    Custom { message: String },
}

impl EvaluationError {
    /// Error for use inside deferred argument computations
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    pub(crate) fn type_mismatch(
        operation: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            operation: operation.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl From<serde_json::Error> for EvaluationError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
