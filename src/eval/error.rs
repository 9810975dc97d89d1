//! Structured evaluation errors.

use std::sync::Arc;

use thiserror::Error;

use crate::base::ElementId;

/// Error value produced at the evaluator's public boundary.
///
/// Any failure inside the tree walk is caught and converted into one of
/// these; the walk's exception never escapes the evaluator. `stack` is the
/// live evaluation stack at the failure point (innermost last), which is how
/// callers find the nearest expression with a syntax origin for error
/// placement.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ExpressionError {
    /// The top-level expression the failed evaluation started from.
    pub expression: ElementId,
    pub message: Arc<str>,
    pub stack: Vec<ElementId>,
}

impl ExpressionError {
    /// The innermost expression being evaluated when the failure occurred.
    pub fn offending(&self) -> ElementId {
        self.stack.last().copied().unwrap_or(self.expression)
    }
}

/// Internal failure signal thrown during the walk.
#[derive(Debug, Clone)]
pub(crate) struct EvalSignal {
    pub message: String,
}

impl EvalSignal {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for EvalSignal {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for EvalSignal {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
