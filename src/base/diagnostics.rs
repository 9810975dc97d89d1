//! Structured model diagnostics.
//!
//! The builder and evaluator never throw recoverable errors outward; they
//! append diagnostics to a per-document collection keyed by model node, for
//! later surfacing by presentation-layer collaborators.

use std::sync::Arc;

use super::ElementId;

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic attached to a model element.
///
/// When the offending element is synthetic (no syntax origin), presentation
/// layers walk up the ownership chain to the nearest element that has one.
#[derive(Clone, Debug)]
pub struct ModelDiagnostic {
    /// The model element this diagnostic is scoped to.
    pub element: ElementId,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// Severity level.
    pub severity: Severity,
    /// Optional machine-readable detail (e.g. the missing qualified name).
    pub info: Option<Arc<str>>,
}

impl ModelDiagnostic {
    pub fn error(element: ElementId, message: impl Into<Arc<str>>) -> Self {
        Self {
            element,
            message: message.into(),
            severity: Severity::Error,
            info: None,
        }
    }

    pub fn warning(element: ElementId, message: impl Into<Arc<str>>) -> Self {
        Self {
            element,
            message: message.into(),
            severity: Severity::Warning,
            info: None,
        }
    }

    /// Attach machine-readable detail.
    pub fn with_info(mut self, info: impl Into<Arc<str>>) -> Self {
        self.info = Some(info.into());
        self
    }
}
