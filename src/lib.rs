//! # sylink-base
//!
//! Core library for KerML and SysML v2 semantic model construction, linking,
//! and expression evaluation.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! library   → built-in standard library content (Base, Parts, Actions, …)
//!   ↓
//! build     → metamodel builder: factory, initializer chains, pre-linking
//!   ↓
//! eval      → expression evaluator: dispatch table, builtins, lazy ranges
//!   ↓
//! scope     → global export table, qualified-name resolution
//!   ↓
//! model     → element arena, facets, cached derived queries
//!   ↓
//! meta      → Kind enumeration, type hierarchy index, implicit index
//!   ↓
//! syntax    → the syntax-node contract the builder consumes
//!   ↓
//! base      → primitives (DocumentId, LangId, diagnostics, TextRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → meta → model → scope → eval →
// build → library)
// ============================================================================

/// Foundation types: DocumentId, LangId, Visibility, diagnostics
pub mod base;

/// Syntax: the node tree contract delivered by the external parser
pub mod syntax;

/// Metamodel reflection: Kind space, hierarchy index, implicit index
pub mod meta;

/// Semantic model: element arena, facets, derived queries
pub mod model;

/// Name resolution: global export scope and reference linking
pub mod scope;

/// Expression evaluator: type-dispatched tree walker over the model
pub mod eval;

/// Metamodel builder: two-phase construction and pre-linking
pub mod build;

/// Built-in standard library model content
pub mod library;

// Re-export foundation types
pub use base::{DocumentId, LangId, ModelDiagnostic, Severity, TextRange, TextSize, Visibility};
pub use meta::Kind;
pub use model::ElementId;
