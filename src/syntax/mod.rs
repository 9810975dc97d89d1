//! The syntax-node contract the builder consumes.
//!
//! The concrete parser and tokenizer live outside this crate; what arrives
//! here is an already-parsed, already-repaired tree of nodes, each carrying
//! a stable [`Kind`] tag, source-range info, and the payload fields the
//! metamodel initializers copy from. Structural anomalies (missing mandatory
//! child slots) are repaired by the upstream fix-up layer before the builder
//! ever sees the tree.
//!
//! [`SyntaxTreeBuilder`] constructs such trees programmatically; the built-in
//! library content and the test suites are its main clients.

mod node;
mod tree;

pub use node::{
    FeatureDirection, ImportSpec, LiteralValue, MembershipSlot, SyntaxFlags, SyntaxNode,
    SyntaxNodeId, SyntaxRef,
};
pub use tree::{SyntaxTree, SyntaxTreeBuilder};

use std::sync::Arc;

use crate::base::{DocumentId, LangId};

/// A parsed document handed to the builder by the lifecycle host.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub uri: Arc<str>,
    pub lang: LangId,
    pub tree: SyntaxTree,
}

impl Document {
    /// Wrap a parsed tree; the dialect is derived from the uri extension.
    pub fn new(id: DocumentId, uri: impl Into<Arc<str>>, tree: SyntaxTree) -> Self {
        let uri = uri.into();
        let lang = LangId::from_uri(&uri);
        Self {
            id,
            uri,
            lang,
            tree,
        }
    }
}
