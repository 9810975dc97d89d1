//! Namespace import resolution.
//!
//! Imports are inherited lexically upward, so every ancestor namespace is
//! pre-linked first. Actual import-statement resolution is the reference
//! linker's job; this rule then pre-links every directly imported namespace
//! (for wildcard imports) so deep import chains are fully resolved before
//! anything reads through them.

use crate::base::{DocumentId, ElementId};
use crate::build::ModelBuilder;

pub(crate) fn resolve_namespace_imports(
    b: &mut ModelBuilder,
    id: ElementId,
    _doc: Option<DocumentId>,
) {
    let mut cursor = b.arena.get(id).owner;
    while let Some(owner) = cursor {
        b.pre_link(owner);
        cursor = b.arena.get(owner).owner;
    }

    for import in b.arena.owned_imports(id) {
        b.pre_link(import);
        let Some(facet) = b.arena.get(import).edge_facet() else {
            continue;
        };
        let target = facet.target;
        let wildcard = facet.import.map(|i| i.wildcard).unwrap_or(false);
        if let Some(target) = target {
            // Name-only imports just make the name visible; wildcard imports
            // expose the namespace's members and need it fully linked.
            if wildcard {
                b.pre_link(target);
            }
        }
    }
}
