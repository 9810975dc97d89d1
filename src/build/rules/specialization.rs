//! Implicit specialization from per-kind default general types.
//!
//! Computes what a node would specialize if the user wrote nothing, maps it
//! through the implicit-relationship index to a library element, and
//! attaches an implied heritage edge of the node's natural specialization
//! kind. An explicit edge of the same logical kind always suppresses the
//! implicit one, and an already-present supertype is never duplicated.

use crate::base::{DocumentId, ElementId, Severity};
use crate::build::ModelBuilder;

pub(crate) fn implicit_specialization(
    b: &mut ModelBuilder,
    id: ElementId,
    _doc: Option<DocumentId>,
) {
    let kind = b.arena.kind(id);
    let Some(library_name) = b.implicits.base(kind) else {
        return;
    };

    let edge_kind = b.natural_heritage_kind(kind);
    let has_explicit = b.arena.heritage_of(id).iter().any(|&edge| {
        !b.arena.get(edge).is_implied() && b.kinds.is_subtype(b.arena.kind(edge), edge_kind)
    });
    if has_explicit {
        return;
    }

    let Some(library) = b.find_global(library_name) else {
        b.diagnostic(
            id,
            Severity::Warning,
            format!("standard library element '{library_name}' not found"),
        );
        return;
    };
    // Library roots would otherwise specialize themselves.
    if library == id {
        return;
    }

    b.pre_link(library);
    if b.arena.all_supertypes(id).contains(&library) {
        return;
    }
    b.attach_implied_heritage(id, library, edge_kind);
}
