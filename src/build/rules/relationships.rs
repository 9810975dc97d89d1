//! Generic relationship linking: resolve every edge's source and target.
//!
//! Runs at -1000 so that targets exist before any kind-specific rule
//! examines the edge.

use crate::base::{DocumentId, ElementId, Severity};
use crate::build::ModelBuilder;
use crate::meta::Kind;

/// Pre-link a type's owned heritage and type-relationship edges, then the
/// resolved supertypes themselves, so the type's kind-specific rules see
/// fully linked ancestors. The setup-state guard keeps this terminating on
/// cyclic heritage.
pub(crate) fn link_owned_relationships(
    b: &mut ModelBuilder,
    id: ElementId,
    _doc: Option<DocumentId>,
) {
    let mut edges = b.arena.heritage_of(id);
    if let Some(facet) = b.arena.get(id).type_facet() {
        edges.extend(facet.type_relationships.iter().copied());
    }
    for edge in edges {
        b.pre_link(edge);
    }
    for target in b.arena.direct_supertypes(id) {
        b.pre_link(target);
    }
}

pub(crate) fn link_relationship(b: &mut ModelBuilder, id: ElementId, _doc: Option<DocumentId>) {
    let Some(owner) = b.arena.get(id).owner else {
        return;
    };
    let is_import = b.arena.is_kind(id, Kind::Import);

    let (source_ref, target_ref, source, target) = match b.arena.get(id).edge_facet() {
        Some(facet) => (
            facet.source_ref.clone(),
            facet.target_ref.clone(),
            facet.source,
            facet.target,
        ),
        None => return,
    };

    if source.is_none() {
        if let Some(reference) = source_ref {
            match b.resolve_reference(owner, &reference.path) {
                Some(resolved) => {
                    // A feature source stands for the feature it is
                    // ultimately typed by.
                    let resolved = if b.arena.is_kind(resolved, Kind::Feature) {
                        b.arena.basic_feature(resolved)
                    } else {
                        resolved
                    };
                    if let Some(facet) = b.arena.edge_facet_mut(id) {
                        facet.source = Some(resolved);
                    }
                }
                None => b.diagnostic(
                    id,
                    Severity::Error,
                    format!("could not resolve '{}'", reference.path),
                ),
            }
        }
    }

    if target.is_none() {
        if let Some(reference) = target_ref {
            let resolved = if is_import {
                b.resolve_import_path(owner, &reference.path)
            } else {
                b.resolve_reference(owner, &reference.path)
            };
            match resolved {
                Some(resolved) => {
                    if let Some(facet) = b.arena.edge_facet_mut(id) {
                        facet.target = Some(resolved);
                    }
                    // Heritage hook: the owner's derived sets are stale.
                    if b.arena.get(owner).type_facet().is_some() && is_heritage(b, id) {
                        b.arena.on_heritage_changed(owner);
                    }
                }
                None => b.diagnostic(
                    id,
                    Severity::Error,
                    format!("could not resolve '{}'", reference.path),
                ),
            }
        }
    }
}

fn is_heritage(b: &ModelBuilder, edge: ElementId) -> bool {
    let kind = b.arena.kind(edge);
    b.kinds.is_subtype(kind, Kind::Specialization) || b.kinds.is_subtype(kind, Kind::Conjugation)
}
