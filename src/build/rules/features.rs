//! Feature-level linking: expression references, chaining, classifier bits,
//! and the lazy multiplicity-bound arming.

use crate::base::{DocumentId, ElementId, Severity};
use crate::build::ModelBuilder;
use crate::meta::Kind;
use crate::model::feature_class;

/// Resolve an expression's textual reference and pre-link its operands.
pub(crate) fn link_expression_reference(
    b: &mut ModelBuilder,
    id: ElementId,
    _doc: Option<DocumentId>,
) {
    let target_ref = match b.arena.get(id).expr_facet() {
        Some(facet) if facet.target.is_none() => facet.target_ref.clone(),
        _ => None,
    };
    if let Some(reference) = target_ref {
        let scope = b.arena.get(id).owner.unwrap_or(id);
        if b.arena.is_kind(id, Kind::FeatureChainExpression) && reference.path.contains('.') {
            link_chain_reference(b, id, scope, &reference.path);
        } else {
            match b.resolve_reference(scope, &reference.path) {
                Some(resolved) => {
                    if let Some(facet) = b.arena.expr_facet_mut(id) {
                        facet.target = Some(resolved);
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

    let operands: Vec<ElementId> = b
        .arena
        .get(id)
        .children
        .iter()
        .copied()
        .filter(|&c| b.arena.is_kind(c, Kind::Expression))
        .collect();
    for operand in operands {
        b.pre_link(operand);
    }
}

/// Resolve a dotted path step by step and synthesize the chained feature
/// the evaluator navigates through.
fn link_chain_reference(b: &mut ModelBuilder, id: ElementId, scope: ElementId, path: &str) {
    let mut steps = Vec::new();
    let mut current_scope = scope;
    for piece in path.split('.') {
        let Some(step) = b.resolve_reference(current_scope, piece) else {
            b.diagnostic(
                id,
                Severity::Error,
                format!("could not resolve '{piece}' in '{path}'"),
            );
            return;
        };
        steps.push(step);
        current_scope = step;
    }

    let chained = b.arena.alloc(Kind::Feature, None, None);
    for step in steps {
        let edge = b.arena.alloc(Kind::FeatureChaining, None, None);
        if let Some(facet) = b.arena.edge_facet_mut(edge) {
            facet.is_implied = true;
            facet.source = Some(chained);
            facet.target = Some(step);
        }
        b.arena.attach_child(chained, edge);
        if let Some(facet) = b.arena.feature_facet_mut(chained) {
            facet.chainings.push(edge);
        }
    }
    b.arena.attach_child(id, chained);
    if let Some(facet) = b.arena.expr_facet_mut(id) {
        facet.target = Some(chained);
    }
}

/// Pre-link a feature's chaining edges and accumulate the classifier
/// bit-set from its supertypes.
pub(crate) fn link_feature_parts(b: &mut ModelBuilder, id: ElementId, _doc: Option<DocumentId>) {
    let chainings: Vec<ElementId> = b
        .arena
        .get(id)
        .feature_facet()
        .map(|f| f.chainings.clone())
        .unwrap_or_default();
    for edge in chainings {
        b.pre_link(edge);
    }

    let mut bits = 0u8;
    for sup in b.arena.all_supertypes(id) {
        let kind = b.arena.kind(sup);
        if b.kinds.is_subtype(kind, Kind::Structure) {
            bits |= feature_class::OBJECT;
        }
        if b.kinds.is_subtype(kind, Kind::DataType) {
            bits |= feature_class::DATA_VALUE;
        }
        if b.kinds.is_subtype(kind, Kind::Behavior) || b.kinds.is_subtype(kind, Kind::Step) {
            bits |= feature_class::PERFORMANCE;
        }
        if b.kinds.is_subtype(kind, Kind::Class) {
            bits |= feature_class::OCCURRENCE;
        }
    }
    if let Some(facet) = b.arena.feature_facet_mut(id) {
        facet.classifiers |= bits;
    }
}

/// Multiplicity bounds stay lazy; the rule only makes sure the bound
/// expressions themselves are linked so first access can evaluate them.
pub(crate) fn arm_multiplicity_bounds(
    b: &mut ModelBuilder,
    id: ElementId,
    _doc: Option<DocumentId>,
) {
    let exprs: Vec<ElementId> = b
        .arena
        .get(id)
        .children
        .iter()
        .copied()
        .filter(|&c| b.arena.is_kind(c, Kind::Expression))
        .collect();
    for expr in exprs {
        b.pre_link(expr);
    }
}
