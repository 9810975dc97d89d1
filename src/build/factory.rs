//! Phase 1 machinery: the constructor factory, the supertype-first
//! initializer chains, and the subtype-first artifact-clearing chains.
//!
//! All three are sparse per-kind declarations expanded through the
//! hierarchy index at builder construction time: the factory with
//! most-derived-wins, the chains with all-applicable-in-order semantics.

use rustc_hash::FxHashMap;

use crate::base::{DocumentId, ElementId, Visibility};
use crate::meta::{ChainOrder, Kind, KindIndex};
use crate::model::{FeatureValue, ModelArena};
use crate::syntax::{SyntaxNode, SyntaxNodeId};

/// Constructs the model element for one syntax node.
pub(crate) type CtorFn =
    fn(&mut ModelArena, Kind, Option<DocumentId>, SyntaxNodeId) -> ElementId;

/// Copies one category's syntax payload onto an already-constructed element.
pub(crate) type InitFn = fn(&mut ModelArena, &SyntaxNode, ElementId);

/// Clears one category's derived artifacts before re-linking.
pub(crate) type ClearFn = fn(&mut ModelArena, ElementId);

/// The dense factory table: every kind maps to its nearest registered
/// constructor.
pub(crate) fn factory_table(kinds: &KindIndex) -> FxHashMap<Kind, CtorFn> {
    let mut sparse: FxHashMap<Kind, CtorFn> = FxHashMap::default();
    sparse.insert(Kind::Element, ctor_element);
    kinds.expand_to_derived(&sparse, None)
}

/// Initializer chains, general-to-specific, so specialized initializers can
/// override what general ones set up.
pub(crate) fn initializer_chains(kinds: &KindIndex) -> FxHashMap<Kind, Vec<InitFn>> {
    let mut sparse: FxHashMap<Kind, InitFn> = FxHashMap::default();
    sparse.insert(Kind::Element, init_element);
    sparse.insert(Kind::Relationship, init_relationship);
    sparse.insert(Kind::Membership, init_membership);
    sparse.insert(Kind::Type, init_type);
    sparse.insert(Kind::Feature, init_feature);
    sparse.insert(Kind::Expression, init_expression);
    kinds.chain_registry(&sparse, ChainOrder::SupertypeFirst, None)
}

/// Artifact-clearing chains, specific-to-general, so e.g. feature caches go
/// before generic element caches.
pub(crate) fn clear_chains(kinds: &KindIndex) -> FxHashMap<Kind, Vec<ClearFn>> {
    let mut sparse: FxHashMap<Kind, ClearFn> = FxHashMap::default();
    sparse.insert(Kind::Element, clear_element);
    sparse.insert(Kind::Type, clear_type);
    sparse.insert(Kind::Feature, clear_feature);
    kinds.chain_registry(&sparse, ChainOrder::SubtypeFirst, None)
}

// ----------------------------------------------------------------------
// Constructors
// ----------------------------------------------------------------------

fn ctor_element(
    arena: &mut ModelArena,
    kind: Kind,
    document: Option<DocumentId>,
    syntax: SyntaxNodeId,
) -> ElementId {
    arena.alloc(kind, document, Some(syntax))
}

// ----------------------------------------------------------------------
// Initializers
// ----------------------------------------------------------------------

fn init_element(arena: &mut ModelArena, node: &SyntaxNode, id: ElementId) {
    let data = arena.get_mut(id);
    data.declared_name = node.name.clone();
    data.declared_short_name = node.short_name.clone();
    if let Some(visibility) = node.visibility {
        data.visibility = visibility;
    }
}

fn init_relationship(arena: &mut ModelArena, node: &SyntaxNode, id: ElementId) {
    let owner = arena.get(id).owner;
    if let Some(facet) = arena.edge_facet_mut(id) {
        facet.source_ref = node.source_ref.clone();
        facet.target_ref = node.target_ref.clone();
        facet.import = node.import;
        if facet.source.is_none() && facet.source_ref.is_none() {
            facet.source = owner;
        }
    }
}

fn init_membership(arena: &mut ModelArena, node: &SyntaxNode, id: ElementId) {
    let member = arena
        .get(id)
        .children
        .iter()
        .copied()
        .find(|&c| !arena.is_kind(c, Kind::Relationship));
    if let Some(facet) = arena.membership_facet_mut(id) {
        facet.member = member;
        facet.member_name = node.name.clone();
        facet.visibility = node.visibility.unwrap_or(Visibility::Public);
        facet.slot = node.slot;
    }
}

fn init_type(arena: &mut ModelArena, node: &SyntaxNode, id: ElementId) {
    let children: Vec<ElementId> = arena.get(id).children.clone();
    let mut heritage = Vec::new();
    let mut type_relationships = Vec::new();
    for child in children {
        let kind = arena.kind(child);
        if is_heritage_kind(arena, kind) {
            heritage.push(child);
        } else if arena.kinds().is_subtype(kind, Kind::Featuring)
            || arena.kinds().is_subtype(kind, Kind::Disjoining)
            || arena.kinds().is_subtype(kind, Kind::FeatureInverting)
        {
            type_relationships.push(child);
        }
    }
    if let Some(facet) = arena.type_facet_mut(id) {
        facet.is_abstract = node.flags.is_abstract;
        facet.is_sufficient = node.flags.is_sufficient;
        facet.heritage = heritage;
        facet.type_relationships = type_relationships;
        facet.all_supertypes = None;
        facet.all_features = None;
    }
}

fn init_feature(arena: &mut ModelArena, node: &SyntaxNode, id: ElementId) {
    let children: Vec<ElementId> = arena.get(id).children.clone();
    let chainings: Vec<ElementId> = children
        .iter()
        .copied()
        .filter(|&c| arena.is_kind(c, Kind::FeatureChaining))
        .collect();
    // Expressions own their operands directly; only plain features read a
    // direct expression child as their bound value.
    let value = if arena.is_kind(id, Kind::Expression) {
        None
    } else {
        children
            .iter()
            .copied()
            .find(|&c| arena.is_kind(c, Kind::Expression))
            .map(|expression| FeatureValue {
                expression,
                is_default: false,
                is_initial: false,
            })
    };
    if let Some(facet) = arena.feature_facet_mut(id) {
        facet.direction = node.direction;
        facet.is_composite = node.flags.is_composite;
        facet.is_portion = node.flags.is_portion;
        facet.is_readonly = node.flags.is_readonly;
        facet.is_derived = node.flags.is_derived;
        facet.is_end = node.flags.is_end;
        facet.is_ordered = node.flags.is_ordered;
        facet.is_nonunique = node.flags.is_nonunique;
        facet.chainings = chainings;
        facet.value = value;
    }
}

fn init_expression(arena: &mut ModelArena, node: &SyntaxNode, id: ElementId) {
    if let Some(facet) = arena.expr_facet_mut(id) {
        facet.literal = node.literal.clone();
        facet.operator = node.operator.clone();
        facet.target_ref = node.target_ref.clone();
    }
}

fn is_heritage_kind(arena: &ModelArena, kind: Kind) -> bool {
    arena.kinds().is_subtype(kind, Kind::Specialization)
        || arena.kinds().is_subtype(kind, Kind::Conjugation)
}

// ----------------------------------------------------------------------
// Artifact clearing
// ----------------------------------------------------------------------

fn clear_element(arena: &mut ModelArena, id: ElementId) {
    arena.clear_element_artifacts(id);
}

fn clear_type(arena: &mut ModelArena, id: ElementId) {
    arena.strip_implied_heritage(id);
    arena.on_heritage_changed(id);
}

fn clear_feature(arena: &mut ModelArena, id: ElementId) {
    if let Some(facet) = arena.feature_facet_mut(id) {
        facet.bounds = crate::model::Lazy::Unresolved;
        facet.classifiers = 0;
    }
}
