//! Element storage: the common core plus per-category facets.
//!
//! The metamodel has hundreds of kinds but only a handful of structural
//! categories. An element carries the facet for every category its kind is a
//! subtype of: a `ConnectionUsage` has type, feature and edge facets at
//! once, a `Package` has none beyond the common core.

use smol_str::SmolStr;
use std::sync::Arc;

use crate::base::{DocumentId, ElementId, Visibility};
use crate::meta::Kind;
use crate::syntax::{
    FeatureDirection, ImportSpec, LiteralValue, MembershipSlot, SyntaxNodeId, SyntaxRef,
};

/// Re-entrancy guard for linking.
///
/// `Active` marks a node currently on the pre-linking call stack; asking to
/// link it again is a no-op, which is what makes linking terminate on cyclic
/// model graphs. `Completed` implies fully linked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetupState {
    #[default]
    None,
    Active,
    Completed,
}

/// Resolve-on-first-access tri-state cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lazy<T> {
    #[default]
    Unresolved,
    Resolved(T),
    Failed,
}

impl<T: Copy> Lazy<T> {
    pub fn resolved(&self) -> Option<T> {
        match self {
            Lazy::Resolved(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Lazy::Unresolved)
    }
}

/// Classifier bit-set accumulated from a feature's supertypes.
pub mod feature_class {
    pub const OBJECT: u8 = 1 << 0;
    pub const DATA_VALUE: u8 = 1 << 1;
    pub const PERFORMANCE: u8 = 1 << 2;
    pub const OCCURRENCE: u8 = 1 << 3;
}

/// A feature's bound value expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureValue {
    pub expression: ElementId,
    pub is_default: bool,
    pub is_initial: bool,
}

/// Facet for kinds under `Type`.
#[derive(Debug, Clone, Default)]
pub struct TypeFacet {
    pub is_abstract: bool,
    pub is_sufficient: bool,
    /// Ordered heritage edges (explicit first, in declaration order;
    /// implied edges appended by the builder).
    pub heritage: Vec<ElementId>,
    /// Non-heritage type-level relationships (featuring, disjoining, …).
    pub type_relationships: Vec<ElementId>,
    /// Derived caches, invalidated on heritage change.
    pub(crate) all_supertypes: Option<Vec<ElementId>>,
    pub(crate) all_features: Option<Vec<ElementId>>,
}

/// Facet for kinds under `Feature`.
#[derive(Debug, Clone, Default)]
pub struct FeatureFacet {
    pub direction: FeatureDirection,
    pub is_composite: bool,
    pub is_portion: bool,
    pub is_readonly: bool,
    pub is_derived: bool,
    pub is_end: bool,
    pub is_ordered: bool,
    pub is_nonunique: bool,
    pub value: Option<FeatureValue>,
    /// Ordered feature-chaining edges.
    pub chainings: Vec<ElementId>,
    /// Accumulated [`feature_class`] bits.
    pub classifiers: u8,
    /// Lazily evaluated multiplicity bounds `(lower, upper)`.
    pub(crate) bounds: Lazy<(Option<i64>, Option<i64>)>,
}

/// Facet for kinds under `Relationship` — relationship edges are first-class
/// elements with their own identity, not plain pointers.
#[derive(Debug, Clone, Default)]
pub struct EdgeFacet {
    /// True for edges synthesized by the builder rather than written by the
    /// user. Implied edges are cleared wholesale on document invalidation.
    pub is_implied: bool,
    pub source: Option<ElementId>,
    pub target: Option<ElementId>,
    /// Unresolved textual references, consumed by the linking rules.
    pub source_ref: Option<SyntaxRef>,
    pub target_ref: Option<SyntaxRef>,
    /// Import payload, on import kinds only.
    pub import: Option<ImportSpec>,
}

/// Facet for kinds under `Membership` — the relationship-as-container that
/// owns a member and mediates its name and visibility in a namespace.
#[derive(Debug, Clone, Default)]
pub struct MembershipFacet {
    pub member: Option<ElementId>,
    /// Alias under which the member is known here, when it differs from the
    /// member's own name.
    pub member_name: Option<SmolStr>,
    pub visibility: Visibility,
    pub slot: Option<MembershipSlot>,
}

/// Facet for kinds under `Expression`.
#[derive(Debug, Clone, Default)]
pub struct ExprFacet {
    pub literal: Option<LiteralValue>,
    pub operator: Option<SmolStr>,
    /// Resolved referent of a feature-reference or metadata-access
    /// expression.
    pub target: Option<ElementId>,
    pub target_ref: Option<SyntaxRef>,
}

/// The common element core plus its facets.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub id: ElementId,
    pub kind: Kind,
    pub declared_name: Option<SmolStr>,
    pub declared_short_name: Option<SmolStr>,
    /// Redefinition-derived override of the effective name.
    pub(crate) name_override: Option<SmolStr>,
    pub visibility: Visibility,
    /// Back-reference to the owning syntax node; `None` for elements
    /// synthesized during linking.
    pub syntax: Option<SyntaxNodeId>,
    pub document: Option<DocumentId>,
    pub owner: Option<ElementId>,
    pub children: Vec<ElementId>,
    pub(crate) setup: SetupState,
    pub(crate) qualified_name: Option<Arc<str>>,
    pub(crate) metaclass: Lazy<ElementId>,
    /// Synthesized metadata feature annotating this element with its
    /// metaclass, once resolved.
    pub(crate) metaclass_feature: Option<ElementId>,

    pub(crate) type_facet: Option<TypeFacet>,
    pub(crate) feature_facet: Option<FeatureFacet>,
    pub(crate) edge_facet: Option<EdgeFacet>,
    pub(crate) membership_facet: Option<MembershipFacet>,
    pub(crate) expr_facet: Option<ExprFacet>,
}

impl ElementData {
    pub(crate) fn new(id: ElementId, kind: Kind) -> Self {
        Self {
            id,
            kind,
            declared_name: None,
            declared_short_name: None,
            name_override: None,
            visibility: Visibility::default(),
            syntax: None,
            document: None,
            owner: None,
            children: Vec::new(),
            setup: SetupState::None,
            qualified_name: None,
            metaclass: Lazy::Unresolved,
            metaclass_feature: None,
            type_facet: None,
            feature_facet: None,
            edge_facet: None,
            membership_facet: None,
            expr_facet: None,
        }
    }

    /// Effective name: the declared name unless a redefinition overrode it.
    pub fn effective_name(&self) -> Option<&SmolStr> {
        self.name_override.as_ref().or(self.declared_name.as_ref())
    }

    pub fn setup_state(&self) -> SetupState {
        self.setup
    }

    pub fn type_facet(&self) -> Option<&TypeFacet> {
        self.type_facet.as_ref()
    }

    pub fn feature_facet(&self) -> Option<&FeatureFacet> {
        self.feature_facet.as_ref()
    }

    pub fn edge_facet(&self) -> Option<&EdgeFacet> {
        self.edge_facet.as_ref()
    }

    pub fn membership_facet(&self) -> Option<&MembershipFacet> {
        self.membership_facet.as_ref()
    }

    pub fn expr_facet(&self) -> Option<&ExprFacet> {
        self.expr_facet.as_ref()
    }

    /// True for edges synthesized by the builder.
    pub fn is_implied(&self) -> bool {
        self.edge_facet.as_ref().is_some_and(|e| e.is_implied)
    }

    /// The synthesized metaclass annotation, once resolved.
    pub fn metaclass_feature(&self) -> Option<ElementId> {
        self.metaclass_feature
    }
}
