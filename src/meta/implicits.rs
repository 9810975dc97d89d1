//! The implicit-relationship index.
//!
//! Maps `(kind, role)` pairs to the qualified name of the standard-library
//! element a user element of that kind implicitly specializes. Roles default
//! to the generic `"base"` slot; binary relationship kinds add end-specific
//! roles (`"sourceOutput"`, `"targetInput"`).
//!
//! The table below is declarative and sparse; construction expands it
//! through the hierarchy index with reversed ancestor ordering, so a more
//! specific kind's mapping for a role overrides an inherited one while
//! unrelated roles from ancestors survive.

use rustc_hash::FxHashMap;

use super::hierarchy::KindIndex;
use super::kinds::Kind;

/// The default relationship role.
pub const ROLE_BASE: &str = "base";

/// Role for the source end of a binary connector-like kind.
pub const ROLE_SOURCE: &str = "sourceOutput";

/// Role for the target end of a binary connector-like kind.
pub const ROLE_TARGET: &str = "targetInput";

/// Declared `(kind, [(role, library element)])` facts. Sparse: only kinds
/// that introduce or override a mapping appear.
const DECLARED: &[(Kind, &[(&str, &str)])] = &[
    (Kind::Classifier, &[(ROLE_BASE, "Base::Anything")]),
    (Kind::DataType, &[(ROLE_BASE, "Base::DataValue")]),
    (Kind::Class, &[(ROLE_BASE, "Occurrences::Occurrence")]),
    (Kind::Structure, &[(ROLE_BASE, "Objects::Object")]),
    (Kind::Association, &[(ROLE_BASE, "Links::Link")]),
    (
        Kind::AssociationStructure,
        &[(ROLE_BASE, "Objects::LinkObject")],
    ),
    (Kind::Behavior, &[(ROLE_BASE, "Performances::Performance")]),
    (Kind::Function, &[(ROLE_BASE, "Performances::Evaluation")]),
    (
        Kind::Predicate,
        &[(ROLE_BASE, "Performances::BooleanEvaluation")],
    ),
    (Kind::Metaclass, &[(ROLE_BASE, "Metaobjects::Metaobject")]),
    (Kind::Feature, &[(ROLE_BASE, "Base::things")]),
    (Kind::Step, &[(ROLE_BASE, "Performances::performances")]),
    (Kind::Expression, &[(ROLE_BASE, "Performances::evaluations")]),
    (
        Kind::BooleanExpression,
        &[(ROLE_BASE, "Performances::booleanEvaluations")],
    ),
    (
        Kind::Connector,
        &[
            (ROLE_BASE, "Links::links"),
            (ROLE_SOURCE, "Links::Link::participant"),
            (ROLE_TARGET, "Links::Link::participant"),
        ],
    ),
    (Kind::BindingConnector, &[(ROLE_BASE, "Links::selfLinks")]),
    (
        Kind::Succession,
        &[(ROLE_BASE, "Occurrences::happensBeforeLinks")],
    ),
    (Kind::ItemFlow, &[(ROLE_BASE, "Transfers::transfers")]),
    (
        Kind::SuccessionItemFlow,
        &[(ROLE_BASE, "Transfers::flowTransfersBefore")],
    ),
    (Kind::Multiplicity, &[(ROLE_BASE, "Base::exactlyOne")]),
    (Kind::MultiplicityRange, &[(ROLE_BASE, "Base::naturals")]),
    (
        Kind::MetadataFeature,
        &[(ROLE_BASE, "Metaobjects::metaobjects")],
    ),
    // SysML definitions
    (Kind::OccurrenceDefinition, &[(ROLE_BASE, "Occurrences::Occurrence")]),
    (Kind::ItemDefinition, &[(ROLE_BASE, "Items::Item")]),
    (Kind::PartDefinition, &[(ROLE_BASE, "Parts::Part")]),
    (Kind::PortDefinition, &[(ROLE_BASE, "Ports::Port")]),
    (Kind::ConnectionDefinition, &[(ROLE_BASE, "Connections::Connection")]),
    (Kind::InterfaceDefinition, &[(ROLE_BASE, "Interfaces::Interface")]),
    (Kind::AllocationDefinition, &[(ROLE_BASE, "Allocations::Allocation")]),
    (Kind::AttributeDefinition, &[(ROLE_BASE, "Base::DataValue")]),
    (Kind::ActionDefinition, &[(ROLE_BASE, "Actions::Action")]),
    (Kind::CalculationDefinition, &[(ROLE_BASE, "Calculations::Calculation")]),
    (Kind::StateDefinition, &[(ROLE_BASE, "States::StateAction")]),
    (Kind::ConstraintDefinition, &[(ROLE_BASE, "Constraints::ConstraintCheck")]),
    (
        Kind::RequirementDefinition,
        &[(ROLE_BASE, "Requirements::RequirementCheck")],
    ),
    (Kind::CaseDefinition, &[(ROLE_BASE, "Cases::Case")]),
    (Kind::MetadataDefinition, &[(ROLE_BASE, "Metaobjects::Metaobject")]),
    // SysML usages
    (Kind::OccurrenceUsage, &[(ROLE_BASE, "Occurrences::occurrences")]),
    (Kind::ItemUsage, &[(ROLE_BASE, "Items::items")]),
    (Kind::PartUsage, &[(ROLE_BASE, "Parts::parts")]),
    (Kind::PortUsage, &[(ROLE_BASE, "Ports::ports")]),
    (Kind::AttributeUsage, &[(ROLE_BASE, "Base::dataValues")]),
    (Kind::ActionUsage, &[(ROLE_BASE, "Actions::actions")]),
    (Kind::CalculationUsage, &[(ROLE_BASE, "Calculations::calculations")]),
    (Kind::StateUsage, &[(ROLE_BASE, "States::stateActions")]),
    (Kind::TransitionUsage, &[(ROLE_BASE, "Actions::transitionActions")]),
    (Kind::ConstraintUsage, &[(ROLE_BASE, "Constraints::constraintChecks")]),
    (
        Kind::RequirementUsage,
        &[(ROLE_BASE, "Requirements::requirementChecks")],
    ),
    (Kind::CaseUsage, &[(ROLE_BASE, "Cases::cases")]),
    (Kind::MetadataUsage, &[(ROLE_BASE, "Metaobjects::metaobjects")]),
    (
        Kind::ConnectionUsage,
        &[
            (ROLE_BASE, "Connections::connections"),
            (ROLE_SOURCE, "Connections::Connection::source"),
            (ROLE_TARGET, "Connections::Connection::target"),
        ],
    ),
    (Kind::InterfaceUsage, &[(ROLE_BASE, "Interfaces::interfaces")]),
    (Kind::AllocationUsage, &[(ROLE_BASE, "Allocations::allocations")]),
];

/// Immutable `(kind, role) → qualified library name` lookup table.
pub struct ImplicitIndex {
    table: FxHashMap<Kind, FxHashMap<&'static str, &'static str>>,
}

impl ImplicitIndex {
    /// Expand the declared facts across the hierarchy.
    pub fn new(kinds: &KindIndex) -> Self {
        let mut sparse: FxHashMap<Kind, Vec<(&'static str, &'static str)>> = FxHashMap::default();
        for (kind, entries) in DECLARED {
            sparse.insert(*kind, entries.to_vec());
        }

        // Reversed ancestor order: general mappings land first, specific
        // kinds overwrite the same role afterwards.
        let merged = kinds.expand_and_merge(&sparse, true);

        let mut table: FxHashMap<Kind, FxHashMap<&'static str, &'static str>> =
            FxHashMap::default();
        for (kind, entries) in merged {
            let roles = table.entry(kind).or_default();
            for (role, name) in entries {
                roles.insert(role, name);
            }
        }
        Self { table }
    }

    /// The qualified library name a `kind` element implicitly relates to in
    /// `role`, if any. Absence means "no implicit relationship applies"; it
    /// is the caller's business whether that warrants a diagnostic.
    pub fn get(&self, kind: Kind, role: &str) -> Option<&'static str> {
        self.table.get(&kind)?.get(role).copied()
    }

    /// Shorthand for the default `"base"` role.
    pub fn base(&self, kind: Kind) -> Option<&'static str> {
        self.get(kind, ROLE_BASE)
    }
}
