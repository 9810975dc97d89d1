//! The pre-linking rule registry.
//!
//! Each rule is a small function responsible for one slice of linking,
//! registered against one or more kinds with an integer priority. The full
//! chain for a concrete kind is the union of its own rules and all
//! ancestor-kind rules, sorted by priority ascending with registration
//! order preserved within a priority.
//!
//! Priority conventions: negative runs first (generic relationship linking
//! at -1000 so targets exist before kind-specific rules examine them), 0 is
//! default, large positive priorities run strictly after all ordinary
//! implicit-specialization rules have executed for every sibling.

mod features;
mod imports;
mod metaclass;
mod metadata;
mod redefinition;
mod relationships;
mod specialization;

use rustc_hash::FxHashMap;

use crate::base::{DocumentId, ElementId};
use crate::meta::{Kind, KindIndex};

use super::ModelBuilder;

pub(crate) type RuleFn = fn(&mut ModelBuilder, ElementId, Option<DocumentId>);

#[derive(Clone, Copy)]
pub(crate) struct BuilderRule {
    pub priority: i32,
    pub order: u32,
    pub run: RuleFn,
}

/// Declared `(kind, priority, rule)` registrations, in registration order.
fn declarations() -> Vec<(Kind, i32, RuleFn)> {
    vec![
        (Kind::Relationship, -1000, relationships::link_relationship),
        (Kind::Type, -1000, relationships::link_owned_relationships),
        (Kind::Namespace, -100, imports::resolve_namespace_imports),
        (Kind::Element, 0, metaclass::arm_metaclass),
        (Kind::Expression, 0, features::link_expression_reference),
        (Kind::MultiplicityRange, 0, features::arm_multiplicity_bounds),
        (Kind::Type, 0, specialization::implicit_specialization),
        (Kind::Feature, 100, features::link_feature_parts),
        (Kind::Type, 100, metadata::semantic_metadata_specialization),
        (Kind::Connector, 100, redefinition::connector_end_redefinition),
        (Kind::Behavior, 1000, redefinition::parameter_redefinition),
        (Kind::Step, 1000, redefinition::parameter_redefinition),
        (Kind::TransitionUsage, 10000, redefinition::transition_slot_redefinition),
        (Kind::StateDefinition, 10000, redefinition::state_subaction_redefinition),
        (Kind::StateUsage, 10000, redefinition::state_subaction_redefinition),
        (
            Kind::RequirementDefinition,
            10000,
            redefinition::requirement_slot_redefinition,
        ),
        (
            Kind::RequirementUsage,
            10000,
            redefinition::requirement_slot_redefinition,
        ),
    ]
}

/// Expand the declarations into a priority-sorted chain per concrete kind.
pub(crate) fn rule_table(kinds: &KindIndex) -> FxHashMap<Kind, Vec<BuilderRule>> {
    let mut sparse: FxHashMap<Kind, Vec<BuilderRule>> = FxHashMap::default();
    for (order, (kind, priority, run)) in declarations().into_iter().enumerate() {
        sparse.entry(kind).or_default().push(BuilderRule {
            priority,
            order: order as u32,
            run,
        });
    }
    let mut dense = kinds.expand_and_merge(&sparse, false);
    for chain in dense.values_mut() {
        chain.sort_by_key(|rule| (rule.priority, rule.order));
    }
    dense
}
