//! Redefinition by position.
//!
//! Walks same-kind ancestors' positional members in lock-step with the
//! node's own and synthesizes an implicit redefinition for each pair —
//! unless the member already carries an explicit redefinition. These rules
//! run at the largest priorities because every positional member of every
//! ancestor must itself be pre-linked first.

use crate::base::{DocumentId, ElementId};
use crate::build::ModelBuilder;
use crate::meta::Kind;
use crate::syntax::MembershipSlot;

/// Connector ends redefine the corresponding ends of ancestor connectors.
pub(crate) fn connector_end_redefinition(
    b: &mut ModelBuilder,
    id: ElementId,
    _doc: Option<DocumentId>,
) {
    let own = end_features(b, id);
    if own.is_empty() {
        return;
    }
    for ancestor in same_kind_ancestors(b, id, &[Kind::Connector]) {
        b.pre_link(ancestor);
        let theirs = end_features(b, ancestor);
        redefine_pairwise(b, &own, &theirs);
    }
}

/// Directed parameters redefine ancestor parameters positionally.
pub(crate) fn parameter_redefinition(
    b: &mut ModelBuilder,
    id: ElementId,
    _doc: Option<DocumentId>,
) {
    let own = b.arena.parameters(id);
    if own.is_empty() {
        return;
    }
    for ancestor in same_kind_ancestors(b, id, &[Kind::Behavior, Kind::Step]) {
        b.pre_link(ancestor);
        let theirs = b.arena.parameters(ancestor);
        for &parameter in &theirs {
            b.pre_link(parameter);
        }
        redefine_pairwise(b, &own, &theirs);
    }
}

/// Transition trigger/guard/effect slots redefine per slot.
pub(crate) fn transition_slot_redefinition(
    b: &mut ModelBuilder,
    id: ElementId,
    _doc: Option<DocumentId>,
) {
    for slot in [
        MembershipSlot::Trigger,
        MembershipSlot::Guard,
        MembershipSlot::Effect,
    ] {
        redefine_slot(b, id, &[Kind::TransitionUsage], slot);
    }
}

/// State entry/do/exit subactions redefine per slot.
pub(crate) fn state_subaction_redefinition(
    b: &mut ModelBuilder,
    id: ElementId,
    _doc: Option<DocumentId>,
) {
    for slot in [
        MembershipSlot::Entry,
        MembershipSlot::DoAction,
        MembershipSlot::Exit,
    ] {
        redefine_slot(b, id, &[Kind::StateDefinition, Kind::StateUsage], slot);
    }
}

/// Requirement objective and subject redefine through their dedicated
/// membership kinds.
pub(crate) fn requirement_slot_redefinition(
    b: &mut ModelBuilder,
    id: ElementId,
    _doc: Option<DocumentId>,
) {
    let ancestor_kinds = [Kind::RequirementDefinition, Kind::RequirementUsage];
    for membership_kind in [Kind::ObjectiveMembership, Kind::SubjectMembership] {
        let own = members_by_membership_kind(b, id, membership_kind);
        if own.is_empty() {
            continue;
        }
        for ancestor in same_kind_ancestors(b, id, &ancestor_kinds) {
            b.pre_link(ancestor);
            let theirs = members_by_membership_kind(b, ancestor, membership_kind);
            redefine_pairwise(b, &own, &theirs);
        }
    }
}

// ----------------------------------------------------------------------
// Shared walk
// ----------------------------------------------------------------------

fn redefine_slot(b: &mut ModelBuilder, id: ElementId, ancestor_kinds: &[Kind], slot: MembershipSlot) {
    let own = slot_members(b, id, slot);
    if own.is_empty() {
        return;
    }
    for ancestor in same_kind_ancestors(b, id, ancestor_kinds) {
        b.pre_link(ancestor);
        let theirs = slot_members(b, ancestor, slot);
        redefine_pairwise(b, &own, &theirs);
    }
}

/// Supertypes whose kind matches any of `kinds`, most specific first.
fn same_kind_ancestors(b: &mut ModelBuilder, id: ElementId, kinds: &[Kind]) -> Vec<ElementId> {
    b.arena
        .all_supertypes(id)
        .into_iter()
        .filter(|&sup| {
            let kind = b.arena.kind(sup);
            kinds.iter().any(|&k| b.kinds.is_subtype(kind, k))
        })
        .collect()
}

fn end_features(b: &ModelBuilder, id: ElementId) -> Vec<ElementId> {
    b.arena
        .owned_features(id)
        .into_iter()
        .filter(|&f| {
            b.arena
                .get(f)
                .feature_facet()
                .is_some_and(|facet| facet.is_end)
        })
        .collect()
}

fn slot_members(b: &ModelBuilder, id: ElementId, slot: MembershipSlot) -> Vec<ElementId> {
    b.arena
        .owned_memberships(id)
        .into_iter()
        .filter_map(|membership| {
            let facet = b.arena.get(membership).membership_facet()?;
            if facet.slot == Some(slot) {
                facet.member
            } else {
                None
            }
        })
        .collect()
}

fn members_by_membership_kind(
    b: &ModelBuilder,
    id: ElementId,
    membership_kind: Kind,
) -> Vec<ElementId> {
    b.arena
        .owned_memberships(id)
        .into_iter()
        .filter_map(|membership| {
            if b.kinds.is_subtype(b.arena.kind(membership), membership_kind) {
                b.arena.get(membership).membership_facet()?.member
            } else {
                None
            }
        })
        .collect()
}

/// The lock-step core: pair own members with ancestor members by position
/// and redefine, explicit redefinitions and duplicates excepted.
fn redefine_pairwise(b: &mut ModelBuilder, own: &[ElementId], theirs: &[ElementId]) {
    for (&member, &base) in own.iter().zip(theirs.iter()) {
        if has_explicit_redefinition(b, member) {
            continue;
        }
        if already_redefines(b, member, base) {
            continue;
        }
        b.attach_implied_heritage(member, base, Kind::Redefinition);
        // A positional member without its own name takes the redefined
        // member's effective name.
        if b.arena.get(member).declared_name.is_none() {
            let inherited = b.arena.get(base).effective_name().cloned();
            if inherited.is_some() {
                b.arena.set_name_override(member, inherited);
            }
        }
    }
}

fn has_explicit_redefinition(b: &ModelBuilder, member: ElementId) -> bool {
    b.arena.heritage_of(member).iter().any(|&edge| {
        !b.arena.get(edge).is_implied()
            && b.kinds.is_subtype(b.arena.kind(edge), Kind::Redefinition)
    })
}

fn already_redefines(b: &ModelBuilder, member: ElementId, base: ElementId) -> bool {
    b.arena.heritage_of(member).iter().any(|&edge| {
        b.kinds.is_subtype(b.arena.kind(edge), Kind::Redefinition)
            && b.arena.get(edge).edge_facet().and_then(|e| e.target) == Some(base)
    })
}
