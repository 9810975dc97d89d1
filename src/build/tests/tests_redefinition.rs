#![allow(clippy::unwrap_used)]
use tokio_util::sync::CancellationToken;

use crate::base::ElementId;
use crate::build::ModelBuilder;
use crate::library;
use crate::meta::Kind;
use crate::syntax::{FeatureDirection, MembershipSlot, SyntaxTreeBuilder};

fn find(b: &mut ModelBuilder, qualified: &str) -> ElementId {
    b.find_global(qualified)
        .unwrap_or_else(|| panic!("'{qualified}' not found"))
}

fn add_and_link(b: &mut ModelBuilder, uri: &str, tree: crate::syntax::SyntaxTree) {
    let doc = b.add_document(uri, tree);
    b.pre_link_document(doc, &CancellationToken::new());
}

fn redefinitions_of(b: &ModelBuilder, member: ElementId) -> Vec<(ElementId, bool)> {
    b.arena()
        .heritage_of(member)
        .into_iter()
        .filter(|&e| b.kinds().is_subtype(b.arena().kind(e), Kind::Redefinition))
        .map(|e| {
            let target = b.arena().get(e).edge_facet().and_then(|f| f.target).unwrap();
            (target, b.arena().get(e).is_implied())
        })
        .collect()
}

#[test]
fn action_parameters_redefine_by_position() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::ActionDefinition).named("Move");
    tree.member(Kind::ReferenceUsage)
        .named("speed")
        .direction(FeatureDirection::In);
    tree.end_member();
    tree.end_member();
    tree.member(Kind::ActionDefinition)
        .named("Drive")
        .heritage(Kind::Subclassification, "Move");
    tree.member(Kind::ReferenceUsage)
        .named("velocity")
        .direction(FeatureDirection::In);
    tree.end_member();
    tree.end_member();
    tree.end_member();
    add_and_link(&mut b, "models/actions.sysml", tree.build());

    let velocity = find(&mut b, "Model::Drive::velocity");
    let speed = find(&mut b, "Model::Move::speed");
    let redefs = redefinitions_of(&b, velocity);
    assert_eq!(redefs, vec![(speed, true)]);
}

/// Scenario: a user-authored explicit redefinition must suppress the
/// positional rule for the same member.
#[test]
fn explicit_redefinition_suppresses_the_positional_rule() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::ActionDefinition).named("Move");
    tree.member(Kind::ReferenceUsage)
        .named("speed")
        .direction(FeatureDirection::In);
    tree.end_member();
    tree.end_member();
    tree.member(Kind::ActionDefinition)
        .named("Drive")
        .heritage(Kind::Subclassification, "Move");
    tree.member(Kind::ReferenceUsage)
        .named("velocity")
        .direction(FeatureDirection::In)
        .heritage(Kind::Redefinition, "speed");
    tree.end_member();
    tree.end_member();
    tree.end_member();
    add_and_link(&mut b, "models/actions2.sysml", tree.build());

    let velocity = find(&mut b, "Model::Drive::velocity");
    let speed = find(&mut b, "Model::Move::speed");

    // Exactly one redefinition of speed, and it is the explicit one.
    let redefs = redefinitions_of(&b, velocity);
    assert_eq!(redefs, vec![(speed, false)]);
}

#[test]
fn unnamed_positional_parameter_takes_the_redefined_name() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::ActionDefinition).named("Move");
    tree.member(Kind::ReferenceUsage)
        .named("speed")
        .direction(FeatureDirection::In);
    tree.end_member();
    tree.end_member();
    tree.member(Kind::ActionDefinition)
        .named("Drive")
        .heritage(Kind::Subclassification, "Move");
    tree.member(Kind::ReferenceUsage).direction(FeatureDirection::In);
    tree.end_member();
    tree.end_member();
    tree.end_member();
    add_and_link(&mut b, "models/actions3.sysml", tree.build());

    let drive = find(&mut b, "Model::Drive");
    let parameter = b.arena().parameters(drive)[0];
    assert_eq!(
        b.arena().get(parameter).effective_name().map(|n| n.as_str()),
        Some("speed")
    );
}

#[test]
fn connector_ends_redefine_by_position() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::ConnectionUsage).named("joint");
    tree.member(Kind::ReferenceUsage).named("a").end_flag().end_member();
    tree.member(Kind::ReferenceUsage).named("b").end_flag().end_member();
    tree.end_member();
    tree.member(Kind::ConnectionUsage)
        .named("hinge")
        .heritage(Kind::Subsetting, "joint");
    tree.member(Kind::ReferenceUsage).named("top").end_flag().end_member();
    tree.member(Kind::ReferenceUsage).named("bottom").end_flag().end_member();
    tree.end_member();
    tree.end_member();
    add_and_link(&mut b, "models/connectors.sysml", tree.build());

    let top = find(&mut b, "Model::hinge::top");
    let bottom = find(&mut b, "Model::hinge::bottom");
    let a = find(&mut b, "Model::joint::a");
    let b_end = find(&mut b, "Model::joint::b");

    assert_eq!(redefinitions_of(&b, top), vec![(a, true)]);
    assert_eq!(redefinitions_of(&b, bottom), vec![(b_end, true)]);
}

#[test]
fn transition_slots_redefine_per_slot_not_across_slots() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::TransitionUsage).named("base");
    tree.start(Kind::TransitionFeatureMembership)
        .slot(MembershipSlot::Trigger)
        .start(Kind::AcceptActionUsage)
        .named("baseTrigger")
        .finish()
        .finish();
    tree.start(Kind::TransitionFeatureMembership)
        .slot(MembershipSlot::Effect)
        .start(Kind::ActionUsage)
        .named("baseEffect")
        .finish()
        .finish();
    tree.end_member();
    tree.member(Kind::TransitionUsage)
        .named("derived")
        .heritage(Kind::Subsetting, "base");
    tree.start(Kind::TransitionFeatureMembership)
        .slot(MembershipSlot::Trigger)
        .start(Kind::AcceptActionUsage)
        .named("myTrigger")
        .finish()
        .finish();
    tree.start(Kind::TransitionFeatureMembership)
        .slot(MembershipSlot::Effect)
        .start(Kind::ActionUsage)
        .named("myEffect")
        .finish()
        .finish();
    tree.end_member();
    tree.end_member();
    add_and_link(&mut b, "models/transitions.sysml", tree.build());

    let my_trigger = find(&mut b, "Model::derived::myTrigger");
    let my_effect = find(&mut b, "Model::derived::myEffect");
    let base_trigger = find(&mut b, "Model::base::baseTrigger");
    let base_effect = find(&mut b, "Model::base::baseEffect");

    assert_eq!(redefinitions_of(&b, my_trigger), vec![(base_trigger, true)]);
    assert_eq!(redefinitions_of(&b, my_effect), vec![(base_effect, true)]);
}

#[test]
fn state_subactions_redefine_entry_do_exit() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::StateDefinition).named("Idle");
    tree.start(Kind::StateSubactionMembership)
        .slot(MembershipSlot::Entry)
        .start(Kind::ActionUsage)
        .named("onEntry")
        .finish()
        .finish();
    tree.end_member();
    tree.member(Kind::StateDefinition)
        .named("Sleeping")
        .heritage(Kind::Subclassification, "Idle");
    tree.start(Kind::StateSubactionMembership)
        .slot(MembershipSlot::Entry)
        .start(Kind::ActionUsage)
        .named("dim")
        .finish()
        .finish();
    tree.end_member();
    tree.end_member();
    add_and_link(&mut b, "models/states.sysml", tree.build());

    let dim = find(&mut b, "Model::Sleeping::dim");
    let on_entry = find(&mut b, "Model::Idle::onEntry");
    assert_eq!(redefinitions_of(&b, dim), vec![(on_entry, true)]);
}

#[test]
fn requirement_subject_redefines_through_its_membership() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::RequirementDefinition).named("Safe");
    tree.start(Kind::SubjectMembership)
        .start(Kind::ReferenceUsage)
        .named("system")
        .finish()
        .finish();
    tree.end_member();
    tree.member(Kind::RequirementDefinition)
        .named("Safer")
        .heritage(Kind::Subclassification, "Safe");
    tree.start(Kind::SubjectMembership)
        .start(Kind::ReferenceUsage)
        .named("vehicle")
        .finish()
        .finish();
    tree.end_member();
    tree.end_member();
    add_and_link(&mut b, "models/requirements.sysml", tree.build());

    let vehicle = find(&mut b, "Model::Safer::vehicle");
    let system = find(&mut b, "Model::Safe::system");
    assert_eq!(redefinitions_of(&b, vehicle), vec![(system, true)]);
}
