#![allow(clippy::unwrap_used)]
use tokio_util::sync::CancellationToken;

use crate::base::{DocumentId, ElementId};
use crate::build::ModelBuilder;
use crate::library;
use crate::meta::Kind;
use crate::model::SetupState;
use crate::syntax::SyntaxTreeBuilder;

fn find(b: &mut ModelBuilder, qualified: &str) -> ElementId {
    b.find_global(qualified)
        .unwrap_or_else(|| panic!("'{qualified}' not found"))
}

fn add_and_link(b: &mut ModelBuilder, uri: &str, tree: crate::syntax::SyntaxTree) -> DocumentId {
    let doc = b.add_document(uri, tree);
    b.pre_link_document(doc, &CancellationToken::new());
    doc
}

#[test]
fn implicit_specialization_attaches_the_library_base() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::PartDefinition).named("Vehicle").end_member();
    tree.end_member();
    let _ = add_and_link(&mut b, "models/vehicle.sysml", tree.build());

    let vehicle = find(&mut b, "Model::Vehicle");
    let part = find(&mut b, "Parts::Part");
    assert!(b.arena_mut().all_supertypes(vehicle).contains(&part));

    // The synthesized edge is flagged implied, and there is exactly one.
    let implied: Vec<_> = b
        .arena()
        .heritage_of(vehicle)
        .into_iter()
        .filter(|&e| b.arena().get(e).is_implied())
        .collect();
    assert_eq!(implied.len(), 1);
    assert_eq!(b.arena().kind(implied[0]), Kind::Subclassification);
}

#[test]
fn explicit_specialization_suppresses_the_implicit_edge() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::PartDefinition).named("Vehicle").end_member();
    tree.member(Kind::PartDefinition)
        .named("Car")
        .heritage(Kind::Subclassification, "Vehicle");
    tree.end_member();
    tree.end_member();
    let _ = add_and_link(&mut b, "models/cars.sysml", tree.build());

    let car = find(&mut b, "Model::Car");
    let vehicle = find(&mut b, "Model::Vehicle");
    let part = find(&mut b, "Parts::Part");

    // Car still reaches Part, but only transitively through Vehicle.
    assert!(b.arena_mut().all_supertypes(car).contains(&part));
    assert!(
        b.arena()
            .heritage_of(car)
            .iter()
            .all(|&e| !b.arena().get(e).is_implied()),
        "no implied edge expected on Car"
    );
    assert!(b.arena_mut().all_supertypes(car).contains(&vehicle));
}

#[test]
fn pre_link_is_idempotent() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::PartUsage).named("wheel").end_member();
    tree.end_member();
    let doc = add_and_link(&mut b, "models/wheels.sysml", tree.build());

    let wheel = find(&mut b, "Model::wheel");
    let heritage_before = b.arena().heritage_of(wheel);
    let children_before = b.arena().get(wheel).children.len();

    // Linking again must be a no-op.
    b.pre_link_document(doc, &CancellationToken::new());
    b.pre_link(wheel);
    assert_eq!(b.arena().heritage_of(wheel), heritage_before);
    assert_eq!(b.arena().get(wheel).children.len(), children_before);
}

#[test]
fn cyclic_specialization_terminates_and_completes() {
    let mut b = ModelBuilder::new();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Cycle");
    tree.member(Kind::Classifier)
        .named("A")
        .heritage(Kind::Subclassification, "B");
    tree.end_member();
    tree.member(Kind::Classifier)
        .named("B")
        .heritage(Kind::Subclassification, "A");
    tree.end_member();
    tree.end_member();
    let doc = add_and_link(&mut b, "models/cycle.sysml", tree.build());

    let a = find(&mut b, "Cycle::A");
    let b_elem = find(&mut b, "Cycle::B");
    assert_eq!(b.arena().get(a).setup_state(), SetupState::Completed);
    assert_eq!(b.arena().get(b_elem).setup_state(), SetupState::Completed);

    // Each reaches the other exactly once.
    let sups = b.arena_mut().all_supertypes(a);
    assert_eq!(sups.iter().filter(|&&s| s == b_elem).count(), 1);
    assert!(sups.contains(&b_elem));
    assert!(b.arena_mut().all_supertypes(b_elem).contains(&a));
    let _ = doc;
}

#[test]
fn usage_typed_by_definition_links_both_edges() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::PartDefinition).named("Wheel").end_member();
    tree.member(Kind::PartUsage)
        .named("front")
        .heritage(Kind::FeatureTyping, "Wheel");
    tree.end_member();
    tree.end_member();
    let _ = add_and_link(&mut b, "models/typed.sysml", tree.build());

    let front = find(&mut b, "Model::front");
    let wheel = find(&mut b, "Model::Wheel");
    let parts = find(&mut b, "Parts::parts");

    let sups = b.arena_mut().all_supertypes(front);
    assert!(sups.contains(&wheel), "explicit typing");
    assert!(sups.contains(&parts), "implicit subsetting");
}

#[test]
fn missing_library_degrades_to_a_diagnostic() {
    // No library installed: implicit linking cannot find Parts::parts.
    let mut b = ModelBuilder::new();
    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::PartUsage).named("wheel").end_member();
    tree.end_member();
    let doc = add_and_link(&mut b, "models/bare.sysml", tree.build());

    let wheel = find(&mut b, "Model::wheel");
    assert_eq!(b.arena().get(wheel).setup_state(), SetupState::Completed);
    assert!(
        b.diagnostics(doc)
            .iter()
            .any(|d| d.message.contains("Parts::parts")),
        "expected a library-lookup diagnostic"
    );
}

#[test]
fn multiplicity_bounds_evaluate_lazily_and_memoize() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::PartUsage).named("wheels");
    tree.start(Kind::MultiplicityRange);
    tree.start(Kind::LiteralInteger)
        .literal(crate::syntax::LiteralValue::Int(4))
        .finish();
    tree.finish();
    tree.end_member();
    tree.member(Kind::PartUsage).named("passengers");
    tree.start(Kind::MultiplicityRange);
    tree.start(Kind::LiteralInteger)
        .literal(crate::syntax::LiteralValue::Int(0))
        .finish();
    tree.start(Kind::LiteralInfinity).finish();
    tree.finish();
    tree.end_member();
    tree.end_member();
    let _ = add_and_link(&mut b, "models/bounds.sysml", tree.build());

    let wheels = find(&mut b, "Model::wheels");
    let range = b.arena().get(wheels).children
        .iter()
        .copied()
        .find(|&c| b.arena().kind(c) == Kind::MultiplicityRange)
        .unwrap();
    assert_eq!(b.multiplicity_bounds(range), (Some(4), Some(4)));
    // Memoized: second access returns the cached pair.
    assert_eq!(b.multiplicity_bounds(range), (Some(4), Some(4)));

    let passengers = find(&mut b, "Model::passengers");
    let range = b.arena().get(passengers).children
        .iter()
        .copied()
        .find(|&c| b.arena().kind(c) == Kind::MultiplicityRange)
        .unwrap();
    assert_eq!(b.multiplicity_bounds(range), (Some(0), Some(i64::MAX)));
}

#[test]
fn metaclass_resolves_and_synthesizes_the_annotation() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::PartUsage).named("wheel").end_member();
    tree.end_member();
    let _ = add_and_link(&mut b, "models/meta.sysml", tree.build());

    let wheel = find(&mut b, "Model::wheel");
    let metaclass = b.metaclass(wheel).expect("metaclass resolves");
    assert_eq!(
        b.arena_mut().qualified_name(metaclass).as_deref(),
        Some("SysML::PartUsage")
    );

    // The annotation is in place and listed after explicit metadata.
    let annotation = b.arena().get(wheel).metaclass_feature().unwrap();
    assert_eq!(b.arena().metadata_of(wheel).last().copied(), Some(annotation));
    // Resolution is memoized.
    assert_eq!(b.metaclass(wheel), Some(metaclass));
}

#[test]
fn on_changed_keeps_identity_and_relinks() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::PartDefinition).named("Vehicle").end_member();
    tree.member(Kind::PartDefinition).named("Boat").end_member();
    tree.end_member();
    let doc = add_and_link(&mut b, "models/edit.sysml", tree.build());

    let vehicle = find(&mut b, "Model::Vehicle");
    assert!(!b.arena().heritage_of(vehicle).is_empty());

    // Re-parse without Boat: Vehicle keeps its element id, loses implied
    // heritage until re-linked.
    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::PartDefinition).named("Vehicle").end_member();
    tree.end_member();
    b.on_changed(doc, tree.build());

    let vehicle_after = find(&mut b, "Model::Vehicle");
    assert_eq!(vehicle_after, vehicle, "identity preserved across edits");
    assert_eq!(b.arena().get(vehicle).setup_state(), SetupState::None);
    assert!(
        b.arena()
            .heritage_of(vehicle)
            .iter()
            .all(|&e| !b.arena().get(e).is_implied()),
        "implied heritage cleared on invalidation"
    );
    assert!(b.find_global("Model::Boat").is_none());

    b.pre_link_document(doc, &CancellationToken::new());
    let part = find(&mut b, "Parts::Part");
    assert!(b.arena_mut().all_supertypes(vehicle).contains(&part));
}

#[test]
fn cancellation_stops_between_nodes() {
    let mut b = library::standard_builder();

    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::PartDefinition).named("Vehicle").end_member();
    tree.end_member();
    let doc = b.add_document("models/cancelled.sysml", tree.build());

    let cancel = CancellationToken::new();
    cancel.cancel();
    b.pre_link_document(doc, &cancel);

    let vehicle = find(&mut b, "Model::Vehicle");
    assert_eq!(b.arena().get(vehicle).setup_state(), SetupState::None);
}

#[test]
fn semantic_metadata_drives_value_dependent_specialization() {
    let mut b = library::standard_builder();

    // SafetyMeta is semantic metadata whose baseType names Model::Base.
    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Model");
    tree.member(Kind::PartDefinition).named("Base").end_member();
    tree.member(Kind::MetadataDefinition)
        .named("SafetyMeta")
        .heritage(Kind::Subclassification, "Metaobjects::SemanticMetadata");
    tree.member(Kind::Feature).named("baseType");
    tree.start(Kind::FeatureReferenceExpression).target("Base").finish();
    tree.end_member();
    tree.end_member();
    // Drone is annotated with SafetyMeta.
    tree.member(Kind::PartDefinition).named("Drone");
    tree.start(Kind::MetadataFeature)
        .heritage(Kind::FeatureTyping, "SafetyMeta")
        .finish();
    tree.end_member();
    tree.end_member();
    let _ = add_and_link(&mut b, "models/metadata.sysml", tree.build());

    let drone = find(&mut b, "Model::Drone");
    let base = find(&mut b, "Model::Base");
    assert!(
        b.arena_mut().all_supertypes(drone).contains(&base),
        "metadata-conditioned specialization attached"
    );
}
