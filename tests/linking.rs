//! End-to-end: library plus a user model through both build phases.

use tokio_util::sync::CancellationToken;

use sylink::Kind;
use sylink::build::ModelBuilder;
use sylink::eval::Value;
use sylink::library;
use sylink::syntax::{FeatureDirection, LiteralValue, SyntaxTreeBuilder};

fn vehicle_model() -> sylink::syntax::SyntaxTree {
    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Vehicles");

    tree.member(Kind::PartDefinition).named("Wheel").end_member();

    tree.member(Kind::PartDefinition).named("Vehicle");
    tree.member(Kind::PartUsage)
        .named("wheels")
        .heritage(Kind::FeatureTyping, "Wheel");
    tree.end_member();
    tree.member(Kind::AttributeUsage).named("wheelCount");
    tree.start(Kind::LiteralInteger)
        .literal(LiteralValue::Int(4))
        .finish();
    tree.end_member();
    tree.end_member();

    tree.member(Kind::ActionDefinition).named("Drive");
    tree.member(Kind::ReferenceUsage)
        .named("speed")
        .direction(FeatureDirection::In);
    tree.end_member();
    tree.end_member();

    tree.end_member();
    tree.build()
}

fn linked_builder() -> (ModelBuilder, sylink::DocumentId) {
    let mut builder = library::standard_builder();
    let document = builder.add_document("models/vehicles.sysml", vehicle_model());
    builder.pre_link_document(document, &CancellationToken::new());
    (builder, document)
}

#[test]
fn user_model_links_against_the_library() {
    let (mut b, document) = linked_builder();

    let vehicle = b.find_global("Vehicles::Vehicle").expect("Vehicle");
    let part = b.find_global("Parts::Part").expect("Part");
    let supertypes = b.arena_mut().all_supertypes(vehicle);
    assert!(supertypes.contains(&part), "implicit definition base");

    let wheels = b.find_global("Vehicles::Vehicle::wheels").expect("wheels");
    let wheel = b.find_global("Vehicles::Wheel").expect("Wheel");
    let parts = b.find_global("Parts::parts").expect("parts");
    let supertypes = b.arena_mut().all_supertypes(wheels);
    assert!(supertypes.contains(&wheel), "explicit typing");
    assert!(supertypes.contains(&parts), "implicit usage base");

    assert!(
        b.diagnostics(document).is_empty(),
        "unexpected diagnostics: {:?}",
        b.diagnostics(document)
    );
}

#[test]
fn qualified_names_follow_the_ownership_tree() {
    let (mut b, _) = linked_builder();
    let wheels = b.find_global("Vehicles::Vehicle::wheels").expect("wheels");
    assert_eq!(
        b.arena_mut().qualified_name(wheels).as_deref(),
        Some("Vehicles::Vehicle::wheels")
    );
}

#[test]
fn attribute_values_evaluate_through_the_public_entry() {
    let (mut b, _) = linked_builder();
    let attribute = b
        .find_global("Vehicles::Vehicle::wheelCount")
        .expect("wheelCount");
    let value = b
        .arena()
        .get(attribute)
        .feature_facet()
        .and_then(|f| f.value)
        .expect("bound value");
    let result = b.evaluate(value.expression, attribute).expect("evaluates");
    assert_eq!(result, vec![Value::Number(4.0)]);
}

#[test]
fn relinking_the_whole_workspace_is_stable() {
    let (mut b, document) = linked_builder();
    let vehicle = b.find_global("Vehicles::Vehicle").expect("Vehicle");
    let heritage = b.arena().heritage_of(vehicle);

    b.pre_link_document(document, &CancellationToken::new());
    assert_eq!(b.arena().heritage_of(vehicle), heritage);
}

#[test]
fn library_is_linked_by_the_same_engine() {
    let mut b = library::standard_builder();
    let things = b.find_global("Base::things").expect("things");
    let anything = b.find_global("Base::Anything").expect("Anything");
    assert!(b.arena_mut().all_supertypes(things).contains(&anything));

    // The systems layer reaches the kernel layer.
    let parts = b.find_global("Parts::parts").expect("parts");
    let supertypes = b.arena_mut().all_supertypes(parts);
    let part = b.find_global("Parts::Part").expect("Part");
    assert!(supertypes.contains(&part));
}
