#![allow(clippy::unwrap_used)]
use rustc_hash::FxHashMap;

use crate::meta::{ChainOrder, Kind, KindIndex};

fn index() -> KindIndex {
    KindIndex::new()
}

#[test]
fn is_subtype_reflexive_and_transitive() {
    let kinds = index();
    assert!(kinds.is_subtype(Kind::Feature, Kind::Feature));
    assert!(kinds.is_subtype(Kind::Redefinition, Kind::Subsetting));
    assert!(kinds.is_subtype(Kind::Redefinition, Kind::Specialization));
    assert!(kinds.is_subtype(Kind::Redefinition, Kind::Relationship));
    assert!(kinds.is_subtype(Kind::PartUsage, Kind::Feature));
    assert!(!kinds.is_subtype(Kind::Specialization, Kind::Redefinition));
    assert!(!kinds.is_subtype(Kind::Classifier, Kind::Feature));
}

#[test]
fn multiple_inheritance_reaches_both_parents() {
    let kinds = index();
    // Connector is both a feature and a relationship.
    assert!(kinds.is_subtype(Kind::Connector, Kind::Feature));
    assert!(kinds.is_subtype(Kind::Connector, Kind::Relationship));
    // ConnectionUsage reaches Link-land through ConnectorAsUsage and
    // part-land through PartUsage.
    assert!(kinds.is_subtype(Kind::ConnectionUsage, Kind::Connector));
    assert!(kinds.is_subtype(Kind::ConnectionUsage, Kind::ItemUsage));
}

#[test]
fn chain_starts_with_self_and_orders_most_specialized_first() {
    let kinds = index();
    let chain = kinds.chain_of(Kind::DataType);
    assert_eq!(chain[0], Kind::DataType);
    let pos = |k: Kind| chain.iter().position(|&c| c == k).unwrap();
    assert!(pos(Kind::Classifier) < pos(Kind::Type));
    assert!(pos(Kind::Type) < pos(Kind::Namespace));
    assert!(pos(Kind::Namespace) < pos(Kind::Element));
}

#[test]
fn relationship_ancestors_stay_more_specific_than_their_supertypes() {
    let kinds = index();
    // ItemFlow: Connector (a relationship kind) must rank before
    // Relationship itself, and both after the true type ancestors merge.
    let chain = kinds.chain_of(Kind::ItemFlow);
    let pos = |k: Kind| chain.iter().position(|&c| c == k).unwrap();
    assert!(pos(Kind::Connector) < pos(Kind::Relationship));

    // A pure relationship kind keeps its own lineage most-specific-first.
    let chain = kinds.chain_of(Kind::Redefinition);
    let pos = |k: Kind| chain.iter().position(|&c| c == k).unwrap();
    assert!(pos(Kind::Subsetting) < pos(Kind::Specialization));
    assert!(pos(Kind::Specialization) < pos(Kind::Relationship));
    assert!(pos(Kind::Relationship) < pos(Kind::Element));
}

#[test]
fn union_marker_sits_between_members_and_their_supertypes() {
    let kinds = index();
    let chain = kinds.chain_of(Kind::OperatorExpression);
    let pos = |k: Kind| chain.iter().position(|&c| c == k).unwrap();
    assert!(pos(Kind::InvocationExpression) < pos(Kind::InlineExpression));
    assert!(pos(Kind::InlineExpression) < pos(Kind::Expression));
}

#[test]
fn expand_to_derived_most_specific_wins() {
    let kinds = index();
    let mut sparse: FxHashMap<Kind, &str> = FxHashMap::default();
    sparse.insert(Kind::Classifier, "general");
    sparse.insert(Kind::Structure, "specific");
    let dense = kinds.expand_to_derived(&sparse, None);

    // Subtypes of Structure take the specific entry…
    assert_eq!(dense[&Kind::Structure], "specific");
    assert_eq!(dense[&Kind::PartDefinition], "specific");
    // …subtypes of Classifier that are not under Structure take the general
    // one…
    assert_eq!(dense[&Kind::DataType], "general");
    assert_eq!(dense[&Kind::Behavior], "general");
    // …and kinds outside the registry are absent.
    assert!(!dense.contains_key(&Kind::Package));
}

#[test]
fn expand_to_derived_falls_back_to_default() {
    let kinds = index();
    let mut sparse: FxHashMap<Kind, i32> = FxHashMap::default();
    sparse.insert(Kind::Feature, 1);
    let dense = kinds.expand_to_derived(&sparse, Some(&0));
    assert_eq!(dense[&Kind::PartUsage], 1);
    assert_eq!(dense[&Kind::Package], 0);
    assert_eq!(dense[&Kind::Membership], 0);
}

#[test]
fn expand_to_derived_union_marker_beats_abstract_ancestor() {
    let kinds = index();
    let mut sparse: FxHashMap<Kind, &str> = FxHashMap::default();
    sparse.insert(Kind::Expression, "expression");
    sparse.insert(Kind::InlineExpression, "inline");
    let dense = kinds.expand_to_derived(&sparse, None);
    assert_eq!(dense[&Kind::OperatorExpression], "inline");
    assert_eq!(dense[&Kind::FeatureReferenceExpression], "inline");
    // NullExpression is not a member of the marker.
    assert_eq!(dense[&Kind::NullExpression], "expression");
}

#[test]
fn chain_registry_supertype_first_orders_general_to_specific() {
    let kinds = index();
    let mut sparse: FxHashMap<Kind, &str> = FxHashMap::default();
    sparse.insert(Kind::Type, "G");
    sparse.insert(Kind::Classifier, "M");
    sparse.insert(Kind::DataType, "S");

    let chains = kinds.chain_registry(&sparse, ChainOrder::SupertypeFirst, None);
    assert_eq!(chains[&Kind::DataType], vec!["G", "M", "S"]);
    assert_eq!(chains[&Kind::AttributeDefinition], vec!["G", "M", "S"]);
    assert_eq!(chains[&Kind::Classifier], vec!["G", "M"]);

    let chains = kinds.chain_registry(&sparse, ChainOrder::SubtypeFirst, None);
    assert_eq!(chains[&Kind::DataType], vec!["S", "M", "G"]);
}

#[test]
fn chain_registry_default_takes_the_most_general_position() {
    let kinds = index();
    let mut sparse: FxHashMap<Kind, &str> = FxHashMap::default();
    sparse.insert(Kind::Feature, "feature");

    let chains = kinds.chain_registry(&sparse, ChainOrder::SupertypeFirst, Some(&"any"));
    assert_eq!(chains[&Kind::PartUsage], vec!["any", "feature"]);
    let chains = kinds.chain_registry(&sparse, ChainOrder::SubtypeFirst, Some(&"any"));
    assert_eq!(chains[&Kind::PartUsage], vec!["feature", "any"]);
}

#[test]
fn expand_and_merge_concatenates_ancestor_lists() {
    let kinds = index();
    let mut sparse: FxHashMap<Kind, Vec<&str>> = FxHashMap::default();
    sparse.insert(Kind::Type, vec!["t1", "t2"]);
    sparse.insert(Kind::Classifier, vec!["c"]);

    let merged = kinds.expand_and_merge(&sparse, false);
    // Own/most-specific entries first.
    assert_eq!(merged[&Kind::Classifier], vec!["c", "t1", "t2"]);
    assert_eq!(merged[&Kind::DataType], vec!["c", "t1", "t2"]);

    let merged = kinds.expand_and_merge(&sparse, true);
    assert_eq!(merged[&Kind::Classifier], vec!["t1", "t2", "c"]);
}

#[test]
fn subtypes_of_enumerates_strict_subtypes() {
    let kinds = index();
    let subs: Vec<Kind> = kinds.subtypes_of(Kind::LoopActionUsage).collect();
    assert!(subs.contains(&Kind::WhileLoopActionUsage));
    assert!(subs.contains(&Kind::ForLoopActionUsage));
    assert!(!subs.contains(&Kind::LoopActionUsage));
}
