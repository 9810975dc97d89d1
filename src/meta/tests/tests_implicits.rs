#![allow(clippy::unwrap_used)]
use crate::meta::{ImplicitIndex, Kind, KindIndex, ROLE_BASE, ROLE_SOURCE, ROLE_TARGET};

fn index() -> (KindIndex, ImplicitIndex) {
    let kinds = KindIndex::new();
    let implicits = ImplicitIndex::new(&kinds);
    (kinds, implicits)
}

#[test]
fn direct_entries_resolve() {
    let (_, implicits) = index();
    assert_eq!(implicits.base(Kind::PartUsage), Some("Parts::parts"));
    assert_eq!(implicits.base(Kind::PartDefinition), Some("Parts::Part"));
    assert_eq!(implicits.base(Kind::Feature), Some("Base::things"));
    assert_eq!(implicits.base(Kind::Classifier), Some("Base::Anything"));
}

#[test]
fn inherited_entries_resolve_through_the_hierarchy() {
    let (_, implicits) = index();
    // EnumerationUsage declares nothing; AttributeUsage's mapping applies.
    assert_eq!(implicits.base(Kind::EnumerationUsage), Some("Base::dataValues"));
    // SendActionUsage inherits through AcceptActionUsage → ActionUsage.
    assert_eq!(implicits.base(Kind::SendActionUsage), Some("Actions::actions"));
    // ViewpointDefinition inherits the requirement mapping.
    assert_eq!(
        implicits.base(Kind::ViewpointDefinition),
        Some("Requirements::RequirementCheck")
    );
}

#[test]
fn specific_kind_overrides_inherited_role() {
    let (_, implicits) = index();
    // ConnectionUsage overrides the Connector-level base …
    assert_eq!(
        implicits.base(Kind::ConnectionUsage),
        Some("Connections::connections")
    );
    assert_eq!(implicits.base(Kind::Connector), Some("Links::links"));
    // … and its end roles shadow the Connector-level participant ends.
    assert_eq!(
        implicits.get(Kind::ConnectionUsage, ROLE_SOURCE),
        Some("Connections::Connection::source")
    );
    assert_eq!(
        implicits.get(Kind::Connector, ROLE_SOURCE),
        Some("Links::Link::participant")
    );
}

#[test]
fn unrelated_ancestor_roles_survive_an_override() {
    let (_, implicits) = index();
    // InterfaceUsage overrides only the base role; the end roles from
    // ConnectionUsage remain visible.
    assert_eq!(
        implicits.base(Kind::InterfaceUsage),
        Some("Interfaces::interfaces")
    );
    assert_eq!(
        implicits.get(Kind::InterfaceUsage, ROLE_TARGET),
        Some("Connections::Connection::target")
    );
}

#[test]
fn absent_means_no_implicit_relationship() {
    let (_, implicits) = index();
    assert_eq!(implicits.get(Kind::Package, ROLE_BASE), None);
    assert_eq!(implicits.get(Kind::Membership, ROLE_BASE), None);
    assert_eq!(implicits.get(Kind::PartUsage, "noSuchRole"), None);
}
