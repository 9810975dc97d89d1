#![allow(clippy::unwrap_used)]
use tokio_util::sync::CancellationToken;

use crate::build::ModelBuilder;
use crate::meta::Kind;
use crate::scope::{ReferenceResolver, Resolver};
use crate::syntax::SyntaxTreeBuilder;

fn linked_builder(trees: Vec<(&str, crate::syntax::SyntaxTree)>) -> ModelBuilder {
    let mut b = ModelBuilder::new();
    let cancel = CancellationToken::new();
    let docs: Vec<_> = trees
        .into_iter()
        .map(|(uri, tree)| b.add_document(uri, tree))
        .collect();
    for doc in docs {
        b.pre_link_document(doc, &cancel);
    }
    b
}

#[test]
fn qualified_names_resolve_through_nested_packages() {
    let mut outer = SyntaxTreeBuilder::new();
    outer.member(Kind::Package).named("Outer");
    outer.member(Kind::Package).named("Inner");
    outer.member(Kind::Classifier).named("Thing").end_member();
    outer.end_member();
    outer.end_member();

    let mut b = linked_builder(vec![("models/outer.sysml", outer.build())]);
    let resolver = Resolver::new();
    let lang = crate::base::LangId::Sysml;

    let root = b.document(crate::base::DocumentId(0)).unwrap().root.unwrap();
    let ModelBuilder { arena, global, .. } = &mut b;
    let found = resolver
        .link_reference(arena, global, root, "Outer::Inner::Thing", lang)
        .unwrap();
    assert_eq!(arena.qualified_name(found).as_deref(), Some("Outer::Inner::Thing"));
}

#[test]
fn inherited_members_resolve_through_heritage() {
    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("P");
    tree.member(Kind::Classifier).named("General");
    tree.member(Kind::Feature).named("shared").end_member();
    tree.end_member();
    tree.member(Kind::Classifier)
        .named("Specific")
        .heritage(Kind::Subclassification, "General");
    tree.end_member();
    tree.end_member();

    let mut b = linked_builder(vec![("models/p.sysml", tree.build())]);
    let resolver = Resolver::new();
    let lang = crate::base::LangId::Sysml;

    let ModelBuilder { arena, global, .. } = &mut b;
    let specific = resolver
        .find_global_element(arena, global, "P::Specific", None)
        .unwrap();
    let found = resolver
        .link_reference(arena, global, specific, "shared", lang)
        .unwrap();
    assert_eq!(arena.qualified_name(found).as_deref(), Some("P::General::shared"));
}

#[test]
fn wildcard_imports_expose_members() {
    let mut lib = SyntaxTreeBuilder::new();
    lib.member(Kind::Package).named("Lib");
    lib.member(Kind::Classifier).named("Widget").end_member();
    lib.end_member();

    let mut user = SyntaxTreeBuilder::new();
    user.member(Kind::Package).named("User");
    user.start(Kind::NamespaceImport)
        .target("Lib")
        .import_spec(true, false)
        .finish();
    user.member(Kind::Classifier)
        .named("MyWidget")
        .heritage(Kind::Subclassification, "Widget");
    user.end_member();
    user.end_member();

    let mut b = linked_builder(vec![
        ("models/lib.sysml", lib.build()),
        ("models/user.sysml", user.build()),
    ]);

    let resolver = Resolver::new();
    let ModelBuilder { arena, global, .. } = &mut b;
    let my_widget = resolver
        .find_global_element(arena, global, "User::MyWidget", None)
        .unwrap();
    let supertypes = arena.all_supertypes(my_widget);
    let widget = resolver
        .find_global_element(arena, global, "Lib::Widget", None)
        .unwrap();
    assert!(supertypes.contains(&widget));
}

#[test]
fn unresolved_references_return_none() {
    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package).named("Lonely").end_member();
    let mut b = linked_builder(vec![("models/lonely.sysml", tree.build())]);

    let resolver = Resolver::new();
    let root = b.document(crate::base::DocumentId(0)).unwrap().root.unwrap();
    let ModelBuilder { arena, global, .. } = &mut b;
    assert!(
        resolver
            .link_reference(arena, global, root, "NoSuchThing", crate::base::LangId::Sysml)
            .is_none()
    );
}
