#![allow(clippy::unwrap_used)]
use crate::base::LangId;
use crate::build::ModelBuilder;
use crate::meta::Kind;
use crate::syntax::SyntaxTreeBuilder;

/// Two unrelated documents each export a type `K1`.
fn two_k1_documents(b: &mut ModelBuilder) -> (crate::base::DocumentId, crate::base::DocumentId) {
    let mut kerml = SyntaxTreeBuilder::new();
    kerml.member(Kind::Classifier).named("K1").end_member();
    let first = b.add_document("models/first.kerml", kerml.build());

    let mut sysml = SyntaxTreeBuilder::new();
    sysml.member(Kind::PartDefinition).named("K1").end_member();
    let second = b.add_document("models/second.sysml", sysml.build());

    (first, second)
}

#[test]
fn ambiguous_export_resolves_last_registered_wins() {
    let mut b = ModelBuilder::new();
    let (_, second) = two_k1_documents(&mut b);

    let entry = b.global().get_exported_element("K1", None).unwrap();
    let (document, element) = (entry.document, entry.element);
    assert_eq!(document, second);
    assert_eq!(
        b.arena_mut().qualified_name(element).as_deref(),
        Some("K1")
    );
}

#[test]
fn language_filter_disambiguates_by_document_extension() {
    let mut b = ModelBuilder::new();
    let (first, second) = two_k1_documents(&mut b);

    let kerml = b.global().get_exported_element("K1", Some(LangId::Kerml)).unwrap();
    assert_eq!(kerml.document, first);
    assert_eq!(kerml.lang, LangId::Kerml);

    let sysml = b.global().get_exported_element("K1", Some(LangId::Sysml)).unwrap();
    assert_eq!(sysml.document, second);
}

#[test]
fn invalidation_removes_exactly_one_documents_exports() {
    let mut b = ModelBuilder::new();

    let mut t1 = SyntaxTreeBuilder::new();
    t1.member(Kind::Package).named("Alpha").end_member();
    t1.member(Kind::Package).named("Shared").end_member();
    let d1 = b.add_document("models/a.sysml", t1.build());

    let mut t2 = SyntaxTreeBuilder::new();
    t2.member(Kind::Package).named("Beta").end_member();
    t2.member(Kind::Package).named("Shared").end_member();
    let d2 = b.add_document("models/b.sysml", t2.build());

    let mut t3 = SyntaxTreeBuilder::new();
    t3.member(Kind::Package).named("Gamma").end_member();
    let d3 = b.add_document("models/c.sysml", t3.build());

    assert_eq!(b.global().entries_for("Shared").len(), 2);
    b.invalidate_documents(&[d2]);

    // Beta is gone, everything else intact with order preserved.
    assert!(b.global().get_exported_element("Beta", None).is_none());
    assert_eq!(b.global().entries_for("Shared").len(), 1);
    assert_eq!(b.global().entries_for("Shared")[0].document, d1);
    assert_eq!(
        b.global().get_exported_element("Alpha", None).unwrap().document,
        d1
    );
    assert_eq!(
        b.global().get_exported_element("Gamma", None).unwrap().document,
        d3
    );
}

#[test]
fn private_root_members_are_not_exported() {
    let mut b = ModelBuilder::new();
    let mut tree = SyntaxTreeBuilder::new();
    tree.member(Kind::Package)
        .named("Hidden")
        .finish() // back to the membership
        .visibility(crate::base::Visibility::Private)
        .finish();
    let _ = b.add_document("models/hidden.sysml", tree.build());
    assert!(b.global().get_exported_element("Hidden", None).is_none());
}
