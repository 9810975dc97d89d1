//! Built-in standard library model content.
//!
//! Implicit linking resolves against a fixed set of well-known qualified
//! names; this module constructs the minimal core library that provides
//! them, as ordinary documents pushed through the public build pipeline —
//! the library is linked by the same engine as user models.
//!
//! The two reflection packages (`KerML`, `SysML`) carry one metaclass
//! element per kind name for the metaclass-assignment rule.

use rustc_hash::FxHashSet;

use crate::base::DocumentId;
use crate::build::ModelBuilder;
use crate::meta::{ALL_KINDS, Kind, metaclass_name};
use crate::syntax::{SyntaxTree, SyntaxTreeBuilder};

/// Install the core library into a builder. Returns the library documents
/// in registration order.
pub fn install(builder: &mut ModelBuilder) -> Vec<DocumentId> {
    let mut documents = Vec::new();
    documents.push(builder.add_document("library/Base.kerml", base_package()));
    documents.push(builder.add_document("library/Links.kerml", links_package()));
    documents.push(builder.add_document("library/Occurrences.kerml", occurrences_package()));
    documents.push(builder.add_document("library/Objects.kerml", objects_package()));
    documents.push(builder.add_document("library/Performances.kerml", performances_package()));
    documents.push(builder.add_document("library/Transfers.kerml", transfers_package()));
    documents.push(builder.add_document("library/Metaobjects.kerml", metaobjects_package()));
    documents.push(builder.add_document("library/Items.sysml", items_package()));
    documents.push(builder.add_document("library/Parts.sysml", parts_package()));
    documents.push(builder.add_document("library/Ports.sysml", ports_package()));
    documents.push(builder.add_document("library/Actions.sysml", actions_package()));
    documents.push(builder.add_document("library/States.sysml", states_package()));
    documents.push(builder.add_document("library/Calculations.sysml", calculations_package()));
    documents.push(builder.add_document("library/Constraints.sysml", constraints_package()));
    documents.push(builder.add_document("library/Requirements.sysml", requirements_package()));
    documents.push(builder.add_document("library/Cases.sysml", cases_package()));
    documents.push(builder.add_document("library/Connections.sysml", connections_package()));
    documents.push(builder.add_document("library/Interfaces.sysml", interfaces_package()));
    documents.push(builder.add_document("library/Allocations.sysml", allocations_package()));
    documents.push(builder.add_document(
        "library/KerML.kerml",
        reflection_package("KerML", false),
    ));
    documents.push(builder.add_document(
        "library/SysML.sysml",
        reflection_package("SysML", true),
    ));
    documents
}

/// A builder with the core library installed and pre-linked.
pub fn standard_builder() -> ModelBuilder {
    let mut builder = ModelBuilder::new();
    let documents = install(&mut builder);
    let cancel = tokio_util::sync::CancellationToken::new();
    for document in documents {
        builder.pre_link_document(document, &cancel);
    }
    builder
}

// ----------------------------------------------------------------------
// Kernel library
// ----------------------------------------------------------------------

fn base_package() -> SyntaxTree {
    let mut b = SyntaxTreeBuilder::new();
    b.member(Kind::LibraryPackage).named("Base");

    b.member(Kind::Classifier).named("Anything").abstract_();
    b.member(Kind::Feature).named("self").end_member();
    b.end_member();

    b.member(Kind::Feature)
        .named("things")
        .abstract_()
        .heritage(Kind::FeatureTyping, "Anything");
    b.end_member();

    b.member(Kind::DataType)
        .named("DataValue")
        .abstract_()
        .heritage(Kind::Subclassification, "Anything");
    b.end_member();

    b.member(Kind::Feature)
        .named("dataValues")
        .abstract_()
        .heritage(Kind::FeatureTyping, "DataValue")
        .heritage(Kind::Subsetting, "things");
    b.end_member();

    b.member(Kind::Feature)
        .named("naturals")
        .heritage(Kind::Subsetting, "dataValues");
    b.end_member();

    b.member(Kind::Multiplicity).named("exactlyOne").end_member();

    b.end_member();
    b.build()
}

fn links_package() -> SyntaxTree {
    let mut b = SyntaxTreeBuilder::new();
    b.member(Kind::LibraryPackage).named("Links");

    b.member(Kind::Association).named("Link").abstract_();
    b.member(Kind::Feature).named("participant").end_member();
    b.end_member();

    b.member(Kind::Connector)
        .named("links")
        .abstract_()
        .heritage(Kind::FeatureTyping, "Link");
    b.end_member();

    b.member(Kind::Connector)
        .named("selfLinks")
        .abstract_()
        .heritage(Kind::Subsetting, "links");
    b.end_member();

    b.end_member();
    b.build()
}

fn occurrences_package() -> SyntaxTree {
    let mut b = SyntaxTreeBuilder::new();
    b.member(Kind::LibraryPackage).named("Occurrences");

    b.member(Kind::Class).named("Occurrence").abstract_().end_member();

    b.member(Kind::Feature)
        .named("occurrences")
        .abstract_()
        .heritage(Kind::FeatureTyping, "Occurrence");
    b.end_member();

    b.member(Kind::Succession)
        .named("happensBeforeLinks")
        .abstract_();
    b.end_member();

    b.end_member();
    b.build()
}

fn objects_package() -> SyntaxTree {
    let mut b = SyntaxTreeBuilder::new();
    b.member(Kind::LibraryPackage).named("Objects");

    b.member(Kind::Structure)
        .named("Object")
        .abstract_()
        .heritage(Kind::Subclassification, "Occurrences::Occurrence");
    b.end_member();

    b.member(Kind::AssociationStructure)
        .named("LinkObject")
        .abstract_()
        .heritage(Kind::Subclassification, "Links::Link");
    b.end_member();

    b.member(Kind::Feature)
        .named("objects")
        .abstract_()
        .heritage(Kind::FeatureTyping, "Object");
    b.end_member();

    b.end_member();
    b.build()
}

fn performances_package() -> SyntaxTree {
    let mut b = SyntaxTreeBuilder::new();
    b.member(Kind::LibraryPackage).named("Performances");

    b.member(Kind::Behavior)
        .named("Performance")
        .abstract_()
        .heritage(Kind::Subclassification, "Occurrences::Occurrence");
    b.end_member();

    b.member(Kind::Step)
        .named("performances")
        .abstract_()
        .heritage(Kind::FeatureTyping, "Performance");
    b.end_member();

    b.member(Kind::Function)
        .named("Evaluation")
        .abstract_()
        .heritage(Kind::Subclassification, "Performance");
    b.end_member();

    b.member(Kind::Expression)
        .named("evaluations")
        .abstract_()
        .heritage(Kind::FeatureTyping, "Evaluation");
    b.end_member();

    b.member(Kind::Predicate)
        .named("BooleanEvaluation")
        .abstract_()
        .heritage(Kind::Subclassification, "Evaluation");
    b.end_member();

    b.member(Kind::BooleanExpression)
        .named("booleanEvaluations")
        .abstract_()
        .heritage(Kind::FeatureTyping, "BooleanEvaluation");
    b.end_member();

    b.end_member();
    b.build()
}

fn transfers_package() -> SyntaxTree {
    let mut b = SyntaxTreeBuilder::new();
    b.member(Kind::LibraryPackage).named("Transfers");

    b.member(Kind::Interaction)
        .named("Transfer")
        .abstract_()
        .heritage(Kind::Subclassification, "Performances::Performance");
    b.end_member();

    b.member(Kind::ItemFlow)
        .named("transfers")
        .abstract_()
        .heritage(Kind::FeatureTyping, "Transfer");
    b.end_member();

    b.member(Kind::SuccessionItemFlow)
        .named("flowTransfersBefore")
        .abstract_()
        .heritage(Kind::Subsetting, "transfers");
    b.end_member();

    b.end_member();
    b.build()
}

fn metaobjects_package() -> SyntaxTree {
    let mut b = SyntaxTreeBuilder::new();
    b.member(Kind::LibraryPackage).named("Metaobjects");

    b.member(Kind::Metaclass).named("Metaobject").abstract_();
    b.member(Kind::Feature).named("annotatedElement").abstract_().end_member();
    b.end_member();

    b.member(Kind::MetadataFeature)
        .named("metaobjects")
        .abstract_()
        .heritage(Kind::FeatureTyping, "Metaobject");
    b.end_member();

    b.member(Kind::MetadataDefinition)
        .named("SemanticMetadata")
        .abstract_()
        .heritage(Kind::Subclassification, "Metaobject");
    b.member(Kind::Feature).named("baseType").abstract_().end_member();
    b.end_member();

    b.end_member();
    b.build()
}

// ----------------------------------------------------------------------
// Systems library
// ----------------------------------------------------------------------

/// `definition`/`usage` pair package: the common shape of the systems-layer
/// library modules.
fn def_usage_package(
    package: &str,
    def_kind: Kind,
    def_name: &str,
    def_base: &str,
    usage_kind: Kind,
    usage_name: &str,
) -> SyntaxTree {
    let mut b = SyntaxTreeBuilder::new();
    b.member(Kind::LibraryPackage).named(package);

    b.member(def_kind).named(def_name).abstract_();
    if !def_base.is_empty() {
        b.heritage(Kind::Subclassification, def_base);
    }
    b.end_member();

    b.member(usage_kind)
        .named(usage_name)
        .abstract_()
        .heritage(Kind::FeatureTyping, def_name);
    b.end_member();

    b.end_member();
    b.build()
}

fn items_package() -> SyntaxTree {
    def_usage_package(
        "Items",
        Kind::ItemDefinition,
        "Item",
        "Objects::Object",
        Kind::ItemUsage,
        "items",
    )
}

fn parts_package() -> SyntaxTree {
    def_usage_package(
        "Parts",
        Kind::PartDefinition,
        "Part",
        "Items::Item",
        Kind::PartUsage,
        "parts",
    )
}

fn ports_package() -> SyntaxTree {
    def_usage_package(
        "Ports",
        Kind::PortDefinition,
        "Port",
        "Objects::Object",
        Kind::PortUsage,
        "ports",
    )
}

fn actions_package() -> SyntaxTree {
    let mut b = SyntaxTreeBuilder::new();
    b.member(Kind::LibraryPackage).named("Actions");

    b.member(Kind::ActionDefinition)
        .named("Action")
        .abstract_()
        .heritage(Kind::Subclassification, "Performances::Performance");
    b.end_member();

    b.member(Kind::ActionUsage)
        .named("actions")
        .abstract_()
        .heritage(Kind::FeatureTyping, "Action");
    b.end_member();

    b.member(Kind::TransitionUsage)
        .named("transitionActions")
        .abstract_()
        .heritage(Kind::Subsetting, "actions");
    b.end_member();

    b.end_member();
    b.build()
}

fn states_package() -> SyntaxTree {
    let mut b = SyntaxTreeBuilder::new();
    b.member(Kind::LibraryPackage).named("States");

    b.member(Kind::StateDefinition)
        .named("StateAction")
        .abstract_()
        .heritage(Kind::Subclassification, "Actions::Action");
    b.end_member();

    b.member(Kind::StateUsage)
        .named("stateActions")
        .abstract_()
        .heritage(Kind::FeatureTyping, "StateAction");
    b.end_member();

    b.end_member();
    b.build()
}

fn calculations_package() -> SyntaxTree {
    def_usage_package(
        "Calculations",
        Kind::CalculationDefinition,
        "Calculation",
        "Actions::Action",
        Kind::CalculationUsage,
        "calculations",
    )
}

fn constraints_package() -> SyntaxTree {
    def_usage_package(
        "Constraints",
        Kind::ConstraintDefinition,
        "ConstraintCheck",
        "Performances::BooleanEvaluation",
        Kind::ConstraintUsage,
        "constraintChecks",
    )
}

fn requirements_package() -> SyntaxTree {
    def_usage_package(
        "Requirements",
        Kind::RequirementDefinition,
        "RequirementCheck",
        "Constraints::ConstraintCheck",
        Kind::RequirementUsage,
        "requirementChecks",
    )
}

fn cases_package() -> SyntaxTree {
    def_usage_package(
        "Cases",
        Kind::CaseDefinition,
        "Case",
        "Calculations::Calculation",
        Kind::CaseUsage,
        "cases",
    )
}

fn connections_package() -> SyntaxTree {
    let mut b = SyntaxTreeBuilder::new();
    b.member(Kind::LibraryPackage).named("Connections");

    b.member(Kind::ConnectionDefinition)
        .named("Connection")
        .abstract_()
        .heritage(Kind::Subclassification, "Links::Link");
    b.member(Kind::Feature).named("source").end_flag().end_member();
    b.member(Kind::Feature).named("target").end_flag().end_member();
    b.end_member();

    b.member(Kind::ConnectionUsage)
        .named("connections")
        .abstract_()
        .heritage(Kind::FeatureTyping, "Connection");
    b.end_member();

    b.end_member();
    b.build()
}

fn interfaces_package() -> SyntaxTree {
    def_usage_package(
        "Interfaces",
        Kind::InterfaceDefinition,
        "Interface",
        "Connections::Connection",
        Kind::InterfaceUsage,
        "interfaces",
    )
}

fn allocations_package() -> SyntaxTree {
    def_usage_package(
        "Allocations",
        Kind::AllocationDefinition,
        "Allocation",
        "Connections::Connection",
        Kind::AllocationUsage,
        "allocations",
    )
}

// ----------------------------------------------------------------------
// Reflection
// ----------------------------------------------------------------------

/// One metaclass element per kind name. The systems package reflects the
/// definition/usage layer, the kernel package everything else.
fn reflection_package(package: &str, systems_layer: bool) -> SyntaxTree {
    let mut b = SyntaxTreeBuilder::new();
    b.member(Kind::LibraryPackage).named(package);

    let mut seen: FxHashSet<&'static str> = FxHashSet::default();
    for &kind in ALL_KINDS {
        let Some(name) = metaclass_name(kind) else {
            continue;
        };
        let in_systems = name.ends_with("Definition") || name.ends_with("Usage");
        if in_systems != systems_layer {
            continue;
        }
        if !seen.insert(name) {
            continue;
        }
        b.member(Kind::Metaclass)
            .named(name)
            .heritage(Kind::Subclassification, "Metaobjects::Metaobject");
        b.end_member();
    }

    b.end_member();
    b.build()
}
