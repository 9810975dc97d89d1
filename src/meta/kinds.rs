//! The metamodel kind space.
//!
//! [`Kind`] is the discriminant tag identifying a node's concrete category.
//! Syntax nodes and model elements share this space: the builder maps one
//! syntax node of a recognized kind to one model element of the same kind.
//!
//! [`Kind::direct_supertypes`] records the raw is-subtype-of facts of the
//! metamodel (a DAG of direct edges). The [`super::KindIndex`] turns those
//! facts into ordered inheritance chains at startup; nothing else in the
//! crate consults the raw facts directly.

/// The concrete category of a syntax node or model element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    // ------------------------------------------------------------------
    // KerML core: elements and namespaces
    // ------------------------------------------------------------------
    Element,
    AnnotatingElement,
    Comment,
    Documentation,
    TextualRepresentation,
    Namespace,
    Package,
    LibraryPackage,

    // ------------------------------------------------------------------
    // KerML core: types
    // ------------------------------------------------------------------
    Type,
    Classifier,
    DataType,
    Class,
    Structure,
    Metaclass,
    Association,
    AssociationStructure,
    Behavior,
    Function,
    Predicate,
    Interaction,

    // ------------------------------------------------------------------
    // KerML core: features
    // ------------------------------------------------------------------
    Feature,
    Step,
    Expression,
    BooleanExpression,
    Invariant,
    LiteralExpression,
    LiteralBoolean,
    LiteralInteger,
    LiteralRational,
    LiteralString,
    LiteralInfinity,
    NullExpression,
    InvocationExpression,
    OperatorExpression,
    FeatureChainExpression,
    CollectExpression,
    SelectExpression,
    FeatureReferenceExpression,
    MetadataAccessExpression,
    Connector,
    BindingConnector,
    Succession,
    ItemFlow,
    SuccessionItemFlow,
    ItemFeature,
    ItemFlowEnd,
    Multiplicity,
    MultiplicityRange,
    MetadataFeature,

    // ------------------------------------------------------------------
    // KerML core: relationships
    // ------------------------------------------------------------------
    Relationship,
    Annotation,
    Dependency,
    Membership,
    OwningMembership,
    FeatureMembership,
    EndFeatureMembership,
    ParameterMembership,
    ReturnParameterMembership,
    ResultExpressionMembership,
    ElementFilterMembership,
    Import,
    MembershipImport,
    NamespaceImport,
    Specialization,
    Subclassification,
    FeatureTyping,
    Subsetting,
    Redefinition,
    ReferenceSubsetting,
    Conjugation,
    Disjoining,
    FeatureInverting,
    Featuring,
    TypeFeaturing,
    FeatureChaining,

    // ------------------------------------------------------------------
    // Union markers (dispatch groupings excluded from the real lattice)
    // ------------------------------------------------------------------
    InlineExpression,

    // ------------------------------------------------------------------
    // SysML layer: definitions
    // ------------------------------------------------------------------
    Definition,
    OccurrenceDefinition,
    ItemDefinition,
    PartDefinition,
    ConnectionDefinition,
    InterfaceDefinition,
    AllocationDefinition,
    FlowConnectionDefinition,
    PortDefinition,
    ConjugatedPortDefinition,
    AttributeDefinition,
    EnumerationDefinition,
    ActionDefinition,
    CalculationDefinition,
    StateDefinition,
    ConstraintDefinition,
    RequirementDefinition,
    ConcernDefinition,
    ViewpointDefinition,
    CaseDefinition,
    AnalysisCaseDefinition,
    VerificationCaseDefinition,
    UseCaseDefinition,
    MetadataDefinition,

    // ------------------------------------------------------------------
    // SysML layer: usages
    // ------------------------------------------------------------------
    Usage,
    OccurrenceUsage,
    ItemUsage,
    PartUsage,
    PortUsage,
    AttributeUsage,
    EnumerationUsage,
    ReferenceUsage,
    MetadataUsage,
    EventOccurrenceUsage,
    ActionUsage,
    PerformActionUsage,
    StateUsage,
    ExhibitStateUsage,
    TransitionUsage,
    AcceptActionUsage,
    SendActionUsage,
    AssignmentActionUsage,
    IfActionUsage,
    LoopActionUsage,
    WhileLoopActionUsage,
    ForLoopActionUsage,
    CalculationUsage,
    ConstraintUsage,
    AssertConstraintUsage,
    RequirementUsage,
    SatisfyRequirementUsage,
    ConcernUsage,
    ViewpointUsage,
    CaseUsage,
    AnalysisCaseUsage,
    VerificationCaseUsage,
    UseCaseUsage,
    IncludeUseCaseUsage,
    ConnectorAsUsage,
    BindingConnectorAsUsage,
    SuccessionAsUsage,
    ConnectionUsage,
    InterfaceUsage,
    AllocationUsage,
    FlowConnectionUsage,

    // ------------------------------------------------------------------
    // SysML layer: memberships and relationships
    // ------------------------------------------------------------------
    StateSubactionMembership,
    TransitionFeatureMembership,
    ObjectiveMembership,
    SubjectMembership,
    ActorMembership,
    StakeholderMembership,
    RequirementConstraintMembership,
    VariantMembership,
    PortConjugation,
}

use Kind::*;

/// Complete enumeration of the kind space, used to build per-kind tables.
pub const ALL_KINDS: &[Kind] = &[
    Element,
    AnnotatingElement,
    Comment,
    Documentation,
    TextualRepresentation,
    Namespace,
    Package,
    LibraryPackage,
    Type,
    Classifier,
    DataType,
    Class,
    Structure,
    Metaclass,
    Association,
    AssociationStructure,
    Behavior,
    Function,
    Predicate,
    Interaction,
    Feature,
    Step,
    Expression,
    BooleanExpression,
    Invariant,
    LiteralExpression,
    LiteralBoolean,
    LiteralInteger,
    LiteralRational,
    LiteralString,
    LiteralInfinity,
    NullExpression,
    InvocationExpression,
    OperatorExpression,
    FeatureChainExpression,
    CollectExpression,
    SelectExpression,
    FeatureReferenceExpression,
    MetadataAccessExpression,
    Connector,
    BindingConnector,
    Succession,
    ItemFlow,
    SuccessionItemFlow,
    ItemFeature,
    ItemFlowEnd,
    Multiplicity,
    MultiplicityRange,
    MetadataFeature,
    Relationship,
    Annotation,
    Dependency,
    Membership,
    OwningMembership,
    FeatureMembership,
    EndFeatureMembership,
    ParameterMembership,
    ReturnParameterMembership,
    ResultExpressionMembership,
    ElementFilterMembership,
    Import,
    MembershipImport,
    NamespaceImport,
    Specialization,
    Subclassification,
    FeatureTyping,
    Subsetting,
    Redefinition,
    ReferenceSubsetting,
    Conjugation,
    Disjoining,
    FeatureInverting,
    Featuring,
    TypeFeaturing,
    FeatureChaining,
    InlineExpression,
    Definition,
    OccurrenceDefinition,
    ItemDefinition,
    PartDefinition,
    ConnectionDefinition,
    InterfaceDefinition,
    AllocationDefinition,
    FlowConnectionDefinition,
    PortDefinition,
    ConjugatedPortDefinition,
    AttributeDefinition,
    EnumerationDefinition,
    ActionDefinition,
    CalculationDefinition,
    StateDefinition,
    ConstraintDefinition,
    RequirementDefinition,
    ConcernDefinition,
    ViewpointDefinition,
    CaseDefinition,
    AnalysisCaseDefinition,
    VerificationCaseDefinition,
    UseCaseDefinition,
    MetadataDefinition,
    Usage,
    OccurrenceUsage,
    ItemUsage,
    PartUsage,
    PortUsage,
    AttributeUsage,
    EnumerationUsage,
    ReferenceUsage,
    MetadataUsage,
    EventOccurrenceUsage,
    ActionUsage,
    PerformActionUsage,
    StateUsage,
    ExhibitStateUsage,
    TransitionUsage,
    AcceptActionUsage,
    SendActionUsage,
    AssignmentActionUsage,
    IfActionUsage,
    LoopActionUsage,
    WhileLoopActionUsage,
    ForLoopActionUsage,
    CalculationUsage,
    ConstraintUsage,
    AssertConstraintUsage,
    RequirementUsage,
    SatisfyRequirementUsage,
    ConcernUsage,
    ViewpointUsage,
    CaseUsage,
    AnalysisCaseUsage,
    VerificationCaseUsage,
    UseCaseUsage,
    IncludeUseCaseUsage,
    ConnectorAsUsage,
    BindingConnectorAsUsage,
    SuccessionAsUsage,
    ConnectionUsage,
    InterfaceUsage,
    AllocationUsage,
    FlowConnectionUsage,
    StateSubactionMembership,
    TransitionFeatureMembership,
    ObjectiveMembership,
    SubjectMembership,
    ActorMembership,
    StakeholderMembership,
    RequirementConstraintMembership,
    VariantMembership,
    PortConjugation,
];

impl Kind {
    /// The direct supertypes of this kind — the raw reflection facts the
    /// hierarchy index is built from. Multiple inheritance is common
    /// (e.g. `Connector` is both a `Feature` and a `Relationship`).
    pub fn direct_supertypes(self) -> &'static [Kind] {
        match self {
            Element => &[],
            AnnotatingElement => &[Element],
            Comment => &[AnnotatingElement],
            Documentation => &[Comment],
            TextualRepresentation => &[AnnotatingElement],
            Namespace => &[Element],
            Package => &[Namespace],
            LibraryPackage => &[Package],

            Type => &[Namespace],
            Classifier => &[Type],
            DataType => &[Classifier],
            Class => &[Classifier],
            Structure => &[Class],
            Metaclass => &[Structure],
            Association => &[Classifier, Relationship],
            AssociationStructure => &[Association, Structure],
            Behavior => &[Class],
            Function => &[Behavior],
            Predicate => &[Function],
            Interaction => &[Association, Behavior],

            Feature => &[Type],
            Step => &[Feature],
            Expression => &[Step],
            BooleanExpression => &[Expression],
            Invariant => &[BooleanExpression],
            LiteralExpression => &[Expression],
            LiteralBoolean => &[LiteralExpression],
            LiteralInteger => &[LiteralExpression],
            LiteralRational => &[LiteralExpression],
            LiteralString => &[LiteralExpression],
            LiteralInfinity => &[LiteralExpression],
            NullExpression => &[Expression],
            InvocationExpression => &[Expression, InlineExpression],
            OperatorExpression => &[InvocationExpression],
            FeatureChainExpression => &[OperatorExpression],
            CollectExpression => &[OperatorExpression],
            SelectExpression => &[OperatorExpression],
            FeatureReferenceExpression => &[Expression, InlineExpression],
            MetadataAccessExpression => &[Expression, InlineExpression],
            Connector => &[Feature, Relationship],
            BindingConnector => &[Connector],
            Succession => &[Connector],
            ItemFlow => &[Connector, Step],
            SuccessionItemFlow => &[ItemFlow, Succession],
            ItemFeature => &[Feature],
            ItemFlowEnd => &[Feature],
            Multiplicity => &[Feature],
            MultiplicityRange => &[Multiplicity],
            MetadataFeature => &[Feature, AnnotatingElement],

            Relationship => &[Element],
            Annotation => &[Relationship],
            Dependency => &[Relationship],
            Membership => &[Relationship],
            OwningMembership => &[Membership],
            FeatureMembership => &[OwningMembership, Featuring],
            EndFeatureMembership => &[FeatureMembership],
            ParameterMembership => &[FeatureMembership],
            ReturnParameterMembership => &[ParameterMembership],
            ResultExpressionMembership => &[FeatureMembership],
            ElementFilterMembership => &[OwningMembership],
            Import => &[Relationship],
            MembershipImport => &[Import],
            NamespaceImport => &[Import],
            Specialization => &[Relationship],
            Subclassification => &[Specialization],
            FeatureTyping => &[Specialization],
            Subsetting => &[Specialization],
            Redefinition => &[Subsetting],
            ReferenceSubsetting => &[Subsetting],
            Conjugation => &[Relationship],
            Disjoining => &[Relationship],
            FeatureInverting => &[Relationship],
            Featuring => &[Relationship],
            TypeFeaturing => &[Featuring],
            FeatureChaining => &[Relationship],

            InlineExpression => &[Expression],

            Definition => &[Classifier],
            OccurrenceDefinition => &[Definition, Class],
            ItemDefinition => &[OccurrenceDefinition, Structure],
            PartDefinition => &[ItemDefinition],
            ConnectionDefinition => &[PartDefinition, AssociationStructure],
            InterfaceDefinition => &[ConnectionDefinition],
            AllocationDefinition => &[ConnectionDefinition],
            FlowConnectionDefinition => &[ConnectionDefinition, ActionDefinition, Interaction],
            PortDefinition => &[OccurrenceDefinition, Structure],
            ConjugatedPortDefinition => &[PortDefinition],
            AttributeDefinition => &[Definition, DataType],
            EnumerationDefinition => &[AttributeDefinition],
            ActionDefinition => &[OccurrenceDefinition, Behavior],
            CalculationDefinition => &[ActionDefinition, Function],
            StateDefinition => &[ActionDefinition],
            ConstraintDefinition => &[OccurrenceDefinition, Predicate],
            RequirementDefinition => &[ConstraintDefinition],
            ConcernDefinition => &[RequirementDefinition],
            ViewpointDefinition => &[RequirementDefinition],
            CaseDefinition => &[CalculationDefinition],
            AnalysisCaseDefinition => &[CaseDefinition],
            VerificationCaseDefinition => &[CaseDefinition],
            UseCaseDefinition => &[CaseDefinition],
            MetadataDefinition => &[ItemDefinition, Metaclass],

            Usage => &[Feature],
            OccurrenceUsage => &[Usage],
            ItemUsage => &[OccurrenceUsage],
            PartUsage => &[ItemUsage],
            PortUsage => &[OccurrenceUsage],
            AttributeUsage => &[Usage],
            EnumerationUsage => &[AttributeUsage],
            ReferenceUsage => &[Usage],
            MetadataUsage => &[ItemUsage, MetadataFeature],
            EventOccurrenceUsage => &[OccurrenceUsage],
            ActionUsage => &[OccurrenceUsage, Step],
            PerformActionUsage => &[ActionUsage, EventOccurrenceUsage],
            StateUsage => &[ActionUsage],
            ExhibitStateUsage => &[StateUsage, PerformActionUsage],
            TransitionUsage => &[ActionUsage],
            AcceptActionUsage => &[ActionUsage],
            SendActionUsage => &[AcceptActionUsage],
            AssignmentActionUsage => &[ActionUsage],
            IfActionUsage => &[ActionUsage],
            LoopActionUsage => &[ActionUsage],
            WhileLoopActionUsage => &[LoopActionUsage],
            ForLoopActionUsage => &[LoopActionUsage],
            CalculationUsage => &[ActionUsage, Expression],
            ConstraintUsage => &[OccurrenceUsage, BooleanExpression],
            AssertConstraintUsage => &[ConstraintUsage, Invariant],
            RequirementUsage => &[ConstraintUsage],
            SatisfyRequirementUsage => &[RequirementUsage, AssertConstraintUsage],
            ConcernUsage => &[RequirementUsage],
            ViewpointUsage => &[RequirementUsage],
            CaseUsage => &[CalculationUsage],
            AnalysisCaseUsage => &[CaseUsage],
            VerificationCaseUsage => &[CaseUsage],
            UseCaseUsage => &[CaseUsage],
            IncludeUseCaseUsage => &[UseCaseUsage, PerformActionUsage],
            ConnectorAsUsage => &[Usage, Connector],
            BindingConnectorAsUsage => &[ConnectorAsUsage, BindingConnector],
            SuccessionAsUsage => &[ConnectorAsUsage, Succession],
            ConnectionUsage => &[ConnectorAsUsage, PartUsage],
            InterfaceUsage => &[ConnectionUsage],
            AllocationUsage => &[ConnectionUsage],
            FlowConnectionUsage => &[ConnectionUsage, ActionUsage, ItemFlow],

            StateSubactionMembership => &[FeatureMembership],
            TransitionFeatureMembership => &[FeatureMembership],
            ObjectiveMembership => &[FeatureMembership],
            SubjectMembership => &[ParameterMembership],
            ActorMembership => &[ParameterMembership],
            StakeholderMembership => &[ParameterMembership],
            RequirementConstraintMembership => &[FeatureMembership],
            VariantMembership => &[OwningMembership],
            PortConjugation => &[Conjugation],
        }
    }

    /// Union markers group kinds for dispatch registries but are not real
    /// metaclasses; the hierarchy index keeps them out of the type bucket
    /// when ordering inheritance chains.
    pub fn is_union_marker(self) -> bool {
        matches!(self, InlineExpression)
    }

    /// The metamodel name of this kind, identical to the variant name.
    pub fn as_str(self) -> &'static str {
        match self {
            Element => "Element",
            AnnotatingElement => "AnnotatingElement",
            Comment => "Comment",
            Documentation => "Documentation",
            TextualRepresentation => "TextualRepresentation",
            Namespace => "Namespace",
            Package => "Package",
            LibraryPackage => "LibraryPackage",
            Type => "Type",
            Classifier => "Classifier",
            DataType => "DataType",
            Class => "Class",
            Structure => "Structure",
            Metaclass => "Metaclass",
            Association => "Association",
            AssociationStructure => "AssociationStructure",
            Behavior => "Behavior",
            Function => "Function",
            Predicate => "Predicate",
            Interaction => "Interaction",
            Feature => "Feature",
            Step => "Step",
            Expression => "Expression",
            BooleanExpression => "BooleanExpression",
            Invariant => "Invariant",
            LiteralExpression => "LiteralExpression",
            LiteralBoolean => "LiteralBoolean",
            LiteralInteger => "LiteralInteger",
            LiteralRational => "LiteralRational",
            LiteralString => "LiteralString",
            LiteralInfinity => "LiteralInfinity",
            NullExpression => "NullExpression",
            InvocationExpression => "InvocationExpression",
            OperatorExpression => "OperatorExpression",
            FeatureChainExpression => "FeatureChainExpression",
            CollectExpression => "CollectExpression",
            SelectExpression => "SelectExpression",
            FeatureReferenceExpression => "FeatureReferenceExpression",
            MetadataAccessExpression => "MetadataAccessExpression",
            Connector => "Connector",
            BindingConnector => "BindingConnector",
            Succession => "Succession",
            ItemFlow => "ItemFlow",
            SuccessionItemFlow => "SuccessionItemFlow",
            ItemFeature => "ItemFeature",
            ItemFlowEnd => "ItemFlowEnd",
            Multiplicity => "Multiplicity",
            MultiplicityRange => "MultiplicityRange",
            MetadataFeature => "MetadataFeature",
            Relationship => "Relationship",
            Annotation => "Annotation",
            Dependency => "Dependency",
            Membership => "Membership",
            OwningMembership => "OwningMembership",
            FeatureMembership => "FeatureMembership",
            EndFeatureMembership => "EndFeatureMembership",
            ParameterMembership => "ParameterMembership",
            ReturnParameterMembership => "ReturnParameterMembership",
            ResultExpressionMembership => "ResultExpressionMembership",
            ElementFilterMembership => "ElementFilterMembership",
            Import => "Import",
            MembershipImport => "MembershipImport",
            NamespaceImport => "NamespaceImport",
            Specialization => "Specialization",
            Subclassification => "Subclassification",
            FeatureTyping => "FeatureTyping",
            Subsetting => "Subsetting",
            Redefinition => "Redefinition",
            ReferenceSubsetting => "ReferenceSubsetting",
            Conjugation => "Conjugation",
            Disjoining => "Disjoining",
            FeatureInverting => "FeatureInverting",
            Featuring => "Featuring",
            TypeFeaturing => "TypeFeaturing",
            FeatureChaining => "FeatureChaining",
            InlineExpression => "InlineExpression",
            Definition => "Definition",
            OccurrenceDefinition => "OccurrenceDefinition",
            ItemDefinition => "ItemDefinition",
            PartDefinition => "PartDefinition",
            ConnectionDefinition => "ConnectionDefinition",
            InterfaceDefinition => "InterfaceDefinition",
            AllocationDefinition => "AllocationDefinition",
            FlowConnectionDefinition => "FlowConnectionDefinition",
            PortDefinition => "PortDefinition",
            ConjugatedPortDefinition => "ConjugatedPortDefinition",
            AttributeDefinition => "AttributeDefinition",
            EnumerationDefinition => "EnumerationDefinition",
            ActionDefinition => "ActionDefinition",
            CalculationDefinition => "CalculationDefinition",
            StateDefinition => "StateDefinition",
            ConstraintDefinition => "ConstraintDefinition",
            RequirementDefinition => "RequirementDefinition",
            ConcernDefinition => "ConcernDefinition",
            ViewpointDefinition => "ViewpointDefinition",
            CaseDefinition => "CaseDefinition",
            AnalysisCaseDefinition => "AnalysisCaseDefinition",
            VerificationCaseDefinition => "VerificationCaseDefinition",
            UseCaseDefinition => "UseCaseDefinition",
            MetadataDefinition => "MetadataDefinition",
            Usage => "Usage",
            OccurrenceUsage => "OccurrenceUsage",
            ItemUsage => "ItemUsage",
            PartUsage => "PartUsage",
            PortUsage => "PortUsage",
            AttributeUsage => "AttributeUsage",
            EnumerationUsage => "EnumerationUsage",
            ReferenceUsage => "ReferenceUsage",
            MetadataUsage => "MetadataUsage",
            EventOccurrenceUsage => "EventOccurrenceUsage",
            ActionUsage => "ActionUsage",
            PerformActionUsage => "PerformActionUsage",
            StateUsage => "StateUsage",
            ExhibitStateUsage => "ExhibitStateUsage",
            TransitionUsage => "TransitionUsage",
            AcceptActionUsage => "AcceptActionUsage",
            SendActionUsage => "SendActionUsage",
            AssignmentActionUsage => "AssignmentActionUsage",
            IfActionUsage => "IfActionUsage",
            LoopActionUsage => "LoopActionUsage",
            WhileLoopActionUsage => "WhileLoopActionUsage",
            ForLoopActionUsage => "ForLoopActionUsage",
            CalculationUsage => "CalculationUsage",
            ConstraintUsage => "ConstraintUsage",
            AssertConstraintUsage => "AssertConstraintUsage",
            RequirementUsage => "RequirementUsage",
            SatisfyRequirementUsage => "SatisfyRequirementUsage",
            ConcernUsage => "ConcernUsage",
            ViewpointUsage => "ViewpointUsage",
            CaseUsage => "CaseUsage",
            AnalysisCaseUsage => "AnalysisCaseUsage",
            VerificationCaseUsage => "VerificationCaseUsage",
            UseCaseUsage => "UseCaseUsage",
            IncludeUseCaseUsage => "IncludeUseCaseUsage",
            ConnectorAsUsage => "ConnectorAsUsage",
            BindingConnectorAsUsage => "BindingConnectorAsUsage",
            SuccessionAsUsage => "SuccessionAsUsage",
            ConnectionUsage => "ConnectionUsage",
            InterfaceUsage => "InterfaceUsage",
            AllocationUsage => "AllocationUsage",
            FlowConnectionUsage => "FlowConnectionUsage",
            StateSubactionMembership => "StateSubactionMembership",
            TransitionFeatureMembership => "TransitionFeatureMembership",
            ObjectiveMembership => "ObjectiveMembership",
            SubjectMembership => "SubjectMembership",
            ActorMembership => "ActorMembership",
            StakeholderMembership => "StakeholderMembership",
            RequirementConstraintMembership => "RequirementConstraintMembership",
            VariantMembership => "VariantMembership",
            PortConjugation => "PortConjugation",
        }
    }

    /// Parse a kind from its metamodel name.
    pub fn from_name(name: &str) -> Option<Kind> {
        ALL_KINDS.iter().copied().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_kinds_have_unique_names() {
        let mut seen = std::collections::HashSet::new();
        for kind in ALL_KINDS {
            assert!(seen.insert(kind.as_str()), "duplicate name {kind}");
        }
    }

    #[test]
    fn from_name_round_trips() {
        for kind in ALL_KINDS {
            assert_eq!(Kind::from_name(kind.as_str()), Some(*kind));
        }
        assert_eq!(Kind::from_name("NoSuchKind"), None);
    }

    #[test]
    fn supertype_facts_only_reference_enumerated_kinds() {
        for kind in ALL_KINDS {
            for sup in kind.direct_supertypes() {
                assert!(ALL_KINDS.contains(sup), "{kind} -> {sup} not enumerated");
            }
        }
    }
}
