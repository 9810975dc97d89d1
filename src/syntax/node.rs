//! Syntax node payloads.

use smol_str::SmolStr;

use crate::base::{TextRange, Visibility};
use crate::meta::Kind;

/// Index of a node within its [`super::SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SyntaxNodeId(pub u32);

impl SyntaxNodeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An unresolved textual reference owned by a syntax node: a `::`-qualified
/// (and possibly `.`-chained) path plus the range it was written at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxRef {
    pub path: SmolStr,
    pub range: TextRange,
}

impl SyntaxRef {
    pub fn new(path: impl Into<SmolStr>, range: TextRange) -> Self {
        Self {
            path: path.into(),
            range,
        }
    }

    /// True when the path navigates through features (`a.b.c`).
    pub fn is_chain(&self) -> bool {
        self.path.contains('.')
    }
}

/// Feature direction as written in source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeatureDirection {
    #[default]
    None,
    In,
    Out,
    InOut,
}

impl FeatureDirection {
    /// True for parameter-forming directions.
    pub fn is_parameter(self) -> bool {
        !matches!(self, FeatureDirection::None)
    }
}

/// Literal payload of a literal-expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(SmolStr),
}

/// Slot tag on kind-specific memberships, identifying which positional
/// role the owned member fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipSlot {
    Entry,
    DoAction,
    Exit,
    Trigger,
    Guard,
    Effect,
    Objective,
    Subject,
}

/// Modifier flags copied verbatim onto the model element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyntaxFlags {
    pub is_abstract: bool,
    pub is_sufficient: bool,
    pub is_composite: bool,
    pub is_portion: bool,
    pub is_readonly: bool,
    pub is_derived: bool,
    pub is_end: bool,
    pub is_ordered: bool,
    pub is_nonunique: bool,
}

/// Import statement payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSpec {
    /// `::*` — import the namespace's members, not the name itself.
    pub wildcard: bool,
    /// `::**` — recursive wildcard.
    pub recursive: bool,
}

/// One node of the parsed tree.
///
/// Payload fields are populated per kind: literals carry `literal`,
/// invocation expressions `operator`, relationship edges `target_ref` (and
/// optionally `source_ref`), kind-specific memberships `slot`, imports
/// `import`. The builder's initializer chains decide what to read.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: Kind,
    pub range: TextRange,
    pub parent: Option<SyntaxNodeId>,
    pub children: Vec<SyntaxNodeId>,

    pub name: Option<SmolStr>,
    pub short_name: Option<SmolStr>,
    pub visibility: Option<Visibility>,

    pub direction: FeatureDirection,
    pub flags: SyntaxFlags,

    pub literal: Option<LiteralValue>,
    pub operator: Option<SmolStr>,

    pub target_ref: Option<SyntaxRef>,
    pub source_ref: Option<SyntaxRef>,

    pub slot: Option<MembershipSlot>,
    pub import: Option<ImportSpec>,
}

impl SyntaxNode {
    pub(super) fn new(kind: Kind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            parent: None,
            children: Vec::new(),
            name: None,
            short_name: None,
            visibility: None,
            direction: FeatureDirection::None,
            flags: SyntaxFlags::default(),
            literal: None,
            operator: None,
            target_ref: None,
            source_ref: None,
            slot: None,
            import: None,
        }
    }
}
