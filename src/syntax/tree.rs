//! Syntax tree storage and programmatic construction.

use smol_str::SmolStr;

use crate::base::{TextRange, TextSize, Visibility};
use crate::meta::Kind;

use super::node::{
    FeatureDirection, ImportSpec, LiteralValue, MembershipSlot, SyntaxNode, SyntaxNodeId, SyntaxRef,
};

/// Arena of syntax nodes with parent/child navigation.
///
/// The root is always index 0 and is a `Namespace` node representing the
/// document's top-level scope.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    pub fn root(&self) -> SyntaxNodeId {
        SyntaxNodeId(0)
    }

    pub fn node(&self, id: SyntaxNodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: SyntaxNodeId) -> &[SyntaxNodeId] {
        &self.node(id).children
    }

    /// All node ids in depth-first pre-order starting at the root.
    pub fn preorder(&self) -> Vec<SyntaxNodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.children(id).iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}

/// Fluent construction of syntax trees.
///
/// Mirrors the shape the external parser delivers: `start`/`finish` nest
/// nodes, modifier calls apply to the node most recently started. `member`
/// wraps a child in an `OwningMembership`, which is how namespace bodies
/// arrive from the parser.
pub struct SyntaxTreeBuilder {
    nodes: Vec<SyntaxNode>,
    stack: Vec<SyntaxNodeId>,
}

impl SyntaxTreeBuilder {
    pub fn new() -> Self {
        let mut nodes = Vec::new();
        nodes.push(SyntaxNode::new(Kind::Namespace, synthetic_range(0)));
        Self {
            nodes,
            stack: vec![SyntaxNodeId(0)],
        }
    }

    fn current(&mut self) -> &mut SyntaxNode {
        let id = *self.stack.last().expect("the root is always open");
        &mut self.nodes[id.index()]
    }

    /// Open a new node under the current one.
    pub fn start(&mut self, kind: Kind) -> &mut Self {
        let id = SyntaxNodeId::new(self.nodes.len());
        let mut node = SyntaxNode::new(kind, synthetic_range(self.nodes.len()));
        let parent = *self.stack.last().expect("the root is always open");
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        self.stack.push(id);
        self
    }

    /// Close the current node.
    pub fn finish(&mut self) -> &mut Self {
        assert!(self.stack.len() > 1, "cannot finish the root");
        self.stack.pop();
        self
    }

    /// Open an `OwningMembership` and a member node of `kind` inside it.
    pub fn member(&mut self, kind: Kind) -> &mut Self {
        self.start(Kind::OwningMembership).start(kind)
    }

    /// Close a node opened with [`Self::member`] (member, then membership).
    pub fn end_member(&mut self) -> &mut Self {
        self.finish().finish()
    }

    // ------------------------------------------------------------------
    // Modifiers for the current node
    // ------------------------------------------------------------------

    pub fn named(&mut self, name: impl Into<SmolStr>) -> &mut Self {
        self.current().name = Some(name.into());
        self
    }

    pub fn short_named(&mut self, name: impl Into<SmolStr>) -> &mut Self {
        self.current().short_name = Some(name.into());
        self
    }

    pub fn visibility(&mut self, visibility: Visibility) -> &mut Self {
        self.current().visibility = Some(visibility);
        self
    }

    pub fn abstract_(&mut self) -> &mut Self {
        self.current().flags.is_abstract = true;
        self
    }

    pub fn end_flag(&mut self) -> &mut Self {
        self.current().flags.is_end = true;
        self
    }

    pub fn composite(&mut self) -> &mut Self {
        self.current().flags.is_composite = true;
        self
    }

    pub fn ordered(&mut self) -> &mut Self {
        self.current().flags.is_ordered = true;
        self
    }

    pub fn direction(&mut self, direction: FeatureDirection) -> &mut Self {
        self.current().direction = direction;
        self
    }

    pub fn literal(&mut self, value: LiteralValue) -> &mut Self {
        self.current().literal = Some(value);
        self
    }

    pub fn operator(&mut self, op: impl Into<SmolStr>) -> &mut Self {
        self.current().operator = Some(op.into());
        self
    }

    pub fn slot(&mut self, slot: MembershipSlot) -> &mut Self {
        self.current().slot = Some(slot);
        self
    }

    pub fn import_spec(&mut self, wildcard: bool, recursive: bool) -> &mut Self {
        self.current().import = Some(ImportSpec {
            wildcard,
            recursive,
        });
        self
    }

    /// Set the current node's target reference.
    pub fn target(&mut self, path: impl Into<SmolStr>) -> &mut Self {
        let range = self.current().range;
        self.current().target_ref = Some(SyntaxRef::new(path, range));
        self
    }

    /// Set the current node's source reference.
    pub fn source(&mut self, path: impl Into<SmolStr>) -> &mut Self {
        let range = self.current().range;
        self.current().source_ref = Some(SyntaxRef::new(path, range));
        self
    }

    /// Shorthand: attach a heritage edge child of `edge_kind` targeting
    /// `path` to the current node.
    pub fn heritage(&mut self, edge_kind: Kind, path: impl Into<SmolStr>) -> &mut Self {
        self.start(edge_kind).target(path).finish()
    }

    pub fn build(mut self) -> SyntaxTree {
        assert_eq!(self.stack.len(), 1, "unbalanced start/finish");
        self.stack.clear();
        SyntaxTree { nodes: self.nodes }
    }
}

impl Default for SyntaxTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Trees built programmatically get monotonic one-byte ranges so diagnostics
/// remain ordered; the real parser supplies true source ranges.
fn synthetic_range(index: usize) -> TextRange {
    let start = TextSize::new(index as u32);
    TextRange::new(start, start + TextSize::new(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree() {
        let mut b = SyntaxTreeBuilder::new();
        b.member(Kind::Package).named("P");
        b.member(Kind::PartDefinition).named("Vehicle");
        b.end_member();
        b.end_member();
        let tree = b.build();

        let root = tree.root();
        assert_eq!(tree.node(root).kind, Kind::Namespace);
        let membership = tree.children(root)[0];
        assert_eq!(tree.node(membership).kind, Kind::OwningMembership);
        let package = tree.children(membership)[0];
        assert_eq!(tree.node(package).kind, Kind::Package);
        assert_eq!(tree.node(package).name.as_deref(), Some("P"));
        assert_eq!(tree.children(package).len(), 1);
    }

    #[test]
    fn preorder_visits_parents_first() {
        let mut b = SyntaxTreeBuilder::new();
        b.member(Kind::Package).named("P").end_member();
        let tree = b.build();
        let order = tree.preorder();
        assert_eq!(order[0], tree.root());
        assert_eq!(order.len(), tree.len());
        for id in &order[1..] {
            let parent = tree.node(*id).parent.unwrap();
            assert!(order.iter().position(|x| x == &parent).unwrap() < order.iter().position(|x| x == id).unwrap());
        }
    }
}
