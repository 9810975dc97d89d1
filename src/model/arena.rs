//! The model arena: storage, privileged mutation, and derived queries.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::trace;

use crate::base::{DocumentId, ElementId};
use crate::meta::{Kind, KindIndex};
use crate::syntax::SyntaxNodeId;

use super::element::{
    EdgeFacet, ElementData, ExprFacet, FeatureFacet, Lazy, MembershipFacet, SetupState, TypeFacet,
};

/// Arena of semantic model elements.
///
/// Ids are assigned monotonically and stay stable for the lifetime of the
/// process; invalidation detaches elements rather than reusing slots.
pub struct ModelArena {
    kinds: Arc<KindIndex>,
    nodes: Vec<ElementData>,
    /// Elements constructed for each document, in construction order.
    by_document: FxHashMap<DocumentId, Vec<ElementId>>,
    /// Reverse map from a document's syntax nodes to their elements.
    syntax_map: FxHashMap<(DocumentId, SyntaxNodeId), ElementId>,
}

impl ModelArena {
    pub fn new(kinds: Arc<KindIndex>) -> Self {
        Self {
            kinds,
            nodes: Vec::new(),
            by_document: FxHashMap::default(),
            syntax_map: FxHashMap::default(),
        }
    }

    pub fn kinds(&self) -> &KindIndex {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Allocate an element of `kind`, attaching the facets its kind
    /// lattice position calls for.
    pub(crate) fn alloc(
        &mut self,
        kind: Kind,
        document: Option<DocumentId>,
        syntax: Option<SyntaxNodeId>,
    ) -> ElementId {
        let id = ElementId::new(self.nodes.len());
        let mut data = ElementData::new(id, kind);
        data.document = document;
        data.syntax = syntax;

        if self.kinds.is_subtype(kind, Kind::Type) {
            data.type_facet = Some(TypeFacet::default());
        }
        if self.kinds.is_subtype(kind, Kind::Feature) {
            data.feature_facet = Some(FeatureFacet::default());
        }
        if self.kinds.is_subtype(kind, Kind::Relationship) {
            data.edge_facet = Some(EdgeFacet::default());
        }
        if self.kinds.is_subtype(kind, Kind::Membership) {
            data.membership_facet = Some(MembershipFacet::default());
        }
        if self.kinds.is_subtype(kind, Kind::Expression) {
            data.expr_facet = Some(ExprFacet::default());
        }

        self.nodes.push(data);
        if let Some(doc) = document {
            self.by_document.entry(doc).or_default().push(id);
            if let Some(syntax) = syntax {
                self.syntax_map.insert((doc, syntax), id);
            }
        }
        id
    }

    /// Attach `child` under `parent`, rebinding if the child already had an
    /// owner (postprocessing fix-ups may do this).
    pub(crate) fn attach_child(&mut self, parent: ElementId, child: ElementId) {
        if let Some(old) = self.nodes[child.index()].owner {
            self.nodes[old.index()].children.retain(|&c| c != child);
        }
        self.nodes[child.index()].owner = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    // ------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------

    pub fn get(&self, id: ElementId) -> &ElementData {
        &self.nodes[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> &mut ElementData {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: ElementId) -> Kind {
        self.nodes[id.index()].kind
    }

    /// True if the element's kind is a subtype of `ancestor`.
    pub fn is_kind(&self, id: ElementId, ancestor: Kind) -> bool {
        self.kinds.is_subtype(self.kind(id), ancestor)
    }

    pub fn element_for_syntax(
        &self,
        document: DocumentId,
        syntax: SyntaxNodeId,
    ) -> Option<ElementId> {
        self.syntax_map.get(&(document, syntax)).copied()
    }

    pub fn elements_of_document(&self, document: DocumentId) -> &[ElementId] {
        self.by_document
            .get(&document)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    // ------------------------------------------------------------------
    // Membership / structure queries
    // ------------------------------------------------------------------

    /// Children of `id` that are membership relationships.
    pub fn owned_memberships(&self, id: ElementId) -> Vec<ElementId> {
        self.nodes[id.index()]
            .children
            .iter()
            .copied()
            .filter(|&c| self.is_kind(c, Kind::Membership))
            .collect()
    }

    /// Children of `id` that are import relationships.
    pub fn owned_imports(&self, id: ElementId) -> Vec<ElementId> {
        self.nodes[id.index()]
            .children
            .iter()
            .copied()
            .filter(|&c| self.is_kind(c, Kind::Import))
            .collect()
    }

    /// Heritage edges owned by a type, in declaration order.
    pub fn heritage_of(&self, id: ElementId) -> Vec<ElementId> {
        self.nodes[id.index()]
            .type_facet
            .as_ref()
            .map(|t| t.heritage.clone())
            .unwrap_or_default()
    }

    /// The name a membership exposes its member under.
    pub fn membership_name(&self, membership: ElementId) -> Option<SmolStr> {
        let facet = self.nodes[membership.index()].membership_facet.as_ref()?;
        if let Some(alias) = &facet.member_name {
            return Some(alias.clone());
        }
        let member = facet.member?;
        self.nodes[member.index()].effective_name().cloned()
    }

    /// Find a direct member of `namespace` by exposed name or short name.
    pub fn find_member(&self, namespace: ElementId, name: &str) -> Option<ElementId> {
        for membership in self.owned_memberships(namespace) {
            let facet = self.nodes[membership.index()].membership_facet.as_ref();
            let Some(facet) = facet else { continue };
            let Some(member) = facet.member else { continue };
            if self.membership_name(membership).as_deref() == Some(name) {
                return Some(member);
            }
            let member_data = &self.nodes[member.index()];
            if member_data.declared_short_name.as_deref() == Some(name) {
                return Some(member);
            }
        }
        None
    }

    /// Features owned directly by a type (through feature memberships or as
    /// direct children, the latter for expression internals).
    pub fn owned_features(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        for &child in &self.nodes[id.index()].children {
            if self.is_kind(child, Kind::Membership) {
                if let Some(member) = self.nodes[child.index()]
                    .membership_facet
                    .as_ref()
                    .and_then(|m| m.member)
                {
                    if self.is_kind(member, Kind::Feature) {
                        out.push(member);
                    }
                }
            } else if self.is_kind(child, Kind::Feature) && !self.is_kind(child, Kind::Relationship)
            {
                out.push(child);
            }
        }
        out
    }

    /// Directed features of a behavior-like type, in declaration order.
    pub fn parameters(&self, id: ElementId) -> Vec<ElementId> {
        self.owned_features(id)
            .into_iter()
            .filter(|&f| {
                self.nodes[f.index()]
                    .feature_facet
                    .as_ref()
                    .is_some_and(|ff| ff.direction.is_parameter())
            })
            .collect()
    }

    /// Metadata features annotating `id`: explicit annotations first in
    /// declaration order, the synthesized metaclass feature last.
    pub fn metadata_of(&self, id: ElementId) -> Vec<ElementId> {
        let metaclass = self.nodes[id.index()].metaclass_feature;
        let mut out: Vec<ElementId> = self.nodes[id.index()]
            .children
            .iter()
            .copied()
            .filter(|&c| self.is_kind(c, Kind::MetadataFeature) && Some(c) != metaclass)
            .collect();
        out.extend(metaclass);
        out
    }

    // ------------------------------------------------------------------
    // Derived queries (cached)
    // ------------------------------------------------------------------

    /// All supertypes of a type, most specific first, cycle-tolerant.
    pub fn all_supertypes(&mut self, id: ElementId) -> Vec<ElementId> {
        if let Some(cached) = self.nodes[id.index()]
            .type_facet
            .as_ref()
            .and_then(|t| t.all_supertypes.clone())
        {
            return cached;
        }

        let mut out = Vec::new();
        let mut seen: FxHashSet<ElementId> = FxHashSet::default();
        seen.insert(id);
        let mut queue: Vec<ElementId> = self.direct_supertypes(id);
        while !queue.is_empty() {
            let next = queue.remove(0);
            if !seen.insert(next) {
                continue;
            }
            out.push(next);
            queue.extend(self.direct_supertypes(next));
        }

        if let Some(facet) = self.nodes[id.index()].type_facet.as_mut() {
            facet.all_supertypes = Some(out.clone());
        }
        out
    }

    /// Direct supertypes: resolved targets of the type's heritage edges.
    pub fn direct_supertypes(&self, id: ElementId) -> Vec<ElementId> {
        let Some(facet) = self.nodes[id.index()].type_facet.as_ref() else {
            return Vec::new();
        };
        facet
            .heritage
            .iter()
            .filter_map(|&edge| {
                self.nodes[edge.index()]
                    .edge_facet
                    .as_ref()
                    .and_then(|e| e.target)
            })
            .filter(|&t| t != id)
            .collect()
    }

    /// All features visible on a type: its own, then inherited ones,
    /// most-derived-first, deduplicated by identity.
    pub fn all_features(&mut self, id: ElementId) -> Vec<ElementId> {
        if let Some(cached) = self.nodes[id.index()]
            .type_facet
            .as_ref()
            .and_then(|t| t.all_features.clone())
        {
            return cached;
        }

        let mut out = self.owned_features(id);
        let mut seen: FxHashSet<ElementId> = out.iter().copied().collect();
        for sup in self.all_supertypes(id) {
            for feature in self.owned_features(sup) {
                if seen.insert(feature) {
                    out.push(feature);
                }
            }
        }

        if let Some(facet) = self.nodes[id.index()].type_facet.as_mut() {
            facet.all_features = Some(out.clone());
        }
        out
    }

    /// Qualified name: `::`-joined effective names along the owner chain,
    /// skipping unnamed scopes and mediating memberships. `None` while the
    /// element or an ancestor is anonymous.
    pub fn qualified_name(&mut self, id: ElementId) -> Option<Arc<str>> {
        if let Some(cached) = self.nodes[id.index()].qualified_name.clone() {
            return Some(cached);
        }

        let mut segments: Vec<SmolStr> = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let data = &self.nodes[current.index()];
            if !self.is_kind(current, Kind::Relationship) {
                match data.effective_name() {
                    Some(name) => segments.push(name.clone()),
                    None if data.owner.is_none() => {} // anonymous root scope
                    None => return None,
                }
            }
            cursor = data.owner;
        }
        if segments.is_empty() {
            return None;
        }
        segments.reverse();
        let joined: Arc<str> = segments
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join("::")
            .into();
        self.nodes[id.index()].qualified_name = Some(joined.clone());
        Some(joined)
    }

    /// Dereference a feature through its chaining edges to the feature it
    /// ultimately stands for. Cycle-guarded; non-features return themselves.
    pub fn basic_feature(&self, id: ElementId) -> ElementId {
        let mut current = id;
        let mut seen: FxHashSet<ElementId> = FxHashSet::default();
        while seen.insert(current) {
            let Some(facet) = self.nodes[current.index()].feature_facet.as_ref() else {
                return current;
            };
            let Some(&last) = facet.chainings.last() else {
                return current;
            };
            let Some(target) = self.nodes[last.index()]
                .edge_facet
                .as_ref()
                .and_then(|e| e.target)
            else {
                return current;
            };
            current = target;
        }
        current
    }

    /// The resolved metaclass element, if resolution already happened.
    pub fn metaclass(&self, id: ElementId) -> Option<ElementId> {
        self.nodes[id.index()].metaclass.resolved()
    }

    // ------------------------------------------------------------------
    // Privileged mutation (builder only)
    // ------------------------------------------------------------------

    /// Append a heritage edge and invalidate the type's derived caches.
    pub(crate) fn add_heritage(&mut self, type_id: ElementId, edge: ElementId) {
        if let Some(facet) = self.nodes[type_id.index()].type_facet.as_mut() {
            facet.heritage.push(edge);
        }
        self.on_heritage_changed(type_id);
    }

    /// Heritage-change hook: derived supertype/feature sets are stale.
    pub(crate) fn on_heritage_changed(&mut self, type_id: ElementId) {
        if let Some(facet) = self.nodes[type_id.index()].type_facet.as_mut() {
            facet.all_supertypes = None;
            facet.all_features = None;
        }
    }

    pub(crate) fn set_setup(&mut self, id: ElementId, state: SetupState) {
        self.nodes[id.index()].setup = state;
    }

    // ------------------------------------------------------------------
    // Invalidation
    // ------------------------------------------------------------------

    /// Invalidate a document's elements after a re-parse.
    ///
    /// Elements in `keep` survive with their identity; everything else —
    /// orphaned user elements and all synthesized ones — is detached from
    /// the document and its owner. Returns the survivors in construction
    /// order; the builder runs its artifact-clearing chains over them.
    pub(crate) fn invalidate_document(
        &mut self,
        document: DocumentId,
        keep: &FxHashSet<ElementId>,
    ) -> Vec<ElementId> {
        let ids = self
            .by_document
            .get(&document)
            .cloned()
            .unwrap_or_default();
        trace!("[INVALIDATE] document={:?} elements={}", document, ids.len());

        let mut surviving = Vec::with_capacity(ids.len());
        for id in ids {
            if keep.contains(&id) {
                surviving.push(id);
            } else {
                self.detach(id, document);
            }
        }
        self.by_document.insert(document, surviving.clone());
        surviving
    }

    /// Strip heritage edges the builder synthesized. Explicit edges keep
    /// their position but lose their resolved target so re-linking can
    /// resolve them afresh.
    pub(crate) fn strip_implied_heritage(&mut self, id: ElementId) {
        let implied: Vec<ElementId> = {
            let data = &self.nodes[id.index()];
            data.type_facet
                .as_ref()
                .map(|t| {
                    t.heritage
                        .iter()
                        .copied()
                        .filter(|&e| self.nodes[e.index()].is_implied())
                        .collect()
                })
                .unwrap_or_default()
        };
        if let Some(facet) = self.nodes[id.index()].type_facet.as_mut() {
            facet.heritage.retain(|e| !implied.contains(e));
        }
        for edge in implied {
            if let Some(doc) = self.nodes[edge.index()].document {
                self.detach(edge, doc);
            } else if let Some(owner) = self.nodes[edge.index()].owner {
                self.nodes[owner.index()].children.retain(|&c| c != edge);
                self.nodes[edge.index()].owner = None;
            }
        }
        self.on_heritage_changed(id);
    }

    /// Clear the common-core derived state of `id`, keeping identity.
    pub(crate) fn clear_element_artifacts(&mut self, id: ElementId) {
        let data = &mut self.nodes[id.index()];
        data.setup = SetupState::None;
        data.qualified_name = None;
        data.name_override = None;
        data.metaclass = Lazy::Unresolved;
        data.metaclass_feature = None;
        if let Some(facet) = data.edge_facet.as_mut() {
            if facet.target_ref.is_some() {
                facet.target = None;
            }
            if facet.source_ref.is_some() {
                facet.source = None;
            }
        }
    }

    /// Remove an element from its document and owner. The arena slot stays
    /// (ids are stable); the element is simply unreachable from the model.
    fn detach(&mut self, id: ElementId, document: DocumentId) {
        if let Some(owner) = self.nodes[id.index()].owner {
            self.nodes[owner.index()].children.retain(|&c| c != id);
        }
        self.nodes[id.index()].owner = None;
        self.nodes[id.index()].document = None;
        if let Some(syntax) = self.nodes[id.index()].syntax {
            self.syntax_map.remove(&(document, syntax));
        }
    }

    // ------------------------------------------------------------------
    // Facet mutators used by initializer and rule chains
    // ------------------------------------------------------------------

    pub(crate) fn type_facet_mut(&mut self, id: ElementId) -> Option<&mut TypeFacet> {
        self.nodes[id.index()].type_facet.as_mut()
    }

    pub(crate) fn feature_facet_mut(&mut self, id: ElementId) -> Option<&mut FeatureFacet> {
        self.nodes[id.index()].feature_facet.as_mut()
    }

    pub(crate) fn edge_facet_mut(&mut self, id: ElementId) -> Option<&mut EdgeFacet> {
        self.nodes[id.index()].edge_facet.as_mut()
    }

    pub(crate) fn membership_facet_mut(&mut self, id: ElementId) -> Option<&mut MembershipFacet> {
        self.nodes[id.index()].membership_facet.as_mut()
    }

    pub(crate) fn expr_facet_mut(&mut self, id: ElementId) -> Option<&mut ExprFacet> {
        self.nodes[id.index()].expr_facet.as_mut()
    }

    pub(crate) fn set_name_override(&mut self, id: ElementId, name: Option<SmolStr>) {
        self.nodes[id.index()].name_override = name;
        self.nodes[id.index()].qualified_name = None;
    }

    pub(crate) fn set_metaclass(&mut self, id: ElementId, cache: Lazy<ElementId>) {
        self.nodes[id.index()].metaclass = cache;
    }

    pub(crate) fn set_metaclass_feature(&mut self, id: ElementId, feature: Option<ElementId>) {
        self.nodes[id.index()].metaclass_feature = feature;
    }
}
