//! The metamodel builder — construction and pre-linking.
//!
//! [`ModelBuilder`] owns the two build phases:
//!
//! - **Phase 1** (`on_parsed`/`on_changed`): one model element per syntax
//!   node via the kind-keyed factory, then a second initializer pass that
//!   copies syntax payloads general-to-specific. Re-parses keep element
//!   identity where the syntax survived and clear derived artifacts
//!   specific-to-general instead of reconstructing.
//! - **Phase 2** (`pre_link`): the recursive, priority-ordered, re-entrancy
//!   guarded resolution pass. Rules that need another node fully set up call
//!   `pre_link` on it inline; the setup-state guard makes that terminate on
//!   cyclic graphs and ensures no node is processed twice.
//!
//! Cancellation is checked only between top-level nodes of a document; a
//! single node's recursion always runs to completion so that `Completed`
//! reliably means fully linked.

mod factory;
mod rules;

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::base::{DocumentId, ElementId, LangId, ModelDiagnostic, Severity};
use crate::eval::{EvalCx, Evaluator, ExpressionError, Seq};
use crate::meta::{ImplicitIndex, Kind, KindIndex, metaclass_candidates};
use crate::model::{Lazy, ModelArena, SetupState};
use crate::scope::{GlobalScope, ReferenceResolver, Resolver};
use crate::syntax::SyntaxTree;

use factory::{ClearFn, CtorFn, InitFn};
pub(crate) use rules::BuilderRule;

/// Per-document builder state.
pub struct DocumentState {
    pub lang: LangId,
    pub uri: Arc<str>,
    pub tree: SyntaxTree,
    pub root: Option<ElementId>,
    pub diagnostics: Vec<ModelDiagnostic>,
}

/// The two-phase metamodel builder and linker.
pub struct ModelBuilder {
    pub(crate) kinds: Arc<KindIndex>,
    pub(crate) implicits: ImplicitIndex,
    pub(crate) evaluator: Evaluator,
    resolver: Arc<dyn ReferenceResolver>,
    factory: FxHashMap<Kind, CtorFn>,
    initializers: FxHashMap<Kind, Vec<InitFn>>,
    clearers: FxHashMap<Kind, Vec<ClearFn>>,
    rules: FxHashMap<Kind, Vec<BuilderRule>>,
    pub(crate) arena: ModelArena,
    pub(crate) global: GlobalScope,
    documents: FxHashMap<DocumentId, DocumentState>,
    next_document: u32,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(Resolver::new()))
    }

    /// Construct with a custom reference-linking collaborator.
    pub fn with_resolver(resolver: Arc<dyn ReferenceResolver>) -> Self {
        let kinds = Arc::new(KindIndex::new());
        let implicits = ImplicitIndex::new(&kinds);
        let evaluator = Evaluator::new(Arc::clone(&kinds));
        let factory = factory::factory_table(&kinds);
        let initializers = factory::initializer_chains(&kinds);
        let clearers = factory::clear_chains(&kinds);
        let rules = rules::rule_table(&kinds);
        let arena = ModelArena::new(Arc::clone(&kinds));
        Self {
            kinds,
            implicits,
            evaluator,
            resolver,
            factory,
            initializers,
            clearers,
            rules,
            arena,
            global: GlobalScope::new(),
            documents: FxHashMap::default(),
            next_document: 0,
        }
    }

    // ------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------

    pub fn arena(&self) -> &ModelArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut ModelArena {
        &mut self.arena
    }

    pub fn global(&self) -> &GlobalScope {
        &self.global
    }

    pub fn kinds(&self) -> &KindIndex {
        &self.kinds
    }

    pub fn document(&self, id: DocumentId) -> Option<&DocumentState> {
        self.documents.get(&id)
    }

    pub fn diagnostics(&self, id: DocumentId) -> &[ModelDiagnostic] {
        self.documents
            .get(&id)
            .map(|d| d.diagnostics.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn lang_of(&self, element: ElementId) -> LangId {
        self.arena
            .get(element)
            .document
            .and_then(|doc| self.documents.get(&doc))
            .map(|d| d.lang)
            .unwrap_or(LangId::Sysml)
    }

    // ------------------------------------------------------------------
    // Phase 1 — construction
    // ------------------------------------------------------------------

    /// Register a freshly parsed document and construct its model elements.
    pub fn add_document(&mut self, uri: impl Into<Arc<str>>, tree: SyntaxTree) -> DocumentId {
        let id = DocumentId(self.next_document);
        self.next_document += 1;
        let uri = uri.into();
        let lang = LangId::from_uri(&uri);
        self.documents.insert(
            id,
            DocumentState {
                lang,
                uri,
                tree,
                root: None,
                diagnostics: Vec::new(),
            },
        );
        self.on_parsed(id);
        id
    }

    /// Construct model elements for every syntax node of `document` and run
    /// the initializer pass, then collect the document's global exports.
    pub fn on_parsed(&mut self, document: DocumentId) {
        let tree = match self.documents.get(&document) {
            Some(state) => state.tree.clone(),
            None => return,
        };
        debug!("[BUILD] on_parsed document={:?} nodes={}", document, tree.len());

        // One construction per syntax node, ownership mirroring the tree.
        let order = tree.preorder();
        let mut root = None;
        for &sid in &order {
            if self.arena.element_for_syntax(document, sid).is_some() {
                continue; // surviving element, identity preserved
            }
            let node = tree.node(sid);
            let ctor = self
                .factory
                .get(&node.kind)
                .unwrap_or_else(|| panic!("no factory registered for kind {}", node.kind));
            ctor(&mut self.arena, node.kind, Some(document), sid);
        }
        for &sid in &order {
            let id = self
                .arena
                .element_for_syntax(document, sid)
                .expect("constructed above");
            match tree.node(sid).parent {
                Some(parent_sid) => {
                    let parent = self
                        .arena
                        .element_for_syntax(document, parent_sid)
                        .expect("parents precede children in preorder");
                    self.arena.attach_child(parent, id);
                }
                None => root = Some(id),
            }
        }

        // Second pass: copy syntax payloads, general initializers first.
        for &sid in &order {
            let id = self.arena.element_for_syntax(document, sid).expect("mapped");
            let node = tree.node(sid).clone();
            let chain = self.initializers.get(&node.kind).cloned().unwrap_or_default();
            for init in chain {
                init(&mut self.arena, &node, id);
            }
        }

        if let Some(state) = self.documents.get_mut(&document) {
            state.root = root;
        }
        if let Some(root) = root {
            let lang = self.documents[&document].lang;
            self.global
                .collect_document(&self.arena, document, lang, root);
        }
    }

    /// Re-parse path: keep elements whose syntax node survived (same
    /// position, same kind), clear their derived artifacts, drop the rest,
    /// and construct elements for the new nodes.
    pub fn on_changed(&mut self, document: DocumentId, tree: SyntaxTree) {
        let Some(state) = self.documents.get_mut(&document) else {
            return;
        };
        state.tree = tree.clone();
        state.diagnostics.clear();
        self.global.invalidate_documents(&[document]);

        let keep: FxHashSet<ElementId> = self
            .arena
            .elements_of_document(document)
            .iter()
            .copied()
            .filter(|&id| {
                let data = self.arena.get(id);
                match data.syntax {
                    Some(sid) => {
                        sid.index() < tree.len() && tree.node(sid).kind == data.kind
                    }
                    None => false,
                }
            })
            .collect();

        let survivors = self.arena.invalidate_document(document, &keep);
        for id in survivors {
            let kind = self.arena.kind(id);
            let chain = self.clearers.get(&kind).cloned().unwrap_or_default();
            for clear in chain {
                clear(&mut self.arena, id);
            }
        }

        self.on_parsed(document);
    }

    /// Remove documents from the model and the global scope entirely.
    pub fn invalidate_documents(&mut self, documents: &[DocumentId]) {
        self.global.invalidate_documents(documents);
        for &document in documents {
            self.arena
                .invalidate_document(document, &FxHashSet::default());
            self.documents.remove(&document);
        }
    }

    // ------------------------------------------------------------------
    // Phase 2 — pre-linking
    // ------------------------------------------------------------------

    /// Pre-link every element of a document, checking cancellation between
    /// nodes (never inside a node's recursion).
    pub fn pre_link_document(&mut self, document: DocumentId, cancel: &CancellationToken) {
        let elements = self.arena.elements_of_document(document).to_vec();
        for element in elements {
            if cancel.is_cancelled() {
                debug!("[PRELINK] cancelled in document {:?}", document);
                return;
            }
            self.pre_link(element);
        }
    }

    /// Pre-link every registered document, in registration order.
    pub fn pre_link_all(&mut self, cancel: &CancellationToken) {
        let mut ids: Vec<DocumentId> = self.documents.keys().copied().collect();
        ids.sort();
        for id in ids {
            if cancel.is_cancelled() {
                return;
            }
            self.pre_link_document(id, cancel);
        }
    }

    /// The central recursive algorithm. Idempotent and cycle-safe: a node
    /// already `Active` (on the call stack) or `Completed` returns
    /// immediately.
    pub fn pre_link(&mut self, element: ElementId) {
        if self.arena.get(element).setup_state() != SetupState::None {
            return;
        }
        self.arena.set_setup(element, SetupState::Active);
        let kind = self.arena.kind(element);
        trace!("[PRELINK] {:?} kind={}", element, kind);

        let document = self.arena.get(element).document;
        let chain = self.rules.get(&kind).cloned().unwrap_or_default();
        for rule in chain {
            (rule.run)(self, element, document);
        }
        self.arena.set_setup(element, SetupState::Completed);
    }

    // ------------------------------------------------------------------
    // Evaluation and lazy accessors
    // ------------------------------------------------------------------

    /// Evaluate an expression with `target` as the contextual "self".
    pub fn evaluate(
        &mut self,
        expr: ElementId,
        target: ElementId,
    ) -> Result<Seq, ExpressionError> {
        let mut cx = EvalCx::new(&mut self.arena, &self.global);
        self.evaluator.evaluate(&mut cx, expr, target)
    }

    /// Multiplicity bounds `(lower, upper)`, evaluated on first access and
    /// memoized. The Infinity literal becomes the `i64::MAX` open-bound
    /// sentinel; no value at all stays `None`.
    pub fn multiplicity_bounds(&mut self, id: ElementId) -> (Option<i64>, Option<i64>) {
        match self.arena.get(id).feature_facet().map(|f| f.bounds) {
            Some(Lazy::Resolved(bounds)) => return bounds,
            Some(Lazy::Failed) => return (None, None),
            Some(Lazy::Unresolved) => {}
            None => return (None, None),
        }

        let exprs: Vec<ElementId> = self
            .arena
            .get(id)
            .children
            .iter()
            .copied()
            .filter(|&c| self.arena.is_kind(c, Kind::Expression))
            .collect();
        let target = self.arena.get(id).owner.unwrap_or(id);

        let computed = (|| -> Result<(Option<i64>, Option<i64>), ExpressionError> {
            match exprs.as_slice() {
                [] => Ok((None, None)),
                [upper] => {
                    let mut cx = EvalCx::new(&mut self.arena, &self.global);
                    let upper = self.evaluator.evaluate_bound(&mut cx, *upper, target)?;
                    let lower = match upper {
                        Some(i64::MAX) => Some(0),
                        other => other,
                    };
                    Ok((lower, upper))
                }
                [lower, upper, ..] => {
                    let mut cx = EvalCx::new(&mut self.arena, &self.global);
                    let lower = self.evaluator.evaluate_bound(&mut cx, *lower, target)?;
                    let mut cx = EvalCx::new(&mut self.arena, &self.global);
                    let upper = self.evaluator.evaluate_bound(&mut cx, *upper, target)?;
                    Ok((lower, upper))
                }
            }
        })();

        match computed {
            Ok(bounds) => {
                if let Some(facet) = self.arena.feature_facet_mut(id) {
                    facet.bounds = Lazy::Resolved(bounds);
                }
                bounds
            }
            Err(error) => {
                self.diagnostic(id, Severity::Error, error.message.to_string());
                if let Some(facet) = self.arena.feature_facet_mut(id) {
                    facet.bounds = Lazy::Failed;
                }
                (None, None)
            }
        }
    }

    /// The element's metaclass, resolved on first access.
    ///
    /// Resolution searches the reflection packages in order, pre-links the
    /// found metaclass so it is safe to use in expression evaluation, and
    /// synthesizes the metadata feature annotating the element. A missing
    /// metaclass is a model diagnostic, not a failure.
    pub fn metaclass(&mut self, id: ElementId) -> Option<ElementId> {
        match self.arena.get(id).metaclass {
            Lazy::Resolved(found) => return Some(found),
            Lazy::Failed => return None,
            Lazy::Unresolved => {}
        }

        let kind = self.arena.kind(id);
        let mut found = None;
        for qualified in metaclass_candidates(kind) {
            if let Some(element) = self.find_global(&qualified) {
                found = Some(element);
                break;
            }
        }

        match found {
            Some(metaclass) => {
                self.pre_link(metaclass);
                let feature = self.arena.alloc(Kind::MetadataFeature, None, None);
                let typing = self.arena.alloc(Kind::FeatureTyping, None, None);
                if let Some(facet) = self.arena.edge_facet_mut(typing) {
                    facet.is_implied = true;
                    facet.source = Some(feature);
                    facet.target = Some(metaclass);
                }
                self.arena.attach_child(feature, typing);
                self.arena.add_heritage(feature, typing);
                self.arena.attach_child(id, feature);
                self.arena.set_metaclass_feature(id, Some(feature));
                self.arena.set_metaclass(id, Lazy::Resolved(metaclass));
                Some(metaclass)
            }
            None => {
                self.arena.set_metaclass(id, Lazy::Failed);
                self.diagnostic(
                    id,
                    Severity::Error,
                    format!("no metaclass found for kind {kind}"),
                );
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Shared rule plumbing
    // ------------------------------------------------------------------

    /// Resolve a textual reference written at `scope`.
    pub(crate) fn resolve_reference(&mut self, scope: ElementId, path: &str) -> Option<ElementId> {
        let lang = self.lang_of(scope);
        let resolver = Arc::clone(&self.resolver);
        resolver.link_reference(&mut self.arena, &self.global, scope, path, lang)
    }

    pub(crate) fn resolve_import_path(
        &mut self,
        scope: ElementId,
        path: &str,
    ) -> Option<ElementId> {
        let lang = self.lang_of(scope);
        let resolver = Arc::clone(&self.resolver);
        resolver.resolve_import(&mut self.arena, &self.global, scope, path, lang)
    }

    /// Qualified-name lookup across documents and the standard library.
    pub fn find_global(&mut self, qualified: &str) -> Option<ElementId> {
        let resolver = Arc::clone(&self.resolver);
        resolver.find_global_element(&mut self.arena, &self.global, qualified, None)
    }

    /// Append a structured diagnostic to the element's document.
    pub(crate) fn diagnostic(
        &mut self,
        element: ElementId,
        severity: Severity,
        message: impl Into<Arc<str>>,
    ) {
        // Synthetic elements report against the nearest ancestor that has a
        // document.
        let mut cursor = Some(element);
        let document = loop {
            let Some(current) = cursor else { break None };
            if let Some(doc) = self.arena.get(current).document {
                break Some(doc);
            }
            cursor = self.arena.get(current).owner;
        };
        let diagnostic = ModelDiagnostic {
            element,
            message: message.into(),
            severity,
            info: None,
        };
        match document.and_then(|d| self.documents.get_mut(&d)) {
            Some(state) => state.diagnostics.push(diagnostic),
            None => trace!("[DIAG] dropped diagnostic for detached {:?}", element),
        }
    }

    /// Synthesize an implied heritage edge `source —kind→ target`.
    pub(crate) fn attach_implied_heritage(
        &mut self,
        source: ElementId,
        target: ElementId,
        edge_kind: Kind,
    ) -> ElementId {
        let document = self.arena.get(source).document;
        let edge = self.arena.alloc(edge_kind, document, None);
        if let Some(facet) = self.arena.edge_facet_mut(edge) {
            facet.is_implied = true;
            facet.source = Some(source);
            facet.target = Some(target);
        }
        self.arena.attach_child(source, edge);
        self.arena.add_heritage(source, edge);
        edge
    }

    /// The specialization-edge kind a node of `kind` naturally uses.
    pub(crate) fn natural_heritage_kind(&self, kind: Kind) -> Kind {
        if self.kinds.is_subtype(kind, Kind::Feature) {
            Kind::Subsetting
        } else if self.kinds.is_subtype(kind, Kind::Classifier) {
            Kind::Subclassification
        } else {
            Kind::Specialization
        }
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
