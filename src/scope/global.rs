//! The cross-document global export scope.
//!
//! Each document contributes its root namespace's public exports; the scope
//! aggregates them keyed by name plus the document's language id, so that
//! same-named elements from coexisting dialects can be told apart.
//!
//! Invalidation removes a document's contributions by exact identity match
//! against the entries remembered at collection time — O(k) in that
//! document's own export count, not O(n) in total exports.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::base::{DocumentId, ElementId, LangId, Visibility};
use crate::model::ModelArena;

/// One exported name: the membership that mediates it, plus provenance.
#[derive(Debug, Clone)]
pub struct GlobalEntry {
    pub name: Arc<str>,
    pub document: DocumentId,
    pub lang: LangId,
    /// The membership relationship exporting the element.
    pub membership: ElementId,
    /// The exported element itself.
    pub element: ElementId,
}

/// Aggregated export table over all collected documents.
#[derive(Default)]
pub struct GlobalScope {
    /// name → entries in registration order (later entries shadow earlier).
    entries: IndexMap<Arc<str>, Vec<GlobalEntry>>,
    /// Exact entries contributed per document, remembered for removal.
    by_document: FxHashMap<DocumentId, Vec<(Arc<str>, ElementId)>>,
}

impl GlobalScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the exports of a document's root namespace.
    ///
    /// An export is a public, named, owned membership of the root. Called
    /// once per document after construction; re-collection requires
    /// invalidation first.
    pub fn collect_document(
        &mut self,
        arena: &ModelArena,
        document: DocumentId,
        lang: LangId,
        root: ElementId,
    ) {
        let mut remembered = Vec::new();
        for membership in arena.owned_memberships(root) {
            let Some(facet) = arena.get(membership).membership_facet() else {
                continue;
            };
            if facet.visibility != Visibility::Public {
                continue;
            }
            let Some(element) = facet.member else { continue };
            let Some(name) = arena.membership_name(membership) else {
                continue;
            };
            let name: Arc<str> = name.as_str().into();
            trace!(
                "[EXPORTS] document={:?} name='{}' element={:?}",
                document, name, element
            );
            self.entries
                .entry(name.clone())
                .or_default()
                .push(GlobalEntry {
                    name: name.clone(),
                    document,
                    lang,
                    membership,
                    element,
                });
            remembered.push((name, membership));
        }
        self.by_document.insert(document, remembered);
    }

    /// Look up an exported name.
    ///
    /// A language filter is applied first; among the remaining candidates
    /// the last-registered entry wins.
    pub fn get_exported_element(&self, name: &str, lang: Option<LangId>) -> Option<&GlobalEntry> {
        let candidates = self.entries.get(name)?;
        match lang {
            Some(lang) => candidates.iter().rev().find(|e| e.lang == lang),
            None => candidates.last(),
        }
    }

    /// All entries currently registered under `name`, oldest first.
    pub fn entries_for(&self, name: &str) -> &[GlobalEntry] {
        self.entries
            .get(name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Remove exactly the named documents' contributions, leaving all other
    /// exports and their relative order intact.
    pub fn invalidate_documents(&mut self, documents: &[DocumentId]) {
        for &document in documents {
            let Some(remembered) = self.by_document.remove(&document) else {
                continue;
            };
            for (name, membership) in remembered {
                if let Some(candidates) = self.entries.get_mut(&name) {
                    candidates
                        .retain(|e| !(e.document == document && e.membership == membership));
                    if candidates.is_empty() {
                        self.entries.shift_remove(&name);
                    }
                }
            }
        }
    }

    /// Number of distinct exported names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
