//! Reference resolution: from a textual path to a model element.
//!
//! The builder does not implement scope search itself; it goes through the
//! [`ReferenceResolver`] seam. This module ships the scope-walking
//! implementation: own members → inherited members → imports → enclosing
//! scopes → global exports.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{trace, warn};

use crate::base::{ElementId, LangId};
use crate::meta::Kind;
use crate::model::ModelArena;

use super::global::GlobalScope;

// Depth counter for diagnosing runaway resolution chains.
static CALL_DEPTH: AtomicUsize = AtomicUsize::new(0);

/// The reference-linking collaborator interface the builder consumes.
pub trait ReferenceResolver {
    /// Resolve a `::`-qualified (possibly `.`-chained) path written at
    /// `scope`. Returns `None` when any segment fails to resolve; the caller
    /// decides whether that warrants a diagnostic.
    fn link_reference(
        &self,
        arena: &mut ModelArena,
        global: &GlobalScope,
        scope: ElementId,
        path: &str,
        lang: LangId,
    ) -> Option<ElementId>;

    /// Resolve an import target path. Import targets name namespaces, so
    /// feature-chain paths are rejected here.
    fn resolve_import(
        &self,
        arena: &mut ModelArena,
        global: &GlobalScope,
        scope: ElementId,
        path: &str,
        lang: LangId,
    ) -> Option<ElementId>;

    /// Qualified-name lookup across documents and the standard library.
    fn find_global_element(
        &self,
        arena: &mut ModelArena,
        global: &GlobalScope,
        qualified: &str,
        lang: Option<LangId>,
    ) -> Option<ElementId>;
}

/// Scope-walking resolver over the model graph and global exports.
#[derive(Default)]
pub struct Resolver;

impl Resolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve one simple name starting at `scope`, walking enclosing
    /// namespaces outwards and falling back to the global exports.
    fn resolve_simple(
        &self,
        arena: &mut ModelArena,
        global: &GlobalScope,
        scope: ElementId,
        name: &str,
        lang: LangId,
    ) -> Option<ElementId> {
        let depth = CALL_DEPTH.fetch_add(1, Ordering::SeqCst);
        if depth > 100 && depth % 100 == 0 {
            warn!("[RESOLVE] depth={} name='{}' scope={:?}", depth, name, scope);
        }
        let result = self.resolve_simple_inner(arena, global, scope, name, lang);
        CALL_DEPTH.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn resolve_simple_inner(
        &self,
        arena: &mut ModelArena,
        global: &GlobalScope,
        scope: ElementId,
        name: &str,
        lang: LangId,
    ) -> Option<ElementId> {
        trace!("[RESOLVE] name='{}' scope={:?}", name, scope);

        let mut current = Some(scope);
        while let Some(ns) = current {
            if let Some(found) = self.member_with_inherited(arena, ns, name) {
                return Some(found);
            }
            if let Some(found) = self.member_via_imports(arena, ns, name) {
                return Some(found);
            }
            current = arena.get(ns).owner;
        }

        let entry = global
            .get_exported_element(name, Some(lang))
            .or_else(|| global.get_exported_element(name, None))?;
        Some(entry.element)
    }

    /// Own members first, then members inherited through heritage.
    fn member_with_inherited(
        &self,
        arena: &mut ModelArena,
        namespace: ElementId,
        name: &str,
    ) -> Option<ElementId> {
        if let Some(found) = arena.find_member(namespace, name) {
            return Some(found);
        }
        if arena.get(namespace).type_facet().is_some() {
            for sup in arena.all_supertypes(namespace) {
                if let Some(found) = arena.find_member(sup, name) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Members visible through resolved imports of `namespace`.
    fn member_via_imports(
        &self,
        arena: &mut ModelArena,
        namespace: ElementId,
        name: &str,
    ) -> Option<ElementId> {
        for import in arena.owned_imports(namespace) {
            let Some(facet) = arena.get(import).edge_facet() else {
                continue;
            };
            let Some(target) = facet.target else { continue };
            let wildcard = facet.import.map(|i| i.wildcard).unwrap_or(false);
            let recursive = facet.import.map(|i| i.recursive).unwrap_or(false);
            if wildcard {
                if let Some(found) = arena.find_member(target, name) {
                    return Some(found);
                }
                if recursive {
                    if let Some(found) = self.member_recursive(arena, target, name) {
                        return Some(found);
                    }
                }
            } else {
                // Membership import: the imported name itself becomes
                // visible here.
                if arena.get(target).effective_name().map(|n| n.as_str()) == Some(name) {
                    return Some(target);
                }
            }
        }
        None
    }

    fn member_recursive(
        &self,
        arena: &ModelArena,
        namespace: ElementId,
        name: &str,
    ) -> Option<ElementId> {
        for membership in arena.owned_memberships(namespace) {
            let Some(member) = arena
                .get(membership)
                .membership_facet()
                .and_then(|m| m.member)
            else {
                continue;
            };
            if let Some(found) = arena.find_member(member, name) {
                return Some(found);
            }
            if arena.is_kind(member, Kind::Namespace) {
                if let Some(found) = self.member_recursive(arena, member, name) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Resolve the remaining `::` segments inside an already-resolved
    /// namespace.
    fn resolve_members(
        &self,
        arena: &mut ModelArena,
        mut current: ElementId,
        segments: &[&str],
    ) -> Option<ElementId> {
        for segment in segments {
            current = self.member_with_inherited(arena, current, segment)?;
        }
        Some(current)
    }
}

impl ReferenceResolver for Resolver {
    fn link_reference(
        &self,
        arena: &mut ModelArena,
        global: &GlobalScope,
        scope: ElementId,
        path: &str,
        lang: LangId,
    ) -> Option<ElementId> {
        // Feature-chain paths resolve segment-by-segment through features.
        if let Some((head, rest)) = path.split_once('.') {
            let mut current = self.link_reference(arena, global, scope, head, lang)?;
            for segment in rest.split('.') {
                current = self.member_with_inherited(arena, current, segment)?;
            }
            return Some(current);
        }

        let mut segments = path.split("::");
        let first = segments.next()?;
        let first = self.resolve_simple(arena, global, scope, first, lang)?;
        self.resolve_members(arena, first, &segments.collect::<Vec<_>>())
    }

    fn resolve_import(
        &self,
        arena: &mut ModelArena,
        global: &GlobalScope,
        scope: ElementId,
        path: &str,
        lang: LangId,
    ) -> Option<ElementId> {
        if path.contains('.') {
            return None;
        }
        self.link_reference(arena, global, scope, path, lang)
    }

    fn find_global_element(
        &self,
        arena: &mut ModelArena,
        global: &GlobalScope,
        qualified: &str,
        lang: Option<LangId>,
    ) -> Option<ElementId> {
        let mut segments = qualified.split("::");
        let first = segments.next()?;
        let entry = match lang {
            Some(l) => global
                .get_exported_element(first, Some(l))
                .or_else(|| global.get_exported_element(first, None)),
            None => global.get_exported_element(first, None),
        }?;
        let root = entry.element;
        self.resolve_members(arena, root, &segments.collect::<Vec<_>>())
    }
}
