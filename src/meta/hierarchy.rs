//! The type hierarchy index.
//!
//! Built once at startup from the raw subtype facts in [`Kind`], this index
//! gives every kind a deterministic, total order over its supertypes — the
//! "inheritance chain" — and implements the registry expansions that turn
//! sparse per-kind declarations into dense per-concrete-kind tables.
//!
//! Chain construction works in three steps per kind:
//! 1. partition the kind's ancestors into true types, union markers, and
//!    relationship kinds;
//! 2. order each bucket by the subtype partial order;
//! 3. merge markers and relationship kinds into the type order by inserting
//!    each immediately after the last chain element it is a subtype of,
//!    then orient the whole chain most-specialized-first.
//!
//! The index has no runtime failure mode after construction; kinds missing
//! from the enumeration are simply absent.

use rustc_hash::{FxHashMap, FxHashSet};

use super::kinds::{ALL_KINDS, Kind};

/// Walk order for [`KindIndex::chain_registry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainOrder {
    /// Most general ancestor first, the kind's own entry last.
    SupertypeFirst,
    /// The kind's own entry first, most general ancestor last.
    SubtypeFirst,
}

/// Immutable-after-construction hierarchy index over the [`Kind`] space.
pub struct KindIndex {
    /// Inheritance chain per kind: the kind itself first, then all ancestors
    /// most-specialized-first.
    chains: FxHashMap<Kind, Vec<Kind>>,
    /// All supertypes per kind (excluding the kind itself).
    supertypes: FxHashMap<Kind, FxHashSet<Kind>>,
    /// All subtypes per kind (excluding the kind itself).
    subtypes: FxHashMap<Kind, FxHashSet<Kind>>,
}

impl KindIndex {
    pub fn new() -> Self {
        let mut closures: FxHashMap<Kind, FxHashSet<Kind>> = FxHashMap::default();
        for &kind in ALL_KINDS {
            raw_closure(kind, &mut closures);
        }

        let mut chains = FxHashMap::default();
        let mut supertypes: FxHashMap<Kind, FxHashSet<Kind>> = FxHashMap::default();
        let mut subtypes: FxHashMap<Kind, FxHashSet<Kind>> = FxHashMap::default();

        for &kind in ALL_KINDS {
            let chain = build_chain(kind, &closures);
            let sups: FxHashSet<Kind> = chain.iter().copied().skip(1).collect();
            for &sup in &sups {
                subtypes.entry(sup).or_default().insert(kind);
            }
            supertypes.insert(kind, sups);
            chains.insert(kind, chain);
        }

        Self {
            chains,
            supertypes,
            subtypes,
        }
    }

    /// True if `a` is `b` or `b` is among `a`'s supertypes. O(1).
    pub fn is_subtype(&self, a: Kind, b: Kind) -> bool {
        a == b || self.supertypes[&a].contains(&b)
    }

    /// The inheritance chain of `kind`: itself first, ancestors
    /// most-specialized-first.
    pub fn chain_of(&self, kind: Kind) -> &[Kind] {
        &self.chains[&kind]
    }

    /// All strict subtypes of `kind`.
    pub fn subtypes_of(&self, kind: Kind) -> impl Iterator<Item = Kind> + '_ {
        self.subtypes
            .get(&kind)
            .into_iter()
            .flat_map(|s| s.iter().copied())
    }

    /// Expand a sparse registry to every kind: a kind maps to its own entry
    /// if present, else to the entry of its nearest ancestor in chain order,
    /// else to `default` if given. Kinds with no applicable entry are absent
    /// from the result.
    pub fn expand_to_derived<V: Clone>(
        &self,
        sparse: &FxHashMap<Kind, V>,
        default: Option<&V>,
    ) -> FxHashMap<Kind, V> {
        let mut dense = FxHashMap::default();
        for &kind in ALL_KINDS {
            let hit = self
                .chains[&kind]
                .iter()
                .find_map(|k| sparse.get(k))
                .or(default);
            if let Some(value) = hit {
                dense.insert(kind, value.clone());
            }
        }
        dense
    }

    /// Expand a registry of per-kind lists to every kind by concatenating the
    /// kind's own list with every ancestor's list. Ancestor order follows the
    /// chain (most specialized first); `reverse` walks the chain backwards so
    /// the most general ancestor contributes first and the kind's own list
    /// comes last.
    pub fn expand_and_merge<V: Clone>(
        &self,
        lists: &FxHashMap<Kind, Vec<V>>,
        reverse: bool,
    ) -> FxHashMap<Kind, Vec<V>> {
        let mut dense = FxHashMap::default();
        for &kind in ALL_KINDS {
            let chain = &self.chains[&kind];
            let mut merged = Vec::new();
            if reverse {
                for k in chain.iter().rev() {
                    if let Some(list) = lists.get(k) {
                        merged.extend(list.iter().cloned());
                    }
                }
            } else {
                for k in chain.iter() {
                    if let Some(list) = lists.get(k) {
                        merged.extend(list.iter().cloned());
                    }
                }
            }
            if !merged.is_empty() {
                dense.insert(kind, merged);
            }
        }
        dense
    }

    /// For every kind, the ordered list of registry values found by walking
    /// its chain. `SupertypeFirst` yields general-to-specific (lifecycle
    /// initializer order), `SubtypeFirst` specific-to-general (artifact
    /// clearing order). A `default` value participates as the entry of the
    /// most general position.
    pub fn chain_registry<V: Clone>(
        &self,
        sparse: &FxHashMap<Kind, V>,
        order: ChainOrder,
        default: Option<&V>,
    ) -> FxHashMap<Kind, Vec<V>> {
        let mut dense = FxHashMap::default();
        for &kind in ALL_KINDS {
            let chain = &self.chains[&kind];
            let mut values = Vec::new();
            match order {
                ChainOrder::SupertypeFirst => {
                    if let Some(d) = default {
                        values.push(d.clone());
                    }
                    for k in chain.iter().rev() {
                        if let Some(v) = sparse.get(k) {
                            values.push(v.clone());
                        }
                    }
                }
                ChainOrder::SubtypeFirst => {
                    for k in chain.iter() {
                        if let Some(v) = sparse.get(k) {
                            values.push(v.clone());
                        }
                    }
                    if let Some(d) = default {
                        values.push(d.clone());
                    }
                }
            }
            if !values.is_empty() {
                dense.insert(kind, values);
            }
        }
        dense
    }
}

impl Default for KindIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Transitive closure of the raw direct-supertype facts, memoized.
fn raw_closure(kind: Kind, memo: &mut FxHashMap<Kind, FxHashSet<Kind>>) -> FxHashSet<Kind> {
    if let Some(found) = memo.get(&kind) {
        return found.clone();
    }
    let mut set = FxHashSet::default();
    for &sup in kind.direct_supertypes() {
        set.insert(sup);
        set.extend(raw_closure(sup, memo));
    }
    memo.insert(kind, set.clone());
    set
}

fn raw_subtype(a: Kind, b: Kind, closures: &FxHashMap<Kind, FxHashSet<Kind>>) -> bool {
    a == b || closures[&a].contains(&b)
}

/// Order a bucket most-general-first: repeatedly take the first remaining
/// kind that has no strict supertype still remaining. Ties keep enumeration
/// order, which makes chains deterministic.
fn order_most_general_first(
    mut remaining: Vec<Kind>,
    closures: &FxHashMap<Kind, FxHashSet<Kind>>,
) -> Vec<Kind> {
    let mut out = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        let pos = remaining
            .iter()
            .position(|&k| {
                !remaining
                    .iter()
                    .any(|&other| other != k && raw_subtype(k, other, closures))
            })
            .unwrap_or(0);
        out.push(remaining.remove(pos));
    }
    out
}

/// Build the inheritance chain for one kind: itself first, all ancestors
/// most-specialized-first, with union markers and relationship ancestors
/// merged in after the last element they are a subtype of.
fn build_chain(kind: Kind, closures: &FxHashMap<Kind, FxHashSet<Kind>>) -> Vec<Kind> {
    let ancestors: Vec<Kind> = ALL_KINDS
        .iter()
        .copied()
        .filter(|&k| k != kind && closures[&kind].contains(&k))
        .collect();

    let mut types = Vec::new();
    let mut unions = Vec::new();
    let mut relationships = Vec::new();
    for k in ancestors {
        if k.is_union_marker() {
            unions.push(k);
        } else if raw_subtype(k, Kind::Relationship, closures) {
            relationships.push(k);
        } else {
            types.push(k);
        }
    }

    // Chain is assembled most-general-first and flipped at the end.
    let mut chain = order_most_general_first(types, closures);
    for bucket in [relationships, unions] {
        for k in order_most_general_first(bucket, closures) {
            let insert_at = chain
                .iter()
                .rposition(|&existing| raw_subtype(k, existing, closures))
                .map(|i| i + 1)
                .unwrap_or(chain.len());
            chain.insert(insert_at, k);
        }
    }

    chain.reverse();
    chain.insert(0, kind);
    chain
}
