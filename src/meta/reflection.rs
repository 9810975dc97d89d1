//! Metaclass reflection names.
//!
//! Every element is annotated with a standard-library "metaclass" element
//! whose name matches the element's own kind name. The library splits its
//! reflection content across one package per dialect; lookup tries them in
//! the fixed order below.

use super::kinds::Kind;

/// Library packages searched for metaclass elements, most specific dialect
/// first.
pub const METACLASS_PACKAGES: &[&str] = &["SysML", "KerML"];

/// The library element name reflecting `kind`, or `None` for kinds with no
/// metaclass (union markers).
///
/// A few names are overridden where the library element's name differs from
/// the kind name: the import kinds share the single `Import` metaclass.
pub fn metaclass_name(kind: Kind) -> Option<&'static str> {
    if kind.is_union_marker() {
        return None;
    }
    Some(match kind {
        Kind::MembershipImport | Kind::NamespaceImport => "Import",
        other => other.as_str(),
    })
}

/// Qualified candidate names for `kind`'s metaclass, in search order.
pub fn metaclass_candidates(kind: Kind) -> Vec<String> {
    match metaclass_name(kind) {
        Some(name) => METACLASS_PACKAGES
            .iter()
            .map(|package| format!("{package}::{name}"))
            .collect(),
        None => Vec::new(),
    }
}
