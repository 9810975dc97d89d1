//! Metamodel reflection: the kind space and the indices derived from it.
//!
//! Everything here is computed once at startup and immutable afterwards.
//! [`KindIndex`] and [`ImplicitIndex`] are plain service objects handed to
//! the builder and evaluator by reference; there is no global state.

mod hierarchy;
mod implicits;
mod kinds;
mod reflection;

pub use hierarchy::{ChainOrder, KindIndex};
pub use implicits::{ImplicitIndex, ROLE_BASE, ROLE_SOURCE, ROLE_TARGET};
pub use kinds::{ALL_KINDS, Kind};
pub use reflection::{METACLASS_PACKAGES, metaclass_candidates, metaclass_name};

#[cfg(test)]
mod tests;
