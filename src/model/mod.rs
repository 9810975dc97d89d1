//! The semantic model: one long-lived element per recognized syntax node.
//!
//! Elements live in a [`ModelArena`] and reference each other by
//! [`ElementId`], so the graph's many cycles (owner pointers, heritage
//! edges pointing both ways) never fight the ownership model. The arena is
//! the single source of truth; all post-construction mutation goes through
//! its crate-visible mutators, which is what keeps "only the builder may
//! mutate after construction" honest.

mod arena;
mod element;

pub use arena::ModelArena;
pub use element::{
    EdgeFacet, ElementData, ExprFacet, FeatureFacet, FeatureValue, Lazy, MembershipFacet,
    SetupState, TypeFacet, feature_class,
};

pub use crate::base::ElementId;
