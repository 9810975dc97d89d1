//! Metaclass assignment.
//!
//! Resolution is lazy: the rule arms the tri-state cache and the builder's
//! [`crate::build::ModelBuilder::metaclass`] accessor resolves, synthesizes
//! the annotating metadata feature, and pre-links the metaclass on first
//! access. Kinds with no metaclass at all are marked failed up front.

use crate::base::{DocumentId, ElementId};
use crate::build::ModelBuilder;
use crate::meta::metaclass_name;
use crate::model::Lazy;

pub(crate) fn arm_metaclass(b: &mut ModelBuilder, id: ElementId, _doc: Option<DocumentId>) {
    let kind = b.arena.kind(id);
    if metaclass_name(kind).is_none() {
        b.arena.set_metaclass(id, Lazy::Failed);
    }
}
