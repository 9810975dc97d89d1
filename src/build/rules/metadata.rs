//! Metadata-conditioned implicit specialization.
//!
//! For a type annotated with library "semantic metadata", evaluates the
//! metadata's declared base-type value expression and attaches an implicit
//! specialization to every element the evaluation resolves to. This is the
//! one place pre-linking's outcome depends on evaluating a value expression
//! rather than structural lookup, which is why it runs after the ordinary
//! implicit-specialization rules.

use crate::base::{DocumentId, ElementId, Severity};
use crate::build::ModelBuilder;
use crate::eval::{EvalCx, Value};
use crate::meta::Kind;

const SEMANTIC_METADATA: &str = "Metaobjects::SemanticMetadata";
const BASE_TYPE_FEATURE: &str = "baseType";

pub(crate) fn semantic_metadata_specialization(
    b: &mut ModelBuilder,
    id: ElementId,
    _doc: Option<DocumentId>,
) {
    let metaclass_feature = b.arena.get(id).metaclass_feature();
    let annotations: Vec<ElementId> = b
        .arena
        .get(id)
        .children
        .iter()
        .copied()
        .filter(|&c| b.arena.is_kind(c, Kind::MetadataFeature) && Some(c) != metaclass_feature)
        .collect();
    if annotations.is_empty() {
        return;
    }
    let Some(semantic) = b.find_global(SEMANTIC_METADATA) else {
        return;
    };

    for metadata in annotations {
        b.pre_link(metadata);
        if !b.arena.all_supertypes(metadata).contains(&semantic) {
            continue;
        }
        let Some(base_type) = b
            .arena
            .all_features(metadata)
            .into_iter()
            .find(|&f| b.arena.get(f).effective_name().map(|n| n.as_str()) == Some(BASE_TYPE_FEATURE))
        else {
            continue;
        };

        let result = {
            let mut cx = EvalCx::new(&mut b.arena, &b.global);
            b.evaluator.evaluate_feature_in(&mut cx, base_type, metadata)
        };
        match result {
            Ok(values) => {
                let edge_kind = b.natural_heritage_kind(b.arena.kind(id));
                for value in values {
                    let Value::Element(base) = value else { continue };
                    if base == id || !b.arena.is_kind(base, Kind::Type) {
                        continue;
                    }
                    b.pre_link(base);
                    if b.arena.all_supertypes(id).contains(&base) {
                        continue;
                    }
                    b.attach_implied_heritage(id, base, edge_kind);
                }
            }
            Err(error) => {
                b.diagnostic(metadata, Severity::Error, error.message.to_string());
            }
        }
    }
}
