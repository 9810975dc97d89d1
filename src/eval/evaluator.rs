//! The type-dispatched, stack-tracked expression interpreter.
//!
//! The dispatch table is built once per [`Evaluator`] from sparse handlers
//! expanded to all concrete kinds through the hierarchy index, so a handler
//! registered for an abstract expression kind applies to every subtype that
//! lacks its own override.
//!
//! Each top-level [`Evaluator::evaluate`] call runs over a fresh [`EvalCx`];
//! the context's stack records the expressions currently being walked and is
//! deliberately NOT popped on failure, so the error value carries the live
//! stack at the failure point.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::base::ElementId;
use crate::meta::{Kind, KindIndex, metaclass_candidates};
use crate::model::ModelArena;
use crate::scope::GlobalScope;

use super::builtins::{self, BuiltinFn};
use super::error::{EvalSignal, ExpressionError};
use super::value::{Seq, Value};

pub(crate) type EvalResult = Result<Seq, EvalSignal>;
pub(crate) type EvalFn = fn(&Evaluator, &mut EvalCx<'_>, ElementId, ElementId) -> EvalResult;

/// Per-call evaluation context: the model, the global scope for metaclass
/// lookups, and the evaluation stack.
pub struct EvalCx<'a> {
    pub arena: &'a mut ModelArena,
    pub global: &'a GlobalScope,
    pub(crate) stack: Vec<ElementId>,
}

impl<'a> EvalCx<'a> {
    pub fn new(arena: &'a mut ModelArena, global: &'a GlobalScope) -> Self {
        Self {
            arena,
            global,
            stack: Vec::new(),
        }
    }

    /// The expressions currently being evaluated, outermost first.
    pub fn stack(&self) -> &[ElementId] {
        &self.stack
    }
}

/// The evaluator service. Immutable after construction; per-call state lives
/// in [`EvalCx`].
pub struct Evaluator {
    kinds: Arc<KindIndex>,
    dispatch: FxHashMap<Kind, EvalFn>,
    builtins: FxHashMap<&'static str, BuiltinFn>,
}

impl Evaluator {
    pub fn new(kinds: Arc<KindIndex>) -> Self {
        let mut sparse: FxHashMap<Kind, EvalFn> = FxHashMap::default();
        sparse.insert(Kind::LiteralBoolean, eval_literal_bool);
        sparse.insert(Kind::LiteralInteger, eval_literal_number);
        sparse.insert(Kind::LiteralRational, eval_literal_number);
        sparse.insert(Kind::LiteralString, eval_literal_string);
        sparse.insert(Kind::LiteralInfinity, eval_literal_infinity);
        sparse.insert(Kind::NullExpression, eval_null);
        sparse.insert(Kind::InvocationExpression, eval_invocation);
        sparse.insert(Kind::FeatureChainExpression, eval_feature_chain_expression);
        sparse.insert(Kind::FeatureReferenceExpression, eval_feature_reference);
        sparse.insert(Kind::MetadataAccessExpression, eval_metadata_access);
        sparse.insert(Kind::Feature, eval_plain_feature);

        let dispatch = kinds.expand_to_derived(&sparse, None);
        Self {
            kinds,
            dispatch,
            builtins: builtins::registry(),
        }
    }

    // ------------------------------------------------------------------
    // Public entry points
    // ------------------------------------------------------------------

    /// Evaluate `expr` with `target` supplying the contextual "self".
    ///
    /// Failures during the walk are converted into an [`ExpressionError`]
    /// carrying the live evaluation stack; no exception escapes.
    pub fn evaluate(
        &self,
        cx: &mut EvalCx<'_>,
        expr: ElementId,
        target: ElementId,
    ) -> Result<Seq, ExpressionError> {
        self.eval_inner(cx, expr, target)
            .map_err(|signal| self.error(cx, expr, signal.message))
    }

    /// Evaluate and demand exactly one numeric value. An empty result is
    /// "no value" and coerces to NaN rather than failing.
    pub fn evaluate_number(
        &self,
        cx: &mut EvalCx<'_>,
        expr: ElementId,
        target: ElementId,
    ) -> Result<f64, ExpressionError> {
        let seq = self.evaluate(cx, expr, target)?;
        if seq.is_empty() {
            return Ok(f64::NAN);
        }
        if seq.len() > 1 {
            return Err(self.error(
                cx,
                expr,
                format!("too many values: expected exactly one, got {}", seq.len()),
            ));
        }
        seq[0]
            .as_number()
            .ok_or_else(|| self.error(cx, expr, "expected a number".to_string()))
    }

    /// Evaluate and demand exactly one boolean value.
    pub fn evaluate_boolean(
        &self,
        cx: &mut EvalCx<'_>,
        expr: ElementId,
        target: ElementId,
    ) -> Result<bool, ExpressionError> {
        let value = self.evaluate_single(cx, expr, target)?;
        value
            .as_bool()
            .ok_or_else(|| self.error(cx, expr, "expected a boolean".to_string()))
    }

    /// Evaluate and demand exactly one string value.
    pub fn evaluate_string(
        &self,
        cx: &mut EvalCx<'_>,
        expr: ElementId,
        target: ElementId,
    ) -> Result<Arc<str>, ExpressionError> {
        let value = self.evaluate_single(cx, expr, target)?;
        match value {
            Value::Text(s) => Ok(s),
            _ => Err(self.error(cx, expr, "expected a string".to_string())),
        }
    }

    /// Evaluate and demand exactly one model element.
    pub fn evaluate_element(
        &self,
        cx: &mut EvalCx<'_>,
        expr: ElementId,
        target: ElementId,
    ) -> Result<ElementId, ExpressionError> {
        let value = self.evaluate_single(cx, expr, target)?;
        value
            .as_element()
            .ok_or_else(|| self.error(cx, expr, "expected a model element".to_string()))
    }

    /// Evaluate a multiplicity bound expression.
    ///
    /// An empty result is an unresolved bound; the Infinity literal maps to
    /// the maximum-safe-integer sentinel.
    pub fn evaluate_bound(
        &self,
        cx: &mut EvalCx<'_>,
        expr: ElementId,
        target: ElementId,
    ) -> Result<Option<i64>, ExpressionError> {
        let seq = self.evaluate(cx, expr, target)?;
        match seq.as_slice() {
            [] => Ok(None),
            [Value::Element(e)] if cx.arena.kind(*e) == Kind::LiteralInfinity => {
                Ok(Some(i64::MAX))
            }
            [Value::Number(n)] => Ok(Some(*n as i64)),
            [_] => Err(self.error(cx, expr, "expected an integer bound".to_string())),
            _ => Err(self.error(
                cx,
                expr,
                format!("too many values: expected exactly one, got {}", seq.len()),
            )),
        }
    }

    /// Evaluate a feature's effective value in a typing context, through
    /// the same fallback search the expression walk uses.
    pub fn evaluate_feature_in(
        &self,
        cx: &mut EvalCx<'_>,
        feature: ElementId,
        context: ElementId,
    ) -> Result<Seq, ExpressionError> {
        self.evaluate_feature(cx, feature, context)
            .map_err(|signal| self.error(cx, feature, signal.message))
    }

    fn evaluate_single(
        &self,
        cx: &mut EvalCx<'_>,
        expr: ElementId,
        target: ElementId,
    ) -> Result<Value, ExpressionError> {
        let mut seq = self.evaluate(cx, expr, target)?;
        match seq.len() {
            0 => Err(self.error(
                cx,
                expr,
                "not enough values: expected exactly one, got 0".to_string(),
            )),
            1 => Ok(seq.remove(0)),
            n => Err(self.error(
                cx,
                expr,
                format!("too many values: expected exactly one, got {n}"),
            )),
        }
    }

    fn error(&self, cx: &EvalCx<'_>, expr: ElementId, message: String) -> ExpressionError {
        ExpressionError {
            expression: expr,
            message: message.into(),
            stack: cx.stack.clone(),
        }
    }

    // ------------------------------------------------------------------
    // The walk
    // ------------------------------------------------------------------

    /// Recursive dispatch. The stack entry is only popped on success.
    pub(crate) fn eval_inner(
        &self,
        cx: &mut EvalCx<'_>,
        expr: ElementId,
        target: ElementId,
    ) -> EvalResult {
        cx.stack.push(expr);
        let kind = cx.arena.kind(expr);
        trace!("[EVAL] {:?} kind={} target={:?}", expr, kind, target);
        let handler = self
            .dispatch
            .get(&kind)
            .unwrap_or_else(|| panic!("no evaluator registered for kind {kind}"));
        let result = handler(self, cx, expr, target)?;
        cx.stack.pop();
        Ok(result)
    }

    pub(crate) fn builtin(&self, qualified: &str) -> Option<BuiltinFn> {
        self.builtins.get(qualified).copied()
    }

    // ------------------------------------------------------------------
    // Feature evaluation
    // ------------------------------------------------------------------

    /// Resolve a feature's effective value within a typing context.
    ///
    /// The fallback search order below is load-bearing: the special "self"
    /// feature, then the feature's own chaining, then a reverse walk over
    /// the context's chaining features with three branches (metadata
    /// `annotatedElement` query, metaclass-typed short-circuit that exempts
    /// expressions, redefinition carrying a value), then the feature's own
    /// value, and finally the feature itself as its own default value.
    pub(crate) fn evaluate_feature(
        &self,
        cx: &mut EvalCx<'_>,
        feature: ElementId,
        context: ElementId,
    ) -> EvalResult {
        let name = cx.arena.get(feature).effective_name().cloned();
        if name.as_deref() == Some("self") {
            return Ok(vec![Value::Element(context)]);
        }

        let own_chain = chaining_targets(cx.arena, feature);
        if !own_chain.is_empty() {
            return self.evaluate_feature_chain(cx, &own_chain, context);
        }

        let contexts = {
            let chain = chaining_targets(cx.arena, context);
            if chain.is_empty() { vec![context] } else { chain }
        };

        for &ctx in contexts.iter().rev() {
            if cx.arena.is_kind(ctx, Kind::MetadataFeature)
                && name.as_deref() == Some("annotatedElement")
            {
                let annotated = cx.arena.get(ctx).owner;
                let Some(annotated) = annotated else {
                    return Ok(Vec::new());
                };
                return Ok(self
                    .metaclass_of(cx, annotated)
                    .map(Value::Element)
                    .into_iter()
                    .collect());
            }

            if is_metaclass_annotation(cx.arena, ctx) {
                // Reflection through the synthesized metaclass annotation is
                // unsupported; expressions alone get to keep searching.
                if !cx.arena.is_kind(feature, Kind::Expression) {
                    return Ok(Vec::new());
                }
                continue;
            }

            if let Some((_, value_expr)) = self.redefining_with_value(cx, ctx, feature) {
                return self.eval_inner(cx, value_expr, ctx);
            }
        }

        let own_value = cx
            .arena
            .get(feature)
            .feature_facet()
            .and_then(|f| f.value)
            .map(|v| v.expression);
        if let Some(value_expr) = own_value {
            return self.eval_inner(cx, value_expr, context);
        }

        // A feature with no resolvable value evaluates to itself.
        Ok(vec![Value::Element(feature)])
    }

    /// Navigate an ordered feature chain through a context, fanning out over
    /// multi-valued intermediate results and flattening the sequences while
    /// letting lazy ranges through unexpanded.
    pub(crate) fn evaluate_feature_chain(
        &self,
        cx: &mut EvalCx<'_>,
        features: &[ElementId],
        context: ElementId,
    ) -> EvalResult {
        let Some((&first, rest)) = features.split_first() else {
            return Ok(Vec::new());
        };
        let values = self.evaluate_feature(cx, first, context)?;
        if rest.is_empty() {
            return Ok(values);
        }

        let mut out = Seq::new();
        for value in values {
            let Value::Element(element) = value else {
                continue;
            };
            if !cx.arena.is_kind(element, Kind::Type) {
                continue;
            }
            let next_context = if cx.arena.is_kind(element, Kind::Feature) && element != context {
                synthesize_chained_feature(cx.arena, context, element)
            } else {
                element
            };
            out.extend(self.evaluate_feature_chain(cx, rest, next_context)?);
        }
        Ok(out)
    }

    /// Find a feature of `ctx` that redefines (or shares the effective name
    /// of) `feature` and owns a bound value.
    fn redefining_with_value(
        &self,
        cx: &mut EvalCx<'_>,
        ctx: ElementId,
        feature: ElementId,
    ) -> Option<(ElementId, ElementId)> {
        if cx.arena.get(ctx).type_facet().is_none() {
            return None;
        }
        let feature_name = cx.arena.get(feature).effective_name().cloned();
        for candidate in cx.arena.all_features(ctx) {
            if candidate == feature {
                continue;
            }
            let Some(value) = cx
                .arena
                .get(candidate)
                .feature_facet()
                .and_then(|f| f.value)
            else {
                continue;
            };
            let redefines = self.redefines(cx, candidate, feature)
                || (feature_name.is_some()
                    && cx.arena.get(candidate).effective_name().cloned() == feature_name);
            if redefines {
                return Some((candidate, value.expression));
            }
        }
        None
    }

    fn redefines(&self, cx: &EvalCx<'_>, feature: ElementId, base: ElementId) -> bool {
        cx.arena.heritage_of(feature).iter().any(|&edge| {
            self.kinds.is_subtype(cx.arena.kind(edge), Kind::Redefinition)
                && cx
                    .arena
                    .get(edge)
                    .edge_facet()
                    .and_then(|e| e.target)
                    == Some(base)
        })
    }

    /// The metaclass of an element: the linker's cache when armed, else a
    /// plain global lookup (no synthesis — the evaluator cannot re-enter
    /// the linker).
    fn metaclass_of(&self, cx: &mut EvalCx<'_>, element: ElementId) -> Option<ElementId> {
        if let Some(found) = cx.arena.metaclass(element) {
            return Some(found);
        }
        let kind = cx.arena.kind(element);
        metaclass_candidates(kind)
            .into_iter()
            .find_map(|qualified| lookup_qualified(cx, &qualified))
    }
}

// ----------------------------------------------------------------------
// Kind handlers
// ----------------------------------------------------------------------

fn eval_literal_bool(
    _ev: &Evaluator,
    cx: &mut EvalCx<'_>,
    expr: ElementId,
    _target: ElementId,
) -> EvalResult {
    use crate::syntax::LiteralValue;
    match cx.arena.get(expr).expr_facet().and_then(|f| f.literal.clone()) {
        Some(LiteralValue::Bool(b)) => Ok(vec![Value::Bool(b)]),
        _ => Err(EvalSignal::new("boolean literal without a value")),
    }
}

fn eval_literal_number(
    _ev: &Evaluator,
    cx: &mut EvalCx<'_>,
    expr: ElementId,
    _target: ElementId,
) -> EvalResult {
    use crate::syntax::LiteralValue;
    match cx.arena.get(expr).expr_facet().and_then(|f| f.literal.clone()) {
        Some(LiteralValue::Int(i)) => Ok(vec![Value::Number(i as f64)]),
        Some(LiteralValue::Real(r)) => Ok(vec![Value::Number(r)]),
        _ => Err(EvalSignal::new("numeric literal without a value")),
    }
}

fn eval_literal_string(
    _ev: &Evaluator,
    cx: &mut EvalCx<'_>,
    expr: ElementId,
    _target: ElementId,
) -> EvalResult {
    use crate::syntax::LiteralValue;
    match cx.arena.get(expr).expr_facet().and_then(|f| f.literal.clone()) {
        Some(LiteralValue::Text(s)) => Ok(vec![Value::Text(s.as_str().into())]),
        _ => Err(EvalSignal::new("string literal without a value")),
    }
}

/// Infinity stays a sentinel element at this layer; conversion to a bound
/// happens at the call site.
fn eval_literal_infinity(
    _ev: &Evaluator,
    _cx: &mut EvalCx<'_>,
    expr: ElementId,
    _target: ElementId,
) -> EvalResult {
    Ok(vec![Value::Element(expr)])
}

/// Null is "no value": the empty sequence.
fn eval_null(
    _ev: &Evaluator,
    _cx: &mut EvalCx<'_>,
    _expr: ElementId,
    _target: ElementId,
) -> EvalResult {
    Ok(Vec::new())
}

fn eval_invocation(
    ev: &Evaluator,
    cx: &mut EvalCx<'_>,
    expr: ElementId,
    target: ElementId,
) -> EvalResult {
    let (function, operator) = {
        let facet = cx
            .arena
            .get(expr)
            .expr_facet()
            .ok_or_else(|| EvalSignal::new("invocation without expression payload"))?;
        (facet.target, facet.operator.clone())
    };

    let qualified: String = if let Some(function) = function {
        cx.arena
            .qualified_name(function)
            .ok_or_else(|| EvalSignal::new("invoked function has no qualified name"))?
            .to_string()
    } else if let Some(op) = operator {
        super::builtins::operator_function(&op)
            .ok_or_else(|| EvalSignal::new(format!("unknown operator '{op}'")))?
            .to_string()
    } else {
        return Err(EvalSignal::new("invocation with no resolvable function"));
    };

    let builtin = ev
        .builtin(&qualified)
        .ok_or_else(|| EvalSignal::new(format!("no builtin implementation for '{qualified}'")))?;
    builtin(ev, cx, expr, target)
}

fn eval_feature_reference(
    ev: &Evaluator,
    cx: &mut EvalCx<'_>,
    expr: ElementId,
    target: ElementId,
) -> EvalResult {
    let referenced = cx
        .arena
        .get(expr)
        .expr_facet()
        .and_then(|f| f.target)
        .ok_or_else(|| EvalSignal::new("unresolved reference"))?;

    if cx.arena.is_kind(referenced, Kind::FeatureReferenceExpression) {
        require_type_context(cx, target)?;
        return ev.evaluate_feature(cx, referenced, target);
    }
    if !cx.arena.is_kind(referenced, Kind::Feature) {
        // A plain type reference evaluates to the element itself.
        return Ok(vec![Value::Element(referenced)]);
    }
    if cx.arena.is_kind(referenced, Kind::InlineExpression) {
        return ev.eval_inner(cx, referenced, target);
    }
    require_type_context(cx, target)?;
    ev.evaluate_feature(cx, referenced, target)
}

fn eval_metadata_access(
    _ev: &Evaluator,
    cx: &mut EvalCx<'_>,
    expr: ElementId,
    _target: ElementId,
) -> EvalResult {
    let referenced = cx
        .arena
        .get(expr)
        .expr_facet()
        .and_then(|f| f.target)
        .ok_or_else(|| EvalSignal::new("unresolved reference"))?;
    Ok(cx
        .arena
        .metadata_of(referenced)
        .into_iter()
        .map(Value::Element)
        .collect())
}

fn eval_feature_chain_expression(
    ev: &Evaluator,
    cx: &mut EvalCx<'_>,
    expr: ElementId,
    target: ElementId,
) -> EvalResult {
    let chained = cx
        .arena
        .get(expr)
        .expr_facet()
        .and_then(|f| f.target)
        .ok_or_else(|| EvalSignal::new("unresolved feature chain"))?;
    require_type_context(cx, target)?;
    ev.evaluate_feature(cx, chained, target)
}

fn eval_plain_feature(
    ev: &Evaluator,
    cx: &mut EvalCx<'_>,
    expr: ElementId,
    target: ElementId,
) -> EvalResult {
    ev.evaluate_feature(cx, expr, target)
}

fn require_type_context(cx: &EvalCx<'_>, target: ElementId) -> Result<(), EvalSignal> {
    if cx.arena.is_kind(target, Kind::Type) {
        Ok(())
    } else {
        Err(EvalSignal::new("feature evaluation requires a type context"))
    }
}

fn lookup_qualified(cx: &EvalCx<'_>, qualified: &str) -> Option<ElementId> {
    let mut segments = qualified.split("::");
    let package = segments.next()?;
    let entry = cx.global.get_exported_element(package, None)?;
    let mut current = entry.element;
    for segment in segments {
        current = cx.arena.find_member(current, segment)?;
    }
    Some(current)
}

/// True for the metadata feature the metaclass accessor synthesized onto an
/// element.
fn is_metaclass_annotation(arena: &ModelArena, ctx: ElementId) -> bool {
    arena
        .get(ctx)
        .owner
        .is_some_and(|owner| arena.get(owner).metaclass_feature() == Some(ctx))
}

/// Resolved targets of a feature's chaining edges, in chain order.
pub(crate) fn chaining_targets(arena: &ModelArena, feature: ElementId) -> Vec<ElementId> {
    arena
        .get(feature)
        .feature_facet()
        .map(|f| {
            f.chainings
                .iter()
                .filter_map(|&edge| arena.get(edge).edge_facet().and_then(|e| e.target))
                .collect()
        })
        .unwrap_or_default()
}

/// Synthesize the chained feature `context.element` used as the context for
/// the remainder of a chain walk.
fn synthesize_chained_feature(
    arena: &mut ModelArena,
    context: ElementId,
    element: ElementId,
) -> ElementId {
    let feature = arena.alloc(Kind::Feature, None, None);
    for step in [context, element] {
        let edge = arena.alloc(Kind::FeatureChaining, None, None);
        if let Some(facet) = arena.edge_facet_mut(edge) {
            facet.is_implied = true;
            facet.source = Some(feature);
            facet.target = Some(step);
        }
        arena.attach_child(feature, edge);
        if let Some(facet) = arena.feature_facet_mut(feature) {
            facet.chainings.push(edge);
        }
    }
    feature
}
