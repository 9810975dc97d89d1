//! Builtin implementations of the core library functions.
//!
//! Invocation expressions resolve their function and delegate entirely to
//! the builtin registered under the function's qualified name; each builtin
//! receives the evaluator back so it can evaluate its own arguments (and
//! skip them — `and`, `or` and `if` are short-circuiting).

use rustc_hash::FxHashMap;

use crate::base::ElementId;
use crate::meta::Kind;
use crate::model::ModelArena;

use super::error::EvalSignal;
use super::evaluator::{EvalCx, EvalResult, Evaluator};
use super::value::{IntRange, Value};

pub(crate) type BuiltinFn = fn(&Evaluator, &mut EvalCx<'_>, ElementId, ElementId) -> EvalResult;

/// Operator spelling → library function qualified name.
pub(crate) fn operator_function(op: &str) -> Option<&'static str> {
    Some(match op {
        "+" => "DataFunctions::'+'",
        "-" => "DataFunctions::'-'",
        "*" => "DataFunctions::'*'",
        "/" => "DataFunctions::'/'",
        "%" => "DataFunctions::'%'",
        "==" => "DataFunctions::'=='",
        "!=" => "DataFunctions::'!='",
        "<" => "DataFunctions::'<'",
        ">" => "DataFunctions::'>'",
        "<=" => "DataFunctions::'<='",
        ">=" => "DataFunctions::'>='",
        "and" => "DataFunctions::'and'",
        "or" => "DataFunctions::'or'",
        "not" => "DataFunctions::'not'",
        "xor" => "DataFunctions::'xor'",
        "," => "BaseFunctions::','",
        ".." => "SequenceFunctions::'..'",
        "#" => "SequenceFunctions::'#'",
        "size" => "SequenceFunctions::size",
        "if" => "ControlFunctions::'if'",
        _ => return None,
    })
}

pub(crate) fn registry() -> FxHashMap<&'static str, BuiltinFn> {
    let mut map: FxHashMap<&'static str, BuiltinFn> = FxHashMap::default();
    map.insert("DataFunctions::'+'", builtin_add);
    map.insert("DataFunctions::'-'", builtin_sub);
    map.insert("DataFunctions::'*'", builtin_mul);
    map.insert("DataFunctions::'/'", builtin_div);
    map.insert("DataFunctions::'%'", builtin_rem);
    map.insert("DataFunctions::'=='", builtin_eq);
    map.insert("DataFunctions::'!='", builtin_ne);
    map.insert("DataFunctions::'<'", builtin_lt);
    map.insert("DataFunctions::'>'", builtin_gt);
    map.insert("DataFunctions::'<='", builtin_le);
    map.insert("DataFunctions::'>='", builtin_ge);
    map.insert("DataFunctions::'and'", builtin_and);
    map.insert("DataFunctions::'or'", builtin_or);
    map.insert("DataFunctions::'not'", builtin_not);
    map.insert("DataFunctions::'xor'", builtin_xor);
    map.insert("BaseFunctions::','", builtin_comma);
    map.insert("SequenceFunctions::'..'", builtin_range);
    map.insert("SequenceFunctions::'#'", builtin_index);
    map.insert("SequenceFunctions::size", builtin_size);
    map.insert("ControlFunctions::'if'", builtin_if);
    map
}

// ----------------------------------------------------------------------
// Argument plumbing
// ----------------------------------------------------------------------

/// Owned argument expressions of an invocation, in declaration order.
fn arguments(arena: &ModelArena, expr: ElementId) -> Vec<ElementId> {
    arena
        .get(expr)
        .children
        .iter()
        .copied()
        .filter(|&c| arena.is_kind(c, Kind::Expression))
        .collect()
}

fn argument(args: &[ElementId], index: usize) -> Result<ElementId, EvalSignal> {
    args.get(index)
        .copied()
        .ok_or_else(|| EvalSignal::new(format!("missing mandatory argument {index}")))
}

fn number_of(
    ev: &Evaluator,
    cx: &mut EvalCx<'_>,
    expr: ElementId,
    target: ElementId,
) -> Result<f64, EvalSignal> {
    let seq = ev.eval_inner(cx, expr, target)?;
    match seq.as_slice() {
        [] => Ok(f64::NAN),
        [value] => value
            .as_number()
            .ok_or_else(|| EvalSignal::new("expected a number")),
        _ => Err(EvalSignal::new(format!(
            "too many values: expected exactly one, got {}",
            seq.len()
        ))),
    }
}

fn boolean_of(
    ev: &Evaluator,
    cx: &mut EvalCx<'_>,
    expr: ElementId,
    target: ElementId,
) -> Result<bool, EvalSignal> {
    let seq = ev.eval_inner(cx, expr, target)?;
    match seq.as_slice() {
        [value] => value
            .as_bool()
            .ok_or_else(|| EvalSignal::new("expected a boolean")),
        [] => Err(EvalSignal::new(
            "not enough values: expected exactly one, got 0",
        )),
        _ => Err(EvalSignal::new(format!(
            "too many values: expected exactly one, got {}",
            seq.len()
        ))),
    }
}

// ----------------------------------------------------------------------
// Arithmetic
// ----------------------------------------------------------------------

fn builtin_add(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let first = ev.eval_inner(cx, argument(&args, 0)?, target)?;
    // String concatenation and numeric addition share a spelling.
    if let [Value::Text(a)] = first.as_slice() {
        let b = ev.eval_inner(cx, argument(&args, 1)?, target)?;
        let [Value::Text(b)] = b.as_slice() else {
            return Err(EvalSignal::new("expected a string"));
        };
        return Ok(vec![Value::Text(format!("{a}{b}").into())]);
    }
    let a = match first.as_slice() {
        [] => f64::NAN,
        [value] => value
            .as_number()
            .ok_or_else(|| EvalSignal::new("expected a number"))?,
        _ => return Err(EvalSignal::new("too many values: expected exactly one")),
    };
    let b = number_of(ev, cx, argument(&args, 1)?, target)?;
    Ok(vec![Value::Number(a + b)])
}

fn builtin_sub(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let a = number_of(ev, cx, argument(&args, 0)?, target)?;
    if args.len() == 1 {
        return Ok(vec![Value::Number(-a)]);
    }
    let b = number_of(ev, cx, argument(&args, 1)?, target)?;
    Ok(vec![Value::Number(a - b)])
}

fn builtin_mul(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let a = number_of(ev, cx, argument(&args, 0)?, target)?;
    let b = number_of(ev, cx, argument(&args, 1)?, target)?;
    Ok(vec![Value::Number(a * b)])
}

fn builtin_div(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let a = number_of(ev, cx, argument(&args, 0)?, target)?;
    let b = number_of(ev, cx, argument(&args, 1)?, target)?;
    Ok(vec![Value::Number(a / b)])
}

fn builtin_rem(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let a = number_of(ev, cx, argument(&args, 0)?, target)?;
    let b = number_of(ev, cx, argument(&args, 1)?, target)?;
    Ok(vec![Value::Number(a % b)])
}

// ----------------------------------------------------------------------
// Comparison and equality
// ----------------------------------------------------------------------

macro_rules! comparison {
    ($name:ident, $op:tt) => {
        fn $name(
            ev: &Evaluator,
            cx: &mut EvalCx<'_>,
            expr: ElementId,
            target: ElementId,
        ) -> EvalResult {
            let args = arguments(cx.arena, expr);
            let a = number_of(ev, cx, argument(&args, 0)?, target)?;
            let b = number_of(ev, cx, argument(&args, 1)?, target)?;
            Ok(vec![Value::Bool(a $op b)])
        }
    };
}

comparison!(builtin_lt, <);
comparison!(builtin_gt, >);
comparison!(builtin_le, <=);
comparison!(builtin_ge, >=);

fn builtin_eq(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let a = ev.eval_inner(cx, argument(&args, 0)?, target)?;
    let b = ev.eval_inner(cx, argument(&args, 1)?, target)?;
    Ok(vec![Value::Bool(a == b)])
}

fn builtin_ne(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let a = ev.eval_inner(cx, argument(&args, 0)?, target)?;
    let b = ev.eval_inner(cx, argument(&args, 1)?, target)?;
    Ok(vec![Value::Bool(a != b)])
}

// ----------------------------------------------------------------------
// Logic
// ----------------------------------------------------------------------

fn builtin_and(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    if !boolean_of(ev, cx, argument(&args, 0)?, target)? {
        return Ok(vec![Value::Bool(false)]);
    }
    let b = boolean_of(ev, cx, argument(&args, 1)?, target)?;
    Ok(vec![Value::Bool(b)])
}

fn builtin_or(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    if boolean_of(ev, cx, argument(&args, 0)?, target)? {
        return Ok(vec![Value::Bool(true)]);
    }
    let b = boolean_of(ev, cx, argument(&args, 1)?, target)?;
    Ok(vec![Value::Bool(b)])
}

fn builtin_not(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let a = boolean_of(ev, cx, argument(&args, 0)?, target)?;
    Ok(vec![Value::Bool(!a)])
}

fn builtin_xor(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let a = boolean_of(ev, cx, argument(&args, 0)?, target)?;
    let b = boolean_of(ev, cx, argument(&args, 1)?, target)?;
    Ok(vec![Value::Bool(a ^ b)])
}

// ----------------------------------------------------------------------
// Sequences and control
// ----------------------------------------------------------------------

/// `a, b` concatenates the operand sequences in order.
fn builtin_comma(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let mut out = Vec::new();
    for arg in args {
        out.extend(ev.eval_inner(cx, arg, target)?);
    }
    Ok(out)
}

/// `a..b` builds a lazy inclusive range; it is never materialized here.
fn builtin_range(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let start = number_of(ev, cx, argument(&args, 0)?, target)?;
    let stop = number_of(ev, cx, argument(&args, 1)?, target)?;
    if start.is_nan() || stop.is_nan() {
        return Ok(Vec::new());
    }
    Ok(vec![Value::Range(IntRange::new(start as i64, stop as i64))])
}

/// `seq # index` — one-based positional access.
fn builtin_index(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let seq = ev.eval_inner(cx, argument(&args, 0)?, target)?;
    let index = number_of(ev, cx, argument(&args, 1)?, target)?;
    if index.is_nan() {
        return Ok(Vec::new());
    }
    let index = index as isize - 1;
    if let [Value::Range(range)] = seq.as_slice() {
        return Ok(range.at(index).map(|v| Value::Number(v as f64)).into_iter().collect());
    }
    if index < 0 || index as usize >= seq.len() {
        return Ok(Vec::new());
    }
    Ok(vec![seq[index as usize].clone()])
}

fn builtin_size(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let seq = ev.eval_inner(cx, argument(&args, 0)?, target)?;
    let size = if let [Value::Range(range)] = seq.as_slice() {
        range.len()
    } else {
        seq.len()
    };
    Ok(vec![Value::Number(size as f64)])
}

/// `if cond ? then else other` — branches evaluate lazily.
fn builtin_if(ev: &Evaluator, cx: &mut EvalCx<'_>, expr: ElementId, target: ElementId) -> EvalResult {
    let args = arguments(cx.arena, expr);
    let condition = boolean_of(ev, cx, argument(&args, 0)?, target)?;
    if condition {
        ev.eval_inner(cx, argument(&args, 1)?, target)
    } else if args.len() > 2 {
        ev.eval_inner(cx, args[2], target)
    } else {
        Ok(Vec::new())
    }
}
