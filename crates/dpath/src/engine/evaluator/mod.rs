//! The evaluator: a thin tree walk that turns AST nodes into lazy sequences.

pub(crate) mod comparison;
pub(crate) mod cursors;
pub(crate) mod numeric;

use crate::ast::{BinaryOp, Expr, Literal, NodeTest, PathExpr};
use crate::engine::axes::Axis;
use crate::engine::runtime::{CallCtx, Context, Error, ErrorKind};
use crate::engine::sequence::{
    Sequence, SequenceCursor, concat, condition_filter, empty, single_item, singleton,
};
use crate::fs;
use crate::item::Item;
use crate::parser::parse_expression;

/// Parse and evaluate in one call.
pub fn evaluate_expression(input: &str, ctx: &Context) -> Result<Sequence, Error> {
    let expr = parse_expression(input)?;
    evaluate(&expr, ctx)
}

/// Evaluate one AST node to a (possibly lazy) sequence.
pub fn evaluate(expr: &Expr, ctx: &Context) -> Result<Sequence, Error> {
    match expr {
        Expr::Literal(literal) => Ok(match literal {
            Literal::Integer(v) => singleton(Item::Integer(*v)),
            Literal::Double(v) => singleton(Item::Double(*v)),
            Literal::String(s) => singleton(Item::String(s.clone())),
            Literal::EmptySequence => empty(),
        }),
        Expr::ContextItem => Ok(singleton(ctx.item.clone())),
        Expr::Sequence(exprs) => {
            let mut sources = Vec::with_capacity(exprs.len());
            for expr in exprs {
                sources.push(evaluate(expr, ctx)?);
            }
            Ok(concat(sources))
        }
        Expr::Unary { sign, expr } => {
            let item = single_item(evaluate(expr, ctx)?)?;
            numeric::unary(*sign, item)
        }
        Expr::Binary { left, op, right } => match op {
            BinaryOp::And | BinaryOp::Or => {
                let l = boolean_operand(*op, evaluate(left, ctx)?)?;
                let r = boolean_operand(*op, evaluate(right, ctx)?)?;
                let value = match op {
                    BinaryOp::And => l && r,
                    _ => l || r,
                };
                Ok(singleton(Item::Boolean(value)))
            }
            _ => {
                let l = single_item(evaluate(left, ctx)?)?;
                let r = single_item(evaluate(right, ctx)?)?;
                numeric::arithmetic(*op, &l, &r)
            }
        },
        Expr::ValueComparison { left, op, right } => {
            let l = single_item(evaluate(left, ctx)?)?;
            let r = single_item(evaluate(right, ctx)?)?;
            let value = comparison::value_compare(*op, &l, &r)?;
            Ok(singleton(Item::Boolean(value)))
        }
        Expr::GeneralComparison { left, op, right } => {
            let l = evaluate(left, ctx)?;
            let r = evaluate(right, ctx)?;
            comparison::general_compare(*op, l, r)
        }
        Expr::Range { start, end } => {
            let start = single_item(evaluate(start, ctx)?)?;
            let end = single_item(evaluate(end, ctx)?)?;
            numeric::range(&start, &end)
        }
        Expr::FunctionCall { name, args } => {
            let imp = ctx.env.functions.resolve(name, args.len())?;
            let mut arg_seqs = Vec::with_capacity(args.len());
            for arg in args {
                arg_seqs.push(evaluate(arg, ctx)?);
            }
            imp(&CallCtx { ctx }, arg_seqs)
        }
        Expr::Filtered { source, predicates } => {
            let source = evaluate(source, ctx)?;
            Ok(Box::new(cursors::PredicateCursor::new(
                source,
                predicates.clone(),
                ctx.clone(),
            )))
        }
        Expr::Path(path) => evaluate_path(path, ctx),
        Expr::AxisStep { axis, test } => {
            let scoped = ctx.with_axis(*axis);
            evaluate_node_test(test, &scoped)
        }
        Expr::ParentShorthand => Axis::Parent.iterate(ctx),
        Expr::NodeTest(test) => evaluate_node_test(test, ctx),
    }
}

/// A path compiles to a chain of path-step cursors over an initial source:
/// the root singleton for rooted paths, the first step's own result
/// otherwise.
fn evaluate_path(path: &PathExpr, ctx: &Context) -> Result<Sequence, Error> {
    let mut steps = path.steps.iter();
    let mut source: Sequence = if path.rooted {
        let root = fs::root().ok_or_else(|| {
            Error::new(ErrorKind::Filesystem, "cannot stat the filesystem root")
        })?;
        singleton(Item::File(root))
    } else {
        let first = steps
            .next()
            .ok_or_else(|| Error::new(ErrorKind::Internal, "relative path without steps"))?;
        evaluate(first, ctx)?
    };
    for step in steps {
        source = Box::new(cursors::PathStepCursor::new(
            source,
            step.clone(),
            ctx.clone(),
        ));
    }
    Ok(source)
}

fn evaluate_node_test(test: &NodeTest, ctx: &Context) -> Result<Sequence, Error> {
    match test {
        NodeTest::Name(name) => ctx.axis.get_by_name(ctx, name),
        NodeTest::Wildcard => ctx.axis.iterate(ctx),
        NodeTest::FilesOnly => file_dir_filter(ctx, true),
        NodeTest::DirsOnly => file_dir_filter(ctx, false),
    }
}

fn file_dir_filter(ctx: &Context, want_files: bool) -> Result<Sequence, Error> {
    let seq = ctx.axis.iterate(ctx)?;
    Ok(condition_filter(seq, move |item| {
        matches!(item, Item::File(f) if f.is_dir != want_files)
    }))
}

fn boolean_operand(op: BinaryOp, seq: Sequence) -> Result<bool, Error> {
    match single_item(seq)? {
        Item::Boolean(b) => Ok(b),
        other => Err(Error::new(
            ErrorKind::Type,
            format!(
                "'{}' expects boolean operands, got {}; apply boolean() to coerce",
                op.symbol(),
                other.kind()
            ),
        )),
    }
}

/// The effective boolean value of a sequence:
/// empty is false; a leading file item is true regardless of length; a
/// singleton boolean is itself, a singleton string is non-emptiness, a
/// singleton numeric is non-zero (and not NaN); everything else is a type
/// error.
pub fn effective_boolean_value(mut seq: Sequence) -> Result<bool, Error> {
    let first = match seq.next_item() {
        None => return Ok(false),
        Some(item) => item?,
    };
    if matches!(first, Item::File(_)) {
        return Ok(true);
    }
    match seq.next_item() {
        None => {}
        Some(Err(e)) => return Err(e),
        Some(Ok(_)) => {
            return Err(Error::new(
                ErrorKind::Type,
                "effective boolean value of a multi-item sequence",
            ));
        }
    }
    match first {
        Item::Boolean(b) => Ok(b),
        Item::String(s) => Ok(!s.is_empty()),
        Item::Integer(i) => Ok(i != 0),
        Item::Double(d) => Ok(d != 0.0 && !d.is_nan()),
        Item::File(_) => Err(Error::new(ErrorKind::Internal, "file handled above")),
    }
}
