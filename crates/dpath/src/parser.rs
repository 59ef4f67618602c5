//! Grammar wiring: pest parse pass plus the walk that builds [`ast::Expr`]
//! values out of the pair tree.

use pest::Parser;
use pest::iterators::Pair;

use crate::ast::{BinaryOp, CompareOp, Expr, Literal, NodeTest, PathExpr, UnarySign};
use crate::engine::axes::Axis;
use crate::engine::runtime::{Error, ErrorKind};

#[derive(pest_derive::Parser)]
#[grammar = "dpath.pest"]
pub struct DPathParser;

/// Parse a DPath expression into its AST. All syntax problems, including
/// unknown axis names, surface as a single syntax error with no partial AST.
pub fn parse_expression(input: &str) -> Result<Expr, Error> {
    let mut pairs = DPathParser::parse(Rule::dpath, input)
        .map_err(|e| Error::new(ErrorKind::Syntax, format!("parse error: {e}")))?;
    let root = pairs
        .next()
        .ok_or_else(|| Error::new(ErrorKind::Internal, "parser produced no pairs"))?;
    let expr = root
        .into_inner()
        .find(|p| p.as_rule() == Rule::expr)
        .ok_or_else(|| Error::new(ErrorKind::Internal, "top-level expression missing"))?;
    build_expr(expr)
}

fn build_expr(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let mut exprs = Vec::new();
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::expr_single {
            exprs.push(build_expr_single(inner)?);
        }
    }
    if exprs.len() == 1 {
        Ok(exprs.pop().unwrap_or(Expr::Literal(Literal::EmptySequence)))
    } else {
        Ok(Expr::Sequence(exprs))
    }
}

fn build_expr_single(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let or = first_inner(pair)?;
    build_or(or)
}

fn build_or(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    fold_binary(pair, |p| {
        (p.as_rule() == Rule::K_OR).then_some(BinaryOp::Or)
    })
}

fn build_and(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    fold_binary(pair, |p| {
        (p.as_rule() == Rule::K_AND).then_some(BinaryOp::And)
    })
}

fn build_additive(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    fold_binary(pair, |p| {
        if p.as_rule() != Rule::additive_op {
            return None;
        }
        match token_rule(p) {
            Rule::OP_PLUS => Some(BinaryOp::Add),
            Rule::OP_MINUS => Some(BinaryOp::Sub),
            _ => None,
        }
    })
}

fn build_multiplicative(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    fold_binary(pair, |p| {
        if p.as_rule() != Rule::multiplicative_op {
            return None;
        }
        match token_rule(p) {
            Rule::OP_STAR => Some(BinaryOp::Mul),
            Rule::K_DIV => Some(BinaryOp::Div),
            Rule::K_IDIV => Some(BinaryOp::IDiv),
            Rule::K_MOD => Some(BinaryOp::Mod),
            _ => None,
        }
    })
}

/// Left-fold `operand (op operand)*` layers. The mapping function decides,
/// from the child pair itself, whether it is an operator token; everything
/// else is an operand one grammar layer down.
fn fold_binary(
    pair: Pair<'_, Rule>,
    to_op: impl Fn(&Pair<'_, Rule>) -> Option<BinaryOp>,
) -> Result<Expr, Error> {
    let mut acc: Option<Expr> = None;
    let mut pending: Option<BinaryOp> = None;
    for inner in pair.into_inner() {
        if let Some(op) = to_op(&inner) {
            pending = Some(op);
            continue;
        }
        let operand = build_operand(inner)?;
        acc = Some(match (acc, pending.take()) {
            (None, _) => operand,
            (Some(left), Some(op)) => Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(operand),
            },
            (Some(_), None) => {
                return Err(Error::new(ErrorKind::Internal, "operand without operator"));
            }
        });
    }
    acc.ok_or_else(|| Error::new(ErrorKind::Internal, "empty operator production"))
}

/// Dispatch one grammar layer down.
fn build_operand(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    match pair.as_rule() {
        Rule::or_expr => build_or(pair),
        Rule::and_expr => build_and(pair),
        Rule::comparison_expr => build_comparison(pair),
        Rule::range_expr => build_range(pair),
        Rule::additive_expr => build_additive(pair),
        Rule::multiplicative_expr => build_multiplicative(pair),
        Rule::unary_expr => build_unary(pair),
        rule => Err(Error::new(
            ErrorKind::Internal,
            format!("unexpected operand rule {rule:?}"),
        )),
    }
}

fn build_comparison(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let mut inner = pair.into_inner();
    let left = build_operand(next_pair(&mut inner)?)?;
    let Some(op_pair) = inner.next() else {
        return Ok(left);
    };
    let op_token = first_inner(op_pair)?;
    let general = op_token.as_rule() == Rule::general_comp;
    let op = match token_rule(&op_token) {
        Rule::K_EQ | Rule::OP_EQ => CompareOp::Eq,
        Rule::K_NE | Rule::OP_NE => CompareOp::Ne,
        Rule::K_LT | Rule::OP_LT => CompareOp::Lt,
        Rule::K_LE | Rule::OP_LE => CompareOp::Le,
        Rule::K_GT | Rule::OP_GT => CompareOp::Gt,
        Rule::K_GE | Rule::OP_GE => CompareOp::Ge,
        rule => {
            return Err(Error::new(
                ErrorKind::Internal,
                format!("unexpected comparison token {rule:?}"),
            ));
        }
    };
    let right = build_operand(next_pair(&mut inner)?)?;
    Ok(if general {
        Expr::GeneralComparison {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    } else {
        Expr::ValueComparison {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    })
}

fn build_range(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let mut operands = Vec::new();
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::additive_expr {
            operands.push(build_additive(inner)?);
        }
    }
    let mut operands = operands.into_iter();
    let start = operands
        .next()
        .ok_or_else(|| Error::new(ErrorKind::Internal, "range without operand"))?;
    match operands.next() {
        Some(end) => Ok(Expr::Range {
            start: Box::new(start),
            end: Box::new(end),
        }),
        None => Ok(start),
    }
}

fn build_unary(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let mut sign = None;
    let mut path = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::unary_sign => {
                sign = Some(match token_rule(&inner) {
                    Rule::OP_MINUS => UnarySign::Minus,
                    _ => UnarySign::Plus,
                });
            }
            Rule::path_expr => path = Some(build_path(inner)?),
            _ => {}
        }
    }
    let expr = path.ok_or_else(|| Error::new(ErrorKind::Internal, "unary without operand"))?;
    Ok(match sign {
        Some(sign) => Expr::Unary {
            sign,
            expr: Box::new(expr),
        },
        None => expr,
    })
}

fn build_path(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let inner = first_inner(pair)?;
    match inner.as_rule() {
        Rule::relative_path => {
            let mut steps = build_relative_path(inner, false)?;
            if steps.len() == 1 {
                return Ok(steps.pop().unwrap_or(Expr::Literal(Literal::EmptySequence)));
            }
            Ok(Expr::Path(PathExpr {
                rooted: false,
                steps,
            }))
        }
        Rule::slash_path => {
            let steps = match inner.into_inner().find(|p| p.as_rule() == Rule::relative_path) {
                Some(rel) => build_relative_path(rel, false)?,
                None => Vec::new(),
            };
            Ok(Expr::Path(PathExpr {
                rooted: true,
                steps,
            }))
        }
        // A leading `//` walks downward from the context item, not from the
        // filesystem root.
        Rule::dslash_path => {
            let rel = inner
                .into_inner()
                .find(|p| p.as_rule() == Rule::relative_path)
                .ok_or_else(|| Error::new(ErrorKind::Internal, "descendant path without steps"))?;
            let mut steps = build_relative_path(rel, true)?;
            if steps.len() == 1 {
                return Ok(steps.pop().unwrap_or(Expr::Literal(Literal::EmptySequence)));
            }
            Ok(Expr::Path(PathExpr {
                rooted: false,
                steps,
            }))
        }
        rule => Err(Error::new(
            ErrorKind::Internal,
            format!("unexpected path rule {rule:?}"),
        )),
    }
}

/// The explicit step form `//` desugars into when it cannot be merged.
fn descendant_or_self_step() -> Expr {
    Expr::AxisStep {
        axis: Axis::DescendantOrSelf,
        test: NodeTest::Wildcard,
    }
}

/// Desugar the step following a `//` separator. A bare node test (with or
/// without predicates) merges into a descendant-axis step, which yields the
/// depth-first pre-order the shorthand is specified to produce; any other
/// step keeps an explicit `descendant-or-self::*` step in front of it.
fn push_descendant_step(step: Expr, steps: &mut Vec<Expr>) {
    match step {
        Expr::NodeTest(test) => steps.push(Expr::AxisStep {
            axis: Axis::Descendant,
            test,
        }),
        Expr::Filtered { source, predicates } => match *source {
            Expr::NodeTest(test) => steps.push(Expr::Filtered {
                source: Box::new(Expr::AxisStep {
                    axis: Axis::Descendant,
                    test,
                }),
                predicates,
            }),
            other => {
                steps.push(descendant_or_self_step());
                steps.push(Expr::Filtered {
                    source: Box::new(other),
                    predicates,
                });
            }
        },
        other => {
            steps.push(descendant_or_self_step());
            steps.push(other);
        }
    }
}

fn build_relative_path(pair: Pair<'_, Rule>, leading_dslash: bool) -> Result<Vec<Expr>, Error> {
    let mut steps = Vec::new();
    let mut after_dslash = leading_dslash;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::step_expr => {
                let step = build_step(inner)?;
                if after_dslash {
                    push_descendant_step(step, &mut steps);
                } else {
                    steps.push(step);
                }
                after_dslash = false;
            }
            Rule::path_sep => {
                after_dslash = token_rule(&inner) == Rule::OP_DSLASH;
            }
            _ => {}
        }
    }
    Ok(steps)
}

fn build_step(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let inner = first_inner(pair)?;
    match inner.as_rule() {
        Rule::filter_expr => build_filter(inner),
        Rule::axis_step => build_axis_step(inner),
        rule => Err(Error::new(
            ErrorKind::Internal,
            format!("unexpected step rule {rule:?}"),
        )),
    }
}

fn build_axis_step(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let mut source = None;
    let mut predicates = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::named_axis_step => {
                let mut parts = inner.into_inner();
                let name_pair = next_pair(&mut parts)?;
                let axis = axis_from_name(name_pair.as_str())?;
                let test = parts
                    .find(|p| p.as_rule() == Rule::node_test)
                    .ok_or_else(|| Error::new(ErrorKind::Internal, "axis step without test"))?;
                source = Some(Expr::AxisStep {
                    axis,
                    test: build_node_test(test)?,
                });
            }
            Rule::attr_step => {
                let test = inner
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::node_test)
                    .ok_or_else(|| Error::new(ErrorKind::Internal, "attribute step without test"))?;
                source = Some(Expr::AxisStep {
                    axis: Axis::Attribute,
                    test: build_node_test(test)?,
                });
            }
            Rule::parent_step => source = Some(Expr::ParentShorthand),
            Rule::node_test => source = Some(Expr::NodeTest(build_node_test(inner)?)),
            Rule::predicate => predicates.push(build_predicate(inner)?),
            _ => {}
        }
    }
    let source = source.ok_or_else(|| Error::new(ErrorKind::Internal, "empty axis step"))?;
    Ok(attach_predicates(source, predicates))
}

fn build_filter(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let mut source = None;
    let mut predicates = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::primary_expr => source = Some(build_primary(inner)?),
            Rule::predicate => predicates.push(build_predicate(inner)?),
            _ => {}
        }
    }
    let source = source.ok_or_else(|| Error::new(ErrorKind::Internal, "empty filter expression"))?;
    Ok(attach_predicates(source, predicates))
}

fn attach_predicates(source: Expr, predicates: Vec<Expr>) -> Expr {
    if predicates.is_empty() {
        source
    } else {
        Expr::Filtered {
            source: Box::new(source),
            predicates,
        }
    }
}

fn build_predicate(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let expr = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::expr)
        .ok_or_else(|| Error::new(ErrorKind::Internal, "empty predicate"))?;
    build_expr(expr)
}

fn build_primary(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let inner = first_inner(pair)?;
    match inner.as_rule() {
        Rule::literal => build_literal(inner),
        Rule::context_item => Ok(Expr::ContextItem),
        Rule::paren_expr => match inner.into_inner().find(|p| p.as_rule() == Rule::expr) {
            Some(expr) => build_expr(expr),
            None => Ok(Expr::Literal(Literal::EmptySequence)),
        },
        Rule::function_call => {
            let mut parts = inner.into_inner();
            let name = next_pair(&mut parts)?.as_str().to_string();
            let mut args = Vec::new();
            if let Some(list) = parts.find(|p| p.as_rule() == Rule::arg_list) {
                for arg in list.into_inner() {
                    if arg.as_rule() == Rule::expr_single {
                        args.push(build_expr_single(arg)?);
                    }
                }
            }
            Ok(Expr::FunctionCall { name, args })
        }
        rule => Err(Error::new(
            ErrorKind::Internal,
            format!("unexpected primary rule {rule:?}"),
        )),
    }
}

fn build_node_test(pair: Pair<'_, Rule>) -> Result<NodeTest, Error> {
    let inner = first_inner(pair)?;
    match inner.as_rule() {
        Rule::qname => Ok(NodeTest::Name(inner.as_str().to_string())),
        Rule::wildcard_test => Ok(NodeTest::Wildcard),
        Rule::file_test => Ok(NodeTest::FilesOnly),
        Rule::dir_test => Ok(NodeTest::DirsOnly),
        Rule::pound_test => {
            let lit = inner
                .into_inner()
                .find(|p| p.as_rule() == Rule::string_literal)
                .ok_or_else(|| Error::new(ErrorKind::Internal, "name test without literal"))?;
            Ok(NodeTest::Name(unescape_string_literal(lit)))
        }
        rule => Err(Error::new(
            ErrorKind::Internal,
            format!("unexpected node test rule {rule:?}"),
        )),
    }
}

fn build_literal(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let inner = first_inner(pair)?;
    let literal = match inner.as_rule() {
        Rule::integer_literal => Literal::Integer(inner.as_str().parse::<i64>().map_err(|_| {
            Error::new(
                ErrorKind::Syntax,
                format!("integer literal out of range: {}", inner.as_str()),
            )
        })?),
        // Decimal and double literals both collapse to the double kind.
        Rule::decimal_literal | Rule::double_literal => {
            Literal::Double(inner.as_str().parse::<f64>().map_err(|_| {
                Error::new(
                    ErrorKind::Syntax,
                    format!("malformed numeric literal: {}", inner.as_str()),
                )
            })?)
        }
        Rule::string_literal => Literal::String(unescape_string_literal(inner)),
        rule => {
            return Err(Error::new(
                ErrorKind::Internal,
                format!("unexpected literal rule {rule:?}"),
            ));
        }
    };
    Ok(Expr::Literal(literal))
}

/// Collapse doubled delimiters inside a string literal body.
fn unescape_string_literal(pair: Pair<'_, Rule>) -> String {
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::dbl_string_inner => return inner.as_str().replace("\"\"", "\""),
            Rule::sgl_string_inner => return inner.as_str().replace("''", "'"),
            _ => {}
        }
    }
    String::new()
}

fn axis_from_name(name: &str) -> Result<Axis, Error> {
    Axis::from_name(name)
        .ok_or_else(|| Error::new(ErrorKind::Syntax, format!("unknown axis '{name}'")))
}

/// Walk down to the first terminal token rule of a wrapper pair.
fn token_rule(pair: &Pair<'_, Rule>) -> Rule {
    let mut current = pair.clone();
    loop {
        let mut inner = current.clone().into_inner();
        match inner.next() {
            Some(next) => current = next,
            None => return current.as_rule(),
        }
    }
}

fn first_inner(pair: Pair<'_, Rule>) -> Result<Pair<'_, Rule>, Error> {
    let rule = pair.as_rule();
    pair.into_inner().next().ok_or_else(|| {
        Error::new(
            ErrorKind::Internal,
            format!("rule {rule:?} has no inner pairs"),
        )
    })
}

fn next_pair<'a>(
    pairs: &mut pest::iterators::Pairs<'a, Rule>,
) -> Result<Pair<'a, Rule>, Error> {
    pairs
        .next()
        .ok_or_else(|| Error::new(ErrorKind::Internal, "unexpected end of parse pairs"))
}
