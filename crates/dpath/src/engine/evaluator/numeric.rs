//! Arithmetic dispatch and numeric promotion.

use crate::ast::{BinaryOp, UnarySign};
use crate::engine::runtime::{Error, ErrorKind};
use crate::engine::sequence::{Sequence, double_range, integer_range, singleton};
use crate::item::Item;

/// Binary arithmetic over numeric singletons. Two integers stay in the
/// integer domain (except `div`, which always divides as doubles); any double
/// operand promotes both sides to double. `idiv` truncates toward zero.
pub(crate) fn arithmetic(op: BinaryOp, left: &Item, right: &Item) -> Result<Sequence, Error> {
    if !left.is_numeric() || !right.is_numeric() {
        return Err(Error::new(
            ErrorKind::Type,
            format!(
                "operator '{}' expects numeric operands, got {} and {}",
                op.symbol(),
                left.kind(),
                right.kind()
            ),
        ));
    }
    if let (Item::Integer(l), Item::Integer(r)) = (left, right) {
        if op != BinaryOp::Div {
            return integer_arithmetic(op, *l, *r).map(singleton);
        }
        if *r == 0 {
            return Err(division_by_zero(op));
        }
    }
    double_arithmetic(op, as_double(left), as_double(right)).map(singleton)
}

fn integer_arithmetic(op: BinaryOp, l: i64, r: i64) -> Result<Item, Error> {
    let value = match op {
        BinaryOp::Add => l.wrapping_add(r),
        BinaryOp::Sub => l.wrapping_sub(r),
        BinaryOp::Mul => l.wrapping_mul(r),
        BinaryOp::IDiv => {
            if r == 0 {
                return Err(division_by_zero(op));
            }
            l.wrapping_div(r)
        }
        BinaryOp::Mod => {
            if r == 0 {
                return Err(division_by_zero(op));
            }
            l.wrapping_rem(r)
        }
        _ => {
            return Err(Error::new(
                ErrorKind::Internal,
                format!("'{}' is not integer arithmetic", op.symbol()),
            ));
        }
    };
    Ok(Item::Integer(value))
}

fn double_arithmetic(op: BinaryOp, l: f64, r: f64) -> Result<Item, Error> {
    Ok(match op {
        BinaryOp::Add => Item::Double(l + r),
        BinaryOp::Sub => Item::Double(l - r),
        BinaryOp::Mul => Item::Double(l * r),
        BinaryOp::Div => Item::Double(l / r),
        BinaryOp::IDiv => {
            if r == 0.0 {
                return Err(division_by_zero(op));
            }
            // Truncation toward zero; out-of-range quotients saturate.
            Item::Integer((l / r).trunc() as i64)
        }
        // Sign-of-dividend remainder; NaN for a zero divisor.
        BinaryOp::Mod => Item::Double(l % r),
        _ => {
            return Err(Error::new(
                ErrorKind::Internal,
                format!("'{}' is not arithmetic", op.symbol()),
            ));
        }
    })
}

fn division_by_zero(op: BinaryOp) -> Error {
    Error::new(
        ErrorKind::Type,
        format!("division by zero in '{}'", op.symbol()),
    )
}

/// Unary plus/minus over a numeric singleton, preserving the operand kind.
pub(crate) fn unary(sign: UnarySign, item: Item) -> Result<Sequence, Error> {
    if !item.is_numeric() {
        return Err(Error::new(
            ErrorKind::Type,
            format!("unary operator expects a numeric operand, got {}", item.kind()),
        ));
    }
    Ok(singleton(match (sign, item) {
        (UnarySign::Plus, item) => item,
        (UnarySign::Minus, Item::Integer(v)) => Item::Integer(v.wrapping_neg()),
        (UnarySign::Minus, Item::Double(v)) => Item::Double(-v),
        (UnarySign::Minus, item) => item,
    }))
}

/// The `to` operator: an inclusive step-1 range over two integers or two
/// doubles; mixed kinds are rejected.
pub(crate) fn range(start: &Item, end: &Item) -> Result<Sequence, Error> {
    match (start, end) {
        (Item::Integer(s), Item::Integer(e)) => Ok(integer_range(*s, *e)),
        (Item::Double(s), Item::Double(e)) => Ok(double_range(*s, *e)),
        _ => Err(Error::new(
            ErrorKind::Type,
            format!(
                "'to' expects two integers or two doubles, got {} and {}",
                start.kind(),
                end.kind()
            ),
        )),
    }
}

pub(crate) fn as_double(item: &Item) -> f64 {
    match item {
        Item::Integer(v) => *v as f64,
        Item::Double(v) => *v,
        _ => f64::NAN,
    }
}

/// A numeric item as an integer, rounding doubles half away from zero toward
/// positive infinity (`floor(x + 0.5)`).
pub(crate) fn as_rounded_integer(item: &Item) -> Option<i64> {
    match item {
        Item::Integer(v) => Some(*v),
        Item::Double(v) => Some((v + 0.5).floor() as i64),
        _ => None,
    }
}
