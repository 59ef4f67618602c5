//! Value and general comparison.

use core::cmp::Ordering;

use crate::ast::CompareOp;
use crate::engine::runtime::{Error, ErrorKind};
use crate::engine::sequence::{Sequence, SequenceCursor, drain, singleton};
use crate::item::Item;

/// Singleton-vs-singleton comparison, dispatched on the operand kinds.
/// Numeric kinds cross-compare after promotion; strings compare by code
/// point; booleans order false before true; files support only eq/ne, by
/// absolute path. Everything else is a type error.
pub(crate) fn value_compare(op: CompareOp, left: &Item, right: &Item) -> Result<bool, Error> {
    let relative = matches!(op, CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge);
    let ordering = compare_items(left, right, relative)?;
    Ok(match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
    })
}

fn compare_items(left: &Item, right: &Item, relative: bool) -> Result<Ordering, Error> {
    match (left, right) {
        (Item::Integer(l), Item::Integer(r)) => Ok(l.cmp(r)),
        (Item::Integer(l), Item::Double(r)) => Ok(numeric_order(*l as f64, *r)),
        (Item::Double(l), Item::Integer(r)) => Ok(numeric_order(*l, *r as f64)),
        (Item::Double(l), Item::Double(r)) => Ok(numeric_order(*l, *r)),
        (Item::String(l), Item::String(r)) => Ok(l.cmp(r)),
        (Item::Boolean(l), Item::Boolean(r)) => Ok(l.cmp(r)),
        (Item::File(l), Item::File(r)) => {
            if relative {
                return Err(Error::new(
                    ErrorKind::Type,
                    "files do not support relative comparison",
                ));
            }
            Ok(if l.path == r.path {
                Ordering::Equal
            } else {
                Ordering::Greater
            })
        }
        _ => Err(Error::new(
            ErrorKind::Type,
            format!("cannot compare {} and {}", left.kind(), right.kind()),
        )),
    }
}

// NaN is neither equal to nor less than anything, so it lands on Greater;
// eq/ne against NaN therefore come out false/true.
fn numeric_order(l: f64, r: f64) -> Ordering {
    if l == r {
        Ordering::Equal
    } else if l < r {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Pair-exists comparison over two sequences: true as soon as any buffered
/// left item and streamed right item satisfy the value comparison. The left
/// side is the only place in the pipeline that materializes its input.
pub(crate) fn general_compare(
    op: CompareOp,
    left: Sequence,
    mut right: Sequence,
) -> Result<Sequence, Error> {
    let buffered = drain(left)?;
    while let Some(item) = right.next_item() {
        let r = item?;
        for l in &buffered {
            if value_compare(op, l, &r)? {
                return Ok(singleton(Item::Boolean(true)));
            }
        }
    }
    Ok(singleton(Item::Boolean(false)))
}
