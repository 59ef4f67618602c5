use super::take1;
use crate::engine::runtime::{CallCtx, Error};
use crate::engine::sequence::{Sequence, SequenceCursor, drain, singleton};
use crate::item::Item;

/// `empty(seq)`: whether the first advance already reports done. Pulls at
/// most one item.
pub(super) fn empty_fn(_ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let mut seq = take1(args);
    let is_empty = match seq.next_item() {
        None => true,
        Some(item) => {
            item?;
            false
        }
    };
    Ok(singleton(Item::Boolean(is_empty)))
}

/// `exists(seq)`: the complement of `empty`. Pulls at most one item.
pub(super) fn exists_fn(_ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let mut seq = take1(args);
    let exists = match seq.next_item() {
        None => false,
        Some(item) => {
            item?;
            true
        }
    };
    Ok(singleton(Item::Boolean(exists)))
}

/// `count(seq)`: materializing length.
pub(super) fn count_fn(_ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let items = drain(take1(args))?;
    Ok(singleton(Item::Integer(items.len() as i64)))
}
