use super::take1;
use crate::engine::evaluator::effective_boolean_value;
use crate::engine::runtime::{CallCtx, Error};
use crate::engine::sequence::{Sequence, singleton};
use crate::item::Item;

/// `boolean(seq)`: the effective boolean value.
pub(super) fn boolean_fn(_ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let value = effective_boolean_value(take1(args))?;
    Ok(singleton(Item::Boolean(value)))
}

/// `not(seq)`: the negated effective boolean value.
pub(super) fn not_fn(_ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let value = effective_boolean_value(take1(args))?;
    Ok(singleton(Item::Boolean(!value)))
}

pub(super) fn true_fn(_ctx: &CallCtx<'_>, _args: Vec<Sequence>) -> Result<Sequence, Error> {
    Ok(singleton(Item::Boolean(true)))
}

pub(super) fn false_fn(_ctx: &CallCtx<'_>, _args: Vec<Sequence>) -> Result<Sequence, Error> {
    Ok(singleton(Item::Boolean(false)))
}
