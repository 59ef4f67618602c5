//! String builtins. Lengths and substring positions are byte-based.

use super::{take1, take2};
use crate::engine::evaluator::numeric::as_rounded_integer;
use crate::engine::runtime::{CallCtx, Error, ErrorKind};
use crate::engine::sequence::{Sequence, single_item, singleton, zero_or_one};
use crate::item::Item;

/// `concat(s…)`: each argument is a singleton, converted via its canonical
/// string form and appended.
pub(super) fn concat_fn(_ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let mut out = String::new();
    for seq in args {
        out.push_str(&single_item(seq)?.string_value());
    }
    Ok(singleton(Item::String(out)))
}

/// `substring(s, start[, length])`: 1-based positions, numeric positions
/// rounded to the nearest integer, clamped to the string.
pub(super) fn substring_fn(_ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let mut args = args.into_iter();
    let s = string_argument("substring", args.next().unwrap_or_else(crate::engine::sequence::empty))?;
    let start_item = single_item(
        args.next()
            .unwrap_or_else(crate::engine::sequence::empty),
    )?;
    let start_raw = as_rounded_integer(&start_item).ok_or_else(|| {
        Error::new(
            ErrorKind::Type,
            "second argument to substring() must be numeric",
        )
    })?;
    let bytes = s.as_bytes();
    let len = bytes.len() as i64;
    let mut start = start_raw - 1;
    let mut end = len;
    if let Some(length_seq) = args.next() {
        let length_item = single_item(length_seq)?;
        let length = as_rounded_integer(&length_item).ok_or_else(|| {
            Error::new(
                ErrorKind::Type,
                "third argument to substring() must be numeric",
            )
        })?;
        // The end is computed from the unclamped start.
        end = start.saturating_add(length);
    }
    start = start.clamp(0, len);
    end = end.clamp(start, len);
    let slice = &bytes[start as usize..end as usize];
    Ok(singleton(Item::String(
        String::from_utf8_lossy(slice).into_owned(),
    )))
}

/// `string(item?)`: zero-arg form stringifies the context item; one-arg form
/// stringifies any singleton (empty becomes `""`).
pub(super) fn string_fn(ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let value = if args.is_empty() {
        ctx.ctx.item.string_value()
    } else {
        match zero_or_one(take1(args))? {
            Some(item) => item.string_value(),
            None => String::new(),
        }
    };
    Ok(singleton(Item::String(value)))
}

/// `string-length(s?)`: byte length of the argument, or of the context
/// item's string form when called with no arguments.
pub(super) fn string_length_fn(ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let value = if args.is_empty() {
        ctx.ctx.item.string_value()
    } else {
        string_argument("string-length", take1(args))?
    };
    Ok(singleton(Item::Integer(value.len() as i64)))
}

pub(super) fn starts_with_fn(_ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let (s, needle) = two_strings("starts-with", args)?;
    Ok(singleton(Item::Boolean(s.starts_with(&needle))))
}

pub(super) fn ends_with_fn(_ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let (s, needle) = two_strings("ends-with", args)?;
    Ok(singleton(Item::Boolean(s.ends_with(&needle))))
}

pub(super) fn contains_fn(_ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let (s, needle) = two_strings("contains", args)?;
    Ok(singleton(Item::Boolean(s.contains(&needle))))
}

fn two_strings(name: &str, args: Vec<Sequence>) -> Result<(String, String), Error> {
    let (a, b) = take2(args);
    Ok((string_argument(name, a)?, string_argument(name, b)?))
}

/// A string argument: the empty sequence reads as `""`, a singleton must be
/// a string.
pub(super) fn string_argument(name: &str, seq: Sequence) -> Result<String, Error> {
    match zero_or_one(seq)? {
        None => Ok(String::new()),
        Some(Item::String(s)) => Ok(s),
        Some(other) => Err(Error::new(
            ErrorKind::Type,
            format!("{name}() expects a string argument, got {}", other.kind()),
        )),
    }
}
