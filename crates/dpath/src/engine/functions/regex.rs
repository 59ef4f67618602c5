use super::take2;
use super::strings::string_argument;
use crate::engine::runtime::{CallCtx, Error};
use crate::engine::sequence::{Sequence, singleton};
use crate::item::Item;

/// `matches(s, pattern)`: whether the whole string matches the pattern.
pub(super) fn matches_fn(_ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let (subject_seq, pattern_seq) = take2(args);
    let subject = string_argument("matches", subject_seq)?;
    let pattern = string_argument("matches", pattern_seq)?;
    // Anchor the pattern so only a full match succeeds.
    let regex = fancy_regex::Regex::new(&format!("^(?:{pattern})$"))?;
    let matched = regex.is_match(&subject)?;
    Ok(singleton(Item::Boolean(matched)))
}
