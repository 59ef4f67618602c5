use super::take1;
use crate::engine::runtime::{CallCtx, Error, ErrorKind};
use crate::engine::sequence::{Sequence, single_item, singleton};
use crate::item::Item;

/// `round(x)`: integers pass through; doubles round half away from zero
/// toward positive infinity (`floor(x + 0.5)`), so `round(-0.5)` is `0`.
pub(super) fn round_fn(_ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    match single_item(take1(args))? {
        item @ Item::Integer(_) => Ok(singleton(item)),
        Item::Double(v) => Ok(singleton(Item::Double((v + 0.5).floor()))),
        other => Err(Error::new(
            ErrorKind::Type,
            format!("round() expects a numeric argument, got {}", other.kind()),
        )),
    }
}
