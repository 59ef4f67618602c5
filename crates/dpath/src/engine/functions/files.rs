use super::take1;
use crate::engine::runtime::{CallCtx, Error, ErrorKind};
use crate::engine::sequence::{Sequence, single_item, singleton};
use crate::fs::FileNode;
use crate::item::Item;

/// `name(file?)`: the base name of the argument, or of the context item.
pub(super) fn name_fn(ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let node = file_argument("name", ctx, args)?;
    Ok(singleton(Item::String(node.name)))
}

/// `path(file?)`: the node's path with its base name appended.
pub(super) fn path_fn(ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<Sequence, Error> {
    let node = file_argument("path", ctx, args)?;
    let joined = node.path.join(&node.name);
    Ok(singleton(Item::String(
        joined.to_string_lossy().into_owned(),
    )))
}

fn file_argument(name: &str, ctx: &CallCtx<'_>, args: Vec<Sequence>) -> Result<FileNode, Error> {
    let item = if args.is_empty() {
        ctx.ctx.item.clone()
    } else {
        single_item(take1(args))?
    };
    match item {
        Item::File(node) => Ok(node),
        other => Err(Error::new(
            ErrorKind::Type,
            format!("{name}() expects a file item, got {}", other.kind()),
        )),
    }
}
