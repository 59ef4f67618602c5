//! Axis implementations: how to move from the current node.
//!
//! Every axis exposes `iterate` (all items reachable along the axis) and
//! `get_by_name` (items whose name equals the given string). The latter is
//! semantically `iterate` filtered by name, but the child axis answers it
//! with a single stat instead of a directory scan.

use crate::engine::evaluator::cursors::DescendantCursor;
use crate::engine::runtime::{Context, Error, ErrorKind};
use crate::engine::sequence::{Sequence, concat, condition_filter, empty, from_items, singleton};
use crate::fs::{self, FileNode};
use crate::item::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Child,
    Parent,
    Descendant,
    DescendantOrSelf,
    Ancestor,
    AncestorOrSelf,
    Attribute,
}

impl Axis {
    /// Look an axis up by its name in the expression language.
    pub fn from_name(name: &str) -> Option<Axis> {
        Some(match name {
            "child" => Axis::Child,
            "parent" => Axis::Parent,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "ancestor" => Axis::Ancestor,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "attribute" => Axis::Attribute,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Axis::Child => "child",
            Axis::Parent => "parent",
            Axis::Descendant => "descendant",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::Ancestor => "ancestor",
            Axis::AncestorOrSelf => "ancestor-or-self",
            Axis::Attribute => "attribute",
        }
    }

    /// All items reachable along this axis from the context item.
    pub fn iterate(&self, ctx: &Context) -> Result<Sequence, Error> {
        let node = require_file(ctx, self)?;
        Ok(match self {
            Axis::Child => from_items(
                fs::read_dir(&node)
                    .into_iter()
                    .map(Item::File)
                    .collect(),
            ),
            Axis::Parent => match parent_node(&node) {
                Some(parent) => singleton(Item::File(parent)),
                None => empty(),
            },
            Axis::Descendant => {
                let descendants: Sequence = Box::new(DescendantCursor::new(&node));
                descendants
            }
            Axis::DescendantOrSelf => {
                let descendants: Sequence = Box::new(DescendantCursor::new(&node));
                concat(vec![singleton(Item::File(node.clone())), descendants])
            }
            Axis::Ancestor => from_items(ancestor_chain(&node)),
            Axis::AncestorOrSelf => concat(vec![
                singleton(Item::File(node.clone())),
                from_items(ancestor_chain(&node)),
            ]),
            Axis::Attribute => singleton(Item::Integer(node.size as i64)),
        })
    }

    /// Items along this axis whose name equals `name`.
    pub fn get_by_name(&self, ctx: &Context, name: &str) -> Result<Sequence, Error> {
        match self {
            Axis::Child => {
                let node = require_file(ctx, self)?;
                Ok(match fs::stat(&fs::join(&node.path, name)) {
                    Some(child) => singleton(Item::File(child)),
                    None => empty(),
                })
            }
            Axis::Parent => {
                let node = require_file(ctx, self)?;
                Ok(match parent_node(&node) {
                    Some(parent) if parent.name == name => singleton(Item::File(parent)),
                    _ => empty(),
                })
            }
            Axis::Attribute => {
                let node = require_file(ctx, self)?;
                Ok(match name {
                    "size" => singleton(Item::Integer(node.size as i64)),
                    _ => empty(),
                })
            }
            Axis::Descendant | Axis::DescendantOrSelf | Axis::Ancestor | Axis::AncestorOrSelf => {
                let seq = self.iterate(ctx)?;
                let wanted = name.to_string();
                Ok(condition_filter(seq, move |item| {
                    matches!(item, Item::File(f) if f.name == wanted)
                }))
            }
        }
    }
}

fn require_file(ctx: &Context, axis: &Axis) -> Result<FileNode, Error> {
    match &ctx.item {
        Item::File(node) => Ok(node.clone()),
        other => Err(Error::new(
            ErrorKind::AxisMisuse,
            format!(
                "{} axis requires a file context item, got {}",
                axis.name(),
                other.kind()
            ),
        )),
    }
}

fn parent_node(node: &FileNode) -> Option<FileNode> {
    let parent = fs::parent_of(&node.path)?;
    fs::stat(&parent)
}

/// Successive parents up to and including the root, nearest first.
fn ancestor_chain(node: &FileNode) -> Vec<Item> {
    let mut ancestors = Vec::new();
    let mut path = node.path.clone();
    while let Some(parent) = fs::parent_of(&path) {
        if let Some(ancestor) = fs::stat(&parent) {
            ancestors.push(Item::File(ancestor));
        }
        path = parent;
    }
    ancestors
}
