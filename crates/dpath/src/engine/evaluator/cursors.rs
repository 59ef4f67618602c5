//! Cursor types that carry their own evaluation state: expression-filtered
//! sequences, path steps and the descendant traversal.

use smallvec::SmallVec;
use tracing::debug;

use crate::ast::Expr;
use crate::engine::evaluator::{effective_boolean_value, evaluate};
use crate::engine::runtime::{Context, Error};
use crate::engine::sequence::{Sequence, SequenceCursor};
use crate::fs::{self, FileNode};
use crate::item::Item;

/// Expression filter: passes through the source items for which every
/// predicate, evaluated with the item as the context item, has a true
/// effective boolean value.
#[derive(Debug)]
pub(crate) struct PredicateCursor {
    source: Sequence,
    predicates: Vec<Expr>,
    ctx: Context,
}

impl PredicateCursor {
    pub(crate) fn new(source: Sequence, predicates: Vec<Expr>, ctx: Context) -> Self {
        Self {
            source,
            predicates,
            ctx,
        }
    }
}

impl SequenceCursor for PredicateCursor {
    fn next_item(&mut self) -> Option<Result<Item, Error>> {
        'candidates: loop {
            let candidate = match self.source.next_item()? {
                Ok(item) => item,
                Err(e) => return Some(Err(e)),
            };
            let scoped = self.ctx.with_item(candidate.clone());
            for predicate in &self.predicates {
                let result = evaluate(predicate, &scoped)
                    .and_then(effective_boolean_value);
                match result {
                    Ok(true) => {}
                    Ok(false) => continue 'candidates,
                    Err(e) => return Some(Err(e)),
                }
            }
            return Some(Ok(candidate));
        }
    }
}

/// One step of a path expression: for each item pulled from the source, the
/// step expression is evaluated with that item as the context item, and the
/// resulting inner sequence is streamed out before the next source item is
/// touched. Inner results are emitted in source order, without deduplication.
#[derive(Debug)]
pub(crate) struct PathStepCursor {
    source: Sequence,
    step: Expr,
    ctx: Context,
    inner: Option<Sequence>,
}

impl PathStepCursor {
    pub(crate) fn new(source: Sequence, step: Expr, ctx: Context) -> Self {
        Self {
            source,
            step,
            ctx,
            inner: None,
        }
    }
}

impl SequenceCursor for PathStepCursor {
    fn next_item(&mut self) -> Option<Result<Item, Error>> {
        loop {
            if let Some(inner) = self.inner.as_mut() {
                match inner.next_item() {
                    Some(item) => return Some(item),
                    None => self.inner = None,
                }
            }
            let candidate = match self.source.next_item()? {
                Ok(item) => item,
                Err(e) => return Some(Err(e)),
            };
            let scoped = self.ctx.with_item(candidate);
            match evaluate(&self.step, &scoped) {
                Ok(seq) => self.inner = Some(seq),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Depth-first pre-order traversal of everything beneath a directory.
///
/// The stack holds one child listing per directory currently being walked, so
/// held state is bounded by the depth of the tree times the listing size; a
/// directory's listing is pushed when the directory itself is yielded.
#[derive(Debug)]
pub(crate) struct DescendantCursor {
    stack: SmallVec<[std::vec::IntoIter<FileNode>; 8]>,
}

impl DescendantCursor {
    pub(crate) fn new(start: &FileNode) -> Self {
        let mut stack = SmallVec::new();
        stack.push(fs::read_dir(start).into_iter());
        Self { stack }
    }
}

impl SequenceCursor for DescendantCursor {
    fn next_item(&mut self) -> Option<Result<Item, Error>> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(node) => {
                    if node.is_dir {
                        debug!(
                            path = %node.path.display(),
                            depth = self.stack.len(),
                            "descending into directory"
                        );
                        self.stack.push(fs::read_dir(&node).into_iter());
                    }
                    return Some(Ok(Item::File(node)));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
