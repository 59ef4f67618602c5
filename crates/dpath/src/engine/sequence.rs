//! The sequence abstraction: a lazy, single-pass, pull-based item stream.

use crate::engine::runtime::{Error, ErrorKind};
use crate::item::Item;

/// A pull cursor over an item stream.
///
/// The cursor starts before the first item. `Some(Ok(item))` advances and
/// yields, `None` means the stream is exhausted, `Some(Err(_))` aborts it.
/// Cursors are fused: once `None` has been returned they keep returning
/// `None`. A cursor that evaluates sub-expressions owns an immutable context
/// snapshot taken at construction, so advancing needs no external state.
pub trait SequenceCursor: std::fmt::Debug {
    fn next_item(&mut self) -> Option<Result<Item, Error>>;
}

pub type Sequence = Box<dyn SequenceCursor>;

/// The empty sequence.
pub fn empty() -> Sequence {
    Box::new(WrapperCursor {
        items: Vec::new().into_iter(),
    })
}

/// A sequence of exactly one item.
pub fn singleton(item: Item) -> Sequence {
    from_items(vec![item])
}

/// Wrap an already-materialized list of items.
pub fn from_items(items: Vec<Item>) -> Sequence {
    Box::new(WrapperCursor {
        items: items.into_iter(),
    })
}

/// Yield everything from each source in order.
pub fn concat(sources: Vec<Sequence>) -> Sequence {
    Box::new(ConcatCursor { sources, index: 0 })
}

/// Pass through the items satisfying a plain predicate function.
pub fn condition_filter(
    source: Sequence,
    keep: impl Fn(&Item) -> bool + 'static,
) -> Sequence {
    Box::new(ConditionFilterCursor {
        source,
        keep: Box::new(keep),
    })
}

/// Inclusive integer range, step 1. Empty when `start > stop`.
pub fn integer_range(start: i64, stop: i64) -> Sequence {
    Box::new(RangeCursor::Integer {
        next: start,
        stop,
        done: start > stop,
    })
}

/// Inclusive double range, step 1.0.
pub fn double_range(start: f64, stop: f64) -> Sequence {
    Box::new(RangeCursor::Double {
        next: start,
        stop,
        done: !(start <= stop),
    })
}

/// Materialize a whole sequence, stopping at the first error.
pub fn drain(mut seq: Sequence) -> Result<Vec<Item>, Error> {
    let mut items = Vec::new();
    while let Some(item) = seq.next_item() {
        items.push(item?);
    }
    Ok(items)
}

/// Exactly one item, or a cardinality error.
pub fn single_item(mut seq: Sequence) -> Result<Item, Error> {
    let item = match seq.next_item() {
        None => {
            return Err(Error::new(
                ErrorKind::Cardinality,
                "expected one value, found none",
            ));
        }
        Some(item) => item?,
    };
    match seq.next_item() {
        None => Ok(item),
        Some(Err(e)) => Err(e),
        Some(Ok(_)) => Err(Error::new(
            ErrorKind::Cardinality,
            "expected one value, found more",
        )),
    }
}

/// At most one item, or a cardinality error.
pub fn zero_or_one(mut seq: Sequence) -> Result<Option<Item>, Error> {
    let item = match seq.next_item() {
        None => return Ok(None),
        Some(item) => item?,
    };
    match seq.next_item() {
        None => Ok(Some(item)),
        Some(Err(e)) => Err(e),
        Some(Ok(_)) => Err(Error::new(
            ErrorKind::Cardinality,
            "expected at most one value, found more",
        )),
    }
}

#[derive(Debug)]
struct WrapperCursor {
    items: std::vec::IntoIter<Item>,
}

impl SequenceCursor for WrapperCursor {
    fn next_item(&mut self) -> Option<Result<Item, Error>> {
        self.items.next().map(Ok)
    }
}

#[derive(Debug)]
enum RangeCursor {
    Integer { next: i64, stop: i64, done: bool },
    Double { next: f64, stop: f64, done: bool },
}

impl SequenceCursor for RangeCursor {
    fn next_item(&mut self) -> Option<Result<Item, Error>> {
        match self {
            RangeCursor::Integer { next, stop, done } => {
                if *done {
                    return None;
                }
                let value = *next;
                if value >= *stop {
                    *done = true;
                } else {
                    *next += 1;
                }
                Some(Ok(Item::Integer(value)))
            }
            RangeCursor::Double { next, stop, done } => {
                if *done {
                    return None;
                }
                let value = *next;
                if value + 1.0 > *stop {
                    *done = true;
                } else {
                    *next += 1.0;
                }
                Some(Ok(Item::Double(value)))
            }
        }
    }
}

#[derive(Debug)]
struct ConcatCursor {
    sources: Vec<Sequence>,
    index: usize,
}

impl SequenceCursor for ConcatCursor {
    fn next_item(&mut self) -> Option<Result<Item, Error>> {
        while let Some(source) = self.sources.get_mut(self.index) {
            match source.next_item() {
                Some(item) => return Some(item),
                None => self.index += 1,
            }
        }
        None
    }
}

struct ConditionFilterCursor {
    source: Sequence,
    keep: Box<dyn Fn(&Item) -> bool>,
}

impl std::fmt::Debug for ConditionFilterCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionFilterCursor")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl SequenceCursor for ConditionFilterCursor {
    fn next_item(&mut self) -> Option<Result<Item, Error>> {
        loop {
            match self.source.next_item()? {
                Ok(item) if (self.keep)(&item) => return Some(Ok(item)),
                Ok(_) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
