pub mod ast;
pub mod engine;
pub mod fs;
pub mod item;
pub mod parser;

pub use engine::axes::Axis;
pub use engine::evaluator::{effective_boolean_value, evaluate, evaluate_expression};
pub use engine::runtime::{Context, ContextBuilder, Environment, Error, ErrorKind, FunctionRegistry};
pub use engine::sequence::{Sequence, SequenceCursor, drain, empty, singleton};
pub use fs::FileNode;
pub use item::{Item, ItemKind};
pub use parser::{DPathParser, parse_expression};
