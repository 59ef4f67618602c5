//! The builtin namespace.

mod boolean;
mod files;
mod numeric;
mod regex;
mod sequences;
mod strings;

use crate::engine::runtime::FunctionRegistry;
use crate::engine::sequence::{Sequence, empty};

/// Build the default builtin namespace.
pub fn default_function_registry() -> FunctionRegistry {
    let mut reg = FunctionRegistry::new();
    reg.register("boolean", 1, boolean::boolean_fn);
    reg.register("not", 1, boolean::not_fn);
    reg.register("true", 0, boolean::true_fn);
    reg.register("false", 0, boolean::false_fn);

    reg.register_variadic("concat", 1, strings::concat_fn);
    reg.register_range("substring", 2, Some(3), strings::substring_fn);
    reg.register_range("string", 0, Some(1), strings::string_fn);
    reg.register_range("string-length", 0, Some(1), strings::string_length_fn);
    reg.register("starts-with", 2, strings::starts_with_fn);
    reg.register("ends-with", 2, strings::ends_with_fn);
    reg.register("contains", 2, strings::contains_fn);

    reg.register("matches", 2, regex::matches_fn);

    reg.register("round", 1, numeric::round_fn);

    reg.register("empty", 1, sequences::empty_fn);
    reg.register("exists", 1, sequences::exists_fn);
    reg.register("count", 1, sequences::count_fn);

    reg.register_range("name", 0, Some(1), files::name_fn);
    reg.register_range("path", 0, Some(1), files::path_fn);
    reg
}

// The registry has already enforced the arity range when these run.

fn take1(args: Vec<Sequence>) -> Sequence {
    args.into_iter().next().unwrap_or_else(empty)
}

fn take2(args: Vec<Sequence>) -> (Sequence, Sequence) {
    let mut iter = args.into_iter();
    let first = iter.next().unwrap_or_else(empty);
    let second = iter.next().unwrap_or_else(empty);
    (first, second)
}
