use std::fs as stdfs;
use std::path::Path;

use dpath::{Context, ContextBuilder, ErrorKind, Item, drain, evaluate_expression};
use rstest::rstest;
use tempfile::TempDir;

fn fixture() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    stdfs::create_dir(dir.path().join("a")).expect("mkdir a");
    stdfs::write(dir.path().join("a/b"), b"hello").expect("write a/b");
    stdfs::write(dir.path().join("c"), b"xyz").expect("write c");
    dir
}

fn dir_ctx(path: &Path) -> Context {
    let node = dpath::fs::stat(path).expect("stat fixture");
    ContextBuilder::new()
        .with_context_item(node)
        .build()
        .expect("context")
}

fn eval_in(path: &Path, expr: &str) -> Vec<Item> {
    drain(evaluate_expression(expr, &dir_ctx(path)).expect("evaluate")).expect("drain")
}

fn names_of(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item {
            Item::File(node) => node.name.clone(),
            other => panic!("expected a file item, got {other:?}"),
        })
        .collect()
}

#[rstest]
fn child_axis_lists_directory_contents() {
    let dir = fixture();
    assert_eq!(names_of(&eval_in(dir.path(), "child::*")), vec!["a", "c"]);
    assert_eq!(names_of(&eval_in(dir.path(), "child::a")), vec!["a"]);
    assert_eq!(eval_in(dir.path(), "child::zzz"), Vec::<Item>::new());
}

#[rstest]
fn child_axis_of_a_plain_file_is_empty() {
    let dir = fixture();
    assert_eq!(eval_in(dir.path(), "count(c/*)"), vec![Item::Integer(0)]);
}

#[rstest]
fn parent_axis_is_a_singleton() {
    let dir = fixture();
    let parent = eval_in(dir.path(), "a/parent::*");
    assert_eq!(
        names_of(&parent),
        vec![dir
            .path()
            .file_name()
            .expect("fixture name")
            .to_string_lossy()
            .into_owned()]
    );
}

#[rstest]
fn parent_get_by_name_checks_the_name() {
    let dir = fixture();
    assert_eq!(names_of(&eval_in(dir.path(), "a/b/parent::a")), vec!["a"]);
    assert_eq!(eval_in(dir.path(), "a/b/parent::zzz"), Vec::<Item>::new());
}

#[rstest]
fn descendant_axis_is_pre_order_and_excludes_self() {
    let dir = fixture();
    assert_eq!(
        names_of(&eval_in(dir.path(), "descendant::*")),
        vec!["a", "b", "c"]
    );
    assert_eq!(names_of(&eval_in(dir.path(), "descendant::b")), vec!["b"]);
}

#[rstest]
fn descendant_or_self_axis_prepends_the_context() {
    let dir = fixture();
    let names = names_of(&eval_in(dir.path(), "descendant-or-self::*"));
    assert_eq!(names.len(), 4);
    assert_eq!(
        names[0],
        dir.path()
            .file_name()
            .expect("fixture name")
            .to_string_lossy()
            .into_owned()
    );
    assert_eq!(&names[1..], ["a", "b", "c"]);
}

#[rstest]
fn ancestor_axis_climbs_to_the_root() {
    let dir = fixture();
    let names = names_of(&eval_in(dir.path(), "a/b/ancestor::*"));
    assert_eq!(names[0], "a");
    assert_eq!(names.last().map(String::as_str), Some("/"));
}

#[rstest]
fn ancestor_or_self_starts_with_the_context() {
    let dir = fixture();
    let names = names_of(&eval_in(dir.path(), "a/b/ancestor-or-self::*"));
    assert_eq!(&names[..2], ["b", "a"]);
    assert_eq!(names.last().map(String::as_str), Some("/"));
}

#[rstest]
fn ancestor_get_by_name_filters() {
    let dir = fixture();
    assert_eq!(names_of(&eval_in(dir.path(), "a/b/ancestor::a")), vec!["a"]);
    assert_eq!(
        names_of(&eval_in(dir.path(), "a/b/ancestor-or-self::b")),
        vec!["b"]
    );
}

#[rstest]
fn attribute_axis_exposes_the_size() {
    let dir = fixture();
    assert_eq!(eval_in(dir.path(), "a/b/@size"), vec![Item::Integer(5)]);
    assert_eq!(eval_in(dir.path(), "c/@size"), vec![Item::Integer(3)]);
    assert_eq!(
        eval_in(dir.path(), "c/attribute::size"),
        vec![Item::Integer(3)]
    );
}

#[rstest]
fn unknown_attributes_are_empty() {
    let dir = fixture();
    assert_eq!(eval_in(dir.path(), "c/@mtime"), Vec::<Item>::new());
}

#[rstest]
fn axes_require_a_file_context_item() {
    let ctx = ContextBuilder::new()
        .with_context_item(Item::Integer(1))
        .build()
        .expect("context");
    for expr in ["*", "..", "child::a", "descendant::*", "@size"] {
        let err = evaluate_expression(expr, &ctx)
            .and_then(drain)
            .expect_err("expected an axis error");
        assert_eq!(err.kind, ErrorKind::AxisMisuse, "{expr}");
    }
}

#[rstest]
fn symlinks_are_not_followed_into() {
    let dir = fixture();
    std::os::unix::fs::symlink(dir.path().join("a"), dir.path().join("link"))
        .expect("symlink");
    // The link itself is listed, but the traversal does not descend
    // through it.
    assert_eq!(
        names_of(&eval_in(dir.path(), "descendant::*")),
        vec!["a", "b", "c", "link"]
    );
}
