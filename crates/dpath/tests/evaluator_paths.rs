use std::fs as stdfs;
use std::path::Path;

use dpath::{Context, ContextBuilder, Item, drain, evaluate_expression};
use rstest::rstest;
use tempfile::TempDir;

/// Builds the tree `{a/, a/b, c}` where `a` is a directory, `a/b` holds five
/// bytes and `c` holds three.
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

fn paths_of(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .map(|item| match item {
            Item::File(node) => node.path.to_string_lossy().into_owned(),
            other => panic!("expected a file item, got {other:?}"),
        })
        .collect()
}

#[rstest]
fn descendant_shorthand_is_depth_first_pre_order() {
    let dir = fixture();
    let items = eval_in(dir.path(), "//*");
    let root = dir.path().to_string_lossy().into_owned();
    assert_eq!(
        paths_of(&items),
        vec![
            format!("{root}/a"),
            format!("{root}/a/b"),
            format!("{root}/c"),
        ]
    );
}

#[rstest]
fn counting_files_under_the_tree() {
    let dir = fixture();
    assert_eq!(eval_in(dir.path(), "count(//file())"), vec![Item::Integer(2)]);
    assert_eq!(eval_in(dir.path(), "count(//dir())"), vec![Item::Integer(1)]);
    assert_eq!(eval_in(dir.path(), "count(//*)"), vec![Item::Integer(3)]);
}

#[rstest]
fn named_steps_walk_the_tree() {
    let dir = fixture();
    let items = eval_in(dir.path(), "a/b");
    assert_eq!(
        paths_of(&items),
        vec![format!("{}/a/b", dir.path().to_string_lossy())]
    );
}

#[rstest]
fn missing_names_produce_the_empty_sequence() {
    let dir = fixture();
    assert_eq!(eval_in(dir.path(), "a/nope"), Vec::<Item>::new());
    assert_eq!(eval_in(dir.path(), "nope"), Vec::<Item>::new());
}

#[rstest]
fn infix_descendant_shorthand_finds_direct_children() {
    let dir = fixture();
    let items = eval_in(dir.path(), ".//b");
    assert_eq!(
        paths_of(&items),
        vec![format!("{}/a/b", dir.path().to_string_lossy())]
    );
    let items = eval_in(dir.path(), "a//b");
    assert_eq!(
        paths_of(&items),
        vec![format!("{}/a/b", dir.path().to_string_lossy())]
    );
}

#[rstest]
fn wildcard_lists_children_in_name_order() {
    let dir = fixture();
    let root = dir.path().to_string_lossy().into_owned();
    assert_eq!(
        paths_of(&eval_in(dir.path(), "*")),
        vec![format!("{root}/a"), format!("{root}/c")]
    );
}

#[rstest]
fn file_and_dir_tests_split_the_listing() {
    let dir = fixture();
    let root = dir.path().to_string_lossy().into_owned();
    assert_eq!(paths_of(&eval_in(dir.path(), "dir()")), vec![format!("{root}/a")]);
    assert_eq!(paths_of(&eval_in(dir.path(), "file()")), vec![format!("{root}/c")]);
}

#[rstest]
fn quoted_name_tests_reach_any_name() {
    let dir = fixture();
    stdfs::write(dir.path().join("dir"), b"!").expect("write");
    let items = eval_in(dir.path(), "#\"dir\"");
    assert_eq!(
        paths_of(&items),
        vec![format!("{}/dir", dir.path().to_string_lossy())]
    );
}

#[rstest]
fn predicates_filter_path_results() {
    let dir = fixture();
    let root = dir.path().to_string_lossy().into_owned();
    assert_eq!(
        paths_of(&eval_in(dir.path(), "//file()[@size > 4]")),
        vec![format!("{root}/a/b")]
    );
    assert_eq!(
        paths_of(&eval_in(dir.path(), "*[name() eq 'c']")),
        vec![format!("{root}/c")]
    );
}

#[rstest]
fn paths_compose_associatively() {
    let dir = fixture();
    assert_eq!(
        eval_in(dir.path(), "(a/b)/@size"),
        eval_in(dir.path(), "a/(b/@size)")
    );
    assert_eq!(eval_in(dir.path(), "a/b/@size"), vec![Item::Integer(5)]);
}

#[rstest]
fn a_step_may_be_any_expression() {
    let dir = fixture();
    // The final step is evaluated once per source item, with the context
    // item rebound; a literal step just yields its own value each time.
    assert_eq!(
        eval_in(dir.path(), "(a, c)/name()"),
        vec![Item::String("a".to_string()), Item::String("c".to_string())]
    );
    assert_eq!(eval_in(dir.path(), "4 / 2"), vec![Item::Integer(2)]);
}

#[rstest]
fn rooted_paths_start_at_the_filesystem_root() {
    let dir = fixture();
    let items = eval_in(dir.path(), "/");
    assert_eq!(paths_of(&items), vec!["/".to_string()]);
    // Parent of the root is empty, from both spellings.
    assert_eq!(eval_in(dir.path(), "count(/..)"), vec![Item::Integer(0)]);
    assert_eq!(
        eval_in(dir.path(), "count(/ancestor::*)"),
        vec![Item::Integer(0)]
    );
}

#[rstest]
fn parent_steps_climb_back_up() {
    let dir = fixture();
    let root = dir.path().to_string_lossy().into_owned();
    assert_eq!(paths_of(&eval_in(dir.path(), "a/b/..")), vec![format!("{root}/a")]);
    assert_eq!(paths_of(&eval_in(dir.path(), "a/../c")), vec![format!("{root}/c")]);
}
