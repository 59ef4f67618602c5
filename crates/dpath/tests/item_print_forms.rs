use std::fs as stdfs;

use dpath::{Context, ContextBuilder, Item, drain, evaluate_expression};
use rstest::rstest;
use tempfile::TempDir;

fn ctx() -> Context {
    ContextBuilder::new()
        .with_context_item(Item::Integer(0))
        .build()
        .expect("context")
}

fn printed(expr: &str) -> Vec<String> {
    drain(evaluate_expression(expr, &ctx()).expect("evaluate"))
        .expect("drain")
        .iter()
        .map(|item| item.to_string())
        .collect()
}

#[rstest]
#[case("1 + 2 * 3", "integer:7")]
#[case("-42", "integer:-42")]
#[case("1 div 2", "double:0.5")]
#[case("2.0", "double:2")]
#[case("3.14159", "double:3.14159")]
#[case("\"hello\" eq 'hello'", "boolean:true")]
#[case("1 eq 2", "boolean:false")]
#[case("'plain'", "string:\"plain\"")]
#[case("concat('x=', 1 + 1)", "string:\"x=2\"")]
#[case("substring('motor car', 6)", "string:\" car\"")]
fn canonical_print_forms(#[case] expr: &str, #[case] expected: &str) {
    assert_eq!(printed(expr), vec![expected.to_string()]);
}

#[rstest]
fn predicate_example_from_end_to_end() {
    assert_eq!(
        printed("(1 to 5)[. mod 2 eq 0]"),
        vec!["integer:2".to_string(), "integer:4".to_string()]
    );
}

#[rstest]
fn string_contents_are_emitted_verbatim() {
    // Embedded quotes are not escaped on output.
    assert_eq!(printed("'say \"hi\"'"), vec!["string:\"say \"hi\"\""]);
}

#[rstest]
fn file_items_print_their_absolute_path() {
    let dir = TempDir::new().expect("tempdir");
    stdfs::write(dir.path().join("c"), b"xyz").expect("write");
    let node = dpath::fs::stat(&dir.path().join("c")).expect("stat");
    let ctx = ContextBuilder::new()
        .with_context_item(node)
        .build()
        .expect("context");
    let items = drain(evaluate_expression(".", &ctx).expect("evaluate")).expect("drain");
    assert_eq!(
        items[0].to_string(),
        format!("file:{}/c", dir.path().to_string_lossy())
    );
}
