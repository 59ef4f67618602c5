use dpath::{Context, ContextBuilder, ErrorKind, Item, drain, evaluate_expression};
use rstest::rstest;

fn ctx() -> Context {
    ContextBuilder::new()
        .with_context_item(Item::Integer(0))
        .build()
        .expect("context")
}

fn eval(expr: &str) -> Vec<Item> {
    drain(evaluate_expression(expr, &ctx()).expect("evaluate")).expect("drain")
}

#[rstest]
#[case("matches('hello', 'h.*o')", true)]
#[case("matches('hello', 'h')", false)]
#[case("matches('hello', '.*ell.*')", true)]
#[case("matches('hello', '[a-z]+')", true)]
#[case("matches('hello7', '[a-z]+')", false)]
#[case("matches('', '')", true)]
#[case("matches('a.txt', 'a\\.(txt|log)')", true)]
#[case("matches('a_txt', 'a\\.(txt|log)')", false)]
fn matches_is_a_full_match(#[case] expr: &str, #[case] expected: bool) {
    assert_eq!(eval(expr), vec![Item::Boolean(expected)]);
}

#[rstest]
fn alternation_is_anchored_as_a_whole() {
    assert_eq!(eval("matches('ab', 'a|b')"), vec![Item::Boolean(false)]);
    assert_eq!(eval("matches('a', 'a|b')"), vec![Item::Boolean(true)]);
}

#[rstest]
fn invalid_patterns_are_regex_errors() {
    let err = evaluate_expression("matches('x', '(unclosed')", &ctx())
        .and_then(drain)
        .expect_err("expected an error");
    assert_eq!(err.kind, ErrorKind::Regex);
}
