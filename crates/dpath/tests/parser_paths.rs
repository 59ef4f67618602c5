use dpath::Axis;
use dpath::ast::{Expr, NodeTest};
use dpath::parse_expression;
use rstest::rstest;

fn parse(input: &str) -> Expr {
    parse_expression(input).expect("parse")
}

#[rstest]
fn a_bare_name_is_a_node_test_on_the_current_axis() {
    assert_eq!(
        parse("readme"),
        Expr::NodeTest(NodeTest::Name("readme".to_string()))
    );
    assert_eq!(parse("*"), Expr::NodeTest(NodeTest::Wildcard));
    assert_eq!(parse("file()"), Expr::NodeTest(NodeTest::FilesOnly));
    assert_eq!(parse("dir()"), Expr::NodeTest(NodeTest::DirsOnly));
}

#[rstest]
fn named_axes_and_the_attribute_shorthand() {
    assert_eq!(
        parse("descendant::b"),
        Expr::AxisStep {
            axis: Axis::Descendant,
            test: NodeTest::Name("b".to_string()),
        }
    );
    assert_eq!(
        parse("@size"),
        Expr::AxisStep {
            axis: Axis::Attribute,
            test: NodeTest::Name("size".to_string()),
        }
    );
    assert_eq!(parse(".."), Expr::ParentShorthand);
}

#[rstest]
fn relative_paths_chain_steps() {
    let Expr::Path(path) = parse("a/b/c") else {
        panic!("expected a path");
    };
    assert!(!path.rooted);
    assert_eq!(path.steps.len(), 3);
}

#[rstest]
fn a_leading_slash_roots_the_path() {
    let Expr::Path(path) = parse("/a/b") else {
        panic!("expected a path");
    };
    assert!(path.rooted);
    assert_eq!(path.steps.len(), 2);

    let Expr::Path(path) = parse("/") else {
        panic!("expected a path");
    };
    assert!(path.rooted);
    assert!(path.steps.is_empty());
}

#[rstest]
fn leading_descendant_shorthand_merges_into_a_descendant_step() {
    assert_eq!(
        parse("//*"),
        Expr::AxisStep {
            axis: Axis::Descendant,
            test: NodeTest::Wildcard,
        }
    );
    assert_eq!(
        parse("//file()"),
        Expr::AxisStep {
            axis: Axis::Descendant,
            test: NodeTest::FilesOnly,
        }
    );
}

#[rstest]
fn infix_descendant_shorthand_merges_too() {
    let Expr::Path(path) = parse("a//b") else {
        panic!("expected a path");
    };
    assert!(!path.rooted);
    assert_eq!(
        path.steps,
        vec![
            Expr::NodeTest(NodeTest::Name("a".to_string())),
            Expr::AxisStep {
                axis: Axis::Descendant,
                test: NodeTest::Name("b".to_string()),
            },
        ]
    );
}

#[rstest]
fn exotic_descendant_steps_keep_the_explicit_form() {
    let Expr::Path(path) = parse("a//..") else {
        panic!("expected a path");
    };
    assert_eq!(
        path.steps,
        vec![
            Expr::NodeTest(NodeTest::Name("a".to_string())),
            Expr::AxisStep {
                axis: Axis::DescendantOrSelf,
                test: NodeTest::Wildcard,
            },
            Expr::ParentShorthand,
        ]
    );
}

#[rstest]
fn predicates_attach_to_steps() {
    let Expr::Path(path) = parse("a[dir()]/b") else {
        panic!("expected a path");
    };
    assert!(matches!(&path.steps[0], Expr::Filtered { .. }));
}

#[rstest]
fn a_primary_expression_can_be_a_step() {
    let Expr::Path(path) = parse("(1, 2)/.") else {
        panic!("expected a path");
    };
    assert_eq!(path.steps.len(), 2);
    assert!(matches!(&path.steps[0], Expr::Sequence(_)));
    assert_eq!(path.steps[1], Expr::ContextItem);
}

#[rstest]
fn unknown_axis_names_are_syntax_errors() {
    let err = parse_expression("sideways::a").expect_err("expected an error");
    assert_eq!(err.kind, dpath::ErrorKind::Syntax);
}

#[rstest]
fn whitespace_is_free_around_tokens() {
    assert_eq!(parse("a / b"), parse("a/b"));
    assert_eq!(parse("child :: a"), parse("child::a"));
    assert_eq!(parse(" 1+2 "), parse("1 + 2"));
}
