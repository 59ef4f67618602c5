//! AST for DPath expressions.

use crate::engine::axes::Axis;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Double(f64),
    String(String),
    EmptySequence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnarySign {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    IDiv,
    Mod,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "div",
            BinaryOp::IDiv => "idiv",
            BinaryOp::Mod => "mod",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

/// Shared by value comparisons (`eq ne lt le gt ge`) and general comparisons
/// (`= != < <= > >=`); the surrounding expression variant decides which
/// semantics apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// The name/kind predicate component of a path step.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeTest {
    /// A QName, or an arbitrary name written as `#"…"`.
    Name(String),
    /// `*`: everything the axis yields.
    Wildcard,
    /// `file()`: non-directories only.
    FilesOnly,
    /// `dir()`: directories only.
    DirsOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    /// Whether the path starts at the filesystem root (`/…` or `//…`).
    pub rooted: bool,
    /// Step expressions, evaluated left to right. `//` separators have
    /// already been desugared into explicit `descendant-or-self::*` steps.
    pub steps: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// `.`
    ContextItem,
    /// Comma-separated expressions; evaluates to their flat concatenation.
    Sequence(Vec<Expr>),
    Unary {
        sign: UnarySign,
        expr: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    ValueComparison {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    GeneralComparison {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    /// `start to end`, inclusive, step 1.
    Range {
        start: Box<Expr>,
        end: Box<Expr>,
    },
    FunctionCall {
        name: String,
        args: Vec<Expr>,
    },
    /// A source expression filtered by one or more `[…]` predicates.
    Filtered {
        source: Box<Expr>,
        predicates: Vec<Expr>,
    },
    Path(PathExpr),
    /// An axis-qualified step: `axis::test` or `@test`.
    AxisStep {
        axis: Axis,
        test: NodeTest,
    },
    /// `..`: the parent axis, regardless of the current axis.
    ParentShorthand,
    /// A bare node test, interpreted against the current axis.
    NodeTest(NodeTest),
}
