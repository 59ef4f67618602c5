//! Evaluation runtime: the error type, the evaluation context and the builtin
//! function registry.

use core::fmt;
use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::axes::Axis;
use crate::engine::sequence::Sequence;
use crate::fs;
use crate::item::Item;

/// The error taxonomy. Kinds are coarse on purpose: callers branch on the
/// kind, humans read the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Lexer/parser failure; no AST was produced.
    Syntax,
    /// An operator or builtin applied to the wrong item kind(s).
    Type,
    /// A function call with the wrong number of arguments.
    Arity,
    /// An operand that must be a singleton was empty or longer.
    Cardinality,
    /// An axis applied to a context item that is not a file.
    AxisMisuse,
    /// A call to a name absent from the builtin namespace.
    UnknownFunction,
    /// An unrecoverable filesystem failure.
    Filesystem,
    /// An invalid pattern handed to `matches`.
    Regex,
    /// An engine invariant was violated.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Type => "type error",
            ErrorKind::Arity => "arity error",
            ErrorKind::Cardinality => "cardinality error",
            ErrorKind::AxisMisuse => "axis error",
            ErrorKind::UnknownFunction => "unknown function",
            ErrorKind::Filesystem => "filesystem error",
            ErrorKind::Regex => "regex error",
            ErrorKind::Internal => "internal error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        mut self,
        source: impl Into<Option<Arc<dyn std::error::Error + Send + Sync>>>,
    ) -> Self {
        self.source = source.into();
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::new(ErrorKind::Filesystem, e.to_string())
            .with_source(Some(Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>))
    }
}

impl From<fancy_regex::Error> for Error {
    fn from(e: fancy_regex::Error) -> Self {
        Error::new(ErrorKind::Regex, "invalid regular expression")
            .with_source(Some(Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>))
    }
}

/// Read-only evaluation environment shared by every context derived during
/// one evaluation.
pub struct Environment {
    pub functions: FunctionRegistry,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            functions: crate::engine::functions::default_function_registry(),
        }
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").finish_non_exhaustive()
    }
}

/// The evaluation context: the current item, the current axis and the shared
/// environment.
///
/// Contexts are never mutated. Rebinding the item or axis produces a derived
/// context ([`Context::with_item`], [`Context::with_axis`]) that is passed
/// down or captured by whichever cursor needs it, so there is no
/// save-and-restore discipline to get wrong.
#[derive(Debug, Clone)]
pub struct Context {
    pub item: Item,
    pub axis: Axis,
    pub env: Arc<Environment>,
}

impl Context {
    pub fn new(item: impl Into<Item>) -> Self {
        Self {
            item: item.into(),
            axis: Axis::Child,
            env: Arc::new(Environment::default()),
        }
    }

    /// The default CLI context: the current working directory on the child
    /// axis with the builtin namespace.
    pub fn for_cwd() -> Result<Self, Error> {
        let cwd = std::env::current_dir()?;
        let node = fs::stat(&cwd).ok_or_else(|| {
            Error::new(
                ErrorKind::Filesystem,
                format!("cannot stat working directory {}", cwd.display()),
            )
        })?;
        Ok(Self::new(Item::File(node)))
    }

    pub fn with_item(&self, item: impl Into<Item>) -> Self {
        Self {
            item: item.into(),
            axis: self.axis,
            env: Arc::clone(&self.env),
        }
    }

    pub fn with_axis(&self, axis: Axis) -> Self {
        Self {
            item: self.item.clone(),
            axis,
            env: Arc::clone(&self.env),
        }
    }
}

pub struct ContextBuilder {
    item: Option<Item>,
    axis: Axis,
    env: Option<Arc<Environment>>,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            item: None,
            axis: Axis::Child,
            env: None,
        }
    }

    pub fn with_context_item(mut self, item: impl Into<Item>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_environment(mut self, env: Arc<Environment>) -> Self {
        self.env = Some(env);
        self
    }

    /// Build the context. Without an explicit context item this falls back to
    /// the current working directory, like the CLI does.
    pub fn build(self) -> Result<Context, Error> {
        let mut ctx = match self.item {
            Some(item) => Context::new(item),
            None => Context::for_cwd()?,
        };
        ctx.axis = self.axis;
        if let Some(env) = self.env {
            ctx.env = env;
        }
        Ok(ctx)
    }
}

/// What a builtin sees when invoked.
pub struct CallCtx<'a> {
    pub ctx: &'a Context,
}

pub type FunctionImpl =
    Arc<dyn Fn(&CallCtx<'_>, Vec<Sequence>) -> Result<Sequence, Error> + Send + Sync>;

struct Registration {
    min_arity: usize,
    max_arity: Option<usize>,
    imp: FunctionImpl,
}

/// Name-keyed builtin namespace. Each registration carries an arity range;
/// an open maximum makes the function variadic.
#[derive(Default)]
pub struct FunctionRegistry {
    fns: HashMap<String, Registration>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, arity: usize, f: F)
    where
        F: Fn(&CallCtx<'_>, Vec<Sequence>) -> Result<Sequence, Error> + Send + Sync + 'static,
    {
        self.register_range(name, arity, Some(arity), f);
    }

    pub fn register_range<F>(&mut self, name: &str, min_arity: usize, max_arity: Option<usize>, f: F)
    where
        F: Fn(&CallCtx<'_>, Vec<Sequence>) -> Result<Sequence, Error> + Send + Sync + 'static,
    {
        self.fns.insert(
            name.to_string(),
            Registration {
                min_arity,
                max_arity,
                imp: Arc::new(f),
            },
        );
    }

    pub fn register_variadic<F>(&mut self, name: &str, min_arity: usize, f: F)
    where
        F: Fn(&CallCtx<'_>, Vec<Sequence>) -> Result<Sequence, Error> + Send + Sync + 'static,
    {
        self.register_range(name, min_arity, None, f);
    }

    /// Resolve a call, enforcing the declared arity range.
    pub fn resolve(&self, name: &str, argc: usize) -> Result<FunctionImpl, Error> {
        let reg = self.fns.get(name).ok_or_else(|| {
            Error::new(
                ErrorKind::UnknownFunction,
                format!("unknown function '{name}'"),
            )
        })?;
        if argc < reg.min_arity || reg.max_arity.is_some_and(|max| argc > max) {
            let expected = match (reg.min_arity, reg.max_arity) {
                (min, Some(max)) if min == max => format!("{min}"),
                (min, Some(max)) => format!("{min} to {max}"),
                (min, None) => format!("at least {min}"),
            };
            return Err(Error::new(
                ErrorKind::Arity,
                format!("{name}() expects {expected} argument(s), got {argc}"),
            ));
        }
        Ok(Arc::clone(&reg.imp))
    }
}
