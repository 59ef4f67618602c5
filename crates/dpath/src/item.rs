//! The DPath value model: tagged atomic values and file nodes.

use core::fmt;

use crate::fs::FileNode;

/// Runtime kind tag for [`Item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Integer,
    Double,
    Boolean,
    String,
    File,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Integer => "integer",
            ItemKind::Double => "double",
            ItemKind::Boolean => "boolean",
            ItemKind::String => "string",
            ItemKind::File => "file",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The atomic unit of the data model. Items are immutable values and may be
/// freely cloned and shared.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Integer(i64),
    Double(f64),
    Boolean(bool),
    String(String),
    File(FileNode),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Integer(_) => ItemKind::Integer,
            Item::Double(_) => ItemKind::Double,
            Item::Boolean(_) => ItemKind::Boolean,
            Item::String(_) => ItemKind::String,
            Item::File(_) => ItemKind::File,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Item::Integer(_) | Item::Double(_))
    }

    /// Canonical string form: decimal digits for numerics (no trailing
    /// zeros), `true`/`false` for booleans, the base name for files.
    pub fn string_value(&self) -> String {
        match self {
            Item::Integer(v) => v.to_string(),
            Item::Double(v) => v.to_string(),
            Item::Boolean(v) => v.to_string(),
            Item::String(s) => s.clone(),
            Item::File(node) => node.name.clone(),
        }
    }
}

/// Canonical print form, one line per item: `<kind>:<value>`. String contents
/// are emitted verbatim between the quotes.
impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Integer(v) => write!(f, "integer:{v}"),
            Item::Double(v) => write!(f, "double:{v}"),
            Item::Boolean(v) => write!(f, "boolean:{v}"),
            Item::String(s) => write!(f, "string:\"{s}\""),
            Item::File(node) => write!(f, "file:{}", node.path.display()),
        }
    }
}

impl From<i64> for Item {
    fn from(v: i64) -> Self {
        Item::Integer(v)
    }
}

impl From<f64> for Item {
    fn from(v: f64) -> Self {
        Item::Double(v)
    }
}

impl From<bool> for Item {
    fn from(v: bool) -> Self {
        Item::Boolean(v)
    }
}

impl From<&str> for Item {
    fn from(v: &str) -> Self {
        Item::String(v.to_string())
    }
}

impl From<String> for Item {
    fn from(v: String) -> Self {
        Item::String(v)
    }
}

impl From<FileNode> for Item {
    fn from(node: FileNode) -> Self {
        Item::File(node)
    }
}
