//! Filesystem adapter.
//!
//! The engine touches the filesystem through exactly four primitives: [`stat`],
//! [`read_dir`], [`join`] and [`parent_of`]. File items are only ever produced
//! here, so the symlink policy (metadata is read without following links) is
//! decided in one place.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// A filesystem node with its cached metadata.
///
/// The path is absolute and lexically normalized; `name` is the base name
/// (the path itself for the root).
#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
}

impl FileNode {
    fn from_metadata(path: PathBuf, meta: &fs::Metadata) -> FileNode {
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().into_owned(),
            None => path.to_string_lossy().into_owned(),
        };
        FileNode {
            name,
            size: meta.len(),
            is_dir: meta.is_dir(),
            path,
        }
    }
}

/// Stat a path without following symlinks. Returns `None` for paths that do
/// not exist or cannot be inspected; callers treat both as "no such node".
pub fn stat(path: &Path) -> Option<FileNode> {
    let meta = fs::symlink_metadata(path).ok()?;
    Some(FileNode::from_metadata(path.to_path_buf(), &meta))
}

/// List the children of a directory node, in name order.
///
/// Non-directories have no children. Open and read failures are logged and
/// reported as an empty listing; a missing directory is not an evaluation
/// error.
pub fn read_dir(node: &FileNode) -> Vec<FileNode> {
    if !node.is_dir {
        return Vec::new();
    }
    let entries = match fs::read_dir(&node.path) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(path = %node.path.display(), %error, "failed to open directory");
            return Vec::new();
        }
    };
    let mut children = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(path = %node.path.display(), %error, "failed to read directory entry");
                continue;
            }
        };
        // DirEntry::metadata does not traverse symlinks.
        match entry.metadata() {
            Ok(meta) => children.push(FileNode::from_metadata(entry.path(), &meta)),
            Err(error) => {
                warn!(path = %entry.path().display(), %error, "failed to stat directory entry");
            }
        }
    }
    children.sort_by(|a, b| a.name.cmp(&b.name));
    children
}

/// Join a child name onto a directory path. `".."` resolves lexically, and
/// the parent of the root is the root itself.
pub fn join(parent: &Path, child: &str) -> PathBuf {
    if child == ".." {
        let mut path = parent.to_path_buf();
        path.pop();
        if path.as_os_str().is_empty() {
            path.push("/");
        }
        return path;
    }
    parent.join(child)
}

/// The parent directory of a path, or `None` at the root.
pub fn parent_of(path: &Path) -> Option<PathBuf> {
    path.parent().map(Path::to_path_buf)
}

/// The filesystem root as a node.
pub fn root() -> Option<FileNode> {
    stat(Path::new("/"))
}
