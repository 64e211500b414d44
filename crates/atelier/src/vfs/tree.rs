//! In-memory project file tree.
//!
//! [`FileTree`] holds every file in the project keyed by [`VirtualPath`].
//! Directories are never stored: they exist implicitly at any prefix of a
//! file's path, and [`FileTree::read_dir`] derives a listing on demand.
//!
//! All mutations flow through the command dispatcher; the tree itself only
//! enforces the per-operation contracts (create never overwrites, write
//! snapshots prior content for undo, rename and delete drop history).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::history::EditHistory;
use super::path::VirtualPath;
use super::snapshot::FileMap;

/// Errors produced by tree operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// No file exists at the path.
    #[error("file not found: {0}")]
    NotFound(VirtualPath),
    /// A file already exists at the path.
    #[error("file already exists: {0}")]
    AlreadyExists(VirtualPath),
    /// The file has no prior content to restore.
    #[error("no edits to undo for {0}")]
    HistoryEmpty(VirtualPath),
}

/// A single file: its current content plus undo history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileNode {
    content: String,
    history: EditHistory,
}

impl FileNode {
    fn new(content: String) -> Self {
        Self {
            content,
            history: EditHistory::new(),
        }
    }
}

/// One entry in a derived directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name within the directory.
    pub name: String,
    /// Whether this entry is a (derived) directory.
    pub is_dir: bool,
}

/// The set of all files in a project, keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct FileTree {
    files: BTreeMap<VirtualPath, FileNode>,
}

impl FileTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a tree from a serialized file map, with empty histories.
    pub fn from_files(files: FileMap) -> Self {
        Self {
            files: files
                .into_iter()
                .map(|(path, content)| (path, FileNode::new(content)))
                .collect(),
        }
    }

    /// Current content of the file at `path`.
    pub fn read(&self, path: &VirtualPath) -> Result<&str, TreeError> {
        self.files
            .get(path)
            .map(|node| node.content.as_str())
            .ok_or_else(|| TreeError::NotFound(path.clone()))
    }

    /// Create a new file. Creating at an existing path is an error, not an
    /// overwrite; callers that mean to change content must use an edit
    /// command.
    pub fn create(&mut self, path: VirtualPath, content: String) -> Result<(), TreeError> {
        if self.files.contains_key(&path) {
            return Err(TreeError::AlreadyExists(path));
        }
        self.files.insert(path, FileNode::new(content));
        Ok(())
    }

    /// Unconditional upsert used by edit commands. The prior content, if
    /// any, is pushed onto the file's history first so the edit can be
    /// undone.
    pub fn write(&mut self, path: VirtualPath, content: String) {
        match self.files.get_mut(&path) {
            Some(node) => {
                let prior = std::mem::replace(&mut node.content, content);
                node.history.push(prior);
            }
            None => {
                self.files.insert(path, FileNode::new(content));
            }
        }
    }

    /// Restore the most recent prior content of `path`.
    ///
    /// The popped snapshot becomes current without recording a new history
    /// entry, so repeated undos walk the stack; there is no redo.
    pub fn undo(&mut self, path: &VirtualPath) -> Result<&str, TreeError> {
        let node = self
            .files
            .get_mut(path)
            .ok_or_else(|| TreeError::NotFound(path.clone()))?;
        let prior = node
            .history
            .pop()
            .ok_or_else(|| TreeError::HistoryEmpty(path.clone()))?;
        node.content = prior;
        Ok(node.content.as_str())
    }

    /// Move the file at `from` to `to`. Edit history does not carry over:
    /// undo is tied to editing, not to file identity.
    pub fn rename(&mut self, from: &VirtualPath, to: VirtualPath) -> Result<(), TreeError> {
        if !self.files.contains_key(from) {
            return Err(TreeError::NotFound(from.clone()));
        }
        if self.files.contains_key(&to) {
            return Err(TreeError::AlreadyExists(to));
        }
        if let Some(node) = self.files.remove(from) {
            self.files.insert(to, FileNode::new(node.content));
        }
        Ok(())
    }

    /// Remove the file at `path` along with its history.
    pub fn delete(&mut self, path: &VirtualPath) -> Result<(), TreeError> {
        self.files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| TreeError::NotFound(path.clone()))
    }

    /// Whether a file exists at `path`.
    pub fn contains(&self, path: &VirtualPath) -> bool {
        self.files.contains_key(path)
    }

    /// All current file paths, in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &VirtualPath> {
        self.files.keys()
    }

    /// Number of files in the tree.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the tree holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Undo depth currently recorded for `path` (0 for absent files).
    pub fn history_depth(&self, path: &VirtualPath) -> usize {
        self.files
            .get(path)
            .map(|node| node.history.depth())
            .unwrap_or(0)
    }

    /// Derived one-level listing of the implicit directory at `dir`.
    ///
    /// Returns `NotFound` when no file lives under `dir`; the root always
    /// lists (possibly empty).
    pub fn read_dir(&self, dir: &VirtualPath) -> Result<Vec<DirEntry>, TreeError> {
        let mut names: BTreeSet<(String, bool)> = BTreeSet::new();
        for path in self.files.keys() {
            if !path.is_under(dir) {
                continue;
            }
            let rest = if dir.is_root() {
                &path.as_str()[1..]
            } else {
                &path.as_str()[dir.as_str().len() + 1..]
            };
            match rest.split_once('/') {
                Some((head, _)) => names.insert((head.to_string(), true)),
                None => names.insert((rest.to_string(), false)),
            };
        }
        if names.is_empty() && !dir.is_root() {
            return Err(TreeError::NotFound(dir.clone()));
        }
        Ok(names
            .into_iter()
            .map(|(name, is_dir)| DirEntry { name, is_dir })
            .collect())
    }

    /// Atomic path → content copy of the whole tree.
    pub fn snapshot(&self) -> FileMap {
        self.files
            .iter()
            .map(|(path, node)| (path.clone(), node.content.clone()))
            .collect()
    }
}
