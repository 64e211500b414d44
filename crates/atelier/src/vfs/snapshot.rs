//! Flattened serialization of the file tree.
//!
//! A [`FileMap`] is the path → content view handed to the model on every
//! outbound request and cached for anonymous work. It is an atomic copy of
//! the tree, never a live view, so readers can run concurrently with the
//! dispatcher without observing partial edits. Serializes as a plain JSON
//! object:
//!
//! ```text
//! { "/App.jsx": "export default ...", "/components/Nav.jsx": "..." }
//! ```
//!
//! Entries iterate in sorted path order, which makes the serialized form
//! deterministic for a given tree state; consumers must not attach meaning
//! to the ordering itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::path::VirtualPath;
use super::tree::FileTree;

/// Serialized path → content view of a [`FileTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMap(BTreeMap<VirtualPath, String>);

impl FileMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture an atomic snapshot of `tree`.
    pub fn capture(tree: &FileTree) -> Self {
        tree.snapshot()
    }

    /// Content recorded for `path`, if present.
    pub fn get(&self, path: &VirtualPath) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    /// Number of files captured.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the capture holds no files.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in sorted path order.
    pub fn iter(&self) -> impl Iterator<Item = (&VirtualPath, &str)> {
        self.0.iter().map(|(path, content)| (path, content.as_str()))
    }
}

impl FromIterator<(VirtualPath, String)> for FileMap {
    fn from_iter<I: IntoIterator<Item = (VirtualPath, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FileMap {
    type Item = (VirtualPath, String);
    type IntoIter = std::collections::btree_map::IntoIter<VirtualPath, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
