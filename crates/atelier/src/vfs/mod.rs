//! Virtual filesystem for the project tree.
//!
//! The tree is path-addressed and entirely in memory:
//!
//! ```text
//! /App.jsx                 - files are the only stored nodes
//! /components/Nav.jsx      - directories exist implicitly at path prefixes
//! ```
//!
//! [`VirtualPath`] normalizes every incoming path so equivalent spellings
//! collapse to one key; [`FileTree`] holds content plus per-file
//! [`EditHistory`]; [`FileMap`] is the flattened path → content view sent to
//! the model.

mod history;
mod path;
mod snapshot;
mod tree;

pub use history::EditHistory;
pub use path::{PathError, VirtualPath};
pub use snapshot::FileMap;
pub use tree::{DirEntry, FileTree, TreeError};
