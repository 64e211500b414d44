//! Virtual path normalization and validation.
//!
//! Every file in the project tree is addressed by a [`VirtualPath`]: an
//! absolute, slash-separated path rooted at `/`. Paths are normalized at the
//! boundary so the tree never holds duplicate entries for the same logical
//! file — `/a/b`, `/a//b/` and `/a/./b` all parse to the same value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing a raw path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The input was empty.
    #[error("empty path")]
    Empty,
    /// The input did not start with `/`.
    #[error("path must be absolute: {0}")]
    Relative(String),
    /// A `..` segment would climb above the root.
    #[error("path escapes root: {0}")]
    EscapesRoot(String),
}

/// A normalized absolute path identifying a file within the in-memory tree.
///
/// Invariants: starts with `/`, no trailing slash except for the root itself,
/// no `.`/`..`/empty segments. Two paths are equal iff their normalized
/// forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualPath(String);

impl VirtualPath {
    /// Parse and normalize a raw path string.
    ///
    /// Repeated slashes collapse, `.` segments resolve away, and `..`
    /// segments resolve against their parent. A `..` with no parent to
    /// consume is rejected rather than silently clamped.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        if !raw.starts_with('/') {
            return Err(PathError::Relative(raw.to_string()));
        }

        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(PathError::EscapesRoot(raw.to_string()));
                    }
                }
                other => segments.push(other),
            }
        }

        if segments.is_empty() {
            return Ok(Self::root());
        }
        Ok(Self(format!("/{}", segments.join("/"))))
    }

    /// The root path `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// The normalized path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final path segment, or `""` for the root.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<VirtualPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// Whether `self` is inside `dir` (directly or transitively).
    pub fn is_under(&self, dir: &VirtualPath) -> bool {
        if dir.is_root() {
            return !self.is_root();
        }
        self.0
            .strip_prefix(dir.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VirtualPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for VirtualPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let path = VirtualPath::parse("/App.jsx").expect("parse");
        assert_eq!(path.as_str(), "/App.jsx");
    }

    #[test]
    fn test_equivalent_spellings_normalize_identically() {
        let a = VirtualPath::parse("/a/b").expect("parse");
        let b = VirtualPath::parse("/a//b/").expect("parse");
        let c = VirtualPath::parse("/a/./b").expect("parse");
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_parse_is_idempotent() {
        for raw in ["/a//b/", "/x/./y/../z", "/", "/components/Nav.jsx"] {
            let once = VirtualPath::parse(raw).expect("parse");
            let twice = VirtualPath::parse(once.as_str()).expect("reparse");
            assert_eq!(once, twice, "normalization should be idempotent: {raw}");
        }
    }

    #[test]
    fn test_dotdot_resolves_within_root() {
        let path = VirtualPath::parse("/a/b/../c").expect("parse");
        assert_eq!(path.as_str(), "/a/c");
    }

    #[test]
    fn test_dotdot_escaping_root_rejected() {
        assert_eq!(
            VirtualPath::parse("/.."),
            Err(PathError::EscapesRoot("/..".to_string()))
        );
        assert_eq!(
            VirtualPath::parse("/a/../../b"),
            Err(PathError::EscapesRoot("/a/../../b".to_string()))
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(VirtualPath::parse(""), Err(PathError::Empty));
    }

    #[test]
    fn test_relative_rejected() {
        assert_eq!(
            VirtualPath::parse("a/b"),
            Err(PathError::Relative("a/b".to_string()))
        );
    }

    #[test]
    fn test_root_normalization() {
        assert_eq!(VirtualPath::parse("/").expect("parse"), VirtualPath::root());
        assert_eq!(VirtualPath::parse("///").expect("parse"), VirtualPath::root());
        assert!(VirtualPath::root().is_root());
    }

    #[test]
    fn test_file_name_and_parent() {
        let path = VirtualPath::parse("/components/Nav.jsx").expect("parse");
        assert_eq!(path.file_name(), "Nav.jsx");
        assert_eq!(
            path.parent(),
            Some(VirtualPath::parse("/components").expect("parse"))
        );

        let top = VirtualPath::parse("/App.jsx").expect("parse");
        assert_eq!(top.parent(), Some(VirtualPath::root()));
        assert_eq!(VirtualPath::root().parent(), None);
    }

    #[test]
    fn test_is_under() {
        let file = VirtualPath::parse("/components/Nav.jsx").expect("parse");
        let dir = VirtualPath::parse("/components").expect("parse");
        assert!(file.is_under(&dir));
        assert!(file.is_under(&VirtualPath::root()));
        assert!(!dir.is_under(&file));
        // Sibling with a shared name prefix is not "under".
        let sibling = VirtualPath::parse("/components2/x").expect("parse");
        assert!(!sibling.is_under(&dir));
    }

    #[test]
    fn test_serde_transparent() {
        let path = VirtualPath::parse("/App.jsx").expect("parse");
        let json = serde_json::to_string(&path).expect("serialize");
        assert_eq!(json, "\"/App.jsx\"");
        let back: VirtualPath = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, path);
    }

    #[test]
    fn test_from_str() {
        let path: VirtualPath = "/a/b".parse().expect("parse");
        assert_eq!(path.as_str(), "/a/b");
    }
}
