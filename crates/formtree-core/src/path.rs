//! # Entity Paths
//!
//! A [`Path`] addresses an entity from the root of its tree. Each
//! [`Segment`] is either a group content name or a list item index.
//!
//! Paths parse from dot-separated strings. A segment made only of ASCII
//! digits becomes an index, anything else a name, and the empty string is
//! the empty (root) path:
//!
//! ```
//! use formtree_core::{Path, Segment};
//!
//! let path = Path::from("list.0.name");
//! assert_eq!(path.segments(), &[
//!     Segment::from("list"),
//!     Segment::Index(0),
//!     Segment::from("name"),
//! ]);
//! assert_eq!(path.to_string(), "list.0.name");
//! assert!(Path::from("").is_root());
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One hop of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    /// List item position.
    Index(usize),
    /// Group content name.
    Name(String),
}

impl Segment {
    /// Parse one dot-free segment. Digit runs that overflow `usize` stay names.
    pub fn parse(text: &str) -> Self {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = text.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Name(text.to_owned())
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Segment::Name(name.to_owned())
    }
}

impl From<String> for Segment {
    fn from(name: String) -> Self {
        Segment::Name(name)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "{i}"),
            Segment::Name(name) => f.write_str(name),
        }
    }
}

/// A root-relative or entity-relative sequence of segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The empty path, addressing the root.
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.0.push(segment.into());
    }

    /// Append every segment of `other`.
    pub fn join(mut self, other: &Path) -> Path {
        self.0.extend(other.0.iter().cloned());
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.0.iter()
    }
}

impl From<&str> for Path {
    fn from(text: &str) -> Self {
        if text.is_empty() {
            return Path::root();
        }
        Path(text.split('.').map(Segment::parse).collect())
    }
}

impl From<String> for Path {
    fn from(text: String) -> Self {
        Path::from(text.as_str())
    }
}

impl From<&String> for Path {
    fn from(text: &String) -> Self {
        Path::from(text.as_str())
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Path(segments)
    }
}

impl From<&[Segment]> for Path {
    fn from(segments: &[Segment]) -> Self {
        Path(segments.to_vec())
    }
}

impl<const N: usize> From<[Segment; N]> for Path {
    fn from(segments: [Segment; N]) -> Self {
        Path(segments.into())
    }
}

impl From<Segment> for Path {
    fn from(segment: Segment) -> Self {
        Path(vec![segment])
    }
}

impl From<usize> for Path {
    fn from(index: usize) -> Self {
        Path(vec![Segment::Index(index)])
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for Path {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path::from(s))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Build a [`Path`] from mixed name and index segments.
///
/// ```
/// use formtree_core::{path, Path};
///
/// assert_eq!(path!["list", 0usize, "name"], Path::from("list.0.name"));
/// assert!(path![].is_root());
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($segment:expr),+ $(,)?) => {
        $crate::Path::from(vec![$($crate::Segment::from($segment)),+])
    };
}
