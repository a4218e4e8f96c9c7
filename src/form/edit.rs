//! Addressing nodes of a form tree and the edits that can be applied to them.
use std::fmt::{self, Display, Formatter};

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::field::FieldKind;
use crate::input::Input;

/// Route from the root of a form to one node, as child indices.
///
/// `Map`, `Group` and `Validated` have a single child `0`; `Apply` and
/// `Select` have `0` (left) and `1` (right); a `List` numbers its items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<usize>);

/// Stable identity of a list item, kept across insertions and removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemId(pub u64);

#[derive(Debug)]
pub enum Edit {
    /// Replace the input of a leaf.
    Set(Input),
    /// Append a fresh copy of a list's template.
    Push,
    /// Remove a list item by index.
    Remove(usize),
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("no node at path {0}")]
    NoSuchNode(Path),
    #[error("no field named `{0}`")]
    UnknownField(String),
    #[error("no list named `{0}`")]
    UnknownList(String),
    #[error("node at {path} does not accept a {edit} edit")]
    Rejected { path: Path, edit: &'static str },
    #[error("field `{field}` expects {expected} input, got {found}")]
    Mismatch {
        field: String,
        expected: FieldKind,
        found: &'static str,
    },
    #[error("invalid value for field `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("list at {path} has {len} items, cannot remove item {index}")]
    OutOfRange { path: Path, index: usize, len: usize },
    #[error("constant fields cannot be edited")]
    ReadOnly,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(index);
        Self(steps)
    }

    /// Step taken at `depth`, `None` once the path is exhausted.
    pub fn step(&self, depth: usize) -> Option<usize> {
        self.0.get(depth).copied()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for Path {
    fn from(steps: Vec<usize>) -> Self {
        Self(steps)
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        for step in &self.0 {
            write!(f, "/{step}")?;
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Edit {
    pub fn describe(&self) -> &'static str {
        match self {
            Edit::Set(_) => "set",
            Edit::Push => "push",
            Edit::Remove(_) => "remove",
        }
    }
}

impl EditError {
    /// Error for an edit that stops at, or steps past, a node with no
    /// matching child.
    pub(crate) fn stray(path: &Path, depth: usize, edit: &Edit) -> Self {
        match path.step(depth) {
            None => EditError::Rejected {
                path: path.clone(),
                edit: edit.describe(),
            },
            Some(_) => EditError::NoSuchNode(path.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_display_as_slash_separated_steps() {
        assert_eq!(Path::root().to_string(), "/");
        assert_eq!(Path::root().child(1).child(0).to_string(), "/1/0");
        assert_eq!(Path::from(vec![2, 3]).step(1), Some(3));
        assert_eq!(Path::from(vec![2, 3]).step(2), None);
    }

    #[test]
    fn only_the_empty_path_is_root() {
        assert!(Path::root().is_root());
        assert!(Path::from(vec![]).is_root());
        assert!(!Path::root().child(0).is_root());
    }

    #[test]
    fn stray_distinguishes_dead_ends_from_missing_children() {
        let p = Path::from(vec![0]);
        assert!(matches!(EditError::stray(&p, 1, &Edit::Push), EditError::Rejected { edit: "push", .. }));
        assert!(matches!(EditError::stray(&p, 0, &Edit::Push), EditError::NoSuchNode(_)));
    }
}
