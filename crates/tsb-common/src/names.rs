//! Identifiers and qualifier chains.
//!
//! A `NameEntity` is either a single identifier (`Foo`) or a qualifier
//! chain (`a.b.Foo`). Names are immutable values; every operation returns a
//! new name.
//!
//! Two package sentinels take part in fully-qualified names:
//!
//! | Sentinel | Meaning | Elided by `qualify` |
//! |----------|---------|---------------------|
//! | `<ROOT>` | root module of a source file | yes |
//! | `<LIBROOT>` | shared standard-library namespace | no |

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Package name of a file's root module.
pub const ROOT_PACKAGE: &str = "<ROOT>";

/// Synthetic root segment for declarations supplied by the shared library.
pub const LIBRARY_ROOT: &str = "<LIBROOT>";

/// An identifier or a dotted qualifier chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NameEntity {
    Identifier(String),
    Qualifier {
        left: Box<NameEntity>,
        right: String,
    },
}

impl NameEntity {
    pub fn identifier(value: impl Into<String>) -> Self {
        Self::Identifier(value.into())
    }

    /// The `<ROOT>` package.
    pub fn root() -> Self {
        Self::identifier(ROOT_PACKAGE)
    }

    /// The `<LIBROOT>` package.
    pub fn library_root() -> Self {
        Self::identifier(LIBRARY_ROOT)
    }

    /// Parse `a.b.c` into a qualifier chain. Empty segments are skipped;
    /// an input without any segment yields an empty identifier.
    pub fn from_dotted(text: &str) -> Self {
        Self::from_segments(text.split('.').filter(|segment| !segment.is_empty()))
            .unwrap_or_else(|| Self::identifier(""))
    }

    /// Build a name from its segments, leftmost first.
    pub fn from_segments<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut iter = segments.into_iter();
        let mut name = Self::Identifier(iter.next()?.into());
        for segment in iter {
            name = Self::Qualifier {
                left: Box::new(name),
                right: segment.into(),
            };
        }
        Some(name)
    }

    pub fn rightmost(&self) -> &str {
        match self {
            Self::Identifier(value) => value,
            Self::Qualifier { right, .. } => right,
        }
    }

    pub fn leftmost(&self) -> &str {
        match self {
            Self::Identifier(value) => value,
            Self::Qualifier { left, .. } => left.leftmost(),
        }
    }

    pub const fn is_qualified(&self) -> bool {
        matches!(self, Self::Qualifier { .. })
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Identifier(value) if value == ROOT_PACKAGE)
    }

    /// True for `<LIBROOT>` and every name under it.
    pub fn is_library_rooted(&self) -> bool {
        self.leftmost() == LIBRARY_ROOT
    }

    pub fn segments(&self) -> SmallVec<[&str; 4]> {
        let mut segments = SmallVec::new();
        self.collect_segments(&mut segments);
        segments
    }

    fn collect_segments<'a>(&'a self, out: &mut SmallVec<[&'a str; 4]>) {
        match self {
            Self::Identifier(value) => out.push(value),
            Self::Qualifier { left, right } => {
                left.collect_segments(out);
                out.push(right);
            }
        }
    }

    /// `self.segment`
    #[must_use]
    pub fn append(&self, segment: impl Into<String>) -> Self {
        Self::Qualifier {
            left: Box::new(self.clone()),
            right: segment.into(),
        }
    }

    /// `self.name` for a possibly qualified `name`.
    #[must_use]
    pub fn append_name(&self, name: &NameEntity) -> Self {
        name.prepend(self)
    }

    /// `prefix.self`
    #[must_use]
    pub fn prepend(&self, prefix: &NameEntity) -> Self {
        let mut name = prefix.clone();
        for segment in self.segments() {
            name = name.append(segment);
        }
        name
    }

    /// Everything but the rightmost segment.
    pub fn parent(&self) -> Option<Self> {
        match self {
            Self::Identifier(_) => None,
            Self::Qualifier { left, .. } => Some((**left).clone()),
        }
    }

    /// Everything but the leftmost segment.
    pub fn shift_left(&self) -> Option<Self> {
        Self::from_segments(self.segments().into_iter().skip(1))
    }

    /// Replace the rightmost segment.
    #[must_use]
    pub fn with_rightmost(&self, value: impl Into<String>) -> Self {
        match self {
            Self::Identifier(_) => Self::Identifier(value.into()),
            Self::Qualifier { left, .. } => Self::Qualifier {
                left: left.clone(),
                right: value.into(),
            },
        }
    }

    /// Fully-qualified name of `name` declared in `package`. The `<ROOT>`
    /// package contributes no segment.
    pub fn qualify(package: &NameEntity, name: &NameEntity) -> Self {
        if package.is_root() {
            name.clone()
        } else {
            name.prepend(package)
        }
    }
}

impl fmt::Display for NameEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(value) => f.write_str(value),
            Self::Qualifier { left, right } => write!(f, "{left}.{right}"),
        }
    }
}

impl From<&str> for NameEntity {
    fn from(text: &str) -> Self {
        Self::from_dotted(text)
    }
}

#[cfg(test)]
#[path = "../tests/names_tests.rs"]
mod tests;
