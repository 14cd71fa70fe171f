//! Declaration identity.
//!
//! Every class-like, enum, type-alias and module declaration receives a
//! `Uid` exactly once, when the node model is introduced. Uids are opaque
//! strings so they survive serialization unchanged.
//!
//! ## Allocation
//!
//! `UidGenerator` is an explicit sequential counter owned by one
//! node-introduction invocation. Two generators with different namespaces
//! never collide, which lets unrelated source sets be lowered on different
//! threads and still be spliced into one resolution run.
//!
//! | Namespace | Example | Meaning |
//! |-----------|---------|---------|
//! | `lib` | `lib-12` | shared library declaration |
//! | anything else | `main-3` | source declaration |
//! | any + suffix | `main-4_GENERATED` | synthesized interface |

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Opaque declaration identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    /// Namespace reserved for library declarations.
    pub const LIBRARY_NAMESPACE: &'static str = "lib";

    /// Prefix carried by every library uid.
    pub const LIBRARY_PREFIX: &'static str = "lib-";

    /// Suffix carried by uids of synthesized declarations.
    pub const GENERATED_SUFFIX: &'static str = "_GENERATED";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Library-origin flag.
    pub fn is_library(&self) -> bool {
        self.0.starts_with(Self::LIBRARY_PREFIX)
    }

    pub fn is_generated(&self) -> bool {
        self.0.ends_with(Self::GENERATED_SUFFIX)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequential uid allocator scoped to one node-introduction run.
#[derive(Debug, Clone)]
pub struct UidGenerator {
    namespace: String,
    next: u32,
}

impl UidGenerator {
    pub const FIRST_VALID: u32 = 1;

    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            next: Self::FIRST_VALID,
        }
    }

    /// Generator for library declarations; every uid it issues is
    /// library-flagged.
    pub fn library() -> Self {
        Self::new(Uid::LIBRARY_NAMESPACE)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn next_uid(&mut self) -> Uid {
        let uid = Uid(format!("{}-{}", self.namespace, self.next));
        self.next += 1;
        trace!(uid = %uid, "issued uid");
        uid
    }

    /// Uid for a synthesized declaration.
    pub fn next_generated(&mut self) -> Uid {
        let uid = Uid(format!(
            "{}-{}{}",
            self.namespace,
            self.next,
            Uid::GENERATED_SUFFIX
        ));
        self.next += 1;
        trace!(uid = %uid, "issued generated uid");
        uid
    }

    /// Number of uids issued so far.
    pub const fn issued(&self) -> u32 {
        self.next - Self::FIRST_VALID
    }
}

#[cfg(test)]
#[path = "../tests/uid_tests.rs"]
mod tests;
