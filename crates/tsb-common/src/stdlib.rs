//! Well-known standard-library entities.
//!
//! Two tables live here. `TARGET_ENTITIES` lists names the target
//! standard library always provides; a reference to one of them that no
//! declaration resolves is addressed under `<LIBROOT>`. `SOURCE_SUBSTITUTIONS`
//! rewrites source standard-library names that have a direct target
//! counterpart before any type-shape lowering runs.

use crate::names::{LIBRARY_ROOT, NameEntity};
use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

/// Names provided by the target standard library.
pub static TARGET_ENTITIES: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "Any",
        "Array",
        "Boolean",
        "Byte",
        "Char",
        "Comparable",
        "Double",
        "Float",
        "Function",
        "Int",
        "Iterable",
        "Long",
        "Nothing",
        "Number",
        "Promise",
        "RegExp",
        "Short",
        "String",
        "Throwable",
        "Unit",
    ]
    .into_iter()
    .collect()
});

/// Source standard-library names with a direct target counterpart.
pub static SOURCE_SUBSTITUTIONS: Lazy<FxHashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("ReadonlyArray", "Array"),
        ("PromiseLike", "Promise"),
        ("Object", "Any"),
        ("Error", "Throwable"),
    ]
    .into_iter()
    .collect()
});

/// True when `name` is an unqualified target standard-library entity.
pub fn is_target_entity(name: &NameEntity) -> bool {
    !name.is_qualified() && TARGET_ENTITIES.contains(name.rightmost())
}

/// Target counterpart of a source standard-library name.
pub fn source_substitution(name: &NameEntity) -> Option<&'static str> {
    if name.is_qualified() {
        return None;
    }
    SOURCE_SUBSTITUTIONS.get(name.rightmost()).copied()
}

/// `<LIBROOT>.name`
pub fn library_name(name: &NameEntity) -> NameEntity {
    name.prepend(&NameEntity::identifier(LIBRARY_ROOT))
}
