//! Centralized limits for the translator.

/// Maximum number of overloads a single function may be split into when
/// its parameters carry union types.
///
/// `f(a: A | B, b: C | D | E)` expands into 2 * 3 = 6 overloads. Beyond this
/// bound the parameters keep their union type and are erased instead.
pub const MAX_UNION_EXPANSION: usize = 16;

/// Maximum number of type arguments printed into an erased type's
/// metadata description before it is truncated with `...`.
pub const MAX_METADATA_MEMBERS: usize = 32;
