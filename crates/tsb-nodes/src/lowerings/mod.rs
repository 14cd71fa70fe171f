//! Node-level lowerings, in pipeline order.
//!
//! | # | Lowering | Effect |
//! |---|----------|--------|
//! | 1 | `introduce_type_nodes` | in-scope type parameter names become type parameter references |
//! | 2 | `introduce_qualified_names` | named types and heritage clauses receive uid references |
//! | 3 | `lower_nullable` | `T \| null` becomes `T?` |
//! | 4 | `lower_primitives` | source primitives become target types |
//! | 5 | `lower_varargs` | `...xs: Array<T>` becomes `vararg xs: T` |
//! | 6 | `lower_intersection_type` | `A & B` becomes `A` with intersection metadata |
//! | 7 | `lower_this_type` | `this` becomes the owner type |
//! | 8 | `resolve_type_aliases` | references to union aliases become the union |
//! | 9 | `specify_union_type` | union-typed parameters split into overloads |
//! | 10 | `remove_unused_generated_entities` | drops generated interfaces no declaration reaches |
//! | 11 | `synthesize_overloads` | trailing optional parameters become explicit overloads |
//! | 12 | `rearrange_constructors` | field promotion, primary constructor selection |
//! | 13 | `lower_interface_operators` | interface `get` / `set` / `invoke` become inline extensions |
//! | 14 | `move_type_aliases_outside` | aliases leave roots bound to a JS module or qualifier |

mod constructors;
mod interface_operators;
mod intersection;
mod nullable;
mod overloads;
mod primitives;
mod qualified_names;
mod this_type;
mod type_aliases;
mod type_nodes;
mod union_type;
mod unused_generated;
mod varargs;

pub use constructors::rearrange_constructors;
pub use interface_operators::lower_interface_operators;
pub use intersection::lower_intersection_type;
pub use nullable::lower_nullable;
pub use overloads::synthesize_overloads;
pub use primitives::lower_primitives;
pub use qualified_names::introduce_qualified_names;
pub use this_type::lower_this_type;
pub use type_aliases::{move_type_aliases_outside, resolve_type_aliases};
pub use type_nodes::introduce_type_nodes;
pub use union_type::specify_union_type;
pub use unused_generated::remove_unused_generated_entities;
pub use varargs::lower_varargs;

use crate::types::ParameterNode;
use std::fmt::Write;

/// Identity of a callable for duplicate detection: name plus parameter
/// types, ignoring metadata and parameter names.
fn signature_key(name: &str, parameters: &[ParameterNode]) -> String {
    let mut key = String::with_capacity(name.len() + 2 + parameters.len() * 8);
    key.push_str(name);
    key.push('(');
    for (i, parameter) in parameters.iter().enumerate() {
        if i > 0 {
            key.push_str(", ");
        }
        if parameter.vararg {
            key.push_str("vararg ");
        }
        let _ = write!(key, "{}", parameter.type_);
    }
    key.push(')');
    key
}

#[cfg(test)]
#[path = "../../tests/lowerings_tests.rs"]
mod tests;
