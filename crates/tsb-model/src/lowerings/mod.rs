//! Model-level lowerings.
//!
//! Each lowering is a total function `SourceSetModel -> SourceSetModel`.
//! They run after model introduction, in this order:
//!
//! | # | Lowering | Effect |
//! |---|----------|--------|
//! | 1 | `escape_identifiers` | back-quotes keywords and invalid names |
//! | 2 | `merge_modules` | same-named submodules across files become one |
//! | 3 | `merge_classes_and_interfaces` | class + interface of one name become a class |
//! | 4 | `merge_vars_and_interfaces` | `var V: I` folds `I` into `V`'s companion |
//! | 5 | `merge_nested_classes` | `Outer.Inner` moves into `Outer` |
//! | 6 | `lower_overrides` | members redeclaring an ancestor's member are marked `override` |
//! | 7 | `add_explicit_getters_and_setters` | nullable interface properties get accessors |
//!
//! The merges key on fully-qualified names: uids do not survive into the
//! Target Model, and declaration merging is a same-name phenomenon.

mod escape_identifiers;
mod explicit_accessors;
mod merge_classes;
mod merge_modules;
mod merge_nested;
mod merge_vars;
mod overrides;

pub use escape_identifiers::{escape_identifiers, escape_name, escape_segment};
pub use explicit_accessors::add_explicit_getters_and_setters;
pub use merge_classes::merge_classes_and_interfaces;
pub use merge_modules::merge_modules;
pub use merge_nested::merge_nested_classes;
pub use merge_vars::merge_vars_and_interfaces;
pub use overrides::lower_overrides;

use crate::model::{MemberModel, ModuleModel, TopLevelModel};
use tsb_common::NameEntity;

/// Fully-qualified name of `declaration` declared in `module`.
fn fq_name(module: &ModuleModel, declaration: &TopLevelModel) -> NameEntity {
    NameEntity::qualify(&module.name, declaration.name())
}

/// Append `incoming` to `members`. A member with the merge key of an
/// existing one replaces it in place.
fn merge_members(members: &mut Vec<MemberModel>, incoming: impl IntoIterator<Item = MemberModel>) {
    for member in incoming {
        let key = member.merge_key();
        match members.iter().position(|existing| existing.merge_key() == key) {
            Some(index) => members[index] = member,
            None => members.push(member),
        }
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, incoming: impl IntoIterator<Item = T>) {
    for item in incoming {
        if !items.contains(&item) {
            items.push(item);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/lowerings_tests.rs"]
mod tests;
