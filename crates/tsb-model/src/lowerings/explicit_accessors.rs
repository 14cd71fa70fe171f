//! Interface properties of nullable type render explicit accessors, so
//! implementers are not forced to override them.

use crate::model::{MemberModel, SourceSetModel, TopLevelModel};
use crate::visitor::{ModelLowering, walk_member};
use tsb_common::DiagnosticBag;

struct ExplicitAccessors;

impl ModelLowering for ExplicitAccessors {
    fn lower_member(&mut self, member: MemberModel, owner: &TopLevelModel) -> MemberModel {
        match walk_member(self, member, owner) {
            MemberModel::Property(mut property)
                if matches!(owner, TopLevelModel::Interface(_)) && property.type_.is_nullable() =>
            {
                property.getter = true;
                property.setter = !property.immutable;
                MemberModel::Property(property)
            }
            member => member,
        }
    }
}

/// Give nullable interface properties an explicit getter, and a setter
/// unless immutable.
pub fn add_explicit_getters_and_setters(source_set: SourceSetModel, _diagnostics: &mut DiagnosticBag) -> SourceSetModel {
    ExplicitAccessors.lower_source_set(source_set)
}
