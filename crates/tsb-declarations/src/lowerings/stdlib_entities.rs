use crate::model::{HeritageClauseDeclaration, SourceSetDeclaration, TypeDeclaration};
use crate::visitor::{DeclarationLowering, DeclarationScope, walk_heritage, walk_type};
use tracing::trace;
use tsb_common::{DiagnosticBag, NameEntity, stdlib};

struct StdlibSubstitution;

impl StdlibSubstitution {
    fn substitute(name: NameEntity) -> NameEntity {
        match stdlib::source_substitution(&name) {
            Some(target) => {
                trace!(from = %name, to = target, "substituting std-lib entity");
                NameEntity::identifier(target)
            }
            None => name,
        }
    }
}

impl DeclarationLowering for StdlibSubstitution {
    fn lower_type(&mut self, ty: TypeDeclaration, scope: &DeclarationScope) -> TypeDeclaration {
        match walk_type(self, ty, scope) {
            TypeDeclaration::Reference(mut reference) if !scope.is_type_parameter(&reference.value) => {
                reference.value = Self::substitute(reference.value);
                TypeDeclaration::Reference(reference)
            }
            ty => ty,
        }
    }

    fn lower_heritage(
        &mut self,
        heritage: HeritageClauseDeclaration,
        scope: &DeclarationScope,
    ) -> HeritageClauseDeclaration {
        let mut heritage = walk_heritage(self, heritage, scope);
        heritage.name = Self::substitute(heritage.name);
        heritage
    }
}

/// Rewrite source standard-library names that have a direct target
/// counterpart (`ReadonlyArray` to `Array`, `Error` to `Throwable`, ...).
pub fn substitute_stdlib_entities(
    source_set: SourceSetDeclaration,
    _diagnostics: &mut DiagnosticBag,
) -> SourceSetDeclaration {
    StdlibSubstitution.lower_source_set(source_set)
}
