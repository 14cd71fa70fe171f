use crate::model::{SourceSetDeclaration, TypeDeclaration};
use crate::visitor::{DeclarationLowering, DeclarationScope, walk_type};
use tsb_common::DiagnosticBag;

struct ArraySugar;

impl DeclarationLowering for ArraySugar {
    fn lower_type(&mut self, ty: TypeDeclaration, scope: &DeclarationScope) -> TypeDeclaration {
        match walk_type(self, ty, scope) {
            TypeDeclaration::Array(element) => TypeDeclaration::generic("Array", vec![*element]),
            ty => ty,
        }
    }
}

/// `T[]` becomes `Array<T>`.
pub fn desugar_array_declarations(
    source_set: SourceSetDeclaration,
    _diagnostics: &mut DiagnosticBag,
) -> SourceSetDeclaration {
    ArraySugar.lower_source_set(source_set)
}
