use crate::model::{SourceSetDeclaration, TopLevelDeclaration};
use crate::visitor::{DeclarationLowering, DeclarationScope, walk_top_level};
use tracing::debug;
use tsb_common::DiagnosticBag;

struct NonDeclarationFilter;

impl DeclarationLowering for NonDeclarationFilter {
    fn lower_top_level(
        &mut self,
        declaration: TopLevelDeclaration,
        scope: &DeclarationScope,
    ) -> Option<TopLevelDeclaration> {
        match declaration {
            TopLevelDeclaration::Statement(statement) => {
                debug!(module = %scope.module, text = %statement.text, "dropping non-declaration");
                None
            }
            declaration => Some(walk_top_level(self, declaration, scope)),
        }
    }
}

/// Remove every statement that does not declare anything.
pub fn filter_out_non_declarations(
    source_set: SourceSetDeclaration,
    _diagnostics: &mut DiagnosticBag,
) -> SourceSetDeclaration {
    NonDeclarationFilter.lower_source_set(source_set)
}
