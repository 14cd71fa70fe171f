use crate::model::{
    ModuleDeclaration, SourceSetDeclaration, TopLevelDeclaration, TypeDeclaration, TypeParameterDeclaration,
};
use crate::visitor::{DeclarationLowering, DeclarationScope, walk_type, walk_type_parameter};
use rustc_hash::FxHashMap;
use tracing::trace;
use tsb_common::{DiagnosticBag, NameEntity};

/// Type parameter lists of every generic declaration that declares at
/// least one default, keyed by fully-qualified name.
#[derive(Default)]
struct DefaultedGenerics {
    parameters: FxHashMap<NameEntity, Vec<TypeParameterDeclaration>>,
}

impl DefaultedGenerics {
    fn collect(source_set: &SourceSetDeclaration) -> Self {
        let mut generics = Self::default();
        for file in &source_set.sources {
            generics.collect_module(&file.root, &file.root.name);
        }
        generics
    }

    fn collect_module(&mut self, module: &ModuleDeclaration, module_name: &NameEntity) {
        for declaration in &module.declarations {
            let (name, parameters) = match declaration {
                TopLevelDeclaration::Class(class) => (&class.name, &class.type_parameters),
                TopLevelDeclaration::Interface(interface) => (&interface.name, &interface.type_parameters),
                TopLevelDeclaration::TypeAlias(alias) => (&alias.name, &alias.type_parameters),
                TopLevelDeclaration::Module(nested) => {
                    self.collect_module(nested, &NameEntity::qualify(module_name, &nested.name));
                    continue;
                }
                _ => continue,
            };
            if parameters.iter().any(|parameter| parameter.default_value.is_some()) {
                self.parameters
                    .insert(NameEntity::qualify(module_name, name), parameters.clone());
            }
        }
    }

    fn lookup(&self, scope: &DeclarationScope, name: &NameEntity) -> Option<&[TypeParameterDeclaration]> {
        let mut package = Some(scope.module.clone());
        while let Some(current) = package {
            if let Some(parameters) = self.parameters.get(&NameEntity::qualify(&current, name)) {
                return Some(parameters);
            }
            package = current.parent();
        }
        self.parameters.get(name).map(Vec::as_slice)
    }
}

impl DeclarationLowering for DefaultedGenerics {
    fn lower_type(&mut self, ty: TypeDeclaration, scope: &DeclarationScope) -> TypeDeclaration {
        match walk_type(self, ty, scope) {
            TypeDeclaration::Reference(mut reference) if !scope.is_type_parameter(&reference.value) => {
                if let Some(parameters) = self.lookup(scope, &reference.value) {
                    let supplied = reference.params.len();
                    let defaults: Vec<_> = parameters
                        .iter()
                        .skip(supplied)
                        .map_while(|parameter| parameter.default_value.clone())
                        .collect();
                    if !defaults.is_empty() {
                        trace!(reference = %reference.value, count = defaults.len(), "filling default type arguments");
                        reference.params.extend(defaults);
                    }
                }
                TypeDeclaration::Reference(reference)
            }
            ty => ty,
        }
    }

    fn lower_type_parameter(
        &mut self,
        parameter: TypeParameterDeclaration,
        scope: &DeclarationScope,
    ) -> TypeParameterDeclaration {
        TypeParameterDeclaration {
            default_value: None,
            ..walk_type_parameter(self, parameter, scope)
        }
    }
}

/// Supply omitted trailing type arguments from the declared defaults, then
/// drop the defaults: the target has no default type parameters.
pub fn resolve_default_type_params(
    source_set: SourceSetDeclaration,
    _diagnostics: &mut DiagnosticBag,
) -> SourceSetDeclaration {
    let mut lowering = DefaultedGenerics::collect(&source_set);
    lowering.lower_source_set(source_set)
}
