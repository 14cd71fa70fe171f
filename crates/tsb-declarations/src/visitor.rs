//! Consuming rewriter over the Declaration Model.
//!
//! A lowering implements `DeclarationLowering` and overrides only the hooks
//! it cares about. Every hook takes its subtree by value and returns the
//! rewritten subtree; the default implementation forwards to the matching
//! `walk_*` function, which rebuilds the node from its lowered children.
//! Overrides usually call the walker first and then rewrite the result:
//!
//! ```ignore
//! fn lower_type(&mut self, ty: TypeDeclaration, scope: &DeclarationScope) -> TypeDeclaration {
//!     match walk_type(self, ty, scope) {
//!         TypeDeclaration::Array(element) => TypeDeclaration::generic("Array", vec![*element]),
//!         other => other,
//!     }
//! }
//! ```

use crate::model::{
    ClassDeclaration, FunctionDeclaration, HeritageClauseDeclaration, InterfaceDeclaration,
    MemberDeclaration, ModuleDeclaration, ParameterDeclaration, SourceFileDeclaration,
    SourceSetDeclaration, TopLevelDeclaration, TypeAliasDeclaration, TypeDeclaration,
    TypeParameterDeclaration,
};
use tsb_common::NameEntity;

/// Lexical context handed to every hook.
#[derive(Clone, Debug)]
pub struct DeclarationScope {
    /// Fully-qualified name of the enclosing module.
    pub module: NameEntity,
    /// Type parameters visible at this point, outermost first.
    pub type_parameters: Vec<NameEntity>,
}

impl DeclarationScope {
    pub fn new(module: NameEntity) -> Self {
        Self {
            module,
            type_parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type_parameters(&self, type_parameters: &[TypeParameterDeclaration]) -> Self {
        let mut scope = self.clone();
        scope
            .type_parameters
            .extend(type_parameters.iter().map(|param| param.name.clone()));
        scope
    }

    pub fn is_type_parameter(&self, name: &NameEntity) -> bool {
        self.type_parameters.contains(name)
    }

    /// Scope of a module nested in this one.
    #[must_use]
    pub fn nested_module(&self, name: &NameEntity) -> Self {
        Self::new(NameEntity::qualify(&self.module, name))
    }
}

pub trait DeclarationLowering {
    fn lower_source_set(&mut self, source_set: SourceSetDeclaration) -> SourceSetDeclaration {
        walk_source_set(self, source_set)
    }

    fn lower_module(&mut self, module: ModuleDeclaration, scope: &DeclarationScope) -> ModuleDeclaration {
        walk_module(self, module, scope)
    }

    /// Returning `None` removes the declaration.
    fn lower_top_level(
        &mut self,
        declaration: TopLevelDeclaration,
        scope: &DeclarationScope,
    ) -> Option<TopLevelDeclaration> {
        Some(walk_top_level(self, declaration, scope))
    }

    fn lower_member(&mut self, member: MemberDeclaration, scope: &DeclarationScope) -> MemberDeclaration {
        walk_member(self, member, scope)
    }

    fn lower_heritage(
        &mut self,
        heritage: HeritageClauseDeclaration,
        scope: &DeclarationScope,
    ) -> HeritageClauseDeclaration {
        walk_heritage(self, heritage, scope)
    }

    fn lower_parameter(&mut self, parameter: ParameterDeclaration, scope: &DeclarationScope) -> ParameterDeclaration {
        walk_parameter(self, parameter, scope)
    }

    fn lower_type_parameter(
        &mut self,
        parameter: TypeParameterDeclaration,
        scope: &DeclarationScope,
    ) -> TypeParameterDeclaration {
        walk_type_parameter(self, parameter, scope)
    }

    fn lower_type(&mut self, ty: TypeDeclaration, scope: &DeclarationScope) -> TypeDeclaration {
        walk_type(self, ty, scope)
    }
}

// =============================================================================
// Walkers
// =============================================================================

pub fn walk_source_set<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    source_set: SourceSetDeclaration,
) -> SourceSetDeclaration {
    let sources = source_set
        .sources
        .into_iter()
        .map(|file| {
            let scope = DeclarationScope::new(file.root.name.clone());
            SourceFileDeclaration {
                root: lowering.lower_module(file.root, &scope),
                ..file
            }
        })
        .collect();
    SourceSetDeclaration {
        source_name: source_set.source_name,
        sources,
    }
}

pub fn walk_module<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    module: ModuleDeclaration,
    scope: &DeclarationScope,
) -> ModuleDeclaration {
    let declarations = module
        .declarations
        .into_iter()
        .filter_map(|declaration| lowering.lower_top_level(declaration, scope))
        .collect();
    ModuleDeclaration {
        declarations,
        ..module
    }
}

pub fn walk_top_level<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    declaration: TopLevelDeclaration,
    scope: &DeclarationScope,
) -> TopLevelDeclaration {
    match declaration {
        TopLevelDeclaration::Variable(mut variable) => {
            variable.type_ = lowering.lower_type(variable.type_, scope);
            TopLevelDeclaration::Variable(variable)
        }
        TopLevelDeclaration::Function(function) => {
            TopLevelDeclaration::Function(walk_function(lowering, function, scope))
        }
        TopLevelDeclaration::Class(class) => TopLevelDeclaration::Class(walk_class(lowering, class, scope)),
        TopLevelDeclaration::Interface(interface) => {
            TopLevelDeclaration::Interface(walk_interface(lowering, interface, scope))
        }
        TopLevelDeclaration::TypeAlias(alias) => {
            TopLevelDeclaration::TypeAlias(walk_type_alias(lowering, alias, scope))
        }
        TopLevelDeclaration::Module(module) => {
            let nested = scope.nested_module(&module.name);
            TopLevelDeclaration::Module(lowering.lower_module(module, &nested))
        }
        declaration @ (TopLevelDeclaration::Enum(_) | TopLevelDeclaration::Statement(_)) => declaration,
    }
}

fn walk_function<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    function: FunctionDeclaration,
    scope: &DeclarationScope,
) -> FunctionDeclaration {
    let scope = scope.with_type_parameters(&function.type_parameters);
    FunctionDeclaration {
        type_parameters: lower_type_parameters(lowering, function.type_parameters, &scope),
        parameters: lower_parameters(lowering, function.parameters, &scope),
        return_type: lowering.lower_type(function.return_type, &scope),
        ..function
    }
}

fn walk_class<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    class: ClassDeclaration,
    scope: &DeclarationScope,
) -> ClassDeclaration {
    let scope = scope.with_type_parameters(&class.type_parameters);
    ClassDeclaration {
        type_parameters: lower_type_parameters(lowering, class.type_parameters, &scope),
        parent_entities: class
            .parent_entities
            .into_iter()
            .map(|heritage| lowering.lower_heritage(heritage, &scope))
            .collect(),
        members: class
            .members
            .into_iter()
            .map(|member| lowering.lower_member(member, &scope))
            .collect(),
        ..class
    }
}

fn walk_interface<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    interface: InterfaceDeclaration,
    scope: &DeclarationScope,
) -> InterfaceDeclaration {
    let scope = scope.with_type_parameters(&interface.type_parameters);
    InterfaceDeclaration {
        type_parameters: lower_type_parameters(lowering, interface.type_parameters, &scope),
        parent_entities: interface
            .parent_entities
            .into_iter()
            .map(|heritage| lowering.lower_heritage(heritage, &scope))
            .collect(),
        members: interface
            .members
            .into_iter()
            .map(|member| lowering.lower_member(member, &scope))
            .collect(),
        ..interface
    }
}

fn walk_type_alias<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    alias: TypeAliasDeclaration,
    scope: &DeclarationScope,
) -> TypeAliasDeclaration {
    let scope = scope.with_type_parameters(&alias.type_parameters);
    TypeAliasDeclaration {
        type_parameters: lower_type_parameters(lowering, alias.type_parameters, &scope),
        type_reference: lowering.lower_type(alias.type_reference, &scope),
        ..alias
    }
}

pub fn walk_member<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    member: MemberDeclaration,
    scope: &DeclarationScope,
) -> MemberDeclaration {
    match member {
        MemberDeclaration::Property(mut property) => {
            let scope = scope.with_type_parameters(&property.type_parameters);
            property.type_ = lowering.lower_type(property.type_, &scope);
            MemberDeclaration::Property(property)
        }
        MemberDeclaration::Method(mut method) => {
            let scope = scope.with_type_parameters(&method.type_parameters);
            method.type_parameters = lower_type_parameters(lowering, method.type_parameters, &scope);
            method.parameters = lower_parameters(lowering, method.parameters, &scope);
            method.return_type = lowering.lower_type(method.return_type, &scope);
            MemberDeclaration::Method(method)
        }
        MemberDeclaration::CallSignature(mut signature) => {
            let scope = scope.with_type_parameters(&signature.type_parameters);
            signature.type_parameters = lower_type_parameters(lowering, signature.type_parameters, &scope);
            signature.parameters = lower_parameters(lowering, signature.parameters, &scope);
            signature.return_type = lowering.lower_type(signature.return_type, &scope);
            MemberDeclaration::CallSignature(signature)
        }
        MemberDeclaration::ConstructSignature(mut signature) => {
            let scope = scope.with_type_parameters(&signature.type_parameters);
            signature.parameters = lower_parameters(lowering, signature.parameters, &scope);
            signature.return_type = lowering.lower_type(signature.return_type, &scope);
            MemberDeclaration::ConstructSignature(signature)
        }
        MemberDeclaration::IndexSignature(mut signature) => {
            signature.parameters = lower_parameters(lowering, signature.parameters, scope);
            signature.return_type = lowering.lower_type(signature.return_type, scope);
            MemberDeclaration::IndexSignature(signature)
        }
        MemberDeclaration::Constructor(mut constructor) => {
            let scope = scope.with_type_parameters(&constructor.type_parameters);
            constructor.parameters = lower_parameters(lowering, constructor.parameters, &scope);
            MemberDeclaration::Constructor(constructor)
        }
    }
}

pub fn walk_heritage<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    heritage: HeritageClauseDeclaration,
    scope: &DeclarationScope,
) -> HeritageClauseDeclaration {
    HeritageClauseDeclaration {
        type_arguments: heritage
            .type_arguments
            .into_iter()
            .map(|argument| lowering.lower_type(argument, scope))
            .collect(),
        ..heritage
    }
}

pub fn walk_parameter<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    parameter: ParameterDeclaration,
    scope: &DeclarationScope,
) -> ParameterDeclaration {
    ParameterDeclaration {
        type_: lowering.lower_type(parameter.type_, scope),
        ..parameter
    }
}

pub fn walk_type_parameter<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    parameter: TypeParameterDeclaration,
    scope: &DeclarationScope,
) -> TypeParameterDeclaration {
    TypeParameterDeclaration {
        constraints: parameter
            .constraints
            .into_iter()
            .map(|constraint| lowering.lower_type(constraint, scope))
            .collect(),
        default_value: parameter
            .default_value
            .map(|default_value| lowering.lower_type(default_value, scope)),
        ..parameter
    }
}

pub fn walk_type<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    ty: TypeDeclaration,
    scope: &DeclarationScope,
) -> TypeDeclaration {
    match ty {
        TypeDeclaration::Reference(mut reference) => {
            reference.params = lower_types(lowering, reference.params, scope);
            TypeDeclaration::Reference(reference)
        }
        TypeDeclaration::Union(members) => TypeDeclaration::Union(lower_types(lowering, members, scope)),
        TypeDeclaration::Intersection(members) => {
            TypeDeclaration::Intersection(lower_types(lowering, members, scope))
        }
        TypeDeclaration::Tuple(members) => TypeDeclaration::Tuple(lower_types(lowering, members, scope)),
        TypeDeclaration::Function(mut function) => {
            function.parameters = lower_parameters(lowering, function.parameters, scope);
            function.return_type = Box::new(lowering.lower_type(*function.return_type, scope));
            TypeDeclaration::Function(function)
        }
        TypeDeclaration::Array(element) => TypeDeclaration::Array(Box::new(lowering.lower_type(*element, scope))),
        TypeDeclaration::ObjectLiteral(mut literal) => {
            literal.members = literal
                .members
                .into_iter()
                .map(|member| lowering.lower_member(member, scope))
                .collect();
            TypeDeclaration::ObjectLiteral(literal)
        }
        TypeDeclaration::GeneratedInterfaceReference(mut reference) => {
            reference.type_arguments = lower_types(lowering, reference.type_arguments, scope);
            TypeDeclaration::GeneratedInterfaceReference(reference)
        }
        ty @ (TypeDeclaration::StringLiteral(_)
        | TypeDeclaration::NumericLiteral(_)
        | TypeDeclaration::BooleanLiteral(_)
        | TypeDeclaration::This
        | TypeDeclaration::Unknown(_)) => ty,
    }
}

fn lower_types<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    types: Vec<TypeDeclaration>,
    scope: &DeclarationScope,
) -> Vec<TypeDeclaration> {
    types.into_iter().map(|ty| lowering.lower_type(ty, scope)).collect()
}

fn lower_parameters<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    parameters: Vec<ParameterDeclaration>,
    scope: &DeclarationScope,
) -> Vec<ParameterDeclaration> {
    parameters
        .into_iter()
        .map(|parameter| lowering.lower_parameter(parameter, scope))
        .collect()
}

fn lower_type_parameters<L: DeclarationLowering + ?Sized>(
    lowering: &mut L,
    parameters: Vec<TypeParameterDeclaration>,
    scope: &DeclarationScope,
) -> Vec<TypeParameterDeclaration> {
    parameters
        .into_iter()
        .map(|parameter| lowering.lower_type_parameter(parameter, scope))
        .collect()
}
