//! Consuming rewriter over the Target Model.
//!
//! Same shape as the node visitor: hooks take their subtree by value and
//! default to a `walk_*` function rebuilding it from lowered children.

use crate::model::{
    ConstructorModel, FunctionTypeModel, HeritageModel, MemberModel, ModuleModel,
    ObjectModel, ParameterModel, SourceFileModel, SourceSetModel, StatementModel, TopLevelModel,
    TypeModel, TypeParameterModel,
};

pub trait ModelLowering {
    fn lower_source_set(&mut self, source_set: SourceSetModel) -> SourceSetModel {
        walk_source_set(self, source_set)
    }

    fn lower_module(&mut self, module: ModuleModel) -> ModuleModel {
        walk_module(self, module)
    }

    fn lower_top_level(&mut self, declaration: TopLevelModel) -> TopLevelModel {
        walk_top_level(self, declaration)
    }

    fn lower_member(&mut self, member: MemberModel, owner: &TopLevelModel) -> MemberModel {
        walk_member(self, member, owner)
    }

    fn lower_heritage(&mut self, heritage: HeritageModel) -> HeritageModel {
        walk_heritage(self, heritage)
    }

    fn lower_type_parameter(&mut self, parameter: TypeParameterModel) -> TypeParameterModel {
        walk_type_parameter(self, parameter)
    }

    fn lower_parameter(&mut self, parameter: ParameterModel) -> ParameterModel {
        walk_parameter(self, parameter)
    }

    fn lower_type(&mut self, ty: TypeModel) -> TypeModel {
        walk_type(self, ty)
    }

    fn lower_statement(&mut self, statement: StatementModel) -> StatementModel {
        statement
    }
}

pub fn walk_source_set<L: ModelLowering + ?Sized>(lowering: &mut L, source_set: SourceSetModel) -> SourceSetModel {
    SourceSetModel {
        source_name: source_set.source_name,
        sources: source_set
            .sources
            .into_iter()
            .map(|file| SourceFileModel {
                root: lowering.lower_module(file.root),
                ..file
            })
            .collect(),
    }
}

pub fn walk_module<L: ModelLowering + ?Sized>(lowering: &mut L, module: ModuleModel) -> ModuleModel {
    ModuleModel {
        declarations: module
            .declarations
            .into_iter()
            .map(|declaration| lowering.lower_top_level(declaration))
            .collect(),
        submodules: module
            .submodules
            .into_iter()
            .map(|submodule| lowering.lower_module(submodule))
            .collect(),
        ..module
    }
}

/// Members are lowered against a shell of their owner: the owner as it was
/// before any of its members changed.
pub fn walk_top_level<L: ModelLowering + ?Sized>(lowering: &mut L, declaration: TopLevelModel) -> TopLevelModel {
    match declaration {
        TopLevelModel::Class(mut class) => {
            let owner = TopLevelModel::Class(class.clone());
            class.members = lower_members(lowering, class.members, &owner);
            class.companion_object = class.companion_object.map(|object| lower_object(lowering, object));
            class.primary_constructor = class
                .primary_constructor
                .map(|constructor| lower_constructor(lowering, constructor));
            class.type_parameters = lower_type_parameters(lowering, class.type_parameters);
            class.parent_entities = lower_heritages(lowering, class.parent_entities);
            TopLevelModel::Class(class)
        }
        TopLevelModel::Interface(mut interface) => {
            let owner = TopLevelModel::Interface(interface.clone());
            interface.members = lower_members(lowering, interface.members, &owner);
            interface.companion_object = interface.companion_object.map(|object| lower_object(lowering, object));
            interface.type_parameters = lower_type_parameters(lowering, interface.type_parameters);
            interface.parent_entities = lower_heritages(lowering, interface.parent_entities);
            TopLevelModel::Interface(interface)
        }
        TopLevelModel::Object(object) => TopLevelModel::Object(lower_object(lowering, object)),
        TopLevelModel::Function(mut function) => {
            function.parameters = lower_parameters(lowering, function.parameters);
            function.type_ = lowering.lower_type(function.type_);
            function.type_parameters = lower_type_parameters(lowering, function.type_parameters);
            function.body = function
                .body
                .into_iter()
                .map(|statement| lowering.lower_statement(statement))
                .collect();
            TopLevelModel::Function(function)
        }
        TopLevelModel::Variable(mut variable) => {
            variable.type_ = lowering.lower_type(variable.type_);
            TopLevelModel::Variable(variable)
        }
        TopLevelModel::TypeAlias(mut alias) => {
            alias.type_reference = lowering.lower_type(alias.type_reference);
            alias.type_parameters = lower_type_parameters(lowering, alias.type_parameters);
            TopLevelModel::TypeAlias(alias)
        }
        declaration @ TopLevelModel::Enum(_) => declaration,
    }
}

pub fn walk_member<L: ModelLowering + ?Sized>(lowering: &mut L, member: MemberModel, _owner: &TopLevelModel) -> MemberModel {
    match member {
        MemberModel::Method(mut method) => {
            method.parameters = lower_parameters(lowering, method.parameters);
            method.type_ = lowering.lower_type(method.type_);
            method.type_parameters = lower_type_parameters(lowering, method.type_parameters);
            MemberModel::Method(method)
        }
        MemberModel::Property(mut property) => {
            property.type_ = lowering.lower_type(property.type_);
            property.type_parameters = lower_type_parameters(lowering, property.type_parameters);
            MemberModel::Property(property)
        }
        MemberModel::Constructor(constructor) => MemberModel::Constructor(lower_constructor(lowering, constructor)),
        MemberModel::Nested(declaration) => MemberModel::Nested(lowering.lower_top_level(declaration)),
    }
}

pub fn walk_heritage<L: ModelLowering + ?Sized>(lowering: &mut L, heritage: HeritageModel) -> HeritageModel {
    HeritageModel {
        type_params: lower_types(lowering, heritage.type_params),
        ..heritage
    }
}

pub fn walk_type_parameter<L: ModelLowering + ?Sized>(
    lowering: &mut L,
    parameter: TypeParameterModel,
) -> TypeParameterModel {
    TypeParameterModel {
        constraints: lower_types(lowering, parameter.constraints),
        ..parameter
    }
}

pub fn walk_parameter<L: ModelLowering + ?Sized>(lowering: &mut L, parameter: ParameterModel) -> ParameterModel {
    ParameterModel {
        type_: lowering.lower_type(parameter.type_),
        initializer: parameter
            .initializer
            .map(|initializer| lowering.lower_statement(initializer)),
        ..parameter
    }
}

pub fn walk_type<L: ModelLowering + ?Sized>(lowering: &mut L, ty: TypeModel) -> TypeModel {
    match ty {
        TypeModel::Value(mut value) => {
            value.params = lower_types(lowering, value.params);
            TypeModel::Value(value)
        }
        TypeModel::Function(function) => TypeModel::Function(FunctionTypeModel {
            parameters: lower_parameters(lowering, function.parameters),
            type_: Box::new(lowering.lower_type(*function.type_)),
            ..function
        }),
        ty @ TypeModel::TypeParameter(_) => ty,
    }
}

fn lower_object<L: ModelLowering + ?Sized>(lowering: &mut L, mut object: ObjectModel) -> ObjectModel {
    let owner = TopLevelModel::Object(object.clone());
    object.members = lower_members(lowering, object.members, &owner);
    object.parent_entities = lower_heritages(lowering, object.parent_entities);
    object
}

fn lower_members<L: ModelLowering + ?Sized>(
    lowering: &mut L,
    members: Vec<MemberModel>,
    owner: &TopLevelModel,
) -> Vec<MemberModel> {
    members
        .into_iter()
        .map(|member| lowering.lower_member(member, owner))
        .collect()
}

fn lower_constructor<L: ModelLowering + ?Sized>(lowering: &mut L, constructor: ConstructorModel) -> ConstructorModel {
    ConstructorModel {
        parameters: lower_parameters(lowering, constructor.parameters),
        type_parameters: lower_type_parameters(lowering, constructor.type_parameters),
        ..constructor
    }
}

fn lower_types<L: ModelLowering + ?Sized>(lowering: &mut L, types: Vec<TypeModel>) -> Vec<TypeModel> {
    types.into_iter().map(|ty| lowering.lower_type(ty)).collect()
}

fn lower_parameters<L: ModelLowering + ?Sized>(lowering: &mut L, parameters: Vec<ParameterModel>) -> Vec<ParameterModel> {
    parameters
        .into_iter()
        .map(|parameter| lowering.lower_parameter(parameter))
        .collect()
}

fn lower_heritages<L: ModelLowering + ?Sized>(lowering: &mut L, heritages: Vec<HeritageModel>) -> Vec<HeritageModel> {
    heritages
        .into_iter()
        .map(|heritage| lowering.lower_heritage(heritage))
        .collect()
}

fn lower_type_parameters<L: ModelLowering + ?Sized>(
    lowering: &mut L,
    parameters: Vec<TypeParameterModel>,
) -> Vec<TypeParameterModel> {
    parameters
        .into_iter()
        .map(|parameter| lowering.lower_type_parameter(parameter))
        .collect()
}
