//! Back-quoting of names the target language cannot spell bare.
//!
//! A segment is escaped when it is a hard keyword or does not match
//! `[A-Za-z_][A-Za-z0-9_]*`. Package sentinels and already quoted segments
//! pass through. Statement bodies are never touched: they are rendered
//! verbatim and may legitimately contain `this`.

use crate::model::{
    ClassLikeReferenceModel, HeritageModel, MemberModel, ModuleModel, ParameterModel, SourceSetModel,
    TopLevelModel, TypeModel, TypeParameterModel,
};
use crate::visitor::{
    ModelLowering, walk_heritage, walk_member, walk_module, walk_parameter, walk_top_level, walk_type,
    walk_type_parameter,
};
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use std::borrow::Cow;
use tracing::trace;
use tsb_common::{DiagnosticBag, LIBRARY_ROOT, NameEntity, ROOT_PACKAGE};

static HARD_KEYWORDS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in", "interface", "is",
        "null", "object", "package", "return", "super", "this", "throw", "true", "try", "typealias", "typeof",
        "val", "var", "when", "while",
    ]
    .into_iter()
    .collect()
});

fn is_plain_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// `segment`, back-quoted when the target cannot spell it bare.
pub fn escape_segment(segment: &str) -> Cow<'_, str> {
    let passes = segment.is_empty()
        || segment == ROOT_PACKAGE
        || segment == LIBRARY_ROOT
        || (segment.len() > 1 && segment.starts_with('`') && segment.ends_with('`'));
    if passes || (is_plain_identifier(segment) && !HARD_KEYWORDS.contains(segment)) {
        Cow::Borrowed(segment)
    } else {
        trace!(segment, "escaping identifier");
        Cow::Owned(format!("`{segment}`"))
    }
}

pub fn escape_name(name: &NameEntity) -> NameEntity {
    let segments = name.segments();
    if segments.iter().all(|segment| matches!(escape_segment(segment), Cow::Borrowed(_))) {
        return name.clone();
    }
    NameEntity::from_segments(segments.iter().map(|segment| escape_segment(segment).into_owned()))
        .unwrap_or_else(|| name.clone())
}

fn escape_string(name: String) -> String {
    match escape_segment(&name) {
        Cow::Borrowed(_) => name,
        Cow::Owned(escaped) => escaped,
    }
}

fn escape_extend(extend: Option<ClassLikeReferenceModel>) -> Option<ClassLikeReferenceModel> {
    extend.map(|extend| ClassLikeReferenceModel {
        name: escape_name(&extend.name),
        type_parameters: extend.type_parameters.iter().map(escape_name).collect(),
    })
}

struct EscapeIdentifiers;

impl ModelLowering for EscapeIdentifiers {
    fn lower_module(&mut self, module: ModuleModel) -> ModuleModel {
        let mut module = walk_module(self, module);
        module.name = escape_name(&module.name);
        module.short_name = escape_string(module.short_name);
        module
    }

    fn lower_top_level(&mut self, declaration: TopLevelModel) -> TopLevelModel {
        match walk_top_level(self, declaration) {
            TopLevelModel::Class(mut class) => {
                class.name = escape_name(&class.name);
                TopLevelModel::Class(class)
            }
            TopLevelModel::Interface(mut interface) => {
                interface.name = escape_name(&interface.name);
                TopLevelModel::Interface(interface)
            }
            TopLevelModel::Enum(mut enumeration) => {
                enumeration.name = escape_name(&enumeration.name);
                for token in &mut enumeration.values {
                    token.value = escape_string(std::mem::take(&mut token.value));
                }
                TopLevelModel::Enum(enumeration)
            }
            TopLevelModel::Function(mut function) => {
                function.name = escape_name(&function.name);
                function.extend = escape_extend(function.extend);
                TopLevelModel::Function(function)
            }
            TopLevelModel::Variable(mut variable) => {
                variable.name = escape_name(&variable.name);
                variable.extend = escape_extend(variable.extend);
                TopLevelModel::Variable(variable)
            }
            TopLevelModel::Object(mut object) => {
                object.name = escape_name(&object.name);
                TopLevelModel::Object(object)
            }
            TopLevelModel::TypeAlias(mut alias) => {
                alias.name = escape_name(&alias.name);
                TopLevelModel::TypeAlias(alias)
            }
        }
    }

    fn lower_member(&mut self, member: MemberModel, owner: &TopLevelModel) -> MemberModel {
        match walk_member(self, member, owner) {
            MemberModel::Method(mut method) => {
                method.name = escape_string(method.name);
                method.override_ = method.override_.as_ref().map(escape_name);
                MemberModel::Method(method)
            }
            MemberModel::Property(mut property) => {
                property.name = escape_string(property.name);
                property.override_ = property.override_.as_ref().map(escape_name);
                MemberModel::Property(property)
            }
            member => member,
        }
    }

    fn lower_heritage(&mut self, heritage: HeritageModel) -> HeritageModel {
        let mut heritage = walk_heritage(self, heritage);
        heritage.value.value = escape_name(&heritage.value.value);
        heritage.value.fq_name = heritage.value.fq_name.as_ref().map(escape_name);
        heritage
    }

    fn lower_type_parameter(&mut self, parameter: TypeParameterModel) -> TypeParameterModel {
        let mut parameter = walk_type_parameter(self, parameter);
        parameter.name = escape_name(&parameter.name);
        parameter
    }

    fn lower_parameter(&mut self, parameter: ParameterModel) -> ParameterModel {
        let mut parameter = walk_parameter(self, parameter);
        parameter.name = escape_string(parameter.name);
        parameter
    }

    fn lower_type(&mut self, ty: TypeModel) -> TypeModel {
        match walk_type(self, ty) {
            TypeModel::Value(mut value) => {
                value.value = escape_name(&value.value);
                value.fq_name = value.fq_name.as_ref().map(escape_name);
                TypeModel::Value(value)
            }
            TypeModel::TypeParameter(mut parameter) => {
                parameter.name = escape_name(&parameter.name);
                TypeModel::TypeParameter(parameter)
            }
            ty @ TypeModel::Function(_) => ty,
        }
    }
}

/// Back-quote keywords and invalid identifiers in every name of the set.
pub fn escape_identifiers(source_set: SourceSetModel, _diagnostics: &mut DiagnosticBag) -> SourceSetModel {
    EscapeIdentifiers.lower_source_set(source_set)
}
