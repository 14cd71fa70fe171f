//! Textual forms of target types and statements.
//!
//! These are the forms the printer emits; tests and debug logging use them
//! too.

use crate::model::{
    CallModel, FunctionTypeModel, ParameterModel, StatementModel, TypeModel, TypeParameterReferenceModel,
    TypeValueModel,
};
use std::fmt;

fn write_metadata(f: &mut fmt::Formatter<'_>, metadata: Option<&str>) -> fmt::Result {
    match metadata {
        Some(metadata) => write!(f, " /* {metadata} */"),
        None => Ok(()),
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for TypeValueModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if !self.params.is_empty() {
            f.write_str("<")?;
            write_list(f, &self.params)?;
            f.write_str(">")?;
        }
        if self.nullable {
            f.write_str("?")?;
        }
        write_metadata(f, self.metadata.as_deref())
    }
}

impl fmt::Display for FunctionTypeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            f.write_str("(")?;
        }
        f.write_str("(")?;
        write_list(f, &self.parameters)?;
        write!(f, ") -> {}", self.type_)?;
        if self.nullable {
            f.write_str(")?")?;
        }
        write_metadata(f, self.metadata.as_deref())
    }
}

impl fmt::Display for TypeParameterReferenceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.nullable {
            f.write_str("?")?;
        }
        write_metadata(f, self.metadata.as_deref())
    }
}

impl fmt::Display for TypeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => value.fmt(f),
            Self::Function(function) => function.fmt(f),
            Self::TypeParameter(parameter) => parameter.fmt(f),
        }
    }
}

impl fmt::Display for ParameterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.vararg {
            f.write_str("vararg ")?;
        }
        write!(f, "{}: {}", self.name, self.type_)?;
        match &self.initializer {
            Some(initializer) => write!(f, " = {initializer}"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for CallModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if let Some(arguments) = &self.arguments {
            f.write_str("(")?;
            write_list(f, arguments)?;
            f.write_str(")")?;
        }
        write_metadata(f, self.meta.as_deref())
    }
}

impl fmt::Display for StatementModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call(call) => call.fmt(f),
            Self::Chain { left, right } => write!(f, "{left}.{right}"),
            Self::Return(value) => write!(f, "return {value}"),
            Self::Assignment { left, right } => write!(f, "{left} = {right}"),
        }
    }
}

#[cfg(test)]
#[path = "../tests/render_tests.rs"]
mod tests;
