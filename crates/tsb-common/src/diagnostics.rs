//! Recoverable concerns raised while lowering.
//!
//! No pass fails. When a pass meets something it cannot translate with
//! confidence it records a `Diagnostic`, substitutes a safe fallback
//! (usually the erased `dynamic` type or nothing at all) and keeps going.
//!
//! | Kind | Raised when | Recovery |
//! |------|-------------|----------|
//! | `UnresolvedReference` | a uid has no resolver entry and no library flag | erased type |
//! | `UnsupportedConstruct` | a declaration has no node mapping | declaration skipped |
//! | `UnprocessableType` | a pass meets a type variant it cannot lower | erased type with description |
//! | `StructuralInvariantViolation` | a tree shape that should not occur | safe fallback value |

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Category of a recoverable concern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    UnresolvedReference,
    UnsupportedConstruct,
    UnprocessableType,
    StructuralInvariantViolation,
}

impl DiagnosticKind {
    pub const fn code(self) -> u32 {
        match self {
            Self::UnresolvedReference => 1001,
            Self::UnsupportedConstruct => 1002,
            Self::UnprocessableType => 1003,
            Self::StructuralInvariantViolation => 1004,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnresolvedReference => "unresolved-reference",
            Self::UnsupportedConstruct => "unsupported-construct",
            Self::UnprocessableType => "unprocessable-type",
            Self::StructuralInvariantViolation => "structural-invariant-violation",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: u32,
    /// Pipeline stage that raised the concern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.code(),
            stage: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stage {
            Some(stage) => write!(f, "TSB{} [{}] {}: {}", self.code, self.kind, stage, self.message),
            None => write!(f, "TSB{} [{}] {}", self.code, self.kind, self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}

/// Format a message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Message templates for `format_message`.
pub mod messages {
    pub const UNRESOLVED_UID: &str = "reference '{0}' points at uid '{1}' which has no declaration";
    pub const UNSUPPORTED_MEMBER: &str = "{0} in '{1}' has no node mapping and was skipped";
    pub const UNSUPPORTED_DECLARATION: &str = "{0} has no node mapping and was skipped";
    pub const UNPROCESSABLE_TYPE: &str = "{0} cannot be lowered in {1}; erased to dynamic";
    pub const UNEXPECTED_SHAPE: &str = "unexpected {0} in {1}";
}

// =============================================================================
// DiagnosticBag
// =============================================================================

/// Ordered collection of concerns raised during one translation.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    stage: Option<&'static str>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every diagnostic pushed from now on with `stage`.
    pub fn enter_stage(&mut self, stage: &'static str) {
        self.stage = Some(stage);
    }

    pub fn leave_stage(&mut self) {
        self.stage = None;
    }

    pub const fn current_stage(&self) -> Option<&'static str> {
        self.stage
    }

    pub fn push(&mut self, mut diagnostic: Diagnostic) {
        if diagnostic.stage.is_none()
            && let Some(stage) = self.stage
        {
            diagnostic.stage = Some(stage.to_string());
        }
        self.diagnostics.push(diagnostic);
    }

    /// Record a concern and hand back the fallback the caller substitutes.
    pub fn raise_concern<T>(&mut self, kind: DiagnosticKind, message: impl Into<String>, fallback: T) -> T {
        let diagnostic = Diagnostic::new(kind, message);
        warn!(
            kind = %diagnostic.kind,
            stage = self.stage.unwrap_or("-"),
            "{}",
            diagnostic.message
        );
        self.push(diagnostic);
        fallback
    }

    pub fn extend(&mut self, other: DiagnosticBag) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
