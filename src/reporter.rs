use colored::Colorize;
use tsb_common::{Diagnostic, DiagnosticKind};

const KINDS: [DiagnosticKind; 4] = [
    DiagnosticKind::UnresolvedReference,
    DiagnosticKind::UnsupportedConstruct,
    DiagnosticKind::UnprocessableType,
    DiagnosticKind::StructuralInvariantViolation,
];

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.format_diagnostic(diagnostic));
            out.push('\n');
        }
        out.push_str(&self.summary(diagnostics));
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let code = format!("TSB{}", diagnostic.code);
        let kind = diagnostic.kind.as_str();
        let stage = diagnostic.stage.as_deref().unwrap_or("-");
        if self.color {
            format!(
                "{} {} {}: {}",
                code.yellow().bold(),
                format!("[{kind}]").yellow(),
                stage.dimmed(),
                diagnostic.message
            )
        } else {
            format!("{code} [{kind}] {stage}: {}", diagnostic.message)
        }
    }

    /// One line: total count, then per-kind counts.
    pub fn summary(&self, diagnostics: &[Diagnostic]) -> String {
        if diagnostics.is_empty() {
            let line = "translated without diagnostics";
            return if self.color { line.green().to_string() } else { line.to_string() };
        }
        let counts: Vec<String> = KINDS
            .iter()
            .filter_map(|kind| {
                let count = diagnostics.iter().filter(|diagnostic| diagnostic.kind == *kind).count();
                (count > 0).then(|| format!("{count} {kind}"))
            })
            .collect();
        let noun = if diagnostics.len() == 1 { "diagnostic" } else { "diagnostics" };
        let head = format!("{} {noun}", diagnostics.len());
        let head = if self.color { head.yellow().bold().to_string() } else { head };
        format!("{head} ({})", counts.join(", "))
    }
}

#[cfg(test)]
#[path = "../tests/reporter_tests.rs"]
mod tests;
