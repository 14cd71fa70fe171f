use super::*;

fn diagnostic(kind: DiagnosticKind, stage: &str, message: &str) -> Diagnostic {
    Diagnostic::new(kind, message).with_stage(stage)
}

#[test]
fn test_plain_diagnostic_line() {
    let reporter = Reporter::new(false);
    let line = reporter.format_diagnostic(&diagnostic(
        DiagnosticKind::UnresolvedReference,
        "introduce_models",
        "reference 'Ghost' points at uid 'set1-9' which has no declaration",
    ));
    assert_eq!(
        line,
        "TSB1001 [unresolved-reference] introduce_models: reference 'Ghost' points at uid 'set1-9' which has no declaration"
    );
}

#[test]
fn test_summary_counts_by_kind() {
    let reporter = Reporter::new(false);
    let diagnostics = vec![
        diagnostic(DiagnosticKind::UnprocessableType, "introduce_models", "a"),
        diagnostic(DiagnosticKind::UnresolvedReference, "introduce_models", "b"),
        diagnostic(DiagnosticKind::UnprocessableType, "lower_this_type", "c"),
    ];
    assert_eq!(
        reporter.summary(&diagnostics),
        "3 diagnostics (1 unresolved-reference, 2 unprocessable-type)"
    );
    assert_eq!(reporter.render(&diagnostics).lines().count(), 4);
}

#[test]
fn test_clean_summary() {
    let reporter = Reporter::new(false);
    assert_eq!(reporter.render(&[]), "translated without diagnostics");
}
