use super::*;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("test error")
        .with_label(Span::new(0, 5), "here")
        .with_note("some context")
        .with_suggestion("try this");

    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.message, "test error");
    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 1);
    assert!(diag.labels[0].is_primary);
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn test_warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::W2001).with_message("not exported");
    assert!(!diag.is_error());
    assert_eq!(diag.severity, Severity::Warning);
}

#[test]
fn test_type_mismatch_helper() {
    let diag = type_mismatch(Span::new(10, 15), "int", "string", "in this binding");

    assert_eq!(diag.code, ErrorCode::E2001);
    assert!(diag.message.contains("int"));
    assert!(diag.message.contains("string"));
    assert_eq!(diag.primary_span(), Some(Span::new(10, 15)));
}

#[test]
fn test_unclosed_delimiter() {
    let diag = unclosed_delimiter(Span::new(0, 1), Span::new(10, 10), '{');

    assert_eq!(diag.code, ErrorCode::E1003);
    assert_eq!(diag.labels.len(), 2);
    assert!(diag.labels[0].is_primary);
    assert!(!diag.labels[1].is_primary);
    assert!(diag.labels[0].message.contains('}'));
}

#[test]
fn test_did_you_mean_only_when_candidate() {
    let with = unknown_identifier(Span::new(0, 4), "txet").with_did_you_mean(Some("text"));
    assert_eq!(with.suggestions, vec!["did you mean `text`?".to_string()]);

    let without = unknown_identifier(Span::new(0, 4), "zzz").with_did_you_mean(None);
    assert!(without.suggestions.is_empty());
}

#[test]
fn test_diagnostic_display() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("test error")
        .with_label(Span::new(0, 5), "here")
        .with_note("context");

    let output = diag.to_string();
    assert!(output.starts_with("error[E1001]: test error"));
    assert!(output.contains("--> 0..5: here"));
    assert!(output.contains("= note: context"));
}
