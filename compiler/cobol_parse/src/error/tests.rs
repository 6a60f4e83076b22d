use super::*;
use cobol_ir::TokenKind;
use pretty_assertions::assert_eq;

fn token(text: &str) -> Token {
    Token::new(text, TokenKind::Symbol, SourceLoc::new(0, 3, 30))
}

#[test]
fn test_to_diagnostic_with_context() {
    let err = ParseError::new(ErrorCode::E0320, "unbalanced parentheses", &token("("))
        .with_context(ErrorContext::Arithmetic);
    let diag = err.to_diagnostic();

    assert_eq!(diag.code, ErrorCode::E0320);
    assert_eq!(diag.labels[0].excerpt, "(");
    assert_eq!(diag.labels[0].message, "in this expression");
    assert_eq!(diag.notes, vec!["while parsing an arithmetic expression".to_string()]);
}

#[test]
fn test_first_context_wins() {
    let err = ParseError::new(ErrorCode::E0010, "unexpected", &token("X"))
        .with_context(ErrorContext::Clause)
        .with_context(ErrorContext::DataEntry);
    assert_eq!(err.context, Some(ErrorContext::Clause));
}

#[test]
fn test_unexpected_end_is_fatal() {
    let end = Token::end_of_unit(SourceLoc::new(0, 40, 1));
    let err = ParseError::unexpected_end("`.`", &end);
    assert!(err.is_fatal());
    assert_eq!(err.excerpt, "<end of unit>");
}

#[test]
fn test_warning_codes_convert_to_warnings() {
    let err = ParseError::new(ErrorCode::W0050, "unresolved", &token("X"));
    assert!(!err.to_diagnostic().is_error());
}
