use super::*;
use cobol_ir::TokenKind;
use pretty_assertions::assert_eq;

fn token(text: &str, line: u32) -> Token {
    Token::new(text, TokenKind::Identifier, SourceLoc::new(0, line, 8))
}

#[test]
fn test_builder_records_primary_then_secondary() {
    let mut queue = DiagnosticQueue::new();
    let guarantee = queue
        .begin(ErrorCode::E0035, "duplicate AT END phrase")
        .with_source(&token("END", 7), "repeated here")
        .with_source(&token("END", 5), "first given here")
        .with_note("each phrase may appear once per statement")
        .finish();

    assert!(guarantee.is_some());
    let diags = queue.flush();
    assert_eq!(diags.len(), 1);
    assert!(diags[0].labels[0].is_primary);
    assert!(!diags[0].labels[1].is_primary);
    assert_eq!(diags[0].notes.len(), 1);
}

#[test]
fn test_warnings_do_not_count_as_errors() {
    let mut queue = DiagnosticQueue::new();
    let guarantee = queue
        .begin(ErrorCode::W0050, "cannot resolve RENAMES operand")
        .finish();
    assert!(guarantee.is_none());
    assert_eq!(queue.error_count(), 0);
    assert_eq!(queue.len(), 1);
    assert!(queue.has_errors().is_none());
}

#[test]
fn test_no_deduplication() {
    let mut queue = DiagnosticQueue::new();
    for _ in 0..3 {
        let _ = queue
            .begin(ErrorCode::E0010, "unexpected token")
            .with_source(&token("X", 4), "here")
            .finish();
    }
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.error_count(), 3);
}

#[test]
fn test_muted_queue_drops_reports() {
    let mut queue = DiagnosticQueue::new();
    assert!(!queue.set_muted(true));
    assert!(queue.begin(ErrorCode::E0030, "duplicate").finish().is_none());
    assert!(queue.is_empty());
    assert_eq!(queue.error_count(), 0);

    assert!(queue.set_muted(false));
    let _ = queue.begin(ErrorCode::E0030, "duplicate").finish();
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_error_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::with_error_limit(2));
    let _ = queue.begin(ErrorCode::E0010, "one").finish();
    assert!(!queue.limit_reached());
    let _ = queue.begin(ErrorCode::E0010, "two").finish();
    assert!(queue.limit_reached());
}

#[test]
fn test_unlimited_by_default() {
    let mut queue = DiagnosticQueue::new();
    for _ in 0..100 {
        let _ = queue.begin(ErrorCode::E0010, "again").finish();
    }
    assert!(!queue.limit_reached());
    assert_eq!(DiagnosticConfig::unlimited(), DiagnosticConfig::default());
}

#[test]
fn test_flush_keeps_emission_order() {
    let mut queue = DiagnosticQueue::new();
    let _ = queue
        .begin(ErrorCode::E0040, "later line first")
        .with_source(&token("B", 20), "here")
        .finish();
    let _ = queue
        .begin(ErrorCode::E0041, "earlier line second")
        .with_source(&token("A", 3), "here")
        .finish();

    let codes: Vec<ErrorCode> = queue.flush().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E0040, ErrorCode::E0041]);
    assert_eq!(queue.error_count(), 0);
}
