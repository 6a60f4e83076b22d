use super::*;
use crate::tests::support::lex;

#[test]
fn test_cursor_navigation() {
    let tokens = lex("MOVE WS-A TO WS-B.");
    let mut cursor = Cursor::new(&tokens);

    assert!(cursor.check("move"));
    assert!(!cursor.is_at_end());

    cursor.advance();
    assert!(cursor.check_identifier());

    cursor.advance();
    assert!(cursor.check("TO"));

    cursor.advance_by(2);
    assert!(cursor.check_period());

    cursor.advance();
    assert!(cursor.is_at_end());
    assert!(cursor.is_at_stream_end());
}

#[test]
fn test_advance_stops_at_final_marker() {
    let tokens = lex("EXIT");
    let mut cursor = Cursor::new(&tokens);
    cursor.advance_by(5);
    assert!(cursor.is_at_end());
    assert_eq!(cursor.position(), 1);
}

#[test]
fn test_peek_past_end_yields_marker() {
    let tokens = lex("A B");
    let cursor = Cursor::new(&tokens);
    assert!(cursor.peek(1).is("B"));
    assert!(cursor.peek(2).is_end_of_unit());
    assert!(cursor.peek(50).is_end_of_unit());
    assert_eq!(cursor.position(), 0);
}

#[test]
fn test_expect_success() {
    let tokens = lex("END-READ");
    let mut cursor = Cursor::new(&tokens);
    let token = cursor.expect("end-read").unwrap();
    assert_eq!(token.text, "END-READ");
    assert!(cursor.is_at_end());
}

#[test]
fn test_expect_failure() {
    let tokens = lex("MOVE A");
    let mut cursor = Cursor::new(&tokens);
    let err = cursor.expect("ADD").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0010);
    assert_eq!(cursor.position(), 0);
}

#[test]
fn test_expect_at_end_is_fatal() {
    let tokens = lex("");
    let mut cursor = Cursor::new(&tokens);
    let err = cursor.expect(".").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0015);
    assert!(err.is_fatal());
}

#[test]
fn test_expect_opt() {
    let tokens = lex("IS NUMERIC");
    let mut cursor = Cursor::new(&tokens);
    assert!(cursor.expect_opt("NOT", false).unwrap().is_none());
    assert!(cursor.expect_opt("NOT", true).is_err());
    assert!(cursor.expect_opt("IS", true).unwrap().is_some());
    assert!(cursor.check("NUMERIC"));
}

#[test]
fn test_optional_is_silent() {
    let tokens = lex("AT END");
    let mut cursor = Cursor::new(&tokens);
    assert!(!cursor.optional("ON"));
    assert!(cursor.optional("AT"));
    assert!(cursor.check("END"));
}

#[test]
fn test_choice() {
    let tokens = lex("TRAILING SEPARATE");
    let mut cursor = Cursor::new(&tokens);
    let token = cursor.choice(&["LEADING", "TRAILING"]).unwrap();
    assert_eq!(token.text, "TRAILING");

    let err = cursor.choice(&["LEADING", "TRAILING"]).unwrap_err();
    assert!(err.message.contains("`LEADING`, `TRAILING`"));
}

#[test]
fn test_string_literal_is_not_keyword() {
    let tokens = lex("\"END\" END");
    let cursor = Cursor::new(&tokens);
    assert!(!cursor.check("END"));
    assert!(cursor.check_literal());
    assert!(cursor.check_at(1, "END"));
}

#[test]
fn test_kind_checks() {
    let tokens = lex("WS-X 42 SPACES");
    let mut cursor = Cursor::new(&tokens);
    assert!(cursor.check_kind(TokenMask::OPERAND));
    assert!(!cursor.check_literal());
    cursor.advance();
    assert!(cursor.check_kind(TokenMask::NUMERIC | TokenMask::FIGURATIVE));
    assert_eq!(cursor.check_level_number(), Some(42));
    cursor.advance();
    assert!(cursor.check_literal());
    assert_eq!(cursor.check_level_number(), None);
}

#[test]
fn test_level_number_shape() {
    let tokens = lex("01 5 123 1.5");
    let mut cursor = Cursor::new(&tokens);
    assert_eq!(cursor.check_level_number(), Some(1));
    cursor.advance();
    assert_eq!(cursor.check_level_number(), Some(5));
    cursor.advance();
    assert_eq!(cursor.check_level_number(), None);
    cursor.advance();
    assert_eq!(cursor.check_level_number(), None);
}

#[test]
fn test_expect_identifier_and_literal() {
    let tokens = lex("WS-NAME 'ABC' MOVE");
    let mut cursor = Cursor::new(&tokens);
    assert_eq!(cursor.expect_identifier().unwrap().text, "WS-NAME");
    assert_eq!(cursor.expect_literal().unwrap().text, "ABC");
    assert_eq!(cursor.expect_identifier().unwrap_err().code, ErrorCode::E0011);
    assert_eq!(cursor.expect_literal().unwrap_err().code, ErrorCode::E0012);
}

#[test]
fn test_previous_token() {
    let tokens = lex("A B");
    let mut cursor = Cursor::new(&tokens);
    assert!(cursor.previous().is_none());
    cursor.advance();
    assert!(cursor.previous().unwrap().is("A"));
}

#[test]
fn test_set_position_rewinds() {
    let tokens = lex("A B C");
    let mut cursor = Cursor::new(&tokens);
    cursor.advance_by(2);
    cursor.set_position(0);
    assert!(cursor.check("A"));
}
