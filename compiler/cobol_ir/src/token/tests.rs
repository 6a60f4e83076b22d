use super::*;
use pretty_assertions::assert_eq;

fn tok(text: &str, kind: TokenKind) -> Token {
    Token::new(text, kind, SourceLoc::new(0, 1, 1))
}

#[test]
fn test_keyword_match_is_case_insensitive() {
    let t = tok("Picture", TokenKind::ReservedKeyword);
    assert!(t.is("PICTURE"));
    assert!(t.is("picture"));
    assert!(!t.is("PIC"));
}

#[test]
fn test_string_literal_never_matches_keyword() {
    let t = tok("END", TokenKind::String);
    assert!(!t.is("END"));

    let n = tok("END", TokenKind::National);
    assert!(!n.is("END"));

    let w = tok("END", TokenKind::ReservedKeyword);
    assert!(w.is("END"));
}

#[test]
fn test_kind_masks() {
    let num = tok("42", TokenKind::Numeric);
    assert!(num.is_kind(TokenMask::LITERAL));
    assert!(num.is_kind(TokenMask::OPERAND));
    assert!(!num.is_kind(TokenMask::STRING_LIKE));

    let zero = tok("ZERO", TokenKind::Figurative);
    assert!(zero.is_kind(TokenMask::LITERAL));

    let id = tok("WS-COUNT", TokenKind::Identifier);
    assert!(id.is_kind(TokenMask::OPERAND));
    assert!(!id.is_kind(TokenMask::LITERAL));
}

#[test]
fn test_every_kind_has_distinct_bit() {
    let mut seen = TokenMask::empty();
    for kind in TokenKind::ALL {
        assert!(!seen.intersects(kind.mask()), "{kind:?} shares a bit");
        seen |= kind.mask();
    }
    assert_eq!(seen.bits().count_ones() as usize, TokenKind::ALL.len());
}

#[test]
fn test_excerpt_restores_literal_delimiters() {
    assert_eq!(tok("AB", TokenKind::String).excerpt(), "\"AB\"");
    assert_eq!(tok("F1", TokenKind::HexString).excerpt(), "X\"F1\"");
    assert_eq!(tok("A", TokenKind::National).excerpt(), "N\"A\"");
    assert_eq!(tok("MOVE", TokenKind::ReservedKeyword).excerpt(), "MOVE");
}

#[test]
fn test_list_appends_end_marker() {
    let list = TokenList::from_vec(vec![
        tok("MOVE", TokenKind::ReservedKeyword),
        tok("A", TokenKind::Identifier),
    ]);
    assert_eq!(list.len(), 3);
    assert!(list.last().is_end_of_unit());
    assert_eq!(list.kinds()[1], TokenKind::Identifier);
    assert_eq!(list.unit_count(), 1);
}

#[test]
fn test_list_keeps_existing_end_marker() {
    let list = TokenList::from_vec(vec![
        tok("A", TokenKind::Identifier),
        Token::end_of_unit(SourceLoc::new(0, 1, 2)),
    ]);
    assert_eq!(list.len(), 2);
}

#[test]
fn test_empty_list_holds_marker() {
    let list = TokenList::new();
    assert_eq!(list.len(), 1);
    assert!(list[0].is_end_of_unit());
    assert!(!list.is_empty());
}
