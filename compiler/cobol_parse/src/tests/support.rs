//! Test-only word splitter.
//!
//! Turns short COBOL snippets into token lists so parser tests read like
//! source. It is not a lexer: no fixed-form columns, no continuation
//! lines, no `COPY`. The word `@EOU` stands for an end-of-unit marker.

use cobol_ir::{keywords, SourceLoc, Statement, Token, TokenKind, TokenList};

use crate::{parse, ParseOptions, ParseOutput};

/// Split `source` into tokens.
pub(crate) fn lex(source: &str) -> TokenList {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens: Vec<Token> = Vec::new();
    let mut i = 0;
    let mut line = 1u32;
    let mut col = 1u32;

    while i < chars.len() {
        let c = chars[i];
        let loc = SourceLoc::new(0, line, col);
        let start = i;

        if c == '\n' {
            line += 1;
            col = 1;
            i += 1;
            continue;
        }
        if c.is_whitespace() || c == ',' || c == ';' {
            i += 1;
            col += 1;
            continue;
        }

        if expects_picture(&tokens) {
            while i < chars.len() && !chars[i].is_whitespace() {
                i += 1;
            }
            let mut text: String = chars[start..i].iter().collect();
            let had_period = text.len() > 1 && text.ends_with('.');
            if had_period {
                text.pop();
            }
            tokens.push(Token::new(text, TokenKind::Identifier, loc));
            col += width(start, i);
            if had_period {
                tokens.push(Token::new(".", TokenKind::Symbol, SourceLoc::new(0, line, col - 1)));
            }
            continue;
        }

        if let Some((kind, prefix)) = literal_prefix(&chars, i) {
            let (text, end) = read_quoted(&chars, i + prefix);
            tokens.push(Token::new(text, kind, loc));
            i = end;
            col += width(start, i);
            continue;
        }

        if c == '"' || c == '\'' {
            let (text, end) = read_quoted(&chars, i);
            tokens.push(Token::new(text, TokenKind::String, loc));
            i = end;
            col += width(start, i);
            continue;
        }

        let next = chars.get(i + 1).copied();
        if (c == '+' || c == '-')
            && next.is_some_and(|n| n.is_ascii_digit())
            && !follows_operand(&tokens)
        {
            i += 1;
            while i < chars.len() && is_number_char(&chars, i) {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token::new(text, TokenKind::Numeric, loc));
            col += width(start, i);
            continue;
        }

        if c.is_ascii_alphanumeric() || c == '@' {
            i += 1;
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric()
                    || chars[i] == '-'
                    || chars[i] == '_'
                    || (chars[i] == '.' && is_number_char(&chars, i)))
            {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(classify(text, loc));
            col += width(start, i);
            continue;
        }

        let two: String = chars[i..(i + 2).min(chars.len())].iter().collect();
        let symbol = if matches!(two.as_str(), "**" | ">=" | "<=" | "<>") {
            two
        } else {
            c.to_string()
        };
        i += symbol.chars().count();
        tokens.push(Token::new(symbol, TokenKind::Symbol, loc));
        col += width(start, i);
    }

    TokenList::from_vec(tokens)
}

/// Parse a snippet with default options.
pub(crate) fn parse_source(source: &str) -> ParseOutput {
    parse(&lex(source), &ParseOptions::default())
}

/// Wrap WORKING-STORAGE entries in a minimal program.
pub(crate) fn working_storage(entries: &str) -> String {
    format!(
        "IDENTIFICATION DIVISION. PROGRAM-ID. TESTPROG.\n\
         DATA DIVISION.\nWORKING-STORAGE SECTION.\n{entries}\n"
    )
}

/// Wrap sentences in a minimal program with an empty DATA DIVISION.
pub(crate) fn procedure(sentences: &str) -> String {
    format!(
        "IDENTIFICATION DIVISION. PROGRAM-ID. TESTPROG.\n\
         PROCEDURE DIVISION.\n{sentences}\n"
    )
}

/// Statements of the first unit's PROCEDURE DIVISION, paragraphs flattened.
pub(crate) fn statements(output: &ParseOutput) -> Vec<Statement> {
    output
        .units
        .first()
        .and_then(|unit| unit.procedure.as_ref())
        .map(|body| body.all_statements().cloned().collect())
        .unwrap_or_default()
}

fn width(start: usize, end: usize) -> u32 {
    u32::try_from(end - start).unwrap_or(u32::MAX)
}

fn expects_picture(tokens: &[Token]) -> bool {
    let is_pic = |t: &Token| t.is("PIC") || t.is("PICTURE");
    match tokens {
        [.., last] if is_pic(last) => true,
        [.., before, last] => last.is("IS") && is_pic(before),
        _ => false,
    }
}

fn follows_operand(tokens: &[Token]) -> bool {
    tokens.last().is_some_and(|t| {
        matches!(
            t.kind,
            TokenKind::Identifier | TokenKind::Numeric | TokenKind::Figurative
        ) || t.text == ")"
    })
}

/// A digit, or a decimal point between digits.
fn is_number_char(chars: &[char], i: usize) -> bool {
    let c = chars[i];
    c.is_ascii_digit()
        || (c == '.'
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(char::is_ascii_digit))
}

fn literal_prefix(chars: &[char], i: usize) -> Option<(TokenKind, usize)> {
    let upper = |k: usize| chars.get(i + k).map(char::to_ascii_uppercase);
    let quote = |k: usize| matches!(chars.get(i + k), Some('"' | '\''));
    match (upper(0), upper(1)) {
        (Some('N'), Some('X')) if quote(2) => Some((TokenKind::HexNational, 2)),
        (Some('B'), Some('X')) if quote(2) => Some((TokenKind::HexBoolean, 2)),
        (Some('X'), _) if quote(1) => Some((TokenKind::HexString, 1)),
        (Some('N'), _) if quote(1) => Some((TokenKind::National, 1)),
        (Some('B'), _) if quote(1) => Some((TokenKind::Boolean, 1)),
        _ => None,
    }
}

/// Read a quoted literal starting at its opening quote. Returns the content
/// and the index after the closing quote.
fn read_quoted(chars: &[char], open: usize) -> (String, usize) {
    let quote = chars[open];
    let mut i = open + 1;
    let mut text = String::new();
    while i < chars.len() && chars[i] != quote {
        text.push(chars[i]);
        i += 1;
    }
    (text, (i + 1).min(chars.len()))
}

fn classify(text: String, loc: SourceLoc) -> Token {
    if text == "@EOU" {
        return Token::end_of_unit(loc);
    }
    let kind = if text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        TokenKind::Numeric
    } else if keywords::is_figurative(&text) {
        TokenKind::Figurative
    } else if keywords::is_reserved(&text) {
        TokenKind::ReservedKeyword
    } else {
        TokenKind::Identifier
    };
    Token::new(text, kind, loc)
}

#[test]
fn test_splitter_basics() {
    let tokens = lex("05 WS-A PIC X(3).\n  MOVE \"END\" TO WS-A.");
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["05", "WS-A", "PIC", "X(3)", ".", "MOVE", "END", "TO", "WS-A", ".", ""]
    );
    assert_eq!(tokens[0].kind, TokenKind::Numeric);
    assert_eq!(tokens[2].kind, TokenKind::ReservedKeyword);
    assert_eq!(tokens[6].kind, TokenKind::String);
    assert_eq!(tokens[5].loc, SourceLoc::new(0, 2, 3));
}

#[test]
fn test_splitter_literals_and_symbols() {
    let tokens = lex("VALUE -1.5 X\"F1\" N'AB' (A + B) ** 2 >= ZERO");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::ReservedKeyword,
            TokenKind::Numeric,
            TokenKind::HexString,
            TokenKind::National,
            TokenKind::Symbol,
            TokenKind::Identifier,
            TokenKind::Symbol,
            TokenKind::Identifier,
            TokenKind::Symbol,
            TokenKind::Symbol,
            TokenKind::Numeric,
            TokenKind::Symbol,
            TokenKind::Figurative,
            TokenKind::EndOfUnit,
        ]
    );
    assert_eq!(tokens[1].text, "-1.5");
}
