//! Reserved words and figurative constants.
//!
//! The lexer classifies words with these tables. The parser itself matches
//! keywords by spelling, but relies on the classification to tell user
//! words from reserved ones (an expression stops at the first reserved
//! word outside its own vocabulary).

/// Reserved words recognised by the front end.
pub const RESERVED: &[&str] = &[
    "ACCEPT", "ACCESS", "ADD", "ADVANCING", "AFTER", "ALL", "ALPHABETIC",
    "ALLOCATE", "ALPHABETIC-LOWER", "ALPHABETIC-UPPER", "ALSO", "ALTER", "AND", "ANY", "ARE", "AREA",
    "AS", "ASCENDING", "ASSIGN", "AT", "AUTHOR", "BASED", "BEFORE", "BINARY", "BINARY-CHAR",
    "BINARY-DOUBLE", "BINARY-LONG", "BINARY-SHORT", "BLANK", "BLOCK", "BY", "CALL", "CANCEL",
    "CHARACTER", "CHARACTERS", "CLASS", "CLASS-ID", "CLOSE", "COL", "COLUMN", "COMMON",
    "COMP", "COMP-1", "COMP-2", "COMP-3", "COMP-4", "COMP-5", "COMPUTATIONAL",
    "COMPUTATIONAL-1", "COMPUTATIONAL-2", "COMPUTATIONAL-3", "COMPUTATIONAL-4",
    "COMPUTATIONAL-5", "COMPUTE", "CONFIGURATION", "CONSTANT", "CONTAINS", "CONTENT", "CONTINUE",
    "CONVERTING", "COPY", "CORRESPONDING", "CYCLE", "DATA", "DECLARATIVES", "DELETE",
    "DELIMITED", "DELIMITER", "DEPENDING", "DESCENDING", "DISPLAY", "DIVIDE", "DIVISION",
    "DOWN", "EJECT", "ELSE", "END", "END-ACCEPT", "END-ADD", "END-CALL", "END-COMPUTE",
    "END-DELETE", "END-DISPLAY", "END-DIVIDE", "END-EVALUATE", "END-IF", "END-INVOKE",
    "END-MULTIPLY", "END-OF-PAGE", "END-PERFORM", "END-READ", "END-RETURN", "END-REWRITE",
    "END-SEARCH", "END-START", "END-STRING", "END-SUBTRACT", "END-UNSTRING", "END-WRITE",
    "ENVIRONMENT", "EOP", "EQUAL", "EQUALS", "ERROR", "EVALUATE", "EXCEPTION", "EXIT",
    "EXTEND", "EXTERNAL", "FACTORY", "FALSE", "FD", "FILE", "FILE-CONTROL", "FILLER",
    "FIRST", "FLOAT-LONG", "FLOAT-SHORT", "FOR", "FREE", "FROM", "FUNCTION",
    "FUNCTION-ID", "FUNCTION-POINTER", "GENERATE", "GIVING", "GLOBAL", "GO", "GOBACK", "GREATER",
    "ID", "IDENTIFICATION", "IF", "IN", "INDEX", "INDEXED", "INITIAL", "INITIALIZE", "INITIATE",
    "INPUT", "INPUT-OUTPUT", "INSPECT", "INTO", "INVALID", "INVOKE", "IS", "JUST",
    "JUSTIFIED", "KEY", "LABEL", "LAST", "LEADING", "LEFT", "LESS", "LINE", "LINES",
    "LINKAGE", "LOCAL-STORAGE", "LOCALE", "MERGE", "MESSAGE-TAG", "METHOD", "METHOD-ID",
    "MODE", "MOVE", "MULTIPLY", "NATIONAL", "NEGATIVE", "NEXT", "NORMAL", "NOT", "NUMERIC",
    "OBJECT", "OCCURS", "OF", "OMITTED", "ON", "OPEN", "OR", "ORGANIZATION", "OTHER",
    "OUTPUT", "OVERFLOW", "PACKED-DECIMAL", "PAGE", "PARAGRAPH", "PERFORM", "PIC",
    "PICTURE", "POINTER", "POSITIVE", "PROCEDURE", "PROCEDURE-POINTER", "PROGRAM",
    "PROGRAM-ID", "PROGRAM-POINTER", "RAISE", "RAISING", "RD", "READ", "RECORD", "RECORDING",
    "RECORDS", "RECURSIVE", "REDEFINES", "REFERENCE", "RELEASE", "RENAMES", "REPLACING",
    "REPORT", "REPOSITORY", "RETURN", "RETURNING", "REWRITE", "RIGHT", "ROUNDED", "RUN",
    "SD", "SEARCH", "SECTION", "SELECT", "SENTENCE", "SEPARATE", "SET", "SIGN", "SIZE", "SORT",
    "SOURCE-COMPUTER", "SPECIAL-NAMES", "STANDARD", "START", "STATUS", "STOP", "STRING", "STRONG",
    "SUBTRACT", "SYNC", "SYNCHRONIZED", "SYSTEM-DEFAULT", "TALLYING", "TERMINATE", "TEST", "THAN",
    "THEN", "THROUGH", "THRU", "TIMES", "TO", "TRAILING", "TRUE", "TYPE", "TYPEDEF",
    "UNSTRING", "UNTIL", "UP", "UPON", "USAGE", "USER-DEFAULT", "USING", "VALUE", "VALUES",
    "VARYING", "WHEN", "WITH", "WORKING-STORAGE", "WRITE",
];

/// Figurative constants. `ALL literal` is handled by the grammar.
pub const FIGURATIVES: &[&str] = &[
    "HIGH-VALUE", "HIGH-VALUES", "LOW-VALUE", "LOW-VALUES", "NULL", "NULLS", "QUOTE",
    "QUOTES", "SPACE", "SPACES", "ZERO", "ZEROES", "ZEROS",
];

/// Check if a word is reserved (case-insensitive).
pub fn is_reserved(word: &str) -> bool {
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(word))
}

/// Check if a word is a figurative constant (case-insensitive).
pub fn is_figurative(word: &str) -> bool {
    FIGURATIVES.iter().any(|r| r.eq_ignore_ascii_case(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reserved_lookup_ignores_case() {
        assert!(is_reserved("PERFORM"));
        assert!(is_reserved("perform"));
        assert!(is_reserved("End-Read"));
        assert!(!is_reserved("WS-TOTAL"));
    }

    #[test]
    fn test_figuratives_are_not_reserved_words() {
        for word in FIGURATIVES {
            assert!(is_figurative(word));
            assert!(!is_reserved(word), "{word} is in both tables");
        }
    }

    #[test]
    fn test_no_duplicate_reserved_words() {
        let mut words: Vec<&str> = RESERVED.to_vec();
        words.sort_unstable();
        words.dedup();
        assert_eq!(words.len(), RESERVED.len());
    }
}
