//! Keyword groups the grammar dispatches on.

/// Statement verbs: a statement starts with one of these.
pub const VERBS: &[&str] = &[
    "ACCEPT", "ADD", "ALLOCATE", "ALTER", "CALL", "CANCEL", "CLOSE", "COMPUTE", "CONTINUE",
    "DELETE", "DISPLAY", "DIVIDE", "EVALUATE", "EXIT", "FREE", "GENERATE", "GO", "GOBACK",
    "IF", "INITIALIZE", "INITIATE", "INSPECT", "INVOKE", "MERGE", "MOVE", "MULTIPLY",
    "OPEN", "PERFORM", "RAISE", "READ", "RELEASE", "RETURN", "REWRITE", "SEARCH", "SET",
    "SORT", "START", "STOP", "STRING", "SUBTRACT", "TERMINATE", "UNSTRING", "WRITE",
];

/// Explicit scope terminators.
pub const TERMINATORS: &[&str] = &[
    "END-ACCEPT", "END-ADD", "END-CALL", "END-COMPUTE", "END-DELETE", "END-DISPLAY",
    "END-DIVIDE", "END-EVALUATE", "END-IF", "END-INVOKE", "END-MULTIPLY", "END-PERFORM",
    "END-READ", "END-RETURN", "END-REWRITE", "END-SEARCH", "END-START", "END-STRING",
    "END-SUBTRACT", "END-UNSTRING", "END-WRITE",
];

/// Words that open a unit header.
pub const UNIT_HEADERS: &[&str] = &["PROGRAM-ID", "FUNCTION-ID", "METHOD-ID", "CLASS-ID"];

/// Words following `END` in a unit end marker.
pub const UNIT_END_WORDS: &[&str] = &["PROGRAM", "FUNCTION", "METHOD", "CLASS"];

/// DATA DIVISION section names.
pub const DATA_SECTIONS: &[&str] = &[
    "FILE", "WORKING-STORAGE", "LOCAL-STORAGE", "LINKAGE", "SCREEN", "REPORT",
];

/// File and report description indicators.
pub const FILE_INDICATORS: &[&str] = &["FD", "SD", "RD"];

/// Check if a word is a statement verb.
pub fn is_verb(word: &str) -> bool {
    VERBS.iter().any(|v| v.eq_ignore_ascii_case(word))
}

/// Check if a word is an explicit scope terminator.
pub fn is_terminator(word: &str) -> bool {
    TERMINATORS.iter().any(|v| v.eq_ignore_ascii_case(word))
}

/// The terminator matching a verb (`READ` → `END-READ`), if it has one.
pub fn terminator_for(verb: &str) -> Option<&'static str> {
    TERMINATORS
        .iter()
        .find(|t| t[4..].eq_ignore_ascii_case(verb))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminator_lookup() {
        assert_eq!(terminator_for("read"), Some("END-READ"));
        assert_eq!(terminator_for("COMPUTE"), Some("END-COMPUTE"));
        assert_eq!(terminator_for("MOVE"), None);
    }

    #[test]
    fn test_verbs_and_terminators() {
        assert!(is_verb("perform"));
        assert!(!is_verb("END-PERFORM"));
        assert!(is_terminator("end-perform"));
        assert!(!is_terminator("END-OF-PAGE"));
    }

    #[test]
    fn test_every_verb_is_reserved() {
        for verb in VERBS {
            assert!(cobol_ir::keywords::is_reserved(verb), "{verb}");
        }
        for term in TERMINATORS {
            assert!(cobol_ir::keywords::is_reserved(term), "{term}");
        }
    }
}
