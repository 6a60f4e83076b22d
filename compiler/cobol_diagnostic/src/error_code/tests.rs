use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E0315.to_string(), "E0315");
    assert_eq!(ErrorCode::W0050.as_str(), "W0050");
}

#[test]
fn test_numbers_follow_codes() {
    assert_eq!(ErrorCode::E0030.number(), 30);
    assert_eq!(ErrorCode::E0320.number(), 320);
    assert_eq!(ErrorCode::W0050.number(), 50);
}

#[test]
fn test_expression_codes() {
    for code in [ErrorCode::E0315, ErrorCode::E0320, ErrorCode::E0325] {
        assert!(code.is_expression_error());
        assert_eq!(code.class(), DiagnosticClass::ExpressionMalformed);
        assert!(!code.is_fatal());
    }
    assert!(!ErrorCode::E0010.is_expression_error());
}

#[test]
fn test_fatal_codes() {
    assert!(ErrorCode::E0015.is_fatal());
    assert!(ErrorCode::E0900.is_fatal());
    assert!(!ErrorCode::E0040.is_fatal());
}

#[test]
fn test_phrase_and_clause_duplicates_share_class() {
    assert_eq!(ErrorCode::E0035.class(), DiagnosticClass::DuplicatePhrase);
    assert_eq!(ErrorCode::E0036.class(), DiagnosticClass::DuplicatePhrase);
    assert_eq!(ErrorCode::E0030.class(), DiagnosticClass::Duplicate);
}

#[test]
fn test_all_variants_round_trip_through_from_str() {
    for code in ErrorCode::ALL {
        let parsed: ErrorCode = code.as_str().to_lowercase().parse().unwrap();
        assert_eq!(parsed, *code);
    }
    assert!("E9999".parse::<ErrorCode>().is_err());
}

#[test]
fn test_only_w_codes_are_warnings() {
    for code in ErrorCode::ALL {
        assert_eq!(code.is_warning(), code.as_str().starts_with('W'), "{code}");
    }
}
