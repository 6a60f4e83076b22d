use super::*;
use cobol_ir::Token;
use pretty_assertions::assert_eq;

fn loc(line: u32) -> SourceLoc {
    SourceLoc::new(0, line, 1)
}

#[test]
fn test_units_nest_and_finish_in_declaration_order() {
    let mut session = Session::new(DiagnosticConfig::default());
    let outer = session.enter_unit(UnitKind::Program, "OUTER", loc(1));
    let inner = session.enter_unit(UnitKind::Program, "INNER", loc(5));
    assert_eq!(session.depth(), 2);
    assert_eq!(session.current_unit().unwrap().parent, Some(outer));

    assert_eq!(session.exit_unit(), Some(inner));
    assert_eq!(session.current_unit().unwrap().id, outer);

    let (units, _, _) = session.finish();
    let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["OUTER", "INNER"]);
}

#[test]
fn test_abort_marks_only_the_active_unit() {
    let mut session = Session::new(DiagnosticConfig::default());
    let outer = session.enter_unit(UnitKind::Program, "OUTER", loc(1));
    let inner = session.enter_unit(UnitKind::Function, "F", loc(2));
    session.abort_unit();
    session.exit_all();
    assert!(session.unit(inner).unwrap().aborted);
    assert!(!session.unit(outer).unwrap().aborted);
    assert_eq!(session.depth(), 0);
}

#[test]
fn test_resolution_pass_mutes_reports() {
    let mut session = Session::new(DiagnosticConfig::default());
    let token = Token::new("X", cobol_ir::TokenKind::Identifier, loc(3));

    assert_eq!(session.set_pass(Pass::Resolution), Pass::Declaration);
    session
        .report(ErrorCode::E0030, "duplicate")
        .with_source(&token, "here")
        .finish();
    assert!(session.queue().is_empty());

    session.set_pass(Pass::Declaration);
    session
        .report(ErrorCode::E0030, "duplicate")
        .with_source(&token, "here")
        .finish();
    assert_eq!(session.queue().len(), 1);
}

#[test]
fn test_unit_kind_keywords() {
    assert_eq!(UnitKind::from_keyword("program-id"), Some(UnitKind::Program));
    assert_eq!(UnitKind::from_keyword("FUNCTION"), Some(UnitKind::Function));
    assert_eq!(UnitKind::from_keyword("SECTION"), None);
    assert_eq!(UnitKind::Method.end_word(), "METHOD");
}
