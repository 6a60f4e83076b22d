use super::*;
use pretty_assertions::assert_eq;

use crate::tests::support::{lex, parse_source, procedure, statements};
use crate::{ParseOptions, ParseOutput};

fn body(output: &ParseOutput) -> ProcedureBody {
    output.units[0].procedure.clone().unwrap()
}

fn verbs(stmts: &[Statement]) -> Vec<&str> {
    stmts.iter().map(|s| s.verb.as_str()).collect()
}

#[test]
fn test_sections_and_paragraphs() {
    let output = parse_source(&procedure(
        "MAIN SECTION.\nSTART-UP.\n  DISPLAY 'A'.\n  MOVE 1 TO X.\nFINISH.\n  STOP RUN.",
    ));
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let body = body(&output);
    assert_eq!(body.sections, vec!["MAIN"]);
    assert!(body.statements.is_empty());
    let start = body.paragraph("start-up").unwrap();
    assert_eq!(start.section.as_deref(), Some("MAIN"));
    assert_eq!(verbs(&start.statements), vec!["DISPLAY", "MOVE"]);
    assert_eq!(verbs(&body.paragraph("FINISH").unwrap().statements), vec!["STOP"]);
}

#[test]
fn test_header_using_and_returning() {
    let output = parse_source(
        "IDENTIFICATION DIVISION. PROGRAM-ID. SUBPROG.\n\
         PROCEDURE DIVISION USING BY REFERENCE PARM-A PARM-B BY VALUE PARM-C RETURNING RESULT.\n\
         GOBACK.",
    );
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let body = body(&output);
    assert_eq!(body.using, vec!["PARM-A", "PARM-B", "PARM-C"]);
    assert_eq!(body.returning.as_deref(), Some("RESULT"));
    assert_eq!(verbs(&body.statements), vec!["GOBACK"]);
}

#[test]
fn test_header_using_without_names() {
    let output = parse_source(
        "IDENTIFICATION DIVISION. PROGRAM-ID. SUBPROG.\nPROCEDURE DIVISION USING.\nGOBACK.",
    );
    assert_eq!(output.codes(), vec![ErrorCode::E0010]);
    assert_eq!(verbs(&body(&output).statements), vec!["GOBACK"]);
}

#[test]
fn test_if_else() {
    let output = parse_source(&procedure(
        "IF WS-A > 1 THEN DISPLAY 'BIG' ELSE DISPLAY 'SMALL' MOVE 0 TO WS-A END-IF.",
    ));
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let stmt = &stmts[0];
    assert_eq!(stmt.expressions.len(), 1);
    assert!(stmt.terminated);
    assert_eq!(verbs(&stmt.branch("THEN").unwrap().body), vec!["DISPLAY"]);
    assert_eq!(verbs(&stmt.branch("ELSE").unwrap().body), vec!["DISPLAY", "MOVE"]);
}

#[test]
fn test_next_sentence() {
    let output = parse_source(&procedure("IF WS-A = 1 NEXT SENTENCE ELSE DISPLAY 'X'."));
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    assert_eq!(verbs(&stmts[0].branch("THEN").unwrap().body), vec!["NEXT SENTENCE"]);
}

#[test]
fn test_nested_conditional_needs_terminator() {
    let output = parse_source(&procedure("IF WS-A = 1 READ IN-FILE AT END DISPLAY 'X'."));
    assert_eq!(output.codes(), vec![ErrorCode::E0055]);
    assert!(output.diagnostics[0].message.contains("END-READ"));

    let output = parse_source(&procedure("IF WS-A = 1 READ IN-FILE AT END DISPLAY 'X' END-READ."));
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn test_outermost_conditional_needs_no_terminator() {
    let output = parse_source(&procedure("READ IN-FILE AT END DISPLAY 'X'."));
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn test_nested_terminator_rule_can_be_disabled() {
    let tokens = lex(&procedure("IF WS-A = 1 READ IN-FILE AT END DISPLAY 'X'."));
    let options = ParseOptions {
        nested_terminators: false,
        ..ParseOptions::default()
    };
    let output = crate::parse(&tokens, &options);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn test_inline_perform() {
    let output = parse_source(&procedure(
        "PERFORM VARYING I FROM 1 BY 1 UNTIL I > 10\n  DISPLAY I\nEND-PERFORM.",
    ));
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let perform = &stmts[0];
    assert!(perform.terminated);
    assert_eq!(perform.operands, vec!["I FROM 1 BY 1"]);
    assert_eq!(perform.expressions.len(), 1);
    assert_eq!(verbs(&perform.branch("PERFORM").unwrap().body), vec!["DISPLAY"]);
}

#[test]
fn test_inline_perform_without_end() {
    let output = parse_source(&procedure("PERFORM 3 TIMES DISPLAY 'X'."));
    assert_eq!(output.codes(), vec![ErrorCode::E0055]);
    assert_eq!(statements(&output)[0].operands, vec!["3"]);
}

#[test]
fn test_out_of_line_perform() {
    let output = parse_source(&procedure(
        "PERFORM PARA-A THRU PARA-B.\nPERFORM PARA-C 3 TIMES.\nPERFORM PARA-D WITH TEST AFTER UNTIL DONE-FLAG.",
    ));
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    assert_eq!(stmts[0].operands, vec!["PARA-A", "PARA-B"]);
    assert_eq!(stmts[1].operands, vec!["PARA-C", "3"]);
    assert_eq!(stmts[2].operands, vec!["PARA-D", "TEST AFTER"]);
    assert_eq!(stmts[2].expressions.len(), 1);
    assert!(stmts.iter().all(|s| s.branches.is_empty()));
}

#[test]
fn test_evaluate() {
    let output = parse_source(&procedure(
        "EVALUATE TRUE\n  WHEN WS-A > 1 DISPLAY 'A'\n  WHEN WS-A = 0 ALSO ANY DISPLAY 'Z'\n  WHEN OTHER DISPLAY 'O'\nEND-EVALUATE.",
    ));
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let evaluate = &stmts[0];
    assert_eq!(evaluate.operands, vec!["TRUE"]);
    let labels: Vec<&str> = evaluate.branches.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["WHEN", "WHEN", "WHEN OTHER"]);
    assert!(evaluate.branches[0].condition.is_some());
    assert!(evaluate.terminated);
}

#[test]
fn test_evaluate_without_when() {
    let output = parse_source(&procedure("EVALUATE WS-A DISPLAY 'X'.\nSTOP RUN."));
    assert_eq!(output.codes(), vec![ErrorCode::E0010]);
    assert_eq!(verbs(&statements(&output)), vec!["DISPLAY", "STOP"]);
}

#[test]
fn test_compute_with_size_error() {
    let output = parse_source(&procedure(
        "COMPUTE WS-X ROUNDED = WS-A + WS-B * 2 ON SIZE ERROR DISPLAY 'OVF' END-COMPUTE.",
    ));
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let compute = &stmts[0];
    assert_eq!(compute.operands, vec!["WS-X", "ROUNDED"]);
    assert_eq!(compute.expressions.len(), 1);
    assert!(compute.branch("ON SIZE ERROR").is_some());
    assert!(compute.terminated);
}

#[test]
fn test_search() {
    let output = parse_source(&procedure(
        "SEARCH TBL AT END DISPLAY 'NONE'\n  WHEN ELEM(IDX) = 'A' DISPLAY 'FOUND'\nEND-SEARCH.",
    ));
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let stmts = statements(&output);
    let labels: Vec<&str> = stmts[0].branches.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["AT END", "WHEN"]);
    assert!(stmts[0].branches[1].condition.is_some());
}

#[test]
fn test_bad_statement_is_skipped() {
    let output = parse_source(&procedure("COMPUTE = 1.\nDISPLAY 'OK'."));
    assert_eq!(output.codes(), vec![ErrorCode::E0010]);
    assert_eq!(output.diagnostics[0].notes[0], "while parsing a statement");
    assert_eq!(verbs(&statements(&output)), vec!["DISPLAY"]);
}

#[test]
fn test_stray_words_are_skipped() {
    let output = parse_source(&procedure("HELLO WORLD DISPLAY 'X'."));
    assert_eq!(output.codes(), vec![ErrorCode::E0010]);
    assert_eq!(verbs(&statements(&output)), vec!["DISPLAY"]);
}

#[test]
fn test_declaratives() {
    let output = parse_source(&procedure(
        "DECLARATIVES.\nERR-HANDLING SECTION.\n  USE AFTER ERROR PROCEDURE ON IN-FILE.\n\
         ERR-PARA.\n  DISPLAY 'ERR'.\nEND DECLARATIVES.\nMAIN-LOGIC SECTION.\nMAIN-PARA.\n  STOP RUN.",
    ));
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let body = body(&output);
    assert_eq!(body.sections, vec!["ERR-HANDLING", "MAIN-LOGIC"]);
    assert_eq!(verbs(&body.statements), vec!["USE"]);
    assert_eq!(body.paragraph("MAIN-PARA").unwrap().section.as_deref(), Some("MAIN-LOGIC"));
}
