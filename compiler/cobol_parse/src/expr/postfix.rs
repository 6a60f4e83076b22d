//! Balance check, shunting-yard conversion and postfix validation.
//!
//! All three are pure functions over canonical tokens so they can run on
//! any collected expression, whatever statement it came from.

use cobol_diagnostic::ErrorCode;
use cobol_ir::{ExprRole, ExprToken, SourceLoc};
use smallvec::SmallVec;

use super::precedence::{Assoc, OperatorInfo, PrecedenceTable};
use crate::ParseError;

#[cold]
fn error_at(code: ErrorCode, message: impl Into<String>, token: &ExprToken) -> ParseError {
    ParseError::at(code, message, token.loc, token.text.clone())
}

fn lookup(table: &PrecedenceTable, token: &ExprToken) -> Result<&'static OperatorInfo, ParseError> {
    table.lookup(token).ok_or_else(|| {
        error_at(
            ErrorCode::E0315,
            format!("`{}` is not an operator in this expression", token.text),
            token,
        )
    })
}

/// Check that parentheses pair up.
pub fn check_balance(tokens: &[ExprToken]) -> Result<(), ParseError> {
    let mut open: SmallVec<[&ExprToken; 4]> = SmallVec::new();
    for token in tokens {
        match token.role {
            ExprRole::Open => open.push(token),
            ExprRole::Close => {
                if open.pop().is_none() {
                    return Err(error_at(ErrorCode::E0320, "unmatched `)`", token));
                }
            }
            _ => {}
        }
    }
    match open.last() {
        Some(token) => Err(error_at(ErrorCode::E0320, "`(` is never closed", token)),
        None => Ok(()),
    }
}

/// Convert canonical infix tokens to postfix.
///
/// Infix operators are left-associative unless the table says otherwise;
/// prefix operators wait on the stack for their operand and postfix
/// operators apply to everything already bound tighter than them.
pub fn to_postfix(infix: &[ExprToken], table: &PrecedenceTable) -> Result<Vec<ExprToken>, ParseError> {
    let mut output = Vec::with_capacity(infix.len());
    // `None` marks an open parenthesis.
    let mut stack: Vec<(&ExprToken, Option<&'static OperatorInfo>)> = Vec::new();

    for token in infix {
        match token.role {
            ExprRole::Operand => output.push(token.clone()),
            ExprRole::Open => stack.push((token, None)),
            ExprRole::Close => loop {
                match stack.pop() {
                    Some((op, Some(_))) => output.push(op.clone()),
                    Some((_, None)) => break,
                    None => return Err(error_at(ErrorCode::E0320, "unmatched `)`", token)),
                }
            },
            ExprRole::Prefix => {
                let info = lookup(table, token)?;
                stack.push((token, Some(info)));
            }
            ExprRole::Operator | ExprRole::Postfix => {
                let info = lookup(table, token)?;
                while let Some(&(top, Some(top_info))) = stack.last() {
                    let binds_tighter = top_info.precedence > info.precedence
                        || (top_info.precedence == info.precedence && info.assoc == Assoc::Left);
                    if !binds_tighter {
                        break;
                    }
                    output.push(top.clone());
                    stack.pop();
                }
                if token.role == ExprRole::Postfix {
                    output.push(token.clone());
                } else {
                    stack.push((token, Some(info)));
                }
            }
        }
    }

    while let Some((token, info)) = stack.pop() {
        if info.is_none() {
            return Err(error_at(ErrorCode::E0320, "`(` is never closed", token));
        }
        output.push(token.clone());
    }
    Ok(output)
}

/// Simulate the operand stack over a postfix sequence.
///
/// Every operator must find its operands and exactly one value must be
/// left at the end.
pub fn validate_postfix(postfix: &[ExprToken], table: &PrecedenceTable) -> Result<(), ParseError> {
    let mut stack: SmallVec<[&ExprToken; 8]> = SmallVec::new();
    for token in postfix {
        match token.role {
            ExprRole::Operand => stack.push(token),
            ExprRole::Open | ExprRole::Close => {
                return Err(error_at(ErrorCode::E0325, "parenthesis left in postfix form", token));
            }
            ExprRole::Operator | ExprRole::Prefix | ExprRole::Postfix => {
                let arity = lookup(table, token)?.fixity.arity();
                if stack.len() < arity {
                    return Err(error_at(
                        ErrorCode::E0325,
                        format!("operator `{}` is missing an operand", token.text),
                        token,
                    ));
                }
                stack.truncate(stack.len() - arity);
                stack.push(token);
            }
        }
    }
    match stack.as_slice() {
        [] => Err(ParseError::at(ErrorCode::E0325, "empty expression", SourceLoc::DUMMY, "")),
        [_] => Ok(()),
        [_, extra, ..] => Err(error_at(
            ErrorCode::E0325,
            format!("`{}` is not joined to the expression by an operator", extra.text),
            extra,
        )),
    }
}
