use monkey_syntax::ast::{BinOp, UnaryOp};
use thiserror::Error;

use crate::types::Value;

/// Anything that unwinds evaluation: a runtime error, or a `return`
/// travelling up to the nearest function call.
#[derive(Debug)]
pub enum Exception {
    Error(String),
    Return(Value),
}

#[derive(Debug, Error)]
pub enum ErrorMsg {
    #[error("unknown operator: {op}{operand}")]
    UnknownPrefixOp { op: UnaryOp, operand: &'static str },
    #[error("unknown operator: {lhs} {op} {rhs}")]
    UnknownInfixOp {
        lhs: &'static str,
        op: BinOp,
        rhs: &'static str,
    },
    #[error("type mismatch: {lhs} {op} {rhs}")]
    TypeMismatch {
        lhs: &'static str,
        op: BinOp,
        rhs: &'static str,
    },
    #[error("identifier not found: {0}")]
    UndefinedIdent(String),
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    #[error("wrong number of arguments: want={want}, got={got}")]
    WrongArgCount { want: usize, got: usize },
    #[error("division by zero")]
    DivisionByZero,
}

impl From<ErrorMsg> for Exception {
    fn from(msg: ErrorMsg) -> Self {
        Self::Error(msg.to_string())
    }
}
