use std::{cell::RefCell, fmt::Display, rc::Rc};

use monkey_syntax::ast::{Block, Ident};

use crate::environment::Env;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Null,
    Error(String),
    Function(Rc<Func>),
}

impl Value {
    pub const TRUE: Self = Self::Boolean(true);
    pub const FALSE: Self = Self::Boolean(false);
    pub const NULL: Self = Self::Null;

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::Boolean(_) => "BOOLEAN",
            Self::Null => "NULL",
            Self::Error(_) => "ERROR",
            Self::Function(_) => "FUNCTION",
        }
    }

    /// Only `false` and `null` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false) | Self::Null)
    }

    /// Identity comparison: booleans and null are canonical, so
    /// they compare by value, while every function literal evaluation
    /// produces a distinct closure and errors are never identical.
    pub fn is_identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(m), Self::Integer(n)) => m == n,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::Function(f), Self::Function(g)) => Rc::ptr_eq(f, g),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => n.fmt(f),
            Self::Boolean(b) => b.fmt(f),
            Self::Null => f.write_str("null"),
            Self::Error(msg) => write!(f, "ERROR: {msg}"),
            Self::Function(func) => func.fmt(f),
        }
    }
}

pub struct Func {
    pub params: Vec<Ident>,
    pub body: Block,
    pub env: Rc<RefCell<Env>>,
}

// The captured env usually holds this very function,
// so it is left out to keep the output finite
impl std::fmt::Debug for Func {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Func")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Func {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Display for Func {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self
            .params
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>();
        write!(f, "fn({}) {}", params.join(", "), self.body)
    }
}
