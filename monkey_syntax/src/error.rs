use thiserror::Error;

use crate::token::TokenKind;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected next token type to be {expected}, got {found} instead")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
    },
    #[error("no prefix parse function for {0} found")]
    MissingPrefix(TokenKind),
    #[error("could not parse {0:?} as integer")]
    InvalidInteger(String),
}
