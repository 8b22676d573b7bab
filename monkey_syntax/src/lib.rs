pub mod ast;
pub mod error;
pub mod lex;
pub mod parse;
pub mod token;

use ast::Program;
use lex::Lexer;
use parse::Parser;

/// Parses `source` into a program along with the rendered diagnostics for
/// every statement that failed to parse. A non-empty diagnostic list means
/// the program is incomplete and should not be evaluated.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let (program, errors) = Parser::new(Lexer::new(source)).parse_program();
    let errors = errors.iter().map(ToString::to_string).collect();
    (program, errors)
}
