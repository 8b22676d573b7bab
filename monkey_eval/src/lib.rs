pub mod environment;
pub mod error;
pub mod interpret;
pub mod types;

use interpret::Interpreter;
use log::trace;
use types::Value;

/// Parses and evaluates `source` against the interpreter's global env.
/// Parse diagnostics are returned without evaluating anything, while
/// runtime errors come back as an error value.
pub fn run(source: &str, interpreter: &mut Interpreter) -> Result<Option<Value>, Vec<String>> {
    trace!("Parsing {source}");
    let (program, errors) = monkey_syntax::parse(source);
    if !errors.is_empty() {
        return Err(errors);
    }
    trace!("Interpreting {program:#?}");
    Ok(interpreter.eval_program(&program))
}
