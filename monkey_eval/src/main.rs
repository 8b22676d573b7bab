use monkey_eval::{interpret::Interpreter, run};
use std::{
    env, fs,
    io::{self, Write},
};

const PROMPT: &str = ">> ";

fn main() -> io::Result<()> {
    pretty_env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [] => run_repl(),
        [file_path] => run_file(file_path),
        _ => {
            eprintln!("Usage: monkey [script]");
            std::process::exit(64);
        }
    }
}

fn run_repl() -> io::Result<()> {
    let (stdin, mut stdout) = (io::stdin(), io::stdout());
    // Bindings outlive the line they were made on
    let mut interpreter = Interpreter::new();
    loop {
        let mut line = String::default();
        print!("{PROMPT}");
        stdout.flush()?;
        // If zero bytes are read, then exit (usually triggered by Ctrl-D)
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        report(run(&line, &mut interpreter));
    }
    Ok(())
}

fn run_file(file_path: &str) -> io::Result<()> {
    let source = fs::read_to_string(file_path)?;
    report(run(&source, &mut Interpreter::new()));
    Ok(())
}

fn report(result: Result<Option<monkey_eval::types::Value>, Vec<String>>) {
    match result {
        Ok(Some(value)) => println!("{value}"),
        Ok(None) => (),
        Err(errors) => errors.iter().for_each(|e| eprintln!("{e}")),
    }
}
