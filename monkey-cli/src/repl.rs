use monkey::interpreter;
use rustyline::{error::ReadlineError, history::History, Editor, Helper};
use tracing::debug;

const HISTORY_FILE: &str = ".monkeyhistory";
const PROMPT: &str = ">> ";

pub fn greet() {
    eprintln!("Welcome to the Monkey REPL. Ctrl-D to quit.")
}

pub type Error = ReadlineError;

fn run_line(ip: &mut interpreter::Interpreter, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    match ip.eval(line) {
        Ok(obj) => println!("{}", obj),
        Err(interpreter::Error::Parse(errors)) => {
            for err in errors.0 {
                eprintln!("\t{}", err)
            }
        }
        Err(err) => eprintln!("{}", err),
    }
}

fn run_loop<H: Helper, I: History>(
    ip: &mut interpreter::Interpreter,
    editor: &mut Editor<H, I>,
) -> Result<(), Error> {
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => run_line(ip, &line),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(()),
            Err(err) => return Err(err),
        }
    }
}

/// Reads lines until Ctrl-C or Ctrl-D, all of them sharing one environment.
pub fn run() -> Result<(), Error> {
    let mut ip = interpreter::Interpreter::default();
    let mut editor = {
        let config = rustyline::Config::builder()
            .auto_add_history(true)
            .completion_type(rustyline::CompletionType::List)
            .build();
        rustyline::Editor::<(), _>::with_config(config)?
    };
    if let Err(err) = editor.load_history(HISTORY_FILE) {
        debug!(%err, file = HISTORY_FILE, "no history loaded");
    }
    debug!("repl session started");
    let res = run_loop(&mut ip, &mut editor);
    if let Err(err) = editor.save_history(HISTORY_FILE) {
        debug!(%err, file = HISTORY_FILE, "history not saved");
    }
    debug!(ok = res.is_ok(), "repl session ended");
    res
}
