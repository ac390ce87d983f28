/// Module representing high-level entry-point of the REPL.
pub mod repl;

pub mod run {

    /// Module that holds implementation detail of [`crate::run::run`].
    /// It glues [`monkey::interpreter`] and [`crate::repl`] together.
    mod glue {
        use super::{Mode, Opts};
        use crate::repl;
        use monkey::{interpreter, object::Object};
        use std::{fs::File, io};
        use thiserror::Error;
        use tracing::debug;

        #[derive(Error, Debug)]
        pub enum Error {
            #[error(transparent)]
            Run(#[from] interpreter::Error),
            #[error(transparent)]
            Repl(#[from] rustyline::error::ReadlineError),
        }

        pub type Result<T> = std::result::Result<T, Error>;

        fn open_file(path: &std::path::Path) -> std::result::Result<File, interpreter::Error> {
            File::open(path).map_err(interpreter::Error::from)
        }

        pub fn run(opts: Opts) -> Result<Option<Object>> {
            debug!(mode = ?opts.mode, "starting");
            Ok(match opts.mode {
                Mode::Script(path) => interpreter::run(open_file(&path)?).map(Some)?,
                Mode::Stdin => interpreter::run(io::stdin()).map(Some)?,
                Mode::Repl => {
                    repl::greet();
                    repl::run()?;
                    None
                }
            })
        }
    }

    use std::{path::PathBuf, process::ExitCode};

    #[derive(Debug)]
    pub enum Mode {
        Script(PathBuf),
        Repl,
        Stdin,
    }

    impl Mode {
        /// Interactive session on a terminal, otherwise stdin is one program.
        pub fn stdin_or_repl() -> Self {
            if atty::is(atty::Stream::Stdin) {
                Self::Repl
            } else {
                Self::Stdin
            }
        }
    }

    #[derive(Debug)]
    pub struct Opts {
        pub mode: Mode,
    }

    pub fn run(opts: Opts) -> ExitCode {
        match glue::run(opts) {
            Ok(o) => {
                if let Some(obj) = o {
                    println!("{}", obj)
                }
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("Error -- {}", err);
                ExitCode::FAILURE
            }
        }
    }
}

pub mod parse {
    use itertools::Itertools;
    use monkey::{ast::Statement, parser};
    use std::{fs, io, path::PathBuf, process::ExitCode};
    use thiserror::Error;

    #[derive(Error, Debug)]
    enum Error {
        #[error(transparent)]
        Parse(#[from] parser::ParseErrors),
        #[error(transparent)]
        Io(#[from] io::Error),
    }

    fn inner(file: PathBuf) -> Result<Vec<Statement>, Error> {
        Ok(parser::parse(&fs::read_to_string(file)?)?.statements)
    }

    pub fn run(file: PathBuf) -> ExitCode {
        match inner(file) {
            Ok(x) => {
                println!("{}", x.iter().join("\n"));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error -- {}", e);
                ExitCode::FAILURE
            }
        }
    }
}

pub mod lex {
    use itertools::Itertools;
    use monkey::lexer;
    use std::{fs, io, path::PathBuf, process::ExitCode};

    fn inner(file: PathBuf) -> Result<Vec<lexer::Token>, io::Error> {
        Ok(lexer::tokenize(&fs::read_to_string(file)?))
    }

    pub fn run(file: PathBuf) -> ExitCode {
        match inner(file) {
            Ok(x) => {
                println!("{}", x.iter().join("\n"));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error -- {}", e);
                ExitCode::FAILURE
            }
        }
    }
}

use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_ENV: &str = "MONKEY_LOG";

#[derive(Parser, Debug)]
/// An interpreter for the Monkey programming language.
pub struct Args {
    /// Log filter directives, e.g. `monkey=debug`. Falls back to $MONKEY_LOG, then `warn`.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run program from a script file.
    Run {
        /// Program to run.
        file: PathBuf,
    },
    /// Parse program from a script file.
    Parse {
        /// Program to parse.
        file: PathBuf,
    },

    /// Lex (tokenize) program from a script file.
    Lex {
        /// Program to lex.
        file: PathBuf,
    },
}

/// Installs the stderr log subscriber.
fn init_tracing(directives: Option<&str>) -> anyhow::Result<()> {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .try_init()?;
    Ok(())
}

pub fn run() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;
    let Some(command) = args.command else {
        return Ok(run::run(run::Opts {
            mode: run::Mode::stdin_or_repl(),
        }));
    };
    Ok(match command {
        Commands::Run { file } => run::run(run::Opts {
            mode: run::Mode::Script(file),
        }),
        Commands::Parse { file } => parse::run(file),
        Commands::Lex { file } => lex::run(file),
    })
}
