use crate::{env, eval, object::Object, parser};
use std::io;
use std::{cell::RefCell, rc::Rc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] parser::ParseErrors),
    #[error(transparent)]
    Eval(#[from] eval::EvalError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T = Object> = std::result::Result<T, Error>;

/// Parses and evaluates `code`, keeping every top-level binding in `env`.
///
/// A runtime error that reaches the top surfaces as [`Error::Eval`].
pub fn eval_with_env(code: &str, env: Rc<RefCell<env::Env>>) -> Result {
    let program = parser::parse(code)?;
    match eval::eval(&program, &env) {
        Object::Error(message) => Err(eval::EvalError { message }.into()),
        obj => Ok(obj),
    }
}

/// A session whose global environment outlives single evaluations.
#[derive(Debug)]
pub struct Interpreter {
    env: Rc<RefCell<env::Env>>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self {
            env: env::Env::new_rc(),
        }
    }
}

impl Interpreter {
    pub fn eval(&mut self, code: &str) -> Result {
        eval_with_env(code, self.env.clone())
    }

    pub fn run(&mut self, mut source: impl io::Read) -> Result {
        let code = {
            let mut s = String::new();
            source.read_to_string(&mut s)?;
            s
        };
        self.eval(&code)
    }
}

pub fn eval(code: &str) -> Result {
    Interpreter::default().eval(code)
}

pub fn run(source: impl io::Read) -> Result {
    Interpreter::default().run(source)
}
