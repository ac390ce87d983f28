mod prelude {
    pub use itertools::Itertools;
    pub use tap::prelude::*;
}

pub mod ast;
pub mod builtins;
pub mod env;
pub mod eval;
/// Module representing high-level entry-point of the interpreter.
pub mod interpreter;
pub mod lexer;
pub mod object;
pub mod parser;
