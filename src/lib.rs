//! A small tree-walking evaluator for an expression-oriented scripting language.
//!
//! There is no parser: hosts build `Node` trees by hand (or with their own front end) and run
//! them with `evaluate`, an `Eval` carrying a custom `Config`, or a long-lived `Runtime`.

pub mod lang;

pub use lang::ast::{Block, Identifier, InfixOp, Node};
pub use lang::error::{EvalError, Result};
pub use lang::eval::{evaluate, Eval};
pub use lang::runtime::Runtime;
pub use lang::scope::Scope;
pub use lang::truthiness::Config;
pub use lang::value::{HashKey, HashPair, Type, Value};

#[cfg(test)]
pub(crate) fn init_test_logging() {
    use simplelog::{Config as LogConfig, LevelFilter, SimpleLogger};

    // Fails if another test got there first, which is fine
    let _ = SimpleLogger::init(LevelFilter::Trace, LogConfig::default());
}
