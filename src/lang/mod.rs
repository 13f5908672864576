pub mod ast;
pub mod error;
pub mod eval;
pub mod runtime;
pub mod scope;
pub mod truthiness;
pub mod value;
