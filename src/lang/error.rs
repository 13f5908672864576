use thiserror::Error;

use crate::lang::ast::Identifier;
use crate::lang::value::Type;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum EvalError {
    #[error("{0} not found")]
    NotFound(Identifier),

    #[error("{context}: expected {expected}, got {actual}")]
    TypeMismatch {
        context: String,
        expected: Type,
        actual: Type,
    },

    #[error("Can not assign to LHS")]
    InvalidAssignTarget,

    #[error("Divide by zero")]
    DivisionByZero,

    /// Reserved for front ends whose steps can produce no value at all. Nil operands are
    /// ordinary values and fail with `TypeMismatch` instead.
    #[error("{0} evaluated to nil")]
    NilEvaluationResult(String),

    #[error("{lhs} {op} {rhs} overflows")]
    Overflow {
        op: &'static str,
        lhs: i64,
        rhs: i64,
    },

    #[error("{context} is not supported for {ty} values")]
    Unsupported { context: String, ty: Type },

    #[error("Maximum evaluation depth of {limit} exceeded")]
    DepthExceeded { limit: usize },

    /// The tree violates a construction invariant. Always a bug in whatever built the tree.
    #[error("Malformed AST: {0}")]
    MalformedNode(String),
}

pub type Result<T> = std::result::Result<T, EvalError>;

#[test]
fn test_messages() {
    assert_eq!(
        EvalError::NotFound(Identifier("gabbar".to_string())).to_string(),
        "gabbar not found"
    );
    assert_eq!(
        EvalError::TypeMismatch {
            context: "left operand of +".to_string(),
            expected: Type::Int,
            actual: Type::String,
        }
        .to_string(),
        "left operand of +: expected int, got string"
    );
    assert_eq!(
        EvalError::Overflow {
            op: "*",
            lhs: i64::MAX,
            rhs: 2
        }
        .to_string(),
        format!("{} * 2 overflows", i64::MAX)
    );
}
