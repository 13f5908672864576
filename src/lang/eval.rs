use std::collections::BTreeSet;

use log::{debug, trace};

use crate::lang::ast::*;
use crate::lang::error::{EvalError, Result};
use crate::lang::scope::Scope;
use crate::lang::truthiness::Config;
use crate::lang::value::{Type, Value};

/// If less than this much stack remains, grow it before recursing
const RED_ZONE: usize = 100 * 1024;

/// How much stack to allocate each time we grow
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Evaluate `node` against `scope` with the default configuration
///
/// The default configuration never mutates `scope` on a read: looking up an unbound name fails
/// with `NotFound` and leaves no binding behind. Hosts relying on reads creating nil bindings
/// must opt in with `Config::with_vivify_on_lookup`.
pub fn evaluate(scope: &mut Scope<'_>, node: &Node) -> Result<Value> {
    Eval::default().eval(scope, node)
}

#[derive(Default)]
pub struct Eval {
    config: Config,
}

impl Eval {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluate `node`, reading and writing bindings in `scope`
    ///
    /// Side effects of nodes evaluated before a failure stay committed.
    pub fn eval(&self, scope: &mut Scope<'_>, node: &Node) -> Result<Value> {
        self.eval_node(scope, node, 0)
    }

    fn eval_node(&self, scope: &mut Scope<'_>, node: &Node, depth: usize) -> Result<Value> {
        if depth > self.config.max_depth() {
            return Err(EvalError::DepthExceeded {
                limit: self.config.max_depth(),
            });
        }

        trace!("eval {} (depth={})", node.kind(), depth);

        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || match node {
            Node::Literal { value, .. } => Ok(value.clone()),
            Node::Lookup(ident) => self.eval_lookup(scope, ident),
            Node::Concat(nodes) => self.eval_concat(scope, nodes, depth),
            Node::Assign(target, value) => self.eval_assign(scope, target, value, depth),
            Node::Block(block) => self.eval_block(scope, block, depth),
            Node::If(condition, success, fail) => {
                let cond = self.eval_node(scope, condition, depth + 1)?;
                if self.config.is_truthy(&cond)? {
                    self.eval_block(scope, success, depth)
                } else {
                    self.eval_block(scope, fail, depth)
                }
            }
            Node::Infix(op, lhs, rhs) => self.eval_infix(scope, *op, lhs, rhs, depth),
            Node::Return(inner) => self.eval_node(scope, inner, depth + 1),
            Node::Lambda(params, body) => self.eval_lambda(scope, params, body, depth),
        })
    }

    fn eval_lookup(&self, scope: &mut Scope<'_>, ident: &Identifier) -> Result<Value> {
        let found = if self.config.vivify_on_lookup() {
            Some(scope.lookup(ident))
        } else {
            scope.get(ident)
        };

        // A binding holding nil is indistinguishable from no binding at all
        match found {
            Some(val) if !val.is_nil() => Ok(val.clone()),
            _ => Err(EvalError::NotFound(ident.clone())),
        }
    }

    fn eval_concat(&self, scope: &mut Scope<'_>, nodes: &[Node], depth: usize) -> Result<Value> {
        let mut out = String::new();
        for node in nodes {
            let val = self.eval_node(scope, node, depth + 1)?;
            if val.ty() == Type::Hash {
                return Err(EvalError::Unsupported {
                    context: "concatenation".to_string(),
                    ty: Type::Hash,
                });
            }

            out += &val.to_string();
        }

        Ok(Value::String(out))
    }

    fn eval_assign(
        &self,
        scope: &mut Scope<'_>,
        target: &Node,
        value: &Node,
        depth: usize,
    ) -> Result<Value> {
        let val = self.eval_node(scope, value, depth + 1)?;

        match target {
            Node::Literal {
                name: Some(ident), ..
            } => Ok(scope.update(ident, val).clone()),
            _ => Err(EvalError::InvalidAssignTarget),
        }
    }

    fn eval_block(&self, scope: &mut Scope<'_>, block: &Block, depth: usize) -> Result<Value> {
        for node in &block.0 {
            let val = self.eval_node(scope, node, depth + 1)?;
            if let Node::Return(_) = node {
                return Ok(val);
            }
        }

        Ok(Value::Nil)
    }

    fn eval_lambda(
        &self,
        scope: &mut Scope<'_>,
        params: &[(Identifier, Node)],
        body: &Block,
        depth: usize,
    ) -> Result<Value> {
        let mut seen = BTreeSet::new();
        for (ident, _) in params {
            if !seen.insert(ident) {
                return Err(EvalError::MalformedNode(format!(
                    "lambda parameter '{}' declared more than once",
                    ident
                )));
            }
        }

        // Defaults see the caller's bindings, never each other
        let mut args = Vec::with_capacity(params.len());
        for (ident, default) in params {
            args.push((ident, self.eval_node(scope, default, depth + 1)?));
        }

        debug!(
            "calling lambda with {} params from scope '{}'",
            args.len(),
            scope.name()
        );

        let mut child = Scope::child("lambda", scope);
        for (ident, val) in args {
            child.update(ident, val);
        }

        self.eval_block(&mut child, body, depth)
    }

    fn eval_infix(
        &self,
        scope: &mut Scope<'_>,
        op: InfixOp,
        lhs: &Node,
        rhs: &Node,
        depth: usize,
    ) -> Result<Value> {
        let lhs_val = self.eval_node(scope, lhs, depth + 1)?;
        let rhs_val = self.eval_node(scope, rhs, depth + 1)?;

        match op {
            InfixOp::Add
            | InfixOp::Subtract
            | InfixOp::Multiply
            | InfixOp::Divide
            | InfixOp::Mod
            | InfixOp::Greater
            | InfixOp::Lesser => {
                let l = int_operand(op, "left", &lhs_val)?;
                let r = int_operand(op, "right", &rhs_val)?;

                eval_int_op(op, l, r)
            }
            InfixOp::Equal => Ok(Value::Bool(values_equal(op, &lhs_val, &rhs_val)?)),
            InfixOp::NotEqual => Ok(Value::Bool(!values_equal(op, &lhs_val, &rhs_val)?)),
            InfixOp::And | InfixOp::Or => {
                let l = self.config.is_truthy(&lhs_val)?;
                let r = self.config.is_truthy(&rhs_val)?;

                Ok(Value::Bool(if op == InfixOp::And { l && r } else { l || r }))
            }
        }
    }
}

fn int_operand(op: InfixOp, side: &str, val: &Value) -> Result<i64> {
    match val {
        Value::Int(i) => Ok(*i),
        v => Err(EvalError::TypeMismatch {
            context: format!("{} operand of {}", side, op),
            expected: Type::Int,
            actual: v.ty(),
        }),
    }
}

fn eval_int_op(op: InfixOp, l: i64, r: i64) -> Result<Value> {
    let overflow = || EvalError::Overflow {
        op: op.op_str(),
        lhs: l,
        rhs: r,
    };

    let res = match op {
        InfixOp::Add => l.checked_add(r).ok_or_else(overflow)?,
        InfixOp::Subtract => l.checked_sub(r).ok_or_else(overflow)?,
        InfixOp::Multiply => l.checked_mul(r).ok_or_else(overflow)?,
        InfixOp::Divide => {
            if r == 0 {
                return Err(EvalError::DivisionByZero);
            }
            l.checked_div(r).ok_or_else(overflow)?
        }
        InfixOp::Mod => {
            if r == 0 {
                return Err(EvalError::DivisionByZero);
            }
            l.checked_rem(r).ok_or_else(overflow)?
        }
        InfixOp::Greater => return Ok(Value::Bool(l > r)),
        InfixOp::Lesser => return Ok(Value::Bool(l < r)),
        _ => {
            return Err(EvalError::MalformedNode(format!(
                "'{}' is not an integer operator",
                op
            )))
        }
    };

    Ok(Value::Int(res))
}

/// Same type tag and same datum. No coercion between types.
fn values_equal(op: InfixOp, lhs: &Value, rhs: &Value) -> Result<bool> {
    match (lhs, rhs) {
        (Value::Hash(_), _) | (_, Value::Hash(_)) => Err(EvalError::Unsupported {
            context: format!("'{}'", op),
            ty: Type::Hash,
        }),
        (l, r) => Ok(l == r),
    }
}

#[cfg(test)]
fn ident(s: &str) -> Identifier {
    Identifier(s.to_string())
}

#[cfg(test)]
fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

#[cfg(test)]
const GABBAR: &str = "Yahan se 50 kos door jab koi mai ka laal rota hai tab uski maa kehti hai, \
                      beta so jaa nahi to Gabbar singh aa jaayega";

#[test]
fn test_literal() {
    crate::init_test_logging();
    let mut scope = Scope::new("root");
    assert_eq!(evaluate(&mut scope, &Node::int(7)), Ok(Value::Int(7)));
    assert_eq!(evaluate(&mut scope, &Node::nil()), Ok(Value::Nil));
    assert!(scope.is_empty());
}

#[test]
fn test_assign_then_lookup() {
    crate::init_test_logging();
    let tests = vec![
        Value::String("honey singh".to_string()),
        Value::Int(20),
        Value::Int(-4),
        Value::Bool(false),
    ];

    for val in tests {
        let mut scope = Scope::new("root");
        let assigned = evaluate(&mut scope, &Node::assign("yo yo", Node::literal(val.clone())));
        assert_eq!(assigned, Ok(val.clone()));
        assert_eq!(evaluate(&mut scope, &Node::lookup("yo yo")), Ok(val));
    }
}

#[test]
fn test_assign_ignores_target_value() {
    let mut scope = Scope::new("root");
    let node = Node::Assign(
        Box::new(Node::Literal {
            name: Some(ident("yo yo")),
            value: Value::Int(20),
        }),
        Box::new(Node::string("honey singh")),
    );
    assert!(evaluate(&mut scope, &node).is_ok());
    assert_eq!(scope.get(&ident("yo yo")), Some(&string("honey singh")));
}

#[test]
fn test_invalid_assign_target() {
    let tests = vec![
        Node::lookup("x"),
        Node::int(3),
        Node::concat(vec![Node::string("x")]),
    ];

    for target in tests {
        let mut scope = Scope::new("root");
        let node = Node::Assign(Box::new(target), Box::new(Node::int(1)));
        assert_eq!(
            evaluate(&mut scope, &node),
            Err(EvalError::InvalidAssignTarget)
        );
        assert!(scope.is_empty());
    }
}

#[test]
fn test_lookup_unbound() {
    let mut scope = Scope::new("root");
    assert_eq!(
        evaluate(&mut scope, &Node::lookup("gabbar")),
        Err(EvalError::NotFound(ident("gabbar")))
    );
    assert!(!scope.contains_local(&ident("gabbar")));

    // Explicit nil reads the same as never bound
    scope.update(&ident("samba"), Value::Nil);
    assert_eq!(
        evaluate(&mut scope, &Node::lookup("samba")),
        Err(EvalError::NotFound(ident("samba")))
    );
}

#[test]
fn test_lookup_vivify_policy() {
    let eval = Eval::new(Config::default().with_vivify_on_lookup(true));
    let mut scope = Scope::new("root");
    assert!(eval.config().vivify_on_lookup());
    assert!(!Eval::default().config().vivify_on_lookup());
    assert_eq!(
        eval.eval(&mut scope, &Node::lookup("gabbar")),
        Err(EvalError::NotFound(ident("gabbar")))
    );
    assert_eq!(scope.get(&ident("gabbar")), Some(&Value::Nil));
}

#[test]
fn test_concat() {
    let mut scope = Scope::new("root");
    let node = Node::concat(vec![
        Node::string("Yahan se "),
        Node::int(50),
        Node::string(" kos door"),
    ]);
    assert_eq!(
        evaluate(&mut scope, &node),
        Ok(string("Yahan se 50 kos door"))
    );

    let node = Node::concat(vec![Node::boolean(true), Node::nil(), Node::boolean(false)]);
    assert_eq!(evaluate(&mut scope, &node), Ok(string("truefalse")));

    assert_eq!(
        evaluate(&mut scope, &Node::concat(vec![])),
        Ok(string(""))
    );
}

#[test]
fn test_concat_stops_at_first_failure() {
    let mut scope = Scope::new("root");
    let node = Node::concat(vec![
        Node::assign("before", Node::int(1)),
        Node::lookup("missing"),
        Node::assign("after", Node::int(2)),
    ]);
    assert_eq!(
        evaluate(&mut scope, &node),
        Err(EvalError::NotFound(ident("missing")))
    );
    assert!(scope.contains_local(&ident("before")));
    assert!(!scope.contains_local(&ident("after")));
}

#[test]
fn test_block() {
    crate::init_test_logging();
    let mut scope = Scope::new("root");
    let node = Node::block(vec![
        Node::assign("mom", Node::string("maa")),
        Node::assign("pachas", Node::int(50)),
        Node::assign(
            "s1",
            Node::concat(vec![
                Node::string("Yahan se "),
                Node::lookup("pachas"),
                Node::string(" kos door "),
            ]),
        ),
        Node::assign(
            "s2",
            Node::concat(vec![
                Node::string("jab koi "),
                Node::string("mai ka laal "),
                Node::string("rota hai "),
            ]),
        ),
        Node::assign(
            "s3",
            Node::concat(vec![
                Node::string("tab uski "),
                Node::lookup("mom"),
                Node::string(" kehti hai, "),
            ]),
        ),
        Node::assign(
            "s4",
            Node::concat(vec![
                Node::lookup("s1"),
                Node::lookup("s2"),
                Node::lookup("s3"),
                Node::string("beta so jaa "),
                Node::string("nahi to Gabbar singh aa jaayega"),
            ]),
        ),
    ]);

    // No return, so the block itself is nil
    assert_eq!(evaluate(&mut scope, &node), Ok(Value::Nil));
    assert_eq!(scope.get(&ident("s4")), Some(&string(GABBAR)));
}

#[test]
fn test_block_return() {
    let mut scope = Scope::new("root");
    let node = Node::block(vec![
        Node::assign("x", Node::int(1)),
        Node::ret(Node::lookup("x")),
        Node::assign("x", Node::int(2)),
    ]);
    assert_eq!(evaluate(&mut scope, &node), Ok(Value::Int(1)));
    assert_eq!(scope.get(&ident("x")), Some(&Value::Int(1)));

    // A bare return is just its inner value
    assert_eq!(
        evaluate(&mut scope, &Node::ret(Node::string("bas"))),
        Ok(string("bas"))
    );
}

#[test]
fn test_block_failure_keeps_prior_effects() {
    let mut scope = Scope::new("root");
    let node = Node::block(vec![
        Node::assign("x", Node::int(1)),
        Node::infix(InfixOp::Divide, Node::int(1), Node::int(0)),
        Node::assign("y", Node::int(2)),
    ]);
    assert_eq!(
        evaluate(&mut scope, &node),
        Err(EvalError::DivisionByZero)
    );
    assert_eq!(scope.get(&ident("x")), Some(&Value::Int(1)));
    assert!(scope.get(&ident("y")).is_none());
}

#[test]
fn test_if() {
    let node = Node::if_else(
        Node::lookup("gabbar_or_samba"),
        vec![Node::assign("dialogue", Node::string("Kitne aadmi the?"))],
        vec![Node::assign("dialogue", Node::string("Do sarkaar"))],
    );
    let tests = vec![
        (Value::Int(1), "Kitne aadmi the?"),
        (Value::Int(0), "Do sarkaar"),
        (string("yes"), "Kitne aadmi the?"),
        (string(""), "Do sarkaar"),
        (Value::Bool(true), "Kitne aadmi the?"),
        (string("HAAN"), "Kitne aadmi the?"),
    ];

    let mut scope = Scope::new("root");
    for (flag, expected) in tests {
        scope.update(&ident("gabbar_or_samba"), flag);
        assert!(evaluate(&mut scope, &node).is_ok());
        assert_eq!(scope.get(&ident("dialogue")), Some(&string(expected)));
    }
}

#[test]
fn test_if_evaluates_one_branch() {
    let mut scope = Scope::new("root");
    let node = Node::if_else(
        Node::boolean(false),
        vec![Node::assign("success", Node::int(1))],
        vec![
            Node::assign("fail", Node::int(1)),
            Node::ret(Node::string("fail")),
        ],
    );
    assert_eq!(evaluate(&mut scope, &node), Ok(string("fail")));
    assert!(scope.get(&ident("success")).is_none());
    assert_eq!(scope.get(&ident("fail")), Some(&Value::Int(1)));

    // Failing condition runs neither branch
    let node = Node::if_else(
        Node::lookup("missing"),
        vec![Node::assign("success", Node::int(1))],
        vec![Node::assign("success", Node::int(2))],
    );
    assert!(evaluate(&mut scope, &node).is_err());
    assert!(scope.get(&ident("success")).is_none());
}

#[test]
fn test_lambda() {
    crate::init_test_logging();
    let mut scope = Scope::new("root");
    scope.update(&ident("pachas"), Value::Int(50));

    let node = Node::lambda(
        vec![
            ("mom", Node::string("maa")),
            (
                "s1",
                Node::concat(vec![
                    Node::string("Yahan se "),
                    Node::lookup("pachas"),
                    Node::string(" kos door "),
                ]),
            ),
        ],
        vec![
            Node::assign(
                "s2",
                Node::concat(vec![
                    Node::string("jab koi "),
                    Node::string("mai ka laal "),
                    Node::string("rota hai "),
                ]),
            ),
            Node::assign(
                "s3",
                Node::concat(vec![
                    Node::string("tab uski "),
                    Node::lookup("mom"),
                    Node::string(" kehti hai, "),
                ]),
            ),
            Node::ret(Node::concat(vec![
                Node::lookup("s1"),
                Node::lookup("s2"),
                Node::lookup("s3"),
                Node::string("beta so jaa "),
                Node::string("nahi to Gabbar singh aa jaayega"),
            ])),
        ],
    );

    assert_eq!(evaluate(&mut scope, &node), Ok(string(GABBAR)));

    // Nothing leaks out of the call
    assert_eq!(scope.len(), 1);
    for name in &["mom", "s1", "s2", "s3"] {
        assert!(scope.get(&ident(name)).is_none(), "{} leaked", name);
    }
}

#[test]
fn test_lambda_params_see_caller_only() {
    let mut scope = Scope::new("root");
    let node = Node::lambda(
        vec![("a", Node::int(1)), ("b", Node::lookup("a"))],
        vec![Node::ret(Node::lookup("b"))],
    );
    assert_eq!(
        evaluate(&mut scope, &node),
        Err(EvalError::NotFound(ident("a")))
    );
}

#[test]
fn test_lambda_shadows_caller() {
    let mut scope = Scope::new("root");
    scope.update(&ident("x"), Value::Int(1));
    let node = Node::lambda(
        vec![],
        vec![
            Node::assign(
                "x",
                Node::infix(InfixOp::Add, Node::lookup("x"), Node::int(1)),
            ),
            Node::ret(Node::lookup("x")),
        ],
    );
    assert_eq!(evaluate(&mut scope, &node), Ok(Value::Int(2)));
    assert_eq!(scope.get(&ident("x")), Some(&Value::Int(1)));

    // Empty body is nil
    assert_eq!(
        evaluate(&mut scope, &Node::lambda(vec![], vec![])),
        Ok(Value::Nil)
    );
}

#[test]
fn test_lambda_duplicate_param() {
    let mut scope = Scope::new("root");
    let node = Node::lambda(
        vec![("a", Node::int(1)), ("a", Node::int(2))],
        vec![Node::ret(Node::lookup("a"))],
    );
    assert!(matches!(
        evaluate(&mut scope, &node),
        Err(EvalError::MalformedNode(_))
    ));
}

#[test]
fn test_infix() {
    let tests = vec![
        (InfixOp::Add, Value::Int(5), Value::Int(5), Value::Int(10)),
        (InfixOp::Subtract, Value::Int(100), Value::Int(3), Value::Int(97)),
        (InfixOp::Multiply, Value::Int(100), Value::Int(3), Value::Int(300)),
        (InfixOp::Divide, Value::Int(99), Value::Int(3), Value::Int(33)),
        (InfixOp::Divide, Value::Int(100), Value::Int(3), Value::Int(33)),
        (InfixOp::Mod, Value::Int(100), Value::Int(3), Value::Int(1)),
        (InfixOp::Greater, Value::Int(3), Value::Int(3), Value::Bool(false)),
        (InfixOp::Greater, Value::Int(4), Value::Int(3), Value::Bool(true)),
        (InfixOp::Lesser, Value::Int(1), Value::Int(3), Value::Bool(true)),
        (InfixOp::Equal, Value::Int(1), Value::Int(1), Value::Bool(true)),
        (InfixOp::Equal, string("a"), string("a"), Value::Bool(true)),
        (InfixOp::Equal, Value::Nil, Value::Nil, Value::Bool(true)),
        (InfixOp::Equal, Value::Bool(true), Value::Bool(false), Value::Bool(false)),
        (InfixOp::NotEqual, Value::Bool(true), Value::Bool(false), Value::Bool(true)),
        (InfixOp::And, Value::Int(1), string("yes"), Value::Bool(true)),
        (InfixOp::And, Value::Int(1), Value::Nil, Value::Bool(false)),
        (InfixOp::Or, Value::Int(0), string("sure"), Value::Bool(true)),
        (InfixOp::Or, Value::Bool(false), string("no"), Value::Bool(false)),
    ];

    let mut scope = Scope::new("root");
    for (op, l, r, expected) in tests {
        let node = Node::infix(op, Node::literal(l), Node::literal(r));
        assert_eq!(evaluate(&mut scope, &node), Ok(expected), "{:?}", node);
    }
}

#[test]
fn test_equality_across_types() {
    let mut scope = Scope::new("root");
    let pairs = vec![
        (Value::Int(1), string("1")),
        (Value::Int(1), Value::Bool(true)),
        (Value::Int(0), Value::Nil),
        (string("true"), Value::Bool(true)),
        (string(""), Value::Nil),
    ];

    for (l, r) in pairs {
        let eq = Node::infix(InfixOp::Equal, Node::literal(l.clone()), Node::literal(r.clone()));
        let ne = Node::infix(InfixOp::NotEqual, Node::literal(l), Node::literal(r));
        assert_eq!(evaluate(&mut scope, &eq), Ok(Value::Bool(false)));
        assert_eq!(evaluate(&mut scope, &ne), Ok(Value::Bool(true)));
    }
}

#[test]
fn test_division_by_zero() {
    let mut scope = Scope::new("root");
    for op in &[InfixOp::Divide, InfixOp::Mod] {
        let node = Node::infix(*op, Node::int(50), Node::int(0));
        assert_eq!(
            evaluate(&mut scope, &node),
            Err(EvalError::DivisionByZero)
        );
    }
}

#[test]
fn test_overflow() {
    let mut scope = Scope::new("root");
    let tests = vec![
        (InfixOp::Add, i64::MAX, 1),
        (InfixOp::Subtract, i64::MIN, 1),
        (InfixOp::Multiply, i64::MAX, 2),
        (InfixOp::Divide, i64::MIN, -1),
        (InfixOp::Mod, i64::MIN, -1),
    ];

    for (op, l, r) in tests {
        let node = Node::infix(op, Node::int(l), Node::int(r));
        assert!(
            matches!(evaluate(&mut scope, &node), Err(EvalError::Overflow { .. })),
            "{:?}",
            node
        );
    }
}

#[test]
fn test_infix_type_errors() {
    let mut scope = Scope::new("root");

    let node = Node::infix(InfixOp::Add, Node::boolean(true), Node::int(3));
    assert_eq!(
        evaluate(&mut scope, &node),
        Err(EvalError::TypeMismatch {
            context: "left operand of +".to_string(),
            expected: Type::Int,
            actual: Type::Bool,
        })
    );

    let node = Node::infix(InfixOp::Lesser, Node::int(1), Node::string("str"));
    assert_eq!(
        evaluate(&mut scope, &node),
        Err(EvalError::TypeMismatch {
            context: "right operand of <".to_string(),
            expected: Type::Int,
            actual: Type::String,
        })
    );

    // Nil is just another non-int operand
    let node = Node::infix(InfixOp::Add, Node::nil(), Node::int(1));
    assert_eq!(
        evaluate(&mut scope, &node),
        Err(EvalError::TypeMismatch {
            context: "left operand of +".to_string(),
            expected: Type::Int,
            actual: Type::Nil,
        })
    );

    // A block or lambda without a return yields nil
    let node = Node::infix(InfixOp::Multiply, Node::int(2), Node::block(vec![]));
    assert_eq!(
        evaluate(&mut scope, &node),
        Err(EvalError::TypeMismatch {
            context: "right operand of *".to_string(),
            expected: Type::Int,
            actual: Type::Nil,
        })
    );

    let node = Node::infix(InfixOp::Greater, Node::int(1), Node::lambda(vec![], vec![]));
    assert_eq!(
        evaluate(&mut scope, &node),
        Err(EvalError::TypeMismatch {
            context: "right operand of >".to_string(),
            expected: Type::Int,
            actual: Type::Nil,
        })
    );

    // Left is evaluated before right, and failures stop evaluation
    let node = Node::infix(
        InfixOp::Add,
        Node::lookup("missing"),
        Node::assign("side_effect", Node::int(1)),
    );
    assert!(evaluate(&mut scope, &node).is_err());
    assert!(scope.get(&ident("side_effect")).is_none());
}

#[test]
fn test_hash_is_rejected() {
    let mut scope = Scope::new("root");
    let hash = || Node::literal(Value::Hash(vec![]));

    // Hashes can still be passed around
    assert!(evaluate(&mut scope, &Node::assign("h", hash())).is_ok());
    assert_eq!(
        evaluate(&mut scope, &Node::lookup("h")),
        Ok(Value::Hash(vec![]))
    );

    let tests = vec![
        Node::infix(InfixOp::Equal, hash(), hash()),
        Node::infix(InfixOp::NotEqual, Node::int(1), hash()),
        Node::infix(InfixOp::And, hash(), Node::boolean(false)),
        Node::infix(InfixOp::Or, Node::boolean(true), hash()),
        Node::concat(vec![Node::string("x"), hash()]),
        Node::if_else(hash(), vec![], vec![]),
    ];

    for node in tests {
        assert!(
            matches!(
                evaluate(&mut scope, &node),
                Err(EvalError::Unsupported { ty: Type::Hash, .. })
            ),
            "{:?}",
            node
        );
    }
}

#[test]
fn test_depth_limit() {
    let eval = Eval::new(Config::default().with_max_depth(32));
    let mut scope = Scope::new("root");

    let mut node = Node::int(1);
    for _ in 0..16 {
        node = Node::ret(node);
    }
    assert_eq!(eval.eval(&mut scope, &node), Ok(Value::Int(1)));

    for _ in 0..64 {
        node = Node::ret(node);
    }
    assert_eq!(
        eval.eval(&mut scope, &node),
        Err(EvalError::DepthExceeded { limit: 32 })
    );
}

#[test]
fn test_deep_nesting_within_default_limit() {
    let mut scope = Scope::new("root");
    let mut node = Node::int(0);
    for _ in 0..1000 {
        node = Node::infix(InfixOp::Add, node, Node::int(1));
    }
    assert_eq!(evaluate(&mut scope, &node), Ok(Value::Int(1000)));
}
