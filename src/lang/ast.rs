use std::fmt;

use crate::lang::value::Value;

#[derive(Debug, PartialEq, Hash, PartialOrd, Ord, Eq, Clone)]
pub struct Identifier(pub String);

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier(s.to_string())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InfixOp {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Mod,
    /// `>`
    Greater,
    /// `<`
    Lesser,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl InfixOp {
    pub fn op_str(&self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Subtract => "-",
            InfixOp::Multiply => "*",
            InfixOp::Divide => "/",
            InfixOp::Mod => "%",
            InfixOp::Greater => ">",
            InfixOp::Lesser => "<",
            InfixOp::Equal => "==",
            InfixOp::NotEqual => "!=",
            InfixOp::And => "&&",
            InfixOp::Or => "||",
        }
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op_str())
    }
}

/// An ordered sequence of nodes
///
/// Evaluates to the value of its first direct `Return` child, or nil if there is none
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Block(pub Vec<Node>);

impl Block {
    pub fn new(nodes: Vec<Node>) -> Self {
        Block(nodes)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Node {
    /// An already resolved value
    ///
    /// `name` is only meaningful when the literal is the target of an `Assign`
    Literal {
        name: Option<Identifier>,
        value: Value,
    },
    Lookup(Identifier),
    Concat(Vec<Node>),
    /// (target, value)
    Assign(Box<Node>, Box<Node>),
    Block(Block),
    /// (condition, success, fail)
    If(Box<Node>, Block, Block),
    /// (operator, left, right)
    Infix(InfixOp, Box<Node>, Box<Node>),
    Return(Box<Node>),
    /// (params, body)
    ///
    /// Parameter defaults are evaluated in the calling scope
    Lambda(Vec<(Identifier, Node)>, Block),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Literal { .. } => "literal",
            Node::Lookup(_) => "lookup",
            Node::Concat(_) => "concat",
            Node::Assign(_, _) => "assign",
            Node::Block(_) => "block",
            Node::If(_, _, _) => "if",
            Node::Infix(_, _, _) => "infix",
            Node::Return(_) => "return",
            Node::Lambda(_, _) => "lambda",
        }
    }

    pub fn literal(value: Value) -> Self {
        Node::Literal { name: None, value }
    }

    pub fn int(i: i64) -> Self {
        Node::literal(Value::Int(i))
    }

    pub fn string(s: &str) -> Self {
        Node::literal(Value::String(s.to_string()))
    }

    pub fn boolean(b: bool) -> Self {
        Node::literal(Value::Bool(b))
    }

    pub fn nil() -> Self {
        Node::literal(Value::Nil)
    }

    /// A nil literal carrying a binding name, suitable as an assignment target
    pub fn named(name: &str) -> Self {
        Node::Literal {
            name: Some(name.into()),
            value: Value::Nil,
        }
    }

    pub fn lookup(name: &str) -> Self {
        Node::Lookup(name.into())
    }

    pub fn concat(nodes: Vec<Node>) -> Self {
        Node::Concat(nodes)
    }

    pub fn assign(name: &str, value: Node) -> Self {
        Node::Assign(Box::new(Node::named(name)), Box::new(value))
    }

    pub fn block(nodes: Vec<Node>) -> Self {
        Node::Block(Block::new(nodes))
    }

    pub fn if_else(condition: Node, success: Vec<Node>, fail: Vec<Node>) -> Self {
        Node::If(Box::new(condition), Block::new(success), Block::new(fail))
    }

    pub fn infix(op: InfixOp, left: Node, right: Node) -> Self {
        Node::Infix(op, Box::new(left), Box::new(right))
    }

    pub fn ret(node: Node) -> Self {
        Node::Return(Box::new(node))
    }

    pub fn lambda(params: Vec<(&str, Node)>, body: Vec<Node>) -> Self {
        let params = params
            .into_iter()
            .map(|(name, default)| (Identifier::from(name), default))
            .collect();

        Node::Lambda(params, Block::new(body))
    }
}

#[test]
fn test_kind() {
    assert_eq!(Node::int(1).kind(), "literal");
    assert_eq!(Node::lookup("x").kind(), "lookup");
    assert_eq!(Node::assign("x", Node::int(1)).kind(), "assign");
    assert_eq!(Node::ret(Node::nil()).kind(), "return");
    assert_eq!(Node::lambda(vec![], vec![]).kind(), "lambda");
}

#[test]
fn test_assign_target_is_named_literal() {
    match Node::assign("x", Node::int(1)) {
        Node::Assign(target, _) => assert_eq!(
            *target,
            Node::Literal {
                name: Some(Identifier("x".to_string())),
                value: Value::Nil
            }
        ),
        _ => panic!("expected assign"),
    }
}

#[test]
fn test_op_str() {
    assert_eq!(InfixOp::Mod.op_str(), "%");
    assert_eq!(InfixOp::NotEqual.to_string(), "!=");
}
