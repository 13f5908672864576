use log::info;

use crate::lang::ast::Node;
use crate::lang::error::Result;
use crate::lang::eval::Eval;
use crate::lang::scope::Scope;
use crate::lang::truthiness::Config;
use crate::lang::value::Value;

/// A root scope paired with an evaluator
///
/// Bindings made by one call to `eval` are visible to the next, which is what a host running a
/// session of statements usually wants.
pub struct Runtime {
    root: Scope<'static>,
    eval: Eval,
}

impl Runtime {
    pub fn new(config: Config) -> Self {
        let eval = Eval::new(config);
        info!(
            "starting runtime (max_depth={}, vivify_on_lookup={})",
            eval.config().max_depth(),
            eval.config().vivify_on_lookup()
        );

        Self {
            root: Scope::new("root"),
            eval,
        }
    }

    pub fn config(&self) -> &Config {
        self.eval.config()
    }

    pub fn eval(&mut self, node: &Node) -> Result<Value> {
        self.eval.eval(&mut self.root, node)
    }

    pub fn scope(&self) -> &Scope<'static> {
        &self.root
    }

    pub fn scope_mut(&mut self) -> &mut Scope<'static> {
        &mut self.root
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new(Config::default())
    }
}

#[cfg(test)]
use crate::lang::{ast::InfixOp, error::EvalError};

#[test]
fn test_bindings_persist() -> anyhow::Result<()> {
    crate::init_test_logging();
    let mut rt = Runtime::default();

    rt.eval(&Node::assign("x", Node::int(40)))?;
    rt.eval(&Node::assign(
        "x",
        Node::infix(InfixOp::Add, Node::lookup("x"), Node::int(2)),
    ))?;

    assert_eq!(rt.eval(&Node::lookup("x"))?, Value::Int(42));
    assert_eq!(rt.scope().name(), "root");
    assert_eq!(rt.scope().len(), 1);

    Ok(())
}

#[test]
fn test_errors_leave_session_usable() -> anyhow::Result<()> {
    let mut rt = Runtime::new(
        Config::default()
            .with_truthy_words(vec!["ja"])
            .with_max_depth(64),
    );
    assert_eq!(rt.config().max_depth(), 64);
    assert!(!rt.config().vivify_on_lookup());

    rt.scope_mut()
        .update(&"flag".into(), Value::String("Ja".to_string()));

    assert_eq!(
        rt.eval(&Node::infix(InfixOp::Mod, Node::int(1), Node::int(0))),
        Err(EvalError::DivisionByZero)
    );

    let out = rt.eval(&Node::if_else(
        Node::lookup("flag"),
        vec![Node::ret(Node::string("success"))],
        vec![Node::ret(Node::string("fail"))],
    ))?;
    assert_eq!(out, Value::String("success".to_string()));

    Ok(())
}
