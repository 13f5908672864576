use std::collections::BTreeMap;

use log::debug;

use crate::lang::ast::Identifier;
use crate::lang::value::Value;

static NIL: Value = Value::Nil;

/// Lexical environment
///
/// Reads walk outwards through the parent chain. Writes always land in the innermost scope, so a
/// child can shadow but never modify its parent's bindings.
pub struct Scope<'p> {
    name: String,
    parent: Option<&'p Scope<'p>>,
    bindings: BTreeMap<Identifier, Value>,
}

impl Scope<'static> {
    /// Create a root scope
    pub fn new(name: &str) -> Self {
        debug!("creating root scope '{}'", name);

        Scope {
            name: name.to_string(),
            parent: None,
            bindings: BTreeMap::default(),
        }
    }
}

impl<'p> Scope<'p> {
    pub fn child(name: &str, parent: &'p Scope<'p>) -> Self {
        debug!("creating scope '{}' under '{}'", name, parent.name);

        Scope {
            name: name.to_string(),
            parent: Some(parent),
            bindings: BTreeMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Scope<'p>> {
        self.parent
    }

    /// Number of scopes between this one and the root
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cur = self.parent;
        while let Some(scope) = cur {
            depth += 1;
            cur = scope.parent;
        }

        depth
    }

    /// Number of bindings held directly by this scope
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn contains_local(&self, ident: &Identifier) -> bool {
        self.bindings.contains_key(ident)
    }

    pub fn get(&self, ident: &Identifier) -> Option<&Value> {
        let mut cur = Some(self);
        while let Some(scope) = cur {
            if let Some(val) = scope.bindings.get(ident) {
                return Some(val);
            }
            cur = scope.parent;
        }

        None
    }

    /// Auto-vivifying read
    ///
    /// A name bound nowhere in the chain gets a nil binding created in this scope.
    pub fn lookup(&mut self, ident: &Identifier) -> &Value {
        if self.get(ident).is_none() {
            debug!("auto-vivifying '{}' in scope '{}'", ident, self.name);
            self.bindings.insert(ident.clone(), Value::Nil);
        }

        self.get(ident).unwrap_or(&NIL)
    }

    /// Bind `ident` to `val` in this scope, replacing any previous binding
    pub fn update(&mut self, ident: &Identifier, val: Value) -> &Value {
        let slot = self.bindings.entry(ident.clone()).or_default();
        *slot = val;

        slot
    }
}

#[cfg(test)]
fn ident(s: &str) -> Identifier {
    Identifier(s.to_string())
}

#[test]
fn test_update_then_get() {
    let mut root = Scope::new("root");
    assert!(root.get(&ident("yo yo")).is_none());

    let val = root.update(&ident("yo yo"), Value::String("honey singh".to_string()));
    assert_eq!(val, &Value::String("honey singh".to_string()));
    assert_eq!(
        root.get(&ident("yo yo")),
        Some(&Value::String("honey singh".to_string()))
    );

    root.update(&ident("yo yo"), Value::Int(20));
    assert_eq!(root.get(&ident("yo yo")), Some(&Value::Int(20)));
    assert_eq!(root.len(), 1);
}

#[test]
fn test_lookup_vivifies() {
    let mut root = Scope::new("root");
    assert!(root.is_empty());
    assert_eq!(root.lookup(&ident("missing")), &Value::Nil);
    assert!(root.contains_local(&ident("missing")));
    assert_eq!(root.len(), 1);
}

#[test]
fn test_parent_chain() {
    let mut root = Scope::new("root");
    root.update(&ident("pachas"), Value::Int(50));

    let mut child = Scope::child("child", &root);
    assert_eq!(child.depth(), 1);
    assert_eq!(child.parent().map(|p| p.name()), Some("root"));
    assert_eq!(child.get(&ident("pachas")), Some(&Value::Int(50)));

    // Reads through the chain don't create anything locally
    assert_eq!(child.lookup(&ident("pachas")), &Value::Int(50));
    assert!(!child.contains_local(&ident("pachas")));

    // Misses vivify in the innermost scope only
    child.lookup(&ident("nahi"));
    assert!(child.contains_local(&ident("nahi")));

    // Writes shadow
    child.update(&ident("pachas"), Value::Int(51));
    assert_eq!(child.get(&ident("pachas")), Some(&Value::Int(51)));
    drop(child);

    assert_eq!(root.get(&ident("pachas")), Some(&Value::Int(50)));
    assert!(root.get(&ident("nahi")).is_none());
}
