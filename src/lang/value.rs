use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::lang::error::{EvalError, Result};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Type {
    Int,
    String,
    Bool,
    Hash,
    Nil,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Int => "int",
            Type::String => "string",
            Type::Bool => "bool",
            Type::Hash => "hash",
            Type::Nil => "nil",
        };

        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct HashKey {
    pub ty: Type,
    pub hash: u64,
}

/// Entry of a hash value
///
/// Hashes can be constructed and carried around but no operation is defined over them yet
#[derive(Debug, PartialEq, Clone)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Int(i64),
    String(String),
    Bool(bool),
    Hash(Vec<HashPair>),
    Nil,
}

impl Default for Value {
    fn default() -> Self {
        Value::Nil
    }
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::String(_) => Type::String,
            Value::Bool(_) => Type::Bool,
            Value::Hash(_) => Type::Hash,
            Value::Nil => Type::Nil,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn hash_key(&self) -> Result<HashKey> {
        let hash = match self {
            Value::Int(i) => *i as u64,
            Value::Bool(b) => u64::from(*b),
            Value::String(s) => {
                let mut hasher = DefaultHasher::new();
                s.hash(&mut hasher);
                hasher.finish()
            }
            v => {
                return Err(EvalError::Unsupported {
                    context: "hash key".to_string(),
                    ty: v.ty(),
                })
            }
        };

        Ok(HashKey {
            ty: self.ty(),
            hash,
        })
    }
}

/// Text form used by concatenation. Nil renders as nothing.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => {
                write!(f, "{}", if *b { "true" } else { "false" })
            }
            Value::Hash(pairs) => {
                write!(f, "{{")?;
                for (i, pair) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                write!(f, "}}")
            }
            Value::Nil => Ok(()),
        }
    }
}

#[test]
fn test_display() {
    assert_eq!(Value::Int(-50).to_string(), "-50");
    assert_eq!(Value::String("kos".to_string()).to_string(), "kos");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::Bool(false).to_string(), "false");
    assert_eq!(Value::Nil.to_string(), "");
}

#[test]
fn test_ty() {
    assert_eq!(Value::Int(1).ty(), Type::Int);
    assert_eq!(Value::Hash(vec![]).ty(), Type::Hash);
    assert_eq!(Value::default().ty(), Type::Nil);
    assert_eq!(Type::String.to_string(), "string");
}

#[test]
fn test_hash_key() {
    let one = Value::Int(1).hash_key().expect("int is hashable");
    assert_eq!(one, HashKey { ty: Type::Int, hash: 1 });

    let t = Value::Bool(true).hash_key().expect("bool is hashable");
    assert_eq!(t.hash, 1);

    // Same text hashes the same; tags keep "1" and 1 apart
    let s1 = Value::String("1".to_string()).hash_key().unwrap();
    let s2 = Value::String("1".to_string()).hash_key().unwrap();
    assert_eq!(s1, s2);
    assert_ne!(s1.ty, one.ty);

    assert!(matches!(
        Value::Nil.hash_key(),
        Err(EvalError::Unsupported { ty: Type::Nil, .. })
    ));
    assert!(matches!(
        Value::Hash(vec![]).hash_key(),
        Err(EvalError::Unsupported { ty: Type::Hash, .. })
    ));
}

#[test]
fn test_accessors() {
    assert_eq!(Value::Int(3).as_int(), Some(3));
    assert_eq!(Value::Bool(true).as_int(), None);
    assert_eq!(Value::Bool(true).as_bool(), Some(true));
    assert_eq!(Value::String("maa".to_string()).as_str(), Some("maa"));
    assert!(Value::Nil.is_nil());
    assert!(!Value::Int(0).is_nil());
}
