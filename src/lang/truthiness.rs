//! Truthiness coercion and the knobs that steer evaluation.
//!
//! Strings are truthy when they appear (case-insensitively) in a configurable vocabulary. The
//! vocabulary lives in `Config` rather than in shared state so that two evaluators can disagree
//! about what "yes" means.

use std::collections::BTreeSet;

use lazy_static::lazy_static;

use crate::lang::error::{EvalError, Result};
use crate::lang::value::Value;

const DEFAULT_MAX_DEPTH: usize = 2048;

lazy_static! {
    pub static ref DEFAULT_TRUTHY_WORDS: Vec<&'static str> =
        vec!["true", "yes", "ok", "sure", "haan", "si"];
}

/// Evaluation settings
///
/// By default a `Lookup` of an unbound name is a pure read. The older behavior, where the read
/// creates a nil binding in the innermost scope before failing with `NotFound`, is opt-in via
/// `with_vivify_on_lookup(true)`.
#[derive(Debug, Clone)]
pub struct Config {
    truthy_words: BTreeSet<String>,
    max_depth: usize,
    vivify_on_lookup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            truthy_words: DEFAULT_TRUTHY_WORDS.iter().map(|w| w.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
            vivify_on_lookup: false,
        }
    }
}

impl Config {
    /// Replace the truthy vocabulary. Words are matched case-insensitively.
    pub fn with_truthy_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.truthy_words = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// When set, looking up an unbound name leaves a nil binding behind in the innermost scope
    pub fn with_vivify_on_lookup(mut self, vivify: bool) -> Self {
        self.vivify_on_lookup = vivify;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn vivify_on_lookup(&self) -> bool {
        self.vivify_on_lookup
    }

    pub fn is_truthy(&self, val: &Value) -> Result<bool> {
        let truthy = match val {
            Value::String(s) => self.truthy_words.contains(&s.to_lowercase()),
            Value::Int(i) => *i > 0,
            Value::Bool(b) => *b,
            Value::Nil => false,
            Value::Hash(_) => {
                return Err(EvalError::Unsupported {
                    context: "truthiness".to_string(),
                    ty: val.ty(),
                })
            }
        };

        Ok(truthy)
    }
}

#[test]
fn test_default_vocabulary() {
    let config = Config::default();
    let tests = vec![
        (Value::String("true".to_string()), true),
        (Value::String("YES".to_string()), true),
        (Value::String("Ok".to_string()), true),
        (Value::String("sure".to_string()), true),
        (Value::String("haan".to_string()), true),
        (Value::String("si".to_string()), true),
        (Value::String("".to_string()), false),
        (Value::String("no".to_string()), false),
        (Value::String("nahi".to_string()), false),
        (Value::Int(1), true),
        (Value::Int(50), true),
        (Value::Int(0), false),
        (Value::Int(-3), false),
        (Value::Bool(true), true),
        (Value::Bool(false), false),
        (Value::Nil, false),
    ];

    for (val, expected) in tests {
        assert_eq!(
            config.is_truthy(&val).expect("coercion failed"),
            expected,
            "{:?}",
            val
        );
    }
}

#[test]
fn test_custom_vocabulary() {
    let config = Config::default().with_truthy_words(vec!["Ja", "oui"]);
    assert!(config.is_truthy(&Value::String("ja".to_string())).unwrap());
    assert!(config.is_truthy(&Value::String("OUI".to_string())).unwrap());
    assert!(!config.is_truthy(&Value::String("yes".to_string())).unwrap());

    // Other evaluators are unaffected
    assert!(Config::default()
        .is_truthy(&Value::String("yes".to_string()))
        .unwrap());
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert!(!config.vivify_on_lookup());
    assert_eq!(config.max_depth(), DEFAULT_MAX_DEPTH);

    let config = config.with_vivify_on_lookup(true).with_max_depth(8);
    assert!(config.vivify_on_lookup());
    assert_eq!(config.max_depth(), 8);
}

#[test]
fn test_hash_is_rejected() {
    assert!(matches!(
        Config::default().is_truthy(&Value::Hash(vec![])),
        Err(EvalError::Unsupported { .. })
    ));
}
