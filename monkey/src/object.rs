use crate::{
    ast::{BlockStatement, Identifier},
    env::Env,
    eval,
    prelude::*,
};
use rustc_hash::{FxHashMap, FxHasher};
use std::{
    cell::RefCell,
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};
use variantly::Variantly;

/// Builds an [`Object::Error`] from a format string.
#[macro_export]
macro_rules! new_error {
    ($($arg:tt)*) => {
        $crate::object::Object::Error(format!($($arg)*))
    };
}

pub use new_error;

/// Type tag of an [`Object`], as shown in runtime error messages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Null,
    Array,
    Hash,
    Function,
    Builtin,
    ReturnValue,
    Error,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "INTEGER",
            Self::Boolean => "BOOLEAN",
            Self::String => "STRING",
            Self::Null => "NULL",
            Self::Array => "ARRAY",
            Self::Hash => "HASH",
            Self::Function => "FUNCTION",
            Self::Builtin => "BUILTIN",
            Self::ReturnValue => "RETURN_VALUE",
            Self::Error => "ERROR",
        })
    }
}

pub trait Call {
    fn call(&self, args: Vec<Object>) -> Object;
}

pub type BuiltinFn = fn(&[Object]) -> Object;

/// A native function from [`crate::builtins`].
#[derive(Debug, Copy, Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Call for Builtin {
    fn call(&self, args: Vec<Object>) -> Object {
        (self.func)(&args)
    }
}

/// A closure: parameters and body plus the environment it was created in.
#[derive(Clone)]
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: Rc<BlockStatement>,
    pub env: Rc<RefCell<Env>>,
}

impl Call for Function {
    fn call(&self, args: Vec<Object>) -> Object {
        {
            let passed = args.len();
            let required = self.parameters.len();
            if passed != required {
                return new_error!("wrong number of arguments. got={passed}, want={required}");
            }
        };
        let mut eval_env = Env::child(self.env.clone());
        for (param, val) in self.parameters.iter().zip(args) {
            eval_env.set(param.name(), val);
        }
        let eval_env = Rc::new(RefCell::new(eval_env));
        match eval::eval(self.body.as_ref(), &eval_env) {
            Object::ReturnValue(inner) => *inner,
            other => other,
        }
    }
}

// the captured env usually holds this very function, so leave it out
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.body, &other.body) && Rc::ptr_eq(&self.env, &other.env)
    }
}

/// Type-tagged hash of an integer, boolean or string, used as the key of [`Object::Hash`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashKey {
    pub kind: ObjectType,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

pub type HashPairs = FxHashMap<HashKey, HashPair>;

#[derive(Variantly, Debug, Clone, PartialEq)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Null,
    Array(Rc<Vec<Object>>),
    Hash(Rc<HashPairs>),
    Function(Rc<Function>),
    Builtin(Builtin),
    /// control signal carrying a `return`ed value out of nested blocks
    ReturnValue(Box<Object>),
    /// control signal carrying a runtime diagnostic
    Error(String),
}

impl Object {
    pub fn kind(&self) -> ObjectType {
        match self {
            Self::Integer(_) => ObjectType::Integer,
            Self::Boolean(_) => ObjectType::Boolean,
            Self::String(_) => ObjectType::String,
            Self::Null => ObjectType::Null,
            Self::Array(_) => ObjectType::Array,
            Self::Hash(_) => ObjectType::Hash,
            Self::Function(_) => ObjectType::Function,
            Self::Builtin(_) => ObjectType::Builtin,
            Self::ReturnValue(_) => ObjectType::ReturnValue,
            Self::Error(_) => ObjectType::Error,
        }
    }

    /// Only `false` and `null` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false) | Self::Null)
    }

    /// `None` for every type that cannot be used as a hash key.
    pub fn hash_key(&self) -> Option<HashKey> {
        let value = match self {
            Self::Integer(i) => *i as u64,
            Self::Boolean(b) => u64::from(*b),
            Self::String(s) => {
                let mut hasher = FxHasher::default();
                s.hash(&mut hasher);
                hasher.finish()
            }
            _ => return None,
        };
        Some(HashKey {
            kind: self.kind(),
            value,
        })
    }

    pub fn new_array(elements: Vec<Object>) -> Self {
        Self::Array(Rc::new(elements))
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for Object {
    fn from(value: String) -> Self {
        Self::String(value.into())
    }
}

impl From<Vec<Object>> for Object {
    fn from(value: Vec<Object>) -> Self {
        Self::new_array(value)
    }
}

impl From<Builtin> for Object {
    fn from(value: Builtin) -> Self {
        Self::Builtin(value)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn({}) {}", self.parameters.iter().join(", "), self.body)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::String(s) => f.write_str(s),
            Self::Null => f.write_str("null"),
            Self::Array(elements) => write!(f, "[{}]", elements.iter().join(", ")),
            Self::Hash(pairs) => write!(
                f,
                "{{{}}}",
                pairs
                    .iter()
                    .sorted_by_key(|(key, _)| **key)
                    .map(|(_, pair)| format!("{}: {}", pair.key, pair.value))
                    .join(", ")
            ),
            Self::Function(func) => write!(f, "{func}"),
            Self::Builtin(_) => f.write_str("builtin function"),
            Self::ReturnValue(inner) => write!(f, "{inner}"),
            Self::Error(msg) => write!(f, "ERROR: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn string_hash_keys_follow_content() {
        let hello1 = Object::from("Hello World");
        let hello2 = Object::from("Hello World");
        let diff1 = Object::from("My name is johnny");
        let diff2 = Object::from("My name is johnny");

        assert_eq!(hello1.hash_key(), hello2.hash_key());
        assert_eq!(diff1.hash_key(), diff2.hash_key());
        assert_ne!(hello1.hash_key(), diff1.hash_key());
    }

    #[test]
    fn hash_keys_are_type_tagged() {
        let one = Object::from(1).hash_key();
        let truth = Object::from(true).hash_key();
        assert_eq!(one.map(|k| k.value), truth.map(|k| k.value));
        assert_ne!(one, truth);
    }

    #[test]
    fn only_scalars_are_hashable() {
        assert!(Object::Null.hash_key().is_none());
        assert!(Object::new_array(vec![]).hash_key().is_none());
        assert!(Object::Error("boom".into()).hash_key().is_none());
    }

    #[test]
    fn truthiness() {
        assert!(Object::from(0).is_truthy());
        assert!(Object::from("").is_truthy());
        assert!(!Object::from(false).is_truthy());
        assert!(!Object::Null.is_truthy());
    }

    #[test]
    fn renders_values() {
        let arr = Object::new_array(vec![1.into(), "two".into(), Object::Null]);
        assert_eq!(arr.to_string(), "[1, two, null]");
        assert_eq!(Object::from(-7).to_string(), "-7");
        assert_eq!(Object::Error("oops".into()).to_string(), "ERROR: oops");
        assert_eq!(
            Object::ReturnValue(Box::new(true.into())).to_string(),
            "true"
        );
    }

    #[test]
    fn renders_hash() {
        let pairs: HashPairs = [Object::from(2), Object::from(1)]
            .into_iter()
            .map(|key| {
                let hash_key = key.hash_key().unwrap();
                (hash_key, HashPair { value: key.clone(), key })
            })
            .collect();
        assert_eq!(Object::Hash(Rc::new(pairs)).to_string(), "{1: 1, 2: 2}");
    }

    #[test]
    fn type_names() {
        assert_eq!(Object::from("x").kind().to_string(), "STRING");
        assert_eq!(
            Object::ReturnValue(Box::new(Object::Null)).kind().to_string(),
            "RETURN_VALUE"
        );
    }
}
