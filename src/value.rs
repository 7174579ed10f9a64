//! Dynamic values flowing through the store.
//!
//! State slices and dispatch payloads are `Value`s: a record-shaped tree of
//! scalars, lists and nested records, with two escape hatches — `Opaque` for
//! arbitrary typed data that only middleware knows how to unwrap, and
//! `Function` for callable payloads (see the thunk middleware). Scalars are
//! held by value; lists, records, opaque data and functions are shared
//! behind `Rc`, which is what gives [`Value::identical`] its meaning.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::StoreError;
use crate::middleware::MiddlewareApi;

/// A callable payload: invoked by the thunk middleware with the restricted
/// store API instead of being forwarded to the reducer.
pub type ThunkFn = dyn Fn(&MiddlewareApi) -> Result<Value, StoreError>;

/// A dynamic value: one node of the state tree, or a dispatch payload.
#[derive(Clone)]
pub enum Value {
    /// The absent value. A reducer receives it in place of missing slice
    /// state and must never return it.
    Undefined,
    /// An intentionally empty value, distinct from `Undefined`.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Rc<Vec<Value>>),
    /// A plain record: the only payload shape the base dispatch accepts.
    Record(Rc<BTreeMap<String, Value>>),
    /// Typed data with no record shape. Base dispatch rejects it; middleware
    /// may downcast and translate it before it gets that far.
    Opaque(Rc<dyn Any>),
    /// A callable payload for middleware such as [`crate::thunk`].
    Function(Rc<ThunkFn>),
}

impl Value {
    /// Build a record from key/value entries.
    pub fn record<K, I>(entries: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Record(Rc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Build a list from items.
    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Value {
        Value::List(Rc::new(items.into_iter().collect()))
    }

    /// Wrap arbitrary typed data as an opaque value.
    pub fn opaque<T: Any>(data: T) -> Value {
        Value::Opaque(Rc::new(data))
    }

    /// Wrap a callable payload.
    pub fn function(
        f: impl Fn(&MiddlewareApi) -> Result<Value, StoreError> + 'static,
    ) -> Value {
        Value::Function(Rc::new(f))
    }

    /// The plain-record predicate: true only for record values. Everything
    /// else — scalars, lists, opaque data, functions — fails the base
    /// dispatch contract.
    pub fn is_plain_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Record field lookup; `None` for non-records and missing keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Record(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Identity in the host-language sense: scalars compare by value,
    /// shared variants by pointer. This is the relation the combined
    /// reducer's change detection is defined over — a slice reducer that
    /// returns its input unchanged keeps the slice `identical`, and a
    /// rebuilt-but-equal record does not.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b),
            (Value::Opaque(a), Value::Opaque(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Kind label for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::Float(_) => "number",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Record(_) => "record",
            Value::Opaque(_) => "opaque value",
            Value::Function(_) => "function",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Value {
        Value::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s)
    }
}

/// Structural equality; opaque and function values fall back to pointer
/// equality since their contents cannot be compared.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Record(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Opaque(_) => f.write_str("<opaque>"),
            Value::Function(_) => f.write_str("<function>"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => write!(f, "{other:?}"),
        }
    }
}
