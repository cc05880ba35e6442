//! Immutable state values.
//!
//! [`Value`] is the normalized representation every reducer operates on.
//! Collections are reference counted and never mutated in place: every
//! "mutation" returns a new root, and operations that would not change
//! anything hand back a clone of the receiver that is [`Value::same`] as it.
//! Consumers can therefore detect changes with a pointer comparison.
//!
//! # Examples
//!
//! ```
//! use redux_kit_core::value::{normalize, Value};
//! use serde_json::json;
//!
//! let state = normalize(json!({ "todos": [], "filter": "all" }));
//! let next = state.set("filter", "done");
//!
//! assert_eq!(state.get("filter").and_then(Value::as_str), Some("all"));
//! assert_eq!(next.get("filter").and_then(Value::as_str), Some("done"));
//! assert!(state.get("todos").unwrap().same(next.get("todos").unwrap()));
//! ```

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An immutable, structurally shared value.
///
/// `Null` doubles as the "absent" marker for action payloads and metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absent or null.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    Str(Arc<str>),
    /// Ordered list.
    List(Arc<Vec<Value>>),
    /// Insertion-ordered list without duplicates.
    Set(Arc<Vec<Value>>),
    /// String-keyed map, iterated in key order.
    Map(Arc<BTreeMap<String, Value>>),
}

/// Normalize plain data into its immutable form.
///
/// Normalizing a [`Value`] is the identity, so `normalize(normalize(x))` is
/// [`Value::same`] as `normalize(x)`.
#[must_use]
pub fn normalize(value: impl Into<Value>) -> Value {
    value.into()
}

impl Value {
    /// Create an empty map.
    #[must_use]
    pub fn empty_map() -> Self {
        Self::Map(Arc::new(BTreeMap::new()))
    }

    /// Build a map from key/value pairs (the `M(...)` shorthand).
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(Arc::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Build a list (the `L(...)` shorthand).
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Self::List(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Build a set (the `S(...)` shorthand). Duplicates are dropped, first
    /// occurrence wins.
    pub fn set_of<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            let item = item.into();
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Self::Set(Arc::new(unique))
    }

    /// Identity comparison.
    ///
    /// Collections compare by allocation, scalars and strings by value.
    /// Floats compare by bit pattern, so `NaN` is `same` as itself and
    /// `-0.0` is not `same` as `0.0`.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) | (Self::Set(a), Self::Set(b)) => Arc::ptr_eq(a, b),
            (Self::Map(a), Self::Map(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Whether this value is an immutable collection (list, set or map).
    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_) | Self::Map(_))
    }

    /// Whether this value is `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
        }
    }

    /// Boolean content.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer content.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric content, widening integers.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// String content.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Map content.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// List or set content.
    #[must_use]
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Number of entries in a collection, `0` for scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::List(items) | Self::Set(items) => items.len(),
            Self::Map(m) => m.len(),
            _ => 0,
        }
    }

    /// Whether [`Value::len`] is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a map key, or a list index written in decimal.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(m) => m.get(key),
            Self::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Null-safe nested lookup.
    #[must_use]
    pub fn get_in<K: AsRef<str>>(&self, path: &[K]) -> Option<&Value> {
        path.iter().try_fold(self, |node, key| node.get(key.as_ref()))
    }

    /// Return a value with `key` set to `value`.
    ///
    /// When the stored entry is already [`Value::same`] as `value`, the
    /// receiver is returned unchanged. `Null` is treated as an empty map,
    /// list receivers accept in-bounds decimal indices, and any other
    /// receiver is replaced by a fresh single-entry map.
    #[must_use]
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        if self.get(&key).is_some_and(|current| current.same(&value)) {
            return self.clone();
        }
        match self {
            Self::Map(m) => {
                let mut next = BTreeMap::clone(m);
                next.insert(key, value);
                Self::Map(Arc::new(next))
            },
            Self::List(items) => match key.parse::<usize>() {
                Ok(index) if index < items.len() => {
                    let mut next = Vec::clone(items);
                    next[index] = value;
                    Self::List(Arc::new(next))
                },
                _ => {
                    tracing::warn!(key = %key, len = items.len(), "Index out of bounds, list unchanged");
                    self.clone()
                },
            },
            _ => Self::map([(key, value)]),
        }
    }

    /// Return a value without `key`. Unchanged (and `same`) when absent.
    #[must_use]
    pub fn remove(&self, key: &str) -> Self {
        match self {
            Self::Map(m) if m.contains_key(key) => {
                let mut next = BTreeMap::clone(m);
                next.remove(key);
                Self::Map(Arc::new(next))
            },
            _ => self.clone(),
        }
    }

    /// Replace the entry at `key` with `f(current)`.
    #[must_use]
    pub fn update<F>(&self, key: &str, f: F) -> Self
    where
        F: FnOnce(Option<&Value>) -> Value,
    {
        let next = f(self.get(key));
        self.set(key, next)
    }

    /// Shallow merge, entries of `other` win.
    ///
    /// `Null` is the identity on either side. If either side is not a map,
    /// `other` replaces `self`.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        match (self, other) {
            (_, Self::Null) => self.clone(),
            (Self::Null, _) => other.clone(),
            (Self::Map(_), Self::Map(entries)) => entries
                .iter()
                .fold(self.clone(), |acc, (k, v)| acc.set(k.clone(), v.clone())),
            _ => other.clone(),
        }
    }

    /// Convert back into plain JSON data.
    ///
    /// Non-finite floats become `null`.
    #[must_use]
    pub fn to_plain(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Str(s) => serde_json::Value::String(s.to_string()),
            Self::List(items) | Self::Set(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_plain).collect())
            },
            Self::Map(m) => serde_json::Value::Object(
                m.iter().map(|(k, v)| (k.clone(), v.to_plain())).collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_plain())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_plain().serialize(serializer)
    }
}

impl From<serde_json::Value> for Value {
    fn from(plain: serde_json::Value) -> Self {
        match plain {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or_default(),
            serde_json::Value::String(s) => Self::Str(s.into()),
            serde_json::Value::Array(items) => Self::list(items),
            serde_json::Value::Object(entries) => Self::map(entries),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(i: usize) -> Self {
        i64::try_from(i).map_or(Self::Float(i as f64), Self::Int)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::Str(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(entries: BTreeMap<String, T>) -> Self {
        Self::map(entries)
    }
}
