//! Null-safe nested field lookups.
//!
//! ```
//! use redux_kit_core::getter::getter;
//! use redux_kit_core::value::{normalize, Value};
//! use serde_json::json;
//!
//! let user_name = getter(["user", "profile", "name"]);
//! let state = normalize(json!({ "user": { "profile": { "name": "ada" } } }));
//!
//! assert_eq!(user_name.get(&state).and_then(Value::as_str), Some("ada"));
//! assert_eq!(user_name.get(&Value::Null), None);
//! ```

use crate::value::Value;

/// A precomputed lookup path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Getter {
    path: Vec<String>,
}

/// Build a [`Getter`] for the given key sequence.
pub fn getter<K, I>(keys: I) -> Getter
where
    K: Into<String>,
    I: IntoIterator<Item = K>,
{
    Getter {
        path: keys.into_iter().map(Into::into).collect(),
    }
}

impl Getter {
    /// Follow the path. Any missing step yields `None`.
    #[must_use]
    pub fn get<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        value.get_in(&self.path)
    }

    /// Follow the path, falling back to `default`.
    #[must_use]
    pub fn get_or(&self, value: &Value, default: Value) -> Value {
        self.get(value).cloned().unwrap_or(default)
    }

    /// The key sequence.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The lookup as a plain function returning owned values, `Null` when
    /// missing.
    pub fn as_fn(&self) -> impl Fn(&Value) -> Value + Send + Sync + 'static {
        let getter = self.clone();
        move |value| getter.get(value).cloned().unwrap_or_default()
    }
}
