//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers:
//! - **`combine_reducers`**: Give each key of a map-shaped state its own reducer
//! - **`scope_reducer`**: Only admit actions tagged with a scope marker
//!
//! # Examples
//!
//! ## Combining Reducers
//!
//! ```
//! use redux_kit_core::action::create_action;
//! use redux_kit_core::composition::CombinedReducer;
//! use redux_kit_core::reducer::{HandlerReducer, Reducer};
//! use redux_kit_core::value::Value;
//!
//! let bump = create_action("bump");
//!
//! let root = CombinedReducer::new()
//!     .with("a", HandlerReducer::new(0))
//!     .with(
//!         "b",
//!         HandlerReducer::new(0).on(&bump, |state, _| {
//!             Value::Int(state.as_i64().unwrap_or(0) + 1)
//!         }),
//!     );
//!
//! let state = Value::map([("a", 0), ("b", 0)]);
//! let next = root.reduce(Some(state), &bump.create(Value::Null)).unwrap();
//! assert_eq!(next.get("b"), Some(&Value::Int(1)));
//! ```

use crate::action::Action;
use crate::error::ReducerError;
use crate::reducer::{Reducer, SharedReducer};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Combines per-key reducers into one reducer over a map-shaped state.
///
/// Keys are processed in the order given; a repeated key keeps its first
/// position and its last reducer.
///
/// # Examples
///
/// ```
/// use redux_kit_core::composition::combine_reducers;
/// use redux_kit_core::reducer::{HandlerReducer, Reducer, SharedReducer};
/// use std::sync::Arc;
///
/// let todos: SharedReducer = Arc::new(HandlerReducer::new(Vec::<i64>::new()));
/// let filter: SharedReducer = Arc::new(HandlerReducer::new("all"));
/// let root = combine_reducers([("todos", todos), ("filter", filter)]);
///
/// let state = root.initial_state().unwrap();
/// assert_eq!(state.get("filter").and_then(|v| v.as_str()), Some("all"));
/// ```
#[must_use]
pub fn combine_reducers<K, I>(reducers: I) -> CombinedReducer
where
    K: Into<String>,
    I: IntoIterator<Item = (K, SharedReducer)>,
{
    reducers
        .into_iter()
        .fold(CombinedReducer::new(), |combined, (key, reducer)| {
            combined.with_shared(key, reducer)
        })
}

/// A reducer that delegates each key of its state to a sub-reducer.
///
/// Created by [`combine_reducers`] or [`CombinedReducer::new`].
#[derive(Clone, Default)]
pub struct CombinedReducer {
    reducers: Vec<(String, SharedReducer)>,
}

impl CombinedReducer {
    /// Create a combinator with no keys.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reducer for `key`.
    #[must_use]
    pub fn with<R>(self, key: impl Into<String>, reducer: R) -> Self
    where
        R: Reducer + Send + Sync + 'static,
    {
        self.with_shared(key, Arc::new(reducer))
    }

    /// Add an already shared reducer for `key`.
    #[must_use]
    pub fn with_shared(mut self, key: impl Into<String>, reducer: SharedReducer) -> Self {
        let key = key.into();
        match self.reducers.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = reducer,
            None => self.reducers.push((key, reducer)),
        }
        self
    }

    /// Keys in processing order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.reducers.iter().map(|(key, _)| key.as_str())
    }
}

impl Reducer for CombinedReducer {
    fn reduce(&self, state: Option<Value>, action: &Action) -> Result<Value, ReducerError> {
        let mut next = match state {
            None => Value::empty_map(),
            Some(map @ Value::Map(_)) => map,
            Some(other) => {
                return Err(ReducerError::NotAMap {
                    found: other.type_name(),
                });
            },
        };

        for (key, reducer) in &self.reducers {
            let previous = next.get(key).cloned();
            let slice = match reducer.reduce(previous.clone(), action) {
                Err(ReducerError::UndefinedState) => {
                    return Err(ReducerError::UndefinedSlice { key: key.clone() });
                },
                other => other?,
            };

            if !previous.is_some_and(|p| p.same(&slice)) {
                next = next.set(key.clone(), slice);
            }
        }

        Ok(next)
    }
}

impl fmt::Debug for CombinedReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Scopes a reducer to actions carrying a matching `meta.scope` marker.
///
/// Any other action, whatever its type, leaves the state untouched. This
/// lets the same feature reducer be mounted several times in one state
/// tree without the copies reacting to each other's actions.
///
/// # Examples
///
/// ```
/// use redux_kit_core::action::create_action;
/// use redux_kit_core::binding::scope_action;
/// use redux_kit_core::composition::scope_reducer;
/// use redux_kit_core::reducer::{HandlerReducer, Reducer};
/// use redux_kit_core::value::Value;
///
/// let set = create_action("set");
/// let scoped = scope_reducer("left", HandlerReducer::new(0).on(&set, |_, a| a.payload.clone()));
///
/// let state = scoped.reduce(None, &set.create(1)).unwrap();
/// assert_eq!(state, Value::Int(0));
///
/// let state = scoped.reduce(Some(state), &scope_action("left", &set.create(1))).unwrap();
/// assert_eq!(state, Value::Int(1));
/// ```
pub fn scope_reducer<R>(scope: impl Into<Arc<str>>, reducer: R) -> ScopedReducer<R>
where
    R: Reducer,
{
    ScopedReducer {
        scope: scope.into(),
        reducer,
    }
}

/// A reducer that only sees actions of one scope.
///
/// Created by [`scope_reducer`].
#[derive(Clone, Debug)]
pub struct ScopedReducer<R> {
    scope: Arc<str>,
    reducer: R,
}

impl<R> ScopedReducer<R> {
    /// The admitted scope.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }
}

impl<R: Reducer> Reducer for ScopedReducer<R> {
    fn reduce(&self, state: Option<Value>, action: &Action) -> Result<Value, ReducerError> {
        if action.scope() == Some(&*self.scope) {
            return self.reducer.reduce(state, action);
        }

        match state {
            Some(state) => Ok(state),
            None => self.reducer.initial_state(),
        }
    }
}
