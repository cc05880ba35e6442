//! The Reducer trait and the handler-table reducer.
//!
//! Reducers are pure functions `(State, Action) -> State` over immutable
//! [`Value`]s. `None` stands for absent state: a reducer receiving it falls
//! back to its initial state. A reducer must always produce a state, and
//! failing to do so is reported as [`ReducerError::UndefinedState`].
//!
//! # Example
//!
//! ```
//! use redux_kit_core::action::create_action;
//! use redux_kit_core::reducer::{create_reducer, Handlers, Reducer};
//! use redux_kit_core::value::Value;
//!
//! let increment = create_action("increment");
//! let reducer = create_reducer(
//!     0,
//!     Handlers::new().on(&increment, |state, action| {
//!         let by = action.payload.as_i64().unwrap_or(1);
//!         Value::Int(state.as_i64().unwrap_or(0) + by)
//!     }),
//! );
//!
//! let state = reducer.reduce(None, &increment.create(5)).unwrap();
//! assert_eq!(state, Value::Int(5));
//! ```

use crate::action::{Action, ActionCreator, Tag};
use crate::composition::CombinedReducer;
use crate::error::ReducerError;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The Reducer trait - core abstraction for state transitions
pub trait Reducer {
    /// Compute the next state.
    ///
    /// # Arguments
    ///
    /// - `state`: Current state, `None` when absent
    /// - `action`: The action to process
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError`] when the reducer contract is broken.
    fn reduce(&self, state: Option<Value>, action: &Action) -> Result<Value, ReducerError>;

    /// The state this reducer produces from nothing.
    ///
    /// # Errors
    ///
    /// Same as [`Reducer::reduce`].
    fn initial_state(&self) -> Result<Value, ReducerError> {
        self.reduce(None, &Action::init())
    }
}

/// Thread-safe, type-erased reducer.
pub type SharedReducer = Arc<dyn Reducer + Send + Sync>;

impl<R: Reducer + ?Sized> Reducer for &R {
    fn reduce(&self, state: Option<Value>, action: &Action) -> Result<Value, ReducerError> {
        (**self).reduce(state, action)
    }
}

impl<R: Reducer + ?Sized> Reducer for Box<R> {
    fn reduce(&self, state: Option<Value>, action: &Action) -> Result<Value, ReducerError> {
        (**self).reduce(state, action)
    }
}

impl<R: Reducer + ?Sized> Reducer for Arc<R> {
    fn reduce(&self, state: Option<Value>, action: &Action) -> Result<Value, ReducerError> {
        (**self).reduce(state, action)
    }
}

/// A reducer backed by a closure. Created by [`reducer_fn`].
#[derive(Clone)]
pub struct FnReducer<F> {
    f: F,
}

/// Adapt a closure into a [`Reducer`].
///
/// The closure returns `None` to signal "undefined", which is always an
/// error.
pub const fn reducer_fn<F>(f: F) -> FnReducer<F>
where
    F: Fn(Option<Value>, &Action) -> Option<Value>,
{
    FnReducer { f }
}

impl<F> Reducer for FnReducer<F>
where
    F: Fn(Option<Value>, &Action) -> Option<Value>,
{
    fn reduce(&self, state: Option<Value>, action: &Action) -> Result<Value, ReducerError> {
        (self.f)(state, action).ok_or(ReducerError::UndefinedState)
    }
}

impl<F> fmt::Debug for FnReducer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnReducer(<closure>)")
    }
}

/// Type alias for per-action transition functions
pub type Handler = Arc<dyn Fn(Value, &Action) -> Value + Send + Sync>;

/// Type alias for action filter predicates
pub type Filter = Arc<dyn Fn(&Action) -> bool + Send + Sync>;

/// Table of handlers keyed by action tag.
#[derive(Clone, Default)]
pub struct Handlers {
    table: HashMap<Tag, Handler>,
}

impl Handlers {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle actions built by `creator`.
    #[must_use]
    pub fn on<F>(self, creator: &ActionCreator, handler: F) -> Self
    where
        F: Fn(Value, &Action) -> Value + Send + Sync + 'static,
    {
        self.on_tag(creator.action_type().clone(), handler)
    }

    /// Handle actions carrying `tag`. A later registration replaces an
    /// earlier one for the same tag.
    #[must_use]
    pub fn on_tag<F>(mut self, tag: Tag, handler: F) -> Self
    where
        F: Fn(Value, &Action) -> Value + Send + Sync + 'static,
    {
        self.table.insert(tag, Arc::new(handler));
        self
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn get(&self, tag: &Tag) -> Option<&Handler> {
        self.table.get(tag)
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.table.keys()).finish()
    }
}

/// Create a reducer that dispatches on action tags.
///
/// `initial_state` is normalized once, here.
#[must_use]
pub fn create_reducer(initial_state: impl Into<Value>, handlers: Handlers) -> HandlerReducer {
    HandlerReducer {
        initial_state: initial_state.into(),
        handlers,
        combine: None,
        filter: None,
    }
}

/// Reducer built by [`create_reducer`].
///
/// Runs, in order: the optional filter gate, the handler registered for the
/// action's tag, and the optional combined sub-reducers.
#[derive(Clone)]
pub struct HandlerReducer {
    initial_state: Value,
    handlers: Handlers,
    combine: Option<CombinedReducer>,
    filter: Option<Filter>,
}

impl HandlerReducer {
    /// Create a reducer with no handlers.
    #[must_use]
    pub fn new(initial_state: impl Into<Value>) -> Self {
        create_reducer(initial_state, Handlers::new())
    }

    /// Register a handler for actions built by `creator`.
    #[must_use]
    pub fn on<F>(mut self, creator: &ActionCreator, handler: F) -> Self
    where
        F: Fn(Value, &Action) -> Value + Send + Sync + 'static,
    {
        self.handlers = self.handlers.on(creator, handler);
        self
    }

    /// Register a handler for `tag`.
    #[must_use]
    pub fn on_tag<F>(mut self, tag: Tag, handler: F) -> Self
    where
        F: Fn(Value, &Action) -> Value + Send + Sync + 'static,
    {
        self.handlers = self.handlers.on_tag(tag, handler);
        self
    }

    /// Run `combined` over the handler's result as a final pass.
    #[must_use]
    pub fn combine(mut self, combined: CombinedReducer) -> Self {
        self.combine = Some(combined);
        self
    }

    /// Only admit actions for which `predicate` holds.
    #[must_use]
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Action) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(predicate));
        self
    }
}

impl Reducer for HandlerReducer {
    fn reduce(&self, state: Option<Value>, action: &Action) -> Result<Value, ReducerError> {
        let state = state.unwrap_or_else(|| self.initial_state.clone());

        if self.filter.as_ref().is_some_and(|admit| !admit(action)) {
            return Ok(state);
        }

        let state = match self.handlers.get(&action.action_type) {
            Some(handler) => {
                tracing::trace!(action = %action.action_type, "Handling action");
                handler(state, action)
            },
            None => state,
        };

        match &self.combine {
            Some(combined) => combined.reduce(Some(state), action),
            None => Ok(state),
        }
    }
}

impl fmt::Debug for HandlerReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerReducer")
            .field("initial_state", &self.initial_state)
            .field("handlers", &self.handlers)
            .field("combine", &self.combine)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}
