//! # redux-kit Runtime
//!
//! A synchronous reference store for redux-kit reducers.
//!
//! ## Core Components
//!
//! - **Store**: Owns the root state, applies the root reducer atomically and
//!   notifies subscribers
//! - **Effect execution**: Effects run with the store as their `dispatch` and
//!   `get_state` capabilities, bounded by a nesting limit
//! - **Configuration**: [`StoreConfig`], from code or the environment
//!
//! ## Example
//!
//! ```
//! use redux_kit_core::{create_action, HandlerReducer, Value};
//! use redux_kit_runtime::Store;
//!
//! let increment = create_action("increment");
//! let reducer = HandlerReducer::new(0).on(&increment, |state, _| {
//!     Value::Int(state.as_i64().unwrap_or(0) + 1)
//! });
//!
//! let store = Store::new(reducer)?;
//! store.dispatch(increment.create(Value::Null))?;
//! assert_eq!(store.state(), Value::Int(1));
//! # Ok::<(), redux_kit_core::DispatchError>(())
//! ```

/// Store metrics
pub mod metrics;

/// Error types for the runtime
pub mod error {
    use thiserror::Error;

    /// Errors raised while loading a [`StoreConfig`](crate::StoreConfig).
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum ConfigError {
        /// A variable was set to something that does not parse.
        #[error("Invalid value {value:?} for {name}: {reason}")]
        Invalid {
            /// Variable name
            name: &'static str,
            /// Raw value found
            value: String,
            /// What was expected
            reason: &'static str,
        },
    }
}

pub use error::ConfigError;
pub use store::{Store, SubscriptionId};

/// Environment variable holding [`StoreConfig::max_dispatch_depth`].
pub const MAX_DISPATCH_DEPTH_VAR: &str = "REDUX_KIT_MAX_DISPATCH_DEPTH";

/// Environment variable holding [`StoreConfig::trace_actions`].
pub const TRACE_ACTIONS_VAR: &str = "REDUX_KIT_TRACE_ACTIONS";

/// Default nesting limit for dispatches made by effects.
pub const DEFAULT_MAX_DISPATCH_DEPTH: usize = 64;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use redux_kit_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_max_dispatch_depth(8)
///     .with_trace_actions(true);
///
/// assert_eq!(config.max_dispatch_depth, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// How deep effects may nest dispatches before the store refuses
    pub max_dispatch_depth: usize,
    /// Log every reduced action at `info` instead of `trace`
    pub trace_actions: bool,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(max_dispatch_depth: usize, trace_actions: bool) -> Self {
        Self {
            max_dispatch_depth,
            trace_actions,
        }
    }

    /// Set the nesting limit
    #[must_use]
    pub const fn with_max_dispatch_depth(mut self, depth: usize) -> Self {
        self.max_dispatch_depth = depth;
        self
    }

    /// Enable or disable action tracing
    #[must_use]
    pub const fn with_trace_actions(mut self, enabled: bool) -> Self {
        self.trace_actions = enabled;
        self
    }

    /// Load the configuration from the process environment.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_DISPATCH_DEPTH_VAR) {
            config.max_dispatch_depth = match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => depth,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: MAX_DISPATCH_DEPTH_VAR,
                        value: raw,
                        reason: "expected a positive integer",
                    });
                },
            };
        }

        if let Some(raw) = lookup(TRACE_ACTIONS_VAR) {
            config.trace_actions = parse_flag(&raw).ok_or_else(|| ConfigError::Invalid {
                name: TRACE_ACTIONS_VAR,
                value: raw.clone(),
                reason: "expected true/false, yes/no, on/off or 1/0",
            })?;
        }

        Ok(config)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_dispatch_depth: DEFAULT_MAX_DISPATCH_DEPTH,
            trace_actions: false,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Store module - the runtime for redux-kit reducers
pub mod store {
    use super::StoreConfig;
    use crate::metrics::StoreMetrics;
    use redux_kit_core::action::Action;
    use redux_kit_core::effect::{Dispatch, Dispatchable, GetState};
    use redux_kit_core::error::{DispatchError, ReducerError};
    use redux_kit_core::reducer::{Reducer, SharedReducer};
    use redux_kit_core::value::Value;
    use std::fmt;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::Instant;

    type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

    /// Handle returned by [`Store::subscribe`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SubscriptionId(u64);

    struct Inner {
        state: Mutex<Value>,
        reducer: SharedReducer,
        listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
        next_subscription: AtomicU64,
        config: StoreConfig,
    }

    /// The Store - owner of the root state
    ///
    /// The Store manages:
    /// 1. State (behind a `Mutex`, replaced atomically per action)
    /// 2. The root reducer
    /// 3. Effect execution with `dispatch`/`get_state` capabilities
    /// 4. Subscribers, notified after every change
    ///
    /// Cloning a store yields another handle to the same state.
    #[derive(Clone)]
    pub struct Store {
        inner: Arc<Inner>,
    }

    impl Store {
        /// Create a store whose initial state comes from the reducer.
        ///
        /// # Errors
        ///
        /// Returns the reducer's error if it cannot produce an initial state.
        pub fn new<R>(reducer: R) -> Result<Self, ReducerError>
        where
            R: Reducer + Send + Sync + 'static,
        {
            Self::with_config(reducer, StoreConfig::default())
        }

        /// Create a store with a custom configuration.
        ///
        /// # Errors
        ///
        /// Returns the reducer's error if it cannot produce an initial state.
        pub fn with_config<R>(reducer: R, config: StoreConfig) -> Result<Self, ReducerError>
        where
            R: Reducer + Send + Sync + 'static,
        {
            let state = reducer.initial_state()?;
            Ok(Self::from_parts(state, Arc::new(reducer), config))
        }

        /// Create a store starting from an explicit state.
        ///
        /// The state is not run through the reducer until the first dispatch.
        pub fn with_state<R>(state: impl Into<Value>, reducer: R) -> Self
        where
            R: Reducer + Send + Sync + 'static,
        {
            Self::from_parts(state.into(), Arc::new(reducer), StoreConfig::default())
        }

        /// Create a store from all of its parts.
        #[must_use]
        pub fn from_parts(state: Value, reducer: SharedReducer, config: StoreConfig) -> Self {
            tracing::debug!(
                max_dispatch_depth = config.max_dispatch_depth,
                trace_actions = config.trace_actions,
                "Creating store"
            );
            Self {
                inner: Arc::new(Inner {
                    state: Mutex::new(state),
                    reducer,
                    listeners: Mutex::new(Vec::new()),
                    next_subscription: AtomicU64::new(1),
                    config,
                }),
            }
        }

        /// The active configuration.
        #[must_use]
        pub fn config(&self) -> StoreConfig {
            self.inner.config
        }

        /// Current root state.
        ///
        /// Cheap: collections are shared, not copied.
        #[must_use]
        pub fn state(&self) -> Value {
            self.inner
                .state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Dispatch an action or run an effect.
        ///
        /// # Errors
        ///
        /// Returns the reducer's error for actions, or the first error raised
        /// while running an effect.
        pub fn dispatch(&self, item: impl Into<Dispatchable>) -> Result<(), DispatchError> {
            self.dispatch_at(item.into(), 0)
        }

        /// Reduce one action.
        ///
        /// # Errors
        ///
        /// Returns the reducer's error. The state is left untouched.
        pub fn dispatch_action(&self, action: &Action) -> Result<(), DispatchError> {
            self.apply(action)
        }

        /// Register a listener called with the new root after every change.
        pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
        where
            F: Fn(&Value) + Send + Sync + 'static,
        {
            let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
            self.inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((id, Arc::new(listener)));
            tracing::trace!(subscription = id.0, "Listener subscribed");
            id
        }

        /// Remove a listener. Returns whether it was registered.
        pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
            let mut listeners = self
                .inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let before = listeners.len();
            listeners.retain(|(existing, _)| *existing != id);
            before != listeners.len()
        }

        fn dispatch_at(&self, item: Dispatchable, depth: usize) -> Result<(), DispatchError> {
            let limit = self.inner.config.max_dispatch_depth;
            if depth > limit {
                tracing::warn!(depth, limit, "Rejected dispatch: nesting limit exceeded");
                StoreMetrics::record_depth_exceeded();
                return Err(DispatchError::DepthExceeded { limit });
            }

            match item {
                Dispatchable::Action(action) => self.apply(&action),
                Dispatchable::Effect(effect) => {
                    tracing::debug!(depth, "Running effect");
                    StoreMetrics::record_effect();
                    let nested = NestedDispatch {
                        store: self,
                        depth: depth + 1,
                    };
                    effect.run(&nested, self)
                },
            }
        }

        fn apply(&self, action: &Action) -> Result<(), DispatchError> {
            if self.inner.config.trace_actions {
                tracing::info!(
                    action = %action.action_type,
                    payload = %action.payload,
                    meta = %action.meta,
                    "Dispatching action"
                );
            } else {
                tracing::trace!(action = %action.action_type, "Dispatching action");
            }

            let start = Instant::now();
            let changed = {
                let mut state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
                let next = self.inner.reducer.reduce(Some(state.clone()), action)?;
                if next.same(&state) {
                    None
                } else {
                    *state = next.clone();
                    Some(next)
                }
            };
            StoreMetrics::record_action(start.elapsed(), changed.is_some());

            if let Some(next) = changed {
                self.notify(&next);
            }
            Ok(())
        }

        fn notify(&self, state: &Value) {
            let listeners: Vec<Listener> = self
                .inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();

            tracing::trace!(listeners = listeners.len(), "Notifying listeners");
            for listener in listeners {
                listener(state);
            }
        }
    }

    impl Dispatch for Store {
        fn dispatch(&self, item: Dispatchable) -> Result<(), DispatchError> {
            self.dispatch_at(item, 0)
        }
    }

    impl GetState for Store {
        fn get_state(&self) -> Value {
            self.state()
        }
    }

    impl fmt::Debug for Store {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let listeners = self
                .inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len();
            f.debug_struct("Store")
                .field("state", &self.state())
                .field("listeners", &listeners)
                .field("config", &self.inner.config)
                .finish_non_exhaustive()
        }
    }

    /// The dispatcher handed to effects, one level deeper than its caller.
    struct NestedDispatch<'a> {
        store: &'a Store,
        depth: usize,
    }

    impl Dispatch for NestedDispatch<'_> {
        fn dispatch(&self, item: Dispatchable) -> Result<(), DispatchError> {
            self.store.dispatch_at(item, self.depth)
        }
    }
}
