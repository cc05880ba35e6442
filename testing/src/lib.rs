//! # redux-kit Testing
//!
//! Testing utilities and helpers for redux-kit.
//!
//! This crate provides:
//! - Mock dispatch and state capabilities
//! - A Given-When-Then harness for reducers
//! - Property-based testing strategies
//! - Assertion helpers for states and actions
//!
//! ## Example
//!
//! ```
//! use redux_kit_core::{create_action, HandlerReducer, Value};
//! use redux_kit_testing::ReducerTest;
//!
//! let increment = create_action("increment");
//! let reducer = HandlerReducer::new(0).on(&increment, |state, _| {
//!     Value::Int(state.as_i64().unwrap_or(0) + 1)
//! });
//!
//! ReducerTest::new(reducer)
//!     .given_state(41)
//!     .when_action(increment.create(Value::Null))
//!     .then_state(|state| assert_eq!(state, &Value::Int(42)))
//!     .run();
//! ```

/// Given-When-Then harness for reducers
pub mod reducer_test;

/// Mock implementations of the dispatch and state capabilities.
pub mod mocks {
    use redux_kit_core::action::Action;
    use redux_kit_core::effect::{Dispatch, Dispatchable, GetState};
    use redux_kit_core::error::DispatchError;
    use redux_kit_core::value::Value;
    use std::sync::{Mutex, PoisonError};

    /// Dispatcher that records everything it receives.
    ///
    /// Effects are recorded, not run. Use [`RecordingDispatcher::run_effects`]
    /// to run them against a fixed state.
    ///
    /// # Example
    ///
    /// ```
    /// use redux_kit_core::{create_action, Dispatch, Value};
    /// use redux_kit_testing::mocks::RecordingDispatcher;
    ///
    /// let dispatcher = RecordingDispatcher::new();
    /// dispatcher.dispatch(create_action("ping").create(Value::Null).into()).unwrap();
    /// assert_eq!(dispatcher.actions().len(), 1);
    /// ```
    #[derive(Debug, Default)]
    pub struct RecordingDispatcher {
        items: Mutex<Vec<Dispatchable>>,
    }

    impl RecordingDispatcher {
        /// Create an empty recorder
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Clones of every recorded action, in dispatch order
        #[must_use]
        pub fn actions(&self) -> Vec<Action> {
            self.items
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .filter_map(Dispatchable::as_action)
                .cloned()
                .collect()
        }

        /// Number of recorded effects
        #[must_use]
        pub fn effect_count(&self) -> usize {
            self.items
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .filter(|item| matches!(item, Dispatchable::Effect(_)))
                .count()
        }

        /// Number of recorded items
        #[must_use]
        pub fn len(&self) -> usize {
            self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
        }

        /// Whether nothing was recorded
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// Remove and return everything recorded so far
        pub fn take(&self) -> Vec<Dispatchable> {
            std::mem::take(&mut *self.items.lock().unwrap_or_else(PoisonError::into_inner))
        }

        /// Run every recorded effect against `state`, recording what they
        /// dispatch in turn. Actions stay recorded.
        ///
        /// # Errors
        ///
        /// Returns the first error raised by an effect.
        pub fn run_effects(&self, state: &FixedState) -> Result<(), DispatchError> {
            loop {
                let pending: Vec<Dispatchable> = self.take();
                if !pending.iter().any(|item| matches!(item, Dispatchable::Effect(_))) {
                    self.items
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .extend(pending);
                    return Ok(());
                }
                for item in pending {
                    match item {
                        Dispatchable::Action(action) => self.dispatch(action.into())?,
                        Dispatchable::Effect(effect) => effect.run(self, state)?,
                    }
                }
            }
        }
    }

    impl Dispatch for RecordingDispatcher {
        fn dispatch(&self, item: Dispatchable) -> Result<(), DispatchError> {
            self.items
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(item);
            Ok(())
        }
    }

    /// State capability returning a fixed value.
    #[derive(Debug, Clone, Default)]
    pub struct FixedState {
        state: Value,
        root: Option<Value>,
    }

    impl FixedState {
        /// A capability whose state and root are both `state`
        #[must_use]
        pub fn new(state: impl Into<Value>) -> Self {
            Self {
                state: state.into(),
                root: None,
            }
        }

        /// Report a different root from [`GetState::get_root_state`]
        #[must_use]
        pub fn with_root(mut self, root: impl Into<Value>) -> Self {
            self.root = Some(root.into());
            self
        }
    }

    impl GetState for FixedState {
        fn get_state(&self) -> Value {
            self.state.clone()
        }

        fn get_root_state(&self) -> Value {
            self.root.clone().unwrap_or_else(|| self.state.clone())
        }
    }
}

/// Test helpers and utilities.
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a test-friendly `tracing` subscriber.
    ///
    /// Honors `RUST_LOG` and defaults to `warn`. Calling it more than once is
    /// harmless.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Map keys: short lowercase identifiers
    pub fn arb_key() -> impl Strategy<Value = String> {
        "[a-z]{1,6}"
    }

    /// Plain scalars: null, booleans, integers and strings
    pub fn arb_scalar() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::from),
            any::<i64>().prop_map(serde_json::Value::from),
            "[a-zA-Z0-9 ]{0,12}".prop_map(serde_json::Value::from),
        ]
    }

    /// Nested plain data, as received before normalization
    pub fn arb_plain_value() -> impl Strategy<Value = serde_json::Value> {
        arb_scalar().prop_recursive(4, 64, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(serde_json::Value::Array),
                prop::collection::btree_map(arb_key(), inner, 0..6)
                    .prop_map(|entries| serde_json::Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    /// Plain objects, the shape combined reducers operate on
    pub fn arb_plain_object() -> impl Strategy<Value = serde_json::Value> {
        prop::collection::btree_map(arb_key(), arb_plain_value(), 0..6)
            .prop_map(|entries| serde_json::Value::Object(entries.into_iter().collect()))
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::{FixedState, RecordingDispatcher};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use redux_kit_core::{Dispatch, Effect, GetState, Value, create_action};

    #[test]
    fn test_fixed_state() {
        let state = FixedState::new(1);
        assert_eq!(state.get_state(), Value::Int(1));
        assert_eq!(state.get_root_state(), Value::Int(1));

        let scoped = FixedState::new(1).with_root(Value::map([("slice", 1)]));
        assert_eq!(scoped.get_root_state().get("slice"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_recording_dispatcher_runs_effects() {
        let ping = create_action("ping");
        let dispatcher = RecordingDispatcher::new();
        let effect = Effect::thunk(move |dispatch, state| {
            dispatch.dispatch(ping.create(state.get_state()).into())
        });

        dispatcher.dispatch(effect.into()).unwrap();
        assert_eq!(dispatcher.effect_count(), 1);
        assert!(dispatcher.actions().is_empty());

        dispatcher.run_effects(&FixedState::new(7)).unwrap();
        assert_eq!(dispatcher.effect_count(), 0);
        assert_eq!(dispatcher.actions()[0].payload, Value::Int(7));
        assert_eq!(dispatcher.len(), 1);
    }
}
