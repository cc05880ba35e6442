//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use redux_kit_core::{action::Action, error::ReducerError, reducer::Reducer, value::Value};

/// Type alias for state assertion functions
type StateAssertion = Box<dyn FnOnce(&Value)>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// Without [`given_state`](Self::given_state) the reducer starts from absent
/// state, as it would on store creation. Several
/// [`when_action`](Self::when_action) calls are applied in order.
///
/// # Example
///
/// ```
/// use redux_kit_core::{create_action, HandlerReducer, Value};
/// use redux_kit_testing::ReducerTest;
///
/// let rename = create_action("rename");
/// let reducer = HandlerReducer::new(Value::map([("name", "a")]))
///     .on(&rename, |state, action| state.set("name", action.payload.clone()));
///
/// ReducerTest::new(reducer)
///     .when_action(rename.create("b"))
///     .then_state(|state| {
///         assert_eq!(state.get("name").and_then(Value::as_str), Some("b"));
///     })
///     .run();
/// ```
pub struct ReducerTest<R>
where
    R: Reducer,
{
    reducer: R,
    initial_state: Option<Value>,
    actions: Vec<Action>,
    state_assertions: Vec<StateAssertion>,
    expect_same: bool,
    expected_error: Option<ReducerError>,
}

impl<R> ReducerTest<R>
where
    R: Reducer,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            expect_same: false,
            expected_error: None,
        }
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: impl Into<Value>) -> Self {
        self.initial_state = Some(state.into());
        self
    }

    /// Add an action to apply (When)
    #[must_use]
    pub fn when_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&Value) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Expect the resulting state to be `same` as the given one (Then)
    #[must_use]
    pub const fn then_same_state(mut self) -> Self {
        self.expect_same = true;
        self
    }

    /// Expect the reducer to fail with `error` (Then)
    #[must_use]
    pub fn then_error(mut self, error: ReducerError) -> Self {
        self.expected_error = Some(error);
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if no action is set, if the reducer fails unexpectedly or
    /// succeeds when an error was expected, or if any assertion fails.
    #[allow(clippy::panic)] // Test code can panic
    pub fn run(self) {
        assert!(!self.actions.is_empty(), "Action must be set with when_action()");

        let given = self.initial_state.clone();
        let mut state = self.initial_state;

        for action in &self.actions {
            match self.reducer.reduce(state.take(), action) {
                Ok(next) => state = Some(next),
                Err(err) => {
                    match &self.expected_error {
                        Some(expected) => assert_eq!(&err, expected, "Reducer failed differently"),
                        None => panic!("Reducer failed on {}: {err}", action.action_type),
                    }
                    return;
                },
            }
        }

        if let Some(expected) = self.expected_error {
            panic!("Expected reducer error `{expected}`, but it succeeded");
        }

        let Some(state) = state else {
            panic!("Reducer produced no state");
        };

        if self.expect_same {
            assert!(
                given.as_ref().is_some_and(|given| given.same(&state)),
                "Expected the same state, got {state}"
            );
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }
    }
}

/// Helper assertions for states and actions
pub mod assertions {
    use redux_kit_core::{action::Action, value::Value};

    /// Assert that two values are the same allocation
    ///
    /// # Panics
    ///
    /// Panics if they are not [`Value::same`].
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_same(actual: &Value, expected: &Value) {
        assert!(
            actual.same(expected),
            "Expected the same value, found a different one: {actual} vs {expected}"
        );
    }

    /// Assert that a value was replaced
    ///
    /// # Panics
    ///
    /// Panics if `after` is [`Value::same`] as `before`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_changed(before: &Value, after: &Value) {
        assert!(!before.same(after), "Expected a new value, but it is unchanged: {after}");
    }

    /// Assert a value's plain JSON form
    ///
    /// # Panics
    ///
    /// Panics if the plain form differs.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_plain_eq(actual: &Value, expected: &serde_json::Value) {
        assert_eq!(&actual.to_plain(), expected, "Plain form mismatch");
    }

    /// Assert that an action carries the given scope marker
    ///
    /// # Panics
    ///
    /// Panics if `meta.scope` is missing or different.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_scoped(action: &Action, scope: &str) {
        assert_eq!(
            action.scope(),
            Some(scope),
            "Expected {} to be scoped to `{scope}`",
            action.action_type
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redux_kit_core::{HandlerReducer, create_action, reducer_fn};
    use serde_json::json;

    #[test]
    fn test_reducer_test_basic() {
        let increment = create_action("increment");
        let reducer = HandlerReducer::new(0)
            .on(&increment, |state, _| Value::Int(state.as_i64().unwrap_or(0) + 1));

        ReducerTest::new(reducer)
            .given_state(0)
            .when_action(increment.create(Value::Null))
            .when_action(increment.create(Value::Null))
            .then_state(|state| assert_eq!(state, &Value::Int(2)))
            .run();
    }

    #[test]
    fn test_reducer_test_from_absent_state() {
        let reducer = HandlerReducer::new(json!({ "ready": true }));

        ReducerTest::new(reducer)
            .when_action(Action::init())
            .then_state(|state| assertions::assert_plain_eq(state, &json!({ "ready": true })))
            .run();
    }

    #[test]
    fn test_reducer_test_same_state() {
        let reducer = HandlerReducer::new(Value::Null);

        ReducerTest::new(reducer)
            .given_state(Value::map([("a", 1)]))
            .when_action(create_action("unknown").create(Value::Null))
            .then_same_state()
            .run();
    }

    #[test]
    fn test_reducer_test_error() {
        ReducerTest::new(reducer_fn(|_, _| None))
            .when_action(Action::init())
            .then_error(ReducerError::UndefinedState)
            .run();
    }

    #[test]
    #[should_panic(expected = "Action must be set")]
    fn test_reducer_test_requires_action() {
        ReducerTest::new(HandlerReducer::new(0)).run();
    }

    #[test]
    fn test_assertions() {
        let value = Value::map([("a", 1)]);
        assertions::assert_same(&value, &value.clone());
        assertions::assert_changed(&value, &value.set("a", 2));

        let action = redux_kit_core::scope_action("left", &create_action("x").create(1));
        assertions::assert_scoped(&action, "left");
    }
}
