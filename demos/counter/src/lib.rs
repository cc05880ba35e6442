//! # Counter Example
//!
//! A counter feature module built with redux-kit, mounted twice in one
//! store.
//!
//! This example showcases:
//! - Action creators defined once and exported as an action tree
//! - A handler-table reducer over immutable state
//! - An effect creator that reads state before dispatching
//! - Scoping: the same reducer mounted under `left` and `right`, each
//!   reacting only to its own scoped actions
//! - An unscoped reducer (`clicks`) that sees every counter action
//!
//! ## Example
//!
//! ```
//! use counter::{app_reducer, counter_actions, LEFT};
//! use redux_kit_core::{bind_actions, scope_actions, Value};
//! use redux_kit_runtime::Store;
//!
//! let store = Store::new(app_reducer()).unwrap();
//! let left = bind_actions(&scope_actions(LEFT, &counter_actions()), store.clone());
//!
//! left.leaf_at(&["increment"]).unwrap().send(Value::Null).unwrap();
//! assert_eq!(store.state().get_in(&["left", "count"]), Some(&Value::Int(1)));
//! assert_eq!(store.state().get_in(&["right", "count"]), Some(&Value::Int(0)));
//! ```

use redux_kit_core::action::{ActionCreator, Creator, EffectCreator, create_action};
use redux_kit_core::action_tree;
use redux_kit_core::composition::{CombinedReducer, scope_reducer};
use redux_kit_core::effect::Effect;
use redux_kit_core::reducer::HandlerReducer;
use redux_kit_core::tree::ActionTree;
use redux_kit_core::value::Value;
use std::sync::LazyLock;

/// Scope of the first counter instance
pub const LEFT: &str = "left";

/// Scope of the second counter instance
pub const RIGHT: &str = "right";

/// The counter's action creators.
#[derive(Debug)]
pub struct CounterActions {
    /// Add the payload (default 1)
    pub increment: ActionCreator,
    /// Subtract the payload (default 1)
    pub decrement: ActionCreator,
    /// Back to the initial state
    pub reset: ActionCreator,
    /// Set the count to the payload
    pub set: ActionCreator,
}

static ACTIONS: LazyLock<CounterActions> = LazyLock::new(|| CounterActions {
    increment: create_action("counter/increment"),
    decrement: create_action("counter/decrement"),
    reset: create_action("counter/reset"),
    set: create_action("counter/set"),
});

/// The counter's action creators, created once per process.
#[must_use]
pub fn actions() -> &'static CounterActions {
    &ACTIONS
}

fn initial_state() -> Value {
    Value::map([("count", 0)])
}

fn step(action_payload: &Value) -> i64 {
    action_payload.as_i64().unwrap_or(1)
}

fn count_of(state: &Value) -> i64 {
    state.get("count").and_then(Value::as_i64).unwrap_or(0)
}

/// Reducer for one counter: `{ "count": i64 }`.
#[must_use]
pub fn counter_reducer() -> HandlerReducer {
    let actions = actions();
    HandlerReducer::new(initial_state())
        .on(&actions.increment, |state, action| {
            state.set("count", count_of(&state) + step(&action.payload))
        })
        .on(&actions.decrement, |state, action| {
            state.set("count", count_of(&state) - step(&action.payload))
        })
        .on(&actions.reset, |_, _| initial_state())
        .on(&actions.set, |state, action| match action.payload.as_i64() {
            Some(count) => state.set("count", count),
            None => state,
        })
}

/// Effect creator: increment only when the current count is odd.
#[must_use]
pub fn increment_if_odd() -> EffectCreator {
    EffectCreator::new("counter/increment_if_odd", |payload, _| {
        Effect::thunk(move |dispatch, state| {
            let count = count_of(&state.get_state());
            if count % 2 == 0 {
                tracing::debug!(count, "Count is even, skipping increment");
                return Ok(());
            }
            dispatch.dispatch(actions().increment.create(payload).into())
        })
    })
}

/// Everything the counter module exports, as one tree.
#[must_use]
pub fn counter_actions() -> ActionTree<Creator> {
    let actions = actions();
    action_tree! {
        increment => actions.increment.clone(),
        decrement => actions.decrement.clone(),
        reset => actions.reset.clone(),
        set => actions.set.clone(),
        increment_if_odd => increment_if_odd(),
    }
}

/// Counts every counter action, whatever its scope.
#[must_use]
pub fn clicks_reducer() -> HandlerReducer {
    let actions = actions();
    let bump = |state: Value, _: &redux_kit_core::action::Action| {
        Value::Int(state.as_i64().unwrap_or(0) + 1)
    };
    HandlerReducer::new(0)
        .on(&actions.increment, bump)
        .on(&actions.decrement, bump)
}

/// The demo application: two scoped counters and a shared click count.
#[must_use]
pub fn app_reducer() -> CombinedReducer {
    CombinedReducer::new()
        .with(LEFT, scope_reducer(LEFT, counter_reducer()))
        .with(RIGHT, scope_reducer(RIGHT, counter_reducer()))
        .with("clicks", clicks_reducer())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use redux_kit_core::reducer::Reducer;

    #[test]
    fn test_increment_by_payload() {
        let reducer = counter_reducer();
        let state = reducer.reduce(None, &actions().increment.create(5)).unwrap();
        assert_eq!(count_of(&state), 5);

        let state = reducer
            .reduce(Some(state), &actions().decrement.create(Value::Null))
            .unwrap();
        assert_eq!(count_of(&state), 4);
    }

    #[test]
    fn test_set_ignores_non_integers() {
        let reducer = counter_reducer();
        let state = reducer.initial_state().unwrap();
        let next = reducer.reduce(Some(state.clone()), &actions().set.create("x")).unwrap();
        assert!(next.same(&state));
    }

    #[test]
    fn test_tree_has_every_export() {
        let tree = counter_actions();
        assert_eq!(
            tree.keys(),
            vec!["decrement", "increment", "increment_if_odd", "reset", "set"]
        );
        assert!(matches!(tree.leaf_at(&["increment_if_odd"]), Some(Creator::Effect(_))));
    }
}
