//! # redux-kit Core
//!
//! Helpers for action-creator and reducer conventions on top of immutable
//! state, in the style of unidirectional state-management architectures.
//!
//! ## Core Concepts
//!
//! - **Value**: Immutable, structurally shared state
//! - **Action**: A tagged record `{ action_type, payload, meta }`
//! - **Tag**: Unique, unforgeable identity of an action kind
//! - **Reducer**: Pure function `(State, Action) → State`
//! - **Effect**: Deferred work run with explicit `dispatch`/`get_state` capabilities
//! - **Action tree**: All creators exported by a feature module, for bulk binding or scoping
//!
//! ## Example
//!
//! ```
//! use redux_kit_core::{create_action, CombinedReducer, HandlerReducer, Reducer, Value};
//!
//! let add_todo = create_action("add_todo");
//!
//! let todos = HandlerReducer::new(Vec::<Value>::new()).on(&add_todo, |state, action| {
//!     let mut items = state.as_slice().unwrap_or_default().to_vec();
//!     items.push(action.payload.clone());
//!     Value::list(items)
//! });
//! let root = CombinedReducer::new().with("todos", todos);
//!
//! let state = root.reduce(None, &add_todo.create("write docs")).unwrap();
//! assert_eq!(state.get_in(&["todos", "0"]).and_then(Value::as_str), Some("write docs"));
//! ```

/// Tagged actions and their creators
pub mod action;

/// Binding action trees to dispatchers and scoping them
pub mod binding;

/// Reducer composition: combining and scoping
pub mod composition;

/// Effects and dispatch capabilities
pub mod effect;

/// Error types
pub mod error;

/// Null-safe nested lookups
pub mod getter;

/// The Reducer trait and handler-table reducers
pub mod reducer;

/// Action-creator trees
pub mod tree;

/// Immutable values
pub mod value;

// Re-export commonly used types
pub use action::{Action, ActionCreator, Creator, EffectCreator, Tag, create_action};
pub use binding::{BoundAction, bind_actions, bind_actions_with_meta, scope_action, scope_actions, scope_actions_with_state};
pub use composition::{CombinedReducer, ScopedReducer, combine_reducers, scope_reducer};
pub use effect::{Dispatch, Dispatchable, Effect, GetState, dispatch_fn};
pub use error::{DispatchError, ReducerError};
pub use getter::{Getter, getter};
pub use reducer::{HandlerReducer, Handlers, Reducer, SharedReducer, create_reducer, reducer_fn};
pub use tree::ActionTree;
pub use value::{Value, normalize};
