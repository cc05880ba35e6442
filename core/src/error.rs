//! Error types shared by reducers and dispatchers.
//!
//! Every variant here is a broken contract on the caller's side. Nothing is
//! retried or recovered: the error propagates to whoever invoked the
//! reducer or dispatch.

use thiserror::Error;

/// Errors raised while computing the next state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReducerError {
    /// A reducer produced no state at all.
    #[error("Reducer returned undefined as new state")]
    UndefinedState,

    /// A sub-reducer of a combined reducer produced no state for its key.
    #[error("Received undefined as new state for key `{key}`")]
    UndefinedSlice {
        /// Key of the offending sub-reducer
        key: String,
    },

    /// Combined reducers only operate on map-shaped state.
    #[error("Combined reducers require a map state, found {found}")]
    NotAMap {
        /// Type name of the state that was received
        found: &'static str,
    },
}

/// Errors raised while dispatching an action or running an effect.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The root reducer failed.
    #[error(transparent)]
    Reducer(#[from] ReducerError),

    /// Effects kept dispatching effects past the configured limit.
    #[error("Dispatch depth limit of {limit} exceeded")]
    DepthExceeded {
        /// Configured maximum nesting depth
        limit: usize,
    },

    /// A dispatcher or effect refused the item.
    #[error("Dispatch rejected: {0}")]
    Rejected(String),
}
