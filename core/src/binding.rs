//! Binding action trees to a dispatcher and scoping them under a namespace.
//!
//! [`bind_actions`] turns every creator of a tree into a [`BoundAction`]
//! that dispatches what it builds. [`scope_actions`] tags everything a tree
//! produces with a `meta.scope` marker so that the matching
//! [`scope_reducer`](crate::composition::scope_reducer) picks it up and
//! every other copy of the feature ignores it.
//!
//! # Example
//!
//! ```
//! use redux_kit_core::action::{create_action, Creator};
//! use redux_kit_core::action_tree;
//! use redux_kit_core::binding::{bind_actions, scope_actions};
//! use redux_kit_core::effect::{dispatch_fn, Dispatchable};
//! use redux_kit_core::tree::ActionTree;
//! use std::sync::{Arc, Mutex};
//!
//! let tree: ActionTree<Creator> = action_tree! { inc => create_action("inc") };
//! let scoped = scope_actions("counter", &tree);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let bound = bind_actions(&scoped, dispatch_fn(move |item: Dispatchable| {
//!     sink.lock().unwrap().push(item);
//!     Ok(())
//! }));
//!
//! bound.leaf_at(&["inc"]).unwrap().send(5).unwrap();
//!
//! let seen = seen.lock().unwrap();
//! let action = seen[0].as_action().unwrap();
//! assert_eq!(action.scope(), Some("counter"));
//! ```

use crate::action::{Action, Creator, EffectCreator};
use crate::effect::{Dispatch, Dispatchable, Effect, GetState};
use crate::error::DispatchError;
use crate::tree::ActionTree;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Projection from the root state to the slice a scope sees.
pub type StateProjection = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A creator wired to a dispatcher.
#[derive(Clone)]
pub struct BoundAction {
    creator: Creator,
    dispatch: Arc<dyn Dispatch + Send + Sync>,
    meta: Value,
}

impl BoundAction {
    /// Build and dispatch, merging `extra_meta` over the bound meta.
    ///
    /// # Errors
    ///
    /// Returns whatever the dispatcher returns.
    pub fn call(&self, payload: impl Into<Value>, extra_meta: impl Into<Value>) -> Result<(), DispatchError> {
        let meta = self.meta.merge(&extra_meta.into());
        tracing::debug!(creator = self.creator.name(), "Dispatching bound action");
        self.dispatch.dispatch(self.creator.call(payload, meta))
    }

    /// Build and dispatch with only the bound meta.
    ///
    /// # Errors
    ///
    /// Returns whatever the dispatcher returns.
    pub fn send(&self, payload: impl Into<Value>) -> Result<(), DispatchError> {
        self.call(payload, Value::Null)
    }

    /// The wrapped creator.
    #[must_use]
    pub const fn creator(&self) -> &Creator {
        &self.creator
    }
}

impl fmt::Debug for BoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAction")
            .field("creator", &self.creator)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Bind every creator of `tree` to `dispatch`.
pub fn bind_actions<D>(tree: &ActionTree<Creator>, dispatch: D) -> ActionTree<BoundAction>
where
    D: Dispatch + Send + Sync + 'static,
{
    bind_actions_with_meta(tree, dispatch, Value::Null)
}

/// Bind every creator of `tree` to `dispatch`, attaching `meta` to
/// everything dispatched.
pub fn bind_actions_with_meta<D>(
    tree: &ActionTree<Creator>,
    dispatch: D,
    meta: impl Into<Value>,
) -> ActionTree<BoundAction>
where
    D: Dispatch + Send + Sync + 'static,
{
    let dispatch: Arc<dyn Dispatch + Send + Sync> = Arc::new(dispatch);
    let meta = meta.into();
    tree.map_leaves(|creator| BoundAction {
        creator: creator.clone(),
        dispatch: Arc::clone(&dispatch),
        meta: meta.clone(),
    })
}

fn scope_marker(scope: &str) -> Value {
    Value::map([("scope", scope)])
}

/// Copy `action` with `meta.scope` set to `scope`.
#[must_use]
pub fn scope_action(scope: &str, action: &Action) -> Action {
    let mut scoped = action.clone();
    scoped.meta = action.meta.merge(&scope_marker(scope));
    scoped
}

/// Scope every creator of `tree`.
///
/// Effects built by scoped effect creators see `root.get(scope)` as their
/// state.
#[must_use]
pub fn scope_actions(scope: impl Into<Arc<str>>, tree: &ActionTree<Creator>) -> ActionTree<Creator> {
    let scope = scope.into();
    let key = Arc::clone(&scope);
    scope_actions_with_state(scope, tree, move |root: &Value| {
        root.get(&key).cloned().unwrap_or_default()
    })
}

/// Scope every creator of `tree`, projecting the state seen by scoped
/// effects with `map_state`.
pub fn scope_actions_with_state<F>(
    scope: impl Into<Arc<str>>,
    tree: &ActionTree<Creator>,
    map_state: F,
) -> ActionTree<Creator>
where
    F: Fn(&Value) -> Value + Send + Sync + 'static,
{
    let scope = scope.into();
    let projection: StateProjection = Arc::new(map_state);
    tree.map_leaves(|creator| scope_creator(&scope, creator, &projection))
}

fn scope_creator(scope: &Arc<str>, creator: &Creator, projection: &StateProjection) -> Creator {
    match creator {
        Creator::Action(inner) => {
            let marker = scope_marker(scope);
            Creator::Action(inner.clone().then_meta(move |meta| meta.merge(&marker)))
        },
        Creator::Effect(inner) => {
            let inner = inner.clone();
            let scope = Arc::clone(scope);
            let projection = Arc::clone(projection);
            Creator::Effect(EffectCreator::new(inner.name().to_string(), move |payload, meta| {
                scope_effect(
                    inner.create(payload, meta),
                    Arc::clone(&scope),
                    Arc::clone(&projection),
                )
            }))
        },
    }
}

/// Wrap `effect` so that what it dispatches is scoped and what it reads is
/// projected.
#[must_use]
pub fn scope_effect(effect: Effect, scope: Arc<str>, projection: StateProjection) -> Effect {
    match effect {
        Effect::None => Effect::None,
        Effect::Sequential(effects) => Effect::Sequential(
            effects
                .into_iter()
                .map(|e| scope_effect(e, Arc::clone(&scope), Arc::clone(&projection)))
                .collect(),
        ),
        Effect::Thunk(thunk) => Effect::thunk(move |dispatch, state| {
            let scoped_dispatch = ScopedDispatch {
                scope: &scope,
                projection: &projection,
                inner: dispatch,
            };
            let scoped_state = ScopedState {
                projection: &projection,
                inner: state,
            };
            thunk.run(&scoped_dispatch, &scoped_state)
        }),
    }
}

struct ScopedDispatch<'a> {
    scope: &'a Arc<str>,
    projection: &'a StateProjection,
    inner: &'a dyn Dispatch,
}

impl Dispatch for ScopedDispatch<'_> {
    fn dispatch(&self, item: Dispatchable) -> Result<(), DispatchError> {
        let item = match item {
            Dispatchable::Action(action) => Dispatchable::Action(scope_action(self.scope, &action)),
            Dispatchable::Effect(effect) => Dispatchable::Effect(scope_effect(
                effect,
                Arc::clone(self.scope),
                Arc::clone(self.projection),
            )),
        };
        self.inner.dispatch(item)
    }
}

struct ScopedState<'a> {
    projection: &'a StateProjection,
    inner: &'a dyn GetState,
}

impl GetState for ScopedState<'_> {
    fn get_state(&self) -> Value {
        (self.projection)(&self.inner.get_root_state())
    }

    fn get_root_state(&self) -> Value {
        self.inner.get_root_state()
    }
}
