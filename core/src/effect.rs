//! Effects and the dispatch capabilities they run against.
//!
//! An [`Effect`] is a description of deferred work. It is not executed when
//! it is created: whoever owns the state (usually a store) runs it and hands
//! it the two capabilities it may use, a [`Dispatch`] to send further
//! actions and a [`GetState`] to read the current state.

use crate::action::Action;
use crate::error::DispatchError;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Something a dispatcher accepts: a plain action or an effect.
#[derive(Debug)]
pub enum Dispatchable {
    /// Reduced immediately
    Action(Action),
    /// Run with `dispatch` and `get_state` capabilities
    Effect(Effect),
}

impl Dispatchable {
    /// The action, if this is one.
    #[must_use]
    pub const fn as_action(&self) -> Option<&Action> {
        match self {
            Self::Action(action) => Some(action),
            Self::Effect(_) => None,
        }
    }
}

impl From<Action> for Dispatchable {
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

impl From<Effect> for Dispatchable {
    fn from(effect: Effect) -> Self {
        Self::Effect(effect)
    }
}

/// Capability to dispatch actions and effects.
pub trait Dispatch {
    /// Dispatch one item.
    ///
    /// # Errors
    ///
    /// Returns whatever error the reducer or effect chain raised.
    fn dispatch(&self, item: Dispatchable) -> Result<(), DispatchError>;
}

impl<D: Dispatch + ?Sized> Dispatch for &D {
    fn dispatch(&self, item: Dispatchable) -> Result<(), DispatchError> {
        (**self).dispatch(item)
    }
}

impl<D: Dispatch + ?Sized> Dispatch for Arc<D> {
    fn dispatch(&self, item: Dispatchable) -> Result<(), DispatchError> {
        (**self).dispatch(item)
    }
}

/// A [`Dispatch`] backed by a closure. Created by [`dispatch_fn`].
#[derive(Clone)]
pub struct FnDispatch<F> {
    f: F,
}

/// Wrap a closure as a [`Dispatch`].
pub const fn dispatch_fn<F>(f: F) -> FnDispatch<F>
where
    F: Fn(Dispatchable) -> Result<(), DispatchError>,
{
    FnDispatch { f }
}

impl<F> Dispatch for FnDispatch<F>
where
    F: Fn(Dispatchable) -> Result<(), DispatchError>,
{
    fn dispatch(&self, item: Dispatchable) -> Result<(), DispatchError> {
        (self.f)(item)
    }
}

impl<F> fmt::Debug for FnDispatch<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnDispatch(<closure>)")
    }
}

/// Capability to read state.
pub trait GetState {
    /// The state this caller is meant to see. Scoped callers see a slice.
    fn get_state(&self) -> Value;

    /// The root state, regardless of scoping.
    fn get_root_state(&self) -> Value {
        self.get_state()
    }
}

impl<F> GetState for F
where
    F: Fn() -> Value,
{
    fn get_state(&self) -> Value {
        self()
    }
}

type ThunkFn = Box<dyn FnOnce(&dyn Dispatch, &dyn GetState) -> Result<(), DispatchError> + Send>;

/// A deferred computation with explicit capabilities.
pub struct Thunk(ThunkFn);

impl Thunk {
    /// Run the computation.
    ///
    /// # Errors
    ///
    /// Propagates the computation's error.
    pub fn run(self, dispatch: &dyn Dispatch, state: &dyn GetState) -> Result<(), DispatchError> {
        (self.0)(dispatch, state)
    }
}

/// Effect type - describes deferred work to be run by the state owner
///
/// Effects are NOT executed when created. They are returned from effect
/// creators and executed by whoever owns the state.
pub enum Effect {
    /// No-op effect
    None,

    /// Run effects one after another, stopping at the first error
    Sequential(Vec<Effect>),

    /// Deferred computation receiving `dispatch` and `get_state`
    Thunk(Thunk),
}

// Manual Debug implementation since thunks are closures
impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "Effect::None"),
            Self::Sequential(effects) => f.debug_tuple("Effect::Sequential").field(effects).finish(),
            Self::Thunk(_) => write!(f, "Effect::Thunk(<thunk>)"),
        }
    }
}

impl Effect {
    /// Wrap a closure as a thunk effect.
    pub fn thunk<F>(f: F) -> Self
    where
        F: FnOnce(&dyn Dispatch, &dyn GetState) -> Result<(), DispatchError> + Send + 'static,
    {
        Self::Thunk(Thunk(Box::new(f)))
    }

    /// Chain effects to run sequentially
    #[must_use]
    pub const fn chain(effects: Vec<Effect>) -> Self {
        Self::Sequential(effects)
    }

    /// Whether this effect does nothing.
    #[must_use]
    pub fn is_none(&self) -> bool {
        match self {
            Self::None => true,
            Self::Sequential(effects) => effects.iter().all(Self::is_none),
            Self::Thunk(_) => false,
        }
    }

    /// Run the effect against the given capabilities.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a thunk or by a dispatch it made.
    pub fn run(self, dispatch: &dyn Dispatch, state: &dyn GetState) -> Result<(), DispatchError> {
        match self {
            Self::None => Ok(()),
            Self::Sequential(effects) => {
                for effect in effects {
                    effect.run(dispatch, state)?;
                }
                Ok(())
            },
            Self::Thunk(thunk) => thunk.run(dispatch, state),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::action::create_action;
    use std::sync::Mutex;

    #[test]
    fn test_thunk_receives_capabilities() {
        let seen = Mutex::new(Vec::new());
        let dispatch = dispatch_fn(|item: Dispatchable| {
            if let Dispatchable::Action(action) = item {
                seen.lock().unwrap().push(action.payload);
            }
            Ok(())
        });

        let add = create_action("add");
        let effect = Effect::thunk(move |dispatch, state| {
            let current = state.get_state().as_i64().unwrap_or(0);
            dispatch.dispatch(add.create(current + 1).into())
        });

        effect.run(&dispatch, &|| Value::Int(41)).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![Value::Int(42)]);
    }

    #[test]
    fn test_sequential_stops_at_first_error() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let effect = Effect::chain(vec![
            Effect::thunk(|_, _| Err(DispatchError::Rejected("boom".to_string()))),
            Effect::thunk(move |_, _| {
                *counter.lock().unwrap() += 1;
                Ok(())
            }),
        ]);

        let dispatch = dispatch_fn(|_| Ok(()));
        let result = effect.run(&dispatch, &|| Value::Null);

        assert!(matches!(result, Err(DispatchError::Rejected(_))));
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_is_none() {
        assert!(Effect::None.is_none());
        assert!(Effect::chain(vec![Effect::None, Effect::None]).is_none());
        assert!(!Effect::thunk(|_, _| Ok(())).is_none());
        assert_eq!(format!("{:?}", Effect::thunk(|_, _| Ok(()))), "Effect::Thunk(<thunk>)");
    }
}
