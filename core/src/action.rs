//! Tagged actions and action creators.
//!
//! Every [`ActionCreator`] mints a fresh [`Tag`] when it is built. Reducers
//! match on the tag, never on the human-readable name, so two creators named
//! `"increment"` in different modules never collide.
//!
//! # Examples
//!
//! ```
//! use redux_kit_core::action::create_action;
//! use redux_kit_core::value::Value;
//!
//! let increment = create_action("increment");
//! let first = increment.create(5);
//! let second = increment.create(10);
//!
//! assert_eq!(first.action_type, second.action_type);
//! assert_eq!(first.payload, Value::Int(5));
//! assert!(first.meta.is_null());
//! assert_ne!(increment.action_type(), create_action("increment").action_type());
//! ```

use crate::effect::{Dispatchable, Effect};
use crate::value::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

static NEXT_TAG_ID: AtomicU64 = AtomicU64::new(1);

static INIT: LazyLock<Action> = LazyLock::new(|| Action::new(Tag::new("@@INIT"), Value::Null));

/// Opaque identifier of an action kind.
///
/// Equality and hashing consider only the id minted at construction; the
/// name is carried for debugging.
#[derive(Clone)]
pub struct Tag {
    id: u64,
    name: Arc<str>,
}

impl Tag {
    /// Mint a new tag. Never equal to any previously minted tag.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: NEXT_TAG_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }
    }

    /// Numeric id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Debug name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({}#{})", self.name, self.id)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

/// An intended state transition.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    /// Kind of the action
    pub action_type: Tag,
    /// Data for the transition, `Null` when absent
    pub payload: Value,
    /// Side-channel data such as the scope marker, `Null` when absent
    pub meta: Value,
}

impl Action {
    /// Create an action without metadata.
    #[must_use]
    pub fn new(action_type: Tag, payload: impl Into<Value>) -> Self {
        Self {
            action_type,
            payload: payload.into(),
            meta: Value::Null,
        }
    }

    /// Replace the metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: impl Into<Value>) -> Self {
        self.meta = meta.into();
        self
    }

    /// The action used to obtain a reducer's initial state.
    ///
    /// Its tag is reserved, so no handler created through
    /// [`create_action`] can ever match it.
    #[must_use]
    pub fn init() -> Self {
        INIT.clone()
    }

    /// Whether this is [`Action::init`].
    #[must_use]
    pub fn is_init(&self) -> bool {
        self.action_type == INIT.action_type
    }

    /// The `meta.scope` marker, if any.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.meta.get("scope").and_then(Value::as_str)
    }
}

type Mapper = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Builds [`Action`]s that share one [`Tag`].
#[derive(Clone)]
pub struct ActionCreator {
    action_type: Tag,
    map_payload: Option<Mapper>,
    map_meta: Option<Mapper>,
}

/// Create an action creator with identity payload and meta mappers.
#[must_use]
pub fn create_action(name: impl Into<Arc<str>>) -> ActionCreator {
    ActionCreator {
        action_type: Tag::new(name),
        map_payload: None,
        map_meta: None,
    }
}

impl ActionCreator {
    /// Use `f` to derive the payload from the raw call argument.
    #[must_use]
    pub fn with_payload_mapper<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.map_payload = Some(Arc::new(f));
        self
    }

    /// Use `f` to derive the meta from the raw call argument.
    #[must_use]
    pub fn with_meta_mapper<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.map_meta = Some(Arc::new(f));
        self
    }

    /// Apply `f` after the current meta mapper. The tag is kept.
    #[must_use]
    pub fn then_meta<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        let mapper: Mapper = match self.map_meta.take() {
            Some(previous) => Arc::new(move |meta: Value| f(previous(meta))),
            None => Arc::new(f),
        };
        self.map_meta = Some(mapper);
        self
    }

    /// The tag shared by every action this creator builds.
    #[must_use]
    pub const fn action_type(&self) -> &Tag {
        &self.action_type
    }

    /// Build an action with no metadata.
    #[must_use]
    pub fn create(&self, payload: impl Into<Value>) -> Action {
        self.create_with_meta(payload, Value::Null)
    }

    /// Build an action.
    #[must_use]
    pub fn create_with_meta(&self, payload: impl Into<Value>, meta: impl Into<Value>) -> Action {
        let payload = payload.into();
        let meta = meta.into();
        Action {
            action_type: self.action_type.clone(),
            payload: match &self.map_payload {
                Some(f) => f(payload),
                None => payload,
            },
            meta: match &self.map_meta {
                Some(f) => f(meta),
                None => meta,
            },
        }
    }

    /// Build an action from several payload parts.
    ///
    /// A single part is used as is, several parts are shallow-merged left to
    /// right into one map, and no parts give a `Null` payload. When merging,
    /// parts that are not maps are skipped.
    #[must_use]
    pub fn create_merged<I>(&self, parts: I) -> Action
    where
        I: IntoIterator<Item = Value>,
    {
        let mut parts = parts.into_iter();
        let payload = match (parts.next(), parts.next()) {
            (None, _) => Value::Null,
            (Some(only), None) => only,
            (Some(first), Some(second)) => [first, second]
                .into_iter()
                .chain(parts)
                .filter(|part| part.as_map().is_some())
                .fold(Value::empty_map(), |acc, part| acc.merge(&part)),
        };
        self.create(payload)
    }

    /// Whether `action` was built by this creator.
    #[must_use]
    pub fn matches(&self, action: &Action) -> bool {
        action.action_type == self.action_type
    }
}

impl fmt::Debug for ActionCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreator")
            .field("action_type", &self.action_type)
            .field("map_payload", &self.map_payload.is_some())
            .field("map_meta", &self.map_meta.is_some())
            .finish()
    }
}

type EffectFactory = Arc<dyn Fn(Value, Value) -> Effect + Send + Sync>;

/// Builds deferred [`Effect`]s instead of plain actions.
#[derive(Clone)]
pub struct EffectCreator {
    name: Arc<str>,
    factory: EffectFactory,
}

impl EffectCreator {
    /// Create an effect creator from a factory of `(payload, meta)`.
    pub fn new<F>(name: impl Into<Arc<str>>, factory: F) -> Self
    where
        F: Fn(Value, Value) -> Effect + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            factory: Arc::new(factory),
        }
    }

    /// Debug name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the effect.
    #[must_use]
    pub fn create(&self, payload: impl Into<Value>, meta: impl Into<Value>) -> Effect {
        (self.factory)(payload.into(), meta.into())
    }
}

impl fmt::Debug for EffectCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectCreator").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Leaf of an action tree.
#[derive(Clone, Debug)]
pub enum Creator {
    /// Builds plain actions
    Action(ActionCreator),
    /// Builds effects
    Effect(EffectCreator),
}

impl Creator {
    /// Invoke the creator.
    #[must_use]
    pub fn call(&self, payload: impl Into<Value>, meta: impl Into<Value>) -> Dispatchable {
        match self {
            Self::Action(creator) => Dispatchable::Action(creator.create_with_meta(payload, meta)),
            Self::Effect(creator) => Dispatchable::Effect(creator.create(payload, meta)),
        }
    }

    /// Debug name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Action(creator) => creator.action_type().name(),
            Self::Effect(creator) => creator.name(),
        }
    }

    /// The tag, for plain action creators.
    #[must_use]
    pub const fn action_type(&self) -> Option<&Tag> {
        match self {
            Self::Action(creator) => Some(creator.action_type()),
            Self::Effect(_) => None,
        }
    }
}

impl From<ActionCreator> for Creator {
    fn from(creator: ActionCreator) -> Self {
        Self::Action(creator)
    }
}

impl From<EffectCreator> for Creator {
    fn from(creator: EffectCreator) -> Self {
        Self::Effect(creator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tags_are_unique_even_with_same_name() {
        let tags: Vec<Tag> = (0..100).map(|_| Tag::new("same")).collect();
        let unique: HashSet<&Tag> = tags.iter().collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn test_create_action_shares_tag() {
        let increment = create_action("increment");
        let a = increment.create(5);
        let b = increment.create(10);

        assert_eq!(a.action_type, *increment.action_type());
        assert_eq!(a.action_type, b.action_type);
        assert_eq!(a.payload, Value::Int(5));
        assert_eq!(b.payload, Value::Int(10));
        assert_eq!(a.meta, Value::Null);
        assert!(increment.matches(&a));
    }

    #[test]
    fn test_mappers() {
        let add = create_action("add")
            .with_payload_mapper(|p| Value::map([("amount", p)]))
            .with_meta_mapper(|_| Value::map([("source", "test")]));

        let action = add.create(3);
        assert_eq!(action.payload.get("amount"), Some(&Value::Int(3)));
        assert_eq!(action.meta.get("source").and_then(Value::as_str), Some("test"));
    }

    #[test]
    fn test_then_meta_composes() {
        let creator = create_action("x")
            .with_meta_mapper(|m| m.set("first", true))
            .then_meta(|m| m.set("second", true));

        let action = creator.create(Value::Null);
        assert_eq!(action.meta.get("first"), Some(&Value::Bool(true)));
        assert_eq!(action.meta.get("second"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_create_merged() {
        let creator = create_action("merge");

        assert_eq!(creator.create_merged(Vec::new()).payload, Value::Null);
        assert_eq!(creator.create_merged([Value::Int(1)]).payload, Value::Int(1));

        let merged = creator.create_merged([
            Value::map([("a", 1)]),
            Value::map([("b", 2)]),
            Value::map([("a", 3)]),
        ]);
        assert_eq!(merged.payload.get("a"), Some(&Value::Int(3)));
        assert_eq!(merged.payload.get("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_create_merged_skips_non_map_parts() {
        let creator = create_action("merge");

        let merged = creator.create_merged([Value::map([("a", 1)]), Value::Int(5), Value::from("x")]);
        assert_eq!(merged.payload, Value::map([("a", 1)]));

        let scalars = creator.create_merged([Value::Int(5), Value::Null]);
        assert_eq!(scalars.payload, Value::empty_map());
    }

    #[test]
    fn test_init_action_is_reserved() {
        assert!(Action::init().is_init());
        assert!(!create_action("@@INIT").create(Value::Null).is_init());
    }

    #[test]
    fn test_scope_reads_meta() {
        let action = create_action("x")
            .create(1)
            .with_meta(Value::map([("scope", "feature")]));
        assert_eq!(action.scope(), Some("feature"));
        assert_eq!(create_action("y").create(1).scope(), None);
    }

    #[test]
    fn test_creator_call_dispatchable() {
        let creator = Creator::from(create_action("x"));
        assert!(matches!(creator.call(1, Value::Null), Dispatchable::Action(_)));

        let effect = Creator::from(EffectCreator::new("noop", |_, _| Effect::None));
        assert!(matches!(effect.call(1, Value::Null), Dispatchable::Effect(Effect::None)));
        assert_eq!(effect.name(), "noop");
        assert!(effect.action_type().is_none());
    }
}
