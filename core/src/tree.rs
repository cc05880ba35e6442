//! Trees of action creators.
//!
//! A feature module exports all of its action creators as one
//! [`ActionTree`]. Trees are built explicitly, either with
//! [`ActionTree::branch`] or the [`action_tree!`](crate::action_tree) macro,
//! and are rewritten leaf by leaf when bound or scoped.

use std::collections::BTreeMap;

/// Key of a branch entry that aliases the module itself. Traversals skip it.
pub const DEFAULT_ALIAS: &str = "default";

/// Either one leaf or a named mapping of subtrees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionTree<L> {
    /// A single action creator (or a wrapped one)
    Leaf(L),
    /// Named children
    Branch(BTreeMap<String, ActionTree<L>>),
}

impl<L> ActionTree<L> {
    /// A leaf node.
    pub const fn leaf(leaf: L) -> Self {
        Self::Leaf(leaf)
    }

    /// A branch node from key/subtree pairs.
    pub fn branch<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ActionTree<L>)>,
    {
        Self::Branch(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Whether this node is a leaf.
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// The leaf value of this node.
    pub const fn as_leaf(&self) -> Option<&L> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Branch(_) => None,
        }
    }

    /// Child subtree under `key`.
    pub fn get(&self, key: &str) -> Option<&ActionTree<L>> {
        match self {
            Self::Branch(children) => children.get(key),
            Self::Leaf(_) => None,
        }
    }

    /// Subtree at a nested path.
    pub fn get_path<K: AsRef<str>>(&self, path: &[K]) -> Option<&ActionTree<L>> {
        path.iter().try_fold(self, |node, key| node.get(key.as_ref()))
    }

    /// Leaf at a nested path.
    pub fn leaf_at<K: AsRef<str>>(&self, path: &[K]) -> Option<&L> {
        self.get_path(path).and_then(Self::as_leaf)
    }

    /// Child keys of a branch, in order. Empty for leaves.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Branch(children) => children.keys().map(String::as_str).collect(),
            Self::Leaf(_) => Vec::new(),
        }
    }

    /// Every leaf with its dotted path, depth first.
    pub fn leaves(&self) -> Vec<(String, &L)> {
        let mut out = Vec::new();
        self.collect_leaves(String::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: String, out: &mut Vec<(String, &'a L)>) {
        match self {
            Self::Leaf(leaf) => out.push((prefix, leaf)),
            Self::Branch(children) => {
                for (key, child) in children {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    child.collect_leaves(path, out);
                }
            },
        }
    }

    /// Rewrite every leaf, keeping the shape and keys of everything except
    /// [`DEFAULT_ALIAS`] entries.
    ///
    /// Branch entries named [`DEFAULT_ALIAS`] are neither visited nor
    /// emitted, so the output has no `"default"` key at any depth even when
    /// the input does.
    pub fn map_leaves<M, F>(&self, mut f: F) -> ActionTree<M>
    where
        F: FnMut(&L) -> M,
    {
        self.map_node(&mut f)
    }

    fn map_node<M, F>(&self, f: &mut F) -> ActionTree<M>
    where
        F: FnMut(&L) -> M,
    {
        match self {
            Self::Leaf(leaf) => ActionTree::Leaf(f(leaf)),
            Self::Branch(children) => ActionTree::Branch(
                children
                    .iter()
                    .filter(|(key, _)| key.as_str() != DEFAULT_ALIAS)
                    .map(|(key, child)| (key.clone(), child.map_node(f)))
                    .collect(),
            ),
        }
    }
}

/// Build an [`ActionTree`] branch.
///
/// Leaves are written `name => expr` and are converted with `Into`;
/// nested branches are written `name: { ... }`.
///
/// # Example
///
/// ```
/// use redux_kit_core::action::{create_action, Creator};
/// use redux_kit_core::action_tree;
/// use redux_kit_core::tree::ActionTree;
///
/// let tree: ActionTree<Creator> = action_tree! {
///     increment => create_action("increment"),
///     admin: {
///         reset => create_action("reset"),
///     },
/// };
///
/// assert!(tree.leaf_at(&["admin", "reset"]).is_some());
/// ```
#[macro_export]
macro_rules! action_tree {
    ($($body:tt)*) => {
        $crate::tree::ActionTree::Branch({
            #[allow(unused_mut)]
            let mut entries = ::std::collections::BTreeMap::new();
            $crate::__action_tree_entries!(entries; $($body)*);
            entries
        })
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __action_tree_entries {
    ($map:ident;) => {};
    ($map:ident; $key:ident : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $map.insert(
            ::std::string::String::from(stringify!($key)),
            $crate::action_tree!($($inner)*),
        );
        $crate::__action_tree_entries!($map; $($($rest)*)?);
    };
    ($map:ident; $key:ident => $leaf:expr $(, $($rest:tt)*)?) => {
        $map.insert(
            ::std::string::String::from(stringify!($key)),
            $crate::tree::ActionTree::Leaf(::std::convert::Into::into($leaf)),
        );
        $crate::__action_tree_entries!($map; $($($rest)*)?);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ActionTree<u32> {
        ActionTree::branch([
            ("a", ActionTree::leaf(1)),
            (
                "nested",
                ActionTree::branch([("b", ActionTree::leaf(2)), ("c", ActionTree::leaf(3))]),
            ),
            ("default", ActionTree::leaf(99)),
        ])
    }

    #[test]
    fn test_map_leaves_preserves_shape() {
        let mapped = sample().map_leaves(|n| n * 10);

        assert_eq!(mapped.keys(), vec!["a", "nested"]);
        assert_eq!(mapped.leaf_at(&["a"]), Some(&10));
        assert_eq!(mapped.leaf_at(&["nested", "b"]), Some(&20));
        assert_eq!(mapped.leaf_at(&["nested", "c"]), Some(&30));
    }

    #[test]
    fn test_map_leaves_skips_default_alias() {
        let mut visited = Vec::new();
        let _ = sample().map_leaves(|n| visited.push(*n));

        assert_eq!(visited, vec![1, 2, 3]);
    }

    #[test]
    fn test_map_leaves_drops_default_at_every_depth() {
        let tree = ActionTree::branch([(
            "nested",
            ActionTree::branch([("b", ActionTree::leaf(2)), ("default", ActionTree::leaf(7))]),
        )]);
        let mapped = tree.map_leaves(|n| n + 1);

        assert_eq!(mapped.get_path(&["nested"]).map(ActionTree::keys), Some(vec!["b"]));
        assert!(mapped.get_path(&["nested", "default"]).is_none());
    }

    #[test]
    fn test_leaves_paths() {
        let tree = sample();
        let paths: Vec<String> = tree.leaves().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a", "default", "nested.b", "nested.c"]);
    }

    #[test]
    fn test_leaf_root() {
        let tree = ActionTree::leaf("x");
        assert!(tree.is_leaf());
        assert_eq!(tree.map_leaves(|s| s.len()), ActionTree::Leaf(1));
        assert!(tree.get("anything").is_none());
    }

    #[test]
    fn test_macro_builds_nested_branches() {
        let tree: ActionTree<u32> = crate::action_tree! {
            one => 1u32,
            group: {
                two => 2u32,
                deeper: { three => 3u32 },
            },
        };

        assert_eq!(tree.leaf_at(&["one"]), Some(&1));
        assert_eq!(tree.leaf_at(&["group", "two"]), Some(&2));
        assert_eq!(tree.leaf_at(&["group", "deeper", "three"]), Some(&3));
    }
}
