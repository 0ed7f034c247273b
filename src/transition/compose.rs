//! Recursive classification of nested collections.
//!
//! A child pass never sees the whole previous tree: its previous sibling set is the children of
//! the parent's matched previous node. The one exception is teleportation, where a child names
//! the previous element it continues (`<previousParentKey>:<previousChildKey>`) and is matched
//! through an index over every previous parent's children.

use std::collections::{HashMap, HashSet};

use kurbo::Vec2;

use crate::transition::{
    accessor::{Builder, Lifecycle},
    classify::{KeyIndex, LeafNode, Node, classify, classify_with},
};

/// A builder that owns a nested collection of child builders.
pub trait Parent: Builder {
    /// Builder of each nested element.
    type Child: Builder;

    /// Nested builders in display order.
    fn children(&self) -> &[Self::Child];
}

/// A child builder that may continue an element from another parent.
pub trait Teleport: Builder {
    /// Composite key of the previous element, as built by [`teleport_key`].
    fn teleport_from(&self) -> Option<&str>;
}

/// Parent snapshots: origin of the children's coordinate frame.
pub trait Anchored {
    /// Settled origin, in the parent's own coordinates.
    fn anchor(&self) -> Vec2;
}

/// Child snapshots that can be moved into another parent's coordinate frame.
pub trait Relocate {
    /// Shift the position by `delta`.
    fn relocate(&mut self, delta: Vec2);
}

/// Composite key identifying a child across parents.
pub fn teleport_key(parent: &str, child: &str) -> String {
    format!("{parent}:{child}")
}

/// Compose a sibling set whose children are composed by `children`.
///
/// `children` receives the element's builder, its lifecycle state and its basis (the previous
/// node whose children form the previous child set).
pub fn compose_nodes<'p, B, C, F>(
    current: &[B],
    previous: &'p [Node<B, C>],
    mut children: F,
) -> Vec<Node<B, C>>
where
    B: Builder,
    F: FnMut(&B, Lifecycle, Option<&'p Node<B, C>>) -> Vec<C>,
{
    classify(current, previous)
        .into_iter()
        .map(|c| {
            let kids = children(&c.builder, c.transition.state, c.basis);
            c.into_node(kids)
        })
        .collect()
}

/// Compose a sibling set of childless elements.
pub fn compose_leaves<B: Builder>(current: &[B], previous: &[LeafNode<B>]) -> Vec<LeafNode<B>> {
    compose_nodes(current, previous, |_, _, _| Vec::new())
}

/// A previous child reachable by teleport key.
pub struct TeleportHit<'p, B: Builder, C> {
    /// Settled anchor of the child's previous parent.
    pub parent_anchor: Vec2,
    /// The previous child.
    pub node: &'p Node<B, C>,
}

impl<B: Builder, C> Clone for TeleportHit<'_, B, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Builder, C> Copy for TeleportHit<'_, B, C> {}

/// Flat teleport-key index over every previous parent's children.
pub struct TeleportIndex<'p, B: Builder, C> {
    map: HashMap<String, TeleportHit<'p, B, C>>,
}

impl<'p, B: Builder, C> TeleportIndex<'p, B, C> {
    /// Index the children of every node in `parents`.
    pub fn new<P>(parents: &'p [Node<P, Node<B, C>>]) -> Self
    where
        P: Parent<Child = B>,
        P::Snapshot: Anchored,
    {
        let mut map = HashMap::new();
        for parent in parents {
            let parent_anchor = parent.transition.settled().anchor();
            for node in &parent.children {
                map.insert(
                    teleport_key(parent.key(), node.key()),
                    TeleportHit {
                        parent_anchor,
                        node,
                    },
                );
            }
        }
        Self { map }
    }

    /// Hit for a composite `<parent>:<child>` key.
    pub fn get(&self, teleport_key: &str) -> Option<TeleportHit<'p, B, C>> {
        self.map.get(teleport_key).copied()
    }

    /// Number of indexed children.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no previous parent had children.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Compose parents whose children may teleport between them.
///
/// On top of [`compose_nodes`]:
/// - a current child with `teleport_from` is matched through the global [`TeleportIndex`]; an
///   unknown reference leaves it unmatched (a plain enter)
/// - a teleported child's "from" position is shifted by the old parent's settled anchor minus
///   the new parent's settled anchor
/// - a previous child claimed by some current `teleport_from` is dropped from its old parent's
///   exiting children
///
/// `grandchildren` composes each child's own children, as in [`compose_nodes`].
pub fn compose_family<'p, P, CC, F>(
    current: &[P],
    previous: &'p [Node<P, Node<P::Child, CC>>],
    mut grandchildren: F,
) -> Vec<Node<P, Node<P::Child, CC>>>
where
    P: Parent,
    P::Snapshot: Anchored,
    P::Child: Teleport,
    <P::Child as Builder>::Snapshot: Relocate,
    F: FnMut(&P::Child, Lifecycle, Option<&'p Node<P::Child, CC>>) -> Vec<CC>,
{
    let index = TeleportIndex::new(previous);
    let claimed: HashSet<&str> = current
        .iter()
        .flat_map(|p| p.children())
        .filter_map(|c| c.teleport_from())
        .collect();

    classify(current, previous)
        .into_iter()
        .map(|parent| {
            let state = parent.transition.state;
            let anchor = parent.transition.settled().anchor();
            let prev_children: &'p [Node<P::Child, CC>] = parent
                .basis
                .map(|n| n.children.as_slice())
                .unwrap_or_default();
            let cur_children: &[P::Child] = if state.is_exit() {
                &[]
            } else {
                parent.builder.children()
            };
            let by_key = KeyIndex::new(prev_children);

            let classified = classify_with(cur_children, prev_children, |child, exiting| {
                match child.teleport_from() {
                    Some(reference) if !exiting => {
                        let hit = index.get(reference);
                        if hit.is_none() {
                            tracing::debug!(
                                key = child.key(),
                                reference,
                                "teleport reference not found; entering"
                            );
                        }
                        hit.map(|h| h.node)
                    }
                    _ => by_key.get(child.key()),
                }
            });

            let mut kids = Vec::with_capacity(classified.len());
            for mut child in classified {
                let child_state = child.transition.state;
                if child_state.is_exit()
                    && claimed.contains(
                        teleport_key(parent.builder.key(), child.builder.key()).as_str(),
                    )
                {
                    continue;
                }
                if child_state == Lifecycle::Update {
                    if let Some(hit) = child.builder.teleport_from().and_then(|r| index.get(r)) {
                        child.transition.from.relocate(hit.parent_anchor - anchor);
                    }
                }
                let gc = grandchildren(&child.builder, child_state, child.basis);
                kids.push(child.into_node(gc));
            }
            parent.into_node(kids)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/transition/compose.rs"]
mod tests;
