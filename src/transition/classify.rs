use std::collections::{HashMap, HashSet};

use crate::transition::{
    accessor::{Accessor, Builder, Lifecycle, Moment},
    lerp::Lerp,
};

/// Interpolator for one keyed element: `t ↦ lerp(from, to, t)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Transition<G> {
    /// Element key among its siblings.
    pub key: String,
    /// How the element changes between the two steps.
    pub state: Lifecycle,
    /// Snapshot at `t = 0`.
    pub from: G,
    /// Snapshot at `t = 1`.
    pub to: G,
}

impl<G: Lerp + Clone> Transition<G> {
    /// Snapshot at progress `t`.
    pub fn sample(&self, t: f64) -> G {
        G::lerp(&self.from, &self.to, t)
    }

    /// The snapshot the element rests at once the transition completes.
    pub fn settled(&self) -> G {
        self.sample(1.0)
    }
}

/// One element of an interpolator tree, with its builder kept for the next classification pass.
#[derive(Clone, Debug)]
pub struct Node<B: Builder, C> {
    /// Builder of the current step, or the previous builder for exiting elements.
    pub builder: B,
    /// The element's own interpolator.
    pub transition: Transition<B::Snapshot>,
    /// Composed child nodes.
    pub children: Vec<C>,
}

impl<B: Builder, C> Node<B, C> {
    /// Element key.
    pub fn key(&self) -> &str {
        &self.transition.key
    }

    /// Element lifecycle.
    pub fn state(&self) -> Lifecycle {
        self.transition.state
    }

    /// Still on screen after this transition completes.
    pub fn is_live(&self) -> bool {
        !self.state().is_exit()
    }
}

/// Child type of nodes that never have children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Leaf {}

impl serde::Serialize for Leaf {
    fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        match *self {}
    }
}

/// Node without children.
pub type LeafNode<B> = Node<B, Leaf>;

/// Output of one classification pass, before the element's children are attached.
pub struct Classified<'p, B: Builder, C> {
    /// See [`Node::builder`].
    pub builder: B,
    /// See [`Node::transition`].
    pub transition: Transition<B::Snapshot>,
    /// Previous node whose children seed the child pass: the match for updating and exiting
    /// elements, `None` for entering ones.
    pub basis: Option<&'p Node<B, C>>,
}

impl<B: Builder, C> Classified<'_, B, C> {
    /// Attach the composed children.
    pub fn into_node(self, children: Vec<C>) -> Node<B, C> {
        Node {
            builder: self.builder,
            transition: self.transition,
            children,
        }
    }
}

/// Key → node lookup over one sibling set.
pub struct KeyIndex<'p, B: Builder, C> {
    map: HashMap<&'p str, &'p Node<B, C>>,
}

impl<'p, B: Builder, C> KeyIndex<'p, B, C> {
    /// Index `nodes` by key; on duplicates the last one wins.
    pub fn new(nodes: &'p [Node<B, C>]) -> Self {
        let mut map = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if map.insert(node.key(), node).is_some() {
                tracing::warn!(key = node.key(), "duplicate sibling key in previous frame");
            }
        }
        Self { map }
    }

    /// Node with `key`, if any.
    pub fn get(&self, key: &str) -> Option<&'p Node<B, C>> {
        self.map.get(key).copied()
    }
}

/// Classify `current` against the previous sibling set, matching by key.
pub fn classify<'p, B, C>(current: &[B], previous: &'p [Node<B, C>]) -> Vec<Classified<'p, B, C>>
where
    B: Builder,
{
    let index = KeyIndex::new(previous);
    classify_with(current, previous, |builder, _exiting| index.get(builder.key()))
}

/// Classify `current` against the previous sibling set with a custom matcher.
///
/// Current elements come first, then previous live elements whose key is gone (exiting), so
/// draw order favors continuity. The matcher receives each builder and whether it is exiting.
pub fn classify_with<'p, B, C, M>(
    current: &[B],
    previous: &'p [Node<B, C>],
    mut matcher: M,
) -> Vec<Classified<'p, B, C>>
where
    B: Builder,
    M: FnMut(&B, bool) -> Option<&'p Node<B, C>>,
{
    let mut current_keys = HashSet::with_capacity(current.len());
    for builder in current {
        if !current_keys.insert(builder.key()) {
            tracing::warn!(
                key = builder.key(),
                "duplicate sibling key; the last element wins"
            );
        }
    }

    let mut order: Vec<(&B, bool)> = current.iter().map(|b| (b, false)).collect();
    order.extend(
        previous
            .iter()
            .filter(|n| n.is_live() && !current_keys.contains(n.key()))
            .map(|n| (&n.builder, true)),
    );

    order
        .into_iter()
        .map(|(builder, exiting)| {
            let matched = matcher(builder, exiting);
            classify_one(builder, exiting, matched)
        })
        .collect()
}

fn classify_one<'p, B, C>(
    builder: &B,
    exiting: bool,
    matched: Option<&'p Node<B, C>>,
) -> Classified<'p, B, C>
where
    B: Builder,
{
    let basis = matched.filter(|n| n.is_live());
    let state = match (exiting, basis.is_some()) {
        (true, _) => Lifecycle::Exit,
        (false, true) => Lifecycle::Update,
        (false, false) => Lifecycle::Enter,
    };

    let (from, to) = match basis {
        Some(prev) => {
            let settled = prev.transition.settled();
            let to = builder.build(&Accessor::new(state.target_moment(), Some(&settled)));
            (settled, to)
        }
        None => {
            let from = builder.build(&Accessor::enter_start());
            let to = if exiting {
                // No live counterpart yet exiting: enter immediately followed by exit.
                from.clone()
            } else {
                builder.build(&Accessor::new(Moment::Settled, None))
            };
            (from, to)
        }
    };

    Classified {
        builder: builder.clone(),
        transition: Transition {
            key: builder.key().to_owned(),
            state,
            from,
            to,
        },
        basis,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/classify.rs"]
mod tests;
