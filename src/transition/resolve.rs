use crate::transition::{
    accessor::{Builder, Lifecycle},
    classify::{Leaf, Node},
};

/// One element of a sampled frame, ready for attribute binding.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Resolved<G, R> {
    /// Element key.
    pub key: String,
    /// Lifecycle of the sampled transition.
    pub state: Lifecycle,
    /// Sampled attributes, flattened into the element's JSON object.
    #[serde(flatten)]
    pub snapshot: G,
    /// Resolved children; omitted from JSON when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<R>,
}

/// Sampling of an interpolator tree at progress `t`.
///
/// `t` is not clamped. Every descendant is sampled at the same `t`.
pub trait Resolve {
    /// Sampled form of the implementor.
    type Output;

    /// Sample at progress `t`.
    fn resolve(&self, t: f64) -> Self::Output;
}

impl<B: Builder, C: Resolve> Resolve for Node<B, C> {
    type Output = Resolved<B::Snapshot, C::Output>;

    fn resolve(&self, t: f64) -> Self::Output {
        Resolved {
            key: self.key().to_owned(),
            state: self.state(),
            snapshot: self.transition.sample(t),
            children: resolve(&self.children, t),
        }
    }
}

impl Resolve for Leaf {
    type Output = Leaf;

    fn resolve(&self, _t: f64) -> Leaf {
        match *self {}
    }
}

/// Resolve every node of a sibling set at the same `t`.
pub fn resolve<N: Resolve>(nodes: &[N], t: f64) -> Vec<N::Output> {
    nodes.iter().map(|n| n.resolve(t)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/transition/resolve.rs"]
mod tests;
