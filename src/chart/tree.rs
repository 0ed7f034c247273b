use crate::{
    chart::{
        elements::{
            DatumBuilder, DatumSnapshot, GroupBuilder, GroupSnapshot, LabelBuilder, LabelSnapshot,
        },
        model::{ChartKind, Step, StoryOptions},
    },
    transition::{
        accessor::Lifecycle,
        classify::{Leaf, LeafNode, Node},
        compose::{compose_family, compose_leaves},
        resolve::{Resolved, resolve},
    },
};

/// Composed label.
pub type LabelNode = LeafNode<LabelBuilder>;
/// Composed datum with its labels.
pub type DatumNode = Node<DatumBuilder, LabelNode>;
/// Composed group with its data.
pub type GroupNode = Node<GroupBuilder, DatumNode>;

/// Sampled label.
pub type ResolvedLabel = Resolved<LabelSnapshot, Leaf>;
/// Sampled datum.
pub type ResolvedDatum = Resolved<DatumSnapshot, ResolvedLabel>;
/// Sampled group.
pub type ResolvedGroup = Resolved<GroupSnapshot, ResolvedDatum>;

/// Interpolator tree for one transition into a step.
#[derive(Clone, Debug)]
pub struct StepTree {
    /// Chart type of the target step.
    pub chart: ChartKind,
    /// Groups: current ones in step order, then exiting ones.
    pub groups: Vec<GroupNode>,
}

impl StepTree {
    /// Element counts per lifecycle state across all levels, as `(enter, update, exit)`.
    pub fn census(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        let mut bump = |state: Lifecycle| match state {
            Lifecycle::Enter => counts.0 += 1,
            Lifecycle::Update => counts.1 += 1,
            Lifecycle::Exit => counts.2 += 1,
        };
        for group in &self.groups {
            bump(group.state());
            for datum in &group.children {
                bump(datum.state());
                for label in &datum.children {
                    bump(label.state());
                }
            }
        }
        counts
    }
}

/// A sampled step, ready for attribute binding.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ResolvedFrame {
    /// Chart type of the target step.
    pub chart: ChartKind,
    /// Progress the frame was sampled at.
    pub t: f64,
    /// Sampled groups.
    pub groups: Vec<ResolvedGroup>,
}

/// Encode every group of `step` with the story's options.
pub fn builders_for(step: &Step, options: &StoryOptions) -> Vec<GroupBuilder> {
    step.groups
        .iter()
        .map(|g| GroupBuilder::from_spec(g, options.cartoonize))
        .collect()
}

/// Build the interpolator tree from `previous` (sampled at its settled state) to `step`.
///
/// The step is assumed valid; see [`Step::validate`].
#[tracing::instrument(skip_all, fields(chart = ?step.chart, groups = step.groups.len()))]
pub fn compose_step(step: &Step, options: &StoryOptions, previous: Option<&StepTree>) -> StepTree {
    let builders = builders_for(step, options);
    let previous_groups = previous.map(|p| p.groups.as_slice()).unwrap_or_default();

    let groups = compose_family(&builders, previous_groups, |datum, state, basis| {
        let current: &[LabelBuilder] = if state.is_exit() {
            &[]
        } else {
            &datum.labels
        };
        let previous_labels = basis.map(|n| n.children.as_slice()).unwrap_or_default();
        compose_leaves(current, previous_labels)
    });

    let tree = StepTree {
        chart: step.chart,
        groups,
    };
    let (enter, update, exit) = tree.census();
    tracing::debug!(enter, update, exit, "composed step");
    tree
}

/// Sample `tree` at progress `t`.
pub fn resolve_step(tree: &StepTree, t: f64) -> ResolvedFrame {
    ResolvedFrame {
        chart: tree.chart,
        t,
        groups: resolve(&tree.groups, t),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chart/tree.rs"]
mod tests;
