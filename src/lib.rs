//! Chartmorph morphs SVG charts between declarative steps.
//!
//! Every on-screen element (group, datum, label) is keyed by a stable identity. When the chart
//! moves to a new step, each element is classified as entering, updating or exiting and gets an
//! interpolator from its previous settled state to its new one. Sampling all interpolators at
//! the same progress `t` yields one frame.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: `Step` configuration is checked once, when it is accepted.
//! 2. **Compose**: `Step + previous StepTree -> StepTree` (classification per level, with
//!    datums allowed to teleport between groups)
//! 3. **Resolve**: `StepTree + t -> ResolvedFrame` (flat snapshots ready for attribute binding)
//!
//! Shapes are encoded by a fixed-topology codec: every rectangle, circle and wedge becomes the
//! same number of cubic segments, so any two shapes interpolate pointwise.
//!
//! The engine does no scheduling or rendering; [`AnimationSession`] keeps the previous tree and
//! [`Playback`] maps elapsed time to progress for a caller-driven clock.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod chart {
    pub mod elements;
    pub mod model;
    pub mod tree;
}
mod foundation {
    pub mod core;
    pub mod error;
}
mod session;
mod shape {
    pub mod codec;
}
mod transition {
    pub mod accessor;
    pub mod classify;
    pub mod compose;
    pub mod ease;
    pub mod lerp;
    pub mod resolve;
}

pub use chart::elements::{
    DatumBuilder, DatumSnapshot, GroupBuilder, GroupSnapshot, LabelBuilder, LabelSnapshot,
};
pub use chart::model::{ChartKind, DatumSpec, GroupSpec, LabelSpec, Step, Story, StoryOptions};
pub use chart::tree::{
    DatumNode, GroupNode, LabelNode, ResolvedDatum, ResolvedFrame, ResolvedGroup, ResolvedLabel,
    StepTree, builders_for, compose_step, resolve_step,
};
pub use foundation::core::{BezPath, PathEl, Point, Rgba8, Vec2};
pub use foundation::error::{MorphError, MorphResult};
pub use session::AnimationSession;
pub use shape::codec::{
    ARC_MAGIC, ARC_MAGIC_CARTOON, CARTOON_WOBBLE, MIN_EXTENT, MIN_WEDGE_ANGLE, SEGMENT_COUNT,
    ShapePath, ShapeSpec, decode, encode, encode_path, segment_count,
};
pub use transition::accessor::{Accessor, Builder, Lifecycle, Moment, Staged};
pub use transition::classify::{
    Classified, KeyIndex, Leaf, LeafNode, Node, Transition, classify, classify_with,
};
pub use transition::compose::{
    Anchored, Parent, Relocate, Teleport, TeleportHit, TeleportIndex, compose_family,
    compose_leaves, compose_nodes, teleport_key,
};
pub use transition::ease::{Ease, Playback};
pub use transition::lerp::{Lerp, lerp_f64, swap};
pub use transition::resolve::{Resolve, Resolved, resolve};
