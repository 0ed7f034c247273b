//! Snapshot kinds and builders for the three element levels of a chart step.
//!
//! Positions are local: a datum is placed relative to its group, a label relative to its datum.

use crate::{
    chart::model::{DatumSpec, GroupSpec, LabelSpec},
    foundation::core::{Rgba8, Vec2},
    shape::codec::ShapePath,
    transition::{
        accessor::{Accessor, Builder},
        compose::{Anchored, Parent, Relocate, Teleport, teleport_key},
        lerp::{Lerp, lerp_f64},
    },
};

fn serialize_css<S: serde::Serializer>(color: &Rgba8, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&color.to_css())
}

/// A group's visual state; its position is the origin of its data.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GroupSnapshot {
    /// Origin x.
    pub x: f64,
    /// Origin y.
    pub y: f64,
    /// Group opacity.
    pub opacity: f64,
    /// Clip outline, in group coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_path: Option<ShapePath>,
}

impl Lerp for GroupSnapshot {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            x: lerp_f64(a.x, b.x, t),
            y: lerp_f64(a.y, b.y, t),
            opacity: lerp_f64(a.opacity, b.opacity, t),
            clip_path: Lerp::lerp(&a.clip_path, &b.clip_path, t),
        }
    }
}

impl Anchored for GroupSnapshot {
    fn anchor(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A datum's visual state, relative to its group.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DatumSnapshot {
    /// Position x.
    pub x: f64,
    /// Position y.
    pub y: f64,
    /// Displayed value; counts up from zero on enter.
    pub value: f64,
    /// Outline in datum coordinates.
    pub d: ShapePath,
    /// Fill color, serialized as CSS `rgba(...)`.
    #[serde(serialize_with = "serialize_css")]
    pub fill: Rgba8,
    /// Opacity.
    pub opacity: f64,
}

impl Lerp for DatumSnapshot {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            x: lerp_f64(a.x, b.x, t),
            y: lerp_f64(a.y, b.y, t),
            value: lerp_f64(a.value, b.value, t),
            d: ShapePath::lerp(&a.d, &b.d, t),
            fill: Rgba8::lerp(&a.fill, &b.fill, t),
            opacity: lerp_f64(a.opacity, b.opacity, t),
        }
    }
}

impl Relocate for DatumSnapshot {
    fn relocate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }
}

/// A label's visual state. `binding` is the composite key of the element it annotates.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LabelSnapshot {
    /// `<group>:<datum>:<label>` of the owning datum.
    pub binding: String,
    /// Displayed text; swapped at the half-way point.
    pub text: String,
    /// Position x.
    pub x: f64,
    /// Position y.
    pub y: f64,
    /// Font size in pixels.
    pub font_size: f64,
    /// Opacity.
    pub opacity: f64,
}

/// Labels that change owner (a teleported datum) hand off at the half-way point: the old
/// label fades out over the first half, the new one fades in over the second.
impl Lerp for LabelSnapshot {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let opacity = if a.binding == b.binding {
            lerp_f64(a.opacity, b.opacity, t)
        } else if t < 0.5 {
            a.opacity * (1.0 - 2.0 * t)
        } else {
            b.opacity * (2.0 * t - 1.0)
        };
        Self {
            binding: String::lerp(&a.binding, &b.binding, t),
            text: String::lerp(&a.text, &b.text, t),
            x: lerp_f64(a.x, b.x, t),
            y: lerp_f64(a.y, b.y, t),
            font_size: lerp_f64(a.font_size, b.font_size, t),
            opacity,
        }
    }
}

/// Group builder. Groups do not fade; their data do.
#[derive(Clone, Debug)]
pub struct GroupBuilder {
    /// Group key.
    pub key: String,
    /// Origin x.
    pub x: f64,
    /// Origin y.
    pub y: f64,
    /// Opacity.
    pub opacity: f64,
    /// Encoded clip outline.
    pub clip: Option<ShapePath>,
    /// Data builders, in display order.
    pub data: Vec<DatumBuilder>,
}

impl GroupBuilder {
    /// Encode `spec` and its data.
    pub fn from_spec(spec: &GroupSpec, cartoonize: bool) -> Self {
        Self {
            key: spec.key.clone(),
            x: spec.x,
            y: spec.y,
            opacity: spec.opacity,
            clip: spec.clip.as_ref().map(|c| ShapePath::encode(c, cartoonize)),
            data: spec
                .data
                .iter()
                .map(|d| DatumBuilder::from_spec(&spec.key, d, cartoonize))
                .collect(),
        }
    }
}

impl Builder for GroupBuilder {
    type Snapshot = GroupSnapshot;

    fn key(&self) -> &str {
        &self.key
    }

    fn build(&self, _s: &Accessor<'_, GroupSnapshot>) -> GroupSnapshot {
        GroupSnapshot {
            x: self.x,
            y: self.y,
            opacity: self.opacity,
            clip_path: self.clip.clone(),
        }
    }
}

impl Parent for GroupBuilder {
    type Child = DatumBuilder;

    fn children(&self) -> &[DatumBuilder] {
        &self.data
    }
}

/// Datum builder: grows from its collapsed shape, counts its value up from zero and fades in;
/// exits the same way in reverse.
#[derive(Clone, Debug)]
pub struct DatumBuilder {
    /// Datum key within its group.
    pub key: String,
    /// Position x.
    pub x: f64,
    /// Position y.
    pub y: f64,
    /// Settled value.
    pub value: f64,
    /// Settled outline.
    pub shape: ShapePath,
    /// Outline an entering datum grows from.
    pub collapsed: ShapePath,
    /// Fill color.
    pub fill: Rgba8,
    /// Settled opacity.
    pub opacity: f64,
    /// Previous `<group>:<datum>` this datum continues.
    pub teleport_from: Option<String>,
    /// Label builders.
    pub labels: Vec<LabelBuilder>,
}

impl DatumBuilder {
    /// Encode `spec` as a member of `group`.
    pub fn from_spec(group: &str, spec: &DatumSpec, cartoonize: bool) -> Self {
        let binding = teleport_key(group, &spec.key);
        Self {
            key: spec.key.clone(),
            x: spec.x,
            y: spec.y,
            value: spec.value,
            shape: ShapePath::encode(&spec.shape, cartoonize),
            collapsed: ShapePath::encode(&spec.shape.collapsed(), cartoonize),
            fill: spec.fill,
            opacity: spec.opacity,
            teleport_from: spec.teleport_from.clone(),
            labels: spec
                .labels
                .iter()
                .map(|l| LabelBuilder::from_spec(&binding, l))
                .collect(),
        }
    }
}

impl Builder for DatumBuilder {
    type Snapshot = DatumSnapshot;

    fn key(&self) -> &str {
        &self.key
    }

    fn build(&self, s: &Accessor<'_, DatumSnapshot>) -> DatumSnapshot {
        DatumSnapshot {
            x: self.x,
            y: self.y,
            value: s.pick(0.0, Some(self.value), None),
            d: s.pick(&self.collapsed, Some(&self.shape), None).clone(),
            fill: self.fill,
            opacity: s.pick(0.0, Some(self.opacity), None),
        }
    }
}

impl Parent for DatumBuilder {
    type Child = LabelBuilder;

    fn children(&self) -> &[LabelBuilder] {
        &self.labels
    }
}

impl Teleport for DatumBuilder {
    fn teleport_from(&self) -> Option<&str> {
        self.teleport_from.as_deref()
    }
}

/// Label builder: fades in at full size and shrinks away on exit.
#[derive(Clone, Debug)]
pub struct LabelBuilder {
    /// Label key within its datum.
    pub key: String,
    /// See [`LabelSnapshot::binding`].
    pub binding: String,
    /// Label text.
    pub text: String,
    /// Position x.
    pub x: f64,
    /// Position y.
    pub y: f64,
    /// Settled font size.
    pub font_size: f64,
}

impl LabelBuilder {
    /// Label of the datum whose composite key is `owner`.
    pub fn from_spec(owner: &str, spec: &LabelSpec) -> Self {
        Self {
            key: spec.key.clone(),
            binding: format!("{owner}:{}", spec.key),
            text: spec.text.clone(),
            x: spec.x,
            y: spec.y,
            font_size: spec.font_size,
        }
    }
}

impl Builder for LabelBuilder {
    type Snapshot = LabelSnapshot;

    fn key(&self) -> &str {
        &self.key
    }

    fn build(&self, s: &Accessor<'_, LabelSnapshot>) -> LabelSnapshot {
        LabelSnapshot {
            binding: self.binding.clone(),
            text: self.text.clone(),
            x: self.x,
            y: self.y,
            font_size: s.pick(self.font_size, None, Some(0.0)),
            opacity: s.pick(0.0, Some(1.0), None),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chart/elements.rs"]
mod tests;
