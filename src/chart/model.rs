use std::collections::{HashMap, HashSet};

use crate::{
    foundation::core::Rgba8,
    foundation::error::{MorphError, MorphResult},
    shape::codec::ShapeSpec,
    transition::{
        compose::teleport_key,
        ease::{Ease, Playback},
    },
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// An ordered sequence of chart steps plus the options shared by all transitions between them.
///
/// Every geometry value in a story is already layout-resolved (pixels, radians); turning data
/// into geometry happens upstream.
pub struct Story {
    /// Options shared by every step.
    #[serde(default)]
    pub options: StoryOptions,
    /// Steps in authoring order; any two can be morphed between.
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Story-wide rendering and timing options.
pub struct StoryOptions {
    /// Encode shapes with the hand-drawn wobble.
    pub cartoonize: bool,
    /// Easing applied by [`StoryOptions::playback`].
    pub ease: Ease,
    /// Transition duration in milliseconds.
    pub duration_ms: f64,
}

impl Default for StoryOptions {
    fn default() -> Self {
        Self {
            cartoonize: false,
            ease: Ease::default(),
            duration_ms: 1000.0,
        }
    }
}

impl StoryOptions {
    /// Reject a non-finite or non-positive duration.
    pub fn validate(&self) -> MorphResult<()> {
        self.playback().map(|_| ())
    }

    /// Playback built from the duration and easing.
    pub fn playback(&self) -> MorphResult<Playback> {
        Playback::new(self.duration_ms, self.ease)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Chart type a step was laid out as. Carried through to the renderer.
pub enum ChartKind {
    /// Bar chart.
    #[default]
    Bar,
    /// Packed bubbles.
    Bubble,
    /// Pie of wedges.
    Pie,
    /// Scatter plot.
    Scatter,
    /// Treemap.
    Treemap,
    /// Beeswarm.
    Beeswarm,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// One chart state: groups of data items.
pub struct Step {
    /// Chart type this step was laid out as.
    #[serde(default)]
    pub chart: ChartKind,
    /// Groups in draw order.
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A keyed group; its position is the origin of its data's coordinates.
pub struct GroupSpec {
    /// Identity among the step's groups. Must not contain `:`.
    pub key: String,
    /// Origin x.
    #[serde(default)]
    pub x: f64,
    /// Origin y.
    #[serde(default)]
    pub y: f64,
    /// Group opacity, default 1.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Optional clip outline in group coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<ShapeSpec>,
    /// Data in draw order.
    #[serde(default)]
    pub data: Vec<DatumSpec>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// A keyed data item drawn as one shape.
pub struct DatumSpec {
    /// Identity among the group's data.
    pub key: String,
    /// Position x, relative to the group.
    #[serde(default)]
    pub x: f64,
    /// Position y, relative to the group.
    #[serde(default)]
    pub y: f64,
    /// Data value; tweened so value labels can count.
    #[serde(default)]
    pub value: f64,
    /// Outline in datum coordinates.
    pub shape: ShapeSpec,
    /// Fill color as `[r, g, b, a]`.
    #[serde(default)]
    pub fill: Rgba8,
    /// Settled opacity, default 1.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// `<previousGroupKey>:<previousDatumKey>` of the element this datum continues.
    #[serde(
        default,
        alias = "teleportFrom",
        skip_serializing_if = "Option::is_none"
    )]
    pub teleport_from: Option<String>,
    /// Labels in draw order.
    #[serde(default)]
    pub labels: Vec<LabelSpec>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Text attached to a datum, positioned in datum coordinates.
pub struct LabelSpec {
    /// Identity among the datum's labels.
    pub key: String,
    /// Measured, formatted text.
    pub text: String,
    /// Position x, relative to the datum.
    #[serde(default)]
    pub x: f64,
    /// Position y, relative to the datum.
    #[serde(default)]
    pub y: f64,
    /// Font size in pixels, default 12.
    #[serde(default = "default_font_size", alias = "fontSize")]
    pub font_size: f64,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_font_size() -> f64 {
    12.0
}

impl Story {
    /// Parse and validate a story document.
    #[tracing::instrument(skip(json), fields(bytes = json.len()))]
    pub fn from_json_str(json: &str) -> MorphResult<Self> {
        let story: Self = serde_json::from_str(json).map_err(|e| MorphError::serde(e.to_string()))?;
        story.validate()?;
        Ok(story)
    }

    /// Check the options and every step.
    pub fn validate(&self) -> MorphResult<()> {
        self.options.validate()?;
        if self.steps.is_empty() {
            return Err(MorphError::validation("story must have at least one step"));
        }
        for (idx, step) in self.steps.iter().enumerate() {
            step.validate().map_err(|e| e.at(format!("step {idx}")))?;
        }
        Ok(())
    }

    /// Step at `idx`, or a validation error when out of range.
    pub fn step(&self, idx: usize) -> MorphResult<&Step> {
        self.steps.get(idx).ok_or_else(|| {
            MorphError::validation(format!(
                "step index {idx} out of range (story has {} steps)",
                self.steps.len()
            ))
        })
    }
}

impl Step {
    /// Check the preconditions the transition engine relies on.
    ///
    /// Teleport references are checked against the step itself: each previous datum may be
    /// claimed once, and not while its own group still holds it. Whether the referenced element
    /// was on screen is not checked; an unknown reference makes the datum enter normally.
    pub fn validate(&self) -> MorphResult<()> {
        ensure_unique("group", self.groups.iter().map(|g| g.key.as_str()))?;
        for group in &self.groups {
            if group.key.contains(':') {
                return Err(MorphError::validation(format!(
                    "group key '{}' must not contain ':'",
                    group.key
                )));
            }
            ensure_finite(&group.key, &[("x", group.x), ("y", group.y)])?;
            ensure_opacity(&group.key, group.opacity)?;
            if let Some(clip) = &group.clip {
                clip.validate().map_err(|e| e.at(&group.key))?;
            }

            ensure_unique(
                &format!("datum in group '{}'", group.key),
                group.data.iter().map(|d| d.key.as_str()),
            )?;
            for datum in &group.data {
                datum.validate(&group.key)?;
            }
        }
        self.validate_teleports()
    }

    fn validate_teleports(&self) -> MorphResult<()> {
        let present: HashSet<String> = self
            .groups
            .iter()
            .flat_map(|g| g.data.iter().map(|d| teleport_key(&g.key, &d.key)))
            .collect();

        let mut claimed: HashMap<&str, String> = HashMap::new();
        for group in &self.groups {
            for datum in &group.data {
                let Some(reference) = datum.teleport_from.as_deref() else {
                    continue;
                };
                let claimant = teleport_key(&group.key, &datum.key);
                if reference != claimant && present.contains(reference) {
                    return Err(MorphError::validation(format!(
                        "{claimant}: teleport_from '{reference}' is still present in this step"
                    )));
                }
                if let Some(first) = claimed.insert(reference, claimant.clone()) {
                    return Err(MorphError::validation(format!(
                        "{claimant}: teleport_from '{reference}' is already claimed by '{first}'"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl DatumSpec {
    fn validate(&self, group: &str) -> MorphResult<()> {
        let path = format!("{group}:{}", self.key);
        ensure_finite(
            &path,
            &[("x", self.x), ("y", self.y), ("value", self.value)],
        )?;
        ensure_opacity(&path, self.opacity)?;
        self.shape.validate().map_err(|e| e.at(&path))?;

        if let Some(reference) = &self.teleport_from {
            match reference.split_once(':') {
                Some((g, d)) if !g.is_empty() && !d.is_empty() => {}
                _ => {
                    return Err(MorphError::validation(format!(
                        "{path}: teleport_from '{reference}' must look like '<group>:<datum>'"
                    )));
                }
            }
        }

        ensure_unique(
            &format!("label in '{path}'"),
            self.labels.iter().map(|l| l.key.as_str()),
        )?;
        for label in &self.labels {
            let label_path = format!("{path}:{}", label.key);
            ensure_finite(&label_path, &[("x", label.x), ("y", label.y)])?;
            if !label.font_size.is_finite() || label.font_size < 0.0 {
                return Err(MorphError::validation(format!(
                    "{label_path}: font_size must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

fn ensure_unique<'a>(what: &str, keys: impl Iterator<Item = &'a str>) -> MorphResult<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if key.is_empty() {
            return Err(MorphError::validation(format!("{what} key must be non-empty")));
        }
        if !seen.insert(key) {
            return Err(MorphError::validation(format!(
                "duplicate {what} key '{key}'"
            )));
        }
    }
    Ok(())
}

fn ensure_finite(path: &str, values: &[(&str, f64)]) -> MorphResult<()> {
    for (name, v) in values {
        if !v.is_finite() {
            return Err(MorphError::validation(format!(
                "{path}: {name} must be finite"
            )));
        }
    }
    Ok(())
}

fn ensure_opacity(path: &str, opacity: f64) -> MorphResult<()> {
    if !(0.0..=1.0).contains(&opacity) {
        return Err(MorphError::validation(format!(
            "{path}: opacity must be in [0, 1]"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/chart/model.rs"]
mod tests;
