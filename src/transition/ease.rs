use crate::foundation::error::{MorphError, MorphResult};

/// Easing curve applied to linear progress before sampling a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// `t`
    Linear,
    /// `t²`
    InQuad,
    /// Mirror of [`Ease::InQuad`].
    OutQuad,
    /// Quadratic in, then quadratic out.
    InOutQuad,
    /// `t³`
    InCubic,
    /// Mirror of [`Ease::InCubic`].
    OutCubic,
    /// Cubic in, then cubic out.
    #[default]
    InOutCubic,
}

impl Ease {
    /// Every curve, in declaration order.
    pub const ALL: [Ease; 7] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
    ];

    /// Map linear progress to eased progress. Input is clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

/// Maps wall-clock time since a transition started to transition progress.
///
/// Purely a mapping: the caller owns the clock and decides when to sample.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Playback {
    /// Transition length; finite and positive.
    pub duration_ms: f64,
    /// Curve applied to linear progress.
    #[serde(default)]
    pub ease: Ease,
}

impl Playback {
    /// Validated playback.
    pub fn new(duration_ms: f64, ease: Ease) -> MorphResult<Self> {
        let p = Self { duration_ms, ease };
        p.validate()?;
        Ok(p)
    }

    /// Reject a non-finite or non-positive duration.
    pub fn validate(&self) -> MorphResult<()> {
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(MorphError::validation(format!(
                "duration_ms must be finite and > 0 (got {})",
                self.duration_ms
            )));
        }
        Ok(())
    }

    /// Eased progress in `[0, 1]` after `elapsed_ms`.
    pub fn progress_at(&self, elapsed_ms: f64) -> f64 {
        self.ease.apply(elapsed_ms / self.duration_ms)
    }

    /// True once `elapsed_ms` reaches the duration.
    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.duration_ms
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            duration_ms: 1000.0,
            ease: Ease::default(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/ease.rs"]
mod tests;
