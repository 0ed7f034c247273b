use crate::{
    chart::{
        model::{Step, StoryOptions},
        tree::{ResolvedFrame, StepTree, compose_step, resolve_step},
    },
    foundation::error::MorphResult,
    transition::ease::Playback,
};

/// Owns the interpolator tree of the most recent transition.
///
/// Each [`advance`](Self::advance) classifies the new step against the previous tree sampled at
/// its settled state, so an interrupted transition restarts from where it was heading.
#[derive(Debug, Default)]
pub struct AnimationSession {
    options: StoryOptions,
    tree: Option<StepTree>,
    generation: u64,
}

impl AnimationSession {
    /// Empty session; fails on invalid options.
    pub fn new(options: StoryOptions) -> MorphResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            tree: None,
            generation: 0,
        })
    }

    /// Session positioned on `from`, with a pending transition to `to`.
    pub fn morph(options: StoryOptions, from: &Step, to: &Step) -> MorphResult<Self> {
        let mut session = Self::new(options)?;
        session.advance(from)?;
        session.advance(to)?;
        Ok(session)
    }

    /// Options every step is encoded with.
    pub fn options(&self) -> &StoryOptions {
        &self.options
    }

    /// Validate `step` and build the transition into it.
    #[tracing::instrument(skip_all, fields(generation = self.generation + 1))]
    pub fn advance(&mut self, step: &Step) -> MorphResult<&StepTree> {
        step.validate()?;
        let tree = compose_step(step, &self.options, self.tree.as_ref());
        self.generation += 1;
        let tree: &StepTree = self.tree.insert(tree);
        Ok(tree)
    }

    /// Sample the current transition. `None` before the first step.
    pub fn frame(&self, t: f64) -> Option<ResolvedFrame> {
        self.tree.as_ref().map(|tree| resolve_step(tree, t))
    }

    /// Sample the current transition `elapsed_ms` after it started.
    pub fn frame_at(&self, elapsed_ms: f64, playback: &Playback) -> Option<ResolvedFrame> {
        self.frame(playback.progress_at(elapsed_ms))
    }

    /// Forget the previous frame; the next step enters from scratch. Used on resize.
    pub fn reset(&mut self) {
        tracing::debug!(generation = self.generation, "session reset");
        self.tree = None;
    }

    /// Interpolator tree of the current transition.
    pub fn tree(&self) -> Option<&StepTree> {
        self.tree.as_ref()
    }

    /// Number of steps accepted so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while a transition has been built and `elapsed_ms` has not reached its end.
    pub fn is_animating(&self, elapsed_ms: f64, playback: &Playback) -> bool {
        self.tree.is_some() && !playback.is_finished(elapsed_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
