use crate::transition::lerp::Lerp;

/// Lifecycle of a keyed element between the previous frame and the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Present now, no live counterpart before.
    Enter,
    /// Present before (not exiting) and present now.
    Update,
    /// Present before, gone now.
    Exit,
}

impl Lifecycle {
    /// The moment the element's "to" snapshot describes.
    pub fn target_moment(self) -> Moment {
        match self {
            Self::Enter | Self::Update => Moment::Settled,
            Self::Exit => Moment::ExitEnd,
        }
    }

    /// True for [`Lifecycle::Exit`].
    pub fn is_exit(self) -> bool {
        self == Self::Exit
    }
}

/// One of the three logical moments a snapshot can describe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Moment {
    /// Right before an entering element becomes visible.
    EnterStart,
    /// The element's resting state for the current step.
    Settled,
    /// Right before an exiting element is removed.
    ExitEnd,
}

/// Per-attribute values for the three moments.
///
/// `update` and `exit` fall back to `enter` when unset, so most attributes only name one value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Staged<T> {
    /// Value at [`Moment::EnterStart`].
    pub enter: T,
    /// Value at [`Moment::Settled`].
    pub update: Option<T>,
    /// Value at [`Moment::ExitEnd`].
    pub exit: Option<T>,
}

impl<T> Staged<T> {
    /// Stage every moment with the same value.
    pub fn new(enter: T) -> Self {
        Self {
            enter,
            update: None,
            exit: None,
        }
    }

    /// Set the settled value.
    pub fn update(mut self, value: T) -> Self {
        self.update = Some(value);
        self
    }

    /// Set the exit-end value.
    pub fn exit(mut self, value: T) -> Self {
        self.exit = Some(value);
        self
    }

    /// Value for `moment`, falling back to `enter`.
    pub fn at(self, moment: Moment) -> T {
        match moment {
            Moment::EnterStart => self.enter,
            Moment::Settled => self.update.unwrap_or(self.enter),
            Moment::ExitEnd => self.exit.unwrap_or(self.enter),
        }
    }
}

/// State role resolver handed to a [`Builder`].
///
/// A builder calls [`Accessor::pick`] once per attribute; the accessor chooses the value for
/// the moment being evaluated, so one builder describes enter, update and exit without
/// branching.
#[derive(Clone, Copy, Debug)]
pub struct Accessor<'a, G> {
    moment: Moment,
    previous: Option<&'a G>,
}

impl<'a, G> Accessor<'a, G> {
    /// Accessor for `moment`; `previous` is the element's last settled snapshot.
    pub fn new(moment: Moment, previous: Option<&'a G>) -> Self {
        Self { moment, previous }
    }

    /// Accessor that always answers with the enter value and has no previous snapshot.
    pub fn enter_start() -> Self {
        Self::new(Moment::EnterStart, None)
    }

    /// Moment this accessor answers for.
    pub fn moment(&self) -> Moment {
        self.moment
    }

    /// The previous frame's settled snapshot for this element, when it was updating.
    pub fn previous(&self) -> Option<&'a G> {
        self.previous
    }

    /// Choose among the per-moment values; unset ones fall back to `enter`.
    pub fn pick<T>(&self, enter: T, update: Option<T>, exit: Option<T>) -> T {
        Staged {
            enter,
            update,
            exit,
        }
        .at(self.moment)
    }

    /// Same as [`Accessor::pick`] for a prepared [`Staged`] value.
    pub fn staged<T>(&self, values: Staged<T>) -> T {
        values.at(self.moment)
    }
}

/// Produces the snapshot ("G") of one keyed element.
pub trait Builder: Clone {
    /// Flat attribute record for this element kind.
    type Snapshot: Lerp + Clone + std::fmt::Debug;

    /// Identity among siblings; unique within one frame.
    fn key(&self) -> &str;

    /// Snapshot of this element at the accessor's moment.
    fn build(&self, s: &Accessor<'_, Self::Snapshot>) -> Self::Snapshot;
}

#[cfg(test)]
#[path = "../../tests/unit/transition/accessor.rs"]
mod tests;
