use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Control visibility state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// Controls are hidden until the pointer moves again
    Hidden,
    /// Controls are visible; `hide_at` is the pending inactivity deadline
    Visible { hide_at: Option<Instant> },
}

/// Hides the controls after a period of pointer inactivity while playing.
///
/// There is at most one pending deadline. Every transition replaces the
/// state wholesale, so an old deadline is always cleared before a new one
/// is scheduled.
#[derive(Debug)]
pub struct ControlsVisibility {
    state: ControlState,
    hide_delay: Duration,
}

impl ControlsVisibility {
    pub fn new(hide_delay: Duration) -> Self {
        Self {
            state: ControlState::Visible { hide_at: None },
            hide_delay,
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.state, ControlState::Hidden)
    }

    /// Pending inactivity deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            ControlState::Visible { hide_at } => hide_at,
            ControlState::Hidden => None,
        }
    }

    /// Shows the controls and restarts the countdown.
    pub fn pointer_moved(&mut self, now: Instant) {
        self.transition_to_visible(Some(now + self.hide_delay));
    }

    /// Leaving the player while playing hides the controls right away.
    pub fn pointer_left(&mut self, playing: bool) {
        if playing {
            self.transition_to_hidden();
        }
    }

    /// Fires the countdown if it has expired. Returns true when the
    /// visibility changed.
    pub fn poll(&mut self, now: Instant, playing: bool) -> bool {
        let Some(hide_at) = self.deadline() else {
            return false;
        };
        if now < hide_at {
            return false;
        }

        if playing {
            self.transition_to_hidden();
            true
        } else {
            self.transition_to_visible(None);
            false
        }
    }

    /// Entering `Playing` arms the countdown; leaving it shows the controls
    /// and cancels any countdown.
    pub fn on_playing_changed(&mut self, playing: bool, now: Instant) -> bool {
        let was_visible = self.is_visible();
        if playing {
            self.transition_to_visible(Some(now + self.hide_delay));
        } else {
            self.transition_to_visible(None);
        }
        was_visible != self.is_visible()
    }

    /// Back to visible with no countdown, e.g. on source change.
    pub fn reset(&mut self) {
        self.transition_to_visible(None);
    }

    fn transition_to_hidden(&mut self) {
        trace!("Hiding controls");
        self.state = ControlState::Hidden;
    }

    fn transition_to_visible(&mut self, hide_at: Option<Instant>) {
        self.state = ControlState::Visible { hide_at };
    }
}
