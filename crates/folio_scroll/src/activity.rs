//! Scroll activity state machine
//!
//! Tracks whether scroll events are actively arriving:
//!
//! ```text
//!            Scroll
//!   ┌──────┐ ──────▶ ┌────────┐ ◀─┐ Scroll (re-arm deadline)
//!   │ Idle │         │ Active │ ──┘
//!   └──────┘ ◀────── └────────┘
//!        Elapsed (now >= deadline)
//! ```
//!
//! The delayed transition back to `Idle` is a deadline carried by the
//! `Active` state; the host polls with the current time (from a timer or
//! an animation frame) instead of juggling timer handles.

use std::time::Duration;

/// Default quiet period after the last scroll event
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(150);

/// Scroll activity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Activity {
    /// No scroll events within the quiet window
    #[default]
    Idle,
    /// Scroll events are arriving; goes idle at `deadline`
    Active { deadline: Duration },
}

/// Inputs to the activity machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityEvent {
    /// A scroll event arrived; stay active until `until`
    Scroll { until: Duration },
    /// Time passed; `now` is the current host time
    Elapsed { now: Duration },
}

impl Activity {
    /// Handle an event and return the new state, or `None` if no transition
    pub fn on_event(&self, event: ActivityEvent) -> Option<Self> {
        match (self, event) {
            // Idle -> Active: first scroll event
            (Activity::Idle, ActivityEvent::Scroll { until }) => {
                Some(Activity::Active { deadline: until })
            }

            // Active -> Active: every further event restarts the quiet window
            (Activity::Active { .. }, ActivityEvent::Scroll { until }) => {
                Some(Activity::Active { deadline: until })
            }

            // Active -> Idle: the window ran out without interruption
            (Activity::Active { deadline }, ActivityEvent::Elapsed { now }) if now >= *deadline => {
                Some(Activity::Idle)
            }

            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Activity::Active { .. })
    }

    /// When the machine will go idle, if it is active
    pub fn deadline(&self) -> Option<Duration> {
        match self {
            Activity::Active { deadline } => Some(*deadline),
            Activity::Idle => None,
        }
    }
}
