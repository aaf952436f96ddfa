//! Scroll tracker configuration

use std::time::Duration;

use crate::activity::DEFAULT_QUIET_WINDOW;
use crate::margin::RootMargin;

/// Default pixel offset kept clear above a section when scrolling to it
/// (room for a fixed header)
pub const DEFAULT_HEADER_OFFSET: f32 = 80.0;

/// Default minimum intersection ratio for a section to count as visible
pub const DEFAULT_THRESHOLD: f32 = 0.3;

/// Configuration for a [`ScrollTracker`](crate::ScrollTracker)
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollTrackerConfig {
    /// Section element ids, in page order
    pub sections: Vec<String>,
    /// Minimum intersection ratio for a section to be considered
    pub threshold: f32,
    /// Margin applied to the viewport for intersection tests
    pub root_margin: RootMargin,
    /// Quiet period after which scrolling is considered finished
    pub quiet_window: Duration,
    /// Default offset for `scroll_to_section`
    pub header_offset: f32,
}

impl Default for ScrollTrackerConfig {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            threshold: DEFAULT_THRESHOLD,
            root_margin: RootMargin::default(),
            quiet_window: DEFAULT_QUIET_WINDOW,
            header_offset: DEFAULT_HEADER_OFFSET,
        }
    }
}

impl ScrollTrackerConfig {
    /// Create a configuration tracking the given sections
    pub fn new<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sections: sections.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Set the intersection threshold (clamped to `[0, 1]`)
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the root margin
    pub fn root_margin(mut self, margin: RootMargin) -> Self {
        self.root_margin = margin;
        self
    }

    /// Set the quiet window for the scrolling flag
    pub fn quiet_window(mut self, window: Duration) -> Self {
        self.quiet_window = window;
        self
    }

    /// Set the default header offset
    pub fn header_offset(mut self, offset: f32) -> Self {
        self.header_offset = offset;
        self
    }
}
