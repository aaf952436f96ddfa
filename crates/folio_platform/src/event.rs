//! Page events delivered to the trackers

use std::time::Duration;

use crate::geometry::Viewport;

/// What triggered a page event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageEventKind {
    /// The page scrolled
    Scroll,
    /// The viewport was resized
    Resize,
}

/// A scroll or resize event with the metrics sampled when it fired
///
/// `at` is measured from the host's time origin (`performance.now()` in
/// browsers), so events and animation frames share one clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageEvent {
    pub kind: PageEventKind,
    pub viewport: Viewport,
    pub at: Duration,
}

impl PageEvent {
    pub fn scroll(viewport: Viewport, at: Duration) -> Self {
        Self {
            kind: PageEventKind::Scroll,
            viewport,
            at,
        }
    }

    pub fn resize(viewport: Viewport, at: Duration) -> Self {
        Self {
            kind: PageEventKind::Resize,
            viewport,
            at,
        }
    }

    pub fn is_scroll(&self) -> bool {
        matches!(self.kind, PageEventKind::Scroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kinds() {
        let viewport = Viewport::new(10.0, 800.0, 2000.0);
        assert!(PageEvent::scroll(viewport, Duration::ZERO).is_scroll());
        assert!(!PageEvent::resize(viewport, Duration::ZERO).is_scroll());
    }
}
