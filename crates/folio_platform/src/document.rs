//! Scrollable document abstraction

use crate::geometry::{Rect, Viewport};

/// How a programmatic scroll moves the page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollBehavior {
    /// Animate to the target offset
    #[default]
    Smooth,
    /// Jump to the target offset
    Instant,
}

/// The scrollable page hosting the tracked sections
///
/// Implemented by the browser host over `window`/`document`, and by
/// [`HeadlessPage`](crate::headless::HeadlessPage) for tests.
pub trait Document {
    /// Current scroll metrics
    fn viewport(&self) -> Viewport;

    /// Viewport-relative bounds of the element with the given id
    ///
    /// Returns `None` when no such element is mounted.
    fn section_rect(&self, id: &str) -> Option<Rect>;

    /// Scroll the page so its top edge sits at `top` pixels
    fn scroll_to(&self, top: f32, behavior: ScrollBehavior);
}
