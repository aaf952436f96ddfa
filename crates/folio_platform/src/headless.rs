//! In-memory page model
//!
//! A headless stand-in for the browser: a document with a fixed viewport,
//! named sections laid out in document coordinates, surfaces that record
//! the styles written to them, and a frame scheduler driven by hand.
//! Used by unit tests and by the `folio` CLI to replay scroll sweeps.
//!
//! All handles are cheap clones sharing one page, so a test can keep a
//! handle while the engine owns another.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

use crate::document::{Document, ScrollBehavior};
use crate::frame::{FrameRequest, FrameScheduler};
use crate::geometry::{Rect, Viewport};
use crate::surface::{Surface, VisualStyle};

/// Default viewport width for headless pages
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;

/// A vertical span in document coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
struct Span {
    top: f32,
    height: f32,
}

/// A programmatic scroll recorded by the page
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollCommand {
    pub top: f32,
    pub behavior: ScrollBehavior,
}

#[derive(Debug)]
struct PageInner {
    viewport_width: f32,
    viewport_height: Cell<f32>,
    document_height: Cell<f32>,
    scroll_top: Cell<f32>,
    sections: RefCell<IndexMap<String, Span>>,
    scroll_log: RefCell<Vec<ScrollCommand>>,
}

impl PageInner {
    fn max_scroll(&self) -> f32 {
        (self.document_height.get() - self.viewport_height.get()).max(0.0)
    }

    fn to_viewport_rect(&self, span: Span) -> Rect {
        Rect::new(
            0.0,
            span.top - self.scroll_top.get(),
            self.viewport_width,
            span.height,
        )
    }
}

/// Headless document
#[derive(Clone, Debug)]
pub struct HeadlessPage {
    inner: Rc<PageInner>,
}

impl HeadlessPage {
    /// Create a page with the given viewport and document heights
    pub fn new(viewport_height: f32, document_height: f32) -> Self {
        Self::with_width(DEFAULT_VIEWPORT_WIDTH, viewport_height, document_height)
    }

    pub fn with_width(viewport_width: f32, viewport_height: f32, document_height: f32) -> Self {
        Self {
            inner: Rc::new(PageInner {
                viewport_width,
                viewport_height: Cell::new(viewport_height),
                document_height: Cell::new(document_height),
                scroll_top: Cell::new(0.0),
                sections: RefCell::new(IndexMap::new()),
                scroll_log: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Mount a section at `top` (document coordinates)
    ///
    /// Mounting an existing id moves it.
    pub fn add_section(&self, id: impl Into<String>, top: f32, height: f32) {
        self.inner
            .sections
            .borrow_mut()
            .insert(id.into(), Span { top, height });
    }

    /// Unmount a section; returns whether it existed
    pub fn remove_section(&self, id: &str) -> bool {
        self.inner.sections.borrow_mut().shift_remove(id).is_some()
    }

    /// Ids of the mounted sections, in mount order
    pub fn section_ids(&self) -> Vec<String> {
        self.inner.sections.borrow().keys().cloned().collect()
    }

    /// Set the scroll offset directly (as a user scroll would)
    ///
    /// The offset is not clamped, so overscroll can be simulated.
    pub fn set_scroll_top(&self, top: f32) {
        self.inner.scroll_top.set(top);
    }

    pub fn scroll_top(&self) -> f32 {
        self.inner.scroll_top.get()
    }

    /// Change the viewport height, as a window resize would
    pub fn resize(&self, viewport_height: f32) {
        self.inner.viewport_height.set(viewport_height);
    }

    pub fn set_document_height(&self, document_height: f32) {
        self.inner.document_height.set(document_height);
    }

    /// Programmatic scrolls issued through [`Document::scroll_to`]
    pub fn scroll_log(&self) -> Vec<ScrollCommand> {
        self.inner.scroll_log.borrow().clone()
    }

    /// Create a surface laid out at `top` (document coordinates)
    pub fn surface(&self, top: f32, height: f32) -> HeadlessSurface {
        HeadlessSurface {
            inner: Rc::new(SurfaceInner {
                page: Rc::clone(&self.inner),
                span: Cell::new(Span { top, height }),
                attached: Cell::new(true),
                style: RefCell::new(None),
                accelerated: Cell::new(false),
                apply_count: Cell::new(0),
            }),
        }
    }
}

impl Document for HeadlessPage {
    fn viewport(&self) -> Viewport {
        Viewport::new(
            self.inner.scroll_top.get(),
            self.inner.viewport_height.get(),
            self.inner.document_height.get(),
        )
    }

    fn section_rect(&self, id: &str) -> Option<Rect> {
        let span = *self.inner.sections.borrow().get(id)?;
        Some(self.inner.to_viewport_rect(span))
    }

    fn scroll_to(&self, top: f32, behavior: ScrollBehavior) {
        trace!(top, ?behavior, "headless scroll");
        self.inner
            .scroll_log
            .borrow_mut()
            .push(ScrollCommand { top, behavior });
        // Smooth scrolling settles at the same place; jump straight there.
        self.inner
            .scroll_top
            .set(top.clamp(0.0, self.inner.max_scroll()));
    }
}

#[derive(Debug)]
struct SurfaceInner {
    page: Rc<PageInner>,
    span: Cell<Span>,
    attached: Cell<bool>,
    style: RefCell<Option<VisualStyle>>,
    accelerated: Cell<bool>,
    apply_count: Cell<usize>,
}

/// Headless surface recording every style written to it
///
/// Clones refer to the same element and compare equal.
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    inner: Rc<SurfaceInner>,
}

impl HeadlessSurface {
    /// Last style applied, `None` while transform/opacity are unset
    pub fn style(&self) -> Option<VisualStyle> {
        self.inner.style.borrow().clone()
    }

    pub fn is_accelerated(&self) -> bool {
        self.inner.accelerated.get()
    }

    /// Number of `apply` calls received
    pub fn apply_count(&self) -> usize {
        self.inner.apply_count.get()
    }

    /// Remove the element from the page; its bounding rect disappears
    pub fn detach(&self) {
        self.inner.attached.set(false);
    }

    /// Move the element to a new document offset
    pub fn set_top(&self, top: f32) {
        let span = self.inner.span.get();
        self.inner.span.set(Span { top, ..span });
    }
}

impl PartialEq for HeadlessSurface {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Surface for HeadlessSurface {
    fn bounding_rect(&self) -> Option<Rect> {
        if !self.inner.attached.get() {
            return None;
        }
        Some(self.inner.page.to_viewport_rect(self.inner.span.get()))
    }

    fn apply(&self, style: &VisualStyle) {
        *self.inner.style.borrow_mut() = Some(style.clone());
        self.inner.apply_count.set(self.inner.apply_count.get() + 1);
    }

    fn reset(&self) {
        *self.inner.style.borrow_mut() = None;
    }

    fn set_accelerated(&self, accelerated: bool) {
        self.inner.accelerated.set(accelerated);
    }
}

#[derive(Debug, Default)]
struct SchedulerState {
    next_id: Cell<i32>,
    pending: Cell<Option<FrameRequest>>,
    requested: Cell<usize>,
    cancelled: Cell<usize>,
    refuse: Cell<bool>,
}

/// Frame scheduler driven by hand
///
/// Requests are only recorded; the test (or CLI) decides when the frame
/// "fires" by calling the engine's frame handler itself.
#[derive(Clone, Debug, Default)]
pub struct ManualFrameScheduler {
    state: Rc<SchedulerState>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding request, if any
    pub fn pending(&self) -> Option<FrameRequest> {
        self.state.pending.get()
    }

    /// Total frames requested so far
    pub fn requested_count(&self) -> usize {
        self.state.requested.get()
    }

    /// Total requests cancelled so far
    pub fn cancelled_count(&self) -> usize {
        self.state.cancelled.get()
    }

    /// Make subsequent requests fail, as a host without frame support would
    pub fn set_refuse(&self, refuse: bool) {
        self.state.refuse.set(refuse);
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&mut self) -> Option<FrameRequest> {
        if self.state.refuse.get() {
            return None;
        }
        let id = self.state.next_id.get() + 1;
        self.state.next_id.set(id);
        let request = FrameRequest(id);
        self.state.pending.set(Some(request));
        self.state.requested.set(self.state.requested.get() + 1);
        Some(request)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.state.pending.get() == Some(request) {
            self.state.pending.set(None);
        }
        self.state.cancelled.set(self.state.cancelled.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_rect_follows_scroll() {
        let page = HeadlessPage::new(800.0, 3000.0);
        page.add_section("work", 1200.0, 500.0);

        assert_eq!(page.section_rect("work").map(|r| r.top()), Some(1200.0));
        page.set_scroll_top(1000.0);
        assert_eq!(page.section_rect("work").map(|r| r.top()), Some(200.0));
        assert_eq!(page.section_rect("missing"), None);
    }

    #[test]
    fn test_scroll_to_clamps_and_logs() {
        let page = HeadlessPage::new(800.0, 3000.0);
        page.scroll_to(5000.0, ScrollBehavior::Smooth);

        assert_eq!(page.scroll_top(), 2200.0);
        assert_eq!(
            page.scroll_log(),
            vec![ScrollCommand {
                top: 5000.0,
                behavior: ScrollBehavior::Smooth
            }]
        );
    }

    #[test]
    fn test_surface_identity() {
        let page = HeadlessPage::new(800.0, 3000.0);
        let a = page.surface(0.0, 100.0);
        let b = page.surface(0.0, 100.0);

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_detached_surface_has_no_rect() {
        let page = HeadlessPage::new(800.0, 3000.0);
        let surface = page.surface(100.0, 100.0);
        assert!(surface.bounding_rect().is_some());

        surface.detach();
        assert!(surface.bounding_rect().is_none());
    }

    #[test]
    fn test_manual_scheduler() {
        let mut scheduler = ManualFrameScheduler::new();
        let handle = scheduler.clone();

        let first = scheduler.request_frame().unwrap();
        assert_eq!(handle.pending(), Some(first));

        scheduler.cancel_frame(first);
        assert_eq!(handle.pending(), None);
        assert_eq!(handle.requested_count(), 1);
        assert_eq!(handle.cancelled_count(), 1);

        handle.set_refuse(true);
        assert!(scheduler.request_frame().is_none());
    }
}
