//! Scroll tracker
//!
//! Derives page progress, scroll direction, activity, and the active
//! section from scroll/resize samples and intersection reports.
//!
//! The tracker is host-agnostic: the host feeds it [`PageEvent`]s, polls it
//! with the current time so the scrolling flag can settle, and forwards
//! intersection entries (from a native observer, or from [`observe`] on a
//! headless page). Every mutating call returns whether the visible state
//! changed so the host knows when to re-render.

use std::time::Duration;

use folio_platform::{Document, PageEvent, PageEventKind, ScrollBehavior, Viewport};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::activity::{Activity, ActivityEvent};
use crate::config::ScrollTrackerConfig;
use crate::intersection::{observe, IntersectionEntry, SectionResolver};
use crate::state::{ScrollDirection, ScrollTrackingState};

/// Live scroll state for a page with named sections
#[derive(Clone, Debug)]
pub struct ScrollTracker {
    config: ScrollTrackerConfig,
    progress: f32,
    direction: ScrollDirection,
    last_offset: f32,
    activity: Activity,
    sections: SectionResolver,
}

impl ScrollTracker {
    pub fn new(config: ScrollTrackerConfig) -> Self {
        let sections = SectionResolver::new(&config.sections);
        Self {
            config,
            progress: 0.0,
            direction: ScrollDirection::None,
            last_offset: 0.0,
            activity: Activity::Idle,
            sections,
        }
    }

    /// Seed progress and the previous offset from an initial sample
    ///
    /// Without this the first scroll event is compared against offset 0.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.progress = viewport.progress();
        self.last_offset = viewport.scroll_top;
        self
    }

    pub fn config(&self) -> &ScrollTrackerConfig {
        &self.config
    }

    /// Tracked section ids, in page order
    pub fn sections(&self) -> &[String] {
        &self.config.sections
    }

    // =========================================================================
    // Event input
    // =========================================================================

    /// Dispatch a scroll or resize event
    pub fn handle(&mut self, event: PageEvent) -> bool {
        match event.kind {
            PageEventKind::Scroll => self.on_scroll(event.viewport, event.at),
            PageEventKind::Resize => self.on_resize(event.viewport),
        }
    }

    /// A scroll event arrived at `at`
    ///
    /// Updates progress and direction and (re)arms the scrolling flag.
    pub fn on_scroll(&mut self, viewport: Viewport, at: Duration) -> bool {
        let was_scrolling = self.activity.is_active();
        let previous_direction = self.direction;
        let previous_progress = self.progress;

        if let Some(direction) = ScrollDirection::between(self.last_offset, viewport.scroll_top) {
            self.direction = direction;
        }
        self.last_offset = viewport.scroll_top;
        self.progress = viewport.progress();

        let until = at + self.config.quiet_window;
        if let Some(next) = self.activity.on_event(ActivityEvent::Scroll { until }) {
            self.activity = next;
        }

        trace!(
            offset = viewport.scroll_top,
            progress = self.progress,
            direction = %self.direction,
            "scroll sample"
        );

        !was_scrolling
            || previous_direction != self.direction
            || previous_progress != self.progress
    }

    /// The viewport was resized; progress is recomputed
    pub fn on_resize(&mut self, viewport: Viewport) -> bool {
        let previous = self.progress;
        self.progress = viewport.progress();
        previous != self.progress
    }

    /// Let time pass; flips the scrolling flag off once the quiet window
    /// has elapsed without further scroll events
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.activity.on_event(ActivityEvent::Elapsed { now }) {
            Some(next) => {
                self.activity = next;
                trace!("scrolling settled");
                true
            }
            None => false,
        }
    }

    /// Record intersection reports for the tracked sections
    pub fn apply_intersections<I>(&mut self, entries: I) -> bool
    where
        I: IntoIterator<Item = IntersectionEntry>,
    {
        let changed = self.sections.apply(entries);
        if changed {
            debug!(section = ?self.sections.current(), "current section changed");
        }
        changed
    }

    /// Compute intersections against `document` and apply them
    ///
    /// For hosts without a native intersection observer.
    pub fn observe<D: Document + ?Sized>(&mut self, document: &D) -> bool {
        let entries = observe(
            document,
            &self.config.sections,
            self.config.threshold,
            &self.config.root_margin,
        );
        self.apply_intersections(entries)
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Document scroll progress, `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn is_scrolling(&self) -> bool {
        self.activity.is_active()
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    /// When the scrolling flag will clear if no further events arrive
    pub fn activity_deadline(&self) -> Option<Duration> {
        self.activity.deadline()
    }

    pub fn current_section(&self) -> Option<&str> {
        self.sections.current()
    }

    /// Snapshot for rendering
    pub fn state(&self) -> ScrollTrackingState {
        ScrollTrackingState {
            progress: self.progress,
            current_section: self.sections.current().map(str::to_string),
            is_scrolling: self.is_scrolling(),
            direction: self.direction,
        }
    }

    // =========================================================================
    // Page queries and commands
    // =========================================================================

    /// Smooth-scroll so the section's top sits below the configured header
    /// offset. Returns `false` (and does nothing) if the section is missing.
    pub fn scroll_to_section<D: Document + ?Sized>(&self, document: &D, id: &str) -> bool {
        self.scroll_to_section_with_offset(document, id, self.config.header_offset)
    }

    /// Smooth-scroll to a section, keeping `offset` pixels clear above it
    pub fn scroll_to_section_with_offset<D: Document + ?Sized>(
        &self,
        document: &D,
        id: &str,
        offset: f32,
    ) -> bool {
        let Some(rect) = document.section_rect(id) else {
            debug!(id, "scroll target not mounted");
            return false;
        };
        let target = rect.top() + document.viewport().scroll_top - offset;
        debug!(id, target, "scrolling to section");
        document.scroll_to(target, ScrollBehavior::Smooth);
        true
    }

    /// Fraction of each section's height inside the viewport
    ///
    /// Every tracked id is present in the result, in page order; missing or
    /// zero-height sections report `0`.
    pub fn section_visibility<D: Document + ?Sized>(&self, document: &D) -> IndexMap<String, f32> {
        let viewport_height = document.viewport().viewport_height;
        self.config
            .sections
            .iter()
            .map(|id| {
                let visible = document
                    .section_rect(id)
                    .filter(|rect| rect.height > 0.0)
                    .map(|rect| {
                        (rect.vertical_overlap(0.0, viewport_height) / rect.height).clamp(0.0, 1.0)
                    })
                    .unwrap_or(0.0);
                (id.clone(), visible)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_platform::headless::{HeadlessPage, ScrollCommand};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn tracker() -> ScrollTracker {
        ScrollTracker::new(ScrollTrackerConfig::new(["a", "b", "c"]))
    }

    fn page() -> HeadlessPage {
        let page = HeadlessPage::new(800.0, 3000.0);
        page.add_section("a", 0.0, 1000.0);
        page.add_section("b", 1000.0, 1000.0);
        page.add_section("c", 2000.0, 1000.0);
        page
    }

    #[test]
    fn test_initial_state() {
        let tracker = tracker();
        let state = tracker.state();

        assert_eq!(state.progress, 0.0);
        assert_eq!(state.current_section.as_deref(), Some("a"));
        assert!(!state.is_scrolling);
        assert_eq!(state.direction, ScrollDirection::None);
    }

    #[test]
    fn test_progress_monotonic() {
        let mut tracker = tracker();
        let mut last = 0.0;
        for step in 0..=22 {
            let offset = step as f32 * 100.0;
            tracker.on_scroll(Viewport::new(offset, 800.0, 3000.0), ms(step * 16));
            let p = tracker.progress();
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= last);
            last = p;
        }
        assert_eq!(tracker.progress(), 1.0);
    }

    #[test]
    fn test_progress_zero_when_not_scrollable() {
        let mut tracker = tracker();
        tracker.on_scroll(Viewport::new(120.0, 800.0, 700.0), ms(0));
        assert_eq!(tracker.progress(), 0.0);

        tracker.on_resize(Viewport::new(0.0, 800.0, 800.0));
        assert_eq!(tracker.progress(), 0.0);
    }

    #[test]
    fn test_resize_recomputes_progress() {
        let mut tracker = tracker();
        tracker.on_scroll(Viewport::new(1100.0, 800.0, 3000.0), ms(0));
        assert_eq!(tracker.progress(), 0.5);

        assert!(tracker.on_resize(Viewport::new(1100.0, 1900.0, 3000.0)));
        assert_eq!(tracker.progress(), 1.0);
    }

    #[test]
    fn test_direction_is_sticky() {
        let mut tracker = tracker();
        let viewport = Viewport::new(0.0, 800.0, 3000.0);

        tracker.on_scroll(viewport.with_scroll_top(100.0), ms(0));
        assert_eq!(tracker.direction(), ScrollDirection::Down);

        tracker.on_scroll(viewport.with_scroll_top(100.0), ms(10));
        assert_eq!(tracker.direction(), ScrollDirection::Down);

        tracker.on_scroll(viewport.with_scroll_top(40.0), ms(20));
        assert_eq!(tracker.direction(), ScrollDirection::Up);

        tracker.on_scroll(viewport.with_scroll_top(40.0), ms(30));
        assert_eq!(tracker.direction(), ScrollDirection::Up);
    }

    #[test]
    fn test_with_viewport_seeds_previous_offset() {
        let mut tracker = tracker().with_viewport(Viewport::new(500.0, 800.0, 3000.0));
        tracker.on_scroll(Viewport::new(450.0, 800.0, 3000.0), ms(0));
        assert_eq!(tracker.direction(), ScrollDirection::Up);
    }

    #[test]
    fn test_scrolling_quiet_window() {
        let mut tracker = tracker();
        let viewport = Viewport::new(200.0, 800.0, 3000.0);

        tracker.on_scroll(viewport, ms(1000));
        assert!(tracker.is_scrolling());

        assert!(!tracker.poll(ms(1149)));
        assert!(tracker.is_scrolling());

        assert!(tracker.poll(ms(1151)));
        assert!(!tracker.is_scrolling());
    }

    #[test]
    fn test_scroll_event_rearms_quiet_window() {
        let mut tracker = tracker();
        let viewport = Viewport::new(200.0, 800.0, 3000.0);

        tracker.on_scroll(viewport, ms(0));
        tracker.on_scroll(viewport.with_scroll_top(260.0), ms(100));

        tracker.poll(ms(200));
        assert!(tracker.is_scrolling());
        assert_eq!(tracker.activity_deadline(), Some(ms(250)));

        tracker.poll(ms(251));
        assert!(!tracker.is_scrolling());
        assert_eq!(tracker.activity_deadline(), None);
    }

    #[test]
    fn test_handle_dispatches_events() {
        let mut tracker = tracker();
        let viewport = Viewport::new(550.0, 800.0, 3000.0);

        tracker.handle(PageEvent::resize(viewport, ms(0)));
        assert!(!tracker.is_scrolling());
        assert_eq!(tracker.progress(), 0.25);

        tracker.handle(PageEvent::scroll(viewport.with_scroll_top(1100.0), ms(5)));
        assert!(tracker.is_scrolling());
        assert_eq!(tracker.progress(), 0.5);
    }

    #[test]
    fn test_current_section_from_ratios() {
        let mut tracker = tracker();
        tracker.apply_intersections([
            IntersectionEntry::new("a", true, 0.3),
            IntersectionEntry::new("b", true, 0.6),
            IntersectionEntry::new("c", true, 0.0),
        ]);
        assert_eq!(tracker.current_section(), Some("b"));
    }

    #[test]
    fn test_observe_headless_page() {
        let page = page();
        let mut tracker = tracker();

        page.set_scroll_top(1700.0);
        assert!(tracker.observe(&page));
        assert_eq!(tracker.current_section(), Some("c"));

        page.set_scroll_top(900.0);
        tracker.observe(&page);
        assert_eq!(tracker.current_section(), Some("b"));
    }

    #[test]
    fn test_unmounted_section_loses_current() {
        let page = page();
        let mut tracker = tracker();

        page.set_scroll_top(900.0);
        tracker.observe(&page);
        assert_eq!(tracker.current_section(), Some("b"));

        assert!(page.remove_section("b"));
        page.set_scroll_top(600.0);
        assert!(tracker.observe(&page));
        assert_eq!(tracker.current_section(), Some("a"));
        assert_eq!(tracker.section_visibility(&page)["b"], 0.0);
    }

    #[test]
    fn test_page_resize_recomputes_progress() {
        let page = page();
        let mut tracker = tracker();

        page.set_scroll_top(1100.0);
        tracker.on_scroll(page.viewport(), ms(0));
        assert_eq!(tracker.progress(), 0.5);

        page.resize(1900.0);
        assert!(tracker.on_resize(page.viewport()));
        assert_eq!(tracker.progress(), 1.0);

        page.set_document_height(5200.0);
        page.resize(800.0);
        tracker.on_resize(page.viewport());
        assert_eq!(tracker.progress(), 0.25);
    }

    #[test]
    fn test_scroll_to_section() {
        let page = page();
        let tracker = tracker();
        page.set_scroll_top(300.0);

        assert!(tracker.scroll_to_section(&page, "b"));
        assert_eq!(
            page.scroll_log(),
            vec![ScrollCommand {
                top: 920.0,
                behavior: ScrollBehavior::Smooth
            }]
        );

        assert!(tracker.scroll_to_section_with_offset(&page, "c", 0.0));
        assert_eq!(page.scroll_log()[1].top, 2000.0);
    }

    #[test]
    fn test_scroll_to_missing_section_is_noop() {
        let page = page();
        let tracker = tracker();

        assert!(!tracker.scroll_to_section(&page, "missing-id"));
        assert!(page.scroll_log().is_empty());
        assert_eq!(page.scroll_top(), 0.0);
    }

    #[test]
    fn test_section_visibility() {
        let page = HeadlessPage::new(800.0, 3000.0);
        page.add_section("a", 0.0, 1000.0);
        page.add_section("b", 1000.0, 400.0);
        page.set_scroll_top(700.0);

        let tracker = tracker();
        let visibility = tracker.section_visibility(&page);

        assert_eq!(
            visibility.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert_eq!(visibility["a"], 0.3);
        assert_eq!(visibility["b"], 1.0);
        assert_eq!(visibility["c"], 0.0);
    }
}
