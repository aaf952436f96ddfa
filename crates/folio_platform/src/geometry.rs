//! Viewport geometry

/// An axis-aligned rectangle in CSS pixels
///
/// Rects handed out by [`Document`](crate::Document) and
/// [`Surface`](crate::Surface) are viewport-relative, matching
/// `getBoundingClientRect()`: `y == 0` is the top edge of the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Length of the vertical overlap with the span `[top, bottom)`
    pub fn vertical_overlap(&self, top: f32, bottom: f32) -> f32 {
        (self.bottom().min(bottom) - self.top().max(top)).max(0.0)
    }
}

/// A sample of the document's scroll metrics
///
/// Taken on every scroll and resize event; everything the trackers derive
/// (progress, direction, per-element traversal) comes from these numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Vertical scroll offset in pixels (`window.scrollY`)
    pub scroll_top: f32,
    /// Height of the visible area (`window.innerHeight`)
    pub viewport_height: f32,
    /// Full scrollable height of the document
    pub document_height: f32,
}

impl Viewport {
    pub fn new(scroll_top: f32, viewport_height: f32, document_height: f32) -> Self {
        Self {
            scroll_top,
            viewport_height,
            document_height,
        }
    }

    /// Maximum scroll offset, `0` for a page that fits in the viewport
    pub fn scroll_range(&self) -> f32 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    /// Document-wide scroll progress in `[0, 1]`
    ///
    /// Returns exactly `0` when the document is not scrollable.
    pub fn progress(&self) -> f32 {
        let range = self.scroll_range();
        if range <= 0.0 {
            return 0.0;
        }
        (self.scroll_top / range).clamp(0.0, 1.0)
    }

    /// Same metrics at a different scroll offset
    pub fn with_scroll_top(self, scroll_top: f32) -> Self {
        Self { scroll_top, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bounds() {
        let viewport = Viewport::new(0.0, 800.0, 3000.0);
        assert_eq!(viewport.scroll_range(), 2200.0);

        let mut last = 0.0;
        let mut offset = 0.0;
        while offset <= 2200.0 {
            let p = viewport.with_scroll_top(offset).progress();
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= last);
            last = p;
            offset += 55.0;
        }
        assert_eq!(viewport.with_scroll_top(2200.0).progress(), 1.0);
    }

    #[test]
    fn test_progress_not_scrollable() {
        for offset in [0.0, 10.0, 500.0] {
            assert_eq!(Viewport::new(offset, 800.0, 800.0).progress(), 0.0);
            assert_eq!(Viewport::new(offset, 800.0, 600.0).progress(), 0.0);
        }
    }

    #[test]
    fn test_progress_overscroll_clamped() {
        assert_eq!(Viewport::new(-40.0, 800.0, 3000.0).progress(), 0.0);
        assert_eq!(Viewport::new(2500.0, 800.0, 3000.0).progress(), 1.0);
    }

    #[test]
    fn test_vertical_overlap() {
        let rect = Rect::new(0.0, -100.0, 50.0, 300.0);
        assert_eq!(rect.bottom(), 200.0);
        assert_eq!(rect.vertical_overlap(0.0, 800.0), 200.0);
        assert_eq!(rect.vertical_overlap(300.0, 800.0), 0.0);
    }
}
