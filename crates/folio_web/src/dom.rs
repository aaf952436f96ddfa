//! DOM-backed document and surfaces

use std::time::Duration;

use folio_platform::{
    Document, PlatformError, Rect, Result, ScrollBehavior, Surface, Viewport, VisualStyle,
};
use tracing::warn;
use web_sys::{Element, HtmlElement, ScrollToOptions, Window};

use crate::describe;

const ACCELERATION_HINT: &str = "transform, opacity";

/// The global `window`, or an error when running outside a browser
pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| PlatformError::Unavailable("no global window".to_string()))
}

/// Milliseconds since the page's time origin, as a `Duration`
pub fn now(window: &Window) -> Duration {
    let ms = window.performance().map(|p| p.now()).unwrap_or(0.0);
    from_millis(ms)
}

/// Convert a `DOMHighResTimeStamp` to a `Duration`
pub fn from_millis(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

fn client_rect(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(
        rect.x() as f32,
        rect.y() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

/// The page behind `window.document`
#[derive(Clone, Debug)]
pub struct DomDocument {
    window: Window,
    document: web_sys::Document,
}

impl DomDocument {
    pub fn new() -> Result<Self> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| PlatformError::Unavailable("window has no document".to_string()))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Element with the given id, if mounted
    pub fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }
}

impl Document for DomDocument {
    fn viewport(&self) -> Viewport {
        let scroll_top = self.window.scroll_y().unwrap_or(0.0) as f32;
        let viewport_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0) as f32;
        let document_height = self
            .document
            .document_element()
            .map(|root| root.scroll_height() as f32)
            .unwrap_or(0.0);
        Viewport::new(scroll_top, viewport_height, document_height)
    }

    fn section_rect(&self, id: &str) -> Option<Rect> {
        self.element(id).map(|element| client_rect(&element))
    }

    fn scroll_to(&self, top: f32, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(f64::from(top));
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

/// An element animated by the parallax engine
///
/// Two surfaces are equal when they wrap the same DOM node.
#[derive(Clone, Debug, PartialEq)]
pub struct DomSurface {
    element: HtmlElement,
}

impl DomSurface {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    fn set(&self, property: &str, value: &str) {
        if let Err(err) = self.element.style().set_property(property, value) {
            warn!(property, error = %describe(&err), "failed to set style");
        }
    }

    fn clear(&self, property: &str) {
        if let Err(err) = self.element.style().remove_property(property) {
            warn!(property, error = %describe(&err), "failed to clear style");
        }
    }
}

impl Surface for DomSurface {
    fn bounding_rect(&self) -> Option<Rect> {
        if !self.element.is_connected() {
            return None;
        }
        Some(client_rect(&self.element))
    }

    fn apply(&self, style: &VisualStyle) {
        self.set("transform", &style.transform.to_string());
        self.set("opacity", &style.opacity.to_string());
    }

    fn reset(&self) {
        self.clear("transform");
        self.clear("opacity");
    }

    fn set_accelerated(&self, accelerated: bool) {
        if accelerated {
            self.set("will-change", ACCELERATION_HINT);
        } else {
            self.clear("will-change");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis() {
        assert_eq!(from_millis(16.0), Duration::from_millis(16));
        assert_eq!(from_millis(-3.0), Duration::ZERO);
        assert_eq!(from_millis(f64::NAN), Duration::ZERO);
    }
}
