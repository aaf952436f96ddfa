//! Folio Web Host
//!
//! Browser implementation of the `folio_platform` traits over `web-sys`, and
//! the `wasm-bindgen` sessions a page script drives:
//!
//! - [`WebParallax`] - owns a [`folio_parallax::ParallaxEngine`] whose surfaces
//!   are DOM elements and whose frames come from `requestAnimationFrame`
//! - [`WebScrollTracker`] - owns a [`folio_scroll::ScrollTracker`] fed by
//!   passive scroll/resize listeners, an `IntersectionObserver`, and a
//!   `setTimeout` for the quiet window
//!
//! Each session owns its listeners, observers, timers and pending frames;
//! dropping it (or calling `destroy()` from JavaScript) releases all of them.
//!
//! ```js
//! import init, { WebParallax, ParallaxOptions, WebScrollTracker } from "folio_web";
//!
//! await init();
//! const parallax = new WebParallax();
//! parallax.register(document.getElementById("hero-bg"), new ParallaxOptions(0.3).scale(true));
//! parallax.start();
//!
//! const tracker = new WebScrollTracker(["hero", "projects", "contact"]);
//! tracker.onChange((state) => highlight(state.currentSection));
//! ```

use std::fmt::Display;

use wasm_bindgen::prelude::*;

pub mod dom;
pub mod frame;
pub mod listener;
pub mod parallax;
pub mod scroll;

pub use dom::{DomDocument, DomSurface};
pub use frame::RafScheduler;
pub use listener::EventListener;
pub use parallax::{ParallaxOptions, ParallaxSession, WebParallax};
pub use scroll::{ScrollSession, WebScrollTracker};

#[cfg(feature = "console-panic")]
#[wasm_bindgen(start)]
/// Route Rust panics to the browser console
pub fn init_console_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Convert a host or parse error into a thrown JavaScript `Error`
pub(crate) fn to_js(err: impl Display) -> JsValue {
    JsError::new(&err.to_string()).into()
}

/// Human-readable text for a value thrown by a browser API
pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
