//! Folio Platform Abstraction Layer
//!
//! This crate provides the platform-agnostic types and traits the scroll
//! tracker and parallax engine are written against.
//!
//! # Architecture
//!
//! The abstraction is built around three traits:
//!
//! - [`Document`] - The scrollable page: viewport metrics, section lookup, scrolling
//! - [`Surface`] - A displayable element that receives transform/opacity updates
//! - [`FrameScheduler`] - Animation frame requests (`requestAnimationFrame` in browsers)
//!
//! # Implementations
//!
//! - `folio_web` - Browser implementation over `web-sys`
//! - [`headless`] - In-memory page used by tests and the `folio` CLI
//!
//! # Example
//!
//! ```
//! use folio_platform::headless::HeadlessPage;
//! use folio_platform::{Document, Rect};
//!
//! let page = HeadlessPage::new(800.0, 3000.0);
//! page.add_section("about", 1000.0, 600.0);
//! page.set_scroll_top(1000.0);
//!
//! assert_eq!(page.section_rect("about"), Some(Rect::new(0.0, 0.0, 1280.0, 600.0)));
//! ```

mod document;
mod error;
mod event;
mod frame;
mod geometry;
pub mod headless;
mod surface;

// Re-export all public types
pub use document::{Document, ScrollBehavior};
pub use error::{PlatformError, Result};
pub use event::{PageEvent, PageEventKind};
pub use frame::{FrameRequest, FrameScheduler};
pub use geometry::{Rect, Viewport};
pub use surface::{Surface, Transform, TransformOp, VisualStyle};
