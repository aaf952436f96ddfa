//! Folio Parallax Engine
//!
//! Scroll-driven transforms for page elements.
//!
//! # Features
//!
//! - **Registry**: one [`ParallaxConfig`] per surface, replaced on re-registration
//! - **Effects**: vertical/horizontal translation, depth-scaled zoom and tilt,
//!   and a fade centered on the element's traversal
//! - **Frame budget**: updates are rate-limited; early frames are skipped, not queued
//! - **Culling**: elements well outside the viewport are left untouched
//! - **Clean teardown**: unregistering, destroying, or dropping the engine
//!   resets every surface to its neutral style

pub mod config;
pub mod engine;
pub mod limiter;
pub mod motion;

pub use config::{EngineConfig, ParallaxConfig, ParallaxDirection, ParseDirectionError};
pub use engine::{FrameOutcome, ParallaxEngine, ParallaxId};
pub use limiter::FrameLimiter;
pub use motion::{compute_style, element_progress, is_culled, tent_opacity};
