//! Folio Scroll Tracking
//!
//! Live scroll state for long single-page layouts.
//!
//! # Features
//!
//! - **Progress**: document scroll position normalized to `[0, 1]`
//! - **Direction**: up/down from consecutive samples, sticky on equal offsets
//! - **Activity**: `Idle`/`Active` state machine with a quiet-window deadline
//! - **Active section**: the most visible tracked section, switching only on a
//!   strictly larger intersection ratio
//! - **Navigation**: smooth scroll to a section below a fixed header
//! - **Visibility**: per-section visible fraction
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use folio_platform::headless::HeadlessPage;
//! use folio_platform::Document;
//! use folio_scroll::{ScrollTracker, ScrollTrackerConfig};
//!
//! let page = HeadlessPage::new(800.0, 2400.0);
//! page.add_section("hero", 0.0, 800.0);
//! page.add_section("projects", 800.0, 1600.0);
//!
//! let mut tracker = ScrollTracker::new(ScrollTrackerConfig::new(["hero", "projects"]));
//!
//! page.set_scroll_top(1200.0);
//! tracker.on_scroll(page.viewport(), Duration::from_millis(16));
//! tracker.observe(&page);
//!
//! assert_eq!(tracker.current_section(), Some("projects"));
//! assert!(tracker.is_scrolling());
//! ```

pub mod activity;
pub mod config;
pub mod intersection;
pub mod margin;
pub mod state;
pub mod tracker;

pub use activity::{Activity, ActivityEvent, DEFAULT_QUIET_WINDOW};
pub use config::{ScrollTrackerConfig, DEFAULT_HEADER_OFFSET, DEFAULT_THRESHOLD};
pub use intersection::{intersection_ratio, observe, IntersectionEntry, SectionResolver};
pub use margin::{Length, RootMargin, RootMarginError};
pub use state::{ScrollDirection, ScrollTrackingState};
pub use tracker::ScrollTracker;
