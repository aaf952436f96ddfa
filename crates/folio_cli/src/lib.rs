//! Folio CLI library
//!
//! Scene loading and the headless runs behind the `folio` subcommands.

use anyhow::Result;
use folio_platform::Document;
use folio_scroll::ScrollTracker;
use tracing::debug;

pub mod check;
pub mod scene;
pub mod simulate;

pub use check::{check_scene, CheckResult, CheckStatus};
pub use scene::Scene;
pub use simulate::{simulate, ElementSample, Sample};

/// Visible fraction of every section with the page scrolled to `offset`
pub fn visibility(scene: &Scene, offset: f32) -> Result<Vec<(String, f32)>> {
    let page = scene.page();
    page.set_scroll_top(offset.clamp(0.0, scene.max_scroll()));
    let tracker = ScrollTracker::new(scene.tracker_config()?);
    Ok(tracker.section_visibility(&page).into_iter().collect())
}

/// Where `scroll_to_section` would send the page from `offset`
///
/// `None` when the section is not in the scene. The target is clamped to
/// the scrollable range, as a browser would.
pub fn jump(
    scene: &Scene,
    offset: f32,
    section: &str,
    header_offset: Option<f32>,
) -> Result<Option<f32>> {
    let page = scene.page();
    page.set_scroll_top(offset.clamp(0.0, scene.max_scroll()));
    let tracker = ScrollTracker::new(scene.tracker_config()?);

    let moved = match header_offset {
        Some(header) => tracker.scroll_to_section_with_offset(&page, section, header),
        None => tracker.scroll_to_section(&page, section),
    };
    if !moved {
        return Ok(None);
    }

    debug!(requested = ?page.scroll_log(), "scroll command issued");
    Ok(Some(page.viewport().scroll_top))
}
