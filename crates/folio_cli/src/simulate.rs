//! Scroll sweep simulation
//!
//! Replays a scroll from the top of the page to the bottom against the
//! headless host, feeding the tracker and the parallax engine exactly as
//! the browser host does, and records what each step produced.

use std::time::Duration;

use anyhow::Result;
use folio_parallax::{element_progress, is_culled, FrameOutcome, ParallaxEngine};
use folio_platform::headless::{HeadlessPage, HeadlessSurface, ManualFrameScheduler};
use folio_platform::{Document, Surface};
use folio_scroll::ScrollTracker;
use serde::Serialize;
use tracing::{debug, info};

use crate::scene::Scene;

/// Fallback sample spacing when frame limiting is disabled
const UNLIMITED_FRAME: Duration = Duration::from_millis(16);

/// Tracker and parallax output for one scroll sample
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub offset: f32,
    pub at_ms: u64,
    pub progress: f32,
    pub direction: String,
    pub is_scrolling: bool,
    pub current_section: Option<String>,
    pub elements: Vec<ElementSample>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElementSample {
    pub name: String,
    /// `None` when the element is culled
    pub progress: Option<f32>,
    pub transform: String,
    pub opacity: f32,
}

/// Sweep the page in `step` pixel increments
///
/// The last sample is taken once the quiet window has elapsed after the
/// final scroll, so it shows the settled state.
pub fn simulate(scene: &Scene, step: f32) -> Result<Vec<Sample>> {
    anyhow::ensure!(step > 0.0, "step must be positive, got {step}");

    let page = scene.page();
    let config = scene.tracker_config()?;
    let quiet_window = config.quiet_window;
    let mut tracker = ScrollTracker::new(config).with_viewport(page.viewport());

    let scheduler = ManualFrameScheduler::new();
    let mut engine = ParallaxEngine::with_config(scheduler.clone(), scene.engine);
    let surfaces = scene.surfaces(&page);
    for (surface, element) in surfaces.iter().zip(&scene.elements) {
        engine.register(surface.clone(), element.parallax);
    }
    engine.start();

    let frame = frame_interval(scene);
    let max = scene.max_scroll();
    let mut samples = Vec::new();
    let mut now = Duration::ZERO;
    let mut offset = 0.0_f32;

    info!(max, step, elements = engine.len(), "sweeping scene");
    loop {
        page.set_scroll_top(offset);
        tracker.on_scroll(page.viewport(), now);
        tracker.observe(&page);
        tracker.poll(now);

        engine.update_viewport(page.viewport());
        if scheduler.pending().is_some() {
            if let FrameOutcome::Throttled = engine.on_frame(now) {
                debug!(offset, "frame throttled");
            }
        }

        samples.push(sample(scene, &page, &surfaces, &tracker, now));

        if offset >= max {
            break;
        }
        offset = (offset + step).min(max);
        now += frame;
    }

    now += quiet_window;
    tracker.poll(now);
    samples.push(sample(scene, &page, &surfaces, &tracker, now));

    engine.destroy();
    Ok(samples)
}

fn frame_interval(scene: &Scene) -> Duration {
    match scene.engine.target_fps {
        0 => UNLIMITED_FRAME,
        fps => Duration::from_micros(1_000_000 / u64::from(fps)),
    }
}

fn sample(
    scene: &Scene,
    page: &HeadlessPage,
    surfaces: &[HeadlessSurface],
    tracker: &ScrollTracker,
    now: Duration,
) -> Sample {
    let viewport = page.viewport();
    let margin = scene.engine.cull_margin;
    let elements = scene
        .elements
        .iter()
        .zip(surfaces)
        .map(|(element, surface)| {
            let progress = surface
                .bounding_rect()
                .filter(|rect| !is_culled(*rect, viewport.viewport_height, margin))
                .map(|rect| element_progress(rect, &viewport));
            let style = surface.style().unwrap_or_default();
            ElementSample {
                name: element.name.clone(),
                progress,
                transform: style.transform.to_string(),
                opacity: style.opacity,
            }
        })
        .collect();

    let state = tracker.state();
    Sample {
        offset: viewport.scroll_top,
        at_ms: now.as_millis() as u64,
        progress: state.progress,
        direction: state.direction.to_string(),
        is_scrolling: state.is_scrolling,
        current_section: state.current_section,
        elements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::parse(
            r#"
            viewport_height = 800
            document_height = 3000

            [[sections]]
            id = "a"
            top = 0
            height = 1000

            [[sections]]
            id = "b"
            top = 1000
            height = 1000

            [[sections]]
            id = "c"
            top = 2000
            height = 1000

            [[elements]]
            name = "card"
            top = 1000
            height = 400
            speed = 0.5
            scale = true
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_sweep_covers_page() {
        let samples = simulate(&scene(), 100.0).unwrap();

        // 0..=2200 in 100px steps, plus the settled sample
        assert_eq!(samples.len(), 24);
        assert_eq!(samples[0].offset, 0.0);
        assert_eq!(samples[22].offset, 2200.0);
        assert_eq!(samples[22].progress, 1.0);
        assert_eq!(samples[22].current_section.as_deref(), Some("c"));
        assert_eq!(samples[22].direction, "down");
    }

    #[test]
    fn test_progress_is_monotonic() {
        let samples = simulate(&scene(), 75.0).unwrap();
        let progress: Vec<f32> = samples.iter().map(|s| s.progress).collect();
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_settles_after_sweep() {
        let samples = simulate(&scene(), 500.0).unwrap();
        let (last, sweep) = samples.split_last().unwrap();

        assert!(sweep.iter().skip(1).all(|s| s.is_scrolling));
        assert!(!last.is_scrolling);
    }

    #[test]
    fn test_element_at_midpoint() {
        let samples = simulate(&scene(), 100.0).unwrap();
        let at_1000 = samples.iter().find(|s| s.offset == 1000.0).unwrap();
        let card = &at_1000.elements[0];

        assert_eq!(card.progress, Some(0.5));
        assert!(card.transform.contains("scale(1)"));
    }

    #[test]
    fn test_rejects_zero_step() {
        assert!(simulate(&scene(), 0.0).is_err());
    }
}
