//! Parallax engine
//!
//! Owns the registry of parallax surfaces and drives the animation loop:
//! every frame (within the frame budget) each visible surface's style is
//! recomputed from the latest viewport sample and written in one mutation.
//!
//! The engine does not subscribe to anything itself. The host feeds it
//! viewport samples through [`ParallaxEngine::update_viewport`] and calls
//! [`ParallaxEngine::on_frame`] when a requested frame fires; the engine
//! books the next frame through its [`FrameScheduler`].
//!
//! ```
//! use std::time::Duration;
//!
//! use folio_parallax::{ParallaxConfig, ParallaxEngine};
//! use folio_platform::headless::{HeadlessPage, ManualFrameScheduler};
//! use folio_platform::Document;
//!
//! let page = HeadlessPage::new(800.0, 3000.0);
//! let hero = page.surface(1000.0, 400.0);
//!
//! let mut engine = ParallaxEngine::new(ManualFrameScheduler::new());
//! engine.register(hero.clone(), ParallaxConfig::new(0.5).scale(true));
//! engine.start();
//!
//! page.set_scroll_top(1000.0);
//! engine.update_viewport(page.viewport());
//! engine.on_frame(Duration::from_millis(16));
//!
//! assert!(hero.style().is_some());
//! ```

use std::time::Duration;

use folio_platform::{FrameRequest, FrameScheduler, Surface, Viewport};
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace, warn};

use crate::config::{EngineConfig, ParallaxConfig};
use crate::limiter::FrameLimiter;
use crate::motion::{compute_style, element_progress, is_culled};

new_key_type! {
    /// Handle to a registered parallax surface
    pub struct ParallaxId;
}

struct ParallaxEntry<S> {
    surface: S,
    config: ParallaxConfig,
}

/// What a frame callback did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Styles were recomputed; `updated` surfaces received a new style
    Applied { updated: usize },
    /// The frame arrived inside the frame budget and did nothing
    Throttled,
    /// The loop is not running; no frame was requested
    Stopped,
}

/// Registry of parallax surfaces plus the loop that animates them
pub struct ParallaxEngine<S: Surface, F: FrameScheduler> {
    entries: SlotMap<ParallaxId, ParallaxEntry<S>>,
    scheduler: F,
    config: EngineConfig,
    limiter: FrameLimiter,
    viewport: Viewport,
    running: bool,
    pending: Option<FrameRequest>,
}

impl<S: Surface, F: FrameScheduler> ParallaxEngine<S, F> {
    pub fn new(scheduler: F) -> Self {
        Self::with_config(scheduler, EngineConfig::default())
    }

    pub fn with_config(scheduler: F, config: EngineConfig) -> Self {
        Self {
            entries: SlotMap::with_key(),
            scheduler,
            config,
            limiter: FrameLimiter::new(config.target_fps),
            viewport: Viewport::default(),
            running: false,
            pending: None,
        }
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Register a surface, replacing its config if it is already registered
    ///
    /// The surface is hinted for accelerated rendering. Returns the handle,
    /// which is stable across re-registration.
    pub fn register(&mut self, surface: S, config: ParallaxConfig) -> ParallaxId {
        if let Some(id) = self.find(&surface) {
            if let Some(entry) = self.entries.get_mut(id) {
                entry.config = config;
            }
            debug!(?id, "parallax config replaced");
            return id;
        }

        surface.set_accelerated(true);
        let id = self.entries.insert(ParallaxEntry { surface, config });
        debug!(?id, count = self.entries.len(), "parallax surface registered");
        id
    }

    /// Remove a surface and reset its transform and opacity
    ///
    /// Returns `false` if the surface was not registered.
    pub fn unregister(&mut self, surface: &S) -> bool {
        match self.find(surface) {
            Some(id) => self.unregister_id(id),
            None => false,
        }
    }

    /// Remove a surface by handle and reset it
    pub fn unregister_id(&mut self, id: ParallaxId) -> bool {
        let Some(entry) = self.entries.remove(id) else {
            return false;
        };
        entry.surface.reset();
        entry.surface.set_accelerated(false);
        debug!(?id, count = self.entries.len(), "parallax surface unregistered");
        true
    }

    /// Config currently bound to a surface
    pub fn config(&self, surface: &S) -> Option<&ParallaxConfig> {
        self.find(surface)
            .and_then(|id| self.entries.get(id))
            .map(|entry| &entry.config)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, surface: &S) -> Option<ParallaxId> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.surface == *surface)
            .map(|(id, _)| id)
    }

    // =========================================================================
    // Loop control
    // =========================================================================

    /// Start the animation loop (no-op if already running)
    ///
    /// If the host cannot book a frame the loop stays stopped, so a later
    /// `start` can retry.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.limiter.reset();
        self.book_frame();
        if self.running {
            debug!(frame = ?self.pending, "parallax loop started");
        }
    }

    /// Stop the animation loop, cancelling the pending frame
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_frame(request);
        }
        debug!("parallax loop stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the loop and reset every surface
    ///
    /// Terminal: the engine is consumed. Dropping the engine does the same.
    pub fn destroy(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.stop();
        if self.entries.is_empty() {
            return;
        }
        for (_, entry) in self.entries.drain() {
            entry.surface.reset();
            entry.surface.set_accelerated(false);
        }
        debug!("parallax engine torn down");
    }

    // =========================================================================
    // Per-frame update
    // =========================================================================

    /// Record a scroll/resize sample
    pub fn update_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Document scroll progress from the last sample, `[0, 1]`
    pub fn current_scroll_progress(&self) -> f32 {
        self.viewport.progress()
    }

    /// Raw vertical scroll offset from the last sample
    pub fn current_scroll_offset(&self) -> f32 {
        self.viewport.scroll_top
    }

    /// Handle a fired animation frame
    ///
    /// Applies styles if the frame budget allows and books the next frame
    /// while the loop is running.
    pub fn on_frame(&mut self, now: Duration) -> FrameOutcome {
        self.pending = None;
        if !self.running {
            return FrameOutcome::Stopped;
        }

        let outcome = if self.limiter.ready(now) {
            FrameOutcome::Applied {
                updated: self.update(),
            }
        } else {
            FrameOutcome::Throttled
        };

        self.book_frame();
        outcome
    }

    fn book_frame(&mut self) {
        self.pending = self.scheduler.request_frame();
        if self.pending.is_none() {
            warn!("no animation frame available, parallax loop stopped");
            self.running = false;
        }
    }

    /// Recompute and apply styles for every visible surface now
    ///
    /// Returns how many surfaces were written.
    pub fn update(&mut self) -> usize {
        let viewport = self.viewport;
        let margin = self.config.cull_margin;
        let mut updated = 0;

        for (_, entry) in self.entries.iter() {
            let Some(rect) = entry.surface.bounding_rect() else {
                continue;
            };
            if is_culled(rect, viewport.viewport_height, margin) {
                continue;
            }

            let progress = element_progress(rect, &viewport);
            if progress < entry.config.threshold {
                continue;
            }

            entry.surface.apply(&compute_style(&entry.config, progress));
            updated += 1;
        }

        trace!(updated, total = self.entries.len(), "parallax frame");
        updated
    }
}

impl<S: Surface, F: FrameScheduler> Drop for ParallaxEngine<S, F> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<S: Surface, F: FrameScheduler> std::fmt::Debug for ParallaxEngine<S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallaxEngine")
            .field("entries", &self.entries.len())
            .field("running", &self.running)
            .field("pending", &self.pending)
            .field("viewport", &self.viewport)
            .finish()
    }
}
