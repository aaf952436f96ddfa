//! Browser parallax session

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use folio_parallax::{EngineConfig, FrameOutcome, ParallaxConfig, ParallaxDirection, ParallaxEngine};
use folio_platform::{Document, Result};
use tracing::{debug, trace};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::dom::{from_millis, DomDocument, DomSurface};
use crate::frame::{request_frame, FrameCallback, RafScheduler};
use crate::listener::EventListener;
use crate::to_js;

type DomEngine = ParallaxEngine<DomSurface, RafScheduler>;

/// A parallax engine wired to the page
///
/// Scroll and resize listeners feed the engine viewport samples; animation
/// frames drive its updates. Dropping the session detaches the listeners,
/// cancels the pending frame, and resets every registered element.
pub struct ParallaxSession {
    _scroll: EventListener,
    _resize: EventListener,
    engine: Rc<RefCell<DomEngine>>,
    _frame: FrameCallback,
}

impl ParallaxSession {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let document = Rc::new(DomDocument::new()?);
        let frame: FrameCallback = Rc::new(RefCell::new(None));

        let scheduler = RafScheduler::new(document.window().clone(), Rc::clone(&frame));
        let mut engine = ParallaxEngine::with_config(scheduler, config);
        engine.update_viewport(document.viewport());
        let engine = Rc::new(RefCell::new(engine));

        let weak = Rc::downgrade(&engine);
        let slot = Rc::downgrade(&frame);
        let window = document.window().clone();
        *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            let Some(engine) = weak.upgrade() else {
                return;
            };
            let Ok(mut engine) = engine.try_borrow_mut() else {
                // Engine is busy in another call; retry on the next frame
                trace!("parallax frame deferred");
                if let Some(slot) = slot.upgrade() {
                    request_frame(&window, &slot);
                }
                return;
            };
            if let FrameOutcome::Applied { updated } = engine.on_frame(from_millis(timestamp)) {
                trace!(updated, "parallax frame applied");
            }
        }) as Box<dyn FnMut(f64)>));

        let window = document.window().clone();
        let scroll = EventListener::passive(&window, "scroll", sampler(&engine, &document))?;
        let resize = EventListener::passive(&window, "resize", sampler(&engine, &document))?;

        debug!(?config, "parallax session created");
        Ok(Self {
            _scroll: scroll,
            _resize: resize,
            engine,
            _frame: frame,
        })
    }

    pub fn engine(&self) -> &Rc<RefCell<DomEngine>> {
        &self.engine
    }

    /// Tear down explicitly; equivalent to dropping the session
    pub fn destroy(self) {
        let Self {
            _scroll: scroll,
            _resize: resize,
            engine,
            ..
        } = self;
        drop((scroll, resize));
        match Rc::try_unwrap(engine) {
            Ok(engine) => engine.into_inner().destroy(),
            Err(shared) => drop(shared),
        }
    }
}

fn sampler(
    engine: &Rc<RefCell<DomEngine>>,
    document: &Rc<DomDocument>,
) -> impl FnMut(web_sys::Event) + 'static {
    let engine: Weak<RefCell<DomEngine>> = Rc::downgrade(engine);
    let document = Rc::clone(document);
    move |_| {
        if let Some(engine) = engine.upgrade() {
            if let Ok(mut engine) = engine.try_borrow_mut() {
                engine.update_viewport(document.viewport());
            }
        }
    }
}

/// Per-element options, built in JavaScript with chained calls
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, Default)]
pub struct ParallaxOptions {
    config: ParallaxConfig,
}

#[wasm_bindgen]
impl ParallaxOptions {
    #[wasm_bindgen(constructor)]
    pub fn new(speed: f32) -> ParallaxOptions {
        Self {
            config: ParallaxConfig::new(speed),
        }
    }

    /// `"vertical"`, `"horizontal"` or `"both"`
    pub fn direction(mut self, direction: &str) -> std::result::Result<ParallaxOptions, JsValue> {
        self.config.direction = direction.parse::<ParallaxDirection>().map_err(to_js)?;
        Ok(self)
    }

    pub fn scale(mut self, enabled: bool) -> ParallaxOptions {
        self.config.scale = enabled;
        self
    }

    pub fn opacity(mut self, enabled: bool) -> ParallaxOptions {
        self.config.opacity = enabled;
        self
    }

    pub fn rotation(mut self, enabled: bool) -> ParallaxOptions {
        self.config.rotation = enabled;
        self
    }

    pub fn depth(mut self, depth: f32) -> ParallaxOptions {
        self.config.depth = depth;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> ParallaxOptions {
        self.config.threshold = threshold;
        self
    }
}

impl From<ParallaxOptions> for ParallaxConfig {
    fn from(options: ParallaxOptions) -> Self {
        options.config
    }
}

/// JavaScript handle to a [`ParallaxSession`]
#[wasm_bindgen]
pub struct WebParallax {
    session: ParallaxSession,
}

#[wasm_bindgen]
impl WebParallax {
    /// `targetFps` defaults to 60 (`0` disables limiting); `cullMargin` to 200px
    #[wasm_bindgen(constructor)]
    pub fn new(
        target_fps: Option<u32>,
        cull_margin: Option<f32>,
    ) -> std::result::Result<WebParallax, JsValue> {
        let mut config = EngineConfig::default();
        if let Some(fps) = target_fps {
            config = config.target_fps(fps);
        }
        if let Some(margin) = cull_margin {
            config = config.cull_margin(margin);
        }
        let session = ParallaxSession::new(config).map_err(to_js)?;
        Ok(Self { session })
    }

    /// Register an element; registering it again replaces its options
    pub fn register(&self, element: HtmlElement, options: Option<ParallaxOptions>) {
        let config = options.map(ParallaxConfig::from).unwrap_or_default();
        self.session
            .engine()
            .borrow_mut()
            .register(DomSurface::new(element), config);
    }

    /// Stop animating an element and clear its inline transform/opacity
    pub fn unregister(&self, element: HtmlElement) -> bool {
        self.session
            .engine()
            .borrow_mut()
            .unregister(&DomSurface::new(element))
    }

    pub fn start(&self) {
        self.session.engine().borrow_mut().start();
    }

    pub fn stop(&self) {
        self.session.engine().borrow_mut().stop();
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.session.engine().borrow().is_running()
    }

    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.session.engine().borrow().len()
    }

    #[wasm_bindgen(getter, js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.session.engine().borrow().is_empty()
    }

    #[wasm_bindgen(js_name = scrollProgress)]
    pub fn scroll_progress(&self) -> f32 {
        self.session.engine().borrow().current_scroll_progress()
    }

    #[wasm_bindgen(js_name = scrollOffset)]
    pub fn scroll_offset(&self) -> f32 {
        self.session.engine().borrow().current_scroll_offset()
    }

    /// Stop the loop, reset every element, and detach from the page
    pub fn destroy(self) {
        self.session.destroy();
    }
}
