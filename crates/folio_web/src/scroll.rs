//! Browser scroll tracking session

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use folio_platform::{Document, PageEvent, PlatformError, Result};
use folio_scroll::{
    IntersectionEntry, RootMargin, ScrollTracker, ScrollTrackerConfig, ScrollTrackingState,
};
use js_sys::{Array, Function, Map, Object, Reflect};
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::{now, DomDocument};
use crate::listener::EventListener;
use crate::{describe, to_js};

struct Shared {
    tracker: ScrollTracker,
    document: DomDocument,
    on_change: Option<Function>,
    quiet_timer: Option<i32>,
    quiet_callback: Option<Function>,
}

impl Shared {
    /// (Re)arm the timer that lets the scrolling flag settle
    fn arm_quiet_timer(&mut self) {
        let Some(deadline) = self.tracker.activity_deadline() else {
            return;
        };
        let Some(callback) = self.quiet_callback.as_ref() else {
            return;
        };
        let window = self.document.window();
        if let Some(handle) = self.quiet_timer.take() {
            window.clear_timeout_with_handle(handle);
        }

        let remaining = deadline.saturating_sub(now(window));
        let delay = remaining.as_millis().min(i32::MAX as u128) as i32;
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(callback, delay + 1) {
            Ok(handle) => self.quiet_timer = Some(handle),
            Err(err) => warn!(error = %describe(&err), "setTimeout rejected"),
        }
    }

    fn cancel_quiet_timer(&mut self) {
        if let Some(handle) = self.quiet_timer.take() {
            self.document.window().clear_timeout_with_handle(handle);
        }
    }
}

/// Run `apply` against the shared state and notify the change callback
///
/// The callback runs after the borrow is released so it may call back into
/// the tracker.
fn update(shared: &Weak<RefCell<Shared>>, apply: impl FnOnce(&mut Shared) -> bool) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let notify = {
        let Ok(mut inner) = shared.try_borrow_mut() else {
            return;
        };
        if !apply(&mut inner) {
            return;
        }
        inner
            .on_change
            .clone()
            .map(|callback| (callback, inner.tracker.state()))
    };

    if let Some((callback, state)) = notify {
        if let Err(err) = callback.call1(&JsValue::NULL, &state_object(&state)) {
            warn!(error = %describe(&err), "scroll change callback threw");
        }
    }
}

fn state_object(state: &ScrollTrackingState) -> JsValue {
    let object = Object::new();
    let section = state
        .current_section
        .as_deref()
        .map(JsValue::from_str)
        .unwrap_or(JsValue::NULL);
    let fields = [
        ("progress", JsValue::from_f64(f64::from(state.progress))),
        ("currentSection", section),
        ("isScrolling", JsValue::from_bool(state.is_scrolling)),
        ("direction", JsValue::from_str(state.direction.as_str())),
    ];
    for (key, value) in fields {
        if let Err(err) = Reflect::set(&object, &JsValue::from_str(key), &value) {
            warn!(key, error = %describe(&err), "failed to set scroll state field");
        }
    }
    object.into()
}

/// A scroll tracker wired to the page
///
/// Owns the scroll/resize listeners, the section `IntersectionObserver` and
/// the quiet-window timer; dropping the session releases all of them.
pub struct ScrollSession {
    _scroll: EventListener,
    _resize: EventListener,
    observer: IntersectionObserver,
    _observe: Closure<dyn FnMut(Array, IntersectionObserver)>,
    _quiet: Closure<dyn FnMut()>,
    shared: Rc<RefCell<Shared>>,
}

impl ScrollSession {
    pub fn new(config: ScrollTrackerConfig) -> Result<Self> {
        let document = DomDocument::new()?;
        let tracker = ScrollTracker::new(config).with_viewport(document.viewport());
        let threshold = tracker.config().threshold;
        let root_margin = tracker.config().root_margin.to_string();

        let shared = Rc::new(RefCell::new(Shared {
            tracker,
            document,
            on_change: None,
            quiet_timer: None,
            quiet_callback: None,
        }));
        let window = shared.borrow().document.window().clone();

        let weak = Rc::downgrade(&shared);
        let quiet = Closure::wrap(Box::new(move || {
            update(&weak, |inner| {
                inner.quiet_timer = None;
                let at = now(inner.document.window());
                let changed = inner.tracker.poll(at);
                // Still active when the timer beat the deadline
                inner.arm_quiet_timer();
                changed
            });
        }) as Box<dyn FnMut()>);
        shared.borrow_mut().quiet_callback = Some(quiet.as_ref().unchecked_ref::<Function>().clone());

        let weak = Rc::downgrade(&shared);
        let observe = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
            let entries: Vec<IntersectionEntry> = entries
                .iter()
                .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| {
                    let ratio = entry.intersection_ratio() as f32;
                    IntersectionEntry::new(
                        entry.target().id(),
                        entry.is_intersecting() && ratio >= threshold,
                        ratio,
                    )
                })
                .collect();
            update(&weak, |inner| inner.tracker.apply_intersections(entries));
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(f64::from(threshold)));
        init.set_root_margin(&root_margin);
        let observer = IntersectionObserver::new_with_options(observe.as_ref().unchecked_ref(), &init)
            .map_err(|err| PlatformError::Observer(describe(&err)))?;

        let weak = Rc::downgrade(&shared);
        let scroll = EventListener::passive(&window, "scroll", move |_| {
            update(&weak, |inner| {
                let event = PageEvent::scroll(inner.document.viewport(), now(inner.document.window()));
                let changed = inner.tracker.handle(event);
                inner.arm_quiet_timer();
                changed
            });
        })?;

        let weak = Rc::downgrade(&shared);
        let resize = EventListener::passive(&window, "resize", move |_| {
            update(&weak, |inner| {
                let event = PageEvent::resize(inner.document.viewport(), now(inner.document.window()));
                inner.tracker.handle(event)
            });
        })?;

        let session = Self {
            _scroll: scroll,
            _resize: resize,
            observer,
            _observe: observe,
            _quiet: quiet,
            shared,
        };
        let observed = session.refresh_sections();
        debug!(observed, root_margin = %root_margin, threshold, "scroll session created");
        Ok(session)
    }

    /// Observe every tracked section currently mounted
    ///
    /// Call again after sections mount late; returns how many were found.
    pub fn refresh_sections(&self) -> usize {
        let inner = self.shared.borrow();
        let mut found = 0;
        for id in inner.tracker.sections() {
            match inner.document.element(id) {
                Some(element) => {
                    self.observer.observe(&element);
                    found += 1;
                }
                None => debug!(id, "section not mounted"),
            }
        }
        found
    }

    /// Set the function called with a state snapshot after every change
    pub fn set_on_change(&self, callback: Option<Function>) {
        self.shared.borrow_mut().on_change = callback;
    }

    /// Read the tracker
    pub fn with_tracker<R>(&self, f: impl FnOnce(&ScrollTracker, &DomDocument) -> R) -> R {
        let inner = self.shared.borrow();
        f(&inner.tracker, &inner.document)
    }
}

impl Drop for ScrollSession {
    fn drop(&mut self) {
        self.observer.disconnect();
        if let Ok(mut inner) = self.shared.try_borrow_mut() {
            inner.cancel_quiet_timer();
            inner.on_change = None;
            inner.quiet_callback = None;
        }
        debug!("scroll session released");
    }
}

/// JavaScript handle to a [`ScrollSession`]
#[wasm_bindgen]
pub struct WebScrollTracker {
    session: ScrollSession,
}

#[wasm_bindgen]
impl WebScrollTracker {
    /// Track `sections` (element ids, in page order)
    ///
    /// `threshold` defaults to 0.3 and `rootMargin` to `"0px"`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        sections: Vec<String>,
        threshold: Option<f32>,
        root_margin: Option<String>,
    ) -> std::result::Result<WebScrollTracker, JsValue> {
        let mut config = ScrollTrackerConfig::new(sections);
        if let Some(threshold) = threshold {
            config = config.threshold(threshold);
        }
        if let Some(margin) = root_margin {
            config = config.root_margin(RootMargin::parse(&margin).map_err(to_js)?);
        }
        let session = ScrollSession::new(config).map_err(to_js)?;
        Ok(Self { session })
    }

    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f32 {
        self.session.with_tracker(|tracker, _| tracker.progress())
    }

    #[wasm_bindgen(getter, js_name = currentSection)]
    pub fn current_section(&self) -> Option<String> {
        self.session
            .with_tracker(|tracker, _| tracker.current_section().map(str::to_string))
    }

    #[wasm_bindgen(getter, js_name = isScrolling)]
    pub fn is_scrolling(&self) -> bool {
        self.session.with_tracker(|tracker, _| tracker.is_scrolling())
    }

    /// `"up"`, `"down"` or `"none"`
    #[wasm_bindgen(getter)]
    pub fn direction(&self) -> String {
        self.session
            .with_tracker(|tracker, _| tracker.direction().as_str().to_string())
    }

    /// Current state as `{ progress, currentSection, isScrolling, direction }`
    pub fn state(&self) -> JsValue {
        self.session
            .with_tracker(|tracker, _| state_object(&tracker.state()))
    }

    /// Smooth-scroll to a section below the fixed header (80px unless
    /// `offset` is given). Returns `false` if the section is not mounted.
    #[wasm_bindgen(js_name = scrollToSection)]
    pub fn scroll_to_section(&self, id: &str, offset: Option<f32>) -> bool {
        self.session.with_tracker(|tracker, document| match offset {
            Some(offset) => tracker.scroll_to_section_with_offset(document, id, offset),
            None => tracker.scroll_to_section(document, id),
        })
    }

    /// `Map` of section id to visible fraction, in page order
    #[wasm_bindgen(js_name = sectionVisibility)]
    pub fn section_visibility(&self) -> Map {
        let map = Map::new();
        self.session.with_tracker(|tracker, document| {
            for (id, visible) in tracker.section_visibility(document) {
                map.set(&JsValue::from_str(&id), &JsValue::from_f64(f64::from(visible)));
            }
        });
        map
    }

    /// Register (or clear, with `undefined`) the change callback
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Option<Function>) {
        self.session.set_on_change(callback);
    }

    /// Start observing sections that mounted after construction
    #[wasm_bindgen(js_name = refreshSections)]
    pub fn refresh_sections(&self) -> usize {
        self.session.refresh_sections()
    }

    /// Detach every listener, observer and timer
    pub fn destroy(self) {
        drop(self.session);
    }
}
