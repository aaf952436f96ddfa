//! `requestAnimationFrame` scheduling

use std::cell::RefCell;
use std::rc::Rc;

use folio_platform::{FrameRequest, FrameScheduler};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::describe;

/// Slot holding the frame callback
///
/// The callback needs a handle to whatever owns the scheduler, so it is
/// created after the scheduler and stored here once it exists.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Books `callback` on the browser's animation frame queue
pub struct RafScheduler {
    window: Window,
    callback: FrameCallback,
}

impl RafScheduler {
    pub fn new(window: Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

/// Book the callback in `slot` for the next animation frame
///
/// `None` while the slot is empty or the browser rejects the request.
pub fn request_frame(window: &Window, slot: &FrameCallback) -> Option<FrameRequest> {
    let slot = slot.borrow();
    let callback = slot.as_ref()?;
    match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        Ok(handle) => Some(FrameRequest(handle)),
        Err(err) => {
            warn!(error = %describe(&err), "requestAnimationFrame rejected");
            None
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameRequest> {
        request_frame(&self.window, &self.callback)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if let Err(err) = self.window.cancel_animation_frame(request.0) {
            warn!(error = %describe(&err), "cancelAnimationFrame rejected");
        }
    }
}
