//! Animation frame scheduling

/// Handle to a pending frame request
///
/// Mirrors the integer returned by `requestAnimationFrame`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub i32);

/// Requests animation frame callbacks from the host
///
/// The scheduler only books the callback; the host is responsible for
/// invoking the owning engine's frame handler when the frame fires.
pub trait FrameScheduler {
    /// Request a callback on the next animation frame
    ///
    /// Returns `None` when the host refused the request, in which case the
    /// loop stalls until it is started again.
    fn request_frame(&mut self) -> Option<FrameRequest>;

    /// Cancel a previously requested frame
    fn cancel_frame(&mut self, request: FrameRequest);
}
