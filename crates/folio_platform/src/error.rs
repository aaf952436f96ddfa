//! Platform error types

use thiserror::Error;

/// Platform-related errors
///
/// The engines themselves never fail; these errors come from host setup
/// (attaching listeners, creating observers, resolving the window).
#[derive(Error, Debug)]
pub enum PlatformError {
    /// No window/document is available (e.g. running outside a browser)
    #[error("Platform not available: {0}")]
    Unavailable(String),

    /// Failed to attach or detach an event listener
    #[error("Event listener failed: {0}")]
    Listener(String),

    /// Failed to create a viewport intersection observer
    #[error("Intersection observer failed: {0}")]
    Observer(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
