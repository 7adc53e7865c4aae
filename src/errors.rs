//! Error Types
//!
//! The main error type [`VulpineError`] covers all failure modes:
//! construction-time configuration errors (missing locators, duplicate
//! clips), lookup failures, and unsupported prop/hand combinations.
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, VulpineError>`.

use thiserror::Error;

/// The main error type for the Vulpine character engine.
#[derive(Error, Debug)]
pub enum VulpineError {
    // ========================================================================
    // Configuration Errors (fatal at construction)
    // ========================================================================
    /// A required named locator is missing from the rig.
    #[error("Locator not found: {0}")]
    LocatorNotFound(String),

    /// Two clips with the same name were registered.
    #[error("Duplicate animation clip: {0}")]
    DuplicateClip(String),

    // ========================================================================
    // Lookup Errors (caller-recoverable)
    // ========================================================================
    /// The requested animation clip is not in the registry.
    #[error("Animation clip not found: {0}")]
    ClipNotFound(String),

    // ========================================================================
    // Caller Errors
    // ========================================================================
    /// A hand-specific capability was invoked on a prop/hand combination
    /// that does not support it.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}

/// Alias for `Result<T, VulpineError>`.
pub type Result<T> = std::result::Result<T, VulpineError>;
