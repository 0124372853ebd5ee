//! # Kernel Errors
//!
//! Error types for the geometry kernel. Every precondition violation is
//! reported as an explicit error; nothing is silently repaired.

use config::constants::ConfigError;
use thiserror::Error;

/// Errors that can occur while building or combining geometry.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Configuration values were rejected
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Not enough points or vertices to form the requested shape
    #[error("Too few points: {count} (min: {min})")]
    TooFewPoints { count: usize, min: usize },

    /// Points do not span a plane
    #[error("Degenerate plane: {message}")]
    DegeneratePlane { message: String },

    /// Polygon vertices do not form a convex loop
    #[error("Polygon is not convex")]
    NonConvexPolygon,

    /// Area boundary crosses itself
    #[error("Self-intersecting area: {message}")]
    SelfIntersecting { message: String },

    /// Area is too small to be meaningful
    #[error("Degenerate area: {area}")]
    DegenerateArea { area: f64 },

    /// A polygon of a lifted area violates the wall layout
    #[error("Malformed fake solid: {message}")]
    MalformedFakeSolid { message: String },

    /// Outline walk reached a vertex without an outgoing side
    #[error("Area is not closed at vertex {vertex}")]
    UnclosedOutline { vertex: u64 },

    /// Parameter outside its accepted range
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// Area validation found one or more defects
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

impl KernelError {
    /// Creates a degenerate plane error.
    pub fn degenerate_plane(message: impl Into<String>) -> Self {
        Self::DegeneratePlane {
            message: message.into(),
        }
    }

    /// Creates a self-intersection error.
    pub fn self_intersecting(message: impl Into<String>) -> Self {
        Self::SelfIntersecting {
            message: message.into(),
        }
    }

    /// Creates a malformed fake solid error.
    pub fn malformed_fake_solid(message: impl Into<String>) -> Self {
        Self::MalformedFakeSolid {
            message: message.into(),
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

/// Result type for kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KernelError>();
    }

    #[test]
    fn test_config_error_converts() {
        let err: KernelError = ConfigError::InvalidResolution(1).into();
        assert!(matches!(err, KernelError::Config(_)));
        assert!(err.to_string().starts_with("Invalid configuration"));
    }

    #[test]
    fn test_messages_carry_context() {
        let err = KernelError::invalid_parameter("radius", "must be positive");
        assert_eq!(err.to_string(), "Invalid parameter 'radius': must be positive");

        let err = KernelError::TooFewPoints { count: 2, min: 3 };
        assert_eq!(err.to_string(), "Too few points: 2 (min: 3)");
    }
}
