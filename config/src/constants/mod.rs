//! # Configuration Constants
//!
//! Tolerances and defaults shared by the geometry kernel.
//!
//! ## Categories
//!
//! - **Precision**: plane classification and merge tolerances
//! - **Resolution**: default arc sampling for 2D and 3D primitives
//! - **Thresholds**: fixed cut-offs used by the self-intersection test,
//!   the fake-solid lowering, retesselation and the shell builder
//! - **Export**: names written into exported documents

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Tolerance for front/back/coplanar classification against a plane.
///
/// Also used for fuzzy vertex merging and for dropping degenerate edges.
///
/// # Examples
/// ```
/// use config::constants::EPSILON;
/// assert_eq!(EPSILON, 1e-5);
/// ```
pub const EPSILON: f64 = 1e-5;

/// Areas below this magnitude are treated as degenerate.
///
/// # Examples
/// ```
/// use config::constants::AREA_EPSILON;
/// assert!(AREA_EPSILON > 0.0);
/// ```
pub const AREA_EPSILON: f64 = 1e-5;

/// Two plane normals closer than this (squared distance) are considered equal
/// when selecting polygons for a projection.
pub const NORMAL_MATCH_EPSILON: f64 = 1e-7;

// =============================================================================
// RESOLUTION CONSTANTS
// =============================================================================

/// Default number of segments used for full circles in 2D.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_RESOLUTION_2D;
/// assert_eq!(DEFAULT_RESOLUTION_2D, 32);
/// ```
pub const DEFAULT_RESOLUTION_2D: u32 = 32;

/// Default number of segments used for curved 3D primitives.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_RESOLUTION_3D;
/// assert_eq!(DEFAULT_RESOLUTION_3D, 12);
/// ```
pub const DEFAULT_RESOLUTION_3D: u32 = 12;

/// Convexity assertions are disabled unless explicitly enabled.
pub const DEFAULT_DEBUG_ASSERTIONS: bool = false;

/// Smallest resolution accepted by the shell builder.
pub const MIN_SHELL_RESOLUTION: u32 = 4;

/// Smallest resolution accepted anywhere a polygon is sampled.
pub const MIN_RESOLUTION: u32 = 3;

// =============================================================================
// THRESHOLDS
// =============================================================================

/// Cross products below this magnitude mark two edges as parallel.
pub const SELF_INTERSECT_PARALLEL_EPSILON: f64 = 1e-9;

/// Lower bound (exclusive) of the edge parameter for a proper crossing.
pub const SELF_INTERSECT_ALPHA_MIN: f64 = 1e-6;

/// Upper bound (exclusive) of the edge parameter for a proper crossing.
pub const SELF_INTERSECT_ALPHA_MAX: f64 = 0.999999;

/// Two adjacent edges fold back on each other when the sum of their unit
/// directions is shorter than this.
pub const FOLD_BACK_EPSILON: f64 = 1e-5;

/// Allowed deviation of `|z|` from 1 for vertices of a lowered fake solid.
///
/// # Examples
/// ```
/// use config::constants::FAKE_Z_TOLERANCE;
/// assert!((1.0005f64.abs() - 1.0).abs() < FAKE_Z_TOLERANCE);
/// ```
pub const FAKE_Z_TOLERANCE: f64 = 0.001;

/// Angular slack (degrees) below which a wedge is widened to a full circle.
pub const FULL_CIRCLE_EPSILON: f64 = 1e-5;

/// Corner wedges spanning fewer degrees than this are left out of a shell.
pub const MIN_WEDGE_SPAN: f64 = 1e-5;

/// Gap kept between a rounded rectangle's corner radius and its smaller
/// half-size.
pub const ROUND_RADIUS_MARGIN: f64 = 0.1;

/// Three corners are collinear when the cross product of their edges is
/// below this fraction of the product of the edge lengths.
pub const COLLINEAR_RELATIVE_EPSILON: f64 = 1e-4;

/// Two planes are parallel when the cross product of their unit normals is
/// shorter than this.
pub const PLANE_PARALLEL_EPSILON: f64 = 1e-10;

// =============================================================================
// EXPORT CONSTANTS
// =============================================================================

/// Layer name written into DXF entities.
pub const DXF_LAYER: &str = "0";

/// Solid name used by STL export when none is given.
pub const DEFAULT_STL_NAME: &str = "csg";

// =============================================================================
// KERNEL CONFIGURATION
// =============================================================================

/// Immutable snapshot of the kernel tunables.
///
/// # Examples
/// ```
/// use config::constants::KernelConfig;
/// let config = KernelConfig::default();
/// assert!(config.epsilon > 0.0);
/// assert!(!config.debug_assertions);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConfig {
    /// Classification and merge tolerance.
    pub epsilon: f64,
    /// Default segment count for 2D circles and wedges.
    pub default_resolution_2d: u32,
    /// Default segment count for 3D primitives.
    pub default_resolution_3d: u32,
    /// Enables convexity assertions on polygon construction.
    pub debug_assertions: bool,
}

impl KernelConfig {
    /// Builds a configuration, rejecting non-positive tolerances and
    /// resolutions too small to form a polygon.
    ///
    /// # Examples
    /// ```
    /// use config::constants::KernelConfig;
    /// let cfg = KernelConfig::new(1.0e-6, 24, 12, true).expect("valid config");
    /// assert_eq!(cfg.default_resolution_2d, 24);
    /// ```
    pub fn new(
        epsilon: f64,
        default_resolution_2d: u32,
        default_resolution_3d: u32,
        debug_assertions: bool,
    ) -> Result<Self, ConfigError> {
        if epsilon <= 0.0 || !epsilon.is_finite() {
            return Err(ConfigError::InvalidEpsilon(epsilon));
        }
        if default_resolution_2d < MIN_RESOLUTION {
            return Err(ConfigError::InvalidResolution(default_resolution_2d));
        }
        if default_resolution_3d < MIN_RESOLUTION {
            return Err(ConfigError::InvalidResolution(default_resolution_3d));
        }
        Ok(Self {
            epsilon,
            default_resolution_2d,
            default_resolution_3d,
            debug_assertions,
        })
    }

    /// Returns a copy with convexity assertions switched on or off.
    pub fn with_debug_assertions(mut self, enabled: bool) -> Self {
        self.debug_assertions = enabled;
        self
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            default_resolution_2d: DEFAULT_RESOLUTION_2D,
            default_resolution_3d: DEFAULT_RESOLUTION_3D,
            debug_assertions: DEFAULT_DEBUG_ASSERTIONS,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when epsilon is zero, negative or not finite.
    InvalidEpsilon(f64),
    /// Raised when a resolution is too small to form a polygon.
    InvalidResolution(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidEpsilon(value) => {
                write!(f, "epsilon must be positive and finite: {value}")
            }
            ConfigError::InvalidResolution(value) => {
                write!(f, "resolution must be >= {MIN_RESOLUTION}: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests;
