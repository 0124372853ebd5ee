//! # Kernel Context
//!
//! Explicit state shared by every geometry operation: the tolerances and
//! resolutions in effect, the identity tag generator and the default surface
//! properties handed to new polygons.
//!
//! A context is single-threaded (`!Sync`); create one per thread.

use std::cell::Cell;
use std::fmt;

use config::constants::KernelConfig;

use crate::error::KernelResult;
use crate::geometry::SharedProperties;

// =============================================================================
// TAGS
// =============================================================================

/// Allocation-order identity of a vertex, side or plane.
///
/// Tags say nothing about position: two vertices at the same point can carry
/// different tags, and only canonicalization makes them share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(u64);

impl Tag {
    /// Raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonically increasing tag source.
#[derive(Debug)]
pub struct TagGenerator {
    next: Cell<u64>,
}

impl TagGenerator {
    /// Creates a generator whose first tag is 1.
    pub fn new() -> Self {
        Self { next: Cell::new(1) }
    }

    /// Returns a fresh tag.
    pub fn next_tag(&self) -> Tag {
        let value = self.next.get();
        self.next.set(value + 1);
        Tag(value)
    }
}

impl Default for TagGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Configuration and identity source passed to every kernel operation.
///
/// # Example
///
/// ```rust
/// use csg_kernel::Context;
///
/// let ctx = Context::default();
/// let a = ctx.next_tag();
/// let b = ctx.next_tag();
/// assert!(a < b);
/// assert_eq!(ctx.epsilon(), 1e-5);
/// ```
#[derive(Debug)]
pub struct Context {
    config: KernelConfig,
    tags: TagGenerator,
    default_shared: SharedProperties,
}

impl Context {
    /// Creates a context from an already validated configuration.
    pub fn new(config: KernelConfig) -> Self {
        Self {
            config,
            tags: TagGenerator::new(),
            default_shared: SharedProperties::default(),
        }
    }

    /// Validates the raw settings and creates a context from them.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Classification and merge tolerance
    /// * `resolution_2d` - Default segments for 2D arcs
    /// * `resolution_3d` - Default segments for 3D primitives
    /// * `debug_assertions` - Enables convexity checks on polygon construction
    pub fn with_settings(
        epsilon: f64,
        resolution_2d: u32,
        resolution_3d: u32,
        debug_assertions: bool,
    ) -> KernelResult<Self> {
        let config = KernelConfig::new(epsilon, resolution_2d, resolution_3d, debug_assertions)?;
        Ok(Self::new(config))
    }

    /// Active configuration.
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Classification tolerance.
    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    /// Whether convexity assertions are enabled.
    pub fn debug_assertions(&self) -> bool {
        self.config.debug_assertions
    }

    /// Default segment count for 2D arcs.
    pub fn default_resolution_2d(&self) -> u32 {
        self.config.default_resolution_2d
    }

    /// Default segment count for 3D primitives.
    pub fn default_resolution_3d(&self) -> u32 {
        self.config.default_resolution_3d
    }

    /// Allocates a fresh identity tag.
    pub fn next_tag(&self) -> Tag {
        self.tags.next_tag()
    }

    /// Surface properties given to polygons created without explicit ones.
    pub fn default_shared(&self) -> SharedProperties {
        self.default_shared.clone()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(KernelConfig::default())
    }
}
