//! # Config Crate
//!
//! Centralized tolerances and defaults for the polygonal CSG/CAG kernel.
//! Every numeric threshold the kernel relies on is named here so that the
//! geometry code never carries bare literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{KernelConfig, EPSILON, DEFAULT_RESOLUTION_2D};
//!
//! // Classification tolerance for plane tests
//! let distance: f64 = 4e-6;
//! assert!(distance.abs() < EPSILON);
//!
//! // Validated configuration snapshot
//! let cfg = KernelConfig::default();
//! assert_eq!(cfg.default_resolution_2d, DEFAULT_RESOLUTION_2D);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Explicit State**: Tunables travel in a `KernelConfig` value, never in globals
//! - **Validated**: Invalid tolerances and resolutions are rejected at construction

pub mod constants;

#[cfg(test)]
mod tests;
