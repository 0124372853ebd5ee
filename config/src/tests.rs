//! # Tests for Config Constants
//!
//! Sanity checks on the relationships between the named thresholds.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_parallel_threshold_is_tighter_than_epsilon() {
    assert!(SELF_INTERSECT_PARALLEL_EPSILON < EPSILON);
}

#[test]
fn test_alpha_window_is_inside_unit_interval() {
    assert!(SELF_INTERSECT_ALPHA_MIN > 0.0);
    assert!(SELF_INTERSECT_ALPHA_MAX < 1.0);
    assert!(SELF_INTERSECT_ALPHA_MIN < SELF_INTERSECT_ALPHA_MAX);
}

// =============================================================================
// RESOLUTION TESTS
// =============================================================================

#[test]
fn test_default_resolutions() {
    assert_eq!(DEFAULT_RESOLUTION_2D, 32);
    assert_eq!(DEFAULT_RESOLUTION_3D, 12);
}

#[test]
fn test_shell_resolution_forms_polygon() {
    assert!(MIN_SHELL_RESOLUTION >= MIN_RESOLUTION);
}

// =============================================================================
// SHELL AND MERGE THRESHOLD TESTS
// =============================================================================

#[test]
fn test_wedge_thresholds_are_tiny_angles() {
    assert!(MIN_WEDGE_SPAN > 0.0 && MIN_WEDGE_SPAN < 1.0);
    assert!(FULL_CIRCLE_EPSILON > 0.0 && FULL_CIRCLE_EPSILON < 1.0);
}

#[test]
fn test_merge_thresholds_are_positive() {
    assert!(COLLINEAR_RELATIVE_EPSILON > 0.0 && COLLINEAR_RELATIVE_EPSILON < 1.0);
    assert!(PLANE_PARALLEL_EPSILON > 0.0 && PLANE_PARALLEL_EPSILON < EPSILON);
    assert!(ROUND_RADIUS_MARGIN > 0.0);
}
