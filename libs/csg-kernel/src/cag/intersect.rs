//! # Self-Intersection
//!
//! Pairwise segment crossing test over all sides, O(n²).

use config::constants::{
    FOLD_BACK_EPSILON, SELF_INTERSECT_ALPHA_MAX, SELF_INTERSECT_ALPHA_MIN,
    SELF_INTERSECT_PARALLEL_EPSILON,
};

use super::Cag;
use crate::math::{Vector2, Vector2Ext};

impl Cag {
    /// Whether any two sides cross, or two consecutive sides fold back onto
    /// each other.
    pub fn is_self_intersecting(&self) -> bool {
        self.sides.iter().enumerate().any(|(i, a)| {
            self.sides[i + 1..].iter().any(|b| {
                lines_intersect(
                    a.vertex0().pos(),
                    a.vertex1().pos(),
                    b.vertex0().pos(),
                    b.vertex1().pos(),
                )
            })
        })
    }
}

/// Whether segments `p0_start → p0_end` and `p1_start → p1_end` intersect.
///
/// ## Rules
///
/// - Segments joined end to start intersect only when they fold back, i.e.
///   the sum of their unit directions (almost) vanishes
/// - Parallel segments never intersect
/// - Otherwise the crossing must lie strictly inside both segments
pub fn lines_intersect(p0_start: Vector2, p0_end: Vector2, p1_start: Vector2, p1_end: Vector2) -> bool {
    let d0 = p0_end - p0_start;
    let d1 = p1_end - p1_start;

    if p0_end == p1_start || p1_end == p0_start {
        let folded = d1.normalize_or_zero() + d0.normalize_or_zero();
        return folded.length() < FOLD_BACK_EPSILON;
    }

    let det = d0.cross(d1);
    if det.abs() < SELF_INTERSECT_PARALLEL_EPSILON {
        return false;
    }

    // p0_start + alpha0 * d0 == p1_start + alpha1 * d1
    let offset = p1_start - p0_start;
    let alpha0 = offset.cross(d1) / det;
    let alpha1 = offset.cross(d0) / det;

    let inside = |alpha: f64| alpha > SELF_INTERSECT_ALPHA_MIN && alpha < SELF_INTERSECT_ALPHA_MAX;
    inside(alpha0) && inside(alpha1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vector2 {
        Vector2::new(x, y)
    }

    #[test]
    fn test_crossing_segments() {
        assert!(lines_intersect(v(0.0, 0.0), v(2.0, 2.0), v(0.0, 2.0), v(2.0, 0.0)));
    }

    #[test]
    fn test_disjoint_segments() {
        assert!(!lines_intersect(v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0), v(1.0, 1.0)));
        assert!(!lines_intersect(v(0.0, 0.0), v(1.0, 1.0), v(3.0, 0.0), v(2.0, 5.0)));
    }

    #[test]
    fn test_touching_at_endpoint_is_not_crossing() {
        // T-junction: the crossing sits at the end of the first segment
        assert!(!lines_intersect(v(0.0, 0.0), v(1.0, 0.0), v(1.0, -1.0), v(1.0, 1.0)));
    }

    #[test]
    fn test_consecutive_sides() {
        assert!(!lines_intersect(v(0.0, 0.0), v(1.0, 0.0), v(1.0, 0.0), v(1.0, 1.0)));
        // Straight back along itself
        assert!(lines_intersect(v(0.0, 0.0), v(1.0, 0.0), v(1.0, 0.0), v(0.5, 0.0)));
    }

    #[test]
    fn test_overlapping_collinear_is_parallel() {
        assert!(!lines_intersect(v(0.0, 0.0), v(2.0, 0.0), v(1.0, 0.0), v(3.0, 0.0)));
    }
}
