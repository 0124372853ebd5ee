//! # Offset
//!
//! Band of constant radius around the boundary of an area, and the expand /
//! contract operations built on it.
//!
//! ## Algorithm
//!
//! 1. Every side longer than epsilon contributes a rectangle of half-width
//!    `radius` centered on the side
//! 2. Every corner contributes a circular wedge covering the outside angle
//!    between its two sides; corners with any other number of sides get a
//!    full circle
//! 3. The union of all pieces is the shell

use std::collections::HashMap;

use config::constants::{
    FULL_CIRCLE_EPSILON, MIN_SHELL_RESOLUTION, MIN_WEDGE_SPAN, ROUND_RADIUS_MARGIN,
};
use log::debug;

use super::Cag;
use crate::context::Context;
use crate::error::{KernelError, KernelResult};
use crate::math::{Vector2, Vector2Ext};

/// Sides meeting at one position, keyed by exact coordinates in first-seen
/// order.
#[derive(Debug, Default)]
struct CornerMap {
    index: HashMap<(u64, u64), usize>,
    corners: Vec<(Vector2, Vec<Vector2>)>,
}

impl CornerMap {
    /// Records that a side runs from `center` to `other_end`.
    fn add(&mut self, center: Vector2, other_end: Vector2) {
        let key = (center.x.to_bits(), center.y.to_bits());
        let corners = &mut self.corners;
        let slot = *self.index.entry(key).or_insert_with(|| {
            corners.push((center, Vec::new()));
            corners.len() - 1
        });
        self.corners[slot].1.push(other_end);
    }
}

impl Cag {
    /// Band of half-width `radius` around the boundary.
    ///
    /// Sides no longer than epsilon contribute neither a rectangle nor a
    /// corner.
    ///
    /// ## Parameters
    ///
    /// - `radius`: Band half-width, must be positive
    /// - `resolution`: Corners of a full circle; raised to at least 4
    ///
    /// # Errors
    ///
    /// Non-positive radius, or a failure while combining the pieces.
    pub fn expanded_shell(&self, ctx: &Context, radius: f64, resolution: u32) -> KernelResult<Cag> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(KernelError::invalid_parameter(
                "radius",
                format!("must be positive, got {radius}"),
            ));
        }
        let resolution = resolution.max(MIN_SHELL_RESOLUTION);
        let cag = self.canonicalized(ctx);
        let eps = ctx.epsilon();

        let mut pieces = Vec::new();
        let mut corners = CornerMap::default();
        for side in cag.sides() {
            let (p0, p1) = (side.vertex0().pos(), side.vertex1().pos());
            let direction = p1 - p0;
            let length = direction.length();
            if length <= eps {
                continue;
            }
            let normal = (direction / length).normal() * radius;
            let rectangle = [p1 + normal, p1 - normal, p0 - normal, p0 + normal];
            pieces.push(Cag::from_points(ctx, &rectangle)?);

            corners.add(p0, p1);
            corners.add(p1, p0);
        }

        for (center, ends) in &corners.corners {
            if let Some(wedge) = corner_piece(ctx, *center, ends, radius, resolution) {
                pieces.push(wedge);
            }
        }

        debug!(
            "expanded shell: {} sides -> {} pieces",
            cag.sides().len(),
            pieces.len()
        );
        Cag::new().union_all(ctx, &pieces)
    }

    /// Area grown outward by `radius`, with rounded convex corners.
    pub fn expand(&self, ctx: &Context, radius: f64, resolution: u32) -> KernelResult<Cag> {
        let shell = self.expanded_shell(ctx, radius, resolution)?;
        self.union(ctx, &shell)
    }

    /// Area shrunk inward by `radius`, with rounded concave corners.
    pub fn contract(&self, ctx: &Context, radius: f64, resolution: u32) -> KernelResult<Cag> {
        let shell = self.expanded_shell(ctx, radius, resolution)?;
        self.subtract(ctx, &shell)
    }

    /// Rectangle spanning `center ± radius` with corners rounded by
    /// `round_radius`.
    ///
    /// The round radius is clamped to `[0, min(radius) - 0.1]`; the inner
    /// rectangle shrunk by it is expanded back out.
    pub fn rounded_rectangle(
        ctx: &Context,
        center: Vector2,
        radius: Vector2,
        round_radius: f64,
        resolution: Option<u32>,
    ) -> KernelResult<Cag> {
        let max_round_radius = radius.min_element() - ROUND_RADIUS_MARGIN;
        let round_radius = round_radius.min(max_round_radius).max(0.0);
        let inner = Cag::rectangle(ctx, center, radius - Vector2::splat(round_radius))?;
        if round_radius > 0.0 {
            let resolution = resolution.unwrap_or(ctx.default_resolution_2d());
            inner.expand(ctx, round_radius, resolution)
        } else {
            Ok(inner)
        }
    }
}

/// Circle or circular wedge covering the outside of the corner at `center`.
///
/// With exactly two sides the wedge spans the exterior angle between their
/// outward normals; otherwise a full circle is produced.
fn corner_piece(
    ctx: &Context,
    center: Vector2,
    ends: &[Vector2],
    radius: f64,
    resolution: u32,
) -> Option<Cag> {
    let (mut angle1, mut angle2) = match ends {
        [end1, end2] => {
            let mut a1 = (*end1 - center).angle_degrees();
            let mut a2 = (*end2 - center).angle_degrees();
            if a2 < a1 {
                a2 += 360.0;
            }
            if a2 >= a1 + 360.0 {
                a2 -= 360.0;
            }
            if a2 < a1 + 180.0 {
                (a1, a2) = (a2, a1 + 360.0);
            }
            (a1 + 90.0, a2 - 90.0)
        }
        _ => (0.0, 360.0),
    };

    let full_circle = angle2 > angle1 + 360.0 - FULL_CIRCLE_EPSILON;
    if full_circle {
        (angle1, angle2) = (0.0, 360.0);
    }
    let span = angle2 - angle1;
    if span <= MIN_WEDGE_SPAN {
        return None;
    }

    let num_steps = ((f64::from(resolution) * span / 360.0).round() as u32).max(1);
    let mut points = Vec::with_capacity(num_steps as usize + 2);
    if !full_circle {
        points.push(center);
    }
    let first_step = if full_circle { 1 } else { 0 };
    for step in first_step..=num_steps {
        let angle = if step == num_steps {
            angle2
        } else {
            angle1 + f64::from(step) / f64::from(num_steps) * span
        };
        points.push(center + Vector2::from_angle_degrees(angle) * radius);
    }
    Some(Cag::from_points_no_check(ctx, &points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn v(x: f64, y: f64) -> Vector2 {
        Vector2::new(x, y)
    }

    fn unit_polygon_area(n: u32) -> f64 {
        0.5 * f64::from(n) * (std::f64::consts::TAU / f64::from(n)).sin()
    }

    fn assert_bounds(cag: &Cag, min: Vector2, max: Vector2) {
        let (lo, hi) = cag.bounding_box();
        assert_relative_eq!(lo.x, min.x, epsilon = 1e-9);
        assert_relative_eq!(lo.y, min.y, epsilon = 1e-9);
        assert_relative_eq!(hi.x, max.x, epsilon = 1e-9);
        assert_relative_eq!(hi.y, max.y, epsilon = 1e-9);
    }

    #[test]
    fn test_convex_corner_wedge() {
        let ctx = Context::default();
        // Sides run along +x and +y, so the exterior is the third quadrant
        let wedge = corner_piece(&ctx, Vector2::ZERO, &[v(1.0, 0.0), v(0.0, 1.0)], 1.0, 32).unwrap();
        // Center plus 8 steps of 11.25 degrees
        assert_eq!(wedge.sides().len(), 10);
        assert_relative_eq!(wedge.area(), unit_polygon_area(32) / 4.0, epsilon = 1e-9);
        assert_bounds(&wedge, v(-1.0, -1.0), Vector2::ZERO);
    }

    #[test]
    fn test_wedge_ignores_end_order() {
        let ctx = Context::default();
        let a = corner_piece(&ctx, Vector2::ZERO, &[v(1.0, 0.0), v(0.0, 1.0)], 1.0, 32).unwrap();
        let b = corner_piece(&ctx, Vector2::ZERO, &[v(0.0, 1.0), v(1.0, 0.0)], 1.0, 32).unwrap();
        assert_eq!(a.sides().len(), b.sides().len());
        assert_relative_eq!(a.area(), b.area(), epsilon = 1e-9);
        assert_eq!(a.bounding_box(), b.bounding_box());
    }

    #[test]
    fn test_concave_corner_wedge() {
        let ctx = Context::default();
        let wedge =
            corner_piece(&ctx, Vector2::ZERO, &[v(-1.0, 0.0), v(0.0, -1.0)], 1.0, 32).unwrap();
        assert_eq!(wedge.sides().len(), 10);
        assert_relative_eq!(wedge.area(), unit_polygon_area(32) / 4.0, epsilon = 1e-9);
        assert_bounds(&wedge, Vector2::ZERO, v(1.0, 1.0));
    }

    #[test]
    fn test_wedge_scales_with_radius_and_center() {
        let ctx = Context::default();
        let center = v(3.0, 4.0);
        let ends = [center + v(1.0, 0.0), center + v(0.0, 1.0)];
        let wedge = corner_piece(&ctx, center, &ends, 2.0, 32).unwrap();
        assert_relative_eq!(wedge.area(), unit_polygon_area(32), epsilon = 1e-9);
        assert_bounds(&wedge, v(1.0, 2.0), center);
    }

    #[test]
    fn test_straight_corner_has_no_wedge() {
        let ctx = Context::default();
        let piece = corner_piece(&ctx, Vector2::ZERO, &[v(-1.0, 0.0), v(1.0, 0.0)], 1.0, 32);
        assert!(piece.is_none());
    }

    #[test]
    fn test_branch_corner_is_full_circle() {
        let ctx = Context::default();
        let ends = [v(1.0, 0.0), v(0.0, 1.0), v(-1.0, 0.0)];
        let circle = corner_piece(&ctx, Vector2::ZERO, &ends, 1.0, 16).unwrap();
        assert_eq!(circle.sides().len(), 16);
        assert_relative_eq!(circle.area(), unit_polygon_area(16), epsilon = 1e-9);

        let four = [v(1.0, 0.0), v(0.0, 1.0), v(-1.0, 0.0), v(0.0, -1.0)];
        let circle = corner_piece(&ctx, Vector2::ZERO, &four, 1.0, 16).unwrap();
        assert_eq!(circle.sides().len(), 16);
    }

    #[test]
    fn test_short_sides_are_skipped() {
        let ctx = Context::default();
        let sliver = Cag::from_points_no_check(
            &ctx,
            &[v(0.0, 0.0), v(1e-7, 0.0), v(1e-7, 1e-7), v(0.0, 1e-7)],
        );
        let shell = sliver.expanded_shell(&ctx, 1.0, 16).unwrap();
        assert!(shell.sides().is_empty());
    }
}
