//! # 2D Paths
//!
//! Ordered point sequences, open or closed. Consecutive points closer than
//! epsilon are collapsed on construction.

use serde::{Deserialize, Serialize};

use crate::cag::Cag;
use crate::context::Context;
use crate::error::{KernelError, KernelResult};
use crate::geometry::side::Side;
use crate::geometry::vertex::Vertex2;
use crate::math::{Matrix4x4, Vector2, Vector2Ext};

/// Polyline in the plane.
///
/// # Example
///
/// ```rust
/// use csg_kernel::{Context, Path2D, Vector2};
///
/// let ctx = Context::default();
/// let path = Path2D::new(
///     &ctx,
///     vec![Vector2::ZERO, Vector2::ZERO, Vector2::X, Vector2::Y],
///     true,
/// );
/// assert_eq!(path.points().len(), 3);
/// assert!(path.is_closed());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path2D {
    points: Vec<Vector2>,
    closed: bool,
}

impl Path2D {
    /// Builds a path, dropping every point within epsilon of the point before
    /// it. For a closed path the last point precedes the first.
    pub fn new(ctx: &Context, points: Vec<Vector2>, closed: bool) -> Self {
        let eps = ctx.epsilon();
        let mut prev = if closed { points.last().copied() } else { None };
        let mut kept = Vec::with_capacity(points.len());
        for point in points {
            let skip = prev.is_some_and(|p| point.distance(p) < eps);
            if !skip {
                kept.push(point);
            }
            prev = Some(point);
        }
        Self {
            points: kept,
            closed,
        }
    }

    /// Points of the path.
    pub fn points(&self) -> &[Vector2] {
        &self.points
    }

    /// Whether the last point connects back to the first.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Closed version of this path.
    pub fn close(&self, ctx: &Context) -> Path2D {
        Path2D::new(ctx, self.points.clone(), true)
    }

    /// Path extended by one point.
    ///
    /// # Errors
    ///
    /// The path is closed.
    pub fn append_point(&self, ctx: &Context, point: Vector2) -> KernelResult<Path2D> {
        self.append_points(ctx, &[point])
    }

    /// Path extended by several points.
    pub fn append_points(&self, ctx: &Context, points: &[Vector2]) -> KernelResult<Path2D> {
        if self.closed {
            return Err(KernelError::invalid_parameter(
                "path",
                "cannot append to a closed path",
            ));
        }
        let mut all = self.points.clone();
        all.extend_from_slice(points);
        Ok(Path2D::new(ctx, all, false))
    }

    /// Joins two open paths end to start.
    pub fn concat(&self, ctx: &Context, other: &Path2D) -> KernelResult<Path2D> {
        if self.closed || other.closed {
            return Err(KernelError::invalid_parameter(
                "path",
                "cannot concatenate closed paths",
            ));
        }
        let mut all = self.points.clone();
        all.extend_from_slice(&other.points);
        Ok(Path2D::new(ctx, all, false))
    }

    /// Transformed copy.
    pub fn transform(&self, ctx: &Context, matrix: &Matrix4x4) -> Path2D {
        let points = self.points.iter().map(|p| p.transform(matrix)).collect();
        Path2D::new(ctx, points, self.closed)
    }

    /// Signed area of the loop (shoelace), positive for counter-clockwise.
    ///
    /// An open path is measured as if it were closed.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        let sum: f64 = (0..n)
            .map(|i| self.points[i].cross(self.points[(i + 1) % n]))
            .sum();
        0.5 * sum
    }

    /// Whether the loop winds clockwise.
    pub fn is_clockwise(&self) -> bool {
        self.area() < 0.0
    }

    /// Area enclosed by a closed path.
    ///
    /// # Errors
    ///
    /// - The path is open
    /// - The loop is degenerate or crosses itself
    pub fn inner_to_cag(&self, ctx: &Context) -> KernelResult<Cag> {
        if !self.closed {
            return Err(KernelError::invalid_parameter(
                "path",
                "only closed paths enclose an area",
            ));
        }
        Cag::from_points(ctx, &self.points)
    }

    /// Band of half-width `radius` around the path. Open ends are rounded.
    pub fn expand_to_cag(&self, ctx: &Context, radius: f64, resolution: u32) -> KernelResult<Cag> {
        let n = self.points.len();
        let mut sides = Vec::with_capacity(n);
        let vertices: Vec<Vertex2> = self.points.iter().map(|p| Vertex2::new(ctx, *p)).collect();
        for pair in vertices.windows(2) {
            sides.push(Side::new(ctx, pair[0], pair[1]));
        }
        if self.closed && n > 2 {
            sides.push(Side::new(ctx, vertices[n - 1], vertices[0]));
        }
        Cag::from_sides(sides).expanded_shell(ctx, radius, resolution)
    }
}
