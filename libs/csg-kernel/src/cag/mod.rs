//! # Areas (CAG)
//!
//! A 2D area is a set of directed sides forming closed loops. Outer
//! boundaries run counter-clockwise and holes clockwise, so the area lies to
//! the left of every side.
//!
//! ## Modules
//!
//! - `fake_csg`: boolean operations through a lifted wall solid
//! - `offset`: shell, expand and contract
//! - `outline`: recovery of closed paths from the side set
//! - `intersect`: self-intersection test
//!
//! ## Example
//!
//! ```rust
//! use csg_kernel::{Cag, Context, Vector2};
//!
//! let ctx = Context::default();
//! let square = Cag::rectangle(&ctx, Vector2::ZERO, Vector2::splat(2.0)).unwrap();
//! assert_eq!(square.area(), 16.0);
//! assert_eq!(square.sides().len(), 4);
//! ```

mod fake_csg;
mod intersect;
mod offset;
mod outline;


use std::collections::HashMap;
use std::f64::consts::TAU;

use config::constants::{AREA_EPSILON, MIN_RESOLUTION};

use crate::context::{Context, Tag};
use crate::error::{KernelError, KernelResult};
use crate::fuzzy::FuzzyFactory;
use crate::geometry::side::Side;
use crate::geometry::vertex::Vertex2;
use crate::math::{self, Matrix4x4, Matrix4x4Ext, Vector2, Vector2Ext, Vector3};

pub use intersect::lines_intersect;

/// A 2D area bounded by directed sides.
#[derive(Debug, Clone, Default)]
pub struct Cag {
    sides: Vec<Side>,
    is_canonicalized: bool,
}

impl Cag {
    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    /// Empty area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Area bounded by `sides`, taken as given.
    pub fn from_sides(sides: Vec<Side>) -> Self {
        Self {
            sides,
            is_canonicalized: false,
        }
    }

    /// Area enclosed by the polygon through `points`.
    ///
    /// Clockwise input is flipped so the result always has positive area.
    ///
    /// # Errors
    ///
    /// - Fewer than three points
    /// - The loop crosses itself
    /// - The enclosed area is (almost) zero
    pub fn from_points(ctx: &Context, points: &[Vector2]) -> KernelResult<Cag> {
        if points.len() < 3 {
            return Err(KernelError::TooFewPoints {
                count: points.len(),
                min: 3,
            });
        }

        let cag = Self::from_points_no_check(ctx, points);
        if cag.is_self_intersecting() {
            return Err(KernelError::self_intersecting(format!(
                "polygon through {} points crosses itself",
                points.len()
            )));
        }
        let area = cag.area();
        if area.abs() < AREA_EPSILON {
            return Err(KernelError::DegenerateArea { area });
        }
        let cag = if area < 0.0 { cag.flipped(ctx) } else { cag };
        Ok(cag.canonicalized(ctx))
    }

    /// Area through `points` without validation, orientation or clean-up.
    ///
    /// Consecutive sides share their common vertex; the last point connects
    /// back to the first.
    pub fn from_points_no_check(ctx: &Context, points: &[Vector2]) -> Cag {
        let vertices: Vec<Vertex2> = points.iter().map(|p| Vertex2::new(ctx, *p)).collect();
        let n = vertices.len();
        let sides = (0..n)
            .map(|i| Side::new(ctx, vertices[(i + n - 1) % n], vertices[i]))
            .collect();
        Self::from_sides(sides)
    }

    /// Regular polygon approximating a circle.
    ///
    /// ## Parameters
    ///
    /// - `center`: Circle center
    /// - `radius`: Circle radius, must be positive
    /// - `resolution`: Number of corners; the context default when `None`
    pub fn circle(
        ctx: &Context,
        center: Vector2,
        radius: f64,
        resolution: Option<u32>,
    ) -> KernelResult<Cag> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(KernelError::invalid_parameter(
                "radius",
                format!("must be positive, got {radius}"),
            ));
        }
        let resolution = resolution.unwrap_or(ctx.default_resolution_2d());
        if resolution < MIN_RESOLUTION {
            return Err(KernelError::invalid_parameter(
                "resolution",
                format!("must be at least {MIN_RESOLUTION}, got {resolution}"),
            ));
        }

        let points: Vec<Vector2> = (0..resolution)
            .map(|i| {
                let radians = TAU * f64::from(i) / f64::from(resolution);
                center + Vector2::from_angle(radians) * radius
            })
            .collect();
        Self::from_points(ctx, &points)
    }

    /// Axis-aligned rectangle spanning `center ± radius`.
    pub fn rectangle(ctx: &Context, center: Vector2, radius: Vector2) -> KernelResult<Cag> {
        let points = [
            center - radius,
            Vector2::new(center.x + radius.x, center.y - radius.y),
            center + radius,
            Vector2::new(center.x - radius.x, center.y + radius.y),
        ];
        Self::from_points(ctx, &points)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Boundary sides.
    pub fn sides(&self) -> &[Side] {
        &self.sides
    }

    /// Whether the area has no sides.
    pub fn is_empty(&self) -> bool {
        self.sides.is_empty()
    }

    /// Whether the sides are known to be canonical.
    pub fn is_canonical(&self) -> bool {
        self.is_canonicalized
    }

    /// Signed enclosed area; positive for counter-clockwise boundaries.
    pub fn area(&self) -> f64 {
        0.5 * self
            .sides
            .iter()
            .map(|s| s.vertex0().pos().cross(s.vertex1().pos()))
            .sum::<f64>()
    }

    /// Axis-aligned bounds as `(min, max)`; both zero for an empty area.
    pub fn bounding_box(&self) -> (Vector2, Vector2) {
        let Some(first) = self.sides.first() else {
            return (Vector2::ZERO, Vector2::ZERO);
        };
        let start = first.vertex0().pos();
        self.sides.iter().fold((start, start), |(min, max), side| {
            let (a, b) = (side.vertex0().pos(), side.vertex1().pos());
            (min.min(a).min(b), max.max(a).max(b))
        })
    }

    /// Validates the boundary.
    ///
    /// ## Checks
    ///
    /// - No two sides cross
    /// - Every position has as many sides leaving as arriving
    /// - The area is positive
    ///
    /// # Errors
    ///
    /// [`KernelError::ValidationFailed`] listing every failed check.
    pub fn check(&self) -> KernelResult<()> {
        let mut errors = Vec::new();
        if self.is_self_intersecting() {
            errors.push("self intersects".to_string());
        }

        let mut degree: HashMap<(u64, u64), (Vector2, i64)> = HashMap::new();
        for side in &self.sides {
            let (from, to) = (side.vertex0().pos(), side.vertex1().pos());
            degree.entry(position_key(from)).or_insert((from, 0)).1 += 1;
            degree.entry(position_key(to)).or_insert((to, 0)).1 -= 1;
        }
        let mut unbalanced: Vec<(Vector2, i64)> =
            degree.into_values().filter(|(_, d)| *d != 0).collect();
        unbalanced.sort_by(|a, b| a.0.x.total_cmp(&b.0.x).then(a.0.y.total_cmp(&b.0.y)));
        errors.extend(
            unbalanced
                .into_iter()
                .map(|(p, d)| format!("unbalanced sides ({d:+}) at point {p}")),
        );

        let area = self.area();
        if area < AREA_EPSILON * AREA_EPSILON {
            errors.push(format!("area is {area}"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(KernelError::ValidationFailed {
                message: errors.join("; "),
            })
        }
    }

    // =========================================================================
    // TRANSFORMS
    // =========================================================================

    /// Same area with every side reversed, i.e. the complement's boundary.
    pub fn flipped(&self, ctx: &Context) -> Cag {
        let mut sides: Vec<Side> = self.sides.iter().map(|s| s.flipped(ctx)).collect();
        sides.reverse();
        Cag::from_sides(sides)
    }

    /// Transformed copy.
    ///
    /// Vertices shared between sides stay shared. A mirroring matrix flips
    /// the result so the area stays positive.
    pub fn transform(&self, ctx: &Context, matrix: &Matrix4x4) -> Cag {
        let mut vertex_map: HashMap<Tag, Vertex2> = HashMap::new();
        let mut transformed = |v: Vertex2| {
            *vertex_map
                .entry(v.tag())
                .or_insert_with(|| v.transform(ctx, matrix))
        };
        let sides = self
            .sides
            .iter()
            .map(|s| {
                let v0 = transformed(s.vertex0());
                let v1 = transformed(s.vertex1());
                Side::new(ctx, v0, v1)
            })
            .collect();
        let result = Cag::from_sides(sides);
        if matrix.is_mirroring() {
            result.flipped(ctx)
        } else {
            result
        }
    }

    /// Translated copy.
    pub fn translate(&self, ctx: &Context, offset: Vector2) -> Cag {
        self.transform(ctx, &math::translation(offset.to_vector3(0.0)))
    }

    /// Scaled copy; a negative factor mirrors.
    pub fn scale(&self, ctx: &Context, factors: Vector2) -> Cag {
        self.transform(ctx, &math::scaling(Vector3::new(factors.x, factors.y, 1.0)))
    }

    /// Copy rotated counter-clockwise about the origin by `degrees`.
    pub fn rotate_z(&self, ctx: &Context, degrees: f64) -> Cag {
        self.transform(ctx, &math::rotation_z(degrees))
    }

    /// Mirror image across the Y axis (x → −x).
    pub fn mirrored_x(&self, ctx: &Context) -> Cag {
        self.scale(ctx, Vector2::new(-1.0, 1.0))
    }

    /// Mirror image across the X axis (y → −y).
    pub fn mirrored_y(&self, ctx: &Context) -> Cag {
        self.scale(ctx, Vector2::new(1.0, -1.0))
    }

    /// Copy moved so its bounding box is centered on the origin along the
    /// selected axes (`[x, y]`).
    pub fn center(&self, ctx: &Context, axes: [bool; 2]) -> Cag {
        let (min, max) = self.bounding_box();
        let middle = (min + max) * 0.5;
        let offset = Vector2::new(
            if axes[0] { -middle.x } else { 0.0 },
            if axes[1] { -middle.y } else { 0.0 },
        );
        self.translate(ctx, offset)
    }

    // =========================================================================
    // CANONICALIZATION
    // =========================================================================

    /// Copy with near-coincident vertices shared, zero-length sides dropped
    /// and pairs of exactly opposite sides cancelled.
    pub fn canonicalized(&self, ctx: &Context) -> Cag {
        if self.is_canonicalized {
            return self.clone();
        }

        let eps = ctx.epsilon();
        let mut vertices: FuzzyFactory<Vertex2, 2> = FuzzyFactory::new(eps);
        let mut canonical =
            |v: Vertex2| vertices.lookup_or_create(v.pos().to_array(), |_| v);

        // Surviving sides in order; cancelled slots become None
        let mut slots: Vec<Option<Side>> = Vec::with_capacity(self.sides.len());
        let mut open: HashMap<(Tag, Tag), Vec<usize>> = HashMap::new();
        for side in &self.sides {
            let v0 = canonical(side.vertex0());
            let v1 = canonical(side.vertex1());
            let side = Side::new(ctx, v0, v1);
            if side.length() <= eps {
                continue;
            }

            let reverse = (v1.tag(), v0.tag());
            if let Some(slot) = open.get_mut(&reverse).and_then(Vec::pop) {
                slots[slot] = None;
                continue;
            }
            open.entry((v0.tag(), v1.tag())).or_default().push(slots.len());
            slots.push(Some(side));
        }

        Cag {
            sides: slots.into_iter().flatten().collect(),
            is_canonicalized: true,
        }
    }
}

/// Exact identity of a position, usable as a map key.
fn position_key(p: Vector2) -> (u64, u64) {
    (p.x.to_bits(), p.y.to_bits())
}
