//! # Plane
//!
//! Oriented half-space with point classification and the convex polygon
//! clipping primitive every 3D boolean operation is built from.

use config::constants::PLANE_PARALLEL_EPSILON;
use log::trace;

use crate::context::{Context, Tag};
use crate::error::{KernelError, KernelResult};
use crate::geometry::polygon::Polygon;
use crate::geometry::vertex::Vertex;
use crate::math::{self, Matrix4x4, Matrix4x4Ext, Vector3, Vector3Ext};

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classification of a point relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Point is in front of plane (positive side).
    Front,
    /// Point is behind plane (negative side).
    Back,
    /// Point is on the plane.
    Coplanar,
}

/// Outcome of splitting a polygon by a plane.
#[derive(Debug, Clone)]
pub enum SplitResult {
    /// Polygon lies in the plane and faces the same way.
    CoplanarFront,
    /// Polygon lies in the plane and faces the opposite way.
    CoplanarBack,
    /// Polygon lies entirely in front of the plane.
    Front,
    /// Polygon lies entirely behind the plane.
    Back,
    /// Polygon straddles the plane. Either piece may vanish after
    /// near-duplicate vertices are removed.
    Spanning {
        front: Option<Polygon>,
        back: Option<Polygon>,
    },
}

// =============================================================================
// PLANE
// =============================================================================

/// A plane `normal · p = w` with unit normal.
///
/// Points with `normal · p > w` are in front.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    normal: Vector3,
    w: f64,
    tag: Tag,
}

impl Plane {
    /// Create plane from normal and offset.
    ///
    /// A non-unit normal is normalized and `w` rescaled so the same plane is
    /// described.
    pub fn new(ctx: &Context, normal: Vector3, w: f64) -> KernelResult<Self> {
        let length = normal.length();
        if length <= 0.0 || !length.is_finite() {
            return Err(KernelError::degenerate_plane(format!(
                "normal {normal} has no direction"
            )));
        }
        Ok(Self {
            normal: normal / length,
            w: w / length,
            tag: ctx.next_tag(),
        })
    }

    /// Create plane from three points.
    ///
    /// Points should be in counter-clockwise order when viewed from front.
    pub fn from_points(ctx: &Context, a: Vector3, b: Vector3, c: Vector3) -> KernelResult<Self> {
        let normal = (b - a).cross(c - a).try_normalize().ok_or_else(|| {
            KernelError::degenerate_plane(format!("points {a}, {b}, {c} are collinear"))
        })?;
        Ok(Self {
            normal,
            w: normal.dot(a),
            tag: ctx.next_tag(),
        })
    }

    /// Create plane through `point` with the given normal.
    pub fn from_normal_and_point(ctx: &Context, normal: Vector3, point: Vector3) -> KernelResult<Self> {
        let normal = normal
            .try_normalize()
            .ok_or_else(|| KernelError::degenerate_plane("normal has no direction"))?;
        Ok(Self {
            normal,
            w: normal.dot(point),
            tag: ctx.next_tag(),
        })
    }

    /// Some plane through the three points, even when they coincide or are
    /// collinear.
    pub fn any_plane_from_points(ctx: &Context, a: Vector3, b: Vector3, c: Vector3) -> Self {
        let eps = ctx.epsilon();
        let mut v1 = b - a;
        let mut v2 = c - a;
        if v1.length() < eps {
            v1 = v2.random_non_parallel_vector();
        }
        if v2.length() < eps {
            v2 = v1.random_non_parallel_vector();
        }
        let mut normal = v1.cross(v2);
        if normal.length() < eps {
            v2 = v1.random_non_parallel_vector();
            normal = v1.cross(v2);
        }
        let normal = normal.try_normalize().unwrap_or(Vector3::Z);
        Self {
            normal,
            w: normal.dot(a),
            tag: ctx.next_tag(),
        }
    }

    /// Unit normal.
    pub fn normal(&self) -> Vector3 {
        self.normal
    }

    /// Offset along the normal.
    pub fn w(&self) -> f64 {
        self.w
    }

    /// Identity of the plane.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Same plane facing the other way.
    pub fn flipped(&self, ctx: &Context) -> Plane {
        Plane {
            normal: -self.normal,
            w: -self.w,
            tag: ctx.next_tag(),
        }
    }

    /// Exact component-wise equality (identity is ignored).
    pub fn equals(&self, other: &Plane) -> bool {
        self.normal == other.normal && self.w == other.w
    }

    /// Signed distance from point to plane.
    ///
    /// Positive = front, negative = back, zero = on plane.
    pub fn signed_distance(&self, point: Vector3) -> f64 {
        self.normal.dot(point) - self.w
    }

    /// Classify a point relative to this plane.
    pub fn classify_point(&self, point: Vector3, eps: f64) -> Classification {
        let dist = self.signed_distance(point);
        if dist > eps {
            Classification::Front
        } else if dist < -eps {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }

    /// Point where the segment `p1 → p2` meets the plane.
    ///
    /// The parameter is clamped to the segment; a parallel segment yields `p1`.
    pub fn split_line_between_points(&self, p1: Vector3, p2: Vector3) -> Vector3 {
        let direction = p2 - p1;
        let mut lambda = (self.w - self.normal.dot(p1)) / self.normal.dot(direction);
        if lambda.is_nan() {
            lambda = 0.0;
        }
        p1 + direction * lambda.clamp(0.0, 1.0)
    }

    /// Intersection with the infinite line through `point` along `direction`.
    ///
    /// Returns `None` when the line is parallel to the plane.
    pub fn intersect_with_line(&self, point: Vector3, direction: Vector3) -> Option<Vector3> {
        let denom = self.normal.dot(direction);
        if denom.abs() < f64::EPSILON {
            return None;
        }
        let lambda = (self.w - self.normal.dot(point)) / denom;
        Some(point + direction * lambda)
    }

    /// Line shared with another plane, as `(point, unit direction)`.
    ///
    /// Returns `None` for parallel planes.
    pub fn intersect_with_plane(&self, other: &Plane) -> Option<(Vector3, Vector3)> {
        let direction = self.normal.cross(other.normal);
        let length = direction.length();
        if length < PLANE_PARALLEL_EPSILON {
            return None;
        }
        let direction = direction / length;

        // Pin the coordinate the line travels along most to zero and solve the
        // remaining 2x2 system.
        let n1 = self.normal;
        let n2 = other.normal;
        let abs = direction.abs();
        let origin = if abs.x >= abs.y && abs.x >= abs.z {
            let (y, z) = solve_2x2(n1.y, n1.z, n2.y, n2.z, self.w, other.w)?;
            Vector3::new(0.0, y, z)
        } else if abs.y >= abs.x && abs.y >= abs.z {
            let (x, z) = solve_2x2(n1.x, n1.z, n2.x, n2.z, self.w, other.w)?;
            Vector3::new(x, 0.0, z)
        } else {
            let (x, y) = solve_2x2(n1.x, n1.y, n2.x, n2.y, self.w, other.w)?;
            Vector3::new(x, y, 0.0)
        };
        Some((origin, direction))
    }

    /// Reflection of `point` across the plane.
    pub fn mirror_point(&self, point: Vector3) -> Vector3 {
        point - self.normal * (2.0 * self.signed_distance(point))
    }

    /// Matrix reflecting space across this plane.
    pub fn mirroring_matrix(&self) -> Matrix4x4 {
        math::mirroring(self.normal, self.w)
    }

    /// Transformed plane.
    ///
    /// Three points of the plane are transformed and the plane rebuilt from
    /// them; a mirroring transform flips the result to keep orientation.
    pub fn transform(&self, ctx: &Context, matrix: &Matrix4x4) -> KernelResult<Plane> {
        let r = self.normal.random_non_parallel_vector();
        let u = self.normal.cross(r);
        let v = self.normal.cross(u);
        let p1 = self.normal * self.w;
        let p2 = p1 + u;
        let p3 = p1 + v;
        let plane = Plane::from_points(
            ctx,
            matrix.transform_point(p1),
            matrix.transform_point(p2),
            matrix.transform_point(p3),
        )?;
        Ok(if matrix.is_mirroring() {
            plane.flipped(ctx)
        } else {
            plane
        })
    }

    // =========================================================================
    // POLYGON SPLITTING
    // =========================================================================

    /// Split a convex polygon by this plane.
    ///
    /// ## Algorithm
    ///
    /// 1. Classify every vertex as front, back or coplanar (within epsilon)
    /// 2. No vertex strictly on either side: coplanar, oriented by the normals
    /// 3. Nothing behind: front. Nothing in front: back
    /// 4. Otherwise walk the loop, emitting coplanar vertices to both pieces
    ///    and a crossing vertex wherever an edge goes from front to back or
    ///    back to front
    ///
    /// Pieces keep the polygon's plane and surface properties.
    pub fn split_polygon(&self, ctx: &Context, polygon: &Polygon) -> SplitResult {
        let eps = ctx.epsilon();
        let types: Vec<Classification> = polygon
            .vertices()
            .iter()
            .map(|v| self.classify_point(v.pos(), eps))
            .collect();
        let has_front = types.contains(&Classification::Front);
        let has_back = types.contains(&Classification::Back);

        if !has_front && !has_back {
            return if self.normal.dot(polygon.plane().normal()) >= 0.0 {
                SplitResult::CoplanarFront
            } else {
                SplitResult::CoplanarBack
            };
        }
        if !has_back {
            return SplitResult::Front;
        }
        if !has_front {
            return SplitResult::Back;
        }

        let vertices = polygon.vertices();
        let n = vertices.len();
        let mut front_verts = Vec::with_capacity(n + 1);
        let mut back_verts = Vec::with_capacity(n + 1);

        for i in 0..n {
            let j = (i + 1) % n;
            let vi = &vertices[i];
            let vj = &vertices[j];
            let ti = types[i];
            let tj = types[j];

            if ti != Classification::Back {
                front_verts.push(*vi);
            }
            if ti != Classification::Front {
                back_verts.push(*vi);
            }

            let crosses = matches!(
                (ti, tj),
                (Classification::Front, Classification::Back)
                    | (Classification::Back, Classification::Front)
            );
            if crosses {
                let point = self.split_line_between_points(vi.pos(), vj.pos());
                let crossing = Vertex::new(ctx, point);
                front_verts.push(crossing);
                back_verts.push(crossing);
            }
        }

        let front = dedup_ring(front_verts, eps * eps)
            .map(|verts| Polygon::from_parts(verts, *polygon.plane(), polygon.shared().clone()));
        let back = dedup_ring(back_verts, eps * eps)
            .map(|verts| Polygon::from_parts(verts, *polygon.plane(), polygon.shared().clone()));
        trace!(
            "split {}-gon into {:?}/{:?} vertices",
            n,
            front.as_ref().map(|p| p.vertices().len()),
            back.as_ref().map(|p| p.vertices().len())
        );
        SplitResult::Spanning { front, back }
    }
}

/// Drops vertices within `eps_squared` of their predecessor, wrapping
/// around the loop. Returns `None` when fewer than three remain.
fn dedup_ring(vertices: Vec<Vertex>, eps_squared: f64) -> Option<Vec<Vertex>> {
    if vertices.len() < 3 {
        return None;
    }
    let mut kept: Vec<Vertex> = Vec::with_capacity(vertices.len());
    let mut prev = vertices[vertices.len() - 1].pos();
    for vertex in vertices {
        if vertex.pos().distance_squared(prev) >= eps_squared {
            kept.push(vertex);
        }
        prev = vertex.pos();
    }
    (kept.len() >= 3).then_some(kept)
}

/// Solves `[a b; c d] · (x, y) = (u, v)`.
fn solve_2x2(a: f64, b: f64, c: f64, d: f64, u: f64, v: f64) -> Option<(f64, f64)> {
    let det = a * d - b * c;
    if det == 0.0 {
        return None;
    }
    let inv = 1.0 / det;
    Some(((u * d - b * v) * inv, (a * v - u * c) * inv))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{rotation_z, scaling, translation};
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-5;

    fn z_plane(ctx: &Context, w: f64) -> Plane {
        Plane::new(ctx, Vector3::Z, w).unwrap()
    }

    fn polygon(ctx: &Context, points: &[[f64; 3]]) -> Polygon {
        let points: Vec<Vector3> = points.iter().map(|p| Vector3::from_array(*p)).collect();
        Polygon::from_points(ctx, &points).unwrap()
    }

    #[test]
    fn test_plane_from_points() {
        let ctx = Context::default();
        let plane = Plane::from_points(&ctx, Vector3::ZERO, Vector3::X, Vector3::Y).unwrap();

        // Normal should point in +Z direction
        assert!((plane.normal().z - 1.0).abs() < EPSILON);
        assert!(plane.normal().x.abs() < EPSILON);
        assert!(plane.normal().y.abs() < EPSILON);
        assert_eq!(plane.w(), 0.0);
    }

    #[test]
    fn test_plane_from_collinear_points_fails() {
        let ctx = Context::default();
        let result = Plane::from_points(&ctx, Vector3::ZERO, Vector3::X, Vector3::X * 2.0);
        assert!(matches!(result, Err(KernelError::DegeneratePlane { .. })));
    }

    #[test]
    fn test_new_normalizes() {
        let ctx = Context::default();
        let plane = Plane::new(&ctx, Vector3::new(0.0, 0.0, 2.0), 4.0).unwrap();
        assert_eq!(plane.normal(), Vector3::Z);
        assert_eq!(plane.w(), 2.0);
        assert!(Plane::new(&ctx, Vector3::ZERO, 1.0).is_err());
    }

    #[test]
    fn test_any_plane_from_degenerate_points() {
        let ctx = Context::default();
        let plane = Plane::any_plane_from_points(&ctx, Vector3::ONE, Vector3::ONE, Vector3::ONE);
        assert_relative_eq!(plane.normal().length(), 1.0, epsilon = 1e-12);
        assert!(plane.signed_distance(Vector3::ONE).abs() < EPSILON);
    }

    #[test]
    fn test_plane_classify_point() {
        let ctx = Context::default();
        let plane = z_plane(&ctx, 0.0);

        assert_eq!(plane.classify_point(Vector3::Z, EPSILON), Classification::Front);
        assert_eq!(plane.classify_point(-Vector3::Z, EPSILON), Classification::Back);
        assert_eq!(
            plane.classify_point(Vector3::new(1.0, 1.0, 5e-6), EPSILON),
            Classification::Coplanar
        );
    }

    #[test]
    fn test_plane_flip() {
        let ctx = Context::default();
        let plane = z_plane(&ctx, 5.0);
        let flipped = plane.flipped(&ctx);

        assert_eq!(flipped.normal(), -Vector3::Z);
        assert_eq!(flipped.w(), -5.0);
        assert_ne!(flipped.tag(), plane.tag());
        assert!(flipped.flipped(&ctx).equals(&plane));
    }

    #[test]
    fn test_split_line_clamps_and_handles_parallel() {
        let ctx = Context::default();
        let plane = z_plane(&ctx, 1.0);
        let hit = plane.split_line_between_points(Vector3::ZERO, Vector3::new(0.0, 0.0, 4.0));
        assert_eq!(hit, Vector3::new(0.0, 0.0, 1.0));

        let clamped = plane.split_line_between_points(Vector3::ZERO, Vector3::new(0.0, 0.0, 0.5));
        assert_eq!(clamped, Vector3::new(0.0, 0.0, 0.5));

        // 0/0 gives NaN, which maps to the first point
        let on_plane = z_plane(&ctx, 0.0);
        let p = on_plane.split_line_between_points(Vector3::ZERO, Vector3::X);
        assert_eq!(p, Vector3::ZERO);
    }

    #[test]
    fn test_intersect_with_line() {
        let ctx = Context::default();
        let plane = z_plane(&ctx, 2.0);
        let hit = plane.intersect_with_line(Vector3::new(1.0, 1.0, 0.0), Vector3::Z).unwrap();
        assert_eq!(hit, Vector3::new(1.0, 1.0, 2.0));
        assert!(plane.intersect_with_line(Vector3::ZERO, Vector3::X).is_none());
    }

    #[test]
    fn test_intersect_with_plane() {
        let ctx = Context::default();
        let a = z_plane(&ctx, 1.0);
        let b = Plane::new(&ctx, Vector3::X, 2.0).unwrap();
        let (point, direction) = a.intersect_with_plane(&b).unwrap();
        assert!(a.signed_distance(point).abs() < 1e-12);
        assert!(b.signed_distance(point).abs() < 1e-12);
        assert_relative_eq!(direction.y.abs(), 1.0);

        let parallel = z_plane(&ctx, 3.0);
        assert!(a.intersect_with_plane(&parallel).is_none());
    }

    #[test]
    fn test_mirror_point() {
        let ctx = Context::default();
        let plane = z_plane(&ctx, 1.0);
        assert_eq!(plane.mirror_point(Vector3::new(2.0, 0.0, 3.0)), Vector3::new(2.0, 0.0, -1.0));
    }

    #[test]
    fn test_transform_translates_offset() {
        let ctx = Context::default();
        let plane = z_plane(&ctx, 0.0);
        let moved = plane.transform(&ctx, &translation(Vector3::new(0.0, 0.0, 3.0))).unwrap();
        assert_relative_eq!(moved.normal().z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(moved.w(), 3.0, epsilon = 1e-12);

        let rotated = plane.transform(&ctx, &rotation_z(30.0)).unwrap();
        assert_relative_eq!(rotated.normal().z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_mirroring_keeps_orientation() {
        let ctx = Context::default();
        let plane = z_plane(&ctx, 1.0);
        let mirrored = plane.transform(&ctx, &scaling(Vector3::new(1.0, 1.0, -1.0))).unwrap();
        // The front side was z > 1; after mirroring it is z < -1
        assert_relative_eq!(mirrored.normal().z, -1.0, epsilon = 1e-12);
        assert_relative_eq!(mirrored.w(), 1.0, epsilon = 1e-12);
    }

    // =========================================================================
    // SPLITTING
    // =========================================================================

    #[test]
    fn test_split_front_and_back_unchanged() {
        let ctx = Context::default();
        let plane = z_plane(&ctx, 0.0);
        let above = polygon(&ctx, &[[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 2.0]]);
        let below = polygon(&ctx, &[[0.0, 0.0, -1.0], [1.0, 0.0, -1.0], [0.0, 1.0, -1.0]]);

        assert!(matches!(plane.split_polygon(&ctx, &above), SplitResult::Front));
        assert!(matches!(plane.split_polygon(&ctx, &below), SplitResult::Back));
    }

    #[test]
    fn test_split_touching_polygon_is_front() {
        let ctx = Context::default();
        let plane = z_plane(&ctx, 0.0);
        // One vertex lies on the plane, the rest in front
        let touching = polygon(&ctx, &[[0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]);
        assert!(matches!(plane.split_polygon(&ctx, &touching), SplitResult::Front));
    }

    #[test]
    fn test_split_coplanar_orientation() {
        let ctx = Context::default();
        let plane = z_plane(&ctx, 0.0);
        let up = polygon(&ctx, &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let down = up.flipped(&ctx);

        assert!(matches!(plane.split_polygon(&ctx, &up), SplitResult::CoplanarFront));
        assert!(matches!(plane.split_polygon(&ctx, &down), SplitResult::CoplanarBack));
    }

    #[test]
    fn test_split_spanning() {
        let ctx = Context::default();
        let plane = z_plane(&ctx, 0.0);
        // Square in the XZ plane spanning z = 0
        let poly = polygon(
            &ctx,
            &[[0.0, 0.0, -1.0], [1.0, 0.0, -1.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
        );

        let SplitResult::Spanning { front, back } = plane.split_polygon(&ctx, &poly) else {
            panic!("expected spanning split");
        };
        let front = front.expect("front piece");
        let back = back.expect("back piece");

        assert_eq!(front.vertices().len(), 4);
        assert_eq!(back.vertices().len(), 4);
        for v in front.vertices() {
            assert!(plane.signed_distance(v.pos()) >= -EPSILON);
        }
        for v in back.vertices() {
            assert!(plane.signed_distance(v.pos()) <= EPSILON);
        }

        // Pieces keep the source plane and surface handle
        assert_eq!(front.plane().tag(), poly.plane().tag());
        assert!(back.shared().ptr_eq(poly.shared()));
    }

    #[test]
    fn test_split_through_vertex_shares_it() {
        let ctx = Context::default();
        let plane = z_plane(&ctx, 0.0);
        // Diamond with two vertices on the plane
        let poly = polygon(
            &ctx,
            &[[0.0, 0.0, -1.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [-1.0, 0.0, 0.0]],
        );

        let SplitResult::Spanning { front, back } = plane.split_polygon(&ctx, &poly) else {
            panic!("expected spanning split");
        };
        // No edge crosses strictly, both halves are triangles
        assert_eq!(front.unwrap().vertices().len(), 3);
        assert_eq!(back.unwrap().vertices().len(), 3);
    }

    #[test]
    fn test_split_sliver_is_dropped() {
        let ctx = Context::default();
        let plane = z_plane(&ctx, 0.0);
        // Back part is a sliver much thinner than epsilon
        let poly = polygon(&ctx, &[[0.0, 0.0, -1e-9], [1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]]);
        // Only the first vertex is within epsilon, so this is simply front
        assert!(matches!(plane.split_polygon(&ctx, &poly), SplitResult::Front));

        // Steep sides put both crossings within epsilon of each other
        let tipped = polygon(&ctx, &[[0.0, 0.0, -2e-5], [1.0, 0.0, 1000.0], [-1.0, 0.0, 1000.0]]);
        let SplitResult::Spanning { front, back } = plane.split_polygon(&ctx, &tipped) else {
            panic!("expected spanning split");
        };
        assert_eq!(front.unwrap().vertices().len(), 3);
        // Tip plus a single surviving crossing is not a polygon
        assert!(back.is_none());
    }
}
