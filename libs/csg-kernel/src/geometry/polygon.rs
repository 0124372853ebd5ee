//! # Polygon
//!
//! Convex planar polygon with cached plane and shared surface properties.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cag::Cag;
use crate::context::Context;
use crate::error::{KernelError, KernelResult};
use crate::geometry::basis::OrthoNormalBasis;
use crate::geometry::plane::{Plane, SplitResult};
use crate::geometry::vertex::Vertex;
use crate::math::{Matrix4x4, Matrix4x4Ext, Vector3};
use config::constants::AREA_EPSILON;

// =============================================================================
// SURFACE PROPERTIES
// =============================================================================

/// Metadata carried by a polygon surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceProperties {
    /// RGBA color, if assigned.
    pub color: Option<[f32; 4]>,
}

/// Handle to surface properties, shared by every polygon derived from a
/// common ancestor. Two handles are equal only if they point to the same
/// allocation.
#[derive(Debug, Clone, Default)]
pub struct SharedProperties(Arc<SurfaceProperties>);

impl SharedProperties {
    /// Wraps properties in a new handle.
    pub fn new(properties: SurfaceProperties) -> Self {
        Self(Arc::new(properties))
    }

    /// Handle for a colored surface.
    pub fn with_color(color: [f32; 4]) -> Self {
        Self::new(SurfaceProperties { color: Some(color) })
    }

    /// The wrapped properties.
    pub fn properties(&self) -> &SurfaceProperties {
        &self.0
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &SharedProperties) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the allocation, usable as a grouping key.
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

// =============================================================================
// POLYGON
// =============================================================================

/// A convex polygon with associated plane.
///
/// ## Invariants
///
/// - At least three vertices, all on `plane`
/// - Convex, wound counter-clockwise around `plane.normal()`
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<Vertex>,
    plane: Plane,
    shared: SharedProperties,
}

impl Polygon {
    /// Create polygon from vertices with default surface properties.
    ///
    /// The plane is derived from the first three vertices.
    pub fn new(ctx: &Context, vertices: Vec<Vertex>) -> KernelResult<Self> {
        Self::with_properties(ctx, vertices, ctx.default_shared(), None)
    }

    /// Create polygon with explicit surface properties and, optionally, a
    /// known plane.
    ///
    /// ## Errors
    ///
    /// - Fewer than three vertices
    /// - First three vertices collinear when no plane is supplied
    /// - Non-convex loop when debug assertions are enabled
    pub fn with_properties(
        ctx: &Context,
        vertices: Vec<Vertex>,
        shared: SharedProperties,
        plane: Option<Plane>,
    ) -> KernelResult<Self> {
        if vertices.len() < 3 {
            return Err(KernelError::TooFewPoints {
                count: vertices.len(),
                min: 3,
            });
        }
        let plane = match plane {
            Some(plane) => plane,
            None => Plane::from_points(ctx, vertices[0].pos(), vertices[1].pos(), vertices[2].pos())?,
        };
        let polygon = Self {
            vertices,
            plane,
            shared,
        };
        if ctx.debug_assertions() && !polygon.is_convex(ctx.epsilon()) {
            return Err(KernelError::NonConvexPolygon);
        }
        Ok(polygon)
    }

    /// Create polygon from bare positions.
    pub fn from_points(ctx: &Context, points: &[Vector3]) -> KernelResult<Self> {
        let vertices = points.iter().map(|p| Vertex::new(ctx, *p)).collect();
        Self::new(ctx, vertices)
    }

    /// Assembles a polygon whose invariants the caller already guarantees.
    pub(crate) fn from_parts(vertices: Vec<Vertex>, plane: Plane, shared: SharedProperties) -> Self {
        Self {
            vertices,
            plane,
            shared,
        }
    }

    /// Get polygon vertices.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Get polygon plane.
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Get surface properties handle.
    pub fn shared(&self) -> &SharedProperties {
        &self.shared
    }

    /// Whether every corner turns the same way around the plane normal.
    pub fn is_convex(&self, eps: f64) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let normal = self.plane.normal();
        (0..n).all(|i| {
            let prev = self.vertices[(i + n - 1) % n].pos();
            let curr = self.vertices[i].pos();
            let next = self.vertices[(i + 1) % n].pos();
            (curr - prev).cross(next - curr).dot(normal) >= -eps
        })
    }

    /// Flip the polygon (reverse winding order and plane).
    pub fn flipped(&self, ctx: &Context) -> Polygon {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Polygon {
            vertices,
            plane: self.plane.flipped(ctx),
            shared: self.shared.clone(),
        }
    }

    /// Transformed copy. A mirroring transform reverses the winding so the
    /// polygon keeps facing outward.
    pub fn transform(&self, ctx: &Context, matrix: &Matrix4x4) -> KernelResult<Polygon> {
        let mut vertices: Vec<Vertex> = self
            .vertices
            .iter()
            .map(|v| v.transform(ctx, matrix))
            .collect();
        let plane = self.plane.transform(ctx, matrix)?;
        if matrix.is_mirroring() {
            vertices.reverse();
        }
        Ok(Polygon {
            vertices,
            plane,
            shared: self.shared.clone(),
        })
    }

    /// Translated copy.
    pub fn translate(&self, ctx: &Context, offset: Vector3) -> KernelResult<Polygon> {
        self.transform(ctx, &crate::math::translation(offset))
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounding_box(&self) -> (Vector3, Vector3) {
        let first = self.vertices[0].pos();
        self.vertices
            .iter()
            .fold((first, first), |(min, max), v| (min.min(v.pos()), max.max(v.pos())))
    }

    /// Area enclosed by the loop.
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        let sum = (0..n).fold(Vector3::ZERO, |acc, i| {
            acc + self.vertices[i].pos().cross(self.vertices[(i + 1) % n].pos())
        });
        0.5 * sum.dot(self.plane.normal())
    }

    /// Projects the polygon into the 2D frame of `basis`.
    ///
    /// The area is oriented positive; a polygon that projects to (almost)
    /// nothing yields an empty area.
    pub fn project_to_orthonormal_basis(&self, ctx: &Context, basis: &OrthoNormalBasis) -> Cag {
        let points: Vec<_> = self.vertices.iter().map(|v| basis.to_2d(v.pos())).collect();
        let cag = Cag::from_points_no_check(ctx, &points);
        let area = cag.area();
        if area.abs() < AREA_EPSILON {
            Cag::new()
        } else if area < 0.0 {
            cag.flipped(ctx)
        } else {
            cag
        }
    }

    /// Split polygon by a plane into the given buckets.
    ///
    /// ## Parameters
    ///
    /// - `plane`: Splitting plane
    /// - `coplanar_front`: Output for coplanar polygons facing same direction
    /// - `coplanar_back`: Output for coplanar polygons facing opposite direction
    /// - `front`: Output for polygons in front of plane
    /// - `back`: Output for polygons behind plane
    pub fn split(
        &self,
        ctx: &Context,
        plane: &Plane,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        match plane.split_polygon(ctx, self) {
            SplitResult::CoplanarFront => coplanar_front.push(self.clone()),
            SplitResult::CoplanarBack => coplanar_back.push(self.clone()),
            SplitResult::Front => front.push(self.clone()),
            SplitResult::Back => back.push(self.clone()),
            SplitResult::Spanning {
                front: front_part,
                back: back_part,
            } => {
                front.extend(front_part);
                back.extend(back_part);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{scaling, translation};
    use config::constants::KernelConfig;

    fn create_triangle(ctx: &Context) -> Polygon {
        Polygon::from_points(
            ctx,
            &[Vector3::ZERO, Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.5, 1.0, 0.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_polygon_needs_three_vertices() {
        let ctx = Context::default();
        let result = Polygon::from_points(&ctx, &[Vector3::ZERO, Vector3::X]);
        assert!(matches!(result, Err(KernelError::TooFewPoints { count: 2, min: 3 })));
    }

    #[test]
    fn test_polygon_plane_from_first_vertices() {
        let ctx = Context::default();
        let poly = create_triangle(&ctx);
        assert_eq!(poly.plane().normal(), Vector3::Z);
        assert!(poly.shared().ptr_eq(&ctx.default_shared()));
    }

    #[test]
    fn test_convexity_checked_only_in_debug() {
        let concave = [
            Vector3::ZERO,
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(1.0, 0.5, 0.0),
            Vector3::new(2.0, 2.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
        ];
        let relaxed = Context::default();
        assert!(Polygon::from_points(&relaxed, &concave).is_ok());

        let strict = Context::new(KernelConfig::default().with_debug_assertions(true));
        assert!(matches!(
            Polygon::from_points(&strict, &concave),
            Err(KernelError::NonConvexPolygon)
        ));
    }

    #[test]
    fn test_polygon_flip() {
        let ctx = Context::default();
        let poly = create_triangle(&ctx);
        let flipped = poly.flipped(&ctx);

        // Vertices should be reversed
        assert_eq!(flipped.vertices()[0].tag(), poly.vertices()[2].tag());
        assert_eq!(flipped.vertices()[2].tag(), poly.vertices()[0].tag());
        assert_eq!(flipped.plane().normal(), -Vector3::Z);
        assert!(flipped.shared().ptr_eq(poly.shared()));
    }

    #[test]
    fn test_area_and_bounds() {
        let ctx = Context::default();
        let poly = create_triangle(&ctx);
        assert!((poly.area() - 0.5).abs() < 1e-12);

        let (min, max) = poly.bounding_box();
        assert_eq!(min, Vector3::ZERO);
        assert_eq!(max, Vector3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_transform_translates() {
        let ctx = Context::default();
        let poly = create_triangle(&ctx);
        let moved = poly.transform(&ctx, &translation(Vector3::new(0.0, 0.0, 2.0))).unwrap();
        assert_eq!(moved.vertices()[0].pos(), Vector3::new(0.0, 0.0, 2.0));
        assert!((moved.plane().w() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_mirror_transform_keeps_winding_consistent() {
        let ctx = Context::default();
        let poly = create_triangle(&ctx);
        let mirrored = poly
            .transform(&ctx, &scaling(Vector3::new(-1.0, 1.0, 1.0)))
            .unwrap();

        // Winding was reversed, so the plane rebuilt from the vertices agrees
        // with the transformed plane.
        let v = mirrored.vertices();
        let rebuilt = Plane::from_points(&ctx, v[0].pos(), v[1].pos(), v[2].pos()).unwrap();
        assert!((rebuilt.normal() - mirrored.plane().normal()).length() < 1e-12);
        assert!(mirrored.area() > 0.0);
    }

    #[test]
    fn test_split_into_buckets() {
        let ctx = Context::default();
        let poly = Polygon::from_points(
            &ctx,
            &[
                Vector3::new(0.0, 0.0, -1.0),
                Vector3::new(1.0, 0.0, -1.0),
                Vector3::new(0.5, 0.0, 1.0),
            ],
        )
        .unwrap();
        let plane = Plane::new(&ctx, Vector3::Z, 0.0).unwrap();

        let mut cf = Vec::new();
        let mut cb = Vec::new();
        let mut f = Vec::new();
        let mut b = Vec::new();
        poly.split(&ctx, &plane, &mut cf, &mut cb, &mut f, &mut b);

        assert!(cf.is_empty() && cb.is_empty());
        assert_eq!(f.len(), 1, "Should have front polygon");
        assert_eq!(b.len(), 1, "Should have back polygon");
    }

    #[test]
    fn test_surface_properties_serialize() {
        let props = SurfaceProperties {
            color: Some([1.0, 0.0, 0.0, 1.0]),
        };
        let json = serde_json::to_string(&props).unwrap();
        let back: SurfaceProperties = serde_json::from_str(&json).unwrap();
        assert_eq!(back, props);
        assert_eq!(
            SharedProperties::with_color([1.0, 0.0, 0.0, 1.0]).properties(),
            &props
        );
    }
}
