//! # Solids (CSG)
//!
//! A solid is the boundary set of convex planar polygons. Boolean operations
//! build BSP trees from both operands and clip them against each other.
//!
//! ## Algorithm
//!
//! Based on the csg.js algorithm by Evan Wallace:
//! - Union: A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); combine
//! - Subtract: A.invert(); A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); combine; invert
//! - Intersect: A.invert(); B.clipTo(A); B.invert(); A.clipTo(B); B.clipTo(A); combine; invert
//!
//! Operations over several operands reduce pairwise, then canonicalize and
//! retesselate the final result once.
//!
//! ## Example
//!
//! ```rust
//! use csg_kernel::{Context, Csg, Vector3};
//!
//! let ctx = Context::default();
//! let a = Csg::cube(&ctx, Vector3::ZERO, Vector3::ONE).unwrap();
//! let b = Csg::cube(&ctx, Vector3::splat(1.0), Vector3::ONE).unwrap();
//! let result = a.subtract(&ctx, &b);
//! assert!(!result.polygons().is_empty());
//! ```

mod boolean;
pub mod bsp;
mod canonical;


use std::collections::HashMap;

use config::constants::NORMAL_MATCH_EPSILON;

use crate::cag::Cag;
use crate::context::{Context, Tag};
use crate::error::{KernelError, KernelResult};
use crate::geometry::basis::OrthoNormalBasis;
use crate::geometry::plane::Plane;
use crate::geometry::polygon::Polygon;
use crate::geometry::vertex::Vertex;
use crate::math::{self, Matrix4x4, Matrix4x4Ext, Vector3};

/// Corner table of the cube: vertex indices per face and the outward normal.
///
/// Vertex `i` sits at `center + radius * (2 * bit(i) - 1)` per axis, with bit 0
/// for x, bit 1 for y and bit 2 for z.
const CUBE_FACES: [([usize; 4], [f64; 3]); 6] = [
    ([0, 4, 6, 2], [-1.0, 0.0, 0.0]),
    ([1, 3, 7, 5], [1.0, 0.0, 0.0]),
    ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
    ([2, 6, 7, 3], [0.0, 1.0, 0.0]),
    ([0, 2, 3, 1], [0.0, 0.0, -1.0]),
    ([4, 5, 7, 6], [0.0, 0.0, 1.0]),
];

/// A solid as a set of convex polygons.
///
/// Booleans and transforms return new solids; a solid is never mutated in
/// place.
#[derive(Debug, Clone, Default)]
pub struct Csg {
    polygons: Vec<Polygon>,
    is_canonicalized: bool,
    is_retesselated: bool,
}

impl Csg {
    /// Empty solid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Solid bounded by `polygons`.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self {
            polygons,
            is_canonicalized: false,
            is_retesselated: false,
        }
    }

    /// Boundary polygons.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Consumes the solid, returning its polygons.
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    /// Whether the solid has no polygons.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Axis-aligned box spanning `center ± radius`.
    ///
    /// The eight corners are shared between the faces that meet there.
    ///
    /// # Errors
    ///
    /// A radius component that is not positive.
    pub fn cube(ctx: &Context, center: Vector3, radius: Vector3) -> KernelResult<Self> {
        if radius.min_element() <= 0.0 || !radius.is_finite() {
            return Err(KernelError::invalid_parameter(
                "radius",
                format!("every component must be positive, got {radius}"),
            ));
        }

        let corners: Vec<Vertex> = (0..8)
            .map(|i| {
                let bit = |b: usize| if i & (1 << b) != 0 { 1.0 } else { -1.0 };
                Vertex::new(ctx, center + radius * Vector3::new(bit(0), bit(1), bit(2)))
            })
            .collect();

        let shared = ctx.default_shared();
        let polygons = CUBE_FACES
            .iter()
            .map(|(indices, normal)| {
                let vertices: Vec<Vertex> = indices.iter().map(|&i| corners[i]).collect();
                let plane =
                    Plane::from_normal_and_point(ctx, Vector3::from_array(*normal), vertices[0].pos())?;
                Polygon::with_properties(ctx, vertices, shared.clone(), Some(plane))
            })
            .collect::<KernelResult<Vec<_>>>()?;

        Ok(Self::from_polygons(polygons))
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Axis-aligned bounds as `(min, max)`; both zero for an empty solid.
    pub fn bounding_box(&self) -> (Vector3, Vector3) {
        let mut boxes = self.polygons.iter().map(Polygon::bounding_box);
        let Some(first) = boxes.next() else {
            return (Vector3::ZERO, Vector3::ZERO);
        };
        boxes.fold(first, |(min, max), (lo, hi)| (min.min(lo), max.max(hi)))
    }

    /// Whether the bounding boxes of the two solids touch or intersect.
    ///
    /// Empty solids overlap nothing.
    pub fn may_overlap(&self, other: &Csg) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let (min_a, max_a) = self.bounding_box();
        let (min_b, max_b) = other.bounding_box();
        min_a.cmple(max_b).all() && min_b.cmple(max_a).all()
    }

    // =========================================================================
    // TRANSFORMS
    // =========================================================================

    /// Solid turned inside out.
    pub fn inverse(&self, ctx: &Context) -> Csg {
        Csg::from_polygons(self.polygons.iter().map(|p| p.flipped(ctx)).collect())
    }

    /// Transformed copy.
    ///
    /// Vertices and planes shared between polygons stay shared: each distinct
    /// tag is transformed once. A mirroring matrix reverses every loop so
    /// the solid keeps facing outward.
    pub fn transform(&self, ctx: &Context, matrix: &Matrix4x4) -> KernelResult<Csg> {
        let mirroring = matrix.is_mirroring();
        let mut vertex_map: HashMap<Tag, Vertex> = HashMap::new();
        let mut plane_map: HashMap<Tag, Plane> = HashMap::new();

        let mut polygons = Vec::with_capacity(self.polygons.len());
        for polygon in &self.polygons {
            let plane = match plane_map.get(&polygon.plane().tag()) {
                Some(plane) => *plane,
                None => {
                    let plane = polygon.plane().transform(ctx, matrix)?;
                    plane_map.insert(polygon.plane().tag(), plane);
                    plane
                }
            };
            let mut vertices: Vec<Vertex> = polygon
                .vertices()
                .iter()
                .map(|v| *vertex_map.entry(v.tag()).or_insert_with(|| v.transform(ctx, matrix)))
                .collect();
            if mirroring {
                vertices.reverse();
            }
            polygons.push(Polygon::from_parts(vertices, plane, polygon.shared().clone()));
        }

        Ok(Csg::from_polygons(polygons))
    }

    /// Translated copy.
    pub fn translate(&self, ctx: &Context, offset: Vector3) -> KernelResult<Csg> {
        self.transform(ctx, &math::translation(offset))
    }

    /// Scaled copy; negative factors mirror.
    pub fn scale(&self, ctx: &Context, factors: Vector3) -> KernelResult<Csg> {
        self.transform(ctx, &math::scaling(factors))
    }

    /// Copy rotated about the X axis by `degrees`.
    pub fn rotate_x(&self, ctx: &Context, degrees: f64) -> KernelResult<Csg> {
        self.transform(ctx, &math::rotation_x(degrees))
    }

    /// Copy rotated about the Y axis by `degrees`.
    pub fn rotate_y(&self, ctx: &Context, degrees: f64) -> KernelResult<Csg> {
        self.transform(ctx, &math::rotation_y(degrees))
    }

    /// Copy rotated about the Z axis by `degrees`.
    pub fn rotate_z(&self, ctx: &Context, degrees: f64) -> KernelResult<Csg> {
        self.transform(ctx, &math::rotation_z(degrees))
    }

    /// Mirror image across `plane`.
    pub fn mirrored(&self, ctx: &Context, plane: &Plane) -> KernelResult<Csg> {
        self.transform(ctx, &plane.mirroring_matrix())
    }

    // =========================================================================
    // PROJECTION
    // =========================================================================

    /// Union of the 2D projections of every polygon lying in the plane of
    /// `basis` and facing the same way.
    pub fn project_to_orthonormal_basis(
        &self,
        ctx: &Context,
        basis: &OrthoNormalBasis,
    ) -> KernelResult<Cag> {
        let normal = basis.plane().normal();
        let cags: Vec<Cag> = self
            .polygons
            .iter()
            .filter(|p| (p.plane().normal() - normal).length_squared() < NORMAL_MATCH_EPSILON)
            .map(|p| p.project_to_orthonormal_basis(ctx, basis))
            .filter(|cag| !cag.sides().is_empty())
            .collect();
        Cag::new().union_all(ctx, &cags)
    }
}
