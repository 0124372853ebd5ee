//! # Side
//!
//! Directed 2D edge of an area, and its lifted form as a vertical wall quad.

use config::constants::FAKE_Z_TOLERANCE;
use log::warn;

use crate::context::{Context, Tag};
use crate::error::{KernelError, KernelResult};
use crate::geometry::polygon::Polygon;
use crate::geometry::vertex::{Vertex, Vertex2};
use crate::math::{Matrix4x4, Vector2, Vector2Ext};

/// Directed edge `vertex0 → vertex1`.
///
/// Consecutive sides of a loop share their common [`Vertex2`].
#[derive(Debug, Clone, Copy)]
pub struct Side {
    vertex0: Vertex2,
    vertex1: Vertex2,
    tag: Tag,
}

impl Side {
    /// Creates a side with a fresh tag.
    pub fn new(ctx: &Context, vertex0: Vertex2, vertex1: Vertex2) -> Self {
        Self {
            vertex0,
            vertex1,
            tag: ctx.next_tag(),
        }
    }

    /// Start vertex.
    pub fn vertex0(&self) -> Vertex2 {
        self.vertex0
    }

    /// End vertex.
    pub fn vertex1(&self) -> Vertex2 {
        self.vertex1
    }

    /// Identity of the side.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// `vertex1 - vertex0`.
    pub fn direction(&self) -> Vector2 {
        self.vertex1.pos() - self.vertex0.pos()
    }

    /// Length of the side.
    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// Same edge traversed the other way, sharing both vertices.
    pub fn flipped(&self, ctx: &Context) -> Side {
        Side::new(ctx, self.vertex1, self.vertex0)
    }

    /// Transformed copy with fresh vertices.
    pub fn transform(&self, ctx: &Context, matrix: &Matrix4x4) -> Side {
        Side::new(
            ctx,
            self.vertex0.transform(ctx, matrix),
            self.vertex1.transform(ctx, matrix),
        )
    }

    /// Vertical wall `(v0,z0) (v1,z0) (v1,z1) (v0,z1)` facing to the right of
    /// the side's direction.
    pub fn to_polygon_3d(&self, ctx: &Context, z0: f64, z1: f64) -> KernelResult<Polygon> {
        let p0 = self.vertex0.pos();
        let p1 = self.vertex1.pos();
        let vertices = vec![
            Vertex::new(ctx, p0.to_vector3(z0)),
            Vertex::new(ctx, p1.to_vector3(z0)),
            Vertex::new(ctx, p1.to_vector3(z1)),
            Vertex::new(ctx, p0.to_vector3(z1)),
        ];
        Polygon::new(ctx, vertices)
    }

    /// Recovers the side a wall polygon was lifted from.
    ///
    /// ## Rules
    ///
    /// - Every vertex must sit at `|z| = 1` within tolerance
    /// - Polygons with fewer than four vertices are residue of the boolean
    ///   operation and yield `None`
    /// - Exactly two vertices must lie on top, one loop step apart (index
    ///   difference 1) or across the wrap-around (difference 3)
    pub fn from_fake_polygon(ctx: &Context, polygon: &Polygon) -> KernelResult<Option<Side>> {
        for vertex in polygon.vertices() {
            let z = vertex.pos().z;
            if (z.abs() - 1.0).abs() >= FAKE_Z_TOLERANCE {
                return Err(KernelError::malformed_fake_solid(format!(
                    "vertex z = {z} is not at +/-1"
                )));
            }
        }

        if polygon.vertices().len() < 4 {
            warn!(
                "skipping residual {}-vertex wall polygon",
                polygon.vertices().len()
            );
            return Ok(None);
        }

        let top: Vec<(usize, Vector2)> = polygon
            .vertices()
            .iter()
            .enumerate()
            .filter(|(_, v)| v.pos().z > 0.0)
            .map(|(i, v)| (i, v.pos().truncate()))
            .collect();
        let &[(idx0, pos0), (idx1, pos1)] = top.as_slice() else {
            return Err(KernelError::malformed_fake_solid(format!(
                "expected 2 top vertices, found {}",
                top.len()
            )));
        };

        let (start, end) = match idx1 - idx0 {
            1 => (pos1, pos0),
            3 => (pos0, pos1),
            d => {
                return Err(KernelError::malformed_fake_solid(format!(
                    "top vertices {d} steps apart"
                )))
            }
        };
        Ok(Some(Side::new(
            ctx,
            Vertex2::new(ctx, start),
            Vertex2::new(ctx, end),
        )))
    }
}
