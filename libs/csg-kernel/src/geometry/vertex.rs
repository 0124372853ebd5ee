//! # Vertices
//!
//! Positions paired with an identity tag. Two vertices at the same position
//! are distinct until canonicalization maps them onto one shared vertex.

use crate::context::{Context, Tag};
use crate::math::{Matrix4x4, Vector2, Vector2Ext, Vector3, Vector3Ext};

// =============================================================================
// VERTEX (3D)
// =============================================================================

/// A polygon corner in 3D.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pos: Vector3,
    tag: Tag,
}

impl Vertex {
    /// Creates a vertex with a fresh tag.
    pub fn new(ctx: &Context, pos: Vector3) -> Self {
        Self {
            pos,
            tag: ctx.next_tag(),
        }
    }

    /// Position of the vertex.
    pub fn pos(&self) -> Vector3 {
        self.pos
    }

    /// Identity of the vertex.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Vertices carry no orientation, so flipping returns the same vertex.
    pub fn flipped(self) -> Self {
        self
    }

    /// Vertex at parameter `t` along the segment to `other`.
    pub fn interpolate(&self, ctx: &Context, other: &Vertex, t: f64) -> Vertex {
        Vertex::new(ctx, self.pos.lerp(other.pos, t))
    }

    /// Transformed copy with a fresh tag.
    pub fn transform(&self, ctx: &Context, matrix: &Matrix4x4) -> Vertex {
        Vertex::new(ctx, self.pos.transform(matrix))
    }
}

// =============================================================================
// VERTEX2 (2D)
// =============================================================================

/// An area corner in 2D.
#[derive(Debug, Clone, Copy)]
pub struct Vertex2 {
    pos: Vector2,
    tag: Tag,
}

impl Vertex2 {
    /// Creates a vertex with a fresh tag.
    pub fn new(ctx: &Context, pos: Vector2) -> Self {
        Self {
            pos,
            tag: ctx.next_tag(),
        }
    }

    /// Position of the vertex.
    pub fn pos(&self) -> Vector2 {
        self.pos
    }

    /// Identity of the vertex.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Transformed copy with a fresh tag.
    pub fn transform(&self, ctx: &Context, matrix: &Matrix4x4) -> Vertex2 {
        Vertex2::new(ctx, self.pos.transform(matrix))
    }
}
