//! # Fake-Solid Booleans
//!
//! 2D booleans reuse the 3D BSP engine: every side is lifted into a vertical
//! wall between `z = -1` and `z = 1`, the walls are combined as a solid, and
//! the surviving walls are lowered back into sides.
//!
//! ## Invariants
//!
//! - Lifted walls face to the right of their side, away from the area
//! - Every lowered wall has its vertices at `|z| = 1` and exactly two of them
//!   on top

use super::Cag;
use crate::context::Context;
use crate::csg::Csg;
use crate::error::KernelResult;
use crate::geometry::side::Side;

/// Bottom of the lifted walls.
const WALL_BOTTOM: f64 = -1.0;
/// Top of the lifted walls.
const WALL_TOP: f64 = 1.0;

impl Cag {
    /// Lifts every side into a vertical wall between `z0` and `z1`.
    ///
    /// Sides shorter than epsilon have no wall.
    pub fn to_csg(&self, ctx: &Context, z0: f64, z1: f64) -> KernelResult<Csg> {
        let eps = ctx.epsilon();
        let polygons = self
            .sides
            .iter()
            .filter(|side| side.length() >= eps)
            .map(|side| side.to_polygon_3d(ctx, z0, z1))
            .collect::<KernelResult<Vec<_>>>()?;
        Ok(Csg::from_polygons(polygons))
    }

    /// Lowers a wall solid produced by [`Cag::to_csg`] back into an area.
    ///
    /// # Errors
    ///
    /// A wall that is not a vertical quad between `z = -1` and `z = 1`.
    pub fn from_fake_csg(ctx: &Context, csg: &Csg) -> KernelResult<Cag> {
        let mut sides = Vec::with_capacity(csg.polygons().len());
        for polygon in csg.polygons() {
            if let Some(side) = Side::from_fake_polygon(ctx, polygon)? {
                sides.push(side);
            }
        }
        Ok(Cag::from_sides(sides))
    }

    // =========================================================================
    // BOOLEANS
    // =========================================================================

    /// Union of two areas.
    pub fn union(&self, ctx: &Context, other: &Cag) -> KernelResult<Cag> {
        self.union_all(ctx, std::slice::from_ref(other))
    }

    /// Union with every area in `others`.
    pub fn union_all(&self, ctx: &Context, others: &[Cag]) -> KernelResult<Cag> {
        let walls = Self::walls(ctx, others)?;
        let solid = self.wall_solid(ctx)?.union_all(ctx, &walls);
        Ok(Cag::from_fake_csg(ctx, &solid)?.canonicalized(ctx))
    }

    /// Difference of two areas (`self - other`).
    pub fn subtract(&self, ctx: &Context, other: &Cag) -> KernelResult<Cag> {
        self.subtract_all(ctx, std::slice::from_ref(other))
    }

    /// Difference with every area in `others`.
    pub fn subtract_all(&self, ctx: &Context, others: &[Cag]) -> KernelResult<Cag> {
        let walls = Self::walls(ctx, others)?;
        let solid = self.wall_solid(ctx)?.subtract_all(ctx, &walls);
        Ok(Cag::from_fake_csg(ctx, &solid)?.canonicalized(ctx))
    }

    /// Intersection of two areas.
    pub fn intersect(&self, ctx: &Context, other: &Cag) -> KernelResult<Cag> {
        self.intersect_all(ctx, std::slice::from_ref(other))
    }

    /// Intersection with every area in `others`.
    pub fn intersect_all(&self, ctx: &Context, others: &[Cag]) -> KernelResult<Cag> {
        let walls = Self::walls(ctx, others)?;
        let solid = self.wall_solid(ctx)?.intersect_all(ctx, &walls);
        Ok(Cag::from_fake_csg(ctx, &solid)?.canonicalized(ctx))
    }

    fn wall_solid(&self, ctx: &Context) -> KernelResult<Csg> {
        self.to_csg(ctx, WALL_BOTTOM, WALL_TOP)
    }

    fn walls(ctx: &Context, cags: &[Cag]) -> KernelResult<Vec<Csg>> {
        cags.iter().map(|cag| cag.wall_solid(ctx)).collect()
    }
}
