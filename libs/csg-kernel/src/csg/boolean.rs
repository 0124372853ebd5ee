//! # Boolean Operations
//!
//! Pairwise BSP clipping plus the list forms that finish with a single
//! canonicalize and retesselate pass.

use log::debug;

use super::bsp::BspNode;
use super::Csg;
use crate::context::Context;

impl Csg {
    // =========================================================================
    // PUBLIC API
    // =========================================================================

    /// Compute union of two solids.
    ///
    /// ## Parameters
    ///
    /// - `other`: Solid to add
    ///
    /// ## Returns
    ///
    /// New solid containing every point of either input.
    pub fn union(&self, ctx: &Context, other: &Csg) -> Csg {
        self.union_all(ctx, std::slice::from_ref(other))
    }

    /// Union with every solid in `others`, in order.
    pub fn union_all(&self, ctx: &Context, others: &[Csg]) -> Csg {
        let result = others
            .iter()
            .fold(self.clone(), |acc, other| acc.union_sub(ctx, other));
        result.canonicalized(ctx).retesselated(ctx)
    }

    /// Compute difference of two solids (`self - other`).
    ///
    /// ## Parameters
    ///
    /// - `other`: Solid to remove
    ///
    /// ## Returns
    ///
    /// New solid containing the points of `self` outside `other`.
    pub fn subtract(&self, ctx: &Context, other: &Csg) -> Csg {
        self.subtract_all(ctx, std::slice::from_ref(other))
    }

    /// Difference with every solid in `others`, in order.
    pub fn subtract_all(&self, ctx: &Context, others: &[Csg]) -> Csg {
        let result = others
            .iter()
            .fold(self.clone(), |acc, other| acc.subtract_sub(ctx, other));
        result.canonicalized(ctx).retesselated(ctx)
    }

    /// Compute intersection of two solids.
    ///
    /// ## Parameters
    ///
    /// - `other`: Solid to intersect with
    ///
    /// ## Returns
    ///
    /// New solid containing the points inside both inputs.
    pub fn intersect(&self, ctx: &Context, other: &Csg) -> Csg {
        self.intersect_all(ctx, std::slice::from_ref(other))
    }

    /// Intersection with every solid in `others`, in order.
    pub fn intersect_all(&self, ctx: &Context, others: &[Csg]) -> Csg {
        let result = others
            .iter()
            .fold(self.clone(), |acc, other| acc.intersect_sub(ctx, other));
        result.canonicalized(ctx).retesselated(ctx)
    }

    // =========================================================================
    // PAIRWISE STEPS
    // =========================================================================

    fn union_sub(&self, ctx: &Context, other: &Csg) -> Csg {
        if !self.may_overlap(other) {
            let mut polygons = self.polygons.clone();
            polygons.extend(other.polygons.iter().cloned());
            return Csg::from_polygons(polygons);
        }
        debug!(
            "union: {} + {} polygons",
            self.polygons.len(),
            other.polygons.len()
        );

        let mut a = BspNode::new(ctx, self.polygons.clone());
        let mut b = BspNode::new(ctx, other.polygons.clone());

        // a.clipTo(b) - remove parts of A inside B
        // b.clipTo(a) - remove parts of B inside A
        // b.invert(); b.clipTo(a); b.invert() - remove coplanar faces from B
        a.clip_to(ctx, &b);
        b.clip_to(ctx, &a);
        b.invert(ctx);
        b.clip_to(ctx, &a);
        b.invert(ctx);

        let mut polygons = a.all_polygons();
        polygons.extend(b.all_polygons());
        Csg::from_polygons(polygons)
    }

    fn subtract_sub(&self, ctx: &Context, other: &Csg) -> Csg {
        if !self.may_overlap(other) {
            return self.clone();
        }
        debug!(
            "subtract: {} - {} polygons",
            self.polygons.len(),
            other.polygons.len()
        );

        let mut a = BspNode::new(ctx, self.polygons.clone());
        let mut b = BspNode::new(ctx, other.polygons.clone());

        // A - B = ~(~A | B)
        a.invert(ctx);
        a.clip_to(ctx, &b);
        b.clip_to(ctx, &a);
        b.invert(ctx);
        b.clip_to(ctx, &a);
        b.invert(ctx);

        let mut polygons = a.all_polygons();
        polygons.extend(b.all_polygons());
        Csg::from_polygons(polygons).inverse(ctx)
    }

    fn intersect_sub(&self, ctx: &Context, other: &Csg) -> Csg {
        if !self.may_overlap(other) {
            return Csg::new();
        }
        debug!(
            "intersect: {} & {} polygons",
            self.polygons.len(),
            other.polygons.len()
        );

        let mut a = BspNode::new(ctx, self.polygons.clone());
        let mut b = BspNode::new(ctx, other.polygons.clone());

        // A & B = ~(~A | ~B)
        a.invert(ctx);
        b.clip_to(ctx, &a);
        b.invert(ctx);
        a.clip_to(ctx, &b);
        b.clip_to(ctx, &a);

        let mut polygons = a.all_polygons();
        polygons.extend(b.all_polygons());
        Csg::from_polygons(polygons).inverse(ctx)
    }
}
