//! # BSP Tree
//!
//! Binary Space Partitioning tree for CSG boolean operations.
//! Based on the csg.js algorithm by Evan Wallace.
//!
//! ## Algorithm
//!
//! Each BSP node contains:
//! - A dividing plane
//! - Polygons coplanar with the plane
//! - Front subtree (polygons in front of plane)
//! - Back subtree (polygons behind plane)
//!
//! ## Operations
//!
//! - `clip_to`: Remove polygons from this tree that are inside another tree
//! - `invert`: Flip all polygons and swap front/back subtrees
//! - `all_polygons`: Collect all polygons from the tree
//!
//! ## Stack Safety
//!
//! All operations use iterative algorithms with explicit stacks, so deep
//! trees never recurse.

use crate::context::Context;
use crate::geometry::plane::{Plane, SplitResult};
use crate::geometry::polygon::Polygon;

/// A node in the BSP tree.
///
/// Each node partitions space using a plane and stores polygons
/// coplanar with that plane.
#[derive(Debug, Clone, Default)]
pub struct BspNode {
    /// Dividing plane, taken from the first polygon added
    plane: Option<Plane>,
    /// Polygons coplanar with this node's plane
    polygons: Vec<Polygon>,
    /// Front subtree (polygons in front of plane)
    front: Option<Box<BspNode>>,
    /// Back subtree (polygons behind plane)
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Creates a new BSP tree from polygons.
    ///
    /// # Arguments
    ///
    /// * `polygons` - Polygons to build the tree from
    ///
    /// # Returns
    ///
    /// A BSP tree containing all the polygons.
    pub fn new(ctx: &Context, polygons: Vec<Polygon>) -> Self {
        let mut root = Self::default();
        root.build(ctx, polygons);
        root
    }

    /// Inserts polygons, splitting them down the tree and growing new nodes
    /// where they land.
    pub fn build(&mut self, ctx: &Context, polygons: Vec<Polygon>) {
        let mut stack: Vec<(&mut BspNode, Vec<Polygon>)> = vec![(self, polygons)];

        while let Some((node, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }
            let BspNode {
                plane,
                polygons,
                front,
                back,
            } = node;
            let plane = *plane.get_or_insert(*polys[0].plane());

            let estimated_size = polys.len() / 2 + 1;
            let mut front_polys = Vec::with_capacity(estimated_size);
            let mut back_polys = Vec::with_capacity(estimated_size);

            for poly in polys {
                match plane.split_polygon(ctx, &poly) {
                    SplitResult::CoplanarFront | SplitResult::CoplanarBack => polygons.push(poly),
                    SplitResult::Front => front_polys.push(poly),
                    SplitResult::Back => back_polys.push(poly),
                    SplitResult::Spanning { front, back } => {
                        front_polys.extend(front);
                        back_polys.extend(back);
                    }
                }
            }

            if !front_polys.is_empty() {
                let child = front.get_or_insert_with(Box::default);
                stack.push((child.as_mut(), front_polys));
            }
            if !back_polys.is_empty() {
                let child = back.get_or_insert_with(Box::default);
                stack.push((child.as_mut(), back_polys));
            }
        }
    }

    /// Inverts this BSP tree (flips all polygons and swaps subtrees).
    ///
    /// Turns the solid inside out.
    pub fn invert(&mut self, ctx: &Context) {
        let mut stack: Vec<&mut BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            let BspNode {
                plane,
                polygons,
                front,
                back,
            } = node;

            for poly in polygons.iter_mut() {
                *poly = poly.flipped(ctx);
            }
            if let Some(plane) = plane {
                *plane = plane.flipped(ctx);
            }
            std::mem::swap(front, back);

            if let Some(front) = front {
                stack.push(front.as_mut());
            }
            if let Some(back) = back {
                stack.push(back.as_mut());
            }
        }
    }

    /// Clips polygons to this BSP tree.
    ///
    /// Removes parts of polygons that are inside the solid represented
    /// by this tree.
    ///
    /// # Arguments
    ///
    /// * `polygons` - Polygons to clip
    ///
    /// # Returns
    ///
    /// Polygons that are outside this tree's solid.
    pub fn clip_polygons(&self, ctx: &Context, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack: Vec<(&BspNode, Vec<Polygon>)> = vec![(self, polygons)];

        while let Some((node, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }
            let Some(plane) = node.plane else {
                result.extend(polys);
                continue;
            };

            let mut front_polys = Vec::new();
            let mut back_polys = Vec::new();
            for poly in polys {
                match plane.split_polygon(ctx, &poly) {
                    SplitResult::CoplanarFront | SplitResult::Front => front_polys.push(poly),
                    SplitResult::CoplanarBack | SplitResult::Back => back_polys.push(poly),
                    SplitResult::Spanning { front, back } => {
                        front_polys.extend(front);
                        back_polys.extend(back);
                    }
                }
            }

            match node.front {
                Some(ref front) => stack.push((front.as_ref(), front_polys)),
                None => result.extend(front_polys),
            }
            // Without a back tree, back polygons are inside the solid
            if let Some(ref back) = node.back {
                stack.push((back.as_ref(), back_polys));
            }
        }

        result
    }

    /// Clips this tree's polygons to another tree.
    ///
    /// Removes parts of this tree's polygons that are inside the other tree.
    ///
    /// # Arguments
    ///
    /// * `other` - The tree to clip against
    pub fn clip_to(&mut self, ctx: &Context, other: &BspNode) {
        let mut stack: Vec<&mut BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            node.polygons = other.clip_polygons(ctx, std::mem::take(&mut node.polygons));

            if let Some(ref mut front) = node.front {
                stack.push(front.as_mut());
            }
            if let Some(ref mut back) = node.back {
                stack.push(back.as_mut());
            }
        }
    }

    /// Collects all polygons from this tree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack: Vec<&BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            result.extend(node.polygons.iter().cloned());

            if let Some(ref front) = node.front {
                stack.push(front.as_ref());
            }
            if let Some(ref back) = node.back {
                stack.push(back.as_ref());
            }
        }

        result
    }

    /// Returns the number of polygons in this tree.
    pub fn polygon_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            count += node.polygons.len();

            if let Some(ref front) = node.front {
                stack.push(front.as_ref());
            }
            if let Some(ref back) = node.back {
                stack.push(back.as_ref());
            }
        }

        count
    }
}

impl Drop for BspNode {
    fn drop(&mut self) {
        // Iterative drop to avoid stack overflow
        let mut stack = Vec::new();

        if let Some(front) = self.front.take() {
            stack.push(front);
        }
        if let Some(back) = self.back.take() {
            stack.push(back);
        }

        while let Some(mut node) = stack.pop() {
            // Move children to stack before node is dropped
            if let Some(front) = node.front.take() {
                stack.push(front);
            }
            if let Some(back) = node.back.take() {
                stack.push(back);
            }
        }
    }
}
