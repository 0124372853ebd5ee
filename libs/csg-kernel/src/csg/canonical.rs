//! # Canonicalization and Retesselation
//!
//! Clean-up passes run after boolean operations.
//!
//! ## Canonicalization
//!
//! Vertices within epsilon of each other collapse onto one shared vertex, and
//! planes within epsilon (normal and offset) onto one shared plane. Repeated
//! corners are then dropped, along with polygons left with fewer than three.
//!
//! ## Retesselation
//!
//! Polygons sharing a plane and surface handle are merged greedily across
//! shared edges (same vertex tags, opposite direction). Collinear corners are
//! removed from the merged loop and a merge is kept only while the result is
//! still convex.

use std::collections::HashMap;

use config::constants::COLLINEAR_RELATIVE_EPSILON;
use log::trace;

use super::Csg;
use crate::context::{Context, Tag};
use crate::fuzzy::FuzzyFactory;
use crate::geometry::plane::Plane;
use crate::geometry::polygon::Polygon;
use crate::geometry::vertex::Vertex;
use crate::math::Vector3;

impl Csg {
    /// Copy with near-coincident vertices and planes shared.
    pub fn canonicalized(&self, ctx: &Context) -> Csg {
        if self.is_canonicalized {
            return self.clone();
        }

        let eps = ctx.epsilon();
        let mut vertices: FuzzyFactory<Vertex, 3> = FuzzyFactory::new(eps);
        let mut planes: FuzzyFactory<Plane, 4> = FuzzyFactory::new(eps);

        let mut polygons = Vec::with_capacity(self.polygons.len());
        for polygon in &self.polygons {
            let plane = *polygon.plane();
            let n = plane.normal();
            let plane = planes.lookup_or_create([n.x, n.y, n.z, plane.w()], |_| plane);

            let mut loop_vertices: Vec<Vertex> = Vec::with_capacity(polygon.vertices().len());
            for vertex in polygon.vertices() {
                let pos = vertex.pos();
                let canonical = vertices.lookup_or_create(pos.to_array(), |_| *vertex);
                if loop_vertices.last().map(Vertex::tag) != Some(canonical.tag()) {
                    loop_vertices.push(canonical);
                }
            }
            while loop_vertices.len() > 1
                && loop_vertices.first().map(Vertex::tag) == loop_vertices.last().map(Vertex::tag)
            {
                loop_vertices.pop();
            }

            if loop_vertices.len() >= 3 {
                polygons.push(Polygon::from_parts(
                    loop_vertices,
                    plane,
                    polygon.shared().clone(),
                ));
            }
        }

        Csg {
            polygons,
            is_canonicalized: true,
            is_retesselated: false,
        }
    }

    /// Copy with coplanar neighbours merged into larger convex polygons.
    ///
    /// Neighbours are recognised by shared vertex tags, so this is most
    /// effective on a canonicalized solid.
    pub fn retesselated(&self, ctx: &Context) -> Csg {
        if self.is_retesselated {
            return self.clone();
        }

        // Group by plane identity and surface handle, keeping first-seen order
        let mut index: HashMap<(Tag, usize), usize> = HashMap::new();
        let mut groups: Vec<Vec<Polygon>> = Vec::new();
        for polygon in &self.polygons {
            let key = (polygon.plane().tag(), polygon.shared().id());
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(polygon.clone());
        }

        let before = self.polygons.len();
        let mut polygons = Vec::with_capacity(before);
        for group in groups {
            polygons.extend(merge_polygon_group(ctx, group));
        }
        trace!("retesselate: {before} -> {} polygons", polygons.len());

        Csg {
            polygons,
            is_canonicalized: self.is_canonicalized,
            is_retesselated: true,
        }
    }
}

/// Merge polygons within a single coplanar group until no pair merges.
fn merge_polygon_group(ctx: &Context, mut group: Vec<Polygon>) -> Vec<Polygon> {
    if group.len() < 2 {
        return group;
    }

    let mut merged = true;
    while merged {
        merged = false;
        let mut new_group = Vec::with_capacity(group.len());
        let mut used = vec![false; group.len()];

        for i in 0..group.len() {
            if used[i] {
                continue;
            }
            let mut current = group[i].clone();
            used[i] = true;

            for j in (i + 1)..group.len() {
                if used[j] {
                    continue;
                }
                if let Some(m) = try_merge_polygons(ctx, &current, &group[j]) {
                    current = m;
                    used[j] = true;
                    merged = true;
                }
            }

            new_group.push(current);
        }

        group = new_group;
    }

    group
}

/// Try to merge two coplanar polygons that share an edge.
///
/// ## Returns
///
/// `Some(merged)` if the polygons share an edge and the merged loop is a
/// convex polygon without repeated corners, `None` otherwise.
fn try_merge_polygons(ctx: &Context, p1: &Polygon, p2: &Polygon) -> Option<Polygon> {
    let v1 = p1.vertices();
    let v2 = p2.vertices();
    let n1 = v1.len();
    let n2 = v2.len();

    for i in 0..n1 {
        let a1 = v1[i].tag();
        let b1 = v1[(i + 1) % n1].tag();
        for j in 0..n2 {
            let a2 = v2[j].tag();
            let b2 = v2[(j + 1) % n2].tag();
            if a1 == b2 && b1 == a2 {
                return merge_at_edge(ctx, p1, p2, i, j);
            }
        }
    }

    None
}

/// Merge two polygons at their shared edge `p1[edge1] → p1[edge1 + 1]`,
/// which `p2` traverses as `p2[edge2] → p2[edge2 + 1]`.
fn merge_at_edge(
    ctx: &Context,
    p1: &Polygon,
    p2: &Polygon,
    edge1: usize,
    edge2: usize,
) -> Option<Polygon> {
    let v1 = p1.vertices();
    let v2 = p2.vertices();
    let n1 = v1.len();
    let n2 = v2.len();
    let mut merged = Vec::with_capacity(n1 + n2 - 2);

    // p1 up to and including the shared edge start
    merged.extend_from_slice(&v1[..=edge1]);
    // p2 strictly between the shared edge end and start
    merged.extend((2..n2).map(|k| v2[(edge2 + k) % n2]));
    // p1 from the shared edge end onwards
    merged.extend_from_slice(&v1[edge1 + 1..]);

    let cleaned = remove_collinear_vertices(ctx, merged);
    if cleaned.len() < 3 || has_repeated_tag(&cleaned) {
        return None;
    }

    let polygon = Polygon::from_parts(cleaned, *p1.plane(), p1.shared().clone());
    polygon.is_convex(ctx.epsilon()).then_some(polygon)
}

/// Remove corners lying on the straight line through their neighbours.
fn remove_collinear_vertices(ctx: &Context, mut vertices: Vec<Vertex>) -> Vec<Vertex> {
    let eps = ctx.epsilon();
    let mut i = 0;
    while vertices.len() > 3 && i < vertices.len() {
        let n = vertices.len();
        let prev = vertices[(i + n - 1) % n].pos();
        let curr = vertices[i].pos();
        let next = vertices[(i + 1) % n].pos();
        if is_collinear(prev, curr, next, eps) {
            vertices.remove(i);
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }
    vertices
}

/// `curr` continues straight on from `prev` towards `next`.
fn is_collinear(prev: Vector3, curr: Vector3, next: Vector3, eps: f64) -> bool {
    let d1 = curr - prev;
    let d2 = next - curr;
    if d1.dot(d2) <= 0.0 {
        return false;
    }
    let l1 = d1.length();
    let l2 = d2.length();
    if d1.cross(d2).length() < COLLINEAR_RELATIVE_EPSILON * l1 * l2 {
        return true;
    }
    // Distance from curr to the line prev → next
    let chord = next - prev;
    let chord_length = chord.length();
    chord_length > 0.0 && d1.cross(chord).length() / chord_length < eps
}

fn has_repeated_tag(vertices: &[Vertex]) -> bool {
    let mut tags: Vec<Tag> = vertices.iter().map(Vertex::tag).collect();
    tags.sort_unstable();
    tags.windows(2).any(|w| w[0] == w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(ctx: &Context, corners: [Vertex; 4], plane: Plane) -> Polygon {
        Polygon::from_parts(corners.to_vec(), plane, ctx.default_shared())
    }

    #[test]
    fn test_collinear_detection() {
        let eps = 1e-5;
        assert!(is_collinear(Vector3::ZERO, Vector3::X, Vector3::X * 2.0, eps));
        assert!(!is_collinear(Vector3::ZERO, Vector3::X, Vector3::Y, eps));
        // Fold-back spike is not a straight continuation
        assert!(!is_collinear(Vector3::ZERO, Vector3::X, Vector3::ZERO + Vector3::X * 0.5, eps));
    }

    #[test]
    fn test_adjacent_squares_merge_into_rectangle() {
        let ctx = Context::default();
        let plane = Plane::new(&ctx, Vector3::Z, 0.0).unwrap();
        let v = |x: f64, y: f64| Vertex::new(&ctx, Vector3::new(x, y, 0.0));
        let (a, b, c) = (v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0));
        let (d, e, f) = (v(0.0, 1.0), v(1.0, 1.0), v(2.0, 1.0));

        let left = quad(&ctx, [a, b, e, d], plane);
        let right = quad(&ctx, [b, c, f, e], plane);
        let merged = merge_polygon_group(&ctx, vec![left, right]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].vertices().len(), 4);
        assert!((merged[0].area() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_convex_merge_is_rejected() {
        let ctx = Context::default();
        let plane = Plane::new(&ctx, Vector3::Z, 0.0).unwrap();
        let v = |x: f64, y: f64| Vertex::new(&ctx, Vector3::new(x, y, 0.0));
        let (a, b, c, d) = (v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0));

        // Shares the edge c-d, but the union has a reflex corner at c
        let square = quad(&ctx, [a, b, c, d], plane);
        let tri = Polygon::from_parts(vec![d, c, v(2.0, 2.0)], plane, ctx.default_shared());
        let merged = merge_polygon_group(&ctx, vec![square.clone(), tri]);
        assert_eq!(merged.len(), 2);

        // Touches only at corner c
        let corner = quad(&ctx, [c, v(2.0, 1.0), v(2.0, 2.0), v(1.0, 2.0)], plane);
        assert!(try_merge_polygons(&ctx, &square, &corner).is_none());
    }
}
