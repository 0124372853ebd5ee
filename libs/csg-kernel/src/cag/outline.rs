//! # Outline Reconstruction
//!
//! Walks the canonical side set to recover its closed boundary loops.
//!
//! ## Algorithm
//!
//! 1. Map every vertex to the sides leaving it
//! 2. Start at the vertex with the lowest tag and follow sides until the
//!    walk returns to the start
//! 3. Where several sides leave a vertex (two loops touching at a corner),
//!    take the sharpest right turn
//! 4. Repeat until every side is used

use std::collections::BTreeMap;

use log::trace;

use super::Cag;
use crate::context::{Context, Tag};
use crate::error::{KernelError, KernelResult};
use crate::geometry::path2d::Path2D;
use crate::geometry::side::Side;
use crate::math::Vector2Ext;

impl Cag {
    /// Closed paths tracing every boundary loop.
    ///
    /// # Errors
    ///
    /// [`KernelError::UnclosedOutline`] when a walk reaches a vertex with no
    /// unused side leaving it.
    pub fn get_outline_paths(&self, ctx: &Context) -> KernelResult<Vec<Path2D>> {
        let cag = self.canonicalized(ctx);
        let sides = cag.sides();

        let mut outgoing: BTreeMap<Tag, Vec<usize>> = BTreeMap::new();
        for (index, side) in sides.iter().enumerate() {
            outgoing.entry(side.vertex0().tag()).or_default().push(index);
        }

        let mut paths = Vec::new();
        while let Some(mut entry) = outgoing.first_entry() {
            let start_index = entry.get_mut().remove(0);
            if entry.get().is_empty() {
                entry.remove();
            }

            let start_tag = sides[start_index].vertex0().tag();
            let mut current = &sides[start_index];
            let mut points = Vec::new();
            loop {
                points.push(current.vertex0().pos());
                let next_tag = current.vertex1().tag();
                if next_tag == start_tag {
                    break;
                }

                let Some(candidates) = outgoing.get_mut(&next_tag) else {
                    return Err(KernelError::UnclosedOutline {
                        vertex: next_tag.value(),
                    });
                };
                let choice = if candidates.len() == 1 {
                    0
                } else {
                    sharpest_right_turn(current, candidates.iter().map(|&i| &sides[i]))
                };
                let next_index = candidates.remove(choice);
                if candidates.is_empty() {
                    outgoing.remove(&next_tag);
                }
                current = &sides[next_index];
            }

            trace!("outline loop with {} points", points.len());
            paths.push(Path2D::new(ctx, points, true));
        }

        Ok(paths)
    }
}

/// Position of the candidate whose direction turns least to the left of
/// `current`, with turns normalized into `(-180, 180]`.
fn sharpest_right_turn<'a>(current: &Side, candidates: impl Iterator<Item = &'a Side>) -> usize {
    let current_angle = current.direction().angle_degrees();
    let mut best: Option<(usize, f64)> = None;
    for (position, candidate) in candidates.enumerate() {
        let mut turn = candidate.direction().angle_degrees() - current_angle;
        if turn <= -180.0 {
            turn += 360.0;
        }
        if turn > 180.0 {
            turn -= 360.0;
        }
        if best.map_or(true, |(_, best_turn)| turn < best_turn) {
            best = Some((position, turn));
        }
    }
    best.map_or(0, |(position, _)| position)
}
