//! # CSG Kernel
//!
//! Polygonal constructive solid geometry (CSG) and its 2D counterpart (CAG).
//! Solids are sets of convex planar polygons; areas are sets of directed
//! sides forming closed loops.
//!
//! ## Architecture
//!
//! ```text
//! geometry (Vertex, Plane, Polygon, Side, Path2D)
//!     → csg (BSP booleans, canonicalize, retesselate)
//!     → cag (fake-solid booleans, offsets, outlines)
//!     → export (STL, AMF, DXF)
//! ```
//!
//! ## Algorithms
//!
//! - **Boolean Operations**: BSP trees (csg.js algorithm)
//! - **2D Booleans**: sides lifted into wall solids and lowered back
//! - **Canonicalization**: quantized fuzzy lookup of vertices and planes
//! - **Offsets**: union of side rectangles and corner wedges
//!
//! ## Usage
//!
//! ```rust
//! use csg_kernel::{Cag, Context, Vector2};
//!
//! let ctx = Context::default();
//! let a = Cag::rectangle(&ctx, Vector2::ZERO, Vector2::ONE).unwrap();
//! let b = Cag::rectangle(&ctx, Vector2::ONE, Vector2::ONE).unwrap();
//! let union = a.union(&ctx, &b).unwrap();
//! assert!((union.area() - 7.0).abs() < 1e-9);
//!
//! let dxf = union.to_dxf(&ctx).unwrap();
//! assert!(dxf.contains("LWPOLYLINE"));
//! ```

pub mod cag;
pub mod context;
pub mod csg;
pub mod error;
pub mod export;
pub mod fuzzy;
pub mod geometry;
pub mod math;

pub use cag::Cag;
pub use context::{Context, Tag};
pub use csg::Csg;
pub use error::{KernelError, KernelResult};
pub use geometry::{
    OrthoNormalBasis, Path2D, Plane, Polygon, SharedProperties, Side, SurfaceProperties, Vertex,
    Vertex2,
};
pub use math::{Matrix4x4, Vector2, Vector3};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solid_to_outline_pipeline() {
        let ctx = Context::default();
        let block = Csg::cube(&ctx, Vector3::ZERO, Vector3::new(2.0, 2.0, 1.0)).unwrap();
        let notch = Csg::cube(&ctx, Vector3::new(2.0, 0.0, 0.0), Vector3::ONE).unwrap();
        let solid = block.subtract(&ctx, &notch);

        // Top face seen from above
        let top = Plane::new(&ctx, Vector3::Z, 1.0).unwrap();
        let basis = OrthoNormalBasis::from_plane(top).unwrap();
        let area = solid.project_to_orthonormal_basis(&ctx, &basis).unwrap();
        assert_relative_eq!(area.area(), 14.0, epsilon = 1e-9);

        let paths = area.get_outline_paths(&ctx).unwrap();
        assert_eq!(paths.len(), 1);
        assert_relative_eq!(paths[0].area(), 14.0, epsilon = 1e-9);
    }

    #[test]
    fn test_path_round_trip_through_area() {
        let ctx = Context::default();
        let path = Path2D::new(
            &ctx,
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(3.0, 0.0),
                Vector2::new(3.0, 2.0),
                Vector2::new(0.0, 2.0),
            ],
            true,
        );
        let area = path.inner_to_cag(&ctx).unwrap();
        assert_eq!(area.area(), 6.0);

        let outline = area.get_outline_paths(&ctx).unwrap();
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].points(), path.points());
    }
}
