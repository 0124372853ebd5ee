//! # Geometry Primitives
//!
//! Vertices, planes, polygons, sides, paths and the orthonormal basis used to
//! move between 3D and 2D.

pub mod basis;
pub mod path2d;
pub mod plane;
pub mod polygon;
pub mod side;
pub mod vertex;

pub use basis::OrthoNormalBasis;
pub use path2d::Path2D;
pub use plane::{Classification, Plane, SplitResult};
pub use polygon::{Polygon, SharedProperties, SurfaceProperties};
pub use side::Side;
pub use vertex::{Vertex, Vertex2};
