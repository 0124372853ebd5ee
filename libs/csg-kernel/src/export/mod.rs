//! # Export
//!
//! Text serialization of solids and areas.
//!
//! ## Formats
//!
//! - `stl`: ASCII STL facets, one fan of triangles per polygon
//! - `amf`: AMF `<vertex>` fragments
//! - `dxf`: DXF document with one `LWPOLYLINE` per outline path

mod amf;
mod dxf;
mod stl;

pub use dxf::paths_to_dxf;
