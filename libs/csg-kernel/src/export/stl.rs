//! # STL Export
//!
//! ASCII STL. Polygons are convex, so each one is written as a triangle fan
//! around its first vertex, every facet carrying the polygon's plane normal.

use config::constants::DEFAULT_STL_NAME;

use crate::csg::Csg;
use crate::geometry::polygon::Polygon;
use crate::geometry::vertex::Vertex;

impl Vertex {
    /// `vertex x y z` line.
    pub fn to_stl_string(&self) -> String {
        let pos = self.pos();
        format!("vertex {} {} {}\n", pos.x, pos.y, pos.z)
    }
}

impl Polygon {
    /// Facets of the fan triangulation.
    pub fn to_stl_string(&self) -> String {
        let normal = self.plane().normal();
        let vertices = self.vertices();
        let mut out = String::new();
        for i in 0..vertices.len().saturating_sub(2) {
            out.push_str(&format!(
                "facet normal {} {} {}\nouter loop\n",
                normal.x, normal.y, normal.z
            ));
            out.push_str(&vertices[0].to_stl_string());
            out.push_str(&vertices[i + 1].to_stl_string());
            out.push_str(&vertices[i + 2].to_stl_string());
            out.push_str("endloop\nendfacet\n");
        }
        out
    }
}

impl Csg {
    /// Complete STL document named [`DEFAULT_STL_NAME`].
    pub fn to_stl_string(&self) -> String {
        self.to_stl_string_named(DEFAULT_STL_NAME)
    }

    /// Complete STL document wrapped in `solid name` / `endsolid name`.
    pub fn to_stl_string_named(&self, name: &str) -> String {
        let mut out = format!("solid {name}\n");
        for polygon in self.polygons() {
            out.push_str(&polygon.to_stl_string());
        }
        out.push_str(&format!("endsolid {name}\n"));
        out
    }
}
