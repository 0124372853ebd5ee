//! # DXF Export
//!
//! Minimal DXF document: an empty header, line type and layer tables, no
//! blocks, and one `LWPOLYLINE` entity per path.

use config::constants::DXF_LAYER;

use crate::cag::Cag;
use crate::context::Context;
use crate::error::KernelResult;
use crate::geometry::path2d::Path2D;

/// Writes `paths` as a DXF document.
///
/// Closed paths repeat their first point at the end, and the `90` vertex
/// count includes that repeat.
pub fn paths_to_dxf(paths: &[Path2D]) -> String {
    let mut out = String::from("999\nDXF generated by csg-kernel\n");
    out.push_str("  0\nSECTION\n  2\nHEADER\n  0\nENDSEC\n");

    // Tables
    out.push_str("  0\nSECTION\n  2\nTABLES\n");
    out.push_str("  0\nTABLE\n  2\nLTYPE\n  70\n1\n");
    out.push_str("  0\nLTYPE\n  2\nCONTINUOUS\n  3\nSolid Line\n  72\n65\n  73\n0\n  40\n0.0\n");
    out.push_str("  0\nENDTAB\n");
    out.push_str("  0\nTABLE\n  2\nLAYER\n  70\n1\n");
    out.push_str(&format!("  0\nLAYER\n  2\n{DXF_LAYER}\n  62\n7\n  6\ncontinuous\n"));
    out.push_str("  0\nENDTAB\n");
    out.push_str("  0\nTABLE\n  2\nSTYLE\n  70\n0\n  0\nENDTAB\n");
    out.push_str("  0\nTABLE\n  2\nVIEW\n  70\n0\n  0\nENDTAB\n");
    out.push_str("  0\nENDSEC\n");

    out.push_str("  0\nSECTION\n  2\nBLOCKS\n  0\nENDSEC\n");

    out.push_str("  0\nSECTION\n  2\nENTITIES\n");
    for path in paths {
        write_polyline(&mut out, path);
    }
    out.push_str("  0\nENDSEC\n  0\nEOF\n");
    out
}

fn write_polyline(out: &mut String, path: &Path2D) {
    let points = path.points();
    let closed = path.is_closed() && !points.is_empty();
    let count = points.len() + usize::from(closed);
    out.push_str(&format!(
        "  0\nLWPOLYLINE\n  8\n{DXF_LAYER}\n  90\n{count}\n  70\n{}\n",
        u8::from(closed)
    ));
    for point in points.iter().chain(points.first().filter(|_| closed)) {
        out.push_str(&format!(" 10\n{}\n 20\n{}\n 30\n0.0\n", point.x, point.y));
    }
}

impl Cag {
    /// DXF document of the outline paths.
    ///
    /// # Errors
    ///
    /// Fails when the sides do not close into loops.
    pub fn to_dxf(&self, ctx: &Context) -> KernelResult<String> {
        let paths = self.get_outline_paths(ctx)?;
        Ok(paths_to_dxf(&paths))
    }
}
