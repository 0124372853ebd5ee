//! # AMF Export
//!
//! Vertex fragments for the `<vertices>` block of an AMF mesh.

use crate::geometry::vertex::Vertex;

impl Vertex {
    /// `<vertex><coordinates>…</coordinates></vertex>` element.
    pub fn to_amf_string(&self) -> String {
        let pos = self.pos();
        format!(
            "<vertex><coordinates><x>{}</x><y>{}</y><z>{}</z></coordinates></vertex>",
            pos.x, pos.y, pos.z
        )
    }
}
