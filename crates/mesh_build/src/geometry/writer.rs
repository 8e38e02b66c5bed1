use bevy::prelude::*;

/// Append-only view over one entity's vertex and index buffers.
///
/// Indices pushed through the writer are not checked; validation happens in
/// the finalize step before the data reaches a mesh asset.
pub struct GeometryWriter<'a> {
    vertices: &'a mut Vec<Vec3>,
    indices: &'a mut Vec<u32>,
}

impl<'a> GeometryWriter<'a> {
    pub fn new(vertices: &'a mut Vec<Vec3>, indices: &'a mut Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn reserve(&mut self, vertices: usize, indices: usize) {
        self.vertices.reserve(vertices);
        self.indices.reserve(indices);
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, position: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    pub fn push_index(&mut self, index: u32) {
        self.indices.push(index);
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Append four corners and the two triangles covering them.
    /// Corners are expected in winding order.
    pub fn push_quad(&mut self, corners: [Vec3; 4]) {
        let base = self.push_vertex(corners[0]);
        for corner in &corners[1..] {
            self.push_vertex(*corner);
        }
        self.push_triangle(base, base + 1, base + 2);
        self.push_triangle(base, base + 2, base + 3);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_vertex_returns_sequential_indices() {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let mut writer = GeometryWriter::new(&mut vertices, &mut indices);
        assert_eq!(writer.push_vertex(Vec3::ZERO), 0);
        assert_eq!(writer.push_vertex(Vec3::X), 1);
        assert_eq!(writer.vertex_count(), 2);
    }

    #[test]
    fn test_push_quad_offsets_by_existing_vertices() {
        let mut vertices = vec![Vec3::ZERO, Vec3::ONE];
        let mut indices = Vec::new();
        let mut writer = GeometryWriter::new(&mut vertices, &mut indices);
        writer.push_quad([Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0), Vec3::Z]);
        assert_eq!(writer.vertex_count(), 6);
        assert_eq!(writer.index_count(), 6);
        assert_eq!(indices, vec![2, 3, 4, 2, 4, 5]);
    }
}
