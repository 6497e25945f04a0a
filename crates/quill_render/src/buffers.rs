use crate::device::{BufferId, PrimitiveKind};

/// CPU-side geometry of one batch generation
///
/// All attribute buffers advance together: vertex ordinal `i` owns the `i`th
/// position, color & UV slots. Every UV channel is written for every vertex
/// (zeros when the emitter has none) so the buffers never drift apart; the
/// device only receives the channels the active mode reads
#[derive(Debug, Clone)]
pub struct GeometryBuffers {
    capacity: usize,
    vertices: Vec<f32>,
    colors: Vec<f32>,
    uv0: Vec<f32>,
    uv1: Vec<f32>,
    lines: Vec<u32>,
    points: Vec<u32>,
    triangles: Vec<u32>,
    cost: usize,
}

impl GeometryBuffers {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            vertices: Vec::with_capacity(capacity * 3),
            colors: Vec::with_capacity(capacity * 4),
            uv0: Vec::with_capacity(capacity * 2),
            uv1: Vec::with_capacity(capacity * 2),
            lines: Vec::with_capacity(capacity),
            points: Vec::with_capacity(capacity),
            triangles: Vec::with_capacity(capacity),
            cost: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes the device buffer behind `id` must hold
    pub fn byte_size(&self, id: BufferId) -> usize {
        let per_slot = id.components().unwrap_or(1);
        self.capacity * per_slot * 4
    }

    /// Number of vertices written since the last reset
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Append a vertex and return its ordinal
    pub fn push_vertex(&mut self, position: [f32; 3], color: [f32; 4], uvs: [[f32; 2]; 2]) -> u32 {
        let ordinal = self.vertex_count();
        debug_assert!(
            ordinal < self.capacity,
            "vertex buffer overflow: {ordinal} >= {}",
            self.capacity
        );
        self.vertices.extend_from_slice(&position);
        self.colors.extend_from_slice(&color);
        self.uv0.extend_from_slice(&uvs[0]);
        self.uv1.extend_from_slice(&uvs[1]);
        ordinal as u32
    }

    /// Position of an already written vertex
    pub fn position(&self, ordinal: u32) -> [f32; 3] {
        let i = ordinal as usize * 3;
        [self.vertices[i], self.vertices[i + 1], self.vertices[i + 2]]
    }

    pub fn color(&self, ordinal: u32) -> [f32; 4] {
        let i = ordinal as usize * 4;
        [
            self.colors[i],
            self.colors[i + 1],
            self.colors[i + 2],
            self.colors[i + 3],
        ]
    }

    pub fn push_line(&mut self, a: u32, b: u32) {
        Self::push_indices(&mut self.lines, self.capacity, &[a, b]);
    }

    pub fn push_point(&mut self, a: u32) {
        Self::push_indices(&mut self.points, self.capacity, &[a]);
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        Self::push_indices(&mut self.triangles, self.capacity, &[a, b, c]);
    }

    fn push_indices(stream: &mut Vec<u32>, capacity: usize, indices: &[u32]) {
        debug_assert!(
            stream.len() + indices.len() <= capacity,
            "index buffer overflow: {} + {} > {capacity}",
            stream.len(),
            indices.len()
        );
        stream.extend_from_slice(indices);
    }

    pub fn indices(&self, kind: PrimitiveKind) -> &[u32] {
        match kind {
            PrimitiveKind::Lines => &self.lines,
            PrimitiveKind::Points => &self.points,
            PrimitiveKind::Triangles => &self.triangles,
        }
    }

    /// Raw f32 contents of an attribute buffer
    ///
    /// Index streams are read through [`GeometryBuffers::indices`]; passing one
    /// here is a programming error
    pub fn attribute(&self, id: BufferId) -> &[f32] {
        match id {
            BufferId::Vertices => &self.vertices,
            BufferId::Colors => &self.colors,
            BufferId::Uv0 => &self.uv0,
            BufferId::Uv1 => &self.uv1,
            BufferId::LineIndices | BufferId::PointIndices | BufferId::TriangleIndices => {
                unreachable!("{id:?} is an index stream, not an attribute")
            }
        }
    }

    /// Whether `vertices` more vertices and `indices` more `kind` indices fit
    pub fn has_room(&self, vertices: usize, kind: PrimitiveKind, indices: usize) -> bool {
        self.vertex_count() + vertices <= self.capacity
            && self.indices(kind).len() + indices <= self.capacity
    }

    /// Accumulated index cost since the last reset
    pub fn cost(&self) -> usize {
        self.cost
    }

    pub fn add_cost(&mut self, cost: usize) {
        self.cost += cost;
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Rewind every cursor to zero
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.colors.clear();
        self.uv0.clear();
        self.uv1.clear();
        self.lines.clear();
        self.points.clear();
        self.triangles.clear();
        self.cost = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn attributes_stay_aligned() {
        let mut buf = GeometryBuffers::new(16);
        let a = buf.push_vertex([1.0, 2.0, -15.0], WHITE, [[0.0; 2]; 2]);
        let b = buf.push_vertex([3.0, 4.0, -15.0], [0.5; 4], [[1.0, 0.5], [0.0; 2]]);
        buf.push_line(a, b);

        assert_eq!((a, b), (0, 1));
        assert_eq!(buf.vertex_count(), 2);
        assert_eq!(buf.attribute(BufferId::Colors).len(), 8);
        assert_eq!(buf.attribute(BufferId::Uv1).len(), 4);
        assert_eq!(buf.position(b), [3.0, 4.0, -15.0]);
        assert_eq!(buf.indices(PrimitiveKind::Lines), &[0, 1]);
    }

    #[test]
    fn reset_rewinds_cursors() {
        let mut buf = GeometryBuffers::new(16);
        let a = buf.push_vertex([0.0; 3], WHITE, [[0.0; 2]; 2]);
        buf.push_point(a);
        buf.add_cost(4);
        buf.reset();

        assert!(buf.is_empty());
        assert_eq!(buf.cost(), 0);
        assert!(buf.indices(PrimitiveKind::Points).is_empty());
        assert_eq!(buf.push_vertex([0.0; 3], WHITE, [[0.0; 2]; 2]), 0);
    }

    #[test]
    fn room_counts_vertices_and_indices() {
        let mut buf = GeometryBuffers::new(4);
        let a = buf.push_vertex([0.0; 3], WHITE, [[0.0; 2]; 2]);
        let b = buf.push_vertex([0.0; 3], WHITE, [[0.0; 2]; 2]);
        buf.push_line(a, b);

        assert!(buf.has_room(2, PrimitiveKind::Lines, 2));
        assert!(!buf.has_room(3, PrimitiveKind::Points, 0));
        assert!(!buf.has_room(0, PrimitiveKind::Lines, 4));
        assert!(buf.has_room(0, PrimitiveKind::Triangles, 4));
    }

    #[test]
    #[should_panic(expected = "index stream")]
    fn index_streams_are_not_attributes() {
        let buf = GeometryBuffers::new(4);
        buf.attribute(BufferId::TriangleIndices);
    }

    #[test]
    fn byte_sizes_follow_components() {
        let buf = GeometryBuffers::new(100);
        assert_eq!(buf.byte_size(BufferId::Vertices), 1200);
        assert_eq!(buf.byte_size(BufferId::Colors), 1600);
        assert_eq!(buf.byte_size(BufferId::Uv0), 800);
        assert_eq!(buf.byte_size(BufferId::TriangleIndices), 400);
    }

    #[test]
    #[should_panic(expected = "vertex buffer overflow")]
    #[cfg(debug_assertions)]
    fn overflow_is_fatal_in_debug() {
        let mut buf = GeometryBuffers::new(1);
        buf.push_vertex([0.0; 3], WHITE, [[0.0; 2]; 2]);
        buf.push_vertex([0.0; 3], WHITE, [[0.0; 2]; 2]);
    }
}
