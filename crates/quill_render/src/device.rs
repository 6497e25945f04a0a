//! Seams between the batching core and the outside world
//!
//! [`DeviceSink`] receives buffer contents & draw calls, [`DisplaySurface`]
//! owns the presented frame. Both are infallible from the core's point of view

use crate::mode::{RenderMode, ShaderId};
use glam::Mat4;

/// Logical buffers the core fills every batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferId {
    Vertices,
    Colors,
    Uv0,
    Uv1,
    LineIndices,
    PointIndices,
    TriangleIndices,
}

impl BufferId {
    pub const ALL: [BufferId; 7] = [
        BufferId::Vertices,
        BufferId::Colors,
        BufferId::Uv0,
        BufferId::Uv1,
        BufferId::LineIndices,
        BufferId::PointIndices,
        BufferId::TriangleIndices,
    ];

    /// f32 components per vertex, `None` for index streams
    pub fn components(self) -> Option<usize> {
        match self {
            Self::Vertices => Some(3),
            Self::Colors => Some(4),
            Self::Uv0 | Self::Uv1 => Some(2),
            _ => None,
        }
    }

    pub fn is_index(self) -> bool {
        self.components().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Lines,
    Points,
    Triangles,
}

impl PrimitiveKind {
    /// Index stream holding primitives of this kind
    pub fn index_buffer(self) -> BufferId {
        match self {
            Self::Lines => BufferId::LineIndices,
            Self::Points => BufferId::PointIndices,
            Self::Triangles => BufferId::TriangleIndices,
        }
    }

    /// Indices consumed per primitive
    pub fn arity(self) -> usize {
        match self {
            Self::Lines => 2,
            Self::Points => 1,
            Self::Triangles => 3,
        }
    }
}

/// Device-side buffers & draw submission
pub trait DeviceSink {
    /// Size `buffer` for `bytes` bytes; its contents are undefined until the next upload
    fn allocate(&mut self, buffer: BufferId, bytes: usize);
    /// Overwrite the start of `buffer` with `data`
    fn upload(&mut self, buffer: BufferId, data: &[u8]);
    /// Make `mode`'s attribute layout & shader current
    fn bind_vertex_layout(&mut self, mode: &RenderMode);
    /// Draw `count` indices of `indices` as `kind` with the bound layout
    fn draw_indexed(&mut self, kind: PrimitiveKind, indices: BufferId, count: usize);
    /// Resolve the program a mode draws with
    fn shader_handle(&self, mode: &RenderMode) -> ShaderId {
        mode.shader()
    }
    fn set_uniform_matrix(&mut self, shader: ShaderId, name: &str, matrix: &Mat4);
}

/// Window or offscreen target the frame is presented on
pub trait DisplaySurface {
    fn present(&mut self);
    fn set_size(&mut self, width: u32, height: u32);
    fn set_cursor_visible(&mut self, visible: bool);
    fn set_vsync(&mut self, enabled: bool);
}
