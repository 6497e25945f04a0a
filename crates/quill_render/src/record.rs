//! Headless collaborators that remember everything the core asks of them
//!
//! Useful for running the batching core without a GPU and for asserting on
//! draw order, index streams & flush counts

use crate::{
    device::{BufferId, DeviceSink, DisplaySurface, PrimitiveKind},
    mode::{RenderMode, RenderModeType, ShaderId},
};
use glam::Mat4;
use std::collections::HashMap;

/// One `draw_indexed` call with the geometry it referenced
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub kind: PrimitiveKind,
    pub mode: String,
    pub mode_type: RenderModeType,
    pub indices: Vec<u32>,
    /// Vertex positions uploaded for this batch generation
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    /// UV channels as last uploaded; empty when the mode does not read them
    pub uv0: Vec<[f32; 2]>,
    pub uv1: Vec<[f32; 2]>,
}

impl DrawCall {
    /// Position of every index, in draw order
    pub fn resolved(&self) -> Vec<[f32; 3]> {
        self.indices
            .iter()
            .map(|&i| self.positions[i as usize])
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UniformWrite {
    pub shader: ShaderId,
    pub name: String,
    pub matrix: Mat4,
}

#[derive(Debug, Default)]
pub struct RecordingDevice {
    contents: HashMap<BufferId, Vec<u8>>,
    sizes: HashMap<BufferId, usize>,
    bound: Option<RenderMode>,
    draws: Vec<DrawCall>,
    uniforms: Vec<UniformWrite>,
    allocations: usize,
    binds: usize,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    pub fn uniforms(&self) -> &[UniformWrite] {
        &self.uniforms
    }

    pub fn bound_mode(&self) -> Option<&RenderMode> {
        self.bound.as_ref()
    }

    /// Byte size of the last allocation of `buffer`
    pub fn allocated(&self, buffer: BufferId) -> Option<usize> {
        self.sizes.get(&buffer).copied()
    }

    pub fn allocation_count(&self) -> usize {
        self.allocations
    }

    pub fn bind_count(&self) -> usize {
        self.binds
    }

    pub fn clear(&mut self) {
        self.draws.clear();
        self.uniforms.clear();
    }

    fn floats(&self, buffer: BufferId) -> Vec<f32> {
        self.contents
            .get(&buffer)
            .map(|bytes| {
                bytes
                    .chunks_exact(4)
                    .map(bytemuck::pod_read_unaligned::<f32>)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn uvs(&self, buffer: BufferId) -> Vec<[f32; 2]> {
        self.floats(buffer)
            .chunks_exact(2)
            .map(|c| [c[0], c[1]])
            .collect()
    }
}

impl DeviceSink for RecordingDevice {
    fn allocate(&mut self, buffer: BufferId, bytes: usize) {
        self.allocations += 1;
        self.sizes.insert(buffer, bytes);
        self.contents.insert(buffer, Vec::new());
    }

    fn upload(&mut self, buffer: BufferId, data: &[u8]) {
        if let Some(&size) = self.sizes.get(&buffer) {
            assert!(
                data.len() <= size,
                "upload of {} bytes into {buffer:?} sized {size}",
                data.len()
            );
        }
        self.contents.insert(buffer, data.to_vec());
    }

    fn bind_vertex_layout(&mut self, mode: &RenderMode) {
        self.binds += 1;
        self.bound = Some(mode.clone());
    }

    fn draw_indexed(&mut self, kind: PrimitiveKind, indices: BufferId, count: usize) {
        let Some(mode) = &self.bound else {
            panic!("draw_indexed without a bound render mode");
        };
        let indices = self
            .contents
            .get(&indices)
            .map(|bytes| {
                bytes
                    .chunks_exact(4)
                    .take(count)
                    .map(bytemuck::pod_read_unaligned::<u32>)
                    .collect()
            })
            .unwrap_or_default();
        let positions = self
            .floats(BufferId::Vertices)
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        let colors = self
            .floats(BufferId::Colors)
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();
        let uv0 = self.uvs(BufferId::Uv0);
        let uv1 = self.uvs(BufferId::Uv1);

        self.draws.push(DrawCall {
            kind,
            mode: mode.name().to_owned(),
            mode_type: mode.kind(),
            indices,
            positions,
            colors,
            uv0,
            uv1,
        });
    }

    fn set_uniform_matrix(&mut self, shader: ShaderId, name: &str, matrix: &Mat4) {
        self.uniforms.push(UniformWrite {
            shader,
            name: name.to_owned(),
            matrix: *matrix,
        });
    }
}

/// Display that only counts presents & remembers its settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessDisplay {
    pub presented: usize,
    pub size: (u32, u32),
    pub cursor_visible: bool,
    pub vsync: bool,
}

impl HeadlessDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            presented: 0,
            size: (width, height),
            cursor_visible: true,
            vsync: true,
        }
    }
}

impl DisplaySurface for HeadlessDisplay {
    fn present(&mut self) {
        self.presented += 1;
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn set_vsync(&mut self, enabled: bool) {
        self.vsync = enabled;
    }
}
