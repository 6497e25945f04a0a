use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

use crate::{device::BufferId, mode::RenderModeType};

/// Attribute buffers bound as vertex slots, in slot order
///
/// Each attribute lives in its own non-interleaved buffer:
/// - slot 0, location 0: `vec3<f32>` position & depth
/// - slot 1, location 1: `vec4<f32>` color
/// - slot 2, location 2: `vec2<f32>` first UV channel
/// - slot 3, location 3: `vec2<f32>` second UV channel
pub fn vertex_slots(kind: RenderModeType) -> &'static [BufferId] {
    const SLOTS: [BufferId; 4] = [
        BufferId::Vertices,
        BufferId::Colors,
        BufferId::Uv0,
        BufferId::Uv1,
    ];
    &SLOTS[..2 + kind.uv_channels()]
}

const POSITION: [VertexAttribute; 1] = [VertexAttribute {
    offset: 0,
    shader_location: 0,
    format: VertexFormat::Float32x3,
}];
const COLOR: [VertexAttribute; 1] = [VertexAttribute {
    offset: 0,
    shader_location: 1,
    format: VertexFormat::Float32x4,
}];
const UV0: [VertexAttribute; 1] = [VertexAttribute {
    offset: 0,
    shader_location: 2,
    format: VertexFormat::Float32x2,
}];
const UV1: [VertexAttribute; 1] = [VertexAttribute {
    offset: 0,
    shader_location: 3,
    format: VertexFormat::Float32x2,
}];

fn slot(id: BufferId) -> VertexBufferLayout<'static> {
    let (stride, attributes): (u64, &'static [VertexAttribute]) = match id {
        BufferId::Vertices => (12, &POSITION),
        BufferId::Colors => (16, &COLOR),
        BufferId::Uv0 => (8, &UV0),
        _ => (8, &UV1),
    };
    VertexBufferLayout {
        array_stride: stride,
        step_mode: VertexStepMode::Vertex,
        attributes,
    }
}

/// Buffer layouts a pipeline for `kind` is created with
pub fn buffer_layouts(kind: RenderModeType) -> Vec<VertexBufferLayout<'static>> {
    vertex_slots(kind).iter().map(|&id| slot(id)).collect()
}
