use std::collections::HashMap;

use wgpu::{
    BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType, BlendState,
    ColorTargetState, ColorWrites, Device, FragmentState, PipelineLayoutDescriptor,
    PrimitiveState, PrimitiveTopology, RenderPipeline, RenderPipelineDescriptor,
    ShaderModuleDescriptor, ShaderStages, TextureFormat, VertexState, include_wgsl,
};

use super::{layout::buffer_layouts, texture::Texture};
use crate::{device::PrimitiveKind, mode::RenderModeType};

/// Every pipeline the device can draw with, keyed by layout & topology
///
/// The color-only layout gets a line, point & triangle pipeline; the textured
/// layouts only draw triangles
pub struct Pipelines {
    pipelines: HashMap<(RenderModeType, PrimitiveKind), RenderPipeline>,
    pub texture_layout: BindGroupLayout,
    pub camera_layout: BindGroupLayout,
}

impl Pipelines {
    pub fn new(device: &Device, surface_format: TextureFormat) -> Self {
        let texture_layout = Texture::create_bind_group_layout(device);
        let camera_layout = create_camera_bind_group_layout(device);

        let mut pipelines = HashMap::new();
        for kind in RenderModeType::ALL {
            let shader = device.create_shader_module(shader_source(kind));
            let mut groups = vec![&camera_layout];
            groups.extend(std::iter::repeat_n(&texture_layout, kind.uv_channels()));
            let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some("Batch Pipeline Layout"),
                bind_group_layouts: &groups,
                push_constant_ranges: &[],
            });

            for &primitive in topologies(kind) {
                let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
                    label: Some("Batch Pipeline"),
                    layout: Some(&layout),
                    vertex: VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        buffers: &buffer_layouts(kind),
                        compilation_options: Default::default(),
                    },
                    primitive: PrimitiveState {
                        topology: topology(primitive),
                        ..Default::default()
                    },
                    depth_stencil: None,
                    multisample: Default::default(),
                    fragment: Some(FragmentState {
                        module: &shader,
                        entry_point: Some("fs_main"),
                        targets: &[Some(ColorTargetState {
                            format: surface_format,
                            blend: Some(BlendState::ALPHA_BLENDING),
                            write_mask: ColorWrites::ALL,
                        })],
                        compilation_options: Default::default(),
                    }),
                    multiview: None,
                    cache: None,
                });
                pipelines.insert((kind, primitive), pipeline);
            }
        }

        Self {
            pipelines,
            texture_layout,
            camera_layout,
        }
    }

    pub fn get(&self, kind: RenderModeType, primitive: PrimitiveKind) -> Option<&RenderPipeline> {
        self.pipelines.get(&(kind, primitive))
    }
}

fn shader_source(kind: RenderModeType) -> ShaderModuleDescriptor<'static> {
    match kind {
        RenderModeType::Vert3Col4 => include_wgsl!("shaders/color.wgsl"),
        RenderModeType::Vert3Col4Tex2 => include_wgsl!("shaders/textured.wgsl"),
        RenderModeType::Vert3Col4Tex2x2 => include_wgsl!("shaders/textured2.wgsl"),
    }
}

fn topologies(kind: RenderModeType) -> &'static [PrimitiveKind] {
    match kind {
        RenderModeType::Vert3Col4 => &[
            PrimitiveKind::Lines,
            PrimitiveKind::Points,
            PrimitiveKind::Triangles,
        ],
        _ => &[PrimitiveKind::Triangles],
    }
}

fn topology(primitive: PrimitiveKind) -> PrimitiveTopology {
    match primitive {
        PrimitiveKind::Lines => PrimitiveTopology::LineList,
        PrimitiveKind::Points => PrimitiveTopology::PointList,
        PrimitiveKind::Triangles => PrimitiveTopology::TriangleList,
    }
}

/// Bind group layout of the transform uniform, group 0 of every pipeline
fn create_camera_bind_group_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("Camera Bind Group Layout"),
        entries: &[BindGroupLayoutEntry {
            binding: 0,
            visibility: ShaderStages::VERTEX,
            ty: BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}
