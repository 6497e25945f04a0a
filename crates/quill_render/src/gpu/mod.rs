//! `wgpu` implementation of [`DeviceSink`]

mod layout;
mod pipeline;
mod target;
mod texture;

pub use target::Backbuffer;
pub use wgpu::{Device, Queue, TextureFormat, TextureView};

use std::collections::HashMap;

use glam::Mat4;
use thiserror::Error;
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, Buffer, BufferDescriptor, BufferUsages,
    CommandEncoderDescriptor, CreateSurfaceError, DeviceDescriptor, IndexFormat, LoadOp,
    Operations, RenderPassColorAttachment, RenderPassDescriptor, RequestAdapterError,
    RequestAdapterOptions, RequestDeviceError, StoreOp, SurfaceTarget, WindowHandle,
    util::{BufferInitDescriptor, DeviceExt, new_instance_with_webgpu_detection},
};

use crate::{
    color::Color,
    device::{BufferId, DeviceSink, PrimitiveKind},
    mode::{RenderMode, RenderModeType, ShaderId},
};
use layout::vertex_slots;
use pipeline::Pipelines;
use texture::Texture;

#[derive(Debug, Error)]
pub enum GpuInitError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] CreateSurfaceError),
    #[error("no compatible adapter: {0}")]
    RequestAdapter(#[from] RequestAdapterError),
    #[error("failed to open device: {0}")]
    RequestDevice(#[from] RequestDeviceError),
    #[error("surface is not supported by the adapter")]
    UnsupportedSurface,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct TransformUniform {
    transform: [[f32; 4]; 4],
}

/// The render modes every [`WgpuDevice`] can draw, one per layout
pub fn builtin_modes() -> [RenderMode; 3] {
    [
        RenderMode::new("color", RenderModeType::Vert3Col4, ShaderId(0)),
        RenderMode::new("textured", RenderModeType::Vert3Col4Tex2, ShaderId(1)),
        RenderMode::new("textured2", RenderModeType::Vert3Col4Tex2x2, ShaderId(2)),
    ]
}

/// Batches drawn straight onto a frame's texture view
///
/// Every `draw_indexed` records its own render pass & submits right away so
/// flushes that rewrite the same buffers reach the GPU in order
pub struct WgpuDevice {
    device: Device,
    queue: Queue,
    pipelines: Pipelines,
    buffers: HashMap<BufferId, Buffer>,
    transform_buffer: Buffer,
    transform_bind_group: BindGroup,
    textures: Vec<Texture>,
    white: Texture,
    channels: [Option<usize>; 2],
    bound: Option<RenderModeType>,
    target: Option<TextureView>,
    clear_color: Color,
}

impl WgpuDevice {
    /// Open a device able to present to `window` and configure its backbuffer
    pub async fn for_window(
        window: impl Into<SurfaceTarget<'static>> + WindowHandle,
        width: u32,
        height: u32,
    ) -> Result<(Self, Backbuffer), GpuInitError> {
        let instance = new_instance_with_webgpu_detection(&Default::default()).await;
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                // Force find adapter that can present to this surface
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await?;
        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                #[cfg(target_arch = "wasm32")]
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let backbuffer = Backbuffer::configure(surface, &adapter, &device, width, height)?;
        let gpu = Self::new(device, queue, backbuffer.format());
        Ok((gpu, backbuffer))
    }

    pub fn new(device: Device, queue: Queue, format: TextureFormat) -> Self {
        let pipelines = Pipelines::new(&device, format);
        let transform_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("Transform Uniform"),
            contents: bytemuck::bytes_of(&TransformUniform {
                transform: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let transform_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: None,
            layout: &pipelines.camera_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: transform_buffer.as_entire_binding(),
            }],
        });
        let white = Texture::white(&device, &queue, &pipelines.texture_layout);

        Self {
            device,
            queue,
            pipelines,
            buffers: HashMap::new(),
            transform_buffer,
            transform_bind_group,
            textures: Vec::new(),
            white,
            channels: [None; 2],
            bound: None,
            target: None,
            clear_color: Color::BLACK,
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn set_clear_color(&mut self, color: impl Into<Color>) {
        self.clear_color = color.into();
    }

    /// Direct the following draws at `view`, cleared to the clear color
    pub fn begin_frame(&mut self, view: TextureView) {
        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Clear Encoder"),
            });
        encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(self.clear_color.into()),
                    store: StoreOp::Store,
                },
            })],
            ..Default::default()
        });
        self.queue.submit(Some(encoder.finish()));
        self.target = Some(view);
    }

    /// Stop drawing into the current frame's view
    pub fn end_frame(&mut self) {
        self.target = None;
    }

    /// Upload a tightly packed RGBA image & return its id
    pub fn add_texture_raw(&mut self, width: u32, height: u32, data: &[u8]) -> usize {
        self.textures.push(Texture::from_rgba(
            &self.device,
            &self.queue,
            &self.pipelines.texture_layout,
            data,
            width,
            height,
        ));
        self.textures.len() - 1
    }

    /// Sample texture `id` through UV channel `channel` (0 or 1); `None` samples white
    pub fn set_texture(&mut self, channel: usize, id: Option<usize>) {
        match self.channels.get_mut(channel) {
            Some(slot) => *slot = id,
            None => log::warn!("UV channel {channel} does not exist"),
        }
    }

    fn texture(&self, channel: usize) -> &Texture {
        self.channels[channel]
            .and_then(|id| self.textures.get(id))
            .unwrap_or(&self.white)
    }
}

impl DeviceSink for WgpuDevice {
    fn allocate(&mut self, buffer: BufferId, bytes: usize) {
        let size = bytes.max(wgpu::COPY_BUFFER_ALIGNMENT as usize) as u64;
        if self.buffers.get(&buffer).is_some_and(|b| b.size() == size) {
            return;
        }
        let usage = if buffer.is_index() {
            BufferUsages::INDEX
        } else {
            BufferUsages::VERTEX
        };
        let gpu_buffer = self.device.create_buffer(&BufferDescriptor {
            label: Some("Batch Buffer"),
            size,
            usage: usage | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.buffers.insert(buffer, gpu_buffer);
    }

    fn upload(&mut self, buffer: BufferId, data: &[u8]) {
        let Some(gpu_buffer) = self.buffers.get(&buffer) else {
            log::warn!("Upload to unallocated buffer {buffer:?}");
            return;
        };
        if data.is_empty() {
            return;
        }
        debug_assert_eq!(data.len() % wgpu::COPY_BUFFER_ALIGNMENT as usize, 0);
        self.queue.write_buffer(gpu_buffer, 0, data);
    }

    fn bind_vertex_layout(&mut self, mode: &RenderMode) {
        self.bound = Some(mode.kind());
    }

    fn draw_indexed(&mut self, kind: PrimitiveKind, indices: BufferId, count: usize) {
        let (Some(target), Some(mode)) = (&self.target, self.bound) else {
            log::warn!("draw_indexed outside of a frame or without a render mode");
            return;
        };
        let Some(pipeline) = self.pipelines.get(mode, kind) else {
            log::warn!("{mode:?} cannot draw {kind:?}");
            return;
        };
        let Some(index_buffer) = self.buffers.get(&indices) else {
            log::warn!("Draw from unallocated buffer {indices:?}");
            return;
        };

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Batch Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("Batch Pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Load,
                        store: StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.transform_bind_group, &[]);
            for channel in 0..mode.uv_channels() {
                self.texture(channel).bind(&mut pass, 1 + channel as u32);
            }
            for (slot, id) in vertex_slots(mode).iter().enumerate() {
                if let Some(buffer) = self.buffers.get(id) {
                    pass.set_vertex_buffer(slot as u32, buffer.slice(..));
                }
            }
            pass.set_index_buffer(index_buffer.slice(..), IndexFormat::Uint32);
            pass.draw_indexed(0..count as u32, 0, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
    }

    fn set_uniform_matrix(&mut self, _shader: ShaderId, name: &str, matrix: &Mat4) {
        log::trace!("Uploading uniform {name}");
        self.queue.write_buffer(
            &self.transform_buffer,
            0,
            bytemuck::bytes_of(&TransformUniform {
                transform: matrix.to_cols_array_2d(),
            }),
        );
    }
}
