use wgpu::{
    Adapter, Device, PresentMode, Surface, SurfaceConfiguration, SurfaceError, SurfaceTexture,
    TextureFormat, TextureView,
};

use super::GpuInitError;

/// Swapchain of a window surface
pub struct Backbuffer {
    surface: Surface<'static>,
    config: SurfaceConfiguration,
    device: Device,
    frame: Option<SurfaceTexture>,
}

impl Backbuffer {
    pub(super) fn configure(
        surface: Surface<'static>,
        adapter: &Adapter,
        device: &Device,
        w: u32,
        h: u32,
    ) -> Result<Self, GpuInitError> {
        // WebGPU throws 'size is zero' if not clamped
        let mut config = surface
            .get_default_config(adapter, w.max(1), h.max(1))
            .ok_or(GpuInitError::UnsupportedSurface)?;
        config.present_mode = PresentMode::AutoVsync;
        surface.configure(device, &config);
        Ok(Self {
            surface,
            config,
            device: device.clone(),
            frame: None,
        })
    }

    pub fn format(&self) -> TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Grab the next swapchain texture, `None` when the surface is lost or outdated
    pub fn acquire(&mut self) -> Option<TextureView> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::OutOfMemory) => panic!("Out of GPU memory!"),
            Err(e) => {
                log::warn!("Failed to acquire surface texture: {e}");
                self.surface.configure(&self.device, &self.config);
                return None;
            }
        };
        let view = surface_texture.texture.create_view(&Default::default());
        self.frame = Some(surface_texture);
        Some(view)
    }

    /// Present the texture handed out by the last `acquire`
    pub fn present(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.present();
        }
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        (self.config.width, self.config.height) = (w.max(1), h.max(1));
        self.surface.configure(&self.device, &self.config);
    }

    /// `true` selects [`PresentMode::Fifo`], `false` [`PresentMode::AutoNoVsync`]
    pub fn set_vsync(&mut self, on: bool) {
        self.config.present_mode = if on {
            PresentMode::Fifo
        } else {
            PresentMode::AutoNoVsync
        };
        self.surface.configure(&self.device, &self.config);
    }
}
