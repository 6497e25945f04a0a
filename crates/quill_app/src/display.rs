use std::sync::Arc;

use quill_render::{
    DisplaySurface,
    gpu::{Backbuffer, GpuInitError, TextureView, WgpuDevice},
};
use winit::{dpi::PhysicalSize, window::Window};

/// A winit window presenting through a `wgpu` swapchain
pub struct WindowDisplay {
    window: Arc<Window>,
    backbuffer: Backbuffer,
}

impl WindowDisplay {
    /// Open a GPU device for `window` & wrap the window as a display
    pub async fn create(window: Arc<Window>) -> Result<(WgpuDevice, Self), GpuInitError> {
        let size = window.inner_size();
        let (device, backbuffer) =
            WgpuDevice::for_window(window.clone(), size.width, size.height).await?;
        Ok((device, Self { window, backbuffer }))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> (u32, u32) {
        self.backbuffer.size()
    }

    /// View of the next swapchain texture, `None` if the frame must be skipped
    pub fn acquire(&mut self) -> Option<TextureView> {
        self.backbuffer.acquire()
    }

    /// Follow a size change the window already went through
    pub fn resized(&mut self, width: u32, height: u32) {
        self.backbuffer.resize(width, height);
    }
}

impl DisplaySurface for WindowDisplay {
    fn present(&mut self) {
        self.window.pre_present_notify();
        self.backbuffer.present();
    }

    fn set_size(&mut self, width: u32, height: u32) {
        // Some platforms apply the size later & report it through a resize event
        if let Some(size) = self
            .window
            .request_inner_size(PhysicalSize::new(width, height))
        {
            self.backbuffer.resize(size.width, size.height);
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.window.set_cursor_visible(visible);
    }

    fn set_vsync(&mut self, on: bool) {
        self.backbuffer.set_vsync(on);
    }
}
