use crate::{
    buffers::GeometryBuffers,
    cache::SinCosCache,
    camera::Camera,
    color::Color,
    config::GraphicsConfig,
    device::{BufferId, DeviceSink, DisplaySurface},
    line::LineState,
    mode::{RenderModeId, RenderModeRegistry},
    stats::FrameStats,
    transform,
    viewport::Viewport,
};
use glam::{DVec2, Mat4};

/// Projection the next batches are drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Space {
    World,
    Screen,
}

/// The batching context: one per device, owning all geometry & camera state
///
/// Created when the device comes up and torn down with [`Graphics::shutdown`].
/// Single threaded; callers must balance every `begin_render_batch` with one
/// `end_render_batch`
pub struct Graphics<D: DeviceSink, S: DisplaySurface> {
    pub(crate) config: GraphicsConfig,
    pub(crate) device: D,
    display: S,
    pub(crate) registry: RenderModeRegistry,
    pub(crate) stack: Vec<RenderModeId>,
    pub(crate) current: Option<RenderModeId>,
    pub(crate) buffers: GeometryBuffers,
    pub(crate) line: LineState,
    pub(crate) cache: SinCosCache,
    camera: Camera,
    viewport: Viewport,
    space: Space,
    pub(crate) color: Color,
    pub(crate) depth: f32,
    pub(crate) stats: FrameStats,
    last_stats: FrameStats,
}

impl<D: DeviceSink, S: DisplaySurface> Graphics<D, S> {
    pub fn new(device: D, display: S, config: GraphicsConfig) -> Self {
        let viewport = Viewport::new(
            config.width,
            config.height,
            config.px_per_meter,
            config.near,
            config.far,
        );
        Self {
            buffers: GeometryBuffers::new(config.index_capacity),
            cache: SinCosCache::new(config.max_cache_size),
            depth: config.depth,
            config,
            device,
            display,
            registry: RenderModeRegistry::new(),
            stack: Vec::new(),
            current: None,
            line: LineState::default(),
            camera: Camera::default(),
            viewport,
            space: Space::World,
            color: Color::WHITE,
            stats: FrameStats::default(),
            last_stats: FrameStats::default(),
        }
    }

    /// Bring the context into a drawable state
    ///
    /// Hides the cursor, turns vsync off, allocates the device buffers, selects
    /// world space & makes the first registered render mode current
    pub fn init(&mut self) {
        self.display.set_cursor_visible(false);
        self.display.set_vsync(false);
        self.allocate_buffers();

        self.current = self.registry.first();
        match self.current {
            Some(id) => {
                let mode = self.registry.get(id);
                log::info!("Graphics initialised, default render mode \"{}\"", mode.name());
                self.device.bind_vertex_layout(mode);
            }
            None => log::info!("Graphics initialised without any render mode"),
        }
        self.setup_world_space();
    }

    /// Tear down the context, handing back the device & display
    pub fn shutdown(self) -> (D, S) {
        if !self.stack.is_empty() {
            log::warn!(
                "Shutting down with {} render batch(es) still open",
                self.stack.len()
            );
        }
        (self.device, self.display)
    }

    pub fn registry(&self) -> &RenderModeRegistry {
        &self.registry
    }

    /// Modes must be registered before the first batch that names them
    pub fn registry_mut(&mut self) -> &mut RenderModeRegistry {
        &mut self.registry
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn display(&self) -> &S {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut S {
        &mut self.display
    }

    pub fn config(&self) -> &GraphicsConfig {
        &self.config
    }

    /// Present the frame and start a fresh set of counters
    pub fn swap_buffers(&mut self) {
        self.display.present();
        self.last_stats = std::mem::take(&mut self.stats);
    }

    /// Counters of the frame in progress
    pub fn frame_stats(&self) -> FrameStats {
        self.stats
    }

    /// Counters of the last presented frame
    pub fn last_frame_stats(&self) -> FrameStats {
        self.last_stats
    }

    pub(crate) fn allocate_buffers(&mut self) {
        for id in BufferId::ALL {
            self.device.allocate(id, self.buffers.byte_size(id));
        }
    }

    // Viewport

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, left: f64, right: f64, bottom: f64, top: f64) {
        self.viewport.set_planes(left, right, bottom, top);
    }

    /// Recompute the viewport planes for a new screen resolution
    pub fn resize_viewport(&mut self, width: u32, height: u32) {
        self.viewport.resize(width, height, self.config.px_per_meter);
        log::info!(
            "Viewport changed to {}m x {}m",
            self.viewport.width_m(),
            self.viewport.height_m()
        );
        self.apply_camera_movement();
    }

    /// Resize the viewport and the display together
    pub fn resize_window(&mut self, width: u32, height: u32) {
        self.resize_viewport(width, height);
        self.display.set_size(width, height);
    }

    pub fn setup_world_space(&mut self) {
        self.space = Space::World;
        self.apply_camera_movement();
    }

    /// Draw in pixels from the top-left corner, ignoring the camera
    pub fn setup_screen_space(&mut self) {
        self.space = Space::Screen;
        self.apply_camera_movement();
    }

    /// Upload the projection of the current space to the bound shader
    pub fn apply_camera_movement(&mut self) {
        let matrix = self.transform_matrix();
        if let Some(id) = self.current {
            let shader = self.device.shader_handle(self.registry.get(id));
            self.device
                .set_uniform_matrix(shader, "matTransform", &matrix);
        }
    }

    pub fn transform_matrix(&self) -> Mat4 {
        match self.space {
            Space::World => transform::world_matrix(&self.camera, &self.viewport),
            Space::Screen => transform::screen_matrix(&self.viewport),
        }
    }

    // Camera

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn cam_pos(&self) -> DVec2 {
        self.camera.position()
    }

    pub fn cam_angle(&self) -> f64 {
        self.camera.angle()
    }

    pub fn cam_zoom(&self) -> f64 {
        self.camera.zoom()
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    pub fn rotate_camera_by(&mut self, angle: f64) {
        self.camera.rotate_by(angle);
    }

    pub fn rotate_camera_to(&mut self, angle: f64) {
        self.camera.rotate_to(angle);
    }

    /// Move the camera by `delta` in its own rotated frame
    pub fn translate_camera_by(&mut self, delta: DVec2) {
        self.camera.translate_by(delta);
    }

    pub fn translate_camera_to(&mut self, position: DVec2) {
        self.camera.translate_to(position);
    }

    pub fn zoom_camera_by(&mut self, factor: f64) {
        self.camera.zoom_by(factor);
    }

    pub fn zoom_camera_to(&mut self, zoom: f64) {
        self.camera.zoom_to(zoom);
    }

    pub fn screen_to_world(&self, screen: DVec2) -> DVec2 {
        transform::screen_to_world(&self.camera, &self.viewport, screen)
    }

    pub fn screen_to_world_xy(&self, x: f64, y: f64) -> DVec2 {
        transform::screen_to_world_xy(&self.camera, &self.viewport, x, y)
    }

    pub fn world_to_screen(&self, world: DVec2) -> DVec2 {
        transform::world_to_screen(&self.camera, &self.viewport, world)
    }

    /// On-screen pixels per world meter at the current zoom
    pub fn resolution_px_per_meter(&self) -> f64 {
        transform::resolution_px_per_meter(&self.camera, &self.viewport)
    }

    // Paint state

    pub fn set_color(&mut self, color: impl Into<Color>) {
        self.color = color.into();
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth;
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Tabulate sin/cos for circles drawn with `cached = true`
    pub fn cache_sin_cos(&mut self, segments: usize) {
        self.cache.fill(segments);
    }
}
