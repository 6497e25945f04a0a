use std::sync::Arc;

use quill_app::{AppConfig, AppHandler, AppRunner, Window, WindowDisplay, time::FrameTimer};
use quill_render::{
    Color, DisplaySurface, FrameStats, Graphics, GraphicsConfig, RenderMode,
    gpu::{WgpuDevice, builtin_modes},
};

pub use quill_app::{EventLoopError, WindowEvent};

#[cfg(feature = "log")]
use quill_app::init_logger;

/// The context handed to every frame of an [`App`]
pub type WindowGraphics = Graphics<WgpuDevice, WindowDisplay>;

type SetupFn = dyn FnOnce(&mut WindowGraphics);
type UpdateFn = dyn FnMut(&mut WindowGraphics, &FrameTimer);
type QuitFn = dyn FnMut(FrameStats);

/// Windowed application driving a [`WindowGraphics`] context
///
/// The context comes up with the `color`, `textured` & `textured2` render
/// modes registered, followed by any added through [`App::render_mode`]
pub struct App {
    config: Option<AppConfig>,
    graphics: GraphicsConfig,
    modes: Vec<RenderMode>,
    clear_color: Color,
    vsync: bool,
    setup: Option<Box<SetupFn>>,
    update: Option<Box<UpdateFn>>,
    on_quit: Option<Box<QuitFn>>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create a new [`App`]
    pub fn new() -> Self {
        Self {
            config: Some(AppConfig::default()),
            graphics: GraphicsConfig::default(),
            modes: Vec::new(),
            clear_color: Color::BLACK,
            vsync: false,
            setup: None,
            update: None,
            on_quit: None,
        }
    }

    /// Set application title
    pub fn title(mut self, title: &str) -> Self {
        if let Some(c) = self.config.as_mut() {
            c.title = title.into();
        }
        self
    }

    /// Set window size (width, height in pixels)
    pub fn screen_size(mut self, width: u32, height: u32) -> Self {
        if let Some(c) = self.config.as_mut() {
            c.width = Some(width);
            c.height = Some(height);
        }
        self
    }

    /// Enable or disable window resizing (defaults to true)
    pub fn resizable(mut self, resizable: bool) -> Self {
        if let Some(c) = self.config.as_mut() {
            c.resizable = resizable;
        }
        self
    }

    /// Enable or disable vsync (defaults to false)
    pub fn vsync(mut self, enabled: bool) -> Self {
        self.vsync = enabled;
        self
    }

    /// Replace the batching settings; the screen size follows the window
    pub fn graphics_config(mut self, config: GraphicsConfig) -> Self {
        self.graphics = config;
        self
    }

    /// Register an extra render mode after the built-in ones
    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.modes.push(mode);
        self
    }

    pub fn clear_color(mut self, color: impl Into<Color>) -> Self {
        self.clear_color = color.into();
        self
    }

    /// Sets a closure to call once the context is initialised
    pub fn setup(mut self, f: impl FnOnce(&mut WindowGraphics) + 'static) -> Self {
        self.setup = Some(Box::new(f));
        self
    }

    /// Sets a closure to call with the last frame's counters when the app is quitting
    pub fn on_quit(mut self, f: impl FnMut(FrameStats) + 'static) -> Self {
        self.on_quit = Some(Box::new(f));
        self
    }

    /// Run the app with a per-frame update closure
    pub fn run(
        mut self,
        update: impl FnMut(&mut WindowGraphics, &FrameTimer) + 'static,
    ) -> Result<(), EventLoopError> {
        #[cfg(feature = "log")]
        init_logger();

        self.update = Some(Box::new(update));
        let config = self.config.take().unwrap_or_default();
        AppRunner::new(self, config).run()
    }
}

impl AppHandler<WindowGraphics> for App {
    async fn with_resource(&mut self, window: Arc<Window>) -> WindowGraphics {
        let (mut device, display) = match WindowDisplay::create(window).await {
            Ok(gpu) => gpu,
            Err(e) => panic!("Failed to initialise the GPU: {e}"),
        };
        device.set_clear_color(self.clear_color);

        let mut config = self.graphics.clone();
        (config.width, config.height) = display.size();

        let mut graphics = Graphics::new(device, display, config);
        for mode in builtin_modes().into_iter().chain(self.modes.drain(..)) {
            graphics.registry_mut().register(mode);
        }
        graphics.init();
        graphics
    }

    fn on_ready(&mut self, window: &Window, graphics: &mut WindowGraphics) {
        // `init` leaves vsync off
        if self.vsync {
            graphics.display_mut().set_vsync(true);
        }

        #[cfg(target_arch = "wasm32")]
        self.resize(
            window.inner_size().width,
            window.inner_size().height,
            graphics,
        );
        #[cfg(not(target_arch = "wasm32"))]
        let _ = window;

        if let Some(setup) = self.setup.take() {
            setup(graphics);
        }
    }

    fn frame(&mut self, _window: &Window, graphics: &mut WindowGraphics, timer: &FrameTimer) {
        let Some(update) = &mut self.update else {
            return;
        };
        let Some(view) = graphics.display_mut().acquire() else {
            return;
        };
        graphics.device_mut().begin_frame(view);

        update(graphics, timer);

        if graphics.batch_depth() > 0 {
            log::warn!(
                "Frame ended with {} render batch(es) open, closing them",
                graphics.batch_depth()
            );
            while graphics.batch_depth() > 0 {
                _ = graphics.end_render_batch(false);
            }
        }

        graphics.device_mut().end_frame();
        graphics.swap_buffers();
    }

    fn resize(&mut self, width: u32, height: u32, graphics: &mut WindowGraphics) {
        graphics.display_mut().resized(width, height);
        graphics.resize_viewport(width, height);
    }

    fn on_quit(&mut self, graphics: Option<WindowGraphics>) {
        let stats = graphics
            .map(|g| {
                let stats = g.last_frame_stats();
                g.shutdown();
                stats
            })
            .unwrap_or_default();

        if let Some(f) = &mut self.on_quit {
            f(stats);
        }
    }
}
