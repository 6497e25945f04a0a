mod display;
pub mod time;

pub use display::WindowDisplay;
pub use winit::{error::EventLoopError, event::WindowEvent, window::Window};

use crate::time::FrameTimer;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::WindowId,
};

pub struct AppConfig {
    pub title: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub resizable: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Quill App".to_string(),
            width: None,
            height: None,
            resizable: true,
        }
    }
}

/// Trait defining application behavior
///
/// Implement this for your app logic. Hooks are called during window creation,
/// every frame, on resize, & before quitting
#[allow(async_fn_in_trait)]
pub trait AppHandler<R> {
    /// Called for every WindowEvent before the runner handles it
    fn on_window_event(&mut self, _window: &Window, _event: &WindowEvent) {}
    /// Called once the window exists; should create & return the resource
    async fn with_resource(&mut self, _window: Arc<Window>) -> R;
    /// Called after the resource is initialized & window is ready
    fn on_ready(&mut self, _window: &Window, _resource: &mut R) {}
    /// Called every frame
    fn frame(&mut self, _window: &Window, _resource: &mut R, _timer: &FrameTimer) {}
    /// Called on window resize
    fn resize(&mut self, _w: u32, _h: u32, _resource: &mut R) {}
    /// Called when the window is requested to close
    fn on_quit(&mut self, _resource: Option<R>) {}
}

/// Generic application entry point
///
/// Manages window creation, the event loop & delegating hooks to your `AppHandler`.
/// Use `AppRunner::new()` to construct it, then call `.run()` to start the loop
pub struct AppRunner<R: 'static, H: AppHandler<R> + 'static> {
    handler: Option<H>,
    resource: Option<R>,
    window: Option<Arc<Window>>,
    proxy: Option<EventLoopProxy<(R, H)>>,
    timer: FrameTimer,
    config: AppConfig,
}

#[doc(hidden)]
impl<R, H: AppHandler<R> + 'static> ApplicationHandler<(R, H)> for AppRunner<R, H> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Initializes the resource async (wasm) or sync (native) once the window exists
        let Some(proxy) = self.proxy.take() else {
            return;
        };
        let win_attrs = {
            use winit::dpi::PhysicalSize;

            #[allow(unused_mut)]
            let mut attrs = Window::default_attributes()
                .with_title(&self.config.title)
                .with_resizable(self.config.resizable);

            if let (Some(width), Some(height)) = (self.config.width, self.config.height) {
                attrs = attrs.with_inner_size(PhysicalSize::new(width, height));
            }

            #[cfg(target_arch = "wasm32")]
            {
                use winit::platform::web::WindowAttributesExtWebSys;
                attrs = attrs.with_append(true);
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                attrs = attrs.with_visible(false);
            }

            attrs
        };
        let window = match event_loop.create_window(win_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                #[cfg(feature = "log")]
                log::error!("Failed to create window: {e}");
                #[cfg(not(feature = "log"))]
                let _ = e;
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());
        let Some(mut handler) = self.handler.take() else {
            return;
        };

        #[cfg(target_arch = "wasm32")]
        {
            // Wait for DOM and canvas to be ready before initializing
            wasm_bindgen_futures::spawn_local(async move {
                let resource = handler.with_resource(window).await;
                _ = proxy.send_event((resource, handler));
            });
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let resource = pollster::block_on(handler.with_resource(window));
            _ = proxy.send_event((resource, handler));
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        if let (Some(handler), Some(window)) = (&mut self.handler, &self.window) {
            handler.on_window_event(window, &event);
        }

        match event {
            WindowEvent::CloseRequested => {
                if let Some(handler) = &mut self.handler {
                    handler.on_quit(self.resource.take());
                }
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let (Some(w), Some(r), Some(handler)) = (
                    self.window.as_ref(),
                    self.resource.as_mut(),
                    self.handler.as_mut(),
                ) {
                    handler.frame(w, r, &self.timer);
                    self.timer.update();
                }
                if let Some(w) = self.window.as_ref() {
                    w.request_redraw();
                }
            }
            WindowEvent::Resized(size) => {
                if let (Some(r), Some(handler)) = (self.resource.as_mut(), self.handler.as_mut()) {
                    handler.resize(size.width, size.height, r);
                }
            }
            _ => {}
        }
    }

    fn user_event(&mut self, _: &ActiveEventLoop, (resource, handler): (R, H)) {
        self.resource = Some(resource);
        self.handler = Some(handler);

        if let (Some(r), Some(h), Some(w)) = (&mut self.resource, &mut self.handler, &self.window) {
            h.on_ready(w, r);

            #[cfg(not(target_arch = "wasm32"))]
            {
                h.frame(w, r, &self.timer);
                w.set_visible(true);
            }
        }
    }
}

impl<R, H: AppHandler<R> + 'static> AppRunner<R, H> {
    /// Creates a new runner with the given handler & configuration
    pub fn new(handler: H, config: AppConfig) -> Self {
        Self {
            handler: Some(handler),
            resource: None,
            window: None,
            proxy: None,
            timer: FrameTimer::default(),
            config,
        }
    }

    /// Starts the app & runs the event loop
    pub fn run(mut self) -> Result<(), EventLoopError> {
        let event_loop = EventLoop::<(R, H)>::with_user_event().build()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        self.proxy = Some(event_loop.create_proxy());

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            wasm_bindgen_futures::spawn_local(async move {
                event_loop.spawn_app(self);
            });
            Ok(())
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            event_loop.run_app(&mut self)
        }
    }
}

/// Install the logger for the current target, `RUST_LOG` overrides the `error` default
///
/// Safe to call more than once; later calls are ignored
#[cfg(feature = "log")]
pub fn init_logger() {
    #[cfg(target_arch = "wasm32")]
    {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        _ = console_log::init_with_level(log::Level::Error);
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error"))
            .try_init();
    }
}
