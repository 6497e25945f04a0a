//! quill: immediate-mode 2D geometry batching
//!
//! The batching core lives in [`render`]; with the `app` feature, [`app::App`]
//! opens a window & hands a ready [`render::Graphics`] context to a per-frame closure

#[cfg(feature = "app")]
pub mod app;

pub mod render {
    pub use quill_render::{
        Camera, Color, FrameStats, Graphics, GraphicsConfig, GraphicsError, PolygonType,
        RenderMode, RenderModeId, RenderModeType, ShaderId, Viewport, gpu, record,
    };
}

pub mod math {
    pub use quill_render::{DVec2, Mat4, dvec2};
}

#[cfg(feature = "app")]
pub mod time {
    pub use quill_app::time::FrameTimer;
}
