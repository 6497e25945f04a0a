//! Immediate-mode 2D geometry batching
//!
//! Call sites emit points, lines & triangles through [`Graphics`]; the geometry is
//! accumulated in fixed-capacity buffers and flushed to a [`DeviceSink`] in as few
//! draw calls as the nesting of render modes allows

mod batch;
mod buffers;
mod cache;
pub mod camera;
mod color;
mod config;
pub mod device;
mod error;
pub mod gpu;
mod graphics;
mod line;
pub mod mode;
mod primitives;
pub mod record;
mod stats;
pub mod transform;
pub mod viewport;

pub use buffers::GeometryBuffers;
pub use cache::SinCosCache;
pub use camera::Camera;
pub use color::Color;
pub use config::GraphicsConfig;
pub use device::{BufferId, DeviceSink, DisplaySurface, PrimitiveKind};
pub use error::GraphicsError;
pub use glam::{DVec2, Mat4, dvec2};
pub use graphics::Graphics;
pub use line::PolygonType;
pub use primitives::dynamic_increment;
pub use mode::{RenderMode, RenderModeId, RenderModeRegistry, RenderModeType, ShaderId};
pub use stats::FrameStats;
pub use viewport::Viewport;
