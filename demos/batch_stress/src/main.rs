//! Pushes more geometry than one batch holds through a headless context and
//! reports how the work was split into draw calls

use clap::Parser;
use quill::{
    math::{DVec2, dvec2},
    render::{
        Color, Graphics, GraphicsConfig, PolygonType, RenderMode, RenderModeType, ShaderId,
        record::{HeadlessDisplay, RecordingDevice},
    },
};

#[derive(Parser)]
struct Cli {
    /// Dots in the cloud
    #[arg(long, default_value_t = 10_000)]
    dots: usize,
    /// Vertices of the closed outline
    #[arg(long, default_value_t = 5_000)]
    outline: usize,
    /// Index capacity of every batch buffer
    #[arg(long, default_value_t = 1_000)]
    capacity: usize,
    #[arg(long, default_value_t = 3)]
    frames: u32,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let cli = Cli::parse();

    let config = GraphicsConfig {
        index_capacity: cli.capacity,
        ..Default::default()
    };
    let mut g = Graphics::new(
        RecordingDevice::new(),
        HeadlessDisplay::new(config.width, config.height),
        config,
    );
    let color = g
        .registry_mut()
        .register(RenderMode::new("color", RenderModeType::Vert3Col4, ShaderId(0)));
    g.init();

    let cloud: Vec<DVec2> = (0..cli.dots)
        .map(|i| dvec2((i % 100) as f64, (i / 100) as f64) * 0.5)
        .collect();
    let outline: Vec<DVec2> = (0..cli.outline)
        .map(|i| DVec2::from_angle(i as f64 * std::f64::consts::TAU / cli.outline as f64) * 30.0)
        .collect();

    for frame in 0..cli.frames {
        g.begin_render_batch(color, false);
        g.set_color(Color::WHITE);
        g.dots(&cloud, dvec2(-25.0, -25.0));
        g.set_color(Color::GREEN);
        g.polygon(&outline, PolygonType::Loop, DVec2::ZERO);
        if let Err(e) = g.end_render_batch(false) {
            log::error!("{e}");
        }

        let stats = g.frame_stats();
        let recorded = g.device().draws().len();
        g.swap_buffers();
        g.device_mut().clear();

        log::info!(
            "frame {frame}: {} draws ({recorded} recorded), {} internal flushes, {} points, {} lines, {} vertices",
            stats.draw_calls,
            stats.internal_flushes,
            stats.points,
            stats.lines,
            stats.vertices,
        );
    }

    let (_, display) = g.shutdown();
    log::info!("presented {} frames", display.presented);
}
