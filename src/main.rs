use std::f64::consts::{FRAC_PI_2, TAU};

use quill::{
    app::{App, EventLoopError},
    math::{DVec2, dvec2},
    render::{Color, PolygonType},
};

const CHECKER: [u8; 16] = [
    255, 255, 255, 255, 40, 40, 40, 255, //
    40, 40, 40, 255, 255, 255, 255, 255,
];
const FULL_UV: [[f32; 2]; 4] = [[0.0, 4.0], [4.0, 4.0], [0.0, 0.0], [4.0, 0.0]];

fn main() -> Result<(), EventLoopError> {
    let stars: Vec<DVec2> = (0..2000)
        .map(|i| {
            let a = i as f64 * 2.399_963;
            let r = (i as f64).sqrt() * 0.8;
            dvec2(a.cos() * r, a.sin() * r)
        })
        .collect();

    App::new()
        .title("quill")
        .screen_size(1024, 768)
        .clear_color(Color::new([0.05, 0.05, 0.08, 1.0]))
        .setup(|g| {
            g.cache_sin_cos(32);
            let checker = g.device_mut().add_texture_raw(2, 2, &CHECKER);
            g.device_mut().set_texture(0, Some(checker));
        })
        .on_quit(|stats| log::info!("Last frame: {stats:?}"))
        .run(move |g, timer| {
            let t = timer.elapsed();
            let (Some(color), Some(textured)) = (
                g.registry().lookup("color"),
                g.registry().lookup("textured"),
            ) else {
                return;
            };

            g.rotate_camera_to(0.15 * (0.3 * t).sin());
            g.zoom_camera_to(1.0 + 0.2 * (0.5 * t).sin());
            g.setup_world_space();

            g.begin_render_batch(color, false);

            g.set_color(Color::new([0.6, 0.8, 1.0, 1.0]));
            g.dots(&stars, dvec2(-25.0, 0.0));

            g.set_color(Color::WHITE);
            g.circle(dvec2(20.0, 20.0), 6.0, 32, true);
            g.set_color(Color::new([1.0, 0.5, 0.1, 1.0]));
            g.filled_circle(dvec2(20.0, 20.0), 4.0, 32, true);
            g.set_color(Color::GREEN);
            g.circle_dyn(dvec2(35.0, 20.0), 5.0);
            g.arc_dyn(dvec2(35.0, 20.0), 7.0, 0.0, FRAC_PI_2 + t % TAU);

            g.set_color(Color::RED);
            g.rect(dvec2(12.0, -5.0), dvec2(22.0, 5.0));
            g.filled_rect(dvec2(14.0, -3.0), dvec2(20.0, 3.0));
            g.set_color(Color::BLUE);
            g.filled_triangle(dvec2(28.0, -5.0), dvec2(38.0, -5.0), dvec2(33.0, 4.0));

            let star: Vec<DVec2> = (0..10)
                .map(|i| {
                    let r = if i % 2 == 0 { 6.0 } else { 2.5 };
                    DVec2::from_angle(i as f64 * TAU / 10.0 + t) * r
                })
                .collect();
            g.set_color(Color::new([1.0, 0.9, 0.2, 1.0]));
            g.polygon(&star, PolygonType::Loop, dvec2(20.0, -20.0));

            g.set_color(Color::WHITE);
            g.begin_line(PolygonType::Strip);
            for i in 0..=200 {
                let x = -45.0 + i as f64 * 0.45;
                g.add_vertex_xy(x, -30.0 + 3.0 * (x * 0.3 + 2.0 * t).sin());
            }
            g.end_line();
            g.show_vec(DVec2::from_angle(t) * 8.0, dvec2(35.0, -20.0));

            g.begin_render_batch(textured, false);
            g.set_color(Color::WHITE);
            g.textured_rect(dvec2(-45.0, 25.0), dvec2(-33.0, 35.0), &FULL_UV);
            _ = g.end_render_batch(false);

            // Drawn after the textured quad, with the color mode bound again
            g.set_color(Color::new([1.0, 1.0, 1.0, 0.5]));
            g.rect(dvec2(-46.0, 24.0), dvec2(-32.0, 36.0));
            _ = g.end_render_batch(false);

            g.setup_screen_space();
            g.begin_render_batch(color, false);
            let stats = g.last_frame_stats();
            g.set_color(Color::new([0.0, 0.0, 0.0, 0.6]));
            g.filled_rect(dvec2(8.0, 8.0), dvec2(8.0 + stats.draw_calls as f64 * 12.0, 20.0));
            _ = g.end_render_batch(false);
        })
}
