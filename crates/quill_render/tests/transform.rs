use quill_render::{
    Graphics, GraphicsConfig, dvec2,
    record::{HeadlessDisplay, RecordingDevice},
};

fn setup() -> Graphics<RecordingDevice, HeadlessDisplay> {
    let mut gfx = Graphics::new(
        RecordingDevice::new(),
        HeadlessDisplay::new(1024, 768),
        GraphicsConfig::default(),
    );
    gfx.init();
    gfx
}

#[test]
fn screen_center_is_world_origin_after_resize() {
    let mut gfx = setup();
    gfx.resize_viewport(800, 600);

    let world = gfx.screen_to_world(dvec2(400.0, 300.0));
    assert!(world.length() < 1e-9);
    assert_eq!(gfx.viewport().width_m(), 80.0);
    assert_eq!(gfx.viewport().height_m(), 60.0);
}

#[test]
fn round_trip_under_any_camera() {
    let mut gfx = setup();
    let screens = [dvec2(0.0, 0.0), dvec2(512.0, 384.0), dvec2(17.0, 700.0), dvec2(1023.0, 3.0)];

    for (angle, zoom, pos) in [
        (0.0, 1.0, dvec2(0.0, 0.0)),
        (0.3, 2.0, dvec2(10.0, -4.0)),
        (-2.5, 0.25, dvec2(-100.0, 50.0)),
        (3.0, 13.0, dvec2(1e3, 1e3)),
    ] {
        gfx.reset_camera();
        gfx.rotate_camera_to(angle);
        gfx.zoom_camera_to(zoom);
        gfx.translate_camera_to(pos);

        for screen in screens {
            let world = gfx.screen_to_world_xy(screen.x, screen.y);
            assert!((gfx.world_to_screen(world) - screen).length() < 1e-6);
            assert_eq!(world, gfx.screen_to_world(screen));
        }
    }
}

#[test]
fn camera_moves_in_its_own_frame() {
    let mut gfx = setup();
    gfx.rotate_camera_by(std::f64::consts::PI);
    gfx.translate_camera_by(dvec2(1.0, 0.0));
    assert!((gfx.cam_pos() - dvec2(-1.0, 0.0)).length() < 1e-12);

    // the camera position shows up at the screen center
    let (w, h) = gfx.viewport().size();
    let center = gfx.world_to_screen(gfx.cam_pos());
    assert!((center - dvec2(w as f64 / 2.0, h as f64 / 2.0)).length() < 1e-9);
}

#[test]
fn screen_space_ignores_the_camera() {
    let mut gfx = setup();
    gfx.zoom_camera_to(4.0);
    let world = gfx.transform_matrix();

    gfx.setup_screen_space();
    let screen = gfx.transform_matrix();
    assert_ne!(world, screen);

    gfx.translate_camera_to(dvec2(50.0, 50.0));
    assert_eq!(screen, gfx.transform_matrix());
    assert!((gfx.resolution_px_per_meter() - 40.0).abs() < 1e-9);
}
