use quill_render::{
    BufferId, Graphics, GraphicsConfig, GraphicsError, PrimitiveKind, RenderMode, RenderModeId,
    RenderModeType, ShaderId, dvec2,
    record::{HeadlessDisplay, RecordingDevice},
};

type TestGraphics = Graphics<RecordingDevice, HeadlessDisplay>;

struct Modes {
    color: RenderModeId,
    textured: RenderModeId,
    overlay: RenderModeId,
    textured2: RenderModeId,
}

fn setup(capacity: usize) -> (TestGraphics, Modes) {
    let config = GraphicsConfig {
        index_capacity: capacity,
        width: 800,
        height: 600,
        ..Default::default()
    };
    let mut gfx = Graphics::new(RecordingDevice::new(), HeadlessDisplay::new(800, 600), config);
    let registry = gfx.registry_mut();
    let modes = Modes {
        color: registry.register(RenderMode::new("color", RenderModeType::Vert3Col4, ShaderId(0))),
        textured: registry.register(RenderMode::new(
            "textured",
            RenderModeType::Vert3Col4Tex2,
            ShaderId(1),
        )),
        overlay: registry.register(RenderMode::new("overlay", RenderModeType::Vert3Col4, ShaderId(3))),
        textured2: registry.register(RenderMode::new(
            "textured2",
            RenderModeType::Vert3Col4Tex2x2,
            ShaderId(2),
        )),
    };
    gfx.init();
    (gfx, modes)
}

#[test]
fn init_prepares_display_and_buffers() {
    let (gfx, modes) = setup(1000);

    assert!(!gfx.display().cursor_visible);
    assert!(!gfx.display().vsync);
    assert_eq!(gfx.current_render_mode(), Some(modes.color));
    assert_eq!(gfx.device().allocated(BufferId::Vertices), Some(12_000));
    assert_eq!(gfx.device().allocated(BufferId::LineIndices), Some(4_000));
    assert!(
        gfx.device()
            .uniforms()
            .iter()
            .all(|u| u.name == "matTransform")
    );
}

#[test]
fn nested_mode_change_submits_two_draws() {
    let (mut gfx, modes) = setup(1000);

    gfx.begin_render_batch(modes.color, false);
    gfx.filled_triangle(dvec2(0.0, 0.0), dvec2(1.0, 0.0), dvec2(0.0, 1.0));
    gfx.begin_render_batch(modes.textured, false);
    gfx.filled_triangle(dvec2(5.0, 5.0), dvec2(6.0, 5.0), dvec2(5.0, 6.0));
    gfx.end_render_batch(false).unwrap();
    gfx.end_render_batch(false).unwrap();

    let draws = gfx.device().draws();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].mode, "color");
    assert_eq!(draws[1].mode, "textured");
    assert_eq!(draws[0].resolved()[0], [0.0, 0.0, -15.0]);
    assert_eq!(draws[1].resolved()[0], [5.0, 5.0, -15.0]);
    assert_eq!(gfx.batch_depth(), 0);
    assert_eq!(gfx.frame_stats().draw_calls, 2);
}

#[test]
fn enclosing_mode_is_restored_after_nested_end() {
    let (mut gfx, modes) = setup(1000);

    gfx.begin_render_batch(modes.color, false);
    gfx.dot(dvec2(1.0, 1.0));
    gfx.begin_render_batch(modes.overlay, false);
    gfx.dot(dvec2(2.0, 2.0));
    gfx.end_render_batch(false).unwrap();

    // back to the outer caller's mode; its new geometry is drawn at the true end
    assert_eq!(gfx.current_render_mode(), Some(modes.color));
    gfx.dot(dvec2(3.0, 3.0));
    gfx.end_render_batch(false).unwrap();

    let modes: Vec<_> = gfx.device().draws().iter().map(|d| d.mode.as_str()).collect();
    assert_eq!(modes, ["color", "overlay", "color"]);
    assert_eq!(gfx.device().draws()[2].resolved(), [[3.0, 3.0, -15.0]]);
}

#[test]
fn nested_end_rebinds_the_enclosing_mode() {
    let (mut gfx, modes) = setup(1000);
    let per_flush = BufferId::ALL.len();
    assert_eq!(gfx.device().bind_count(), 1);
    assert_eq!(gfx.device().allocation_count(), per_flush);

    gfx.begin_render_batch(modes.color, false);
    gfx.dot(dvec2(1.0, 1.0));
    gfx.begin_render_batch(modes.overlay, false);
    assert_eq!(gfx.device().bound_mode().map(|m| m.name()), Some("overlay"));
    gfx.dot(dvec2(2.0, 2.0));
    gfx.end_render_batch(false).unwrap();

    assert_eq!(gfx.device().bound_mode().map(|m| m.name()), Some("color"));
    assert_eq!(gfx.device().bind_count(), 4);
    gfx.end_render_batch(false).unwrap();

    // only flushes that drew something re-request the buffers
    assert_eq!(gfx.device().bind_count(), 4);
    assert_eq!(gfx.device().allocation_count(), 3 * per_flush);
}

#[test]
fn same_mode_nesting_shares_one_batch() {
    let (mut gfx, modes) = setup(1000);

    gfx.begin_render_batch(modes.color, false);
    gfx.rect(dvec2(0.0, 0.0), dvec2(1.0, 1.0));
    gfx.begin_render_batch(modes.color, false);
    gfx.rect(dvec2(2.0, 2.0), dvec2(3.0, 3.0));
    gfx.end_render_batch(false).unwrap();
    assert!(gfx.device().draws().is_empty());
    gfx.end_render_batch(false).unwrap();

    let draws = gfx.device().draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].kind, PrimitiveKind::Lines);
    assert_eq!(draws[0].indices.len(), 16);
}

#[test]
fn unbalanced_end_is_reported() {
    let (mut gfx, _) = setup(1000);

    assert_eq!(gfx.end_render_batch(false), Err(GraphicsError::UnbalancedBatch));
    assert_eq!(gfx.frame_stats().usage_errors, 1);
    assert!(gfx.device().draws().is_empty());

    // still usable afterwards
    gfx.begin_render_batch_by_name("color", false).unwrap();
    gfx.dot(dvec2(0.0, 0.0));
    assert!(gfx.end_render_batch(false).is_ok());
    assert_eq!(gfx.device().draws().len(), 1);
}

#[test]
fn unknown_mode_name_fails_softly() {
    let (mut gfx, _) = setup(1000);

    let err = gfx.begin_render_batch_by_name("nope", false).unwrap_err();
    assert_eq!(err, GraphicsError::UnknownRenderMode("nope".into()));
    assert!(gfx.restart_render_batch_by_name("nope").is_err());
    assert_eq!(gfx.batch_depth(), 0);
    assert_eq!(gfx.frame_stats().usage_errors, 2);
}

#[test]
fn dot_cloud_splits_into_threshold_sized_batches() {
    let (mut gfx, modes) = setup(1000);
    let cloud: Vec<_> = (0..10_000).map(|i| dvec2(i as f64, 0.0)).collect();

    gfx.begin_render_batch(modes.color, false);
    gfx.dots(&cloud, dvec2(0.0, 1.0));
    gfx.end_render_batch(false).unwrap();

    // 4 cost units per dot against a threshold of 500
    let stats = gfx.frame_stats();
    assert_eq!(stats.internal_flushes, 79);
    assert_eq!(stats.points, 10_000);
    assert_eq!(stats.vertices, 10_000);

    let draws = gfx.device().draws();
    assert_eq!(draws.len(), 80);
    assert!(draws.iter().all(|d| d.indices.len() <= 1000));
    assert_eq!(draws[0].resolved()[1], [1.0, 1.0, -15.0]);
}

#[test]
fn dot_cloud_fades_alpha_by_index() {
    let (mut gfx, modes) = setup(1000);
    gfx.set_color([1.0, 0.5, 0.25, 0.8]);

    gfx.begin_render_batch(modes.color, false);
    gfx.dots(&[dvec2(0.0, 0.0), dvec2(1.0, 0.0)], dvec2(0.0, 0.0));
    gfx.end_render_batch(false).unwrap();

    let colors = &gfx.device().draws()[0].colors;
    assert_eq!(colors[0], [1.0, 0.5, 0.25, 0.0]);
    assert!((colors[1][3] - 0.4).abs() < 1e-6);
}

#[test]
fn restart_flushes_without_changing_nesting() {
    let (mut gfx, modes) = setup(1000);

    gfx.begin_render_batch(modes.color, false);
    gfx.dot(dvec2(0.0, 0.0));
    gfx.restart_render_batch(modes.color);
    assert_eq!(gfx.device().draws().len(), 1);
    assert_eq!(gfx.batch_depth(), 1);
    assert_eq!(gfx.pending_vertices(), 0);

    // nothing pending, other mode: both no-ops
    gfx.restart_render_batch(modes.color);
    gfx.dot(dvec2(1.0, 0.0));
    gfx.restart_render_batch(modes.overlay);
    assert_eq!(gfx.device().draws().len(), 1);

    gfx.end_render_batch(false).unwrap();
    assert_eq!(gfx.device().draws().len(), 2);
}

#[test]
fn forced_begin_discards_pending_geometry() {
    let (mut gfx, modes) = setup(1000);

    gfx.begin_render_batch(modes.color, false);
    gfx.dot(dvec2(0.0, 0.0));
    gfx.begin_render_batch(modes.color, true);
    assert_eq!(gfx.pending_vertices(), 0);
    assert_eq!(gfx.batch_depth(), 1);

    gfx.end_render_batch(false).unwrap();
    assert!(gfx.device().draws().is_empty());
}

#[test]
fn forced_end_draws_and_keeps_stack() {
    let (mut gfx, modes) = setup(1000);

    gfx.begin_render_batch(modes.color, false);
    gfx.dot(dvec2(0.0, 0.0));
    gfx.end_render_batch(true).unwrap();
    assert_eq!(gfx.device().draws().len(), 1);
    assert_eq!(gfx.batch_depth(), 1);
    gfx.end_render_batch(false).unwrap();
    assert_eq!(gfx.batch_depth(), 0);
}

#[test]
fn filled_circle_fans_around_center() {
    let (mut gfx, modes) = setup(1000);

    gfx.begin_render_batch(modes.color, false);
    gfx.filled_circle(dvec2(2.0, 3.0), 1.0, 12, false);
    gfx.end_render_batch(false).unwrap();

    let draw = &gfx.device().draws()[0];
    assert_eq!(draw.kind, PrimitiveKind::Triangles);
    assert_eq!(draw.indices.len(), 12 * 3);

    let hub = draw.indices[0];
    assert_eq!(draw.positions[hub as usize], [2.0, 3.0, -15.0]);
    assert!(draw.indices.chunks(3).all(|t| t[0] == hub));
    assert_eq!(gfx.frame_stats().triangles, 12);
}

#[test]
fn cached_circle_matches_direct_computation() {
    let (mut gfx, modes) = setup(1000);
    gfx.cache_sin_cos(16);

    gfx.begin_render_batch(modes.color, false);
    gfx.circle(dvec2(0.0, 0.0), 2.0, 16, true);
    gfx.end_render_batch(true).unwrap();
    gfx.circle(dvec2(0.0, 0.0), 2.0, 16, false);
    gfx.end_render_batch(false).unwrap();

    let draws = gfx.device().draws();
    let (cached, direct) = (draws[0].resolved(), draws[1].resolved());
    assert_eq!(cached.len(), 32);
    for (a, b) in cached.iter().zip(&direct) {
        assert!((a[0] - b[0]).abs() < 1e-5 && (a[1] - b[1]).abs() < 1e-5);
    }
    // first rim vertex sits straight above the center
    assert!((cached[0][1] - 2.0).abs() < 1e-6);
}

#[test]
fn textured_modes_only_draw_triangles() {
    let (mut gfx, modes) = setup(1000);
    let uvs = [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]];

    gfx.begin_render_batch(modes.textured, false);
    gfx.rect(dvec2(0.0, 0.0), dvec2(1.0, 1.0));
    gfx.textured_rect(dvec2(0.0, 0.0), dvec2(1.0, 1.0), &uvs);
    gfx.end_render_batch(false).unwrap();

    let draws = gfx.device().draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].kind, PrimitiveKind::Triangles);
    assert_eq!(draws[0].indices, [4, 5, 6, 6, 5, 7]);
}

#[test]
fn textured_rect_uploads_uvs_in_corner_order() {
    let (mut gfx, modes) = setup(1000);
    let uvs = [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]];

    gfx.begin_render_batch(modes.textured, false);
    gfx.textured_rect(dvec2(2.0, 3.0), dvec2(4.0, 5.0), &uvs);
    gfx.end_render_batch(false).unwrap();

    let draw = &gfx.device().draws()[0];
    let corners: Vec<_> = draw.positions.iter().map(|p| [p[0], p[1]]).collect();
    assert_eq!(corners, [[2.0, 3.0], [4.0, 3.0], [2.0, 5.0], [4.0, 5.0]]);
    assert_eq!(draw.indices, [0, 1, 2, 2, 1, 3]);
    assert_eq!(draw.uv0, uvs);
    assert!(draw.uv1.is_empty());
}

#[test]
fn textured_rect2_uploads_both_channels() {
    let (mut gfx, modes) = setup(1000);
    let base = [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]];
    let detail = [[0.0, 0.0], [2.0, 0.0], [0.0, 2.0], [2.0, 2.0]];

    gfx.begin_render_batch(modes.textured2, false);
    gfx.rect(dvec2(0.0, 0.0), dvec2(1.0, 1.0));
    gfx.textured_rect2(dvec2(0.0, 0.0), dvec2(1.0, 1.0), &base, &detail);
    gfx.end_render_batch(false).unwrap();

    let draws = gfx.device().draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].mode_type, RenderModeType::Vert3Col4Tex2x2);
    assert_eq!(draws[0].kind, PrimitiveKind::Triangles);
    assert_eq!(draws[0].indices, [4, 5, 6, 6, 5, 7]);
    assert_eq!(draws[0].uv0[4..], base);
    assert_eq!(draws[0].uv1[4..], detail);
    // the outline's vertices carry zero UVs
    assert_eq!(draws[0].uv1[..4], [[0.0; 2]; 4]);
}

#[test]
fn filled_rect_is_two_triangles_over_four_corners() {
    let (mut gfx, modes) = setup(1000);

    gfx.begin_render_batch(modes.color, false);
    gfx.filled_rect(dvec2(0.0, 0.0), dvec2(2.0, 1.0));
    gfx.end_render_batch(false).unwrap();

    let draws = gfx.device().draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].kind, PrimitiveKind::Triangles);
    assert_eq!(draws[0].indices, [0, 1, 2, 2, 1, 3]);
    let corners: Vec<_> = draws[0].positions.iter().map(|p| [p[0], p[1]]).collect();
    assert_eq!(corners, [[0.0, 0.0], [2.0, 0.0], [0.0, 1.0], [2.0, 1.0]]);
    // color-only modes never upload UVs
    assert!(draws[0].uv0.is_empty());
}

#[test]
fn oversized_circles_are_capped_to_one_batch() {
    let (mut gfx, modes) = setup(1000);

    gfx.begin_render_batch(modes.color, false);
    gfx.circle(dvec2(0.0, 0.0), 1.0, 600, false);
    gfx.filled_circle(dvec2(0.0, 0.0), 1.0, 600, false);
    gfx.end_render_batch(false).unwrap();

    let draws = gfx.device().draws();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].kind, PrimitiveKind::Lines);
    assert_eq!(draws[0].indices.len(), 1000);
    assert_eq!(draws[1].kind, PrimitiveKind::Triangles);
    assert_eq!(draws[1].indices.len(), 333 * 3);
}

#[test]
fn circle_that_would_overrun_flushes_first() {
    let (mut gfx, modes) = setup(1000);

    gfx.begin_render_batch(modes.color, false);
    // 41 outlines cost 492, just under the threshold of 500
    for i in 0..41 {
        let x = i as f64;
        gfx.rect(dvec2(x, 0.0), dvec2(x + 0.5, 0.5));
    }
    assert_eq!(gfx.frame_stats().internal_flushes, 0);

    // 328 buffered line indices + 800 more would pass the capacity
    gfx.circle(dvec2(0.0, 0.0), 3.0, 400, false);
    gfx.end_render_batch(false).unwrap();

    let sizes: Vec<_> = gfx.device().draws().iter().map(|d| d.indices.len()).collect();
    assert_eq!(sizes, [328, 800]);
    assert_eq!(gfx.frame_stats().internal_flushes, 2);
}

#[test]
fn large_primitive_flushes_after_completion() {
    let (mut gfx, modes) = setup(100);

    gfx.begin_render_batch(modes.color, false);
    // 8 cost units per segment, well past the threshold of 50
    gfx.filled_circle(dvec2(0.0, 0.0), 1.0, 8, false);
    assert_eq!(gfx.frame_stats().internal_flushes, 1);
    assert_eq!(gfx.device().draws()[0].indices.len(), 24);
    assert_eq!(gfx.pending_cost(), 0);
    gfx.end_render_batch(false).unwrap();
}

#[test]
fn swap_resets_frame_counters() {
    let (mut gfx, modes) = setup(1000);

    gfx.begin_render_batch(modes.color, false);
    gfx.rect(dvec2(0.0, 0.0), dvec2(1.0, 1.0));
    gfx.end_render_batch(false).unwrap();
    gfx.swap_buffers();

    assert_eq!(gfx.display().presented, 1);
    assert_eq!(gfx.frame_stats().draw_calls, 0);
    let last = gfx.last_frame_stats();
    assert_eq!((last.draw_calls, last.lines, last.vertices), (1, 4, 4));
}

#[test]
fn bind_uploads_the_transform() {
    let (mut gfx, modes) = setup(1000);
    let before = gfx.device().uniforms().len();

    gfx.zoom_camera_to(2.0);
    gfx.begin_render_batch(modes.overlay, false);

    let last = gfx.device().uniforms().last().unwrap();
    assert_eq!(gfx.device().uniforms().len(), before + 1);
    assert_eq!(last.shader, ShaderId(3));
    assert_eq!(last.matrix, gfx.transform_matrix());
    gfx.end_render_batch(false).unwrap();
}

#[test]
fn shutdown_returns_collaborators() {
    let (mut gfx, modes) = setup(1000);
    gfx.begin_render_batch(modes.color, false);
    gfx.resize_window(640, 480);

    let (device, display) = gfx.shutdown();
    assert_eq!(display.size, (640, 480));
    assert!(device.draws().is_empty());
}
