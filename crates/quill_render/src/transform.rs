//! Screen <-> world mapping and the matrices the device projects with
//!
//! Screen space is in pixels with the origin top-left and y pointing down.
//! World space is in meters with y pointing up

use crate::{camera::Camera, viewport::Viewport};
use glam::{DMat2, DVec2, Mat4, Vec3, dvec2, vec3};

/// Un-project a pixel coordinate into world space
pub fn screen_to_world(camera: &Camera, viewport: &Viewport, screen: DVec2) -> DVec2 {
    let (w, h) = viewport.size();
    let plane = dvec2(
        viewport.left + screen.x * viewport.width_m() / f64::from(w),
        viewport.top - screen.y * viewport.height_m() / f64::from(h),
    ) / camera.zoom();

    let radius = plane.length();
    let phi = plane.y.atan2(plane.x) + camera.angle();
    camera.position() + radius * DVec2::from_angle(phi)
}

/// Same as [`screen_to_world`] for separate coordinates
pub fn screen_to_world_xy(camera: &Camera, viewport: &Viewport, x: f64, y: f64) -> DVec2 {
    screen_to_world(camera, viewport, dvec2(x, y))
}

/// Project a world point onto the screen, in pixels
pub fn world_to_screen(camera: &Camera, viewport: &Viewport, world: DVec2) -> DVec2 {
    let (w, h) = viewport.size();
    let plane = DMat2::from_angle(-camera.angle()) * (world - camera.position()) * camera.zoom();

    dvec2(
        (plane.x - viewport.left) * f64::from(w) / viewport.width_m(),
        (viewport.top - plane.y) * f64::from(h) / viewport.height_m(),
    )
}

/// On-screen pixels covered by one world meter at the current zoom
pub fn resolution_px_per_meter(camera: &Camera, viewport: &Viewport) -> f64 {
    f64::from(viewport.size().0) / viewport.width_m() * camera.zoom()
}

/// World-space projection: viewport planes, zoom, rotation & position
pub fn world_matrix(camera: &Camera, viewport: &Viewport) -> Mat4 {
    let projection = Mat4::orthographic_rh(
        viewport.left as f32,
        viewport.right as f32,
        viewport.bottom as f32,
        viewport.top as f32,
        viewport.near as f32,
        viewport.far as f32,
    );
    let zoom = camera.zoom() as f32;
    let position = camera.position().as_vec2();

    projection
        * Mat4::from_scale(vec3(zoom, zoom, 1.0))
        * Mat4::from_rotation_z(-camera.angle() as f32)
        * Mat4::from_translation(Vec3::new(-position.x, -position.y, 0.0))
}

/// Pixel projection with the origin at the top-left corner; the camera is ignored
pub fn screen_matrix(viewport: &Viewport) -> Mat4 {
    let (w, h) = viewport.size();
    Mat4::orthographic_rh(
        0.0,
        w as f32,
        h as f32,
        0.0,
        viewport.near as f32,
        viewport.far as f32,
    )
}
