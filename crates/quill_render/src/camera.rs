use glam::{DMat2, DVec2};

/// 2D camera: position, counter-clockwise rotation & multiplicative zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: DVec2,
    angle: f64,
    zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            angle: 0.0,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn new(position: DVec2, angle: f64, zoom: f64) -> Self {
        debug_assert!(zoom > 0.0, "camera zoom must be positive");
        Self {
            position,
            angle,
            zoom,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Rotation in radians, counter-clockwise
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn rotate_by(&mut self, angle: f64) {
        self.angle += angle;
    }

    pub fn rotate_to(&mut self, angle: f64) {
        self.angle = angle;
    }

    /// Move by `delta` given in the camera's own (rotated) frame
    pub fn translate_by(&mut self, delta: DVec2) {
        self.position += DMat2::from_angle(self.angle) * delta;
    }

    pub fn translate_to(&mut self, position: DVec2) {
        self.position = position;
    }

    /// Multiply the current zoom by `factor`
    pub fn zoom_by(&mut self, factor: f64) {
        debug_assert!(factor > 0.0, "zoom factor must be positive");
        self.zoom *= factor;
    }

    pub fn zoom_to(&mut self, zoom: f64) {
        debug_assert!(zoom > 0.0, "camera zoom must be positive");
        self.zoom = zoom;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn translate_follows_rotation() {
        // a quarter turn makes "right" point up
        let mut cam = Camera::default();
        cam.rotate_to(FRAC_PI_2);
        cam.translate_by(dvec2(2.0, 0.0));
        assert!((cam.position() - dvec2(0.0, 2.0)).length() < 1e-9);

        cam.translate_to(dvec2(-1.0, 5.0));
        assert_eq!(cam.position(), dvec2(-1.0, 5.0));
    }

    #[test]
    fn zoom_is_multiplicative() {
        let mut cam = Camera::default();
        cam.zoom_by(2.0);
        cam.zoom_by(1.5);
        assert!((cam.zoom() - 3.0).abs() < 1e-12);

        cam.zoom_to(0.5);
        cam.rotate_by(0.25);
        cam.rotate_by(0.25);
        assert_eq!(cam.zoom(), 0.5);
        assert!((cam.angle() - 0.5).abs() < 1e-12);

        cam.reset();
        assert_eq!(cam, Camera::default());
    }
}
