/// Visible region in meters around the camera, plus the pixel size it maps to
///
/// Plane distances are signed: `left`/`bottom` are normally negative
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub near: f64,
    pub far: f64,
    width: u32,
    height: u32,
}

impl Viewport {
    /// Viewport centered at the origin for a `width` x `height` pixel screen
    pub fn new(width: u32, height: u32, px_per_meter: f64, near: f64, far: f64) -> Self {
        let mut vp = Self {
            left: 0.0,
            right: 0.0,
            bottom: 0.0,
            top: 0.0,
            near,
            far,
            width,
            height,
        };
        vp.resize(width, height, px_per_meter);
        vp
    }

    pub fn set_planes(&mut self, left: f64, right: f64, bottom: f64, top: f64) {
        self.left = left;
        self.right = right;
        self.bottom = bottom;
        self.top = top;
    }

    /// Recompute the planes so one meter spans `px_per_meter` pixels
    pub fn resize(&mut self, width: u32, height: u32, px_per_meter: f64) {
        self.width = width.max(1);
        self.height = height.max(1);

        let half_w = 0.5 * f64::from(self.width) / px_per_meter;
        let half_h = 0.5 * f64::from(self.height) / px_per_meter;
        self.set_planes(-half_w, half_w, -half_h, half_h);
    }

    /// Screen size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Visible width in meters at zoom 1
    pub fn width_m(&self) -> f64 {
        self.right - self.left
    }

    pub fn height_m(&self) -> f64 {
        self.top - self.bottom
    }
}
