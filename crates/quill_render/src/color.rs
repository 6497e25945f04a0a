use color::{AlphaColor, LinearSrgb};

/// Paint color written into every emitted vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    inner: AlphaColor<LinearSrgb>,
}

impl Color {
    /// Create a new Color from RGBA components in [0..1]
    pub const fn new(components: [f32; 4]) -> Self {
        Self {
            inner: AlphaColor::new(components),
        }
    }

    pub fn components(&self) -> [f32; 4] {
        self.inner.components
    }

    pub fn alpha(&self) -> f32 {
        self.inner.components[3]
    }

    /// Same color with its alpha replaced
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            inner: self.inner.with_alpha(alpha),
        }
    }
}

impl Color {
    pub const BLACK: Color = Self {
        inner: AlphaColor::BLACK,
    };
    pub const WHITE: Color = Self {
        inner: AlphaColor::WHITE,
    };
    pub const TRANSPARENT: Color = Self {
        inner: AlphaColor::TRANSPARENT,
    };
    pub const RED: Color = Self::new([1., 0., 0., 1.]);
    pub const GREEN: Color = Self::new([0., 1., 0., 1.]);
    pub const BLUE: Color = Self::new([0., 0., 1., 1.]);
}

impl From<[f32; 4]> for Color {
    fn from(components: [f32; 4]) -> Self {
        Self::new(components)
    }
}

// Clear color of a wgpu render pass (f64 RGBA)
impl From<Color> for wgpu::Color {
    fn from(value: Color) -> Self {
        let [r, g, b, a] = value.components();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}
