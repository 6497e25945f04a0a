/// Construction-time settings of a [`Graphics`](crate::Graphics) context
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsConfig {
    /// Fixed capacity of every geometry buffer, in vertex ordinals / index slots
    pub index_capacity: usize,
    /// Pixels per world meter at zoom 1
    pub px_per_meter: f64,
    /// Default angular increment of dynamic circles & arcs, in radians
    pub circle_segment_angle: f64,
    /// Shortest on-screen chord a dynamic circle segment may have
    pub circle_segment_min_px: f64,
    /// Longest on-screen chord a dynamic circle segment may have
    pub circle_segment_max_px: f64,
    /// Largest segment count accepted by the sin/cos cache
    pub max_cache_size: usize,
    /// Depth written to emitted vertices until changed with `set_depth`
    pub depth: f32,
    pub width: u32,
    pub height: u32,
    pub near: f64,
    pub far: f64,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            index_capacity: 65536,
            px_per_meter: 10.0,
            circle_segment_angle: 10.0_f64.to_radians(),
            circle_segment_min_px: 5.0,
            circle_segment_max_px: 50.0,
            max_cache_size: 1024,
            depth: -15.0,
            width: 1024,
            height: 768,
            near: -1000.0,
            far: 1000.0,
        }
    }
}

impl GraphicsConfig {
    /// Cost units a batch may spend before an internal flush is forced
    pub fn threshold(&self) -> usize {
        self.index_capacity / 2
    }
}
