use std::f64::consts::TAU;

/// Sine & cosine of evenly spaced angles for fixed-segment circles
#[derive(Debug, Clone)]
pub struct SinCosCache {
    sin: Vec<f64>,
    cos: Vec<f64>,
    segments: usize,
    max_segments: usize,
}

impl SinCosCache {
    pub fn new(max_segments: usize) -> Self {
        Self {
            sin: Vec::with_capacity(max_segments + 1),
            cos: Vec::with_capacity(max_segments + 1),
            segments: 0,
            max_segments,
        }
    }

    /// Tabulate `segments + 1` angles from 0 to a full turn
    ///
    /// Requests above the configured maximum are clamped to it
    pub fn fill(&mut self, segments: usize) {
        let segments = if segments > self.max_segments {
            log::warn!(
                "Sin/cos cache limited to {} segments, {segments} requested",
                self.max_segments
            );
            self.max_segments
        } else {
            segments
        };

        self.sin.clear();
        self.cos.clear();
        self.segments = segments;
        if segments == 0 {
            return;
        }
        for i in 0..=segments {
            let (s, c) = (i as f64 * TAU / segments as f64).sin_cos();
            self.sin.push(s);
            self.cos.push(c);
        }
    }

    /// Segment count the table was last filled for, 0 if empty
    pub fn segments(&self) -> usize {
        self.segments
    }

    /// `(sin, cos)` of step `i` when the table was filled for `segments`
    pub fn lookup(&self, segments: usize, i: usize) -> Option<(f64, f64)> {
        if segments != self.segments || i > segments {
            return None;
        }
        Some((self.sin[i], self.cos[i]))
    }
}
