//! Shape emitters writing straight into the batch buffers

use crate::{
    config::GraphicsConfig,
    device::{DeviceSink, DisplaySurface, PrimitiveKind},
    graphics::Graphics,
    line::PolygonType,
};
use glam::{DVec2, dvec2};
use std::f64::consts::TAU;

/// Angular step of a dynamic circle of world radius `radius`
///
/// Starts from the configured default and is rescaled when the resulting
/// on-screen chord would be shorter or longer than the configured bounds
pub fn dynamic_increment(config: &GraphicsConfig, px_per_meter: f64, radius: f64) -> f64 {
    let circumference_px = px_per_meter * radius;
    let segment_px = config.circle_segment_angle * circumference_px;

    if segment_px < config.circle_segment_min_px {
        config.circle_segment_min_px / circumference_px
    } else if segment_px > config.circle_segment_max_px {
        config.circle_segment_max_px / circumference_px
    } else {
        config.circle_segment_angle
    }
}

// Number of `inc` steps covering `span`, tolerant to rounding of exact multiples
fn steps(span: f64, inc: f64) -> usize {
    (span / inc - 1e-9).ceil() as usize
}

impl<D: DeviceSink, S: DisplaySurface> Graphics<D, S> {
    fn flush_if_full(&mut self) {
        if self.buffers.cost() > self.config.threshold() {
            self.flush_internal();
        }
    }

    pub fn dot(&mut self, v: DVec2) {
        let i = self.push_vertex(v);
        self.buffers.push_point(i);
        self.buffers.add_cost(4);
        self.flush_if_full();
    }

    /// Draw a cloud of dots shifted by `offset`, flushing as often as needed
    ///
    /// Dot `i` of `n` gets `alpha * i / n` of the paint alpha, so the first dot
    /// is fully transparent; this fade is kept as is although it looks unintended
    pub fn dots(&mut self, dots: &[DVec2], offset: DVec2) {
        let n = dots.len();
        let base = self.color;
        let mut i = 0;

        while i < n {
            let mut room = self.config.threshold().saturating_sub(self.buffers.cost()) / 4;
            if room == 0 {
                self.flush_internal();
                room = (self.config.threshold() / 4).max(1);
            }

            let end = (i + room).min(n);
            for (j, dot) in dots.iter().enumerate().take(end).skip(i) {
                let p = *dot + offset;
                let color = base.with_alpha(base.alpha() * j as f32 / n as f32);
                let index = self.buffers.push_vertex(
                    [p.x as f32, p.y as f32, self.depth],
                    color.components(),
                    [[0.0; 2]; 2],
                );
                self.buffers.push_point(index);
            }
            self.buffers.add_cost(4 * (end - i));
            i = end;
        }
    }

    /// Circle outline with a fixed number of segments
    ///
    /// With `cached` the table from [`Graphics::cache_sin_cos`] is used when it
    /// was filled for the same segment count. The segment count is capped so
    /// one outline fits an empty batch
    pub fn circle(&mut self, center: DVec2, radius: f64, segments: usize, cached: bool) {
        let segments = self.fit_segments(segments, self.config.index_capacity / 2);
        if segments == 0 {
            return;
        }
        self.make_room(segments, PrimitiveKind::Lines, 2 * segments);

        let first = self.buffers.vertex_count() as u32;
        for i in 0..segments {
            let (s, c) = self.circle_step(segments, i, cached);
            let rim = self.push_vertex(center + radius * dvec2(s, c));
            if i > 0 {
                self.buffers.push_line(rim - 1, rim);
            }
        }
        self.buffers.push_line(first + segments as u32 - 1, first);
        self.buffers.add_cost((segments + 1) * 4);
        self.flush_if_full();
    }

    /// Filled circle as a fan of `segments` triangles around the center vertex
    ///
    /// The segment count is capped so one fan fits an empty batch
    pub fn filled_circle(&mut self, center: DVec2, radius: f64, segments: usize, cached: bool) {
        let segments = self.fit_segments(segments, self.config.index_capacity.saturating_sub(1) / 3);
        if segments == 0 {
            return;
        }
        self.make_room(segments + 1, PrimitiveKind::Triangles, 3 * segments);

        let hub = self.push_vertex(center);
        let first = hub + 1;
        for i in 0..segments {
            let (s, c) = self.circle_step(segments, i, cached);
            let rim = self.push_vertex(center + radius * dvec2(s, c));
            if i > 0 {
                self.buffers.push_triangle(hub, rim - 1, rim);
            }
        }
        self.buffers
            .push_triangle(hub, first + segments as u32 - 1, first);
        self.buffers.add_cost(8 * segments);
        self.flush_if_full();
    }

    fn fit_segments(&self, segments: usize, max: usize) -> usize {
        if segments > max {
            log::warn!("{segments} circle segments exceed the batch capacity, using {max}");
            max
        } else {
            segments
        }
    }

    // Flush first when the primitive would run past the end of the buffers
    fn make_room(&mut self, vertices: usize, kind: PrimitiveKind, indices: usize) {
        if !self.buffers.has_room(vertices, kind, indices) {
            self.flush_internal();
        }
    }

    fn circle_step(&self, segments: usize, i: usize, cached: bool) -> (f64, f64) {
        cached
            .then(|| self.cache.lookup(segments, i))
            .flatten()
            .unwrap_or_else(|| (i as f64 * TAU / segments as f64).sin_cos())
    }

    /// Circle outline whose segment count follows the on-screen size
    pub fn circle_dyn(&mut self, center: DVec2, radius: f64) {
        if radius <= 0.0 {
            return;
        }
        let inc = dynamic_increment(&self.config, self.resolution_px_per_meter(), radius);
        let segments = steps(TAU, inc).max(3);

        self.begin_line(PolygonType::Loop);
        for i in 0..segments {
            let angle = i as f64 * inc;
            self.add_vertex(center + radius * DVec2::from_angle(angle));
        }
        self.end_line();
    }

    /// Arc from `from` to `to` (radians, counter-clockwise from +x)
    pub fn arc_dyn(&mut self, center: DVec2, radius: f64, from: f64, to: f64) {
        if radius <= 0.0 {
            return;
        }
        let (from, to) = if to < from { (to, from) } else { (from, to) };
        let inc = dynamic_increment(&self.config, self.resolution_px_per_meter(), radius);
        let count = steps(to - from, inc).max(1);

        self.begin_line(PolygonType::Strip);
        for i in 0..=count {
            let angle = from + (to - from) * i as f64 / count as f64;
            self.add_vertex(center + radius * DVec2::from_angle(angle));
        }
        self.end_line();
    }

    /// Rectangle outline from lower-left to upper-right corner
    pub fn rect(&mut self, ll: DVec2, ur: DVec2) {
        let a = self.push_vertex(ll);
        let b = self.push_vertex(dvec2(ur.x, ll.y));
        let c = self.push_vertex(ur);
        let d = self.push_vertex(dvec2(ll.x, ur.y));
        self.buffers.push_line(a, b);
        self.buffers.push_line(b, c);
        self.buffers.push_line(c, d);
        self.buffers.push_line(d, a);
        self.buffers.add_cost(12);
        self.flush_if_full();
    }

    pub fn filled_rect(&mut self, ll: DVec2, ur: DVec2) {
        self.quad(ll, ur, [[[0.0; 2]; 2]; 4]);
        self.buffers.add_cost(16);
        self.flush_if_full();
    }

    /// Filled rectangle with one UV pair per corner: LL, LR, UL, UR
    pub fn textured_rect(&mut self, ll: DVec2, ur: DVec2, uvs: &[[f32; 2]; 4]) {
        self.quad(ll, ur, uvs.map(|uv| [uv, [0.0; 2]]));
        self.buffers.add_cost(12);
        self.flush_if_full();
    }

    /// Like [`Graphics::textured_rect`] with a second UV channel
    pub fn textured_rect2(&mut self, ll: DVec2, ur: DVec2, uv0: &[[f32; 2]; 4], uv1: &[[f32; 2]; 4]) {
        let mut uvs = [[[0.0; 2]; 2]; 4];
        for (corner, uv) in uvs.iter_mut().enumerate() {
            *uv = [uv0[corner], uv1[corner]];
        }
        self.quad(ll, ur, uvs);
        self.buffers.add_cost(12);
        self.flush_if_full();
    }

    // Two triangles over LL, LR, UL, UR sharing the LR-UL diagonal
    fn quad(&mut self, ll: DVec2, ur: DVec2, uvs: [[[f32; 2]; 2]; 4]) {
        let a = self.push_vertex_uv(ll, uvs[0]);
        let b = self.push_vertex_uv(dvec2(ur.x, ll.y), uvs[1]);
        let c = self.push_vertex_uv(dvec2(ll.x, ur.y), uvs[2]);
        let d = self.push_vertex_uv(ur, uvs[3]);
        self.buffers.push_triangle(a, b, c);
        self.buffers.push_triangle(c, b, d);
    }

    pub fn filled_triangle(&mut self, a: DVec2, b: DVec2, c: DVec2) {
        let a = self.push_vertex(a);
        let b = self.push_vertex(b);
        let c = self.push_vertex(c);
        self.buffers.push_triangle(a, b, c);
        self.buffers.add_cost(12);
        self.flush_if_full();
    }

    /// Outline through `vertices`, each shifted by `offset`
    pub fn polygon(&mut self, vertices: &[DVec2], kind: PolygonType, offset: DVec2) {
        self.begin_line(kind);
        for &v in vertices {
            self.add_vertex(v + offset);
        }
        self.end_line();
    }

    /// Arrow for vector `v` starting at `pos`, head size constant on screen
    pub fn show_vec(&mut self, v: DVec2, pos: DVec2) {
        if v == DVec2::ZERO {
            return;
        }
        let zoom = self.cam_zoom();
        let front = pos + v;
        let dir = v.normalize();
        let neck = front - dir * 5.0 / zoom;
        let left = neck + dir.perp() * 2.0 / zoom;
        let right = neck - dir.perp() * 2.0 / zoom;

        self.begin_line(PolygonType::Single);
        self.add_vertex(pos);
        self.add_vertex(neck);
        self.end_line();

        self.filled_triangle(left, front, right);
    }
}
