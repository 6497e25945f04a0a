use crate::device::PrimitiveKind;

/// Per-frame debug counters, reset on every buffer swap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: usize,
    pub lines: usize,
    pub points: usize,
    pub triangles: usize,
    pub vertices: usize,
    /// Flushes forced by buffer pressure rather than by `end_render_batch`
    pub internal_flushes: usize,
    /// Unbalanced batches & unknown mode names seen this frame
    pub usage_errors: usize,
}

impl FrameStats {
    pub(crate) fn record_draw(&mut self, kind: PrimitiveKind, indices: usize) {
        self.draw_calls += 1;
        let primitives = indices / kind.arity();
        match kind {
            PrimitiveKind::Lines => self.lines += primitives,
            PrimitiveKind::Points => self.points += primitives,
            PrimitiveKind::Triangles => self.triangles += primitives,
        }
    }
}
