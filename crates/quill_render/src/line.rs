//! Multi-vertex lines that survive a flush in the middle of the primitive

use crate::{
    device::{DeviceSink, DisplaySurface},
    graphics::Graphics,
};
use glam::{DVec2, dvec2};

/// How the vertices of a line are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolygonType {
    /// Independent segments from consecutive vertex pairs
    Single,
    /// Open polyline
    #[default]
    Strip,
    /// Closed polyline
    Loop,
    /// Outline of a filled shape; closed like `Loop`
    Filled,
}

impl PolygonType {
    fn is_closed(self) -> bool {
        matches!(self, Self::Loop | Self::Filled)
    }
}

/// Why a line run is being terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineEnd {
    /// The caller finished the line
    Closed,
    /// A flush cuts the line; it continues in the next batch generation
    Split,
}

#[derive(Debug, Default)]
pub(crate) struct LineState {
    kind: PolygonType,
    vertices: usize,
    start: u32,
    /// Start of the logical line, kept once a flush has recycled its slot
    first_vertex: Option<DVec2>,
}

impl<D: DeviceSink, S: DisplaySurface> Graphics<D, S> {
    pub fn begin_line(&mut self, kind: PolygonType) {
        self.line.kind = kind;
        self.line.vertices = 0;
        self.line.start = self.buffers.vertex_count() as u32;
    }

    /// Append a vertex to the line in progress
    ///
    /// When the buffers run full the line is cut at an even vertex count,
    /// flushed & continued; strips and loops carry their last vertex over so
    /// no edge goes missing
    pub fn add_vertex(&mut self, v: DVec2) {
        if self.exceeds_threshold(4) && self.line.vertices % 2 == 0 {
            self.split_line();
        }
        self.buffers.add_cost(4);
        self.push_vertex(v);
        self.line.vertices += 1;
    }

    pub fn add_vertex_xy(&mut self, x: f64, y: f64) {
        self.add_vertex(dvec2(x, y));
    }

    /// Finish the line, closing loops back to their first vertex
    pub fn end_line(&mut self) {
        self.finish_line(LineEnd::Closed);
    }

    fn split_line(&mut self) {
        let LineState {
            kind,
            vertices,
            start,
            ..
        } = self.line;

        if vertices > 0 && self.line.first_vertex.is_none() {
            let [x, y, _] = self.buffers.position(start);
            self.line.first_vertex = Some(dvec2(f64::from(x), f64::from(y)));
        }
        let carry = (kind != PolygonType::Single && vertices > 0).then(|| {
            let last = start + vertices as u32 - 1;
            (self.buffers.position(last), self.buffers.color(last))
        });

        self.finish_line(LineEnd::Split);
        self.flush_internal();
        self.begin_line(kind);

        if let Some((position, color)) = carry {
            self.buffers.push_vertex(position, color, [[0.0; 2]; 2]);
            self.buffers.add_cost(4);
            self.line.vertices = 1;
        }
    }

    pub(crate) fn finish_line(&mut self, end: LineEnd) {
        let LineState {
            kind,
            vertices,
            start,
            first_vertex,
        } = self.line;
        let n = vertices as u32;

        if kind == PolygonType::Single {
            for i in (0..n.saturating_sub(1)).step_by(2) {
                self.buffers.push_line(start + i, start + i + 1);
            }
        } else {
            for i in 0..n.saturating_sub(1) {
                self.buffers.push_line(start + i, start + i + 1);
            }

            if end == LineEnd::Closed && kind.is_closed() && n > 0 {
                let last = start + n - 1;
                match first_vertex {
                    None if n > 1 => self.buffers.push_line(last, start),
                    None => {}
                    Some(first) => {
                        let closing = self.push_vertex(first);
                        self.buffers.add_cost(4);
                        self.buffers.push_line(last, closing);
                    }
                }
            }
        }

        if end == LineEnd::Closed {
            self.line.first_vertex = None;
        }
        self.line.vertices = 0;
    }

    /// Write one vertex with the current paint state
    pub(crate) fn push_vertex(&mut self, v: DVec2) -> u32 {
        self.push_vertex_uv(v, [[0.0; 2]; 2])
    }

    pub(crate) fn push_vertex_uv(&mut self, v: DVec2, uvs: [[f32; 2]; 2]) -> u32 {
        self.buffers.push_vertex(
            [v.x as f32, v.y as f32, self.depth],
            self.color.components(),
            uvs,
        )
    }
}
