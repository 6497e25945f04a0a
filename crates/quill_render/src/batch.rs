//! Nested begin/end protocol over the render-mode stack

use crate::{
    device::{BufferId, DeviceSink, DisplaySurface, PrimitiveKind},
    error::GraphicsError,
    graphics::Graphics,
    mode::{RenderModeId, RenderModeType},
};

impl<D: DeviceSink, S: DisplaySurface> Graphics<D, S> {
    /// Open a batch drawn with `mode`
    ///
    /// If an enclosing batch uses another mode, its geometry is flushed first.
    /// `force` rebinds `mode` and drops unflushed geometry without touching the
    /// stack
    pub fn begin_render_batch(&mut self, mode: RenderModeId, force: bool) {
        if force {
            self.bind(mode);
            return;
        }

        match self.stack.last() {
            None => self.bind(mode),
            Some(&top) if top != mode || self.current != Some(mode) => {
                self.flush();
                self.bind(mode);
            }
            Some(_) => {}
        }
        self.stack.push(mode);
        log::debug!(
            "Begin render batch \"{}\", depth {}",
            self.registry.get(mode).name(),
            self.stack.len()
        );
    }

    pub fn begin_render_batch_by_name(&mut self, name: &str, force: bool) -> Result<(), GraphicsError> {
        let mode = self.lookup_mode(name)?;
        self.begin_render_batch(mode, force);
        Ok(())
    }

    /// Close the innermost batch
    ///
    /// Geometry is drawn when the outermost batch closes or when the enclosing
    /// batch uses a different mode, which is then bound again. `force` draws
    /// unconditionally and leaves the stack alone
    pub fn end_render_batch(&mut self, force: bool) -> Result<(), GraphicsError> {
        if force {
            self.flush();
            return Ok(());
        }

        let Some(ended) = self.stack.pop() else {
            log::warn!("end_render_batch called on an empty render mode stack");
            self.stats.usage_errors += 1;
            return Err(GraphicsError::UnbalancedBatch);
        };
        log::debug!(
            "End render batch \"{}\", depth {}",
            self.registry.get(ended).name(),
            self.stack.len()
        );

        match self.stack.last() {
            None => self.flush(),
            Some(&top) if top != ended || self.current != Some(top) => {
                self.flush();
                self.bind(top);
            }
            Some(_) => {}
        }
        Ok(())
    }

    /// Force a flush of `mode`'s pending geometry without changing the nesting
    ///
    /// Does nothing unless `mode` is the active mode of an open batch and at
    /// least one vertex is waiting
    pub fn restart_render_batch(&mut self, mode: RenderModeId) {
        if !self.stack.is_empty() && self.current == Some(mode) && !self.buffers.is_empty() {
            self.flush();
            self.bind(mode);
        }
    }

    pub fn restart_render_batch_by_name(&mut self, name: &str) -> Result<(), GraphicsError> {
        let mode = self.lookup_mode(name)?;
        self.restart_render_batch(mode);
        Ok(())
    }

    /// Mode the emitters currently write against
    pub fn current_render_mode(&self) -> Option<RenderModeId> {
        self.current
    }

    /// Number of open batches
    pub fn batch_depth(&self) -> usize {
        self.stack.len()
    }

    /// Index cost written since the last flush
    pub fn pending_cost(&self) -> usize {
        self.buffers.cost()
    }

    pub fn pending_vertices(&self) -> usize {
        self.buffers.vertex_count()
    }

    fn lookup_mode(&mut self, name: &str) -> Result<RenderModeId, GraphicsError> {
        self.registry.lookup(name).ok_or_else(|| {
            log::warn!("Render mode \"{name}\" is not registered");
            self.stats.usage_errors += 1;
            GraphicsError::UnknownRenderMode(name.to_owned())
        })
    }

    /// Make `mode` current with empty buffers
    fn bind(&mut self, mode: RenderModeId) {
        self.current = Some(mode);
        self.buffers.reset();
        self.device.bind_vertex_layout(self.registry.get(mode));
        self.apply_camera_movement();
    }

    /// Submit on capacity pressure, keeping the stack & the current mode
    pub(crate) fn flush_internal(&mut self) {
        log::trace!(
            "Internal flush at cost {} / {}",
            self.buffers.cost(),
            self.config.threshold()
        );
        self.stats.internal_flushes += 1;
        self.flush();
    }

    /// Whether spending `cost` more units would cross the flush threshold
    pub(crate) fn exceeds_threshold(&self, cost: usize) -> bool {
        self.buffers.cost() + cost > self.config.threshold()
    }

    /// Upload & draw whatever is buffered, then start a new generation
    pub(crate) fn flush(&mut self) {
        let Some(mode) = self.current else {
            if !self.buffers.is_empty() {
                log::warn!("Discarding geometry flushed without a render mode");
                self.stats.usage_errors += 1;
            }
            self.buffers.reset();
            return;
        };
        if self.buffers.is_empty() {
            return;
        }

        let kind = self.registry.get(mode).kind();
        let mut attributes = vec![BufferId::Vertices, BufferId::Colors];
        attributes.extend([BufferId::Uv0, BufferId::Uv1].into_iter().take(kind.uv_channels()));
        for id in attributes {
            let data = self.buffers.attribute(id);
            self.device.upload(id, bytemuck::cast_slice(data));
        }

        let streams: &[PrimitiveKind] = match kind {
            RenderModeType::Vert3Col4 => &[
                PrimitiveKind::Lines,
                PrimitiveKind::Points,
                PrimitiveKind::Triangles,
            ],
            RenderModeType::Vert3Col4Tex2 | RenderModeType::Vert3Col4Tex2x2 => {
                &[PrimitiveKind::Triangles]
            }
        };
        for &primitive in streams {
            let indices = self.buffers.indices(primitive);
            if indices.is_empty() {
                continue;
            }
            let buffer = primitive.index_buffer();
            let count = indices.len();
            self.device.upload(buffer, bytemuck::cast_slice(indices));
            self.device.draw_indexed(primitive, buffer, count);
            self.stats.record_draw(primitive, count);
        }
        self.stats.vertices += self.buffers.vertex_count();

        self.buffers.reset();
        self.allocate_buffers();
    }
}
