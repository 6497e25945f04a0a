use std::collections::HashMap;

/// Vertex attribute layout of a render mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderModeType {
    /// Positions & colors; lines, points and triangles are all drawn
    Vert3Col4,
    /// Positions, colors & one UV channel; triangles only
    Vert3Col4Tex2,
    /// Positions, colors & two UV channels; triangles only
    Vert3Col4Tex2x2,
}

impl RenderModeType {
    pub const ALL: [RenderModeType; 3] = [
        RenderModeType::Vert3Col4,
        RenderModeType::Vert3Col4Tex2,
        RenderModeType::Vert3Col4Tex2x2,
    ];

    /// Number of UV channels bound for this layout
    pub fn uv_channels(self) -> usize {
        match self {
            Self::Vert3Col4 => 0,
            Self::Vert3Col4Tex2 => 1,
            Self::Vert3Col4Tex2x2 => 2,
        }
    }
}

/// Opaque handle to a device-side shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderId(pub u32);

/// A vertex layout paired with the shader that consumes it
#[derive(Debug, Clone, PartialEq)]
pub struct RenderMode {
    name: String,
    kind: RenderModeType,
    shader: ShaderId,
}

impl RenderMode {
    pub fn new(name: impl Into<String>, kind: RenderModeType, shader: ShaderId) -> Self {
        Self {
            name: name.into(),
            kind,
            shader,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RenderModeType {
        self.kind
    }

    pub fn shader(&self) -> ShaderId {
        self.shader
    }
}

/// Index of a mode inside a [`RenderModeRegistry`]
///
/// Two ids compare equal only when they name the same registered mode, so two
/// modes sharing a layout but not a shader still force a flush between them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderModeId(usize);

impl RenderModeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Name to render mode lookup, filled before the first batch
#[derive(Debug, Default)]
pub struct RenderModeRegistry {
    modes: Vec<RenderMode>,
    by_name: HashMap<String, RenderModeId>,
}

impl RenderModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mode, replacing any earlier mode of the same name
    pub fn register(&mut self, mode: RenderMode) -> RenderModeId {
        if let Some(&id) = self.by_name.get(mode.name()) {
            log::warn!("Render mode \"{}\" registered twice, replacing", mode.name());
            self.modes[id.0] = mode;
            return id;
        }
        let id = RenderModeId(self.modes.len());
        self.by_name.insert(mode.name().to_owned(), id);
        self.modes.push(mode);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<RenderModeId> {
        self.by_name.get(name).copied()
    }

    /// Panics if `id` was not handed out by this registry
    pub fn get(&self, id: RenderModeId) -> &RenderMode {
        &self.modes[id.0]
    }

    pub fn first(&self) -> Option<RenderModeId> {
        (!self.modes.is_empty()).then_some(RenderModeId(0))
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RenderModeId, &RenderMode)> {
        self.modes
            .iter()
            .enumerate()
            .map(|(i, mode)| (RenderModeId(i), mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        let mut reg = RenderModeRegistry::new();
        let a = reg.register(RenderMode::new("color", RenderModeType::Vert3Col4, ShaderId(0)));
        let b = reg.register(RenderMode::new("tex", RenderModeType::Vert3Col4Tex2, ShaderId(1)));

        assert_eq!(reg.lookup("color"), Some(a));
        assert_eq!(reg.lookup("tex"), Some(b));
        assert_eq!(reg.lookup("missing"), None);
        assert_eq!(reg.get(b).kind().uv_channels(), 1);
        assert_eq!(reg.first(), Some(a));

        let listed: Vec<_> = reg.iter().map(|(id, mode)| (id, mode.name())).collect();
        assert_eq!(listed, [(a, "color"), (b, "tex")]);
    }

    #[test]
    fn reregister_keeps_id() {
        let mut reg = RenderModeRegistry::new();
        let a = reg.register(RenderMode::new("m", RenderModeType::Vert3Col4, ShaderId(0)));
        let again = reg.register(RenderMode::new("m", RenderModeType::Vert3Col4Tex2x2, ShaderId(7)));

        assert_eq!(a, again);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(a).shader(), ShaderId(7));
    }
}
