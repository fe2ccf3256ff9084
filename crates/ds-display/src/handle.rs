use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortKind {
    Hdmi,
    /// Composite ("BB") output.
    Composite,
}

impl std::fmt::Display for PortKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hdmi => f.write_str("hdmi"),
            Self::Composite => f.write_str("composite"),
        }
    }
}

/// Lifecycle of one video port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortState {
    #[default]
    Uninitialized,
    /// Initialized, no sink attached (or unknown).
    Ready,
    Connected,
}

/// Opaque token for a port, valid for one init/term cycle.
///
/// Each `init` bumps the generation, so a handle obtained before a `term`/`init` pair is
/// rejected instead of silently aliasing the re-initialized port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortHandle {
    kind: PortKind,
    index: u8,
    generation: u32,
}

impl PortHandle {
    pub(crate) fn new(kind: PortKind, index: u8, generation: u32) -> Self {
        Self {
            kind,
            index,
            generation,
        }
    }

    pub fn kind(&self) -> PortKind {
        self.kind
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for PortHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.kind, self.index)
    }
}
