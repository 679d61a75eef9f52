use crate::element::Element;
use crate::types::{Capabilities, ElementKind};

// --- Group Node ---
/// A container without visuals of its own.
///
/// Useful as a root, or to move, fade and clip several children together.
#[derive(Debug, Clone, Default)]
pub struct GroupNode {
    pub name: String,
}

impl GroupNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Element for GroupNode {
    fn kind(&self) -> ElementKind {
        ElementKind::Group
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CONTAINER
    }

    fn theme_type_name(&self) -> &str {
        "group"
    }
}
