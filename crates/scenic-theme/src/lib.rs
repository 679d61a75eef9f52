// scenic-theme: serde structs for theme property bags and storyboards
pub mod model;

pub use model::{
    KeyframeDef, Property, RepeatDef, ResolvedKeyframe, StoryboardDef, ThemeData, ThemeElement,
    ThemeView, TrackDef,
};

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Malformed theme: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ThemeData {
    pub fn from_json_str(source: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Reads and parses a JSON theme file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    /// Looks up an element of a view.
    pub fn element(&self, view: &str, element: &str) -> Option<&ThemeElement> {
        self.views.get(view)?.elements.get(element)
    }
}
