//! # External collaborators
//!
//! Seams to the outside world: theme loading, sound playback and the help bar.

use anyhow::{Context, Result};
use crate::types::HelpPrompt;
use scenic_theme::ThemeData;
use std::path::PathBuf;
use tracing::instrument;

/// Interface for loading themes.
pub trait ThemeLoader {
    /// Loads and parses the theme identified by `path`.
    fn load_theme(&self, path: &str) -> Result<ThemeData>;
}

/// Loads JSON themes from the local filesystem, relative to `root`.
#[derive(Debug, Clone, Default)]
pub struct FileThemeLoader {
    pub root: PathBuf,
}

impl FileThemeLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ThemeLoader for FileThemeLoader {
    #[instrument(level = "debug", skip(self), fields(path = path))]
    fn load_theme(&self, path: &str) -> Result<ThemeData> {
        let full = self.root.join(path);
        let theme = ThemeData::from_path(&full)
            .with_context(|| format!("Failed to load theme {}", full.display()))?;
        Ok(theme)
    }
}

/// Plays storyboard sounds.
pub trait SoundPlayer {
    fn play(&mut self, sound: &str);
}

/// Shows the button hints of the window's leading element.
pub trait HelpDisplay {
    fn set_help_prompts(&mut self, prompts: &[HelpPrompt]);
}
