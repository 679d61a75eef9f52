//! # Configuration
//!
//! Per-graph settings. A `SceneConfig` is handed to [`SceneGraph::new`](crate::scene::SceneGraph::new),
//! so several independent scene graphs (for example in tests) never share mutable globals.

use serde::{Deserialize, Serialize};

/// Settings for one scene graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    /// Screen width in pixels. Normalized theme positions of root nodes are relative to it.
    pub screen_width: f32,
    /// Screen height in pixels.
    pub screen_height: f32,
    /// Set while the shell plays its launch transition; storyboard sounds are muted meanwhile.
    pub launch_transition_running: bool,
    /// Traversal depth after which update/render/hit-test stop descending.
    pub max_depth: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            screen_width: 1280.0,
            screen_height: 720.0,
            launch_transition_running: false,
            max_depth: 100,
        }
    }
}

impl SceneConfig {
    /// Parses a configuration from JSON. Missing keys keep their defaults.
    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SceneConfig::from_json_str(r#"{ "screenWidth": 640, "launchTransitionRunning": true }"#)
            .unwrap();
        assert_eq!(config.screen_width, 640.0);
        assert_eq!(config.screen_height, 720.0);
        assert!(config.launch_transition_running);
        assert_eq!(config.max_depth, 100);
    }
}
