//! # Scenic Core
//!
//! `scenic-core` is the base layer of a retained-mode 2D scene graph for GUI toolkits.
//!
//! Every widget is a [`SceneNode`] in a [`SceneGraph`] arena. A node owns its
//! geometry (position, origin, rotation, scale, size, screen offset), its
//! visual state (opacity, visibility, z-order, clip rectangle) and two ways of
//! changing that state over time:
//!
//! *   **Animation slots**: up to [`MAX_ANIMATIONS`](animation::MAX_ANIMATIONS) code-driven
//!     animations per node, each with a delay, a direction and a one-shot completion callback.
//! *   **Storyboards**: theme-declared property tracks with repeat policies, selected,
//!     started and restored by name.
//!
//! Concrete widgets plug in through the [`Element`] trait. Drawing, theme files,
//! sound and input devices stay outside: see [`systems`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scenic_core::{node::GroupNode, SceneConfig, SceneGraph};
//!
//! let mut scene = SceneGraph::new(SceneConfig::default());
//! let root = scene.add_node(Box::new(GroupNode::new()));
//! let child = scene.add_node(Box::new(GroupNode::new()));
//! scene.add_child(root, child).unwrap();
//!
//! // Per frame, with the elapsed time in milliseconds:
//! scene.update(root, 16.0);
//! ```

/// The Scene Graph Data Structure.
pub mod scene;

/// Defines the base `Element` trait that all widgets attach to nodes.
pub mod element;

/// Concrete elements.
pub mod node;

/// Animation primitives: easing, keyframe sequences and the slot table.
pub mod animation;

/// Theme-declared storyboards.
pub mod storyboard;

/// Local transform composition and caching.
pub mod transform;

/// Shared data structures used across the scene graph.
pub mod types;

pub mod config;
pub mod errors;

/// Traversal systems (render, picking, input, theming, window notifications) and external collaborators.
pub mod systems;

pub use config::SceneConfig;
pub use element::{Element, InputEvent};
pub use errors::SceneError;
pub use scene::{NodeState, SceneGraph, SceneNode};
pub use storyboard::{Storyboard, StoryboardState};
pub use systems::{FileThemeLoader, HelpDisplay, Renderer, SoundPlayer, ThemeLoader};
pub use types::{
    AnimateFlags, Capabilities, ElementKind, HelpPrompt, NodeId, PropValue, ThemeFlags,
};
