use crate::scene::NodeState;
use crate::systems::renderer::Renderer;
use crate::types::{Capabilities, ElementKind, HelpPrompt, PropValue};
use glam::Mat4;
use std::fmt;

/// A discrete input event from the input collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputEvent {
    /// Logical button identifier (`"a"`, `"b"`, `"up"`, ...).
    pub button: String,
    pub pressed: bool,
}

impl InputEvent {
    pub fn new(button: impl Into<String>, pressed: bool) -> Self {
        Self {
            button: button.into(),
            pressed,
        }
    }
}

/// The behavior of a concrete widget attached to a [`SceneNode`](crate::scene::SceneNode).
///
/// The node owns geometry, hierarchy, animations and storyboards; the element
/// draws and reacts. Every method has a default so simple elements only
/// override what they need.
pub trait Element: fmt::Debug {
    /// Closed tag identifying the element variant.
    fn kind(&self) -> ElementKind {
        ElementKind::Component
    }

    /// Capability interfaces this element implements.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Type name used to look up theme elements.
    fn theme_type_name(&self) -> &str {
        "component"
    }

    /// Per-frame hook, called after the node's animations and storyboard advanced.
    fn update(&mut self, _state: &NodeState, _dt: f64) {}

    /// Draws the element. The renderer's matrix is already set to `transform`.
    fn render(&self, _renderer: &mut dyn Renderer, _transform: &Mat4, _state: &NodeState) {}

    // --- change hooks ---

    fn on_position_changed(&mut self, _state: &NodeState) {}
    fn on_origin_changed(&mut self, _state: &NodeState) {}
    fn on_rotation_changed(&mut self, _state: &NodeState) {}
    fn on_rotation_origin_changed(&mut self, _state: &NodeState) {}
    fn on_scale_changed(&mut self, _state: &NodeState) {}
    fn on_scale_origin_changed(&mut self, _state: &NodeState) {}
    fn on_screen_offset_changed(&mut self, _state: &NodeState) {}
    fn on_size_changed(&mut self, _state: &NodeState) {}
    fn on_opacity_changed(&mut self, _state: &NodeState) {}

    // --- lifecycle ---

    fn on_show(&mut self) {}
    fn on_hide(&mut self) {}

    fn on_focus_gained(&mut self) {}
    fn on_focus_lost(&mut self) {}

    fn on_screen_saver_activate(&mut self) {}
    fn on_screen_saver_deactivate(&mut self) {}

    /// Called when the window holding this element gains or loses the top of the window stack.
    fn on_top_window(&mut self, _is_top: bool) {}

    // --- input ---

    /// Returns `true` if the input was consumed.
    fn input(&mut self, _event: &InputEvent) -> bool {
        false
    }

    /// Typed text, delivered to every node of the receiving subtree.
    fn text_input(&mut self, _text: &str) {}

    fn on_mouse_enter(&mut self) {}
    fn on_mouse_leave(&mut self) {}
    fn on_mouse_move(&mut self, _x: f32, _y: f32) {}

    /// Returns `true` if the wheel event was consumed.
    fn on_mouse_wheel(&mut self, _delta: i32) -> bool {
        false
    }

    /// Returns `true` if the click was consumed.
    fn on_mouse_click(&mut self, _button: u32, _pressed: bool, _x: f32, _y: f32) -> bool {
        false
    }

    /// Handles a named action (click actions bubble through ancestors). Returns `true` if handled.
    fn on_action(&mut self, _action: &str) -> bool {
        false
    }

    // --- values & extra properties ---

    fn value(&self) -> String {
        String::new()
    }

    fn set_value(&mut self, _value: &str) {}

    /// Sets the element's main color as `0xRRGGBBAA`.
    fn set_color(&mut self, _color: u32) {}

    /// Button hints shown while this element leads the window.
    fn help_prompts(&self) -> Vec<HelpPrompt> {
        Vec::new()
    }

    /// Reads an element-specific property (e.g. `"color"`) for storyboards.
    fn property(&self, _name: &str) -> Option<PropValue> {
        None
    }

    /// Writes an element-specific property. Returns `false` if unknown.
    fn set_property(&mut self, _name: &str, _value: &PropValue) -> bool {
        false
    }
}
