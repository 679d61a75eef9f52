use crate::animation::AnimationSlots;
use crate::element::Element;
use crate::storyboard::StoryboardEngine;
use crate::transform::{TransformCache, TransformInputs};
use crate::types::{
    clip_rect_to_xywh, clip_rect_xywh, Capabilities, ExtraType, HelpPrompt, NodeId, PropValue,
};
use glam::{Mat4, Vec2, Vec3, Vec4};
use kurbo::Rect;
use std::collections::BTreeMap;

/// Property names every node understands, independent of its element.
pub const BASE_PROPERTIES: &[&str] = &[
    "pos",
    "x",
    "y",
    "z",
    "size",
    "w",
    "h",
    "origin",
    "rotation",
    "rotationOrigin",
    "scale",
    "scaleOrigin",
    "offset",
    "opacity",
    "visible",
    "zIndex",
    "clipRect",
];

/// Geometric and visual state of a node.
///
/// Read-only outside the crate; all writes go through [`SceneNode`] setters so
/// the transform cache and change hooks stay consistent.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeState {
    pub(crate) position: Vec3,
    pub(crate) origin: Vec2,
    pub(crate) rotation: f32,
    pub(crate) rotation_origin: Vec2,
    pub(crate) scale: f32,
    pub(crate) scale_origin: Vec2,
    pub(crate) size: Vec2,
    pub(crate) screen_offset: Vec2,
    pub(crate) opacity: u8,
    pub(crate) visible: bool,
    pub(crate) z_index: Option<f32>,
    pub(crate) default_z_index: f32,
    pub(crate) clip_rect: Option<Rect>,
    pub(crate) tag: String,
    pub(crate) bindings: BTreeMap<String, String>,
    pub(crate) click_action: Option<String>,
    pub(crate) extra_type: ExtraType,
    pub(crate) showing: bool,
    pub(crate) mouse_over: bool,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            origin: Vec2::ZERO,
            rotation: 0.0,
            rotation_origin: Vec2::splat(0.5),
            scale: 1.0,
            scale_origin: Vec2::splat(0.5),
            size: Vec2::ZERO,
            screen_offset: Vec2::ZERO,
            opacity: 255,
            visible: true,
            z_index: None,
            default_z_index: 0.0,
            clip_rect: None,
            tag: String::new(),
            bindings: BTreeMap::new(),
            click_action: None,
            extra_type: ExtraType::Builtin,
            showing: false,
            mouse_over: false,
        }
    }
}

impl NodeState {
    pub fn position(&self) -> Vec3 {
        self.position
    }
    pub fn origin(&self) -> Vec2 {
        self.origin
    }
    /// Rotation in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
    pub fn rotation_origin(&self) -> Vec2 {
        self.rotation_origin
    }
    pub fn scale(&self) -> f32 {
        self.scale
    }
    pub fn scale_origin(&self) -> Vec2 {
        self.scale_origin
    }
    pub fn size(&self) -> Vec2 {
        self.size
    }
    pub fn screen_offset(&self) -> Vec2 {
        self.screen_offset
    }
    pub fn opacity(&self) -> u8 {
        self.opacity
    }
    pub fn is_visible(&self) -> bool {
        self.visible
    }
    /// Effective z-index: the explicit override if set, else the default.
    pub fn z_index(&self) -> f32 {
        self.z_index.unwrap_or(self.default_z_index)
    }
    pub fn default_z_index(&self) -> f32 {
        self.default_z_index
    }
    pub fn clip_rect(&self) -> Option<Rect> {
        self.clip_rect
    }
    pub fn tag(&self) -> &str {
        &self.tag
    }
    pub fn bindings(&self) -> &BTreeMap<String, String> {
        &self.bindings
    }
    pub fn click_action(&self) -> Option<&str> {
        self.click_action.as_deref()
    }
    pub fn extra_type(&self) -> ExtraType {
        self.extra_type
    }
    pub fn is_static_extra(&self) -> bool {
        self.extra_type == ExtraType::Static
    }
    pub fn is_showing(&self) -> bool {
        self.showing
    }
    pub fn is_mouse_over(&self) -> bool {
        self.mouse_over
    }

    /// The center point, taking the origin into account.
    pub fn center(&self) -> Vec2 {
        self.position.truncate() - self.size * self.origin + self.size / 2.0
    }

    fn transform_inputs(&self) -> TransformInputs {
        TransformInputs {
            position: self.position,
            origin: self.origin,
            size: self.size,
            rotation: self.rotation,
            rotation_origin: self.rotation_origin,
            scale: self.scale,
            scale_origin: self.scale_origin,
            screen_offset: self.screen_offset,
        }
    }
}

/// A node of the scene graph: state, element, hierarchy links, animation
/// slots and storyboards.
#[derive(Debug)]
pub struct SceneNode {
    /// The concrete widget behavior.
    pub element: Box<dyn Element>,
    pub(crate) state: NodeState,
    pub(crate) transform: TransformCache,
    pub(crate) children: Vec<NodeId>,
    /// Non-owning back reference; only used for lookups.
    pub(crate) parent: Option<NodeId>,
    pub(crate) animations: AnimationSlots,
    pub(crate) storyboards: StoryboardEngine,
    /// Set when the child list needs a z-order re-sort.
    pub(crate) children_z_dirty: bool,
    /// Set when this node's own z-index changed since its parent last sorted.
    pub(crate) z_dirty: bool,
    pub(crate) pending_sounds: Vec<String>,
}

impl SceneNode {
    /// Creates a new SceneNode wrapping the given Element.
    pub fn new(element: Box<dyn Element>) -> Self {
        Self {
            element,
            state: NodeState::default(),
            transform: TransformCache::default(),
            children: Vec::new(),
            parent: None,
            animations: AnimationSlots::default(),
            storyboards: StoryboardEngine::default(),
            children_z_dirty: false,
            z_dirty: false,
            pending_sounds: Vec::new(),
        }
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn has_capability(&self, capability: Capabilities) -> bool {
        self.element.capabilities().contains(capability)
    }

    /// The local transform, recomputed first if any input changed.
    pub fn transform(&self) -> Mat4 {
        self.transform.get(|| self.state.transform_inputs())
    }

    // --- transform inputs ---

    pub fn set_position(&mut self, position: Vec3) {
        self.state.position = position;
        self.transform.invalidate();
        self.element.on_position_changed(&self.state);
    }

    pub fn set_position_xy(&mut self, x: f32, y: f32) {
        self.set_position(Vec3::new(x, y, self.state.position.z));
    }

    /// Sets the origin as a fraction of the size ((0, 0) top left, (0.5, 0.5) center).
    pub fn set_origin(&mut self, origin: Vec2) {
        self.state.origin = origin;
        self.transform.invalidate();
        self.element.on_origin_changed(&self.state);
    }

    /// Sets the rotation in radians.
    pub fn set_rotation(&mut self, rotation: f32) {
        self.state.rotation = rotation;
        self.transform.invalidate();
        self.element.on_rotation_changed(&self.state);
    }

    pub fn set_rotation_degrees(&mut self, degrees: f32) {
        self.set_rotation(degrees.to_radians());
    }

    pub fn set_rotation_origin(&mut self, origin: Vec2) {
        self.state.rotation_origin = origin;
        self.transform.invalidate();
        self.element.on_rotation_origin_changed(&self.state);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.state.scale = scale;
        self.transform.invalidate();
        self.element.on_scale_changed(&self.state);
    }

    pub fn set_scale_origin(&mut self, origin: Vec2) {
        self.state.scale_origin = origin;
        self.transform.invalidate();
        self.element.on_scale_origin_changed(&self.state);
    }

    pub fn set_screen_offset(&mut self, offset: Vec2) {
        self.state.screen_offset = offset;
        self.transform.invalidate();
        self.element.on_screen_offset_changed(&self.state);
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.state.size = size;
        self.transform.invalidate();
        self.element.on_size_changed(&self.state);
    }

    // --- visual state ---

    pub fn set_opacity(&mut self, opacity: u8) {
        self.state.opacity = opacity;
        self.element.on_opacity_changed(&self.state);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.state.visible = visible;
    }

    /// Sets the explicit z-index override. The parent re-sorts lazily.
    pub fn set_z_index(&mut self, z_index: f32) {
        self.state.z_index = Some(z_index);
        self.z_dirty = true;
    }

    pub fn clear_z_index(&mut self) {
        self.state.z_index = None;
        self.z_dirty = true;
    }

    pub fn set_default_z_index(&mut self, z_index: f32) {
        self.state.default_z_index = z_index;
        self.z_dirty = true;
    }

    /// Sets or clears the clip rectangle (screen coordinates).
    pub fn set_clip_rect(&mut self, clip: Option<Rect>) {
        self.state.clip_rect = clip;
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.state.tag = tag.into();
    }

    pub fn set_click_action(&mut self, action: Option<String>) {
        self.state.click_action = action;
    }

    pub fn set_extra_type(&mut self, extra_type: ExtraType) {
        self.state.extra_type = extra_type;
    }

    pub fn set_binding(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.state.bindings.insert(key.into(), value.into());
    }

    pub fn remove_binding(&mut self, key: &str) -> Option<String> {
        self.state.bindings.remove(key)
    }

    pub fn value(&self) -> String {
        self.element.value()
    }

    pub fn set_value(&mut self, value: &str) {
        self.element.set_value(value);
    }

    /// Sets the element's main color (`0xRRGGBBAA`).
    pub fn set_color(&mut self, color: u32) {
        self.element.set_color(color);
    }

    pub fn help_prompts(&self) -> Vec<HelpPrompt> {
        self.element.help_prompts()
    }

    // --- properties by name ---

    /// Whether `name` is a base property or one the element exposes.
    pub fn is_known_property(&self, name: &str) -> bool {
        BASE_PROPERTIES.contains(&name) || self.element.property(name).is_some()
    }

    /// Reads a property by name. Rotation is reported in degrees.
    pub fn get_property(&self, name: &str) -> Option<PropValue> {
        let s = &self.state;
        let value = match name {
            "pos" => PropValue::Pair(s.position.truncate()),
            "x" => PropValue::Float(s.position.x),
            "y" => PropValue::Float(s.position.y),
            "z" => PropValue::Float(s.position.z),
            "size" => PropValue::Pair(s.size),
            "w" => PropValue::Float(s.size.x),
            "h" => PropValue::Float(s.size.y),
            "origin" => PropValue::Pair(s.origin),
            "rotation" => PropValue::Float(s.rotation.to_degrees()),
            "rotationOrigin" => PropValue::Pair(s.rotation_origin),
            "scale" => PropValue::Float(s.scale),
            "scaleOrigin" => PropValue::Pair(s.scale_origin),
            "offset" => PropValue::Pair(s.screen_offset),
            "opacity" => PropValue::Float(s.opacity as f32),
            "visible" => PropValue::Bool(s.visible),
            "zIndex" => PropValue::Float(s.z_index()),
            "clipRect" => PropValue::Quad(s.clip_rect.map(clip_rect_to_xywh).unwrap_or(Vec4::ZERO)),
            _ => return self.element.property(name),
        };
        Some(value)
    }

    /// Writes a property by name through the regular setters, so change hooks fire.
    ///
    /// Returns `false` for unknown names or values of the wrong shape.
    pub fn set_property(&mut self, name: &str, value: &PropValue) -> bool {
        match name {
            "pos" => match value.as_vec2() {
                Some(p) => self.set_position_xy(p.x, p.y),
                None => return false,
            },
            "x" | "y" | "z" => {
                let Some(v) = value.as_f32() else {
                    return false;
                };
                let mut p = self.state.position;
                match name {
                    "x" => p.x = v,
                    "y" => p.y = v,
                    _ => p.z = v,
                }
                self.set_position(p);
            }
            "size" => match value.as_vec2() {
                Some(v) => self.set_size(v),
                None => return false,
            },
            "w" | "h" => {
                let Some(v) = value.as_f32() else {
                    return false;
                };
                let mut size = self.state.size;
                if name == "w" {
                    size.x = v;
                } else {
                    size.y = v;
                }
                self.set_size(size);
            }
            "origin" => match value.as_vec2() {
                Some(v) => self.set_origin(v),
                None => return false,
            },
            "rotation" => match value.as_f32() {
                Some(v) => self.set_rotation_degrees(v),
                None => return false,
            },
            "rotationOrigin" => match value.as_vec2() {
                Some(v) => self.set_rotation_origin(v),
                None => return false,
            },
            "scale" => match value.as_f32() {
                Some(v) => self.set_scale(v),
                None => return false,
            },
            "scaleOrigin" => match value.as_vec2() {
                Some(v) => self.set_scale_origin(v),
                None => return false,
            },
            "offset" => match value.as_vec2() {
                Some(v) => self.set_screen_offset(v),
                None => return false,
            },
            "opacity" => match value.as_f32() {
                Some(v) => self.set_opacity(v.round().clamp(0.0, 255.0) as u8),
                None => return false,
            },
            "visible" => match value.as_bool() {
                Some(v) => self.set_visible(v),
                None => return false,
            },
            "zIndex" => match value.as_f32() {
                Some(v) => self.set_z_index(v),
                None => return false,
            },
            "clipRect" => match value.as_vec4() {
                Some(v) if v.z > 0.0 && v.w > 0.0 => {
                    self.set_clip_rect(Some(clip_rect_xywh(v.x, v.y, v.z, v.w)))
                }
                Some(_) => self.set_clip_rect(None),
                None => return false,
            },
            _ => return self.element.set_property(name, value),
        }
        true
    }

    /// Advances this node's own animation slots, then its storyboard.
    pub fn update_self(&mut self, dt: f64) {
        for slot in 0..crate::animation::MAX_ANIMATIONS {
            self.advance_animation(slot, dt);
        }
        self.update_storyboard(dt);
    }

    /// Drains storyboard sounds queued since the last call.
    pub fn take_pending_sounds(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_sounds)
    }
}
