//! # Types Module
//!
//! Shared data types used across the scene graph.
//!
//! ## Key Types
//! - `NodeId`: Type alias for arena indices (`usize`).
//! - `PropValue`: A dynamically typed property value, tweenable by storyboards.
//! - `AnimateFlags`: Which properties a canned animation drives.
//! - `Capabilities` / `ElementKind`: closed capability queries on elements.

use glam::{Vec2, Vec3, Vec4};
use keyframe::CanTween;
use kurbo::Rect;
use scenic_theme::Property;

/// A unique identifier for a node in the scene graph.
pub type NodeId = usize;

bitflags::bitflags! {
    /// Properties driven by [`SceneNode::animate_to`](crate::scene::SceneNode::animate_to).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AnimateFlags: u32 {
        const POSITION = 1;
        const SCALE = 2;
        const OPACITY = 4;
        const ALL = 0xFFFF_FFFF;
    }
}

bitflags::bitflags! {
    /// Capability interfaces an element implements.
    ///
    /// Queried instead of downcasting to concrete element types.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        const TEXT = 1;
        const IMAGE = 1 << 1;
        const FOCUSABLE = 1 << 2;
        const SCROLLABLE = 1 << 3;
        const CONTAINER = 1 << 4;
        const VALUE = 1 << 5;
    }
}

bitflags::bitflags! {
    /// Which theme properties [`SceneGraph::apply_theme`](crate::scene::SceneGraph::apply_theme) consumes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ThemeFlags: u32 {
        const POSITION = 2;
        const SIZE = 4;
        const ORIGIN = 8;
        const Z_INDEX = 8192;
        const ROTATION = 16384;
        const VISIBLE = 32768;
        const ALL = 0xFFFF_FFFF;
    }
}

/// Closed set of element variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ElementKind {
    #[default]
    Component,
    Group,
    Text,
    Image,
    List,
    Menu,
}

/// How a node was created relative to its theme.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ExtraType {
    #[default]
    Builtin,
    Extra,
    Static,
    ExtraChildren,
}

/// A button hint: the button glyph name and what pressing it does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HelpPrompt {
    pub button: String,
    pub label: String,
}

impl HelpPrompt {
    pub fn new(button: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            button: button.into(),
            label: label.into(),
        }
    }
}

/// A property value as read from or written to a node by name.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Float(f32),
    Pair(Vec2),
    Triple(Vec3),
    Quad(Vec4),
    Bool(bool),
    Text(String),
}

impl Default for PropValue {
    fn default() -> Self {
        Self::Float(0.0)
    }
}

impl PropValue {
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            PropValue::Float(v) => Some(*v),
            PropValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            PropValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            PropValue::Pair(v) => Some(*v),
            PropValue::Triple(v) => Some(v.truncate()),
            PropValue::Float(v) => Some(Vec2::splat(*v)),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            PropValue::Triple(v) => Some(*v),
            PropValue::Pair(v) => Some(v.extend(0.0)),
            _ => None,
        }
    }

    pub fn as_vec4(&self) -> Option<Vec4> {
        match self {
            PropValue::Quad(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            PropValue::Float(v) => Some(*v != 0.0),
            PropValue::Text(s) => match s.trim() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Approximate equality: component-wise within `epsilon` for numeric values.
    pub fn approx_eq(&self, other: &PropValue, epsilon: f32) -> bool {
        match (self, other) {
            (PropValue::Float(a), PropValue::Float(b)) => (a - b).abs() <= epsilon,
            (PropValue::Pair(a), PropValue::Pair(b)) => a.abs_diff_eq(*b, epsilon),
            (PropValue::Triple(a), PropValue::Triple(b)) => a.abs_diff_eq(*b, epsilon),
            (PropValue::Quad(a), PropValue::Quad(b)) => a.abs_diff_eq(*b, epsilon),
            _ => self == other,
        }
    }
}

impl From<&Property> for PropValue {
    fn from(p: &Property) -> Self {
        match p {
            Property::Bool(b) => PropValue::Bool(*b),
            Property::Float(v) => PropValue::Float(*v),
            Property::Pair([x, y]) => PropValue::Pair(Vec2::new(*x, *y)),
            Property::Triple([x, y, z]) => PropValue::Triple(Vec3::new(*x, *y, *z)),
            Property::Quad(q) => PropValue::Quad(Vec4::from_array(*q)),
            Property::Text(s) => PropValue::Text(s.clone()),
        }
    }
}

impl CanTween for PropValue {
    fn ease(from: Self, to: Self, time: impl keyframe::num_traits::Float) -> Self {
        let t = time.to_f64().unwrap_or(1.0) as f32;
        match (from, to) {
            (PropValue::Float(a), PropValue::Float(b)) => PropValue::Float(a + (b - a) * t),
            (PropValue::Pair(a), PropValue::Pair(b)) => PropValue::Pair(a.lerp(b, t)),
            (PropValue::Triple(a), PropValue::Triple(b)) => PropValue::Triple(a.lerp(b, t)),
            (PropValue::Quad(a), PropValue::Quad(b)) => PropValue::Quad(a.lerp(b, t)),
            // Discrete values (and mismatched kinds) hold until the next keyframe.
            (from, to) => {
                if t >= 1.0 {
                    to
                } else {
                    from
                }
            }
        }
    }
}

/// Builds a clip rectangle from the `x, y, w, h` layout used by themes.
pub fn clip_rect_xywh(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::from_origin_size((x as f64, y as f64), (w.max(0.0) as f64, h.max(0.0) as f64))
}

/// The `x, y, w, h` components of a clip rectangle.
pub fn clip_rect_to_xywh(rect: Rect) -> Vec4 {
    Vec4::new(
        rect.x0 as f32,
        rect.y0 as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}
