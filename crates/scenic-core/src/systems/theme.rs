//! # Theme Application
//!
//! Copies a theme element's property bag onto a node.
//!
//! `pos`, `size` and `clipRect` are normalized: positions and sizes scale by the
//! parent's size (the screen for roots), clip rectangles by the screen.
//! `rotation` is in degrees, `opacity` in `[0, 1]`.

use crate::scene::SceneGraph;
use crate::types::{clip_rect_xywh, NodeId, ThemeFlags};
use glam::Vec2;
use scenic_theme::{Property, ThemeData};
use tracing::debug;

impl SceneGraph {
    /// Applies theme element `element` of `view` to node `id`.
    ///
    /// `flags` gates the geometric properties; the rest are always applied.
    /// Every storyboard of the element is registered on the node.
    /// Returns `false` if the node, view or element does not exist.
    pub fn apply_theme(
        &mut self,
        id: NodeId,
        theme: &ThemeData,
        view: &str,
        element: &str,
        flags: ThemeFlags,
    ) -> bool {
        let Some(elem) = theme.element(view, element) else {
            debug!(view, element, "no theme element");
            return false;
        };

        let screen = Vec2::new(self.config().screen_width, self.config().screen_height);
        let parent_size = self
            .parent(id)
            .and_then(|p| self.get_node(p))
            .map_or(screen, |p| p.state().size());
        let Some(node) = self.get_node_mut(id) else {
            return false;
        };

        if flags.contains(ThemeFlags::POSITION) {
            if let Some([x, y]) = elem.pair("pos") {
                node.set_position_xy(x * parent_size.x, y * parent_size.y);
            }
        }
        if flags.contains(ThemeFlags::SIZE) {
            if let Some(size) = elem.pair("size") {
                node.set_size(Vec2::from(size) * parent_size);
            }
        }
        if flags.contains(ThemeFlags::ORIGIN) {
            if let Some(origin) = elem.pair("origin") {
                node.set_origin(Vec2::from(origin));
            }
        }
        if flags.contains(ThemeFlags::ROTATION) {
            if let Some(degrees) = elem.float("rotation") {
                node.set_rotation_degrees(degrees);
            }
            if let Some(origin) = elem.pair("rotationOrigin") {
                node.set_rotation_origin(Vec2::from(origin));
            }
        }
        if let Some(scale) = elem.float("scale") {
            node.set_scale(scale);
        }
        if let Some(origin) = elem.pair("scaleOrigin") {
            node.set_scale_origin(Vec2::from(origin));
        }
        if flags.contains(ThemeFlags::Z_INDEX) {
            if let Some(z) = elem.float("zIndex") {
                node.set_default_z_index(z);
            }
        }
        if flags.contains(ThemeFlags::VISIBLE) {
            if let Some(visible) = elem.boolean("visible") {
                node.set_visible(visible);
            }
        }
        if let Some(opacity) = elem.float("opacity") {
            node.set_opacity((opacity.clamp(0.0, 1.0) * 255.0).round() as u8);
        }
        match elem.quad("clipRect") {
            Some([x, y, w, h]) if w > 0.0 && h > 0.0 => node.set_clip_rect(Some(clip_rect_xywh(
                x * screen.x,
                y * screen.y,
                w * screen.x,
                h * screen.y,
            ))),
            Some(_) => node.set_clip_rect(None),
            None => {}
        }
        if let Some(tag) = elem.text("tag") {
            node.set_tag(tag);
        }
        if let Some(action) = elem.text("action") {
            node.set_click_action(Some(action.to_string()));
        }

        for (name, property) in &elem.properties {
            if let Property::Text(text) = property {
                if text.contains('{') {
                    node.set_binding(name.clone(), text.clone());
                }
            }
        }

        let mut names: Vec<&String> = elem.storyboards.keys().collect();
        names.sort();
        for name in names {
            node.apply_storyboard(elem, name);
        }
        true
    }
}
