//! # Input Routing
//!
//! Pointer events go to the topmost hit node first and fall back to the nodes
//! below it. Button events and actions bubble from a target node up through its
//! ancestors until one consumes them.

use crate::element::InputEvent;
use crate::scene::SceneGraph;
use crate::systems::picking::hit_test;
use crate::types::NodeId;
use glam::Mat4;
use std::collections::HashSet;
use tracing::debug;

impl SceneGraph {
    fn hits(&mut self, root: NodeId, x: f32, y: f32) -> Vec<NodeId> {
        self.sort_subtree(root);
        let mut results = Vec::new();
        hit_test(self, root, x, y, &Mat4::IDENTITY, &mut results);
        results
    }

    /// Routes a pointer click. A press on a node with a click action that its
    /// element did not consume triggers that action.
    pub fn dispatch_click(&mut self, root: NodeId, button: u32, pressed: bool, x: f32, y: f32) -> bool {
        for id in self.hits(root, x, y) {
            let Some(node) = self.get_node_mut(id) else {
                continue;
            };
            if node.element.on_mouse_click(button, pressed, x, y) {
                return true;
            }
            if !pressed {
                continue;
            }
            if let Some(action) = node.state().click_action().map(str::to_string) {
                if self.dispatch_action(id, &action) {
                    return true;
                }
            }
        }
        false
    }

    /// Updates hover state within `root`'s subtree: leave hooks for nodes no
    /// longer under the pointer, enter hooks for new ones, and a move hook for
    /// every node under it.
    pub fn dispatch_mouse_move(&mut self, root: NodeId, x: f32, y: f32) {
        let hits = self.hits(root, x, y);
        let hit_set: HashSet<NodeId> = hits.iter().copied().collect();

        self.for_each_in_subtree(root, |id, node| {
            if node.state.mouse_over && !hit_set.contains(&id) {
                node.state.mouse_over = false;
                node.element.on_mouse_leave();
            }
        });

        for id in hits {
            let Some(node) = self.get_node_mut(id) else {
                continue;
            };
            if !node.state.mouse_over {
                node.state.mouse_over = true;
                node.element.on_mouse_enter();
            }
            node.element.on_mouse_move(x, y);
        }
    }

    /// Routes a wheel event to the topmost node that consumes it.
    pub fn dispatch_mouse_wheel(&mut self, root: NodeId, x: f32, y: f32, delta: i32) -> bool {
        for id in self.hits(root, x, y) {
            if self
                .get_node_mut(id)
                .is_some_and(|node| node.element.on_mouse_wheel(delta))
            {
                return true;
            }
        }
        false
    }

    /// Offers a button event to `target`, then to each ancestor.
    pub fn dispatch_input(&mut self, target: NodeId, event: &InputEvent) -> bool {
        let mut current = Some(target);
        while let Some(id) = current {
            let Some(node) = self.get_node_mut(id) else {
                break;
            };
            if node.element.input(event) {
                debug!(node = id, button = %event.button, "input consumed");
                return true;
            }
            current = node.parent;
        }
        false
    }

    /// Offers a named action to `target`, then to each ancestor.
    pub fn dispatch_action(&mut self, target: NodeId, action: &str) -> bool {
        let mut current = Some(target);
        while let Some(id) = current {
            let Some(node) = self.get_node_mut(id) else {
                break;
            };
            if node.element.on_action(action) {
                debug!(node = id, action, "action handled");
                return true;
            }
            current = node.parent;
        }
        false
    }
}
