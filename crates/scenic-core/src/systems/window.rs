//! # Window Notifications
//!
//! Focus, text entry, screen saver and window-stack changes, plus the help
//! bar. Broadcasts reach every node of a subtree, parents first.

use crate::errors::SceneError;
use crate::scene::SceneGraph;
use crate::types::{HelpPrompt, NodeId};
use tracing::{debug, error};

impl SceneGraph {
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Moves focus to `target`, or clears it with `None`.
    ///
    /// The previous holder gets `on_focus_lost`, the new one `on_focus_gained`.
    /// Refocusing the current holder does nothing. Returns `false` for an unknown id.
    pub fn set_focus(&mut self, target: Option<NodeId>) -> bool {
        if target.is_some_and(|id| !self.contains(id)) {
            return false;
        }
        if target == self.focused {
            return true;
        }
        if let Some(node) = self.focused.and_then(|id| self.get_node_mut(id)) {
            node.element.on_focus_lost();
        }
        self.focused = target;
        if let Some(node) = target.and_then(|id| self.get_node_mut(id)) {
            node.element.on_focus_gained();
        }
        debug!(focused = ?target, "focus changed");
        true
    }

    /// Delivers typed text to every node under `root`.
    pub fn dispatch_text_input(&mut self, root: NodeId, text: &str) {
        self.for_each_in_subtree(root, |_, node| node.element.text_input(text));
    }

    pub fn set_screen_saver_active(&mut self, root: NodeId, active: bool) {
        self.for_each_in_subtree(root, |_, node| {
            if active {
                node.element.on_screen_saver_activate();
            } else {
                node.element.on_screen_saver_deactivate();
            }
        });
    }

    /// Tells the subtree whether its window is now on top of the window stack.
    pub fn set_top_window(&mut self, root: NodeId, is_top: bool) {
        self.for_each_in_subtree(root, |_, node| node.element.on_top_window(is_top));
    }

    /// Re-publishes help prompts after they changed somewhere in `id`'s tree.
    ///
    /// The request climbs to the topmost ancestor, whose prompts go to the
    /// help display. Returns `false` when there is no display or no such node.
    pub fn update_help_prompts(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let mut top = id;
        let mut depth = 0;
        while let Some(parent) = self.parent(top) {
            depth += 1;
            if depth > self.config().max_depth {
                error!(node = id, depth, "{}", SceneError::RecursionLimit);
                return false;
            }
            top = parent;
        }

        let prompts: Vec<HelpPrompt> = self
            .get_node(top)
            .map(|node| node.help_prompts())
            .unwrap_or_default();
        match self.help.as_mut() {
            Some(display) => {
                display.set_help_prompts(&prompts);
                true
            }
            None => false,
        }
    }
}
