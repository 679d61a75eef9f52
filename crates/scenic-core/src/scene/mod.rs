//! # Scene Graph
//!
//! Arena of [`SceneNode`]s and the hierarchy operations on it.
//!
//! ## Responsibilities
//! - **Ownership**: nodes live in `nodes`; a parent owns its children, the
//!   child's `parent` link is a plain id used only for lookups.
//! - **Hierarchy**: attach/detach/destroy with cycle rejection.
//! - **Z-order**: children are stable-sorted by effective z-index, lazily.
//! - **Update**: per-frame recursive tick (own animations, storyboard, element, children).
//! - **Lifecycle**: `show`/`hide` run the `"show"`/`"hide"` storyboards on a subtree.
//! - **Focus**: at most one focused node, notified on gain and loss.

mod animations;
mod node;
mod storyboards;

pub use node::{NodeState, SceneNode, BASE_PROPERTIES};

use crate::config::SceneConfig;
use crate::element::Element;
use crate::errors::SceneError;
use crate::systems::assets::{HelpDisplay, SoundPlayer};
use crate::types::NodeId;
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, error};

/// The Scene Graph data structure.
///
/// Manages the arena of nodes and their relationships.
pub struct SceneGraph {
    /// The arena of all nodes. `None` marks a freed slot.
    pub nodes: Vec<Option<SceneNode>>,
    /// Indices of nodes that have been removed and can be reused.
    pub free_indices: Vec<usize>,
    config: SceneConfig,
    sound: Option<Box<dyn SoundPlayer>>,
    pub(crate) help: Option<Box<dyn HelpDisplay>>,
    pub(crate) focused: Option<NodeId>,
}

impl fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneGraph")
            .field("nodes", &self.nodes.iter().filter(|n| n.is_some()).count())
            .field("free_indices", &self.free_indices)
            .field("config", &self.config)
            .field("sound", &self.sound.is_some())
            .field("help", &self.help.is_some())
            .field("focused", &self.focused)
            .finish()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl SceneGraph {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            nodes: Vec::new(),
            free_indices: Vec::new(),
            config,
            sound: None,
            help: None,
            focused: None,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SceneConfig {
        &mut self.config
    }

    /// Sets the collaborator that plays storyboard sounds.
    pub fn set_sound_player(&mut self, player: Box<dyn SoundPlayer>) {
        self.sound = Some(player);
    }

    /// Sets the collaborator that shows help prompts.
    pub fn set_help_display(&mut self, display: Box<dyn HelpDisplay>) {
        self.help = Some(display);
    }

    /// Adds a new element to the scene graph and returns its ID.
    pub fn add_node(&mut self, element: Box<dyn Element>) -> NodeId {
        if let Some(id) = self.free_indices.pop() {
            self.nodes[id] = Some(SceneNode::new(element));
            id
        } else {
            let id = self.nodes.len();
            self.nodes.push(Some(SceneNode::new(element)));
            id
        }
    }

    /// Returns a shared reference to the SceneNode.
    pub fn get_node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id).and_then(|n| n.as_ref())
    }

    /// Returns a mutable reference to the SceneNode.
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id).and_then(|n| n.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    /// Recursively destroys a node and its children, freeing their indices for reuse.
    ///
    /// Pending animations and storyboards are dropped without firing callbacks.
    pub fn destroy_node(&mut self, id: NodeId) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        let (parent_id, children_ids) = (node.parent, node.children.clone());

        if let Some(pid) = parent_id {
            self.remove_child(pid, id);
        }
        for child_id in children_ids {
            self.destroy_node(child_id);
        }

        if self.focused == Some(id) {
            self.focused = None;
        }
        self.nodes[id] = None;
        self.free_indices.push(id);
    }

    /// Makes `child` the last child of `parent`, detaching it from any previous parent.
    ///
    /// Fails if either id is unknown or if `child` is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        if !self.contains(child) {
            return Err(SceneError::NodeNotFound(child));
        }
        if parent == child {
            return Err(SceneError::SelfParent(child));
        }
        if self.is_child(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        if let Some(old_parent) = self.parent(child) {
            if old_parent == parent {
                return Ok(());
            }
            self.remove_child(old_parent, child);
        }

        if let Some(p_node) = self.get_node_mut(parent) {
            p_node.children.push(child);
            p_node.children_z_dirty = true;
        }
        if let Some(c_node) = self.get_node_mut(child) {
            c_node.parent = Some(parent);
        }
        debug_assert!(self.links_consistent(parent, child));
        Ok(())
    }

    /// Detaches `child` from `parent`. The child stays alive as a root.
    ///
    /// Returns `false` if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let removed = match self.get_node_mut(parent) {
            Some(p_node) => match p_node.children.iter().position(|&x| x == child) {
                Some(pos) => {
                    p_node.children.remove(pos);
                    true
                }
                None => false,
            },
            None => false,
        };
        if removed {
            if let Some(c_node) = self.get_node_mut(child) {
                c_node.parent = None;
            }
        }
        removed
    }

    /// Detaches every child of `parent`, keeping them alive as roots.
    pub fn clear_children(&mut self, parent: NodeId) {
        let children = match self.get_node_mut(parent) {
            Some(p_node) => std::mem::take(&mut p_node.children),
            None => return,
        };
        for child in children {
            if let Some(c_node) = self.get_node_mut(child) {
                c_node.parent = None;
            }
        }
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.get_node(id).map_or(0, |n| n.children.len())
    }

    /// The `index`-th child in current render order.
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.get_node(id)?.children.get(index).copied()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id)?.parent
    }

    /// Whether `descendant` lies anywhere below `ancestor`.
    pub fn is_child(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        let mut current = self.parent(descendant);
        let mut steps = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                error!(node = descendant, "parent chain does not terminate");
                return false;
            }
            current = self.parent(id);
        }
        false
    }

    fn links_consistent(&self, parent: NodeId, child: NodeId) -> bool {
        let in_list = self
            .get_node(parent)
            .is_some_and(|p| p.children.iter().filter(|&&c| c == child).count() == 1);
        in_list && self.parent(child) == Some(parent)
    }

    // --- z-order ---

    /// Re-sorts the children of `id` by effective z-index if any of them changed.
    ///
    /// The sort is stable: equal z-indices keep their insertion order.
    pub fn sort_children(&mut self, id: NodeId) {
        let Cow::Owned(sorted) = self.ordered_children(id) else {
            return;
        };
        for &c in &sorted {
            if let Some(child) = self.get_node_mut(c) {
                child.z_dirty = false;
            }
        }
        if let Some(node) = self.get_node_mut(id) {
            node.children = sorted;
            node.children_z_dirty = false;
        }
    }

    /// Children of `id` in render order.
    ///
    /// Borrows the stored list when it is current; otherwise sorts a copy
    /// without touching the graph.
    pub fn ordered_children(&self, id: NodeId) -> Cow<'_, [NodeId]> {
        let Some(node) = self.get_node(id) else {
            return Cow::Borrowed(&[][..]);
        };
        let dirty = node.children_z_dirty
            || node
                .children
                .iter()
                .any(|&c| self.get_node(c).is_some_and(|n| n.z_dirty));
        if !dirty {
            return Cow::Borrowed(node.children.as_slice());
        }

        let mut keyed: Vec<(NodeId, f32)> = node
            .children
            .iter()
            .filter_map(|&c| self.get_node(c).map(|n| (c, n.state.z_index())))
            .collect();
        keyed.sort_by(|a, b| a.1.total_cmp(&b.1));
        Cow::Owned(keyed.into_iter().map(|(c, _)| c).collect())
    }

    /// Sorts every child list in the subtree rooted at `id`.
    pub fn sort_subtree(&mut self, id: NodeId) {
        self.sort_subtree_recursive(id, 0);
    }

    fn sort_subtree_recursive(&mut self, id: NodeId, depth: usize) {
        if depth > self.config.max_depth {
            error!(node = id, depth, "{}", SceneError::RecursionLimit);
            return;
        }
        self.sort_children(id);
        let children = match self.get_node(id) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            self.sort_subtree_recursive(child, depth + 1);
        }
    }

    /// Calls `f` on every node of the subtree rooted at `id`, parents before children.
    pub fn for_each_in_subtree(&mut self, id: NodeId, mut f: impl FnMut(NodeId, &mut SceneNode)) {
        self.for_each_recursive(id, &mut f, 0);
    }

    fn for_each_recursive(
        &mut self,
        id: NodeId,
        f: &mut dyn FnMut(NodeId, &mut SceneNode),
        depth: usize,
    ) {
        if depth > self.config.max_depth {
            error!(node = id, depth, "{}", SceneError::RecursionLimit);
            return;
        }
        let Some(node) = self.get_node_mut(id) else {
            return;
        };
        f(id, node);
        let children = node.children.clone();
        for child in children {
            self.for_each_recursive(child, f, depth + 1);
        }
    }

    // --- per-frame ---

    /// Advances the subtree rooted at `root` by `dt` milliseconds.
    ///
    /// Each node runs its animation slots, then its storyboard, then its
    /// element's update hook, before any of its children.
    pub fn update(&mut self, root: NodeId, dt: f64) {
        self.update_recursive(root, dt, 0);
    }

    fn update_recursive(&mut self, id: NodeId, dt: f64, depth: usize) {
        if depth > self.config.max_depth {
            error!(node = id, depth, "{}", SceneError::RecursionLimit);
            return;
        }
        let Some(node) = self.get_node_mut(id) else {
            return;
        };

        node.update_self(dt);
        node.element.update(&node.state, dt);
        let sounds = node.take_pending_sounds();
        self.play_sounds(sounds);

        self.sort_children(id);
        let children = match self.get_node(id) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            self.update_recursive(child, dt, depth + 1);
        }
    }

    fn play_sounds(&mut self, sounds: Vec<String>) {
        if sounds.is_empty() {
            return;
        }
        if self.config.launch_transition_running {
            debug!(count = sounds.len(), "launch transition running; storyboard sounds muted");
            return;
        }
        if let Some(player) = self.sound.as_mut() {
            for sound in &sounds {
                player.play(sound);
            }
        }
    }

    // --- lifecycle ---

    /// Marks the subtree as showing and plays each node's `"show"` storyboard.
    pub fn show(&mut self, id: NodeId) {
        self.lifecycle_recursive(id, true, 0);
    }

    /// Marks the subtree as hidden and plays each node's `"hide"` storyboard.
    pub fn hide(&mut self, id: NodeId) {
        self.lifecycle_recursive(id, false, 0);
    }

    fn lifecycle_recursive(&mut self, id: NodeId, showing: bool, depth: usize) {
        if depth > self.config.max_depth {
            error!(node = id, depth, "{}", SceneError::RecursionLimit);
            return;
        }
        let Some(node) = self.get_node_mut(id) else {
            return;
        };

        node.state.showing = showing;
        let trigger = if showing {
            node.element.on_show();
            "show"
        } else {
            node.element.on_hide();
            "hide"
        };
        if node.has_storyboard(trigger, true) {
            node.deselect_storyboard(false);
            if node.select_storyboard(trigger) {
                node.start_storyboard();
            }
        }
        let sounds = node.take_pending_sounds();
        let children = node.children.clone();
        self.play_sounds(sounds);

        for child in children {
            self.lifecycle_recursive(child, showing, depth + 1);
        }
    }
}
