//! # Renderer System
//!
//! Walks the scene graph and hands each visible node to a [`Renderer`].
//!
//! ## Responsibilities
//! - **Scene Traversal**: paints children in z-order after their parent (`render_recursive`).
//! - **Transforms**: composes `parent_world * local` on the fly; world matrices are never stored.
//! - **Clipping**: a node's clip rectangle is intersected with the inherited one before it is pushed.

use crate::errors::SceneError;
use crate::scene::SceneGraph;
use crate::types::NodeId;
use glam::Mat4;
use kurbo::Rect;
use tracing::error;

/// The drawing backend.
///
/// Receives the composed model matrix before each node draws, and a stack of
/// clip rectangles in screen coordinates.
pub trait Renderer {
    fn set_matrix(&mut self, matrix: &Mat4);
    fn push_clip_rect(&mut self, rect: Rect);
    fn pop_clip_rect(&mut self);
}

/// Intersects an inherited clip with a node's own clip rectangle.
///
/// The result is never larger than either input.
pub fn compose_clip(inherited: Option<Rect>, own: Option<Rect>) -> Option<Rect> {
    match (inherited, own) {
        (Some(a), Some(b)) => Some(a.intersect(b)),
        (a, b) => a.or(b),
    }
}

/// Renders the subtree rooted at `root`, sorting dirty child lists first.
pub fn render(scene: &mut SceneGraph, root: NodeId, renderer: &mut dyn Renderer) {
    scene.sort_subtree(root);
    render_recursive(scene, root, renderer, &Mat4::IDENTITY, None, 0);
}

/// Recursively renders a node and its children.
///
/// Invisible and fully transparent nodes are skipped with their subtree.
pub fn render_recursive(
    scene: &SceneGraph,
    node_id: NodeId,
    renderer: &mut dyn Renderer,
    parent_transform: &Mat4,
    inherited_clip: Option<Rect>,
    depth: usize,
) {
    if depth > scene.config().max_depth {
        error!(node = node_id, depth, "{}", SceneError::RecursionLimit);
        return;
    }
    let Some(node) = scene.get_node(node_id) else {
        return;
    };
    let state = node.state();
    if !state.is_visible() || state.opacity() == 0 {
        return;
    }

    let world = *parent_transform * node.transform();
    let clip = compose_clip(inherited_clip, state.clip_rect());
    let pushed = match (state.clip_rect(), clip) {
        (Some(_), Some(rect)) => {
            renderer.push_clip_rect(rect);
            true
        }
        _ => false,
    };

    renderer.set_matrix(&world);
    node.element.render(renderer, &world, state);

    for &child_id in node.children() {
        render_recursive(scene, child_id, renderer, &world, clip, depth + 1);
    }

    if pushed {
        renderer.pop_clip_rect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_clip_intersects() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(50.0, 50.0, 200.0, 200.0);
        assert_eq!(compose_clip(Some(outer), Some(inner)), Some(Rect::new(50.0, 50.0, 100.0, 100.0)));
        assert_eq!(compose_clip(None, Some(inner)), Some(inner));
        assert_eq!(compose_clip(Some(outer), None), Some(outer));
        assert_eq!(compose_clip(None, None), None);
    }

    #[test]
    fn test_disjoint_clips_are_empty() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 30.0, 30.0);
        let clip = compose_clip(Some(a), Some(b)).unwrap();
        assert_eq!(clip.area(), 0.0);
    }
}
