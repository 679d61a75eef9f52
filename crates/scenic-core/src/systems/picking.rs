//! # Picking
//!
//! Point queries against the scene graph.
//!
//! Results come out front to back: the last-rendered (topmost) child is
//! tested first, and a node is reported after all of its hit descendants.
//! Child order follows z-index even before the next frame re-sorts.

use crate::errors::SceneError;
use crate::scene::SceneGraph;
use crate::systems::renderer::compose_clip;
use crate::types::NodeId;
use glam::{Mat4, Vec3};
use kurbo::{Point, Rect};
use tracing::error;

/// Collects every node under the screen point `(x, y)` into `results`, topmost first.
///
/// A node is hit when the point, mapped into its local space, lies within
/// `[0, size)` and inside its effective clip. Children are only tested when
/// their parent was hit. Returns whether `node_id` itself was hit.
pub fn hit_test(
    scene: &SceneGraph,
    node_id: NodeId,
    x: f32,
    y: f32,
    parent_transform: &Mat4,
    results: &mut Vec<NodeId>,
) -> bool {
    let inherited = scene.parent(node_id).and_then(|p| effective_clip(scene, p));
    hit_test_recursive(scene, node_id, x, y, parent_transform, inherited, results, 0)
}

#[allow(clippy::too_many_arguments)]
fn hit_test_recursive(
    scene: &SceneGraph,
    node_id: NodeId,
    x: f32,
    y: f32,
    parent_transform: &Mat4,
    inherited_clip: Option<Rect>,
    results: &mut Vec<NodeId>,
    depth: usize,
) -> bool {
    if depth > scene.config().max_depth {
        error!(node = node_id, depth, "{}", SceneError::RecursionLimit);
        return false;
    }
    let Some(node) = scene.get_node(node_id) else {
        return false;
    };
    let state = node.state();
    if !state.is_visible() {
        return false;
    }

    let clip = compose_clip(inherited_clip, state.clip_rect());
    if let Some(clip) = clip {
        if !clip.contains(Point::new(x as f64, y as f64)) {
            return false;
        }
    }

    let world = *parent_transform * node.transform();
    if world.determinant() == 0.0 {
        return false;
    }
    let local = world.inverse().transform_point3(Vec3::new(x, y, 0.0));
    let size = state.size();
    if local.x < 0.0 || local.y < 0.0 || local.x >= size.x || local.y >= size.y {
        return false;
    }

    for &child_id in scene.ordered_children(node_id).iter().rev() {
        hit_test_recursive(scene, child_id, x, y, &world, clip, results, depth + 1);
    }
    results.push(node_id);
    true
}

/// The clip rectangle in force for `node_id`: the intersection of its own clip
/// and every ancestor's.
pub fn effective_clip(scene: &SceneGraph, node_id: NodeId) -> Option<Rect> {
    let mut clip = None;
    let mut current = Some(node_id);
    let mut depth = 0;
    while let Some(id) = current {
        let Some(node) = scene.get_node(id) else {
            break;
        };
        clip = compose_clip(clip, node.state().clip_rect());
        depth += 1;
        if depth > scene.config().max_depth {
            error!(node = node_id, depth, "{}", SceneError::RecursionLimit);
            break;
        }
        current = node.parent();
    }
    clip
}
