mod common;

use common::{recorder, scene, Call, Log, RecordingRenderer};
use glam::{Mat4, Vec3};
use scenic_core::animation::LambdaAnimation;
use scenic_core::systems::render;
use scenic_core::{SceneError, SceneNode};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn add_child_reparents_and_keeps_links_consistent() {
    let mut scene = scene();
    let log = Log::default();
    let a = recorder(&mut scene, "a", &log, (0.0, 0.0), (10.0, 10.0));
    let b = recorder(&mut scene, "b", &log, (0.0, 0.0), (10.0, 10.0));
    let c = recorder(&mut scene, "c", &log, (0.0, 0.0), (10.0, 10.0));

    scene.add_child(a, c).unwrap();
    assert_eq!(scene.parent(c), Some(a));
    assert_eq!(scene.child(a, 0), Some(c));

    scene.add_child(b, c).unwrap();
    assert_eq!(scene.parent(c), Some(b));
    assert_eq!(scene.child_count(a), 0);
    assert_eq!(scene.child_count(b), 1);

    // Re-adding to the same parent does not duplicate.
    scene.add_child(b, c).unwrap();
    assert_eq!(scene.child_count(b), 1);
}

#[test]
fn add_child_rejects_cycles_and_unknown_ids() {
    let mut scene = scene();
    let log = Log::default();
    let a = recorder(&mut scene, "a", &log, (0.0, 0.0), (10.0, 10.0));
    let b = recorder(&mut scene, "b", &log, (0.0, 0.0), (10.0, 10.0));
    let c = recorder(&mut scene, "c", &log, (0.0, 0.0), (10.0, 10.0));
    scene.add_child(a, b).unwrap();
    scene.add_child(b, c).unwrap();

    assert_eq!(scene.add_child(c, a), Err(SceneError::Cycle { parent: c, child: a }));
    assert_eq!(scene.add_child(a, a), Err(SceneError::SelfParent(a)));
    assert_eq!(scene.add_child(a, 42), Err(SceneError::NodeNotFound(42)));
    assert!(scene.is_child(a, c));
    assert!(!scene.is_child(c, a));
    assert_eq!(scene.parent(a), None);
}

#[test]
fn remove_and_clear_detach_without_destroying() {
    let mut scene = scene();
    let log = Log::default();
    let root = recorder(&mut scene, "root", &log, (0.0, 0.0), (10.0, 10.0));
    let a = recorder(&mut scene, "a", &log, (0.0, 0.0), (10.0, 10.0));
    let b = recorder(&mut scene, "b", &log, (0.0, 0.0), (10.0, 10.0));
    scene.add_child(root, a).unwrap();
    scene.add_child(root, b).unwrap();

    assert!(scene.remove_child(root, a));
    assert!(!scene.remove_child(root, a));
    assert_eq!(scene.parent(a), None);
    assert!(scene.get_node(a).is_some());

    scene.clear_children(root);
    assert_eq!(scene.child_count(root), 0);
    assert_eq!(scene.parent(b), None);
    assert!(scene.get_node(b).is_some());
}

#[test]
fn destroy_drops_subtree_without_callbacks() {
    let mut scene = scene();
    let log = Log::default();
    let root = recorder(&mut scene, "root", &log, (0.0, 0.0), (10.0, 10.0));
    let a = recorder(&mut scene, "a", &log, (0.0, 0.0), (10.0, 10.0));
    let b = recorder(&mut scene, "b", &log, (0.0, 0.0), (10.0, 10.0));
    scene.add_child(root, a).unwrap();
    scene.add_child(a, b).unwrap();

    let fired = Rc::new(Cell::new(false));
    let f = fired.clone();
    scene.get_node_mut(b).unwrap().set_animation(
        LambdaAnimation::new(100.0, |_: &mut SceneNode, _| {}),
        0.0,
        Some(Box::new(move |_: &mut SceneNode| f.set(true))),
        false,
        0,
    );

    scene.destroy_node(a);
    assert!(scene.get_node(a).is_none());
    assert!(scene.get_node(b).is_none());
    assert_eq!(scene.child_count(root), 0);
    assert!(!fired.get());
}

#[test]
fn update_runs_own_animations_before_children() {
    let mut scene = scene();
    let log = Log::default();
    let root = recorder(&mut scene, "root", &log, (0.0, 0.0), (10.0, 10.0));
    let child = recorder(&mut scene, "child", &log, (0.0, 0.0), (10.0, 10.0));
    scene.add_child(root, child).unwrap();

    let order = Rc::new(std::cell::RefCell::new(Vec::new()));
    for (id, name) in [(child, "child"), (root, "root")] {
        let order = order.clone();
        scene.get_node_mut(id).unwrap().set_animation(
            LambdaAnimation::new(100.0, move |_: &mut SceneNode, _| order.borrow_mut().push(name)),
            0.0,
            None,
            false,
            0,
        );
    }

    scene.update(root, 10.0);
    assert_eq!(order.borrow().as_slice(), ["root", "child"]);
}

#[test]
fn children_render_in_stable_z_order() {
    let mut scene = scene();
    let log = Log::default();
    let root = recorder(&mut scene, "root", &log, (0.0, 0.0), (100.0, 100.0));
    let a = recorder(&mut scene, "a", &log, (0.0, 0.0), (10.0, 10.0));
    let b = recorder(&mut scene, "b", &log, (0.0, 0.0), (10.0, 10.0));
    let c = recorder(&mut scene, "c", &log, (0.0, 0.0), (10.0, 10.0));
    for id in [a, b, c] {
        scene.add_child(root, id).unwrap();
    }
    scene.get_node_mut(a).unwrap().set_z_index(2.0);
    scene.get_node_mut(c).unwrap().set_default_z_index(-1.0);

    let mut renderer = RecordingRenderer::default();
    render(&mut scene, root, &mut renderer);
    assert_eq!(
        log.borrow().as_slice(),
        ["root:render", "c:render", "b:render", "a:render"]
    );
    assert_eq!(scene.child(root, 0), Some(c));

    // Clearing the override falls back to the default z-index.
    log.borrow_mut().clear();
    scene.get_node_mut(a).unwrap().clear_z_index();
    render(&mut scene, root, &mut renderer);
    assert_eq!(
        log.borrow().as_slice(),
        ["root:render", "c:render", "b:render", "a:render"]
    );
}

#[test]
fn render_composes_world_transforms_and_skips_hidden() {
    let mut scene = scene();
    let log = Log::default();
    let root = recorder(&mut scene, "root", &log, (10.0, 20.0), (100.0, 100.0));
    let child = recorder(&mut scene, "child", &log, (5.0, 5.0), (10.0, 10.0));
    let hidden = recorder(&mut scene, "hidden", &log, (0.0, 0.0), (10.0, 10.0));
    let clear = recorder(&mut scene, "clear", &log, (0.0, 0.0), (10.0, 10.0));
    for id in [child, hidden, clear] {
        scene.add_child(root, id).unwrap();
    }
    scene.get_node_mut(hidden).unwrap().set_visible(false);
    scene.get_node_mut(clear).unwrap().set_opacity(0);

    let mut renderer = RecordingRenderer::default();
    render(&mut scene, root, &mut renderer);
    assert_eq!(log.borrow().as_slice(), ["root:render", "child:render"]);
    assert_eq!(
        renderer.calls,
        vec![
            Call::Matrix(Mat4::from_translation(Vec3::new(10.0, 20.0, 0.0))),
            Call::Matrix(Mat4::from_translation(Vec3::new(15.0, 25.0, 0.0))),
        ]
    );
}
