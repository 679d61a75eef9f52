mod common;

use common::{recorder, recorder_with, scene, Log, Recorder, RecordingHelp};
use scenic_core::HelpPrompt;

#[test]
fn focus_moves_between_nodes() {
    let mut scene = scene();
    let log = Log::default();
    let a = recorder(&mut scene, "a", &log, (0.0, 0.0), (10.0, 10.0));
    let b = recorder(&mut scene, "b", &log, (0.0, 0.0), (10.0, 10.0));

    assert!(scene.set_focus(Some(a)));
    assert!(scene.set_focus(Some(a)));
    assert!(scene.set_focus(Some(b)));
    assert_eq!(scene.focused(), Some(b));
    assert!(!scene.set_focus(Some(99)));
    assert_eq!(scene.focused(), Some(b));
    assert!(scene.set_focus(None));
    assert_eq!(log.borrow().as_slice(), ["a:focus", "a:blur", "b:focus", "b:blur"]);

    scene.set_focus(Some(a));
    scene.destroy_node(a);
    assert_eq!(scene.focused(), None);
}

#[test]
fn broadcasts_reach_the_whole_subtree_parents_first() {
    let mut scene = scene();
    let log = Log::default();
    let root = recorder(&mut scene, "root", &log, (0.0, 0.0), (100.0, 100.0));
    let child = recorder(&mut scene, "child", &log, (0.0, 0.0), (10.0, 10.0));
    let other = recorder(&mut scene, "other", &log, (0.0, 0.0), (10.0, 10.0));
    scene.add_child(root, child).unwrap();

    scene.dispatch_text_input(root, "abc");
    scene.set_screen_saver_active(root, true);
    scene.set_screen_saver_active(root, false);
    scene.set_top_window(root, false);
    assert_eq!(
        log.borrow().as_slice(),
        [
            "root:text abc",
            "child:text abc",
            "root:saver on",
            "child:saver on",
            "root:saver off",
            "child:saver off",
            "root:top false",
            "child:top false",
        ]
    );

    log.borrow_mut().clear();
    scene.set_top_window(other, true);
    assert_eq!(log.borrow().as_slice(), ["other:top true"]);
}

#[test]
fn help_prompts_come_from_the_topmost_ancestor() {
    let mut scene = scene();
    let log = Log::default();
    let prompts = vec![HelpPrompt::new("a", "select"), HelpPrompt::new("b", "back")];
    let root = recorder_with(
        &mut scene,
        Recorder { prompts: prompts.clone(), ..Recorder::new("root", &log) },
        (0.0, 0.0),
        (100.0, 100.0),
    );
    let leaf = recorder(&mut scene, "leaf", &log, (0.0, 0.0), (10.0, 10.0));
    scene.add_child(root, leaf).unwrap();

    assert!(!scene.update_help_prompts(leaf));

    let help = RecordingHelp::default();
    scene.set_help_display(Box::new(help.clone()));
    assert!(scene.update_help_prompts(leaf));
    assert!(!scene.update_help_prompts(99));
    assert_eq!(help.published.borrow().as_slice(), [prompts]);
    assert!(scene.get_node(leaf).unwrap().help_prompts().is_empty());
}

#[test]
fn set_color_reaches_the_element() {
    let mut scene = scene();
    let log = Log::default();
    let id = recorder(&mut scene, "n", &log, (0.0, 0.0), (10.0, 10.0));
    scene.get_node_mut(id).unwrap().set_color(0xFF00_80FF);
    assert_eq!(log.borrow().as_slice(), ["n:color ff0080ff"]);
}
