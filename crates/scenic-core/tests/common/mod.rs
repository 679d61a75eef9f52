#![allow(dead_code)]

use glam::Mat4;
use kurbo::Rect;
use scenic_core::node::GroupNode;
use scenic_core::scene::NodeState;
use scenic_core::systems::renderer::Renderer;
use scenic_core::{
    Element, HelpDisplay, HelpPrompt, InputEvent, NodeId, SceneConfig, SceneGraph, SoundPlayer,
};
use std::cell::RefCell;
use std::rc::Rc;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

/// Shared log of element hook calls.
pub type Log = Rc<RefCell<Vec<String>>>;

/// An element that records its hooks and optionally consumes events.
#[derive(Debug, Default)]
pub struct Recorder {
    pub name: String,
    pub log: Log,
    pub consume_input: bool,
    pub consume_click: bool,
    pub handles_action: Option<String>,
    pub color: f32,
    pub prompts: Vec<HelpPrompt>,
}

impl Recorder {
    pub fn new(name: &str, log: &Log) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            ..Default::default()
        }
    }

    fn record(&self, event: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.name, event));
    }
}

impl Element for Recorder {
    fn render(&self, _renderer: &mut dyn Renderer, _transform: &Mat4, _state: &NodeState) {
        self.record("render");
    }

    fn on_position_changed(&mut self, _state: &NodeState) {
        self.record("position");
    }

    fn on_size_changed(&mut self, _state: &NodeState) {
        self.record("size");
    }

    fn on_show(&mut self) {
        self.record("show");
    }

    fn on_hide(&mut self) {
        self.record("hide");
    }

    fn on_focus_gained(&mut self) {
        self.record("focus");
    }

    fn on_focus_lost(&mut self) {
        self.record("blur");
    }

    fn on_screen_saver_activate(&mut self) {
        self.record("saver on");
    }

    fn on_screen_saver_deactivate(&mut self) {
        self.record("saver off");
    }

    fn on_top_window(&mut self, is_top: bool) {
        self.record(&format!("top {is_top}"));
    }

    fn text_input(&mut self, text: &str) {
        self.record(&format!("text {text}"));
    }

    fn set_color(&mut self, color: u32) {
        self.record(&format!("color {color:08x}"));
    }

    fn help_prompts(&self) -> Vec<HelpPrompt> {
        self.prompts.clone()
    }

    fn input(&mut self, event: &InputEvent) -> bool {
        self.record(&format!("input {}", event.button));
        self.consume_input
    }

    fn on_mouse_enter(&mut self) {
        self.record("enter");
    }

    fn on_mouse_leave(&mut self) {
        self.record("leave");
    }

    fn on_mouse_click(&mut self, _button: u32, _pressed: bool, _x: f32, _y: f32) -> bool {
        self.record("click");
        self.consume_click
    }

    fn on_action(&mut self, action: &str) -> bool {
        self.record(&format!("action {action}"));
        self.handles_action.as_deref() == Some(action)
    }

    fn property(&self, name: &str) -> Option<scenic_core::PropValue> {
        (name == "color").then_some(scenic_core::PropValue::Float(self.color))
    }

    fn set_property(&mut self, name: &str, value: &scenic_core::PropValue) -> bool {
        match (name, value.as_f32()) {
            ("color", Some(v)) => {
                self.color = v;
                true
            }
            _ => false,
        }
    }
}

/// What a [`RecordingRenderer`] saw.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Matrix(Mat4),
    PushClip(Rect),
    PopClip,
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<Call>,
}

impl RecordingRenderer {
    pub fn clips(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::PushClip(r) => Some(*r),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn set_matrix(&mut self, matrix: &Mat4) {
        self.calls.push(Call::Matrix(*matrix));
    }

    fn push_clip_rect(&mut self, rect: Rect) {
        self.calls.push(Call::PushClip(rect));
    }

    fn pop_clip_rect(&mut self) {
        self.calls.push(Call::PopClip);
    }
}

#[derive(Debug, Default, Clone)]
pub struct RecordingSound {
    pub played: Rc<RefCell<Vec<String>>>,
}

impl SoundPlayer for RecordingSound {
    fn play(&mut self, sound: &str) {
        self.played.borrow_mut().push(sound.to_string());
    }
}

/// Help display that keeps every published prompt list.
#[derive(Debug, Default, Clone)]
pub struct RecordingHelp {
    pub published: Rc<RefCell<Vec<Vec<HelpPrompt>>>>,
}

impl HelpDisplay for RecordingHelp {
    fn set_help_prompts(&mut self, prompts: &[HelpPrompt]) {
        self.published.borrow_mut().push(prompts.to_vec());
    }
}

pub fn scene() -> SceneGraph {
    init_tracing();
    SceneGraph::new(SceneConfig::default())
}

/// Adds a recorder node with the given geometry.
pub fn recorder(scene: &mut SceneGraph, name: &str, log: &Log, pos: (f32, f32), size: (f32, f32)) -> NodeId {
    recorder_with(scene, Recorder::new(name, log), pos, size)
}

/// Adds `element` with the given geometry. The setup itself is not logged.
pub fn recorder_with(scene: &mut SceneGraph, element: Recorder, pos: (f32, f32), size: (f32, f32)) -> NodeId {
    let id = scene.add_node(Box::new(GroupNode::new()));
    let node = scene.get_node_mut(id).unwrap();
    node.set_position_xy(pos.0, pos.1);
    node.set_size(glam::Vec2::new(size.0, size.1));
    node.element = Box::new(element);
    id
}
