//! # Storyboard Module
//!
//! Theme-declared, time-driven property tracks.
//!
//! ## Key Types
//! - `Storyboard`: a compiled, immutable definition. Shared between nodes through `Arc`.
//! - `StoryboardAnimator`: the selected instance on one node (elapsed time, snapshot, state).
//! - `StoryboardEngine`: a node's registry, its selection and its per-property enable flags.
//!
//! A node has at most one selected storyboard:
//! `Stopped → Selected → Playing ⇄ Paused → (Finished | Selected)`.

use crate::animation::{Animated, EasingType};
use crate::node::parse_easing;
use crate::types::PropValue;
use scenic_theme::{RepeatDef, StoryboardDef};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// What happens when a storyboard reaches its end.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum RepeatPolicy {
    #[default]
    Once,
    Forever,
    /// Total number of plays.
    Count(u32),
}

impl From<RepeatDef> for RepeatPolicy {
    fn from(def: RepeatDef) -> Self {
        match def {
            RepeatDef::None => RepeatPolicy::Once,
            RepeatDef::Forever => RepeatPolicy::Forever,
            RepeatDef::Count(0) | RepeatDef::Count(1) => RepeatPolicy::Once,
            RepeatDef::Count(n) => RepeatPolicy::Count(n),
        }
    }
}

/// Playback state of a node's storyboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StoryboardState {
    /// Nothing selected.
    Stopped,
    Selected,
    Playing,
    Paused,
    /// Reached its end; no further ticks until restarted.
    Finished,
}

/// One compiled property track.
#[derive(Clone, Debug)]
pub struct Track {
    pub property: String,
    /// Time of the first keyframe; the track does not touch its property before it.
    pub begin: f64,
    pub end: f64,
    /// Keyframes relative to `begin`. `None` values start from the selection snapshot.
    pub frames: Vec<(Option<PropValue>, f64, EasingType)>,
    pub condition: Option<String>,
}

/// A compiled storyboard definition.
#[derive(Clone, Debug)]
pub struct Storyboard {
    name: String,
    source: StoryboardDef,
    tracks: Vec<Track>,
    repeat: RepeatPolicy,
    repeat_at: f64,
    sound: Option<String>,
    duration: f64,
}

impl Storyboard {
    /// Compiles a theme definition. Tracks naming a property `is_known` rejects,
    /// or declaring no keyframes, are skipped.
    pub fn compile(name: &str, def: &StoryboardDef, is_known: impl Fn(&str) -> bool) -> Self {
        let mut tracks = Vec::with_capacity(def.animations.len());
        for track_def in &def.animations {
            if !is_known(&track_def.property) {
                warn!(storyboard = name, property = %track_def.property, "skipping track for unknown property");
                continue;
            }
            let keyframes = track_def.resolved_keyframes();
            let (Some(first), Some(last)) = (keyframes.first(), keyframes.last()) else {
                warn!(storyboard = name, property = %track_def.property, "skipping track without keyframes");
                continue;
            };
            let begin = first.time as f64;
            let end = last.time as f64;
            let frames = keyframes
                .iter()
                .map(|k| {
                    (
                        k.value.as_ref().map(PropValue::from),
                        k.time as f64 - begin,
                        parse_easing(k.easing.as_deref().unwrap_or("linear")),
                    )
                })
                .collect();
            tracks.push(Track {
                property: track_def.property.clone(),
                begin,
                end,
                frames,
                condition: track_def.when.clone(),
            });
        }

        let duration = tracks.iter().map(|t| t.end).fold(0.0, f64::max);
        Self {
            name: name.to_string(),
            source: def.clone(),
            tracks,
            repeat: def.repeat.into(),
            repeat_at: (def.repeat_at as f64).clamp(0.0, duration),
            sound: def.sound.clone().filter(|s| !s.is_empty()),
            duration,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The definition this storyboard was compiled from.
    pub fn source(&self) -> &StoryboardDef {
        &self.source
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn repeat(&self) -> RepeatPolicy {
        self.repeat
    }

    pub fn sound(&self) -> Option<&str> {
        self.sound.as_deref()
    }

    /// End time of the longest track.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn has_property(&self, property: &str) -> bool {
        self.tracks.iter().any(|t| t.property == property)
    }
}

/// Evaluates a track condition against a node's binding map.
///
/// Forms: `"key"` (set and truthy), `"!key"`, `"key=value"`, `"key!=value"`.
pub fn condition_holds(condition: &str, bindings: &BTreeMap<String, String>) -> bool {
    let condition = condition.trim();
    if let Some((key, value)) = condition.split_once("!=") {
        return bindings.get(key.trim()).map(String::as_str) != Some(value.trim());
    }
    if let Some((key, value)) = condition.split_once('=') {
        return bindings.get(key.trim()).map(String::as_str) == Some(value.trim());
    }
    let truthy = |key: &str| {
        bindings
            .get(key.trim())
            .is_some_and(|v| !v.is_empty() && v != "false" && v != "0")
    };
    match condition.strip_prefix('!') {
        Some(key) => !truthy(key),
        None => truthy(condition),
    }
}

#[derive(Clone, Debug)]
struct ActiveTrack {
    property: String,
    begin: f64,
    sequence: Animated<PropValue>,
}

/// The selected storyboard of a node.
#[derive(Debug)]
pub struct StoryboardAnimator {
    storyboard: Arc<Storyboard>,
    state: StoryboardState,
    elapsed: f64,
    iteration: u32,
    tracks: Vec<ActiveTrack>,
    snapshot: Vec<(String, PropValue)>,
    /// The node's explicit z-index override at selection.
    z_override: Option<f32>,
    modified: bool,
}

impl StoryboardAnimator {
    /// Selects `storyboard`, snapshotting every property its active tracks reference.
    ///
    /// Tracks whose condition fails against `bindings`, or whose property
    /// `read` cannot provide, are left out.
    pub fn new(
        storyboard: Arc<Storyboard>,
        bindings: &BTreeMap<String, String>,
        read: impl Fn(&str) -> Option<PropValue>,
    ) -> Self {
        let mut tracks = Vec::new();
        let mut snapshot: Vec<(String, PropValue)> = Vec::new();

        for track in storyboard.tracks() {
            if let Some(condition) = &track.condition {
                if !condition_holds(condition, bindings) {
                    debug!(storyboard = storyboard.name(), property = %track.property, condition = %condition, "track condition not met");
                    continue;
                }
            }
            let Some(current) = read(&track.property) else {
                continue;
            };
            if !snapshot.iter().any(|(p, _)| p == &track.property) {
                snapshot.push((track.property.clone(), current.clone()));
            }

            let frames = track
                .frames
                .iter()
                .map(|(value, time, easing)| (value.clone().unwrap_or_else(|| current.clone()), *time, *easing))
                .collect();
            if let Some(sequence) = Animated::from_keyframes(frames) {
                tracks.push(ActiveTrack {
                    property: track.property.clone(),
                    begin: track.begin,
                    sequence,
                });
            }
        }

        Self {
            storyboard,
            state: StoryboardState::Selected,
            elapsed: 0.0,
            iteration: 0,
            tracks,
            snapshot,
            z_override: None,
            modified: false,
        }
    }

    /// Records the node's z-index override so a restore can tell an explicit
    /// value from the default.
    pub fn with_z_override(mut self, z_override: Option<f32>) -> Self {
        self.z_override = z_override;
        self
    }

    pub fn z_override(&self) -> Option<f32> {
        self.z_override
    }

    pub fn name(&self) -> &str {
        self.storyboard.name()
    }

    pub fn storyboard(&self) -> &Arc<Storyboard> {
        &self.storyboard
    }

    pub fn state(&self) -> StoryboardState {
        self.state
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Whether any value has been applied since selection.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn snapshot(&self) -> &[(String, PropValue)] {
        &self.snapshot
    }

    pub fn has_property(&self, property: &str) -> bool {
        self.tracks.iter().any(|t| t.property == property)
    }

    /// Starts or resumes playback. Returns `true` when playback begins from time zero.
    pub fn start(&mut self) -> bool {
        let from_zero = match self.state {
            StoryboardState::Finished => {
                self.elapsed = 0.0;
                self.iteration = 0;
                true
            }
            StoryboardState::Paused | StoryboardState::Playing => false,
            _ => self.elapsed == 0.0 && self.iteration == 0,
        };
        self.state = StoryboardState::Playing;
        from_zero
    }

    pub fn pause(&mut self) {
        if self.state == StoryboardState::Playing {
            self.state = StoryboardState::Paused;
        }
    }

    /// Rewinds to zero and returns to `Selected`; applied values stay in place.
    pub fn stop(&mut self) {
        self.elapsed = 0.0;
        self.iteration = 0;
        self.state = StoryboardState::Selected;
    }

    /// Advances a playing storyboard by `dt`, pushing the values to apply into `out`.
    ///
    /// Tracks for properties in `disabled` are skipped. Returns `true` when
    /// the storyboard looped back for another iteration.
    pub fn advance(
        &mut self,
        dt: f64,
        disabled: &HashSet<String>,
        out: &mut Vec<(String, PropValue)>,
    ) -> bool {
        if self.state != StoryboardState::Playing {
            return false;
        }

        self.elapsed += dt.max(0.0);
        let duration = self.storyboard.duration();
        let time = self.elapsed.min(duration);

        for track in &mut self.tracks {
            if time < track.begin || disabled.contains(&track.property) {
                continue;
            }
            track.sequence.update(time - track.begin);
            out.push((track.property.clone(), track.sequence.current_value.clone()));
        }
        if !out.is_empty() {
            self.modified = true;
        }

        if self.elapsed < duration {
            return false;
        }

        // A zero-length storyboard has nothing to repeat.
        let again = duration > 0.0
            && match self.storyboard.repeat() {
                RepeatPolicy::Once => false,
                RepeatPolicy::Forever => true,
                RepeatPolicy::Count(n) => self.iteration + 1 < n,
            };
        if !again {
            debug!(storyboard = self.name(), "storyboard finished");
            self.state = StoryboardState::Finished;
            return false;
        }

        self.iteration += 1;
        let repeat_at = self.storyboard.repeat_at;
        let span = duration - repeat_at;
        let overflow = self.elapsed - duration;
        self.elapsed = if span > 0.0 {
            repeat_at + overflow % span
        } else {
            repeat_at
        };
        true
    }
}

/// Storyboard state owned by one node.
#[derive(Debug, Default)]
pub struct StoryboardEngine {
    pub(crate) registry: HashMap<String, Arc<Storyboard>>,
    pub(crate) current: Option<StoryboardAnimator>,
    /// Properties excluded from storyboard control on this node.
    pub(crate) disabled: HashSet<String>,
}

impl StoryboardEngine {
    pub fn get(&self, name: &str) -> Option<&Arc<Storyboard>> {
        self.registry.get(name)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn current(&self) -> Option<&StoryboardAnimator> {
        self.current.as_ref()
    }

    pub fn is_property_enabled(&self, property: &str) -> bool {
        !self.disabled.contains(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenic_theme::{KeyframeDef, Property, TrackDef};

    fn fade_def(repeat: RepeatDef) -> StoryboardDef {
        StoryboardDef {
            repeat,
            animations: vec![TrackDef {
                property: "opacity".into(),
                from: Some(Property::Float(255.0)),
                to: Some(Property::Float(0.0)),
                duration: 500.0,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn select(def: &StoryboardDef) -> StoryboardAnimator {
        let sb = Arc::new(Storyboard::compile("fade", def, |_| true));
        StoryboardAnimator::new(sb, &BTreeMap::new(), |_| Some(PropValue::Float(255.0)))
    }

    fn last_f32(out: &[(String, PropValue)]) -> f32 {
        out.last().and_then(|(_, v)| v.as_f32()).unwrap()
    }

    #[test]
    fn test_unknown_properties_are_skipped() {
        let mut def = fade_def(RepeatDef::None);
        def.animations.push(TrackDef {
            property: "sparkle".into(),
            to: Some(Property::Float(1.0)),
            duration: 100.0,
            ..Default::default()
        });
        let sb = Storyboard::compile("fade", &def, |p| p == "opacity");
        assert_eq!(sb.tracks().len(), 1);
        assert!(sb.has_property("opacity"));
        assert!(!sb.has_property("sparkle"));
    }

    #[test]
    fn test_once_finishes_at_end() {
        let mut animator = select(&fade_def(RepeatDef::None));
        assert!(animator.start());
        let mut out = Vec::new();
        animator.advance(250.0, &HashSet::new(), &mut out);
        assert!((last_f32(&out) - 127.5).abs() < 0.5);
        out.clear();
        animator.advance(250.0, &HashSet::new(), &mut out);
        assert!(last_f32(&out).abs() < 1e-3);
        assert_eq!(animator.state(), StoryboardState::Finished);

        out.clear();
        animator.advance(100.0, &HashSet::new(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_forever_loops_with_overflow() {
        let mut animator = select(&fade_def(RepeatDef::Forever));
        animator.start();
        let mut out = Vec::new();
        assert!(animator.advance(600.0, &HashSet::new(), &mut out));
        assert_eq!(animator.state(), StoryboardState::Playing);
        assert_eq!(animator.iteration(), 1);
        assert!((animator.elapsed() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_count_stops_after_n_plays() {
        let mut animator = select(&fade_def(RepeatDef::Count(2)));
        animator.start();
        let mut out = Vec::new();
        assert!(animator.advance(500.0, &HashSet::new(), &mut out));
        assert!(!animator.advance(500.0, &HashSet::new(), &mut out));
        assert_eq!(animator.state(), StoryboardState::Finished);
    }

    #[test]
    fn test_zero_length_forever_finishes_without_looping() {
        let mut def = fade_def(RepeatDef::Forever);
        def.animations[0].duration = 0.0;
        let mut animator = select(&def);
        animator.start();
        let mut out = Vec::new();
        assert!(!animator.advance(16.0, &HashSet::new(), &mut out));
        assert!(last_f32(&out).abs() < 1e-3);
        assert_eq!(animator.state(), StoryboardState::Finished);
        assert_eq!(animator.iteration(), 0);
    }

    #[test]
    fn test_step_keyframes_hold_until_their_time() {
        let def = StoryboardDef {
            animations: vec![TrackDef {
                property: "x".into(),
                keyframes: vec![
                    KeyframeDef { time: 0.0, value: Property::Float(0.0), easing: None },
                    KeyframeDef { time: 100.0, value: Property::Float(0.0), easing: None },
                    KeyframeDef { time: 100.0, value: Property::Float(50.0), easing: None },
                    KeyframeDef { time: 200.0, value: Property::Float(50.0), easing: None },
                ],
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut animator = select(&def);
        animator.start();
        let mut out = Vec::new();
        animator.advance(50.0, &HashSet::new(), &mut out);
        assert!(last_f32(&out).abs() < 1e-3);
        out.clear();
        animator.advance(100.0, &HashSet::new(), &mut out);
        assert!((last_f32(&out) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_disabled_property_is_not_driven() {
        let mut animator = select(&fade_def(RepeatDef::None));
        animator.start();
        let disabled: HashSet<String> = ["opacity".to_string()].into_iter().collect();
        let mut out = Vec::new();
        animator.advance(100.0, &disabled, &mut out);
        assert!(out.is_empty());
        assert!(!animator.is_modified());
    }

    #[test]
    fn test_missing_from_uses_snapshot() {
        let def = StoryboardDef {
            animations: vec![TrackDef {
                property: "x".into(),
                to: Some(Property::Float(100.0)),
                duration: 100.0,
                ..Default::default()
            }],
            ..Default::default()
        };
        let sb = Arc::new(Storyboard::compile("slide", &def, |_| true));
        let mut animator = StoryboardAnimator::new(sb, &BTreeMap::new(), |_| Some(PropValue::Float(40.0)));
        animator.start();
        let mut out = Vec::new();
        animator.advance(50.0, &HashSet::new(), &mut out);
        assert!((last_f32(&out) - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_conditions() {
        let mut bindings = BTreeMap::new();
        bindings.insert("favorite".to_string(), "true".to_string());
        bindings.insert("system".to_string(), "snes".to_string());
        assert!(condition_holds("favorite", &bindings));
        assert!(!condition_holds("!favorite", &bindings));
        assert!(condition_holds("system=snes", &bindings));
        assert!(condition_holds("system!=nes", &bindings));
        assert!(!condition_holds("hidden", &bindings));
        assert!(condition_holds("!hidden", &bindings));
    }
}
