use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A whole theme: views keyed by name (`"system"`, `"gamelist"`, ...).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ThemeData {
    #[serde(default)]
    pub views: HashMap<String, ThemeView>,
}

/// One view of a theme: its elements keyed by element name.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ThemeView {
    #[serde(default)]
    pub elements: HashMap<String, ThemeElement>,
}

/// A themed element: a flat property bag plus named storyboards.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ThemeElement {
    /// Element type as declared by the theme (`"image"`, `"text"`, ...).
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: HashMap<String, Property>,
    /// Storyboards keyed by event name. The empty name is the default storyboard.
    #[serde(default)]
    pub storyboards: HashMap<String, StoryboardDef>,
}

/// A single property value from a theme bag.
///
/// Variant order matters: serde tries them top to bottom.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Property {
    Bool(bool),
    Float(f32),
    Pair([f32; 2]),
    Triple([f32; 3]),
    Quad([f32; 4]),
    Text(String),
}

/// How a storyboard behaves once its last keyframe has been reached.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepeatDef {
    #[default]
    None,
    Forever,
    Count(u32),
}

/// A theme-declared storyboard: a set of property tracks and a repeat policy.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct StoryboardDef {
    #[serde(default)]
    pub repeat: RepeatDef,
    /// Time offset the storyboard loops back to when it repeats.
    #[serde(default, rename = "repeatAt")]
    pub repeat_at: f32,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub animations: Vec<TrackDef>,
}

/// One property track.
///
/// Either `keyframes` is given, or the `from`/`to`/`begin`/`duration` shorthand.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TrackDef {
    pub property: String,
    #[serde(default)]
    pub keyframes: Vec<KeyframeDef>,
    #[serde(default)]
    pub from: Option<Property>,
    #[serde(default)]
    pub to: Option<Property>,
    #[serde(default)]
    pub begin: f32,
    #[serde(default)]
    pub duration: f32,
    #[serde(default)]
    pub easing: Option<String>,
    #[serde(default, rename = "autoReverse")]
    pub auto_reverse: bool,
    /// Binding condition: `"key"`, `"!key"` or `"key=value"`.
    #[serde(default)]
    pub when: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KeyframeDef {
    pub time: f32,
    pub value: Property,
    #[serde(default)]
    pub easing: Option<String>,
}

/// A keyframe after shorthand expansion.
///
/// `value` is `None` when the track omitted `from`: the runtime substitutes
/// the property's value at the moment the storyboard was selected.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedKeyframe {
    pub time: f32,
    pub value: Option<Property>,
    pub easing: Option<String>,
}

impl TrackDef {
    /// Expands the track into time-ordered keyframes.
    ///
    /// Returns an empty list for a track that declares neither keyframes nor a `to` value.
    pub fn resolved_keyframes(&self) -> Vec<ResolvedKeyframe> {
        if !self.keyframes.is_empty() {
            let mut frames: Vec<ResolvedKeyframe> = self
                .keyframes
                .iter()
                .map(|k| ResolvedKeyframe {
                    time: k.time.max(0.0),
                    value: Some(k.value.clone()),
                    easing: k.easing.clone().or_else(|| self.easing.clone()),
                })
                .collect();
            frames.sort_by(|a, b| a.time.total_cmp(&b.time));
            return frames;
        }

        let Some(to) = &self.to else {
            return Vec::new();
        };

        let begin = self.begin.max(0.0);
        let end = begin + self.duration.max(0.0);
        let mut frames = vec![
            ResolvedKeyframe {
                time: begin,
                value: self.from.clone(),
                easing: self.easing.clone(),
            },
            ResolvedKeyframe {
                time: end,
                value: Some(to.clone()),
                easing: self.easing.clone(),
            },
        ];
        if self.auto_reverse {
            frames.push(ResolvedKeyframe {
                time: end + self.duration.max(0.0),
                value: self.from.clone(),
                easing: self.easing.clone(),
            });
        }
        frames
    }
}

impl ThemeElement {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.properties.get(name)? {
            Property::Float(v) => Some(*v),
            Property::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Property::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn pair(&self, name: &str) -> Option<[f32; 2]> {
        match self.properties.get(name)? {
            Property::Pair(p) => Some(*p),
            Property::Float(v) => Some([*v, *v]),
            Property::Text(s) => parse_pair(s),
            _ => None,
        }
    }

    pub fn quad(&self, name: &str) -> Option<[f32; 4]> {
        match self.properties.get(name)? {
            Property::Quad(q) => Some(*q),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.properties.get(name)? {
            Property::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.properties.get(name)? {
            Property::Bool(b) => Some(*b),
            Property::Float(v) => Some(*v != 0.0),
            Property::Text(s) => match s.trim() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

// Theme authors frequently write pairs as "0.5 0.5".
fn parse_pair(s: &str) -> Option<[f32; 2]> {
    let mut parts = s.split_whitespace().map(str::parse::<f32>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), None) => Some([x, y]),
        _ => None,
    }
}
