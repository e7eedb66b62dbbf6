use serde::{Serialize, Deserialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Rectangle,
    Circle,
    Triangle,
    Star,
    Text,
    Emoji,
    Image,
    Path,
}

impl Default for ObjectKind {
    fn default() -> Self { ObjectKind::Rectangle }
}

impl ObjectKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ObjectKind::Rectangle => "Rectangle",
            ObjectKind::Circle => "Circle",
            ObjectKind::Triangle => "Triangle",
            ObjectKind::Star => "Star",
            ObjectKind::Text => "Text",
            ObjectKind::Emoji => "Emoji",
            ObjectKind::Image => "Image",
            ObjectKind::Path => "Path",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct GradientStop {
    pub offset: f64, // 0.0 to 1.0
    pub color: String,
}

/// Linear gradient in canvas coordinates.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Gradient {
    pub x1: f64, pub y1: f64,
    pub x2: f64, pub y2: f64,
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    /// Two-color diagonal gradient spanning the whole canvas.
    pub fn diagonal(from: &str, to: &str, width: f64, height: f64) -> Self {
        Gradient {
            x1: 0.0, y1: 0.0,
            x2: width, y2: height,
            stops: vec![
                GradientStop { offset: 0.0, color: from.to_string() },
                GradientStop { offset: 1.0, color: to.to_string() },
            ],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    Color { color: String },
    Gradient(Gradient),
    /// Stretched to the canvas size when drawn.
    Image { src: String },
}

impl Background {
    pub fn color(color: &str) -> Self {
        Background::Color { color: color.to_string() }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::color(crate::config::DEFAULT_BACKGROUND)
    }
}

/// Change notifications raised by the scene.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SceneEventKind {
    ObjectAdded,
    ObjectRemoved,
    ObjectModified,
    PathCreated,
}

impl SceneEventKind {
    pub const ALL: [SceneEventKind; 4] = [
        SceneEventKind::ObjectAdded,
        SceneEventKind::ObjectRemoved,
        SceneEventKind::ObjectModified,
        SceneEventKind::PathCreated,
    ];
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SceneEvent {
    pub kind: SceneEventKind,
    /// `None` when the canvas itself changed (background, clear).
    pub target: Option<u32>,
}

impl SceneEvent {
    pub fn new(kind: SceneEventKind, target: Option<u32>) -> Self {
        SceneEvent { kind, target }
    }
}

/// Text attributes that flip between two values.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TextToggle {
    Bold,
    Italic,
    Underline,
}

impl TextToggle {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "bold" | "fontWeight" => Some(TextToggle::Bold),
            "italic" | "fontStyle" => Some(TextToggle::Italic),
            "underline" => Some(TextToggle::Underline),
            _ => None,
        }
    }
}
