use serde::{Serialize, Deserialize};
use kurbo::{BezPath, Affine, Point, Shape};
use crate::types::{ObjectKind, Point2};

pub const DEFAULT_LEFT: f64 = 100.0;
pub const DEFAULT_TOP: f64 = 100.0;
pub const DEFAULT_TEXT: &str = "Double click to edit";
pub const IMAGE_SCALE: f64 = 0.3;

/// Outline of the star preset, in the object's local coordinates.
pub const STAR_POINTS: [(f64, f64); 10] = [
    (50.0, 0.0), (61.0, 35.0), (98.0, 35.0), (68.0, 57.0), (79.0, 91.0),
    (50.0, 70.0), (21.0, 91.0), (32.0, 57.0), (2.0, 35.0), (39.0, 35.0),
];

/// One item placed on the poster. `x`/`y` are the top-left corner; the drawn
/// size is `width * scale_x` by `height * scale_y`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct PosterObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64, // in radians
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
    pub visible: bool,
    // Polygon outline (star)
    pub points: Vec<Point2>,
    // Text specific
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: String,
    pub font_style: String,
    pub underline: bool,
    pub text_align: String,
    pub editable: bool,
    // Image source: URL or data URL
    pub src: String,
    // Freehand path, relative to (x, y)
    pub path_data: String,
}

impl Default for PosterObject {
    fn default() -> Self {
        PosterObject {
            id: 0,
            kind: ObjectKind::Rectangle,
            x: DEFAULT_LEFT,
            y: DEFAULT_TOP,
            width: 0.0,
            height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            fill: "#000000".to_string(),
            stroke: "transparent".to_string(),
            stroke_width: 0.0,
            opacity: 1.0,
            visible: true,
            points: Vec::new(),
            text: String::new(),
            font_family: "Arial".to_string(),
            font_size: 24.0,
            font_weight: "normal".to_string(),
            font_style: "normal".to_string(),
            underline: false,
            text_align: "left".to_string(),
            editable: false,
            src: String::new(),
            path_data: String::new(),
        }
    }
}

impl PosterObject {
    pub fn text(content: &str) -> Self {
        PosterObject {
            kind: ObjectKind::Text,
            text: content.to_string(),
            editable: true,
            ..Default::default()
        }
    }

    pub fn emoji(emoji: &str) -> Self {
        PosterObject {
            kind: ObjectKind::Emoji,
            text: emoji.to_string(),
            font_size: 48.0,
            editable: false,
            ..Default::default()
        }
    }

    /// Shape presets from the shapes panel. Unknown names yield `None`.
    pub fn shape(name: &str) -> Option<Self> {
        let obj = match name {
            "rectangle" => PosterObject {
                kind: ObjectKind::Rectangle,
                width: 100.0, height: 60.0,
                fill: "#3B82F6".to_string(),
                ..Default::default()
            },
            "circle" => PosterObject {
                kind: ObjectKind::Circle,
                width: 100.0, height: 100.0,
                fill: "#10B981".to_string(),
                ..Default::default()
            },
            "triangle" => PosterObject {
                kind: ObjectKind::Triangle,
                width: 100.0, height: 100.0,
                fill: "#F59E0B".to_string(),
                ..Default::default()
            },
            "star" => {
                let points: Vec<Point2> = STAR_POINTS.iter().map(|&(x, y)| Point2 { x, y }).collect();
                let (w, h) = polygon_extent(&points);
                PosterObject {
                    kind: ObjectKind::Star,
                    width: w, height: h,
                    points,
                    fill: "#EF4444".to_string(),
                    ..Default::default()
                }
            }
            _ => return None,
        };
        Some(obj)
    }

    pub fn image(src: &str, natural_width: f64, natural_height: f64) -> Self {
        PosterObject {
            kind: ObjectKind::Image,
            width: natural_width,
            height: natural_height,
            scale_x: IMAGE_SCALE,
            scale_y: IMAGE_SCALE,
            src: src.to_string(),
            ..Default::default()
        }
    }

    /// Builds a freehand stroke from absolute canvas points. Returns `None`
    /// for an empty point list.
    pub fn freehand(points: &[Point2], color: &str, stroke_width: f64) -> Option<Self> {
        let first = points.first()?;
        let mut path = BezPath::new();
        path.move_to(Point::new(first.x, first.y));
        for p in &points[1..] {
            path.line_to(Point::new(p.x, p.y));
        }
        let bbox = path.bounding_box();
        path.apply_affine(Affine::translate((-bbox.x0, -bbox.y0)));
        Some(PosterObject {
            kind: ObjectKind::Path,
            x: bbox.x0,
            y: bbox.y0,
            width: bbox.width().max(1.0),
            height: bbox.height().max(1.0),
            fill: "transparent".to_string(),
            stroke: color.to_string(),
            stroke_width,
            path_data: path.to_svg(),
            ..Default::default()
        })
    }

    pub fn scaled_size(&self) -> (f64, f64) {
        (self.width * self.scale_x, self.height * self.scale_y)
    }

    /// Name shown in the layers panel.
    pub fn label(&self) -> String {
        match self.kind {
            ObjectKind::Text => {
                let preview: String = self.text.chars().take(20).collect();
                if preview.is_empty() { "Text: Text".to_string() } else { format!("Text: {}", preview) }
            }
            kind => kind.display_name().to_string(),
        }
    }

    /// Applies a JSON patch of properties. Unknown keys are ignored.
    pub fn apply_patch(&mut self, params: &serde_json::Value) {
        if let Some(v) = params["x"].as_f64() { self.x = v; }
        if let Some(v) = params["y"].as_f64() { self.y = v; }
        if let Some(v) = params["width"].as_f64() { self.width = v; }
        if let Some(v) = params["height"].as_f64() { self.height = v; }
        if let Some(v) = params["scale_x"].as_f64() { self.scale_x = v; }
        if let Some(v) = params["scale_y"].as_f64() { self.scale_y = v; }
        if let Some(v) = params["rotation"].as_f64() { self.rotation = v; }
        if let Some(v) = params["fill"].as_str() { self.fill = v.to_string(); }
        if let Some(v) = params["stroke"].as_str() { self.stroke = v.to_string(); }
        if let Some(v) = params["stroke_width"].as_f64() { self.stroke_width = v; }
        if let Some(v) = params["opacity"].as_f64() { self.opacity = v.clamp(0.0, 1.0); }
        if let Some(v) = params["visible"].as_bool() { self.visible = v; }
        if let Some(v) = params["text"].as_str() { self.text = v.to_string(); }
        if let Some(v) = params["font_family"].as_str() { self.font_family = v.to_string(); }
        if let Some(v) = params["font_size"].as_f64() { self.font_size = v; }
        if let Some(v) = params["font_weight"].as_str() { self.font_weight = v.to_string(); }
        if let Some(v) = params["font_style"].as_str() { self.font_style = v.to_string(); }
        if let Some(v) = params["underline"].as_bool() { self.underline = v; }
        if let Some(v) = params["text_align"].as_str() { self.text_align = v.to_string(); }
    }
}

fn polygon_extent(points: &[Point2]) -> (f64, f64) {
    let max_x = points.iter().map(|p| p.x).fold(0.0, f64::max);
    let max_y = points.iter().map(|p| p.y).fold(0.0, f64::max);
    (max_x, max_y)
}
