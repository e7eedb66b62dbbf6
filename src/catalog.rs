//! Static tables behind the tool panels.

use serde::Serialize;
use crate::objects::PosterObject;
use crate::types::ObjectKind;

#[derive(Serialize, Clone, Debug)]
pub struct FontOption {
    pub family: &'static str,
    pub name: &'static str,
    pub weights: &'static [&'static str],
}

#[derive(Serialize, Clone, Debug)]
pub struct ShapeOption {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub shape_type: &'static str,
}

#[derive(Serialize, Clone, Debug)]
pub struct StickerCategory {
    pub name: &'static str,
    pub stickers: &'static [&'static str],
}

#[derive(Serialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemplateBackground {
    Color { color: &'static str },
    Gradient { colors: [&'static str; 2] },
}

/// Placeholder text placed by a template. `offset_x` is relative to the
/// horizontal centre of the canvas.
#[derive(Serialize, Clone, Debug)]
pub struct TemplateText {
    pub text: &'static str,
    pub offset_x: f64,
    pub top: f64,
    pub font_size: f64,
    pub font_weight: &'static str,
    pub fill: &'static str,
    pub text_align: &'static str,
}

impl TemplateText {
    pub fn to_object(&self, canvas_width: f64) -> PosterObject {
        PosterObject {
            kind: ObjectKind::Text,
            x: canvas_width / 2.0 + self.offset_x,
            y: self.top,
            text: self.text.to_string(),
            font_size: self.font_size,
            font_weight: self.font_weight.to_string(),
            fill: self.fill.to_string(),
            text_align: self.text_align.to_string(),
            editable: true,
            ..Default::default()
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct PosterTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub thumbnail: &'static str,
    pub background: TemplateBackground,
    pub elements: &'static [TemplateText],
}

const TITLE_AND_SUBTITLE: &[TemplateText] = &[
    TemplateText {
        text: "Your Title Here",
        offset_x: -100.0,
        top: 50.0,
        font_size: 36.0,
        font_weight: "bold",
        fill: "#ffffff",
        text_align: "center",
    },
    TemplateText {
        text: "Subtitle or description",
        offset_x: -80.0,
        top: 100.0,
        font_size: 18.0,
        font_weight: "normal",
        fill: "#ffffff",
        text_align: "center",
    },
];

pub const TEMPLATES: &[PosterTemplate] = &[
    PosterTemplate {
        id: "event-1",
        name: "Music Event",
        category: "Events",
        thumbnail: "https://images.pexels.com/photos/1190297/pexels-photo-1190297.jpeg?auto=compress&cs=tinysrgb&w=300",
        background: TemplateBackground::Gradient { colors: ["#667eea", "#764ba2"] },
        elements: TITLE_AND_SUBTITLE,
    },
    PosterTemplate {
        id: "birthday-1",
        name: "Birthday Party",
        category: "Birthday",
        thumbnail: "https://images.pexels.com/photos/1729797/pexels-photo-1729797.jpeg?auto=compress&cs=tinysrgb&w=300",
        background: TemplateBackground::Gradient { colors: ["#ffecd2", "#fcb69f"] },
        elements: TITLE_AND_SUBTITLE,
    },
    PosterTemplate {
        id: "sale-1",
        name: "Sale Flyer",
        category: "Business",
        thumbnail: "https://images.pexels.com/photos/5632371/pexels-photo-5632371.jpeg?auto=compress&cs=tinysrgb&w=300",
        background: TemplateBackground::Gradient { colors: ["#a8edea", "#fed6e3"] },
        elements: TITLE_AND_SUBTITLE,
    },
];

pub const STICKER_CATEGORIES: &[StickerCategory] = &[
    StickerCategory {
        name: "Emojis",
        stickers: &["😀", "😂", "🥳", "😍", "🤔", "👍", "❤️", "🎉", "🔥", "⭐", "🌟", "💫"],
    },
    StickerCategory {
        name: "Travel",
        stickers: &["✈️", "🗺️", "🧳", "📍", "🏖️", "🏔️", "🚗", "🚢", "🎒", "📷", "🌍", "🗽"],
    },
    StickerCategory {
        name: "Study",
        stickers: &["📚", "✏️", "📝", "🎓", "🖊️", "📊", "💡", "🔬", "📐", "🖥️", "⌨️", "🖱️"],
    },
    StickerCategory {
        name: "Sports",
        stickers: &["⚽", "🏀", "🏈", "⚾", "🎾", "🏐", "🏓", "🏸", "🥊", "🏆", "🥇", "🎯"],
    },
];

pub const FONT_OPTIONS: &[FontOption] = &[
    FontOption { family: "Inter", name: "Inter", weights: &["400", "500", "600", "700"] },
    FontOption { family: "Roboto", name: "Roboto", weights: &["400", "500", "700"] },
    FontOption { family: "Open Sans", name: "Open Sans", weights: &["400", "600", "700"] },
    FontOption { family: "Poppins", name: "Poppins", weights: &["400", "500", "600", "700"] },
    FontOption { family: "Montserrat", name: "Montserrat", weights: &["400", "500", "600", "700"] },
    FontOption { family: "Playfair Display", name: "Playfair Display", weights: &["400", "700"] },
];

pub const SHAPES: &[ShapeOption] = &[
    ShapeOption { name: "Rectangle", shape_type: "rectangle" },
    ShapeOption { name: "Circle", shape_type: "circle" },
    ShapeOption { name: "Triangle", shape_type: "triangle" },
    ShapeOption { name: "Star", shape_type: "star" },
];

pub const SOLID_COLORS: &[&str] = &[
    "#ffffff", "#f3f4f6", "#e5e7eb", "#d1d5db",
    "#ef4444", "#f97316", "#f59e0b", "#eab308",
    "#22c55e", "#10b981", "#06b6d4", "#0ea5e9",
    "#3b82f6", "#6366f1", "#8b5cf6", "#a855f7",
    "#ec4899", "#f43f5e", "#000000", "#374151",
];

pub const GRADIENTS: &[[&str; 2]] = &[
    ["#667eea", "#764ba2"],
    ["#f093fb", "#f5576c"],
    ["#4facfe", "#00f2fe"],
    ["#43e97b", "#38f9d7"],
    ["#fa709a", "#fee140"],
    ["#a8edea", "#fed6e3"],
    ["#ffecd2", "#fcb69f"],
    ["#ff9a9e", "#fecfef"],
];

pub const BACKGROUND_IMAGES: &[&str] = &[
    "https://images.pexels.com/photos/1103970/pexels-photo-1103970.jpeg?auto=compress&cs=tinysrgb&w=400",
    "https://images.pexels.com/photos/1054222/pexels-photo-1054222.jpeg?auto=compress&cs=tinysrgb&w=400",
    "https://images.pexels.com/photos/1525041/pexels-photo-1525041.jpeg?auto=compress&cs=tinysrgb&w=400",
    "https://images.pexels.com/photos/1576937/pexels-photo-1576937.jpeg?auto=compress&cs=tinysrgb&w=400",
];

pub const STOCK_IMAGES: &[&str] = &[
    "https://images.pexels.com/photos/3184360/pexels-photo-3184360.jpeg?auto=compress&cs=tinysrgb&w=400",
    "https://images.pexels.com/photos/3184338/pexels-photo-3184338.jpeg?auto=compress&cs=tinysrgb&w=400",
    "https://images.pexels.com/photos/3184465/pexels-photo-3184465.jpeg?auto=compress&cs=tinysrgb&w=400",
    "https://images.pexels.com/photos/3184418/pexels-photo-3184418.jpeg?auto=compress&cs=tinysrgb&w=400",
];

pub fn template_by_id(id: &str) -> Option<&'static PosterTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Every table in one JSON document, for the host's panels.
pub fn catalog_json() -> String {
    serde_json::json!({
        "templates": TEMPLATES,
        "stickers": STICKER_CATEGORIES,
        "fonts": FONT_OPTIONS,
        "shapes": SHAPES,
        "colors": SOLID_COLORS,
        "gradients": GRADIENTS,
        "background_images": BACKGROUND_IMAGES,
        "stock_images": STOCK_IMAGES,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_option_has_a_preset() {
        for shape in SHAPES {
            assert!(PosterObject::shape(shape.shape_type).is_some(), "{}", shape.shape_type);
        }
    }

    #[test]
    fn template_title_is_centred_on_canvas() {
        let template = template_by_id("event-1").unwrap();
        let title = template.elements[0].to_object(800.0);
        assert_eq!((title.x, title.y), (300.0, 50.0));
        assert_eq!(title.font_weight, "bold");
        assert!(template_by_id("missing").is_none());
    }

    #[test]
    fn catalog_serializes_all_tables() {
        let value: serde_json::Value = serde_json::from_str(&catalog_json()).unwrap();
        assert_eq!(value["templates"].as_array().unwrap().len(), 3);
        assert_eq!(value["templates"][0]["background"]["type"], "gradient");
        assert_eq!(value["stickers"][1]["name"], "Travel");
        assert_eq!(value["shapes"][3]["type"], "star");
        assert_eq!(value["colors"].as_array().unwrap().len(), 20);
    }
}
