use base64::{Engine as _, engine::general_purpose};
use image::ImageFormat;
use serde::Serialize;
use tracing::error;
use crate::catalog::{self, TemplateBackground};
use crate::engine::PosterEngine;
use crate::error::{EngineError, EngineResult};
use crate::objects::{PosterObject, DEFAULT_TEXT};
use crate::types::{Background, Gradient, ObjectKind, Point2, TextToggle};

#[derive(Serialize, Debug, PartialEq)]
pub struct LayerEntry {
    pub id: u32,
    pub label: String,
    pub visible: bool,
    pub selected: bool,
}

/// Operations behind the tool panels. Each one mutates the scene and then
/// commits, so a single panel action is at most one history step.
impl PosterEngine {
    fn place(&mut self, obj: PosterObject) -> u32 {
        let id = self.scene.add(obj);
        self.selected_id = Some(id);
        self.commit();
        id
    }

    pub fn add_text(&mut self, text: Option<&str>) -> u32 {
        self.place(PosterObject::text(text.unwrap_or(DEFAULT_TEXT)))
    }

    /// Returns `None` for shape names the shapes panel does not offer.
    pub fn add_shape(&mut self, shape: &str) -> Option<u32> {
        let obj = PosterObject::shape(shape)?;
        Some(self.place(obj))
    }

    pub fn add_emoji(&mut self, emoji: &str) -> u32 {
        self.place(PosterObject::emoji(emoji))
    }

    /// Adds an image the host already loaded, e.g. a stock photo URL.
    pub fn add_image_url(&mut self, src: &str, natural_width: f64, natural_height: f64) -> EngineResult<u32> {
        if src.is_empty() || !(natural_width > 0.0 && natural_height > 0.0) {
            let err = EngineError::ImageLoad(format!("image {:?} has no usable size", src));
            error!("{}", err);
            return Err(err);
        }
        Ok(self.place(PosterObject::image(src, natural_width, natural_height)))
    }

    /// Decodes an uploaded file and embeds it as a data URL.
    pub fn add_image_bytes(&mut self, data: &[u8]) -> EngineResult<u32> {
        let (src, width, height) = match decode_upload(data) {
            Ok(decoded) => decoded,
            Err(e) => {
                error!("{}", e);
                return Err(e);
            }
        };
        Ok(self.place(PosterObject::image(&src, width as f64, height as f64)))
    }

    pub fn add_freehand_path(&mut self, points: &[Point2], color: &str, stroke_width: f64) -> Option<u32> {
        let obj = PosterObject::freehand(points, color, stroke_width)?;
        let id = self.scene.add_path(obj);
        self.selected_id = Some(id);
        self.commit();
        Some(id)
    }

    pub fn set_background_color(&mut self, color: &str) {
        self.scene.set_background(Background::color(color));
        self.commit();
    }

    pub fn set_background_gradient(&mut self, from: &str, to: &str) {
        let gradient = Gradient::diagonal(from, to, self.scene.width(), self.scene.height());
        self.scene.set_background(Background::Gradient(gradient));
        self.commit();
    }

    pub fn set_background_image(&mut self, src: &str) {
        self.scene.set_background(Background::Image { src: src.to_string() });
        self.commit();
    }

    pub fn select(&mut self, id: Option<u32>) -> EngineResult<()> {
        if let Some(id) = id {
            self.scene.get(id).ok_or(EngineError::ObjectNotFound(id))?;
        }
        self.selected_id = id;
        Ok(())
    }

    /// Applies a property patch to any object.
    pub fn update_object(&mut self, id: u32, params: &serde_json::Value) -> EngineResult<()> {
        self.scene.modify(id, |obj| obj.apply_patch(params))?;
        self.commit();
        Ok(())
    }

    /// The selected object when it is a text object; `None` otherwise.
    fn selected_text(&self) -> Option<u32> {
        let id = self.selected_id?;
        let obj = self.scene.get(id)?;
        (obj.kind == ObjectKind::Text).then_some(id)
    }

    /// Patches the selected text object. A no-op (`Ok(false)`) when no text
    /// is selected.
    pub fn set_text_property(&mut self, params: &serde_json::Value) -> EngineResult<bool> {
        let Some(id) = self.selected_text() else { return Ok(false) };
        self.update_object(id, params)?;
        Ok(true)
    }

    pub fn toggle_text_style(&mut self, toggle: TextToggle) -> EngineResult<bool> {
        let Some(id) = self.selected_text() else { return Ok(false) };
        self.scene.modify(id, |obj| match toggle {
            TextToggle::Bold => {
                obj.font_weight = if obj.font_weight == "bold" { "normal" } else { "bold" }.to_string();
            }
            TextToggle::Italic => {
                obj.font_style = if obj.font_style == "italic" { "normal" } else { "italic" }.to_string();
            }
            TextToggle::Underline => obj.underline = !obj.underline,
        })?;
        self.commit();
        Ok(true)
    }

    pub fn toggle_visibility(&mut self, id: u32) -> EngineResult<bool> {
        let mut visible = false;
        self.scene.modify(id, |obj| {
            obj.visible = !obj.visible;
            visible = obj.visible;
        })?;
        self.commit();
        Ok(visible)
    }

    pub fn bring_forward(&mut self, id: u32) -> EngineResult<bool> {
        let moved = self.scene.bring_forward(id)?;
        self.commit();
        Ok(moved)
    }

    pub fn send_backward(&mut self, id: u32) -> EngineResult<bool> {
        let moved = self.scene.send_backward(id)?;
        self.commit();
        Ok(moved)
    }

    pub fn delete_object(&mut self, id: u32) -> EngineResult<()> {
        self.scene.remove(id)?;
        self.prune_selection();
        self.commit();
        Ok(())
    }

    /// Replaces the poster with a template's background and placeholder text.
    pub fn apply_template(&mut self, template_id: &str) -> EngineResult<()> {
        let template = catalog::template_by_id(template_id)
            .ok_or_else(|| EngineError::InvalidCommand(format!("unknown template {:?}", template_id)))?;
        let (width, height) = (self.scene.width(), self.scene.height());
        let background = match &template.background {
            TemplateBackground::Color { color } => Background::color(color),
            TemplateBackground::Gradient { colors } => {
                Background::Gradient(Gradient::diagonal(colors[0], colors[1], width, height))
            }
        };
        self.scene.clear(background);
        for element in template.elements {
            self.scene.add(element.to_object(width));
        }
        self.selected_id = None;
        self.commit();
        Ok(())
    }

    pub fn clear_poster(&mut self) {
        let background = self.default_background();
        self.scene.clear(background);
        self.selected_id = None;
        self.commit();
    }

    /// Objects bottom to top, as listed by the layers panel.
    pub fn layers(&self) -> Vec<LayerEntry> {
        self.scene
            .objects()
            .iter()
            .map(|obj| LayerEntry {
                id: obj.id,
                label: obj.label(),
                visible: obj.visible,
                selected: self.selected_id == Some(obj.id),
            })
            .collect()
    }
}

/// Returns the upload as a data URL plus its pixel size.
fn decode_upload(data: &[u8]) -> EngineResult<(String, u32, u32)> {
    let format = image::guess_format(data).map_err(|e| EngineError::ImageLoad(e.to_string()))?;
    let img = image::load_from_memory_with_format(data, format).map_err(|e| EngineError::ImageLoad(e.to_string()))?;
    let mime = match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        other => return Err(EngineError::ImageLoad(format!("unsupported image format {:?}", other))),
    };
    let b64 = general_purpose::STANDARD.encode(data);
    Ok((format!("data:{};base64,{}", mime, b64), img.width(), img.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::scene::SceneAdapter;
    use image::{DynamicImage, ImageOutputFormat, RgbaImage};
    use std::io::Cursor;
    use tracing_test::traced_test;

    fn engine() -> PosterEngine {
        let mut engine = PosterEngine::new();
        engine.set_store(Box::new(MemoryStore::new()));
        engine
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn each_panel_action_is_one_history_step() {
        let mut e = engine();
        e.add_text(None);
        e.add_shape("circle").unwrap();
        e.add_emoji("🎉");
        e.set_background_color("#ef4444");
        assert_eq!(e.history().undo_len(), 5);
        assert_eq!(e.scene().objects()[0].text, "Double click to edit");
    }

    #[test]
    fn unknown_shape_adds_nothing() {
        let mut e = engine();
        assert!(e.add_shape("hexagon").is_none());
        assert!(e.scene().objects().is_empty());
        assert_eq!(e.history().undo_len(), 1);
    }

    #[test]
    fn new_object_becomes_selection() {
        let mut e = engine();
        let id = e.add_shape("star").unwrap();
        assert_eq!(e.get_selected_id(), Some(id));
        assert!(e.layers()[0].selected);
    }

    #[test]
    fn text_styling_needs_a_selected_text() {
        let mut e = engine();
        e.add_shape("rectangle").unwrap();
        assert!(!e.toggle_text_style(TextToggle::Bold).unwrap());

        let id = e.add_text(Some("Sale"));
        assert!(e.toggle_text_style(TextToggle::Bold).unwrap());
        assert!(e.toggle_text_style(TextToggle::Italic).unwrap());
        assert!(e.set_text_property(&serde_json::json!({ "font_family": "Poppins" })).unwrap());
        let text = e.scene().get(id).unwrap();
        assert_eq!(text.font_weight, "bold");
        assert_eq!(text.font_style, "italic");
        assert_eq!(text.font_family, "Poppins");

        e.toggle_text_style(TextToggle::Bold).unwrap();
        assert_eq!(e.scene().get(id).unwrap().font_weight, "normal");
    }

    #[test]
    fn gradient_background_spans_canvas() {
        let mut e = engine();
        e.set_background_gradient("#667eea", "#764ba2");
        match e.scene().background() {
            Background::Gradient(g) => {
                assert_eq!((g.x2, g.y2), (800.0, 600.0));
                assert_eq!(g.stops[1].color, "#764ba2");
            }
            other => panic!("unexpected background {:?}", other),
        }
    }

    #[test]
    fn template_replaces_scene_in_one_step() {
        let mut e = engine();
        e.add_shape("rectangle").unwrap();
        let depth = e.history().undo_len();
        e.apply_template("birthday-1").unwrap();
        assert_eq!(e.history().undo_len(), depth + 1);
        let labels: Vec<String> = e.layers().into_iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Text: Your Title Here", "Text: Subtitle or descript"]);

        assert!(e.undo());
        assert_eq!(e.layers().len(), 1);
        assert!(matches!(e.apply_template("nope"), Err(EngineError::InvalidCommand(_))));
    }

    #[test]
    fn layer_ordering_and_visibility() {
        let mut e = engine();
        let a = e.add_shape("rectangle").unwrap();
        let b = e.add_shape("circle").unwrap();
        assert!(e.bring_forward(a).unwrap());
        assert_eq!(e.layers()[1].id, a);
        assert!(!e.bring_forward(a).unwrap());
        assert!(!e.toggle_visibility(b).unwrap());
        assert!(!e.layers()[0].visible);
        e.delete_object(b).unwrap();
        assert_eq!(e.layers().len(), 1);
        assert!(matches!(e.delete_object(b), Err(EngineError::ObjectNotFound(_))));
    }

    #[test]
    fn deleting_the_selection_clears_it() {
        let mut e = engine();
        let id = e.add_text(None);
        e.delete_object(id).unwrap();
        assert_eq!(e.get_selected_id(), None);
    }

    #[test]
    fn uploaded_png_is_embedded_as_data_url() {
        let mut e = engine();
        let id = e.add_image_bytes(&png_bytes(40, 20)).unwrap();
        let obj = e.scene().get(id).unwrap();
        assert!(obj.src.starts_with("data:image/png;base64,"));
        assert_eq!((obj.width, obj.height), (40.0, 20.0));
        assert_eq!(obj.scale_x, 0.3);
    }

    #[test]
    #[traced_test]
    fn broken_upload_is_logged_and_leaves_scene_alone() {
        let mut e = engine();
        let before = e.scene().serialize();
        let err = e.add_image_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, EngineError::ImageLoad(_)));
        assert_eq!(e.scene().serialize(), before);
        assert!(logs_contain("failed to load image"));
    }

    #[test]
    fn freehand_path_is_one_step_despite_two_notifications() {
        let mut e = engine();
        let points = [Point2 { x: 5.0, y: 5.0 }, Point2 { x: 25.0, y: 40.0 }, Point2 { x: 60.0, y: 10.0 }];
        let id = e.add_freehand_path(&points, "#222222", 4.0).unwrap();
        assert_eq!(e.history().undo_len(), 2);
        assert_eq!(e.scene().get(id).unwrap().kind, ObjectKind::Path);
    }
}
