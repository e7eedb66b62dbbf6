use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use tracing::info;
use crate::engine::PosterEngine;
use crate::error::{EngineError, EngineResult};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn parse(format: &str) -> EngineResult<Self> {
        match format.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            other => Err(EngineError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
        }
    }

    pub fn file_name(&self) -> String {
        format!("poster.{}", self.extension())
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Output pixels per poster unit.
    pub multiplier: f64,
    /// Encoder quality, 0.0 to 1.0. Only JPEG uses it.
    pub quality: f64,
}

impl ExportOptions {
    pub fn pixel_size(&self, width: f64, height: f64) -> (u32, u32) {
        let w = (width * self.multiplier).round().max(1.0) as u32;
        let h = (height * self.multiplier).round().max(1.0) as u32;
        (w, h)
    }
}

#[wasm_bindgen]
impl PosterEngine {
    /// Rasterizes the poster and starts a browser download. Returns a JSON
    /// result.
    pub fn export(&self, format: &str) -> String {
        match self.export_to_download(format) {
            Ok(file_name) => serde_json::json!({ "success": true, "file": file_name }).to_string(),
            Err(e) => {
                tracing::error!("export failed: {}", e);
                e.to_json()
            }
        }
    }

    /// PNG or JPEG data URL of the poster, without starting a download.
    pub fn export_data_url(&self, format: &str) -> Result<String, JsError> {
        let options = self.export_options(ExportFormat::parse(format).map_err(|e| JsError::new(&e.to_string()))?);
        self.rasterize(&options).map_err(|e| JsError::new(&e.to_string()))
    }
}

impl PosterEngine {
    pub fn export_options(&self, format: ExportFormat) -> ExportOptions {
        ExportOptions {
            format,
            multiplier: self.config.export_multiplier,
            quality: self.config.export_quality,
        }
    }

    fn export_to_download(&self, format: &str) -> EngineResult<String> {
        let options = self.export_options(ExportFormat::parse(format)?);
        let data_url = self.rasterize(&options)?;
        let document = document()?;
        let anchor: web_sys::HtmlAnchorElement = document
            .create_element("a")
            .map_err(browser_err)?
            .dyn_into()
            .map_err(|_| EngineError::Browser("created element is not an anchor".into()))?;
        let file_name = options.format.file_name();
        anchor.set_download(&file_name);
        anchor.set_href(&data_url);
        anchor.click();
        info!(file = %file_name, "poster exported");
        Ok(file_name)
    }

    /// Draws the poster onto an offscreen canvas and encodes it.
    fn rasterize(&self, options: &ExportOptions) -> EngineResult<String> {
        let document = document()?;
        let canvas: web_sys::HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(browser_err)?
            .dyn_into()
            .map_err(|_| EngineError::Browser("created element is not a canvas".into()))?;
        let (w, h) = options.pixel_size(self.scene.width(), self.scene.height());
        canvas.set_width(w);
        canvas.set_height(h);
        let ctx: web_sys::CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(browser_err)?
            .ok_or_else(|| EngineError::Browser("2d context unavailable".into()))?
            .dyn_into()
            .map_err(|_| EngineError::Browser("unexpected context type".into()))?;
        ctx.scale(options.multiplier, options.multiplier).map_err(browser_err)?;
        self.draw_scene(&ctx);
        canvas
            .to_data_url_with_type_and_encoder_options(options.format.mime_type(), &JsValue::from_f64(options.quality))
            .map_err(browser_err)
    }
}

fn document() -> EngineResult<web_sys::Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| EngineError::Browser("no document".into()))
}

fn browser_err(value: JsValue) -> EngineError {
    EngineError::Browser(format!("{:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_parse_and_name_downloads() {
        assert_eq!(ExportFormat::parse("PNG").unwrap(), ExportFormat::Png);
        assert_eq!(ExportFormat::parse("jpg").unwrap().file_name(), "poster.jpeg");
        assert_eq!(ExportFormat::Jpeg.mime_type(), "image/jpeg");
        assert!(matches!(ExportFormat::parse("gif"), Err(EngineError::UnsupportedFormat(f)) if f == "gif"));
    }

    #[test]
    fn default_export_doubles_resolution() {
        let engine = PosterEngine::new();
        let options = engine.export_options(ExportFormat::Png);
        assert_eq!(options.quality, 1.0);
        assert_eq!(options.pixel_size(engine.width(), engine.height()), (1600, 1200));
    }
}
