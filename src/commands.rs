use wasm_bindgen::prelude::*;
use serde::Deserialize;
use serde_json::{json, Value};
use crate::catalog;
use crate::engine::PosterEngine;
use crate::error::{EngineError, EngineResult};
use crate::scene::SceneAdapter;
use crate::types::{Point2, TextToggle};

#[derive(Deserialize)]
struct Command {
    action: String,
    #[serde(default)]
    params: Value,
}

#[wasm_bindgen]
impl PosterEngine {
    /// Runs one `{ "action": ..., "params": {...} }` command and returns a
    /// JSON result: `{"success": true, ...}` or `{"error": "..."}`.
    pub fn execute_command(&mut self, cmd_json: &str) -> String {
        let cmd: Command = match serde_json::from_str(cmd_json) {
            Ok(c) => c,
            Err(e) => return json!({ "error": format!("Invalid JSON: {}", e) }).to_string(),
        };
        match self.dispatch(&cmd.action, &cmd.params) {
            Ok(result) => result.to_string(),
            Err(e) => {
                tracing::warn!(action = %cmd.action, "command failed: {}", e);
                e.to_json()
            }
        }
    }

    /// Adds an uploaded image file. Returns the same JSON shape as
    /// `execute_command`.
    #[wasm_bindgen(js_name = addImageFile)]
    pub fn add_image_file(&mut self, data: &[u8]) -> String {
        match self.add_image_bytes(data) {
            Ok(id) => json!({ "success": true, "id": id }).to_string(),
            Err(e) => e.to_json(),
        }
    }
}

impl PosterEngine {
    fn dispatch(&mut self, action: &str, params: &Value) -> EngineResult<Value> {
        match action {
            "add_text" => {
                let id = self.add_text(params["text"].as_str());
                Ok(json!({ "success": true, "id": id }))
            }
            "add_shape" => {
                let shape = params["shape"].as_str().unwrap_or_default();
                match self.add_shape(shape) {
                    Some(id) => Ok(json!({ "success": true, "id": id })),
                    None => Ok(json!({ "success": true, "message": "Unknown shape" })),
                }
            }
            "add_emoji" => {
                let emoji = str_param(params, "emoji")?;
                let id = self.add_emoji(emoji);
                Ok(json!({ "success": true, "id": id }))
            }
            "add_image" => {
                let src = str_param(params, "src")?;
                let width = params["natural_width"].as_f64().unwrap_or(0.0);
                let height = params["natural_height"].as_f64().unwrap_or(0.0);
                let id = self.add_image_url(src, width, height)?;
                Ok(json!({ "success": true, "id": id }))
            }
            "add_path" => {
                let points: Vec<Point2> = serde_json::from_value(params["points"].clone())
                    .map_err(|e| EngineError::InvalidCommand(format!("bad points: {}", e)))?;
                let color = params["color"].as_str().unwrap_or("#000000");
                let stroke_width = params["stroke_width"].as_f64().unwrap_or(3.0);
                match self.add_freehand_path(&points, color, stroke_width) {
                    Some(id) => Ok(json!({ "success": true, "id": id })),
                    None => Ok(json!({ "success": true, "message": "No points" })),
                }
            }
            "set_background" => {
                match params["type"].as_str().unwrap_or("color") {
                    "color" => self.set_background_color(str_param(params, "color")?),
                    "gradient" => {
                        let colors = params["colors"].as_array()
                            .filter(|c| c.len() >= 2)
                            .ok_or_else(|| EngineError::InvalidCommand("gradient needs two colors".into()))?;
                        let from = colors[0].as_str().unwrap_or("#ffffff");
                        let to = colors[1].as_str().unwrap_or("#ffffff");
                        self.set_background_gradient(from, to);
                    }
                    "image" => self.set_background_image(str_param(params, "src")?),
                    other => return Err(EngineError::InvalidCommand(format!("unknown background type {:?}", other))),
                }
                Ok(json!({ "success": true }))
            }
            "update" => {
                let id = self.target_id(params)?;
                self.update_object(id, &params["props"])?;
                Ok(json!({ "success": true }))
            }
            "delete" => {
                self.delete_object(self.target_id(params)?)?;
                Ok(json!({ "success": true }))
            }
            "select" => {
                let id = if params["id"].is_null() { None } else { Some(id_param(params)?) };
                self.select(id)?;
                Ok(json!({ "success": true }))
            }
            "toggle_visibility" => {
                let visible = self.toggle_visibility(self.target_id(params)?)?;
                Ok(json!({ "success": true, "visible": visible }))
            }
            "bring_forward" => {
                if self.bring_forward(self.target_id(params)?)? { Ok(json!({ "success": true })) }
                else { Ok(json!({ "success": true, "message": "Already at front" })) }
            }
            "send_backward" => {
                if self.send_backward(self.target_id(params)?)? { Ok(json!({ "success": true })) }
                else { Ok(json!({ "success": true, "message": "Already at back" })) }
            }
            "set_text_property" => {
                let applied = self.set_text_property(&params["props"])?;
                Ok(json!({ "success": true, "applied": applied }))
            }
            "toggle_text_style" => {
                let style = str_param(params, "style")?;
                let toggle = TextToggle::parse(style)
                    .ok_or_else(|| EngineError::InvalidCommand(format!("unknown text style {:?}", style)))?;
                let applied = self.toggle_text_style(toggle)?;
                Ok(json!({ "success": true, "applied": applied }))
            }
            "apply_template" => {
                self.apply_template(str_param(params, "id")?)?;
                Ok(json!({ "success": true }))
            }
            "clear" => {
                self.clear_poster();
                Ok(json!({ "success": true }))
            }
            "undo" => {
                let changed = self.history.undo(&mut self.scene)?;
                self.prune_selection();
                Ok(json!({ "success": true, "changed": changed }))
            }
            "redo" => {
                let changed = self.history.redo(&mut self.scene)?;
                self.prune_selection();
                Ok(json!({ "success": true, "changed": changed }))
            }
            "save" => {
                self.save(str_param(params, "name")?)?;
                Ok(json!({ "success": true }))
            }
            "load" => {
                let loaded = self.load(str_param(params, "name")?)?;
                Ok(json!({ "success": true, "loaded": loaded }))
            }
            "list_saved" => Ok(json!({ "success": true, "names": self.saved_names()? })),
            "get_layers" => Ok(json!({ "success": true, "layers": self.layers() })),
            "get_catalog" => Ok(serde_json::from_str(&catalog::catalog_json())?),
            "get_scene" => Ok(self.scene.serialize().value().clone()),
            "history_state" => Ok(json!({
                "can_undo": self.history.can_undo(),
                "can_redo": self.history.can_redo(),
                "undo_len": self.history.undo_len(),
                "redo_len": self.history.redo_len(),
            })),
            "export" => {
                let file = self.export(str_param(params, "format")?);
                Ok(serde_json::from_str(&file)?)
            }
            _ => Err(EngineError::InvalidCommand(format!("unknown action {:?}", action))),
        }
    }

    /// The object named by `params.id`, or the current selection.
    fn target_id(&self, params: &Value) -> EngineResult<u32> {
        if params["id"].is_null() {
            return self.selected_id.ok_or(EngineError::NoSelection);
        }
        id_param(params)
    }
}


fn id_param(params: &Value) -> EngineResult<u32> {
    params["id"]
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| EngineError::InvalidCommand(format!("invalid object id {}", params["id"])))
}

fn str_param<'a>(params: &'a Value, key: &str) -> EngineResult<&'a str> {
    params[key]
        .as_str()
        .ok_or_else(|| EngineError::InvalidCommand(format!("missing {}", key)))
}
