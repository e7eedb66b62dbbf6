use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

pub const DEFAULT_WIDTH: f64 = 800.0;
pub const DEFAULT_HEIGHT: f64 = 600.0;
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_STORAGE_PREFIX: &str = "poster_";

/// Editor settings supplied by the host page. Every field has a default, so
/// `{}` is a valid config.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    pub width: f64,
    pub height: f64,
    /// Background color of an empty poster.
    pub background: String,
    /// Maximum number of snapshots kept on the undo stack.
    pub history_limit: usize,
    /// Prefix for keys written to the key-value store.
    pub storage_prefix: String,
    pub export_multiplier: f64,
    pub export_quality: f64,
    pub log_level: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: DEFAULT_BACKGROUND.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            export_multiplier: 2.0,
            export_quality: 1.0,
            log_level: "info".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: EditorConfig =
            serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.history_limit == 0 {
            return Err(EngineError::Config("history_limit must be at least 1".into()));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(EngineError::Config(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.export_multiplier > 0.0) {
            return Err(EngineError::Config("export_multiplier must be positive".into()));
        }
        Ok(())
    }

    pub fn storage_key(&self, name: &str) -> String {
        format!("{}{}", self.storage_prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.storage_key("flyer"), "poster_flyer");
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = EditorConfig::from_json(r#"{ "width": 1080, "history_limit": 10 }"#).unwrap();
        assert_eq!(config.width, 1080.0);
        assert_eq!(config.height, 600.0);
        assert_eq!(config.history_limit, 10);
    }

    #[test]
    fn zero_history_limit_is_rejected() {
        let err = EditorConfig::from_json(r#"{ "history_limit": 0 }"#).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(EditorConfig::from_json("{ width"), Err(EngineError::Config(_))));
    }
}
