use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("object {0} not found")]
    ObjectNotFound(u32),
    #[error("no object selected")]
    NoSelection,
    #[error("failed to load image: {0}")]
    ImageLoad(String),
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid command: {0}")]
    InvalidCommand(String),
    #[error("browser error: {0}")]
    Browser(String),
    #[error("invalid config: {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// JSON body returned across the wasm boundary.
    pub fn to_json(&self) -> String {
        serde_json::json!({ "error": self.to_string() }).to_string()
    }
}
