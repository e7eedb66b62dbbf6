pub mod error;
pub mod config;
pub mod logging;
pub mod types;
pub mod objects;
pub mod scene;
pub mod history;
pub mod catalog;
pub mod engine;
pub mod tools;
pub mod persistence;
pub mod render;
pub mod export;
pub mod commands;

pub use config::EditorConfig;
pub use engine::PosterEngine;
pub use error::{EngineError, EngineResult};
pub use export::{ExportFormat, ExportOptions};
pub use history::History;
pub use objects::PosterObject;
pub use scene::{Scene, SceneAdapter, Snapshot};
pub use types::*;
