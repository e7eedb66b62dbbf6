use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;
use std::collections::HashMap;
use tracing::{info, warn};
use crate::config::EditorConfig;
use crate::error::{EngineError, EngineResult};
use crate::history::History;
use crate::persistence::{self, KeyValueStore};
use crate::scene::{Scene, SceneAdapter, Snapshot};
use crate::types::Background;

#[wasm_bindgen]
pub struct PosterEngine {
    pub(crate) scene: Scene,
    pub(crate) history: History,
    pub(crate) selected_id: Option<u32>,
    pub(crate) config: EditorConfig,
    pub(crate) store: Box<dyn KeyValueStore>,
    pub(crate) image_cache: HashMap<String, HtmlImageElement>,
    pub hide_selection: bool,
}

#[wasm_bindgen]
impl PosterEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PosterEngine {
        Self::from_config(EditorConfig::default())
    }

    /// Builds an engine from a JSON config, falling back to the defaults when
    /// the config does not parse or validate.
    pub fn with_config(config_json: &str) -> PosterEngine {
        match EditorConfig::from_json(config_json) {
            Ok(config) => Self::from_config(config),
            Err(e) => {
                let engine = Self::from_config(EditorConfig::default());
                warn!("ignoring editor config: {}", e);
                engine
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&mut self.scene) {
            Ok(changed) => {
                self.prune_selection();
                changed
            }
            Err(e) => {
                tracing::error!("undo failed: {}", e);
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&mut self.scene) {
            Ok(changed) => {
                self.prune_selection();
                changed
            }
            Err(e) => {
                tracing::error!("redo failed: {}", e);
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool { self.history.can_undo() }
    pub fn can_redo(&self) -> bool { self.history.can_redo() }
    pub fn width(&self) -> f64 { self.scene.width() }
    pub fn height(&self) -> f64 { self.scene.height() }

    pub fn get_scene_json(&self) -> String {
        self.scene.serialize().to_json()
    }

    pub fn get_selected_id(&self) -> Option<u32> {
        self.selected_id
    }

    /// Hands the engine a decoded browser image for `src` so it can be drawn.
    pub fn register_image(&mut self, src: &str, image: HtmlImageElement) {
        self.image_cache.insert(src.to_string(), image);
    }
}

impl PosterEngine {
    /// Native hosts install logging themselves through `logging::init`.
    pub fn from_config(config: EditorConfig) -> PosterEngine {
        #[cfg(target_arch = "wasm32")]
        {
            console_error_panic_hook::set_once();
            crate::logging::init(&config.log_level);
        }

        let scene = Scene::new(config.width, config.height, Background::color(&config.background));
        let mut history = History::new(config.history_limit);
        history.reset(&scene);
        info!(width = config.width, height = config.height, "poster engine attached");

        PosterEngine {
            scene,
            history,
            selected_id: None,
            config,
            store: persistence::default_store(),
            image_cache: HashMap::new(),
            hide_selection: false,
        }
    }

    /// Swaps the key-value store, e.g. for an in-memory one in tests.
    pub fn set_store(&mut self, store: Box<dyn KeyValueStore>) {
        self.store = store;
    }

    pub fn scene(&self) -> &Scene { &self.scene }
    pub fn history(&self) -> &History { &self.history }
    pub fn config(&self) -> &EditorConfig { &self.config }

    /// Delivers the scene's pending change notifications to the history.
    /// Called once at the end of every mutating operation.
    pub(crate) fn commit(&mut self) {
        self.history.observe(&mut self.scene);
    }

    pub(crate) fn default_background(&self) -> Background {
        Background::color(&self.config.background)
    }

    /// Drops the selection if the selected object no longer exists.
    pub(crate) fn prune_selection(&mut self) {
        if let Some(id) = self.selected_id {
            if self.scene.get(id).is_none() {
                self.selected_id = None;
            }
        }
    }

    pub fn save(&mut self, name: &str) -> EngineResult<()> {
        if name.is_empty() {
            return Err(EngineError::InvalidCommand("poster name is empty".into()));
        }
        let key = self.config.storage_key(name);
        self.store.set_item(&key, &self.scene.serialize().to_json())?;
        info!(key = %key, "poster saved");
        Ok(())
    }

    /// Loads a saved poster as one undoable step. A missing entry is a no-op
    /// and returns `Ok(false)`.
    pub fn load(&mut self, name: &str) -> EngineResult<bool> {
        let key = self.config.storage_key(name);
        let Some(json) = self.store.get_item(&key)? else {
            return Ok(false);
        };
        let snapshot = Snapshot::from_json(&json)?;
        self.history.apply(&mut self.scene, &snapshot)?;
        self.prune_selection();
        info!(key = %key, "poster loaded");
        Ok(true)
    }

    pub fn saved_names(&self) -> EngineResult<Vec<String>> {
        persistence::saved_names(self.store.as_ref(), &self.config.storage_prefix)
    }
}

impl Default for PosterEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::PosterObject;
    use crate::persistence::MemoryStore;

    fn engine() -> PosterEngine {
        let mut engine = PosterEngine::new();
        engine.set_store(Box::new(MemoryStore::new()));
        engine
    }

    #[test]
    fn new_engine_starts_with_one_history_entry() {
        let engine = engine();
        assert_eq!(engine.history().undo_len(), 1);
        assert!(!engine.can_undo());
        assert_eq!(engine.width(), 800.0);
    }

    #[test]
    fn bad_config_falls_back_to_defaults() {
        let engine = PosterEngine::with_config(r#"{ "history_limit": 0 }"#);
        assert_eq!(engine.config().history_limit, 50);
        let engine = PosterEngine::with_config(r#"{ "width": 1080, "height": 1350 }"#);
        assert_eq!((engine.width(), engine.height()), (1080.0, 1350.0));
    }

    #[test]
    fn save_then_load_restores_scene_as_one_step() {
        let mut engine = engine();
        engine.scene.add(PosterObject::text("keep me"));
        engine.commit();
        engine.save("flyer").unwrap();
        let saved = engine.get_scene_json();

        engine.scene.clear(Background::default());
        engine.commit();
        let depth = engine.history().undo_len();

        assert!(engine.load("flyer").unwrap());
        assert_eq!(engine.get_scene_json(), saved);
        assert_eq!(engine.history().undo_len(), depth + 1);

        assert!(engine.undo());
        assert!(engine.scene().objects().is_empty());
    }

    #[test]
    fn loading_a_missing_poster_is_a_noop() {
        let mut engine = engine();
        let before = engine.get_scene_json();
        assert!(!engine.load("nothing-here").unwrap());
        assert_eq!(engine.get_scene_json(), before);
        assert_eq!(engine.history().undo_len(), 1);
    }

    #[test]
    fn save_uses_prefixed_key() {
        let mut engine = engine();
        engine.save("summer").unwrap();
        assert_eq!(engine.saved_names().unwrap(), vec!["summer"]);
        assert!(engine.store.get_item("poster_summer").unwrap().is_some());
        assert!(matches!(engine.save(""), Err(EngineError::InvalidCommand(_))));
    }

    #[test]
    fn corrupt_saved_poster_is_reported() {
        let mut engine = engine();
        engine.store.set_item("poster_bad", "{ not json").unwrap();
        assert!(matches!(engine.load("bad"), Err(EngineError::Snapshot(_))));
        assert!(!engine.history().is_restoring());
    }

    #[test]
    fn names_are_stored_verbatim() {
        let mut engine = engine();
        engine.save(" flyer ").unwrap();
        assert!(engine.store.get_item("poster_ flyer ").unwrap().is_some());
        assert!(engine.store.get_item("poster_flyer").unwrap().is_none());
        assert!(!engine.load("flyer").unwrap());
        assert!(engine.load(" flyer ").unwrap());
    }

    #[test]
    fn saved_poster_with_exhausted_ids_is_rejected() {
        let mut engine = engine();
        engine.scene.add(PosterObject::text("still here"));
        engine.commit();
        let before = engine.get_scene_json();
        let depth = engine.history().undo_len();

        let json = format!(
            r##"{{"width":800,"height":600,"background":{{"type":"color","color":"#ffffff"}},"objects":[{{"id":{}}}],"next_id":1}}"##,
            u32::MAX
        );
        engine.store.set_item("poster_x", &json).unwrap();
        assert!(matches!(engine.load("x"), Err(EngineError::Snapshot(_))));
        assert_eq!(engine.get_scene_json(), before);
        assert_eq!(engine.history().undo_len(), depth);
        assert!(!engine.history().is_restoring());
    }
}
