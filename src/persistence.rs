use std::collections::BTreeMap;
use crate::error::EngineResult;
#[cfg(target_arch = "wasm32")]
use crate::error::EngineError;

/// String key-value storage for saved posters.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> EngineResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> EngineResult<()>;
    fn keys(&self) -> EngineResult<Vec<String>>;
}

#[derive(Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> EngineResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> EngineResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self) -> EngineResult<Vec<String>> {
        Ok(self.items.keys().cloned().collect())
    }
}

/// `window.localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn open() -> EngineResult<Self> {
        let window = web_sys::window().ok_or_else(|| EngineError::Browser("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| EngineError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| EngineError::Storage("localStorage unavailable".into()))?;
        Ok(LocalStore { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> EngineResult<Option<String>> {
        self.storage.get_item(key).map_err(|e| EngineError::Storage(format!("{:?}", e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> EngineResult<()> {
        // Fails when the quota is exceeded.
        self.storage.set_item(key, value).map_err(|e| EngineError::Storage(format!("{:?}", e)))
    }

    fn keys(&self) -> EngineResult<Vec<String>> {
        let len = self.storage.length().map_err(|e| EngineError::Storage(format!("{:?}", e)))?;
        let mut keys = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Ok(Some(key)) = self.storage.key(i) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

/// Browser storage when available, memory otherwise.
pub fn default_store() -> Box<dyn KeyValueStore> {
    #[cfg(target_arch = "wasm32")]
    {
        match LocalStore::open() {
            Ok(store) => return Box::new(store),
            Err(e) => tracing::warn!("falling back to in-memory storage: {}", e),
        }
    }
    Box::new(MemoryStore::new())
}

/// Names saved under `prefix`, sorted, with the prefix stripped.
pub fn saved_names(store: &dyn KeyValueStore, prefix: &str) -> EngineResult<Vec<String>> {
    let mut names: Vec<String> = store
        .keys()?
        .into_iter()
        .filter_map(|key| key.strip_prefix(prefix).map(str::to_string))
        .filter(|name| !name.is_empty())
        .collect();
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_item("poster_a").unwrap(), None);
        store.set_item("poster_a", "{}").unwrap();
        assert_eq!(store.get_item("poster_a").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn saved_names_strip_prefix_and_skip_foreign_keys() {
        let mut store = MemoryStore::new();
        store.set_item("poster_zeta", "{}").unwrap();
        store.set_item("poster_alpha", "{}").unwrap();
        store.set_item("theme", "dark").unwrap();
        assert_eq!(saved_names(&store, "poster_").unwrap(), vec!["alpha", "zeta"]);
    }
}
