use serde::{Serialize, Deserialize};
use crate::error::{EngineError, EngineResult};
use crate::objects::PosterObject;
use crate::types::{Background, SceneEvent, SceneEventKind};

/// Immutable serialized copy of the whole scene.
///
/// The JSON value keeps object keys sorted, so two snapshots of the same
/// scene compare equal regardless of field order in the source text.
#[derive(Clone, PartialEq, Debug)]
pub struct Snapshot(serde_json::Value);

impl Snapshot {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(Snapshot(serde_json::from_str(json)?))
    }

    pub fn to_json(&self) -> String {
        self.0.to_string()
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// The retained scene collaborator the history manager drives.
pub trait SceneAdapter {
    fn serialize(&self) -> Snapshot;
    /// Replaces the scene content with `snapshot`.
    fn restore(&mut self, snapshot: &Snapshot) -> EngineResult<()>;
    /// Drains change notifications raised since the last call.
    fn take_events(&mut self) -> Vec<SceneEvent>;
}

#[derive(Serialize, Deserialize)]
struct SceneDocument {
    width: f64,
    height: f64,
    background: Background,
    objects: Vec<PosterObject>,
    next_id: u32,
}

/// Ordered list of poster objects (bottom to top) plus the background.
pub struct Scene {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) background: Background,
    pub(crate) objects: Vec<PosterObject>,
    pub(crate) next_id: u32,
    events: Vec<SceneEvent>,
}

impl Scene {
    pub fn new(width: f64, height: f64, background: Background) -> Self {
        Scene {
            width,
            height,
            background,
            objects: Vec::new(),
            next_id: 1,
            events: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 { self.width }
    pub fn height(&self) -> f64 { self.height }
    pub fn background(&self) -> &Background { &self.background }
    pub fn objects(&self) -> &[PosterObject] { &self.objects }

    pub fn get(&self, id: u32) -> Option<&PosterObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn emit(&mut self, kind: SceneEventKind, target: Option<u32>) {
        self.events.push(SceneEvent::new(kind, target));
    }

    /// Assigns a fresh id, places the object on top and returns the id.
    pub fn add(&mut self, mut obj: PosterObject) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        obj.id = id;
        self.objects.push(obj);
        self.emit(SceneEventKind::ObjectAdded, Some(id));
        id
    }

    /// Adds a finished freehand stroke. Raises both the added and the
    /// path-created notification.
    pub fn add_path(&mut self, obj: PosterObject) -> u32 {
        let id = self.add(obj);
        self.emit(SceneEventKind::PathCreated, Some(id));
        id
    }

    pub fn remove(&mut self, id: u32) -> EngineResult<PosterObject> {
        let pos = self.position(id)?;
        let obj = self.objects.remove(pos);
        self.emit(SceneEventKind::ObjectRemoved, Some(id));
        Ok(obj)
    }

    /// Runs `f` on the object and raises a modified notification.
    pub fn modify<F>(&mut self, id: u32, f: F) -> EngineResult<()>
    where
        F: FnOnce(&mut PosterObject),
    {
        let obj = self.objects.iter_mut().find(|o| o.id == id).ok_or(EngineError::ObjectNotFound(id))?;
        f(obj);
        self.emit(SceneEventKind::ObjectModified, Some(id));
        Ok(())
    }

    /// Moves the object one step up the stack. Returns false when it is
    /// already on top.
    pub fn bring_forward(&mut self, id: u32) -> EngineResult<bool> {
        let pos = self.position(id)?;
        if pos + 1 >= self.objects.len() { return Ok(false); }
        self.objects.swap(pos, pos + 1);
        self.emit(SceneEventKind::ObjectModified, Some(id));
        Ok(true)
    }

    /// Moves the object one step down the stack. Returns false when it is
    /// already at the bottom.
    pub fn send_backward(&mut self, id: u32) -> EngineResult<bool> {
        let pos = self.position(id)?;
        if pos == 0 { return Ok(false); }
        self.objects.swap(pos, pos - 1);
        self.emit(SceneEventKind::ObjectModified, Some(id));
        Ok(true)
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
        self.emit(SceneEventKind::ObjectModified, None);
    }

    /// Removes every object and resets the background.
    pub fn clear(&mut self, background: Background) {
        for obj in std::mem::take(&mut self.objects) {
            self.emit(SceneEventKind::ObjectRemoved, Some(obj.id));
        }
        self.background = background;
        self.emit(SceneEventKind::ObjectModified, None);
    }

    fn position(&self, id: u32) -> EngineResult<usize> {
        self.objects.iter().position(|o| o.id == id).ok_or(EngineError::ObjectNotFound(id))
    }

    fn document(&self) -> SceneDocument {
        SceneDocument {
            width: self.width,
            height: self.height,
            background: self.background.clone(),
            objects: self.objects.clone(),
            next_id: self.next_id,
        }
    }
}

impl SceneAdapter for Scene {
    fn serialize(&self) -> Snapshot {
        // A scene built from plain data always converts to a JSON value.
        let value = serde_json::to_value(self.document()).unwrap_or(serde_json::Value::Null);
        Snapshot(value)
    }

    fn restore(&mut self, snapshot: &Snapshot) -> EngineResult<()> {
        let doc: SceneDocument = serde_json::from_value(snapshot.0.clone())?;
        // Validated before anything is replaced, so a rejected snapshot
        // leaves the scene as it was.
        let mut next_id = doc.next_id.max(1);
        for obj in &doc.objects {
            let after = obj.id.checked_add(1).ok_or_else(|| id_out_of_range(obj.id))?;
            next_id = next_id.max(after);
        }
        if next_id == u32::MAX {
            return Err(id_out_of_range(next_id));
        }
        self.width = doc.width;
        self.height = doc.height;
        self.background = doc.background;
        self.objects = doc.objects;
        self.next_id = next_id;
        let ids: Vec<u32> = self.objects.iter().map(|o| o.id).collect();
        for id in ids {
            self.emit(SceneEventKind::ObjectAdded, Some(id));
        }
        Ok(())
    }

    fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

fn id_out_of_range(id: u32) -> EngineError {
    EngineError::Snapshot(<serde_json::Error as serde::de::Error>::custom(format!("object id {} is out of range", id)))
}
