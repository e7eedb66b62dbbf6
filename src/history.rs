use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use tracing::debug;
use crate::error::EngineResult;
use crate::scene::{SceneAdapter, Snapshot};
use crate::types::SceneEventKind;

/// Linear undo/redo over serialized scene snapshots.
///
/// The undo stack holds the current state on top and, once attached, is
/// never empty: its bottom entry is the oldest state still reachable. Any
/// captured edit clears the redo stack.
pub struct History {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    limit: usize,
    is_restoring: bool,
    subscriptions: Vec<SceneEventKind>,
}

impl History {
    pub fn new(limit: usize) -> Self {
        History {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
            is_restoring: false,
            subscriptions: SceneEventKind::ALL.to_vec(),
        }
    }

    /// Seeds the history with the scene's current state.
    pub fn reset<S: SceneAdapter>(&mut self, scene: &S) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.undo_stack.push_back(scene.serialize());
        self.is_restoring = false;
    }

    pub fn is_subscribed(&self, kind: SceneEventKind) -> bool {
        self.subscriptions.contains(&kind)
    }

    /// Feeds pending scene notifications into `capture`.
    pub fn observe<S: SceneAdapter>(&mut self, scene: &mut S) {
        for event in scene.take_events() {
            if self.is_subscribed(event.kind) {
                self.capture(scene);
            }
        }
    }

    /// Records the scene state unless a restore is running or the state
    /// equals the top of the undo stack.
    pub fn capture<S: SceneAdapter>(&mut self, scene: &S) -> bool {
        if self.is_restoring {
            return false;
        }
        let snapshot = scene.serialize();
        if self.undo_stack.back() == Some(&snapshot) {
            return false;
        }
        self.undo_stack.push_back(snapshot);
        if self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
        debug!(depth = self.undo_stack.len(), "history: captured");
        true
    }

    /// Steps back one state. Returns `Ok(false)` at the oldest state. When the
    /// restore fails the stacks are left as they were.
    pub fn undo<S: SceneAdapter>(&mut self, scene: &mut S) -> EngineResult<bool> {
        if self.undo_stack.len() <= 1 {
            return Ok(false);
        }
        self.restoring(scene, |history, scene| {
            let Some(current) = history.undo_stack.pop_back() else { return Ok(()) };
            let result = match history.undo_stack.back() {
                Some(previous) => scene.restore(previous),
                None => Ok(()),
            };
            match result {
                Ok(()) => history.redo_stack.push(current),
                Err(_) => history.undo_stack.push_back(current),
            }
            result
        })?;
        debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "history: undo");
        Ok(true)
    }

    /// Re-applies the most recently undone state. Returns `Ok(false)` when
    /// nothing was undone since the last edit. When the restore fails the
    /// stacks are left as they were.
    pub fn redo<S: SceneAdapter>(&mut self, scene: &mut S) -> EngineResult<bool> {
        if self.redo_stack.is_empty() {
            return Ok(false);
        }
        self.restoring(scene, |history, scene| {
            let Some(next) = history.redo_stack.pop() else { return Ok(()) };
            let result = scene.restore(&next);
            match result {
                Ok(()) => history.undo_stack.push_back(next),
                Err(_) => history.redo_stack.push(next),
            }
            result
        })?;
        debug!(undo = self.undo_stack.len(), redo = self.redo_stack.len(), "history: redo");
        Ok(true)
    }

    /// Restores `snapshot` as a new, undoable step.
    pub fn apply<S: SceneAdapter>(&mut self, scene: &mut S, snapshot: &Snapshot) -> EngineResult<bool> {
        self.restoring(scene, |_, scene| scene.restore(snapshot))?;
        Ok(self.capture(scene))
    }

    /// Runs a restore with capture suppressed. The restore's own
    /// notifications are drained before the flag drops, and the guard drops
    /// the flag on every path out of `f`, unwinding included.
    fn restoring<S, F>(&mut self, scene: &mut S, f: F) -> EngineResult<()>
    where
        S: SceneAdapter,
        F: FnOnce(&mut Self, &mut S) -> EngineResult<()>,
    {
        let mut guard = RestoreGuard::new(self);
        let result = f(&mut *guard, scene);
        guard.observe(scene);
        result
    }

    pub fn undo_len(&self) -> usize { self.undo_stack.len() }
    pub fn redo_len(&self) -> usize { self.redo_stack.len() }
    pub fn can_undo(&self) -> bool { self.undo_stack.len() > 1 }
    pub fn can_redo(&self) -> bool { !self.redo_stack.is_empty() }
    pub fn is_restoring(&self) -> bool { self.is_restoring }
    pub fn limit(&self) -> usize { self.limit }

    pub fn current(&self) -> Option<&Snapshot> {
        self.undo_stack.back()
    }

    pub fn oldest(&self) -> Option<&Snapshot> {
        self.undo_stack.front()
    }
}

/// Holds `is_restoring` set for as long as it lives.
struct RestoreGuard<'a> {
    history: &'a mut History,
}

impl<'a> RestoreGuard<'a> {
    fn new(history: &'a mut History) -> Self {
        history.is_restoring = true;
        RestoreGuard { history }
    }
}

impl Deref for RestoreGuard<'_> {
    type Target = History;

    fn deref(&self) -> &History {
        &*self.history
    }
}

impl DerefMut for RestoreGuard<'_> {
    fn deref_mut(&mut self) -> &mut History {
        &mut *self.history
    }
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        self.history.is_restoring = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::types::SceneEvent;

    /// Scene stand-in: a list of labels, with restore failures on demand.
    #[derive(Default)]
    struct Labels {
        items: Vec<String>,
        events: Vec<SceneEvent>,
        fail_restore: bool,
        panic_restore: bool,
    }

    impl Labels {
        fn push(&mut self, label: &str) {
            self.items.push(label.to_string());
            self.events.push(SceneEvent::new(SceneEventKind::ObjectAdded, None));
        }

        fn touch(&mut self) {
            self.events.push(SceneEvent::new(SceneEventKind::ObjectModified, None));
        }
    }

    impl SceneAdapter for Labels {
        fn serialize(&self) -> Snapshot {
            Snapshot::from_json(&serde_json::to_string(&self.items).unwrap()).unwrap()
        }

        fn restore(&mut self, snapshot: &Snapshot) -> EngineResult<()> {
            if self.panic_restore {
                panic!("restore blew up");
            }
            if self.fail_restore {
                return Err(EngineError::InvalidCommand("restore failed".into()));
            }
            self.items = serde_json::from_value(snapshot.value().clone())?;
            self.events.push(SceneEvent::new(SceneEventKind::ObjectAdded, None));
            Ok(())
        }

        fn take_events(&mut self) -> Vec<SceneEvent> {
            std::mem::take(&mut self.events)
        }
    }

    fn attached(limit: usize) -> (History, Labels) {
        let scene = Labels::default();
        let mut history = History::new(limit);
        history.reset(&scene);
        (history, scene)
    }

    fn edit(history: &mut History, scene: &mut Labels, label: &str) {
        scene.push(label);
        history.observe(scene);
    }

    #[test]
    fn rectangle_text_circle_scenario() {
        let (mut h, mut s) = attached(50);
        let s0 = s.serialize();
        edit(&mut h, &mut s, "rect");
        let s1 = s.serialize();
        edit(&mut h, &mut s, "text");

        assert!(h.undo(&mut s).unwrap());
        assert_eq!(s.serialize(), s1);
        assert!(h.undo(&mut s).unwrap());
        assert_eq!(s.serialize(), s0);
        assert!(h.redo(&mut s).unwrap());
        assert_eq!(s.serialize(), s1);

        edit(&mut h, &mut s, "circle");
        let s3 = s.serialize();
        assert_eq!(h.redo_len(), 0);
        assert!(!h.redo(&mut s).unwrap());
        assert_eq!(s.serialize(), s3);
    }

    #[test]
    fn duplicate_notifications_do_not_grow_history() {
        let (mut h, mut s) = attached(50);
        edit(&mut h, &mut s, "a");
        s.touch();
        s.touch();
        h.observe(&mut s);
        assert_eq!(h.undo_len(), 2);
    }

    #[test]
    fn undo_at_initial_state_is_noop() {
        let (mut h, mut s) = attached(50);
        let before = s.serialize();
        assert!(!h.undo(&mut s).unwrap());
        assert_eq!(s.serialize(), before);
        assert_eq!((h.undo_len(), h.redo_len()), (1, 0));
    }

    #[test]
    fn redo_with_empty_stack_is_noop() {
        let (mut h, mut s) = attached(50);
        edit(&mut h, &mut s, "a");
        assert!(!h.redo(&mut s).unwrap());
        assert_eq!(h.undo_len(), 2);
    }

    #[test]
    fn restore_notifications_are_not_captured() {
        let (mut h, mut s) = attached(50);
        edit(&mut h, &mut s, "a");
        edit(&mut h, &mut s, "b");
        h.undo(&mut s).unwrap();
        // The restore raised an added notification; it must not have wiped redo.
        assert_eq!(h.redo_len(), 1);
        assert_eq!(h.undo_len(), 2);
        assert!(!h.is_restoring());
    }

    #[test]
    fn capture_is_suppressed_while_restoring() {
        let (mut h, mut s) = attached(50);
        h.is_restoring = true;
        s.push("a");
        assert!(!h.capture(&s));
        assert_eq!(h.undo_len(), 1);
    }

    #[test]
    fn failed_restore_releases_the_guard() {
        let (mut h, mut s) = attached(50);
        edit(&mut h, &mut s, "a");
        s.fail_restore = true;
        assert!(h.undo(&mut s).is_err());
        assert!(!h.is_restoring());

        assert_eq!((h.undo_len(), h.redo_len()), (2, 0));

        s.fail_restore = false;
        edit(&mut h, &mut s, "b");
        assert_eq!(h.undo_len(), 3);
    }

    #[test]
    fn failed_redo_keeps_stacks_in_step_with_scene() {
        let (mut h, mut s) = attached(50);
        edit(&mut h, &mut s, "a");
        edit(&mut h, &mut s, "b");
        h.undo(&mut s).unwrap();
        let shown = s.serialize();

        s.fail_restore = true;
        assert!(h.redo(&mut s).is_err());
        assert!(!h.is_restoring());
        assert_eq!((h.undo_len(), h.redo_len()), (2, 1));
        assert_eq!(h.current(), Some(&shown));
        assert_eq!(s.serialize(), shown);

        s.fail_restore = false;
        assert!(h.redo(&mut s).unwrap());
        assert_eq!(s.items, vec!["a", "b"]);
    }

    #[test]
    fn panicking_restore_still_releases_the_guard() {
        let (mut h, mut s) = attached(50);
        edit(&mut h, &mut s, "a");
        s.panic_restore = true;
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| h.undo(&mut s)));
        assert!(outcome.is_err());
        assert!(!h.is_restoring());
    }

    #[test]
    fn oldest_entries_are_evicted_past_the_limit() {
        let (mut h, mut s) = attached(50);
        let mut states = vec![s.serialize()];
        for i in 0..60 {
            edit(&mut h, &mut s, &format!("obj{}", i));
            states.push(s.serialize());
        }
        assert_eq!(h.undo_len(), 50);
        assert_eq!(h.oldest(), Some(&states[states.len() - 50]));
        assert_ne!(h.oldest(), Some(&states[0]));
    }

    #[test]
    fn apply_records_a_single_step() {
        let (mut h, mut s) = attached(50);
        let target = Snapshot::from_json(r#"["x", "y", "z"]"#).unwrap();
        assert!(h.apply(&mut s, &target).unwrap());
        assert_eq!(h.undo_len(), 2);
        assert_eq!(s.items.len(), 3);
        h.undo(&mut s).unwrap();
        assert!(s.items.is_empty());
    }
}
