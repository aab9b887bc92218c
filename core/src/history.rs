use crate::SharedStr;
use std::sync::Arc;

pub const MAX_SNAPSHOTS: usize = 50;

/// Bounded snapshot list with a cursor. The cursor always points at the
/// snapshot matching what the live surface holds, except mid undo/redo.
/// Recording past the cursor discards the redo branch outright.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    snapshots: Vec<SharedStr>,
    cursor: usize,
}

impl HistoryLog {
    pub fn new(initial: &str) -> Self {
        Self {
            snapshots: vec![Arc::from(initial)],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> &str {
        &self.snapshots[self.cursor]
    }

    /// Steps still reachable via `redo`.
    pub fn redo_depth(&self) -> usize {
        self.snapshots.len() - 1 - self.cursor
    }

    /// Appends a snapshot. Identical-to-current is a no-op; otherwise the
    /// redo branch is truncated, the snapshot appended, and the front
    /// evicted past the cap with the cursor decremented to match, so the
    /// redo distance is unaffected by eviction.
    pub fn record(&mut self, snapshot: &str) {
        if self.current() == snapshot {
            return;
        }
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(Arc::from(snapshot));
        self.cursor += 1;
        if self.snapshots.len() > MAX_SNAPSHOTS {
            self.snapshots.remove(0);
            self.cursor -= 1;
        }
    }

    pub fn undo(&mut self) -> Option<SharedStr> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.snapshots[self.cursor].clone())
    }

    pub fn redo(&mut self) -> Option<SharedStr> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.snapshots[self.cursor].clone())
    }
}
