//! Snapshot history with a cursor, for undo/redo by replay.

/// Default maximum number of snapshots kept.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Bounded sequence of serialized scene snapshots.
///
/// `step` points at the snapshot matching the current scene. Once the
/// baseline is recorded, `0 <= step < len` always holds.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    step: usize,
    max_len: usize,
    /// Set while a snapshot is being replayed into the scene.
    replaying: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::with_depth(MAX_UNDO_HISTORY)
    }
}

impl History {
    /// Create with a custom maximum length (at least 1).
    pub fn with_depth(max_len: usize) -> Self {
        Self {
            entries: Vec::new(),
            step: 0,
            max_len: max_len.max(1),
            replaying: false,
        }
    }

    /// Drop everything and start over from `baseline`.
    pub fn reset(&mut self, baseline: String) {
        self.entries.clear();
        self.entries.push(baseline);
        self.step = 0;
    }

    /// Record a snapshot. Entries past the cursor are discarded first; when
    /// full, the oldest entry is evicted. Returns false if nothing was
    /// recorded (replay in progress, or identical to the current entry).
    pub fn save(&mut self, snapshot: String) -> bool {
        if self.replaying {
            return false;
        }
        if self.entries.get(self.step) == Some(&snapshot) {
            return false;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.step + 1);
        }
        self.entries.push(snapshot);
        if self.entries.len() > self.max_len {
            self.entries.remove(0);
        }
        self.step = self.entries.len() - 1;
        log::debug!("History saved: step {} of {}", self.step, self.entries.len());
        true
    }

    /// Snapshot an undo would replay.
    pub fn undo_snapshot(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.entries.get(self.step - 1).map(String::as_str)
    }

    /// Snapshot a redo would replay.
    pub fn redo_snapshot(&self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.entries.get(self.step + 1).map(String::as_str)
    }

    /// Move the cursor back. Returns false at the oldest entry.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.step -= 1;
        true
    }

    /// Move the cursor forward. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.step += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.step > 0
    }

    pub fn can_redo(&self) -> bool {
        self.step + 1 < self.entries.len()
    }

    pub fn begin_replay(&mut self) {
        self.replaying = true;
    }

    pub fn end_replay(&mut self) {
        self.replaying = false;
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.step).map(String::as_str)
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}
