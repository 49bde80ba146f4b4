use crate::buffer::PixelBuffer;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_DEPTH: usize = 32;

/// Undo/redo stacks of full-canvas snapshots.
///
/// The undo side is bounded; committing past the cap silently evicts the
/// oldest snapshot. Undoing or redoing past the end is a no-op.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    undo_stack: VecDeque<PixelBuffer>,
    redo_stack: Vec<PixelBuffer>,
    depth: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl SnapshotHistory {
    pub fn new(depth: usize) -> Self {
        SnapshotHistory {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            depth: depth.max(1),
        }
    }

    /// Records the canvas as it looked before the edit being committed.
    /// Any redoable future is discarded.
    pub fn commit(&mut self, snapshot: PixelBuffer) {
        self.push_undo(snapshot);
        self.redo_stack.clear();
    }

    /// Pops the most recent snapshot, parking `current` on the redo stack.
    pub fn undo(&mut self, current: &PixelBuffer) -> Option<PixelBuffer> {
        let target = self.undo_stack.pop_back()?;
        self.redo_stack.push(current.clone());
        Some(target)
    }

    /// Reverses the latest undo, parking `current` back on the undo stack.
    pub fn redo(&mut self, current: &PixelBuffer) -> Option<PixelBuffer> {
        let target = self.redo_stack.pop()?;
        self.push_undo(current.clone());
        Some(target)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    fn push_undo(&mut self, snapshot: PixelBuffer) {
        if self.undo_stack.len() >= self.depth {
            let _ = self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::SnapshotHistory;
    use crate::buffer::PixelBuffer;
    use crate::model::Color;

    fn marked(x: i32) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(8, 8, Color::TRANSPARENT);
        buffer.set_pixel(x, 0, Color::WHITE);
        buffer
    }

    #[test]
    fn undo_on_empty_history_returns_none() {
        let mut history = SnapshotHistory::new(4);
        assert_eq!(history.undo(&marked(0)), None);
        assert_eq!(history.redo(&marked(0)), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_restores_the_committed_snapshot() {
        let mut history = SnapshotHistory::new(4);
        history.commit(marked(1));
        let current = marked(2);
        assert_eq!(history.undo(&current), Some(marked(1)));
        assert!(history.can_redo());
    }

    #[test]
    fn redo_restores_what_undo_displaced() {
        let mut history = SnapshotHistory::new(4);
        history.commit(marked(1));
        let undone = history.undo(&marked(2)).unwrap();
        assert_eq!(history.redo(&undone), Some(marked(2)));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn new_commit_clears_the_redo_stack() {
        let mut history = SnapshotHistory::new(4);
        history.commit(marked(1));
        let _ = history.undo(&marked(2));
        assert!(history.can_redo());
        history.commit(marked(3));
        assert!(!history.can_redo());
        assert_eq!(history.redo(&marked(3)), None);
    }

    #[test]
    fn depth_cap_evicts_the_oldest_snapshot() {
        let mut history = SnapshotHistory::new(2);
        history.commit(marked(1));
        history.commit(marked(2));
        history.commit(marked(3));
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.undo(&marked(4)), Some(marked(3)));
        assert_eq!(history.undo(&marked(3)), Some(marked(2)));
        assert_eq!(history.undo(&marked(2)), None);
    }
}
