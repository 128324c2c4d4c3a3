//! Snapshot history for undo.

use crate::scene::RootGroup;

/// Append-only stack of whole-scene snapshots.
///
/// Each entry is a deep clone of the root group taken immediately before a
/// mutating action. The step counter equals the number of entries during
/// normal operation. There is no redo: popped entries are gone.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<RootGroup>,
    step: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pre-mutation snapshot and return the new step count.
    pub fn push(&mut self, snapshot: RootGroup) -> usize {
        self.entries.push(snapshot);
        self.step += 1;
        self.step
    }

    /// Pop the most recent snapshot; None when the step count is zero.
    pub fn undo(&mut self) -> Option<RootGroup> {
        if self.step < 1 {
            return None;
        }
        self.step -= 1;
        self.entries.pop()
    }

    /// Rewind to the baseline entry without removing it.
    ///
    /// The floor is deliberately one entry, not zero: entry 0 is the state
    /// captured by the first push after board construction and survives
    /// every clear. Returns a clone of the baseline to install as the live
    /// scene, or None when there is at most one entry.
    pub fn rewind_to_baseline(&mut self) -> Option<RootGroup> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.truncate(1);
        self.step = 0;
        self.entries.first().cloned()
    }

    /// Current step count.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn snapshot_at(x: f64) -> RootGroup {
        RootGroup::new(Point::new(x, 0.0))
    }

    #[test]
    fn test_push_counts_steps() {
        let mut history = History::new();
        assert_eq!(history.push(snapshot_at(1.0)), 1);
        assert_eq!(history.push(snapshot_at(2.0)), 2);
        assert_eq!(history.step(), 2);
    }

    #[test]
    fn test_undo_pops_in_reverse_order() {
        let mut history = History::new();
        history.push(snapshot_at(1.0));
        history.push(snapshot_at(2.0));

        let popped = history.undo().unwrap();
        assert!((popped.view.position.x - 2.0).abs() < f64::EPSILON);
        assert_eq!(history.step(), 1);

        let popped = history.undo().unwrap();
        assert!((popped.view.position.x - 1.0).abs() < f64::EPSILON);
        assert_eq!(history.step(), 0);
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut history = History::new();
        assert!(history.undo().is_none());
        assert_eq!(history.step(), 0);
    }

    #[test]
    fn test_rewind_keeps_the_baseline_entry() {
        let mut history = History::new();
        history.push(snapshot_at(1.0));
        history.push(snapshot_at(2.0));
        history.push(snapshot_at(3.0));

        let baseline = history.rewind_to_baseline().unwrap();
        assert!((baseline.view.position.x - 1.0).abs() < f64::EPSILON);
        assert_eq!(history.len(), 1);
        assert_eq!(history.step(), 0);
    }

    #[test]
    fn test_rewind_with_single_entry_is_noop() {
        let mut history = History::new();
        history.push(snapshot_at(1.0));
        assert!(history.rewind_to_baseline().is_none());
        assert_eq!(history.len(), 1);
        assert_eq!(history.step(), 1);
    }

    #[test]
    fn test_rewind_on_empty_is_noop() {
        let mut history = History::new();
        assert!(history.rewind_to_baseline().is_none());
        assert!(history.is_empty());
    }
}
