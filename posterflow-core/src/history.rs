//! Linear undo/redo history store.
//!
//! A zipper over an edit sequence:
//!
//! ```text
//! past: [s0, s1, s2]   present: s3   future: [s4, s5]
//!        oldest ──►                   nearest ──►
//! ```
//!
//! `set` pushes the old present onto `past` and clears `future`; `undo` and
//! `redo` walk the zipper. Remote collaborator state enters through
//! [`HistoryStore::apply_remote`], which replaces the present without
//! recording an undo step so that undo never fights the remote party.
//!
//! Every operation is total and synchronous. There is no persistence; the
//! history lives and dies with the session.

use std::collections::VecDeque;

/// Undo/redo container around a single current value.
///
/// `T` must be `PartialEq`: `set` with a value structurally equal to the
/// current present is a no-op and records nothing.
#[derive(Debug, Clone)]
pub struct HistoryStore<T> {
    past: Vec<T>,
    present: T,
    future: VecDeque<T>,
    revision: u64,
}

impl<T: Clone + PartialEq> HistoryStore<T> {
    /// Create a store with an initial present value and empty stacks.
    pub fn new(initial: T) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: VecDeque::new(),
            revision: 0,
        }
    }

    /// The current value.
    pub fn present(&self) -> &T {
        &self.present
    }

    /// Monotone counter bumped on every change to `present`.
    ///
    /// Observers can compare revisions instead of values to detect change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the present value, recording the old one for undo.
    ///
    /// Returns `false` (and records nothing) when `new` equals the current
    /// present. Otherwise the redo stack is discarded: any mutation after an
    /// undo permanently drops the future branch.
    pub fn set(&mut self, new: T) -> bool {
        if new == self.present {
            return false;
        }
        let previous = std::mem::replace(&mut self.present, new);
        self.past.push(previous);
        self.future.clear();
        self.revision += 1;
        true
    }

    /// Functional-updater form of [`set`](Self::set).
    pub fn set_with(&mut self, update: impl FnOnce(&T) -> T) -> bool {
        let new = update(&self.present);
        self.set(new)
    }

    /// Step back one edit. No-op (returns `false`) when `past` is empty.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        self.revision += 1;
        true
    }

    /// Step forward one undone edit. No-op when `future` is empty.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        self.revision += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Silent set: replace the present without touching either stack.
    ///
    /// This is the entry point for remote collaborator state. It never
    /// creates an undo step and never clears redo history; `can_undo` and
    /// `can_redo` are unchanged. Returns `false` when `value` already equals
    /// the present.
    pub fn apply_remote(&mut self, value: T) -> bool {
        if value == self.present {
            return false;
        }
        self.present = value;
        self.revision += 1;
        true
    }

    /// Number of undoable steps.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Number of redoable steps.
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poster::{Field, PosterState};

    #[test]
    fn test_initial_store_has_no_history() {
        let store = HistoryStore::new(0);
        assert_eq!(*store.present(), 0);
        assert!(!store.can_undo());
        assert!(!store.can_redo());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_set_records_history() {
        let mut store = HistoryStore::new(0);
        assert!(store.set(1));
        assert!(store.set(2));

        assert_eq!(*store.present(), 2);
        assert_eq!(store.undo_depth(), 2);
        assert!(store.can_undo());
        assert!(!store.can_redo());
    }

    #[test]
    fn test_set_equal_value_is_noop() {
        let mut store = HistoryStore::new(5);
        assert!(!store.set(5));
        assert_eq!(store.undo_depth(), 0);
        assert!(!store.can_undo());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_undo_to_origin_then_redo_to_tip() {
        // Distinct values v1..vn: undo n times returns to initial, redo n
        // times returns to vn.
        let mut store = HistoryStore::new(0);
        for v in 1..=4 {
            store.set(v);
        }

        for _ in 0..4 {
            assert!(store.undo());
        }
        assert_eq!(*store.present(), 0);
        assert!(!store.can_undo());
        assert!(store.can_redo());

        for _ in 0..4 {
            assert!(store.redo());
        }
        assert_eq!(*store.present(), 4);
        assert!(store.can_undo());
        assert!(!store.can_redo());
    }

    #[test]
    fn test_undo_on_empty_past_is_noop() {
        let mut store = HistoryStore::new(7);
        assert!(!store.undo());
        assert_eq!(*store.present(), 7);
        assert!(!store.can_redo());
    }

    #[test]
    fn test_redo_on_empty_future_is_noop() {
        let mut store = HistoryStore::new(7);
        store.set(8);
        assert!(!store.redo());
        assert_eq!(*store.present(), 8);
        assert_eq!(store.undo_depth(), 1);
    }

    #[test]
    fn test_set_after_undo_clears_future() {
        let mut store = HistoryStore::new(0);
        store.set(1);
        store.set(2);
        store.undo();
        store.undo();
        assert_eq!(store.redo_depth(), 2);

        store.set(99);
        assert!(!store.can_redo());
        assert_eq!(store.redo_depth(), 0);
        assert_eq!(*store.present(), 99);
    }

    #[test]
    fn test_set_with_updater() {
        let mut store = HistoryStore::new(10);
        assert!(store.set_with(|v| v + 1));
        assert_eq!(*store.present(), 11);

        // Updater producing an equal value records nothing.
        assert!(!store.set_with(|v| *v));
        assert_eq!(store.undo_depth(), 1);
    }

    #[test]
    fn test_apply_remote_leaves_stacks_untouched() {
        let mut store = HistoryStore::new(0);
        store.set(1);
        store.set(2);
        store.undo();
        let undo_before = store.undo_depth();
        let redo_before = store.redo_depth();

        assert!(store.apply_remote(42));
        assert_eq!(*store.present(), 42);
        assert_eq!(store.undo_depth(), undo_before);
        assert_eq!(store.redo_depth(), redo_before);
        assert!(store.can_undo());
        assert!(store.can_redo());
    }

    #[test]
    fn test_apply_remote_equal_value_is_noop() {
        let mut store = HistoryStore::new(3);
        let rev = store.revision();
        assert!(!store.apply_remote(3));
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn test_revision_bumps_on_every_change() {
        let mut store = HistoryStore::new(0);
        store.set(1);
        store.undo();
        store.redo();
        store.apply_remote(9);
        assert_eq!(store.revision(), 4);
    }

    #[test]
    fn test_poster_edit_undo_scenario() {
        // {title:"", venue:""} -> set title -> set venue -> undo -> undo.
        let mut store = HistoryStore::new(PosterState::default());

        store.set_with(|s| {
            let mut next = s.clone();
            next.set_field(Field::Title, "Sunday Service");
            next
        });
        store.set_with(|s| {
            let mut next = s.clone();
            next.set_field(Field::Venue, "Main Hall");
            next
        });

        assert!(store.undo());
        assert_eq!(store.present().title, "Sunday Service");
        assert_eq!(store.present().venue, "");

        assert!(store.undo());
        assert_eq!(store.present().title, "");
        assert_eq!(store.present().venue, "");
        assert!(!store.can_undo());
    }
}
