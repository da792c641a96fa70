//! Undo/redo history for a document session.
//!
//! Steps are grouped: consecutive single-character insertions share a group so one undo reverts
//! a whole typed word. The clean point (last save) is tracked as a position in the linear
//! history so `is_clean` survives undo/redo back to the saved state.

/// A single recorded text replacement (character offsets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextEdit {
    pub(crate) start: usize,
    pub(crate) deleted: String,
    pub(crate) inserted: String,
}

impl TextEdit {
    pub(crate) fn deleted_len(&self) -> usize {
        self.deleted.chars().count()
    }

    pub(crate) fn inserted_len(&self) -> usize {
        self.inserted.chars().count()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct UndoStep {
    pub(crate) group_id: usize,
    pub(crate) edit: TextEdit,
    pub(crate) cursor_before: usize,
    pub(crate) cursor_after: usize,
}

#[derive(Debug)]
pub(crate) struct UndoRedoManager {
    undo_stack: Vec<UndoStep>,
    redo_stack: Vec<UndoStep>,
    /// Uses `undo_stack.len()` as the saved position. May exceed it while redo steps exist.
    clean_index: Option<usize>,
    next_group_id: usize,
    open_group_id: Option<usize>,
}

impl Default for UndoRedoManager {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoRedoManager {
    pub(crate) fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            clean_index: Some(0),
            next_group_id: 0,
            open_group_id: None,
        }
    }

    pub(crate) fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub(crate) fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub(crate) fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub(crate) fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    pub(crate) fn mark_clean(&mut self) {
        self.clean_index = Some(self.undo_stack.len());
        self.end_group();
    }

    pub(crate) fn end_group(&mut self) {
        self.open_group_id = None;
    }

    fn clear_redo_and_adjust_clean(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }

        // A clean point inside the redo area becomes unreachable.
        if let Some(clean_index) = self.clean_index
            && clean_index > self.undo_stack.len()
        {
            self.clean_index = None;
        }

        self.redo_stack.clear();
    }

    pub(crate) fn push_step(&mut self, mut step: UndoStep, coalescible_insert: bool) {
        self.clear_redo_and_adjust_clean();

        let reuse_open_group = coalescible_insert
            && self.open_group_id.is_some()
            && self.clean_index != Some(self.undo_stack.len());

        step.group_id = match self.open_group_id {
            Some(group_id) if reuse_open_group => group_id,
            _ => {
                let group_id = self.next_group_id;
                self.next_group_id = self.next_group_id.wrapping_add(1);
                group_id
            }
        };

        self.open_group_id = coalescible_insert.then_some(step.group_id);
        self.undo_stack.push(step);
    }

    /// Pop the most recent group, newest step first.
    pub(crate) fn pop_undo_group(&mut self) -> Option<Vec<UndoStep>> {
        self.end_group();
        let last_group_id = self.undo_stack.last().map(|s| s.group_id)?;
        let mut steps = Vec::new();

        while self
            .undo_stack
            .last()
            .is_some_and(|step| step.group_id == last_group_id)
        {
            if let Some(step) = self.undo_stack.pop() {
                steps.push(step);
            }
        }

        Some(steps)
    }

    /// Pop the most recently undone group, oldest step first.
    pub(crate) fn pop_redo_group(&mut self) -> Option<Vec<UndoStep>> {
        self.end_group();
        let last_group_id = self.redo_stack.last().map(|s| s.group_id)?;
        let mut steps = Vec::new();

        while self
            .redo_stack
            .last()
            .is_some_and(|step| step.group_id == last_group_id)
        {
            if let Some(step) = self.redo_stack.pop() {
                steps.push(step);
            }
        }

        Some(steps)
    }

    /// Record an undone step so it can be redone. Call in the order returned by
    /// [`Self::pop_undo_group`].
    pub(crate) fn push_redo(&mut self, step: UndoStep) {
        self.redo_stack.push(step);
    }

    /// Restore a redone step. Call in the order returned by [`Self::pop_redo_group`].
    pub(crate) fn push_undo(&mut self, step: UndoStep) {
        self.undo_stack.push(step);
    }
}
