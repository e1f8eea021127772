//! Undo/redo history with nestable batching.
//!
//! Every change to the visual graph is described by a [`Mutation`] and tagged at the
//! call site with a [`MutationKind`]. Only structural mutations reach the history;
//! cosmetic ones (styles, labels, zoom-driven geometry) are applied but never recorded.

use super::VisualCell;

/// Whether a mutation represents user intent and therefore belongs in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Add or remove a cell, reconnect an edge, move a node, edit params.
    Structural,
    /// Styling and other derived attributes.
    Cosmetic,
}

/// A reversible change to the cell list.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Insert { index: usize, cell: VisualCell },
    Remove { index: usize, cell: VisualCell },
    Replace { before: VisualCell, after: VisualCell },
}

impl Mutation {
    pub fn inverse(&self) -> Mutation {
        match self {
            Mutation::Insert { index, cell } => Mutation::Remove {
                index: *index,
                cell: cell.clone(),
            },
            Mutation::Remove { index, cell } => Mutation::Insert {
                index: *index,
                cell: cell.clone(),
            },
            Mutation::Replace { before, after } => Mutation::Replace {
                before: after.clone(),
                after: before.clone(),
            },
        }
    }
}

/// One undo/redo unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryEntry {
    pub mutations: Vec<Mutation>,
}

impl HistoryEntry {
    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

/// Command history of a visual graph.
///
/// Outside a batch each structural mutation becomes its own entry. Between
/// [`init_batch`](Self::init_batch) and the matching [`store_batch`](Self::store_batch)
/// mutations are queued, and only the outermost `store_batch` turns the queue into a
/// single entry.
#[derive(Debug, Default)]
pub struct CommandHistory {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    depth: usize,
    pending: Vec<Mutation>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, mutation: Mutation, kind: MutationKind) {
        if kind == MutationKind::Cosmetic {
            return;
        }
        if self.depth > 0 {
            self.pending.push(mutation);
        } else {
            self.push_entry(HistoryEntry {
                mutations: vec![mutation],
            });
        }
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        self.redo_stack.clear();
    }

    pub fn init_batch(&mut self) {
        self.depth += 1;
        log::debug!("history batch opened (depth {})", self.depth);
    }

    /// Closes the innermost batch; the outermost close commits the queued mutations.
    ///
    /// Closing without an open batch is a programming error. Debug builds assert;
    /// release builds log it and keep the history usable.
    pub fn store_batch(&mut self) {
        debug_assert!(self.depth > 0, "store_batch called without a matching init_batch");
        if self.depth == 0 {
            log::warn!("store_batch called without an open batch; ignoring");
            return;
        }
        self.depth -= 1;
        log::debug!("history batch closed (depth {})", self.depth);
        if self.depth == 0 && !self.pending.is_empty() {
            let mutations = std::mem::take(&mut self.pending);
            self.push_entry(HistoryEntry { mutations });
        }
    }

    pub fn is_batching(&self) -> bool {
        self.depth > 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn has_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn has_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undo_stack.pop()
    }

    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo_stack.pop()
    }

    pub fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
    }

    pub fn push_redo(&mut self, entry: HistoryEntry) {
        self.redo_stack.push(entry);
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending.clear();
        self.depth = 0;
    }
}
